use super::types::*;
use crate::av::{ByteSpan, Payload};
use crate::codec::h264::{parse_avc_decoder_configuration_record, H264Parser};
use crate::config::InspectOptions;
use crate::Result;

/// Size of the AVC packet type plus composition time header.
const AVC_HEADER_SIZE: usize = 4;

/// Decodes the payload of a video tag (everything after the 11-byte tag
/// header).
///
/// `h264` carries the NAL length size between tags: a decoded sequence
/// header updates it for the NALU tags that follow.
pub fn parse_video_tag<'a>(
    payload: ByteSpan<'a>,
    options: &InspectOptions,
    h264: &mut H264Parser,
) -> Result<VideoTag<'a>> {
    let flags = payload.byte(0)?;

    let frame_type = FrameType((flags & 0xF0) >> 4);
    let codec_id = flags & 0x0F;

    let avc = if codec_id == VIDEO_CODEC_AVC {
        Some(parse_avc_packet(payload.tail(1), options, h264)?)
    } else {
        None
    };

    Ok(VideoTag {
        frame_type,
        codec_id,
        codec_name: video_codec_name(codec_id),
        avc,
    })
}

/// Sign-extends the 24-bit two's-complement composition time offset.
pub fn composition_time(b1: u8, b2: u8, b3: u8) -> i32 {
    let raw = ((b1 as u32) << 16) | ((b2 as u32) << 8) | b3 as u32;
    ((raw << 8) as i32) >> 8
}

fn parse_avc_packet<'a>(
    data: ByteSpan<'a>,
    options: &InspectOptions,
    h264: &mut H264Parser,
) -> Result<AvcPacket<'a>> {
    let packet_type = AvcPacketType::from(data.byte(0)?);
    let composition_time = composition_time(data.byte(1)?, data.byte(2)?, data.byte(3)?);
    let body = data.tail(AVC_HEADER_SIZE);

    let data = match packet_type {
        AvcPacketType::Nalu => Payload::preview(body, options.pass_data_buffer, NALU_HEX_PREVIEW),
        _ => Payload::capture(body, options.pass_data_buffer),
    };
    let mut packet = AvcPacket {
        packet_type,
        composition_time,
        nal_units: None,
        config: None,
        data,
    };

    match packet_type {
        AvcPacketType::Nalu if options.parse_nal_units => {
            match h264.parse_length_prefixed(body, options.pass_nal_unit_data) {
                Ok(units) => packet.nal_units = Some(units),
                Err(e) => log::warn!("NAL units at offset {} not decoded: {}", body.offset(), e),
            }
        }
        AvcPacketType::SequenceHeader if options.parse_headers => {
            let record = parse_avc_decoder_configuration_record(body);
            if record.is_complete() {
                h264.set_nal_length_size(record.nal_length_size())?;
            }
            packet.config = Some(record);
        }
        _ => {}
    }

    Ok(packet)
}

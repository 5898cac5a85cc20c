use super::types::*;
use crate::av::{ByteSpan, Payload};
use crate::codec::aac::parse_audio_specific_config;
use crate::config::InspectOptions;
use crate::Result;

/// Decodes the payload of an audio tag (everything after the 11-byte tag
/// header).
pub fn parse_audio_tag<'a>(payload: ByteSpan<'a>, options: &InspectOptions) -> Result<AudioTag<'a>> {
    let flags = payload.byte(0)?;

    let sound_format = SoundFormat((flags & 0xF0) >> 4);
    let sound_rate = SoundRate((flags & 0x0C) >> 2);
    let sound_size = if flags & 0x02 != 0 { SoundSize::Bits16 } else { SoundSize::Bits8 };
    let sound_type = if flags & 0x01 != 0 { SoundType::Stereo } else { SoundType::Mono };

    let aac = if sound_format.is_aac() {
        Some(parse_aac_packet(payload.tail(1), options)?)
    } else {
        None
    };

    Ok(AudioTag {
        sound_format,
        sound_rate,
        sound_size,
        sound_type,
        aac,
    })
}

fn parse_aac_packet<'a>(data: ByteSpan<'a>, options: &InspectOptions) -> Result<AacPacket<'a>> {
    let packet_type = AacPacketType::from(data.byte(0)?);
    let body = data.tail(1);

    let config = match packet_type {
        AacPacketType::SequenceHeader if options.parse_headers => {
            let config = parse_audio_specific_config(body.as_bytes())?;
            log::debug!(
                "AudioSpecificConfig at {}: {} {:?} {} channels",
                body.offset(),
                config.audio_object_type_str,
                config.sampling_frequency,
                config.channel_configuration
            );
            Some(config)
        }
        _ => None,
    };

    Ok(AacPacket {
        packet_type,
        config,
        data: Payload::capture(body, options.pass_data_buffer),
    })
}

use super::audio::parse_audio_tag;
use super::types::*;
use super::video::parse_video_tag;
use crate::av::ByteSpan;
use crate::codec::h264::H264Parser;
use crate::config::InspectOptions;
use crate::validate::run_validation_rules;
use crate::{FlvError, Result};

/// Walks an in-memory FLV stream tag by tag.
///
/// The inspector keeps the state that crosses tag boundaries: the NAL
/// length size announced by the last AVC sequence header and the last
/// in-band SPS. [`FlvInspector::inspect`] starts every stream from a fresh
/// state. [`FlvInspector::inspect_tag`] keeps it between calls, so tags fed
/// one at a time must arrive in stream order.
#[derive(Debug)]
pub struct FlvInspector {
    options: InspectOptions,
    h264: H264Parser,
}

impl FlvInspector {
    /// Creates an inspector. Validations switch header and NAL decoding on.
    pub fn new(options: InspectOptions) -> Self {
        Self {
            options: options.effective(),
            h264: H264Parser::new(),
        }
    }

    /// The options in force, after validations forced decoding on.
    pub fn options(&self) -> &InspectOptions {
        &self.options
    }

    /// Decodes every tag of `bytes`, then runs the validation rules if
    /// enabled.
    ///
    /// The FLV signature is not checked; the first tag is expected right
    /// after the 9-byte header and the first previous-tag-size field.
    pub fn inspect<'a>(&mut self, bytes: &'a [u8]) -> Result<Vec<FlvTag<'a>>> {
        self.h264 = H264Parser::new();

        let source = ByteSpan::new(bytes, 0);
        let mut tags = Vec::new();
        let mut pos = FLV_HEADER_SIZE + PREVIOUS_TAG_SIZE_LENGTH;

        while pos < bytes.len() {
            let tag = self.inspect_tag_at(source, pos)?;
            pos += TAG_HEADER_SIZE + tag.data_size as usize + PREVIOUS_TAG_SIZE_LENGTH;
            tags.push(tag);
        }

        log::debug!("Walked {} tags over {} bytes", tags.len(), bytes.len());

        if self.options.run_validations {
            run_validation_rules(&mut tags);
        }

        Ok(tags)
    }

    /// Decodes a single tag, header included. `offset` is where `bytes`
    /// sits in the enclosing stream and is reported as the tag offset.
    ///
    /// State learnt from earlier tags, such as the NAL length size, is used
    /// and updated.
    pub fn inspect_tag<'a>(&mut self, bytes: &'a [u8], offset: usize) -> Result<FlvTag<'a>> {
        let source = ByteSpan::new(bytes, offset);
        self.inspect_tag_at(source, 0)
    }

    fn inspect_tag_at<'a>(&mut self, source: ByteSpan<'a>, pos: usize) -> Result<FlvTag<'a>> {
        let offset = source.offset() + pos;
        let header = source.slice(pos, TAG_HEADER_SIZE).ok_or(FlvError::TruncatedStream {
            offset,
            declared: TAG_HEADER_SIZE,
            available: source.len().saturating_sub(pos),
        })?;
        let h = header.as_bytes();

        let tag_type = h[0];
        let data_size = u24(h[1], h[2], h[3]);
        // Bits 24-31 come after the lower 24 bits on the wire
        let timestamp = ((h[7] as u32) << 24) | u24(h[4], h[5], h[6]);
        let stream_id = u24(h[8], h[9], h[10]);

        let payload = source
            .slice(pos + TAG_HEADER_SIZE, data_size as usize)
            .ok_or(FlvError::TruncatedStream {
                offset,
                declared: TAG_HEADER_SIZE + data_size as usize,
                available: source.len().saturating_sub(pos),
            })?;

        let kind = TagKind::from(tag_type);
        log::trace!(
            "tag {} at {}: {} bytes, ts={}",
            kind.name(),
            offset,
            data_size,
            timestamp
        );

        let body = match kind {
            TagKind::Audio => TagBody::Audio(parse_audio_tag(payload, &self.options)?),
            TagKind::Video => TagBody::Video(parse_video_tag(payload, &self.options, &mut self.h264)?),
            TagKind::Metadata => TagBody::Script(opaque_payload(payload, self.options.pass_data_buffer)),
            TagKind::Unrecognized(type_id) => {
                log::debug!("Unrecognized tag type 0x{:02X} at {}", type_id, offset);
                TagBody::Unrecognized(OpaqueTag::default())
            }
        };

        Ok(FlvTag {
            tag_type: kind,
            data_size,
            timestamp,
            stream_id,
            byte_offset: offset,
            body,
            estimated_duration_ms: None,
            validations: Vec::new(),
        })
    }
}

fn u24(b0: u8, b1: u8, b2: u8) -> u32 {
    ((b0 as u32) << 16) | ((b1 as u32) << 8) | b2 as u32
}

/// Inspects a whole FLV stream with the given options.
///
/// ```
/// use flvkit::{inspect, InspectOptions};
///
/// let mut flv = b"FLV\x01\x05\x00\x00\x00\x09\x00\x00\x00\x00".to_vec();
/// // audio tag: MP3, 2 payload bytes, timestamp 12345 (0x003039)
/// flv.extend_from_slice(&[0x08, 0x00, 0x00, 0x02, 0x00, 0x30, 0x39, 0x00, 0x00, 0x00, 0x00]);
/// flv.extend_from_slice(&[0x2F, 0xFF]);
/// flv.extend_from_slice(&[0x00, 0x00, 0x00, 0x0D]);
///
/// let tags = inspect(&flv, &InspectOptions::default()).unwrap();
/// assert_eq!(tags.len(), 1);
/// assert_eq!(tags[0].timestamp, 12345);
/// assert_eq!(tags[0].byte_offset, 13);
/// ```
pub fn inspect<'a>(bytes: &'a [u8], options: &InspectOptions) -> Result<Vec<FlvTag<'a>>> {
    FlvInspector::new(options.clone()).inspect(bytes)
}

/// Decodes one tag, header included, outside of a stream walk.
pub fn inspect_tag<'a>(bytes: &'a [u8], options: &InspectOptions) -> Result<FlvTag<'a>> {
    FlvInspector::new(options.clone()).inspect_tag(bytes, 0)
}

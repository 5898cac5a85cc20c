//! FLV container inspection.
//!
//! [`FlvInspector`] walks an in-memory FLV file tag by tag. Audio and video
//! tags are decoded down to their codec configuration records (AAC
//! AudioSpecificConfig, AVCDecoderConfigurationRecord) and, optionally, the
//! NAL units of each AVC frame. Script data tags are framed but not
//! decoded.
//!
//! ```
//! use flvkit::format::flv::{inspect, textify};
//! use flvkit::InspectOptions;
//!
//! let flv = b"FLV\x01\x05\x00\x00\x00\x09\x00\x00\x00\x00";
//! let tags = inspect(flv, &InspectOptions::full()).unwrap();
//! assert!(tags.is_empty());
//! assert_eq!(textify(&tags).unwrap(), "[]");
//! ```

/// Audio tag decoding
pub mod audio;
/// The tag walker
pub mod inspector;
/// Tag data model and lookup tables
pub mod types;
/// Video tag decoding
pub mod video;

pub use audio::parse_audio_tag;
pub use inspector::{inspect, inspect_tag, FlvInspector};
pub use types::*;
pub use video::{composition_time, parse_video_tag};

use crate::Result;

/// Renders decoded tags as pretty-printed JSON.
///
/// Byte ranges are written as `{"offset": .., "length": ..}` objects, so
/// the output stays small even when payloads are passed through.
pub fn textify(tags: &[FlvTag<'_>]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tags)?)
}

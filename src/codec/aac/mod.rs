//! # AAC Audio Configuration
//!
//! Decoding of the MPEG-4 AudioSpecificConfig carried by FLV AAC sequence
//! header tags.
//!
//! ```rust
//! use flvkit::codec::aac::{parse_audio_specific_config, SamplingFrequency};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = parse_audio_specific_config(&[0x12, 0x10])?;
//! assert_eq!(config.audio_object_type_str, "AAC LC");
//! assert_eq!(config.sampling_frequency, SamplingFrequency::Hz(44100));
//! # Ok(())
//! # }
//! ```

/// AudioSpecificConfig decoder
pub mod parser;
/// Configuration types and lookup tables
pub mod types;

pub use parser::parse_audio_specific_config;
pub use types::*;

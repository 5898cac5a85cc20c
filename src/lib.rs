#![doc(html_root_url = "https://docs.rs/flvkit/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

//! # flvkit - FLV Tag Inspector
//!
//! `flvkit` decodes an in-memory FLV file into a list of tags and checks
//! the result for packaging inconsistencies. It is meant for debugging
//! live streaming pipelines, where a packager writes timestamps and frame
//! flags that can drift away from what the audio and video essence says.
//!
//! ## Features
//!
//! ### Container
//! - Tag framing with absolute byte offsets and extended timestamps
//! - Audio and video tag header flags, with human readable names
//! - Script data and unknown tags passed through undecoded
//!
//! ### Codec Configuration
//! - AVCDecoderConfigurationRecord, including the high profile extension
//! - AAC AudioSpecificConfig, including escaped object types and
//!   explicit sampling frequencies
//! - Length-prefixed NAL units of AVC frames, classified by type
//!
//! ### Validation
//! - Packager keyframe flag against IDR slices in the essence
//! - AAC packet spacing against the sampling frequency
//! - Video frame spacing against the median frame duration
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! flvkit = "0.1.0"
//! ```
//!
//! ### Inspecting a File
//!
//! ```rust,no_run
//! use flvkit::{inspect, textify, InspectOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes = std::fs::read("stream.flv")?;
//!
//!     // Defaults, then flvkit.toml, then FLVKIT_* environment variables
//!     let options = InspectOptions::load()?;
//!     let tags = inspect(&bytes, &options)?;
//!
//!     for tag in tags.iter().filter(|tag| !tag.validations.is_empty()) {
//!         println!("{} @ {}: {:?}", tag.tag_type.name(), tag.timestamp, tag.validations);
//!     }
//!
//!     println!("{}", textify(&tags)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - `av`: Byte range views into the inspected buffer
//!
//! - `codec`: Codec configuration decoders
//!   - H.264/AVC decoder configuration record and NAL units
//!   - AAC AudioSpecificConfig
//!
//! - `format`: The FLV tag walker and tag decoders
//!
//! - `validate`: Cross-tag integrity rules
//!
//! - `config`: Inspection options and where they are loaded from
//!
//! - `error`: Error handling types and utilities
//!
//! - `utils`: Bitstream reading and hex rendering
//!
/// Byte range views into the inspected buffer
pub mod av;

/// Codec configuration decoders for video and audio
pub mod codec;

/// Error types and utilities
pub mod error;

/// Container format implementations
pub mod format;

/// Common utilities and helper functions
pub mod utils;

/// Configuration module
pub mod config;

/// Validation rules over decoded tags
pub mod validate;

pub use config::InspectOptions;
pub use error::{FlvError, Result};
pub use format::flv::{inspect, inspect_tag, textify, FlvInspector, FlvTag};

//! # H.264/AVC
//!
//! Decoding of the H.264 structures found in FLV video tags:
//!
//! - The AVCDecoderConfigurationRecord of AVC sequence header tags
//! - Length-prefixed NAL units of AVC NALU tags, classified by type
//! - Resolution from in-band sequence parameter sets
//!
//! ## Example: Classifying NAL units
//!
//! ```rust
//! use flvkit::av::ByteSpan;
//! use flvkit::codec::h264::H264Parser;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut parser = H264Parser::new();
//! // 4-byte length prefix followed by an IDR slice header byte
//! let payload = [0x00, 0x00, 0x00, 0x02, 0x65, 0x88];
//!
//! let nal_units = parser.parse_length_prefixed(ByteSpan::new(&payload, 0), false)?;
//! assert!(nal_units[0].is_idr());
//! # Ok(())
//! # }
//! ```

/// Parser for length-prefixed H.264 payloads
pub mod parser;
/// AVCDecoderConfigurationRecord decoding
pub mod record;
/// NAL unit and parameter set types
pub mod types;

// Re-export commonly used types from submodules for easier access
#[doc(inline)]
pub use parser::*;
#[doc(inline)]
pub use record::*;
#[doc(inline)]
pub use types::*;

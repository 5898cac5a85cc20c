//! # Utility Functions and Types
//!
//! Helpers shared by the codec decoders and the FLV inspector:
//!
//! - Bit-level reads for fields that are not byte aligned
//! - Hex rendering of undecoded payload bytes
//!
//! ## Bit Operations
//!
//! ```rust
//! use flvkit::utils::{read_bits_at, BitReader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = vec![0b10110011u8];
//! let mut reader = BitReader::new(&data);
//!
//! // Read specific number of bits
//! let value = reader.read_bits(3)?; // Reads first 3 bits (101)
//! assert_eq!(value, 0b101);
//!
//! // Or read at an absolute bit offset without a cursor
//! assert_eq!(read_bits_at(&data, 3, 5)?, 0b10011);
//! # Ok(())
//! # }
//! ```

/// Bit manipulation and bitstream reading utilities
pub mod bits;

/// Hex text rendering for raw byte ranges
pub mod hex;

// Re-export commonly used types
pub use bits::*;
pub use hex::hex_string_list;

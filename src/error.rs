use std::str::ParseBoolError;
use thiserror::Error;

/// Errors produced while inspecting an FLV stream.
#[derive(Error, Debug)]
pub enum FlvError {
    /// I/O error while loading a file
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A bit or byte read past the end of its buffer
    #[error("read of {num_bits} bits at bit {bit_pos} exceeds buffer of {bit_len} bits")]
    Bounds {
        /// First bit of the failed read
        bit_pos: usize,
        /// Width of the failed read
        num_bits: u32,
        /// Size of the buffer, in bits
        bit_len: usize,
    },

    /// A tag header or payload runs past the end of the input
    #[error("tag at offset {offset} declares {declared} bytes but only {available} remain")]
    TruncatedStream {
        /// Offset of the tag header
        offset: usize,
        /// Bytes the tag needs, header included
        declared: usize,
        /// Bytes left from the tag header on
        available: usize,
    },

    /// An AVC decoder configuration record ended early
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Codec-level error
    #[error("codec error: {0}")]
    Codec(String),

    /// NAL unit framing error
    #[error("parser error: {0}")]
    Parser(String),

    /// JSON rendering error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid boolean in a config file or environment variable
    #[error("parse bool error: {0}")]
    ParseBool(#[from] ParseBoolError),
}

/// Result type for flvkit operations
pub type Result<T> = std::result::Result<T, FlvError>;

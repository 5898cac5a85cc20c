//! Core types shared by the codec decoders and the container inspector.

mod span;
pub use span::*;

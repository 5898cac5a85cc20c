//! Container formats.
//!
//! Only FLV is supported. The inspector works on a fully buffered file and
//! never writes one back.

pub mod flv;

pub use self::flv::{inspect, inspect_tag, textify, FlvInspector, FlvTag};

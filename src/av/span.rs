use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::{FlvError, Result};
use crate::utils::hex_string_list;

/// A borrowed, non-owning view of a byte range in the inspected buffer.
///
/// `offset` is absolute: it is the position of the first byte in the buffer
/// handed to [`crate::inspect`], so a span can be located in the source file
/// no matter how deeply nested the record that produced it. The bytes are
/// never copied; the input buffer must outlive every span taken from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSpan<'a> {
    offset: usize,
    data: &'a [u8],
}

impl<'a> ByteSpan<'a> {
    /// Wraps `data`, which starts at `offset` in the source buffer.
    pub fn new(data: &'a [u8], offset: usize) -> Self {
        Self { offset, data }
    }

    /// Absolute offset of the first byte.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes in the span.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The viewed bytes, borrowed from the source buffer.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Reads the byte at `index`, relative to the start of the span.
    pub fn byte(&self, index: usize) -> Result<u8> {
        self.data.get(index).copied().ok_or(FlvError::Bounds {
            bit_pos: index * 8,
            num_bits: 8,
            bit_len: self.data.len() * 8,
        })
    }

    /// Sub-span of `len` bytes starting at `start`, or `None` if it would
    /// extend past the end of this span.
    pub fn slice(&self, start: usize, len: usize) -> Option<ByteSpan<'a>> {
        let end = start.checked_add(len)?;
        let data = self.data.get(start..end)?;
        Some(ByteSpan {
            offset: self.offset + start,
            data,
        })
    }

    /// Everything from `start` to the end. Empty if `start` is past the end.
    pub fn tail(&self, start: usize) -> ByteSpan<'a> {
        let start = start.min(self.data.len());
        ByteSpan {
            offset: self.offset + start,
            data: &self.data[start..],
        }
    }

    /// At most the first `len` bytes.
    pub fn head(&self, len: usize) -> ByteSpan<'a> {
        let len = len.min(self.data.len());
        ByteSpan {
            offset: self.offset,
            data: &self.data[..len],
        }
    }
}

impl Serialize for ByteSpan<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ByteSpan", 2)?;
        state.serialize_field("offset", &self.offset)?;
        state.serialize_field("length", &self.data.len())?;
        state.end()
    }
}

/// Payload bytes that were not decoded further.
///
/// Depending on the inspection options the bytes are either referenced in
/// place or rendered as hex text for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload<'a> {
    /// Borrowed view of the bytes
    Raw(ByteSpan<'a>),
    /// `0xNN 0xNN ...` rendering of the bytes
    Hex(String),
}

impl<'a> Payload<'a> {
    /// Keeps the span itself when `pass_buffer` is set, hex text otherwise.
    pub fn capture(span: ByteSpan<'a>, pass_buffer: bool) -> Self {
        if pass_buffer {
            Payload::Raw(span)
        } else {
            Payload::Hex(hex_string_list(span.as_bytes()))
        }
    }

    /// Like [`Payload::capture`] but the hex rendering is cut to the first
    /// `limit` bytes.
    pub fn preview(span: ByteSpan<'a>, pass_buffer: bool, limit: usize) -> Self {
        if pass_buffer {
            Payload::Raw(span)
        } else {
            Payload::Hex(hex_string_list(span.head(limit).as_bytes()))
        }
    }

    /// The borrowed span, if the payload was captured raw.
    pub fn as_span(&self) -> Option<&ByteSpan<'a>> {
        match self {
            Payload::Raw(span) => Some(span),
            Payload::Hex(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slice_keeps_absolute_offset() {
        let buf = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let span = ByteSpan::new(&buf[2..], 2);

        let sub = span.slice(1, 3).unwrap();
        assert_eq!(sub.offset(), 3);
        assert_eq!(sub.as_bytes(), &[3, 4, 5]);

        let nested = sub.slice(2, 1).unwrap();
        assert_eq!(nested.offset(), 5);
        assert_eq!(nested.as_bytes(), &[5]);
    }

    #[test]
    fn test_out_of_range_access() {
        let buf = [1u8, 2, 3];
        let span = ByteSpan::new(&buf, 0);

        assert!(span.slice(2, 2).is_none());
        assert!(span.slice(usize::MAX, 2).is_none());
        assert!(matches!(span.byte(3), Err(FlvError::Bounds { .. })));

        let tail = span.tail(10);
        assert!(tail.is_empty());
        assert_eq!(tail.offset(), 3);
    }

    #[test]
    fn test_payload_rendering() {
        let buf = [0xAFu8, 0x01, 0x21];
        let span = ByteSpan::new(&buf, 40);

        let raw = serde_json::to_value(Payload::capture(span, true)).unwrap();
        assert_eq!(raw, serde_json::json!({"offset": 40, "length": 3}));

        let hex = serde_json::to_value(Payload::capture(span, false)).unwrap();
        assert_eq!(hex, serde_json::json!("0xAF 0x01 0x21"));

        let preview = Payload::preview(span, false, 2);
        assert_eq!(preview, Payload::Hex("0xAF 0x01".to_string()));
    }
}

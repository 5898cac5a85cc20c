use bytes::Bytes;
use serde::{Serialize, Serializer};

use crate::av::ByteSpan;

/// A NAL unit with emulation prevention bytes removed.
#[derive(Debug)]
pub struct NALUnit {
    /// NAL unit type, the low 5 bits of the header
    pub nal_type: u8,
    /// nal_ref_idc, 2 bits
    pub nal_ref_idc: u8,
    /// Header byte and RBSP
    pub data: Bytes,
}

impl NALUnit {
    /// Splits the header byte into type and reference idc.
    ///
    /// `data` must hold at least the one-byte NAL header.
    pub fn new(data: Bytes) -> Self {
        let header = data[0];
        Self {
            nal_type: header & 0x1F,
            nal_ref_idc: (header >> 5) & 0x03,
            data,
        }
    }

    /// True for a coded slice of an IDR picture.
    pub fn is_idr(&self) -> bool {
        matches!(NALUnitType::from(self.nal_type), NALUnitType::CodedSliceIDR)
    }
}

/// What an in-band sequence parameter set says about the picture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SPSInfo {
    /// profile_idc
    pub profile_idc: u8,
    /// level_idc
    pub level_idc: u8,
    /// Width in pixels, after cropping
    pub width: u32,
    /// Height in pixels, after cropping
    pub height: u32,
}

/// NAL unit types of H.264 Table 7-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NALUnitType {
    /// 0
    Unspecified,
    /// 1
    CodedSliceNonIDR,
    /// 2
    CodedSliceDataPartitionA,
    /// 3
    CodedSliceDataPartitionB,
    /// 4
    CodedSliceDataPartitionC,
    /// 5
    CodedSliceIDR,
    /// 6
    SEI,
    /// 7
    SPS,
    /// 8
    PPS,
    /// 9
    AccessUnitDelimiter,
    /// 10
    EndOfSequence,
    /// 11
    EndOfStream,
    /// 12
    FillerData,
    /// 13
    SPSExtension,
    /// Any other type, reserved or unspecified
    Reserved(u8),
}

impl From<u8> for NALUnitType {
    fn from(value: u8) -> Self {
        match value {
            0 => NALUnitType::Unspecified,
            1 => NALUnitType::CodedSliceNonIDR,
            2 => NALUnitType::CodedSliceDataPartitionA,
            3 => NALUnitType::CodedSliceDataPartitionB,
            4 => NALUnitType::CodedSliceDataPartitionC,
            5 => NALUnitType::CodedSliceIDR,
            6 => NALUnitType::SEI,
            7 => NALUnitType::SPS,
            8 => NALUnitType::PPS,
            9 => NALUnitType::AccessUnitDelimiter,
            10 => NALUnitType::EndOfSequence,
            11 => NALUnitType::EndOfStream,
            12 => NALUnitType::FillerData,
            13 => NALUnitType::SPSExtension,
            other => NALUnitType::Reserved(other),
        }
    }
}

impl NALUnitType {
    /// Name as given in H.264 Table 7-1.
    pub fn name(&self) -> &'static str {
        match self {
            NALUnitType::Unspecified => "Unspecified",
            NALUnitType::CodedSliceNonIDR => "Coded slice of a non-IDR picture",
            NALUnitType::CodedSliceDataPartitionA => "Coded slice data partition A",
            NALUnitType::CodedSliceDataPartitionB => "Coded slice data partition B",
            NALUnitType::CodedSliceDataPartitionC => "Coded slice data partition C",
            NALUnitType::CodedSliceIDR => "Coded slice of an IDR picture",
            NALUnitType::SEI => "Supplemental enhancement information (SEI)",
            NALUnitType::SPS => "Sequence parameter set",
            NALUnitType::PPS => "Picture parameter set",
            NALUnitType::AccessUnitDelimiter => "Access unit delimiter",
            NALUnitType::EndOfSequence => "End of sequence",
            NALUnitType::EndOfStream => "End of stream",
            NALUnitType::FillerData => "Filler data",
            NALUnitType::SPSExtension => "Sequence parameter set extension",
            NALUnitType::Reserved(_) => "Reserved",
        }
    }
}

impl Serialize for NALUnitType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// One NAL unit found in the payload of an AVC NALU tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NalUnitInfo<'a> {
    /// Raw 5-bit type
    pub nal_unit_type: u8,
    /// Classified type, rendered by name
    pub nal_type: NALUnitType,
    /// nal_ref_idc
    pub nal_ref_idc: u8,
    /// Unit size in bytes, length prefix excluded
    pub size: usize,
    /// The unit's bytes, when NAL data capture is on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ByteSpan<'a>>,
    /// Decoded summary of an SPS unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sps: Option<SPSInfo>,
}

impl NalUnitInfo<'_> {
    /// True for a coded slice of an IDR picture.
    pub fn is_idr(&self) -> bool {
        self.nal_type == NALUnitType::CodedSliceIDR
    }
}

use serde::{Serialize, Serializer};

use crate::av::{ByteSpan, Payload};
use crate::codec::aac::AudioSpecificConfig;
use crate::codec::h264::{AvcDecoderConfigurationRecord, NalUnitInfo};

/// Size of the FLV file header.
pub const FLV_HEADER_SIZE: usize = 9;
/// Size of the PreviousTagSize field after every tag.
pub const PREVIOUS_TAG_SIZE_LENGTH: usize = 4;
/// Size of a tag header.
pub const TAG_HEADER_SIZE: usize = 11;

/// Tag type byte of audio tags.
pub const TAG_TYPE_AUDIO: u8 = 0x08;
/// Tag type byte of video tags.
pub const TAG_TYPE_VIDEO: u8 = 0x09;
/// Tag type byte of script data tags.
pub const TAG_TYPE_SCRIPT: u8 = 0x12;

/// SoundFormat of AAC audio.
pub const SOUND_FORMAT_AAC: u8 = 10;
/// CodecID of AVC video.
pub const VIDEO_CODEC_AVC: u8 = 7;

/// Bytes of an AVC NALU payload rendered when payloads are shown as hex.
pub const NALU_HEX_PREVIEW: usize = 96;

const SOUND_FORMATS: [&str; 14] = [
    "Linear PCM, platform endian",
    "ADPCM",
    "MP3",
    "Linear PCM, little endian",
    "Nellymoser 16-kHz mono",
    "Nellymoser 8-kHz mono",
    "Nellymoser",
    "G.711 A-law logarithmic PCM",
    "G.711 mu-law logarithmic PCM",
    "reserved",
    "AAC",
    "Speex",
    "MP3 8-Khz",
    "Device-specific sound",
];

const SOUND_RATES: [&str; 4] = ["5.5-kHz", "11-kHz", "22-kHz", "44-kHz"];

const FRAME_TYPES: [&str; 6] = [
    "Unknown",
    "Keyframe (for AVC, a seekable frame)",
    "Inter frame (for AVC, a nonseekable frame)",
    "Disposable inter frame (H.263 only)",
    "Generated keyframe (reserved for server use only)",
    "Video info/command frame",
];

const VIDEO_CODECS: [&str; 8] = [
    "unknown",
    "JPEG",
    "Sorenson H.263",
    "Screen video",
    "On2 VP6",
    "On2 VP6 with alpha channel",
    "Screen video version 2",
    "AVC",
];

macro_rules! serialize_by_name {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.name())
                }
            }
        )*
    };
}

serialize_by_name!(
    TagKind,
    SoundFormat,
    SoundRate,
    SoundSize,
    SoundType,
    AacPacketType,
    FrameType,
    AvcPacketType,
    FindingLevel
);

/// Container-level tag type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// 0x08
    Audio,
    /// 0x09
    Video,
    /// Script data, 0x12
    Metadata,
    /// Any other type byte
    Unrecognized(u8),
}

impl From<u8> for TagKind {
    fn from(value: u8) -> Self {
        match value {
            TAG_TYPE_AUDIO => TagKind::Audio,
            TAG_TYPE_VIDEO => TagKind::Video,
            TAG_TYPE_SCRIPT => TagKind::Metadata,
            other => TagKind::Unrecognized(other),
        }
    }
}

impl TagKind {
    /// Rendered name: audio, video, metadata or unknown.
    pub fn name(&self) -> &'static str {
        match self {
            TagKind::Audio => "audio",
            TagKind::Video => "video",
            TagKind::Metadata => "metadata",
            TagKind::Unrecognized(_) => "unknown",
        }
    }
}

/// One FLV tag and everything decoded from it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlvTag<'a> {
    /// Tag type
    pub tag_type: TagKind,
    /// Payload size declared in the header
    pub data_size: u32,
    /// Decode timestamp in milliseconds, extended byte included
    pub timestamp: u32,
    /// StreamID, always 0 in conforming files
    #[serde(rename = "streamID")]
    pub stream_id: u32,
    /// Position of the tag header in the inspected buffer.
    pub byte_offset: usize,
    /// Decoded payload
    #[serde(flatten)]
    pub body: TagBody<'a>,
    /// Timestamp distance to the next AVC NALU tag, set by validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration_ms: Option<i64>,
    /// Findings attached by the validation rules
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<Finding>,
}

impl<'a> FlvTag<'a> {
    /// The audio body of an audio tag.
    pub fn audio(&self) -> Option<&AudioTag<'a>> {
        match &self.body {
            TagBody::Audio(audio) => Some(audio),
            _ => None,
        }
    }

    /// The video body of a video tag.
    pub fn video(&self) -> Option<&VideoTag<'a>> {
        match &self.body {
            TagBody::Video(video) => Some(video),
            _ => None,
        }
    }

    /// The AAC packet of an AAC audio tag.
    pub fn aac(&self) -> Option<&AacPacket<'a>> {
        self.audio().and_then(|audio| audio.aac.as_ref())
    }

    /// The AVC packet of an AVC video tag.
    pub fn avc(&self) -> Option<&AvcPacket<'a>> {
        self.video().and_then(|video| video.avc.as_ref())
    }

    /// Attaches a finding to this tag.
    pub fn add_finding(&mut self, finding: Finding) {
        self.validations.push(finding);
    }
}

/// Kind-specific part of a tag.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TagBody<'a> {
    /// Audio tag
    Audio(AudioTag<'a>),
    /// Video tag
    Video(VideoTag<'a>),
    /// Script data tag, not decoded
    Script(OpaqueTag<'a>),
    /// Tag of an unknown type, payload never kept
    Unrecognized(OpaqueTag<'a>),
}

/// Script data and unknown tags are not decoded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OpaqueTag<'a> {
    /// The payload, when data buffers are passed through
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload<'a>>,
}

/// Header flags of an audio tag, plus the AAC packet for AAC audio.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioTag<'a> {
    /// Codec
    pub sound_format: SoundFormat,
    /// Sample rate class
    pub sound_rate: SoundRate,
    /// Sample size
    pub sound_size: SoundSize,
    /// Mono or stereo
    pub sound_type: SoundType,
    /// Present when the format is AAC
    #[serde(flatten)]
    pub aac: Option<AacPacket<'a>>,
}

/// The AAC part of an audio tag.
#[derive(Debug, Clone, Serialize)]
pub struct AacPacket<'a> {
    /// Sequence header or raw frame
    #[serde(rename = "aacPacketType")]
    pub packet_type: AacPacketType,
    /// Decoded AudioSpecificConfig of a sequence header
    #[serde(rename = "ASCHeader", skip_serializing_if = "Option::is_none")]
    pub config: Option<AudioSpecificConfig>,
    /// Payload after the packet type byte
    pub data: Payload<'a>,
}

/// Header flags of a video tag, plus the AVC packet for AVC video.
#[derive(Debug, Clone, Serialize)]
pub struct VideoTag<'a> {
    /// Frame type the packager wrote
    #[serde(rename = "frameType")]
    pub frame_type: FrameType,
    /// CodecID
    #[serde(rename = "codecID")]
    pub codec_id: u8,
    /// Name of the codec id
    #[serde(rename = "codecName")]
    pub codec_name: &'static str,
    /// Present when the codec is AVC
    #[serde(flatten)]
    pub avc: Option<AvcPacket<'a>>,
}

/// The AVC part of a video tag.
#[derive(Debug, Clone, Serialize)]
pub struct AvcPacket<'a> {
    /// Sequence header, NALU or end of sequence
    #[serde(rename = "avcPacketType")]
    pub packet_type: AvcPacketType,
    /// Composition time offset in milliseconds
    #[serde(rename = "CompositionTime")]
    pub composition_time: i32,
    /// NAL units of a NALU packet, when decoded
    #[serde(rename = "nalUnits", skip_serializing_if = "Option::is_none")]
    pub nal_units: Option<Vec<NalUnitInfo<'a>>>,
    /// Decoder configuration record of a sequence header
    #[serde(rename = "AVCDecoderConfigurationRecord", skip_serializing_if = "Option::is_none")]
    pub config: Option<AvcDecoderConfigurationRecord<'a>>,
    /// Payload after the 4-byte AVC header, hex preview for NALUs
    pub data: Payload<'a>,
}

/// SoundFormat, the top four bits of an audio tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundFormat(pub u8);

impl SoundFormat {
    /// Name from the FLV sound format table, or unknown.
    pub fn name(&self) -> &'static str {
        SOUND_FORMATS.get(self.0 as usize).copied().unwrap_or("unknown")
    }

    /// True for format 10.
    pub fn is_aac(&self) -> bool {
        self.0 == SOUND_FORMAT_AAC
    }
}

/// Two-bit sample rate class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundRate(pub u8);

impl SoundRate {
    /// Rate class name, 5.5 to 44 kHz.
    pub fn name(&self) -> &'static str {
        SOUND_RATES.get(self.0 as usize).copied().unwrap_or("unknown")
    }
}

/// Bits per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundSize {
    /// 8-bit samples
    Bits8,
    /// 16-bit samples
    Bits16,
}

impl SoundSize {
    /// Rendered name.
    pub fn name(&self) -> &'static str {
        match self {
            SoundSize::Bits8 => "8-bit",
            SoundSize::Bits16 => "16-bit",
        }
    }
}

/// Channel layout flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundType {
    /// Mono
    Mono,
    /// Stereo
    Stereo,
}

impl SoundType {
    /// Rendered name.
    pub fn name(&self) -> &'static str {
        match self {
            SoundType::Mono => "Mono",
            SoundType::Stereo => "Stereo",
        }
    }
}

/// AACPacketType byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AacPacketType {
    /// 0, carries an AudioSpecificConfig
    SequenceHeader,
    /// 1, one raw AAC frame
    Raw,
    /// Any other value
    Unknown(u8),
}

impl From<u8> for AacPacketType {
    fn from(value: u8) -> Self {
        match value {
            0 => AacPacketType::SequenceHeader,
            1 => AacPacketType::Raw,
            other => AacPacketType::Unknown(other),
        }
    }
}

impl AacPacketType {
    /// Rendered name.
    pub fn name(&self) -> &'static str {
        match self {
            AacPacketType::SequenceHeader => "AAC Sequence Header",
            AacPacketType::Raw => "AAC Raw",
            AacPacketType::Unknown(_) => "unknown",
        }
    }
}

/// FrameType, the top four bits of a video tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameType(pub u8);

impl FrameType {
    /// Frame type 1, a seekable frame.
    pub const KEYFRAME: FrameType = FrameType(1);

    /// Name from the frame type table, or reserved.
    pub fn name(&self) -> &'static str {
        FRAME_TYPES.get(self.0 as usize).copied().unwrap_or("reserved")
    }

    /// Whether the packager marked the frame as seekable.
    pub fn is_keyframe(&self) -> bool {
        *self == FrameType::KEYFRAME
    }
}

/// Human readable name of an FLV video codec id.
pub fn video_codec_name(codec_id: u8) -> &'static str {
    VIDEO_CODECS.get(codec_id as usize).copied().unwrap_or("unknown")
}

/// AVCPacketType byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvcPacketType {
    /// 0, carries an AVCDecoderConfigurationRecord
    SequenceHeader,
    /// 1, length-prefixed NAL units
    Nalu,
    /// 2
    EndOfSequence,
    /// Any other value
    Unknown(u8),
}

impl From<u8> for AvcPacketType {
    fn from(value: u8) -> Self {
        match value {
            0 => AvcPacketType::SequenceHeader,
            1 => AvcPacketType::Nalu,
            2 => AvcPacketType::EndOfSequence,
            other => AvcPacketType::Unknown(other),
        }
    }
}

impl AvcPacketType {
    /// Rendered name.
    pub fn name(&self) -> &'static str {
        match self {
            AvcPacketType::SequenceHeader => "AVC Sequence Header",
            AvcPacketType::Nalu => "AVC NALU",
            AvcPacketType::EndOfSequence => "AVC End-of-Sequence",
            AvcPacketType::Unknown(_) => "unknown",
        }
    }
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingLevel {
    /// Suspicious but decodable
    Warning,
}

impl FindingLevel {
    /// Rendered name.
    pub fn name(&self) -> &'static str {
        match self {
            FindingLevel::Warning => "warning",
        }
    }
}

/// A packaging inconsistency reported by a validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Severity
    pub level: FindingLevel,
    /// Name of the rule that produced it
    #[serde(rename = "rulename")]
    pub rule: &'static str,
    /// Description, with the values that triggered it
    pub message: String,
}

impl Finding {
    /// A warning from `rule`.
    pub fn warning(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: FindingLevel::Warning,
            rule,
            message: message.into(),
        }
    }
}

/// Undecoded bytes of a tag, kept only when payloads are passed through.
pub(crate) fn opaque_payload(payload: ByteSpan<'_>, pass_data_buffer: bool) -> OpaqueTag<'_> {
    OpaqueTag {
        data: pass_data_buffer.then_some(Payload::Raw(payload)),
    }
}

use serde::{Serialize, Serializer};

/// Sampling frequencies addressed by the 4-bit `samplingFrequencyIndex`.
/// Indices 13 and 14 are reserved, 15 escapes to an explicit 24-bit value.
pub const SAMPLING_FREQUENCIES: [u32; 13] = [
    96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000, 7350,
];

/// Index value signalling that an explicit 24-bit frequency follows.
pub const SAMPLING_FREQUENCY_ESCAPE: u8 = 0x0F;

/// Object type value signalling that a 6-bit extension follows.
pub const AUDIO_OBJECT_TYPE_ESCAPE: u8 = 31;

// ISO/IEC 14496-3 Table 1.17
const AUDIO_OBJECT_TYPES: [&str; 46] = [
    "NULL",
    "AAC Main",
    "AAC LC",
    "AAC SSR",
    "AAC LTP",
    "SBR",
    "AAC scalable",
    "TwinVQ",
    "CELP",
    "HVXC",
    "(reserved)",
    "(reserved)",
    "TTSI",
    "Main synthetic",
    "Wavetable synthesis",
    "General MIDI",
    "Algorithmic Synthesis and Audio FX",
    "ER AAC LC",
    "(reserved)",
    "ER AAC LTP",
    "ER AAC scalable",
    "ER TwinVQ",
    "ER BSAC",
    "ER AAC LD",
    "ER CELP",
    "ER HVXC",
    "ER HILN",
    "ER Parametric",
    "SSC",
    "PS",
    "MPEG Surround",
    "(escape)",
    "Layer-1",
    "Layer-2",
    "Layer-3",
    "DST",
    "ALS",
    "SLS",
    "SLS non-core",
    "ER AAC ELD",
    "SMR Simple",
    "SMR Main",
    "USAC (no SBR)",
    "SAOC",
    "LD MPEG Surround",
    "USAC",
];

/// Human readable name of an audio object type; unmapped values are
/// reported as reserved.
pub fn audio_object_type_name(object_type: u8) -> &'static str {
    AUDIO_OBJECT_TYPES
        .get(object_type as usize)
        .copied()
        .unwrap_or("(reserved)")
}

/// Sampling frequency as signalled by the AudioSpecificConfig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingFrequency {
    /// A known frequency, either from the index table or explicit.
    Hz(u32),
    /// Index 13 or 14.
    Reserved,
}

impl SamplingFrequency {
    /// Resolves a table index. Never fails: unmapped indices are reserved.
    pub fn from_index(index: u8) -> Self {
        SAMPLING_FREQUENCIES
            .get(index as usize)
            .map_or(SamplingFrequency::Reserved, |hz| SamplingFrequency::Hz(*hz))
    }

    /// Frequency in Hz, `None` when reserved.
    pub fn hz(&self) -> Option<u32> {
        match self {
            SamplingFrequency::Hz(hz) => Some(*hz),
            SamplingFrequency::Reserved => None,
        }
    }
}

impl Serialize for SamplingFrequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SamplingFrequency::Hz(hz) => serializer.collect_str(hz),
            SamplingFrequency::Reserved => serializer.serialize_str("reserved"),
        }
    }
}

/// The leading fields of an MPEG-4 AudioSpecificConfig.
///
/// Decoding stops after `channel_configuration`; whatever follows
/// (GASpecificConfig, SBR signalling, ...) is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSpecificConfig {
    /// Object type, 32 and up for escaped types
    pub audio_object_type: u8,
    /// ISO/IEC 14496-3 name of the object type
    pub audio_object_type_str: &'static str,
    /// Index into the sampling frequency table, 0xF for explicit
    pub sampling_frequency_index: u8,
    /// Resolved sampling frequency
    pub sampling_frequency: SamplingFrequency,
    /// Channel configuration, 0 when signalled in-band
    pub channel_configuration: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_frequency_table() {
        assert_eq!(SamplingFrequency::from_index(3).hz(), Some(48000));
        assert_eq!(SamplingFrequency::from_index(4).hz(), Some(44100));
        assert_eq!(SamplingFrequency::from_index(12).hz(), Some(7350));
        assert_eq!(SamplingFrequency::from_index(13), SamplingFrequency::Reserved);
        assert_eq!(SamplingFrequency::from_index(14), SamplingFrequency::Reserved);
    }

    #[test]
    fn test_object_type_names() {
        assert_eq!(audio_object_type_name(2), "AAC LC");
        assert_eq!(audio_object_type_name(5), "SBR");
        assert_eq!(audio_object_type_name(29), "PS");
        assert_eq!(audio_object_type_name(39), "ER AAC ELD");
        assert_eq!(audio_object_type_name(90), "(reserved)");
    }
}

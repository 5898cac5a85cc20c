use super::types::{
    audio_object_type_name, AudioSpecificConfig, SamplingFrequency, AUDIO_OBJECT_TYPE_ESCAPE,
    SAMPLING_FREQUENCY_ESCAPE,
};
use crate::utils::BitReader;
use crate::Result;

/// Decodes the object type, sampling frequency and channel configuration of
/// an AudioSpecificConfig, as carried in an FLV AAC sequence header.
///
/// Fails with [`crate::FlvError::Bounds`] when `data` ends before the
/// channel configuration.
pub fn parse_audio_specific_config(data: &[u8]) -> Result<AudioSpecificConfig> {
    let mut reader = BitReader::new(data);

    let mut audio_object_type = reader.read_bits(5)? as u8;
    if audio_object_type == AUDIO_OBJECT_TYPE_ESCAPE {
        audio_object_type = 32 + reader.read_bits(6)? as u8;
    }

    let sampling_frequency_index = reader.read_bits(4)? as u8;
    let sampling_frequency = if sampling_frequency_index == SAMPLING_FREQUENCY_ESCAPE {
        SamplingFrequency::Hz(reader.read_bits(24)?)
    } else {
        SamplingFrequency::from_index(sampling_frequency_index)
    };

    let channel_configuration = reader.read_bits(4)? as u8;

    Ok(AudioSpecificConfig {
        audio_object_type,
        audio_object_type_str: audio_object_type_name(audio_object_type),
        sampling_frequency_index,
        sampling_frequency,
        channel_configuration,
    })
}

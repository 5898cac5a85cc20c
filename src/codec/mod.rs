//! Codec configuration decoders.

pub mod aac;
pub mod h264;

pub use aac::{parse_audio_specific_config, AudioSpecificConfig};
pub use h264::{parse_avc_decoder_configuration_record, AvcDecoderConfigurationRecord, H264Parser, NalUnitInfo};

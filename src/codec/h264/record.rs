use serde::Serialize;

use crate::av::ByteSpan;
use crate::{FlvError, Result};

/// Profiles whose record carries no chroma/bit-depth extension block:
/// baseline, main and extended.
const PROFILES_WITHOUT_EXTENSION: [u8; 3] = [66, 77, 88];

/// An AVCDecoderConfigurationRecord (ISO/IEC 14496-15 5.2.4.1), as carried
/// in an FLV AVC sequence header.
///
/// Parameter sets are borrowed spans into the inspected buffer. When the
/// record is cut short, `incomplete` holds the reason and every field that
/// could not be reached keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvcDecoderConfigurationRecord<'a> {
    /// configurationVersion, 1 in practice
    #[serde(rename = "configurationVersion")]
    pub configuration_version: u8,
    /// AVCProfileIndication (profile_idc)
    #[serde(rename = "AVCProfileIndication")]
    pub profile_indication: u8,
    /// Constraint flags byte
    #[serde(rename = "profile_compatibility")]
    pub profile_compatibility: u8,
    /// AVCLevelIndication (level_idc)
    #[serde(rename = "AVCLevelIndication")]
    pub level_indication: u8,
    /// NAL length prefix width minus one, 2 bits
    #[serde(rename = "lengthSizeMinusOne")]
    pub length_size_minus_one: u8,
    /// Sequence parameter sets
    #[serde(rename = "sequenceParameterSetNALUnits")]
    pub sps: Vec<ByteSpan<'a>>,
    /// Picture parameter sets
    #[serde(rename = "pictureParameterSetNALUnits")]
    pub pps: Vec<ByteSpan<'a>>,
    /// High profile fields, absent for profiles 66, 77 and 88
    #[serde(flatten)]
    pub extension: Option<AvcRecordExtension<'a>>,
    /// Why decoding stopped early, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomplete: Option<String>,
}

/// Trailing fields present for profiles other than 66, 77 and 88.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvcRecordExtension<'a> {
    /// chroma_format_idc, 2 bits
    pub chroma_format: u8,
    /// 3 bits
    pub bit_depth_luma_minus8: u8,
    /// 3 bits
    pub bit_depth_chroma_minus8: u8,
    /// Sequence parameter set extensions
    #[serde(rename = "sequenceParameterSetExtNALUnits")]
    pub sps_ext: Vec<ByteSpan<'a>>,
}

impl AvcDecoderConfigurationRecord<'_> {
    /// Width in bytes of the NAL length prefix used by NALU tags.
    pub fn nal_length_size(&self) -> usize {
        self.length_size_minus_one as usize + 1
    }

    /// True if every field was decoded.
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_none()
    }
}

struct RecordCursor<'a> {
    data: ByteSpan<'a>,
    pos: usize,
}

impl<'a> RecordCursor<'a> {
    fn read_u8(&mut self, field: &str) -> Result<u8> {
        let value = self.data.as_bytes().get(self.pos).copied().ok_or_else(|| {
            FlvError::MalformedRecord(format!("{} missing at byte {}", field, self.pos))
        })?;
        self.pos += 1;
        Ok(value)
    }

    fn read_u16(&mut self, field: &str) -> Result<u16> {
        let hi = self.read_u8(field)?;
        let lo = self.read_u8(field)?;
        Ok(((hi as u16) << 8) | lo as u16)
    }

    /// Reads a 16-bit big-endian length and the range it announces.
    fn length_prefixed(&mut self, field: &str) -> Result<ByteSpan<'a>> {
        let len = self.read_u16(field)? as usize;
        let span = self.data.slice(self.pos, len).ok_or_else(|| {
            FlvError::MalformedRecord(format!(
                "{} of {} bytes at byte {} exceeds record of {} bytes",
                field,
                len,
                self.pos,
                self.data.len()
            ))
        })?;
        self.pos += len;
        Ok(span)
    }
}

/// Decodes an AVCDecoderConfigurationRecord.
///
/// A length that runs past the end of `data` stops decoding of the record
/// only: the fields read so far are returned and `incomplete` is set.
pub fn parse_avc_decoder_configuration_record(
    data: ByteSpan<'_>,
) -> AvcDecoderConfigurationRecord<'_> {
    let mut record = AvcDecoderConfigurationRecord::default();
    if let Err(e) = decode_into(&mut record, data) {
        log::warn!(
            "AVC decoder configuration record at offset {} is incomplete: {}",
            data.offset(),
            e
        );
        record.incomplete = Some(e.to_string());
    }
    record
}

fn decode_into<'a>(record: &mut AvcDecoderConfigurationRecord<'a>, data: ByteSpan<'a>) -> Result<()> {
    let mut cursor = RecordCursor { data, pos: 0 };

    record.configuration_version = cursor.read_u8("configurationVersion")?;
    record.profile_indication = cursor.read_u8("AVCProfileIndication")?;
    record.profile_compatibility = cursor.read_u8("profile_compatibility")?;
    record.level_indication = cursor.read_u8("AVCLevelIndication")?;
    record.length_size_minus_one = cursor.read_u8("lengthSizeMinusOne")? & 0x03;

    let num_sps = cursor.read_u8("numOfSequenceParameterSets")? & 0x1F;
    for _ in 0..num_sps {
        record.sps.push(cursor.length_prefixed("sequenceParameterSetNALUnit")?);
    }

    let num_pps = cursor.read_u8("numOfPictureParameterSets")?;
    for _ in 0..num_pps {
        record.pps.push(cursor.length_prefixed("pictureParameterSetNALUnit")?);
    }

    if !PROFILES_WITHOUT_EXTENSION.contains(&record.profile_indication) {
        let ext = record.extension.insert(AvcRecordExtension::default());
        ext.chroma_format = cursor.read_u8("chroma_format")? & 0x03;
        ext.bit_depth_luma_minus8 = cursor.read_u8("bit_depth_luma_minus8")? & 0x07;
        ext.bit_depth_chroma_minus8 = cursor.read_u8("bit_depth_chroma_minus8")? & 0x07;

        let num_sps_ext = cursor.read_u8("numOfSequenceParameterSetExt")?;
        for _ in 0..num_sps_ext {
            ext.sps_ext.push(cursor.length_prefixed("sequenceParameterSetExtNALUnit")?);
        }
    }

    log::debug!(
        "AVC record profile={} level={} nal_length_size={} sps={} pps={}",
        record.profile_indication,
        record.level_indication,
        record.nal_length_size(),
        record.sps.len(),
        record.pps.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn high_profile_record() -> Vec<u8> {
        let mut data = vec![
            0x01, // configurationVersion
            100,  // AVCProfileIndication
            0x00, // profile_compatibility
            31,   // AVCLevelIndication
            0xFF, // reserved + lengthSizeMinusOne = 3
            0xE1, // reserved + one SPS
            0x00, 0x05, 0x67, 0x64, 0x00, 0x1F, 0xAC,
            0x01, // one PPS
            0x00, 0x03, 0x68, 0xEE, 0x3C,
        ];
        data.extend_from_slice(&[
            0xFD, // chroma_format = 1
            0xF8, // bit_depth_luma_minus8 = 0
            0xFA, // bit_depth_chroma_minus8 = 2
            0x00, // no SPS extensions
        ]);
        data
    }

    #[test]
    fn test_high_profile_record() {
        let data = high_profile_record();
        let record = parse_avc_decoder_configuration_record(ByteSpan::new(&data, 20));

        assert!(record.is_complete());
        assert_eq!(record.configuration_version, 1);
        assert_eq!(record.profile_indication, 100);
        assert_eq!(record.level_indication, 31);
        assert_eq!(record.length_size_minus_one, 3);
        assert_eq!(record.nal_length_size(), 4);

        assert_eq!(record.sps.len(), 1);
        assert_eq!(record.sps[0].len(), 5);
        assert_eq!(record.sps[0].offset(), 28);
        assert_eq!(record.sps[0].as_bytes(), &[0x67, 0x64, 0x00, 0x1F, 0xAC]);

        assert_eq!(record.pps.len(), 1);
        assert_eq!(record.pps[0].len(), 3);
        assert_eq!(record.pps[0].as_bytes(), &[0x68, 0xEE, 0x3C]);

        let ext = record.extension.unwrap();
        assert_eq!(ext.chroma_format, 1);
        assert_eq!(ext.bit_depth_luma_minus8, 0);
        assert_eq!(ext.bit_depth_chroma_minus8, 2);
        assert!(ext.sps_ext.is_empty());
    }

    #[test]
    fn test_baseline_record_has_no_extension() {
        let data = [
            0x01, 66, 0xC0, 30, 0xFC, 0xE1, 0x00, 0x02, 0x67, 0x42, 0x01, 0x00, 0x01, 0x68,
        ];
        let record = parse_avc_decoder_configuration_record(ByteSpan::new(&data, 0));

        assert!(record.is_complete());
        assert_eq!(record.nal_length_size(), 1);
        assert!(record.extension.is_none());
        assert_eq!(record.pps[0].as_bytes(), &[0x68]);
    }

    #[test]
    fn test_sps_extension_uses_its_own_length() {
        let mut data = high_profile_record();
        let last = data.len() - 1;
        data[last] = 0x01;
        data.extend_from_slice(&[0x00, 0x02, 0x6D, 0x10]);

        let record = parse_avc_decoder_configuration_record(ByteSpan::new(&data, 0));
        assert!(record.is_complete());
        let ext = record.extension.unwrap();
        assert_eq!(ext.sps_ext.len(), 1);
        assert_eq!(ext.sps_ext[0].as_bytes(), &[0x6D, 0x10]);
    }

    #[test]
    fn test_overlong_pps_marks_record_incomplete() {
        let mut data = high_profile_record();
        // PPS claims 0x30 bytes
        data[15] = 0x30;
        let record = parse_avc_decoder_configuration_record(ByteSpan::new(&data, 0));

        assert!(!record.is_complete());
        assert!(record
            .incomplete
            .as_deref()
            .unwrap()
            .contains("pictureParameterSetNALUnit"));
        // Everything before the bad length survives
        assert_eq!(record.profile_indication, 100);
        assert_eq!(record.sps.len(), 1);
        assert!(record.pps.is_empty());
        assert!(record.extension.is_none());
    }

    #[test]
    fn test_truncated_header() {
        let record = parse_avc_decoder_configuration_record(ByteSpan::new(&[0x01, 0x64], 0));
        assert!(!record.is_complete());
        assert_eq!(record.profile_indication, 100);
        assert_eq!(record.level_indication, 0);
    }

    #[test]
    fn test_serialized_field_names() {
        let data = high_profile_record();
        let record = parse_avc_decoder_configuration_record(ByteSpan::new(&data, 0));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["AVCProfileIndication"], 100);
        assert_eq!(json["lengthSizeMinusOne"], 3);
        assert_eq!(json["chroma_format"], 1);
        assert_eq!(json["sequenceParameterSetNALUnits"][0]["length"], 5);
        assert_eq!(json["pictureParameterSetNALUnits"][0]["offset"], 16);
        assert!(json.get("incomplete").is_none());
    }
}

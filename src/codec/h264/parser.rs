use bytes::{BufMut, Bytes, BytesMut};

use super::types::{NALUnit, NALUnitType, NalUnitInfo, SPSInfo};
use crate::av::ByteSpan;
use crate::utils::BitReader;
use crate::{FlvError, Result};

/// NAL length field width assumed until a decoder configuration record says
/// otherwise.
pub const DEFAULT_NAL_LENGTH_SIZE: usize = 4;

const HIGH_PROFILES: [u32; 10] = [100, 110, 122, 244, 44, 83, 86, 118, 128, 138];

/// Splits and classifies the NAL units of AVC (length-prefixed) payloads.
///
/// The parser is stateful across tags: the NAL length field width comes from
/// the most recent decoder configuration record, and the last in-band SPS is
/// remembered.
#[derive(Debug)]
pub struct H264Parser {
    sps: Option<SPSInfo>,
    buffer: BytesMut,
    nal_length_size: usize,
}

impl H264Parser {
    /// Creates a parser expecting 4-byte NAL lengths.
    pub fn new() -> Self {
        Self {
            sps: None,
            buffer: BytesMut::new(),
            nal_length_size: DEFAULT_NAL_LENGTH_SIZE,
        }
    }

    /// Current width of the NAL length prefix, in bytes.
    pub fn nal_length_size(&self) -> usize {
        self.nal_length_size
    }

    /// Sets the width of the NAL length prefix, 1 to 4 bytes.
    pub fn set_nal_length_size(&mut self, size: usize) -> Result<()> {
        if !(1..=4).contains(&size) {
            return Err(FlvError::Codec(format!("invalid NAL length size {}", size)));
        }
        self.nal_length_size = size;
        Ok(())
    }

    /// Walks a length-prefixed payload and returns every NAL unit in it.
    ///
    /// With `capture_data` set each unit keeps a span over its bytes in the
    /// source buffer. Zero-length units are skipped.
    pub fn parse_length_prefixed<'a>(
        &mut self,
        data: ByteSpan<'a>,
        capture_data: bool,
    ) -> Result<Vec<NalUnitInfo<'a>>> {
        let bytes = data.as_bytes();
        let mut units = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            let prefix = bytes.get(pos..pos + self.nal_length_size).ok_or_else(|| {
                FlvError::Parser(format!("truncated NAL length prefix at {}", data.offset() + pos))
            })?;
            let len = prefix.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize);
            pos += self.nal_length_size;

            let span = data.slice(pos, len).ok_or_else(|| {
                FlvError::Parser(format!(
                    "NAL unit of {} bytes at {} exceeds payload",
                    len,
                    data.offset() + pos
                ))
            })?;
            pos += len;

            if span.is_empty() {
                continue;
            }

            let nalu = self.parse_nalu(span.as_bytes())?;
            let nal_type = NALUnitType::from(nalu.nal_type);
            let sps = match nal_type {
                NALUnitType::SPS => self.update_sps(&nalu),
                _ => None,
            };

            units.push(NalUnitInfo {
                nal_unit_type: nalu.nal_type,
                nal_type,
                nal_ref_idc: nalu.nal_ref_idc,
                size: span.len(),
                data: capture_data.then_some(span),
                sps,
            });
        }

        Ok(units)
    }

    /// Parses one NAL unit without its length prefix.
    pub fn parse_nalu(&mut self, data: &[u8]) -> Result<NALUnit> {
        if data.is_empty() {
            return Err(FlvError::Parser("empty NAL unit".into()));
        }
        let data = self.remove_emulation_prevention(data);
        Ok(NALUnit::new(Bytes::from(data)))
    }

    /// Drops the 0x03 of every `00 00 03` sequence.
    pub fn remove_emulation_prevention(&mut self, data: &[u8]) -> Vec<u8> {
        self.buffer.clear();
        let mut i = 0;

        while i < data.len() {
            if i + 2 < data.len()
                && data[i] == 0x00
                && data[i + 1] == 0x00
                && data[i + 2] == 0x03 {
                self.buffer.put_u8(0x00);
                self.buffer.put_u8(0x00);
                i += 3;
                continue;
            }
            self.buffer.put_u8(data[i]);
            i += 1;
        }

        self.buffer.to_vec()
    }

    fn update_sps(&mut self, nalu: &NALUnit) -> Option<SPSInfo> {
        match self.parse_sps(&nalu.data[1..]) {
            Ok(sps) => {
                log::debug!(
                    "SPS profile_idc={} level_idc={} {}x{}",
                    sps.profile_idc,
                    sps.level_idc,
                    sps.width,
                    sps.height
                );
                self.sps = Some(sps.clone());
                Some(sps)
            }
            Err(e) => {
                log::debug!("Could not parse SPS: {}", e);
                None
            }
        }
    }

    fn parse_sps(&self, data: &[u8]) -> Result<SPSInfo> {
        let mut reader = BitReader::new(data);

        let profile_idc = reader.read_bits(8)?;
        reader.skip_bits(8)?; // constraint flags and reserved bits
        let level_idc = reader.read_bits(8)?;

        reader.read_golomb()?; // seq_parameter_set_id

        let mut frame_crop_chroma = (2, 2);
        if HIGH_PROFILES.contains(&profile_idc) {
            let chroma_format_idc = reader.read_golomb()?;
            let mut separate_colour_plane = false;
            if chroma_format_idc == 3 {
                separate_colour_plane = reader.read_bit()?;
            }
            frame_crop_chroma = match (chroma_format_idc, separate_colour_plane) {
                (0, _) | (3, true) => (1, 1),
                (1, _) => (2, 2),
                (2, _) => (2, 1),
                _ => (1, 1),
            };
            reader.read_golomb()?; // bit_depth_luma_minus8
            reader.read_golomb()?; // bit_depth_chroma_minus8
            reader.skip_bits(1)?; // qpprime_y_zero_transform_bypass_flag

            if reader.read_bit()? {
                let count = if chroma_format_idc != 3 { 8 } else { 12 };
                for i in 0..count {
                    if reader.read_bit()? {
                        let size = if i < 6 { 16 } else { 64 };
                        self.skip_scaling_list(&mut reader, size)?;
                    }
                }
            }
        }

        reader.read_golomb()?; // log2_max_frame_num_minus4
        let pic_order_cnt_type = reader.read_golomb()?;

        if pic_order_cnt_type == 0 {
            reader.read_golomb()?; // log2_max_pic_order_cnt_lsb_minus4
        } else if pic_order_cnt_type == 1 {
            reader.skip_bits(1)?; // delta_pic_order_always_zero_flag
            reader.read_signed_golomb()?; // offset_for_non_ref_pic
            reader.read_signed_golomb()?; // offset_for_top_to_bottom_field
            let num_ref_frames_in_pic_order_cnt_cycle = reader.read_golomb()?;
            for _ in 0..num_ref_frames_in_pic_order_cnt_cycle {
                reader.read_signed_golomb()?;
            }
        }

        reader.read_golomb()?; // max_num_ref_frames
        reader.skip_bits(1)?; // gaps_in_frame_num_value_allowed_flag

        let pic_width_in_mbs = reader.read_golomb()? as u64 + 1;
        let pic_height_in_map_units = reader.read_golomb()? as u64 + 1;
        let frame_mbs_only_flag = reader.read_bits(1)? as u64;
        if frame_mbs_only_flag == 0 {
            reader.skip_bits(1)?; // mb_adaptive_frame_field_flag
        }
        reader.skip_bits(1)?; // direct_8x8_inference_flag

        let mut width = pic_width_in_mbs * 16;
        let mut height = (2 - frame_mbs_only_flag) * pic_height_in_map_units * 16;

        if reader.read_bit()? {
            let crop_left = reader.read_golomb()? as u64;
            let crop_right = reader.read_golomb()? as u64;
            let crop_top = reader.read_golomb()? as u64;
            let crop_bottom = reader.read_golomb()? as u64;
            let (crop_x, crop_y) = frame_crop_chroma;
            let crop_y = crop_y * (2 - frame_mbs_only_flag);
            width = width.saturating_sub((crop_left + crop_right) * crop_x);
            height = height.saturating_sub((crop_top + crop_bottom) * crop_y);
        }

        Ok(SPSInfo {
            profile_idc: profile_idc as u8,
            level_idc: level_idc as u8,
            width: width as u32,
            height: height as u32,
        })
    }

    fn skip_scaling_list(&self, reader: &mut BitReader, size: usize) -> Result<()> {
        let mut last_scale: i64 = 8;
        let mut next_scale: i64 = 8;

        for _ in 0..size {
            if next_scale != 0 {
                let delta_scale = reader.read_signed_golomb()? as i64;
                next_scale = (last_scale + delta_scale).rem_euclid(256);
            }
            last_scale = if next_scale == 0 { last_scale } else { next_scale };
        }

        Ok(())
    }

    /// Picture size from the last SPS that parsed.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.sps.as_ref().map(|sps| (sps.width, sps.height))
    }
}

impl Default for H264Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod parser_test;

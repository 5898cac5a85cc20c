use super::{ValidationRule, DURATION_TOLERANCE};
use crate::format::flv::{AacPacketType, AvcPacketType, FlvTag, TagKind};

/// Samples carried by one AAC raw packet. 960-sample framing is not
/// detected.
const AAC_SAMPLES_PER_PACKET: f64 = 1024.0;

/// Packager keyframe flag against the NAL unit classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdrIntegrity;

impl ValidationRule for IdrIntegrity {
    fn name(&self) -> &'static str {
        "CheckIDRIntegrity"
    }

    fn check(&self, tags: &mut [FlvTag<'_>]) {
        for tag in tags.iter_mut() {
            let Some(video) = tag.video() else { continue };
            let Some(units) = video.avc.as_ref().and_then(|avc| avc.nal_units.as_ref()) else {
                continue;
            };
            if units.is_empty() {
                continue;
            }

            let packager_idr = video.frame_type.is_keyframe();
            let essence_idr = units.iter().any(|unit| unit.is_idr());

            if packager_idr != essence_idr {
                log::warn!(
                    "IDR mismatch at offset {} (ts {}): packager {}, essence {}",
                    tag.byte_offset,
                    tag.timestamp,
                    packager_idr,
                    essence_idr
                );
                let finding = self.warning(format!(
                    "IDR flag inconsistency. Packager IDR: {}, essence IDR: {}",
                    packager_idr, essence_idr
                ));
                tag.add_finding(finding);
            }
        }
    }
}

/// Timestamp spacing of AAC raw packets against the duration implied by
/// the sampling frequency.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioDurationIntegrity;

impl ValidationRule for AudioDurationIntegrity {
    fn name(&self) -> &'static str {
        "CheckAudioPacketDurationIntegrity"
    }

    fn check(&self, tags: &mut [FlvTag<'_>]) {
        let mut estimate_ms: Option<f64> = None;
        let mut last_raw: Option<usize> = None;

        for i in 0..tags.len() {
            let Some(aac) = tags[i].aac() else { continue };

            if let Some(config) = &aac.config {
                estimate_ms = config
                    .sampling_frequency
                    .hz()
                    .filter(|hz| *hz > 0)
                    .map(|hz| AAC_SAMPLES_PER_PACKET * 1000.0 / hz as f64);
            }

            if aac.packet_type != AacPacketType::Raw {
                continue;
            }

            if let (Some(prev), Some(estimate)) = (last_raw, estimate_ms) {
                let actual = tags[i].timestamp as i64 - tags[prev].timestamp as i64;
                if (estimate - actual as f64).abs() > estimate * DURATION_TOLERANCE {
                    log::warn!(
                        "Audio packet at offset {} lasts {}ms, expected {}ms",
                        tags[prev].byte_offset,
                        actual,
                        estimate
                    );
                    let finding = self.warning(format!(
                        "Duration of the audio packet by timestamps is 5%+ different than the one it should be based on essence data. Timestamp dur: {}ms, essence dur: {}ms",
                        actual, estimate
                    ));
                    tags[prev].add_finding(finding);
                }
            }
            last_raw = Some(i);
        }
    }
}

/// Spacing of consecutive AVC NALU tags against the median spacing.
///
/// Also records each spacing on the earlier tag as its estimated duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoDurationIntegrity;

impl ValidationRule for VideoDurationIntegrity {
    fn name(&self) -> &'static str {
        "CheckVideoPacketDurationIntegrity"
    }

    fn check(&self, tags: &mut [FlvTag<'_>]) {
        let frames: Vec<usize> = tags
            .iter()
            .enumerate()
            .filter(|(_, tag)| is_avc_nalu(tag))
            .map(|(i, _)| i)
            .collect();

        let mut durations = Vec::with_capacity(frames.len());
        for pair in frames.windows(2) {
            let duration = tags[pair[1]].timestamp as i64 - tags[pair[0]].timestamp as i64;
            tags[pair[0]].estimated_duration_ms = Some(duration);
            durations.push(duration);
        }

        let Some(median) = median(&mut durations) else {
            return;
        };

        for &i in &frames {
            let Some(duration) = tags[i].estimated_duration_ms else { continue };
            if (median - duration as f64).abs() > median * DURATION_TOLERANCE {
                log::warn!(
                    "Video frame at offset {} lasts {}ms, median {}ms",
                    tags[i].byte_offset,
                    duration,
                    median
                );
                let finding = self.warning(format!(
                    "Duration of the video frame by timestamps is 5%+ different than the median. Timestamp dur: {}ms, median dur: {}ms",
                    duration, median
                ));
                tags[i].add_finding(finding);
            }
        }
    }
}

fn is_avc_nalu(tag: &FlvTag<'_>) -> bool {
    tag.tag_type == TagKind::Video
        && tag
            .avc()
            .is_some_and(|avc| avc.packet_type == AvcPacketType::Nalu)
}

/// Median of `values`, averaging the two middle values of an even count.
/// Sorts `values` in place.
pub(crate) fn median(values: &mut [i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid] as f64)
    } else {
        Some((values[mid - 1] as f64 + values[mid] as f64) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::av::{ByteSpan, Payload};
    use crate::codec::aac::{AudioSpecificConfig, SamplingFrequency};
    use crate::codec::h264::{NALUnitType, NalUnitInfo};
    use crate::format::flv::*;
    use crate::validate::run_validation_rules;
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    fn tag(timestamp: u32, body: TagBody<'static>) -> FlvTag<'static> {
        FlvTag {
            tag_type: match body {
                TagBody::Audio(_) => TagKind::Audio,
                TagBody::Video(_) => TagKind::Video,
                TagBody::Script(_) => TagKind::Metadata,
                TagBody::Unrecognized(_) => TagKind::Unrecognized(0),
            },
            data_size: 0,
            timestamp,
            stream_id: 0,
            byte_offset: timestamp as usize,
            body,
            estimated_duration_ms: None,
            validations: Vec::new(),
        }
    }

    fn aac(timestamp: u32, packet_type: AacPacketType, hz: Option<u32>) -> FlvTag<'static> {
        let config = hz.map(|hz| AudioSpecificConfig {
            audio_object_type: 2,
            audio_object_type_str: "AAC LC",
            sampling_frequency_index: 0,
            sampling_frequency: SamplingFrequency::Hz(hz),
            channel_configuration: 2,
        });
        tag(
            timestamp,
            TagBody::Audio(AudioTag {
                sound_format: SoundFormat(SOUND_FORMAT_AAC),
                sound_rate: SoundRate(3),
                sound_size: SoundSize::Bits16,
                sound_type: SoundType::Stereo,
                aac: Some(AacPacket {
                    packet_type,
                    config,
                    data: Payload::Hex(String::new()),
                }),
            }),
        )
    }

    fn unit(nal_unit_type: u8) -> NalUnitInfo<'static> {
        NalUnitInfo {
            nal_unit_type,
            nal_type: NALUnitType::from(nal_unit_type),
            nal_ref_idc: 3,
            size: 4,
            data: None,
            sps: None,
        }
    }

    fn video(
        timestamp: u32,
        frame_type: FrameType,
        packet_type: AvcPacketType,
        nal_units: Option<Vec<NalUnitInfo<'static>>>,
    ) -> FlvTag<'static> {
        tag(
            timestamp,
            TagBody::Video(VideoTag {
                frame_type,
                codec_id: VIDEO_CODEC_AVC,
                codec_name: "AVC",
                avc: Some(AvcPacket {
                    packet_type,
                    composition_time: 0,
                    nal_units,
                    config: None,
                    data: Payload::Raw(ByteSpan::new(&[], 0)),
                }),
            }),
        )
    }

    fn frame(timestamp: u32) -> FlvTag<'static> {
        video(timestamp, FrameType(2), AvcPacketType::Nalu, Some(vec![unit(1)]))
    }

    fn rules_of(tag: &FlvTag<'_>) -> Vec<&'static str> {
        tag.validations.iter().map(|f| f.rule).collect()
    }

    #[test]
    fn test_idr_mismatch() {
        let mut tags = vec![video(
            0,
            FrameType::KEYFRAME,
            AvcPacketType::Nalu,
            Some(vec![unit(9), unit(1)]),
        )];
        IdrIntegrity.check(&mut tags);

        assert_eq!(tags[0].validations.len(), 1);
        let finding = &tags[0].validations[0];
        assert_eq!(finding.level, FindingLevel::Warning);
        assert_eq!(finding.rule, "CheckIDRIntegrity");
        assert_eq!(
            finding.message,
            "IDR flag inconsistency. Packager IDR: true, essence IDR: false"
        );
    }

    #[test]
    fn test_idr_agreement() {
        let mut tags = vec![
            video(0, FrameType::KEYFRAME, AvcPacketType::Nalu, Some(vec![unit(7), unit(5)])),
            video(40, FrameType(2), AvcPacketType::Nalu, Some(vec![unit(1)])),
        ];
        IdrIntegrity.check(&mut tags);
        assert!(tags.iter().all(|t| t.validations.is_empty()));
    }

    #[test]
    fn test_idr_missing_keyframe_flag() {
        let mut tags = vec![video(0, FrameType(2), AvcPacketType::Nalu, Some(vec![unit(5)]))];
        IdrIntegrity.check(&mut tags);
        assert_eq!(
            tags[0].validations[0].message,
            "IDR flag inconsistency. Packager IDR: false, essence IDR: true"
        );
    }

    #[test]
    fn test_idr_skips_undecoded_and_empty() {
        let mut tags = vec![
            video(0, FrameType::KEYFRAME, AvcPacketType::Nalu, None),
            video(40, FrameType::KEYFRAME, AvcPacketType::Nalu, Some(Vec::new())),
        ];
        IdrIntegrity.check(&mut tags);
        assert!(tags.iter().all(|t| t.validations.is_empty()));
    }

    #[test]
    fn test_audio_drift_flags_previous_packet() {
        let mut tags = vec![
            aac(0, AacPacketType::SequenceHeader, Some(44100)),
            aac(0, AacPacketType::Raw, None),
            aac(30, AacPacketType::Raw, None),
        ];
        AudioDurationIntegrity.check(&mut tags);

        assert!(tags[0].validations.is_empty());
        assert_eq!(rules_of(&tags[1]), vec!["CheckAudioPacketDurationIntegrity"]);
        assert!(tags[2].validations.is_empty());
        assert!(tags[1].validations[0]
            .message
            .contains("Timestamp dur: 30ms, essence dur: 23.2199"));
    }

    #[test]
    fn test_audio_within_tolerance() {
        let mut tags = vec![
            aac(0, AacPacketType::SequenceHeader, Some(44100)),
            aac(0, AacPacketType::Raw, None),
            aac(24, AacPacketType::Raw, None),
            aac(47, AacPacketType::Raw, None),
        ];
        AudioDurationIntegrity.check(&mut tags);
        assert!(tags.iter().all(|t| t.validations.is_empty()));
    }

    #[test]
    fn test_audio_without_config_is_skipped() {
        let mut tags = vec![
            aac(0, AacPacketType::Raw, None),
            aac(500, AacPacketType::Raw, None),
        ];
        AudioDurationIntegrity.check(&mut tags);
        assert!(tags.iter().all(|t| t.validations.is_empty()));
    }

    #[test]
    fn test_audio_latest_config_wins() {
        let mut tags = vec![
            aac(0, AacPacketType::SequenceHeader, Some(44100)),
            aac(0, AacPacketType::Raw, None),
            aac(0, AacPacketType::SequenceHeader, Some(48000)),
            // 21.33 ms expected at 48 kHz
            aac(21, AacPacketType::Raw, None),
        ];
        AudioDurationIntegrity.check(&mut tags);
        assert!(tags.iter().all(|t| t.validations.is_empty()));
    }

    #[test]
    fn test_audio_ignores_other_tags_between_packets() {
        let mut tags = vec![
            aac(0, AacPacketType::SequenceHeader, Some(48000)),
            aac(0, AacPacketType::Raw, None),
            frame(10),
            aac(64, AacPacketType::Raw, None),
        ];
        AudioDurationIntegrity.check(&mut tags);
        assert_eq!(tags[1].validations.len(), 1);
        assert!(tags[3].validations.is_empty());
    }

    #[test]
    fn test_video_outlier() {
        let mut tags: Vec<FlvTag> = [0, 33, 66, 99, 132, 232].iter().map(|ts| frame(*ts)).collect();
        VideoDurationIntegrity.check(&mut tags);

        let durations: Vec<Option<i64>> = tags.iter().map(|t| t.estimated_duration_ms).collect();
        assert_eq!(
            durations,
            vec![Some(33), Some(33), Some(33), Some(33), Some(100), None]
        );

        let flagged: Vec<usize> = tags
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.validations.is_empty())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(flagged, vec![4]);
        assert_eq!(
            tags[4].validations[0].message,
            "Duration of the video frame by timestamps is 5%+ different than the median. Timestamp dur: 100ms, median dur: 33ms"
        );
    }

    #[test]
    fn test_video_skips_sequence_headers_and_audio() {
        let mut tags = vec![
            video(0, FrameType::KEYFRAME, AvcPacketType::SequenceHeader, None),
            frame(0),
            aac(10, AacPacketType::Raw, None),
            frame(40),
            video(80, FrameType(2), AvcPacketType::EndOfSequence, None),
        ];
        VideoDurationIntegrity.check(&mut tags);

        assert_eq!(tags[0].estimated_duration_ms, None);
        assert_eq!(tags[1].estimated_duration_ms, Some(40));
        assert_eq!(tags[3].estimated_duration_ms, None);
        assert!(tags.iter().all(|t| t.validations.is_empty()));
    }

    #[test]
    fn test_video_single_frame() {
        let mut tags = vec![frame(0)];
        VideoDurationIntegrity.check(&mut tags);
        assert_eq!(tags[0].estimated_duration_ms, None);
        assert!(tags[0].validations.is_empty());
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&mut []), None);
        assert_eq!(median(&mut [40]), Some(40.0));
        assert_eq!(median(&mut [100, 33, 33]), Some(33.0));
        assert_eq!(median(&mut [40, 33, 33, 50]), Some(36.5));
    }

    #[quickcheck]
    fn prop_median_is_bounded(values: Vec<i32>) -> bool {
        let mut values: Vec<i64> = values.into_iter().map(i64::from).collect();
        match median(&mut values) {
            None => values.is_empty(),
            Some(m) => {
                let min = *values.iter().min().unwrap() as f64;
                let max = *values.iter().max().unwrap() as f64;
                min <= m && m <= max
            }
        }
    }

    #[test]
    fn test_findings_follow_rule_order() {
        let mut tags = vec![
            video(0, FrameType::KEYFRAME, AvcPacketType::Nalu, Some(vec![unit(5)])),
            video(33, FrameType(2), AvcPacketType::Nalu, Some(vec![unit(1)])),
            video(66, FrameType::KEYFRAME, AvcPacketType::Nalu, Some(vec![unit(1)])),
            video(200, FrameType(2), AvcPacketType::Nalu, Some(vec![unit(1)])),
            video(233, FrameType(2), AvcPacketType::Nalu, Some(vec![unit(1)])),
        ];
        run_validation_rules(&mut tags);

        assert_eq!(
            rules_of(&tags[2]),
            vec!["CheckIDRIntegrity", "CheckVideoPacketDurationIntegrity"]
        );
        assert!(tags[0].validations.is_empty());
        assert!(tags[1].validations.is_empty());
    }
}

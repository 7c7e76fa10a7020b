// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Audio endpoint behavior.
//!
//! ## Accepted input
//! - Major type `MEDIATYPE_Audio`, not temporally compressed
//! - Format type `FORMAT_WaveFormatEx` with a readable format block
//! - Subtype IEEE float or PCM
//! - Wave format tag PCM, IEEE float or extensible
//!
//! ## Advertised formats
//! IEEE float first, then PCM. Neither carries a format block; the source
//! fills in rate and layout.

use capture_format::{
    FORMAT_WAVE_FORMAT_EX, Guid, MEDIASUBTYPE_IEEE_FLOAT, MEDIASUBTYPE_PCM, MEDIATYPE_AUDIO,
    MediaType, WaveFormatEx, WaveFormatTag,
    time::{media_time_to_milliseconds, media_time_to_seconds, milliseconds_to_media_time},
};
use tracing::{debug, warn};

use crate::{
    AudioConfig, IngestError, RejectReason,
    ingest::SampleTimes,
    kind::{MediaKind, copy_payload},
};

/// Input subtypes in order of preference.
const INPUT_SUBTYPES: [Guid; 2] = [MEDIASUBTYPE_IEEE_FLOAT, MEDIASUBTYPE_PCM];

/// Marker for the audio media kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Audio;

/// One block of audio handed to the consumer.
///
/// `timestamp` and `duration` are in milliseconds. Both are truncated from
/// 100 ns media units.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AudioBuffer {
    config: AudioConfig,
    timestamp: i64,
    duration: i64,
    data: Vec<u8>,
}

impl AudioBuffer {
    /// Format of the samples in [`buffer`](Self::buffer).
    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Zero when the source supplied no stop time.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    pub fn buffer(&self) -> &[u8] {
        &self.data
    }

    pub fn buffer_length(&self) -> usize {
        self.data.len()
    }
}

impl MediaKind for Audio {
    type Config = AudioConfig;
    type Buffer = AudioBuffer;

    const CHANNEL_NAME: &'static str = "AudioSink";
    const MAJOR_TYPE: Guid = MEDIATYPE_AUDIO;

    fn check_media_type(media_type: &MediaType) -> Result<AudioConfig, RejectReason> {
        if media_type.major_type != Some(MEDIATYPE_AUDIO) {
            return Err(RejectReason::WrongMajorType {
                expected: "MEDIATYPE_Audio",
            });
        }
        if media_type.temporal_compression {
            return Err(RejectReason::TemporallyCompressed);
        }
        let (Some(subtype), Some(format_type)) = (media_type.subtype, media_type.format_type)
        else {
            return Err(RejectReason::MissingSubtypeOrFormatType);
        };
        if format_type != FORMAT_WAVE_FORMAT_EX {
            return Err(RejectReason::UnsupportedFormatType(format_type));
        }
        if !INPUT_SUBTYPES.contains(&subtype) {
            return Err(RejectReason::UnsupportedSubtype(subtype));
        }
        if media_type.format.is_empty() {
            return Err(RejectReason::MissingFormatBlock);
        }

        let format = WaveFormatEx::parse(&media_type.format)?;
        match format.format_tag {
            WaveFormatTag::PCM | WaveFormatTag::IEEE_FLOAT | WaveFormatTag::EXTENSIBLE => {
                Ok(AudioConfig::from_wave_format(&format))
            }
            other => Err(RejectReason::UnsupportedFormatTag(other)),
        }
    }

    fn media_type(index: usize, _requested: &AudioConfig) -> Option<MediaType> {
        INPUT_SUBTYPES.get(index).map(|subtype| {
            MediaType::new(MEDIATYPE_AUDIO)
                .with_subtype(*subtype)
                .with_format_type(FORMAT_WAVE_FORMAT_EX)
        })
    }

    fn fill_buffer(
        buffer: &mut AudioBuffer,
        actual: &AudioConfig,
        times: SampleTimes,
        payload: &[u8],
    ) -> Result<(), IngestError> {
        let timestamp = media_time_to_milliseconds(times.start);
        let duration = match times.end {
            Some(end) => media_time_to_milliseconds(end) - timestamp,
            None => {
                warn!("audio sample has no stop time, duration set to 0");
                0
            }
        };

        copy_payload(&mut buffer.data, payload)?;
        buffer.config = *actual;
        buffer.timestamp = timestamp;
        buffer.duration = duration;
        Ok(())
    }

    fn log_buffer(buffer: &AudioBuffer) {
        debug!(
            "audio buffer: {} timestamp={}ms ({:.3}s) duration={}ms ({:.3}s) size={}",
            buffer.config,
            buffer.timestamp,
            media_time_to_seconds(milliseconds_to_media_time(buffer.timestamp)),
            buffer.duration,
            media_time_to_seconds(milliseconds_to_media_time(buffer.duration)),
            buffer.data.len()
        );
    }
}

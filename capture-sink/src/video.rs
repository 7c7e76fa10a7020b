// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Video endpoint behavior.
//!
//! Only uncompressed planar 4:2:0 (I420) frames are accepted. Both the
//! `VIDEOINFOHEADER` and `VIDEOINFOHEADER2` format blocks are understood.
//! Exactly one format is advertised: I420 at the requested frame size.

use std::fmt;

use capture_format::{
    FORMAT_VIDEO_INFO, FORMAT_VIDEO_INFO2, FourCc, Guid, MEDIASUBTYPE_I420, MEDIATYPE_VIDEO,
    MediaType, VideoInfoHeader, VideoInfoHeader2,
    time::{media_time_to_milliseconds, media_time_to_seconds, milliseconds_to_media_time},
    video_info::BitmapInfoHeader,
};
use tracing::{debug, info};

use crate::{
    IngestError, RejectReason, VideoConfig,
    ingest::SampleTimes,
    kind::{MediaKind, copy_payload},
};

/// Marker for the video media kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Video;

/// Pixel layout of a [`VideoFrame`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Planar Y, then U, then V; chroma subsampled 2x2.
    #[default]
    I420,
}

impl PixelFormat {
    pub fn fourcc(self) -> FourCc {
        match self {
            PixelFormat::I420 => FourCc::I420,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fourcc())
    }
}

/// One frame handed to the consumer. `timestamp` is in milliseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoFrame {
    width: u32,
    height: u32,
    format: PixelFormat,
    timestamp: i64,
    data: Vec<u8>,
}

impl VideoFrame {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn buffer(&self) -> &[u8] {
        &self.data
    }

    pub fn buffer_length(&self) -> usize {
        self.data.len()
    }
}

fn bitmap_header(format_type: Guid, block: &[u8]) -> Result<BitmapInfoHeader, RejectReason> {
    if format_type == FORMAT_VIDEO_INFO {
        Ok(VideoInfoHeader::parse(block)?.bmi)
    } else {
        Ok(VideoInfoHeader2::parse(block)?.bmi)
    }
}

impl MediaKind for Video {
    type Config = VideoConfig;
    type Buffer = VideoFrame;

    const CHANNEL_NAME: &'static str = "VideoSink";
    const MAJOR_TYPE: Guid = MEDIATYPE_VIDEO;

    fn check_media_type(media_type: &MediaType) -> Result<VideoConfig, RejectReason> {
        if media_type.major_type != Some(MEDIATYPE_VIDEO) {
            return Err(RejectReason::WrongMajorType {
                expected: "MEDIATYPE_Video",
            });
        }
        let (Some(subtype), Some(format_type)) = (media_type.subtype, media_type.format_type)
        else {
            return Err(RejectReason::MissingSubtypeOrFormatType);
        };
        if format_type != FORMAT_VIDEO_INFO && format_type != FORMAT_VIDEO_INFO2 {
            return Err(RejectReason::UnsupportedFormatType(format_type));
        }
        if media_type.format.is_empty() {
            return Err(RejectReason::MissingFormatBlock);
        }
        if subtype != MEDIASUBTYPE_I420 {
            return Err(RejectReason::UnsupportedSubtype(subtype));
        }

        let bmi = bitmap_header(format_type, &media_type.format)?;
        if bmi.compression != FourCc::I420 {
            return Err(RejectReason::FourCcMismatch {
                expected: FourCc::I420,
                actual: bmi.compression,
            });
        }

        // Width is positive after parsing; a negative height marks a top-down
        // frame and only its magnitude is kept.
        Ok(VideoConfig::new(
            bmi.width.unsigned_abs(),
            bmi.height.unsigned_abs(),
        ))
    }

    fn media_type(index: usize, requested: &VideoConfig) -> Option<MediaType> {
        if index > 0 {
            return None;
        }

        let width = i32::try_from(requested.width).unwrap_or(i32::MAX);
        let height = i32::try_from(requested.height).unwrap_or(i32::MAX);
        let info = VideoInfoHeader {
            bmi: BitmapInfoHeader::i420(width, height),
            ..Default::default()
        };
        info!(
            "advertising video format {}: {}x{} {} ({} bytes)",
            index, width, height, info.bmi.compression, info.bmi.size_image
        );

        Some(
            MediaType::new(MEDIATYPE_VIDEO)
                .with_subtype(MEDIASUBTYPE_I420)
                .with_temporal_compression(false)
                .with_sample_size(info.bmi.size_image)
                .with_format(FORMAT_VIDEO_INFO, info.to_bytes()),
        )
    }

    fn fill_buffer(
        buffer: &mut VideoFrame,
        actual: &VideoConfig,
        times: SampleTimes,
        payload: &[u8],
    ) -> Result<(), IngestError> {
        copy_payload(&mut buffer.data, payload)?;
        buffer.width = actual.width;
        buffer.height = actual.height;
        buffer.format = PixelFormat::I420;
        buffer.timestamp = media_time_to_milliseconds(times.start);
        Ok(())
    }

    fn log_buffer(frame: &VideoFrame) {
        debug!(
            "video frame: {}x{} {} timestamp={}ms ({:.3}s) size={}",
            frame.width,
            frame.height,
            frame.format,
            frame.timestamp,
            media_time_to_seconds(milliseconds_to_media_time(frame.timestamp)),
            frame.data.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i420_proposal(width: i32, height: i32) -> MediaType {
        let info = VideoInfoHeader {
            bmi: BitmapInfoHeader::i420(width, height),
            ..Default::default()
        };
        MediaType::new(MEDIATYPE_VIDEO)
            .with_subtype(MEDIASUBTYPE_I420)
            .with_format(FORMAT_VIDEO_INFO, info.to_bytes())
    }

    #[test]
    fn advertised_format_is_accepted_back() {
        let requested = VideoConfig::new(640, 480);
        let advertised = Video::media_type(0, &requested).unwrap();
        assert_eq!(Video::check_media_type(&advertised), Ok(requested));
    }

    #[test]
    fn compression_must_match_subtype() {
        let mut info = VideoInfoHeader {
            bmi: BitmapInfoHeader::i420(320, 240),
            ..Default::default()
        };
        info.bmi.compression = FourCc::from_bytes(*b"YUY2");
        let media_type = MediaType::new(MEDIATYPE_VIDEO)
            .with_subtype(MEDIASUBTYPE_I420)
            .with_format(FORMAT_VIDEO_INFO, info.to_bytes());
        assert_eq!(
            Video::check_media_type(&media_type),
            Err(RejectReason::FourCcMismatch {
                expected: FourCc::I420,
                actual: FourCc::from_bytes(*b"YUY2"),
            })
        );
    }

    #[test]
    fn subtype_is_checked_before_the_block_is_parsed() {
        let yuy2 = FourCc::from_bytes(*b"YUY2").subtype();
        let media_type = MediaType::new(MEDIATYPE_VIDEO)
            .with_subtype(yuy2)
            .with_format(FORMAT_VIDEO_INFO, vec![0; 12]);
        let reason = Video::check_media_type(&media_type).unwrap_err();
        assert_eq!(reason, RejectReason::UnsupportedSubtype(yuy2));
        assert!(!reason.is_malformed());
    }

    #[test]
    fn temporal_compression_flag_is_not_checked() {
        let media_type = i420_proposal(16, 16).with_temporal_compression(true);
        assert!(Video::check_media_type(&media_type).is_ok());
    }

    #[test]
    fn frame_ignores_end_time() {
        let mut frame = VideoFrame::default();
        let config = VideoConfig::new(2, 2);
        Video::fill_buffer(&mut frame, &config, SampleTimes::new(333_333, 666_666), &[0; 6])
            .unwrap();
        assert_eq!(frame.timestamp(), 33);
        assert_eq!(frame.format(), PixelFormat::I420);
        assert_eq!((frame.width(), frame.height()), (2, 2));
    }
}

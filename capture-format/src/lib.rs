// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! # capture-format
//!
//! Typed access to the records a push-driven capture source hands to a sink
//! while negotiating a connection.
//!
//! ## Overview
//!
//! A capture source describes each proposed format with a [`MediaType`]: a
//! major type, a subtype and a format type (all GUIDs), plus an opaque format
//! block whose layout is selected by the format type. This crate provides:
//!
//! - The well-known GUIDs ([`guid`]) and [`FourCc`] codes
//! - Decoding and encoding of `WAVEFORMATEX`/`WAVEFORMATEXTENSIBLE` ([`wave`])
//! - Decoding and encoding of `VIDEOINFOHEADER`/`VIDEOINFOHEADER2` ([`video_info`])
//! - Reference time (100 ns tick) conversion ([`time`])
//!
//! ```text
//! MediaType
//!   ├─ major_type   MEDIATYPE_Audio | MEDIATYPE_Video
//!   ├─ subtype      MEDIASUBTYPE_PCM | MEDIASUBTYPE_IEEE_FLOAT | MEDIASUBTYPE_I420
//!   ├─ format_type  FORMAT_WaveFormatEx | FORMAT_VideoInfo | FORMAT_VideoInfo2
//!   └─ format       WaveFormatEx | VideoInfoHeader | VideoInfoHeader2 (bytes)
//! ```
//!
//! The crate only decodes; deciding which formats are acceptable is the
//! sink's job.

mod error;
mod fourcc;
mod le;
mod media_type;

pub mod guid;
pub mod time;
pub mod video_info;
pub mod wave;

pub use error::{FormatError, Result};
pub use fourcc::FourCc;
pub use guid::{
    FORMAT_VIDEO_INFO, FORMAT_VIDEO_INFO2, FORMAT_WAVE_FORMAT_EX, Guid, MEDIASUBTYPE_I420,
    MEDIASUBTYPE_IEEE_FLOAT, MEDIASUBTYPE_PCM, MEDIATYPE_AUDIO, MEDIATYPE_VIDEO,
};
pub use media_type::MediaType;
pub use time::ReferenceTime;
pub use video_info::{BitmapInfoHeader, Rect, VideoInfoHeader, VideoInfoHeader2};
pub use wave::{WaveFormatEx, WaveFormatExtensible, WaveFormatTag};

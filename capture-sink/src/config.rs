// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Canonical format descriptors.
//!
//! The same descriptor type serves as both the *requested* configuration (what
//! the downstream consumer would like the source to produce) and the *actual*
//! configuration (what the source connected with). The `Default` value is the
//! empty descriptor: nothing negotiated.
//!
//! Descriptors serialize with serde so that a requested configuration can be
//! read from a JSON document:
//!
//! ```
//! use capture_sink::VideoConfig;
//!
//! let requested = VideoConfig::from_json_str(r#"{ "width": 1280, "height": 720 }"#).unwrap();
//! assert_eq!(requested, VideoConfig::new(1280, 720));
//! ```

use std::fmt;

use capture_format::{WaveFormatEx, WaveFormatTag};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::Result;

fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Audio format descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// PCM, IEEE float or extensible; [`WaveFormatTag::UNKNOWN`] when empty.
    pub format_tag: WaveFormatTag,
    pub channels: u16,
    pub sample_rate: u32,
    pub bytes_per_second: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// Only populated for extensible formats.
    pub valid_bits_per_sample: u16,
    /// Only populated for extensible formats.
    pub channel_mask: u32,
}

impl AudioConfig {
    /// Builds the descriptor for an accepted wave format record.
    ///
    /// The extensible-only fields are copied only when the tag is extensible;
    /// otherwise they stay zero.
    pub fn from_wave_format(format: &WaveFormatEx) -> Self {
        let mut config = AudioConfig {
            format_tag: format.format_tag,
            channels: format.channels,
            sample_rate: format.samples_per_sec,
            bytes_per_second: format.avg_bytes_per_sec,
            block_align: format.block_align,
            bits_per_sample: format.bits_per_sample,
            ..Default::default()
        };
        if format.format_tag.is_extensible() {
            if let Some(ext) = format.extensible {
                config.valid_bits_per_sample = ext.valid_bits_per_sample;
                config.channel_mask = ext.channel_mask;
            }
        }
        config
    }

    /// Returns `true` for the empty descriptor.
    pub fn is_empty(&self) -> bool {
        *self == AudioConfig::default()
    }

    /// Parses a descriptor from JSON. Missing fields take their empty value.
    pub fn from_json_str(json: &str) -> Result<Self> {
        from_json(json)
    }
}

impl fmt::Display for AudioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "format_tag={} channels={} sample_rate={} bytes_per_second={} block_align={} bits_per_sample={}",
            self.format_tag,
            self.channels,
            self.sample_rate,
            self.bytes_per_second,
            self.block_align,
            self.bits_per_sample
        )?;
        if self.format_tag.is_extensible() {
            write!(
                f,
                " valid_bits_per_sample={} channel_mask=0x{:x}",
                self.valid_bits_per_sample, self.channel_mask
            )?;
        }
        Ok(())
    }
}

/// Video format descriptor. The pixel layout is always I420.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub width: u32,
    /// Always a magnitude; the scan-line order of the source is not kept.
    pub height: u32,
}

impl VideoConfig {
    /// Creates a descriptor for a `width` x `height` frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` for the empty descriptor.
    pub fn is_empty(&self) -> bool {
        *self == VideoConfig::default()
    }

    /// Parses a descriptor from JSON. Missing fields take their empty value.
    pub fn from_json_str(json: &str) -> Result<Self> {
        from_json(json)
    }
}

impl fmt::Display for VideoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "width={} height={}", self.width, self.height)
    }
}

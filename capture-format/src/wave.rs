// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! `WAVEFORMATEX` / `WAVEFORMATEXTENSIBLE` format blocks.
//!
//! ## Layout (little-endian, packed)
//! ```text
//! offset  size  field
//!      0     2  wFormatTag
//!      2     2  nChannels
//!      4     4  nSamplesPerSec
//!      8     4  nAvgBytesPerSec
//!     12     2  nBlockAlign
//!     14     2  wBitsPerSample
//!     16     2  cbSize                (extra bytes that follow)
//!     18     2  wValidBitsPerSample   (extensible only)
//!     20     4  dwChannelMask         (extensible only)
//!     24    16  SubFormat GUID        (extensible only)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    FormatError, Result,
    guid::Guid,
    le::{LeReader, LeWriter},
};

/// Size of a plain `WAVEFORMATEX`.
pub const WAVE_FORMAT_EX_SIZE: usize = 18;

/// Size of a `WAVEFORMATEXTENSIBLE`.
pub const WAVE_FORMAT_EXTENSIBLE_SIZE: usize = 40;

/// `cbSize` carried by a `WAVEFORMATEXTENSIBLE`.
pub const WAVE_FORMAT_EXTENSIBLE_EXTRA: u16 = 22;

const RECORD: &str = "WAVEFORMATEX";

/// Wave format tag (`wFormatTag`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaveFormatTag(pub u16);

impl WaveFormatTag {
    /// No format; the value of an empty descriptor.
    pub const UNKNOWN: WaveFormatTag = WaveFormatTag(0x0000);
    /// Integer PCM.
    pub const PCM: WaveFormatTag = WaveFormatTag(0x0001);
    /// IEEE 754 floating point.
    pub const IEEE_FLOAT: WaveFormatTag = WaveFormatTag(0x0003);
    /// Extensible format; the real encoding is in the sub-format GUID.
    pub const EXTENSIBLE: WaveFormatTag = WaveFormatTag(0xfffe);

    /// Returns `true` for [`WaveFormatTag::EXTENSIBLE`].
    pub fn is_extensible(self) -> bool {
        self == WaveFormatTag::EXTENSIBLE
    }
}

impl fmt::Display for WaveFormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            WaveFormatTag::UNKNOWN => f.write_str("UNKNOWN"),
            WaveFormatTag::PCM => f.write_str("PCM"),
            WaveFormatTag::IEEE_FLOAT => f.write_str("IEEE_FLOAT"),
            WaveFormatTag::EXTENSIBLE => f.write_str("EXTENSIBLE"),
            WaveFormatTag(other) => write!(f, "0x{:04x}", other),
        }
    }
}

/// Fields present only in a `WAVEFORMATEXTENSIBLE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveFormatExtensible {
    /// Bits of precision actually used in each container sample.
    pub valid_bits_per_sample: u16,
    /// Speaker position bitmask.
    pub channel_mask: u32,
    /// Encoding of the samples (e.g. the PCM or IEEE float subtype GUID).
    pub sub_format: Guid,
}

/// A decoded wave format block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveFormatEx {
    /// Encoding tag.
    pub format_tag: WaveFormatTag,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Sample frames per second.
    pub samples_per_sec: u32,
    /// Average data rate.
    pub avg_bytes_per_sec: u32,
    /// Size of one sample frame in bytes.
    pub block_align: u16,
    /// Container size of one sample in bits.
    pub bits_per_sample: u16,
    /// Present iff `format_tag` is [`WaveFormatTag::EXTENSIBLE`].
    pub extensible: Option<WaveFormatExtensible>,
}

impl WaveFormatEx {
    /// Describes interleaved integer PCM.
    pub fn pcm(channels: u16, samples_per_sec: u32, bits_per_sample: u16) -> Self {
        Self::interleaved(WaveFormatTag::PCM, channels, samples_per_sec, bits_per_sample)
    }

    /// Describes interleaved 32-bit float samples.
    pub fn ieee_float(channels: u16, samples_per_sec: u32) -> Self {
        Self::interleaved(WaveFormatTag::IEEE_FLOAT, channels, samples_per_sec, 32)
    }

    fn interleaved(
        format_tag: WaveFormatTag,
        channels: u16,
        samples_per_sec: u32,
        bits_per_sample: u16,
    ) -> Self {
        let block_align = channels.saturating_mul(bits_per_sample / 8);
        Self {
            format_tag,
            channels,
            samples_per_sec,
            avg_bytes_per_sec: samples_per_sec.saturating_mul(block_align as u32),
            block_align,
            bits_per_sample,
            extensible: None,
        }
    }

    /// Converts this record to its extensible form, keeping the rate and
    /// layout fields.
    pub fn into_extensible(
        mut self,
        valid_bits_per_sample: u16,
        channel_mask: u32,
        sub_format: Guid,
    ) -> Self {
        self.format_tag = WaveFormatTag::EXTENSIBLE;
        self.extensible = Some(WaveFormatExtensible {
            valid_bits_per_sample,
            channel_mask,
            sub_format,
        });
        self
    }

    /// Decodes a format block.
    ///
    /// # Errors
    ///
    /// - [`FormatError::Truncated`] if the block is shorter than a
    ///   `WAVEFORMATEX`, or an extensible block is shorter than a
    ///   `WAVEFORMATEXTENSIBLE`.
    /// - [`FormatError::Invalid`] if an extensible block declares a `cbSize`
    ///   below 22, or if the channel count, sample rate or block alignment is
    ///   zero.
    pub fn parse(block: &[u8]) -> Result<Self> {
        if block.len() < WAVE_FORMAT_EX_SIZE {
            return Err(FormatError::truncated(
                RECORD,
                WAVE_FORMAT_EX_SIZE,
                block.len(),
            ));
        }

        let mut reader = LeReader::new(RECORD, block);
        let format_tag = WaveFormatTag(reader.u16()?);
        let channels = reader.u16()?;
        let samples_per_sec = reader.u32()?;
        let avg_bytes_per_sec = reader.u32()?;
        let block_align = reader.u16()?;
        let bits_per_sample = reader.u16()?;
        let cb_size = reader.u16()?;

        if channels == 0 {
            return Err(FormatError::invalid(RECORD, "nChannels is zero"));
        }
        if samples_per_sec == 0 {
            return Err(FormatError::invalid(RECORD, "nSamplesPerSec is zero"));
        }
        if block_align == 0 {
            return Err(FormatError::invalid(RECORD, "nBlockAlign is zero"));
        }

        let extensible = if format_tag.is_extensible() {
            if cb_size < WAVE_FORMAT_EXTENSIBLE_EXTRA {
                return Err(FormatError::invalid(
                    RECORD,
                    format!(
                        "cbSize {} too small for WAVE_FORMAT_EXTENSIBLE (need {})",
                        cb_size, WAVE_FORMAT_EXTENSIBLE_EXTRA
                    ),
                ));
            }
            if block.len() < WAVE_FORMAT_EXTENSIBLE_SIZE {
                return Err(FormatError::truncated(
                    "WAVEFORMATEXTENSIBLE",
                    WAVE_FORMAT_EXTENSIBLE_SIZE,
                    block.len(),
                ));
            }
            Some(WaveFormatExtensible {
                valid_bits_per_sample: reader.u16()?,
                channel_mask: reader.u32()?,
                sub_format: reader.guid()?,
            })
        } else {
            None
        };

        Ok(Self {
            format_tag,
            channels,
            samples_per_sec,
            avg_bytes_per_sec,
            block_align,
            bits_per_sample,
            extensible,
        })
    }

    /// Encodes this record as a format block.
    ///
    /// Extensible records produce 40 bytes with `cbSize = 22`; all others
    /// produce 18 bytes with `cbSize = 0`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(WAVE_FORMAT_EXTENSIBLE_SIZE);
        out.put_u16(self.format_tag.0);
        out.put_u16(self.channels);
        out.put_u32(self.samples_per_sec);
        out.put_u32(self.avg_bytes_per_sec);
        out.put_u16(self.block_align);
        out.put_u16(self.bits_per_sample);
        match &self.extensible {
            Some(ext) => {
                out.put_u16(WAVE_FORMAT_EXTENSIBLE_EXTRA);
                out.put_u16(ext.valid_bits_per_sample);
                out.put_u32(ext.channel_mask);
                out.put_guid(&ext.sub_format);
            }
            None => out.put_u16(0),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guid::MEDIASUBTYPE_PCM;

    #[test]
    fn pcm_helper_derives_rate_fields() {
        let format = WaveFormatEx::pcm(2, 44_100, 16);
        assert_eq!(format.block_align, 4);
        assert_eq!(format.avg_bytes_per_sec, 176_400);
        assert_eq!(format.to_bytes().len(), WAVE_FORMAT_EX_SIZE);
    }

    #[test]
    fn extensible_block_carries_sub_format() {
        let format = WaveFormatEx::pcm(6, 48_000, 24).into_extensible(24, 0x3f, MEDIASUBTYPE_PCM);
        let bytes = format.to_bytes();
        assert_eq!(bytes.len(), WAVE_FORMAT_EXTENSIBLE_SIZE);
        assert_eq!(&bytes[0..2], &[0xfe, 0xff]);
        let parsed = WaveFormatEx::parse(&bytes).unwrap();
        let ext = parsed.extensible.unwrap();
        assert_eq!(ext.channel_mask, 0x3f);
        assert_eq!(ext.sub_format, MEDIASUBTYPE_PCM);
    }

    #[test]
    fn tag_display_names_known_tags() {
        assert_eq!(WaveFormatTag::PCM.to_string(), "PCM");
        assert_eq!(WaveFormatTag(0x0055).to_string(), "0x0055");
    }
}

// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! The media type record exchanged during format negotiation.

use std::fmt;

use crate::guid::{Guid, guid_name};

/// A proposed or advertised sample format.
///
/// The GUID fields are optional because an upstream source may propose a
/// partially filled media type; a sink must treat a missing subtype or format
/// type as a malformed proposal rather than guess.
///
/// # Examples
///
/// ```
/// use capture_format::{
///     FORMAT_WAVE_FORMAT_EX, MEDIASUBTYPE_PCM, MEDIATYPE_AUDIO, MediaType, WaveFormatEx,
/// };
///
/// let proposal = MediaType::new(MEDIATYPE_AUDIO)
///     .with_subtype(MEDIASUBTYPE_PCM)
///     .with_format(FORMAT_WAVE_FORMAT_EX, WaveFormatEx::pcm(2, 48_000, 16).to_bytes());
/// assert_eq!(proposal.format.len(), 18);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaType {
    /// Major type (audio, video, ...).
    pub major_type: Option<Guid>,
    /// Subtype (sample encoding).
    pub subtype: Option<Guid>,
    /// Identifies the record stored in [`MediaType::format`].
    pub format_type: Option<Guid>,
    /// Samples depend on each other (compressed streams).
    pub temporal_compression: bool,
    /// Every sample has the same size, given by [`MediaType::sample_size`].
    pub fixed_size_samples: bool,
    /// Sample size in bytes, or zero if variable.
    pub sample_size: u32,
    /// Opaque little-endian format block.
    pub format: Vec<u8>,
}

impl MediaType {
    /// Creates a media type with only the major type set.
    pub fn new(major_type: Guid) -> Self {
        Self {
            major_type: Some(major_type),
            ..Default::default()
        }
    }

    /// Sets the subtype.
    pub fn with_subtype(mut self, subtype: Guid) -> Self {
        self.subtype = Some(subtype);
        self
    }

    /// Sets the format type and its format block.
    pub fn with_format(mut self, format_type: Guid, format: Vec<u8>) -> Self {
        self.format_type = Some(format_type);
        self.format = format;
        self
    }

    /// Sets the format type without a format block.
    pub fn with_format_type(mut self, format_type: Guid) -> Self {
        self.format_type = Some(format_type);
        self
    }

    /// Marks the stream as temporally compressed (or not).
    pub fn with_temporal_compression(mut self, temporal_compression: bool) -> Self {
        self.temporal_compression = temporal_compression;
        self
    }

    /// Declares a fixed sample size.
    pub fn with_sample_size(mut self, sample_size: u32) -> Self {
        self.fixed_size_samples = sample_size > 0;
        self.sample_size = sample_size;
        self
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |guid: &Option<Guid>| guid.as_ref().map_or_else(|| "none".to_string(), guid_name);
        write!(
            f,
            "major={} subtype={} format={} ({} bytes)",
            name(&self.major_type),
            name(&self.subtype),
            name(&self.format_type),
            self.format.len()
        )
    }
}

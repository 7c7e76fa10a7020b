// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! The capability set that distinguishes an audio endpoint from a video one.
//!
//! [`crate::SinkEndpoint`] is written once against this trait; [`crate::Audio`]
//! and [`crate::Video`] supply the descriptor type, the acceptance rules, the
//! advertised formats and the buffer packaging.

use std::fmt;

use capture_format::{Guid, MediaType};

use crate::{IngestError, RejectReason, ingest::SampleTimes};

/// Media-kind specific behavior of a sink endpoint.
pub trait MediaKind: Send + 'static {
    /// Canonical format descriptor. `Default` is the empty descriptor.
    type Config: Clone + Default + PartialEq + fmt::Debug + fmt::Display + Send;

    /// The owned, timestamped buffer handed to the consumer. `Default` is an
    /// empty buffer that has never held a sample.
    type Buffer: Default + Send;

    /// Name of the endpoint's single input channel.
    const CHANNEL_NAME: &'static str;

    /// Major type GUID this kind accepts.
    const MAJOR_TYPE: Guid;

    /// Evaluates a proposal and, if it is acceptable, returns the descriptor
    /// to install as the actual configuration.
    fn check_media_type(media_type: &MediaType) -> Result<Self::Config, RejectReason>;

    /// Returns the preferred format at `index`, or `None` past the end of the
    /// list.
    fn media_type(index: usize, requested: &Self::Config) -> Option<MediaType>;

    /// Overwrites `buffer` with one delivered sample.
    fn fill_buffer(
        buffer: &mut Self::Buffer,
        actual: &Self::Config,
        times: SampleTimes,
        payload: &[u8],
    ) -> Result<(), IngestError>;

    /// Emits a debug record describing a freshly filled buffer.
    fn log_buffer(buffer: &Self::Buffer);
}

/// Replaces the contents of `dst` with `payload`, reusing its allocation.
pub(crate) fn copy_payload(dst: &mut Vec<u8>, payload: &[u8]) -> Result<(), IngestError> {
    dst.clear();
    dst.try_reserve_exact(payload.len())
        .map_err(|e| IngestError::BufferInitFailed(e.to_string()))?;
    dst.extend_from_slice(payload);
    Ok(())
}

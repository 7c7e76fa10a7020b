// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for sink endpoints.
//!
//! Errors are split by the stage that produces them:
//! - [`RejectReason`]: a proposal failed format negotiation
//! - [`IngestError`]: one delivered sample could not be packaged
//! - [`ConsumerError`]: the downstream consumer reported a failure (advisory)
//! - [`Error`]: what the endpoint's configuration and negotiation calls return

use capture_format::{FormatError, FourCc, Guid, WaveFormatTag, guid::guid_name};

use crate::state::RunState;

/// Convenience result type using [`Error`] as the error variant.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors returned by endpoint negotiation and configuration calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The proposed format does not satisfy the endpoint's acceptance rules.
    /// Actual configuration is left untouched.
    #[error("Format rejected: {0}")]
    FormatRejected(#[from] RejectReason),

    /// Configuration was changed while the endpoint was not stopped.
    #[error("Invalid state: configuration requires a stopped endpoint, endpoint is {0}")]
    InvalidState(RunState),

    /// A delivered sample could not be ingested.
    #[error("Ingest failed: {0}")]
    Ingest(#[from] IngestError),

    /// A configuration document could not be decoded.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Why a proposed media type was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// Major type is missing or of the wrong kind.
    #[error("major type is not {expected}")]
    WrongMajorType {
        /// Human-readable name of the major type this endpoint accepts.
        expected: &'static str,
    },

    /// The stream is declared temporally compressed.
    #[error("temporally compressed streams are not accepted")]
    TemporallyCompressed,

    /// Subtype or format type GUID is absent.
    #[error("missing subtype or format type")]
    MissingSubtypeOrFormatType,

    /// The format block is of a representation this endpoint cannot read.
    #[error("format type {} not supported", guid_name(.0))]
    UnsupportedFormatType(Guid),

    /// The subtype is not one of the endpoint's input subtypes.
    #[error("subtype {} not supported", guid_name(.0))]
    UnsupportedSubtype(Guid),

    /// The format type requires a format block but none was supplied.
    #[error("missing format block")]
    MissingFormatBlock,

    /// The format block could not be decoded.
    #[error("invalid format block: {0}")]
    InvalidFormatBlock(#[from] FormatError),

    /// The wave format tag is not PCM, IEEE float or extensible.
    #[error("wave format tag {0} not supported")]
    UnsupportedFormatTag(WaveFormatTag),

    /// The compression code in the frame header disagrees with the subtype.
    #[error("compression {actual} does not match subtype {expected}")]
    FourCcMismatch {
        /// Code implied by the subtype.
        expected: FourCc,
        /// Code found in the frame header.
        actual: FourCc,
    },
}

impl RejectReason {
    /// Returns `true` when the proposal itself is malformed (missing GUIDs or
    /// an unreadable format block) as opposed to well formed but unsupported.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            RejectReason::MissingSubtypeOrFormatType
                | RejectReason::MissingFormatBlock
                | RejectReason::InvalidFormatBlock(_)
        )
    }
}

/// Per-sample delivery failures. Each one aborts only the sample that caused
/// it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    /// The sample exposes no payload, or a zero-length one.
    #[error("sample has no payload")]
    EmptyPayload,

    /// The sample could not supply its time stamps.
    #[error("sample time query failed")]
    TimeQueryFailed,

    /// The sample buffer could not be allocated or filled.
    #[error("sample buffer init failed: {0}")]
    BufferInitFailed(String),

    /// No format has been negotiated yet.
    #[error("endpoint is not connected")]
    NotConnected,

    /// The sample arrived while the endpoint was stopped.
    #[error("sample delivered while {0}")]
    WrongState(RunState),
}

impl IngestError {
    /// Returns `true` for failures that are an expected race rather than a
    /// fault (a source delivering one last sample right after a stop).
    pub fn is_benign(&self) -> bool {
        matches!(self, IngestError::WrongState(_))
    }
}

/// Failure reported by a downstream consumer.
///
/// The status is advisory: it is logged and counted but never propagated to
/// the upstream source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("consumer returned status {status}")]
pub struct ConsumerError {
    /// Consumer-defined non-zero status code.
    pub status: i32,
}

impl ConsumerError {
    /// Creates a consumer error with the given status.
    pub fn new(status: i32) -> Self {
        Self { status }
    }
}

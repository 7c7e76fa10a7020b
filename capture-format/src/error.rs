// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for format block parsing.
//!
//! Format blocks arrive from the upstream source as opaque little-endian byte
//! ranges. These errors describe why a block could not be turned into a typed
//! record.

/// Convenience result type using [`FormatError`] as the error variant.
pub type Result<T> = core::result::Result<T, FormatError>;

/// Errors that can occur while decoding a format block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The block is shorter than the record it is supposed to hold.
    #[error("Truncated {record}: expected at least {expected} bytes, got {actual}")]
    Truncated {
        /// Name of the record being decoded (e.g. "WAVEFORMATEX").
        record: &'static str,
        /// Minimum number of bytes required.
        expected: usize,
        /// Number of bytes available.
        actual: usize,
    },

    /// The block has the right size but one of its fields is out of range.
    #[error("Invalid {record}: {reason}")]
    Invalid {
        /// Name of the record being decoded.
        record: &'static str,
        /// Human-readable description of the offending field.
        reason: String,
    },
}

impl FormatError {
    pub(crate) fn truncated(record: &'static str, expected: usize, actual: usize) -> Self {
        FormatError::Truncated {
            record,
            expected,
            actual,
        }
    }

    pub(crate) fn invalid(record: &'static str, reason: impl Into<String>) -> Self {
        FormatError::Invalid {
            record,
            reason: reason.into(),
        }
    }
}

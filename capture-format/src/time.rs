// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Reference time conversion.
//!
//! Capture devices stamp samples in reference time: a signed count of 100 ns
//! ticks. Downstream consumers work in whole milliseconds.

/// Signed count of 100 ns ticks.
pub type ReferenceTime = i64;

/// Reference time ticks per second.
pub const UNITS_PER_SECOND: ReferenceTime = 10_000_000;

/// Reference time ticks per millisecond.
pub const UNITS_PER_MILLISECOND: ReferenceTime = 10_000;

/// Converts reference time to milliseconds, truncating toward zero.
///
/// The conversion is monotonic: `a <= b` implies
/// `media_time_to_milliseconds(a) <= media_time_to_milliseconds(b)`.
pub const fn media_time_to_milliseconds(time: ReferenceTime) -> i64 {
    time / UNITS_PER_MILLISECOND
}

/// Converts reference time to fractional seconds.
pub fn media_time_to_seconds(time: ReferenceTime) -> f64 {
    time as f64 / UNITS_PER_SECOND as f64
}

/// Converts milliseconds to reference time, saturating on overflow.
pub const fn milliseconds_to_media_time(milliseconds: i64) -> ReferenceTime {
    milliseconds.saturating_mul(UNITS_PER_MILLISECOND)
}

// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Sample ingest.
//!
//! The upstream source pushes [`MediaSample`]s into an endpoint. Each one is
//! checked, copied into the endpoint's reusable buffer, stamped with
//! millisecond times and handed to the consumer's [`SamplesCallback`].
//!
//! ## Pipeline
//! 1. Reject the sample if the endpoint is stopped
//! 2. Read the payload; an absent or empty payload is an error
//! 3. Read the start/end media times
//! 4. Package payload and times into the buffer (overwriting the last sample)
//! 5. Dispatch the buffer to the consumer
//!
//! A consumer failure in step 5, whether an error status or a panic, is
//! logged and counted but does not fail the delivery: the source is never
//! told about it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use capture_format::ReferenceTime;
use serde::Serialize;
use tracing::{debug, error};

use crate::{ConsumerError, IngestError, kind::MediaKind, state::RunState};

/// Start and optional end time of a sample, in 100 ns media units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleTimes {
    pub start: ReferenceTime,
    pub end: Option<ReferenceTime>,
}

impl SampleTimes {
    pub fn new(start: ReferenceTime, end: ReferenceTime) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Times for a sample whose source supplied no stop time.
    pub fn start_only(start: ReferenceTime) -> Self {
        Self { start, end: None }
    }
}

/// A sample as delivered by the upstream source.
///
/// Both accessors are queries that can fail; `None` means the source could
/// not answer.
pub trait MediaSample {
    /// The sample's bytes.
    fn payload(&self) -> Option<&[u8]>;

    /// The sample's media times.
    fn times(&self) -> Option<SampleTimes>;
}

/// A borrowed sample built from plain parts.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawSample<'a> {
    pub payload: Option<&'a [u8]>,
    pub times: Option<SampleTimes>,
}

impl<'a> RawSample<'a> {
    pub fn new(payload: &'a [u8], times: SampleTimes) -> Self {
        Self {
            payload: Some(payload),
            times: Some(times),
        }
    }
}

impl MediaSample for RawSample<'_> {
    fn payload(&self) -> Option<&[u8]> {
        self.payload
    }

    fn times(&self) -> Option<SampleTimes> {
        self.times
    }
}

/// Receives packaged buffers from an endpoint.
///
/// The buffer is only borrowed for the duration of the call; consumers that
/// need to keep it must clone it. The endpoint lock is held while this runs,
/// so implementations must not call back into the same endpoint.
pub trait SamplesCallback<B>: Send {
    fn on_samples_received(&mut self, buffer: &B) -> Result<(), ConsumerError>;
}

impl<B, F> SamplesCallback<B> for F
where
    F: FnMut(&B) -> Result<(), ConsumerError> + Send,
{
    fn on_samples_received(&mut self, buffer: &B) -> Result<(), ConsumerError> {
        self(buffer)
    }
}

/// Counters kept by an endpoint's ingest pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Every call into the pipeline.
    pub delivered: u64,
    /// Buffers the consumer accepted.
    pub dispatched: u64,
    /// Buffers the consumer returned an error for or panicked on.
    pub callback_failures: u64,
    /// Samples dropped before reaching the consumer.
    pub rejected: u64,
}

pub(crate) struct IngestPipeline<K: MediaKind> {
    callback: Box<dyn SamplesCallback<K::Buffer>>,
    buffer: K::Buffer,
    stats: IngestStats,
}

impl<K: MediaKind> IngestPipeline<K> {
    pub(crate) fn new(callback: Box<dyn SamplesCallback<K::Buffer>>) -> Self {
        Self {
            callback,
            buffer: K::Buffer::default(),
            stats: IngestStats::default(),
        }
    }

    pub(crate) fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Runs one sample through the pipeline.
    ///
    /// Returns `Ok` once the buffer has been handed to the consumer, whatever
    /// the consumer answers.
    pub(crate) fn ingest(
        &mut self,
        run_state: RunState,
        actual: &K::Config,
        sample: &dyn MediaSample,
    ) -> Result<(), IngestError> {
        self.stats.delivered += 1;
        if let Err(err) = self.package(run_state, actual, sample) {
            self.stats.rejected += 1;
            return Err(err);
        }
        K::log_buffer(&self.buffer);
        self.dispatch();
        Ok(())
    }

    fn package(
        &mut self,
        run_state: RunState,
        actual: &K::Config,
        sample: &dyn MediaSample,
    ) -> Result<(), IngestError> {
        if !run_state.accepts_samples() {
            debug!("{} sample dropped, endpoint is {}", K::CHANNEL_NAME, run_state);
            return Err(IngestError::WrongState(run_state));
        }

        let payload = match sample.payload() {
            Some(payload) if !payload.is_empty() => payload,
            _ => {
                error!("{} sample delivered without a payload", K::CHANNEL_NAME);
                return Err(IngestError::EmptyPayload);
            }
        };

        let Some(times) = sample.times() else {
            error!("{} sample time query failed", K::CHANNEL_NAME);
            return Err(IngestError::TimeQueryFailed);
        };

        if *actual == K::Config::default() {
            error!("{} sample delivered before a format was negotiated", K::CHANNEL_NAME);
            return Err(IngestError::NotConnected);
        }

        K::fill_buffer(&mut self.buffer, actual, times, payload).inspect_err(|err| {
            error!("{} sample buffer init failed: {}", K::CHANNEL_NAME, err);
        })
    }

    fn dispatch(&mut self) {
        let callback = &mut self.callback;
        let buffer = &self.buffer;
        match panic::catch_unwind(AssertUnwindSafe(|| callback.on_samples_received(buffer))) {
            Ok(Ok(())) => self.stats.dispatched += 1,
            Ok(Err(err)) => {
                self.stats.callback_failures += 1;
                error!("{} consumer failed: {}", K::CHANNEL_NAME, err);
            }
            Err(payload) => {
                self.stats.callback_failures += 1;
                error!(
                    "{} consumer panicked: {}",
                    K::CHANNEL_NAME,
                    panic_message(&*payload)
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! The sink endpoint.
//!
//! An endpoint is the terminal node of a push-driven capture graph. It owns a
//! single input channel, negotiates the format the upstream source delivers,
//! and turns every delivered sample into an owned buffer for its consumer.
//!
//! ## Configuration
//! - **Requested**: what the consumer would like; set with
//!   [`SinkEndpoint::set_config`] while stopped. Drives what is advertised.
//! - **Actual**: what the source connected with; written only by a successful
//!   [`SinkEndpoint::propose`]. Cleared whenever Requested changes.
//!
//! ## Locking
//! All state sits behind one [`SinkLock`]. Every method takes it for its full
//! duration, including the consumer callback during delivery.

use capture_format::{Guid, MediaType};
use tracing::info;

use crate::{
    ConsumerError, Error, IngestError, Result,
    audio::Audio,
    ingest::{IngestPipeline, IngestStats, MediaSample, SamplesCallback},
    kind::MediaKind,
    state::RunState,
    sync::SinkLock,
    video::Video,
};

/// Endpoint receiving audio as [`crate::AudioBuffer`]s.
pub type AudioSinkEndpoint = SinkEndpoint<Audio>;

/// Endpoint receiving video as [`crate::VideoFrame`]s.
pub type VideoSinkEndpoint = SinkEndpoint<Video>;

/// Handle describing an endpoint's input channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkChannel {
    pub name: &'static str,
    pub index: usize,
    pub major_type: Guid,
}

struct SinkCore<K: MediaKind> {
    requested: K::Config,
    actual: K::Config,
    pipeline: IngestPipeline<K>,
}

/// A sink endpoint for media kind `K`.
///
/// The endpoint is `Send + Sync`; share it between the threads that
/// negotiate and deliver through an `Arc`.
pub struct SinkEndpoint<K: MediaKind> {
    core: SinkLock<SinkCore<K>>,
}

impl<K: MediaKind> SinkEndpoint<K> {
    /// Creates an endpoint that hands every packaged buffer to `callback`.
    ///
    /// Both configurations start empty.
    pub fn new<C>(callback: C) -> Self
    where
        C: SamplesCallback<K::Buffer> + 'static,
    {
        #[cfg(feature = "tracing")]
        {
            use tracing_subscriber::filter::LevelFilter;
            use tracing_subscriber::util::SubscriberInitExt;

            let _ = tracing_subscriber::fmt()
                .compact()
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_target(false)
                .with_max_level(LevelFilter::TRACE)
                .finish()
                .try_init();
        }

        Self {
            core: SinkLock::new(
                K::CHANNEL_NAME,
                SinkCore {
                    requested: K::Config::default(),
                    actual: K::Config::default(),
                    pipeline: IngestPipeline::new(Box::new(callback)),
                },
            ),
        }
    }

    /// Creates an endpoint from a closure.
    ///
    /// ```
    /// use capture_sink::{AudioBuffer, AudioSinkEndpoint};
    ///
    /// let endpoint = AudioSinkEndpoint::from_fn(|buffer: &AudioBuffer| {
    ///     println!("{} bytes at {} ms", buffer.buffer_length(), buffer.timestamp());
    ///     Ok(())
    /// });
    /// assert!(endpoint.config().is_empty());
    /// ```
    pub fn from_fn<F>(callback: F) -> Self
    where
        F: FnMut(&K::Buffer) -> std::result::Result<(), ConsumerError> + Send + 'static,
    {
        Self::new(callback)
    }

    /// The actual (negotiated) configuration. Empty until a proposal is
    /// accepted.
    pub fn config(&self) -> K::Config {
        self.core.lock().actual.clone()
    }

    /// The requested configuration.
    pub fn requested_config(&self) -> K::Config {
        self.core.lock().requested.clone()
    }

    /// Replaces the requested configuration and clears the actual one.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] unless `run_state` is
    /// [`RunState::Stopped`]; nothing changes in that case.
    pub fn set_config(&self, run_state: RunState, config: K::Config) -> Result<()> {
        let mut core = self.core.lock();
        if !run_state.allows_reconfiguration() {
            info!(
                "{} configuration change refused while {}",
                K::CHANNEL_NAME,
                run_state
            );
            return Err(Error::InvalidState(run_state));
        }
        info!("requested {} settings: {}", K::CHANNEL_NAME, config);
        core.requested = config;
        core.actual = K::Config::default();
        Ok(())
    }

    /// Looks up an input channel. There is exactly one, at index 0.
    pub fn channel(&self, index: usize) -> Option<SinkChannel> {
        let _core = self.core.lock();
        (index == 0).then_some(SinkChannel {
            name: K::CHANNEL_NAME,
            index,
            major_type: K::MAJOR_TYPE,
        })
    }

    /// Returns the preferred format at `index`, or `None` past the end of the
    /// list.
    pub fn enumerate(&self, index: usize) -> Option<MediaType> {
        let core = self.core.lock();
        K::media_type(index, &core.requested)
    }

    /// Evaluates a format proposed by the upstream source.
    ///
    /// Acceptance installs the derived descriptor as the actual
    /// configuration. Rejection leaves it untouched.
    ///
    /// # Errors
    ///
    /// [`Error::FormatRejected`] with the first rule the proposal failed.
    pub fn propose(&self, media_type: &MediaType) -> Result<()> {
        let mut core = self.core.lock();
        match K::check_media_type(media_type) {
            Ok(config) => {
                info!("actual {} settings: {}", K::CHANNEL_NAME, config);
                core.actual = config;
                Ok(())
            }
            Err(reason) => {
                info!("{} rejecting type ({}): {}", K::CHANNEL_NAME, media_type, reason);
                Err(reason.into())
            }
        }
    }

    /// Ingests one sample and hands it to the consumer.
    ///
    /// Runs on the caller's thread. A consumer failure is logged and counted
    /// but still returns `Ok`.
    ///
    /// # Errors
    ///
    /// Any [`IngestError`]; only the offending sample is dropped.
    pub fn on_sample_delivered(
        &self,
        run_state: RunState,
        sample: &dyn MediaSample,
    ) -> std::result::Result<(), IngestError> {
        let mut guard = self.core.lock();
        let core = &mut *guard;
        core.pipeline.ingest(run_state, &core.actual, sample)
    }

    /// Ingest counters since construction.
    pub fn stats(&self) -> IngestStats {
        self.core.lock().pipeline.stats()
    }
}

// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! # Capture Sink
//!
//! Terminal endpoints for push-driven capture graphs. An upstream source
//! negotiates a format with a [`SinkEndpoint`], then pushes samples into it;
//! the endpoint copies each sample into an owned, millisecond-stamped buffer
//! and hands it to a downstream consumer.
//!
//! ## Overview
//!
//! ```text
//!  upstream source                  SinkEndpoint<K>                consumer
//!  ───────────────                  ───────────────                ────────
//!  enumerate(i) ──────────────────► advertised MediaType
//!  propose(MediaType) ────────────► Actual := descriptor | reject
//!  on_sample_delivered(sample) ───► package into buffer ─────────► SamplesCallback
//! ```
//!
//! Two media kinds are provided:
//!
//! - [`Audio`]: PCM or IEEE float wave formats, delivered as [`AudioBuffer`]
//! - [`Video`]: uncompressed I420 frames, delivered as [`VideoFrame`]
//!
//! The graph's [`RunState`] is owned by the caller and passed into the
//! operations that depend on it: configuration can only change while
//! stopped, and samples are only accepted while not stopped.
//!
//! ## Example
//!
//! ```
//! use capture_format::{FORMAT_WAVE_FORMAT_EX, MEDIASUBTYPE_PCM, MEDIATYPE_AUDIO, MediaType, WaveFormatEx};
//! use capture_sink::{AudioBuffer, AudioSinkEndpoint, RawSample, RunState, SampleTimes};
//!
//! let endpoint = AudioSinkEndpoint::from_fn(|buffer: &AudioBuffer| {
//!     assert_eq!(buffer.duration(), 10);
//!     Ok(())
//! });
//!
//! let proposal = MediaType::new(MEDIATYPE_AUDIO)
//!     .with_subtype(MEDIASUBTYPE_PCM)
//!     .with_format(FORMAT_WAVE_FORMAT_EX, WaveFormatEx::pcm(2, 48_000, 16).to_bytes());
//! endpoint.propose(&proposal)?;
//!
//! let payload = [0u8; 1920];
//! endpoint.on_sample_delivered(RunState::Running, &RawSample::new(&payload, SampleTimes::new(0, 100_000)))?;
//! assert_eq!(endpoint.stats().dispatched, 1);
//! # Ok::<(), capture_sink::Error>(())
//! ```
//!
//! ## Consumers
//!
//! The consumer runs on the delivering thread while the endpoint lock is
//! held. The lock is not reentrant: a consumer must not call back into the
//! endpoint that invoked it, and doing so deadlocks. Each buffer carries the
//! format it was captured with, so read that instead of
//! [`SinkEndpoint::config`]:
//!
//! ```
//! use capture_sink::{AudioBuffer, AudioSinkEndpoint, ConsumerError};
//!
//! let endpoint = AudioSinkEndpoint::from_fn(|buffer: &AudioBuffer| {
//!     // Not `endpoint.config()`.
//!     let config = buffer.config();
//!     if config.block_align == 0 || buffer.buffer_length() % config.block_align as usize != 0 {
//!         return Err(ConsumerError::new(-1));
//!     }
//!     Ok(())
//! });
//! # drop(endpoint);
//! ```
//!
//! [`VideoFrame`] carries its width, height and pixel format the same way.
//! A consumer that returns an error or panics is logged and counted in
//! [`IngestStats::callback_failures`]; the source still sees a successful
//! delivery.
//!
//! ## Logging
//!
//! The crate logs through `tracing` and never installs a subscriber itself
//! unless the `tracing` feature is enabled.

mod audio;
mod config;
mod endpoint;
mod error;
mod ingest;
mod kind;
mod state;
mod sync;
mod video;


pub use audio::{Audio, AudioBuffer};
pub use config::{AudioConfig, VideoConfig};
pub use endpoint::{AudioSinkEndpoint, SinkChannel, SinkEndpoint, VideoSinkEndpoint};
pub use error::{ConsumerError, Error, IngestError, RejectReason, Result};
pub use ingest::{IngestStats, MediaSample, RawSample, SampleTimes, SamplesCallback};
pub use kind::MediaKind;
pub use state::RunState;
pub use video::{PixelFormat, Video, VideoFrame};

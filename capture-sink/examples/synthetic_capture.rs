// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Drives a sink endpoint with synthetic samples.
//!
//! Plays the part of an upstream capture source: negotiates a format, moves
//! the graph to Running, pushes a run of samples and stops again. The
//! consumer logs every buffer it receives.
//!
//! ```text
//! cargo run --example synthetic_capture -- --kind video --width 640 --height 480 --samples 25
//! RUST_LOG=debug cargo run --example synthetic_capture -- --kind audio --rate 44100 --channels 2
//! ```

mod common;

use std::path::PathBuf;

use capture_format::{
    FORMAT_WAVE_FORMAT_EX, MEDIASUBTYPE_PCM, MEDIATYPE_AUDIO, MediaType, WaveFormatEx,
    time::milliseconds_to_media_time,
};
use capture_sink::{
    AudioBuffer, AudioSinkEndpoint, IngestStats, RawSample, RunState, SampleTimes, VideoConfig,
    VideoFrame, VideoSinkEndpoint,
};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Audio,
    Video,
}

#[derive(Parser, Debug)]
#[command(version, about = "Push synthetic samples through a capture sink")]
struct Opts {
    /// Media kind of the endpoint.
    #[arg(long, value_enum, default_value_t = Kind::Audio)]
    kind: Kind,

    /// Number of samples to deliver.
    #[arg(long, default_value_t = 10)]
    samples: u32,

    /// Audio sample rate.
    #[arg(long, default_value_t = 48_000)]
    rate: u32,

    /// Audio channel count.
    #[arg(long, default_value_t = 2)]
    channels: u16,

    /// Requested video width.
    #[arg(long, default_value_t = 320)]
    width: u32,

    /// Requested video height.
    #[arg(long, default_value_t = 240)]
    height: u32,

    /// JSON file holding the requested video configuration. Overrides
    /// `--width` and `--height`.
    #[arg(long, value_name = "FILE_PATH")]
    config: Option<PathBuf>,
}

/// Audio is delivered in 10 ms blocks.
const AUDIO_BLOCK_MS: i64 = 10;

/// Video is delivered at 25 frames per second.
const VIDEO_FRAME_MS: i64 = 40;

fn run_audio(opts: &Opts) -> Result<IngestStats, Box<dyn std::error::Error>> {
    let endpoint = AudioSinkEndpoint::from_fn(|buffer: &AudioBuffer| {
        info!(
            "received {} bytes at {} ms for {} ms",
            buffer.buffer_length(),
            buffer.timestamp(),
            buffer.duration()
        );
        Ok(())
    });

    for index in 0.. {
        let Some(media_type) = endpoint.enumerate(index) else {
            break;
        };
        info!("endpoint prefers {}", media_type);
    }

    let format = WaveFormatEx::pcm(opts.channels, opts.rate, 16);
    endpoint.propose(
        &MediaType::new(MEDIATYPE_AUDIO)
            .with_subtype(MEDIASUBTYPE_PCM)
            .with_format(FORMAT_WAVE_FORMAT_EX, format.to_bytes()),
    )?;

    let frames = (opts.rate as usize) * AUDIO_BLOCK_MS as usize / 1000;
    let payload = vec![0u8; frames * format.block_align as usize];
    for i in 0..i64::from(opts.samples) {
        let start = milliseconds_to_media_time(i * AUDIO_BLOCK_MS);
        let end = milliseconds_to_media_time((i + 1) * AUDIO_BLOCK_MS);
        endpoint.on_sample_delivered(
            RunState::Running,
            &RawSample::new(&payload, SampleTimes::new(start, end)),
        )?;
    }

    // One late sample racing the stop.
    if let Err(err) = endpoint.on_sample_delivered(
        RunState::Stopped,
        &RawSample::new(&payload, SampleTimes::start_only(0)),
    ) {
        if !err.is_benign() {
            return Err(err.into());
        }
    }
    Ok(endpoint.stats())
}

fn run_video(opts: &Opts) -> Result<IngestStats, Box<dyn std::error::Error>> {
    let endpoint = VideoSinkEndpoint::from_fn(|frame: &VideoFrame| {
        info!(
            "received {}x{} {} frame of {} bytes at {} ms",
            frame.width(),
            frame.height(),
            frame.format(),
            frame.buffer_length(),
            frame.timestamp()
        );
        Ok(())
    });

    let requested = match &opts.config {
        Some(path) => VideoConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => VideoConfig::new(opts.width, opts.height),
    };
    endpoint.set_config(RunState::Stopped, requested)?;

    let media_type = endpoint
        .enumerate(0)
        .ok_or("video endpoint advertised no format")?;
    let frame_size = media_type.sample_size as usize;
    endpoint.propose(&media_type)?;

    let payload = vec![0x80u8; frame_size];
    for i in 0..i64::from(opts.samples) {
        let start = milliseconds_to_media_time(i * VIDEO_FRAME_MS);
        endpoint.on_sample_delivered(
            RunState::Running,
            &RawSample::new(&payload, SampleTimes::start_only(start)),
        )?;
    }

    if endpoint
        .set_config(RunState::Running, VideoConfig::default())
        .is_err()
    {
        warn!("reconfiguration while running was refused, as expected");
    }
    Ok(endpoint.stats())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::setup_logging();
    let opts = Opts::parse();

    let stats = match opts.kind {
        Kind::Audio => run_audio(&opts)?,
        Kind::Video => run_video(&opts)?,
    };
    info!("ingest stats: {}", serde_json::to_string(&stats)?);
    Ok(())
}

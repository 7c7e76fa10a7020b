// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Sample ingest tests.
//!
//! Each test plays the upstream source: it negotiates a format, delivers
//! samples and inspects what reached a recording consumer.
//!
//! # Test Coverage
//!
//! - Buffer contents, timestamps and durations
//! - Per-sample failures and that they never reach the consumer
//! - Consumer failures and panics are advisory
//! - Ingest statistics
//! - Delivery from several threads

use std::sync::{Arc, Mutex};
use std::thread;

use capture_format::{
    FORMAT_WAVE_FORMAT_EX, MEDIASUBTYPE_PCM, MEDIATYPE_AUDIO, MediaType, WaveFormatEx,
    time::{media_time_to_milliseconds, milliseconds_to_media_time},
};
use capture_sink::{
    AudioBuffer, AudioConfig, AudioSinkEndpoint, ConsumerError, IngestError, IngestStats,
    MediaSample, PixelFormat, RawSample, RunState, SampleTimes, SamplesCallback, VideoConfig,
    VideoFrame, VideoSinkEndpoint,
};

/// Ensures logging is initialized only once across all tests.
static LOG_ONCE: std::sync::Once = std::sync::Once::new();

fn setup_logging() {
    LOG_ONCE.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::builder()
                    .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                    .from_env_lossy(),
            )
            .init();
    });
}

/// Consumer that keeps a copy of every buffer it receives.
struct Recorder<B> {
    received: Arc<Mutex<Vec<B>>>,
    status: i32,
}

impl<B: Clone + Send> SamplesCallback<B> for Recorder<B> {
    fn on_samples_received(&mut self, buffer: &B) -> Result<(), ConsumerError> {
        self.received.lock().unwrap().push(buffer.clone());
        match self.status {
            0 => Ok(()),
            status => Err(ConsumerError::new(status)),
        }
    }
}

fn recorder<B>(status: i32) -> (Recorder<B>, Arc<Mutex<Vec<B>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    (
        Recorder {
            received: Arc::clone(&received),
            status,
        },
        received,
    )
}

fn pcm_stereo() -> MediaType {
    MediaType::new(MEDIATYPE_AUDIO)
        .with_subtype(MEDIASUBTYPE_PCM)
        .with_format(
            FORMAT_WAVE_FORMAT_EX,
            WaveFormatEx::pcm(2, 44_100, 16).to_bytes(),
        )
}

fn connected_audio(status: i32) -> (AudioSinkEndpoint, Arc<Mutex<Vec<AudioBuffer>>>) {
    setup_logging();
    let (consumer, received) = recorder(status);
    let endpoint = AudioSinkEndpoint::new(consumer);
    endpoint.propose(&pcm_stereo()).unwrap();
    (endpoint, received)
}

fn connected_video(width: u32, height: u32) -> (VideoSinkEndpoint, Arc<Mutex<Vec<VideoFrame>>>) {
    setup_logging();
    let (consumer, received) = recorder(0);
    let endpoint = VideoSinkEndpoint::new(consumer);
    endpoint
        .set_config(RunState::Stopped, VideoConfig::new(width, height))
        .unwrap();
    endpoint.propose(&endpoint.enumerate(0).unwrap()).unwrap();
    (endpoint, received)
}

/// Sample whose queries can be made to fail.
struct FaultySample {
    payload: Option<Vec<u8>>,
    times: Option<SampleTimes>,
}

impl MediaSample for FaultySample {
    fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    fn times(&self) -> Option<SampleTimes> {
        self.times
    }
}

#[test]
fn audio_sample_is_packaged_and_dispatched_once() {
    let (endpoint, received) = connected_audio(0);
    let payload: Vec<u8> = (0..100).collect();
    let sample = RawSample::new(&payload, SampleTimes::new(1_000, 2_000));

    endpoint
        .on_sample_delivered(RunState::Running, &sample)
        .unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let buffer = &received[0];
    assert_eq!(buffer.timestamp(), media_time_to_milliseconds(1_000));
    assert_eq!(
        buffer.duration(),
        media_time_to_milliseconds(2_000) - media_time_to_milliseconds(1_000)
    );
    assert_eq!(buffer.buffer_length(), 100);
    assert_eq!(buffer.buffer(), payload.as_slice());
    assert_eq!(*buffer.config(), endpoint.config());
}

#[test]
fn audio_times_are_converted_to_milliseconds() {
    let (endpoint, received) = connected_audio(0);
    let start = milliseconds_to_media_time(1_500) + 9_999;
    let end = milliseconds_to_media_time(1_520);
    endpoint
        .on_sample_delivered(
            RunState::Running,
            &RawSample::new(&[0; 16], SampleTimes::new(start, end)),
        )
        .unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received[0].timestamp(), 1_500);
    assert_eq!(received[0].duration(), 20);
}

#[test]
fn empty_or_missing_payload_never_reaches_the_consumer() {
    let (endpoint, received) = connected_audio(0);
    let times = Some(SampleTimes::new(0, 10_000));

    for payload in [None, Some(Vec::new())] {
        let sample = FaultySample { payload, times };
        assert_eq!(
            endpoint.on_sample_delivered(RunState::Running, &sample),
            Err(IngestError::EmptyPayload)
        );
    }
    assert!(received.lock().unwrap().is_empty());
    assert_eq!(endpoint.stats().rejected, 2);
}

#[test]
fn failed_time_query_drops_the_sample() {
    let (endpoint, received) = connected_audio(0);
    let sample = FaultySample {
        payload: Some(vec![1, 2, 3, 4]),
        times: None,
    };
    assert_eq!(
        endpoint.on_sample_delivered(RunState::Running, &sample),
        Err(IngestError::TimeQueryFailed)
    );
    assert!(received.lock().unwrap().is_empty());
}

#[test]
fn stopped_endpoint_drops_samples() {
    let (endpoint, received) = connected_audio(0);
    let sample = RawSample::new(&[0; 4], SampleTimes::new(0, 10_000));
    assert_eq!(
        endpoint.on_sample_delivered(RunState::Stopped, &sample),
        Err(IngestError::WrongState(RunState::Stopped))
    );
    assert!(received.lock().unwrap().is_empty());

    // Transitioning states still accept samples.
    endpoint
        .on_sample_delivered(RunState::Transitioning, &sample)
        .unwrap();
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[test]
fn unconnected_endpoint_drops_samples() {
    setup_logging();
    let (consumer, received) = recorder::<AudioBuffer>(0);
    let endpoint = AudioSinkEndpoint::new(consumer);
    let sample = RawSample::new(&[0; 4], SampleTimes::new(0, 10_000));
    assert_eq!(
        endpoint.on_sample_delivered(RunState::Running, &sample),
        Err(IngestError::NotConnected)
    );
    assert!(received.lock().unwrap().is_empty());
}

#[test]
fn consumer_failure_still_reports_success() {
    let (endpoint, received) = connected_audio(-1);
    let sample = RawSample::new(&[7; 8], SampleTimes::new(0, 10_000));
    for _ in 0..3 {
        endpoint
            .on_sample_delivered(RunState::Running, &sample)
            .unwrap();
    }
    assert_eq!(received.lock().unwrap().len(), 3);
    assert_eq!(
        endpoint.stats(),
        IngestStats {
            delivered: 3,
            dispatched: 0,
            callback_failures: 3,
            rejected: 0,
        }
    );
}

#[test]
fn panicking_consumer_does_not_reach_the_source() {
    setup_logging();
    let mut calls = 0;
    let endpoint = AudioSinkEndpoint::from_fn(move |_: &AudioBuffer| {
        calls += 1;
        if calls == 1 {
            panic!("consumer broke");
        }
        Ok(())
    });
    endpoint.propose(&pcm_stereo()).unwrap();
    let sample = RawSample::new(&[3; 8], SampleTimes::new(0, 10_000));

    assert_eq!(
        endpoint.on_sample_delivered(RunState::Running, &sample),
        Ok(())
    );
    assert_eq!(
        endpoint.stats(),
        IngestStats {
            delivered: 1,
            dispatched: 0,
            callback_failures: 1,
            rejected: 0,
        }
    );

    // The endpoint keeps working once the consumer recovers.
    endpoint
        .on_sample_delivered(RunState::Running, &sample)
        .unwrap();
    assert_eq!(endpoint.stats().dispatched, 1);
    assert!(!endpoint.config().is_empty());
}

#[test]
fn delivered_buffer_keeps_its_format_snapshot() {
    let (endpoint, received) = connected_audio(0);
    endpoint
        .on_sample_delivered(
            RunState::Running,
            &RawSample::new(&[1; 4], SampleTimes::new(0, 10_000)),
        )
        .unwrap();
    let negotiated = endpoint.config();

    endpoint
        .set_config(RunState::Stopped, AudioConfig::default())
        .unwrap();
    assert!(endpoint.config().is_empty());
    assert_eq!(*received.lock().unwrap()[0].config(), negotiated);
}

#[test]
fn video_frame_carries_negotiated_size() {
    let (endpoint, received) = connected_video(320, 240);
    let frame_size = 320 * 240 * 3 / 2;
    let payload = vec![0x80u8; frame_size];
    endpoint
        .on_sample_delivered(
            RunState::Running,
            &RawSample {
                payload: Some(&payload),
                times: Some(SampleTimes::start_only(milliseconds_to_media_time(40))),
            },
        )
        .unwrap();

    let received = received.lock().unwrap();
    let frame = &received[0];
    assert_eq!((frame.width(), frame.height()), (320, 240));
    assert_eq!(frame.format(), PixelFormat::I420);
    assert_eq!(frame.timestamp(), 40);
    assert_eq!(frame.buffer_length(), frame_size);
}

#[test]
fn timestamps_are_monotonic() {
    let (endpoint, received) = connected_video(16, 16);
    let mut start = 0;
    for step in [1, 9_999, 10_000, 3, 123_456, 10_001] {
        start += step;
        endpoint
            .on_sample_delivered(
                RunState::Running,
                &RawSample::new(&[0; 4], SampleTimes::start_only(start)),
            )
            .unwrap();
    }
    let received = received.lock().unwrap();
    assert!(
        received
            .windows(2)
            .all(|pair| pair[0].timestamp() <= pair[1].timestamp())
    );
}

#[test]
fn concurrent_deliveries_are_serialized() {
    let (endpoint, received) = connected_audio(0);
    let endpoint = Arc::new(endpoint);

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let endpoint = Arc::clone(&endpoint);
            thread::spawn(move || {
                for i in 0..50 {
                    let payload = [worker as u8; 32];
                    let start = milliseconds_to_media_time(i * 10);
                    let sample = RawSample::new(&payload, SampleTimes::new(start, start + 100_000));
                    endpoint
                        .on_sample_delivered(RunState::Running, &sample)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 200);
    assert!(
        received
            .iter()
            .all(|buffer| buffer.buffer().iter().all(|b| *b == buffer.buffer()[0]))
    );
    assert_eq!(endpoint.stats().dispatched, 200);
}

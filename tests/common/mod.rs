//! Shared fixtures for integration tests.
//!
//! Provides a representative set of descriptors covering every factory shape,
//! and [`init_tracing`] so `RUST_LOG=streamformat=trace` shows the library's
//! trace output while tests run.

#![allow(dead_code)]

use bytes::Bytes;
use streamformat::{mime, MediaFormat, MATCH_LONGEST_US, NO_VALUE};

/// Install a test subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// H.264 parameter sets (SPS, PPS) for a 1080p High profile stream.
pub fn avc_parameter_sets() -> Vec<Bytes> {
    vec![
        Bytes::from_static(&[0x67, 0x64, 0x00, 0x28, 0xac, 0xd9, 0x40, 0x78]),
        Bytes::from_static(&[0x68, 0xeb, 0xe3, 0xcb, 0x22, 0xc0]),
    ]
}

/// AAC-LC AudioSpecificConfig for 44.1 kHz stereo.
pub fn aac_config() -> Bytes {
    Bytes::from_static(&[0x12, 0x10])
}

/// One descriptor per factory shape, plus an overridden copy.
pub fn sample_formats() -> Vec<MediaFormat> {
    let avc = MediaFormat::video(mime::VIDEO_H264, 1024, 1920, 1080, avc_parameter_sets());
    vec![
        avc.clone(),
        avc.with_max_video_dimensions(3840, 2160),
        MediaFormat::video_builder(mime::VIDEO_H265, 3840, 2160)
            .duration_us(5_400_000_000)
            .rotation_degrees(180)
            .pixel_width_height_ratio(1.0)
            .build(),
        MediaFormat::audio(mime::AUDIO_AAC, NO_VALUE, 2, 44_100, vec![aac_config()]),
        MediaFormat::audio_with_duration(mime::AUDIO_EAC3, 4096, 600_000_000, 6, 48_000, Vec::new()),
        MediaFormat::text(mime::TEXT_VTT, Some("en")),
        MediaFormat::text_with_duration(mime::TEXT_SUBRIP, None, MATCH_LONGEST_US),
        MediaFormat::generic(mime::APPLICATION_ID3),
        MediaFormat::without_mime(1_000_000),
    ]
}

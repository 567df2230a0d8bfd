//! # streamformat
//!
//! Immutable descriptors for the format of a single elementary media stream.
//!
//! A [`MediaFormat`] carries everything a decoder needs to know about a
//! track before the first sample arrives: the mime type identifying the
//! codec, video dimensions or audio sample geometry, duration, and the
//! codec-specific initialization buffers (SPS/PPS, codec private data, ...).
//!
//! Demuxers build descriptors through the typed factories, the pipeline
//! passes them around by value, and decoders either compare them (to decide
//! whether a reconfiguration is needed) or project them onto the platform's
//! key-value format through [`NativeFormatSink`].
//!
//! ## Features
//!
//! - `serialize` - serde derives and bincode snapshots of descriptors
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use streamformat::{keys, mime, MediaFormat, NO_VALUE};
//!
//! let sps = Bytes::from_static(&[0x67, 0x64, 0x00, 0x1f]);
//! let pps = Bytes::from_static(&[0x68, 0xee, 0x3c, 0x80]);
//! let format = MediaFormat::video(mime::VIDEO_H264, 1024, 1920, 1080, vec![sps, pps]);
//!
//! assert_eq!(format.width(), 1920);
//! assert_eq!(format.channel_count(), NO_VALUE);
//!
//! let native = format.to_native_format();
//! assert!(native.contains_key(keys::WIDTH));
//! assert!(native.contains_key("csd-1"));
//! assert!(!native.contains_key(keys::CHANNEL_COUNT));
//! ```

pub mod duration;
pub mod error;
pub mod format;
pub mod mime;
pub mod native;

#[cfg(feature = "serialize")]
pub mod serialize;

// Re-exports
pub use duration::{StreamDuration, MATCH_LONGEST_US, UNKNOWN_TIME_US};
pub use error::{Error, Result};
pub use format::{MediaFormat, VideoFormatBuilder, NO_VALUE, NO_VALUE_F32};
pub use mime::MediaKind;
pub use native::{keys, NativeFormat, NativeFormatSink, NativeValue};

//! Well-known mime types and media kind classification.
//!
//! The constants use the mime strings that platform decoders expect in the
//! `mime` key of a native format.

use std::fmt;

pub const VIDEO_H263: &str = "video/3gpp";
pub const VIDEO_H264: &str = "video/avc";
pub const VIDEO_H265: &str = "video/hevc";
pub const VIDEO_MP4V: &str = "video/mp4v-es";
pub const VIDEO_VP8: &str = "video/x-vnd.on2.vp8";
pub const VIDEO_VP9: &str = "video/x-vnd.on2.vp9";
pub const VIDEO_AV1: &str = "video/av01";

pub const AUDIO_AAC: &str = "audio/mp4a-latm";
pub const AUDIO_MPEG: &str = "audio/mpeg";
pub const AUDIO_RAW: &str = "audio/raw";
pub const AUDIO_AC3: &str = "audio/ac3";
pub const AUDIO_EAC3: &str = "audio/eac3";
pub const AUDIO_DTS: &str = "audio/vnd.dts";
pub const AUDIO_OPUS: &str = "audio/opus";
pub const AUDIO_VORBIS: &str = "audio/vorbis";
pub const AUDIO_FLAC: &str = "audio/flac";

pub const TEXT_VTT: &str = "text/vtt";
pub const TEXT_SUBRIP: &str = "application/x-subrip";

pub const APPLICATION_TTML: &str = "application/ttml+xml";
pub const APPLICATION_EIA608: &str = "application/eia-608";
pub const APPLICATION_ID3: &str = "application/id3";

/// Top-level kind of an elementary stream, derived from its mime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum MediaKind {
    Video,
    Audio,
    Text,
    Application,
    Unknown,
}

impl MediaKind {
    /// Classify a mime type by its top-level type (`video/...`, `audio/...`).
    pub fn from_mime(mime: &str) -> Self {
        let top_level = match mime.split_once('/') {
            Some((top, _)) => top,
            None => return Self::Unknown,
        };

        if top_level.eq_ignore_ascii_case("video") {
            Self::Video
        } else if top_level.eq_ignore_ascii_case("audio") {
            Self::Audio
        } else if top_level.eq_ignore_ascii_case("text") {
            Self::Text
        } else if top_level.eq_ignore_ascii_case("application") {
            Self::Application
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
            Self::Text => write!(f, "text"),
            Self::Application => write!(f, "application"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

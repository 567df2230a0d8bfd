//! Stream duration with its two reserved sentinels.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// Raw duration value meaning the duration is unknown.
pub const UNKNOWN_TIME_US: i64 = -1;

/// Raw duration value meaning the track should last as long as the longest
/// sibling track whose duration is known.
pub const MATCH_LONGEST_US: i64 = -2;

/// Duration of an elementary stream, in microseconds.
///
/// Equality and hashing go through [`as_us`](Self::as_us), so
/// `Micros(UNKNOWN_TIME_US)` and `Unknown` are the same duration. Use
/// [`from_us`](Self::from_us) to get the canonical variant for a raw value.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "i64", into = "i64")
)]
pub enum StreamDuration {
    /// Duration is not known.
    #[default]
    Unknown,
    /// Match the longest sibling track with a known duration.
    MatchLongest,
    /// Known duration in microseconds.
    Micros(i64),
}

impl StreamDuration {
    /// Map a raw microsecond value, including the sentinels, to a duration.
    pub fn from_us(us: i64) -> Self {
        match us {
            UNKNOWN_TIME_US => Self::Unknown,
            MATCH_LONGEST_US => Self::MatchLongest,
            us => Self::Micros(us),
        }
    }

    /// Raw microsecond value, with sentinels for the non-numeric variants.
    pub fn as_us(self) -> i64 {
        match self {
            Self::Unknown => UNKNOWN_TIME_US,
            Self::MatchLongest => MATCH_LONGEST_US,
            Self::Micros(us) => us,
        }
    }

    /// Whether the duration is anything other than unknown.
    pub fn is_known(self) -> bool {
        self.as_us() != UNKNOWN_TIME_US
    }

    /// Convert a concrete, non-negative duration to [`Duration`].
    pub fn to_duration(self) -> Option<Duration> {
        match Self::from_us(self.as_us()) {
            Self::Micros(us) if us >= 0 => Some(Duration::from_micros(us as u64)),
            _ => None,
        }
    }
}

impl PartialEq for StreamDuration {
    fn eq(&self, other: &Self) -> bool {
        self.as_us() == other.as_us()
    }
}

impl Eq for StreamDuration {}

impl Hash for StreamDuration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_us().hash(state);
    }
}

impl From<i64> for StreamDuration {
    fn from(us: i64) -> Self {
        Self::from_us(us)
    }
}

impl From<StreamDuration> for i64 {
    fn from(duration: StreamDuration) -> Self {
        duration.as_us()
    }
}

impl From<Duration> for StreamDuration {
    fn from(duration: Duration) -> Self {
        Self::Micros(i64::try_from(duration.as_micros()).unwrap_or(i64::MAX))
    }
}

impl fmt::Display for StreamDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Self::from_us(self.as_us()) {
            Self::Unknown => write!(f, "unknown"),
            Self::MatchLongest => write!(f, "match-longest"),
            Self::Micros(us) => write!(f, "{us}us"),
        }
    }
}

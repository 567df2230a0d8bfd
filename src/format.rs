//! The elementary stream format descriptor.
//!
//! [`MediaFormat`] is immutable once built. Fields that do not apply to a
//! stream hold an "unset" sentinel at the API boundary ([`NO_VALUE`] for
//! integers, `None` for strings, [`StreamDuration::Unknown`] for the
//! duration) and are stored as `Option` internally, so a legitimate `0`
//! never reads as unset.
//!
//! Two derived values are memoized on first use: the hash code and the
//! native projection. Both are pure functions of the fields, so the caches
//! are shared freely between threads and never participate in equality.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use bytes::Bytes;
use xxhash_rust::xxh3::Xxh3Default;

use crate::duration::{StreamDuration, UNKNOWN_TIME_US};
use crate::mime::MediaKind;
use crate::native::{keys, NativeFormat, NativeFormatSink, NativeValue};
use crate::{Error, Result};

/// Value of an integer field that does not apply or is not known.
pub const NO_VALUE: i32 = -1;

/// Value of the pixel aspect ratio when it is not known.
pub const NO_VALUE_F32: f32 = NO_VALUE as f32;

fn present(value: i32) -> Option<i32> {
    (value != NO_VALUE).then_some(value)
}

/// The format of a single elementary stream.
///
/// Build one through a factory ([`video`](Self::video),
/// [`audio`](Self::audio), [`text`](Self::text), [`generic`](Self::generic))
/// or [`video_builder`](Self::video_builder). The only derived copy is
/// [`with_max_video_dimensions`](Self::with_max_video_dimensions).
#[derive(Clone)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "RawFields", into = "RawFields")
)]
pub struct MediaFormat {
    mime_type: Option<String>,
    max_input_size: Option<i32>,
    duration: StreamDuration,
    width: Option<i32>,
    height: Option<i32>,
    rotation_degrees: Option<i32>,
    pixel_width_height_ratio: f32,
    channel_count: Option<i32>,
    sample_rate: Option<i32>,
    language: Option<String>,
    initialization_data: Vec<Bytes>,
    max_width: Option<i32>,
    max_height: Option<i32>,
    hash: OnceLock<u64>,
    native: OnceLock<NativeFormat>,
}

/// Every field of a [`MediaFormat`] in its boundary representation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct RawFields {
    mime_type: Option<String>,
    max_input_size: i32,
    duration_us: i64,
    width: i32,
    height: i32,
    rotation_degrees: i32,
    #[cfg_attr(feature = "serialize", serde(with = "ratio_bits"))]
    pixel_width_height_ratio: f32,
    channel_count: i32,
    sample_rate: i32,
    language: Option<String>,
    initialization_data: Vec<Bytes>,
    max_width: i32,
    max_height: i32,
}

impl RawFields {
    fn unset(mime_type: Option<String>) -> Self {
        Self {
            mime_type,
            max_input_size: NO_VALUE,
            duration_us: UNKNOWN_TIME_US,
            width: NO_VALUE,
            height: NO_VALUE,
            rotation_degrees: NO_VALUE,
            pixel_width_height_ratio: NO_VALUE_F32,
            channel_count: NO_VALUE,
            sample_rate: NO_VALUE,
            language: None,
            initialization_data: Vec::new(),
            max_width: NO_VALUE,
            max_height: NO_VALUE,
        }
    }
}

/// The pixel ratio travels as its bit pattern so NaN survives text formats.
#[cfg(feature = "serialize")]
mod ratio_bits {
    pub fn serialize<S: serde::Serializer>(ratio: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(ratio.to_bits())
    }

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        <u32 as serde::Deserialize>::deserialize(deserializer).map(f32::from_bits)
    }
}

impl From<RawFields> for MediaFormat {
    fn from(raw: RawFields) -> Self {
        Self {
            mime_type: raw.mime_type,
            max_input_size: present(raw.max_input_size),
            duration: StreamDuration::from_us(raw.duration_us),
            width: present(raw.width),
            height: present(raw.height),
            rotation_degrees: present(raw.rotation_degrees),
            pixel_width_height_ratio: raw.pixel_width_height_ratio,
            channel_count: present(raw.channel_count),
            sample_rate: present(raw.sample_rate),
            language: raw.language,
            initialization_data: raw.initialization_data,
            max_width: present(raw.max_width),
            max_height: present(raw.max_height),
            hash: OnceLock::new(),
            native: OnceLock::new(),
        }
    }
}

impl From<MediaFormat> for RawFields {
    fn from(format: MediaFormat) -> Self {
        Self {
            max_input_size: format.max_input_size(),
            duration_us: format.duration_us(),
            width: format.width(),
            height: format.height(),
            rotation_degrees: format.rotation_degrees(),
            pixel_width_height_ratio: format.pixel_width_height_ratio,
            channel_count: format.channel_count(),
            sample_rate: format.sample_rate(),
            max_width: format.max_width(),
            max_height: format.max_height(),
            mime_type: format.mime_type,
            language: format.language,
            initialization_data: format.initialization_data,
        }
    }
}

impl MediaFormat {
    // ------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------

    /// Create a video format with unknown duration, rotation and pixel ratio.
    pub fn video(
        mime_type: impl Into<String>,
        max_input_size: i32,
        width: i32,
        height: i32,
        initialization_data: Vec<Bytes>,
    ) -> Self {
        Self::video_builder(mime_type, width, height)
            .max_input_size(max_input_size)
            .initialization_data(initialization_data)
            .build()
    }

    /// Start a video format with the optional fields unset.
    pub fn video_builder(mime_type: impl Into<String>, width: i32, height: i32) -> VideoFormatBuilder {
        VideoFormatBuilder::new(mime_type.into(), width, height)
    }

    /// Create an audio format with unknown duration.
    pub fn audio(
        mime_type: impl Into<String>,
        max_input_size: i32,
        channel_count: i32,
        sample_rate: i32,
        initialization_data: Vec<Bytes>,
    ) -> Self {
        Self::audio_with_duration(
            mime_type,
            max_input_size,
            UNKNOWN_TIME_US,
            channel_count,
            sample_rate,
            initialization_data,
        )
    }

    /// Create an audio format.
    pub fn audio_with_duration(
        mime_type: impl Into<String>,
        max_input_size: i32,
        duration_us: i64,
        channel_count: i32,
        sample_rate: i32,
        initialization_data: Vec<Bytes>,
    ) -> Self {
        Self::from(RawFields {
            max_input_size,
            duration_us,
            channel_count,
            sample_rate,
            initialization_data,
            ..RawFields::unset(Some(mime_type.into()))
        })
    }

    /// Create a text format with unknown duration.
    pub fn text(mime_type: impl Into<String>, language: Option<&str>) -> Self {
        Self::text_with_duration(mime_type, language, UNKNOWN_TIME_US)
    }

    /// Create a text format. Only mime type, language and duration are set.
    pub fn text_with_duration(
        mime_type: impl Into<String>,
        language: Option<&str>,
        duration_us: i64,
    ) -> Self {
        Self::from(RawFields {
            duration_us,
            language: language.map(str::to_owned),
            ..RawFields::unset(Some(mime_type.into()))
        })
    }

    /// Create a format that only identifies the mime type.
    pub fn generic(mime_type: impl Into<String>) -> Self {
        Self::generic_with_duration(mime_type, UNKNOWN_TIME_US)
    }

    /// Create a format that only identifies the mime type and duration.
    pub fn generic_with_duration(mime_type: impl Into<String>, duration_us: i64) -> Self {
        Self::from(RawFields {
            duration_us,
            ..RawFields::unset(Some(mime_type.into()))
        })
    }

    /// Create a placeholder for a track whose codec has no known mime type.
    pub fn without_mime(duration_us: i64) -> Self {
        Self::from(RawFields {
            duration_us,
            ..RawFields::unset(None)
        })
    }

    /// Copy this format with different maximum output dimensions.
    ///
    /// Initialization buffers are shared with `self`, not copied.
    pub fn with_max_video_dimensions(&self, max_width: i32, max_height: i32) -> Self {
        Self {
            mime_type: self.mime_type.clone(),
            max_input_size: self.max_input_size,
            duration: self.duration,
            width: self.width,
            height: self.height,
            rotation_degrees: self.rotation_degrees,
            pixel_width_height_ratio: self.pixel_width_height_ratio,
            channel_count: self.channel_count,
            sample_rate: self.sample_rate,
            language: self.language.clone(),
            initialization_data: self.initialization_data.clone(),
            max_width: present(max_width),
            max_height: present(max_height),
            hash: OnceLock::new(),
            native: OnceLock::new(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Media kind derived from the mime type.
    pub fn kind(&self) -> MediaKind {
        self.mime_type
            .as_deref()
            .map_or(MediaKind::Unknown, MediaKind::from_mime)
    }

    pub fn max_input_size(&self) -> i32 {
        self.max_input_size.unwrap_or(NO_VALUE)
    }

    pub fn duration(&self) -> StreamDuration {
        self.duration
    }

    /// Duration in microseconds, or one of the duration sentinels.
    pub fn duration_us(&self) -> i64 {
        self.duration.as_us()
    }

    pub fn width(&self) -> i32 {
        self.width.unwrap_or(NO_VALUE)
    }

    pub fn height(&self) -> i32 {
        self.height.unwrap_or(NO_VALUE)
    }

    pub fn rotation_degrees(&self) -> i32 {
        self.rotation_degrees.unwrap_or(NO_VALUE)
    }

    /// Pixel aspect ratio, or [`NO_VALUE_F32`].
    pub fn pixel_width_height_ratio(&self) -> f32 {
        self.pixel_width_height_ratio
    }

    pub fn channel_count(&self) -> i32 {
        self.channel_count.unwrap_or(NO_VALUE)
    }

    pub fn sample_rate(&self) -> i32 {
        self.sample_rate.unwrap_or(NO_VALUE)
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Codec-specific initialization buffers, in order.
    pub fn initialization_data(&self) -> &[Bytes] {
        &self.initialization_data
    }

    pub fn max_width(&self) -> i32 {
        self.max_width.unwrap_or(NO_VALUE)
    }

    pub fn max_height(&self) -> i32 {
        self.max_height.unwrap_or(NO_VALUE)
    }

    // ------------------------------------------------------------------
    // Equality and hashing
    // ------------------------------------------------------------------

    /// Compare every field except the maximum output dimensions.
    ///
    /// Two formats that only differ in max dimensions describe the same
    /// stream; use this to decide whether a decoder must be reconfigured.
    pub fn eq_ignoring_max_dimensions(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.fields_eq(other, true)
    }

    fn fields_eq(&self, other: &Self, ignore_max_dimensions: bool) -> bool {
        self.max_input_size == other.max_input_size
            && self.width == other.width
            && self.height == other.height
            && self.rotation_degrees == other.rotation_degrees
            && self.pixel_width_height_ratio.to_bits() == other.pixel_width_height_ratio.to_bits()
            && (ignore_max_dimensions
                || (self.max_width == other.max_width && self.max_height == other.max_height))
            && self.duration == other.duration
            && self.channel_count == other.channel_count
            && self.sample_rate == other.sample_rate
            && self.language == other.language
            && self.mime_type == other.mime_type
            && self.initialization_data == other.initialization_data
    }

    /// Hash code over every field compared by `==`.
    ///
    /// Computed on first call and cached. Fields are fed to xxh3 as
    /// little-endian bytes with `u64` length prefixes, so the value is the
    /// same across processes, pointer widths and byte orders.
    pub fn hash_code(&self) -> u64 {
        *self.hash.get_or_init(|| {
            let mut hasher = Xxh3Default::new();
            write_str(&mut hasher, self.mime_type.as_deref());
            write_i32(&mut hasher, self.max_input_size);
            write_i32(&mut hasher, self.width);
            write_i32(&mut hasher, self.height);
            write_i32(&mut hasher, self.rotation_degrees);
            hasher.write(&self.pixel_width_height_ratio.to_bits().to_le_bytes());
            hasher.write(&self.duration.as_us().to_le_bytes());
            write_i32(&mut hasher, self.max_width);
            write_i32(&mut hasher, self.max_height);
            write_i32(&mut hasher, self.channel_count);
            write_i32(&mut hasher, self.sample_rate);
            write_str(&mut hasher, self.language.as_deref());
            write_len(&mut hasher, self.initialization_data.len());
            for buffer in &self.initialization_data {
                write_len(&mut hasher, buffer.len());
                hasher.write(buffer);
            }
            hasher.finish()
        })
    }

    // ------------------------------------------------------------------
    // Native projection
    // ------------------------------------------------------------------

    /// Write this format into a platform format.
    ///
    /// Unset fields are skipped entirely: a decoder would read a written
    /// sentinel as a real value.
    pub fn write_native<S: NativeFormatSink + ?Sized>(&self, sink: &mut S) {
        if let Some(mime_type) = &self.mime_type {
            sink.set_string(keys::MIME, mime_type);
        }
        if let Some(language) = &self.language {
            sink.set_string(keys::LANGUAGE, language);
        }
        set_integer_if_present(sink, keys::MAX_INPUT_SIZE, self.max_input_size);
        set_integer_if_present(sink, keys::WIDTH, self.width);
        set_integer_if_present(sink, keys::HEIGHT, self.height);
        set_integer_if_present(sink, keys::ROTATION_DEGREES, self.rotation_degrees);
        set_integer_if_present(sink, keys::MAX_WIDTH, self.max_width);
        set_integer_if_present(sink, keys::MAX_HEIGHT, self.max_height);
        set_integer_if_present(sink, keys::CHANNEL_COUNT, self.channel_count);
        set_integer_if_present(sink, keys::SAMPLE_RATE, self.sample_rate);
        for (index, buffer) in self.initialization_data.iter().enumerate() {
            sink.set_byte_buffer(&keys::csd(index), buffer.clone());
        }
        if self.duration.is_known() {
            sink.set_long(keys::DURATION, self.duration.as_us());
        }
    }

    /// The native projection of this format, built on first call.
    pub fn to_native_format(&self) -> &NativeFormat {
        self.native.get_or_init(|| {
            let mut native = NativeFormat::new();
            self.write_native(&mut native);
            tracing::trace!(
                mime = self.mime_type.as_deref().unwrap_or("none"),
                entries = native.len(),
                "Built native format"
            );
            native
        })
    }

    /// Read a format back from a platform format, e.g. a decoder's output
    /// format.
    ///
    /// Missing keys leave the field unset. Codec-specific data is read from
    /// `csd-0` upward until the first missing index. The pixel aspect ratio
    /// has no native key and is always unset.
    pub fn from_native_format(native: &NativeFormat) -> Result<Self> {
        let mut initialization_data = Vec::new();
        while let Some(buffer) = native.get_byte_buffer(&keys::csd(initialization_data.len()))? {
            initialization_data.push(buffer);
        }

        let duration_us = match native.get(keys::DURATION) {
            None => UNKNOWN_TIME_US,
            Some(NativeValue::Long(us)) => *us,
            Some(NativeValue::Integer(us)) => i64::from(*us),
            Some(other) => {
                return Err(Error::value_type(keys::DURATION, "long", other.type_name()));
            }
        };

        let format = Self::from(RawFields {
            mime_type: native.get_string(keys::MIME)?.map(str::to_owned),
            max_input_size: integer_or_unset(native, keys::MAX_INPUT_SIZE)?,
            duration_us,
            width: integer_or_unset(native, keys::WIDTH)?,
            height: integer_or_unset(native, keys::HEIGHT)?,
            rotation_degrees: integer_or_unset(native, keys::ROTATION_DEGREES)?,
            pixel_width_height_ratio: NO_VALUE_F32,
            channel_count: integer_or_unset(native, keys::CHANNEL_COUNT)?,
            sample_rate: integer_or_unset(native, keys::SAMPLE_RATE)?,
            language: native.get_string(keys::LANGUAGE)?.map(str::to_owned),
            initialization_data,
            max_width: integer_or_unset(native, keys::MAX_WIDTH)?,
            max_height: integer_or_unset(native, keys::MAX_HEIGHT)?,
        });

        tracing::debug!(%format, "Read format from native format");
        Ok(format)
    }
}

fn set_integer_if_present<S: NativeFormatSink + ?Sized>(sink: &mut S, key: &str, value: Option<i32>) {
    if let Some(value) = value {
        sink.set_integer(key, value);
    }
}

fn integer_or_unset(native: &NativeFormat, key: &str) -> Result<i32> {
    Ok(native.get_integer(key)?.unwrap_or(NO_VALUE))
}

impl PartialEq for MediaFormat {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.fields_eq(other, false)
    }
}

// The pixel ratio is compared by bit pattern, so equality is reflexive.
impl Eq for MediaFormat {}

impl Hash for MediaFormat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl fmt::Debug for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFormat")
            .field("mime_type", &self.mime_type)
            .field("max_input_size", &self.max_input_size)
            .field("duration", &self.duration)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rotation_degrees", &self.rotation_degrees)
            .field("pixel_width_height_ratio", &self.pixel_width_height_ratio)
            .field("channel_count", &self.channel_count)
            .field("sample_rate", &self.sample_rate)
            .field("language", &self.language)
            .field("initialization_data", &self.initialization_data)
            .field("max_width", &self.max_width)
            .field("max_height", &self.max_height)
            .finish()
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MediaFormat({}, {}, {}, {}, {}, {:?}, {}, {}, {}, {}, {}, {})",
            self.mime_type.as_deref().unwrap_or("none"),
            self.max_input_size(),
            self.width(),
            self.height(),
            self.rotation_degrees(),
            self.pixel_width_height_ratio,
            self.channel_count(),
            self.sample_rate(),
            self.language.as_deref().unwrap_or("none"),
            self.duration_us(),
            self.max_width(),
            self.max_height(),
        )
    }
}

/// Builder for video formats that need duration, rotation or pixel ratio.
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoFormatBuilder {
    fields: RawFields,
}

impl VideoFormatBuilder {
    fn new(mime_type: String, width: i32, height: i32) -> Self {
        Self {
            fields: RawFields {
                width,
                height,
                ..RawFields::unset(Some(mime_type))
            },
        }
    }

    pub fn max_input_size(mut self, max_input_size: i32) -> Self {
        self.fields.max_input_size = max_input_size;
        self
    }

    /// Duration in microseconds; the duration sentinels are accepted.
    pub fn duration_us(mut self, duration_us: i64) -> Self {
        self.fields.duration_us = duration_us;
        self
    }

    pub fn rotation_degrees(mut self, rotation_degrees: i32) -> Self {
        self.fields.rotation_degrees = rotation_degrees;
        self
    }

    pub fn pixel_width_height_ratio(mut self, ratio: f32) -> Self {
        self.fields.pixel_width_height_ratio = ratio;
        self
    }

    pub fn initialization_data(mut self, initialization_data: Vec<Bytes>) -> Self {
        self.fields.initialization_data = initialization_data;
        self
    }

    pub fn build(self) -> MediaFormat {
        MediaFormat::from(self.fields)
    }
}

fn write_len(hasher: &mut Xxh3Default, len: usize) {
    hasher.write(&(len as u64).to_le_bytes());
}

fn write_i32(hasher: &mut Xxh3Default, value: Option<i32>) {
    match value {
        Some(value) => {
            hasher.write(&[1]);
            hasher.write(&value.to_le_bytes());
        }
        None => hasher.write(&[0]),
    }
}

fn write_str(hasher: &mut Xxh3Default, value: Option<&str>) {
    match value {
        Some(value) => {
            hasher.write(&[1]);
            write_len(hasher, value.len());
            hasher.write(value.as_bytes());
        }
        None => hasher.write(&[0]),
    }
}

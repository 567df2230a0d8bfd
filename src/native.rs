//! Projection target for platform decoders.
//!
//! Platform decoder APIs take their configuration as a flat key-value format
//! with string, integer, long and byte-buffer values. [`NativeFormatSink`] is
//! that interface; [`NativeFormat`] is the in-crate implementation that
//! [`MediaFormat::to_native_format`](crate::MediaFormat::to_native_format)
//! memoizes.

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::{Error, Result};

/// Key vocabulary understood by platform decoders.
pub mod keys {
    pub const MIME: &str = "mime";
    pub const LANGUAGE: &str = "language";
    pub const MAX_INPUT_SIZE: &str = "max-input-size";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const ROTATION_DEGREES: &str = "rotation-degrees";
    pub const MAX_WIDTH: &str = "max-width";
    pub const MAX_HEIGHT: &str = "max-height";
    pub const CHANNEL_COUNT: &str = "channel-count";
    pub const SAMPLE_RATE: &str = "sample-rate";
    pub const DURATION: &str = "durationUs";

    /// Key of the `index`-th codec-specific data buffer (`csd-0`, `csd-1`, ...).
    pub fn csd(index: usize) -> String {
        format!("csd-{index}")
    }
}

/// A platform format that accepts typed key-value pairs.
pub trait NativeFormatSink {
    fn set_string(&mut self, key: &str, value: &str);
    fn set_integer(&mut self, key: &str, value: i32);
    fn set_long(&mut self, key: &str, value: i64);
    fn set_byte_buffer(&mut self, key: &str, value: Bytes);
}

/// A single value stored in a [`NativeFormat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeValue {
    String(String),
    Integer(i32),
    Long(i64),
    ByteBuffer(Bytes),
}

impl NativeValue {
    /// Name of the value type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Long(_) => "long",
            Self::ByteBuffer(_) => "byte buffer",
        }
    }
}

/// Key-value media format, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeFormat {
    entries: BTreeMap<String, NativeValue>,
}

impl NativeFormat {
    /// Create an empty format.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&NativeValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NativeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get a string value. Fails if the key holds another type.
    pub fn get_string(&self, key: &str) -> Result<Option<&str>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(NativeValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(Error::value_type(key, "string", other.type_name())),
        }
    }

    /// Get an integer value. Fails if the key holds another type.
    pub fn get_integer(&self, key: &str) -> Result<Option<i32>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(NativeValue::Integer(v)) => Ok(Some(*v)),
            Some(other) => Err(Error::value_type(key, "integer", other.type_name())),
        }
    }

    /// Get a long value. Fails if the key holds another type.
    pub fn get_long(&self, key: &str) -> Result<Option<i64>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(NativeValue::Long(v)) => Ok(Some(*v)),
            Some(other) => Err(Error::value_type(key, "long", other.type_name())),
        }
    }

    /// Get a byte buffer. The returned [`Bytes`] shares the stored buffer.
    pub fn get_byte_buffer(&self, key: &str) -> Result<Option<Bytes>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(NativeValue::ByteBuffer(b)) => Ok(Some(b.clone())),
            Some(other) => Err(Error::value_type(key, "byte buffer", other.type_name())),
        }
    }
}

impl NativeFormatSink for NativeFormat {
    fn set_string(&mut self, key: &str, value: &str) {
        self.entries
            .insert(key.to_owned(), NativeValue::String(value.to_owned()));
    }

    fn set_integer(&mut self, key: &str, value: i32) {
        self.entries.insert(key.to_owned(), NativeValue::Integer(value));
    }

    fn set_long(&mut self, key: &str, value: i64) {
        self.entries.insert(key.to_owned(), NativeValue::Long(value));
    }

    fn set_byte_buffer(&mut self, key: &str, value: Bytes) {
        self.entries
            .insert(key.to_owned(), NativeValue::ByteBuffer(value));
    }
}

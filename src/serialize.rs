//! Binary snapshots of format descriptors.
//!
//! Snapshots store the boundary representation of every field, so sentinel
//! values are normalized again on decode. The pixel ratio is stored as its
//! `f32` bit pattern. Cached state is never stored.

use crate::format::MediaFormat;
use crate::{Error, Result};

/// Encode a format as a bincode snapshot.
pub fn encode(format: &MediaFormat) -> Result<Vec<u8>> {
    bincode::serialize(format).map_err(Error::serialization)
}

/// Decode a format from a bincode snapshot.
pub fn decode(bytes: &[u8]) -> Result<MediaFormat> {
    let format: MediaFormat = bincode::deserialize(bytes).map_err(Error::serialization)?;
    tracing::trace!(%format, len = bytes.len(), "Decoded format snapshot");
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mime, MATCH_LONGEST_US, NO_VALUE};
    use bytes::Bytes;

    #[test]
    fn snapshot_round_trip() {
        let format = MediaFormat::video_builder(mime::VIDEO_H264, 1280, 720)
            .max_input_size(65_536)
            .duration_us(MATCH_LONGEST_US)
            .rotation_degrees(270)
            .pixel_width_height_ratio(1.5)
            .initialization_data(vec![Bytes::from_static(&[0x67, 0x42]), Bytes::from_static(&[0x68])])
            .build()
            .with_max_video_dimensions(1920, 1080);

        let bytes = encode(&format).unwrap();
        let back = decode(&bytes).unwrap();
        assert_eq!(back, format);
        assert_eq!(back.hash_code(), format.hash_code());
    }

    #[test]
    fn snapshot_keeps_absent_strings() {
        let format = MediaFormat::without_mime(42);
        let back = decode(&encode(&format).unwrap()).unwrap();
        assert_eq!(back.mime_type(), None);
        assert_eq!(back.language(), None);
        assert_eq!(back.width(), NO_VALUE);
    }

    #[test]
    fn truncated_snapshot_is_an_error() {
        let bytes = encode(&MediaFormat::text(mime::TEXT_VTT, Some("en"))).unwrap();
        let err = decode(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn json_uses_boundary_values() {
        let format = MediaFormat::audio(mime::AUDIO_AAC, NO_VALUE, 2, 44_100, Vec::new());
        let json = serde_json::to_value(&format).unwrap();

        assert_eq!(json["mime_type"], "audio/mp4a-latm");
        assert_eq!(json["max_input_size"], -1);
        assert_eq!(json["duration_us"], -1);
        assert_eq!(json["channel_count"], 2);

        let back: MediaFormat = serde_json::from_value(json).unwrap();
        assert_eq!(back, format);
    }

    #[test]
    fn json_keeps_nan_pixel_ratio() {
        let format = MediaFormat::video_builder(mime::VIDEO_H264, 640, 480)
            .pixel_width_height_ratio(f32::NAN)
            .build();
        let json = serde_json::to_string(&format).unwrap();
        let back: MediaFormat = serde_json::from_str(&json).unwrap();

        assert!(back.pixel_width_height_ratio().is_nan());
        assert_eq!(back, format);
        assert_eq!(back.hash_code(), format.hash_code());
    }
}

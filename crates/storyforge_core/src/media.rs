//! Binary media payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

/// Raw media bytes with an explicit media type.
///
/// Payloads serialize with the bytes base64-encoded.
///
/// # Examples
///
/// ```
/// use storyforge_core::MediaPayload;
///
/// let image = MediaPayload::new("image/png", vec![0x89, 0x50, 0x4E, 0x47]);
/// assert_eq!(image.mime(), "image/png");
/// assert_eq!(image.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaPayload {
    mime: String,
    #[serde(serialize_with = "encode_bytes", deserialize_with = "decode_bytes")]
    data: Vec<u8>,
}

impl MediaPayload {
    /// Wrap bytes with their media type.
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            data,
        }
    }

    /// Media type, e.g. `image/png`.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when there are no bytes or no media type.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() || self.mime.trim().is_empty()
    }

    /// Bytes as standard base64, the form inline media takes on the wire.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// Infer a media type from a file extension, defaulting to `image/png`.
    ///
    /// ```
    /// use storyforge_core::MediaPayload;
    ///
    /// assert_eq!(MediaPayload::mime_for_path("face.JPG"), "image/jpeg");
    /// assert_eq!(MediaPayload::mime_for_path("ref.mp4"), "video/mp4");
    /// assert_eq!(MediaPayload::mime_for_path("unknown"), "image/png");
    /// ```
    pub fn mime_for_path(path: impl AsRef<Path>) -> &'static str {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            Some("heic") => "image/heic",
            Some("mp4") => "video/mp4",
            Some("webm") => "video/webm",
            Some("mov") => "video/quicktime",
            _ => "image/png",
        }
    }

    /// Conventional file extension for this payload's media type.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            "video/mp4" => "mp4",
            "video/webm" => "webm",
            _ => "png",
        }
    }
}

fn encode_bytes<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&STANDARD.encode(data))
}

fn decode_bytes<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = String::deserialize(deserializer)?;
    STANDARD
        .decode(encoded.as_bytes())
        .map_err(serde::de::Error::custom)
}

//! Base64-encoded board image payload.
//!
//! The `.mip` format stores the board photograph as a base64 string of
//! PNG bytes so the whole project stays a single JSON document. Pixel
//! work is delegated to the `image` crate; this type only carries the
//! encoded payload in and out.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use mipkit_core::PersistenceError;

/// Board image as a base64 PNG string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageBlob {
    encoded: String,
}

impl ImageBlob {
    /// Wrap raw PNG bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            encoded: STANDARD.encode(bytes),
        }
    }

    /// Decode back to raw PNG bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistenceError> {
        STANDARD
            .decode(&self.encoded)
            .map_err(|e| PersistenceError::InvalidImagePayload {
                reason: e.to_string(),
            })
    }

    /// Encode a decoded image as PNG.
    pub fn from_image(image: &image::DynamicImage) -> Result<Self, PersistenceError> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| PersistenceError::InvalidImagePayload {
                reason: e.to_string(),
            })?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Decode the payload into an image.
    pub fn to_image(&self) -> Result<image::DynamicImage, PersistenceError> {
        let bytes = self.to_bytes()?;
        image::load_from_memory(&bytes).map_err(|e| PersistenceError::InvalidImagePayload {
            reason: e.to_string(),
        })
    }

    /// Length of the encoded string.
    pub fn encoded_len(&self) -> usize {
        self.encoded.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_round_trip() {
        let payload = b"\x89PNG\r\n\x1a\nfake image bytes";
        let blob = ImageBlob::from_bytes(payload);
        assert_eq!(blob.to_bytes().expect("decode"), payload);
    }

    #[test]
    fn test_image_round_trip() {
        let image = image::DynamicImage::new_rgb8(4, 3);
        let blob = ImageBlob::from_image(&image).expect("encode");
        let restored = blob.to_image().expect("decode");
        assert_eq!(restored.width(), 4);
        assert_eq!(restored.height(), 3);
    }

    #[test]
    fn test_invalid_payload() {
        let blob: ImageBlob = serde_json::from_str("\"not-base64!!\"").expect("deserialize");
        assert!(blob.to_bytes().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let blob = ImageBlob::from_bytes(b"abc");
        let json = serde_json::to_string(&blob).expect("serialize");
        assert_eq!(json, format!("\"{}\"", STANDARD.encode(b"abc")));
    }
}

//! Embedded image assets extracted from a source document.

use serde::Serialize;

/// Cheap content fingerprint used for deduplication: an MD5 digest over a
/// fixed-size prefix of the raw bytes, not a full-file hash. Two distinct
/// images sharing the same prefix collide; that trade-off is accepted for
/// speed.
pub type ContentKey = [u8; 16];

/// An embedded image extracted from a source document.
///
/// Assets are exclusively owned by one pipeline invocation and dropped
/// (together with their byte buffers) when the invocation ends, on every
/// exit path.
#[derive(Debug, Clone, Serialize)]
pub struct ImageAsset {
    /// Raw encoded bytes (JPEG, PNG, ...).
    #[serde(skip_serializing)]
    pub data: Vec<u8>,

    /// Decoded pixel width.
    pub width: u32,

    /// Decoded pixel height.
    pub height: u32,

    /// Deduplication key over the leading bytes.
    #[serde(skip_serializing)]
    pub content_key: ContentKey,
}

impl ImageAsset {
    /// Create an asset with a precomputed content key.
    pub fn new(data: Vec<u8>, width: u32, height: u32, content_key: ContentKey) -> Self {
        Self {
            data,
            width,
            height,
            content_key,
        }
    }

    /// Size of the encoded payload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Detect the MIME type from magic bytes, if recognizable.
    pub fn detect_mime_type(data: &[u8]) -> Option<&'static str> {
        if data.len() < 8 {
            return None;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some("image/jpeg");
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some("image/png");
        }

        // GIF: GIF87a or GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some("image/gif");
        }

        // TIFF: II*\0 (little-endian) or MM\0* (big-endian)
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some("image/tiff");
        }

        // BMP: BM
        if data.starts_with(b"BM") {
            return Some("image/bmp");
        }

        None
    }

    /// Whether the payload is a JPEG stream (usable verbatim as a
    /// DCTDecode PDF image).
    pub fn is_jpeg(&self) -> bool {
        matches!(Self::detect_mime_type(&self.data), Some("image/jpeg"))
    }
}

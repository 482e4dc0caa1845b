//! # Image Capture
//!
//! A [`CapturedImage`] is the still frame handed to ingredient extraction. It
//! comes from an [`ImageSource`]: the camera (a Telegram photo) or the file
//! picker (an image sent as a document). A source is consumed by
//! [`ImageSource::acquire`], so whatever stream or download backs it is
//! released as soon as the frame has been produced.

use std::fmt;
use std::io::Cursor;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref DATA_URL_PREFIX: Regex = Regex::new(r"^data:image/(png|jpeg|jpg|webp);base64,")
        .expect("Invalid data URL regex pattern");
}

/// JPEG quality used when a PNG or WebP frame is re-encoded
pub const JPEG_QUALITY: u8 = 85;

/// Where a frame came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOrigin {
    Camera,
    FilePicker,
}

impl CaptureOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureOrigin::Camera => "camera",
            CaptureOrigin::FilePicker => "file_picker",
        }
    }
}

/// Reasons a frame could not be produced
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// The device or the upstream file could not be reached
    Unavailable(String),
    /// The payload exceeds the configured limit
    TooLarge { size: u64, max: u64 },
    /// Not a PNG, JPEG or WebP image
    UnsupportedFormat,
    /// The payload is empty, not base64, or not decodable
    Unreadable(String),
}

impl CaptureError {
    /// Localization key of the message shown to the user
    pub fn message_key(&self) -> &'static str {
        match self {
            CaptureError::Unavailable(_) => "error-camera-access",
            CaptureError::TooLarge { .. } => "error-file-too-large",
            CaptureError::UnsupportedFormat => "error-unsupported-format",
            CaptureError::Unreadable(_) => "error-image-unreadable",
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Unavailable(msg) => write!(f, "[CAPTURE_UNAVAILABLE] {}", msg),
            CaptureError::TooLarge { size, max } => write!(
                f,
                "[CAPTURE_TOO_LARGE] {} bytes (maximum allowed: {} bytes)",
                size, max
            ),
            CaptureError::UnsupportedFormat => write!(f, "[CAPTURE_FORMAT] Unsupported image format"),
            CaptureError::Unreadable(msg) => write!(f, "[CAPTURE_UNREADABLE] {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}

/// Remove a `data:image/...;base64,` prefix if present
pub fn strip_data_url_prefix(payload: &str) -> &str {
    match DATA_URL_PREFIX.find(payload) {
        Some(prefix) => &payload[prefix.end()..],
        None => payload,
    }
}

/// A still image ready to be sent to the vision model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl CapturedImage {
    /// Wrap raw image bytes, sniffing the format from the content
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CaptureError> {
        if bytes.is_empty() {
            return Err(CaptureError::Unreadable("empty image payload".to_string()));
        }

        let format = image::guess_format(&bytes)
            .map_err(|_| CaptureError::UnsupportedFormat)?;

        match format {
            ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP => Ok(Self { bytes, format }),
            _ => Err(CaptureError::UnsupportedFormat),
        }
    }

    /// Decode a base64 payload, with or without a data URL prefix
    pub fn from_base64(payload: &str) -> Result<Self, CaptureError> {
        let data = strip_data_url_prefix(payload.trim());
        let bytes = general_purpose::STANDARD
            .decode(data)
            .map_err(|e| CaptureError::Unreadable(format!("invalid base64 payload: {}", e)))?;
        Self::from_bytes(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// The frame as JPEG bytes, re-encoding PNG and WebP input
    pub fn to_jpeg(&self) -> Result<Vec<u8>, CaptureError> {
        if self.format == ImageFormat::Jpeg {
            return Ok(self.bytes.clone());
        }

        let decoded = image::load_from_memory_with_format(&self.bytes, self.format)
            .map_err(|e| CaptureError::Unreadable(e.to_string()))?;
        let rgb = decoded.to_rgb8();

        let mut jpeg = Vec::new();
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut jpeg), JPEG_QUALITY);
        rgb.write_with_encoder(encoder)
            .map_err(|e| CaptureError::Unreadable(e.to_string()))?;

        debug!(
            source_format = ?self.format,
            source_bytes = self.bytes.len(),
            jpeg_bytes = jpeg.len(),
            "Re-encoded captured frame as JPEG"
        );
        Ok(jpeg)
    }
}

/// Produces a single still frame. Consumed by `acquire`.
#[async_trait]
pub trait ImageSource: Send {
    fn origin(&self) -> CaptureOrigin;

    async fn acquire(self: Box<Self>) -> Result<CapturedImage, CaptureError>;
}

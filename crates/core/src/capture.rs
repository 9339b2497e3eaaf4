//! Capturer trait, the abstraction over camera hardware.
//!
//! A Capturer produces one encoded still image per request. Results are
//! transient: produced by the camera, consumed by a single recognition or
//! analysis call, then dropped.

use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

/// Per-capture hints passed to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureOptions {
    /// Encoder quality hint in `0.0..=1.0`. Drivers may ignore it.
    pub quality: f32,
}

impl CaptureOptions {
    pub fn with_quality(quality: f32) -> Self {
        Self {
            quality: quality.clamp(0.0, 1.0),
        }
    }
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self { quality: 0.5 }
    }
}

/// An encoded still image plus when it was taken.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// Encoded image bytes (JPEG, PNG, ...)
    pub image: Vec<u8>,

    /// MIME type of `image`
    pub mime_type: String,

    /// When the frame was captured
    pub captured_at: DateTime<Utc>,

    /// Quality hint the frame was requested with
    pub quality: f32,
}

impl CaptureResult {
    /// Wrap freshly captured bytes, stamping the current time.
    pub fn new(image: Vec<u8>, mime_type: impl Into<String>, quality: f32) -> Self {
        Self {
            image,
            mime_type: mime_type.into(),
            captured_at: Utc::now(),
            quality,
        }
    }

    /// Standard base64 of the image bytes, as the relay expects it.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.image)
    }

    /// Decode a base64 payload received over the wire.
    pub fn from_base64(payload: &str) -> Result<Self, CaptureError> {
        let image = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| CaptureError::Encoding(e.to_string()))?;
        Ok(Self::new(image, "application/octet-stream", 1.0))
    }

    pub fn len(&self) -> usize {
        self.image.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }
}

/// A camera or image source.
#[async_trait]
pub trait Capturer: Send + Sync {
    /// Stable identifier for this camera, e.g. `"back"`.
    fn id(&self) -> &str;

    /// Whether the device can produce a frame right now.
    ///
    /// The search loop skips a cycle silently when this is `false`.
    fn is_ready(&self) -> bool {
        true
    }

    /// Capture and encode the next frame.
    async fn capture(&self, options: CaptureOptions) -> Result<CaptureResult, CaptureError>;
}

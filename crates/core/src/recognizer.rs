//! Recognizer and Analyzer traits: the abstraction over remote vision.
//!
//! The device runtime calls these without knowing whether the answer comes
//! from the HTTP relay, a mock, or a real model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::capture::CaptureResult;
use crate::error::RecognitionError;

/// The verdict for one capture-then-recognize cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionOutcome {
    /// Whether the target object is in view
    pub found: bool,

    /// Free-text directional hint, spoken and logged verbatim
    pub guidance: String,
}

impl RecognitionOutcome {
    pub fn found(guidance: impl Into<String>) -> Self {
        Self {
            found: true,
            guidance: guidance.into(),
        }
    }

    pub fn not_found(guidance: impl Into<String>) -> Self {
        Self {
            found: false,
            guidance: guidance.into(),
        }
    }
}

/// Locates a named object in an image.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// A human-readable name for this recognizer (e.g. "relay", "mock").
    fn name(&self) -> &str;

    /// Decide whether `target` is visible in `image` and how to reach it.
    async fn recognize(
        &self,
        image: &CaptureResult,
        target: &str,
    ) -> Result<RecognitionOutcome, RecognitionError>;
}

/// Answers a free-form question about an image.
#[async_trait]
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &str;

    async fn analyze(&self, image: &CaptureResult, question: &str)
    -> Result<String, RecognitionError>;
}

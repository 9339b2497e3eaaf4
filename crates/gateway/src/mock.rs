//! Placeholder vision backend.
//!
//! Never finds anything and echoes the question back. Swap in a real
//! [`Recognizer`]/[`Analyzer`] through [`GatewayState::new`](crate::GatewayState::new).

use async_trait::async_trait;
use lookout_core::capture::CaptureResult;
use lookout_core::error::RecognitionError;
use lookout_core::recognizer::{Analyzer, RecognitionOutcome, Recognizer};

#[derive(Debug, Default, Clone, Copy)]
pub struct MockVision;

impl MockVision {
    pub fn guidance_for(object_name: &str) -> String {
        format!(
            "I don't see a {object_name} in the current view. Try moving the camera slowly left, \
             right, up, or down. Check common locations like tables, desks, or nearby surfaces."
        )
    }

    pub fn answer_for(question: &str) -> String {
        format!(
            "I can see the image you've shared. {question} Based on the image, I can provide \
             analysis. Please integrate your AI service (OpenAI, Google Vision, etc.) to get real \
             responses."
        )
    }
}

#[async_trait]
impl Recognizer for MockVision {
    fn name(&self) -> &str {
        "mock"
    }

    async fn recognize(
        &self,
        _image: &CaptureResult,
        target: &str,
    ) -> Result<RecognitionOutcome, RecognitionError> {
        Ok(RecognitionOutcome::not_found(Self::guidance_for(target)))
    }
}

#[async_trait]
impl Analyzer for MockVision {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(&self, _image: &CaptureResult, question: &str) -> Result<String, RecognitionError> {
        Ok(Self::answer_for(question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn never_finds_the_target() {
        let frame = CaptureResult::new(vec![1, 2, 3], "image/jpeg", 0.5);
        let outcome = MockVision.recognize(&frame, "keys").await.unwrap();
        assert!(!outcome.found);
        assert_eq!(
            outcome.guidance,
            "I don't see a keys in the current view. Try moving the camera slowly left, right, \
             up, or down. Check common locations like tables, desks, or nearby surfaces."
        );
    }

    #[tokio::test]
    async fn answer_embeds_the_question() {
        let frame = CaptureResult::new(vec![1], "image/jpeg", 0.7);
        let answer = MockVision.analyze(&frame, "What is this?").await.unwrap();
        assert!(answer.starts_with("I can see the image you've shared. What is this? Based on"));
        assert!(answer.ends_with("to get real responses."));
    }
}

//! Camera assistant: take one photo, ask one question, speak the answer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lookout_core::capture::{CaptureOptions, Capturer};
use lookout_core::error::{FinderError, RecognitionError};
use lookout_core::narrator::Narrator;
use lookout_core::recognizer::Analyzer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::script;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

/// Outcome of one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The analyzer's answer, already spoken
    Answer(String),
    /// The failure message that was spoken instead
    Failed(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Answer(text) | Reply::Failed(text) => text,
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, Reply::Answer(_))
    }
}

/// Answers questions about what the camera sees, one at a time.
pub struct CameraAssistant {
    capturer: Arc<dyn Capturer>,
    analyzer: Arc<dyn Analyzer>,
    narrator: Arc<dyn Narrator>,
    capture_quality: f32,
    analyze_timeout: Duration,
    busy: AtomicBool,
    transcript: Mutex<Vec<TranscriptEntry>>,
}

/// Clears the busy flag however `ask` exits.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CameraAssistant {
    pub fn new(
        capturer: Arc<dyn Capturer>,
        analyzer: Arc<dyn Analyzer>,
        narrator: Arc<dyn Narrator>,
    ) -> Self {
        Self {
            capturer,
            analyzer,
            narrator,
            capture_quality: 0.7,
            analyze_timeout: Duration::from_secs(20),
            busy: AtomicBool::new(false),
            transcript: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(
        capturer: Arc<dyn Capturer>,
        analyzer: Arc<dyn Analyzer>,
        narrator: Arc<dyn Narrator>,
        config: &lookout_config::AppConfig,
    ) -> Self {
        Self::new(capturer, analyzer, narrator)
            .with_capture_quality(config.assistant.capture_quality)
            .with_timeout(config.relay.analyze_timeout())
    }

    pub fn with_capture_quality(mut self, quality: f32) -> Self {
        self.capture_quality = quality;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.analyze_timeout = timeout;
        self
    }

    /// Speak the ready prompt.
    pub fn announce_ready(&self) {
        self.narrator.speak(script::ASSISTANT_READY);
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Everything said so far, oldest first.
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, speaker: Speaker, text: &str) {
        self.transcript
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(TranscriptEntry {
                speaker,
                text: text.to_string(),
            });
    }

    /// Capture a photo and ask `question` about it.
    ///
    /// Only input problems are returned as errors. Capture and analysis
    /// failures are spoken and come back as [`Reply::Failed`].
    pub async fn ask(&self, question: &str) -> Result<Reply, FinderError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(FinderError::InvalidInput("question is empty".into()));
        }
        if !self.capturer.is_ready() {
            return Err(FinderError::CameraNotReady);
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(FinderError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        self.record(Speaker::User, question);
        info!(question, "Assistant question");

        self.narrator.speak(script::TAKING_PHOTO);
        let frame = match self
            .capturer
            .capture(CaptureOptions::with_quality(self.capture_quality))
            .await
        {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Capture failed");
                return Ok(self.fail(script::SOMETHING_WENT_WRONG));
            }
        };

        self.narrator.speak(script::ANALYZING);
        debug!(bytes = frame.len(), "Sending photo for analysis");
        let answered =
            tokio::time::timeout(self.analyze_timeout, self.analyzer.analyze(&frame, question))
                .await
                .unwrap_or_else(|_| {
                    Err(RecognitionError::Timeout {
                        timeout_ms: self.analyze_timeout.as_millis() as u64,
                    })
                });

        match answered {
            Ok(answer) => {
                self.record(Speaker::Assistant, &answer);
                self.narrator.speak(&answer);
                Ok(Reply::Answer(answer))
            }
            Err(e) if e.is_timeout() => {
                warn!(error = %e, "Analysis timed out");
                Ok(self.fail(script::TIMED_OUT))
            }
            Err(e) => {
                warn!(error = %e, "Analysis failed");
                Ok(self.fail(script::SOMETHING_WENT_WRONG))
            }
        }
    }

    fn fail(&self, message: &str) -> Reply {
        self.record(Speaker::Assistant, message);
        self.narrator.speak(message);
        Reply::Failed(message.to_string())
    }
}

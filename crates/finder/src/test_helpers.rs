//! Shared test doubles for finder tests.

use std::sync::Mutex;
use std::time::Duration;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use lookout_core::capture::{CaptureOptions, CaptureResult, Capturer};
use lookout_core::error::{CaptureError, RecognitionError};
use lookout_core::narrator::Narrator;
use lookout_core::recognizer::{Analyzer, RecognitionOutcome, Recognizer};

/// What a scripted collaborator does on one call.
#[derive(Clone)]
pub enum Step {
    Reply(RecognitionOutcome),
    Answer(String),
    Fail(RecognitionError),
    /// Replies after a delay
    After(Duration, RecognitionOutcome),
    /// Never resolves
    Hang,
}

pub fn miss(guidance: &str) -> Step {
    Step::Reply(RecognitionOutcome::not_found(guidance))
}

pub fn hit(guidance: &str) -> Step {
    Step::Reply(RecognitionOutcome::found(guidance))
}

pub fn timeout() -> Step {
    Step::Fail(RecognitionError::Timeout { timeout_ms: 10_000 })
}

/// Plays a script of steps in order; the last step repeats once the script
/// runs out.
pub struct Scripted {
    steps: Vec<Step>,
    calls: AtomicUsize,
    targets: Mutex<Vec<String>>,
}

impl Scripted {
    pub fn new(steps: Vec<Step>) -> Self {
        assert!(!steps.is_empty(), "script needs at least one step");
        Self {
            steps,
            calls: AtomicUsize::new(0),
            targets: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }

    async fn next(&self, prompt: &str) -> Step {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.targets.lock().unwrap().push(prompt.to_string());
        let step = self.steps[n.min(self.steps.len() - 1)].clone();
        match step {
            Step::Hang => std::future::pending().await,
            Step::After(delay, outcome) => {
                tokio::time::sleep(delay).await;
                Step::Reply(outcome)
            }
            step => step,
        }
    }
}

#[async_trait::async_trait]
impl Recognizer for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn recognize(
        &self,
        _image: &CaptureResult,
        target: &str,
    ) -> Result<RecognitionOutcome, RecognitionError> {
        match self.next(target).await {
            Step::Reply(outcome) => Ok(outcome),
            Step::Answer(text) => Ok(RecognitionOutcome::not_found(text)),
            Step::Fail(err) => Err(err),
            Step::Hang | Step::After(..) => unreachable!(),
        }
    }
}

#[async_trait::async_trait]
impl Analyzer for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn analyze(&self, _image: &CaptureResult, question: &str) -> Result<String, RecognitionError> {
        match self.next(question).await {
            Step::Answer(text) => Ok(text),
            Step::Reply(outcome) => Ok(outcome.guidance),
            Step::Fail(err) => Err(err),
            Step::Hang | Step::After(..) => unreachable!(),
        }
    }
}

/// A camera that can be switched off or made to fail.
pub struct StubCamera {
    pub ready: AtomicBool,
    pub failing: AtomicBool,
    captures: AtomicUsize,
    last_quality: Mutex<Option<f32>>,
}

impl StubCamera {
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
            failing: AtomicBool::new(false),
            captures: AtomicUsize::new(0),
            last_quality: Mutex::new(None),
        }
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn last_quality(&self) -> Option<f32> {
        *self.last_quality.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Capturer for StubCamera {
    fn id(&self) -> &str {
        "stub"
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn capture(&self, options: CaptureOptions) -> Result<CaptureResult, CaptureError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        *self.last_quality.lock().unwrap() = Some(options.quality);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CaptureError::Failed("shutter jammed".into()));
        }
        Ok(CaptureResult::new(vec![0xFF, 0xD8], "image/jpeg", options.quality))
    }
}

/// Records everything spoken.
#[derive(Default)]
pub struct RecordingNarrator {
    spoken: Mutex<Vec<String>>,
}

impl RecordingNarrator {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl Narrator for RecordingNarrator {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

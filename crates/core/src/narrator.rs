//! Narrator trait for text-to-speech output.

/// Speaks text aloud. Fire-and-forget: nothing the narrator does feeds back
/// into the caller's logic, so `speak` has no return value and must not block.
pub trait Narrator: Send + Sync {
    fn speak(&self, text: &str);
}

/// A narrator that drops everything. Useful for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn speak(&self, _text: &str) {}
}

//! Console narrator that "speaks" by printing to the terminal.

use lookout_core::narrator::Narrator;
use tracing::info;

pub struct ConsoleNarrator {
    rate: f32,
}

impl ConsoleNarrator {
    pub fn new(rate: f32) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }
}

impl Default for ConsoleNarrator {
    fn default() -> Self {
        Self::new(0.9)
    }
}

impl Narrator for ConsoleNarrator {
    fn speak(&self, text: &str) {
        info!(rate = self.rate, "speak: {text}");
        println!("🔊 {text}");
    }
}

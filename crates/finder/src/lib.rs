//! Device-side behaviour for Lookout.
//!
//! - [`SearchLoop`]: the object finder: a recurring capture → recognize →
//!   narrate cycle with user stop and verdict auto-stop
//! - [`CameraAssistant`]: single-shot "ask a question about what the camera
//!   sees"
//! - [`presets`]: quick searches and canned questions
//! - [`script`]: everything the device says out loud

pub mod assistant;
pub mod presets;
pub mod script;
pub mod search_loop;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use assistant::{CameraAssistant, Reply, Speaker, TranscriptEntry};
pub use presets::{QUICK_SEARCHES, QuickQuestion};
pub use search_loop::{LoopSettings, SearchLoop};

//! Device-side adapters for Lookout.
//!
//! - [`HttpRelay`] implements `Recognizer` and `Analyzer` against the relay
//!   HTTP contract
//! - [`FileCamera`] implements `Capturer` over image files on disk
//! - [`ConsoleNarrator`] implements `Narrator` by printing to the terminal

pub mod camera;
pub mod relay;
pub mod speech;

pub use camera::FileCamera;
pub use relay::HttpRelay;
pub use speech::ConsoleNarrator;

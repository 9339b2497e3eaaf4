//! # Lookout Core
//!
//! Domain types, collaborator traits, and error definitions for the Lookout
//! assistive vision runtime. This crate has **no transport dependencies**; it
//! defines the model that the device runtime and the relay backend both
//! implement against.
//!
//! ## Collaborators
//!
//! Every external capability is a trait here:
//! - [`Capturer`] produces an encoded still image on request
//! - [`Recognizer`] decides whether a named object is in an image
//! - [`Analyzer`] answers a free-form question about an image
//! - [`Narrator`] speaks text, fire-and-forget
//!
//! Implementations live in `lookout-providers` (HTTP relay, file camera,
//! console narrator) and `lookout-gateway` (mock vision backend).

pub mod capture;
pub mod error;
pub mod event;
pub mod narrator;
pub mod recognizer;
pub mod relay;
pub mod session;

// Re-export key types at crate root for ergonomics
pub use capture::{CaptureOptions, CaptureResult, Capturer};
pub use error::{CaptureError, Error, FinderError, RecognitionError, Result};
pub use event::{DomainEvent, EventBus};
pub use narrator::Narrator;
pub use recognizer::{Analyzer, RecognitionOutcome, Recognizer};
pub use session::{SearchSession, SearchState, SessionId, TickPolicy};

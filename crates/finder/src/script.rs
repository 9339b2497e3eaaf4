//! Spoken announcements and log lines.

pub const WELCOME: &str = "Welcome to AI Accessibility Assistant. \
Choose Camera Assistant to identify objects, money, and medicine. \
Or choose Object Finder to search for specific items.";

pub const FINDER_READY: &str =
    "Object Finder ready. Enter what you want to find and tap Start Search.";

pub const ASSISTANT_READY: &str =
    "Camera ready. Tap any button to ask a question about what the camera sees.";

pub const SEARCH_STOPPED: &str = "Search stopped";

pub const OBJECT_FOUND: &str = "Found it! Say Stop when you have it.";

pub const TAKING_PHOTO: &str = "Taking photo";

pub const ANALYZING: &str = "Analyzing";

pub const TIMED_OUT: &str = "Request timed out. Please try again.";

pub const SOMETHING_WENT_WRONG: &str = "Something went wrong. Please try again.";

/// Spoken when a search begins.
pub fn search_started(target: &str) -> String {
    format!("Searching for {target}. Keep camera moving slowly.")
}

/// First log line of every session.
pub fn search_log_header(target: &str) -> String {
    format!("Searching for: {target}")
}

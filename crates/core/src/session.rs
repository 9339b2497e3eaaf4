//! Search session domain types.
//!
//! A session is one user-initiated search attempt: its own target, log, and
//! lifecycle state. Sessions are never reused; searching again means a new
//! session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a search session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle phase of a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    /// Nothing has been searched for yet
    #[default]
    Idle,
    /// A capture timer is armed
    Searching,
    /// The recognizer reported the target in view (terminal)
    Found,
    /// The user cancelled or the owner was torn down (terminal)
    Stopped,
}

impl SearchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SearchState::Found | SearchState::Stopped)
    }
}

impl std::fmt::Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SearchState::Idle => "idle",
            SearchState::Searching => "searching",
            SearchState::Found => "found",
            SearchState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// What to do when a tick comes due while the previous cycle is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickPolicy {
    /// Skip the tick; at most one cycle in flight
    #[default]
    SkipIfBusy,
    /// Start a cycle on every tick regardless
    Overlap,
}

/// Snapshot of one search attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSession {
    pub id: SessionId,

    /// What is being searched for, trimmed; immutable after start
    pub target: String,

    pub state: SearchState,

    /// Display log, insertion-ordered, append-only
    pub log: Vec<String>,

    /// Most recent guidance while searching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_guidance: Option<String>,

    pub started_at: DateTime<Utc>,

    /// Completed recognition cycles (failed cycles excluded)
    pub cycles: u64,
}

impl SearchSession {
    /// Open a session in the `Searching` state with an empty log.
    pub fn begin(target: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            target: target.into(),
            state: SearchState::Searching,
            log: Vec::new(),
            last_guidance: None,
            started_at: Utc::now(),
            cycles: 0,
        }
    }

    pub fn is_searching(&self) -> bool {
        self.state == SearchState::Searching
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_begins_searching() {
        let session = SearchSession::begin("keys");
        assert_eq!(session.state, SearchState::Searching);
        assert!(session.log.is_empty());
        assert!(session.last_guidance.is_none());
        assert_eq!(session.cycles, 0);
    }

    #[test]
    fn terminal_states() {
        assert!(SearchState::Found.is_terminal());
        assert!(SearchState::Stopped.is_terminal());
        assert!(!SearchState::Searching.is_terminal());
        assert!(!SearchState::Idle.is_terminal());
    }

    #[test]
    fn tick_policy_serialization() {
        assert_eq!(
            serde_json::to_string(&TickPolicy::SkipIfBusy).unwrap(),
            "\"skip_if_busy\""
        );
        assert_eq!(TickPolicy::default(), TickPolicy::SkipIfBusy);
    }
}

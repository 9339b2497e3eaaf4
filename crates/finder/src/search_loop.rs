//! The object finder search loop.
//!
//! A [`SearchLoop`] owns at most one active [`SearchSession`]. Starting a
//! search arms a recurring timer; each tick runs one cycle:
//!
//! ```text
//! capture frame ──▶ recognize(frame, target) ──▶ log + narrate guidance
//!                                             └─▶ found? ──▶ Found, disarm
//! ```
//!
//! Cycle failures (camera, network, timeout) are absorbed: the tick is
//! abandoned and the timer keeps going. The only errors a caller ever sees
//! come from `start`: an empty target or a zero interval.
//!
//! The timer is a spawned task owned by the loop and cancelled through a
//! [`CancellationToken`]. Every session carries a generation number; a cycle
//! result is applied only if its generation is still the active one, so a
//! response that lands after `stop()` is dropped on the floor.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use lookout_core::capture::{CaptureOptions, Capturer};
use lookout_core::error::{FinderError, RecognitionError};
use lookout_core::event::{DomainEvent, EventBus};
use lookout_core::narrator::Narrator;
use lookout_core::recognizer::{RecognitionOutcome, Recognizer};
use lookout_core::session::{SearchSession, SearchState, SessionId, TickPolicy};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::script;

/// Timing and capture settings for a search loop.
#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    /// Period between ticks
    pub interval: Duration,

    /// Quality hint for every capture
    pub capture_quality: f32,

    /// Upper bound on one recognition call
    pub recognize_timeout: Duration,

    pub tick_policy: TickPolicy,
}

impl LoopSettings {
    pub fn from_config(config: &lookout_config::AppConfig) -> Self {
        Self {
            interval: config.finder.interval(),
            capture_quality: config.finder.capture_quality,
            recognize_timeout: config.relay.find_timeout(),
            tick_policy: config.finder.tick_policy,
        }
    }
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            capture_quality: 0.5,
            recognize_timeout: Duration::from_secs(10),
            tick_policy: TickPolicy::SkipIfBusy,
        }
    }
}

/// Drives capture → recognize → react cycles for one target at a time.
///
/// Collaborators (narrator, event subscribers) are invoked while the session
/// lock is held so that log order and speech order agree; they must not call
/// back into the loop.
pub struct SearchLoop {
    capturer: Arc<dyn Capturer>,
    recognizer: Arc<dyn Recognizer>,
    narrator: Arc<dyn Narrator>,
    events: Arc<EventBus>,
    settings: LoopSettings,
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    session: Option<SearchSession>,
    generation: u64,
    /// Armed iff the current session is `Searching`
    timer: Option<Timer>,
}

struct Timer {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Inner {
    fn is_active(&self, generation: u64) -> bool {
        self.generation == generation && self.session.as_ref().is_some_and(|s| s.is_searching())
    }

    fn active_mut(&mut self, generation: u64) -> Option<&mut SearchSession> {
        if self.generation != generation {
            return None;
        }
        self.session.as_mut().filter(|s| s.is_searching())
    }

    /// Cancel the timer and hand back its task so the caller can decide
    /// whether to abort, await, or detach it.
    fn disarm(&mut self) -> Option<JoinHandle<()>> {
        let timer = self.timer.take()?;
        timer.cancel.cancel();
        Some(timer.handle)
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

impl SearchLoop {
    /// Create an idle search loop with default settings.
    pub fn new(
        capturer: Arc<dyn Capturer>,
        recognizer: Arc<dyn Recognizer>,
        narrator: Arc<dyn Narrator>,
    ) -> Self {
        Self {
            capturer,
            recognizer,
            narrator,
            events: Arc::new(EventBus::default()),
            settings: LoopSettings::default(),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Override timing and capture settings. Applies to sessions started
    /// afterwards.
    pub fn with_settings(mut self, settings: LoopSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Publish domain events on a shared bus.
    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    pub fn settings(&self) -> &LoopSettings {
        &self.settings
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Begin searching for `target`, replacing any active search.
    ///
    /// Must be called from within a Tokio runtime; the timer is a spawned
    /// task.
    pub fn start(&self, target: &str) -> Result<SessionId, FinderError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(FinderError::InvalidInput("search target is empty".into()));
        }
        if self.settings.interval.is_zero() {
            return Err(FinderError::InvalidInput("search interval must be non-zero".into()));
        }

        let mut inner = lock(&self.inner);

        if let Some(previous) = inner.session.as_mut().filter(|s| s.is_searching()) {
            previous.state = SearchState::Stopped;
            info!(session_id = %previous.id, "Replacing active search");
            self.events.publish(DomainEvent::SearchStopped {
                session_id: previous.id.clone(),
                timestamp: Utc::now(),
            });
        }
        if let Some(handle) = inner.disarm() {
            handle.abort();
        }

        inner.generation += 1;
        let generation = inner.generation;

        let mut session = SearchSession::begin(target);
        let session_id = session.id.clone();
        self.narrator.speak(&script::search_started(target));
        session.log.push(script::search_log_header(target));
        inner.session = Some(session);

        let cancel = CancellationToken::new();
        let cycle = Cycle {
            generation,
            session_id: session_id.clone(),
            target: target.to_string(),
            capturer: self.capturer.clone(),
            recognizer: self.recognizer.clone(),
            narrator: self.narrator.clone(),
            events: self.events.clone(),
            inner: self.inner.clone(),
            options: CaptureOptions::with_quality(self.settings.capture_quality),
            recognize_timeout: self.settings.recognize_timeout,
        };
        let handle = tokio::spawn(drive(
            cycle,
            self.settings.interval,
            self.settings.tick_policy,
            cancel.clone(),
        ));
        inner.timer = Some(Timer { cancel, handle });

        info!(
            session_id = %session_id,
            target,
            interval_ms = self.settings.interval.as_millis() as u64,
            policy = ?self.settings.tick_policy,
            "Search started"
        );
        self.events.publish(DomainEvent::SearchStarted {
            session_id: session_id.clone(),
            target: target.to_string(),
            timestamp: Utc::now(),
        });

        Ok(session_id)
    }

    /// Cancel the active search. Returns `false` (and does nothing) when no
    /// search is running.
    pub fn stop(&self) -> bool {
        let (stopped, handle) = self.halt();
        if let Some(handle) = handle {
            handle.abort();
        }
        stopped
    }

    /// Stop, wait for the timer task to be gone, and discard the session.
    ///
    /// Returns the final snapshot of the discarded session, if any. After
    /// this the loop is idle; no cycle can fire until `start` is called
    /// again.
    pub async fn teardown(&self) -> Option<SearchSession> {
        let (_, stopped_timer) = self.halt();
        let (leftover_timer, session) = {
            let mut inner = lock(&self.inner);
            inner.generation += 1;
            (inner.disarm(), inner.session.take())
        };

        for handle in [stopped_timer, leftover_timer].into_iter().flatten() {
            handle.abort();
            let _ = handle.await;
        }

        debug!("Search loop torn down");
        session
    }

    /// `Searching` → `Stopped` with log entry and announcement.
    fn halt(&self) -> (bool, Option<JoinHandle<()>>) {
        let mut inner = lock(&self.inner);

        let Some(session) = inner.session.as_mut().filter(|s| s.is_searching()) else {
            return (false, None);
        };
        session.state = SearchState::Stopped;
        session.last_guidance = None;
        session.log.push(script::SEARCH_STOPPED.to_string());
        let session_id = session.id.clone();

        let handle = inner.disarm();
        self.narrator.speak(script::SEARCH_STOPPED);
        info!(session_id = %session_id, "Search stopped");
        self.events.publish(DomainEvent::SearchStopped {
            session_id,
            timestamp: Utc::now(),
        });

        (true, handle)
    }

    /// Current lifecycle state; `Idle` when there is no session.
    pub fn state(&self) -> SearchState {
        lock(&self.inner)
            .session
            .as_ref()
            .map(|s| s.state)
            .unwrap_or_default()
    }

    /// Snapshot of the current (or most recent) session.
    pub fn session(&self) -> Option<SearchSession> {
        lock(&self.inner).session.clone()
    }

    pub fn log(&self) -> Vec<String> {
        lock(&self.inner)
            .session
            .as_ref()
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    pub fn last_guidance(&self) -> Option<String> {
        lock(&self.inner)
            .session
            .as_ref()
            .and_then(|s| s.last_guidance.clone())
    }

    /// Whether a capture timer is armed.
    pub fn is_armed(&self) -> bool {
        lock(&self.inner).timer.is_some()
    }
}

impl Drop for SearchLoop {
    fn drop(&mut self) {
        let mut inner = lock(&self.inner);
        inner.generation += 1;
        if let Some(handle) = inner.disarm() {
            handle.abort();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Continue,
    Finished,
}

/// Everything one cycle needs, cloned into each cycle task.
#[derive(Clone)]
struct Cycle {
    generation: u64,
    session_id: SessionId,
    target: String,
    capturer: Arc<dyn Capturer>,
    recognizer: Arc<dyn Recognizer>,
    narrator: Arc<dyn Narrator>,
    events: Arc<EventBus>,
    inner: Arc<Mutex<Inner>>,
    options: CaptureOptions,
    recognize_timeout: Duration,
}

impl Cycle {
    async fn run(self) -> Verdict {
        if !self.is_active() {
            return Verdict::Finished;
        }

        if !self.capturer.is_ready() {
            debug!(session_id = %self.session_id, "Camera not ready, skipping cycle");
            self.skipped("camera_not_ready");
            return Verdict::Continue;
        }

        let frame = match self.capturer.capture(self.options).await {
            Ok(frame) => frame,
            Err(e) => {
                self.abandon("capture", e.to_string());
                return Verdict::Continue;
            }
        };

        let recognized = tokio::time::timeout(
            self.recognize_timeout,
            self.recognizer.recognize(&frame, &self.target),
        )
        .await;
        drop(frame);

        let outcome = match recognized {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                self.abandon("recognize", e.to_string());
                return Verdict::Continue;
            }
            Err(_) => {
                let e = RecognitionError::Timeout {
                    timeout_ms: self.recognize_timeout.as_millis() as u64,
                };
                self.abandon("recognize", e.to_string());
                return Verdict::Continue;
            }
        };

        self.apply(outcome)
    }

    fn is_active(&self) -> bool {
        lock(&self.inner).is_active(self.generation)
    }

    fn apply(&self, outcome: RecognitionOutcome) -> Verdict {
        let mut inner = lock(&self.inner);

        let Some(session) = inner.active_mut(self.generation) else {
            debug!(session_id = %self.session_id, "Discarding result for inactive session");
            return Verdict::Finished;
        };

        session.cycles += 1;
        session.last_guidance = Some(outcome.guidance.clone());
        session.log.push(outcome.guidance.clone());
        let cycles = session.cycles;
        if outcome.found {
            session.state = SearchState::Found;
            // The driver notices the cancelled token and exits on its own.
            drop(inner.disarm());
        }

        debug!(session_id = %self.session_id, found = outcome.found, cycles, "Guidance received");
        self.narrator.speak(&outcome.guidance);
        self.events.publish(DomainEvent::GuidanceReceived {
            session_id: self.session_id.clone(),
            guidance: outcome.guidance,
            found: outcome.found,
            timestamp: Utc::now(),
        });

        if !outcome.found {
            return Verdict::Continue;
        }

        info!(session_id = %self.session_id, target = %self.target, cycles, "Object found");
        self.narrator.speak(script::OBJECT_FOUND);
        self.events.publish(DomainEvent::ObjectFound {
            session_id: self.session_id.clone(),
            target: self.target.clone(),
            cycles,
            timestamp: Utc::now(),
        });
        Verdict::Finished
    }

    fn abandon(&self, stage: &str, error_message: String) {
        if !self.is_active() {
            debug!(session_id = %self.session_id, stage, "Ignoring failure for inactive session");
            return;
        }
        warn!(session_id = %self.session_id, stage, error = %error_message, "Cycle abandoned");
        self.events.publish(DomainEvent::CycleFailed {
            session_id: self.session_id.clone(),
            stage: stage.to_string(),
            error_message,
            timestamp: Utc::now(),
        });
    }

    fn skipped(&self, reason: &str) {
        self.events.publish(DomainEvent::CycleSkipped {
            session_id: self.session_id.clone(),
            reason: reason.to_string(),
            timestamp: Utc::now(),
        });
    }
}

/// Timer task: one tick per `interval`, first tick one period after start.
///
/// Cycles run as child tasks so the timer keeps its cadence while a
/// recognition call is outstanding. Dropping the join set on exit aborts any
/// cycle still in flight.
async fn drive(cycle: Cycle, interval: Duration, policy: TickPolicy, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: JoinSet<Verdict> = JoinSet::new();

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            Some(joined) = in_flight.join_next() => {
                match joined {
                    Ok(Verdict::Finished) => break,
                    Ok(Verdict::Continue) => {}
                    Err(e) if e.is_panic() => {
                        warn!(session_id = %cycle.session_id, "Cycle task panicked");
                    }
                    Err(_) => {}
                }
            }

            _ = ticker.tick() => {
                if policy == TickPolicy::SkipIfBusy && !in_flight.is_empty() {
                    debug!(session_id = %cycle.session_id, "Previous cycle still in flight, skipping tick");
                    cycle.skipped("busy");
                    continue;
                }
                in_flight.spawn(cycle.clone().run());
            }
        }
    }

    debug!(session_id = %cycle.session_id, in_flight = in_flight.len(), "Search timer exiting");
}

//! End-to-end integration tests for Lookout.
//!
//! These tests run the device side (search loop, camera assistant) against a
//! real gateway bound to a local port, talking over HTTP through the relay
//! client.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lookout_core::capture::CaptureResult;
use lookout_core::error::RecognitionError;
use lookout_core::narrator::Narrator;
use lookout_core::recognizer::{RecognitionOutcome, Recognizer};
use lookout_core::session::SearchState;
use lookout_finder::{CameraAssistant, LoopSettings, Reply, SearchLoop, script};
use lookout_gateway::{GatewayState, MockVision};
use lookout_providers::{FileCamera, HttpRelay};

// ── Fixtures ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingNarrator {
    spoken: Mutex<Vec<String>>,
}

impl RecordingNarrator {
    fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl Narrator for RecordingNarrator {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

/// Finds the target on every call.
struct AlwaysFinds;

#[async_trait::async_trait]
impl Recognizer for AlwaysFinds {
    fn name(&self) -> &str {
        "always"
    }

    async fn recognize(
        &self,
        image: &CaptureResult,
        target: &str,
    ) -> Result<RecognitionOutcome, RecognitionError> {
        Ok(RecognitionOutcome::found(format!(
            "The {target} is straight ahead ({} bytes seen)",
            image.len()
        )))
    }
}

async fn spawn_gateway(state: GatewayState) -> String {
    let app = lookout_gateway::build_router(
        Arc::new(state),
        &lookout_config::GatewayConfig::default(),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A port nothing listens on.
async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn frames_dir() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("frame-001.jpg"), [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
    std::fs::write(dir.path().join("frame-002.jpg"), [0xFF, 0xD8, 0xFF, 0xE1]).unwrap();
    let path = dir.path().to_path_buf();
    (dir, path)
}

fn fast_settings() -> LoopSettings {
    LoopSettings {
        interval: Duration::from_millis(100),
        recognize_timeout: Duration::from_secs(2),
        ..LoopSettings::default()
    }
}

async fn wait_for(cond: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    cond()
}

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_probe_through_relay_client() {
    let url = spawn_gateway(GatewayState::mock()).await;
    let relay = HttpRelay::new(url);
    assert_eq!(relay.health_check().await.unwrap(), "API is working!");
}

#[tokio::test]
async fn e2e_search_loop_logs_mock_guidance() {
    let url = spawn_gateway(GatewayState::mock()).await;
    let (_dir, frames) = frames_dir();
    let narrator = Arc::new(RecordingNarrator::default());

    let search = SearchLoop::new(
        Arc::new(FileCamera::open(&frames).unwrap()),
        Arc::new(HttpRelay::new(url)),
        narrator.clone(),
    )
    .with_settings(fast_settings());

    search.start("keys").unwrap();
    assert!(wait_for(|| search.log().len() >= 2).await);

    let log = search.log();
    assert_eq!(log[0], "Searching for: keys");
    assert_eq!(log[1], MockVision::guidance_for("keys"));
    assert_eq!(search.state(), SearchState::Searching);
    assert!(narrator.spoken().contains(&MockVision::guidance_for("keys")));

    assert!(search.stop());
    assert_eq!(search.log().last().unwrap(), "Search stopped");
}

#[tokio::test]
async fn e2e_search_loop_stops_when_backend_finds_target() {
    let state = GatewayState::new(Arc::new(AlwaysFinds), Arc::new(MockVision));
    let url = spawn_gateway(state).await;
    let (_dir, frames) = frames_dir();
    let narrator = Arc::new(RecordingNarrator::default());

    let search = SearchLoop::new(
        Arc::new(FileCamera::open(&frames).unwrap()),
        Arc::new(HttpRelay::new(url)),
        narrator.clone(),
    )
    .with_settings(fast_settings());

    search.start("phone").unwrap();
    assert!(wait_for(|| search.state() == SearchState::Found).await);

    assert!(!search.is_armed());
    assert_eq!(search.log().len(), 2);
    assert!(search.log()[1].starts_with("The phone is straight ahead"));
    assert_eq!(narrator.spoken().last().unwrap(), script::OBJECT_FOUND);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(search.log().len(), 2);
}

#[tokio::test]
async fn e2e_unreachable_relay_keeps_searching() {
    let (_dir, frames) = frames_dir();
    let search = SearchLoop::new(
        Arc::new(FileCamera::open(&frames).unwrap()),
        Arc::new(HttpRelay::new(dead_url().await)),
        Arc::new(lookout_core::narrator::SilentNarrator),
    )
    .with_settings(fast_settings());

    search.start("wallet").unwrap();
    tokio::time::sleep(Duration::from_millis(550)).await;

    assert_eq!(search.state(), SearchState::Searching);
    assert_eq!(search.log(), vec!["Searching for: wallet".to_string()]);
    assert!(search.is_armed());

    let last = search.teardown().await.unwrap();
    assert_eq!(last.state, SearchState::Stopped);
    assert_eq!(search.state(), SearchState::Idle);
}

#[tokio::test]
async fn e2e_assistant_answers_through_gateway() {
    let url = spawn_gateway(GatewayState::mock()).await;
    let (_dir, frames) = frames_dir();
    let narrator = Arc::new(RecordingNarrator::default());

    let assistant = CameraAssistant::new(
        Arc::new(FileCamera::open(&frames).unwrap()),
        Arc::new(HttpRelay::new(url)),
        narrator.clone(),
    );

    let question = lookout_finder::QuickQuestion::DescribeColors.prompt();
    let reply = assistant.ask(question).await.unwrap();

    assert_eq!(reply, Reply::Answer(MockVision::answer_for(question)));
    assert_eq!(
        narrator.spoken(),
        vec![
            script::TAKING_PHOTO.to_string(),
            script::ANALYZING.to_string(),
            MockVision::answer_for(question),
        ]
    );
    assert_eq!(assistant.transcript().len(), 2);
}

#[tokio::test]
async fn e2e_assistant_reports_unreachable_relay() {
    let (_dir, frames) = frames_dir();
    let assistant = CameraAssistant::new(
        Arc::new(FileCamera::open(&frames).unwrap()),
        Arc::new(HttpRelay::new(dead_url().await)),
        Arc::new(lookout_core::narrator::SilentNarrator),
    );

    let reply = assistant.ask("What is this?").await.unwrap();
    assert_eq!(reply, Reply::Failed(script::SOMETHING_WENT_WRONG.into()));
    assert!(!assistant.is_busy());
}

#[tokio::test]
async fn e2e_config_defaults_drive_loop_settings() {
    let config = lookout_config::AppConfig::default();
    config.validate().unwrap();

    let settings = LoopSettings::from_config(&config);
    assert_eq!(settings.interval, Duration::from_millis(2000));
    assert_eq!(settings.recognize_timeout, Duration::from_secs(10));
    assert_eq!(config.assistant.capture_quality, 0.7);
    assert_eq!(config.gateway.max_body_bytes, 10 * 1024 * 1024);
}

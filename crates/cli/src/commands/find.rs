//! `lookout find`: run the object finder until found, stopped, or timed out.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lookout_config::AppConfig;
use lookout_core::event::{DomainEvent, EventBus};
use lookout_core::narrator::Narrator;
use lookout_finder::{LoopSettings, SearchLoop, script};
use lookout_providers::{ConsoleNarrator, HttpRelay};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

pub async fn run(
    target: String,
    frames: Option<PathBuf>,
    timeout_secs: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let camera = super::open_camera(frames, &config)?;
    let relay = Arc::new(HttpRelay::from_config(&config.relay));
    let narrator = Arc::new(ConsoleNarrator::new(config.speech.rate));
    let events = Arc::new(EventBus::default());
    let settings = LoopSettings::from_config(&config);

    println!();
    println!("  Relay:     {}", relay.base_url());
    println!("  Camera:    {} frame(s)", camera.frame_count());
    println!("  Interval:  {} ms", settings.interval.as_millis());
    println!();

    let search = SearchLoop::new(camera, relay, narrator.clone())
        .with_settings(settings)
        .with_event_bus(events.clone());
    let mut rx = events.subscribe();

    narrator.speak(script::FINDER_READY);
    search.start(&target)?;
    println!("  Type 'stop' and press Enter (or Ctrl+C) to stop.\n");

    let deadline = tokio::time::sleep(Duration::from_secs(timeout_secs));
    tokio::pin!(deadline);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                search.stop();
                break;
            }
            _ = &mut deadline => {
                println!("  Giving up after {timeout_secs}s");
                search.stop();
                break;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) if line.trim().eq_ignore_ascii_case("stop") => {
                    search.stop();
                    break;
                }
                Ok(Some(_)) => {}
                Ok(None) | Err(_) => stdin_open = false,
            },
            event = rx.recv() => match event {
                Ok(event) => match event.as_ref() {
                    DomainEvent::ObjectFound { cycles, .. } => {
                        println!("  ✅ Found after {cycles} cycle(s)");
                        break;
                    }
                    DomainEvent::CycleFailed { stage, error_message, .. } => {
                        eprintln!("  ⚠️  {stage} failed: {error_message}");
                    }
                    _ => {}
                },
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            },
        }
    }

    if let Some(session) = search.teardown().await {
        println!();
        println!("  Session log ({}):", session.state);
        for entry in &session.log {
            println!("    - {entry}");
        }
        println!();
    }

    Ok(())
}

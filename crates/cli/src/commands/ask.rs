//! `lookout ask`: one question about what the camera sees.

use std::path::PathBuf;
use std::sync::Arc;

use lookout_config::AppConfig;
use lookout_finder::{CameraAssistant, QuickQuestion, Reply};
use lookout_providers::{ConsoleNarrator, HttpRelay};

pub async fn run(
    question: Option<String>,
    preset: Option<QuickQuestion>,
    frames: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let question = match (question, preset) {
        (Some(question), _) => question,
        (None, Some(preset)) => preset.prompt().to_string(),
        (None, None) => {
            let keys: Vec<&str> = QuickQuestion::ALL.iter().map(|q| q.key()).collect();
            return Err(format!(
                "Ask a question or pick a preset with --preset ({})",
                keys.join(", ")
            )
            .into());
        }
    };

    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let camera = super::open_camera(frames, &config)?;
    let relay = Arc::new(HttpRelay::from_config(&config.relay));
    let narrator = Arc::new(ConsoleNarrator::new(config.speech.rate));

    let assistant = CameraAssistant::from_config(camera, relay, narrator, &config);
    assistant.announce_ready();

    match assistant.ask(&question).await? {
        Reply::Answer(_) => Ok(()),
        Reply::Failed(message) => Err(message.into()),
    }
}

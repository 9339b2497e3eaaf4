pub mod ask;
pub mod doctor;
pub mod find;
pub mod onboard;
pub mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use lookout_config::AppConfig;
use lookout_providers::FileCamera;
use tracing::debug;

/// Open the camera from `--frames`, falling back to `[camera] frames`.
pub(crate) fn open_camera(
    frames: Option<PathBuf>,
    config: &AppConfig,
) -> Result<Arc<FileCamera>, Box<dyn std::error::Error>> {
    let path = frames.or_else(|| config.camera.frames.clone()).ok_or(
        "No camera configured. Pass --frames <path> or set `frames` under [camera] in config.toml",
    )?;
    let camera = FileCamera::open(&path).map_err(|e| format!("Camera {}: {e}", path.display()))?;
    debug!(path = %path.display(), frames = camera.frame_count(), "Camera opened");
    Ok(Arc::new(camera))
}

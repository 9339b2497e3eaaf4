//! File-backed camera: serves image files as camera frames.
//!
//! Points at a single image or a directory of images. Directory frames are
//! served in file-name order, round-robin, which makes scripted runs
//! reproducible.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lookout_core::capture::{CaptureOptions, CaptureResult, Capturer};
use lookout_core::error::CaptureError;
use tracing::trace;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "heic"];

pub struct FileCamera {
    id: String,
    frames: Vec<PathBuf>,
    cursor: AtomicUsize,
}

impl FileCamera {
    /// Open a file or directory as a frame source.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let frames = if path.is_dir() {
            let entries = std::fs::read_dir(path).map_err(|e| {
                CaptureError::NotReady(format!("cannot read {}: {e}", path.display()))
            })?;
            let mut frames: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_image(p))
                .collect();
            frames.sort();
            frames
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            return Err(CaptureError::NotReady(format!(
                "{} does not exist",
                path.display()
            )));
        };

        Ok(Self {
            id: path.display().to_string(),
            frames,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Number of distinct frames available.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

#[async_trait]
impl Capturer for FileCamera {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_ready(&self) -> bool {
        !self.frames.is_empty()
    }

    async fn capture(&self, options: CaptureOptions) -> Result<CaptureResult, CaptureError> {
        if self.frames.is_empty() {
            return Err(CaptureError::NotReady("no frames available".into()));
        }

        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.frames.len();
        let path = &self.frames[index];
        trace!(frame = %path.display(), quality = options.quality, "Capturing frame");

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CaptureError::Failed(format!("{}: {e}", path.display())))?;

        Ok(CaptureResult::new(bytes, mime_for(path), options.quality))
    }
}

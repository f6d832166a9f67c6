use crate::error::SceneError;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// One rendered frame and the scene clock it was rendered at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub index: usize,
    pub time: f32,
    pub file: String,
}

/// Summary of a render run, written as `manifest.toml` next to the frames.
#[derive(Debug, Clone, Serialize)]
pub struct RenderManifest {
    pub generator: String,
    pub created_at: String,
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub fps: f32,
    pub audio: Vec<String>,
    pub frames: Vec<FrameRecord>,
}

impl RenderManifest {
    pub fn new(seed: u64, width: usize, height: usize, fps: f32) -> Self {
        Self {
            generator: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            created_at: chrono::Utc::now().to_rfc3339(),
            seed,
            width,
            height,
            fps,
            audio: Vec::new(),
            frames: Vec::new(),
        }
    }

    pub fn to_toml(&self) -> Result<String, SceneError> {
        Ok(toml::to_string(self)?)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneError> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_lists_frames() {
        let mut manifest = RenderManifest::new(42, 64, 48, 30.0);
        manifest.frames.push(FrameRecord {
            index: 0,
            time: 0.0,
            file: "frame_0000.png".into(),
        });
        manifest.audio.push("ocean.wav".into());

        let text = manifest.to_toml().unwrap();
        assert!(text.contains("seed = 42"));
        assert!(text.contains("frame_0000.png"));
        assert!(text.contains("ocean.wav"));
    }

    #[test]
    fn test_write_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.toml");
        RenderManifest::new(1, 2, 2, 24.0).write(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("generator = \"bayscape"));
    }
}

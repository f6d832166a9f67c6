use thiserror::Error;

/// Errors raised at the edges of the renderer: builder parameter validation,
/// configuration loading and file output. The numeric routines themselves are
/// total and never return this.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid {builder} parameters: {reason}")]
    InvalidParameters {
        builder: &'static str,
        reason: String,
    },

    #[error("mesh index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize manifest: {0}")]
    ManifestSerialize(#[from] toml::ser::Error),

    #[error("failed to write image '{path}': {source}")]
    ImageWrite {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write audio: {0}")]
    AudioWrite(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SceneError {
    pub fn invalid(builder: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            builder,
            reason: reason.into(),
        }
    }
}

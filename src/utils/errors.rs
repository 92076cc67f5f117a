use thiserror::Error;

/// Errors surfaced by the control surface and its collaborators.
///
/// None of these are raised by gesture handling itself: unavailable engine
/// commands are silent no-ops and out-of-range values are clamped. Errors
/// only come out of setup paths (loading a source, reading configuration,
/// picking an episode) or from talking to a runtime that has shut down.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlsError {
    /// The media source could not be parsed as a URL
    #[error("Invalid media source '{url}': {reason}")]
    InvalidSource { url: String, reason: String },

    /// The playback engine rejected an operation
    #[error("Engine error: {0}")]
    Engine(String),

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Episode index does not exist in the current list
    #[error("Episode {index} out of range (list has {len})")]
    EpisodeOutOfRange { index: usize, len: usize },

    /// An episode entry is missing its `label$url` separator
    #[error("Malformed episode entry: {0}")]
    MalformedEpisode(String),

    /// The controls runtime is no longer accepting input
    #[error("Controls runtime has shut down")]
    RuntimeClosed,
}

impl ControlsError {
    /// Create an engine error from anything displayable
    pub fn engine(message: impl std::fmt::Display) -> Self {
        ControlsError::Engine(message.to_string())
    }

    /// Whether retrying the same call could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, ControlsError::Engine(_))
    }
}

impl From<toml::de::Error> for ControlsError {
    fn from(error: toml::de::Error) -> Self {
        ControlsError::Config(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ControlsError>;

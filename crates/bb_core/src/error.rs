use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid pitch definition: {0}")]
    InvalidPitch(String),

    #[error("Invalid pitch label: {0:?}")]
    InvalidLabel(String),

    #[error("Unknown pitch label: {0}")]
    UnknownPitch(String),

    #[error("No pitches available to choose from")]
    NoActions,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The session driver reached a state it should never reach
    #[error("Session state error: {0}")]
    SessionState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl EngineError {
    /// Errors caused by caller-supplied data rather than I/O.
    pub fn is_input_error(&self) -> bool {
        match self {
            EngineError::InvalidPitch(_)
            | EngineError::InvalidLabel(_)
            | EngineError::UnknownPitch(_)
            | EngineError::NoActions
            | EngineError::InvalidConfig(_) => true,
            EngineError::Json(err) => err.is_data() || err.is_syntax(),
            EngineError::Yaml(_) => true,
            EngineError::Io(_) | EngineError::SessionState(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

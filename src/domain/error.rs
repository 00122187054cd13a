//! Domain error types.

/// Top-level error type for kbartrader.
#[derive(Debug, thiserror::Error)]
pub enum TraderError {
    #[error("invalid tick: {reason}")]
    InvalidTick { reason: String },

    #[error("invalid bar: {reason}")]
    InvalidBar { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("record error: {reason}")]
    Record { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TraderError> for std::process::ExitCode {
    fn from(err: &TraderError) -> Self {
        let code: u8 = match err {
            TraderError::Io(_) => 1,
            TraderError::ConfigParse { .. }
            | TraderError::ConfigMissing { .. }
            | TraderError::ConfigInvalid { .. } => 2,
            TraderError::InvalidTick { .. }
            | TraderError::InvalidBar { .. }
            | TraderError::Data { .. } => 3,
            TraderError::Record { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

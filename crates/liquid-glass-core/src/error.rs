use thiserror::Error;

pub type Result<T> = std::result::Result<T, GlassError>;

#[derive(Debug, Error)]
pub enum GlassError {
    #[error("required element not found: {selector}")]
    MissingElement { selector: String },

    #[error("invalid editor config: {message}")]
    InvalidConfig { message: String },

    #[error("invalid value for control {control}: {value:?}")]
    InvalidParameterValue { control: &'static str, value: String },

    #[error("unknown control: {control}")]
    UnknownControl { control: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DOM error: {message}")]
    Dom { message: String },
}

impl GlassError {
    #[must_use]
    pub fn missing(selector: impl Into<String>) -> Self {
        Self::MissingElement {
            selector: selector.into(),
        }
    }

    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn dom(message: impl Into<String>) -> Self {
        Self::Dom {
            message: message.into(),
        }
    }

    /// Whether the editor cannot start after this error.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingElement { .. } | Self::InvalidConfig { .. })
    }
}

/// Result alias that carries the custom [`SiteError`] type.
pub type Result<T> = std::result::Result<T, SiteError>;

/// Common error type for the core crate.
///
/// Only the edges of the crate produce errors (loading configuration or
/// content). Missing page elements and degenerate measurements are handled
/// as scoped skips and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Free-form message for failures without a dedicated variant.
    #[error("{0}")]
    Message(String),
    /// A caller supplied a value the operation cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialisation errors.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl SiteError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for SiteError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for SiteError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

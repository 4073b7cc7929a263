//! Error types shared across the page controller.

/// Convenience result type used across the crate.
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures surfaced by the cache, the backend client and the view.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// An image could not be fetched or decoded. Never cached.
    #[error("failed to load image {url}: {reason}")]
    ImageLoad { url: String, reason: String },

    /// Transport-level failure talking to the backend.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a body we could not interpret.
    #[error("decode error: {0}")]
    Decode(String),

    /// The view has no element with the requested id.
    #[error("element not found: #{0}")]
    MissingElement(String),

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// The host cannot perform the requested capability.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl ClientError {
    pub fn image_load(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::ImageLoad {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn missing(id: impl Into<String>) -> Self {
        Self::MissingElement(id.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}

#[cfg(test)]
#[path = "../tests/unit/error.rs"]
mod tests;

//! Error types surfaced at the single invocation boundary.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WxError {
    /// The geocoder returned no candidates for the name.
    #[error("City not found: {query}")]
    NotFound { query: String },

    /// Both the verified and the downgraded attempt failed, or a non-TLS
    /// transport failure happened on the first attempt.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} answered with HTTP {status}")]
    Http { url: String, status: u16 },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A well-formed response without the expected payload key.
    #[error("No {what} data returned")]
    NoData { what: &'static str },

    #[error("cannot write {}: {message}", path.display())]
    Filesystem { path: PathBuf, message: String },

    #[error("Cancelled: No folder selected.")]
    Cancelled,

    #[error("Please enter a city and country (e.g., Delhi, India).")]
    EmptyPlace,
}

pub type Result<T> = std::result::Result<T, WxError>;

impl WxError {
    pub fn filesystem<E: std::fmt::Display>(path: impl Into<PathBuf>, err: E) -> Self {
        Self::Filesystem {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Text for the status line and the appended console line.
    pub fn user_message(&self) -> String {
        match self {
            WxError::Cancelled | WxError::EmptyPlace => self.to_string(),
            _ => format!("Error: {self}"),
        }
    }

    /// Whether the run was abandoned by the user rather than failing.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WxError::Cancelled)
    }
}

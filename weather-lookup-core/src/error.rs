use thiserror::Error;

/// Generic text shown when the provider rejects a request without a message.
pub const GENERIC_PROVIDER_MESSAGE: &str = "Unable to fetch weather.";

/// Every way a lookup can fail. All three are surfaced to the user the same
/// way, but callers can tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Bad user input, raised before any network call.
    #[error("{0}")]
    Validation(String),

    /// The provider answered with a non-success status.
    #[error("{0}")]
    Provider(String),

    /// Network failures, malformed payloads, undecodable icons.
    #[error("{0}")]
    Unexpected(String),
}

impl LookupError {
    pub fn unexpected(err: impl std::fmt::Display) -> Self {
        LookupError::Unexpected(err.to_string())
    }

    /// Text for the error dialog.
    pub fn dialog_message(&self) -> String {
        match self {
            LookupError::Validation(msg) | LookupError::Provider(msg) => msg.clone(),
            LookupError::Unexpected(msg) => format!("Something went wrong:\n{msg}"),
        }
    }
}

/// `outer: inner: innermost`, so timeouts and DNS failures stay visible.
fn describe_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        source = inner.source();
    }
    out
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Unexpected(describe_chain(&err))
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::unexpected(err)
    }
}

impl From<image::ImageError> for LookupError {
    fn from(err: image::ImageError) -> Self {
        LookupError::unexpected(err)
    }
}

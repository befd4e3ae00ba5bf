use thiserror::Error;

/// Errors returned by the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("Gemini API error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// The provider's output could not be turned into a complete result.
    #[error("malformed model response ({context}): {reason}")]
    MalformedResponse { context: String, reason: String },

    /// The caller supplied an empty or out-of-range input.
    #[error("invalid analysis input: {0}")]
    Input(String),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Coarse failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    MalformedResponse,
    Input,
}

impl AnalysisError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Http(_) | AnalysisError::Provider { .. } => ErrorKind::Transport,
            AnalysisError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            AnalysisError::Input(_) | AnalysisError::InvalidBaseUrl { .. } => ErrorKind::Input,
        }
    }

    pub(crate) fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::MalformedResponse {
            context: context.into(),
            reason: reason.into(),
        }
    }
}

impl From<vreverse_core::CoreError> for AnalysisError {
    fn from(err: vreverse_core::CoreError) -> Self {
        AnalysisError::Input(err.to_string())
    }
}

use thiserror::Error;

/// Failures from a [`crate::GenerativeModel`] call.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generative API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The model answered but the reply had no part of the requested kind.
    #[error("model returned no {0}")]
    EmptyResponse(&'static str),

    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("model call timed out after {0}s")]
    Timeout(u64),
}

/// Failures that end a styling request.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("failed to propose a style: {0}")]
    DescriptionFailed(#[source] GenerationError),

    #[error("failed to generate the styled image: {0}")]
    ImageFailed(#[source] GenerationError),

    /// A newer request started; this one's results were dropped.
    #[error("styling request was superseded by a newer one")]
    Superseded,
}

use thiserror::Error;

/// Boxed transport-level error carried by [`RequesterError::BodyRead`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures raised while turning a curl command into a request and a
/// completed exchange into a summary.
#[derive(Debug, Error)]
pub enum RequesterError {
    #[error("not a valid curl command")]
    NotACurlCommand,

    #[error("URL not found")]
    UrlNotFound,

    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to parse JSON body: {0}")]
    BodyParse(#[source] serde_json::Error),

    #[error("failed to marshal request body: {0}")]
    BodySerialize(#[source] serde_json::Error),

    /// The header cannot be carried by an HTTP/1.1 request as written.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("failed to read response body: {0}")]
    BodyRead(#[source] BoxError),
}

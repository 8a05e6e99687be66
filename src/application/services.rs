use crate::application::parsers::curl_parser::CurlCommandParser;
use crate::domain::entities::{RequestConfig, ResponseSummary};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, warn};

/// Trait for HTTP clients to enable mocking and dependency inversion
///
/// Implementations return `Ok(None)` when the exchange produced no response
/// to summarize.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: RequestConfig) -> Result<Option<ResponseSummary>>;
}

/// Application service replaying a saved curl command
pub struct ReplayService {
    parser: CurlCommandParser,
    http_client: Box<dyn HttpClient>,
}

impl ReplayService {
    pub fn new(http_client: Box<dyn HttpClient>) -> Self {
        Self {
            parser: CurlCommandParser::new(),
            http_client,
        }
    }

    /// Parses `command`, then executes the request it describes
    pub async fn replay(&self, command: &str) -> Result<Option<ResponseSummary>> {
        let request = self.parser.parse(command)?;
        debug!(
            "parsed request: {} {}",
            request.method,
            request.effective_target()
        );
        if let Ok(json) = serde_json::to_string(&request.redacted()) {
            debug!("request config: {json}");
        }

        RequestValidator::validate(&request)?;
        self.http_client.send(request).await
    }
}

/// Domain service for request validation
/// This contains domain business rules
pub struct RequestValidator;

impl RequestValidator {
    pub fn validate(request: &RequestConfig) -> Result<()> {
        Self::validate_method(&request.method)?;
        Self::validate_uri(&request.uri)?;
        Self::warn_on_get_body(request);
        Ok(())
    }

    fn validate_method(method: &str) -> Result<()> {
        http::Method::from_bytes(method.as_bytes())
            .map(|_| ())
            .map_err(|_| anyhow!("Invalid HTTP method: '{}'", method))
    }

    fn validate_uri(uri: &str) -> Result<()> {
        if !uri.starts_with("http://") && !uri.starts_with("https://") {
            return Err(anyhow!("URL must start with http:// or https://"));
        }
        Ok(())
    }

    fn warn_on_get_body(request: &RequestConfig) {
        let has_body = request.body.as_ref().is_some_and(|body| !body.is_empty());
        if request.method.eq_ignore_ascii_case("GET") && has_body {
            warn!("sending a body with a GET request");
        }
    }
}

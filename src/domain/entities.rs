use crate::domain::errors::RequesterError;
use crate::domain::value_objects::{Authorization, JsonBody};
use http::header::{HeaderName, HeaderValue};
use http_body_util::BodyExt;
use hyper::StatusCode;
use hyper::body::{Body, Bytes};
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

const REDACTED: &str = "***";

/// Structured description of the request held in a curl command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestConfig {
    pub method: String,
    /// Scheme, authority and path; never carries a query string.
    pub uri: String,
    /// Raw query string without the leading `?`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonBody>,
    pub headers: HashMap<String, String>,
    /// Mirrors the `Authorization` entry of `headers` when it has two parts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<Authorization>,
}

impl RequestConfig {
    /// The URI plus query string actually sent on the wire.
    pub fn effective_target(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.uri, query),
            None => self.uri.clone(),
        }
    }

    /// Returns the JSON payload, or `None` when there is nothing to send.
    pub fn serialize_body(&self) -> Result<Option<Bytes>, RequesterError> {
        match &self.body {
            Some(body) if !body.is_empty() => body.to_bytes().map(Some),
            _ => Ok(None),
        }
    }

    /// Appends every configured header onto an outbound request.
    ///
    /// Existing values under the same name are kept.
    pub fn apply_headers<B>(&self, request: &mut http::Request<B>) -> Result<(), RequesterError> {
        for (name, value) in &self.headers {
            let invalid = |reason: String| RequesterError::InvalidHeader {
                name: name.clone(),
                reason,
            };
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            request.headers_mut().append(header_name, header_value);
        }
        Ok(())
    }

    /// A copy safe to log: credentials in `authorization` and in
    /// authorization headers are masked, the scheme is kept.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for (name, value) in copy.headers.iter_mut() {
            if name.eq_ignore_ascii_case("authorization")
                || name.eq_ignore_ascii_case("proxy-authorization")
            {
                *value = match value.split_once(' ') {
                    Some((scheme, _)) => format!("{scheme} {REDACTED}"),
                    None => REDACTED.to_string(),
                };
            }
        }
        if let Some(authorization) = copy.authorization.as_mut() {
            authorization.credential = REDACTED.to_string();
        }
        copy
    }
}

/// A completed HTTP exchange, ready to be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSummary {
    pub status: StatusCode,
    /// First value seen for each header name.
    pub headers: HashMap<String, String>,
    pub body: Bytes,
    pub duration: Duration,
    pub url: String,
    pub method: String,
}

impl ResponseSummary {
    /// Drains a transport response into a summary.
    ///
    /// `started` is the instant taken just before dispatch. A missing
    /// response yields `Ok(None)`: there is nothing to summarize.
    pub async fn from_transport<B>(
        response: Option<http::Response<B>>,
        method: &str,
        url: &str,
        started: Instant,
    ) -> Result<Option<Self>, RequesterError>
    where
        B: Body,
        B::Error: Into<crate::domain::errors::BoxError>,
    {
        let Some(response) = response else {
            return Ok(None);
        };

        let status = response.status();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            headers
                .entry(name.as_str().to_string())
                .or_insert_with(|| String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| RequesterError::BodyRead(e.into()))?
            .to_bytes();

        Ok(Some(ResponseSummary {
            status,
            headers,
            body,
            duration: started.elapsed(),
            url: url.to_string(),
            method: method.to_string(),
        }))
    }

    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Case-insensitive lookup of the `Content-Type` header.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }
}

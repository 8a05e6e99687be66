use crate::application::services::{HttpClient, ReplayService};
use crate::domain::entities::{RequestConfig, ResponseSummary};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::client::conn::http1;
use hyper::header::{CONTENT_TYPE, HOST, HeaderValue};
use hyper::rt::{Read, Write};
use hyper::{Method, Request as HyperRequest, Uri};
use hyper_util::rt::TokioIo;
use log::{debug, warn};
use std::time::Instant;
use tokio::net::TcpStream;
use tokio_native_tls::TlsConnector;
use tokio_native_tls::native_tls;
use url::Url;

/// Infrastructure implementation of HttpClient using Hyper
/// Each replay opens one HTTP/1.1 connection, upgraded to TLS for https
#[derive(Debug, Default, Clone, Copy)]
pub struct HyperHttpClient;

impl HyperHttpClient {
    pub fn new() -> Self {
        Self
    }

    /// Creates a configured replay service using this client
    pub fn create_replay_service(self) -> ReplayService {
        ReplayService::new(Box::new(self))
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, request: RequestConfig) -> Result<Option<ResponseSummary>> {
        let target = request.effective_target();
        let uri = UriAdapter::to_wire_uri(&target)?;
        let hyper_request = RequestAdapter::to_hyper_request(&request, &uri)?;

        debug!("dispatching {} {}", request.method, target);
        let started = Instant::now();
        let hyper_response = self.execute_http_request(&uri, hyper_request).await?;

        let summary = ResponseSummary::from_transport(
            Some(hyper_response),
            &request.method,
            &target,
            started,
        )
        .await?;
        if let Some(summary) = &summary {
            debug!("received {} in {:?}", summary.status, summary.duration);
        }
        Ok(summary)
    }
}

impl HyperHttpClient {
    async fn execute_http_request(
        &self,
        uri: &Uri,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>> {
        let endpoint = Endpoint::from_uri(uri)?;
        let tcp = TcpStream::connect((endpoint.host.as_str(), endpoint.port))
            .await
            .with_context(|| format!("Failed to connect to {}:{}", endpoint.host, endpoint.port))?;

        if endpoint.tls {
            let connector = native_tls::TlsConnector::new()
                .map(TlsConnector::from)
                .map_err(|e| anyhow!("Failed to initialise TLS: {}", e))?;
            let stream = connector
                .connect(&endpoint.host, tcp)
                .await
                .map_err(|e| anyhow!("TLS handshake with {} failed: {}", endpoint.host, e))?;
            Self::exchange(TokioIo::new(stream), request).await
        } else {
            Self::exchange(TokioIo::new(tcp), request).await
        }
    }

    async fn exchange<T>(
        io: T,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>>
    where
        T: Read + Write + Unpin + Send + 'static,
    {
        let (mut sender, connection) = http1::handshake(io)
            .await
            .map_err(|e| anyhow!("HTTP handshake failed: {}", e))?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                warn!("connection error: {err}");
            }
        });

        sender
            .send_request(request)
            .await
            .map_err(|e| anyhow!("HTTP request execution failed: {}", e))
    }
}

/// Where to open the connection for a request target
struct Endpoint {
    host: String,
    port: u16,
    tls: bool,
}

impl Endpoint {
    fn from_uri(uri: &Uri) -> Result<Self> {
        let tls = match uri.scheme_str() {
            Some("https") => true,
            Some("http") => false,
            other => return Err(anyhow!("Unsupported scheme: {:?}", other)),
        };
        let host = uri
            .host()
            .ok_or_else(|| anyhow!("Request target has no host: {}", uri))?
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();
        let port = uri.port_u16().unwrap_or(if tls { 443 } else { 80 });
        Ok(Self { host, port, tls })
    }
}

/// Adapter for turning a target as written into one hyper can send
struct UriAdapter;

impl UriAdapter {
    /// Percent-encodes what the command left raw (non-ASCII, spaces, `<>`)
    fn to_wire_uri(target: &str) -> Result<Uri> {
        let wire = Url::parse(target)
            .with_context(|| format!("Invalid request target: {target}"))?;
        wire.as_str()
            .parse()
            .with_context(|| format!("Invalid request target: {target}"))
    }
}

/// Adapter for converting request configs to Hyper requests
struct RequestAdapter;

impl RequestAdapter {
    fn to_hyper_request(config: &RequestConfig, uri: &Uri) -> Result<HyperRequest<Full<Bytes>>> {
        let method = Method::from_bytes(config.method.as_bytes())
            .map_err(|e| anyhow!("Invalid HTTP method '{}': {}", config.method, e))?;
        let payload = config.serialize_body()?;
        let has_body = payload.is_some();

        let mut request = HyperRequest::builder()
            .method(method)
            .uri(Self::origin_form(uri))
            .body(BodyAdapter::to_hyper_body(payload))
            .map_err(|e| anyhow!("Failed to build HTTP request: {}", e))?;

        config.apply_headers(&mut request)?;
        HeaderAdapter::add_host(&mut request, uri)?;
        if has_body {
            HeaderAdapter::add_json_content_type(&mut request);
        }
        Ok(request)
    }

    fn origin_form(uri: &Uri) -> String {
        uri.path_and_query()
            .map(|pq| pq.as_str().to_string())
            .filter(|pq| !pq.is_empty())
            .unwrap_or_else(|| "/".to_string())
    }
}

/// Adapter for converting serialized payloads to Hyper bodies
struct BodyAdapter;

impl BodyAdapter {
    fn to_hyper_body(payload: Option<Bytes>) -> Full<Bytes> {
        Full::new(payload.unwrap_or_default())
    }
}

/// Adapter for the headers a bare connection needs
struct HeaderAdapter;

impl HeaderAdapter {
    fn add_host(request: &mut HyperRequest<Full<Bytes>>, uri: &Uri) -> Result<()> {
        if request.headers().contains_key(HOST) {
            return Ok(());
        }
        let authority = uri
            .authority()
            .ok_or_else(|| anyhow!("Request target has no authority: {}", uri))?;
        let value = HeaderValue::from_str(authority.as_str())
            .map_err(|e| anyhow!("Invalid Host header: {}", e))?;
        request.headers_mut().insert(HOST, value);
        Ok(())
    }

    fn add_json_content_type(request: &mut HyperRequest<Full<Bytes>>) {
        request
            .headers_mut()
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
    }
}

// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client facade
//!
//! Dispatches requests through the handler chain so an installed relay sees
//! them, and plays the original caller's role: a signaled redirect is
//! re-dispatched as a fresh logical request, up to the configured limit.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;

use super::request::{follow_redirect, Request};
use super::response::Response;
use super::transport::{ReqwestTransport, Transport};
use super::{headers, DEFAULT_USER_AGENT};
use crate::config::RelayConfig;
use crate::error::{Error, Result};
use crate::relay::{CollectingDelegate, HandlerChain, LoggingRelay, RequestHandler};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Default timeout
    pub timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Default headers
    pub default_headers: HeaderMap,
    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(headers::ACCEPT, HeaderValue::from_static("*/*"));

        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
            default_headers,
            proxy: None,
        }
    }
}

/// HTTP client with handler-chain dispatch
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    handlers: Arc<HandlerChain>,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Ok(Self::with_transport(transport, config))
    }

    /// Build a client over an existing transport
    pub fn with_transport(transport: Arc<dyn Transport>, config: HttpClientConfig) -> Self {
        Self {
            transport,
            handlers: Arc::new(HandlerChain::new()),
            config,
        }
    }

    /// The handler chain requests are dispatched through
    pub fn handlers(&self) -> &HandlerChain {
        &self.handlers
    }

    /// Install a logging relay over this client's transport.
    ///
    /// The returned relay is registered at the front of the handler chain;
    /// remove it again with `handlers().unregister`.
    pub fn install_logging(&self, config: RelayConfig) -> Arc<LoggingRelay> {
        let relay = Arc::new(LoggingRelay::new(self.transport.clone(), config));
        self.handlers.register(relay.clone());
        relay
    }

    /// Execute a GET request
    pub async fn get(&self, url: impl AsRef<str>) -> Result<Response> {
        self.execute(Request::get(url)?).await
    }

    /// Execute a POST request
    pub async fn post(&self, url: impl AsRef<str>, body: impl Into<Bytes>) -> Result<Response> {
        self.execute(Request::post(url)?.body(body.into())).await
    }

    /// Execute a request, re-dispatching signaled redirects.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let start = Instant::now();
        let follow = request.follow_redirects;
        let max_hops = request.max_redirects.min(self.config.max_redirects as u32);

        let mut current = request;
        let mut hops = 0u32;

        loop {
            // Kept before the body is consumed; `None` for stream bodies,
            // which cannot be replayed after a redirect.
            let replay = current.try_clone();

            let (response, signaled_next) = self.dispatch(current).await?;

            if follow && response.is_redirect() && hops < max_hops {
                let next = signaled_next
                    .or_else(|| replay.as_ref().and_then(|prev| follow_redirect(prev, &response)));
                if let Some(next) = next {
                    hops += 1;
                    current = next;
                    continue;
                }
            }

            let mut response = response;
            response.elapsed_ms = start.elapsed().as_millis() as u64;
            return Ok(response);
        }
    }

    /// Dispatch one hop: through the first claiming handler, or straight
    /// through the transport when nothing claims the request.
    async fn dispatch(&self, request: Request) -> Result<(Response, Option<Request>)> {
        match self.handlers.resolve(&request) {
            Some(handler) => {
                let delegate = Arc::new(CollectingDelegate::new());
                handler.handle(request, delegate.clone()).await?;
                let next = delegate.take_redirect();
                let response = delegate
                    .take_response()
                    .ok_or_else(|| Error::transport("handler completed without a response"))?;
                Ok((response, next))
            }
            None => Ok((self.transport.perform(request).await?, None)),
        }
    }

    /// Create a request builder bound to this client
    pub fn request(&self, method: Method, url: impl AsRef<str>) -> Result<RequestBuilder> {
        Ok(RequestBuilder {
            client: self.clone(),
            request: Request::new(method, url)?,
        })
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

/// Builder for executing requests with the client
pub struct RequestBuilder {
    client: HttpClient,
    request: Request,
}

impl RequestBuilder {
    /// Set a header
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.request = self.request.header(name, value);
        self
    }

    /// Set the body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.request = self.request.body(body.into());
        self
    }

    /// Set JSON body
    pub fn json<T: serde::Serialize>(mut self, data: &T) -> Result<Self> {
        self.request = self.request.json(data)?;
        Ok(self)
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request = self.request.timeout(timeout);
        self
    }

    /// Execute the request
    pub async fn send(self) -> Result<Response> {
        self.client.execute(self.request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::http::MockTransport;
    use crate::relay::ObservationEvent;

    fn capture_all() -> RelayConfig {
        RelayConfig::default().capture(|_| true).sink(|_| {})
    }

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.config().user_agent, DEFAULT_USER_AGENT);
        assert!(client.handlers().is_empty());
    }

    #[tokio::test]
    async fn test_execute_without_handlers_goes_straight_through() {
        let transport = Arc::new(MockTransport::new());
        let client = HttpClient::with_transport(transport.clone(), HttpClientConfig::default());

        let response = client.get("http://example.com/plain").await.unwrap();
        assert_eq!(response.status_code(), 200);

        let seen = transport.seen();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].relayed);
    }

    #[tokio::test]
    async fn test_redirect_re_dispatch_logs_each_hop() {
        let transport = Arc::new(
            MockTransport::new()
                .reply(Ok(MockTransport::redirect("http://example.com/a", "/b")))
                .reply(Ok(MockTransport::ok("http://example.com/b", 200, "done"))),
        );
        let client = HttpClient::with_transport(transport.clone(), HttpClientConfig::default());

        let sent = Arc::new(Mutex::new(Vec::new()));
        let seen_sent = sent.clone();
        client.install_logging(capture_all().observer(move |event| {
            if let ObservationEvent::RequestSent(snapshot) = event {
                seen_sent.lock().push(snapshot.url.clone());
            }
        }));

        let response = client.get("http://example.com/a").await.unwrap();
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.text().unwrap(), "done");

        // one RequestSent per hop, each hop marked before dispatch
        let sent = sent.lock();
        assert_eq!(sent.as_slice(), ["http://example.com/a", "http://example.com/b"]);
        let seen = transport.seen();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].url, "http://example.com/b");
        assert!(seen.iter().all(|r| r.relayed));
    }

    #[tokio::test]
    async fn test_client_logs_real_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hi"))
            .mount(&server)
            .await;

        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = lines.clone();
        let client = HttpClient::new().unwrap();
        client.install_logging(
            RelayConfig::default()
                .capture(|_| true)
                .sink(move |line| sink_lines.lock().push(line.to_string())),
        );

        let response = client.get(format!("{}/hello", server.uri())).await.unwrap();
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.text().unwrap(), "hi");

        let lines = lines.lock();
        assert!(lines.iter().any(|l| l.starts_with("--> GET")));
        assert!(lines.iter().any(|l| l.starts_with("<-- 200")));
    }

    #[tokio::test]
    async fn test_uncaptured_requests_are_not_logged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quiet"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = lines.clone();
        let client = HttpClient::new().unwrap();
        client.install_logging(
            RelayConfig::default()
                .capture(|_| false)
                .sink(move |line| sink_lines.lock().push(line.to_string())),
        );

        let response = client.get(format!("{}/quiet", server.uri())).await.unwrap();
        assert_eq!(response.status_code(), 204);
        assert!(lines.lock().is_empty());
    }

    #[tokio::test]
    async fn test_request_builder() {
        let transport = Arc::new(MockTransport::new());
        let client = HttpClient::with_transport(transport.clone(), HttpClientConfig::default());

        let response = client
            .request(Method::POST, "http://example.com/api")
            .unwrap()
            .header("x-tag", "t1")
            .body("data")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status_code(), 200);
        let seen = transport.seen();
        assert_eq!(seen[0].method, "POST");
        assert_eq!(&seen[0].body[..], b"data");
    }
}

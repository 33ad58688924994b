// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request types and builder

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use super::body::Body;
use super::headers;
use super::response::Response;
use crate::error::Result;

/// HTTP request representation
#[derive(Debug)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Body>,
    /// Request timeout
    pub timeout: Option<Duration>,
    /// Follow redirects signaled back by the relay
    pub follow_redirects: bool,
    /// Maximum redirects to follow
    pub max_redirects: u32,
    /// Anti-recursion marker: set only on the copy a relay re-issues
    relayed: bool,
}

impl Request {
    /// Create a new GET request
    pub fn get(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    /// Create a new POST request
    pub fn post(url: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::POST, url)
    }

    /// Create a new request with arbitrary method
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            method,
            url: Url::parse(url.as_ref())?,
            headers: HeaderMap::new(),
            body: None,
            timeout: Some(Duration::from_secs(30)),
            follow_redirects: true,
            max_redirects: 10,
            relayed: false,
        })
    }

    /// Set a header. Unparseable names or values are silently dropped.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Set multiple headers
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        for (name, value) in headers {
            self = self.header(name, value);
        }
        self
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set JSON body
    pub fn json<T: Serialize>(mut self, data: &T) -> Result<Self> {
        let json = serde_json::to_vec(data)?;
        self.body = Some(Body::Buffered(Bytes::from(json)));
        self = self.header(headers::CONTENT_TYPE, "application/json");
        Ok(self)
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable timeout
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Set follow redirects
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Set max redirects
    pub fn max_redirects(mut self, max: u32) -> Self {
        self.max_redirects = max;
        self
    }

    /// Whether this request was re-issued by a relay.
    ///
    /// Marked requests are never intercepted again; this is what keeps a
    /// relay from capturing its own outbound traffic.
    pub fn is_relayed(&self) -> bool {
        self.relayed
    }

    /// Tag the request as relay-issued. Applied only to the relay's copy,
    /// never to the caller's original.
    pub(crate) fn mark_relayed(mut self) -> Self {
        self.relayed = true;
        self
    }

    /// Clone the request when the body is replayable.
    ///
    /// Returns `None` when the body is a stream, which can be consumed
    /// only once.
    pub fn try_clone(&self) -> Option<Request> {
        let body = match &self.body {
            None => None,
            Some(Body::Buffered(bytes)) => Some(Body::Buffered(bytes.clone())),
            Some(Body::Stream(_)) => return None,
        };
        Some(Request {
            method: self.method.clone(),
            url: self.url.clone(),
            headers: self.headers.clone(),
            body,
            timeout: self.timeout,
            follow_redirects: self.follow_redirects,
            max_redirects: self.max_redirects,
            relayed: self.relayed,
        })
    }

    /// Replace a stream body with its fully drained bytes.
    ///
    /// Returns the drain error, if any, alongside the rebuilt request; the
    /// bytes read before the error are kept as the body.
    pub async fn buffer_body(mut self) -> (Request, Option<std::io::Error>) {
        match self.body.take() {
            None => (self, None),
            Some(body) => {
                let (bytes, err) = body.into_bytes().await;
                self.body = Some(Body::Buffered(bytes));
                (self, err)
            }
        }
    }

    /// Get the URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }

    /// Get the host
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Get the origin
    pub fn origin(&self) -> String {
        format!(
            "{}://{}{}",
            self.url.scheme(),
            self.url.host_str().unwrap_or(""),
            self.url
                .port()
                .map(|p| format!(":{}", p))
                .unwrap_or_default()
        )
    }
}

/// Build the follow-up request for a redirect response.
///
/// Method rewriting matches what mainstream clients do: 303 always becomes
/// a bodyless GET, 301/302 rewrite POST to GET, 307/308 preserve method and
/// body. `authorization` and `cookie` are dropped when the redirect leaves
/// the original host. Returns `None` when the Location header is absent or
/// unresolvable, or when a preserved body cannot be replayed.
///
/// The follow-up is a fresh logical request: it carries no relay marker, so
/// re-dispatching it is captured (and logged) anew.
pub fn follow_redirect(previous: &Request, response: &Response) -> Option<Request> {
    let target = response.redirect_target()?;
    let status = response.status.as_u16();

    let (method, keep_body) = match status {
        303 => (Method::GET, false),
        301 | 302 if previous.method == Method::POST => (Method::GET, false),
        _ => (previous.method.clone(), true),
    };

    let body = if keep_body {
        match &previous.body {
            None => None,
            Some(Body::Buffered(bytes)) => Some(Body::Buffered(bytes.clone())),
            Some(Body::Stream(_)) => return None,
        }
    } else {
        None
    };

    let mut headers = previous.headers.clone();
    if !keep_body {
        headers.remove(headers::CONTENT_TYPE);
        headers.remove(headers::CONTENT_LENGTH);
        headers.remove(headers::TRANSFER_ENCODING);
    }
    if target.host_str() != previous.url.host_str() {
        headers.remove(headers::AUTHORIZATION);
        headers.remove(headers::COOKIE);
    }

    Some(Request {
        method,
        url: target,
        headers,
        body,
        timeout: previous.timeout,
        follow_redirects: previous.follow_redirects,
        max_redirects: previous.max_redirects,
        relayed: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn redirect_response(from: &str, status: u16, location: &str) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            headers::LOCATION,
            HeaderValue::try_from(location).unwrap(),
        );
        Response::new(
            StatusCode::from_u16(status).unwrap(),
            headers,
            Bytes::new(),
            Url::parse(from).unwrap(),
            0,
        )
    }

    #[test]
    fn test_request_creation() {
        let req = Request::get("https://example.com/path").unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url.host_str(), Some("example.com"));
        assert!(!req.is_relayed());
    }

    #[test]
    fn test_request_headers() {
        let req = Request::get("https://example.com")
            .unwrap()
            .header("x-custom", "value");
        assert_eq!(
            req.headers.get("x-custom").map(|v| v.to_str().unwrap()),
            Some("value")
        );
    }

    #[test]
    fn test_request_origin() {
        let req = Request::get("https://example.com:8080/path").unwrap();
        assert_eq!(req.origin(), "https://example.com:8080");
    }

    #[test]
    fn test_try_clone_fails_for_stream_body() {
        let chunks: Vec<std::io::Result<Bytes>> = vec![Ok(Bytes::from("x"))];
        let req = Request::post("https://example.com")
            .unwrap()
            .body(Body::stream(futures::stream::iter(chunks)));
        assert!(req.try_clone().is_none());
    }

    #[tokio::test]
    async fn test_buffer_body_replaces_stream() {
        let chunks: Vec<std::io::Result<Bytes>> =
            vec![Ok(Bytes::from("ab")), Ok(Bytes::from("cd"))];
        let req = Request::post("https://example.com")
            .unwrap()
            .body(Body::stream(futures::stream::iter(chunks)));
        let (req, err) = req.buffer_body().await;
        assert!(err.is_none());
        assert_eq!(
            req.body.as_ref().and_then(|b| b.as_bytes()).unwrap(),
            &Bytes::from("abcd")
        );
    }

    #[test]
    fn test_follow_redirect_303_becomes_get() {
        let req = Request::post("https://example.com/submit")
            .unwrap()
            .header(headers::CONTENT_TYPE, "application/json")
            .body("{}");
        let resp = redirect_response("https://example.com/submit", 303, "/done");
        let next = follow_redirect(&req, &resp).unwrap();
        assert_eq!(next.method, Method::GET);
        assert!(next.body.is_none());
        assert!(next.headers.get(headers::CONTENT_TYPE).is_none());
        assert_eq!(next.url.as_str(), "https://example.com/done");
        assert!(!next.is_relayed());
    }

    #[test]
    fn test_follow_redirect_307_preserves_method_and_body() {
        let req = Request::post("https://example.com/submit")
            .unwrap()
            .body("payload");
        let resp = redirect_response("https://example.com/submit", 307, "/retry");
        let next = follow_redirect(&req, &resp).unwrap();
        assert_eq!(next.method, Method::POST);
        assert_eq!(
            next.body.as_ref().and_then(|b| b.as_bytes()).unwrap(),
            &Bytes::from("payload")
        );
    }

    #[test]
    fn test_follow_redirect_strips_auth_cross_host() {
        let req = Request::get("https://example.com/a")
            .unwrap()
            .header(headers::AUTHORIZATION, "Bearer token");
        let resp = redirect_response("https://example.com/a", 302, "https://other.com/b");
        let next = follow_redirect(&req, &resp).unwrap();
        assert!(next.headers.get(headers::AUTHORIZATION).is_none());
        assert_eq!(next.url.host_str(), Some("other.com"));
    }

    #[test]
    fn test_follow_redirect_without_location() {
        let req = Request::get("https://example.com/a").unwrap();
        let mut resp = redirect_response("https://example.com/a", 302, "/b");
        resp.headers.remove(headers::LOCATION);
        assert!(follow_redirect(&req, &resp).is_none());
    }
}

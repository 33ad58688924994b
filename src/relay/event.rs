// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Observation events
//!
//! One snapshot per lifecycle point: sent, received, failed. Snapshots are
//! handed to the formatter and sink, never retained by the relay.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::http::{headers, Request, Response};

/// A log-worthy snapshot emitted at a lifecycle point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ObservationEvent {
    /// The request is about to be dispatched
    RequestSent(RequestSnapshot),
    /// The response was fully forwarded to the caller
    ResponseReceived(ResponseSnapshot),
    /// The transport failed; the error was forwarded to the caller
    RequestFailed(FailureSnapshot),
}

impl ObservationEvent {
    /// Whether this event ends the request's lifecycle
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ObservationEvent::RequestSent(_))
    }

    /// URL of the request this event belongs to
    pub fn url(&self) -> &str {
        match self {
            ObservationEvent::RequestSent(s) => &s.url,
            ObservationEvent::ResponseReceived(s) => &s.url,
            ObservationEvent::RequestFailed(s) => &s.url,
        }
    }
}

/// Outbound request snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSnapshot {
    /// HTTP method
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Body decoded as UTF-8 text; `None` when absent, suppressed, or not
    /// valid text
    pub body: Option<String>,
    /// Body size in bytes
    pub body_len: usize,
    /// Content type
    pub content_type: Option<String>,
    /// Wall-clock capture time
    pub timestamp: DateTime<Utc>,
}

/// Response snapshot, captured after forwarding completed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    /// HTTP method of the originating request
    pub method: String,
    /// URL the response was served from
    pub url: String,
    /// Status code
    pub status: u16,
    /// Status text
    pub status_text: String,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Body decoded as UTF-8 text; `None` when absent, suppressed, or not
    /// valid text
    pub body: Option<String>,
    /// Body size in bytes
    pub body_len: usize,
    /// Content type
    pub content_type: Option<String>,
    /// Time between dispatch and forwarded completion
    pub elapsed: Duration,
    /// Wall-clock capture time
    pub timestamp: DateTime<Utc>,
}

/// Failure snapshot, captured after the error was forwarded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureSnapshot {
    /// HTTP method of the originating request
    pub method: String,
    /// Request URL
    pub url: String,
    /// Error description
    pub description: String,
    /// Failure classification, when known
    pub reason: Option<String>,
    /// Recovery hint, when known
    pub recovery_suggestion: Option<String>,
    /// Time between dispatch and the forwarded failure
    pub elapsed: Duration,
    /// Wall-clock capture time
    pub timestamp: DateTime<Utc>,
}

impl RequestSnapshot {
    /// Capture an outbound request. `capture_body` false drops body text;
    /// `max_body` bounds how many bytes are decoded.
    ///
    /// Expects a buffered body: the relay drains streams before capturing.
    pub fn capture(request: &Request, capture_body: bool, max_body: usize) -> Self {
        let body_bytes = request.body.as_ref().and_then(|b| b.as_bytes());
        let body_len = body_bytes.map(|b| b.len()).unwrap_or(0);
        let body = if capture_body {
            body_bytes.and_then(|b| snapshot_text(b, max_body))
        } else {
            None
        };

        Self {
            method: request.method.to_string(),
            url: request.url.to_string(),
            headers: header_map(&request.headers),
            body,
            body_len,
            content_type: header_value(&request.headers, headers::CONTENT_TYPE),
            timestamp: Utc::now(),
        }
    }

    /// Whether the captured body claims to be JSON
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("json"))
            .unwrap_or(false)
    }
}

impl ResponseSnapshot {
    /// Capture a forwarded response
    pub fn capture(
        method: &str,
        response: &Response,
        elapsed: Duration,
        capture_body: bool,
        max_body: usize,
    ) -> Self {
        let body = if capture_body {
            snapshot_text(&response.body, max_body)
        } else {
            None
        };

        Self {
            method: method.to_string(),
            url: response.url.to_string(),
            status: response.status.as_u16(),
            status_text: response
                .status
                .canonical_reason()
                .unwrap_or("")
                .to_string(),
            headers: header_map(&response.headers),
            body,
            body_len: response.body.len(),
            content_type: response.content_type().map(String::from),
            elapsed,
            timestamp: Utc::now(),
        }
    }

    /// Whether the response was a success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl FailureSnapshot {
    /// Capture a forwarded failure
    pub fn capture(method: &str, url: &str, error: &Error, elapsed: Duration) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            description: error.to_string(),
            reason: error.reason().map(String::from),
            recovery_suggestion: error.recovery_suggestion().map(String::from),
            elapsed,
            timestamp: Utc::now(),
        }
    }
}

fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
        .collect()
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Strict UTF-8 decode of at most `max` bytes; binary bodies are
/// represented by length alone.
fn snapshot_text(bytes: &[u8], max: usize) -> Option<String> {
    let slice = &bytes[..bytes.len().min(max)];
    std::str::from_utf8(slice).ok().map(String::from)
}

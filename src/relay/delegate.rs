// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Caller-side delegate interface
//!
//! Mirrors the streaming callbacks of a URL loading client: response head
//! first, then body bytes, then completion. Redirects and failures are
//! signaled explicitly, never acted on by the relay itself.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;

use crate::error::Error;
use crate::http::{Request, Response, ResponseHead};

/// Receives a relayed load exactly as the uncaptured path would produce it
#[async_trait]
pub trait LoadDelegate: Send + Sync {
    /// The transport reported a redirect. `next` is the follow-up request
    /// the caller may re-dispatch; `response` is the triggering hop. The
    /// relay does not follow the redirect itself.
    async fn on_redirect(&self, _next: &Request, _response: &ResponseHead) {}

    /// Response status and headers, always before any body bytes
    async fn on_response(&self, _head: &ResponseHead) {}

    /// A chunk of response body bytes
    async fn on_data(&self, _chunk: &Bytes) {}

    /// The load finished successfully
    async fn on_complete(&self) {}

    /// The load failed; the error is forwarded verbatim
    async fn on_failure(&self, _error: &Error) {}
}

/// Delegate that reassembles the forwarded stream into a [`Response`]
pub struct CollectingDelegate {
    inner: Mutex<Collected>,
}

#[derive(Default)]
struct Collected {
    head: Option<ResponseHead>,
    body: BytesMut,
    complete: bool,
    redirect: Option<Request>,
    failure: Option<String>,
}

impl CollectingDelegate {
    /// Create an empty collector
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Collected::default()),
        }
    }

    /// The reassembled response, once completion was signaled
    pub fn take_response(&self) -> Option<Response> {
        let mut inner = self.inner.lock();
        if !inner.complete {
            return None;
        }
        let head = inner.head.take()?;
        let body = std::mem::take(&mut inner.body).freeze();
        Some(Response::new(head.status, head.headers, body, head.url, 0))
    }

    /// The follow-up request from a signaled redirect, if any
    pub fn take_redirect(&self) -> Option<Request> {
        self.inner.lock().redirect.take()
    }

    /// Description of a forwarded failure, if any
    pub fn failure(&self) -> Option<String> {
        self.inner.lock().failure.clone()
    }
}

impl Default for CollectingDelegate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoadDelegate for CollectingDelegate {
    async fn on_redirect(&self, next: &Request, _response: &ResponseHead) {
        self.inner.lock().redirect = next.try_clone();
    }

    async fn on_response(&self, head: &ResponseHead) {
        self.inner.lock().head = Some(head.clone());
    }

    async fn on_data(&self, chunk: &Bytes) {
        self.inner.lock().body.extend_from_slice(chunk);
    }

    async fn on_complete(&self) {
        self.inner.lock().complete = true;
    }

    async fn on_failure(&self, error: &Error) {
        self.inner.lock().failure = Some(error.to_string());
    }
}

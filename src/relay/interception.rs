// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! The interception relay
//!
//! Captures an outbound request, performs it exactly once through the real
//! transport, forwards the outcome to the caller byte-for-byte unchanged,
//! and emits one observation event per lifecycle point.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::delegate::LoadDelegate;
use super::event::{FailureSnapshot, ObservationEvent, RequestSnapshot, ResponseSnapshot};
use super::handler::RequestHandler;
use crate::config::RelayConfig;
use crate::error::Result;
use crate::http::{follow_redirect, Request, Response, Transport};

/// Lifecycle of a single interception instance. No backward transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// Created, not yet started
    Idle,
    /// The real request is in flight
    Dispatched,
    /// The response was forwarded to the caller
    Completed,
    /// The error was forwarded to the caller
    Failed,
}

/// Logging relay: decides capture, executes once, forwards unchanged
pub struct LoggingRelay {
    transport: Arc<dyn Transport>,
    config: RelayConfig,
}

impl LoggingRelay {
    /// Create a relay over a transport
    pub fn new(transport: Arc<dyn Transport>, config: RelayConfig) -> Self {
        Self { transport, config }
    }

    /// Capture decision: the configured predicate, unless the request was
    /// issued by a relay already (anti-recursion marker). Side-effect free.
    pub fn should_capture(&self, request: &Request) -> bool {
        !request.is_relayed() && self.config.wants(request)
    }

    /// Begin an interception instance for a claimed request
    pub fn begin(&self, request: Request, delegate: Arc<dyn LoadDelegate>) -> Interception {
        Interception {
            transport: self.transport.clone(),
            config: self.config.clone(),
            delegate,
            request: Mutex::new(Some(request)),
            state: Mutex::new(RelayState::Idle),
        }
    }

    /// The relay's configuration
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

#[async_trait]
impl RequestHandler for LoggingRelay {
    fn should_intercept(&self, request: &Request) -> bool {
        self.should_capture(request)
    }

    async fn handle(&self, request: Request, delegate: Arc<dyn LoadDelegate>) -> Result<()> {
        self.begin(request, delegate).start().await
    }
}

/// One in-flight interception: the marked request copy, the start
/// timestamp, and the `Idle → Dispatched → {Completed, Failed}` lifecycle.
pub struct Interception {
    transport: Arc<dyn Transport>,
    config: RelayConfig,
    delegate: Arc<dyn LoadDelegate>,
    request: Mutex<Option<Request>>,
    state: Mutex<RelayState>,
}

impl Interception {
    /// Dispatch the captured request.
    ///
    /// Some callers invoke their start hook defensively more than once;
    /// only the first call dispatches, later calls return immediately.
    pub async fn start(&self) -> Result<()> {
        let request = {
            let mut state = self.state.lock();
            if *state != RelayState::Idle {
                return Ok(());
            }
            let Some(request) = self.request.lock().take() else {
                return Ok(());
            };
            *state = RelayState::Dispatched;
            request
        };

        let started = Instant::now();

        // Drain a stream body now: the logged snapshot and the bytes handed
        // to the transport must be identical.
        let (request, drain_err) = request.buffer_body().await;
        if let Some(ref e) = drain_err {
            tracing::debug!(error = %e, url = %request.url, "body stream ended early, logging partial body");
        }
        let request = request.mark_relayed();

        let (capture_body, max_body) = self.config.body_capture();
        let sent = RequestSnapshot::capture(&request, capture_body, max_body);
        let method = sent.method.clone();
        let url = sent.url.clone();

        tracing::info!(method = %method, url = %url, "request");
        self.config.emit(&ObservationEvent::RequestSent(sent));

        // Buffered body, so the clone for redirect follow-up always exists.
        let replay = request.try_clone();

        match self.transport.perform(request).await {
            Ok(response) => {
                self.forward(&response, replay.as_ref()).await;
                *self.state.lock() = RelayState::Completed;

                let snapshot = ResponseSnapshot::capture(
                    &method,
                    &response,
                    started.elapsed(),
                    capture_body,
                    max_body,
                );
                tracing::info!(
                    method = %method,
                    url = %url,
                    status = snapshot.status,
                    elapsed_ms = snapshot.elapsed.as_millis() as u64,
                    "response"
                );
                self.config
                    .emit(&ObservationEvent::ResponseReceived(snapshot));
                Ok(())
            }
            Err(error) => {
                self.delegate.on_failure(&error).await;
                *self.state.lock() = RelayState::Failed;

                let snapshot =
                    FailureSnapshot::capture(&method, &url, &error, started.elapsed());
                tracing::info!(method = %method, url = %url, error = %error, "request failed");
                self.config.emit(&ObservationEvent::RequestFailed(snapshot));
                Err(error)
            }
        }
    }

    /// Forward the transport's outcome to the delegate in caller order:
    /// redirect signal, then head, then body bytes, then completion.
    async fn forward(&self, response: &Response, previous: Option<&Request>) {
        if response.is_redirect() {
            if let Some(previous) = previous {
                if let Some(next) = follow_redirect(previous, response) {
                    self.delegate.on_redirect(&next, &response.head()).await;
                }
            }
        }
        self.delegate.on_response(&response.head()).await;
        self.delegate.on_data(&response.body).await;
        self.delegate.on_complete().await;
    }

    /// Advisory stop. The dispatched request runs to completion; the
    /// signal is accepted in any state and otherwise ignored.
    pub fn stop(&self) {
        tracing::trace!(state = ?*self.state.lock(), "stop requested");
    }

    /// Current lifecycle state
    pub fn state(&self) -> RelayState {
        *self.state.lock()
    }
}

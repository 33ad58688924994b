// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Relay configuration
//!
//! An explicitly constructed value handed to the relay at construction
//! time. `RelayConfig::default()` is the process-wide default: capture only
//! in debug builds, formatted log lines to stdout.

use std::sync::Arc;

use crate::format;
use crate::http::Request;
use crate::relay::ObservationEvent;

/// Sink for formatted log output
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Per-request capture decision
pub type CapturePredicate = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

/// Structured event callback
pub type EventCallback = Arc<dyn Fn(&ObservationEvent) + Send + Sync>;

/// Relay configuration: capture predicate, log sink, body limits
#[derive(Clone)]
pub struct RelayConfig {
    sink: LogSink,
    capture: CapturePredicate,
    observer: Option<EventCallback>,
    capture_bodies: bool,
    max_body_size: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            sink: Arc::new(|line| println!("{}", line)),
            capture: Arc::new(|_| cfg!(debug_assertions)),
            observer: None,
            capture_bodies: true,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

impl RelayConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the log sink. The default writes to stdout.
    pub fn sink<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.sink = Arc::new(sink);
        self
    }

    /// Replace the capture predicate. The default captures only in debug
    /// builds.
    pub fn capture<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.capture = Arc::new(predicate);
        self
    }

    /// Observe structured events alongside the text log
    pub fn observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&ObservationEvent) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Set body capture settings
    pub fn capture_bodies(mut self, capture: bool, max_size: usize) -> Self {
        self.capture_bodies = capture;
        self.max_body_size = max_size;
        self
    }

    /// Evaluate the capture predicate
    pub(crate) fn wants(&self, request: &Request) -> bool {
        (self.capture)(request)
    }

    /// Body capture flag and size limit
    pub(crate) fn body_capture(&self) -> (bool, usize) {
        (self.capture_bodies, self.max_body_size)
    }

    /// Render and deliver an event. Rendering degrades internally and the
    /// sink is infallible, so emitting can never fail the request.
    pub(crate) fn emit(&self, event: &ObservationEvent) {
        if let Some(ref observer) = self.observer {
            observer(event);
        }
        (self.sink)(&format::format_event(event));
    }
}

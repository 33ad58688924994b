// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Wiretap - Transparent HTTP Traffic Logger
//!
//! Intercepts outgoing HTTP(S) requests, performs each one exactly once
//! through the real network stack, forwards the outcome to the caller
//! byte-for-byte unchanged, and prints a human-readable log of the
//! exchange.
//!
//! ## Features
//!
//! - Non-interference: the caller sees exactly what the uncaptured path
//!   would produce, including explicit redirect signaling
//! - Anti-recursion marker: relay-issued requests are never re-intercepted
//! - Exactly-once dispatch: defensive double starts are no-ops
//! - Capture predicate: log only what you want (default: debug builds)
//! - Pluggable sink: stdout by default, any callback otherwise
//! - Streamed request bodies drained and forwarded identically
//! - JSON bodies pretty-printed; binary bodies shown as byte counts
//!
//! ## Example
//!
//! ```rust,no_run
//! use wiretap::{HttpClient, RelayConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new()?;
//!     client.install_logging(RelayConfig::default().capture(|_| true));
//!
//!     let response = client.get("https://example.com/api/users").await?;
//!     println!("{} ({} bytes)", response.status, response.body_len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod relay;

// Re-exports for convenience

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{
    Body, ByteStream, HttpClient, HttpClientConfig, Request, RequestBuilder, Response,
    ResponseHead, Transport, DEFAULT_USER_AGENT,
};

// Relay
pub use relay::{
    CollectingDelegate, HandlerChain, Interception, LoadDelegate, LoggingRelay, RelayState,
    RequestHandler,
};
pub use relay::{FailureSnapshot, ObservationEvent, RequestSnapshot, ResponseSnapshot};

// Configuration
pub use config::{CapturePredicate, EventCallback, LogSink, RelayConfig};

/// Wiretap version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

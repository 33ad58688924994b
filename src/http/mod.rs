// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for the wiretap relay
//!
//! Request/response types, the single-hop transport seam, and a client
//! facade that dispatches requests through the handler chain.

mod body;
mod client;
mod request;
mod response;
mod transport;

pub use body::{Body, ByteStream};
pub use client::{HttpClient, HttpClientConfig, RequestBuilder};
pub use request::{follow_redirect, Request};
pub use response::{Response, ResponseHead};
pub use transport::{ReqwestTransport, Transport};

#[cfg(test)]
pub(crate) use transport::testing::MockTransport;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("wiretap/", env!("CARGO_PKG_VERSION"));

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const AUTHORIZATION: &str = "authorization";
    pub const CONTENT_LENGTH: &str = "content-length";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const LOCATION: &str = "location";
    pub const TRANSFER_ENCODING: &str = "transfer-encoding";
    pub const USER_AGENT: &str = "user-agent";
}

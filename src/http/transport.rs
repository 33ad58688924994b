// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Single-hop transport seam
//!
//! The relay must see every redirect hop to re-signal it to the caller, so
//! the production transport disables reqwest's own redirect following and
//! performs exactly one request per call.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::redirect::Policy;

use super::client::HttpClientConfig;
use super::request::Request;
use super::response::Response;
use crate::error::{Error, Result};

/// Performs a single request/response exchange. Never follows redirects.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(&self, request: Request) -> Result<Response>;
}

/// Production transport backed by reqwest
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the transport from a client configuration
    pub fn new(config: &HttpClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::none())
            .default_headers(config.default_headers.clone())
            .cookie_store(false);

        if let Some(ref proxy_url) = config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?,
            );
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn perform(&self, request: Request) -> Result<Response> {
        let start = Instant::now();

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());

        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(body) = request.body {
            let (bytes, drain_err) = body.into_bytes().await;
            if let Some(e) = drain_err {
                tracing::debug!(error = %e, "request body stream ended early");
            }
            builder = builder.body(bytes);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let body = response.bytes().await?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        Ok(Response::new(status, headers, body, final_url, elapsed_ms))
    }
}

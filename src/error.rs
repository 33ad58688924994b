// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the wiretap relay
//!
//! Transport failures are forwarded to the caller verbatim; the helpers
//! here only classify them for the failure log line.

use thiserror::Error;

/// Result type alias for wiretap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the wiretap relay
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure outside reqwest (custom or mock transports)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Error::Transport(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_timeout())
    }

    /// Check if this is a connection-level failure
    pub fn is_connect(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_connect())
    }

    /// Short classification of the failure, when one is known
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Error::Http(e) if e.is_timeout() => Some("request timed out"),
            Error::Http(e) if e.is_connect() => Some("connection could not be established"),
            Error::Http(e) if e.is_builder() => Some("request could not be built"),
            Error::Transport(_) => Some("transport failure"),
            Error::Url(_) => Some("invalid URL"),
            Error::Io(_) => Some("I/O failure"),
            _ => None,
        }
    }

    /// Recovery hint for the failure log line, when one is known
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Error::Http(e) if e.is_timeout() => {
                Some("increase the request timeout or check network latency")
            }
            Error::Http(e) if e.is_connect() => {
                Some("verify the host is reachable and the port is open")
            }
            Error::Url(_) => Some("check the URL scheme and host"),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

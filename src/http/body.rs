// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request body representation

use std::fmt;
use std::io;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures::stream::{Stream, StreamExt};

/// Boxed stream of body chunks
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + Sync>>;

/// Outgoing request body
///
/// Bodies arrive either fully buffered or as a stream of chunks. The relay
/// drains stream bodies before dispatch so the logged snapshot and the
/// bytes handed to the transport are identical.
pub enum Body {
    /// Body held fully in memory
    Buffered(Bytes),
    /// Body produced incrementally by a stream, consumable once
    Stream(ByteStream),
}

impl Body {
    /// Create an empty buffered body
    pub fn empty() -> Self {
        Body::Buffered(Bytes::new())
    }

    /// Create a buffered body
    pub fn buffered(bytes: impl Into<Bytes>) -> Self {
        Body::Buffered(bytes.into())
    }

    /// Create a stream body
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + Sync + 'static,
    {
        Body::Stream(Box::pin(stream))
    }

    /// Whether the body is a stream (consumable once)
    pub fn is_stream(&self) -> bool {
        matches!(self, Body::Stream(_))
    }

    /// Buffered bytes, if already in memory
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Body::Buffered(bytes) => Some(bytes),
            Body::Stream(_) => None,
        }
    }

    /// Drain the body into a single buffer.
    ///
    /// Stream bodies are read to completion. A mid-stream read error ends
    /// the drain; everything read up to that point is returned alongside
    /// the error.
    pub async fn into_bytes(self) -> (Bytes, Option<io::Error>) {
        match self {
            Body::Buffered(bytes) => (bytes, None),
            Body::Stream(mut stream) => {
                let mut buf = BytesMut::new();
                while let Some(chunk) = stream.next().await {
                    match chunk {
                        Ok(bytes) => buf.extend_from_slice(&bytes),
                        Err(e) => return (buf.freeze(), Some(e)),
                    }
                }
                (buf.freeze(), None)
            }
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
            Body::Stream(_) => write!(f, "Stream(..)"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Buffered(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Buffered(Bytes::from(bytes))
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Buffered(Bytes::from(s))
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Body::Buffered(Bytes::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn test_buffered_drain() {
        let body = Body::buffered("hello");
        let (bytes, err) = body.into_bytes().await;
        assert_eq!(&bytes[..], b"hello");
        assert!(err.is_none());
    }

    #[tokio::test]
    async fn test_stream_drain_concatenates_chunks() {
        let chunks: Vec<io::Result<Bytes>> = vec![
            Ok(Bytes::from("hel")),
            Ok(Bytes::from("lo ")),
            Ok(Bytes::from("world")),
        ];
        let body = Body::stream(stream::iter(chunks));
        let (bytes, err) = body.into_bytes().await;
        assert_eq!(&bytes[..], b"hello world");
        assert!(err.is_none());
    }

    #[tokio::test]
    async fn test_stream_drain_keeps_partial_bytes_on_error() {
        let chunks: Vec<io::Result<Bytes>> = vec![
            Ok(Bytes::from("part")),
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "cut off")),
            Ok(Bytes::from("never read")),
        ];
        let body = Body::stream(stream::iter(chunks));
        let (bytes, err) = body.into_bytes().await;
        assert_eq!(&bytes[..], b"part");
        assert_eq!(err.unwrap().kind(), io::ErrorKind::UnexpectedEof);
    }
}

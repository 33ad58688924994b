// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Handler registration chain
//!
//! Replaces protocol-class registration with an explicit ordered chain:
//! handlers are consulted most-recently-registered first, and the first one
//! whose `should_intercept` claims a request handles it.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::delegate::LoadDelegate;
use crate::error::Result;
use crate::http::Request;

/// An intercepting request handler
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Whether this handler wants the request. Must be side-effect free.
    fn should_intercept(&self, request: &Request) -> bool;

    /// Take over loading of the request, reporting progress to the
    /// delegate exactly as the unhandled path would.
    async fn handle(&self, request: Request, delegate: Arc<dyn LoadDelegate>) -> Result<()>;
}

/// Ordered chain of registered handlers
pub struct HandlerChain {
    handlers: RwLock<Vec<Arc<dyn RequestHandler>>>,
}

impl HandlerChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Register a handler ahead of previously registered ones.
    ///
    /// Registering a handler that is already present is a no-op.
    pub fn register(&self, handler: Arc<dyn RequestHandler>) {
        let mut handlers = self.handlers.write();
        if handlers.iter().any(|h| Arc::ptr_eq(h, &handler)) {
            return;
        }
        handlers.insert(0, handler);
    }

    /// Remove a handler. Unregistering one that is not present is a no-op.
    pub fn unregister(&self, handler: &Arc<dyn RequestHandler>) {
        self.handlers.write().retain(|h| !Arc::ptr_eq(h, handler));
    }

    /// First registered handler claiming the request
    pub fn resolve(&self, request: &Request) -> Option<Arc<dyn RequestHandler>> {
        self.handlers
            .read()
            .iter()
            .find(|h| h.should_intercept(request))
            .cloned()
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }
}

impl Default for HandlerChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClaimHandler {
        claims: bool,
    }

    #[async_trait]
    impl RequestHandler for ClaimHandler {
        fn should_intercept(&self, _request: &Request) -> bool {
            self.claims
        }

        async fn handle(
            &self,
            _request: Request,
            _delegate: Arc<dyn LoadDelegate>,
        ) -> Result<()> {
            Ok(())
        }
    }

    fn handler(claims: bool) -> Arc<dyn RequestHandler> {
        Arc::new(ClaimHandler { claims })
    }

    #[test]
    fn test_register_deduplicates() {
        let chain = HandlerChain::new();
        let h = handler(true);
        chain.register(h.clone());
        chain.register(h.clone());
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let chain = HandlerChain::new();
        let h = handler(true);
        chain.register(h.clone());
        chain.unregister(&h);
        chain.unregister(&h);
        assert!(chain.is_empty());
    }

    #[test]
    fn test_resolve_prefers_newest_registration() {
        let chain = HandlerChain::new();
        let older = handler(true);
        let newer = handler(true);
        chain.register(older.clone());
        chain.register(newer.clone());

        let request = Request::get("https://example.com").unwrap();
        let resolved = chain.resolve(&request).unwrap();
        assert!(Arc::ptr_eq(&resolved, &newer));
    }

    #[test]
    fn test_resolve_skips_declining_handlers() {
        let chain = HandlerChain::new();
        let declining = handler(false);
        let claiming = handler(true);
        chain.register(claiming.clone());
        chain.register(declining);

        let request = Request::get("https://example.com").unwrap();
        let resolved = chain.resolve(&request).unwrap();
        assert!(Arc::ptr_eq(&resolved, &claiming));
    }

    #[test]
    fn test_resolve_none_when_nothing_claims() {
        let chain = HandlerChain::new();
        chain.register(handler(false));

        let request = Request::get("https://example.com").unwrap();
        assert!(chain.resolve(&request).is_none());
    }
}

// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request interception and pass-through relay
//!
//! Captures outbound requests, performs them exactly once through the real
//! transport, forwards the outcome to the caller unchanged, and emits one
//! observation event per lifecycle point.

mod delegate;
mod event;
mod handler;
mod interception;

pub use delegate::{CollectingDelegate, LoadDelegate};
pub use event::{FailureSnapshot, ObservationEvent, RequestSnapshot, ResponseSnapshot};
pub use handler::{HandlerChain, RequestHandler};
pub use interception::{Interception, LoggingRelay, RelayState};

// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Human-readable rendering of observation events
//!
//! `-->` marks requests, `<--` responses, `--x` failures. Bodies that parse
//! as JSON are pretty-printed, other text is shown raw, and anything else
//! becomes a byte-count placeholder. Rendering never fails; undecodable
//! content degrades line by line.

use std::collections::HashMap;

use serde_json::Value;

use crate::relay::{FailureSnapshot, ObservationEvent, RequestSnapshot, ResponseSnapshot};

const INDENT: &str = "    ";

/// Render an event as a log block
pub fn format_event(event: &ObservationEvent) -> String {
    match event {
        ObservationEvent::RequestSent(snapshot) => format_request(snapshot),
        ObservationEvent::ResponseReceived(snapshot) => format_response(snapshot),
        ObservationEvent::RequestFailed(snapshot) => format_failure(snapshot),
    }
}

/// Render an outbound request
pub fn format_request(snapshot: &RequestSnapshot) -> String {
    let mut out = format!("--> {} {}\n", snapshot.method, snapshot.url);
    push_headers(&mut out, &snapshot.headers);
    push_body(
        &mut out,
        snapshot.body.as_deref(),
        snapshot.body_len,
        snapshot.content_type.as_deref(),
    );
    out
}

/// Render a completed response
pub fn format_response(snapshot: &ResponseSnapshot) -> String {
    let mut out = format!(
        "<-- {} {} {} ({} ms)\n",
        snapshot.status,
        snapshot.status_text,
        snapshot.url,
        snapshot.elapsed.as_millis()
    );
    push_headers(&mut out, &snapshot.headers);
    push_body(
        &mut out,
        snapshot.body.as_deref(),
        snapshot.body_len,
        snapshot.content_type.as_deref(),
    );
    out
}

/// Render a failure
pub fn format_failure(snapshot: &FailureSnapshot) -> String {
    let mut out = format!(
        "--x {} {} failed after {} ms: {}\n",
        snapshot.method,
        snapshot.url,
        snapshot.elapsed.as_millis(),
        snapshot.description
    );
    if let Some(ref reason) = snapshot.reason {
        out.push_str(INDENT);
        out.push_str("reason: ");
        out.push_str(reason);
        out.push('\n');
    }
    if let Some(ref hint) = snapshot.recovery_suggestion {
        out.push_str(INDENT);
        out.push_str("hint: ");
        out.push_str(hint);
        out.push('\n');
    }
    out
}

fn push_headers(out: &mut String, headers: &HashMap<String, String>) {
    // deterministic output regardless of map iteration order
    let mut names: Vec<&String> = headers.keys().collect();
    names.sort();
    for name in names {
        out.push_str(INDENT);
        out.push_str(name);
        out.push_str(": ");
        out.push_str(&headers[name]);
        out.push('\n');
    }
}

fn push_body(out: &mut String, body: Option<&str>, body_len: usize, content_type: Option<&str>) {
    match body {
        None if body_len == 0 => {}
        None => {
            out.push('\n');
            out.push_str(INDENT);
            out.push_str(&format!("<{} bytes, not shown>\n", body_len));
        }
        Some(text) => {
            out.push('\n');
            let rendered = pretty_json(text, content_type).unwrap_or_else(|| text.to_string());
            for line in rendered.lines() {
                out.push_str(INDENT);
                out.push_str(line);
                out.push('\n');
            }
        }
    }
}

/// Pretty-print when the body is JSON, by content type or by shape
fn pretty_json(text: &str, content_type: Option<&str>) -> Option<String> {
    let hinted = content_type.map(|ct| ct.contains("json")).unwrap_or(false);
    let trimmed = text.trim_start();
    if !hinted && !trimmed.starts_with('{') && !trimmed.starts_with('[') {
        return None;
    }
    let value: Value = serde_json::from_str(text).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

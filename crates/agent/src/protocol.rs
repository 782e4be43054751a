// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stream-JSONL message helpers and the restart-sentinel protocol.
//!
//! A restart sentinel is a literal `[CLAUDIX:...]` marker inside the text
//! of a user message. The proxy strips the marker, performs the requested
//! restart, and (depending on the variant) forwards the cleaned message to
//! the new child or discards it.

use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;

/// The five restart protocols a sentinel can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartVariant {
    /// Wait for all pending results, then restart and forward.
    Restart,
    /// Kill immediately, synthesize missing results, restart, forward.
    Force,
    /// `Force`, plus a reminder message; the trigger is not forwarded.
    ForceNoSend,
    /// `Force`, but the child restarts with `--resume <session_id>`.
    ForceResume,
    /// `ForceNoSend` with resume.
    ForceResumeNoSend,
}

impl RestartVariant {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "RESTART" => Some(Self::Restart),
            "FORCE_RESTART" => Some(Self::Force),
            "FORCE_RESTART_NO_SEND" => Some(Self::ForceNoSend),
            "FORCE_RESTART_RESUME" => Some(Self::ForceResume),
            "FORCE_RESTART_RESUME_NO_SEND" => Some(Self::ForceResumeNoSend),
            _ => None,
        }
    }

    /// Whether the stripped trigger message is forwarded to the new child.
    pub fn forwards_message(&self) -> bool {
        !matches!(self, Self::ForceNoSend | Self::ForceResumeNoSend)
    }

    /// Whether the restart preserves the child session via `--resume`.
    pub fn resumes(&self) -> bool {
        matches!(self, Self::ForceResume | Self::ForceResumeNoSend)
    }

    /// Whether the child is killed without waiting for pending results.
    pub fn is_forced(&self) -> bool {
        !matches!(self, Self::Restart)
    }
}

fn sentinel_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\[CLAUDIX:(RESTART|FORCE_RESTART|FORCE_RESTART_NO_SEND|FORCE_RESTART_RESUME|FORCE_RESTART_RESUME_NO_SEND)\]",
        )
        .ok()
    })
    .as_ref()
}

/// Scan a parsed input line for a restart sentinel.
///
/// Returns the variant and, for forwarding variants, the message with the
/// sentinel stripped from its text items.
pub fn extract_restart(obj: &Value) -> (Option<RestartVariant>, Option<Value>) {
    let Some(re) = sentinel_regex() else {
        return (None, None);
    };
    if obj.get("type").and_then(Value::as_str) != Some("user") {
        return (None, None);
    }
    let Some(items) = obj
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_array)
    else {
        return (None, None);
    };

    let mut found: Option<RestartVariant> = None;
    for item in items {
        if item.get("type").and_then(Value::as_str) != Some("text") {
            continue;
        }
        let Some(text) = item.get("text").and_then(Value::as_str) else {
            continue;
        };
        let variant = re.captures(text).and_then(|cap| RestartVariant::from_token(&cap[1]));
        if let Some(variant) = variant {
            found = Some(variant);
            break;
        }
    }

    let Some(variant) = found else {
        return (None, None);
    };
    if !variant.forwards_message() {
        return (Some(variant), None);
    }

    let mut stripped = obj.clone();
    if let Some(items) = stripped
        .get_mut("message")
        .and_then(|m| m.get_mut("content"))
        .and_then(Value::as_array_mut)
    {
        for item in items {
            let is_text = item.get("type").and_then(Value::as_str) == Some("text");
            if !is_text {
                continue;
            }
            if let Some(text) = item.get("text").and_then(Value::as_str) {
                let cleaned = re.replace_all(text, "").trim_start().to_string();
                item["text"] = Value::String(cleaned);
            }
        }
    }
    (Some(variant), Some(stripped))
}

/// Whether a parsed line is a plain user-role turn (counts toward the
/// expected-results counter).
pub fn is_user_message(obj: &Value) -> bool {
    obj.get("type").and_then(Value::as_str) == Some("user")
        && obj
            .get("message")
            .and_then(|m| m.get("role"))
            .and_then(Value::as_str)
            == Some("user")
}

/// Build a stream-JSONL user message carrying one text item.
pub fn user_message(text: &str) -> Value {
    json!({
        "type": "user",
        "message": {
            "role": "user",
            "content": [{"type": "text", "text": text}],
        },
    })
}

/// The synthesized result emitted for each missing answer when a child is
/// force-killed.
pub fn failure_result(variant: RestartVariant) -> Value {
    let body = if variant.resumes() {
        "Claude Code Force Restart. The corresponding input message might not be fully processed. \
         The session will be resumed with previous context preserved."
    } else {
        "Claude Code Failure. Will Restart. The Agent will lose its memory. \
         Please provide necessary context and instructions in the next message."
    };
    json!({
        "type": "result",
        "subtype": "CLAUDIX_FAIL",
        "is_error": true,
        "result": body,
    })
}

/// The extra reminder emitted by the NO_SEND variants, telling the driver
/// its trigger message was discarded.
pub fn no_send_reminder(variant: RestartVariant) -> Value {
    let body = if variant.resumes() {
        "Claude Code was force-restarted with resume. The previous message was NOT sent to the \
         resumed instance. Please resend your request with necessary context and instructions."
    } else {
        "Claude Code was force-restarted. The previous message was NOT sent to the new instance. \
         Please resend your request with necessary context and instructions."
    };
    json!({
        "type": "result",
        "subtype": "CLAUDIX_FAIL",
        "is_error": true,
        "result": body,
    })
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;

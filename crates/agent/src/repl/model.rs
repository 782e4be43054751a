// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Model abstraction for the REPL runner.
//!
//! The trait hides the HTTP client so tests drive the loop with a
//! scripted model. The real implementation talks to the Anthropic
//! messages API.

use crate::error::AgentError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: &str, content: impl Into<String>) -> Self {
        Self { role: role.to_string(), content: content.into() }
    }
}

/// A completed model query.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub content: String,
    pub cost: f64,
    pub total_tokens: u64,
}

#[async_trait]
pub trait Model: Send + Sync {
    async fn query(&self, messages: &[Message]) -> Result<ModelResponse, AgentError>;

    /// Usable context length (model window minus reserved output budget).
    fn max_context_length(&self) -> u64;
}

// Sonnet-tier per-million-token pricing for cost accounting.
const INPUT_PRICE_PER_MTOK: f64 = 3.0;
const OUTPUT_PRICE_PER_MTOK: f64 = 15.0;

/// Anthropic messages-API client.
pub struct AnthropicModel {
    client: reqwest::Client,
    model_name: String,
    api_key: String,
    base_url: String,
    max_tokens: u64,
    context_window: u64,
}

impl AnthropicModel {
    pub fn new(model_name: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            model_name: model_name.to_string(),
            api_key: api_key.to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 64_000,
            // Window minus the output reservation.
            context_window: 200_000 - 64_000,
        }
    }

    /// Point at a different endpoint (tests, gateways).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Model for AnthropicModel {
    async fn query(&self, messages: &[Message]) -> Result<ModelResponse, AgentError> {
        let system: Vec<&Message> = messages.iter().filter(|m| m.role == "system").collect();
        let turns: Vec<Value> = messages
            .iter()
            .filter(|m| m.role != "system")
            .map(|m| json!({"role": m.role, "content": m.content}))
            .collect();
        let system_text =
            system.iter().map(|m| m.content.as_str()).collect::<Vec<_>>().join("\n");

        let body = json!({
            "model": self.model_name,
            "max_tokens": self.max_tokens,
            "system": system_text,
            "messages": turns,
        });

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Model(e.to_string()))?;

        let status = response.status();
        let payload: Value = response.json().await.map_err(|e| AgentError::Model(e.to_string()))?;
        if !status.is_success() {
            return Err(AgentError::ModelStatus {
                status: status.as_u16(),
                body: payload.to_string(),
            });
        }

        let content = payload
            .get("content")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|i| i.get("type").and_then(Value::as_str) == Some("text"))
                    .filter_map(|i| i.get("text").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let input_tokens =
            payload.pointer("/usage/input_tokens").and_then(Value::as_u64).unwrap_or(0);
        let output_tokens =
            payload.pointer("/usage/output_tokens").and_then(Value::as_u64).unwrap_or(0);
        let cost = (input_tokens as f64 * INPUT_PRICE_PER_MTOK
            + output_tokens as f64 * OUTPUT_PRICE_PER_MTOK)
            / 1_000_000.0;

        Ok(ModelResponse { content, cost, total_tokens: input_tokens + output_tokens })
    }

    fn max_context_length(&self) -> u64 {
        self.context_window
    }
}

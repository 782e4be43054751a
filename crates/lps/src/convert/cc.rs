// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `cc` converter: stream-JSONL agent transcripts to readable text.
//!
//! Each input line is a JSON object with a `type` field (system, assistant,
//! user, result, or unknown). Headers carry the role; multi-line bodies go
//! in four-backtick fences so inner triple backticks stay intact. The
//! `--color` flag paints headers white-on-background per role.

use super::Converter;
use crate::error::LpsError;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Write;

pub struct CcConverter;

impl Converter for CcConverter {
    fn name(&self) -> &'static str {
        "cc"
    }

    fn convert(&self, input: &str, args: &[String], out: &mut dyn Write) -> Result<(), LpsError> {
        let use_color = args.iter().any(|a| a == "--color" || a == "-c");
        let mut renderer = Renderer { use_color, tool_names: HashMap::new() };
        for raw in input.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let result = match serde_json::from_str::<Value>(line) {
                Ok(obj) => renderer.render(&obj, out),
                // Not JSON; relay as-is.
                Err(_) => writeln!(out, "{line}"),
            };
            result.map_err(|e| LpsError::ConverterFailed(e.to_string()))?;
        }
        Ok(())
    }
}

struct Renderer {
    use_color: bool,
    /// tool_use id -> tool name, for linking results back to their tool.
    tool_names: HashMap<String, String>,
}

const FENCE: &str = "````";

fn bg_code(role: &str) -> &'static str {
    match role {
        "system" => "46",
        "assistant" => "42",
        "tool" => "43",
        "tool_result" => "45",
        "user" => "44",
        "result" => "104",
        "error" => "41",
        _ => "47",
    }
}

fn role_display(role: &str) -> &'static str {
    match role {
        "system" => "System",
        "assistant" => "Assistant",
        "tool" | "tool_result" => "Tool",
        "user" => "User",
        "result" => "Result",
        "error" => "Error",
        _ => "Entry",
    }
}

impl Renderer {
    fn render(&mut self, obj: &Value, out: &mut dyn Write) -> std::io::Result<()> {
        match obj.get("type").and_then(Value::as_str) {
            Some("system") => self.render_system(obj, out),
            Some("assistant") => self.render_assistant(obj, out),
            Some("user") => self.render_user(obj, out),
            Some("result") => self.render_result(obj, out),
            other => {
                self.header(out, "default", other.unwrap_or("entry"))?;
                self.code_block(out, &pretty_json(obj))
            }
        }
    }

    fn header(&self, out: &mut dyn Write, role: &str, title: &str) -> std::io::Result<()> {
        let base = if title.is_empty() {
            format!("### =====[{}]=====", role_display(role))
        } else {
            format!("### =====[{}] {}=====", role_display(role), title)
        };
        writeln!(out)?;
        if self.use_color {
            writeln!(out, "\x1b[1;97;{}m{}\x1b[0m", bg_code(role), base)
        } else {
            writeln!(out, "{base}")
        }
    }

    fn code_block(&self, out: &mut dyn Write, body: &str) -> std::io::Result<()> {
        writeln!(out, "{FENCE}")?;
        writeln!(out, "{}", body.trim_end_matches('\n'))?;
        writeln!(out, "{FENCE}")
    }

    fn render_system(&mut self, obj: &Value, out: &mut dyn Write) -> std::io::Result<()> {
        let title = obj
            .get("subtype")
            .and_then(Value::as_str)
            .map(|s| format!("[{s}]"))
            .unwrap_or_default();
        self.header(out, "system", &title)?;
        if let Some(cwd) = obj.get("cwd").and_then(Value::as_str) {
            writeln!(out, "  cwd: {cwd}")?;
        }
        if let Some(model) = obj.get("model").and_then(Value::as_str) {
            writeln!(out, "  model: {model}")?;
        }
        if let Some(tools) = obj.get("tools").and_then(Value::as_array) {
            if !tools.is_empty() {
                let names: Vec<String> = tools.iter().map(value_to_text).collect();
                writeln!(out, "  tools: {}", names.join(", "))?;
            }
        }
        Ok(())
    }

    fn render_assistant(&mut self, obj: &Value, out: &mut dyn Write) -> std::io::Result<()> {
        let contents = content_items(obj);

        let text_parts: Vec<&str> = contents
            .iter()
            .filter(|item| item.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|item| item.get("text").and_then(Value::as_str))
            .filter(|t| !t.is_empty())
            .collect();
        let body = text_parts.join("\n");
        let body = body.trim();
        if !body.is_empty() {
            if body.contains('\n') {
                self.header(out, "assistant", "")?;
                self.code_block(out, body)?;
            } else {
                self.header(out, "assistant", body)?;
            }
        }

        for item in &contents {
            if item.get("type").and_then(Value::as_str) != Some("tool_use") {
                continue;
            }
            let tool_name =
                item.get("name").and_then(Value::as_str).unwrap_or("<tool>").to_string();
            if let Some(id) = item.get("id").and_then(Value::as_str) {
                self.tool_names.insert(id.to_string(), tool_name.clone());
            }
            self.header(out, "tool", &format!("uses {tool_name}"))?;
            let input = item.get("input").map(pretty_json).unwrap_or_else(|| "null".to_string());
            self.code_block(out, &input)?;
        }
        Ok(())
    }

    fn render_user(&mut self, obj: &Value, out: &mut dyn Write) -> std::io::Result<()> {
        let contents = content_items(obj);

        for item in &contents {
            if item.get("type").and_then(Value::as_str) == Some("text") {
                if let Some(text) = item.get("text").and_then(Value::as_str) {
                    let text = text.trim();
                    if !text.is_empty() {
                        self.header(out, "user", text)?;
                    }
                }
            }
        }

        for item in &contents {
            if item.get("type").and_then(Value::as_str) != Some("tool_result") {
                continue;
            }
            let is_error = item.get("is_error").and_then(Value::as_bool).unwrap_or(false);
            let name = item
                .get("tool_use_id")
                .and_then(Value::as_str)
                .and_then(|id| self.tool_names.get(id).cloned());
            let title = match name {
                Some(name) => format!("result from {name}"),
                None => "result".to_string(),
            };
            let role = if is_error { "error" } else { "tool_result" };
            self.header(out, role, &title)?;
            let content = item.get("content").map(value_to_text).unwrap_or_default();
            self.code_block(out, &content)?;
        }
        Ok(())
    }

    fn render_result(&mut self, obj: &Value, out: &mut dyn Write) -> std::io::Result<()> {
        let is_error = obj.get("is_error").and_then(Value::as_bool).unwrap_or(false);
        let status = obj
            .get("subtype")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| if is_error { "error".to_string() } else { "ok".to_string() });
        self.header(out, if is_error { "error" } else { "result" }, &status)?;

        let mut meta = Vec::new();
        if let Some(d) = obj.get("duration_ms") {
            meta.push(format!("duration_ms={d}"));
        }
        if let Some(n) = obj.get("num_turns") {
            meta.push(format!("num_turns={n}"));
        }
        if !meta.is_empty() {
            writeln!(out, "{}", meta.join(", "))?;
        }

        match obj.get("result").and_then(Value::as_str) {
            Some(text) => self.code_block(out, text),
            None => self.code_block(out, &pretty_json(obj)),
        }
    }
}

fn content_items(obj: &Value) -> Vec<Value> {
    obj.get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|i| i.is_object()).cloned().collect())
        .unwrap_or_default()
}

fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

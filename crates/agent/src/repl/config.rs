// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! REPL runner configuration and prompt templates.
//!
//! Templates use literal `<placeholder>` substitution; there is no
//! templating engine. `<task>`, `<action>`, and `<output>` are the only
//! recognized markers.

/// Completion sentinel: an action whose output starts with this line ends
/// the session as submitted.
pub const COMPLETION_SENTINEL: &str = "COMPLETE_TASK_AND_SUBMIT_FINAL_OUTPUT";

/// Per-query output budget subtracted from the model context to get the
/// effective context length.
pub const MAX_TOKENS_PER_QUERY: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub system_template: String,
    pub instance_template: String,
    pub action_observation_template: String,
    pub format_error_template: String,
    pub timeout_template: String,
    /// Hard dollar ceiling for the whole session.
    pub cost_limit: f64,
    /// Maximum model queries per session; `0` disables the cap.
    pub step_limit: u32,
    /// Seconds allowed per shell action.
    pub action_timeout_secs: u64,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            system_template: "You are a helpful assistant that can interact with a computer. \
                Your response must contain exactly ONE bash code block with ONE command. \
                Include a THOUGHT section before your command explaining your reasoning."
                .to_string(),
            instance_template: "Please solve this task:\n\n<task>\n\nYou are working in a sandbox \
                directory. Reply with a single shell command in a ```bash fenced block. \
                To finish, the first line of the output of your command must be \
                'COMPLETE_TASK_AND_SUBMIT_FINAL_OUTPUT'."
                .to_string(),
            action_observation_template: "Observation:\n<output>".to_string(),
            format_error_template: "Please always provide EXACTLY ONE action in a ```bash fenced \
                block. You provided <count> actions."
                .to_string(),
            timeout_template: "The last command <action> timed out and has been killed.\n\
                The output of the command was:\n<output>\n\
                Please try another command and make sure to avoid those requiring interactive input."
                .to_string(),
            cost_limit: 5.0,
            step_limit: 0,
            action_timeout_secs: 300,
        }
    }
}

impl ReplConfig {
    pub fn render_instance(&self, task: &str) -> String {
        self.instance_template.replace("<task>", task)
    }

    pub fn render_observation(&self, output: &str) -> String {
        self.action_observation_template.replace("<output>", output)
    }

    pub fn render_format_error(&self, count: usize) -> String {
        self.format_error_template.replace("<count>", &count.to_string())
    }

    pub fn render_timeout(&self, action: &str, output: &str) -> String {
        self.timeout_template.replace("<action>", action).replace("<output>", output)
    }
}

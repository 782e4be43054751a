// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent kinds.
//!
//! Translator and discriminator identities arrive as strings from
//! configuration and restored sessions. They resolve to a tagged
//! [`AgentKind`] at instance creation; an unknown id is a configuration
//! error there, never mid-run.

use crate::error::EngineError;

/// Which runner family drives the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerFamily {
    /// Stream-JSONL CLI behind the `claudix` proxy in an LProc.
    External,
    /// In-process REPL runner over the LLM API.
    InProcess,
}

/// Discriminator goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscriminatorVariant {
    /// Tests must distinguish C and Rust behavior.
    Actor,
    /// Tests aim to raise C line coverage only.
    Coverage,
}

/// Discriminator configuration resolved from its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscriminatorSpec {
    pub variant: DiscriminatorVariant,
    /// New tests required per iteration.
    pub k_new: u32,
    /// Seed suite size assumed at iteration 1.
    pub seed_tests: u32,
}

/// A resolved agent identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentKind {
    pub id: String,
    pub family: RunnerFamily,
    pub model: String,
}

/// Default seed-suite size for test-count accounting.
pub const SEED_TEST_CASES: u32 = 15;

/// Default new tests per discriminator iteration.
pub const TEST_CASES_PER_ITERATION: u32 = 3;

impl AgentKind {
    /// Resolve a translator id.
    pub fn translator(id: &str) -> Result<Self, EngineError> {
        let (family, model) = match id {
            "CC-Sonnet-4.5" => (RunnerFamily::External, "sonnet"),
            "SWE-Sonnet-4.5" => (RunnerFamily::InProcess, "claude-sonnet-4-5-20250929"),
            "SWE-Sonnet-4" => (RunnerFamily::InProcess, "claude-sonnet-4-20250514"),
            "SWE-GPT-5mini" => (RunnerFamily::InProcess, "gpt-5-mini-2025-08-07"),
            _ => return Err(EngineError::UnknownTranslator(id.to_string())),
        };
        Ok(Self { id: id.to_string(), family, model: model.to_string() })
    }

    /// Resolve a discriminator id into its kind and spec.
    pub fn discriminator(id: &str) -> Result<(Self, DiscriminatorSpec), EngineError> {
        let (family, model, variant, seed, k_new) = match id {
            "CC-Sonnet-4.5-ACToR" => {
                (RunnerFamily::External, "sonnet", DiscriminatorVariant::Actor, SEED_TEST_CASES, TEST_CASES_PER_ITERATION)
            }
            "CC-Sonnet-4.5-ACToR-1_3" => {
                (RunnerFamily::External, "sonnet", DiscriminatorVariant::Actor, 1, 3)
            }
            "CC-Sonnet-4.5-ACToR-15_1" => {
                (RunnerFamily::External, "sonnet", DiscriminatorVariant::Actor, 15, 1)
            }
            "CC-Sonnet-4.5-ACToR-15_5" => {
                (RunnerFamily::External, "sonnet", DiscriminatorVariant::Actor, 15, 5)
            }
            "CC-Sonnet-4.5-ACToR-noFuzz" => {
                (RunnerFamily::External, "sonnet", DiscriminatorVariant::Actor, SEED_TEST_CASES, TEST_CASES_PER_ITERATION)
            }
            "CC-Sonnet-4.5-Coverage" => {
                (RunnerFamily::External, "sonnet", DiscriminatorVariant::Coverage, SEED_TEST_CASES, TEST_CASES_PER_ITERATION)
            }
            "SWE-Sonnet-4.5-ACToR" => (
                RunnerFamily::InProcess,
                "claude-sonnet-4-5-20250929",
                DiscriminatorVariant::Actor,
                SEED_TEST_CASES,
                TEST_CASES_PER_ITERATION,
            ),
            "SWE-Sonnet-4-ACToR" => (
                RunnerFamily::InProcess,
                "claude-sonnet-4-20250514",
                DiscriminatorVariant::Actor,
                SEED_TEST_CASES,
                TEST_CASES_PER_ITERATION,
            ),
            "SWE-GPT-5mini-ACToR" => (
                RunnerFamily::InProcess,
                "gpt-5-mini-2025-08-07",
                DiscriminatorVariant::Actor,
                SEED_TEST_CASES,
                TEST_CASES_PER_ITERATION,
            ),
            _ => return Err(EngineError::UnknownDiscriminator(id.to_string())),
        };
        let kind = Self { id: id.to_string(), family, model: model.to_string() };
        Ok((kind, DiscriminatorSpec { variant, k_new, seed_tests: seed }))
    }

    /// Known translator ids, for selection UIs.
    pub fn translator_ids() -> &'static [&'static str] {
        &["CC-Sonnet-4.5", "SWE-Sonnet-4.5", "SWE-Sonnet-4", "SWE-GPT-5mini"]
    }

    /// Known discriminator ids, for selection UIs.
    pub fn discriminator_ids() -> &'static [&'static str] {
        &[
            "CC-Sonnet-4.5-ACToR",
            "CC-Sonnet-4.5-ACToR-1_3",
            "CC-Sonnet-4.5-ACToR-15_1",
            "CC-Sonnet-4.5-ACToR-15_5",
            "CC-Sonnet-4.5-ACToR-noFuzz",
            "CC-Sonnet-4.5-Coverage",
            "SWE-Sonnet-4.5-ACToR",
            "SWE-Sonnet-4-ACToR",
            "SWE-GPT-5mini-ACToR",
        ]
    }
}

#[cfg(test)]
#[path = "agents_tests.rs"]
mod tests;

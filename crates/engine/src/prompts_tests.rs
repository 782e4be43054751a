// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::agents::DiscriminatorSpec;

fn actor_spec() -> DiscriminatorSpec {
    DiscriminatorSpec { variant: DiscriminatorVariant::Actor, k_new: 3, seed_tests: 15 }
}

#[test]
fn bootstrap_attempt_gets_the_translation_prompt() {
    let prompt = translator_prompt("echo", 0, 0);
    assert!(prompt.contains("translate the C `echo` project"));
    assert!(prompt.contains("ts/target/release/echo"));
    assert!(!prompt.contains("<project_name>"));
}

#[test]
fn later_attempts_get_the_fix_prompt() {
    for (iteration, worker) in [(0, 1), (1, 0), (3, 2)] {
        let prompt = translator_prompt("echo", iteration, worker);
        assert!(prompt.contains("fix the buggy Rust translation"), "iter {iteration} worker {worker}");
    }
}

#[test]
fn discriminator_prompt_substitutes_all_placeholders() {
    let prompt = discriminator_prompt(&actor_spec(), 2, 1, false);
    // seed 15 + (2 - 1) * 3 = 18 existing tests
    assert!(prompt.contains("`18 + 3` test cases in total"));
    assert!(prompt.contains("--- v1 ---"));
    assert!(!prompt.contains("<version>"));
    assert!(!prompt.contains("<current_test_cases_number>"));
    assert!(!prompt.contains("<TEST_CASES_PER_ITERATION>"));
}

#[test]
fn first_iteration_counts_only_the_seed_suite() {
    let prompt = discriminator_prompt(&actor_spec(), 1, 0, false);
    assert!(prompt.contains("`15 + 3` test cases in total"));
}

#[test]
fn bsd_inputs_use_the_bsd_variant() {
    let prompt = discriminator_prompt(&actor_spec(), 1, 0, true);
    assert!(prompt.contains("norm_rules"));
    assert!(prompt.contains("C vs C passes"));
}

#[test]
fn coverage_variant_ignores_bsd_flag() {
    let spec = DiscriminatorSpec { variant: DiscriminatorVariant::Coverage, k_new: 3, seed_tests: 15 };
    for is_bsd in [false, true] {
        let prompt = discriminator_prompt(&spec, 1, 0, is_bsd);
        assert!(prompt.contains("improve the coverage"));
    }
}

#[test]
fn custom_k_new_flows_through() {
    let spec = DiscriminatorSpec { variant: DiscriminatorVariant::Actor, k_new: 5, seed_tests: 15 };
    let prompt = discriminator_prompt(&spec, 3, 0, false);
    // 15 + (3 - 1) * 5 = 25
    assert!(prompt.contains("`25 + 5` test cases in total"));
}

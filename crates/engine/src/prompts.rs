// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent prompt templates.
//!
//! Templates are fixed strings with literal placeholders
//! (`<project_name>`, `<version>`, `<current_test_cases_number>`,
//! `<TEST_CASES_PER_ITERATION>`) substituted verbatim.

use crate::agents::{DiscriminatorSpec, DiscriminatorVariant};

pub const TRANSLATION_TASK_PROMPT: &str = r#"<task>
You are an expert in C and Rust.
Your task is to translate the C `<project_name>` project to safe Rust implementations.

---

## Project Setup
- The source **C code** is located in the **main folder**.
- The test script is located in the **./testcmp.sh**. You should run `./testcmp.sh --help` to understand how to use the test script.
- The translated **Rust code** should be put in the **`ts/` folder**.
- The compiled binary file should be put in `ts/target/release/<project_name>`.

---

## Workflow
1. Read the C code and the test script to understand the functionalities.
2. Initialize a new Cargo project in the `ts/` folder. You must use the binary name `<project_name>` in your Cargo.toml file.
3. Translate the C code to Rust code and compile it into binary.
4. Run `./testcmp.sh` to compare the output of the translated Rust code with the original C program. You should run `./testcmp.sh --help` to understand how to use the test script.
5. Clean the working directory by removing temporary files and backup files.

---

## Constraints
- You should double check that the Cargo.toml file uses the correct binary name `<project_name>` which is the name of the C project.
- The translated Rust code MUST compile and MUST be 100% safe. You must NOT use `unsafe`, `RefCell`, `Rc`, `Arc`, `Mutex` or FFI in your Rust code.
- The translated Rust code MUST pass all the unit tests.
- You MUST translate all the functionalities.
- You must NOT omit or simplify functionalities and test cases during translation.
- You must NOT modify the test script and test cases.
- You MUST only work in current `sandbox/` folder, don't touch any files outside.
</task>
"#;

pub const FIX_TASK_PROMPT: &str = r#"<task>
You are an expert in C and Rust.
Your task is to fix the buggy Rust translation of the C `<project_name>` project.

---

## Project Setup
- The source **C code** is located in the **main folder**.
- The test script is located in the **./testcmp.sh**. You should run `./testcmp.sh --help` to understand how to use the test script.
- The translated **Rust code** is located in the **`ts/` folder**.
- The compiled binary of the translated Rust code is put inside `ts/target/release/<project_name>`.

---

## Workflow
1. Run the test script to compare the output of the translated Rust code with the original C program to know which test cases fail.
2. Read the C code and the translated Rust code to understand the functionalities and how to fix the bugs.
3. Fix the bugs in the translated Rust code.
4. Run the test script to compare the output of the fixed Rust code with the original C program to ensure if all the test cases pass.
5. Clean the working directory by removing temporary files and backup files.

---

## Constraints
- You should double check that the Cargo.toml file uses the correct binary name `<project_name>` which is the name of the C project.
- Before making edits to the translated Rust code, you should always back up the current file as `backup.rs`. When files get corrupted, you should restore the backup file.
- You MUST ensure that the Rust code can pass all the test cases. It means that `./testcmp.sh compare ./ts/target/release/<project_name>(compiled from Rust code)` MUST show `All tests passed!`.
- You must NOT use `unsafe`, `RefCell`, `Rc`, `Arc`, `Mutex` or FFI in your Rust code.
- Do NOT omit or simplify functionalities and test cases during fixing.
- You MUST only work in current `sandbox/` folder, don't touch any files outside.
</task>
"#;

pub const DISCRIMINATOR_ACTOR_PROMPT: &str = r#"<task>
You are an expert in **C** and **Rust**.
Your task is to add additional test cases to discover semantic mismatches between the C code and the translated Rust code.

---

## Project Setup
- The source **C code** is located in the **main folder**.
- The test script is located in the **./testcmp.sh**. You should run `./testcmp.sh --help` to understand how to use the test script.
- The translated **Rust code** is located in the **`ts/` folder**.
- The compiled binary of the translated Rust code is put inside `ts/target/release/xxx`, where `xxx` is the name of the C program.
- The record of added test cases is put in `test_cases_record.md` file.
- The current fuzzer template is located in the **`fuzzer_template.py`** file, which will be helpful for efficiently discovering mismatches between C code and Rust translation. You should read the file to understand how to control the fuzzer.

---

## Workflow
1. Analyze the C code and the translated Rust code to detect **semantic mismatches**.
2. Focus first on **core functionalities**, then explore **edge cases**.
3. Read the current test script and the record of added test cases in `test_cases_record.md` to find potential missed cases.
4. Update the fuzzer with diverse input patterns to expose mismatches where the C code and Rust translation code have different outputs.
5. Collect the best **<TEST_CASES_PER_ITERATION>** new input cases that expose mismatches between C code and Rust translation. Add the <TEST_CASES_PER_ITERATION> new test cases to the test cases file.
6. Run the new tests to compare the output of the translated Rust code with the original C program to confirm the mismatches.
7. Clean the working directory by removing temporary files and scripts, temporary test cases, and backup files. Don't remove `fuzzer_template.py`, `test_cases_record.md`, and test cases files.
8. Update the record of added test cases in `test_cases_record.md` file to summarize about **how you find the new mismatches** and **what test cases you added**.

---

## Test Case Format
- Unit tests are supposed to be stored in `testsXX.jsonl` files. The `testcmp.sh` script reads these files and runs test cases.
- Each line in this JSONL file is a test case in JSON format. It includes the test description and test inputs, without the expected outputs.
    - For side-effect free programs, each line has this format `{"name": "test_name", "description": "test_description", "alias_name": "alias_name", "args": ["arg1", "arg2", ...], "idx": 1}`.
    - For side-effectful programs, each line has this format `{"name": "test_name", "description": "test_description", "alias_name": "alias_name", "check_file": false, "cmd_prep": "command_to_prepare_files", "cmd_target": "command_to_test_the_program", "cmd_post": "command_to_cleanup_files", "idx": 1}`. In `cmd_target`, `BINARY` is the placeholder for the path to the binary; you can only use `BINARY`, but not a binary name or path.
- "alias_name" is the name of the alias to run the program under. By default, leave it as an empty string.
- Each JSONL file should have at most 15 test cases. If that file has more than 15 tests, please create a new `testsYY.jsonl` file where the `YY` index is incremented by 1 from the largest `XX` index.

---

## Double-check Before Ending the Task
1. There should be exactly <TEST_CASES_PER_ITERATION> new test cases added to the JSONL file. You should run `./testcmp.sh` and the number of test cases will be shown. There should be `<current_test_cases_number> + <TEST_CASES_PER_ITERATION>` test cases in total.
2. The <TEST_CASES_PER_ITERATION> test cases should be different from each other. You should check this by reading the content of the test cases.
3. The added tests must be valid for the C code. You should run `make clean && make all` and then run `./testcmp.sh compare ./xxx.out(compiled from C code)`. It must show `All tests passed!`.
4. The added tests should reflect the differences between the C code and the Rust code. You should run `./testcmp.sh compare ./ts/target/release/xxx(compiled from Rust code)`. The Rust code should fail on all <TEST_CASES_PER_ITERATION> new test cases.

---

## Constraints
- When running the fuzzer script and the binaries, you should use `timeout` to set the timeout to 10~30 seconds. You should also set the memory limit to 5GB.
- When adding new test cases, you should carefully read the `Test Case Format` above and follow the test script.
- Before ending the task, you MUST follow the `Double-check Before Ending the Task` rules above to check step by step. If **any of the steps fail**, you MUST redo the task and fix the test cases**.
- When editing `test_cases_record.md`, you should always append your summary at the end of the file with a clear separation from previous rounds.
- When editing `test_cases_record.md`, **do not wrap code sections in triple backticks (` ``` `)**. You should insert code sections directly, without markdown fencing.
- You MUST only work in current `sandbox/` folder, don't touch any files outside.
</task>

--- v<version> ---
"#;

pub const DISCRIMINATOR_COVERAGE_PROMPT: &str = r#"<task>
You are an expert C programmer.
Your task is to add additional test cases for the C program to improve the coverage.

---

## Project Setup
- The source **C code** is located in the **main folder**.
- The test script is located in the **./testcmp.sh**. You should run `./testcmp.sh --help` to understand how to use the test script.
- The record of added test cases is put in `test_cases_record.md` file.
- Please ignore other unrelated files.

---

## Workflow
1. Read the C code to understand the functionalities.
2. Focus first on **core functionalities**, then explore **edge cases**.
3. Run `make clean && make all && ./testcmp.sh coverage` to compile the C code and get the current coverage.
4. Read the coverage report and the record of added test cases in `test_cases_record.md` to find potential missed cases.
5. Design **<TEST_CASES_PER_ITERATION>** new test cases that are different from existing test cases.
6. Run `./testcmp.sh coverage` to get the new coverage. Ensure that the new coverage is higher than the previous one.
7. Clean the working directory by removing temporary files and scripts, temporary test cases, and backup files.
8. Update the record of added test cases in `test_cases_record.md` file to summarize about what test cases you added.

---

## Double-check Before Ending the Task
1. There should be exactly <TEST_CASES_PER_ITERATION> new test cases added to the JSONL file. You should run `./testcmp.sh` and the number of test cases will be shown. There should be `<current_test_cases_number> + <TEST_CASES_PER_ITERATION>` test cases in total.
2. The <TEST_CASES_PER_ITERATION> new test cases should be different from existing test cases. You should check this by reading the content of the test cases.
3. The added tests must be valid for the C code. You should run `make clean && make all` and then run `./testcmp.sh compare ./xxx.out(compiled from C code)`. It must show `All tests passed!`.

---

## Constraints
- When adding new test cases, you should carefully read the `Test Case Format` above and follow the test script.
- Before ending the task, you MUST follow the `Double-check Before Ending the Task` rules above to check step by step. If **any of the steps fail**, you MUST redo the task and fix the test cases**.
- When editing `test_cases_record.md`, you should always append your summary at the end of the file with a clear separation from previous rounds.
- You MUST only work in current `sandbox/` folder, don't touch any files outside.
</task>

--- v<version> ---
"#;

pub const DISCRIMINATOR_BSD_PROMPT: &str = r#"<task>
You are an expert in **C** and **Rust**.
Your task is to add additional test cases to discover semantic mismatches between the C code and the translated Rust code.

---

## Instructions
Find <TEST_CASES_PER_ITERATION> new input cases that expose mismatches between C code and Rust translation. Add these <TEST_CASES_PER_ITERATION> new test cases to `testsXX.jsonl` where `XX` is the largest index among all `testsXX.jsonl` files. If that file already has more than 15 tests, create a new `testsYY.jsonl` with `YY = XX + 1`. These <TEST_CASES_PER_ITERATION> tests must be valid (C vs C passes) and should aim to highlight mismatches between Rust and C.

IMPORTANT: If differences you observe are due to inherent nondeterminism (randomness, time, environment), either adjust the normalization logic for the specific test case or come up with a different test case that does not suffer from nondeterminism. Our validity requirement - `./testcmp.sh compare ./xxx` for C vs C must pass - ensures differences are not from nondeterminism.

"norm_rules" is a list of dicts, each with "pattern" and "replacement" fields; these regex rules are applied by `sed` in the testing script to normalize unnecessary differences between the two outputs. Use `{progname}` as the placeholder for the program name, and always add the default prefix-stripping rules for error-handling tests.

---

## Double-check Before Ending the Task
1. There should be exactly <TEST_CASES_PER_ITERATION> new test cases added to the JSONL file. You should run `./testcmp.sh` and the number of test cases will be shown. There should be `<current_test_cases_number> + <TEST_CASES_PER_ITERATION>` test cases in total.
2. The <TEST_CASES_PER_ITERATION> test cases should be different from each other.
3. The added tests must be valid for the C code: `make clean && make all`, then `./testcmp.sh compare ./xxx` must show `All tests passed!`.

---

## Constraints
- When running the fuzzer script and the binaries, you should use `timeout` to set the timeout to 10~30 seconds. You should also set the memory limit to 5GB.
- Before ending the task, you MUST follow the `Double-check Before Ending the Task` rules above to check step by step.
- You MUST only work in current `sandbox/` folder, don't touch any files outside.
</task>

--- v<version> ---
"#;

/// Render the translator prompt for one worker attempt.
///
/// The bootstrap attempt (iteration 0, worker 0) gets the fresh-translation
/// prompt; every other attempt gets the fix prompt.
pub fn translator_prompt(project_name: &str, iteration: u32, worker_num: u32) -> String {
    let template = if iteration == 0 && worker_num == 0 {
        TRANSLATION_TASK_PROMPT
    } else {
        FIX_TASK_PROMPT
    };
    template.replace("<project_name>", project_name)
}

/// Render the discriminator prompt for one worker attempt.
///
/// `current_tests` is the suite size the agent should observe before its
/// additions: `seed + (iteration - 1) * k_new`.
pub fn discriminator_prompt(
    spec: &DiscriminatorSpec,
    iteration: u32,
    worker_num: u32,
    is_bsd: bool,
) -> String {
    let template = match (spec.variant, is_bsd) {
        (DiscriminatorVariant::Actor, false) => DISCRIMINATOR_ACTOR_PROMPT,
        (DiscriminatorVariant::Actor, true) => DISCRIMINATOR_BSD_PROMPT,
        (DiscriminatorVariant::Coverage, _) => DISCRIMINATOR_COVERAGE_PROMPT,
    };
    let current_tests = spec.seed_tests + iteration.saturating_sub(1) * spec.k_new;
    template
        .replace("<version>", &worker_num.to_string())
        .replace("<current_test_cases_number>", &current_tests.to_string())
        .replace("<TEST_CASES_PER_ITERATION>", &spec.k_new.to_string())
}

#[cfg(test)]
#[path = "prompts_tests.rs"]
mod tests;

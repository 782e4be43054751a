// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for worker and state-machine tests: a scripted agent
//! invoker plus fake `make`/`cargo`/`testcmp.sh` tooling on PATH.

use crate::agents::AgentKind;
use crate::error::EngineError;
use crate::invoker::AgentInvoker;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Fake harness: passes everything against C; against the Rust binary it
/// passes the count stored in `.rust_pass` (default: everything).
pub const TESTCMP: &str = r#"#!/bin/bash
total=$(cat tests*.jsonl 2>/dev/null | grep -c .)
case "$2" in
  *ts/target/release*) pass=$(cat .rust_pass 2>/dev/null || echo "$total");;
  *) pass=$total;;
esac
fail=$((total - pass))
echo "Loaded $total tests total"
echo "Results: $pass passed, $fail failed out of $total tests"
if [ "$fail" -eq 0 ]; then echo "All tests passed!"; fi
"#;

pub const FAKE_MAKE: &str = "#!/bin/bash\ntouch echo\nexit 0\n";
pub const FAKE_CARGO: &str = "#!/bin/bash\nexit 0\n";

/// Restores PATH when dropped.
pub struct PathGuard {
    original: String,
}

impl PathGuard {
    pub fn prepend(dir: &Path) -> Self {
        let original = std::env::var("PATH").unwrap_or_default();
        std::env::set_var("PATH", format!("{}:{}", dir.display(), original));
        Self { original }
    }
}

impl Drop for PathGuard {
    fn drop(&mut self) {
        std::env::set_var("PATH", &self.original);
    }
}

pub fn write_exec(path: &Path, body: &str) {
    #[allow(clippy::unwrap_used)]
    {
        fs::write(path, body).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}

/// Seed a project input directory with one C source, a Makefile, the fake
/// harness, and a one-case seed suite.
pub fn seed_input(input: &Path) {
    #[allow(clippy::unwrap_used)]
    {
        fs::create_dir_all(input).unwrap();
        fs::write(input.join("echo.c"), "int main(){}").unwrap();
        fs::write(input.join("Makefile"), "all:\n").unwrap();
        fs::write(input.join("tests00.jsonl"), "{\"name\":\"seed\"}\n").unwrap();
    }
    write_exec(&input.join("testcmp.sh"), TESTCMP);
}

/// Install fake `make`/`cargo` into `dir` and put it on PATH.
pub fn fake_toolchain(dir: &Path) -> PathGuard {
    #[allow(clippy::unwrap_used)]
    fs::create_dir_all(dir).unwrap();
    write_exec(&dir.join("make"), FAKE_MAKE);
    write_exec(&dir.join("cargo"), FAKE_CARGO);
    PathGuard::prepend(dir)
}

/// A scripted invoker playing both roles:
/// - translator sessions scaffold `ts/` and clear `.rust_pass` so every
///   test passes against the Rust binary,
/// - discriminator sessions add `k_new` fresh cases in a new file and pin
///   `.rust_pass` to the prior count so the new cases fail against Rust.
pub struct FakeInvoker {
    pub k_new: u32,
    calls: Mutex<Vec<(String, String)>>,
    file_counter: Mutex<u32>,
    /// Session names whose validation should fail (via `.rust_pass 0`).
    pub sabotage: Mutex<Vec<String>>,
}

impl FakeInvoker {
    pub fn new(k_new: u32) -> Self {
        Self {
            k_new,
            calls: Mutex::new(Vec::new()),
            file_counter: Mutex::new(0),
            sabotage: Mutex::new(Vec::new()),
        }
    }

    /// (session_name, prompt) pairs, in invocation order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl AgentInvoker for FakeInvoker {
    async fn run(
        &self,
        session_name: &str,
        work_dir: &Path,
        prompt: &str,
        _kind: &AgentKind,
    ) -> Result<(), EngineError> {
        self.calls.lock().push((session_name.to_string(), prompt.to_string()));
        let sandbox = work_dir.join("sandbox");

        if self.sabotage.lock().iter().any(|s| s == session_name) {
            let _ = fs::write(sandbox.join(".rust_pass"), "0\n");
            return Ok(());
        }

        if session_name.contains("_translator_") {
            let src = sandbox.join("ts/src");
            fs::create_dir_all(&src)
                .map_err(|e| EngineError::io("scaffolding ts", e))?;
            fs::write(sandbox.join("ts/Cargo.toml"), "[package]\nname = \"echo\"\n")
                .map_err(|e| EngineError::io("writing Cargo.toml", e))?;
            fs::write(src.join("main.rs"), "fn main(){}")
                .map_err(|e| EngineError::io("writing main.rs", e))?;
            let _ = fs::remove_file(sandbox.join(".rust_pass"));
        } else {
            let prior = crate::harness::count_test_cases(&sandbox);
            let mut counter = self.file_counter.lock();
            *counter += 1;
            let file = sandbox.join(format!("tests{:02}.jsonl", *counter));
            let body: String = (0..self.k_new)
                .map(|i| format!("{{\"name\":\"gen{}_{i}\"}}\n", *counter))
                .collect();
            fs::write(&file, body).map_err(|e| EngineError::io("writing tests", e))?;
            fs::write(sandbox.join(".rust_pass"), format!("{prior}\n"))
                .map_err(|e| EngineError::io("writing .rust_pass", e))?;
        }
        Ok(())
    }
}

/// A [`FakeInvoker`] that sleeps before acting, for scheduler-capacity
/// tests that need workers to stay busy.
pub struct DelayedInvoker {
    pub inner: FakeInvoker,
    pub delay_ms: u64,
}

#[async_trait]
impl AgentInvoker for DelayedInvoker {
    async fn run(
        &self,
        session_name: &str,
        work_dir: &Path,
        prompt: &str,
        kind: &AgentKind,
    ) -> Result<(), EngineError> {
        tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        self.inner.run(session_name, work_dir, prompt, kind).await
    }
}

/// An invoker that always fails, for error-path tests.
pub struct FailingInvoker;

#[async_trait]
impl AgentInvoker for FailingInvoker {
    async fn run(
        &self,
        _session_name: &str,
        _work_dir: &Path,
        _prompt: &str,
        _kind: &AgentKind,
    ) -> Result<(), EngineError> {
        Err(EngineError::Agent(actor_agent::AgentError::NoOutput))
    }
}

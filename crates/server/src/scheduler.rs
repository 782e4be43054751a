// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The translation server: instance collection plus bounded worker loop.
//!
//! One mutex guards the collection; instance workers are tokio tasks. The
//! loop ticks every half second: reap finished tasks, then start queued
//! instances while capacity remains. Queued instances start in insertion
//! order; no stronger fairness is promised.

use crate::error::ServerError;
use crate::status::StatusRow;
use actor_core::{format_elapsed, Clock, Config, ProjectStatus};
use actor_engine::{run_instance, AgentInvoker, ProjectInstance};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const TICK: Duration = Duration::from_millis(500);

struct Entry {
    inst: Arc<ProjectInstance>,
    task: Option<JoinHandle<()>>,
}

impl Entry {
    fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }
}

pub struct TranslationServer<C: Clock> {
    config: Config,
    clock: C,
    invoker: Arc<dyn AgentInvoker>,
    entries: Mutex<Vec<Entry>>,
    worker_started: AtomicBool,
    running: Arc<AtomicBool>,
}

impl<C: Clock + 'static> TranslationServer<C> {
    pub fn new(config: Config, clock: C, invoker: Arc<dyn AgentInvoker>) -> Arc<Self> {
        Arc::new(Self {
            config,
            clock,
            invoker,
            entries: Mutex::new(Vec::new()),
            worker_started: AtomicBool::new(false),
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register an instance; it stays queued until the worker loop picks
    /// it up.
    pub fn add_instance(&self, inst: Arc<ProjectInstance>) {
        tracing::info!(instance = inst.instance_name, "instance queued");
        self.entries.lock().push(Entry { inst, task: None });
    }

    /// Start the background worker loop once.
    pub fn start_worker(self: Arc<Self>) {
        if self.worker_started.swap(true, Ordering::SeqCst) {
            return;
        }
        tokio::spawn(async move {
            while self.running.load(Ordering::SeqCst) {
                self.tick();
                tokio::time::sleep(TICK).await;
            }
        });
    }

    /// Ask the worker loop to exit after the current tick.
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// One scheduling pass: reap finished tasks and launch queued
    /// instances while capacity allows.
    pub fn tick(&self) {
        let mut entries = self.entries.lock();

        for entry in entries.iter_mut() {
            if entry.task.as_ref().map(|t| t.is_finished()).unwrap_or(false) {
                entry.task = None;
            }
        }

        let mut active = entries.iter().filter(|e| e.is_running()).count();
        for entry in entries.iter_mut() {
            if active >= self.config.max_parallel {
                break;
            }
            if entry.is_running() || entry.inst.status() != ProjectStatus::Queued {
                continue;
            }
            let inst = Arc::clone(&entry.inst);
            let invoker = Arc::clone(&self.invoker);
            let clock = self.clock.clone();
            tracing::info!(instance = inst.instance_name, "starting instance worker");
            entry.task = Some(tokio::spawn(async move {
                run_instance(inst, invoker, clock).await;
            }));
            active += 1;
        }
    }

    /// Count of live instance workers.
    pub fn active_count(&self) -> usize {
        self.entries.lock().iter().filter(|e| e.is_running()).count()
    }

    /// Resolve an instance by 1-based index, instance name, project name,
    /// or session id; first match wins.
    pub fn resolve(&self, identifier: &str) -> Option<Arc<ProjectInstance>> {
        let entries = self.entries.lock();
        if let Ok(index) = identifier.parse::<usize>() {
            if index >= 1 {
                if let Some(entry) = entries.get(index - 1) {
                    return Some(Arc::clone(&entry.inst));
                }
            }
        }
        entries
            .iter()
            .find(|e| e.inst.instance_name == identifier)
            .or_else(|| entries.iter().find(|e| e.inst.project_name == identifier))
            .or_else(|| entries.iter().find(|e| e.inst.session_id == identifier))
            .map(|e| Arc::clone(&e.inst))
    }

    /// Request a stop; the instance transitions at its next phase
    /// boundary.
    pub fn stop(&self, identifier: &str) -> Result<(), ServerError> {
        let inst = self
            .resolve(identifier)
            .ok_or_else(|| ServerError::UnknownInstance(identifier.to_string()))?;
        tracing::info!(instance = inst.instance_name, "stop requested");
        inst.flags.request_stop();
        Ok(())
    }

    pub fn stop_all(&self) {
        for entry in self.entries.lock().iter() {
            entry.inst.flags.request_stop();
        }
    }

    /// Status rows from in-memory state, in display order.
    pub fn status_rows(&self) -> Vec<StatusRow> {
        let now = self.clock.now_iso();
        self.entries
            .lock()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let mut row = {
                    let state = entry.inst.state.lock();
                    StatusRow {
                        index: i + 1,
                        project_name: state.project_name.clone(),
                        session_id: state.session_id.clone(),
                        instance_name: state.project_instance.clone(),
                        status: state.status.to_string(),
                        phase: state.current_phase.map(|p| p.to_string()),
                        current_iteration: state.current_iteration,
                        max_iterations: state.max_iterations,
                        elapsed: String::new(),
                    }
                };
                row.elapsed = entry
                    .inst
                    .elapsed_secs(&now)
                    .map(format_elapsed)
                    .unwrap_or_else(|| "N/A".to_string());
                row
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The interactive REPL: status display plus the add/stop/continue/fork
//! flows. The scheduler keeps running between prompts; every command
//! operates on in-memory state.

use crate::commands::{self, Command};
use crate::output;
use actor_core::{generate_session_id, Clock, SystemClock};
use actor_engine::{AgentKind, ProjectInstance};
use actor_server::{
    discover_projects, discover_sessions, restore_instance, RestoreRequest, TranslationServer,
};
use std::io::Write;
use std::sync::Arc;

pub async fn run(server: &Arc<TranslationServer<SystemClock>>) -> anyhow::Result<()> {
    println!();
    println!("Type 'help' for commands.");
    loop {
        println!();
        print!("{}", output::render_status(&server.status_rows()));
        let Some(line) = prompt("actor> ").await? else {
            // EOF on stdin: shut down like an explicit exit.
            server.stop_all();
            server.shutdown();
            return Ok(());
        };

        match commands::parse(&line) {
            Command::Empty => continue,
            Command::Help => println!("{}", commands::HELP_TEXT),
            Command::Add => {
                if let Err(e) = add_flow(server).await {
                    println!("Error: {e}");
                }
            }
            Command::Stop(target) => match server.stop(&target) {
                Ok(()) => println!("Stop requested for '{target}' (takes effect at the next phase boundary)."),
                Err(e) => println!("Error: {e}"),
            },
            Command::StopAll => {
                server.stop_all();
                println!("Stop requested for all instances.");
            }
            Command::Continue => {
                if let Err(e) = restore_flow(server, false).await {
                    println!("Error: {e}");
                }
            }
            Command::Fork => {
                if let Err(e) = restore_flow(server, true).await {
                    println!("Error: {e}");
                }
            }
            Command::Exit => {
                server.stop_all();
                server.shutdown();
                println!("Exiting.");
                return Ok(());
            }
            Command::Unknown(message) => println!("{message}"),
        }
    }
}

/// Read one line from stdin; `None` on EOF.
async fn prompt(label: &str) -> anyhow::Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|read| (read, line))
    })
    .await??;
    Ok(match line {
        (0, _) => None,
        (_, text) => Some(text),
    })
}

async fn ask(label: &str, default: &str) -> anyhow::Result<String> {
    let line = prompt(&format!("{label} [{default}]: ")).await?.unwrap_or_default();
    let trimmed = line.trim();
    Ok(if trimmed.is_empty() { default.to_string() } else { trimmed.to_string() })
}

/// Parse a project selection: `all`, or comma/space separated 1-based
/// indices. Out-of-range and non-numeric entries are dropped.
pub fn parse_selection(input: &str, len: usize) -> Vec<usize> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("all") {
        return (0..len).collect();
    }
    let mut picked: Vec<usize> = trimmed
        .split([',', ' '])
        .filter_map(|tok| tok.trim().parse::<usize>().ok())
        .filter(|n| *n >= 1 && *n <= len)
        .map(|n| n - 1)
        .collect();
    picked.sort_unstable();
    picked.dedup();
    picked
}

async fn add_flow(server: &Arc<TranslationServer<SystemClock>>) -> anyhow::Result<()> {
    let projects = discover_projects(server.config())?;
    if projects.is_empty() {
        println!("No projects found under {}.", server.config().input_directory.display());
        return Ok(());
    }
    println!();
    print!("{}", output::render_projects(&projects));

    let selection =
        prompt("Select projects (numbers, 'all', or 'q' to cancel): ").await?.unwrap_or_default();
    if selection.trim().eq_ignore_ascii_case("q") {
        return Ok(());
    }
    let picked = parse_selection(&selection, projects.len());
    if picked.is_empty() {
        println!("Nothing selected.");
        return Ok(());
    }

    let translator = choose_agent("Translator", AgentKind::translator_ids()).await?;
    let discriminator = choose_agent("Discriminator", AgentKind::discriminator_ids()).await?;
    let max_iterations: u32 = ask("Maximum iterations", "10").await?.parse().unwrap_or(10);

    let clock = SystemClock;
    for index in picked {
        let project = &projects[index];
        let session_id = generate_session_id(&project.name, &clock.now_iso());
        let inst = ProjectInstance::create(
            server.config(),
            &project.name,
            &session_id,
            &translator,
            &discriminator,
            max_iterations,
        )?;
        println!("Queued {} ({session_id})", project.name);
        server.add_instance(inst);
    }
    Ok(())
}

async fn choose_agent(label: &str, options: &[&str]) -> anyhow::Result<String> {
    println!("{label} options:");
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    let answer = ask(label, options[0]).await?;
    // Accept either an index or a literal id.
    if let Ok(index) = answer.parse::<usize>() {
        if index >= 1 && index <= options.len() {
            return Ok(options[index - 1].to_string());
        }
    }
    Ok(answer)
}

async fn restore_flow(
    server: &Arc<TranslationServer<SystemClock>>,
    fork: bool,
) -> anyhow::Result<()> {
    let sessions = discover_sessions(server.config());
    if sessions.is_empty() {
        println!("No previous sessions found.");
        return Ok(());
    }
    println!();
    print!("{}", output::render_sessions(&sessions));

    let choice = prompt("Session number (or 'q' to cancel): ").await?.unwrap_or_default();
    if choice.trim().eq_ignore_ascii_case("q") {
        return Ok(());
    }
    let index: usize = choice.trim().parse().unwrap_or(0);
    if index < 1 || index > sessions.len() {
        println!("Invalid session number.");
        return Ok(());
    }
    let session = sessions[index - 1].clone();
    if session.available_backups.is_empty() {
        println!("No backups available for this session.");
        return Ok(());
    }

    let backups = session
        .available_backups
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    println!("Available iteration backups: {backups}");
    println!("Restoring iteration N resumes work at iteration N + 1.");
    let iteration: u32 = ask("Restore from iteration", &backups_default(&session.available_backups))
        .await?
        .parse()
        .unwrap_or(0);
    if !session.available_backups.contains(&iteration) {
        println!("No backup for iteration {iteration}.");
        return Ok(());
    }

    let max_iterations: u32 = ask("Maximum iterations", &session.max_iterations.to_string())
        .await?
        .parse()
        .unwrap_or(session.max_iterations);

    let (translator, discriminator) = if fork {
        println!("Original translator: {}", session.translator);
        println!("Original discriminator: {}", session.discriminator);
        let translator = choose_agent("Translator", AgentKind::translator_ids()).await?;
        let discriminator = choose_agent("Discriminator", AgentKind::discriminator_ids()).await?;
        (Some(translator), Some(discriminator))
    } else {
        (None, None)
    };

    let request = RestoreRequest {
        session,
        iteration,
        max_iterations,
        fork,
        translator,
        discriminator,
    };
    let inst = restore_instance(server.config(), &request, &SystemClock)?;
    println!(
        "Created {} ({}); will continue from iteration {}.",
        inst.project_name,
        inst.session_id,
        iteration + 1
    );
    server.add_instance(inst);
    Ok(())
}

fn backups_default(backups: &[u32]) -> String {
    backups.last().copied().unwrap_or(0).to_string()
}

#[cfg(test)]
#[path = "repl_tests.rs"]
mod tests;

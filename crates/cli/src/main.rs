// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `actor`: the adversarial translation orchestrator CLI.
//!
//! Loads (or prompts for) configuration, starts the translation server,
//! and drops into the interactive REPL.

mod commands;
mod output;
mod repl;

use actor_core::{Config, SystemClock};
use actor_engine::DefaultInvoker;
use actor_lps::LprocPaths;
use actor_server::TranslationServer;
use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const LOGO: &str = r#"
    _    ____ _____     ____
   / \  / ___|_   _|__ |  _ \
  / _ \| |     | |/ _ \| |_) |
 / ___ \ |___  | | (_) |  _ <
/_/   \_\____| |_|\___/|_| \_\
"#;

#[derive(Parser)]
#[command(
    name = "actor",
    about = "Adversarial Agent Collaboration for C to Rust Translation",
    disable_version_flag = true
)]
struct Cli {
    /// Show version information
    #[arg(long, short = 'v')]
    version: bool,

    /// JSON configuration file
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("ACTOR_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("ACToR version {VERSION}");
        println!("Adversarial Agent Collaboration for C to Rust Translation");
        return Ok(());
    }

    init_tracing();

    let config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?;
            println!("{LOGO}");
            println!("Loaded configuration from {}", path.display());
            config
        }
        None => prompt_config()?,
    };

    if !config.input_directory.is_dir() {
        anyhow::bail!(
            "input directory does not exist: {}",
            config.input_directory.display()
        );
    }

    let paths = LprocPaths::resolve().context("resolving lproc root")?;
    let invoker = Arc::new(DefaultInvoker::with_default_proxy(paths));
    let server = TranslationServer::new(config, SystemClock, invoker);
    Arc::clone(&server).start_worker();

    repl::run(&server).await
}

/// Interactive configuration: each key prompts with its default.
fn prompt_config() -> anyhow::Result<Config> {
    println!("{LOGO}");
    println!("Adversarial Agent Collaboration for C to Rust Translation  v{VERSION}");
    println!();
    println!("Configuration Setup (press Enter to accept defaults)");
    println!();

    let defaults = Config::default();
    let mut config = defaults.clone();

    let value = ask("Max parallel tasks", &defaults.max_parallel.to_string())?;
    config.max_parallel = value.parse().unwrap_or(defaults.max_parallel);
    config.input_directory =
        ask("Input directory", &defaults.input_directory.display().to_string())?.into();
    config.working_directory =
        ask("Working directory", &defaults.working_directory.display().to_string())?.into();
    config.backups_directory =
        ask("Backups directory", &defaults.backups_directory.display().to_string())?.into();
    config.output_directory =
        ask("Output directory", &defaults.output_directory.display().to_string())?.into();

    println!();
    println!("{}", output::render_config_summary(&config));
    Ok(config)
}

fn ask(label: &str, default: &str) -> anyhow::Result<String> {
    print!("  {label} [{default}]: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let trimmed = line.trim();
    Ok(if trimmed.is_empty() { default.to_string() } else { trimmed.to_string() })
}

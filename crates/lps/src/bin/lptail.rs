// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lptail -f FILE`: follow a regular file forever, emitting complete
//! lines as they are appended. The pipeline input side of every LProc.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lptail", about = "Line-buffered tail -f for LProc stdin files", version)]
struct Cli {
    /// File to follow
    #[arg(short = 'f', value_name = "FILE", required = true)]
    follow: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    if let Err(e) = actor_lps::tail::follow(&cli.follow, &mut stdout) {
        // Downstream closed or the file became unreadable; nothing to clean up.
        eprintln!("lptail: {e}");
        std::process::exit(1);
    }
}

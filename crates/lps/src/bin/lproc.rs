// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lproc`: the Long-Process Supervisor CLI.
//!
//! ```text
//! lproc -s NAME CMD                          start
//! lproc -l                                   list
//! lproc -i NAME                              info (includes AGE_ANY_IO)
//! lproc -k NAME                              kill
//! lproc -d NAME                              delete (archive files)
//! lproc -e NAME FOLDER                       export files
//! lproc -a N NAME                            append exactly N stdin lines
//! lproc -p NAME STREAM N CONVERTER [-- ARGS] pretty-print a stream tail
//! ```

use actor_lps::{
    append_lines, delete_lproc, export_lproc, kill_lproc, list_lprocs, lproc_info, pretty_stream,
    start_lproc, FileReport, InfoReport, KillOutcome, ListEntry, LpsError, LprocPaths,
    StartOutcome, StreamKind,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lproc", about = "Supervise long-running command pipelines", version)]
struct Cli {
    /// Start: -s NAME CMD
    #[arg(short = 's', num_args = 2, value_names = ["NAME", "CMD"])]
    start: Option<Vec<String>>,

    /// List all LProcs
    #[arg(short = 'l')]
    list: bool,

    /// Show detailed info for an LProc
    #[arg(short = 'i', value_name = "NAME")]
    info: Option<String>,

    /// Kill a running LProc (files are retained)
    #[arg(short = 'k', value_name = "NAME")]
    kill: Option<String>,

    /// Delete an LProc (archive its files; must not be running)
    #[arg(short = 'd', value_name = "NAME")]
    delete: Option<String>,

    /// Export: -e NAME FOLDER
    #[arg(short = 'e', num_args = 2, value_names = ["NAME", "FOLDER"])]
    export: Option<Vec<String>>,

    /// Append exactly N lines from stdin: -a N NAME
    #[arg(short = 'a', num_args = 2, value_names = ["N", "NAME"])]
    append: Option<Vec<String>>,

    /// Pretty-print: -p NAME STREAM N CONVERTER (N may be -1 for the whole file)
    #[arg(short = 'p', num_args = 4, value_names = ["NAME", "STREAM", "N", "CONVERTER"],
          allow_hyphen_values = true)]
    pretty: Option<Vec<String>>,

    /// Extra arguments passed to the converter (after --)
    #[arg(last = true)]
    converter_args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    std::process::exit(match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    });
}

fn run(cli: Cli) -> Result<i32, LpsError> {
    let paths = LprocPaths::resolve()?;

    if let Some(args) = cli.start {
        return cmd_start(&paths, &args[0], &args[1]);
    }
    if cli.list {
        return cmd_list(&paths);
    }
    if let Some(name) = cli.info {
        return cmd_info(&paths, &name);
    }
    if let Some(name) = cli.kill {
        return cmd_kill(&paths, &name);
    }
    if let Some(name) = cli.delete {
        return cmd_delete(&paths, &name);
    }
    if let Some(args) = cli.export {
        return cmd_export(&paths, &args[0], &args[1]);
    }
    if let Some(args) = cli.append {
        return cmd_append(&paths, &args[0], &args[1]);
    }
    if let Some(args) = cli.pretty {
        return cmd_pretty(&paths, &args, &cli.converter_args);
    }

    eprintln!("No operation requested; see lproc --help");
    Ok(2)
}

fn cmd_start(paths: &LprocPaths, name: &str, command: &str) -> Result<i32, LpsError> {
    match start_lproc(paths, name, command)? {
        StartOutcome::Running { pgid } => {
            println!("LProc started successfully!");
            if let Some(pgid) = pgid {
                println!("  Name: {name}");
                println!("  PGID: {pgid}");
            }
            Ok(0)
        }
        StartOutcome::StillStarting => {
            println!("LProc '{name}' launched but not yet visible; it may still be starting.");
            Ok(0)
        }
    }
}

fn cmd_list(paths: &LprocPaths) -> Result<i32, LpsError> {
    let entries = list_lprocs(paths);
    if entries.is_empty() {
        println!("No LProcs found in {}", paths.root().display());
        return Ok(0);
    }
    for entry in &entries {
        print_list_entry(entry);
    }
    Ok(0)
}

fn print_list_entry(entry: &ListEntry) {
    match &entry.running {
        Some(info) => {
            println!("{}  [RUNNING]", entry.name);
            if let Some(pgid) = info.pgid {
                println!("  PGID: {pgid}");
            }
            println!("  tail: pid {} ({})", info.tail.pid, info.tail.name);
            println!("  bash: pid {} ({})", info.orchestrator.pid, info.orchestrator.name);
            for cmd in &info.commands {
                println!("  cmd:  pid {} ({})", cmd.pid, cmd.name);
            }
        }
        None => println!("{}  [INACTIVE]", entry.name),
    }
    for file in &entry.files {
        match file.age_secs {
            Some(age) => println!(
                "  {}: {} bytes, modified {} ago",
                file.kind,
                file.size,
                format_age(age)
            ),
            None => println!("  {}: missing", file.kind),
        }
    }
}

fn format_age(secs: u64) -> String {
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}

fn cmd_info(paths: &LprocPaths, name: &str) -> Result<i32, LpsError> {
    let report = lproc_info(paths, name)?;
    print_info(&report);
    Ok(0)
}

fn print_info(report: &InfoReport) {
    println!("LProc Information: {}", report.name);
    println!("{}", "=".repeat(40));
    println!();
    println!("Process Status:");
    match &report.running {
        Some(info) => {
            println!("  Status: RUNNING");
            if let Some(pgid) = info.pgid {
                println!("  PGID:   {pgid}");
            }
            println!();
            println!("  Tail:         pid {}  {}", info.tail.pid, info.tail.cmd);
            println!("  Orchestrator: pid {}  {}", info.orchestrator.pid, info.orchestrator.cmd);
            if let Some(inner) = &info.inner_bash {
                println!("  Inner bash:   pid {}  {}", inner.pid, info.inner_bash_c);
            } else if !info.inner_bash_c.is_empty() {
                println!("  Inner bash -c: {}", info.inner_bash_c);
            }
            for cmd in &info.commands {
                println!("  Command:      pid {}  {}", cmd.pid, cmd.cmd);
            }
        }
        None => println!("  Status: NOT RUNNING"),
    }
    println!();
    println!("{}", "=".repeat(40));
    println!();
    for file in &report.files {
        print_file_report(file);
    }
    match report.age_any_io {
        Some(age) => println!("AGE_ANY_IO: {age} seconds (most recent activity)"),
        None => println!("AGE_ANY_IO: N/A (no file data available)"),
    }
}

fn print_file_report(file: &FileReport) {
    println!("{}: {}", file.kind.as_str().to_uppercase(), file.path.display());
    match (&file.modified, file.age_secs) {
        (Some(modified), Some(age)) => {
            println!("  Size:     {} bytes", file.size);
            println!("  Modified: {modified}");
            println!("  Age:      {age} seconds");
        }
        _ => println!("  Error: File not found"),
    }
    println!();
}

fn cmd_kill(paths: &LprocPaths, name: &str) -> Result<i32, LpsError> {
    println!("Killing LProc '{name}'...");
    match kill_lproc(paths, name)? {
        KillOutcome::NotRunning => {
            println!("Warning: LProc '{name}' files exist but no processes are running");
            Ok(0)
        }
        KillOutcome::Terminated { pgid } => {
            if let Some(pgid) = pgid {
                println!("  Signalled process group {pgid}");
            }
            println!();
            println!("Success: All processes for LProc '{name}' have been terminated.");
            println!("Note: The files still exist in {}", paths.root().display());
            Ok(0)
        }
    }
}

fn cmd_delete(paths: &LprocPaths, name: &str) -> Result<i32, LpsError> {
    let dest = delete_lproc(paths, name)?;
    println!("Archiving files for LProc '{name}' to: {}", dest.display());
    println!("Successfully archived files for LProc '{name}'");
    Ok(0)
}

fn cmd_export(paths: &LprocPaths, name: &str, folder: &str) -> Result<i32, LpsError> {
    let dest = PathBuf::from(folder);
    let copied = export_lproc(paths, name, &dest)?;
    println!("Exporting LProc '{name}' to: {}", dest.display());
    for kind in &copied {
        println!("  Copied: {name}.{kind}");
    }
    if copied.is_empty() {
        eprintln!("No files were exported for LProc '{name}'");
        return Ok(1);
    }
    println!();
    println!("Successfully exported {} file(s) for LProc '{name}'", copied.len());
    Ok(0)
}

fn cmd_append(paths: &LprocPaths, n: &str, name: &str) -> Result<i32, LpsError> {
    let expected: i64 = n.parse().map_err(|_| LpsError::InvalidNumber(n.to_string()))?;
    let mut stdin = std::io::stdin().lock();
    let appended = append_lines(paths, name, expected, &mut stdin)?;
    println!(
        "Appended {appended} line(s) to {}",
        paths.stream_file(name, StreamKind::Stdin).display()
    );
    Ok(0)
}

fn cmd_pretty(paths: &LprocPaths, args: &[String], extra: &[String]) -> Result<i32, LpsError> {
    let name = &args[0];
    let stream = StreamKind::parse(&args[1])?;
    let nlines: i64 = args[2].parse().map_err(|_| LpsError::InvalidNumber(args[2].clone()))?;
    let converter = &args[3];

    let mut stdout = std::io::stdout().lock();
    pretty_stream(paths, name, stream, nlines, converter, extra, &mut stdout)?;
    Ok(0)
}

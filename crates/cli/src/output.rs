// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text table rendering for the REPL.

use actor_core::Config;
use actor_server::{DiscoveredProject, DiscoveredSession, StatusRow};

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let mut out = String::new();
    let render_row = |cells: &[String], widths: &[usize]| -> String {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            line.push_str(&format!("{:<width$}", cell, width = widths[i]));
        }
        line.trim_end().to_string()
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    out.push_str(&render_row(&header_cells, &widths));
    out.push('\n');
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&"-".repeat(total));
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row, &widths));
        out.push('\n');
    }
    out
}

/// The live status table.
pub fn render_status(rows: &[StatusRow]) -> String {
    if rows.is_empty() {
        return "No active projects. Type 'add' to create one.\n".to_string();
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.index.to_string(),
                row.project_name.clone(),
                row.session_id.clone(),
                row.status.clone(),
                row.phase.clone().unwrap_or_else(|| "-".to_string()),
                format!("{}/{}", row.current_iteration, row.max_iterations),
                row.elapsed.clone(),
            ]
        })
        .collect();
    render_table(
        &["#", "Project", "Session", "Status", "Phase", "Iteration", "Elapsed"],
        &cells,
    )
}

/// Discovered-projects table for `add`.
pub fn render_projects(projects: &[DiscoveredProject]) -> String {
    let cells: Vec<Vec<String>> = projects
        .iter()
        .enumerate()
        .map(|(i, p)| {
            vec![
                (i + 1).to_string(),
                p.name.clone(),
                p.file_count.to_string(),
                if p.has_readme { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    render_table(&["#", "Project", "Files", "README"], &cells)
}

/// Prior-session table for `continue`/`fork`.
pub fn render_sessions(sessions: &[DiscoveredSession]) -> String {
    let cells: Vec<Vec<String>> = sessions
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let backups = if s.available_backups.is_empty() {
                "None".to_string()
            } else {
                s.available_backups
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            vec![
                (i + 1).to_string(),
                s.project_name.clone(),
                s.session_id.clone(),
                format!("Trans: {} Disc: {}", s.translator, s.discriminator),
                s.status.clone(),
                backups,
                s.last_updated.chars().take(19).collect(),
            ]
        })
        .collect();
    render_table(
        &["#", "Project", "Instance", "Setting", "Status", "Backups", "Last Updated"],
        &cells,
    )
}

/// Configuration summary shown before the server starts.
pub fn render_config_summary(config: &Config) -> String {
    let rows = vec![
        vec!["Max Parallel".to_string(), config.max_parallel.to_string()],
        vec!["Input Directory".to_string(), config.input_directory.display().to_string()],
        vec!["Working Directory".to_string(), config.working_directory.display().to_string()],
        vec!["Backups Directory".to_string(), config.backups_directory.display().to_string()],
        vec!["Output Directory".to_string(), config.output_directory.display().to_string()],
    ];
    render_table(&["Setting", "Value"], &rows)
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

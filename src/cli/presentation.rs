//! CLI presentation: text formatters per command.
//!
//! Color is applied only when the caller asks for it, so formatted output is
//! stable in tests and when `ui.color = false`.

use crate::diff::{ChangeKind, FileChange};
use crate::repository::{CommitResult, FetchResult, RepositoryInfo, RevertResult};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

fn format_section_heading(title: &str, color: bool) -> String {
    if color {
        format!("{}", title.bold().underline())
    } else {
        title.to_string()
    }
}

fn change_marker(kind: ChangeKind, color: bool) -> String {
    let (marker, label) = match kind {
        ChangeKind::Addition => ("+", "addition"),
        ChangeKind::Change => ("~", "change"),
        ChangeKind::Deletion => ("-", "deletion"),
    };
    if !color {
        return format!("{} {}", marker, label);
    }
    let marker = match kind {
        ChangeKind::Addition => marker.green().to_string(),
        ChangeKind::Change => marker.yellow().to_string(),
        ChangeKind::Deletion => marker.red().to_string(),
    };
    format!("{} {}", marker, label)
}

/// One line per changed path: `  + addition: a.txt`.
pub fn format_change_report(report: &[FileChange], color: bool) -> String {
    report
        .iter()
        .map(|change| format!("  {}: {}", change_marker(change.kind, color), change.path))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_create_result(repo_name: &str, user: &str, tag: &str) -> String {
    format!(
        "Created repository '{}' for user {} (on commit tag {})",
        repo_name, user, tag
    )
}

pub fn format_info(info: &RepositoryInfo, include_files: bool, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading("Repository", color)));
    out.push_str(&format!("  Name: {}\n", info.repo_name));
    out.push_str(&format!("  User: {}\n", info.user));
    out.push_str(&format!("  Commits: {}\n", info.commit_count));
    out.push_str(&format!(
        "  Last fetch: {}\n\n",
        info.last_fetch.as_deref().unwrap_or("never")
    ));
    out.push_str(&format!("On commit tag {}\n", info.head));

    if info.changes.is_empty() {
        out.push_str("Working directory is clean - no changes.");
    } else {
        out.push_str("info:\n");
        out.push_str(&format_change_report(&info.changes.report(), color));
    }

    if include_files {
        out.push_str(&format!(
            "\n\n{}\n",
            format_section_heading("Tracked files", color)
        ));
        if info.tracked.is_empty() {
            out.push_str("No tracked files.");
        } else {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Path", "Commit"]);
            for (path, record) in &info.tracked {
                table.add_row(vec![path.clone(), record.subdir.clone()]);
            }
            out.push_str(&table.to_string());
        }
    }
    out
}

pub fn format_commit_result(result: &CommitResult, color: bool) -> String {
    let mut lines = vec![
        format!("Creating new commit {} --> {}", result.previous, result.tag),
        "commit:".to_string(),
    ];
    let report = format_change_report(&result.changes.report(), color);
    if !report.is_empty() {
        lines.push(report);
    }
    lines.push(format!(
        "Changes successfully committed, on tag {}",
        result.tag
    ));
    lines.join("\n")
}

pub fn format_revert_result(result: &RevertResult, color: bool) -> String {
    let mut out = String::from("revert:");
    for file in &result.restored {
        let marker = if color {
            "->".yellow().to_string()
        } else {
            "->".to_string()
        };
        out.push_str(&format!("\n  {} revert: {} | {}", marker, file.path, file.subdir));
    }
    if result.restored.is_empty() {
        out.push_str("\n  (commit has no files)");
    }
    out.push_str(&format!("\nWorking directory now matches {}", result.tag));
    out
}

pub fn format_fetch_result(result: &FetchResult, color: bool) -> String {
    let plan = &result.plan;
    let mut out = format!("fetch: {}", plan.source.display());
    if plan.incoming.is_empty() {
        out.push_str("\n  No new commits.");
    }
    for tag in &plan.incoming {
        let marker = if color {
            "+".green().to_string()
        } else {
            "+".to_string()
        };
        out.push_str(&format!("\n  {} fetched: {}", marker, tag));
    }
    for tag in &plan.skipped {
        out.push_str(&format!("\n  = present: {}", tag));
    }
    if let Some(reverted) = &result.reverted {
        out.push('\n');
        out.push_str(&format_revert_result(reverted, color));
    }
    out
}

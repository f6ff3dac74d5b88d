//! Plain-text reports for a preview and for finished imports.

use crate::models::{
    FolderType, ImportPreview, ImportResults, PackPreview, ParseIssue, ReferenceSets, Severity,
    ValidationIssue,
};

/// Renders human-readable summaries. Info-level issues are only listed when
/// `show_info` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportReport {
    pub show_info: bool,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { show_info: true }
    }

    /// Scan, parse and validation outcome of every pack in `preview`.
    pub fn preview(&self, preview: &ImportPreview) -> String {
        let scan = &preview.scan;
        let mut lines = vec![format!(
            "Source: {} ({} pack(s), {} file(s))",
            scan.root_name, scan.summary.total_packs, scan.summary.total_files
        )];

        let by_type: Vec<String> = scan
            .summary
            .files_by_type
            .iter()
            .map(|(folder, count)| format!("{} {}", count, folder))
            .collect();
        if !by_type.is_empty() {
            lines.push(format!("Files: {}", by_type.join(", ")));
        }
        if scan.summary.unsupported_files > 0 {
            lines.push(format!(
                "Unsupported files ignored: {}",
                scan.summary.unsupported_files
            ));
        }

        for pack in &preview.packs {
            lines.push(String::new());
            self.pack_section(pack, &mut lines);
        }

        lines.join("\n")
    }

    fn pack_section(&self, pack: &PackPreview, lines: &mut Vec<String>) {
        let parse = &pack.parse.summary;
        let validation = &pack.validation.summary;

        lines.push(format!("== {} ==", pack.name()));
        if let Some(info) = &pack.parse.packinfo {
            let mut about = Vec::new();
            if let Some(version) = &info.version {
                about.push(format!("version {}", version));
            }
            if let Some(author) = &info.author {
                about.push(format!("by {}", author));
            }
            if !about.is_empty() {
                lines.push(format!("  {}", about.join(" ")));
            }
        }
        lines.push(format!(
            "  Files: {} parsed, {} failed",
            parse.successful_files, parse.failed_files
        ));
        lines.push(format!(
            "  Entries: {} total, {} valid, {} with warnings, {} with errors",
            validation.total_entries,
            validation.valid_entries,
            validation.entries_with_warnings,
            validation.entries_with_errors
        ));

        for file in pack.parse.files.iter().filter(|f| !f.errors.is_empty() || !f.warnings.is_empty()) {
            lines.push(format!("  {}", file.relative_path));
            for issue in &file.errors {
                lines.push(format!("    error: {}", parse_issue_text(issue)));
            }
            for issue in &file.warnings {
                lines.push(format!("    warning: {}", parse_issue_text(issue)));
            }
        }

        for file in &pack.validation.validation_results {
            let entries: Vec<_> = file
                .entries
                .iter()
                .filter_map(|entry| {
                    let shown: Vec<&ValidationIssue> = entry
                        .issues
                        .iter()
                        .filter(|issue| self.show_info || issue.severity != Severity::Info)
                        .collect();
                    (!shown.is_empty()).then_some((entry.name.as_str(), shown))
                })
                .collect();
            if entries.is_empty() {
                continue;
            }
            lines.push(format!("  {}", file.file));
            for (name, issues) in entries {
                lines.push(format!("    {}", name));
                for issue in issues {
                    lines.push(format!("      {}", validation_issue_text(issue)));
                }
            }
        }

        let missing = &pack.validation.cross_references.missing_references;
        if missing.total() > 0 {
            lines.push("  Missing references:".to_string());
            lines.extend(reference_lines(missing));
        }
    }

    /// Counts, per-pack breakdown, placeholders and errors of an import.
    pub fn results(&self, results: &ImportResults) -> String {
        let status = if results.success {
            "Import complete"
        } else {
            "Import finished with errors"
        };
        let mut lines = vec![
            format!("{} in {:.2}s", status, results.duration.as_secs_f64()),
            format!(
                "Imported {}, skipped {}, failed {}",
                results.total_imported, results.total_skipped, results.total_failed
            ),
        ];

        for pack in &results.packs {
            let target = if pack.destination == pack.pack_name {
                String::new()
            } else {
                format!(" -> {}", pack.destination)
            };
            lines.push(format!(
                "  {}{}: {} imported, {} skipped, {} failed",
                pack.pack_name, target, pack.imported, pack.skipped, pack.failed
            ));
            for failure in &pack.failures {
                let entry = failure
                    .entry
                    .as_deref()
                    .map(|name| format!(" [{}]", name))
                    .unwrap_or_default();
                lines.push(format!("    {}{}: {}", failure.file, entry, failure.message));
            }
        }

        if !results.placeholders_created.is_empty() {
            lines.push(format!(
                "Placeholders created: {}",
                results.placeholders_created.len()
            ));
            for placeholder in &results.placeholders_created {
                lines.push(format!(
                    "  {} {} in {}",
                    placeholder.folder_type.label(),
                    placeholder.name,
                    placeholder.pack
                ));
            }
        }

        if !results.errors.is_empty() {
            lines.push("Errors:".to_string());
            for error in &results.errors {
                lines.push(format!("  {}: {}", error.pack, error.message));
            }
        }

        lines.join("\n")
    }
}

fn parse_issue_text(issue: &ParseIssue) -> String {
    match (issue.line, issue.column) {
        (Some(line), Some(column)) => format!("{} (line {}, column {})", issue.message, line, column),
        (Some(line), None) => format!("{} (line {})", issue.message, line),
        _ => issue.message.clone(),
    }
}

fn validation_issue_text(issue: &ValidationIssue) -> String {
    let severity = match issue.severity {
        Severity::Critical => "critical",
        Severity::Warning => "warning",
        Severity::Info => "info",
    };
    let mut text = format!("{} [{}]: {}", severity, issue.field, issue.message);
    if !issue.suggestion.is_empty() {
        text.push_str(&format!(" ({})", issue.suggestion));
    }
    text
}

fn reference_lines(refs: &ReferenceSets) -> Vec<String> {
    [
        FolderType::Mobs,
        FolderType::Skills,
        FolderType::Items,
        FolderType::DropTables,
    ]
    .into_iter()
    .filter_map(|kind| {
        let names = refs.get(kind)?;
        (!names.is_empty()).then(|| {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            format!("    {}: {}", kind, names.join(", "))
        })
    })
    .collect()
}

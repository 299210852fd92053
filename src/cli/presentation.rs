//! Presentation: create/verify outcomes as colored text or JSON.

use crate::checklist::{EntryStatus, ReconcileEntry, Verification};
use crate::cli::parse::ReportFormat;
use crate::error::ApiError;
use crate::service::{CreateOutcome, VerifyOutcome};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

/// How reports are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub format: ReportFormat,
    pub color: bool,
    pub show_good: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            color: false,
            show_good: true,
        }
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Ok,
    Warn,
    Bad,
}

fn paint(text: &str, tone: Tone, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match tone {
        Tone::Ok => text.green().to_string(),
        Tone::Warn => text.yellow().to_string(),
        Tone::Bad => text.red().to_string(),
    }
}

fn no_matches_text(patterns: &[String], options: &ReportOptions) -> String {
    paint(
        &format!("0 matches for pattern(s) {}", patterns.join(" ")),
        Tone::Ok,
        options.color,
    )
}

pub fn format_create_outcome(
    outcome: &CreateOutcome,
    patterns: &[String],
    options: &ReportOptions,
) -> Result<String, ApiError> {
    match (outcome, options.format) {
        (CreateOutcome::NoMatches, ReportFormat::Json) => Ok(serde_json::to_string_pretty(
            &json!({ "mode": "create", "matches": 0, "patterns": patterns }),
        )?),
        (CreateOutcome::NoMatches, ReportFormat::Text) => Ok(no_matches_text(patterns, options)),
        (
            CreateOutcome::Written {
                path,
                entries,
                skipped,
            },
            ReportFormat::Json,
        ) => Ok(serde_json::to_string_pretty(&json!({
            "mode": "create",
            "checklist": path.display().to_string(),
            "entries": entries,
            "skipped": skipped,
            "created_at": chrono::Utc::now().to_rfc3339(),
        }))?),
        (
            CreateOutcome::Written {
                path,
                entries,
                skipped,
            },
            ReportFormat::Text,
        ) => {
            let mut out = paint(
                &format!("Ok, wrote {} entries to {}", entries, path.display()),
                Tone::Ok,
                options.color,
            );
            if *skipped > 0 {
                out.push_str(&format!("\n{} non-regular path(s) skipped", skipped));
            }
            Ok(out)
        }
    }
}

pub fn format_verify_outcome(
    outcome: &VerifyOutcome,
    patterns: &[String],
    checklist: &Path,
    options: &ReportOptions,
) -> Result<String, ApiError> {
    let (verification, parse, skipped) = match outcome {
        VerifyOutcome::NoMatches => {
            return match options.format {
                ReportFormat::Json => Ok(serde_json::to_string_pretty(
                    &json!({ "mode": "verify", "matches": 0, "patterns": patterns, "ok": true }),
                )?),
                ReportFormat::Text => Ok(no_matches_text(patterns, options)),
            };
        }
        VerifyOutcome::Verified {
            verification,
            parse,
            skipped,
        } => (verification, parse, *skipped),
    };

    let shown: Vec<&ReconcileEntry> = verification
        .entries
        .iter()
        .filter(|e| options.show_good || e.status.is_discrepancy())
        .collect();

    if options.format == ReportFormat::Json {
        let out = json!({
            "mode": "verify",
            "checklist": checklist.display().to_string(),
            "ok": verification.ok,
            "checked_at": chrono::Utc::now().to_rfc3339(),
            "summary": summary_json(verification),
            "entries": shown,
            "skipped": skipped,
            "malformed_lines": parse.malformed,
            "duplicate_lines": parse.duplicates,
        });
        return Ok(serde_json::to_string_pretty(&out)?);
    }

    let mut lines: Vec<String> = shown
        .iter()
        .map(|entry| format_entry_line(entry, options.color))
        .collect();

    if parse.malformed > 0 || parse.duplicates > 0 {
        lines.push(paint(
            &format!(
                "Checklist {}: {} malformed line(s) skipped, {} duplicate line(s) ignored",
                checklist.display(),
                parse.malformed,
                parse.duplicates
            ),
            Tone::Warn,
            options.color,
        ));
    }

    lines.push(format_summary_table(verification));
    lines.push(if verification.ok {
        paint("Checklist OK", Tone::Ok, options.color)
    } else {
        paint("Checklist FAILED", Tone::Bad, options.color)
    });
    Ok(lines.join("\n"))
}

fn format_entry_line(entry: &ReconcileEntry, color: bool) -> String {
    match &entry.status {
        EntryStatus::Good { .. } => format!("File {} is in good state", entry.path),
        EntryStatus::Mismatch { expected, actual } => paint(
            &format!(
                "File {} does not match the checklist (new: {}, old: {})",
                entry.path, actual, expected
            ),
            Tone::Bad,
            color,
        ),
        EntryStatus::Unknown { .. } => paint(
            &format!("File {} is unknown to the checklist", entry.path),
            Tone::Warn,
            color,
        ),
        EntryStatus::Missing { expected } => paint(
            &format!(
                "File {} is missing or was removed (recorded: {})",
                entry.path, expected
            ),
            Tone::Bad,
            color,
        ),
        EntryStatus::Unreadable { reason } => paint(
            &format!("File {} could not be hashed: {}", entry.path, reason),
            Tone::Bad,
            color,
        ),
    }
}

struct Counts {
    good: usize,
    mismatch: usize,
    unknown: usize,
    missing: usize,
    unreadable: usize,
}

fn counts(v: &Verification) -> Counts {
    Counts {
        good: v.count(|s| matches!(s, EntryStatus::Good { .. })),
        mismatch: v.count(|s| matches!(s, EntryStatus::Mismatch { .. })),
        unknown: v.count(|s| matches!(s, EntryStatus::Unknown { .. })),
        missing: v.count(|s| matches!(s, EntryStatus::Missing { .. })),
        unreadable: v.count(|s| matches!(s, EntryStatus::Unreadable { .. })),
    }
}

fn summary_json(v: &Verification) -> serde_json::Value {
    let c = counts(v);
    json!({
        "good": c.good,
        "mismatch": c.mismatch,
        "unknown": c.unknown,
        "missing": c.missing,
        "unreadable": c.unreadable,
    })
}

fn format_summary_table(v: &Verification) -> String {
    let c = counts(v);
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Good", "Mismatch", "Unknown", "Missing", "Unreadable"]);
    table.add_row(vec![
        c.good.to_string(),
        c.mismatch.to_string(),
        c.unknown.to_string(),
        c.missing.to_string(),
        c.unreadable.to_string(),
    ]);
    table.to_string()
}

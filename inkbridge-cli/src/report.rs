use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use inkbridge_core::SessionKind;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Uploaded { url: String },
    AlreadyUploaded,
    Pending,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportRecord {
    pub source: PathBuf,
    pub kind: SessionKind,
    pub id: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ExportRecord {
    pub const fn failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub uploaded: usize,
    pub skipped: usize,
    pub pending: usize,
    pub failed: usize,
}

pub fn tally(records: &[ExportRecord]) -> Tally {
    records.iter().fold(Tally::default(), |mut tally, record| {
        match record.outcome {
            Outcome::Uploaded { .. } => tally.uploaded += 1,
            Outcome::AlreadyUploaded => tally.skipped += 1,
            Outcome::Pending => tally.pending += 1,
            Outcome::Failed { .. } => tally.failed += 1,
        }
        tally
    })
}

pub fn generate_console_report(
    out: &mut dyn Write,
    records: &[ExportRecord],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Export Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=================".cyan())?;

    for record in records {
        let label = format!("{} {}", record.kind, record.source.display());
        match &record.outcome {
            Outcome::Uploaded { url } => {
                writeln!(out, "{} {} → {}", "✅ UPLOADED".green(), label.bold(), url)?;
            }
            Outcome::AlreadyUploaded => {
                writeln!(out, "{} {}", "⏭  SKIPPED".dimmed(), label)?;
            }
            Outcome::Pending => {
                writeln!(out, "{} {}", "🕓 PENDING".yellow(), label)?;
            }
            Outcome::Failed { error } => {
                writeln!(out, "{} {}", "❌ FAILED".red(), label.bold())?;
                writeln!(out, "     • {}", error.red())?;
            }
        }
    }

    let counts = tally(records);
    writeln!(out)?;
    writeln!(out, "Sessions: {}", records.len())?;
    writeln!(out, "Uploaded: {}", counts.uploaded.to_string().green())?;
    writeln!(out, "Already on stat.ink: {}", counts.skipped)?;
    if counts.pending > 0 {
        writeln!(out, "Not yet uploaded: {}", counts.pending.to_string().yellow())?;
    }
    writeln!(out, "Failed: {}", counts.failed.to_string().red())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, records: &[ExportRecord]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(records)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

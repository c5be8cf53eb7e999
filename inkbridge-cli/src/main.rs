mod config;
mod http;
mod report;
mod sessions;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use inkbridge_core::{SessionKind, StatInkExporter, Transport};

use config::Overrides;
use http::{DEFAULT_TIMEOUT, ReqwestTransport};
use report::{ExportRecord, Outcome};
use sessions::LoadedSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored summary for terminals
    Console,
    /// Machine-readable list of per-session outcomes
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "inkbridge", version)]
#[command(about = "Upload Splatoon 3 battle and Salmon Run exports to stat.ink")]
struct Args {
    /// Session export files (one session or a JSON array per file)
    #[arg(required = true)]
    sessions: Vec<PathBuf>,

    /// JSON config file with api_key, upload_mode and endpoint
    #[arg(long)]
    config: Option<PathBuf>,

    /// stat.ink API key (overrides the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// Label recorded as the "Upload Mode" agent variable
    #[arg(long)]
    upload_mode: Option<String>,

    /// stat.ink base URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Only report which sessions stat.ink does not have yet
    #[arg(long)]
    check_only: bool,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = config::load(
        args.config.as_deref(),
        Overrides {
            api_key: args.api_key.clone(),
            upload_mode: args.upload_mode.clone(),
            endpoint: args.endpoint.clone(),
        },
    )?;
    let transport: Arc<dyn Transport> =
        Arc::new(ReqwestTransport::new(DEFAULT_TIMEOUT).context("failed to build HTTP client")?);
    let exporter =
        StatInkExporter::new(&config, transport).context("invalid stat.ink configuration")?;

    let loaded = sessions::load_all(&args.sessions)?;

    if args.report == ReportFormat::Console {
        announce_banner();
    }
    let start_time = Instant::now();

    let pending = pending_ids(&exporter, &loaded).await?;
    let records = if args.check_only {
        check_sessions(&loaded, &pending)
    } else {
        export_sessions(&exporter, &loaded, &pending, args.verbose).await
    };

    write_report(&args, &records, start_time)?;

    if records.iter().any(ExportRecord::failed) {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::init();
    }
}

fn announce_banner() {
    println!("{}", "🦑 inkbridge → stat.ink".bright_cyan().bold());
    println!("{}", "=======================".cyan());
}

/// Native ids stat.ink has no record of, asked once per session kind.
async fn pending_ids(
    exporter: &StatInkExporter,
    loaded: &[LoadedSession],
) -> Result<HashSet<String>> {
    let mut by_kind: HashMap<SessionKind, Vec<String>> = HashMap::new();
    for item in loaded {
        by_kind
            .entry(item.session.kind())
            .or_default()
            .push(item.session.native_id().to_string());
    }
    let mut pending = HashSet::new();
    for (kind, ids) in by_kind {
        let remaining = exporter
            .not_uploaded(kind, &ids)
            .await
            .with_context(|| format!("failed to fetch uploaded {kind} list"))?;
        pending.extend(remaining);
    }
    Ok(pending)
}

fn record(item: &LoadedSession, outcome: Outcome) -> ExportRecord {
    ExportRecord {
        source: item.source.clone(),
        kind: item.session.kind(),
        id: item.session.native_id().to_string(),
        outcome,
    }
}

fn check_sessions(loaded: &[LoadedSession], pending: &HashSet<String>) -> Vec<ExportRecord> {
    loaded
        .iter()
        .map(|item| {
            let outcome = if pending.contains(item.session.native_id()) {
                Outcome::Pending
            } else {
                Outcome::AlreadyUploaded
            };
            record(item, outcome)
        })
        .collect()
}

async fn export_sessions(
    exporter: &StatInkExporter,
    loaded: &[LoadedSession],
    pending: &HashSet<String>,
    verbose: bool,
) -> Vec<ExportRecord> {
    let mut records = Vec::with_capacity(loaded.len());
    for item in loaded {
        if !pending.contains(item.session.native_id()) {
            if verbose {
                println!("⏭  {} already on stat.ink", item.source.display());
            }
            records.push(record(item, Outcome::AlreadyUploaded));
            continue;
        }
        let outcome = match exporter.export_game(&item.session).await {
            Ok(outcome) => Outcome::Uploaded { url: outcome.url },
            Err(e) => {
                log::error!("{}: {e}", item.source.display());
                Outcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        records.push(record(item, outcome));
    }
    records
}

fn write_report(args: &Args, records: &[ExportRecord], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => report::generate_json_report(output_target.writer(), records)?,
        ReportFormat::Console => {
            report::generate_console_report(output_target.writer(), records, start_time.elapsed())?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkbridge_core::Session;

    fn loaded(json: &str) -> LoadedSession {
        let session: Session = serde_json::from_str(json).unwrap();
        LoadedSession {
            source: PathBuf::from("fixture.json"),
            session,
        }
    }

    #[test]
    fn check_only_marks_pending_and_uploaded() {
        let turf = loaded(include_str!(
            "../../inkbridge-core/tests/fixtures/versus_turf.json"
        ));
        let coop = loaded(include_str!(
            "../../inkbridge-core/tests/fixtures/coop_regular.json"
        ));
        let pending: HashSet<String> = [turf.session.native_id().to_string()].into();
        let records = check_sessions(&[turf, coop], &pending);
        assert_eq!(records[0].outcome, Outcome::Pending);
        assert_eq!(records[1].outcome, Outcome::AlreadyUploaded);
        assert_eq!(records[1].kind, SessionKind::Coop);
    }

    #[test]
    fn args_parse_overrides_and_files() {
        let args = Args::try_parse_from([
            "inkbridge",
            "--api-key",
            "k",
            "--report",
            "json",
            "--check-only",
            "a.json",
            "b.json",
        ])
        .unwrap();
        assert_eq!(args.sessions.len(), 2);
        assert_eq!(args.report, ReportFormat::Json);
        assert!(args.check_only);
        assert_eq!(args.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn sessions_are_required() {
        assert!(Args::try_parse_from(["inkbridge", "--check-only"]).is_err());
    }
}

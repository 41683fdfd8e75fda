//! dirwave - breadth-first concurrent directory walker.
//!
//! Usage:
//!   dirwave [PATHS]...                 Stream every entry below the paths
//!   dirwave --max-depth 0 Felidae      Only the roots' own entries
//!   dirwave --list --kind file .       Sorted file list once the walk is done
//!   dirwave --format json .            One JSON object per event
//!   dirwave --help                     Show help

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use serde_json::json;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use dirwave_core::{EntryKind, WalkConfig, WalkError, WalkEvent, WalkSummary};
use dirwave_scan::TreeWalker;

const DEFAULT_LOG_FILTER: &str = "dirwave=warn,dirwave_scan=warn";
const VERBOSE_LOG_FILTER: &str = "dirwave=debug,dirwave_scan=debug";

#[derive(Parser)]
#[command(
    name = "dirwave",
    version,
    about = "Walk directory trees level by level",
    long_about = "dirwave lists directories breadth-first, inspecting entries concurrently.\n\n\
                  Entries are printed as they are discovered; failures are reported on \
                  stderr and never stop the walk."
)]
struct Cli {
    /// Paths to walk (defaults to current directory)
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Deepest level to read; roots are level 0 (negative means default)
    #[arg(short = 'd', long, allow_negative_numbers = true)]
    max_depth: Option<i64>,

    /// Maximum number of filesystem operations in flight
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// TOML file with walk settings; flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only report these entry kinds (file, dir, block, character, fifo, socket)
    #[arg(short, long = "kind")]
    kinds: Vec<EntryKind>,

    /// Also report each directory once it has been listed
    #[arg(long)]
    directories: bool,

    /// Print a sorted list after the walk instead of streaming
    #[arg(short, long)]
    list: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    tracing::debug!(?config, roots = cli.paths.len(), "Starting walk");

    let walker = TreeWalker::with_config(config);
    let events = walker.start(cli.paths.clone());

    // stderr stays unlocked: walker tasks log to it while the walk runs.
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut diag = io::stderr();

    let summary = if cli.list {
        run_list(events, &cli, &mut out, &mut diag).await?
    } else {
        run_stream(events, &cli, &mut out, &mut diag).await?
    };

    Ok(ExitCode::from(exit_status(&summary)))
}

/// Exit status for a finished walk: 1 if any error was reported.
fn exit_status(summary: &WalkSummary) -> u8 {
    if summary.is_clean() { 0 } else { 1 }
}

/// Install the stderr subscriber, honouring `RUST_LOG` unless `-v` is given.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Merge the config file (if any) with command-line overrides.
fn load_config(cli: &Cli) -> Result<WalkConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&text)
                .wrap_err_with(|| format!("Failed to parse config {}", path.display()))?
        }
        None => WalkConfig::default(),
    };

    if cli.max_depth.is_some() {
        config.max_depth = WalkConfig::resolve_max_depth(cli.max_depth);
    }
    if let Some(concurrency) = cli.concurrency {
        config.max_concurrency = concurrency;
    }

    config.validated().wrap_err("Invalid configuration")
}

/// Print events as they arrive.
async fn run_stream(
    mut events: mpsc::Receiver<WalkEvent>,
    cli: &Cli,
    out: &mut impl Write,
    diag: &mut impl Write,
) -> Result<WalkSummary> {
    let mut summary = WalkSummary::default();

    while let Some(event) = events.recv().await {
        match event {
            WalkEvent::Directory(path) => {
                if cli.directories {
                    write_record(out, cli.format, "directory", &path)?;
                }
            }
            WalkEvent::Entry { path, kind } => {
                if wants_kind(cli, kind) {
                    write_record(out, cli.format, kind.as_str(), &path)?;
                }
            }
            WalkEvent::Error(err) => report_error(out, diag, cli.format, &err)?,
            WalkEvent::Done(done) => {
                summary = done;
            }
        }
    }

    report_summary(out, diag, cli.format, &summary)?;
    out.flush()?;
    Ok(summary)
}

/// Collect matching paths and print them sorted once the walk has finished.
async fn run_list(
    mut events: mpsc::Receiver<WalkEvent>,
    cli: &Cli,
    out: &mut impl Write,
    diag: &mut impl Write,
) -> Result<WalkSummary> {
    let mut collected: BTreeSet<(PathBuf, &'static str)> = BTreeSet::new();
    let mut errors: Vec<WalkError> = Vec::new();
    let mut summary = WalkSummary::default();

    while let Some(event) = events.recv().await {
        match event {
            WalkEvent::Directory(path) if cli.directories => {
                collected.insert((path, "directory"));
            }
            WalkEvent::Entry { path, kind } if wants_kind(cli, kind) => {
                collected.insert((path, kind.as_str()));
            }
            WalkEvent::Error(err) => errors.push(err),
            WalkEvent::Done(done) => summary = done,
            _ => {}
        }
    }

    for (path, label) in &collected {
        write_record(out, cli.format, label, path)?;
    }
    for err in &errors {
        report_error(out, diag, cli.format, err)?;
    }
    report_summary(out, diag, cli.format, &summary)?;
    out.flush()?;
    Ok(summary)
}

fn wants_kind(cli: &Cli, kind: EntryKind) -> bool {
    cli.kinds.is_empty() || cli.kinds.contains(&kind)
}

fn write_record(out: &mut impl Write, format: OutputFormat, label: &str, path: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{label}\t{}", path.display())?,
        OutputFormat::Json => {
            let record = json!({ "event": label, "path": path.to_string_lossy() });
            writeln!(out, "{record}")?;
        }
    }
    Ok(())
}

/// Errors go to `diag` in text mode and into the JSON stream otherwise.
fn report_error(
    out: &mut impl Write,
    diag: &mut impl Write,
    format: OutputFormat,
    err: &WalkError,
) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(diag, "error: {err}")?,
        OutputFormat::Json => {
            let record = json!({
                "event": "error",
                "stage": err.stage().to_string(),
                "path": err.path().to_string_lossy(),
                "message": err.to_string(),
            });
            writeln!(out, "{record}")?;
        }
    }
    Ok(())
}

fn report_summary(
    out: &mut impl Write,
    diag: &mut impl Write,
    format: OutputFormat,
    summary: &WalkSummary,
) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(
            diag,
            "{} directories, {} entries, {} error(s) in {:.2}s",
            summary.dirs_read,
            summary.entries_inspected,
            summary.errors,
            summary.elapsed.as_secs_f64()
        )?,
        OutputFormat::Json => {
            let record = json!({
                "event": "done",
                "summary": serde_json::to_value(summary)?,
            });
            writeln!(out, "{record}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dirwave"]).unwrap();
        assert_eq!(cli.paths, vec![PathBuf::from(".")]);

        let config = load_config(&cli).unwrap();
        assert_eq!(config, WalkConfig::default());
    }

    #[test]
    fn test_negative_depth_falls_back_to_default() {
        let cli = Cli::try_parse_from(["dirwave", "--max-depth", "-3", "Felidae"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.max_depth, dirwave_core::DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dirwave.toml");
        fs::write(&path, "max_depth = 2\nmax_concurrency = 4\n").unwrap();

        let cli = Cli::try_parse_from([
            "dirwave",
            "--config",
            path.to_str().unwrap(),
            "--max-depth",
            "0",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();

        assert_eq!(config.max_depth, 0);
        assert_eq!(config.max_concurrency, 4);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let cli = Cli::try_parse_from(["dirwave", "-j", "0"]).unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn test_kind_filter() {
        let cli = Cli::try_parse_from(["dirwave", "--kind", "file", "--kind", "socket"]).unwrap();
        assert!(wants_kind(&cli, EntryKind::File));
        assert!(wants_kind(&cli, EntryKind::Socket));
        assert!(!wants_kind(&cli, EntryKind::Dir));

        assert!(Cli::try_parse_from(["dirwave", "--kind", "symlink"]).is_err());
    }

    #[test]
    fn test_json_record() {
        let mut out = Vec::new();
        write_record(&mut out, OutputFormat::Json, "file", Path::new("Felidae/Felid.md")).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["event"], "file");
        assert_eq!(value["path"], "Felidae/Felid.md");
    }

    #[test]
    fn test_text_record() {
        let mut out = Vec::new();
        write_record(&mut out, OutputFormat::Text, "dir", Path::new("Felidae/Lynx")).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "dir\tFelidae/Lynx\n");
    }

    #[test]
    fn test_negative_depth_in_config_file_falls_back_to_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dirwave.toml");
        fs::write(&path, "max_depth = -1\n").unwrap();

        let cli = Cli::try_parse_from(["dirwave", "--config", path.to_str().unwrap()]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.max_depth, dirwave_core::DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_exit_status() {
        let mut summary = WalkSummary::default();
        assert_eq!(exit_status(&summary), 0);

        summary.errors = 1;
        assert_eq!(exit_status(&summary), 1);
    }

    /// Felidae with a family note and one note per genus.
    fn create_felidae() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("Lynx")).unwrap();
        fs::create_dir(root.join("Puma")).unwrap();
        fs::write(root.join("Felid.md"), "").unwrap();
        fs::write(root.join("Lynx/lynx.md"), "").unwrap();
        fs::write(root.join("Puma/concolor.md"), "").unwrap();

        temp
    }

    fn cli_for(flags: &[&str], roots: &[&Path]) -> Cli {
        let mut argv = vec!["dirwave".to_string()];
        argv.extend(flags.iter().map(|flag| flag.to_string()));
        argv.extend(roots.iter().map(|root| root.to_string_lossy().into_owned()));
        Cli::try_parse_from(argv).unwrap()
    }

    fn start(cli: &Cli) -> mpsc::Receiver<WalkEvent> {
        TreeWalker::with_config(load_config(cli).unwrap()).start(cli.paths.clone())
    }

    fn json_lines(out: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_list_sorts_filters_and_reports_missing_root() {
        let temp = create_felidae();
        let root = temp.path();
        let missing = root.join("Pantherinae");
        let cli = cli_for(&["--list", "--kind", "file"], &[root, missing.as_path()]);

        let (mut out, mut diag) = (Vec::new(), Vec::new());
        let summary = run_list(start(&cli), &cli, &mut out, &mut diag).await.unwrap();

        let expected = format!(
            "file\t{}\nfile\t{}\nfile\t{}\n",
            root.join("Felid.md").display(),
            root.join("Lynx").join("lynx.md").display(),
            root.join("Puma").join("concolor.md").display(),
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);

        let diag = String::from_utf8(diag).unwrap();
        assert!(diag.contains(&format!("error: Failed to read directory {}", missing.display())));
        assert!(diag.contains("3 directories, 5 entries, 1 error(s)"));

        assert_eq!(summary.errors, 1);
        assert!(!summary.is_clean());
        assert_eq!(exit_status(&summary), 1);
    }

    #[tokio::test]
    async fn test_list_deduplicates_records() {
        let cli = cli_for(&["--list", "--directories"], &[]);
        let (tx, rx) = mpsc::channel(8);
        for event in [
            WalkEvent::Entry {
                path: "Felidae/Puma".into(),
                kind: EntryKind::Dir,
            },
            WalkEvent::Directory("Felidae".into()),
            WalkEvent::Entry {
                path: "Felidae/Felid.md".into(),
                kind: EntryKind::File,
            },
            WalkEvent::Entry {
                path: "Felidae/Felid.md".into(),
                kind: EntryKind::File,
            },
            WalkEvent::Done(WalkSummary::default()),
        ] {
            tx.send(event).await.unwrap();
        }
        drop(tx);

        let (mut out, mut diag) = (Vec::new(), Vec::new());
        let summary = run_list(rx, &cli, &mut out, &mut diag).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "directory\tFelidae\nfile\tFelidae/Felid.md\ndir\tFelidae/Puma\n"
        );
        assert_eq!(exit_status(&summary), 0);
    }

    #[tokio::test]
    async fn test_json_stream_carries_errors_and_done() {
        let temp = create_felidae();
        let root = temp.path();
        let missing = root.join("Pantherinae");
        let cli = cli_for(
            &["--format", "json", "--kind", "dir", "--directories"],
            &[root, missing.as_path()],
        );

        let (mut out, mut diag) = (Vec::new(), Vec::new());
        let summary = run_stream(start(&cli), &cli, &mut out, &mut diag).await.unwrap();
        let records = json_lines(&out);

        let count = |event: &str| records.iter().filter(|r| r["event"] == event).count();
        assert_eq!(count("directory"), 3);
        assert_eq!(count("dir"), 2);
        assert_eq!(count("file"), 0);
        assert_eq!(count("error"), 1);

        let error = records.iter().find(|r| r["event"] == "error").unwrap();
        assert_eq!(error["stage"], "read_dir");
        assert_eq!(error["path"], &*missing.to_string_lossy());

        let done = records.last().unwrap();
        assert_eq!(done["event"], "done");
        assert_eq!(done["summary"]["errors"], 1);

        assert!(diag.is_empty());
        assert!(!summary.is_clean());
    }

    #[tokio::test]
    async fn test_text_stream_omits_directories_by_default() {
        let temp = create_felidae();
        let root = temp.path();
        let cli = cli_for(&[], &[root]);

        let (mut out, mut diag) = (Vec::new(), Vec::new());
        let summary = run_stream(start(&cli), &cli, &mut out, &mut diag).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("directory\t"));
        assert!(out.contains(&format!("dir\t{}\n", root.join("Lynx").display())));
        assert_eq!(out.lines().filter(|l| l.starts_with("file\t")).count(), 3);

        let diag = String::from_utf8(diag).unwrap();
        assert!(diag.contains("0 error(s)"));
        assert_eq!(exit_status(&summary), 0);
    }
}

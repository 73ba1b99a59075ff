use std::path::{Path, PathBuf};

use anyhow::Context;
use callstats_core::{CallRecord, SummaryConfig, summarize};
use callstats_store::{ArtifactWriter, latest_snapshot, load_config, read_cdr, write_config};
use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod display;
mod report;

use report::RunReport;

#[derive(Parser, Debug)]
#[command(name = "callstats", version, about = "Staff call-volume rollups from CDR exports")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise a CDR snapshot and write the four CSV artifacts
    Run {
        #[command(flatten)]
        source: SourceArgs,

        /// Directory the summary artifacts are written to
        #[arg(short, long, env = "CALLSTATS_OUT")]
        out: PathBuf,

        /// Print the run report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Summarise a CDR snapshot and print the tables without writing anything
    Show {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Write a sample configuration file
    InitConfig {
        /// Destination path (must not exist)
        #[arg(default_value = "callstats.toml")]
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// TOML configuration: roster, extension map, thresholds
    #[arg(short, long, env = "CALLSTATS_CONFIG")]
    config: PathBuf,

    /// CDR export to summarise
    #[arg(short, long, required_unless_present = "inbox", conflicts_with = "inbox")]
    input: Option<PathBuf>,

    /// Directory of dated exports (DD-MM-YYYY.csv); the newest is used
    #[arg(long)]
    inbox: Option<PathBuf>,

    /// Generation instant (YYYY-MM-DDTHH:MM) instead of the local clock
    #[arg(long, value_parser = parse_as_of)]
    as_of: Option<NaiveDateTime>,
}

/// Everything a run needs, loaded before any summarising starts.
struct Loaded {
    config: SummaryConfig,
    source: PathBuf,
    records: Vec<CallRecord>,
    generated_at: NaiveDateTime,
}

impl SourceArgs {
    fn load(&self) -> anyhow::Result<Loaded> {
        let config = load_config(&self.config).context("loading configuration")?;
        let source = match (&self.input, &self.inbox) {
            (Some(path), _) => path.clone(),
            (None, Some(dir)) => latest_snapshot(dir).context("locating CDR snapshot")?,
            (None, None) => anyhow::bail!("either --input or --inbox is required"),
        };
        let records = read_cdr(&source).context("reading CDR snapshot")?;
        let generated_at = self
            .as_of
            .unwrap_or_else(|| Local::now().naive_local());
        Ok(Loaded {
            config,
            source,
            records,
            generated_at,
        })
    }
}

fn parse_as_of(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM: {e}"))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(source: &SourceArgs, out: &Path, json: bool) -> anyhow::Result<()> {
    let loaded = source.load()?;
    let summaries = summarize(&loaded.records, &loaded.config, loaded.generated_at)
        .context("summarising calls")?;
    let artifacts = ArtifactWriter::new(out)
        .write_all(&summaries)
        .context("writing summary artifacts")?;

    let report = RunReport::new(loaded.source, &summaries, artifacts);
    report.log();
    if json {
        println!("{}", report.to_json()?);
    }
    Ok(())
}

fn show(source: &SourceArgs) -> anyhow::Result<()> {
    let loaded = source.load()?;
    let summaries = summarize(&loaded.records, &loaded.config, loaded.generated_at)
        .context("summarising calls")?;
    display::print_summaries(&summaries);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("callstats v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Command::Run { source, out, json } => run(source, out, *json),
        Command::Show { source } => show(source),
        Command::InitConfig { path } => {
            write_config(path, &SummaryConfig::sample()).context("writing sample configuration")?;
            println!("wrote {}", path.display());
            Ok(())
        }
    }
}

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use html_tables_to_csv::{
    DirectorySink, Document, ExtractError, ExtractOptions, ExtractionReport, HeadingLevels,
    HttpFetcher, extract_document, extract_url, parse_url,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "html2csv",
    version,
    about = "Extract every HTML table of a web page into CSV files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract tables and write one CSV file per table.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Page URL. Also names the output files.
    #[arg(short, long)]
    url: String,

    /// Directory receiving the CSV files.
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Read HTML from this file instead of fetching the URL.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Heading levels that name tables, like h2,h3.
    #[arg(long, default_value = "h2,h3")]
    headings: String,

    /// Output delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Fetch timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(args: &ExtractArgs) -> Result<ExtractOptions> {
    let heading_levels = HeadingLevels::from_str(&args.headings)
        .map_err(|error| anyhow!("invalid heading levels: {error}"))
        .context("failed to parse --headings")?;

    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    Ok(ExtractOptions {
        heading_levels,
        delimiter: args.delimiter as u8,
        ..ExtractOptions::default()
    })
}

fn log_report(report: &ExtractionReport, verbose: bool) {
    for result in &report.results {
        println!("{}\t{}", result.name, result.location);
    }

    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {} table={:?} row={:?}: {}",
                warning.code.as_str(),
                warning.table,
                warning.row,
                warning.message
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ExtractionReport> {
    let options = parse_options(args)?;
    let mut sink = DirectorySink::create(&args.output_dir).with_context(|| {
        format!(
            "failed to create output directory '{}'",
            args.output_dir.display()
        )
    })?;

    let report = if let Some(input) = &args.input {
        let url = parse_url(&args.url)?;
        let bytes = std::fs::read(input)
            .with_context(|| format!("failed to read '{}'", input.display()))?;
        let document = Document::from_bytes(url, &bytes, None);
        extract_document(&document, &options, &mut sink)
    } else {
        let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout))?;
        extract_url(&args.url, &fetcher, &options, &mut sink)
    };

    report.with_context(|| format!("failed to extract tables from '{}'", args.url))
}

fn is_no_tables(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<ExtractError>(),
        Some(ExtractError::NoTablesFound { .. })
    )
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("html_tables_to_csv=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(report) => {
                log_report(&report, args.verbose);
                if report.results.is_empty() {
                    ExitCode::from(2)
                } else {
                    ExitCode::SUCCESS
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                if is_no_tables(&error) {
                    ExitCode::from(2)
                } else {
                    ExitCode::from(1)
                }
            }
        },
    }
}

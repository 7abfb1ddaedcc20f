//! FILENAME: app/src/main.rs
// PURPOSE: Command-line entry point with unified logging.
// FORMAT: seq|level|category|message

use anyhow::{anyhow, Context, Result};
use app_lib::logging::init_logging;
use app_lib::{
    generate_with, log_error, GenerateRequest, OutputFormat, PersistenceError, ReportError,
    ReportRequest, SessionSettings, DEFAULT_SETTINGS_FILE,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Builds a sales summary report (xlsx, csv or pdf) from a sales export.
/// Options left out are taken from the previous run's session file.
#[derive(Parser, Debug)]
#[command(name = "sales-report", version, about)]
struct Cli {
    /// Sales export to read (.csv, .xlsx or .xls)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Folder that receives sales_summary_report.<ext>
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: xlsx, csv or pdf
    #[arg(short, long)]
    format: Option<String>,

    /// Report to include, repeatable, e.g. --report "Top Products"
    #[arg(short, long = "report")]
    reports: Vec<String>,

    /// Also write cleaned_sales_data.csv next to the report
    #[arg(long)]
    export_cleaned: bool,

    /// Session file remembering the last run
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Also write log lines to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log debug detail
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_file.as_deref(), cli.verbose) {
        eprintln!("[LOG_INIT] {}", e);
    }

    let request = match build_request(&cli) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(usage_exit_code(&e));
        }
    };

    match generate_with(&request) {
        Ok(path) => {
            if let Err(e) = SessionSettings::from_request(&request).save(&cli.settings) {
                log_error!("SESSION", "failed to save {}: {}", cli.settings.display(), e);
            }
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error!("GENERATE", "{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Merges command-line options over the remembered session.
fn build_request(cli: &Cli) -> Result<GenerateRequest> {
    let session = SessionSettings::load(&cli.settings);

    let input_path = cli
        .input
        .clone()
        .or_else(|| session.input_path())
        .ok_or_else(|| anyhow!("no input file given (use --input)"))?;

    let output_folder = cli
        .output
        .clone()
        .or_else(|| session.output_folder())
        .ok_or_else(|| anyhow!("no output folder given (use --output)"))?;

    let format = match &cli.format {
        Some(name) => name
            .parse::<OutputFormat>()
            .with_context(|| format!("invalid --format '{}'", name))?,
        None => session.format().unwrap_or(OutputFormat::Workbook),
    };

    let reports = if cli.reports.is_empty() {
        session.reports()
    } else {
        ReportRequest::parse(&cli.reports).context("invalid --report")?
    };
    if reports.is_empty() {
        return Err(anyhow!("no reports selected (use --report)"));
    }

    Ok(GenerateRequest {
        input_path,
        output_folder,
        reports,
        format,
        export_cleaned_data: cli.export_cleaned,
    })
}

/// Unknown format or report names are engine errors (1); anything missing is
/// a usage error (2).
fn usage_exit_code(error: &anyhow::Error) -> u8 {
    if error.downcast_ref::<PersistenceError>().is_some()
        || error.downcast_ref::<ReportError>().is_some()
    {
        1
    } else {
        2
    }
}

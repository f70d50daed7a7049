use chrono::Utc;
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use salinity_service::config::{ScreeningConfig, load_config};
use salinity_service::export::{
    DEFAULT_RESULTS_FILE, RunReport, render_table, write_report_json, write_results_csv,
};
use salinity_service::logging::{self, LogLevel, Stage};
use salinity_service::{SalinityError, assess_file};

#[derive(Parser, Debug)]
#[command(
    name = "salinity_service",
    about = "Screen groundwater samples for salinisation and recommend a management response"
)]
struct Args {
    /// Hydrochemical CSV with at least Na, Ca, Mg, Cl, HCO3 and EC columns
    input: PathBuf,

    /// Screening config (TOML). Falls back to SALINITY_CONFIG, then defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enriched results CSV
    #[arg(long, default_value = DEFAULT_RESULTS_FILE)]
    output: PathBuf,

    /// Also write a JSON run report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Append log lines to this file
    #[arg(long)]
    log_file: Option<String>,

    /// Minimum log level: debug, info, warn, error
    #[arg(long, default_value = "info")]
    log_level: LogLevel,

    /// Timestamped console log lines
    #[arg(long)]
    timestamps: bool,
}

fn resolve_config(args: &Args) -> Result<ScreeningConfig, SalinityError> {
    let path = args
        .config
        .clone()
        .or_else(|| env::var("SALINITY_CONFIG").ok().map(PathBuf::from));
    match path {
        Some(path) => {
            logging::info(
                Stage::System,
                None,
                &format!("Loading screening config from {}", path.display()),
            );
            load_config(&path)
        }
        None => Ok(ScreeningConfig::default()),
    }
}

fn run(args: &Args) -> Result<(), SalinityError> {
    let config = resolve_config(args)?;
    let assessment = assess_file(&args.input, &config)?;

    print!("{}", render_table(&assessment));

    write_results_csv(&assessment, &args.output)?;
    if let Some(report_path) = &args.report {
        let input = args.input.display().to_string();
        let report = RunReport::new(&assessment, &input, Utc::now());
        write_report_json(&report, report_path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let log_file = args
        .log_file
        .clone()
        .or_else(|| env::var("SALINITY_LOG_FILE").ok());
    logging::init_logger(args.log_level, log_file.as_deref(), args.timestamps);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logging::error(Stage::System, None, &e.to_string());
            ExitCode::FAILURE
        }
    }
}

//! CLI entry point for the bike-share explorer.
//!
//! `stats` runs a single query from command-line flags; `interactive` prompts
//! for city, months and days, shows the statistics, offers the raw rows, and
//! repeats until the user stops.

mod shell;

use anyhow::Result;
use bikeshare_explorer::{
    aggregator::{Report, users::current_year},
    config::{City, DataConfig},
    filter::{self, FilterSpec},
    loader::load_city,
    output::{print_pretty, render_json, render_text, write_rows},
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare")]
#[command(about = "Explore US bike-share trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute trip statistics for one city and filter
    Stats {
        /// City to analyze: chicago, new york city, washington (or chi, nyc, was)
        #[arg(short, long)]
        city: String,

        /// Comma-separated months from january to june, or "all"
        #[arg(short, long, default_value = "all")]
        month: String,

        /// Comma-separated days of the week, or "all"
        #[arg(short, long, default_value = "all")]
        day: String,

        /// Print the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also print this many raw rows of the filtered data as CSV
        #[arg(long, default_value_t = 0)]
        raw_rows: usize,
    },
    /// Prompt for selections and browse the results
    Interactive,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;
    let cli = Cli::parse();
    let config = DataConfig::from_env()?;

    match cli.command {
        Commands::Stats {
            city,
            month,
            day,
            json,
            raw_rows,
        } => {
            run_stats(&config, &city, &month, &day, json, raw_rows)?;
        }
        Commands::Interactive => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            shell::Shell::new(&config, stdin.lock(), stdout.lock()).run()?;
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    // stderr shares the terminal with the prompts, so keep it quiet by default
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

/// Runs load → filter → aggregate once and prints the result.
#[tracing::instrument(skip(config, json, raw_rows))]
fn run_stats(
    config: &DataConfig,
    city: &str,
    month: &str,
    day: &str,
    json: bool,
    raw_rows: usize,
) -> Result<()> {
    let city = City::resolve(city)?;
    let spec = FilterSpec::parse(month, day)?;

    let store = load_city(config, city)?;
    let view = filter::apply(&store, &spec);
    let report = Report::build(&view, current_year());
    print_pretty(&report);

    if json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", render_text(&report));
    }

    if raw_rows > 0 {
        write_rows(&view, 0, raw_rows, std::io::stdout().lock())?;
    }

    Ok(())
}

//! CLI entry point for the TARDIS punctuality dashboard.
//!
//! Each subcommand renders one page of the dashboard from the cleaned SNCF
//! dataset and, for the simulator, the pre-trained delay model.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tardis::advice::ADVICE;
use tardis::analyzers::ranking::DEFAULT_TOP_N;
use tardis::config::Config;
use tardis::context::{AppContext, ArtifactCache};
use tardis::error::TardisError;
use tardis::model::PredictionRequest;
use tardis::output::{
    OutputFormat, emit, render_advice, render_delay_rankings, render_prediction, render_reasons,
    render_reliability, render_statistics, render_station_options,
};
use tardis::views;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "tardis")]
#[command(about = "Punctuality dashboard for SNCF rail data", long_about = None)]
struct Cli {
    /// Semicolon-separated dataset (overrides TARDIS_DATASET)
    #[arg(long, global = true, value_name = "CSV")]
    dataset: Option<PathBuf>,

    /// Model artifact (overrides TARDIS_MODEL)
    #[arg(long, global = true, value_name = "JSON")]
    model: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delay statistics for a departure/arrival selection
    Stats {
        /// Departure station, or "all"
        #[arg(short, long)]
        departure: Option<String>,

        /// Arrival station, or "all"
        #[arg(short, long)]
        arrival: Option<String>,
    },
    /// Station and year values available for filtering
    Stations {
        /// Restrict arrivals to those served from this departure
        #[arg(short, long)]
        departure: Option<String>,

        /// Restrict departures to those serving this arrival
        #[arg(short, long)]
        arrival: Option<String>,
    },
    /// Stations with the largest average delays
    Delays {
        /// Only consider this year
        #[arg(short, long)]
        year: Option<i32>,

        /// Number of stations per ranking
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },
    /// Most reliable stations by 1-5 score
    Reliable {
        /// Only consider this year
        #[arg(short, long)]
        year: Option<i32>,

        /// Number of stations per ranking
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },
    /// Estimate the arrival delay of a trip
    Predict {
        #[arg(short, long)]
        departure: String,

        #[arg(short, long)]
        arrival: String,

        /// Month of travel (1-12)
        #[arg(short, long)]
        month: u32,

        /// Delay at departure, in minutes
        #[arg(long, default_value_t = 5.0)]
        delay: f64,
    },
    /// Individual delay reasons grouped by date
    Reasons,
    /// Travel advice to avoid delays
    Advice,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.dataset.clone(), cli.model.clone());

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = config
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = config
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("tardis.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cache = ArtifactCache::new();

    match cli.command {
        Commands::Stats { departure, arrival } => {
            let ctx = open_context(&cache, &config, false)?;
            let report = views::delay_statistics(&ctx, departure.as_deref(), arrival.as_deref());
            if let Some(report) = no_data_as_warning(report)? {
                emit(cli.format, &report, render_statistics)?;
            }
        }
        Commands::Stations { departure, arrival } => {
            let ctx = open_context(&cache, &config, false)?;
            let options = views::station_options(&ctx, departure.as_deref(), arrival.as_deref());
            emit(cli.format, &options, render_station_options)?;
        }
        Commands::Delays { year, top } => {
            let ctx = open_context(&cache, &config, false)?;
            if let Some(report) = no_data_as_warning(views::delay_rankings(&ctx, year, top))? {
                emit(cli.format, &report, render_delay_rankings)?;
            }
        }
        Commands::Reliable { year, top } => {
            let ctx = open_context(&cache, &config, false)?;
            let report = views::reliability_rankings(&ctx, year, top);
            if let Some(report) = no_data_as_warning(report)? {
                emit(cli.format, &report, render_reliability)?;
            }
        }
        Commands::Predict {
            departure,
            arrival,
            month,
            delay,
        } => {
            let request = PredictionRequest::new(&departure, &arrival, month, delay)?;
            let ctx = open_context(&cache, &config, true)?;
            match views::simulate(&ctx, &request) {
                Ok(prediction) => emit(cli.format, &prediction, render_prediction)?,
                Err(e @ TardisError::Prediction(_)) => {
                    error!(error = %e, "Prediction failed");
                    warn!("Check that the stations, month and departure delay are filled in");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Reasons => {
            let ctx = open_context(&cache, &config, false)?;
            let grouped = views::delay_reasons(&ctx);
            if grouped.is_empty() {
                warn!("No delay comments in the dataset");
            }
            emit(cli.format, &grouped, |g| render_reasons(g))?;
        }
        Commands::Advice => {
            emit(cli.format, &ADVICE, |s| render_advice(s))?;
        }
    }

    Ok(())
}

/// Loads the artifacts a page needs. Load failures are fatal for the page.
fn open_context(cache: &ArtifactCache, config: &Config, with_model: bool) -> Result<AppContext> {
    match AppContext::open(cache, config, with_model) {
        Ok(ctx) => {
            info!(rows = ctx.table().len(), with_model, "Dashboard ready");
            Ok(ctx)
        }
        Err(e) => {
            error!(error = %e, "Startup load failed");
            Err(e.into())
        }
    }
}

/// Downgrades an empty selection to a warning; other errors propagate.
fn no_data_as_warning<T>(result: tardis::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_empty_result() => {
            warn!(reason = %e, "No data available for this selection");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

//! CLI entry point for the learning-analytics report generator.
//!
//! Provides subcommands for generating the six report charts, checking the
//! input data for missing values, and serving the dashboard.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use classroom_insights::config::{ModelConfig, ReportConfig};
use classroom_insights::dashboard::{self, DashboardConfig};
use classroom_insights::output::print_json;
use classroom_insights::{pipeline, quality};
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "classroom_insights")]
#[command(about = "Learning analytics charts from class submission logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GenerateArgs {
    /// Directory holding Data_*.csv and SubmitRecord-Class*.csv
    #[arg(short, long, env = "DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Directory the HTML charts are written to
    #[arg(short, long, env = "RESULTS_DIR", default_value = "results")]
    results_dir: PathBuf,

    /// Optional JSON file overriding model settings
    #[arg(short, long)]
    model_config: Option<PathBuf>,
}

#[derive(Args)]
struct ServeArgs {
    /// Address the dashboard listens on
    #[arg(short, long, env = "DASHBOARD_ADDR", default_value = "127.0.0.1:8050")]
    addr: SocketAddr,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the data and write all six charts
    Generate(GenerateArgs),
    /// Report missing values per column in every input file
    Check {
        #[arg(short, long, env = "DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
    },
    /// Serve previously generated charts
    Serve {
        #[arg(short, long, env = "RESULTS_DIR", default_value = "results")]
        results_dir: PathBuf,

        #[command(flatten)]
        serve: ServeArgs,
    },
    /// Generate the charts, then serve them
    Run {
        #[command(flatten)]
        generate: GenerateArgs,

        #[command(flatten)]
        serve: ServeArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/classroom_insights.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("classroom_insights.log"));

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

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => {
            generate(&args)?;
        }
        Commands::Check { data_dir } => {
            let report = quality::missing_value_report(&data_dir)?;
            let with_gaps = report.files.iter().filter(|f| f.total_missing() > 0).count();
            if with_gaps > 0 {
                warn!(files = with_gaps, "Input files contain missing values");
            } else {
                info!(files = report.files.len(), "No missing values found");
            }
        }
        Commands::Serve { results_dir, serve } => {
            dashboard::serve(DashboardConfig {
                addr: serve.addr,
                results_dir,
            })
            .await?;
        }
        Commands::Run { generate: args, serve } => {
            generate(&args)?;
            dashboard::serve(DashboardConfig {
                addr: serve.addr,
                results_dir: args.results_dir,
            })
            .await?;
        }
    }

    Ok(())
}

/// Builds the report configuration from CLI arguments and runs the pipeline.
#[tracing::instrument(skip_all, fields(data_dir = %args.data_dir.display()))]
fn generate(args: &GenerateArgs) -> Result<()> {
    let model = match &args.model_config {
        Some(path) => ModelConfig::load(path)?,
        None => ModelConfig::default(),
    };
    let config = ReportConfig::new(&args.data_dir, &args.results_dir).with_model(model);

    let summary = pipeline::generate_all(&config)?;
    print_json(&summary)?;
    Ok(())
}

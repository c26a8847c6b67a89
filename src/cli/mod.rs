//! Flight price CLI
//!
//! `train` fits and persists the artifacts, `serve` starts the HTTP server.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use crate::training::{InvalidRowPolicy, TrainingConfig, TrainingPipeline, TrainingReport};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn kv(key: &str, val: &str) {
    println!("  {:<16} {}", muted(key), val.white());
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "flight-price")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Flight ticket price predictor")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fit the preprocessor and model on historical flights
    Train {
        /// Historical flights CSV
        #[arg(short, long)]
        data: PathBuf,

        /// Directory the artifacts are written to
        #[arg(short, long, default_value = "models")]
        models_dir: PathBuf,

        /// Fraction of rows held out for testing
        #[arg(long, default_value = "0.2")]
        test_size: f64,

        /// Seed of the train/test shuffle
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Leave out rows whose features cannot be extracted instead of aborting
        #[arg(long)]
        skip_invalid_rows: bool,
    },

    /// Start the prediction server
    Serve {
        /// Server host (default: API_HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Server port (default: API_PORT or 5000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Artifacts directory (default: MODELS_DIR or ./models)
        #[arg(short, long)]
        models_dir: Option<String>,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(
    data_path: PathBuf,
    models_dir: PathBuf,
    test_size: f64,
    seed: u64,
    skip_invalid_rows: bool,
) -> anyhow::Result<TrainingReport> {
    section("Train");

    let policy = if skip_invalid_rows {
        InvalidRowPolicy::Skip
    } else {
        InvalidRowPolicy::Abort
    };
    let config = TrainingConfig::new(data_path, models_dir)
        .with_test_size(test_size)
        .with_seed(seed)
        .with_invalid_row_policy(policy);

    step_run(&format!("Training on {}", config.data_path.display().to_string().cyan()));
    let now = chrono::Local::now().naive_local();
    let report = TrainingPipeline::new(config).run(now)?;
    step_done(&format!("{:.3}s", report.training_time_secs));

    if let Some(paths) = &report.artifacts {
        step_ok(&format!("Preprocessor saved to {}", paths.preprocessor.display()));
        step_ok(&format!("Model saved to {}", paths.model.display()));
    }

    println!();
    kv("Rows", &format!("{} read, {} skipped", report.rows_read, report.rows_skipped));
    kv("Split", &format!("{} train / {} test", report.train_rows, report.test_rows));
    kv("Features", &report.feature_names.len().to_string());
    kv("Train R²", &format!("{:.4}", report.train_r2));
    if let Some(test_r2) = report.test_r2 {
        kv("Test R²", &format!("{:.4}", test_r2));
    }
    println!();
    println!("  {}", "Model training complete!".white().bold());
    println!();

    Ok(report)
}

pub async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    models_dir: Option<String>,
) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    let defaults = ServerConfig::default();
    let config = ServerConfig::new(
        host.unwrap_or(defaults.host),
        port.unwrap_or(defaults.port),
        models_dir.unwrap_or(defaults.models_dir),
    );

    section("Flight Price Server");
    kv("Predict", &format!("POST http://{}:{}/predict_price", config.host, config.port));
    kv("Health", &format!("GET  http://{}:{}/health", config.host, config.port));
    kv("Models", &config.models_dir);
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    run_server(config).await
}

//! Flight price predictor entry point

use clap::Parser;
use flight_price::cli::{cmd_serve, cmd_train, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flight_price=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train { data, models_dir, test_size, seed, skip_invalid_rows } => {
            cmd_train(data, models_dir, test_size, seed, skip_invalid_rows)?;
        }
        Commands::Serve { host, port, models_dir } => {
            cmd_serve(host, port, models_dir).await?;
        }
    }

    Ok(())
}

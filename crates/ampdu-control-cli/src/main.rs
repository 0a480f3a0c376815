//! A-MPDU aggregation controller CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ampdu_control_cli::{replay, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay(args) => replay::execute_replay(args)?,
        Commands::Validate(args) => replay::execute_validate(args)?,
        Commands::Nearest(args) => replay::execute_nearest(args)?,
        Commands::Version => {
            println!("ampdu-control {}", env!("CARGO_PKG_VERSION"));
            println!("controller library version: {}", ampdu_control::VERSION);
        }
    }

    Ok(())
}

use std::path::PathBuf;

use clap::Parser;
use herald::{Config, Herald};

/// Multi-brand outbound email dispatcher.
#[derive(Debug, Parser)]
#[command(name = "herald", version, about)]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "./herald.config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    herald_common::logging::init();

    let args = Args::parse();
    let config = Config::from_path(&args.config)?;

    Herald::new(config).run().await
}

use clap::Parser;
use std::process::ExitCode;
use wifiprint::cli::Cli;
use wifiprint::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    // Initialize logging
    init_logging(&config.logging.level)?;

    wifiprint::app::run(&cli, &config).await
}

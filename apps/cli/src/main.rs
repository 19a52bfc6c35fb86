use clap::Parser;
use color_eyre::Result;
use heatmap_cli::cli::CliArgs;
use heatmap_cli::config::init_app_config;
use heatmap_cli::logging::init_logging;
use heatmap_cli::run::{run, Mode};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = init_app_config()?;
    init_logging(&config.log_filter);
    debug!(?config, "configuration loaded");

    run(&config, Mode::from_flags(args.summary, args.json)).await
}

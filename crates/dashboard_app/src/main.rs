mod app;
mod config;
mod effects;
mod input;
mod render;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = config::Cli::parse();
    let config = config::DashboardConfig::load(&cli)?;
    dashboard_logging::initialize(config.log_destination, config.log_level, &config.log_file);
    app::run(config)
}

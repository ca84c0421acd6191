mod app;
mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use ripple_engine::device::GpuInit;
use ripple_engine::logging::{init_logging, LoggingConfig};
use ripple_engine::paint::Color;
use ripple_engine::window::{Runtime, RuntimeConfig};

use crate::app::StudioApp;
use crate::cli::Cli;

const CLEAR_COLOR: &str = "#040307";

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..Default::default()
    });

    let params = cli.simulation_parameters()?;
    let clear = Color::from_hex(CLEAR_COLOR).context("invalid clear color")?;
    log::info!("starting with {} backend requested, {params:?}", cli.backend);

    let app = StudioApp::new(params, cli.backend, clear);
    Runtime::run(RuntimeConfig::default(), GpuInit::default(), app)
}

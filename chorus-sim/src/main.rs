//! A headless simulation of chorus plants growing on a substrate island.

use std::sync::atomic::{AtomicBool, Ordering};
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod sim;

use config::SimConfig;
use sim::Simulation;


pub fn main() -> ExitCode {

    // Info level by default, overridden by RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match SimConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("starting simulation with {config:?}");

    let running = Arc::new(AtomicBool::new(true));
    let handler_running = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || handler_running.store(false, Ordering::Relaxed)) {
        warn!("failed to set ctrl-c handler, the simulation cannot be interrupted: {e}");
    }

    let mut sim = match Simulation::new(&config) {
        Ok(sim) => sim,
        Err(e) => {
            error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    while running.load(Ordering::Relaxed) {
        if config.ticks != 0 && sim.world().get_time() >= config.ticks {
            break;
        }
        sim.tick_padded();
    }

    sim.stop();
    ExitCode::SUCCESS

}

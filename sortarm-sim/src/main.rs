//! # SortArm simulator
//!
//! Runs the sorting controller against a simulated arm with a virtual
//! clock. The screen is drawn to stdout, logs go to stderr.
//!
//! ```bash
//! # Built-in configuration: four blocks, start pressed at 5 s
//! sortarm-sim
//!
//! # Custom blocks, a pause at 12 s and an emergency stop at 30 s
//! sortarm-sim --objects red,yellow,none -p center@5000 \
//!     -p center@12000 -p center@13000 -p center@30000:2500
//! ```

mod cli;
mod config;
mod error;
mod terminal;

use std::process::ExitCode;

use clap::Parser;
use sortarm_core::controller::{Controller, Exit};
use sortarm_drivers::input::MAX_PRESSES;
use sortarm_drivers::sim::world::MAX_OBJECTS;
use sortarm_drivers::{SimPlatform, WorldConfig};
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use cli::Args;
use config::{parse_object, parse_press, SimConfig, DEFAULT_MAX_TIME_MS};
use error::SimError;
use terminal::TerminalDisplay;

fn main() -> ExitCode {
    let args = Args::parse();
    setup_tracing(args.verbose);

    match run(&args) {
        Ok(exit) => {
            info!("SortArm simulator finished: {:?}", exit);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<Exit, SimError> {
    info!("SortArm simulator v{} starting...", env!("CARGO_PKG_VERSION"));
    let config = SimConfig::load(args.config.as_deref())?;

    let mut platform = if args.skip_homing {
        SimPlatform::homed_with(TerminalDisplay::new(), WorldConfig::default())
    } else {
        SimPlatform::new(TerminalDisplay::new(), WorldConfig::default())
    };

    let objects = if args.objects.is_empty() {
        &config.sim.objects
    } else {
        &args.objects
    };
    for spec in objects {
        platform
            .feed(parse_object(spec)?)
            .map_err(|_| SimError::Capacity(MAX_OBJECTS, "objects"))?;
    }

    let presses = if args.presses.is_empty() {
        &config.sim.presses
    } else {
        &args.presses
    };
    for spec in presses {
        platform
            .push_press(parse_press(spec)?)
            .map_err(|_| SimError::Capacity(MAX_PRESSES, "presses"))?;
    }

    let max_time_ms = args
        .max_time
        .map(|seconds| seconds * 1000)
        .or(config.sim.max_time_ms)
        .unwrap_or(DEFAULT_MAX_TIME_MS);
    platform.set_deadline(Some(max_time_ms));
    info!(
        "{} objects queued, {} presses scripted, halting after {} ms",
        objects.len(),
        presses.len(),
        max_time_ms
    );

    let mut controller = Controller::new(platform, config.calibration, config.session)
        .with_halt(|platform| platform.deadline_reached());

    if !args.skip_homing {
        controller.initialize().map_err(SimError::Homing)?;
    }
    let exit = controller.run();

    report(&controller);
    Ok(exit)
}

/// Log the run totals and where each block ended up
fn report(controller: &Controller<SimPlatform<TerminalDisplay>>) {
    let stats = controller.engine().stats();
    info!(
        "cycles {} sorted {} returned {} empty {} lost {} aborted {}",
        stats.cycles, stats.sorted, stats.returned, stats.empty, stats.lost, stats.aborted
    );

    let platform = controller.supervisor().platform();
    for placement in platform.world().placements() {
        let color = placement
            .object
            .reading
            .color
            .map_or("unreadable", |color| color.name());
        if placement.lost {
            warn!("{} block lost at base {}", color, placement.angle);
        } else {
            info!("{} block set down at base {}", color, placement.angle);
        }
    }
    let unrecorded = platform.world().unrecorded_placements();
    if unrecorded > 0 {
        warn!("{} more blocks were set down than listed above", unrecorded);
    }
    if platform.world().waiting() > 0 {
        info!("{} blocks left at the pickup station", platform.world().waiting());
    }
    if platform.presses_pending() {
        warn!("run ended with scripted presses still pending");
    }
}

fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Arena Skirmish.

mod config;
mod simulation;

use std::{
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use anyhow::Result;
use arena_core::{ArenaBounds, Point};
use arena_rendering::{Color, Presentation, RenderingBackend, Scene};
use arena_rendering_macroquad::MacroquadBackend;
use arena_system_bootstrap::DEFAULT_OPPONENTS;
use clap::Parser;
use tracing::info;

use crate::simulation::Simulation;

const HEADLESS_DT: Duration = Duration::from_millis(16);
const BACKGROUND: Color = Color::from_rgb_u8(0x0b, 0x0d, 0x1a);

/// Real-time top-down arena shooter.
#[derive(Debug, Parser)]
#[command(name = "arena-skirmish", version)]
struct Args {
    /// TOML file overriding gameplay tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for spawn placement and driver decisions; derived from the clock when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of autonomous opponents.
    #[arg(long, default_value_t = DEFAULT_OPPONENTS)]
    opponents: usize,
    /// Run without a window and log the final scoreboard.
    #[arg(long)]
    headless: bool,
    /// Ticks simulated in headless mode.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Arena width in world units.
    #[arg(long, default_value_t = 1_280.0)]
    width: f32,
    /// Arena height in world units.
    #[arg(long, default_value_t = 800.0)]
    height: f32,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

/// Entry point for the Arena Skirmish command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let tuning = config::load_tuning(args.config.as_deref())?;
    let seed = args.seed.unwrap_or_else(clock_seed);
    let bounds = ArenaBounds::new(args.width, args.height);
    let mut simulation = Simulation::new(tuning, seed, args.opponents, bounds);

    if args.headless {
        simulation::run_headless(&mut simulation, args.ticks, HEADLESS_DT);
        return Ok(());
    }

    info!(seed, vsync = args.vsync, "opening window");
    let presentation = Presentation::new("Arena Skirmish", BACKGROUND, simulation.scene());
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .with_window_size(args.width as i32, args.height as i32);

    backend.run(presentation, move |dt, input, scene: &mut Scene| {
        if input.reset_requested {
            simulation.reset();
        }
        if input.viewport.x > 0.0 && input.viewport.y > 0.0 {
            simulation.resize(ArenaBounds::new(input.viewport.x, input.viewport.y));
        }
        let pointer = input.pointer.map(|pointer| Point::new(pointer.x, pointer.y));
        simulation.step(dt, pointer);
        *scene = simulation.scene();
    })
}

//! Halo Runtime
//!
//! Opens a window and runs the ambient and radial fields behind it.

mod app;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use halo_core::ring::RingConfig;
use halo_services::Settings;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Debug, Parser)]
#[command(name = "halo", version, about = "Ambient particle and radial infall backdrops")]
struct Args {
    /// JSON settings file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Which effects to run
    #[arg(short, long, value_enum)]
    effect: Option<Effect>,

    /// Fixed RNG seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Drive the ring renderer inside the radial field
    #[arg(long)]
    rings: bool,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Effect {
    Both,
    Ambient,
    Radial,
}

impl Args {
    /// Fold command-line overrides into the loaded settings.
    fn apply(&self, settings: &mut Settings) {
        if let Some(effect) = self.effect {
            settings.effects.ambient = matches!(effect, Effect::Both | Effect::Ambient);
            settings.effects.radial = matches!(effect, Effect::Both | Effect::Radial);
        }
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if self.rings {
            settings.radial.drive_rings = true;
            if settings.radial.rings.is_empty() {
                settings.radial.rings.push(RingConfig::default());
            }
        }
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    args.apply(&mut settings);
    settings.validate().context("invalid settings")?;
    Ok(settings)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let settings = load_settings(&args)?;

    if args.print_config {
        println!("{}", settings.to_json_pretty()?);
        return Ok(());
    }

    tracing::info!("Halo v{}", halo_core::VERSION);

    let rng = match settings.seed {
        Some(seed) => {
            tracing::info!(seed, "Using fixed seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new(settings, rng);
    event_loop.run_app(&mut app).context("event loop failed")?;

    if let Some(err) = app.take_error() {
        return Err(err);
    }
    Ok(())
}

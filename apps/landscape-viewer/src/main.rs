//! Landscape Viewer
//!
//! Runs a spatial application against an in-process simulated host: a
//! volume service and scene spawner that only log, and a fixed-step tick
//! source that injects periodic completion events.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p landscape-viewer -- [OPTIONS]
//! ```
//!
//! ## Options
//!
//! - `-c, --config <PATH>`: Host configuration file (default: bundled `assets/host.toml`)
//! - `-s, --scenes <PATH>`: Scene descriptor file (default: bundled `assets/scenes.toml`)
//! - `--ticks <N>`: Stop after N ticks
//! - `--run-for <SECONDS>`: Ask the host to shut down after this much app time
//! - `--fast`: Do not pace ticks in real time
//! - `--fail-scene <ID>`: Make the simulated host fail to spawn this scene
//! - `-h, --help`: Print help message
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod app;
mod host;

use std::rc::Rc;

use anyhow::Context;
use landscape_app::{init_logging, run_host, Application, FixedTickSource, HostConfig};
use landscape_core::{SceneDescriptorSet, SceneId};
use tracing::info;

use crate::app::Viewer;
use crate::host::{SimulatedScenes, SimulatedVolumes, ViewerSource};

const DEFAULT_HOST: &str = include_str!("../assets/host.toml");
const DEFAULT_SCENES: &str = include_str!("../assets/scenes.toml");

/// Ticks between injected completion events.
const EVENT_INTERVAL: u64 = 45;

/// Options from the command line.
#[derive(Debug, Default)]
struct Options {
    config: Option<String>,
    scenes: Option<String>,
    ticks: Option<u64>,
    run_for: Option<f64>,
    fast: bool,
    fail_scene: Option<String>,
}

impl Options {
    fn from_args() -> anyhow::Result<Self> {
        let mut opts = Self::default();
        let mut args = std::env::args().skip(1);

        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .with_context(|| format!("missing value for {name}"))
            };
            match arg.as_str() {
                "-c" | "--config" => opts.config = Some(value(arg.as_str())?),
                "-s" | "--scenes" => opts.scenes = Some(value(arg.as_str())?),
                "--ticks" => opts.ticks = Some(value(arg.as_str())?.parse().context("--ticks")?),
                "--run-for" => opts.run_for = Some(value(arg.as_str())?.parse().context("--run-for")?),
                "--fast" => opts.fast = true,
                "--fail-scene" => opts.fail_scene = Some(value(arg.as_str())?),
                other => anyhow::bail!("unknown option '{other}' (see --help)"),
            }
        }

        Ok(opts)
    }
}

fn read_or(path: Option<&str>, bundled: &str) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}")),
        None => Ok(bundled.to_string()),
    }
}

fn main() -> anyhow::Result<()> {
    // Check for help flag before starting the host
    if std::env::args().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return Ok(());
    }

    let opts = Options::from_args()?;

    let mut config = HostConfig::from_toml_str(&read_or(opts.config.as_deref(), DEFAULT_HOST)?)?;
    if let Some(ticks) = opts.ticks {
        config = config.with_max_ticks(ticks);
    }
    init_logging(config.log_filter.as_deref());

    let descriptors =
        SceneDescriptorSet::from_toml_str(&read_or(opts.scenes.as_deref(), DEFAULT_SCENES)?)?;
    info!(
        "{} starting with {} scene descriptor(s)",
        config.title,
        descriptors.len()
    );

    let mut spawner = SimulatedScenes::default();
    if let Some(id) = opts.fail_scene {
        spawner = spawner.failing_on(SceneId::new(id));
    }

    let mut app = Application::new(
        Viewer::new(config.prism_size, opts.run_for),
        SimulatedVolumes::default(),
        spawner,
        Rc::new(descriptors),
    );

    let ticks = FixedTickSource::from_config(&config)
        .with_realtime(!opts.fast && config.tick_rate_hz.is_some());
    let mut source = ViewerSource::new(ticks, EVENT_INTERVAL);

    let outcome = run_host(&mut app, &mut source);
    info!(
        "Stopped ({:?}) after {} tick(s), {}/{} event(s) consumed",
        outcome.stop, outcome.ticks, outcome.events_consumed, outcome.events
    );

    if !outcome.is_success() {
        anyhow::bail!("application exited with status {}", outcome.status());
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        "Landscape Viewer - headless demo host

USAGE:
    cargo run -p landscape-viewer -- [OPTIONS]

OPTIONS:
    -c, --config <PATH>     Host configuration file (default: bundled host.toml)
    -s, --scenes <PATH>     Scene descriptor file (default: bundled scenes.toml)
    --ticks <N>             Stop after N ticks
    --run-for <SECONDS>     Shut down after this much application time
    --fast                  Do not pace ticks in real time
    --fail-scene <ID>       Simulate a spawn failure for scene ID
    -h, --help              Print this help message

EXAMPLES:
    # Run the bundled configuration
    cargo run -p landscape-viewer

    # Run 10 ticks as fast as possible
    cargo run -p landscape-viewer -- --ticks 10 --fast

    # See how a failed startup scene is reported
    cargo run -p landscape-viewer -- --fail-scene url-bar

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log level (e.g., info, debug, trace)"
    );
}

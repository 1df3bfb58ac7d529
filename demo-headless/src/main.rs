//! Headless command-line driver for the ignition risk engine
//!
//! Every command prints JSON on stdout; logs go to stderr (filter with `RUST_LOG`).

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use stormwatch_core::config::{DEFAULT_BBOX, DEFAULT_END, DEFAULT_START};
use stormwatch_core::routing::route_collection;
use stormwatch_core::time::parse_time;
use stormwatch_core::{
    build_layers, create_assignment_solver, create_provider, detect_threats, plan_routes,
    run_scenario, AssignmentStrategy, BoundingBox, DataMode, EngineConfig, RoutePlan,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Storm-driven wildfire ignition risk engine
#[derive(Parser, Debug)]
#[command(name = "stormwatch")]
#[command(about = "Detect storm/terrain ignition threats and plan drone response", long_about = None)]
struct Cli {
    /// JSON configuration file (partial files override only the keys they name)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print compact instead of pretty JSON
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fuel, atmospheric and consequence grids at one time
    Layers(SnapshotArgs),
    /// Ranked storm/terrain collision threats at one time
    Threats(SnapshotArgs),
    /// Drone assignments for the threats at one time
    Routes(RouteArgs),
    /// Best threat per cell across a time range, with per-step routes
    Simulate(SimulateArgs),
    /// Print the effective configuration
    Config,
}

/// Region, data source and threshold shared by every engine command
#[derive(Args, Debug)]
struct RegionArgs {
    /// Western edge (degrees)
    #[arg(long, allow_negative_numbers = true)]
    min_lon: Option<f64>,

    /// Southern edge (degrees)
    #[arg(long, allow_negative_numbers = true)]
    min_lat: Option<f64>,

    /// Eastern edge (degrees)
    #[arg(long, allow_negative_numbers = true)]
    max_lon: Option<f64>,

    /// Northern edge (degrees)
    #[arg(long, allow_negative_numbers = true)]
    max_lat: Option<f64>,

    /// Input source (hybrid, real, synthetic)
    #[arg(long, default_value = "hybrid")]
    data_mode: DataMode,

    /// Minimum severity checked against storms (defaults to the configured threshold)
    #[arg(long)]
    threshold: Option<f64>,
}

impl RegionArgs {
    /// Requested box; the default region unless all four edges are given
    fn bbox(&self) -> stormwatch_core::Result<BoundingBox> {
        match (self.min_lon, self.min_lat, self.max_lon, self.max_lat) {
            (Some(min_lon), Some(min_lat), Some(max_lon), Some(max_lat)) => {
                BoundingBox::new(min_lon, min_lat, max_lon, max_lat)
            }
            (None, None, None, None) => Ok(DEFAULT_BBOX),
            _ => {
                warn!("Incomplete bounding box, using the default region");
                Ok(DEFAULT_BBOX)
            }
        }
    }

    fn threshold(&self, config: &EngineConfig) -> f64 {
        self.threshold.unwrap_or(config.threat_threshold)
    }
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    #[command(flatten)]
    region: RegionArgs,

    /// Forecast time (RFC 3339 or YYYY-MM-DD; defaults to the replay start)
    #[arg(long)]
    time: Option<String>,
}

#[derive(Args, Debug)]
struct RouteArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,

    /// Assignment backend (optimal, greedy); overrides the configuration
    #[arg(long)]
    solver: Option<AssignmentStrategy>,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    region: RegionArgs,

    /// First step (defaults to the replay start)
    #[arg(long)]
    start: Option<String>,

    /// Last step, inclusive (defaults to the replay end)
    #[arg(long)]
    end: Option<String>,

    /// Hours between steps (defaults to the configured step)
    #[arg(long)]
    step_hours: Option<i64>,

    /// Assignment backend (optimal, greedy); overrides the configuration
    #[arg(long)]
    solver: Option<AssignmentStrategy>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if compact {
        serde_json::to_writer(&mut out, value)?;
    } else {
        serde_json::to_writer_pretty(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Config => print_json(&config, cli.compact),
        Command::Layers(args) => {
            let provider = create_provider(args.region.data_mode);
            let when = parse_time(args.time.as_deref(), DEFAULT_START)?;
            let snapshot = build_layers(provider.as_ref(), args.region.bbox()?, when, &config)?;
            print_json(&snapshot.to_report(), cli.compact)
        }
        Command::Threats(args) => {
            let provider = create_provider(args.region.data_mode);
            let when = parse_time(args.time.as_deref(), DEFAULT_START)?;
            let threats = detect_threats(
                provider.as_ref(),
                args.region.bbox()?,
                when,
                &config,
                args.region.threshold(&config),
            )?;
            print_json(&threats, cli.compact)
        }
        Command::Routes(args) => {
            let region = &args.snapshot.region;
            let provider = create_provider(region.data_mode);
            let when = parse_time(args.snapshot.time.as_deref(), DEFAULT_START)?;
            let threats = detect_threats(
                provider.as_ref(),
                region.bbox()?,
                when,
                &config,
                region.threshold(&config),
            )?;
            let solver = create_assignment_solver(args.solver.unwrap_or(config.routing.solver));
            let plan = RoutePlan::from_config(&config.routing);
            let assignments = plan_routes(&threats, &plan, solver.as_ref())?;
            print_json(&route_collection(&assignments), cli.compact)
        }
        Command::Simulate(args) => {
            let region = &args.region;
            let provider = create_provider(region.data_mode);
            let start = parse_time(args.start.as_deref(), DEFAULT_START)?;
            let end = parse_time(args.end.as_deref(), DEFAULT_END)?;
            let step_hours = args.step_hours.unwrap_or(config.simulate_step_hours);
            let solver = create_assignment_solver(args.solver.unwrap_or(config.routing.solver));
            let report = run_scenario(
                provider.as_ref(),
                region.bbox()?,
                start,
                end,
                step_hours,
                &config,
                region.threshold(&config),
                solver.as_ref(),
            )?;
            print_json(&report, cli.compact)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

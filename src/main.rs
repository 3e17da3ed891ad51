use pisim::config::SweepConfig;
use pisim::sweep::{ExperimentResult, ExperimentSweep};

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Count block collisions for mass ratios 100^i and compare with π.
#[derive(Parser, Debug)]
#[command(name = "pisim", version)]
struct Args {
    /// YAML sweep configuration (fields not given keep their defaults).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Last decade to run (mass ratio mass_base^i for i = 0..=max_decade).
    #[arg(long)]
    max_decade: Option<u32>,

    /// Step budget per run.
    #[arg(long)]
    max_steps: Option<u64>,

    /// Width of the wall contact zone.
    #[arg(long)]
    wall_tolerance: Option<f64>,

    /// x the big block must pass before a run can end.
    #[arg(long)]
    stop_boundary: Option<f64>,

    /// Emit one JSON object per decade instead of a table.
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<SweepConfig> {
    let mut cfg = match &args.config {
        Some(path) => SweepConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SweepConfig::default(),
    };
    if let Some(d) = args.max_decade {
        cfg.max_decade = d;
    }
    if let Some(n) = args.max_steps {
        cfg.simulation.max_steps = n;
    }
    if let Some(t) = args.wall_tolerance {
        cfg.simulation.wall_tolerance = t;
    }
    if let Some(b) = args.stop_boundary {
        cfg.simulation.stop_boundary = b;
    }
    Ok(cfg)
}

fn print_row(r: &ExperimentResult) {
    println!(
        "{:>3} {:>14e} {:>10e} {:>10} {:>12.6} {:>14.6} {:>14.6} {:>10} {:>6}",
        r.decade,
        r.mass_ratio,
        r.dt,
        r.collision_count,
        r.normalized_count,
        r.big_velocity,
        r.small_velocity,
        r.steps,
        r.overshoots
    );
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let cfg = load_config(&args)?;
    let sweep = ExperimentSweep::new(cfg).context("invalid sweep configuration")?;

    if !args.json {
        println!(
            "{:>3} {:>14} {:>10} {:>10} {:>12} {:>14} {:>14} {:>10} {:>6}",
            "i", "mass ratio", "dt", "count", "count/10^i", "v_big", "v_small", "steps", "over"
        );
    }
    for decade in sweep.decades() {
        let result = sweep
            .run_decade(decade)
            .with_context(|| format!("run for decade {decade} failed"))?;
        if args.json {
            println!("{}", serde_json::to_string(&result)?);
        } else {
            print_row(&result);
        }
        let pause = sweep.config().pause_between_runs_ms;
        if pause > 0 && decade < sweep.config().max_decade {
            std::thread::sleep(std::time::Duration::from_millis(pause));
        }
    }
    if !args.json {
        println!("pi = {:.6}", std::f64::consts::PI);
    }
    Ok(())
}

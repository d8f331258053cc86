use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use simulation::{Simulation, SimulationConfig};

/// Run a merging N-body simulation and write its checkpoints
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML configuration; defaults apply to anything it leaves out
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run name, used as the directory under the saves folder
    #[arg(short, long)]
    name: Option<String>,

    #[arg(long)]
    saves_folder: Option<PathBuf>,

    /// Number of particles to spawn
    #[arg(short, long)]
    particles: Option<usize>,

    #[arg(short = 't', long)]
    max_time: Option<f64>,

    #[arg(short, long)]
    seed: Option<u64>,
}

impl Args {
    fn into_config(self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_yaml_file(path)?,
            None => SimulationConfig::default(),
        };

        if let Some(name) = self.name {
            config.simulation_name = name;
        }
        if let Some(folder) = self.saves_folder {
            config.saves_folder = folder;
        }
        if let Some(count) = self.particles {
            config.particle_count = count;
        }
        if let Some(max_time) = self.max_time {
            config.max_time = max_time;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Args::parse().into_config()?;
    let run_dir = config.run_dir();

    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("failed to install Ctrl+C handler")?;

    let mut sim = Simulation::new(config)
        .with_context(|| format!("failed to start run in {}", run_dir.display()))?;
    let summary = sim.run_until(&stop)?;

    println!(
        "{} at timestep {} (t = {}), {} particles, {} chunk(s) in {}",
        if summary.completed { "Finished" } else { "Stopped" },
        summary.final_timestep,
        summary.final_time,
        summary.particle_count,
        summary.chunks_written,
        run_dir.display()
    );
    Ok(())
}

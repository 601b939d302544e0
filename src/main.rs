//! Gravity Golf command line
//!
//! Solves, probes and generates levels described as JSON.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use gravity_golf::Settings;
use gravity_golf::description::LevelDescription;
use gravity_golf::error::Error;
use gravity_golf::generator::generate_level;
use gravity_golf::oracle;
use gravity_golf::sim::{Level, Point2d};
use gravity_golf::solver;

#[derive(Parser, Debug)]
#[command(name = "gravity-golf")]
#[command(about = "Solve, probe and generate gravity golf levels")]
struct Cli {
    /// Settings file (JSON); defaults apply to anything it leaves out
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every winning launch point as "x y", one per line
    Solve { level: PathBuf },
    /// Simulate one launch toward a point and report the outcome
    Probe {
        level: PathBuf,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Generate a random level with a reachable goal and print it as JSON
    Generate {
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn load_level(path: &Path) -> Result<Level, Error> {
    Ok(LevelDescription::load(path)?.to_level())
}

fn run(cli: Cli) -> Result<(), Error> {
    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::Solve { level } => {
            let level = load_level(&level)?;
            let solutions = solver::solve(&level, &settings)?;
            for point in solutions.sorted() {
                println!("{point}");
            }
            if !solutions.complete {
                log::warn!("Search ceiling reached; the list above may be incomplete");
            }
        }
        Commands::Probe { level, x, y } => {
            let level = load_level(&level)?;
            let result = oracle::probe(
                &level,
                Point2d::new(x, y),
                settings.max_magnitude,
                settings.probe.budget(),
            );
            println!("{:?} after {} ticks", result.outcome, result.ticks);
        }
        Commands::Generate { seed } => {
            let seed = seed.unwrap_or_else(rand::random);
            log::info!("Generating level with seed {seed}");
            let mut rng = Pcg32::seed_from_u64(seed);
            let level = generate_level(&settings, &mut rng)?;
            println!("{}", LevelDescription::from(&level).to_json()?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

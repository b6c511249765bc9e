mod heightmap_io;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use rainfall_core::{ErosionEngine, ErosionParams, Heightmap, NoiseConfig, SimulationStats};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use heightmap_io::{load_heightmap, save_heightmap, HeightmapIoError};

/// Raindrop erosion demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "rainfall")]
#[command(about = "Hydraulic erosion of a heightmap by simulated raindrops", long_about = None)]
struct Args {
    /// Grayscale heightmap to erode (omit to generate noise terrain)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the eroded heightmap
    #[arg(short, long, default_value = "eroded.png")]
    output: PathBuf,

    /// Also write the starting terrain here
    #[arg(long)]
    save_initial: Option<PathBuf>,

    /// Generated terrain width in cells
    #[arg(long, default_value_t = 512)]
    width: usize,

    /// Generated terrain height in cells
    #[arg(long, default_value_t = 512)]
    height: usize,

    /// Seed for generated terrain
    #[arg(long, default_value_t = 0)]
    noise_seed: u32,

    /// Lattice spacing of generated terrain in cells
    #[arg(long, default_value_t = 64.0)]
    noise_scale: f64,

    /// Noise octaves for generated terrain
    #[arg(long, default_value_t = 5)]
    octaves: u32,

    /// Raindrops per batch
    #[arg(short, long, default_value_t = 1000)]
    drops: usize,

    /// Number of batches
    #[arg(short, long, default_value_t = 200)]
    batches: usize,

    /// Surface normal multiplier (driving force)
    #[arg(long, default_value_t = 100.0)]
    scale: f64,

    /// Raindrop density (mass divisor)
    #[arg(long, default_value_t = 1.0)]
    density: f64,

    /// Velocity lost per step (0-1)
    #[arg(long, default_value_t = 0.1)]
    friction: f64,

    /// Fraction of sediment imbalance applied per step
    #[arg(long, default_value_t = 0.3)]
    deposition_rate: f64,

    /// Volume lost per step (defaults to 1 / width)
    #[arg(long)]
    evaporation_rate: Option<f64>,

    /// Seed for raindrop placement
    #[arg(short, long, default_value_t = 1923)]
    seed: u64,
}

impl Args {
    fn params(&self, width: usize) -> ErosionParams {
        let params = ErosionParams::for_width(width)
            .with_scale(self.scale)
            .with_density(self.density)
            .with_friction(self.friction)
            .with_deposition_rate(self.deposition_rate)
            .with_seed(self.seed);
        match self.evaporation_rate {
            Some(rate) => params.with_evaporation_rate(rate),
            None => params,
        }
    }

    fn terrain(&self) -> Result<Heightmap, HeightmapIoError> {
        if let Some(path) = &self.input {
            info!("Loading heightmap from {}", path.display());
            return load_heightmap(path);
        }

        info!(
            "Generating {}x{} noise terrain (seed {}, scale {}, {} octaves)",
            self.width, self.height, self.noise_seed, self.noise_scale, self.octaves
        );
        let noise = NoiseConfig {
            scale: self.noise_scale,
            octaves: self.octaves,
            seed: self.noise_seed,
            ..NoiseConfig::default()
        };
        Ok(Heightmap::from_noise(self.width, self.height, &noise)?)
    }
}

fn run(args: &Args) -> Result<(), HeightmapIoError> {
    let terrain = args.terrain()?;
    if let Some(path) = &args.save_initial {
        save_heightmap(&terrain, path)?;
        info!("Initial terrain written to {}", path.display());
    }

    let (lo, hi) = terrain.range();
    info!(
        "Terrain {}x{}, elevation [{:.3}, {:.3}]",
        terrain.width(),
        terrain.height(),
        lo,
        hi
    );

    let params = args.params(terrain.width());
    let mut engine = ErosionEngine::new(terrain, params)?;

    let started = Instant::now();
    let mut totals = SimulationStats::default();
    for batch in 1..=args.batches {
        let stats = engine.simulate(args.drops);
        totals.merge(&stats);
        info!(
            "Batch {}/{}: {} raindrops, mean {:.1} steps, {} left the grid",
            batch,
            args.batches,
            stats.raindrops,
            stats.mean_steps(),
            stats.out_of_bounds
        );
    }

    let (lo, hi) = engine.heightmap().range();
    info!(
        "Simulated {} raindrops ({} steps) in {:.2}s, elevation now [{:.3}, {:.3}]",
        totals.raindrops,
        totals.steps,
        started.elapsed().as_secs_f64(),
        lo,
        hi
    );

    save_heightmap(engine.heightmap(), &args.output)?;
    info!("Eroded terrain written to {}", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rainfall_core::ErosionError;

    #[test]
    fn test_default_args_match_engine_defaults() {
        let args = Args::parse_from(["rainfall"]);
        let params = args.params(512);
        assert_eq!(params, ErosionParams::default());
        assert_eq!(args.drops, 1000);
        assert_eq!(args.batches, 200);
    }

    #[test]
    fn test_evaporation_follows_width_unless_given() {
        let args = Args::parse_from(["rainfall", "--width", "128"]);
        assert_eq!(args.params(128).evaporation_rate, 1.0 / 128.0);

        let args = Args::parse_from(["rainfall", "--evaporation-rate", "0.01"]);
        assert_eq!(args.params(512).evaporation_rate, 0.01);
    }

    #[test]
    fn test_run_small_generated_terrain() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.png");
        let initial = dir.path().join("in.png");
        let args = Args::parse_from([
            "rainfall",
            "--width",
            "32",
            "--height",
            "24",
            "--noise-scale",
            "8",
            "--drops",
            "50",
            "--batches",
            "2",
            "--output",
            output.to_str().unwrap(),
            "--save-initial",
            initial.to_str().unwrap(),
        ]);
        run(&args).unwrap();

        let eroded = load_heightmap(&output).unwrap();
        assert_eq!(eroded.width(), 32);
        assert_eq!(eroded.height(), 24);
        assert!(initial.exists());
    }

    #[test]
    fn test_run_rejects_bad_params() {
        let args = Args::parse_from(["rainfall", "--width", "8", "--height", "8", "--density", "0"]);
        assert!(matches!(run(&args), Err(HeightmapIoError::Erosion(_))));
    }

    #[test]
    fn test_run_rejects_zero_noise_scale() {
        let args = Args::parse_from(["rainfall", "--width", "8", "--height", "8", "--noise-scale", "0"]);
        assert!(matches!(
            run(&args),
            Err(HeightmapIoError::Erosion(ErosionError::InvalidParameter {
                name: "noise.scale",
                ..
            }))
        ));
    }
}

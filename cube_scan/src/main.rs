//! cube_scan - reconstruct a Rubik's Cube from six face photographs
//!
//! Prints the 54-letter facelet string, and the solving moves when a solver
//! program is given. Set `RUST_LOG=info` to see which photograph became which
//! face and how each one was turned.

use anyhow::{Context, Result, bail};
use clap::Parser;
use image::RgbImage;
use log::info;
use std::path::{Path, PathBuf};

use cube_vision::{
    CommandSolver, CubePipeline, CubeSolver, FaceLabel, ParallelPipeline, PipelineConfig,
    Reconstruction, ScanError,
};

#[derive(Parser, Debug)]
#[command(name = "cube_scan")]
#[command(
    about = "Reconstruct a Rubik's Cube facelet string from six face photographs",
    long_about = None
)]
struct Cli {
    /// The six face photographs, in any order
    #[arg(required_unless_present = "print_config")]
    images: Vec<PathBuf>,

    /// JSON pipeline configuration; missing sections use the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the default configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Solver program, run as `PROGRAM [SOLVER_ARG...] <facelets>`
    #[arg(long)]
    solver: Option<PathBuf>,

    /// Extra argument passed to the solver before the facelet string (repeatable)
    #[arg(long, requires = "solver", allow_hyphen_values = true)]
    solver_arg: Vec<String>,

    /// Sample the photographs concurrently
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", PipelineConfig::default().to_json()?);
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };
    let images = load_images(&cli.images)?;

    let reconstruction = if cli.parallel {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to start the tokio runtime")?;
        let pipeline = ParallelPipeline::new(config).context("Invalid pipeline configuration")?;
        runtime
            .block_on(pipeline.process_images(images))
            .context("Could not reconstruct the cube")?
    } else {
        let pipeline = CubePipeline::new(config).context("Invalid pipeline configuration")?;
        pipeline
            .process_images(&images)
            .context("Could not reconstruct the cube")?
    };
    log_rotations(&reconstruction);
    println!("{}", reconstruction.facelets);

    if let Some(program) = cli.solver {
        let solver = CommandSolver::new(program).with_args(cli.solver_arg);
        let moves = solver
            .solve(&reconstruction.facelets)
            .map_err(ScanError::Solver)
            .context("The cube could not be solved")?;
        println!("{}", moves.join(" "));
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<PipelineConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    PipelineConfig::from_json(&json)
        .with_context(|| format!("Failed to parse config file {:?}", path))
}

fn load_images(paths: &[PathBuf]) -> Result<Vec<RgbImage>> {
    if paths.len() != 6 {
        bail!("Expected 6 face photographs, got {}", paths.len());
    }
    paths
        .iter()
        .map(|path| {
            info!("Loading {:?}", path);
            image::open(path)
                .map(|image| image.to_rgb8())
                .with_context(|| format!("Failed to decode image {:?}", path))
        })
        .collect()
}

fn log_rotations(reconstruction: &Reconstruction) {
    for label in FaceLabel::ALL {
        let face = reconstruction.state.face(label);
        info!(
            "{} face: photograph #{} ({} center), turned {} quarter(s) clockwise",
            label,
            face.input_index,
            face.center(),
            reconstruction.rotation(label)
        );
    }
}

//! pixmosaic CLI - grayscale, pixelate or mosaic-remap image files

use clap::{Parser, Subcommand};
use log::{info, warn};
use pixmosaic::{codec, Config, MosaicError, PixelMatrix, Processor};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "pixmosaic", about = "Parallel pixel-matrix image transforms")]
struct Args {
    /// Number of workers (default: one per CPU)
    #[arg(short, long, global = true)]
    workers: Option<usize>,
    /// JSON settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Also run single-threaded and report the speedup
    #[arg(long, global = true)]
    compare: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert to luma grayscale
    Grayscale { input: PathBuf, output: PathBuf },
    /// Pixelate by averaging square blocks
    Downscale {
        input: PathBuf,
        output: PathBuf,
        /// Block side length in pixels
        #[arg(short, long)]
        factor: Option<usize>,
    },
    /// Rebuild TARGET out of the closest-colored blocks of SOURCE
    Remap {
        source: PathBuf,
        target: PathBuf,
        output: PathBuf,
        /// Block side length in pixels
        #[arg(short, long)]
        factor: Option<usize>,
    },
}

fn main() -> Result<(), MosaicError> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if args.workers.is_some() {
        config.workers = args.workers;
    }

    let processor = Processor::from_config(&config)?;
    let sequential = if args.compare {
        Some(Processor::new(1)?)
    } else {
        None
    };
    info!("using {} workers", processor.workers());

    match args.command {
        Command::Grayscale { input, output } => {
            let matrix = processor.extract(&codec::open(&input)?);
            let result = run("grayscale", &processor, sequential.as_ref(), |p| Ok(p.grayscale(matrix.clone())))?;
            codec::save(&result, output)?;
        }
        Command::Downscale { input, output, factor } => {
            let factor = factor.unwrap_or(config.downscale_factor);
            let matrix = processor.extract(&codec::open(&input)?);
            let result = run("downscale", &processor, sequential.as_ref(), |p| Ok(p.downscale(matrix.clone(), factor)))?;
            codec::save(&result, output)?;
        }
        Command::Remap { source, target, output, factor } => {
            let factor = factor.unwrap_or(config.remap_factor);
            // decode both before transforming anything
            let source = codec::open(&source)?;
            let target = codec::open(&target)?;
            let source = processor.extract(&source);
            let target = processor.extract(&target);
            let result = run("remap", &processor, sequential.as_ref(), |p| p.remap(&source, &target, factor))?;
            codec::save(&result, output)?;
        }
    }
    Ok(())
}

/// Run `op` on the configured processor, and on the single-worker one too
/// when comparing. Logs timings and checks both outputs agree.
fn run(
    name: &str,
    processor: &Processor,
    sequential: Option<&Processor>,
    op: impl Fn(&Processor) -> Result<PixelMatrix, MosaicError>,
) -> Result<PixelMatrix, MosaicError> {
    let (result, parallel_time) = timed(|| op(processor))?;
    info!("{name}: {parallel_time:?} with {} workers", processor.workers());

    if let Some(seq) = sequential {
        let (baseline, seq_time) = timed(|| op(seq))?;
        let speedup = seq_time.as_secs_f64() / parallel_time.as_secs_f64().max(f64::EPSILON);
        info!("{name}: {seq_time:?} sequential, speedup {speedup:.2}x");
        if baseline != result {
            warn!("{name}: sequential and parallel outputs differ");
        }
    }
    Ok(result)
}

fn timed<T>(f: impl FnOnce() -> Result<T, MosaicError>) -> Result<(T, Duration), MosaicError> {
    let start = Instant::now();
    let value = f()?;
    Ok((value, start.elapsed()))
}

//! Parallel grayscale, pixelation and block-matching mosaic transforms over
//! 16-bit RGB pixel matrices.

pub mod block;
pub mod codec;
pub mod config;
pub mod downscale;
pub mod grayscale;
pub mod parallel;
pub mod pixel;
pub mod remap;

pub use config::Config;
pub use parallel::Engine;
pub use pixel::{Pixel, PixelMatrix};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MosaicError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Row {row} has {found} pixels, expected {expected}")]
    RaggedRows { row: usize, expected: usize, found: usize },
    #[error("Block factor must be at least 1")]
    ZeroFactor,
    #[error("Source image has no blocks to match against")]
    EmptySource,
}

pub type Result<T> = std::result::Result<T, MosaicError>;

/// Entry point bundling a worker pool with the transforms.
pub struct Processor {
    engine: Engine,
}

impl Processor {
    /// Processor backed by a pool of `workers` threads (at least one).
    pub fn new(workers: usize) -> Result<Self> {
        Ok(Self { engine: Engine::new(workers)? })
    }

    /// One worker per logical CPU.
    pub fn with_default_parallelism() -> Result<Self> {
        Ok(Self { engine: Engine::with_default_parallelism()? })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.workers())
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn workers(&self) -> usize {
        self.engine.workers()
    }

    pub fn extract(&self, image: &image::DynamicImage) -> PixelMatrix {
        codec::extract(&self.engine, image)
    }

    pub fn grayscale(&self, mut matrix: PixelMatrix) -> PixelMatrix {
        grayscale::grayscale(&self.engine, &mut matrix);
        matrix
    }

    pub fn downscale(&self, mut matrix: PixelMatrix, factor: usize) -> PixelMatrix {
        downscale::downscale(&self.engine, &mut matrix, factor);
        matrix
    }

    pub fn remap(&self, source: &PixelMatrix, target: &PixelMatrix, factor: usize) -> Result<PixelMatrix> {
        remap::remap_to_target(&self.engine, source, target, factor)
    }
}

//! Mosaic remap: rebuild a target image out of the source image's blocks.
//!
//! Both images are cut into blocks of the same factor. Every target block is
//! replaced by the source block whose average color is nearest, and the
//! chosen blocks are painted into a fresh matrix at the target positions.

use crate::block::{decompose, Block};
use crate::parallel::Engine;
use crate::pixel::PixelMatrix;
use crate::{MosaicError, Result};
use log::{debug, info};

/// Index into `source` of the block nearest to `target` by squared color
/// distance. The first minimum in source order wins ties.
pub fn nearest_block(source: &[Block<'_>], target: &Block<'_>) -> Option<usize> {
    let want = target.average();
    let mut best: Option<(usize, u64)> = None;
    for (i, candidate) in source.iter().enumerate() {
        let d = candidate.average().distance_sq(&want);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// For each target block, the nearest source block moved to the target
/// block's position. Target blocks are matched concurrently in index ranges.
pub fn match_blocks<'s>(
    engine: &Engine,
    source: &[Block<'s>],
    target: &[Block<'_>],
) -> Result<Vec<Block<'s>>> {
    if source.is_empty() {
        return Err(MosaicError::EmptySource);
    }
    let picks = engine.map_ranges(target.len(), |range| {
        target[range].iter().map(|t| nearest_block(source, t)).collect()
    });
    picks
        .into_iter()
        .zip(target)
        .map(|(pick, t)| {
            let i = pick.ok_or(MosaicError::EmptySource)?;
            Ok(source[i].relocated(t.x, t.y))
        })
        .collect()
}

/// Paint `blocks` into a new `width`×`height` matrix. Pixels falling outside
/// the matrix are dropped; positions no block covers stay black.
pub fn reconstruct(blocks: &[Block<'_>], width: usize, height: usize) -> PixelMatrix {
    let mut out = PixelMatrix::new(width, height);
    for block in blocks {
        for (dy, src) in block.rows().iter().enumerate() {
            let y = block.y + dy;
            if y >= height {
                break;
            }
            if block.x >= width {
                continue;
            }
            let n = src.len().min(width - block.x);
            out.row_mut(y)[block.x..block.x + n].copy_from_slice(&src[..n]);
        }
    }
    out
}

/// Rebuild `target` from blocks of `source`. The output has the target's
/// dimensions; the source may have any size but must not be empty.
pub fn remap_to_target(
    engine: &Engine,
    source: &PixelMatrix,
    target: &PixelMatrix,
    factor: usize,
) -> Result<PixelMatrix> {
    let src_blocks = decompose(source, factor)?;
    let tgt_blocks = decompose(target, factor)?;
    debug!(
        "matching {} target blocks against {} source blocks",
        tgt_blocks.len(),
        src_blocks.len()
    );

    let (width, height) = target.dimensions();
    if tgt_blocks.is_empty() {
        return Ok(PixelMatrix::new(width, height));
    }
    let mapped = match_blocks(engine, &src_blocks, &tgt_blocks)?;
    let out = reconstruct(&mapped, width, height);
    info!("remapped {width}x{height} target with factor {factor}");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Pixel;

    const RED: Pixel = Pixel::new(0xffff, 0, 0);
    const BLUE: Pixel = Pixel::new(0, 0, 0xffff);

    #[test]
    fn nearest_block_prefers_first_of_ties() {
        // two identical red blocks; the first one must win
        let m = PixelMatrix::from_fn(6, 2, |x, _| if x < 4 { RED } else { BLUE });
        let blocks = decompose(&m, 2).unwrap();
        let probe = PixelMatrix::filled(2, 2, Pixel::new(0xf000, 0, 0));
        let probe = decompose(&probe, 2).unwrap();
        assert_eq!(nearest_block(&blocks, &probe[0]), Some(0));
        assert_eq!(nearest_block(&[], &probe[0]), None);
    }

    #[test]
    fn match_blocks_reuses_source_blocks() {
        let engine = Engine::new(2).unwrap();
        let src = PixelMatrix::filled(2, 2, RED);
        let tgt = PixelMatrix::filled(4, 4, BLUE);
        let src_blocks = decompose(&src, 2).unwrap();
        let tgt_blocks = decompose(&tgt, 2).unwrap();
        let mapped = match_blocks(&engine, &src_blocks, &tgt_blocks).unwrap();
        let origins: Vec<_> = mapped.iter().map(|b| (b.x, b.y)).collect();
        assert_eq!(origins, vec![(0, 0), (2, 0), (0, 2), (2, 2)]);
        assert!(mapped.iter().all(|b| b.average() == RED));
    }

    #[test]
    fn match_blocks_requires_source() {
        let engine = Engine::new(1).unwrap();
        let tgt = PixelMatrix::filled(2, 2, BLUE);
        let tgt_blocks = decompose(&tgt, 2).unwrap();
        assert!(matches!(match_blocks(&engine, &[], &tgt_blocks), Err(MosaicError::EmptySource)));
    }

    #[test]
    fn reconstruct_clips_out_of_bounds_writes() {
        let src = PixelMatrix::filled(3, 3, RED);
        let blocks = decompose(&src, 3).unwrap();
        let placed = vec![blocks[0].relocated(1, 1), blocks[0].relocated(5, 0)];
        let out = reconstruct(&placed, 2, 2);
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(out.get(1, 1), RED);
        assert_eq!(out.get(0, 0), Pixel::default());
        assert_eq!(out.get(1, 0), Pixel::default());
    }

    #[test]
    fn remap_output_takes_target_dimensions() {
        let engine = Engine::new(4).unwrap();
        let src = PixelMatrix::filled(3, 7, RED);
        let tgt = PixelMatrix::filled(10, 4, BLUE);
        let out = remap_to_target(&engine, &src, &tgt, 4).unwrap();
        assert_eq!(out.dimensions(), (10, 4));
    }

    #[test]
    fn remap_empty_target_gives_empty_output() {
        let engine = Engine::new(2).unwrap();
        let src = PixelMatrix::filled(2, 2, RED);
        let out = remap_to_target(&engine, &src, &PixelMatrix::new(0, 0), 2).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn remap_rejects_empty_source_and_zero_factor() {
        let engine = Engine::new(2).unwrap();
        let tgt = PixelMatrix::filled(2, 2, RED);
        assert!(matches!(
            remap_to_target(&engine, &PixelMatrix::new(0, 0), &tgt, 2),
            Err(MosaicError::EmptySource)
        ));
        assert!(matches!(remap_to_target(&engine, &tgt, &tgt, 0), Err(MosaicError::ZeroFactor)));
    }
}

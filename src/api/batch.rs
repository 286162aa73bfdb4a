//! Converting many independent images, each with its own result.

use crate::{NotescanError, ShrinkOptions, ShrinkOutput, ShrinkPipeline};

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Returns the options for the image at `index`, giving each image its own seed.
fn options_for(options: ShrinkOptions, index: usize) -> ShrinkOptions {
    match options.get_seed() {
        Some(seed) => options.seed(seed ^ index as u64),
        None => options,
    }
}

/// Shrinks each pipeline's image with the given options.
///
/// A failure only affects the result for that image.
/// If `options` has a seed, image `i` uses the seed `seed ^ i`.
pub fn shrink_all(
    images: &[ShrinkPipeline],
    options: ShrinkOptions,
) -> Vec<Result<ShrinkOutput, NotescanError>> {
    images
        .iter()
        .enumerate()
        .map(|(i, pipeline)| {
            let mut pipeline = pipeline.clone();
            pipeline.options(options_for(options, i));
            pipeline.shrink()
        })
        .collect()
}

/// Shrinks each pipeline's image with the given options, in parallel across images.
///
/// Results are returned in the same order as `images`, and are the same as
/// [`shrink_all`] would return when `options` has a seed.
#[cfg(feature = "threads")]
pub fn shrink_all_par(
    images: &[ShrinkPipeline],
    options: ShrinkOptions,
) -> Vec<Result<ShrinkOutput, NotescanError>> {
    images
        .par_iter()
        .enumerate()
        .map(|(i, pipeline)| {
            let mut pipeline = pipeline.clone();
            pipeline.options(options_for(options, i));
            pipeline.shrink()
        })
        .collect()
}

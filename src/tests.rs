//! Shared test fixtures.

use crate::{Pixel, PixelBuffer};
use palette::Srgb;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;

/// Deterministic pseudo-random colors.
pub fn test_data_srgb(len: u32) -> Vec<Srgb<u8>> {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(42);
    (0..len)
        .map(|_| Srgb::new(rng.gen(), rng.gen(), rng.gen()))
        .collect()
}

/// 256 deterministic pseudo-random pixels.
pub fn test_pixels_256() -> Vec<Pixel> {
    test_data_srgb(256).into_iter().map(Pixel::from).collect()
}

/// A `width` by `height` image filled with a single color.
pub fn uniform_image(width: u32, height: u32, color: Srgb<u8>) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |_, _| color)
}

/// A 10x10 image whose two rightmost columns are `ink` and the rest `paper`.
pub fn two_tone_image(paper: Srgb<u8>, ink: Srgb<u8>) -> PixelBuffer {
    PixelBuffer::from_fn(10, 10, |x, _| if x >= 8 { ink } else { paper })
}

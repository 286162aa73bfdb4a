//! Random sampling of pixels, so that palette learning costs the same regardless of image size.

use crate::PixelBuffer;
use rand::{prelude::Distribution, Rng, SeedableRng};
use rand_distr::Uniform;
use rand_xoshiro::Xoroshiro128PlusPlus;

/// Returns the number of samples to draw from `len` pixels at the given sampling rate,
/// i.e., `floor(len * rate)`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn num_samples(len: usize, sampling_rate: f64) -> usize {
    (len as f64 * sampling_rate) as usize
}

/// Draws `num` pixels uniformly at random from `pixels`, with replacement.
///
/// The same pixel may appear in the sample several times.
/// Returns an empty buffer if `pixels` is empty.
pub fn sample_with(pixels: &PixelBuffer, num: usize, rng: &mut impl Rng) -> PixelBuffer {
    if pixels.is_empty() {
        return PixelBuffer::default();
    }

    let distribution = Uniform::new(0, pixels.len());
    (0..num).map(|_| pixels[distribution.sample(rng)]).collect()
}

/// Draws `num` pixels from `pixels` with replacement using a generator seeded with `seed`.
#[must_use]
pub fn sample(pixels: &PixelBuffer, num: usize, seed: u64) -> PixelBuffer {
    let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(seed);
    sample_with(pixels, num, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::*, Pixel};

    #[test]
    fn exact_sample_count() {
        let pixels = PixelBuffer::new(test_pixels_256());
        for num in [0, 1, 13, 256, 1000] {
            let samples = sample(&pixels, num, 7);
            assert_eq!(samples.len(), num);
            assert!(samples.iter().all(|s| pixels.contains(s)));
        }
    }

    #[test]
    fn sampling_is_with_replacement() {
        let pixels = PixelBuffer::new(vec![Pixel::new(1, 2, 3), Pixel::new(4, 5, 6)]);
        let samples = sample(&pixels, 100, 0);
        assert_eq!(samples.len(), 100);
        assert!(samples.contains(&pixels[0]) && samples.contains(&pixels[1]));
    }

    #[test]
    fn same_seed_same_sample() {
        let pixels = PixelBuffer::new(test_pixels_256());
        assert_eq!(sample(&pixels, 50, 123), sample(&pixels, 50, 123));
    }

    #[test]
    fn empty_input() {
        assert!(sample(&PixelBuffer::default(), 10, 0).is_empty());
    }

    #[test]
    fn sample_count_is_floored() {
        assert_eq!(num_samples(100, 0.05), 5);
        assert_eq!(num_samples(99, 0.05), 4);
        assert_eq!(num_samples(100, 1.0), 100);
        assert_eq!(num_samples(0, 0.5), 0);
    }
}

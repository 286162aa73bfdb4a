//! Background selection and foreground classification.

use crate::{NotescanError, Pixel, PixelBuffer};
use bitvec::vec::BitVec;

/// The brightness and saturation distances from the background
/// beyond which a pixel counts as foreground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// The minimum difference in value (brightness) for a pixel to be foreground.
    pub brightness: f64,
    /// The minimum difference in saturation for a pixel to be foreground.
    pub saturation: f64,
}

impl Thresholds {
    /// Returns whether `pixel` is different enough from `background` to be foreground.
    ///
    /// Hue is not considered, only value and saturation.
    #[must_use]
    pub fn is_foreground(&self, pixel: &Pixel, background: &Pixel) -> bool {
        let [_, ds, dv] = pixel.distance_hsv(background);
        dv >= self.brightness || ds >= self.saturation
    }
}

/// Picks the background color of `samples`: the most frequent color
/// after clearing the lowest `shift` bits of every channel.
///
/// Returns `Ok(None)` if `samples` is empty.
///
/// # Errors
/// Returns [`NotescanError::InvalidParameter`] if `shift` is `8` or more.
pub fn background_color(samples: &PixelBuffer, shift: u8) -> Result<Option<Pixel>, NotescanError> {
    Ok(samples.quantize_all(shift)?.most_frequent())
}

/// Returns a mask with a set bit for each pixel in `pixels` that is foreground
/// relative to `background`.
///
/// The mask only holds for this `background`, and must be recomputed if it changes.
#[must_use]
pub fn foreground_mask(pixels: &[Pixel], background: &Pixel, thresholds: Thresholds) -> BitVec {
    pixels
        .iter()
        .map(|pixel| thresholds.is_foreground(pixel, background))
        .collect()
}

/// Returns the pixels of `pixels` whose bit in `mask` is set.
#[must_use]
pub fn select(pixels: &[Pixel], mask: &BitVec) -> PixelBuffer {
    mask.iter_ones().map(|i| pixels[i]).collect()
}

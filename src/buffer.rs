//! Contains [`PixelBuffer`], an ordered list of [`Pixel`]s.

use crate::{Cluster, NotescanError, Pixel};
use palette::Srgb;
use std::{collections::HashMap, ops::Deref};

/// An ordered list of [`Pixel`]s making up a whole image or a sample of one.
///
/// A buffer built from an image walks the image column by column
/// (outer loop over `x`, inner loop over `y`), and converting back
/// into an image replays the same order.
///
/// Buffers are never modified in place; every transformation returns a new buffer.
///
/// # Examples
/// ```
/// # use notescan::{Pixel, PixelBuffer};
/// # use palette::Srgb;
/// # fn main() -> Result<(), notescan::NotescanError> {
/// let colors = vec![Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)];
/// let buffer = PixelBuffer::from_row_major(&colors, 2, 1)?;
/// assert_eq!(buffer.average()?, Pixel::new(128, 128, 128));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PixelBuffer(Vec<Pixel>);

impl PixelBuffer {
    /// Creates a new [`PixelBuffer`] from a list of pixels.
    #[must_use]
    pub const fn new(pixels: Vec<Pixel>) -> Self {
        Self(pixels)
    }

    /// Creates a new [`PixelBuffer`] from row-major colors (the usual raster layout),
    /// reordering them into column-major order.
    ///
    /// # Errors
    /// Returns [`NotescanError::DimensionMismatch`] if `colors.len() != width * height`.
    pub fn from_row_major(
        colors: &[Srgb<u8>],
        width: u32,
        height: u32,
    ) -> Result<Self, NotescanError> {
        check_dimensions(colors.len(), width, height)?;
        Ok(Self::from_fn(width, height, |x, y| {
            colors[y as usize * width as usize + x as usize]
        }))
    }

    /// Creates a new [`PixelBuffer`] by looking up the color at each `(x, y)` coordinate
    /// in column-major order.
    pub fn from_fn(width: u32, height: u32, mut color_at: impl FnMut(u32, u32) -> Srgb<u8>) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for x in 0..width {
            for y in 0..height {
                pixels.push(Pixel::from_srgb(color_at(x, y)));
            }
        }
        Self(pixels)
    }

    /// Returns the inner `Vec` of pixels.
    #[must_use]
    pub fn into_inner(self) -> Vec<Pixel> {
        self.0
    }

    /// Returns the most common exact color in the buffer,
    /// or `None` if the buffer is empty.
    ///
    /// Among colors with the same count, the one that appears first in the buffer is chosen.
    #[must_use]
    pub fn most_frequent(&self) -> Option<Pixel> {
        let mut counts = HashMap::<u32, (u32, usize)>::new();
        for (i, pixel) in self.0.iter().enumerate() {
            counts.entry(pixel.packed()).or_insert((0, i)).0 += 1;
        }

        counts
            .into_iter()
            .max_by(|(_, (a, first_a)), (_, (b, first_b))| {
                a.cmp(b).then_with(|| first_b.cmp(first_a))
            })
            .map(|(key, _)| Pixel::unpacked(key))
    }

    /// Clears the lowest `shift` bits of each pixel's channels.
    ///
    /// # Errors
    /// Returns [`NotescanError::InvalidParameter`] if `shift` is `8` or more.
    pub fn quantize_all(&self, shift: u8) -> Result<Self, NotescanError> {
        self.0.iter().map(|pixel| pixel.quantize(shift)).collect()
    }

    /// Returns the mean color of the buffer, rounding each channel to the nearest integer.
    ///
    /// # Errors
    /// Returns [`NotescanError::EmptyInput`] if the buffer is empty.
    pub fn average(&self) -> Result<Pixel, NotescanError> {
        Pixel::average(&self.0)
    }

    /// Returns a copy of the buffer ordered from darkest to brightest by the sum of the RGB channels.
    #[must_use]
    pub fn sort_by_brightness(&self) -> Self {
        let mut pixels = self.0.clone();
        pixels.sort_by_key(|pixel| pixel.components().into_iter().map(u32::from).sum::<u32>());
        Self(pixels)
    }

    /// Reorders the column-major pixels back into row-major colors.
    ///
    /// # Errors
    /// Returns [`NotescanError::DimensionMismatch`] if `len() != width * height`.
    pub fn to_row_major(&self, width: u32, height: u32) -> Result<Vec<Srgb<u8>>, NotescanError> {
        check_dimensions(self.0.len(), width, height)?;
        let (width, height) = (width as usize, height as usize);
        let mut colors = vec![Srgb::new(0, 0, 0); self.0.len()];
        for (i, pixel) in self.0.iter().enumerate() {
            let (x, y) = (i / height, i % height);
            colors[y * width + x] = pixel.rgb();
        }
        Ok(colors)
    }
}

/// Ensures `len` pixels fill exactly a `width` by `height` image.
pub(crate) fn check_dimensions(len: usize, width: u32, height: u32) -> Result<(), NotescanError> {
    if len == width as usize * height as usize {
        Ok(())
    } else {
        Err(NotescanError::DimensionMismatch { len, width, height })
    }
}

impl Deref for PixelBuffer {
    type Target = [Pixel];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[Pixel]> for PixelBuffer {
    fn as_ref(&self) -> &[Pixel] {
        self
    }
}

impl From<Vec<Pixel>> for PixelBuffer {
    fn from(pixels: Vec<Pixel>) -> Self {
        Self(pixels)
    }
}

impl From<PixelBuffer> for Vec<Pixel> {
    fn from(buffer: PixelBuffer) -> Self {
        buffer.into_inner()
    }
}

impl FromIterator<Pixel> for PixelBuffer {
    fn from_iter<I: IntoIterator<Item = Pixel>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Pixel> for PixelBuffer {
    fn extend<I: IntoIterator<Item = Pixel>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a PixelBuffer {
    type Item = &'a Pixel;
    type IntoIter = std::slice::Iter<'a, Pixel>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn most_frequent_picks_majority() {
        let buffer = PixelBuffer::new(vec![
            Pixel::new(1, 1, 1),
            Pixel::new(2, 2, 2),
            Pixel::new(2, 2, 2),
            Pixel::new(3, 3, 3),
        ]);
        assert_eq!(buffer.most_frequent(), Some(Pixel::new(2, 2, 2)));
        assert_eq!(PixelBuffer::default().most_frequent(), None);
    }

    #[test]
    fn most_frequent_tie_goes_to_first_seen() {
        let a = Pixel::new(10, 0, 0);
        let b = Pixel::new(0, 10, 0);
        let buffer = PixelBuffer::new(vec![a, b, b, a, Pixel::new(0, 0, 10)]);
        assert_eq!(buffer.most_frequent(), Some(a));

        let buffer = PixelBuffer::new(vec![b, a, a, b]);
        assert_eq!(buffer.most_frequent(), Some(b));
    }

    #[test]
    fn quantize_all_is_idempotent() {
        let buffer = PixelBuffer::new(test_pixels_256());
        for shift in 0..8 {
            let once = buffer.quantize_all(shift).unwrap();
            assert_eq!(once.len(), buffer.len());
            assert_eq!(once.quantize_all(shift).unwrap(), once);
        }
    }

    #[test]
    fn quantize_all_propagates_invalid_shift() {
        let buffer = PixelBuffer::new(test_pixels_256());
        assert!(matches!(
            buffer.quantize_all(8),
            Err(NotescanError::InvalidParameter { .. })
        ));
        // even an empty buffer has nothing to report, so it succeeds
        assert!(PixelBuffer::default().quantize_all(2).is_ok());
    }

    #[test]
    fn average_single_and_empty() {
        let pixel = Pixel::new(12, 34, 56);
        assert_eq!(PixelBuffer::new(vec![pixel]).average().unwrap(), pixel);
        assert!(matches!(
            PixelBuffer::default().average(),
            Err(NotescanError::EmptyInput)
        ));
    }

    #[test]
    fn row_major_round_trip() {
        let (width, height) = (7, 5);
        let colors = test_data_srgb(width * height);
        let buffer = PixelBuffer::from_row_major(&colors, width, height).unwrap();

        // column-major: the second pixel is directly below the first
        assert_eq!(buffer[1].rgb(), colors[width as usize]);
        assert_eq!(buffer.to_row_major(width, height).unwrap(), colors);
    }

    #[test]
    fn dimension_mismatch() {
        let colors = test_data_srgb(10);
        assert!(matches!(
            PixelBuffer::from_row_major(&colors, 3, 3),
            Err(NotescanError::DimensionMismatch { len: 10, width: 3, height: 3 })
        ));

        let buffer = PixelBuffer::from_row_major(&colors, 5, 2).unwrap();
        assert!(buffer.to_row_major(2, 4).is_err());
    }

    #[test]
    fn sort_by_brightness_orders_by_channel_sum() {
        let buffer = PixelBuffer::new(vec![
            Pixel::new(255, 255, 255),
            Pixel::new(0, 0, 0),
            Pixel::new(100, 0, 0),
        ]);
        let sorted = buffer.sort_by_brightness();
        assert_eq!(
            sorted.into_inner(),
            vec![Pixel::new(0, 0, 0), Pixel::new(100, 0, 0), Pixel::new(255, 255, 255)]
        );
    }
}

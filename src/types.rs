//! Contains various types needed across the crate.

use crate::{Pixel, PixelBuffer};
use palette::Srgb;
use std::{
    error::Error,
    fmt::{Debug, Display},
};

/// An error type for when the length of an input (e.g., `Vec` or slice)
/// is above the maximum supported value.
///
/// The inner value is the maximum supported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AboveMaxLen<T>(pub T);

impl<T: Display> Display for AboveMaxLen<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "above the maximum length of {}", self.0)
    }
}

impl<T: Debug + Display> Error for AboveMaxLen<T> {}

/// The error type for every fallible operation in this crate.
#[derive(Debug, thiserror::Error)]
pub enum NotescanError {
    /// A tunable or argument was outside of its supported range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// The name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// An average was requested over zero pixels.
    #[error("cannot average an empty set of pixels")]
    EmptyInput,

    /// The input image stores its pixels in a layout that is not supported.
    #[error("unsupported color format: {0}")]
    UnsupportedColorFormat(String),

    /// Indexed output was requested without a palette to index into.
    #[error("no palette is available for indexed output")]
    PaletteUnavailable,

    /// The number of pixels does not match the given image dimensions.
    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        /// The number of pixels provided.
        len: usize,
        /// The requested width.
        width: u32,
        /// The requested height.
        height: u32,
    },

    /// Decoding or encoding through the `image` crate failed.
    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// Writing an indexed PNG failed.
    #[cfg(feature = "image")]
    #[error(transparent)]
    PngEncoding(#[from] png::EncodingError),

    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The learned colors of a document: one background color and the foreground ink colors.
///
/// The foreground colors keep the order in which k-means produced them.
/// Some of them may never have attracted a pixel and can therefore be unused in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// The color of the page.
    pub background: Pixel,
    /// The learned foreground colors.
    pub foreground: Vec<Pixel>,
}

impl Palette {
    /// Returns the total number of colors, including the background.
    #[must_use]
    pub fn len(&self) -> usize {
        self.foreground.len() + 1
    }

    /// Always `false`, since a palette has at least a background color.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the palette as a list of colors with the background first.
    #[must_use]
    pub fn colors(&self) -> Vec<Srgb<u8>> {
        std::iter::once(&self.background)
            .chain(&self.foreground)
            .map(Pixel::rgb)
            .collect()
    }

    /// Returns the color for the given palette index, where `0` is the background.
    #[must_use]
    pub fn get(&self, index: u8) -> Option<&Pixel> {
        match index {
            0 => Some(&self.background),
            i => self.foreground.get(usize::from(i) - 1),
        }
    }
}

/// The result of shrinking an image.
///
/// Holds the palette used alongside the remapped pixels, so that nothing has to be
/// stashed elsewhere between learning the palette and encoding the output.
#[derive(Debug, Clone)]
pub struct ShrinkOutput {
    /// The palette that every output pixel was mapped to.
    pub palette: Palette,
    /// The remapped pixels, in the same column-major order as the input buffer.
    pub pixels: PixelBuffer,
    /// An index into `palette` for each of `pixels` (`0` is the background).
    pub indices: Vec<u8>,
    /// The width of the image.
    pub width: u32,
    /// The height of the image.
    pub height: u32,
}

impl ShrinkOutput {
    /// Returns the palette colors (background first) and a palette index per pixel
    /// in row-major order, ready for an indexed encoder.
    #[must_use]
    pub fn indexed_palette(&self) -> (Vec<Srgb<u8>>, Vec<u8>) {
        let (width, height) = (self.width as usize, self.height as usize);
        let mut row_major = vec![0; self.indices.len()];
        for (i, &index) in self.indices.iter().enumerate() {
            let (x, y) = (i / height, i % height);
            row_major[y * width + x] = index;
        }
        (self.palette.colors(), row_major)
    }

    /// Returns the number of distinct colors actually present in the output.
    #[must_use]
    pub fn num_distinct_colors(&self) -> usize {
        let mut used = vec![false; self.palette.len()];
        for &i in &self.indices {
            used[usize::from(i)] = true;
        }
        // distinct palette entries may still share a color
        let mut colors = used
            .iter()
            .enumerate()
            .filter(|&(_, &u)| u)
            .filter_map(|(i, _)| u8::try_from(i).ok())
            .filter_map(|i| self.palette.get(i).map(Pixel::packed))
            .collect::<Vec<_>>();
        colors.sort_unstable();
        colors.dedup();
        colors.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn palette() -> Palette {
        Palette {
            background: Pixel::new(250, 250, 250),
            foreground: vec![Pixel::new(255, 0, 0), Pixel::new(0, 0, 255)],
        }
    }

    #[test]
    fn palette_lists_background_first() {
        let palette = palette();
        assert_eq!(palette.len(), 3);
        assert_eq!(
            palette.colors(),
            vec![
                Srgb::new(250, 250, 250),
                Srgb::new(255, 0, 0),
                Srgb::new(0, 0, 255)
            ]
        );
        assert_eq!(palette.get(0), Some(&Pixel::new(250, 250, 250)));
        assert_eq!(palette.get(2), Some(&Pixel::new(0, 0, 255)));
        assert_eq!(palette.get(3), None);
    }

    #[test]
    fn indices_are_reordered_row_major() {
        let palette = palette();
        // 3 columns x 2 rows, column-major: (0,0) (0,1) (1,0) (1,1) (2,0) (2,1)
        let indices = vec![0, 1, 2, 0, 1, 2];
        let pixels = indices
            .iter()
            .map(|&i| *palette.get(i).unwrap())
            .collect::<PixelBuffer>();

        let output = ShrinkOutput { palette, pixels, indices, width: 3, height: 2 };
        let (colors, row_major) = output.indexed_palette();
        assert_eq!(colors.len(), 3);
        assert_eq!(row_major, vec![0, 2, 1, 1, 0, 2]);
        assert_eq!(output.num_distinct_colors(), 3);
    }

    #[test]
    fn error_messages() {
        let error = NotescanError::InvalidParameter {
            name: "shift",
            reason: "must be less than 8, got 8".to_owned(),
        };
        assert_eq!(error.to_string(), "invalid parameter `shift`: must be less than 8, got 8");
        assert_eq!(
            NotescanError::DimensionMismatch { len: 3, width: 2, height: 2 }.to_string(),
            "pixel buffer length 3 does not match dimensions 2x2"
        );
    }
}

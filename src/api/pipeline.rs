//! Contains the [`ShrinkPipeline`] builder struct for the high level API.

use crate::{
    apply::apply,
    buffer::check_dimensions,
    classify::{background_color, foreground_mask, select},
    kmeans,
    sample::{num_samples, sample},
    NotescanError, Palette, PixelBuffer, ShrinkOptions, ShrinkOutput,
};

/// A builder struct to learn a palette from an image and remap the image onto it.
///
/// # Examples
/// ```
/// # use notescan::{ShrinkPipeline, ShrinkOptions, PixelBuffer};
/// # use palette::Srgb;
/// # fn main() -> Result<(), notescan::NotescanError> {
/// let (width, height) = (20, 10);
/// let pixels = PixelBuffer::from_fn(width, height, |x, _| {
///     if x < 3 { Srgb::new(20, 20, 160) } else { Srgb::new(240, 240, 236) }
/// });
///
/// let output = ShrinkPipeline::new(pixels, width, height)?
///     .options(ShrinkOptions::new().sampling_rate(0.5).seed(1))
///     .shrink()?;
///
/// assert_eq!(output.palette.len(), 6);
/// assert!(output.num_distinct_colors() <= 6);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ShrinkPipeline {
    /// The input image in column-major order.
    pub(crate) pixels: PixelBuffer,
    /// The dimensions of the image.
    pub(crate) dimensions: (u32, u32),
    /// The tunables for the conversion.
    pub(crate) options: ShrinkOptions,
}

impl ShrinkPipeline {
    /// Creates a new [`ShrinkPipeline`] with default options.
    ///
    /// # Errors
    /// Returns [`NotescanError::DimensionMismatch`] if `pixels.len() != width * height`.
    pub fn new(pixels: PixelBuffer, width: u32, height: u32) -> Result<Self, NotescanError> {
        check_dimensions(pixels.len(), width, height)?;
        Ok(Self {
            pixels,
            dimensions: (width, height),
            options: ShrinkOptions::default(),
        })
    }

    /// Sets all of the tunables at once.
    pub fn options(&mut self, options: ShrinkOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Sets the seed value for the random number generator.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.options = self.options.seed(seed);
        self
    }

    /// Returns the input pixels.
    #[must_use]
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Returns the width and height of the image.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    /// Learns the palette of the image from a random sample of its pixels.
    ///
    /// # Errors
    /// Returns [`NotescanError::InvalidParameter`] if the options are invalid,
    /// or [`NotescanError::EmptyInput`] if the sample contains no pixels.
    pub fn palette(&self) -> Result<Palette, NotescanError> {
        let options = &self.options;
        options.validate()?;

        let seed = options.get_seed().unwrap_or_else(rand::random);
        let num = num_samples(self.pixels.len(), options.get_sampling_rate());
        let samples = sample(&self.pixels, num, seed);
        tracing::debug!(pixels = self.pixels.len(), samples = samples.len(), seed, "sampled");

        let background =
            background_color(&samples, options.get_shift())?.ok_or(NotescanError::EmptyInput)?;
        tracing::debug!(%background, "selected background");

        let mask = foreground_mask(&samples, &background, options.thresholds());
        let foreground = select(&samples, &mask);
        tracing::debug!(foreground = foreground.len(), "classified sample");

        let result = kmeans::palette(
            &foreground,
            options.num_foreground_colors(),
            options.get_kmeans_iterations(),
        );
        tracing::debug!(
            iterations = result.iterations,
            converged = result.converged,
            counts = ?result.counts,
            "learned foreground colors"
        );

        Ok(Palette {
            background,
            foreground: result.centroids,
        })
    }

    /// Learns the palette of the image and remaps every pixel onto it.
    ///
    /// # Errors
    /// See [`ShrinkPipeline::palette`].
    pub fn shrink(&self) -> Result<ShrinkOutput, NotescanError> {
        let palette = self.palette()?;
        Ok(self.shrink_with(palette))
    }

    /// Remaps every pixel onto an already learned `palette`.
    #[must_use]
    pub fn shrink_with(&self, palette: Palette) -> ShrinkOutput {
        let (pixels, indices) = apply(&self.pixels, &palette, self.options.thresholds());
        let (width, height) = self.dimensions;
        ShrinkOutput { palette, pixels, indices, width, height }
    }
}

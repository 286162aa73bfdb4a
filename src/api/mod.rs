//! Contains the types and functions for the high level pipeline builder API.

mod batch;
mod pipeline;

pub use batch::shrink_all;
#[cfg(feature = "threads")]
pub use batch::shrink_all_par;
pub use pipeline::ShrinkPipeline;

use crate::{classify::Thresholds, pixel::CHANNEL_BITS, NotescanError, MAX_COLORS};

/// A builder struct holding the tunables of a conversion.
///
/// # Examples
/// ```
/// # use notescan::ShrinkOptions;
/// let options = ShrinkOptions::new()
///     .sampling_rate(0.1)
///     .foreground_num(8)
///     .seed(42);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShrinkOptions {
    /// The proportion of the image's pixels to sample when learning the palette.
    sampling_rate: f64,
    /// The minimum value (brightness) difference from the background for foreground pixels.
    brightness: f64,
    /// The minimum saturation difference from the background for foreground pixels.
    saturation: f64,
    /// The number of low bits to clear in each channel before picking the background.
    shift: u8,
    /// The total number of palette colors, including the background.
    foreground_num: u16,
    /// The maximum number of k-means rounds.
    kmeans_iterations: u32,
    /// The seed value for the random number generator.
    seed: Option<u64>,
}

impl Default for ShrinkOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ShrinkOptions {
    /// The default sampling rate, `0.05`.
    pub const DEFAULT_SAMPLING_RATE: f64 = 0.05;
    /// The default brightness threshold, `0.30`.
    pub const DEFAULT_BRIGHTNESS: f64 = 0.30;
    /// The default saturation threshold, `0.20`.
    pub const DEFAULT_SATURATION: f64 = 0.20;
    /// The default background quantization shift, `2`.
    pub const DEFAULT_SHIFT: u8 = 2;
    /// The default number of palette colors, `6`.
    pub const DEFAULT_FOREGROUND_NUM: u16 = 6;
    /// The default cap on k-means rounds, `40`.
    pub const DEFAULT_KMEANS_ITERATIONS: u32 = 40;

    /// Creates a new [`ShrinkOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sampling_rate: Self::DEFAULT_SAMPLING_RATE,
            brightness: Self::DEFAULT_BRIGHTNESS,
            saturation: Self::DEFAULT_SATURATION,
            shift: Self::DEFAULT_SHIFT,
            foreground_num: Self::DEFAULT_FOREGROUND_NUM,
            kmeans_iterations: Self::DEFAULT_KMEANS_ITERATIONS,
            seed: None,
        }
    }

    /// Sets the proportion of pixels to sample, in `(0.0, 1.0]`.
    ///
    /// Sampling is done with replacement, so a rate of `1.0` does not visit every pixel exactly once.
    #[must_use]
    pub fn sampling_rate(mut self, sampling_rate: f64) -> Self {
        self.sampling_rate = sampling_rate;
        self
    }

    /// Sets the value (brightness) threshold for foreground pixels.
    #[must_use]
    pub fn brightness(mut self, brightness: f64) -> Self {
        self.brightness = brightness;
        self
    }

    /// Sets the saturation threshold for foreground pixels.
    #[must_use]
    pub fn saturation(mut self, saturation: f64) -> Self {
        self.saturation = saturation;
        self
    }

    /// Sets how many low bits of each channel are cleared before picking the background color.
    /// Must be less than `8`.
    #[must_use]
    pub fn shift(mut self, shift: u8) -> Self {
        self.shift = shift;
        self
    }

    /// Sets the total number of output colors, including the background.
    /// Must be in `2..=256`.
    #[must_use]
    pub fn foreground_num(mut self, foreground_num: u16) -> Self {
        self.foreground_num = foreground_num;
        self
    }

    /// Sets the maximum number of k-means rounds.
    #[must_use]
    pub fn kmeans_iterations(mut self, kmeans_iterations: u32) -> Self {
        self.kmeans_iterations = kmeans_iterations;
        self
    }

    /// Sets the seed value for the random number generator.
    ///
    /// By default, a new random seed is used for each conversion.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the sampling rate.
    #[must_use]
    pub const fn get_sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    /// Returns the background quantization shift.
    #[must_use]
    pub const fn get_shift(&self) -> u8 {
        self.shift
    }

    /// Returns the total number of output colors.
    #[must_use]
    pub const fn get_foreground_num(&self) -> u16 {
        self.foreground_num
    }

    /// Returns the maximum number of k-means rounds.
    #[must_use]
    pub const fn get_kmeans_iterations(&self) -> u32 {
        self.kmeans_iterations
    }

    /// Returns the configured seed, if any.
    #[must_use]
    pub const fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the foreground classification thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> Thresholds {
        Thresholds {
            brightness: self.brightness,
            saturation: self.saturation,
        }
    }

    /// Returns the number of foreground colors k-means should learn.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn num_foreground_colors(&self) -> u8 {
        // validate ensures foreground_num is in 2..=256
        self.foreground_num.saturating_sub(1).min(u16::from(u8::MAX)) as u8
    }

    /// Checks that every tunable is within its supported range.
    ///
    /// # Errors
    /// Returns [`NotescanError::InvalidParameter`] naming the first offending tunable.
    pub fn validate(&self) -> Result<(), NotescanError> {
        fn invalid(name: &'static str, reason: String) -> Result<(), NotescanError> {
            Err(NotescanError::InvalidParameter { name, reason })
        }

        if self.shift >= CHANNEL_BITS {
            return invalid(
                "shift",
                format!("must be less than {CHANNEL_BITS}, got {}", self.shift),
            );
        }
        if !(self.sampling_rate > 0.0 && self.sampling_rate <= 1.0) {
            return invalid(
                "sampling_rate",
                format!("must be in (0, 1], got {}", self.sampling_rate),
            );
        }
        if !(2..=MAX_COLORS).contains(&self.foreground_num) {
            return invalid(
                "foreground_num",
                format!("must be in 2..={MAX_COLORS}, got {}", self.foreground_num),
            );
        }
        for (name, value) in [("brightness", self.brightness), ("saturation", self.saturation)] {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(name, format!("must be a non-negative number, got {value}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = ShrinkOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.get_shift(), 2);
        assert_eq!(options.get_foreground_num(), 6);
        assert_eq!(options.get_kmeans_iterations(), 40);
        assert_eq!(options.get_seed(), None);
        assert_eq!(options.num_foreground_colors(), 5);
    }

    #[test]
    fn rejects_out_of_range_tunables() {
        let cases = [
            (ShrinkOptions::new().shift(8), "shift"),
            (ShrinkOptions::new().sampling_rate(0.0), "sampling_rate"),
            (ShrinkOptions::new().sampling_rate(1.5), "sampling_rate"),
            (ShrinkOptions::new().sampling_rate(f64::NAN), "sampling_rate"),
            (ShrinkOptions::new().foreground_num(1), "foreground_num"),
            (ShrinkOptions::new().foreground_num(257), "foreground_num"),
            (ShrinkOptions::new().brightness(-0.1), "brightness"),
            (ShrinkOptions::new().saturation(f64::INFINITY), "saturation"),
        ];

        for (options, expected) in cases {
            match options.validate() {
                Err(NotescanError::InvalidParameter { name, .. }) => assert_eq!(name, expected),
                other => panic!("expected {expected} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn accepts_range_limits() {
        assert!(ShrinkOptions::new().shift(7).validate().is_ok());
        assert!(ShrinkOptions::new().shift(0).validate().is_ok());
        assert!(ShrinkOptions::new().sampling_rate(1.0).validate().is_ok());
        assert!(ShrinkOptions::new().foreground_num(2).validate().is_ok());
        assert_eq!(ShrinkOptions::new().foreground_num(256).num_foreground_colors(), 255);
    }
}

//! Contains [`Pixel`], a single color kept in both RGB and HSV form.

use crate::{Cluster, NotescanError};
use palette::{encoding, FromColor, Hsv, Srgb};
use std::fmt::Display;

/// The number of bits in each color channel. A quantization shift must be strictly less than this.
pub const CHANNEL_BITS: u8 = 8;

/// A single color in both RGB and HSV coordinates.
///
/// The HSV coordinates are always derived from the RGB channels when the [`Pixel`] is created,
/// so the two representations never disagree. Hue, saturation and value all lie in `0.0..=1.0`
/// (hue is in `0.0..1.0`).
///
/// # Examples
/// ```
/// # use notescan::Pixel;
/// let red = Pixel::new(255, 0, 0);
/// assert_eq!(red.hsv(), [0.0, 1.0, 1.0]);
///
/// let also_red = Pixel::from_hsv(0.0, 1.0, 1.0);
/// assert_eq!(red, also_red);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    /// The color channels.
    rgb: Srgb<u8>,
    /// Hue, saturation and value derived from `rgb`.
    hsv: [f64; 3],
}

impl Pixel {
    /// Creates a new [`Pixel`] from its red, green, and blue channels.
    #[must_use]
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self::from_srgb(Srgb::new(red, green, blue))
    }

    /// Creates a new [`Pixel`] from an [`Srgb`] color.
    #[must_use]
    pub fn from_srgb(rgb: Srgb<u8>) -> Self {
        let hsv = Hsv::<encoding::Srgb, f64>::from_color(rgb.into_format::<f64>());
        let hue = hsv.hue.into_positive_degrees() / 360.0;
        // into_positive_degrees may round up to exactly 360 for hues just below zero
        let hue = if hue >= 1.0 { 0.0 } else { hue };
        Self {
            rgb,
            hsv: [hue, hsv.saturation, hsv.value],
        }
    }

    /// Creates a new [`Pixel`] from hue, saturation, and value, each in `0.0..=1.0`.
    ///
    /// The HSV input is converted to rounded RGB channels first,
    /// and the stored HSV is then derived back from those channels.
    /// A hue of `1.0` is treated as 359 degrees rather than wrapping around to red.
    #[must_use]
    pub fn from_hsv(hue: f64, saturation: f64, value: f64) -> Self {
        let degrees = (hue * 360.0).min(359.0);
        let sector = degrees / 60.0;

        let c = value * saturation;
        let x = c * (1.0 - ((sector % 2.0) - 1.0).abs());

        let (r, g, b) = match sector {
            s if s < 1.0 => (c, x, 0.0),
            s if s < 2.0 => (x, c, 0.0),
            s if s < 3.0 => (0.0, c, x),
            s if s < 4.0 => (0.0, x, c),
            s if s < 5.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let m = value - c;
        Self::from_srgb(Srgb::new(
            round_channel((r + m) * 255.0),
            round_channel((g + m) * 255.0),
            round_channel((b + m) * 255.0),
        ))
    }

    /// Creates a new [`Pixel`] from floating point RGB channels in `0.0..=255.0`.
    #[must_use]
    pub fn from_f64_rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::new(round_channel(red), round_channel(green), round_channel(blue))
    }

    /// Returns the RGB channels as an [`Srgb`] color.
    #[must_use]
    pub const fn rgb(&self) -> Srgb<u8> {
        self.rgb
    }

    /// Returns the RGB channels as an array.
    #[must_use]
    pub fn components(&self) -> [u8; 3] {
        let Srgb { red, green, blue, .. } = self.rgb;
        [red, green, blue]
    }

    /// Returns hue, saturation, and value (in that order).
    #[must_use]
    pub const fn hsv(&self) -> [f64; 3] {
        self.hsv
    }

    /// Packs the RGB channels into a single 24-bit key.
    #[must_use]
    pub fn packed(&self) -> u32 {
        let [r, g, b] = self.components();
        u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b)
    }

    /// Restores a [`Pixel`] from a key created by [`Pixel::packed`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn unpacked(key: u32) -> Self {
        Self::new((key >> 16) as u8, (key >> 8) as u8, key as u8)
    }

    /// Returns the per-channel absolute differences in hue, saturation, and value.
    ///
    /// These are three independent distances, not a combined metric.
    #[must_use]
    pub fn distance_hsv(&self, other: &Self) -> [f64; 3] {
        let [h1, s1, v1] = self.hsv;
        let [h2, s2, v2] = other.hsv;
        [(h1 - h2).abs(), (s1 - s2).abs(), (v1 - v2).abs()]
    }

    /// Returns the squared euclidean distance between the RGB channels of two pixels.
    #[must_use]
    pub fn distance_rgb(&self, other: &Self) -> u32 {
        self.components()
            .into_iter()
            .zip(other.components())
            .map(|(a, b)| {
                let d = u32::from(a.abs_diff(b));
                d * d
            })
            .sum()
    }

    /// Clears the lowest `shift` bits of each channel.
    ///
    /// # Errors
    /// Returns [`NotescanError::InvalidParameter`] if `shift` is `8` or more,
    /// since that would clear every bit.
    pub fn quantize(&self, shift: u8) -> Result<Self, NotescanError> {
        if shift >= CHANNEL_BITS {
            return Err(NotescanError::InvalidParameter {
                name: "shift",
                reason: format!("must be less than {CHANNEL_BITS}, got {shift}"),
            });
        }
        let [r, g, b] = self.components().map(|c| (c >> shift) << shift);
        Ok(Self::new(r, g, b))
    }
}

impl From<Srgb<u8>> for Pixel {
    fn from(rgb: Srgb<u8>) -> Self {
        Self::from_srgb(rgb)
    }
}

impl From<Pixel> for Srgb<u8> {
    fn from(pixel: Pixel) -> Self {
        pixel.rgb
    }
}

impl Display for Pixel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b] = self.components();
        let [h, s, v] = self.hsv;
        write!(f, "R[{r}]G[{g}]B[{b}] = H[{h:.6}]S[{s:.6}]V[{v:.6}]")
    }
}

impl Cluster for Pixel {
    fn distance(&self, other: &Self) -> f64 {
        f64::from(self.distance_rgb(other))
    }

    fn average(members: &[Self]) -> Result<Self, NotescanError> {
        if members.is_empty() {
            return Err(NotescanError::EmptyInput);
        }

        let mut sum = [0u64; 3];
        for pixel in members {
            for (s, c) in sum.iter_mut().zip(pixel.components()) {
                *s += u64::from(c);
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let [r, g, b] = sum.map(|s| s as f64 / members.len() as f64);
        Ok(Self::from_f64_rgb(r, g, b))
    }
}

/// Rounds a floating point channel half-up, saturating at `0` and `255`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_channel(value: f64) -> u8 {
    if value >= 255.0 {
        u8::MAX
    } else {
        // `as` saturates negative values and NaN to 0
        (value + 0.5).floor() as u8
    }
}

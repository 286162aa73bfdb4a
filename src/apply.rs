//! Remapping every pixel of an image onto a learned [`Palette`].

use crate::{classify::Thresholds, traits::closest, Palette, Pixel, PixelBuffer};

/// Maps each of `pixels` onto `palette`, returning the new pixels and their palette indices.
///
/// Every pixel is classified against the palette's background afresh.
/// Background pixels become exactly the background color (index `0`),
/// and foreground pixels become the nearest foreground color by RGB distance.
/// If the palette has no foreground colors, every pixel becomes background.
#[must_use]
pub fn apply(pixels: &[Pixel], palette: &Palette, thresholds: Thresholds) -> (PixelBuffer, Vec<u8>) {
    let Palette { background, foreground } = palette;

    pixels
        .iter()
        .map(|pixel| {
            let nearest = if thresholds.is_foreground(pixel, background) {
                closest(pixel, foreground)
            } else {
                None
            };

            match nearest {
                #[allow(clippy::cast_possible_truncation)]
                Some(i) => (foreground[i], (i + 1) as u8),
                None => (*background, 0),
            }
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;
    use palette::Srgb;

    const THRESHOLDS: Thresholds = Thresholds { brightness: 0.3, saturation: 0.2 };

    #[test]
    fn all_background_image() {
        let paper = Pixel::new(240, 240, 235);
        let pixels = PixelBuffer::new(vec![
            paper,
            Pixel::new(238, 241, 236),
            Pixel::new(250, 250, 250),
            Pixel::new(220, 222, 221),
        ]);
        let palette = Palette {
            background: paper,
            foreground: vec![Pixel::new(0, 0, 0), Pixel::new(255, 0, 0)],
        };

        let (output, indices) = apply(&pixels, &palette, THRESHOLDS);
        assert!(output.iter().all(|&p| p == paper));
        assert!(indices.iter().all(|&i| i == 0));
    }

    #[test]
    fn foreground_maps_to_nearest_center() {
        let paper = Srgb::new(200, 200, 200);
        let pixels = two_tone_image(paper, Srgb::new(230, 20, 30));
        let red = Pixel::new(255, 0, 0);
        let palette = Palette {
            background: Pixel::from(paper),
            foreground: vec![Pixel::new(0, 0, 255), red],
        };

        let (output, indices) = apply(&pixels, &palette, THRESHOLDS);
        assert_eq!(output.len(), pixels.len());
        assert_eq!(output.iter().filter(|&&p| p == red).count(), 20);
        assert_eq!(indices.iter().filter(|&&i| i == 2).count(), 20);
        assert_eq!(indices.iter().filter(|&&i| i == 0).count(), 80);
    }

    #[test]
    fn no_foreground_colors() {
        let pixels = two_tone_image(Srgb::new(200, 200, 200), Srgb::new(0, 0, 0));
        let palette = Palette { background: Pixel::new(200, 200, 200), foreground: Vec::new() };
        let (output, indices) = apply(&pixels, &palette, THRESHOLDS);
        assert!(output.iter().all(|&p| p == palette.background));
        assert!(indices.iter().all(|&i| i == 0));
    }
}

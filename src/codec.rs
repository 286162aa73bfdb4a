//! Integration with the `image` crate: decoding into [`PixelBuffer`]s and encoding results as PNG.

use crate::{
    buffer::check_dimensions, NotescanError, PixelBuffer, ShrinkOutput, ShrinkPipeline, MAX_K,
};
use image::{
    codecs::png::{CompressionType, FilterType, PngEncoder},
    DynamicImage, ExtendedColorType, ImageEncoder, Rgb, RgbImage,
};
use palette::Srgb;
use std::{fs::File, io::BufWriter, io::Write, path::Path};

/// The maximum number of colors [`PixelBuffer::preview`] will lay out.
pub const MAX_PREVIEW_COLORS: usize = 20;

impl From<&RgbImage> for PixelBuffer {
    fn from(image: &RgbImage) -> Self {
        Self::from_fn(image.width(), image.height(), |x, y| {
            let Rgb([r, g, b]) = *image.get_pixel(x, y);
            Srgb::new(r, g, b)
        })
    }
}

impl TryFrom<&DynamicImage> for PixelBuffer {
    type Error = NotescanError;

    /// Converts an image with 8-bit channels, dropping any alpha channel.
    ///
    /// Grayscale images are expanded to RGB.
    fn try_from(image: &DynamicImage) -> Result<Self, Self::Error> {
        match image {
            DynamicImage::ImageRgb8(rgb) => Ok(Self::from(rgb)),
            DynamicImage::ImageRgba8(_)
            | DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_) => Ok(Self::from(&image.to_rgb8())),
            other => Err(NotescanError::UnsupportedColorFormat(format!(
                "{:?}",
                other.color()
            ))),
        }
    }
}

impl PixelBuffer {
    /// Rebuilds an image from the buffer, replaying the column-major order it was built in.
    ///
    /// # Errors
    /// Returns [`NotescanError::DimensionMismatch`] if `len() != width * height`.
    pub fn to_image(&self, width: u32, height: u32) -> Result<RgbImage, NotescanError> {
        check_dimensions(self.len(), width, height)?;
        let mut image = RgbImage::new(width, height);
        let mut pixels = self.iter();
        for x in 0..width {
            for y in 0..height {
                if let Some(pixel) = pixels.next() {
                    image.put_pixel(x, y, Rgb(pixel.components()));
                }
            }
        }
        Ok(image)
    }

    /// Lays out the buffer as a single row strip, one pixel per color.
    ///
    /// # Errors
    /// Returns [`NotescanError::InvalidParameter`] if the buffer holds more than
    /// [`MAX_PREVIEW_COLORS`] pixels.
    pub fn preview(&self) -> Result<RgbImage, NotescanError> {
        if self.len() > MAX_PREVIEW_COLORS {
            return Err(NotescanError::InvalidParameter {
                name: "preview",
                reason: format!(
                    "at most {MAX_PREVIEW_COLORS} colors are supported, got {}",
                    self.len()
                ),
            });
        }
        #[allow(clippy::cast_possible_truncation)]
        let width = self.len() as u32;
        self.to_image(width, 1)
    }
}

impl From<&RgbImage> for ShrinkPipeline {
    fn from(image: &RgbImage) -> Self {
        Self {
            pixels: image.into(),
            dimensions: image.dimensions(),
            options: crate::ShrinkOptions::default(),
        }
    }
}

impl TryFrom<&DynamicImage> for ShrinkPipeline {
    type Error = NotescanError;

    fn try_from(image: &DynamicImage) -> Result<Self, Self::Error> {
        Self::new(image.try_into()?, image.width(), image.height())
    }
}

impl ShrinkPipeline {
    /// Decodes the image file at `path`.
    ///
    /// # Errors
    /// Returns [`NotescanError::Image`] if the file cannot be read or decoded,
    /// or [`NotescanError::UnsupportedColorFormat`] for images without 8-bit channels.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, NotescanError> {
        let image = image::open(path)?;
        Self::try_from(&image)
    }
}

impl ShrinkOutput {
    /// Returns the shrunk image.
    ///
    /// # Errors
    /// Returns [`NotescanError::DimensionMismatch`] if the pixels do not fill the dimensions.
    pub fn rgbimage(&self) -> Result<RgbImage, NotescanError> {
        self.pixels.to_image(self.width, self.height)
    }

    /// Encodes the shrunk image as an RGB PNG using the best compression.
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    pub fn write_png(&self, writer: impl Write) -> Result<(), NotescanError> {
        let image = self.rgbimage()?;
        PngEncoder::new_with_quality(writer, CompressionType::Best, FilterType::Adaptive)
            .write_image(image.as_raw(), self.width, self.height, ExtendedColorType::Rgb8)?;
        Ok(())
    }

    /// Encodes the shrunk image as a palette-indexed PNG with the background as the first entry.
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    pub fn write_indexed_png(&self, writer: impl Write) -> Result<(), NotescanError> {
        let (palette, indices) = self.indexed_palette();
        write_indexed_png(writer, self.width, self.height, &palette, &indices)
    }

    /// Writes the shrunk image to `path` as an RGB or palette-indexed PNG.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or encoding fails.
    pub fn save(&self, path: impl AsRef<Path>, indexed: bool) -> Result<(), NotescanError> {
        let mut writer = BufWriter::new(File::create(path)?);
        if indexed {
            self.write_indexed_png(&mut writer)?;
        } else {
            self.write_png(&mut writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Encodes row-major palette `indices` as an indexed PNG,
/// using the smallest bit depth that fits the palette.
///
/// # Errors
/// Returns [`NotescanError::PaletteUnavailable`] if `palette` is empty,
/// [`NotescanError::InvalidParameter`] if it has more than 256 colors,
/// and [`NotescanError::DimensionMismatch`] if `indices` does not fill the image.
pub fn write_indexed_png(
    writer: impl Write,
    width: u32,
    height: u32,
    palette: &[Srgb<u8>],
    indices: &[u8],
) -> Result<(), NotescanError> {
    if palette.is_empty() {
        return Err(NotescanError::PaletteUnavailable);
    }
    if palette.len() > MAX_K {
        return Err(NotescanError::InvalidParameter {
            name: "palette",
            reason: format!("at most {MAX_K} colors are supported, got {}", palette.len()),
        });
    }
    check_dimensions(indices.len(), width, height)?;

    let (depth, bits) = match palette.len() {
        0..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        5..=16 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    };
    let plte = palette
        .iter()
        .flat_map(|c| [c.red, c.green, c.blue])
        .collect::<Vec<_>>();

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(depth);
    encoder.set_compression(png::Compression::Best);
    encoder.set_palette(plte);

    let mut writer = encoder.write_header()?;
    if bits == 8 {
        writer.write_image_data(indices)?;
    } else {
        writer.write_image_data(&pack_bits(indices, width, bits))?;
    }
    writer.finish()?;
    Ok(())
}

/// Packs 8-bit indices into rows of `bits`-wide values, each row padded to a whole byte.
fn pack_bits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let per_byte = usize::from(8 / bits);
    let width = width as usize;
    let mask = (1u8 << bits) - 1;

    let mut packed = Vec::with_capacity(indices.len() / per_byte + 1);
    for row in indices.chunks(width.max(1)) {
        for chunk in row.chunks(per_byte) {
            let mut byte = 0u8;
            for (i, &index) in chunk.iter().enumerate() {
                #[allow(clippy::cast_possible_truncation)]
                let shift = 8 - bits - i as u8 * bits;
                byte |= (index & mask) << shift;
            }
            packed.push(byte);
        }
    }
    packed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{tests::*, Pixel, ShrinkOptions};

    #[test]
    fn image_round_trip_keeps_traversal_order() {
        let image = RgbImage::from_fn(5, 3, |x, y| Rgb([x as u8 * 40, y as u8 * 80, 7]));
        let buffer = PixelBuffer::from(&image);

        assert_eq!(buffer.len(), 15);
        // column-major: x changes only after every y of a column
        assert_eq!(buffer[1], Pixel::new(0, 80, 7));
        assert_eq!(buffer[3], Pixel::new(40, 0, 7));
        assert_eq!(buffer.to_image(5, 3).unwrap(), image);
        assert!(buffer.to_image(3, 5).unwrap() != image);
        assert!(buffer.to_image(4, 4).is_err());
    }

    #[test]
    fn dynamic_image_formats() {
        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(2, 2, image::Luma([9])));
        let buffer = PixelBuffer::try_from(&gray).unwrap();
        assert!(buffer.iter().all(|&p| p == Pixel::new(9, 9, 9)));

        let rgba = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            2,
            1,
            image::Rgba([1, 2, 3, 0]),
        ));
        let buffer = PixelBuffer::try_from(&rgba).unwrap();
        assert_eq!(buffer.into_inner(), vec![Pixel::new(1, 2, 3); 2]);

        let deep = DynamicImage::ImageRgb16(image::ImageBuffer::new(2, 2));
        assert!(matches!(
            PixelBuffer::try_from(&deep),
            Err(NotescanError::UnsupportedColorFormat(_))
        ));
    }

    #[test]
    fn preview_strip() {
        let buffer = PixelBuffer::new(test_pixels_256()[..5].to_vec());
        let preview = buffer.preview().unwrap();
        assert_eq!(preview.dimensions(), (5, 1));

        let buffer = PixelBuffer::new(test_pixels_256()[..21].to_vec());
        assert!(matches!(
            buffer.preview(),
            Err(NotescanError::InvalidParameter { name: "preview", .. })
        ));
    }

    #[test]
    fn bit_packing() {
        assert_eq!(pack_bits(&[1, 0, 1, 1, 0, 0, 0, 1, 1], 9, 1), vec![0b1011_0001, 0b1000_0000]);
        assert_eq!(pack_bits(&[3, 2, 1], 3, 2), vec![0b1110_0100]);
        // each row starts on a new byte
        assert_eq!(pack_bits(&[1, 2, 3, 4], 2, 4), vec![0x12, 0x34]);
    }

    #[test]
    fn indexed_png_decodes_to_same_colors() {
        let image = RgbImage::from_fn(12, 8, |x, _| {
            if x < 2 {
                Rgb([200, 30, 30])
            } else {
                Rgb([236, 236, 230])
            }
        });
        let mut pipeline = ShrinkPipeline::from(&image);
        pipeline.options(ShrinkOptions::new().sampling_rate(1.0).seed(2));
        let output = pipeline.shrink().unwrap();

        let mut rgb = Vec::new();
        output.write_png(&mut rgb).unwrap();
        let mut indexed = Vec::new();
        output.write_indexed_png(&mut indexed).unwrap();

        let expected = output.rgbimage().unwrap();
        let from_rgb = image::load_from_memory(&rgb).unwrap().to_rgb8();
        let from_indexed = image::load_from_memory(&indexed).unwrap().to_rgb8();
        assert_eq!(from_rgb, expected);
        assert_eq!(from_indexed, expected);
    }

    #[test]
    fn indexed_png_needs_a_palette() {
        let result = write_indexed_png(Vec::new(), 1, 1, &[], &[0]);
        assert!(matches!(result, Err(NotescanError::PaletteUnavailable)));

        let palette = vec![Srgb::new(0, 0, 0); 257];
        let result = write_indexed_png(Vec::new(), 1, 1, &palette, &[0]);
        assert!(matches!(result, Err(NotescanError::InvalidParameter { .. })));
    }
}

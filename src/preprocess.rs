use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use image::{ColorType, DynamicImage, GenericImageView};
use ndarray::Array4;

use crate::config::INPUT_SIZE;
use crate::error::DecodeError;

pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Turns a decoded image into the `(1, size, size, 3)` tensor the classifier
/// takes, with channel values scaled to `[0, 1]`.
#[derive(Debug)]
pub struct Preprocessor {
    size: u32,
    resize_options: ResizeOptions,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(INPUT_SIZE)
    }
}

impl Preprocessor {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            resize_options: ResizeOptions {
                algorithm: ResizeAlg::Convolution(FilterType::Bilinear),
                mul_div_alpha: false,
                ..Default::default()
            },
        }
    }

    pub fn pre_processing(&self, image: &DynamicImage) -> Result<Array4<f32>, DecodeError> {
        // Alpha is dropped and grayscale expanded so there are always three channels.
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
        let img = if rgb.dimensions() == (self.size, self.size) {
            rgb
        } else {
            let mut img = DynamicImage::new(self.size, self.size, ColorType::Rgb8);
            // Resizer needs `&mut`, one per call.
            Resizer::new().resize(&rgb, &mut img, &self.resize_options)?;
            img
        };

        let side = self.size as usize;
        let mut input = Array4::zeros((1, side, side, 3));
        for (x, y, pixel) in img.into_rgb8().enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            let [r, g, b] = pixel.0;
            input[[0, y, x, 0]] = (r as f32) / 255.;
            input[[0, y, x, 1]] = (g as f32) / 255.;
            input[[0, y, x, 2]] = (b as f32) / 255.;
        }
        Ok(input)
    }
}

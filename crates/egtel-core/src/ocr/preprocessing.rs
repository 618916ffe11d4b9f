//! Image preprocessing for OCR.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage, Luma, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::OcrError;
use crate::models::config::PreprocessConfig;

/// A named image-transform configuration applied before recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreprocessingVariant {
    /// Grayscale, upscale small images, then boost contrast, brightness and
    /// sharpness.
    Enhanced,
    /// Grayscale with a fixed threshold to pure black and white.
    Binarize,
}

impl PreprocessingVariant {
    /// Variants in the order they are tried.
    pub const ORDER: [PreprocessingVariant; 2] =
        [PreprocessingVariant::Enhanced, PreprocessingVariant::Binarize];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            PreprocessingVariant::Enhanced => "grayscale+upscale+contrast",
            PreprocessingVariant::Binarize => "threshold-binarize",
        }
    }
}

/// Image preprocessor for the OCR pipeline.
#[derive(Debug, Clone, Default)]
pub struct ImagePreprocessor {
    config: PreprocessConfig,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given preprocessing configuration.
    pub fn with_config(mut self, config: PreprocessConfig) -> Self {
        self.config = config;
        self
    }

    /// Apply a variant, returning a copy of the original image if any
    /// transform fails.
    pub fn preprocess(&self, image: &DynamicImage, variant: PreprocessingVariant) -> DynamicImage {
        match self.try_preprocess(image, variant) {
            Ok(processed) => processed,
            Err(e) => {
                warn!("Preprocessing '{}' failed, using original image: {}", variant.name(), e);
                image.clone()
            }
        }
    }

    /// Apply a variant, reporting transform failures.
    pub fn try_preprocess(
        &self,
        image: &DynamicImage,
        variant: PreprocessingVariant,
    ) -> Result<DynamicImage, OcrError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        debug!("Preprocessing {}x{} image with '{}'", width, height, variant.name());

        match variant {
            PreprocessingVariant::Enhanced => self.enhance(image),
            PreprocessingVariant::Binarize => Ok(self.binarize(image)),
        }
    }

    fn enhance(&self, image: &DynamicImage) -> Result<DynamicImage, OcrError> {
        let gray = to_grayscale(image);

        let gray = match self.upscale_dimensions(gray.width(), gray.height())? {
            Some((new_width, new_height)) => {
                debug!("Upscaling to {}x{}", new_width, new_height);
                image::imageops::resize(&gray, new_width, new_height, FilterType::Lanczos3)
            }
            None => gray,
        };

        let rgb = DynamicImage::ImageLuma8(gray).to_rgb8();
        let rgb = adjust_contrast(&rgb, self.config.contrast);
        let rgb = adjust_brightness(&rgb, self.config.brightness);
        let rgb = adjust_sharpness(&rgb, self.config.sharpness);

        Ok(DynamicImage::ImageRgb8(rgb))
    }

    fn binarize(&self, image: &DynamicImage) -> DynamicImage {
        let gray = to_grayscale(image);
        let threshold = self.config.threshold;

        let (width, height) = gray.dimensions();
        let mut result = GrayImage::new(width, height);
        for (x, y, pixel) in gray.enumerate_pixels() {
            let value = if pixel[0] > threshold { 255 } else { 0 };
            result.put_pixel(x, y, Luma([value]));
        }

        DynamicImage::ImageLuma8(result)
    }

    /// Target size when the image is below the minimum, scaled uniformly.
    fn upscale_dimensions(&self, width: u32, height: u32) -> Result<Option<(u32, u32)>, OcrError> {
        if width >= self.config.min_width && height >= self.config.min_height {
            return Ok(None);
        }

        let scale = f64::max(
            self.config.min_width as f64 / width as f64,
            self.config.min_height as f64 / height as f64,
        );
        let new_width = (width as f64 * scale) as u64;
        let new_height = (height as f64 * scale) as u64;

        let limit = self.config.max_dimension as u64;
        if new_width > limit || new_height > limit {
            return Err(OcrError::Preprocessing(format!(
                "upscaled size {}x{} exceeds {}",
                new_width, new_height, limit
            )));
        }

        Ok(Some((new_width as u32, new_height as u32)))
    }
}

/// Interpolate between a degenerate value and the pixel value.
fn blend(degenerate: f32, value: f32, factor: f32) -> u8 {
    (degenerate + factor * (value - degenerate)).clamp(0.0, 255.0) as u8
}

/// ITU-R 601-2 luma, with alpha dropped.
fn luminance(pixel: &Rgb<u8>) -> f32 {
    0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32
}

fn to_grayscale(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        Luma([luminance(rgb.get_pixel(x, y)).round().clamp(0.0, 255.0) as u8])
    })
}

/// Scale pixel distances from the mean luminance.
fn adjust_contrast(image: &RgbImage, factor: f32) -> RgbImage {
    let pixel_count = (image.width() as u64 * image.height() as u64).max(1);
    let sum: f64 = image.pixels().map(|p| luminance(p) as f64).sum();
    let mean = (sum / pixel_count as f64 + 0.5).floor() as f32;

    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        for c in 0..3 {
            pixel[c] = blend(mean, pixel[c] as f32, factor);
        }
    }
    result
}

/// Scale pixel values towards or away from black.
fn adjust_brightness(image: &RgbImage, factor: f32) -> RgbImage {
    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        for c in 0..3 {
            pixel[c] = blend(0.0, pixel[c] as f32, factor);
        }
    }
    result
}

/// Scale pixel distances from a smoothed copy. Border pixels are unchanged.
fn adjust_sharpness(image: &RgbImage, factor: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width < 3 || height < 3 {
        return image.clone();
    }

    let smoothed = smooth(image);
    let mut result = image.clone();
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let original = image.get_pixel(x, y);
            let degenerate = smoothed.get_pixel(x, y);
            let mut out = [0u8; 3];
            for c in 0..3 {
                out[c] = blend(degenerate[c] as f32, original[c] as f32, factor);
            }
            result.put_pixel(x, y, Rgb(out));
        }
    }
    result
}

/// 3x3 smoothing with kernel `[1 1 1; 1 5 1; 1 1 1] / 13`.
fn smooth(image: &RgbImage) -> RgbImage {
    const KERNEL: [[u32; 3]; 3] = [[1, 1, 1], [1, 5, 1], [1, 1, 1]];
    const KERNEL_SUM: u32 = 13;

    let (width, height) = image.dimensions();
    let mut result = image.clone();

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc = [0u32; 3];
            for (ky, row) in KERNEL.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let pixel = image.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1);
                    for c in 0..3 {
                        acc[c] += pixel[c] as u32 * weight;
                    }
                }
            }
            let out = acc.map(|v| ((v + KERNEL_SUM / 2) / KERNEL_SUM).min(255) as u8);
            result.put_pixel(x, y, Rgb(out));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, Rgba, RgbaImage};

    fn uniform_rgb(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([value, value, value])))
    }

    #[test]
    fn test_upscale_small_image() {
        let preprocessor = ImagePreprocessor::new();
        let image = uniform_rgb(100, 50, 200);

        let processed = preprocessor.preprocess(&image, PreprocessingVariant::Enhanced);
        assert_eq!(processed.dimensions(), (1200, 600));
        assert_eq!(processed.color(), ColorType::Rgb8);
    }

    #[test]
    fn test_large_image_keeps_size() {
        let preprocessor = ImagePreprocessor::new();
        let image = uniform_rgb(1000, 800, 100);

        let processed = preprocessor.preprocess(&image, PreprocessingVariant::Enhanced);
        assert_eq!(processed.dimensions(), (1000, 800));
    }

    #[test]
    fn test_upscale_when_only_height_small() {
        let preprocessor = ImagePreprocessor::new();
        assert_eq!(preprocessor.upscale_dimensions(1600, 300).unwrap(), Some((3200, 600)));
        assert_eq!(preprocessor.upscale_dimensions(800, 600).unwrap(), None);
    }

    #[test]
    fn test_uniform_image_brightened() {
        let preprocessor = ImagePreprocessor::new();
        let image = uniform_rgb(1000, 800, 100);

        let processed = preprocessor.preprocess(&image, PreprocessingVariant::Enhanced).to_rgb8();
        // Contrast and sharpness leave a flat image alone; brightness scales by 1.2
        for pixel in processed.pixels() {
            assert!((119..=120).contains(&pixel[0]), "unexpected value {}", pixel[0]);
        }
    }

    #[test]
    fn test_contrast_spreads_values() {
        let mut image = RgbImage::from_pixel(10, 10, Rgb([100, 100, 100]));
        for y in 0..10 {
            for x in 5..10 {
                image.put_pixel(x, y, Rgb([140, 140, 140]));
            }
        }

        let result = adjust_contrast(&image, 3.0);
        // Mean is 120; 100 -> 60 and 140 -> 180
        assert_eq!(result.get_pixel(0, 0)[0], 60);
        assert_eq!(result.get_pixel(9, 9)[0], 180);
    }

    #[test]
    fn test_grayscale_weights() {
        let mut image = RgbImage::new(4, 1);
        image.put_pixel(0, 0, Rgb([255, 0, 0]));
        image.put_pixel(1, 0, Rgb([0, 255, 0]));
        image.put_pixel(2, 0, Rgb([0, 0, 255]));
        image.put_pixel(3, 0, Rgb([255, 255, 255]));

        let gray = to_grayscale(&DynamicImage::ImageRgb8(image));
        let values: Vec<u8> = gray.pixels().map(|p| p[0]).collect();
        assert_eq!(values, vec![76, 150, 29, 255]);
    }

    #[test]
    fn test_binarize_uses_luma_weights() {
        let preprocessor = ImagePreprocessor::new();
        // Luma 135 under 0.299/0.587/0.114, 126 under Rec. 709 weights
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([255, 100, 0])));

        let processed = preprocessor
            .preprocess(&image, PreprocessingVariant::Binarize)
            .to_luma8();
        assert!(processed.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_sharpness_steepens_edge() {
        let image = RgbImage::from_fn(8, 5, |x, _| {
            if x < 4 { Rgb([50, 50, 50]) } else { Rgb([200, 200, 200]) }
        });

        let result = adjust_sharpness(&image, 2.5);

        // Interior pixels on both sides of the edge move apart
        assert!(result.get_pixel(3, 2)[0] < 50);
        assert!(result.get_pixel(4, 2)[0] > 200);
        // Flat interior regions are unchanged
        assert_eq!(result.get_pixel(1, 2)[0], 50);
        assert_eq!(result.get_pixel(6, 2)[0], 200);
        // Borders are copied through, including where they touch the edge
        for x in 0..8 {
            assert_eq!(result.get_pixel(x, 0), image.get_pixel(x, 0));
            assert_eq!(result.get_pixel(x, 4), image.get_pixel(x, 4));
        }
        for y in 0..5 {
            assert_eq!(result.get_pixel(0, y), image.get_pixel(0, y));
            assert_eq!(result.get_pixel(7, y), image.get_pixel(7, y));
        }
    }

    #[test]
    fn test_binarize_threshold() {
        let preprocessor = ImagePreprocessor::new();
        let mut gray = GrayImage::new(3, 1);
        gray.put_pixel(0, 0, Luma([128]));
        gray.put_pixel(1, 0, Luma([129]));
        gray.put_pixel(2, 0, Luma([10]));

        let processed = preprocessor
            .preprocess(&DynamicImage::ImageLuma8(gray), PreprocessingVariant::Binarize)
            .to_luma8();

        assert_eq!(processed.get_pixel(0, 0)[0], 0);
        assert_eq!(processed.get_pixel(1, 0)[0], 255);
        assert_eq!(processed.get_pixel(2, 0)[0], 0);
    }

    #[test]
    fn test_binarize_only_black_and_white() {
        let preprocessor = ImagePreprocessor::new();
        let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(20, 20, |x, y| {
            let v = ((x * 13 + y * 7) % 256) as u8;
            Rgba([v, v / 2, 255 - v, 255])
        }));

        let processed = preprocessor.preprocess(&image, PreprocessingVariant::Binarize);
        assert_eq!(processed.color(), ColorType::L8);
        assert!(processed.to_luma8().pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_original_not_modified() {
        let preprocessor = ImagePreprocessor::new();
        let image = uniform_rgb(50, 40, 90);
        let before = image.clone();

        let _ = preprocessor.preprocess(&image, PreprocessingVariant::Enhanced);
        let _ = preprocessor.preprocess(&image, PreprocessingVariant::Binarize);

        assert_eq!(image.dimensions(), before.dimensions());
        assert_eq!(image.as_bytes(), before.as_bytes());
    }

    #[test]
    fn test_failure_returns_original() {
        let preprocessor = ImagePreprocessor::new();
        // Upscaling a 1px-wide strip would exceed the size limit
        let image = uniform_rgb(1, 1000, 50);

        assert!(preprocessor
            .try_preprocess(&image, PreprocessingVariant::Enhanced)
            .is_err());

        let processed = preprocessor.preprocess(&image, PreprocessingVariant::Enhanced);
        assert_eq!(processed.dimensions(), (1, 1000));
        assert_eq!(processed.as_bytes(), image.as_bytes());
    }

    #[test]
    fn test_empty_image_rejected() {
        let preprocessor = ImagePreprocessor::new();
        let image = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert!(matches!(
            preprocessor.try_preprocess(&image, PreprocessingVariant::Binarize),
            Err(OcrError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_variant_names() {
        assert_eq!(PreprocessingVariant::ORDER[0].name(), "grayscale+upscale+contrast");
        assert_eq!(PreprocessingVariant::ORDER[1].name(), "threshold-binarize");
    }
}

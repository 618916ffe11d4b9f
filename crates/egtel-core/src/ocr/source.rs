//! Where the raster image comes from.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, ImageReader};
use tracing::debug;

use crate::error::OcrError;

/// An image handed to the extraction pipeline.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Image file on disk (PNG, JPEG, GIF, BMP, TIFF).
    File(PathBuf),
    /// Encoded image bytes, e.g. a clipboard snapshot.
    Bytes(Vec<u8>),
    /// Already decoded image.
    Image(DynamicImage),
}

impl ImageSource {
    /// Decode the source into an image.
    ///
    /// Every failure here is [`OcrError::NoInput`].
    pub fn load(self) -> Result<DynamicImage, OcrError> {
        let image = match self {
            ImageSource::File(path) => load_file(&path)?,
            ImageSource::Bytes(bytes) => {
                if bytes.is_empty() {
                    return Err(OcrError::NoInput("image data is empty".to_string()));
                }
                image::load_from_memory(&bytes)
                    .map_err(|e| OcrError::NoInput(format!("failed to decode image data: {}", e)))?
            }
            ImageSource::Image(image) => image,
        };

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::NoInput(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        debug!("Loaded {}x{} image", width, height);
        Ok(image)
    }
}

fn load_file(path: &Path) -> Result<DynamicImage, OcrError> {
    if !path.exists() {
        return Err(OcrError::NoInput(format!("file not found: {}", path.display())));
    }

    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| OcrError::NoInput(format!("failed to read {}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| OcrError::NoInput(format!("failed to decode {}: {}", path.display(), e)))
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::File(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::File(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(image: DynamicImage) -> Self {
        ImageSource::Image(image)
    }
}

//! Article image handling
//!
//! Images are kept as the raw bytes received from the server so they can be
//! written to the cache unchanged. Construction decodes the bytes once to
//! prove they are a real image and to record the format and dimensions.

use std::fmt;

use image::{ImageError, ImageFormat};

/// A decoded-and-validated article image
#[derive(Clone, PartialEq, Eq)]
pub struct ArticleImage {
    bytes: Vec<u8>,
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl ArticleImage {
    /// Decodes raw image bytes
    ///
    /// # Returns
    /// * `Ok(ArticleImage)` if the bytes are a supported image (JPEG, PNG, GIF, WebP)
    /// * `Err(ImageError)` if the format is unknown or the data is corrupt
    pub fn decode(bytes: Vec<u8>) -> Result<Self, ImageError> {
        let format = image::guess_format(&bytes)?;
        let decoded = image::load_from_memory_with_format(&bytes, format)?;

        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            format,
            bytes,
        })
    }

    /// The raw encoded bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// One-line summary, e.g. `image/png 640x480, 20480 bytes`
    pub fn summary(&self) -> String {
        format!(
            "{} {}x{}, {} bytes",
            self.format.to_mime_type(),
            self.width,
            self.height,
            self.bytes.len()
        )
    }
}

impl fmt::Debug for ArticleImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleImage")
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Encodes a small solid-colour PNG for tests
#[cfg(test)]
pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode PNG");
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_png_records_format_and_dimensions() {
        let bytes = sample_png(4, 3);
        let image = ArticleImage::decode(bytes.clone()).expect("PNG should decode");

        assert_eq!(image.format(), ImageFormat::Png);
        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 3);
        assert_eq!(image.bytes(), bytes.as_slice());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = ArticleImage::decode(b"definitely not an image".to_vec());
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_png() {
        let mut bytes = sample_png(8, 8);
        bytes.truncate(bytes.len() / 2);
        assert!(ArticleImage::decode(bytes).is_err());
    }

    #[test]
    fn test_summary_mentions_size() {
        let image = ArticleImage::decode(sample_png(2, 2)).expect("PNG should decode");
        let summary = image.summary();
        assert!(summary.starts_with("image/png 2x2, "));
        assert!(summary.ends_with(" bytes"));
    }
}

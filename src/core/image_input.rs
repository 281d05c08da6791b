// Upload validation and image decoding

use image::RgbImage;

use crate::models::api::{ServiceError, ServiceResult};

/// Accepted upload media types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Jpeg,
    Png,
}

impl MediaType {
    /// Validate a multipart content-type header value.
    ///
    /// Checked before any pipeline work; everything but JPEG and PNG is
    /// rejected as a client error.
    pub fn from_content_type(content_type: &str) -> ServiceResult<Self> {
        match content_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" => Ok(MediaType::Jpeg),
            "image/png" => Ok(MediaType::Png),
            other => Err(ServiceError::InvalidMediaType(other.to_string())),
        }
    }
}

/// Decode uploaded bytes into an RGB pixel buffer.
///
/// Decode failures surface as client errors; they are not retried.
pub fn decode_rgb(bytes: &[u8]) -> ServiceResult<RgbImage> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| ServiceError::ImageDecode(e.to_string()))?;
    Ok(decoded.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let image = image::DynamicImage::ImageRgb8(RgbImage::new(8, 8));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_accepts_jpeg_and_png() {
        assert_eq!(MediaType::from_content_type("image/jpeg").unwrap(), MediaType::Jpeg);
        assert_eq!(MediaType::from_content_type("image/png").unwrap(), MediaType::Png);
        assert_eq!(MediaType::from_content_type(" IMAGE/PNG ").unwrap(), MediaType::Png);
    }

    #[test]
    fn test_rejects_other_content_types() {
        for bad in ["text/plain", "image/webp", "application/json", ""] {
            let result = MediaType::from_content_type(bad);
            assert!(matches!(result, Err(ServiceError::InvalidMediaType(_))), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_decodes_png_to_rgb() {
        let image = decode_rgb(&png_bytes()).unwrap();
        assert_eq!(image.dimensions(), (8, 8));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let result = decode_rgb(b"definitely not an image");
        assert!(matches!(result, Err(ServiceError::ImageDecode(_))));
    }
}

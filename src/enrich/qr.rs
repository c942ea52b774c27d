//! QR codes as PNG data URIs.

use super::EnrichError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

pub trait QrEncoder: Send + Sync {
    /// Encode `text` as a `data:image/png;base64,...` URI.
    fn encode(&self, text: &str) -> Result<String, EnrichError>;
}

/// Renders with `qrcode` and encodes the PNG with `image`.
#[derive(Debug, Clone, Copy)]
pub struct PngQrEncoder {
    size: u32,
}

impl PngQrEncoder {
    /// `size` is the minimum edge length in pixels.
    pub fn new(size: u32) -> Self {
        Self { size }
    }
}

impl QrEncoder for PngQrEncoder {
    fn encode(&self, text: &str) -> Result<String, EnrichError> {
        if text.trim().is_empty() {
            return Err(EnrichError::Qr("nothing to encode".into()));
        }
        let code = QrCode::new(text.as_bytes()).map_err(|e| EnrichError::Qr(e.to_string()))?;
        let pixels = code
            .render::<Luma<u8>>()
            .min_dimensions(self.size, self.size)
            .quiet_zone(true)
            .build();

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(pixels)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| EnrichError::Qr(e.to_string()))?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_png_data_uri() {
        let uri = PngQrEncoder::new(120).encode("https://metravel.by/travels/minsk").unwrap();
        let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
        let png = STANDARD.decode(payload).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert!(decoded.width() >= 120);
        assert_eq!(decoded.width(), decoded.height());
    }

    #[test]
    fn blank_text_is_an_error() {
        assert!(PngQrEncoder::new(120).encode("  ").is_err());
    }

    #[test]
    fn oversized_payload_is_an_error() {
        let text = "x".repeat(8000);
        assert!(matches!(PngQrEncoder::new(120).encode(&text), Err(EnrichError::Qr(_))));
    }
}

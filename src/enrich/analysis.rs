//! Cover photo brightness and composition analysis.
//!
//! The cover puts its title on the photo. [`PixelAnalyzer`] measures the
//! photo's mean brightness and how busy each horizontal third is, and
//! [`CoverAnalysis::from_analysis`] turns that into a legible layout: text
//! in the calmest third, an overlay that darkens more as the photo gets
//! brighter.

use super::EnrichError;
use super::fetch::ImageFetcher;
use image::GrayImage;
use serde::Serialize;
use std::sync::Arc;

/// Edge length the photo is reduced to before measuring.
const SAMPLE_EDGE: u32 = 96;
/// Mean neighbour difference that counts as fully busy.
const BUSY_SCALE: f32 = 48.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageAnalysis {
    /// Mean luma, 0–255.
    pub brightness: f32,
    /// Busy-ness of the top, center, and bottom thirds, 0–1.
    pub busy: [f32; 3],
}

pub trait ImageAnalyzer: Send + Sync {
    fn analyze(&self, src: &str) -> Result<ImageAnalysis, EnrichError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    Top,
    Center,
    Bottom,
}

/// Cover text placement and overlay chosen for one photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverAnalysis {
    pub text_position: TextPosition,
    pub overlay_opacity: f32,
    /// `rgba(r,g,b,` prefix; the opacity completes it.
    pub overlay_color: &'static str,
    pub text_color: &'static str,
}

impl Default for CoverAnalysis {
    fn default() -> Self {
        Self {
            text_position: TextPosition::Center,
            overlay_opacity: 0.6,
            overlay_color: "rgba(0,0,0,",
            text_color: "#ffffff",
        }
    }
}

impl CoverAnalysis {
    pub fn from_analysis(analysis: &ImageAnalysis) -> Self {
        let [top, center, bottom] = analysis.busy;
        let mut text_position = TextPosition::Center;
        let mut calmest = center;
        for (position, busy) in [(TextPosition::Top, top), (TextPosition::Bottom, bottom)] {
            if busy < calmest {
                calmest = busy;
                text_position = position;
            }
        }
        let brightness = (analysis.brightness / 255.0).clamp(0.0, 1.0);
        let opacity = 0.35 + brightness * 0.40;
        Self {
            text_position,
            overlay_opacity: (opacity * 100.0).round() / 100.0,
            ..Self::default()
        }
    }

    /// Complete CSS color of the overlay at a fraction of its opacity.
    pub fn overlay(&self, fraction: f32) -> String {
        let alpha = (self.overlay_opacity * fraction * 100.0).round() / 100.0;
        format!("{}{alpha})", self.overlay_color)
    }

    /// CSS background laying the overlay behind the text.
    pub fn overlay_gradient(&self) -> String {
        match self.text_position {
            TextPosition::Top => format!(
                "linear-gradient(to bottom, {} 0%, {} 45%, {} 100%)",
                self.overlay(1.0),
                self.overlay(0.35),
                self.overlay(0.0)
            ),
            TextPosition::Bottom => format!(
                "linear-gradient(to top, {} 0%, {} 45%, {} 100%)",
                self.overlay(1.0),
                self.overlay(0.35),
                self.overlay(0.0)
            ),
            TextPosition::Center => format!(
                "radial-gradient(ellipse at center, {} 0%, {} 70%)",
                self.overlay(1.0),
                self.overlay(0.3)
            ),
        }
    }
}

/// Decodes with `image` and measures a downsampled luma copy.
pub struct PixelAnalyzer {
    fetcher: Arc<dyn ImageFetcher>,
}

impl PixelAnalyzer {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { fetcher }
    }
}

impl ImageAnalyzer for PixelAnalyzer {
    fn analyze(&self, src: &str) -> Result<ImageAnalysis, EnrichError> {
        let bytes = self.fetcher.fetch(src)?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| EnrichError::Decode(format!("{src}: {e}")))?;
        let sample = if image.width() > SAMPLE_EDGE || image.height() > SAMPLE_EDGE {
            image.thumbnail(SAMPLE_EDGE, SAMPLE_EDGE)
        } else {
            image
        };
        measure(&sample.to_luma8())
    }
}

/// Brightness and per-third busy-ness of a luma image.
pub fn measure(luma: &GrayImage) -> Result<ImageAnalysis, EnrichError> {
    let (width, height) = luma.dimensions();
    if width == 0 || height == 0 {
        return Err(EnrichError::Decode("empty image".into()));
    }
    let total: u64 = luma.pixels().map(|p| u64::from(p.0[0])).sum();
    let brightness = total as f32 / (width as f32 * height as f32);

    let mut busy = [0.0f32; 3];
    for (third, slot) in busy.iter_mut().enumerate() {
        let start = height * third as u32 / 3;
        let end = (height * (third as u32 + 1) / 3).max(start + 1).min(height);
        let mut sum = 0u64;
        let mut count = 0u64;
        for y in start..end {
            for x in 0..width {
                let here = i32::from(luma.get_pixel(x, y).0[0]);
                if x + 1 < width {
                    sum += here.abs_diff(i32::from(luma.get_pixel(x + 1, y).0[0])) as u64;
                    count += 1;
                }
                if y + 1 < end {
                    sum += here.abs_diff(i32::from(luma.get_pixel(x, y + 1).0[0])) as u64;
                    count += 1;
                }
            }
        }
        let mean = if count == 0 { 0.0 } else { sum as f32 / count as f32 };
        *slot = (mean / BUSY_SCALE).min(1.0);
    }
    Ok(ImageAnalysis { brightness, busy })
}

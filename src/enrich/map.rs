//! Map snapshots and their offline fallbacks.
//!
//! The map page tries, in order:
//!
//! 1. a static-map image from [`MapSnapshotter::snapshot`];
//! 2. [`route_svg`], a vector diagram of the points in input order;
//! 3. [`placeholder`], a neutral panel reading "Карта недоступна".
//!
//! The route diagram is always drawn under the snapshot image, so a snapshot
//! that fails to load in the renderer reveals the route instead.

use super::EnrichError;
use crate::config::MapConfig;
use crate::labels;
use crate::theme::ThemeConfig;
use maud::{Markup, html};

/// One point to put on a map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
}

impl MapPoint {
    pub fn new(lat: f64, lng: f64, label: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            label: label.into(),
        }
    }
}

pub trait MapSnapshotter: Send + Sync {
    /// Image `src` showing every point.
    fn snapshot(&self, points: &[MapPoint], width: u32, height: u32) -> Result<String, EnrichError>;
}

/// Used when `map.provider = "none"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSnapshots;

impl MapSnapshotter for NoSnapshots {
    fn snapshot(&self, _: &[MapPoint], _: u32, _: u32) -> Result<String, EnrichError> {
        Err(EnrichError::Unavailable("map snapshots are disabled".into()))
    }
}

/// Builds static-map image URLs: OpenStreetMap by default, Google Static
/// Maps when an API key is configured.
#[derive(Debug, Clone)]
pub struct StaticMapSnapshotter {
    config: MapConfig,
}

/// Google caps each requested dimension at 640 and scales by 2.
const GOOGLE_MAX_EDGE: u32 = 640;

impl StaticMapSnapshotter {
    pub fn new(config: MapConfig) -> Self {
        Self { config }
    }

    fn osm_url(&self, points: &[MapPoint], width: u32, height: u32) -> String {
        let (lat, lng) = center(points);
        let markers: Vec<String> = points
            .iter()
            .map(|p| format!("{:.6},{:.6},ol-marker", p.lat, p.lng))
            .collect();
        format!(
            "{}?center={lat:.6},{lng:.6}&zoom={}&size={width}x{height}&maptype=mapnik&markers={}",
            self.config.static_base,
            zoom_for(points),
            markers.join("%7C")
        )
    }

    fn google_url(&self, points: &[MapPoint], width: u32, height: u32, key: &str) -> String {
        let (lat, lng) = center(points);
        let scale = (width.max(height) as f64 / GOOGLE_MAX_EDGE as f64).max(1.0);
        let w = (width as f64 / scale).round() as u32;
        let h = (height as f64 / scale).round() as u32;
        let markers: String = points
            .iter()
            .enumerate()
            .take(9)
            .map(|(i, p)| format!("&markers=label:{}%7C{:.6},{:.6}", i + 1, p.lat, p.lng))
            .collect();
        let path = if points.len() >= 2 {
            let coords: Vec<String> = points
                .iter()
                .map(|p| format!("{:.6},{:.6}", p.lat, p.lng))
                .collect();
            format!("&path=weight:3%7C{}", coords.join("%7C"))
        } else {
            String::new()
        };
        format!(
            "https://maps.googleapis.com/maps/api/staticmap?center={lat:.6},{lng:.6}&zoom={}&size={w}x{h}&scale=2{markers}{path}&key={key}",
            zoom_for(points)
        )
    }
}

impl MapSnapshotter for StaticMapSnapshotter {
    fn snapshot(&self, points: &[MapPoint], width: u32, height: u32) -> Result<String, EnrichError> {
        if points.is_empty() {
            return Err(EnrichError::Unavailable("no coordinates to map".into()));
        }
        let key = self
            .config
            .google_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());
        Ok(match key {
            Some(key) => self.google_url(points, width, height, key),
            None => self.osm_url(points, width, height),
        })
    }
}

/// Mean of all points.
fn center(points: &[MapPoint]) -> (f64, f64) {
    let n = points.len().max(1) as f64;
    let lat = points.iter().map(|p| p.lat).sum::<f64>() / n;
    let lng = points.iter().map(|p| p.lng).sum::<f64>() / n;
    (lat, lng)
}

/// Zoom level from the larger of the latitude and longitude spreads.
pub fn zoom_for(points: &[MapPoint]) -> u8 {
    let spread = match bounds(points) {
        Some(b) => (b.max_lat - b.min_lat).max(b.max_lng - b.min_lng),
        None => 0.0,
    };
    if spread > 10.0 {
        5
    } else if spread > 5.0 {
        7
    } else if spread > 1.0 {
        9
    } else if spread > 0.1 {
        11
    } else {
        13
    }
}

struct Bounds {
    min_lat: f64,
    max_lat: f64,
    min_lng: f64,
    max_lng: f64,
}

fn bounds(points: &[MapPoint]) -> Option<Bounds> {
    let first = points.first()?;
    Some(points.iter().fold(
        Bounds {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        },
        |b, p| Bounds {
            min_lat: b.min_lat.min(p.lat),
            max_lat: b.max_lat.max(p.lat),
            min_lng: b.min_lng.min(p.lng),
            max_lng: b.max_lng.max(p.lng),
        },
    ))
}

// ============================================================================
// Offline fallbacks
// ============================================================================

const VIEW_WIDTH: f64 = 100.0;
const VIEW_HEIGHT: f64 = 60.0;
const PAD_X: f64 = 8.0;
const PAD_Y: f64 = 6.0;

/// Project points into the 100×60 view box. A zero spread centers the axis.
pub fn project(points: &[MapPoint]) -> Vec<(f64, f64)> {
    let Some(b) = bounds(points) else {
        return Vec::new();
    };
    let lng_span = b.max_lng - b.min_lng;
    let lat_span = b.max_lat - b.min_lat;
    points
        .iter()
        .map(|p| {
            let x = if lng_span > 0.0 {
                PAD_X + (p.lng - b.min_lng) / lng_span * (VIEW_WIDTH - 2.0 * PAD_X)
            } else {
                VIEW_WIDTH / 2.0
            };
            let y = if lat_span > 0.0 {
                PAD_Y + (b.max_lat - p.lat) / lat_span * (VIEW_HEIGHT - 2.0 * PAD_Y)
            } else {
                VIEW_HEIGHT / 2.0
            };
            ((x * 100.0).round() / 100.0, (y * 100.0).round() / 100.0)
        })
        .collect()
}

/// Vector route diagram: dashed polyline in input order, numbered markers.
pub fn route_svg(points: &[MapPoint], theme: &ThemeConfig) -> Markup {
    let projected = project(points);
    let polyline: Vec<String> = projected.iter().map(|(x, y)| format!("{x},{y}")).collect();
    html! {
        svg.map-route viewBox="0 0 100 60" preserveAspectRatio="xMidYMid meet"
            style={ "width:100%;height:100%;display:block;background:" (theme.colors.surface_alt) ";" } {
            @if projected.len() >= 2 {
                polyline points=(polyline.join(" ")) fill="none" stroke=(theme.colors.accent)
                    stroke-width="0.6" stroke-dasharray="1.6 1.2" stroke-linecap="round" {}
            }
            @for (idx, (x, y)) in projected.iter().enumerate() {
                g {
                    circle cx=(x) cy=(y) r="2.6" fill=(theme.colors.accent)
                        stroke=(theme.colors.background) stroke-width="0.5" {}
                    text x=(x) y=(y + 0.9) text-anchor="middle" font-size="2.6" font-weight="700"
                        fill=(theme.colors.background) font-family=(theme.typography.body_font) {
                        (idx + 1)
                    }
                }
            }
        }
    }
}

/// Neutral panel shown when no point has coordinates.
pub fn placeholder(theme: &ThemeConfig) -> Markup {
    let style = format!(
        "display:flex;align-items:center;justify-content:center;width:100%;height:100%;background:{};border:1px dashed {};border-radius:{};color:{};font-size:{};",
        theme.colors.surface_alt,
        theme.colors.border,
        theme.blocks.border_radius,
        theme.colors.text_muted,
        theme.typography.body.size
    );
    html! {
        div.map-placeholder style=(style) { (labels::MAP_UNAVAILABLE) }
    }
}

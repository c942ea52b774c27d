//! Book configuration module.
//!
//! Handles loading, validating, and merging the `book.toml` file. Stock
//! defaults are the base layer; the user file and CLI flags are overlays
//! merged on top, key by key.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [book]
//! title = "Мои путешествия"
//! theme = "minimal"           # see `travel-book themes`
//! cover_type = "auto"         # auto | first-photo | gradient | custom
//! sort_order = "date-desc"    # date-desc | date-asc | country | alphabetical
//! include_toc = true
//! include_gallery = true
//! include_map = true
//! include_checklists = false
//! checklist_sections = ["clothing", "food", "electronics"]
//! gallery_layout = "grid"     # grid | masonry | polaroid | slideshow | collage
//! gallery_photos_per_page = 2 # 0 = all photos on one page
//! gallery_placement = "auto"  # auto | dedicated
//! photo_page_layout = "full-bleed"
//!
//! [images]
//! origin = "https://metravel.by"
//! proxy_base = "https://images.weserv.nl/"
//! max_width = 2400
//! quality = 90
//! fit = "inside"
//!
//! [map]
//! provider = "static"         # static | none
//! width = 1400
//! height = 900
//!
//! [qr]
//! enabled = true
//! public_base_url = "https://metravel.by/travels"
//! size = 240
//!
//! [fetch]
//! timeout_secs = 10
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want.
//!
//! ```toml
//! [book]
//! theme = "sepia"
//! gallery_layout = "polaroid"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::theme;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full configuration for one generation run.
///
/// `book` is the style configuration a user picks; the other sections
/// configure the external collaborators (image proxy, map snapshots, QR
/// codes, remote fetches).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BookConfig {
    pub book: BookSettings,
    pub images: ProxyConfig,
    pub map: MapConfig,
    pub qr: QrConfig,
    pub fetch: FetchConfig,
}

impl BookConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if theme::find_theme(&self.book.theme).is_none() {
            return Err(ConfigError::Validation(format!(
                "book.theme {:?} is not a known theme (available: {})",
                self.book.theme,
                theme::theme_names().join(", ")
            )));
        }
        if self
            .book
            .gallery_columns
            .is_some_and(|columns| !(1..=4).contains(&columns))
        {
            return Err(ConfigError::Validation(
                "book.gallery_columns must be 1-4".into(),
            ));
        }
        if self.book.cover_type == CoverType::Custom && self.book.cover_image.is_none() {
            log::warn!("book.cover_type = \"custom\" without book.cover_image, the cover uses a gradient");
        }
        if self.images.quality == 0 || self.images.quality > 100 {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.images.max_width == 0 {
            return Err(ConfigError::Validation(
                "images.max_width must be non-zero".into(),
            ));
        }
        if !self.images.origin.starts_with("http://") && !self.images.origin.starts_with("https://")
        {
            return Err(ConfigError::Validation(
                "images.origin must be an absolute http(s) URL".into(),
            ));
        }
        if !self.images.proxy_base.starts_with("http://")
            && !self.images.proxy_base.starts_with("https://")
        {
            return Err(ConfigError::Validation(
                "images.proxy_base must be an absolute http(s) URL".into(),
            ));
        }
        if self.map.width == 0 || self.map.height == 0 {
            return Err(ConfigError::Validation(
                "map.width and map.height must be non-zero".into(),
            ));
        }
        if self.qr.size < 64 {
            return Err(ConfigError::Validation(
                "qr.size must be at least 64 pixels".into(),
            ));
        }
        Ok(())
    }
}

/// Style configuration chosen by the user for one book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BookSettings {
    /// Cover title; also the document `<title>`.
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Theme name from the registry.
    pub theme: String,
    pub cover_type: CoverType,
    /// Cover image for `cover_type = "custom"` (and preferred by `auto`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub sort_order: SortOrder,
    pub include_toc: bool,
    pub include_gallery: bool,
    pub include_map: bool,
    pub show_coordinates_on_map_page: bool,
    pub include_checklists: bool,
    pub checklist_sections: Vec<ChecklistSection>,
    pub gallery_layout: GalleryLayout,
    /// Fixed column count (1-4). `None` picks a count from the photo count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery_columns: Option<u8>,
    /// Photos per dedicated gallery page; 0 puts all photos on one page.
    pub gallery_photos_per_page: usize,
    pub gallery_two_per_page_layout: TwoPerPageLayout,
    pub gallery_placement: GalleryPlacement,
    pub show_captions: bool,
    pub caption_position: CaptionPosition,
    pub gallery_spacing: GallerySpacing,
    pub photo_page_layout: PhotoPageLayout,
    /// Divider page before each travel (books of 3+ travels only).
    pub include_separators: bool,
}

impl Default for BookSettings {
    fn default() -> Self {
        Self {
            title: "Мои путешествия".to_string(),
            subtitle: None,
            theme: theme::DEFAULT_THEME.to_string(),
            cover_type: CoverType::Auto,
            cover_image: None,
            sort_order: SortOrder::DateDesc,
            include_toc: true,
            include_gallery: true,
            include_map: true,
            show_coordinates_on_map_page: false,
            include_checklists: false,
            checklist_sections: vec![
                ChecklistSection::Clothing,
                ChecklistSection::Food,
                ChecklistSection::Electronics,
            ],
            gallery_layout: GalleryLayout::Grid,
            gallery_columns: None,
            gallery_photos_per_page: 2,
            gallery_two_per_page_layout: TwoPerPageLayout::Vertical,
            gallery_placement: GalleryPlacement::Auto,
            show_captions: true,
            caption_position: CaptionPosition::Bottom,
            gallery_spacing: GallerySpacing::Normal,
            photo_page_layout: PhotoPageLayout::FullBleed,
            include_separators: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoverType {
    /// Configured cover image, else the first travel that has a photo.
    #[default]
    Auto,
    FirstPhoto,
    Gradient,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    Country,
    Alphabetical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GalleryLayout {
    #[default]
    Grid,
    Masonry,
    Polaroid,
    Slideshow,
    Collage,
}

/// Arrangement of a gallery page holding exactly two photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TwoPerPageLayout {
    /// Stacked, one photo per row.
    #[default]
    Vertical,
    /// Side by side.
    Horizontal,
}

/// Where a travel with 1-4 photos shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GalleryPlacement {
    /// Inline on the content page; dedicated pages only for 5+ photos.
    #[default]
    Auto,
    /// Always on dedicated gallery pages.
    Dedicated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptionPosition {
    None,
    Overlay,
    Top,
    #[default]
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GallerySpacing {
    Compact,
    #[default]
    Normal,
    Spacious,
}

impl GallerySpacing {
    /// Gap between gallery cards in millimeters.
    pub fn gap_mm(self) -> u32 {
        match self {
            GallerySpacing::Compact => 3,
            GallerySpacing::Normal => 6,
            GallerySpacing::Spacious => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhotoPageLayout {
    /// Edge-to-edge photo with a bottom gradient caption.
    #[default]
    FullBleed,
    /// Photo inside a bordered frame with the caption below.
    Framed,
    /// 70/30 split: photo left, title panel right.
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecklistSection {
    Clothing,
    Food,
    Electronics,
    Documents,
    Medicine,
}

/// Image proxy and origin used by the URL normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyConfig {
    /// Production origin for relative paths and development hosts.
    pub origin: String,
    /// Resizing proxy endpoint; its host marks already-proxied URLs.
    pub proxy_base: String,
    /// Print-resolution width cap in pixels.
    pub max_width: u32,
    /// Proxy encoding quality (1-100).
    pub quality: u32,
    /// Proxy fit mode.
    pub fit: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            origin: "https://metravel.by".to_string(),
            proxy_base: "https://images.weserv.nl/".to_string(),
            max_width: 2400,
            quality: 90,
            fit: "inside".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapProvider {
    /// Static map image service (OpenStreetMap, or Google with an API key).
    #[default]
    Static,
    /// No snapshots; map pages use the vector route diagram.
    None,
}

/// Map snapshot settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub provider: MapProvider,
    /// OpenStreetMap static map endpoint.
    pub static_base: String,
    /// Google Static Maps key; when set, Google is used instead of OSM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_api_key: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            provider: MapProvider::Static,
            static_base: "https://staticmap.openstreetmap.fr/staticmap.php".to_string(),
            google_api_key: None,
            width: 1400,
            height: 900,
        }
    }
}

/// QR code settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QrConfig {
    pub enabled: bool,
    /// Public travel pages live at `{public_base_url}/{slug}`.
    pub public_base_url: String,
    /// Minimum rendered size in pixels.
    pub size: u32,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            public_base_url: "https://metravel.by/travels".to_string(),
            size: 240,
        }
    }
}

/// Remote image fetching for cover analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Fetch remote covers over HTTP (needs the `remote` cargo feature).
    pub remote: bool,
    pub timeout_secs: u64,
    /// Largest accepted image body in bytes.
    pub max_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            remote: true,
            timeout_secs: 10,
            max_bytes: 20 * 1024 * 1024,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(BookConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays in order onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<BookConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: BookConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `book.toml` path.
///
/// A missing file yields the stock defaults. User values are merged on top
/// of stock defaults, unknown keys are rejected, and the result is validated.
pub fn load_config(path: &Path) -> Result<BookConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Build a single-key overlay such as `[book] theme = "sepia"` for CLI flags.
pub fn overlay_value(section: &str, key: &str, value: toml::Value) -> toml::Value {
    let mut inner = toml::map::Map::new();
    inner.insert(key.to_string(), value);
    let mut outer = toml::map::Map::new();
    outer.insert(section.to_string(), toml::Value::Table(inner));
    toml::Value::Table(outer)
}

/// Returns a fully-commented stock `book.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Travel Book Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Book style
# ---------------------------------------------------------------------------
[book]
# Cover title, also used as the document <title>.
title = "Мои путешествия"

# Optional cover subtitle.
# subtitle = "2019 - 2024"

# Theme name. Run `travel-book themes` for the list.
theme = "minimal"

# Cover background: auto | first-photo | gradient | custom
#   auto        = cover_image if set, else the first travel with a photo
#   first-photo = the first travel's cover photo
#   gradient    = the theme's cover gradient, no photo
#   custom      = cover_image
cover_type = "auto"
# cover_image = "https://example.com/cover.jpg"

# Travel order: date-desc | date-asc | country | alphabetical
sort_order = "date-desc"

# Sections to include.
include_toc = true
include_gallery = true
include_map = true
show_coordinates_on_map_page = false
include_checklists = false

# Checklist sections: clothing | food | electronics | documents | medicine
checklist_sections = ["clothing", "food", "electronics"]

# Gallery layout: grid | masonry | polaroid | slideshow | collage
gallery_layout = "grid"

# Fixed column count (1-4). Omit to pick from the photo count.
# gallery_columns = 3

# Photos per dedicated gallery page. 0 = all photos on one page.
# Slideshow always uses one photo per page.
gallery_photos_per_page = 2

# Two photos on a page: vertical (stacked) | horizontal (side by side)
gallery_two_per_page_layout = "vertical"

# Where 1-4 photos go: auto (inline on the text page) | dedicated (own pages)
# Travels with 5+ photos always get dedicated gallery pages.
gallery_placement = "auto"

# Captions ("Фото N"): none | overlay | top | bottom
show_captions = true
caption_position = "bottom"

# Gap between gallery photos: compact | normal | spacious
gallery_spacing = "normal"

# Travel photo page: full-bleed | framed | split
photo_page_layout = "full-bleed"

# Divider page before each travel (only for books with 3+ travels).
include_separators = false

# ---------------------------------------------------------------------------
# Image proxy
# ---------------------------------------------------------------------------
[images]
# Origin for relative image paths and for localhost/private-network hosts.
origin = "https://metravel.by"

# Resizing proxy. URLs already on this host are left untouched.
proxy_base = "https://images.weserv.nl/"

# Print-resolution cap requested from the proxy.
max_width = 2400
quality = 90
fit = "inside"

# ---------------------------------------------------------------------------
# Map snapshots
# ---------------------------------------------------------------------------
[map]
# static = static map image service | none = vector route diagram only
provider = "static"
static_base = "https://staticmap.openstreetmap.fr/staticmap.php"
# google_api_key = "..."   # use Google Static Maps instead of OpenStreetMap
width = 1400
height = 900

# ---------------------------------------------------------------------------
# QR codes
# ---------------------------------------------------------------------------
[qr]
enabled = true
# Public travel pages: {public_base_url}/{slug}
public_base_url = "https://metravel.by/travels"
size = 240

# ---------------------------------------------------------------------------
# Remote fetch (cover brightness analysis)
# ---------------------------------------------------------------------------
[fetch]
# Needs a build with the `remote` feature; otherwise remote covers use the
# default overlay.
remote = true
timeout_secs = 10
max_bytes = 20971520
"##
}

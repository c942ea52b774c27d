//! Input records and their ingest rules.
//!
//! Travels arrive as the product's JSON export. The wire format is loose:
//! ids are numbers or strings, years are numbers or strings, gallery entries
//! are bare URLs or `{ "url": ... }` objects, and rich-text fields sometimes
//! carry the literal strings `"null"` or `"[]"`. Deserialization absorbs all
//! of that so the rest of the crate sees one clean [`TravelForBook`] shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid travel data: {0}")]
    Validation(String),
}

/// One travel to include in the book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelForBook {
    #[serde(deserialize_with = "loose_string")]
    pub id: String,
    #[serde(deserialize_with = "loose_string")]
    pub name: String,
    pub slug: Option<String>,
    pub url: Option<String>,
    #[serde(deserialize_with = "rich_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "rich_text")]
    pub recommendation: Option<String>,
    #[serde(deserialize_with = "rich_text")]
    pub plus: Option<String>,
    #[serde(deserialize_with = "rich_text")]
    pub minus: Option<String>,
    #[serde(alias = "countryName", deserialize_with = "optional_text")]
    pub country_name: Option<String>,
    #[serde(alias = "cityName", deserialize_with = "optional_text")]
    pub city_name: Option<String>,
    #[serde(deserialize_with = "optional_loose_string")]
    pub year: Option<String>,
    #[serde(alias = "monthName", deserialize_with = "optional_text")]
    pub month_name: Option<String>,
    #[serde(alias = "numberDays", deserialize_with = "day_count")]
    pub number_days: Option<u32>,
    #[serde(alias = "travel_image_url", deserialize_with = "optional_text")]
    pub cover_image: Option<String>,
    #[serde(alias = "travel_image_thumb_url", deserialize_with = "optional_text")]
    pub thumb_image: Option<String>,
    #[serde(deserialize_with = "gallery_entries")]
    pub gallery: Vec<String>,
    #[serde(alias = "travelAddress", deserialize_with = "location_entries")]
    pub locations: Vec<TravelLocation>,
    #[serde(alias = "userName", deserialize_with = "optional_text")]
    pub user_name: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub youtube_link: Option<String>,
}

impl TravelForBook {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Gallery entries with non-blank references.
    pub fn photos(&self) -> impl Iterator<Item = &str> {
        self.gallery
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
    }

    pub fn photo_count(&self) -> usize {
        self.photos().count()
    }

    /// Photo for the travel's own page: cover, else thumbnail, else first
    /// gallery photo.
    pub fn hero_image(&self) -> Option<&str> {
        [self.cover_image.as_deref(), self.thumb_image.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .or_else(|| self.photos().next())
    }

    /// Numeric year (`"2023"`, `"2023 г."`, `2023`), for sorting and ranges.
    pub fn year_number(&self) -> Option<i32> {
        let year = self.year.as_deref()?.trim();
        let digits: String = year.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    /// Public web page for the travel: `{base}/{slug}`, else an absolute `url`.
    pub fn public_url(&self, base: &str) -> Option<String> {
        if let Some(slug) = self.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            return Some(format!("{}/{}", base.trim_end_matches('/'), slug));
        }
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
            .map(str::to_string)
    }

    pub fn normalized_locations(&self) -> Vec<NormalizedLocation> {
        normalize_locations(&self.locations)
    }
}

/// A raw location as authored: free-text address and a `"lat,lng"` string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelLocation {
    #[serde(alias = "name", deserialize_with = "loose_string")]
    pub address: String,
    #[serde(deserialize_with = "loose_string")]
    pub coord: String,
    #[serde(alias = "categoryName", deserialize_with = "optional_text")]
    pub category: Option<String>,
    #[serde(alias = "travelImageThumbUrl", deserialize_with = "optional_text")]
    pub thumbnail: Option<String>,
}

impl TravelLocation {
    pub fn new(address: impl Into<String>, coord: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            coord: coord.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Parse `"lat,lng"`. Both halves must be finite and within range.
    pub fn parse(raw: &str) -> Option<Self> {
        let (lat, lng) = raw.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lng: f64 = lng.trim().parse().ok()?;
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }
}

/// A location ready for display. Missing coordinates degrade to
/// address-only display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedLocation {
    pub address: String,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
    pub coords: Option<Coordinates>,
}

pub fn normalize_locations(locations: &[TravelLocation]) -> Vec<NormalizedLocation> {
    locations
        .iter()
        .enumerate()
        .map(|(idx, location)| {
            let address = location.address.trim();
            NormalizedLocation {
                address: if address.is_empty() {
                    format!("Точка {}", idx + 1)
                } else {
                    address.to_string()
                },
                category: clean_text(location.category.as_deref()),
                thumbnail: clean_text(location.thumbnail.as_deref()),
                coords: Coordinates::parse(&location.coord),
            }
        })
        .collect()
}

// ============================================================================
// Loading
// ============================================================================

/// Parse a JSON array of travels and check every record has a name.
pub fn parse_travels(json: &str) -> Result<Vec<TravelForBook>, IngestError> {
    let travels: Vec<TravelForBook> = serde_json::from_str(json)?;
    validate_travels(&travels)?;
    Ok(travels)
}

/// Read and parse a travels JSON file.
pub fn load_travels(path: &Path) -> Result<Vec<TravelForBook>, IngestError> {
    let content = fs::read_to_string(path)?;
    parse_travels(&content)
}

pub fn validate_travels(travels: &[TravelForBook]) -> Result<(), IngestError> {
    if travels.is_empty() {
        return Err(IngestError::Validation(
            "at least one travel is required".into(),
        ));
    }
    for (idx, travel) in travels.iter().enumerate() {
        if travel.name.trim().is_empty() {
            return Err(IngestError::Validation(format!(
                "travel at position {idx} (id {:?}) has no name",
                travel.id
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Deserialization helpers
// ============================================================================

fn clean_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn loose_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.and_then(value_to_string).unwrap_or_default())
}

fn optional_loose_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(clean_text(value.and_then(value_to_string).as_deref()))
}

fn optional_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) => clean_text(Some(&s)),
        _ => None,
    })
}

/// Drop rich text that is empty or a serialized placeholder.
pub(crate) fn clean_rich_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "null" | "undefined" | "[]" | "{}" => None,
        _ => Some(trimmed.to_string()),
    }
}

fn rich_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value
        .and_then(value_to_string)
        .and_then(|s| clean_rich_text(&s)))
}

fn day_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn gallery_entries<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    let Some(Value::Array(entries)) = value else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(url) => Some(url),
            Value::Object(mut obj) => match obj.remove("url") {
                Some(Value::String(url)) => Some(url),
                _ => None,
            },
            _ => None,
        })
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect())
}

fn location_entries<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<TravelLocation>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    let Some(Value::Array(entries)) = value else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(address) => Some(TravelLocation {
                address,
                ..Default::default()
            }),
            obj @ Value::Object(_) => serde_json::from_value(obj).ok(),
            _ => None,
        })
        .collect())
}

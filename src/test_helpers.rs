//! Shared test utilities.
//!
//! Page generators take a [`RenderContext`]; these helpers build one from
//! the stock configuration so a test only spells out what it varies.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut t = travel("1", "Минск");
//! t.gallery = vec!["a.jpg".into()];
//! let html = pages::photo::render(&context(), &t, &meta).into_string();
//! ```

use crate::book::RenderContext;
use crate::config::{BookConfig, BookSettings};
use crate::enrich::Enrichment;
use crate::types::TravelForBook;

/// Stock configuration, no enrichment results.
pub fn context() -> RenderContext {
    context_with(Enrichment::default())
}

/// Stock configuration with prepared enrichment results.
pub fn context_with(enrichment: Enrichment) -> RenderContext {
    RenderContext::new(&BookConfig::default(), enrichment)
}

/// Custom book settings, no enrichment results.
pub fn context_with_settings(settings: BookSettings) -> RenderContext {
    let config = BookConfig {
        book: settings,
        ..BookConfig::default()
    };
    RenderContext::new(&config, Enrichment::default())
}

/// A bare travel with only an id and a name.
pub fn travel(id: &str, name: &str) -> TravelForBook {
    TravelForBook::new(id, name)
}

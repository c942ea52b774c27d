//! # Travel Book
//!
//! Turns a set of travel records and a style configuration into one
//! paginated, print-ready A4 HTML document. Every page is a fixed
//! 210 mm × 297 mm `section.pdf-page`, so any HTML-to-PDF renderer produces
//! the same book.
//!
//! # Architecture: Plan, Enrich, Render
//!
//! ```text
//! 1. Plan     travels + settings  →  BookPlan     (every page reserved up front)
//! 2. Enrich   BookPlan            →  Enrichment   (QR codes, map snapshots, cover analysis)
//! 3. Render   plan + enrichment   →  HTML         (one generator per page kind)
//! ```
//!
//! The plan exists before any markup because the table of contents near the
//! front of the book prints the start page of every travel. Enrichment is
//! the only I/O; all of it runs concurrently and is joined before the first
//! page is rendered, and any failure falls back to something printable.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`book`] | Sorting, the render context, and document assembly |
//! | [`plan`] | Pagination: page kinds, start pages, gallery page counts |
//! | [`pages`] | One generator per page kind (cover, toc, photo, content, gallery, map, ...) |
//! | [`content`] | Rich-text parsing into typed blocks and block rendering |
//! | [`enrich`] | QR encoding, static map snapshots, cover brightness analysis |
//! | [`url`] | Image URL normalization through the resizing proxy |
//! | [`theme`] | The built-in theme registry |
//! | [`config`] | `book.toml` loading, layering, and validation |
//! | [`types`] | Travel records and their JSON ingest |
//! | [`markup`] | Shared Maud fragments and inline style builders |
//! | [`labels`] | Russian UI strings and plural forms |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Inline Styles
//!
//! Page-level styling is inline and derived from the theme. The document
//! stylesheet only carries what cannot be inline: `@page`, page breaks,
//! pseudo-elements, and print color adjustment. A page renders the same
//! wherever it is cut out of the document.
//!
//! ## Fail-Soft Content
//!
//! Rich text arrives as arbitrary HTML. Parsing never fails: unparseable
//! input becomes a plain paragraph, and empty results render nothing.
//! Only the ingest layer ([`types::load_travels`]) and configuration
//! ([`config::load_config`]) return errors.

pub mod book;
pub mod config;
pub mod content;
pub mod enrich;
pub mod labels;
pub mod markup;
pub mod output;
pub mod pages;
pub mod plan;
pub mod theme;
pub mod types;
pub mod url;

#[cfg(test)]
pub(crate) mod test_helpers;

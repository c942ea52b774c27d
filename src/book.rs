//! Document assembly.
//!
//! [`generate`] is the whole pipeline:
//!
//! ```text
//! travels ──sort──▶ plan ──enrich (joined)──▶ RenderContext ──pages──▶ HTML document
//! ```
//!
//! Pages are rendered in exactly the order of [`BookPlan::pages`], so every
//! `data-page` attribute equals the planned page number and the table of
//! contents never disagrees with the body.

use crate::config::{BookConfig, BookSettings, MapProvider, SortOrder};
use crate::enrich::{EnrichRequest, Enricher, Enrichment, Services};
use crate::labels;
use crate::pages::{
    Quote, QUOTES, checklist, closing, content, cover, gallery, map, photo, separator, toc,
};
use crate::plan::{BookPlan, PageKind, plan_book};
use crate::theme::{self, ThemeConfig};
use crate::types::TravelForBook;
use crate::url::ImageUrlNormalizer;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookError {
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Everything a page generator reads. Built once per run, never mutated.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub theme: &'static ThemeConfig,
    pub settings: BookSettings,
    pub images: ImageUrlNormalizer,
    pub enrichment: Enrichment,
    /// Base of public travel pages, `{public_base}/{slug}`.
    pub public_base: String,
    pub qr_enabled: bool,
}

impl RenderContext {
    pub fn new(config: &BookConfig, enrichment: Enrichment) -> Self {
        Self {
            theme: theme::get_theme(&config.book.theme),
            settings: config.book.clone(),
            images: ImageUrlNormalizer::new(config.images.clone()),
            enrichment,
            public_base: config.qr.public_base_url.clone(),
            qr_enabled: config.qr.enabled,
        }
    }

    /// Normalized image `src` for a raw reference.
    pub fn image_src(&self, raw: &str) -> Option<String> {
        self.images.normalize(raw)
    }
}

// ============================================================================
// Ordering and quotes
// ============================================================================

/// Stable sort by the configured order. Travels without a year sort last in
/// both date orders.
pub fn sort_travels(travels: &[TravelForBook], order: SortOrder) -> Vec<TravelForBook> {
    let mut sorted = travels.to_vec();
    match order {
        SortOrder::DateDesc => {
            sorted.sort_by(|a, b| missing_last(a.year_number(), b.year_number(), |x, y| y.cmp(&x)))
        }
        SortOrder::DateAsc => {
            sorted.sort_by(|a, b| missing_last(a.year_number(), b.year_number(), |x, y| x.cmp(&y)))
        }
        SortOrder::Country => sorted.sort_by(|a, b| {
            missing_last(sort_key(a.country_name.as_deref()), sort_key(b.country_name.as_deref()), |x, y| {
                x.cmp(&y)
            })
            .then_with(|| by_name(a, b))
        }),
        SortOrder::Alphabetical => sorted.sort_by(by_name),
    }
    sorted
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn sort_key(value: Option<&str>) -> Option<String> {
    value.map(|v| v.trim().to_lowercase()).filter(|v| !v.is_empty())
}

fn by_name(a: &TravelForBook, b: &TravelForBook) -> Ordering {
    a.name.trim().to_lowercase().cmp(&b.name.trim().to_lowercase())
}

/// Cover and closing quotes chosen from a digest of the travel ids. The two
/// are always different.
pub fn pick_quotes(travels: &[TravelForBook]) -> (Quote, Quote) {
    let mut hasher = Sha256::new();
    for travel in travels {
        hasher.update(travel.id.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    let len = QUOTES.len();
    let first = usize::from(digest[0]) % len;
    let second = (first + 1 + usize::from(digest[1]) % (len - 1)) % len;
    (QUOTES[first], QUOTES[second])
}

// ============================================================================
// Enrichment request
// ============================================================================

/// Every QR code, map snapshot, and cover analysis the book needs.
pub fn enrichment_request(travels: &[TravelForBook], plan: &BookPlan, config: &BookConfig) -> EnrichRequest {
    let mut request = EnrichRequest {
        map_size: (config.map.width, config.map.height),
        ..EnrichRequest::default()
    };
    let images = ImageUrlNormalizer::new(config.images.clone());

    for section in &plan.sections {
        let Some(travel) = travels.get(section.index) else {
            continue;
        };
        if config.qr.enabled {
            if let Some(url) = travel.public_url(&config.qr.public_base_url) {
                request.travel_links.push((section.index, url));
            }
        }
        if !section.has_map {
            continue;
        }
        if config.qr.enabled {
            for link in section
                .locations
                .iter()
                .filter_map(|l| l.coords)
                .map(map::location_link)
            {
                if !request.location_links.contains(&link) {
                    request.location_links.push(link);
                }
            }
        }
        let points = map::map_points(&section.locations);
        if config.map.provider != MapProvider::None && !points.is_empty() {
            request.maps.push((section.index, points));
        }
    }

    request.cover = cover::cover_source(&config.book, travels).and_then(|raw| analysis_source(raw, &images));
    request
}

/// What the analyzer should load: inline and local sources as given,
/// everything else through the image proxy.
fn analysis_source(raw: &str, images: &ImageUrlNormalizer) -> Option<String> {
    let raw = raw.trim();
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("data:") || lower.starts_with("blob:") {
        return Some(raw.to_string());
    }
    let local = raw.strip_prefix("file://").unwrap_or(raw);
    if !raw.is_empty() && Path::new(local).is_file() {
        return Some(raw.to_string());
    }
    images.normalize(raw)
}

// ============================================================================
// Generation
// ============================================================================

/// Generate the complete book document. Never fails: enrichment problems
/// degrade to fallbacks and content problems to plain paragraphs.
pub async fn generate(travels: &[TravelForBook], config: &BookConfig, services: &Services) -> String {
    let sorted = sort_travels(travels, config.book.sort_order);
    let plan = plan_book(&sorted, &config.book);
    log::debug!(
        "book: {} travels, {} pages, theme {:?}",
        sorted.len(),
        plan.total_pages,
        config.book.theme
    );

    let request = enrichment_request(&sorted, &plan, config);
    let enrichment = Enricher::new(services).enrich(request).await;
    let ctx = RenderContext::new(config, enrichment);
    render_document(&ctx, &sorted, &plan).into_string()
}

/// [`generate`] on a private runtime, for synchronous callers.
pub fn generate_blocking(
    travels: &[TravelForBook],
    config: &BookConfig,
    services: &Services,
) -> Result<String, BookError> {
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    Ok(runtime.block_on(generate(travels, config, services)))
}

/// Render every planned page, in order, into the document shell.
pub fn render_document(ctx: &RenderContext, travels: &[TravelForBook], plan: &BookPlan) -> Markup {
    let (cover_quote, closing_quote) = pick_quotes(travels);
    let mut rendered: Vec<Markup> = Vec::with_capacity(plan.total_pages);

    for (number, kind) in plan.numbered() {
        let travel = kind
            .travel()
            .and_then(|i| Some((travels.get(i)?, plan.sections.get(i)?)));
        match (kind, travel) {
            (PageKind::Cover, _) => rendered.push(cover::render(ctx, travels, Some(&cover_quote))),
            (PageKind::Toc, _) => rendered.push(toc::render(ctx, travels, plan, number)),
            (PageKind::Separator { travel: index }, Some((travel, _))) => {
                rendered.push(separator::render(ctx, travel, index, travels.len(), number))
            }
            (PageKind::Photo { .. }, Some((travel, meta))) => rendered.push(photo::render(ctx, travel, meta)),
            (PageKind::Content { .. }, Some((travel, meta))) => {
                rendered.push(content::render(ctx, travel, meta, number))
            }
            // A travel's gallery pages are rendered together at its first one.
            (PageKind::Gallery { page: 0, .. }, Some((travel, meta))) => {
                rendered.extend(gallery::render(ctx, travel, meta, number))
            }
            (PageKind::Gallery { .. }, _) => {}
            (PageKind::Map { .. }, Some((travel, meta))) => rendered.push(map::render(ctx, travel, meta, number)),
            (PageKind::Checklist, _) => rendered.extend(checklist::render(ctx, number)),
            (PageKind::Final, _) => {
                rendered.push(closing::render(ctx, travels, Some(&closing_quote), number))
            }
            (kind, None) => log::warn!("page {number} ({}) has no travel, skipped", kind.name()),
        }
    }

    let title = match ctx.settings.title.trim() {
        "" => labels::BRAND,
        title => title,
    };
    base_document(title, &stylesheet(ctx.theme), &rendered)
}

fn base_document(title: &str, css: &str, pages: &[Markup]) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ru" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                @for page in pages {
                    (page)
                }
            }
        }
    }
}

/// Document-wide print rules. Per-element styling is inline.
pub fn stylesheet(theme: &ThemeConfig) -> String {
    let colors = &theme.colors;
    let typography = &theme.typography;
    format!(
        r#"@page {{ size: A4; margin: 0; }}
* {{ box-sizing: border-box; }}
html, body {{ margin: 0; padding: 0; }}
body {{
    font-family: {body_font};
    color: {text};
    background: {background};
    line-height: {line_height};
    -webkit-print-color-adjust: exact;
    print-color-adjust: exact;
}}
.pdf-page {{
    position: relative;
    width: 210mm;
    height: 297mm;
    overflow: hidden;
    margin: 0 auto;
    background: {background};
}}
.pdf-page + .pdf-page {{ page-break-before: always; break-before: page; }}
img {{ max-width: 100%; display: block; }}
h1, h2, h3, h4 {{ page-break-after: avoid; break-after: avoid; orphans: 3; widows: 3; }}
p {{ orphans: 2; widows: 2; }}
img, figure, blockquote, pre, table, aside {{ page-break-inside: avoid; break-inside: avoid; }}
.contain-image {{ position: relative; width: 100%; height: 100%; overflow: hidden; }}
.contain-image__backdrop {{
    position: absolute;
    inset: -8%;
    width: 116%;
    height: 116%;
    object-fit: cover;
    filter: blur(18px) brightness(0.85);
}}
.contain-image__photo {{
    position: relative;
    width: 100%;
    height: 100%;
    object-fit: contain;
}}
.drop-cap > p:first-of-type::first-letter {{
    float: left;
    font-size: 3.2em;
    line-height: 0.85;
    padding-right: 4pt;
    font-weight: 700;
    font-family: {heading_font};
    color: {accent};
}}
@media print {{
    * {{ -webkit-print-color-adjust: exact; print-color-adjust: exact; }}
    a {{ color: inherit; text-decoration: none; }}
}}"#,
        body_font = typography.body_font,
        heading_font = typography.heading_font,
        text = colors.text,
        background = colors.background,
        line_height = typography.body.line_height,
        accent = colors.accent,
    )
}

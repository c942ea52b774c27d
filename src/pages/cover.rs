//! Cover page.
//!
//! The background is chosen by `cover_type`:
//!
//! | `cover_type` | Background |
//! |---|---|
//! | `gradient` | theme cover gradient |
//! | `first-photo` | first travel's hero photo |
//! | `custom` | `cover_image` |
//! | `auto` | `cover_image`, else the first travel with a photo |
//!
//! With a photo, the cover analysis places the text block in the calmest
//! third of the image and sizes the overlay so the title stays legible.

use super::{Quote, page_quote};
use crate::book::RenderContext;
use crate::config::{BookSettings, CoverType};
use crate::enrich::TextPosition;
use crate::labels;
use crate::markup;
use crate::types::TravelForBook;
use maud::{Markup, html};

const FRAME_INSET: &str = "15mm";

/// Raw (unnormalized) cover photo reference, if the cover uses one.
pub fn cover_source<'a>(settings: &'a BookSettings, travels: &'a [TravelForBook]) -> Option<&'a str> {
    let custom = settings
        .cover_image
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    match settings.cover_type {
        CoverType::Gradient => None,
        CoverType::FirstPhoto => travels.first().and_then(TravelForBook::hero_image),
        CoverType::Custom => custom,
        CoverType::Auto => custom.or_else(|| travels.iter().find_map(TravelForBook::hero_image)),
    }
}

/// `"2019"` or `"2019–2024"` from the travels' years.
pub fn year_range(travels: &[TravelForBook]) -> Option<String> {
    let years = travels.iter().filter_map(TravelForBook::year_number);
    let (min, max) = years.fold(None, |acc: Option<(i32, i32)>, y| match acc {
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        None => Some((y, y)),
    })?;
    Some(if min == max {
        min.to_string()
    } else {
        format!("{min}–{max}")
    })
}

pub fn render(ctx: &RenderContext, travels: &[TravelForBook], quote: Option<&Quote>) -> Markup {
    let theme = ctx.theme;
    let settings = &ctx.settings;
    let photo = cover_source(settings, travels).and_then(|src| ctx.image_src(src));
    let analysis = &ctx.enrichment.cover;

    let (text_color, muted_color) = match photo {
        Some(_) => (analysis.text_color, "rgba(255,255,255,0.8)"),
        None => (theme.colors.cover.text, theme.colors.cover.text_secondary),
    };
    let background = match photo {
        Some(_) => theme.colors.cover.background.to_string(),
        None => format!(
            "linear-gradient(135deg, {} 0%, {} 100%)",
            theme.colors.cover.gradient[0], theme.colors.cover.gradient[1]
        ),
    };
    let justify = match (photo.is_some(), analysis.text_position) {
        (true, TextPosition::Top) => "flex-start",
        (true, TextPosition::Bottom) => "flex-end",
        _ => "center",
    };

    let author = travels
        .first()
        .and_then(|t| t.user_name.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(labels::ANONYMOUS);
    let mut footer = vec![labels::count(travels.len() as u64, labels::TRAVELS)];
    footer.extend(year_range(travels));

    let page_style = format!(
        "position:relative;overflow:hidden;padding:0;background:{background};color:{text_color};font-family:{};",
        theme.typography.body_font
    );
    let layer = "position:absolute;inset:0;";
    let frame_style = format!(
        "position:absolute;inset:{FRAME_INSET};border:1px solid {muted_color};opacity:0.6;pointer-events:none;"
    );
    let body_style = format!(
        "position:absolute;inset:{FRAME_INSET};display:flex;flex-direction:column;justify-content:{justify};align-items:center;text-align:center;padding:18mm 14mm;gap:5mm;"
    );
    let title_style = format!(
        "margin:0;font-family:{};font-size:36pt;font-weight:800;line-height:1.1;color:{text_color};",
        theme.typography.heading_font
    );
    let subtitle_style = format!(
        "margin:0;font-size:{};color:{muted_color};",
        theme.typography.h4.size
    );
    let author_style = format!(
        "font-size:{};letter-spacing:0.12em;text-transform:uppercase;color:{muted_color};",
        theme.typography.small.size
    );
    let footer_style = format!(
        "position:absolute;left:{FRAME_INSET};right:{FRAME_INSET};bottom:calc({FRAME_INSET} + 6mm);display:flex;justify-content:space-between;padding:0 8mm;font-size:{};color:{muted_color};",
        theme.typography.small.size
    );

    let body = html! {
        @if let Some(src) = &photo {
            div style=(layer) { (markup::contain_image(src, &settings.title, theme)) }
            div.cover-overlay style={ (layer) "background:" (analysis.overlay_gradient()) ";" } {}
        }
        div.cover-frame style=(frame_style) {}
        div.cover-body style=(body_style) {
            h1.cover-title style=(title_style) { (settings.title) }
            @if let Some(subtitle) = &settings.subtitle {
                p style=(subtitle_style) { (subtitle) }
            }
            div style=(author_style) { (author) }
            @if let Some(quote) = quote {
                (page_quote(quote, text_color, muted_color, ctx))
            }
        }
        footer style=(footer_style) {
            span { (footer.join(" • ")) }
            span { (labels::BRAND) }
        }
    };
    markup::pdf_page("cover", 1, None, &page_style, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{CoverAnalysis, Enrichment};
    use crate::test_helpers::{context, context_with, travel};

    fn travels() -> Vec<TravelForBook> {
        let mut first = travel("1", "Минск");
        first.year = Some("2021".into());
        first.user_name = Some("Анна".into());
        let mut second = travel("2", "Брест");
        second.year = Some("2019".into());
        second.cover_image = Some("https://cdn.test/brest.jpg".into());
        vec![first, second]
    }

    // =========================================================================
    // Background resolution
    // =========================================================================

    #[test]
    fn auto_prefers_configured_image_then_first_travel_photo() {
        let travels = travels();
        let mut settings = BookSettings::default();
        assert_eq!(cover_source(&settings, &travels), Some("https://cdn.test/brest.jpg"));
        settings.cover_image = Some(" custom.jpg ".into());
        assert_eq!(cover_source(&settings, &travels), Some("custom.jpg"));
    }

    #[test]
    fn first_photo_uses_only_the_first_travel() {
        let settings = BookSettings {
            cover_type: CoverType::FirstPhoto,
            ..BookSettings::default()
        };
        assert_eq!(cover_source(&settings, &travels()), None);
    }

    #[test]
    fn gradient_and_empty_custom_have_no_photo() {
        let mut settings = BookSettings {
            cover_type: CoverType::Gradient,
            cover_image: Some("x.jpg".into()),
            ..BookSettings::default()
        };
        assert_eq!(cover_source(&settings, &travels()), None);
        settings.cover_type = CoverType::Custom;
        settings.cover_image = Some("  ".into());
        assert_eq!(cover_source(&settings, &travels()), None);
    }

    #[test]
    fn year_range_formats() {
        assert_eq!(year_range(&travels()).as_deref(), Some("2019–2021"));
        assert_eq!(year_range(&travels()[..1]).as_deref(), Some("2021"));
        assert_eq!(year_range(&[]), None);
    }

    // =========================================================================
    // Markup
    // =========================================================================

    #[test]
    fn cover_with_photo_has_overlay_and_footer() {
        let html = render(&context(), &travels(), None).into_string();
        assert!(html.contains(r#"class="pdf-page cover-page" data-page="1""#));
        assert!(html.contains("cover-overlay"));
        assert!(html.contains("url=cdn.test%2Fbrest.jpg"));
        assert!(html.contains("2 путешествия • 2019–2021"));
        assert!(html.contains("MeTravel"));
        assert!(html.contains("Анна"));
    }

    #[test]
    fn gradient_cover_without_photos() {
        let ctx = context();
        let html = render(&ctx, &[travel("1", "Минск")], None).into_string();
        assert!(!html.contains("cover-overlay"));
        assert!(html.contains(ctx.theme.colors.cover.gradient[0]));
        assert!(html.contains("Аноним"));
    }

    #[test]
    fn analysis_moves_text_block() {
        let enrichment = Enrichment::default().with_cover(CoverAnalysis {
            text_position: TextPosition::Bottom,
            ..CoverAnalysis::default()
        });
        let html = render(&context_with(enrichment), &travels(), None).into_string();
        assert!(html.contains("justify-content:flex-end"));
        assert!(html.contains("linear-gradient(to top"));
    }

    #[test]
    fn quote_is_rendered_when_given() {
        let quote = super::super::QUOTES[0];
        let html = render(&context(), &travels(), Some(&quote)).into_string();
        assert!(html.contains(quote.author));
    }
}

//! Travel content page: stats, rich-text sections, inline photos, and the
//! link to the online version.

use super::gallery::caption;
use super::stat;
use crate::book::RenderContext;
use crate::config::{CaptionPosition, GalleryLayout};
use crate::content::{self, Block};
use crate::labels;
use crate::markup::{self, Icon, NO_BREAK};
use crate::plan::{INLINE_GALLERY_MAX, TravelSectionMeta};
use crate::theme::{BlockColors, ThemeConfig};
use crate::types::TravelForBook;
use maud::{Markup, html};

/// Photos shown in the preview strip of a travel with a dedicated gallery.
const PREVIEW_PHOTOS: usize = 4;

pub fn render(
    ctx: &RenderContext,
    travel: &TravelForBook,
    meta: &TravelSectionMeta,
    page: usize,
) -> Markup {
    let theme = ctx.theme;
    let description = parse_field(travel.description.as_deref());
    let recommendation = parse_field(travel.recommendation.as_deref());
    let plus = parse_field(travel.plus.as_deref());
    let minus = parse_field(travel.minus.as_deref());

    let body = html! {
        (markup::running_header(&travel.name, page, theme))
        (stats(travel, meta, theme))
        @if !description.is_empty() {
            (section(labels::DESCRIPTION, Icon::Pen, "description-block drop-cap", &description, ctx))
        }
        (inline_gallery(ctx, travel, meta))
        @if !recommendation.is_empty() {
            (section(labels::RECOMMENDATIONS, Icon::Bulb, "recommendation-block", &recommendation, ctx))
        }
        @if !plus.is_empty() || !minus.is_empty() {
            div.pros-cons style={
                "display:grid;grid-template-columns:1fr 1fr;gap:" (theme.spacing.element_spacing)
                ";margin-top:" (theme.spacing.block_spacing) ";" (NO_BREAK)
            } {
                @if !plus.is_empty() {
                    (verdict(labels::PLUSES, Icon::Sparkle, &theme.colors.tip_block, &plus, ctx))
                }
                @if !minus.is_empty() {
                    (verdict(labels::MINUSES, Icon::Warning, &theme.colors.danger_block, &minus, ctx))
                }
            }
        }
        @if let Some(url) = travel.public_url(&ctx.public_base) {
            (online_block(&url, ctx.enrichment.travel_qr(meta.index), theme))
        }
        (markup::page_number(page, theme))
    };
    let style = format!("{}position:relative;", markup::page_style(theme));
    markup::pdf_page("content", page, Some(&travel.id), &style, body)
}

fn parse_field(raw: Option<&str>) -> Vec<Block> {
    raw.map(content::parse).unwrap_or_default()
}

fn stats(travel: &TravelForBook, meta: &TravelSectionMeta, theme: &ThemeConfig) -> Markup {
    let mut items: Vec<(&str, String)> = Vec::new();
    if let Some(country) = &travel.country_name {
        items.push((labels::COUNTRY, country.clone()));
    }
    if let Some(year) = &travel.year {
        items.push((labels::YEAR, year.clone()));
    }
    if let Some(days) = travel.number_days.filter(|d| *d > 0) {
        items.push((labels::DURATION, labels::count(u64::from(days), labels::DAYS)));
    }
    let photos = travel.photo_count() as u64;
    if photos > 0 {
        items.push((labels::PHOTO_CAPTION, labels::count(photos, labels::PHOTOS)));
    }
    let places = meta.locations.len() as u64;
    if places > 0 {
        items.push((labels::LOCATIONS_TITLE, labels::count(places, labels::LOCATIONS)));
    }
    if items.is_empty() {
        return html! {};
    }
    let style = format!(
        "display:flex;flex-wrap:wrap;gap:4mm 8mm;padding:3mm 4mm;margin-bottom:{};background:{};border-radius:{};{NO_BREAK}",
        theme.spacing.section_spacing, theme.colors.surface_alt, theme.blocks.border_radius
    );
    html! {
        div.stats-card style=(style) {
            @for (label, value) in &items {
                (stat(label, value, theme))
            }
        }
    }
}

fn section(title: &str, icon: Icon, class: &str, blocks: &[Block], ctx: &RenderContext) -> Markup {
    let theme = ctx.theme;
    let header = format!(
        "display:flex;align-items:center;gap:2.5mm;margin-bottom:{};padding-bottom:2mm;border-bottom:2px solid {};page-break-after:avoid;break-after:avoid;",
        theme.spacing.element_spacing, theme.colors.accent_soft
    );
    let heading = format!(
        "margin:0;font-family:{};font-size:{};font-weight:{};color:{};",
        theme.typography.heading_font,
        theme.typography.h2.size,
        theme.typography.h2.weight,
        theme.colors.accent
    );
    html! {
        div.content-section style={ "margin-bottom:" (theme.spacing.section_spacing) ";" } {
            div style=(header) {
                (markup::icon(icon, 20, theme.colors.text))
                h2 style=(heading) { (title) }
            }
            div class=(class) { (content::render_blocks(blocks, ctx)) }
        }
    }
}

fn verdict(
    title: &str,
    icon: Icon,
    palette: &BlockColors,
    blocks: &[Block],
    ctx: &RenderContext,
) -> Markup {
    let theme = ctx.theme;
    let style = format!(
        "padding:{} {};background:{};border:{} solid {};border-radius:{};box-shadow:{};color:{};{NO_BREAK}",
        theme.spacing.element_spacing,
        theme.spacing.block_spacing,
        palette.background,
        theme.blocks.border_width,
        palette.border,
        theme.blocks.border_radius,
        theme.blocks.shadow,
        palette.text
    );
    let heading = format!(
        "margin:0;font-family:{};font-size:{};font-weight:{};color:{};",
        theme.typography.heading_font, theme.typography.h4.size, theme.typography.h4.weight, palette.text
    );
    html! {
        div.verdict style=(style) {
            div style={ "display:flex;align-items:center;gap:2mm;margin-bottom:" (theme.spacing.element_spacing) ";" } {
                (markup::icon(icon, 18, palette.icon))
                h3 style=(heading) { (title) }
            }
            div style={ "font-size:" (theme.typography.small.size) ";" } { (content::render_blocks(blocks, ctx)) }
        }
    }
}

/// Inline photos: the whole gallery for travels without a dedicated page,
/// a preview strip with a `+N` counter for larger galleries.
fn inline_gallery(ctx: &RenderContext, travel: &TravelForBook, meta: &TravelSectionMeta) -> Markup {
    let photos: Vec<String> = travel.photos().filter_map(|p| ctx.image_src(p)).collect();
    if photos.is_empty() || !ctx.settings.include_gallery {
        return html! {};
    }
    if photos.len() > INLINE_GALLERY_MAX {
        return preview(ctx, &photos);
    }
    if meta.has_gallery {
        return html! {};
    }

    let theme = ctx.theme;
    let settings = &ctx.settings;
    let layout = settings.gallery_layout;
    let captions = settings.show_captions;
    let placement = settings.caption_position;
    let default_columns = match photos.len() {
        3 => 3,
        _ => 2,
    };
    let cols = if photos.len() == 1 {
        1
    } else if matches!(layout, GalleryLayout::Grid | GalleryLayout::Masonry) {
        settings
            .gallery_columns
            .map(usize::from)
            .unwrap_or(default_columns)
            .clamp(1, 4)
    } else {
        default_columns
    };
    let height = match (photos.len(), cols) {
        (1, _) => "85mm",
        (_, c) if c >= 3 => "55mm",
        _ => "62mm",
    };
    let gap = settings.gallery_spacing.gap_mm();
    let card = format!(
        "position:relative;overflow:hidden;border-radius:{};box-shadow:{};background:{};{NO_BREAK}",
        theme.blocks.border_radius, theme.blocks.shadow, theme.colors.surface_alt
    );

    html! {
        div.inline-gallery style={
            "display:grid;grid-template-columns:repeat(" (cols) ", 1fr);gap:" (gap)
            "mm;margin-bottom:" (theme.spacing.section_spacing) ";"
        } {
            @for (i, src) in photos.iter().enumerate() {
                div.inline-photo style={ (card) (polaroid_tilt(layout, i)) } {
                    @if captions && placement == CaptionPosition::Top {
                        (caption(i, placement, theme))
                    }
                    div style={ "position:relative;height:" (height) ";" } {
                        (markup::contain_image(src, &format!("{} {}", labels::PHOTO_CAPTION, i + 1), theme))
                        @if captions && placement == CaptionPosition::Overlay {
                            (caption(i, placement, theme))
                        }
                    }
                    @if captions && placement == CaptionPosition::Bottom {
                        (caption(i, placement, theme))
                    }
                }
            }
        }
    }
}

fn polaroid_tilt(layout: GalleryLayout, index: usize) -> &'static str {
    match (layout, index % 2) {
        (GalleryLayout::Polaroid, 0) => "padding:1.5mm 1.5mm 4mm;background:#ffffff;transform:rotate(-1.2deg);",
        (GalleryLayout::Polaroid, _) => "padding:1.5mm 1.5mm 4mm;background:#ffffff;transform:rotate(1.1deg);",
        _ => "",
    }
}

fn preview(ctx: &RenderContext, photos: &[String]) -> Markup {
    let theme = ctx.theme;
    let remaining = photos.len() - PREVIEW_PHOTOS;
    let header = format!(
        "display:flex;align-items:center;gap:2.5mm;margin-bottom:{};padding-bottom:2mm;border-bottom:2px solid {};",
        theme.spacing.element_spacing, theme.colors.accent_soft
    );
    let counter = format!(
        "position:absolute;inset:0;display:flex;align-items:center;justify-content:center;background:rgba(0,0,0,0.7);color:#ffffff;font-family:{};font-size:24pt;font-weight:700;",
        theme.typography.heading_font
    );
    html! {
        div.gallery-preview style={ "margin-bottom:" (theme.spacing.section_spacing) ";" (NO_BREAK) } {
            div style=(header) {
                (markup::icon(Icon::Camera, 20, theme.colors.text))
                h2 style=(markup::heading_style(theme, 2, theme.colors.accent)) {
                    (labels::gallery_heading(photos.len()))
                }
            }
            div style="display:grid;grid-template-columns:repeat(4, 1fr);gap:4mm;" {
                @for (i, src) in photos.iter().take(PREVIEW_PHOTOS).enumerate() {
                    div style={
                        "position:relative;height:48mm;overflow:hidden;border-radius:" (theme.blocks.border_radius)
                        ";box-shadow:" (theme.blocks.shadow) ";"
                    } {
                        (markup::contain_image(src, &format!("{} {}", labels::PHOTO_CAPTION, i + 1), theme))
                        @if i == PREVIEW_PHOTOS - 1 {
                            div.preview-more style=(counter) { "+" (remaining) }
                        }
                    }
                }
            }
        }
    }
}

fn online_block(url: &str, qr: Option<&str>, theme: &ThemeConfig) -> Markup {
    let style = format!(
        "display:flex;gap:{};align-items:flex-start;margin-top:{};padding-top:{};border-top:{} solid {};{NO_BREAK}",
        theme.spacing.block_spacing,
        theme.spacing.section_spacing,
        theme.spacing.block_spacing,
        theme.blocks.border_width,
        theme.colors.border
    );
    let qr_style = format!(
        "width:28mm;height:28mm;flex-shrink:0;border:2px solid {};border-radius:{};",
        theme.colors.surface_alt, theme.blocks.border_radius
    );
    let label = format!(
        "margin-bottom:1.5mm;font-family:{};font-size:{};font-weight:700;letter-spacing:0.08em;text-transform:uppercase;color:{};",
        theme.typography.heading_font, theme.typography.body.size, theme.colors.accent
    );
    html! {
        div.online-version style=(style) {
            @if let Some(qr) = qr {
                img.qr-code src=(qr) alt="QR" style=(qr_style);
            }
            div style={ "flex:1;font-size:" (theme.typography.small.size) ";color:" (theme.colors.text_muted) ";" } {
                div style=(label) { (labels::ONLINE_VERSION) }
                div style={ "overflow-wrap:anywhere;color:" (theme.colors.text) ";" } { (url) }
                @if qr.is_some() {
                    div style="margin-top:1.5mm;" { (labels::ONLINE_HINT) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BookSettings, GalleryPlacement};
    use crate::enrich::Enrichment;
    use crate::plan::plan_book;
    use crate::test_helpers::{context, context_with, context_with_settings, travel};

    fn meta_for(t: &TravelForBook, settings: &BookSettings) -> TravelSectionMeta {
        plan_book(std::slice::from_ref(t), settings).sections[0].clone()
    }

    fn with_photos(n: usize) -> TravelForBook {
        let mut t = travel("9", "Браслав");
        t.gallery = (0..n).map(|i| format!("https://cdn.test/{i}.jpg")).collect();
        t
    }

    // =========================================================================
    // Sections
    // =========================================================================

    #[test]
    fn sections_render_in_order() {
        let mut t = travel("1", "Минск");
        t.description = Some("<p>Город</p>".into());
        t.recommendation = Some("<p>Идти пешком</p>".into());
        t.plus = Some("<ul><li>Чисто</li></ul>".into());
        t.minus = Some("Дорого".into());
        let html = render(&context(), &t, &meta_for(&t, &BookSettings::default()), 4).into_string();

        let order = ["Описание", "Город", "Рекомендации", "Плюсы", "Чисто", "Минусы", "Дорого"];
        let positions: Vec<usize> = order.iter().map(|s| html.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(html.contains("drop-cap"));
        assert!(html.contains(r#"class="pdf-page content-page" data-page="4""#));
    }

    #[test]
    fn empty_fields_render_no_sections() {
        let t = travel("1", "Минск");
        let html = render(&context(), &t, &meta_for(&t, &BookSettings::default()), 4).into_string();
        assert!(!html.contains("Описание"));
        assert!(!html.contains("pros-cons"));
        assert!(!html.contains("stats-card"));
    }

    #[test]
    fn stats_use_plural_labels() {
        let mut t = with_photos(2);
        t.number_days = Some(21);
        t.country_name = Some("Беларусь".into());
        let html = render(&context(), &t, &meta_for(&t, &BookSettings::default()), 4).into_string();
        assert!(html.contains("21 день"));
        assert!(html.contains("2 фотографии"));
        assert!(html.contains("Беларусь"));
    }

    // =========================================================================
    // Inline gallery
    // =========================================================================

    #[test]
    fn three_photos_render_inline_in_three_columns() {
        let t = with_photos(3);
        let html = render(&context(), &t, &meta_for(&t, &BookSettings::default()), 4).into_string();
        assert!(html.contains("inline-gallery"));
        assert!(html.contains("repeat(3, 1fr)"));
        assert_eq!(html.matches("class=\"inline-photo\"").count(), 3);
        assert!(html.contains("height:55mm"));
    }

    #[test]
    fn dedicated_gallery_suppresses_inline_photos() {
        let settings = BookSettings {
            gallery_placement: GalleryPlacement::Dedicated,
            ..BookSettings::default()
        };
        let t = with_photos(3);
        let ctx = context_with_settings(settings.clone());
        let html = render(&ctx, &t, &meta_for(&t, &settings), 4).into_string();
        assert!(!html.contains("inline-gallery"));
        assert!(!html.contains("gallery-preview"));
    }

    #[test]
    fn large_gallery_shows_preview_with_counter() {
        let t = with_photos(9);
        let html = render(&context(), &t, &meta_for(&t, &BookSettings::default()), 4).into_string();
        assert!(html.contains("gallery-preview"));
        assert!(html.contains("Фотогалерея (9 фото)"));
        assert!(html.contains("+5"));
    }

    #[test]
    fn disabled_gallery_shows_no_photos() {
        let settings = BookSettings {
            include_gallery: false,
            ..BookSettings::default()
        };
        let ctx = context_with_settings(settings.clone());
        for count in [3, 9] {
            let t = with_photos(count);
            let meta = meta_for(&t, &settings);
            assert_eq!(meta.gallery_pages, 0);
            let html = render(&ctx, &t, &meta, 4).into_string();
            assert!(!html.contains("gallery-preview"));
            assert!(!html.contains("inline-gallery"));
            assert!(!html.contains("Фотогалерея"));
        }
    }

    // =========================================================================
    // Online version
    // =========================================================================

    #[test]
    fn online_block_with_and_without_qr() {
        let mut t = travel("1", "Минск");
        t.slug = Some("minsk".into());
        let meta = meta_for(&t, &BookSettings::default());

        let plain = render(&context(), &t, &meta, 4).into_string();
        assert!(plain.contains("https://metravel.by/travels/minsk"));
        assert!(!plain.contains("qr-code"));

        let enriched = context_with(Enrichment::default().with_travel_qr(0, "data:image/png;base64,AAAA"));
        let html = render(&enriched, &t, &meta, 4).into_string();
        assert!(html.contains(r#"src="data:image/png;base64,AAAA""#));
        assert!(html.contains("width:28mm"));
    }

    #[test]
    fn no_public_link_no_online_block() {
        let t = travel("1", "Минск");
        let html = render(&context(), &t, &meta_for(&t, &BookSettings::default()), 4).into_string();
        assert!(!html.contains("online-version"));
    }
}

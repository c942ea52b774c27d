//! Dedicated gallery pages.
//!
//! A travel's photos are cut into chunks of
//! [`photos_per_page`](crate::plan::photos_per_page); each chunk is one page.
//! The number of pages always equals the planner's `gallery_pages`, so the
//! assembler never shifts a later page number.
//!
//! Layouts:
//!
//! | Layout | Arrangement |
//! |---|---|
//! | `grid` | fixed-height cards on a CSS grid |
//! | `masonry` | `column-count` flow, natural heights |
//! | `polaroid` | white-padded cards, alternating tilt |
//! | `slideshow` | one large photo per page |
//! | `collage` | first photo spans two columns and two rows |

use super::page_padding_mm;
use crate::book::RenderContext;
use crate::config::{BookSettings, CaptionPosition, GalleryLayout, TwoPerPageLayout};
use crate::labels;
use crate::markup::{self, Icon, NO_BREAK};
use crate::plan::{TravelSectionMeta, photos_per_page};
use crate::theme::ThemeConfig;
use crate::types::TravelForBook;
use maud::{Markup, html};

/// Space taken by the running header and gallery title.
const HEADER_MM: f32 = 14.0;

/// Every gallery page of one travel, starting at `first_page`.
pub fn render(
    ctx: &RenderContext,
    travel: &TravelForBook,
    meta: &TravelSectionMeta,
    first_page: usize,
) -> Vec<Markup> {
    let photos: Vec<&str> = travel.photos().collect();
    let per_page = photos_per_page(&ctx.settings, photos.len());
    (0..meta.gallery_pages)
        .map(|page| {
            let start = (page * per_page).min(photos.len());
            let end = (start + per_page).min(photos.len());
            render_page(ctx, travel, &photos[start..end], start, first_page + page)
        })
        .collect()
}

/// One gallery page. `offset` is the index of the chunk's first photo in the
/// travel's gallery, used for captions.
pub fn render_page(
    ctx: &RenderContext,
    travel: &TravelForBook,
    photos: &[&str],
    offset: usize,
    page: usize,
) -> Markup {
    let theme = ctx.theme;
    let settings = &ctx.settings;
    let layout = settings.gallery_layout;
    let count = photos.len();
    let cols = columns(settings, count);
    let gap = settings.gallery_spacing.gap_mm();
    let height = card_height(settings, count, cols, page_padding_mm(theme));

    let container = match layout {
        GalleryLayout::Masonry => format!("column-count:{cols};column-gap:{gap}mm;"),
        GalleryLayout::Collage if cols >= 2 && count >= 3 => format!(
            "display:grid;grid-template-columns:repeat({cols}, 1fr);grid-auto-rows:{height:.1}mm;gap:{gap}mm;"
        ),
        _ => format!("display:grid;grid-template-columns:repeat({cols}, 1fr);gap:{gap}mm;"),
    };
    let title_row = format!(
        "display:flex;align-items:center;gap:2.5mm;margin-bottom:{};",
        theme.spacing.element_spacing
    );

    let body = html! {
        (markup::running_header(&travel.name, page, theme))
        div style=(title_row) {
            (markup::icon(Icon::Camera, 20, theme.colors.accent))
            h2 style=(markup::heading_style(theme, 2, theme.colors.accent)) { (labels::GALLERY_TITLE) }
        }
        div.gallery-grid style=(container) {
            @for (i, photo) in photos.iter().enumerate() {
                (card(ctx, photo, offset + i, i, count, cols, height))
            }
        }
        (markup::page_number(page, theme))
    };
    let style = format!("{}position:relative;", markup::page_style(theme));
    markup::pdf_page("gallery", page, Some(&travel.id), &style, body)
}

/// Column count for a page of `count` photos.
pub fn columns(settings: &BookSettings, count: usize) -> usize {
    if settings.gallery_layout == GalleryLayout::Slideshow || count <= 1 {
        return 1;
    }
    if count == 2 && settings.gallery_two_per_page_layout == TwoPerPageLayout::Vertical {
        return 1;
    }
    settings
        .gallery_columns
        .map(usize::from)
        .unwrap_or_else(|| optimal_columns(count))
        .clamp(1, 4)
}

pub fn optimal_columns(count: usize) -> usize {
    match count {
        0 | 1 => 1,
        2..=4 => 2,
        5 | 6 => 3,
        _ => 4,
    }
}

/// Card photo height in millimeters, shrunk until every row fits the page.
pub fn card_height(settings: &BookSettings, count: usize, cols: usize, padding_mm: f32) -> f32 {
    let target: f32 = if settings.gallery_layout == GalleryLayout::Slideshow {
        200.0
    } else {
        match count {
            0 | 1 => 210.0,
            2 if cols == 1 => 120.0,
            2 => 175.0,
            3 | 4 => 130.0,
            5 | 6 => 95.0,
            _ => 80.0,
        }
    };
    let rows = count.max(1).div_ceil(cols.max(1)) as f32;
    let gap = settings.gallery_spacing.gap_mm() as f32;
    let caption = if settings.show_captions && settings.caption_position != CaptionPosition::Overlay {
        6.0
    } else {
        0.0
    };
    let available = (super::PAGE_HEIGHT_MM - 2.0 * padding_mm - HEADER_MM).max(170.0);
    let fit = (available - gap * (rows - 1.0)) / rows - caption;
    target.min(fit).max(20.0)
}

fn card(
    ctx: &RenderContext,
    photo: &str,
    number: usize,
    position: usize,
    count: usize,
    cols: usize,
    height: f32,
) -> Markup {
    let theme = ctx.theme;
    let settings = &ctx.settings;
    let gap = settings.gallery_spacing.gap_mm();
    let mut style = format!(
        "position:relative;overflow:hidden;border-radius:{};box-shadow:{};background:{};{NO_BREAK}",
        theme.blocks.border_radius, theme.blocks.shadow, theme.colors.surface_alt
    );
    let mut photo_height = format!("{height:.1}mm");
    match settings.gallery_layout {
        GalleryLayout::Masonry => {
            style.push_str(&format!("display:inline-block;width:100%;margin-bottom:{gap}mm;"));
            let varied = if number % 3 == 0 { height * 1.25 } else { height };
            photo_height = format!("{varied:.1}mm");
        }
        GalleryLayout::Polaroid => {
            let tilt = if number % 2 == 0 { "-1.4deg" } else { "1.3deg" };
            style.push_str(&format!(
                "padding:1.5mm 1.5mm 4mm;background:#ffffff;transform:rotate({tilt});"
            ));
        }
        GalleryLayout::Collage if position == 0 && cols >= 2 && count >= 3 => {
            style.push_str("grid-column:span 2;grid-row:span 2;");
            photo_height = "100%".to_string();
        }
        GalleryLayout::Collage if cols >= 2 && count >= 3 => {
            photo_height = "100%".to_string();
        }
        _ => {}
    }
    let alt = format!("{} {}", labels::PHOTO_CAPTION, number + 1);
    let captions = settings.show_captions;
    let placement = settings.caption_position;

    html! {
        div.gallery-photo style=(style) {
            @if captions && placement == CaptionPosition::Top {
                (caption(number, placement, theme))
            }
            div style={ "position:relative;width:100%;height:" (photo_height) ";" } {
                @if let Some(src) = ctx.image_src(photo) {
                    (markup::cover_image(&src, &alt, theme))
                }
                @if captions && placement == CaptionPosition::Overlay {
                    (caption(number, placement, theme))
                }
            }
            @if captions && placement == CaptionPosition::Bottom {
                (caption(number, placement, theme))
            }
        }
    }
}

/// `"Фото N"` caption for the photo at `index` (0-based).
pub fn caption(index: usize, position: CaptionPosition, theme: &ThemeConfig) -> Markup {
    let text = format!("{} {}", labels::PHOTO_CAPTION, index + 1);
    let size = theme.typography.caption.size;
    match position {
        CaptionPosition::None => html! {},
        CaptionPosition::Overlay => html! {
            div.photo-caption style={
                "position:absolute;left:2mm;right:2mm;bottom:2mm;padding:1.5mm 2.5mm;border-radius:2.5mm;background:rgba(0,0,0,0.65);color:#ffffff;font-weight:600;line-height:1.25;font-size:" (size) ";"
            } { (text) }
        },
        CaptionPosition::Top | CaptionPosition::Bottom => html! {
            div.photo-caption style={
                "padding:1.5mm 2mm;text-align:center;font-size:" (size) ";color:" (theme.colors.text_muted) ";"
            } { (text) }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GalleryPlacement, GallerySpacing};
    use crate::plan::plan_book;
    use crate::test_helpers::{context_with_settings, travel};

    fn with_photos(n: usize) -> TravelForBook {
        let mut t = travel("5", "Гродно");
        t.gallery = (0..n).map(|i| format!("https://cdn.test/{i}.jpg")).collect();
        t
    }

    // =========================================================================
    // Columns and heights
    // =========================================================================

    #[test]
    fn column_rules() {
        let mut settings = BookSettings::default();
        assert_eq!(columns(&settings, 1), 1);
        assert_eq!(columns(&settings, 2), 1);
        settings.gallery_two_per_page_layout = TwoPerPageLayout::Horizontal;
        assert_eq!(columns(&settings, 2), 2);
        assert_eq!(columns(&settings, 6), 3);
        assert_eq!(columns(&settings, 9), 4);
        settings.gallery_columns = Some(3);
        assert_eq!(columns(&settings, 4), 3);
        settings.gallery_layout = GalleryLayout::Slideshow;
        assert_eq!(columns(&settings, 4), 1);
    }

    #[test]
    fn heights_fit_the_page() {
        let settings = BookSettings {
            gallery_spacing: GallerySpacing::Spacious,
            ..BookSettings::default()
        };
        for count in 1..=12 {
            let cols = columns(&settings, count);
            let height = card_height(&settings, count, cols, 18.0);
            let rows = count.div_ceil(cols) as f32;
            let used = rows * (height + 6.0) + (rows - 1.0) * 8.0;
            assert!(used <= 297.0 - 36.0 - HEADER_MM + 0.01, "{count} photos: {used}mm");
        }
    }

    #[test]
    fn single_photo_is_tall() {
        let settings = BookSettings::default();
        assert_eq!(card_height(&settings, 1, 1, 18.0), 210.0);
    }

    // =========================================================================
    // Pages
    // =========================================================================

    #[test]
    fn page_count_matches_plan() {
        let settings = BookSettings {
            gallery_photos_per_page: 4,
            ..BookSettings::default()
        };
        let t = with_photos(6);
        let plan = plan_book(std::slice::from_ref(&t), &settings);
        let pages = render(&context_with_settings(settings), &t, &plan.sections[0], 5);
        assert_eq!(pages.len(), 2);
        let first = pages[0].clone().into_string();
        let second = pages[1].clone().into_string();
        assert!(first.contains(r#"data-page="5""#));
        assert_eq!(first.matches("class=\"gallery-photo\"").count(), 4);
        assert!(second.contains(r#"data-page="6""#));
        assert_eq!(second.matches("class=\"gallery-photo\"").count(), 2);
        assert!(second.contains("Фото 6"));
    }

    #[test]
    fn dedicated_small_gallery_fits_one_page() {
        let settings = BookSettings {
            gallery_placement: GalleryPlacement::Dedicated,
            gallery_photos_per_page: 0,
            ..BookSettings::default()
        };
        let t = with_photos(3);
        let plan = plan_book(std::slice::from_ref(&t), &settings);
        let pages = render(&context_with_settings(settings), &t, &plan.sections[0], 5);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn layouts_shape_the_cards() {
        let t = with_photos(5);
        let photos: Vec<&str> = t.photos().collect();
        let render_with = |layout| {
            let ctx = context_with_settings(BookSettings {
                gallery_layout: layout,
                ..BookSettings::default()
            });
            render_page(&ctx, &t, &photos, 0, 7).into_string()
        };
        assert!(render_with(GalleryLayout::Masonry).contains("column-count:3"));
        assert!(render_with(GalleryLayout::Polaroid).contains("rotate(-1.4deg)"));
        assert!(render_with(GalleryLayout::Collage).contains("grid-row:span 2"));
    }

    #[test]
    fn captions_follow_position() {
        let t = with_photos(2);
        let photos: Vec<&str> = t.photos().collect();
        let hidden = context_with_settings(BookSettings {
            caption_position: CaptionPosition::None,
            ..BookSettings::default()
        });
        assert!(!render_page(&hidden, &t, &photos, 0, 7).into_string().contains("photo-caption"));
        let overlay = context_with_settings(BookSettings {
            caption_position: CaptionPosition::Overlay,
            ..BookSettings::default()
        });
        let html = render_page(&overlay, &t, &photos, 0, 7).into_string();
        assert!(html.contains("rgba(0,0,0,0.65)"));
        assert!(html.contains("Фото 2"));
    }
}

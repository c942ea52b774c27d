//! Shared markup fragments used by every page generator.
//!
//! Icons, the page shell, running headers, page numbers, and the two image
//! helpers. [`contain_image`] shows a photo uncropped over a blurred copy of
//! itself; [`cover_image`] fills its box. Both carry an `onerror` handler
//! that hides the failed image and paints the parent with a fallback color.

use crate::theme::ThemeConfig;
use maud::{Markup, html};

/// Line icons drawn on a 24×24 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Camera,
    Pen,
    Bulb,
    Warning,
    Sparkle,
    Info,
    Pin,
    Calendar,
    Clock,
    Globe,
    Plus,
    Minus,
    Check,
}

impl Icon {
    fn path(self) -> &'static str {
        match self {
            Icon::Camera => {
                "M23 19a2 2 0 0 1-2 2H3a2 2 0 0 1-2-2V8a2 2 0 0 1 2-2h4l2-3h6l2 3h4a2 2 0 0 1 2 2z M12 17a4 4 0 1 0 0-8 4 4 0 0 0 0 8z"
            }
            Icon::Pen => "M12 20h9 M16.5 3.5a2.121 2.121 0 0 1 3 3L7 19l-4 1 1-4L16.5 3.5z",
            Icon::Bulb => "M9 18h6 M10 22h4 M12 2a7 7 0 0 0-4 12.7V17h8v-2.3A7 7 0 0 0 12 2z",
            Icon::Warning => {
                "M10.29 3.86L1.82 18a2 2 0 0 0 1.71 3h16.94a2 2 0 0 0 1.71-3L13.71 3.86a2 2 0 0 0-3.42 0z M12 9v4 M12 17h.01"
            }
            Icon::Sparkle => "M12 3l1.9 5.8L20 10.7l-6.1 1.9L12 18.5l-1.9-5.9L4 10.7l6.1-1.9z",
            Icon::Info => "M12 22a10 10 0 1 0 0-20 10 10 0 0 0 0 20z M12 16v-4 M12 8h.01",
            Icon::Pin => {
                "M21 10c0 7-9 13-9 13s-9-6-9-13a9 9 0 0 1 18 0z M12 13a3 3 0 1 0 0-6 3 3 0 0 0 0 6z"
            }
            Icon::Calendar => {
                "M19 4H5a2 2 0 0 0-2 2v14a2 2 0 0 0 2 2h14a2 2 0 0 0 2-2V6a2 2 0 0 0-2-2z M16 2v4 M8 2v4 M3 10h18"
            }
            Icon::Clock => "M12 22a10 10 0 1 0 0-20 10 10 0 0 0 0 20z M12 6v6l4 2",
            Icon::Globe => {
                "M12 22a10 10 0 1 0 0-20 10 10 0 0 0 0 20z M2 12h20 M12 2a15.3 15.3 0 0 1 4 10 15.3 15.3 0 0 1-4 10 15.3 15.3 0 0 1-4-10 15.3 15.3 0 0 1 4-10z"
            }
            Icon::Plus => "M12 5v14 M5 12h14",
            Icon::Minus => "M5 12h14",
            Icon::Check => "M20 6L9 17l-5-5",
        }
    }
}

/// Inline SVG icon stroked in `color`.
pub fn icon(icon: Icon, size_px: u32, color: &str) -> Markup {
    html! {
        svg.icon width=(size_px) height=(size_px) viewBox="0 0 24 24" fill="none"
            stroke=(color) stroke-width="2" stroke-linecap="round" stroke-linejoin="round"
            aria-hidden="true" {
            path d=(icon.path()) {}
        }
    }
}

/// `onerror` handler: hide every image in the parent and paint it `color`.
pub fn hide_on_error(color: &str) -> String {
    format!(
        "var p=this.parentElement;p.style.background='{}';p.querySelectorAll('img').forEach(function(i){{i.style.display='none'}});",
        color.replace('\'', "")
    )
}

/// `filter:` declaration for the theme's photo treatment, or nothing.
pub fn photo_filter(theme: &ThemeConfig) -> String {
    theme
        .image_filter
        .map(|filter| format!("filter:{filter};"))
        .unwrap_or_default()
}

/// Uncropped photo over a blurred backdrop of itself, filling the parent box.
pub fn contain_image(src: &str, alt: &str, theme: &ThemeConfig) -> Markup {
    let onerror = hide_on_error(theme.colors.surface_alt);
    let filter = photo_filter(theme);
    html! {
        div.contain-image style={ "background:" (theme.colors.surface_alt) ";" } {
            img.contain-image__backdrop src=(src) alt="" aria-hidden="true" onerror=(onerror);
            img.contain-image__photo src=(src) alt=(alt) style=(filter) onerror=(onerror);
        }
    }
}

/// Photo cropped to fill its box.
pub fn cover_image(src: &str, alt: &str, theme: &ThemeConfig) -> Markup {
    let style = format!(
        "width:100%;height:100%;object-fit:cover;display:block;{}",
        photo_filter(theme)
    );
    html! {
        img src=(src) alt=(alt) style=(style) onerror=(hide_on_error(theme.colors.surface_alt));
    }
}

/// One A4 page section. Every page of the document goes through here.
pub fn pdf_page(
    kind: &str,
    number: usize,
    travel: Option<&str>,
    style: &str,
    body: Markup,
) -> Markup {
    html! {
        section class={ "pdf-page " (kind) "-page" } data-page=(number) data-travel=[travel] style=(style) {
            (body)
        }
    }
}

/// Base page style: theme background, padding, and body font.
pub fn page_style(theme: &ThemeConfig) -> String {
    format!(
        "background:{};color:{};padding:{};font-family:{};",
        theme.colors.background,
        theme.colors.text,
        theme.spacing.page_padding,
        theme.typography.body_font
    )
}

/// Small header repeated on body pages: travel name left, page number right.
pub fn running_header(title: &str, page: usize, theme: &ThemeConfig) -> Markup {
    let style = format!(
        "display:flex;justify-content:space-between;align-items:baseline;gap:6mm;padding-bottom:3mm;margin-bottom:{};border-bottom:1px solid {};font-size:{};color:{};letter-spacing:0.04em;text-transform:uppercase;",
        theme.spacing.element_spacing,
        theme.colors.border_light,
        theme.typography.small.size,
        theme.colors.text_muted
    );
    html! {
        header.running-header style=(style) {
            span style="overflow:hidden;text-overflow:ellipsis;white-space:nowrap;" { (title) }
            span { (page) }
        }
    }
}

/// Page number pinned to the bottom edge.
pub fn page_number(number: usize, theme: &ThemeConfig) -> Markup {
    let style = format!(
        "position:absolute;bottom:8mm;left:0;right:0;text-align:center;font-size:{};color:{};",
        theme.typography.small.size, theme.colors.text_muted
    );
    html! {
        div.page-number style=(style) { (number) }
    }
}

/// Heading style for a level, with the break-after guard.
pub fn heading_style(theme: &ThemeConfig, level: u8, color: &str) -> String {
    let h = theme.typography.heading(level);
    format!(
        "font-family:{};font-size:{};font-weight:{};line-height:{};margin:0 0 {};color:{};page-break-after:avoid;break-after:avoid;",
        theme.typography.heading_font, h.size, h.weight, h.line_height, h.margin_bottom, color
    )
}

/// Guard against splitting a block across two physical pages.
pub const NO_BREAK: &str = "page-break-inside:avoid;break-inside:avoid;";

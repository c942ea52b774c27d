//! Page generators.
//!
//! Each generator is a pure function of the [`RenderContext`] and its inputs
//! and returns one `<section class="pdf-page ...">` (galleries return one
//! per page). Page numbers come from the [`BookPlan`](crate::plan::BookPlan);
//! no generator decides where it lands.
//!
//! | Module | Page |
//! |---|---|
//! | [`cover`] | Cover with photo or gradient, title, author, quote |
//! | [`toc`] | Table of contents with start pages |
//! | [`separator`] | Optional divider before a travel |
//! | [`photo`] | Travel hero photo (full-bleed, framed, split) |
//! | [`content`] | Stats, rich-text sections, inline gallery, QR link |
//! | [`gallery`] | Dedicated photo pages |
//! | [`map`] | Route map and location legend |
//! | [`checklist`] | Packing checklist |
//! | [`closing`] | Aggregate statistics and a closing quote |

pub mod checklist;
pub mod closing;
pub mod content;
pub mod cover;
pub mod gallery;
pub mod map;
pub mod photo;
pub mod separator;
pub mod toc;

use crate::book::RenderContext;
use crate::labels;
use crate::theme::ThemeConfig;
use crate::types::TravelForBook;
use maud::{Markup, html};

/// A quote for the cover or the closing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub const QUOTES: &[Quote] = &[
    Quote {
        text: "Мир — это книга, и те, кто не путешествует, читают лишь одну её страницу.",
        author: "Августин Блаженный",
    },
    Quote {
        text: "Путешествие в тысячу ли начинается с первого шага.",
        author: "Лао-цзы",
    },
    Quote {
        text: "Не все, кто странствует, потерялись.",
        author: "Дж. Р. Р. Толкин",
    },
    Quote {
        text: "Путешествовать — значит жить.",
        author: "Ганс Христиан Андерсен",
    },
    Quote {
        text: "Жизнь — это либо смелое приключение, либо ничего.",
        author: "Хелен Келлер",
    },
    Quote {
        text: "Лучше один раз увидеть, чем сто раз услышать.",
        author: "Народная мудрость",
    },
];

/// Page height in millimeters.
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Leading number of a CSS length such as `"18mm"`.
pub fn mm(value: &str) -> Option<f32> {
    let number: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    number.parse().ok()
}

/// Theme page padding in millimeters (18 when unparseable).
pub fn page_padding_mm(theme: &ThemeConfig) -> f32 {
    mm(theme.spacing.page_padding).unwrap_or(18.0)
}

/// `01`, `02`, ... for travel `index` (0-based).
pub fn travel_number(index: usize) -> String {
    format!("{:02}", index + 1)
}

/// `"country • year • N дней"`, skipping what is missing.
pub fn meta_line(travel: &TravelForBook) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(country) = &travel.country_name {
        parts.push(country.clone());
    }
    if let Some(year) = &travel.year {
        parts.push(year.clone());
    }
    if let Some(days) = travel.number_days.filter(|d| *d > 0) {
        parts.push(labels::count(u64::from(days), labels::DAYS));
    }
    parts.join(" • ")
}

/// `"country • year"` for compact listings.
pub fn place_and_year(travel: &TravelForBook) -> String {
    [travel.country_name.as_deref(), travel.year.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" • ")
}

/// Small uppercase label over a value, used by stats cards.
pub fn stat(label: &str, value: &str, theme: &ThemeConfig) -> Markup {
    let label_style = format!(
        "font-size:{};text-transform:uppercase;letter-spacing:0.06em;color:{};margin-bottom:1mm;",
        theme.typography.caption.size, theme.colors.text_muted
    );
    let value_style = format!(
        "font-family:{};font-size:{};font-weight:700;color:{};",
        theme.typography.heading_font, theme.typography.h4.size, theme.colors.text
    );
    html! {
        div.stat {
            div style=(label_style) { (label) }
            div style=(value_style) { (value) }
        }
    }
}

/// Block quote used on the cover and closing pages.
pub fn page_quote(quote: &Quote, color: &str, muted: &str, ctx: &RenderContext) -> Markup {
    let theme = ctx.theme;
    let style = format!(
        "margin:0 auto;max-width:130mm;font-family:{};font-style:italic;font-size:{};line-height:1.5;color:{};",
        theme.typography.heading_font, theme.typography.body.size, color
    );
    let author_style = format!(
        "display:block;margin-top:2mm;font-style:normal;font-size:{};color:{};",
        theme.typography.small.size, muted
    );
    html! {
        blockquote.page-quote style=(style) {
            "«" (quote.text) "»"
            cite style=(author_style) { "— " (quote.author) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mm_parses_leading_number() {
        assert_eq!(mm("18mm"), Some(18.0));
        assert_eq!(mm(" 12.5mm"), Some(12.5));
        assert_eq!(mm("auto"), None);
    }

    #[test]
    fn meta_line_skips_missing_parts() {
        let mut travel = TravelForBook::new("1", "Минск");
        assert_eq!(meta_line(&travel), "");
        travel.country_name = Some("Беларусь".into());
        travel.number_days = Some(3);
        assert_eq!(meta_line(&travel), "Беларусь • 3 дня");
        travel.year = Some("2023".into());
        assert_eq!(meta_line(&travel), "Беларусь • 2023 • 3 дня");
        assert_eq!(place_and_year(&travel), "Беларусь • 2023");
    }

    #[test]
    fn travel_numbers_are_padded() {
        assert_eq!(travel_number(0), "01");
        assert_eq!(travel_number(11), "12");
    }
}

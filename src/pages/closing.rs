//! Closing page: totals across the whole book and a parting quote.

use super::{Quote, page_quote};
use crate::book::RenderContext;
use crate::labels::{self, Forms};
use crate::markup;
use crate::types::TravelForBook;
use maud::{Markup, html};
use std::collections::BTreeSet;

/// Aggregate numbers shown on the closing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub travels: u64,
    pub countries: u64,
    pub days: u64,
    pub photos: u64,
}

impl Totals {
    pub fn of(travels: &[TravelForBook]) -> Self {
        let countries: BTreeSet<String> = travels
            .iter()
            .filter_map(|t| t.country_name.as_deref())
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();
        Self {
            travels: travels.len() as u64,
            countries: countries.len() as u64,
            days: travels.iter().filter_map(|t| t.number_days).map(u64::from).sum(),
            photos: travels.iter().map(|t| t.photo_count() as u64).sum(),
        }
    }
}

pub fn render(
    ctx: &RenderContext,
    travels: &[TravelForBook],
    quote: Option<&Quote>,
    page: usize,
) -> Markup {
    let theme = ctx.theme;
    let colors = &theme.colors;
    let totals = Totals::of(travels);
    let figures: Vec<(u64, Forms)> = [
        (totals.travels, labels::TRAVELS),
        (totals.countries, labels::COUNTRIES),
        (totals.days, labels::DAYS),
        (totals.photos, labels::PHOTOS),
    ]
    .into_iter()
    .filter(|(n, _)| *n > 0)
    .collect();

    let style = format!(
        "{}position:relative;display:flex;flex-direction:column;align-items:center;justify-content:center;text-align:center;gap:10mm;",
        markup::page_style(theme)
    );
    let tile = format!(
        "min-width:34mm;padding:5mm 4mm;background:{};border-radius:{};",
        colors.surface_alt, theme.blocks.border_radius
    );
    let number = format!(
        "font-family:{};font-size:28pt;font-weight:800;line-height:1;color:{};",
        theme.typography.heading_font, colors.accent
    );
    let word = format!(
        "margin-top:2mm;font-size:{};color:{};",
        theme.typography.small.size, colors.text_muted
    );

    let body = html! {
        div {
            h2 style=(markup::heading_style(theme, 1, colors.text)) { (labels::CLOSING_TITLE) }
            p style={ "margin:0;font-size:" (theme.typography.body.size) ";color:" (colors.text_muted) ";" } {
                (labels::CLOSING_SUBTITLE)
            }
        }
        @if !figures.is_empty() {
            div.closing-stats style="display:flex;flex-wrap:wrap;justify-content:center;gap:5mm;" {
                @for (n, forms) in &figures {
                    div.closing-stat style=(tile) {
                        div style=(number) { (n) }
                        div style=(word) { (labels::plural(*n, *forms)) }
                    }
                }
            }
        }
        @if let Some(quote) = quote {
            (page_quote(quote, colors.text_secondary, colors.text_muted, ctx))
        }
        div style={ "font-size:" (theme.typography.small.size) ";letter-spacing:0.12em;text-transform:uppercase;color:" (colors.text_muted) ";" } {
            (labels::BRAND)
        }
        (markup::page_number(page, theme))
    };
    markup::pdf_page("final", page, None, &style, body)
}

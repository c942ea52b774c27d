//! Divider page placed before a travel in books of three or more travels.

use super::{place_and_year, travel_number};
use crate::book::RenderContext;
use crate::markup;
use crate::types::TravelForBook;
use maud::{Markup, html};

pub fn render(
    ctx: &RenderContext,
    travel: &TravelForBook,
    index: usize,
    total: usize,
    page: usize,
) -> Markup {
    let theme = ctx.theme;
    let colors = &theme.colors;
    let typography = &theme.typography;
    let meta = place_and_year(travel);

    let style = format!(
        "position:relative;padding:0;display:flex;flex-direction:column;align-items:center;justify-content:center;text-align:center;background:{};font-family:{};",
        colors.accent_soft, typography.body_font
    );
    let number_style = format!(
        "font-family:{};font-size:48pt;font-weight:800;line-height:1;margin-bottom:6mm;color:{};",
        typography.heading_font, colors.accent_strong
    );
    let rule_style = format!(
        "width:40mm;border-top:2px solid {};margin-bottom:8mm;",
        colors.accent
    );
    let name_style = format!(
        "margin:0 0 4mm;max-width:160mm;overflow-wrap:anywhere;{}",
        markup::heading_style(theme, 1, colors.text)
    );
    let meta_style = format!(
        "margin:0;font-size:{};color:{};",
        typography.body.size, colors.text_muted
    );
    let counter_style = format!(
        "position:absolute;bottom:22mm;left:0;right:0;font-size:{};color:{};opacity:0.6;",
        typography.caption.size, colors.text_muted
    );

    let body = html! {
        div style=(number_style) { (travel_number(index)) }
        div style=(rule_style) {}
        h2 style=(name_style) { (travel.name) }
        @if !meta.is_empty() {
            p style=(meta_style) { (meta) }
        }
        div style=(counter_style) { (index + 1) " / " (total) }
    };
    markup::pdf_page("separator", page, Some(&travel.id), &style, body)
}

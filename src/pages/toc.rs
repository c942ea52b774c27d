//! Table of contents.

use super::{place_and_year, travel_number};
use crate::book::RenderContext;
use crate::labels;
use crate::markup;
use crate::plan::BookPlan;
use crate::types::TravelForBook;
use maud::{Markup, html};

pub fn render(ctx: &RenderContext, travels: &[TravelForBook], plan: &BookPlan, page: usize) -> Markup {
    let theme = ctx.theme;
    let colors = &theme.colors;
    let typography = &theme.typography;

    let title_style = format!(
        "margin:0 0 2mm;font-family:{};font-size:{};font-weight:{};letter-spacing:-0.02em;color:{};",
        typography.heading_font, typography.h1.size, typography.h1.weight, colors.text
    );
    let count_style = format!(
        "margin:0 0 3mm;font-size:{};color:{};",
        typography.body.size, colors.text_muted
    );
    let rule_style = format!(
        "width:60mm;height:2px;margin:0 auto;border-radius:999px;background:{};",
        colors.accent
    );
    let row_style = format!(
        "display:flex;align-items:baseline;gap:4mm;padding:3.5mm 4.5mm;background:{};border:{} solid {};border-radius:{};box-shadow:{};{}",
        colors.surface,
        theme.blocks.border_width,
        colors.border,
        theme.blocks.border_radius,
        theme.blocks.shadow,
        markup::NO_BREAK
    );
    let number_style = format!(
        "font-family:{};font-size:{};font-weight:700;color:{};min-width:9mm;",
        typography.heading_font, typography.small.size, colors.accent
    );
    let name_style = format!(
        "font-family:{};font-size:14pt;font-weight:600;line-height:1.3;color:{};",
        typography.heading_font, colors.text
    );
    let meta_style = format!(
        "font-size:{};color:{};margin-top:1mm;",
        typography.small.size, colors.text_muted
    );
    let leader_style = format!(
        "flex:1;min-width:8mm;border-bottom:1px dotted {};transform:translateY(-1.5mm);",
        colors.border
    );
    let start_style = format!(
        "font-family:{};font-size:18pt;font-weight:700;color:{};",
        typography.heading_font, colors.accent
    );

    let body = html! {
        div style="text-align:center;margin:24mm 0 14mm;" {
            h2 style=(title_style) { (labels::TOC_TITLE) }
            p style=(count_style) { (labels::count(travels.len() as u64, labels::TRAVELS)) }
            div style=(rule_style) {}
        }
        ol.toc-list style="list-style:none;margin:0;padding:0;display:flex;flex-direction:column;gap:2.5mm;" {
            @for section in &plan.sections {
                @if let Some(travel) = travels.get(section.index) {
                    @let meta = place_and_year(travel);
                    li.toc-entry style=(row_style) {
                        span style=(number_style) { (travel_number(section.index)) }
                        div style="min-width:0;" {
                            div style=(name_style) { (travel.name) }
                            @if !meta.is_empty() {
                                div style=(meta_style) { (meta) }
                            }
                        }
                        span.toc-leader style=(leader_style) {}
                        span.toc-page-number data-start=(section.start_page) style=(start_style) {
                            (section.start_page)
                        }
                    }
                }
            }
        }
        (markup::page_number(page, theme))
    };
    let style = format!("{}position:relative;", markup::page_style(theme));
    markup::pdf_page("toc", page, None, &style, body)
}

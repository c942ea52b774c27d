//! Map page: route map and location legend.
//!
//! The map area degrades in three steps: a static map snapshot (with the
//! vector route underneath, revealed if the snapshot fails to load), the
//! vector route alone, and a neutral placeholder when no location has
//! coordinates.

use crate::book::RenderContext;
use crate::enrich::map::{self as route, MapPoint};
use crate::labels;
use crate::markup::{self, NO_BREAK};
use crate::plan::TravelSectionMeta;
use crate::theme::ThemeConfig;
use crate::types::{Coordinates, NormalizedLocation, TravelForBook};
use maud::{Markup, html};

/// Legend entries shown before the "and N more" line.
pub const LEGEND_MAX: usize = 8;

const MAP_HEIGHT_MM: u32 = 120;

/// Map-search URL opened by a location's QR code.
pub fn location_link(coords: Coordinates) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        coords.lat, coords.lng
    )
}

/// Points for every location that has coordinates, in input order.
pub fn map_points(locations: &[NormalizedLocation]) -> Vec<MapPoint> {
    locations
        .iter()
        .filter_map(|l| l.coords.map(|c| MapPoint::new(c.lat, c.lng, l.address.clone())))
        .collect()
}

/// `"Тбилиси, Грузия"` → `("Тбилиси", Some("Грузия"))`.
pub fn split_address(address: &str) -> (&str, Option<&str>) {
    match address.split_once(',') {
        Some((title, rest)) if !title.trim().is_empty() => {
            let rest = rest.trim();
            (title.trim(), (!rest.is_empty()).then_some(rest))
        }
        _ => (address.trim(), None),
    }
}

pub fn render(
    ctx: &RenderContext,
    travel: &TravelForBook,
    meta: &TravelSectionMeta,
    page: usize,
) -> Markup {
    let theme = ctx.theme;
    let points = map_points(&meta.locations);
    let snapshot = ctx.enrichment.map_snapshot(meta.index);

    let frame = format!(
        "position:relative;height:{MAP_HEIGHT_MM}mm;overflow:hidden;margin-bottom:{};border:1px solid {};border-radius:{};box-shadow:{};{NO_BREAK}",
        theme.spacing.block_spacing,
        theme.colors.border,
        theme.blocks.border_radius,
        theme.blocks.shadow
    );
    let legend_title = format!(
        "margin:0 0 {};font-family:{};font-size:{};font-weight:{};color:{};page-break-after:avoid;break-after:avoid;",
        theme.spacing.element_spacing,
        theme.typography.heading_font,
        theme.typography.h3.size,
        theme.typography.h3.weight,
        theme.colors.text
    );
    let hidden = meta.locations.len().saturating_sub(LEGEND_MAX);

    let body = html! {
        (markup::running_header(&travel.name, page, theme))
        h2 style=(markup::heading_style(theme, 2, theme.colors.accent)) { (labels::MAP_TITLE) }
        div.map-frame style=(frame) {
            @if points.is_empty() {
                (route::placeholder(theme))
            } @else {
                (route::route_svg(&points, theme))
                @if let Some(src) = snapshot {
                    img.map-snapshot src=(src) alt=(labels::MAP_TITLE)
                        style="position:absolute;inset:0;width:100%;height:100%;object-fit:cover;"
                        onerror="this.style.display='none';";
                }
            }
        }
        h3 style=(legend_title) {
            (labels::LOCATIONS_TITLE) " (" (meta.locations.len()) ")"
        }
        div.location-list {
            @for (location, marker) in legend(&meta.locations).into_iter().take(LEGEND_MAX) {
                (entry(ctx, location, marker))
            }
        }
        @if hidden > 0 {
            p.more-locations style={ "margin:2mm 0 0;font-size:" (theme.typography.small.size) ";color:" (theme.colors.text_muted) ";" } {
                (labels::more_locations(hidden as u64))
            }
        }
        (markup::page_number(page, theme))
    };
    let style = format!("{}position:relative;", markup::page_style(theme));
    markup::pdf_page("map", page, Some(&travel.id), &style, body)
}

/// Pair each location with its route marker number. Locations without
/// coordinates have no marker.
fn legend(locations: &[NormalizedLocation]) -> Vec<(&NormalizedLocation, Option<usize>)> {
    let mut next = 0;
    locations
        .iter()
        .map(|location| {
            let marker = location.coords.map(|_| {
                next += 1;
                next
            });
            (location, marker)
        })
        .collect()
}

fn entry(ctx: &RenderContext, location: &NormalizedLocation, marker: Option<usize>) -> Markup {
    let theme = ctx.theme;
    let colors = &theme.colors;
    let (title, subtitle) = split_address(&location.address);
    let qr = location
        .coords
        .filter(|_| ctx.qr_enabled)
        .and_then(|c| ctx.enrichment.location_qr(&location_link(c)));
    let thumbnail = location.thumbnail.as_deref().and_then(|t| ctx.image_src(t));

    let row = format!(
        "display:flex;gap:3mm;align-items:flex-start;padding:2mm 3mm;margin-bottom:1.5mm;background:{};border:1px solid {};border-radius:{};{NO_BREAK}",
        colors.surface, colors.border, theme.blocks.border_radius
    );
    let badge = format!(
        "min-width:5.5mm;height:5.5mm;display:flex;align-items:center;justify-content:center;flex-shrink:0;border-radius:999px;font-family:{};font-size:9pt;font-weight:600;background:{};color:{};",
        theme.typography.heading_font, colors.accent, colors.background
    );
    let detail = format!("font-size:9.5pt;color:{};", colors.text_muted);

    html! {
        div.location style=(row) {
            @if let Some(src) = &thumbnail {
                div style={ "position:relative;width:30mm;height:20mm;flex-shrink:0;overflow:hidden;border-radius:" (theme.blocks.border_radius) ";" } {
                    (markup::cover_image(src, title, theme))
                }
            }
            div style="flex:1;min-width:0;" {
                div style="display:flex;align-items:center;gap:2mm;margin-bottom:1mm;" {
                    span.location-marker style=(badge) {
                        @match marker {
                            Some(n) => { (n) }
                            None => { "•" }
                        }
                    }
                    span style={ "font-size:11pt;font-weight:600;line-height:1.35;color:" (colors.text) ";" } { (title) }
                }
                @if let Some(subtitle) = subtitle {
                    div style=(detail) { (subtitle) }
                }
                @if let Some(category) = &location.category {
                    div style=(detail) { (category) }
                }
                @if ctx.settings.show_coordinates_on_map_page {
                    @if let Some(c) = location.coords {
                        div.coordinates style={ "font-size:8.5pt;opacity:0.7;font-family:" (theme.typography.mono_font) ";color:" (colors.text_muted) ";" } {
                            (format!("{:.5}, {:.5}", c.lat, c.lng))
                        }
                    }
                }
            }
            @if let Some(qr) = qr {
                img.location-qr src=(qr) alt="QR" style=(qr_style(theme));
            }
        }
    }
}

fn qr_style(theme: &ThemeConfig) -> String {
    format!(
        "width:16mm;height:16mm;flex-shrink:0;background:#ffffff;border:1px solid {};border-radius:1.5mm;",
        theme.colors.border
    )
}

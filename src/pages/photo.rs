//! Travel photo page: the first page of every travel.
//!
//! Three layouts (`photo_page_layout`). A travel without a usable photo gets
//! an accent gradient panel with its name instead, whatever the layout.

use super::meta_line;
use crate::book::RenderContext;
use crate::config::PhotoPageLayout;
use crate::markup;
use crate::plan::TravelSectionMeta;
use crate::theme::ThemeConfig;
use crate::types::TravelForBook;
use maud::{Markup, html};

pub fn render(ctx: &RenderContext, travel: &TravelForBook, meta: &TravelSectionMeta) -> Markup {
    let theme = ctx.theme;
    let photo = travel.hero_image().and_then(|src| ctx.image_src(src));
    let details = meta_line(travel);

    let body = match (photo, ctx.settings.photo_page_layout) {
        (None, _) => no_photo(&travel.name, theme),
        (Some(src), PhotoPageLayout::FullBleed) => full_bleed(&src, &travel.name, &details, theme),
        (Some(src), PhotoPageLayout::Framed) => framed(&src, &travel.name, &details, theme),
        (Some(src), PhotoPageLayout::Split) => split(&src, &travel.name, &details, theme),
    };
    let body = html! {
        (body)
        (markup::page_number(meta.start_page, theme))
    };
    let style = format!("{}position:relative;", markup::page_style(theme));
    markup::pdf_page("photo", meta.start_page, Some(&travel.id), &style, body)
}

fn title_style(theme: &ThemeConfig, size: &str, color: &str) -> String {
    let h1 = &theme.typography.h1;
    format!(
        "margin:0 0 4mm;font-family:{};font-size:{size};font-weight:{};line-height:{};color:{color};overflow-wrap:anywhere;hyphens:auto;",
        theme.typography.heading_font, h1.weight, h1.line_height
    )
}

fn no_photo(name: &str, theme: &ThemeConfig) -> Markup {
    let colors = &theme.colors;
    let style = format!(
        "height:235mm;display:flex;align-items:center;justify-content:center;text-align:center;padding:20mm;border-radius:{};box-shadow:{};background:linear-gradient(135deg, {} 0%, {} 100%);",
        theme.blocks.border_radius, theme.blocks.shadow, colors.accent_soft, colors.accent_light
    );
    html! {
        div.photo-fallback style=(style) {
            h1 style=(title_style(theme, theme.typography.h1.size, colors.accent_strong)) { (name) }
        }
    }
}

fn full_bleed(src: &str, name: &str, details: &str, theme: &ThemeConfig) -> Markup {
    let frame = format!(
        "position:relative;height:261mm;overflow:hidden;border-radius:{};box-shadow:{};",
        theme.blocks.border_radius, theme.blocks.shadow
    );
    let caption = "position:absolute;left:0;right:0;bottom:0;padding:16mm 18mm 14mm;background:linear-gradient(180deg, rgba(0,0,0,0) 0%, rgba(0,0,0,0.65) 100%);";
    let title = format!(
        "{}text-shadow:0 2px 8px rgba(0,0,0,0.6);",
        title_style(theme, theme.typography.h1.size, "#ffffff")
    );
    html! {
        div.photo-full-bleed style=(frame) {
            (markup::contain_image(src, name, theme))
            div.photo-caption style=(caption) {
                h1 style=(title) { (name) }
                @if !details.is_empty() {
                    div style="font-size:11pt;font-weight:500;color:rgba(255,255,255,0.92);text-shadow:0 1px 4px rgba(0,0,0,0.5);" {
                        (details)
                    }
                }
            }
        }
    }
}

fn framed(src: &str, name: &str, details: &str, theme: &ThemeConfig) -> Markup {
    let colors = &theme.colors;
    let frame = format!(
        "position:relative;height:200mm;overflow:hidden;border:6px solid {};outline:1px solid {};border-radius:{};box-shadow:{};",
        colors.surface, colors.border, theme.blocks.border_radius, theme.blocks.shadow
    );
    html! {
        div.photo-framed {
            div style=(frame) { (markup::contain_image(src, name, theme)) }
            div style="text-align:center;padding:8mm 10mm 0;" {
                h1 style=(title_style(theme, theme.typography.h1.size, colors.text)) { (name) }
                @if !details.is_empty() {
                    div style={ "font-size:11pt;font-weight:500;color:" (colors.text_muted) ";" } { (details) }
                }
            }
        }
    }
}

fn split(src: &str, name: &str, details: &str, theme: &ThemeConfig) -> Markup {
    let cover = &theme.colors.cover;
    let wrapper = format!(
        "display:grid;grid-template-columns:70% 30%;height:261mm;overflow:hidden;border-radius:{};box-shadow:{};",
        theme.blocks.border_radius, theme.blocks.shadow
    );
    let panel = format!(
        "display:flex;flex-direction:column;justify-content:center;padding:12mm;color:{};background:linear-gradient(180deg, {} 0%, {} 100%);",
        cover.text, cover.gradient[0], cover.gradient[1]
    );
    html! {
        div.photo-split style=(wrapper) {
            div style="position:relative;overflow:hidden;" { (markup::contain_image(src, name, theme)) }
            div style=(panel) {
                h1 style=(title_style(theme, theme.typography.h2.size, cover.text)) { (name) }
                @if !details.is_empty() {
                    div style="font-size:10pt;font-weight:500;line-height:1.5;opacity:0.85;" { (details) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BookSettings;
    use crate::plan::plan_book;
    use crate::test_helpers::{context, context_with_settings, travel};

    fn photographed() -> TravelForBook {
        let mut t = travel("3", "Нарочь");
        t.cover_image = Some("https://cdn.test/naroch.jpg".into());
        t.country_name = Some("Беларусь".into());
        t.number_days = Some(5);
        t
    }

    fn meta_for(t: &TravelForBook) -> TravelSectionMeta {
        plan_book(std::slice::from_ref(t), &BookSettings::default()).sections[0].clone()
    }

    #[test]
    fn page_number_is_the_start_page() {
        let t = photographed();
        let meta = meta_for(&t);
        let html = render(&context(), &t, &meta).into_string();
        assert!(html.contains(r#"class="pdf-page photo-page" data-page="3" data-travel="3""#));
        assert!(html.contains("photo-full-bleed"));
        assert!(html.contains("Беларусь • 5 дней"));
    }

    #[test]
    fn layouts_follow_settings() {
        let t = photographed();
        let meta = meta_for(&t);
        for (layout, class) in [
            (PhotoPageLayout::Framed, "photo-framed"),
            (PhotoPageLayout::Split, "photo-split"),
        ] {
            let ctx = context_with_settings(BookSettings {
                photo_page_layout: layout,
                ..BookSettings::default()
            });
            assert!(render(&ctx, &t, &meta).into_string().contains(class));
        }
    }

    #[test]
    fn missing_photo_uses_gradient_fallback() {
        let t = travel("1", "Без фото");
        let html = render(&context(), &t, &meta_for(&t)).into_string();
        assert!(html.contains("photo-fallback"));
        assert!(!html.contains("<img"));
    }
}

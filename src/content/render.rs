//! Block renderer: one themed markup fragment per [`Block`].
//!
//! All text goes through maud's escaping. Every image source is routed
//! through the context's URL normalizer; a source that does not normalize
//! drops the image. Colors, fonts, and sizes come from the active theme.

use super::{Block, CalloutKind, ImageRef, Inline};
use crate::book::RenderContext;
use crate::labels;
use crate::markup::{self, Icon, NO_BREAK};
use crate::theme::{BlockColors, ThemeConfig};
use maud::{Markup, html};

pub fn render_blocks(blocks: &[Block], ctx: &RenderContext) -> Markup {
    html! {
        @for block in blocks {
            (render_block(block, ctx))
        }
    }
}

pub fn render_block(block: &Block, ctx: &RenderContext) -> Markup {
    let theme = ctx.theme;
    match block {
        Block::Heading { level, text } => heading(*level, text, theme),
        Block::Paragraph { text, inline } => paragraph(text, inline.as_deref(), theme),
        Block::List { ordered, items } => list(*ordered, items, theme),
        Block::Quote { text, author } => quote(text, author.as_deref(), theme),
        Block::Image(image) => figure(image, ctx),
        Block::ImageGallery { images, columns } => gallery(images, *columns, ctx),
        Block::Callout {
            kind,
            title,
            content,
        } => callout(*kind, title.as_deref(), content, theme),
        Block::Code { text, language } => code(text, language.as_deref(), theme),
        Block::Table { headers, rows } => table(headers.as_deref(), rows, theme),
        Block::Separator => separator(theme),
    }
}

fn heading(level: u8, text: &str, theme: &ThemeConfig) -> Markup {
    let style = markup::heading_style(theme, level, theme.colors.text);
    match level {
        0 | 1 => html! { h1 style=(style) { (text) } },
        2 => html! { h2 style=(style) { (text) } },
        3 => html! { h3 style=(style) { (text) } },
        4 => html! { h4 style=(style) { (text) } },
        5 => html! { h5 style=(style) { (text) } },
        _ => html! { h6 style=(style) { (text) } },
    }
}

fn body_style(theme: &ThemeConfig) -> String {
    let body = &theme.typography.body;
    format!(
        "font-size:{};line-height:{};margin:0 0 {};color:{};",
        body.size, body.line_height, body.margin_bottom, theme.colors.text
    )
}

fn paragraph(text: &str, inline: Option<&[Inline]>, theme: &ThemeConfig) -> Markup {
    html! {
        p style=(body_style(theme)) {
            @match inline {
                Some(inline) => { (render_inlines(inline, theme)) }
                None => { (text) }
            }
        }
    }
}

fn render_inlines(inlines: &[Inline], theme: &ThemeConfig) -> Markup {
    html! {
        @for inline in inlines {
            (render_inline(inline, theme))
        }
    }
}

fn render_inline(inline: &Inline, theme: &ThemeConfig) -> Markup {
    match inline {
        Inline::Text(text) => html! { (text) },
        Inline::Strong(children) => html! { strong { (render_inlines(children, theme)) } },
        Inline::Emphasis(children) => html! { em { (render_inlines(children, theme)) } },
        Inline::Underline(children) => html! { u { (render_inlines(children, theme)) } },
        Inline::Strike(children) => html! { s { (render_inlines(children, theme)) } },
        Inline::Code(code) => {
            let style = format!(
                "font-family:{};font-size:0.9em;background:{};padding:0 1mm;border-radius:2px;",
                theme.typography.mono_font, theme.colors.surface_alt
            );
            html! { code style=(style) { (code) } }
        }
        Inline::Link { href, children } => {
            let style = format!("color:{};text-decoration:underline;", theme.colors.accent);
            html! { a href=(href) style=(style) { (render_inlines(children, theme)) } }
        }
        Inline::LineBreak => html! { br; },
    }
}

fn list(ordered: bool, items: &[String], theme: &ThemeConfig) -> Markup {
    let style = format!("{}padding-left:6mm;", body_style(theme));
    let item_style = format!("margin-bottom:{};", theme.spacing.element_spacing);
    html! {
        @if ordered {
            ol style=(style) {
                @for item in items { li style=(item_style) { (item) } }
            }
        } @else {
            ul style=(style) {
                @for item in items { li style=(item_style) { (item) } }
            }
        }
    }
}

fn quote(text: &str, author: Option<&str>, theme: &ThemeConfig) -> Markup {
    let style = format!(
        "{NO_BREAK}margin:{} 0;padding:3mm 0 3mm 6mm;border-left:3px solid {};font-family:{};font-style:italic;font-size:{};line-height:{};color:{};",
        theme.spacing.block_spacing,
        theme.colors.accent,
        theme.typography.heading_font,
        theme.typography.h4.size,
        theme.typography.body.line_height,
        theme.colors.text_secondary
    );
    let author_style = format!(
        "margin-top:2mm;font-style:normal;font-size:{};color:{};",
        theme.typography.small.size, theme.colors.text_muted
    );
    html! {
        blockquote style=(style) {
            p style="margin:0;" { (text) }
            @if let Some(author) = author {
                footer style=(author_style) { "— " (author) }
            }
        }
    }
}

fn figure(image: &ImageRef, ctx: &RenderContext) -> Markup {
    let Some(src) = ctx.image_src(&image.src) else {
        return html! {};
    };
    let theme = ctx.theme;
    let style = format!(
        "{NO_BREAK}margin:{} 0;background:{};border-radius:{};overflow:hidden;",
        theme.spacing.block_spacing, theme.colors.surface_alt, theme.blocks.border_radius
    );
    let img_style = format!(
        "display:block;max-width:100%;max-height:110mm;margin:0 auto;object-fit:contain;{}",
        markup::photo_filter(theme)
    );
    html! {
        figure style=(style) {
            img src=(src) alt=(image.alt.as_deref().unwrap_or_default()) style=(img_style)
                onerror=(markup::hide_on_error(theme.colors.surface_alt));
            @if let Some(caption) = &image.caption {
                figcaption style=(caption_style(theme)) { (caption) }
            }
        }
    }
}

fn caption_style(theme: &ThemeConfig) -> String {
    format!(
        "padding:2mm 3mm;font-size:{};line-height:{};color:{};text-align:center;background:{};",
        theme.typography.caption.size,
        theme.typography.caption.line_height,
        theme.colors.text_muted,
        theme.colors.background
    )
}

fn gallery(images: &[ImageRef], columns: u8, ctx: &RenderContext) -> Markup {
    let theme = ctx.theme;
    let sources: Vec<(String, &ImageRef)> = images
        .iter()
        .filter_map(|image| ctx.image_src(&image.src).map(|src| (src, image)))
        .collect();
    if sources.is_empty() {
        return html! {};
    }
    let style = format!(
        "{NO_BREAK}display:grid;grid-template-columns:repeat({}, 1fr);gap:{};margin:{} 0;",
        columns.clamp(1, 4),
        theme.spacing.column_gap,
        theme.spacing.block_spacing
    );
    let cell_style = format!(
        "height:45mm;border-radius:{};overflow:hidden;background:{};",
        theme.blocks.border_radius, theme.colors.surface_alt
    );
    html! {
        div.content-gallery style=(style) {
            @for (src, image) in &sources {
                div style=(cell_style) {
                    (markup::cover_image(src, image.alt.as_deref().unwrap_or_default(), theme))
                }
            }
        }
    }
}

fn callout_palette(kind: CalloutKind, theme: &ThemeConfig) -> (BlockColors, Icon) {
    let colors = &theme.colors;
    match kind {
        CalloutKind::Info => (colors.info_block, Icon::Info),
        CalloutKind::Warning => (colors.warning_block, Icon::Warning),
        CalloutKind::Tip => (colors.tip_block, Icon::Bulb),
        CalloutKind::Danger => (colors.danger_block, Icon::Warning),
    }
}

fn callout(kind: CalloutKind, title: Option<&str>, content: &str, theme: &ThemeConfig) -> Markup {
    let (palette, icon) = callout_palette(kind, theme);
    let style = format!(
        "{NO_BREAK}margin:{} 0;padding:4mm 5mm;background:{};border-left:4px solid {};border-radius:{};color:{};",
        theme.spacing.block_spacing,
        palette.background,
        palette.border,
        theme.blocks.border_radius,
        palette.text
    );
    let title_style = format!(
        "display:flex;align-items:center;gap:2mm;margin-bottom:2mm;font-weight:700;font-size:{};",
        theme.typography.body.size
    );
    let content_style = format!(
        "margin:0;font-size:{};line-height:{};",
        theme.typography.body.size, theme.typography.body.line_height
    );
    html! {
        aside class={ "callout callout-" (kind_class(kind)) } style=(style) {
            div style=(title_style) {
                (markup::icon(icon, 16, palette.icon))
                span { (title.unwrap_or(labels::callout_title(kind))) }
            }
            @if !content.is_empty() {
                p style=(content_style) { (content) }
            }
        }
    }
}

fn kind_class(kind: CalloutKind) -> &'static str {
    match kind {
        CalloutKind::Info => "info",
        CalloutKind::Warning => "warning",
        CalloutKind::Tip => "tip",
        CalloutKind::Danger => "danger",
    }
}

fn code(text: &str, language: Option<&str>, theme: &ThemeConfig) -> Markup {
    let style = format!(
        "{NO_BREAK}margin:{} 0;padding:4mm;background:{};border:1px solid {};border-radius:{};font-family:{};font-size:{};line-height:1.5;white-space:pre-wrap;word-break:break-word;color:{};",
        theme.spacing.block_spacing,
        theme.colors.surface_alt,
        theme.colors.border_light,
        theme.blocks.border_radius,
        theme.typography.mono_font,
        theme.typography.small.size,
        theme.colors.text
    );
    html! {
        pre style=(style) {
            code class=[language.map(|lang| format!("language-{lang}"))] { (text) }
        }
    }
}

fn table(headers: Option<&[String]>, rows: &[Vec<String>], theme: &ThemeConfig) -> Markup {
    let style = format!(
        "{NO_BREAK}width:100%;border-collapse:collapse;margin:{} 0;font-size:{};color:{};",
        theme.spacing.block_spacing, theme.typography.small.size, theme.colors.text
    );
    let th_style = format!(
        "text-align:left;padding:2mm 3mm;background:{};border-bottom:2px solid {};font-weight:600;",
        theme.colors.surface_alt, theme.colors.border
    );
    let td_style = format!(
        "padding:2mm 3mm;border-bottom:1px solid {};vertical-align:top;",
        theme.colors.border_light
    );
    html! {
        table style=(style) {
            @if let Some(headers) = headers {
                thead {
                    tr {
                        @for header in headers { th style=(th_style) { (header) } }
                    }
                }
            }
            tbody {
                @for row in rows {
                    tr {
                        @for cell in row { td style=(td_style) { (cell) } }
                    }
                }
            }
        }
    }
}

fn separator(theme: &ThemeConfig) -> Markup {
    let style = format!(
        "border:none;border-top:1px solid {};margin:{} 0;",
        theme.colors.border_light, theme.spacing.section_spacing
    );
    html! { hr style=(style); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse;
    use crate::test_helpers::context;

    fn render(raw: &str) -> String {
        render_blocks(&parse(raw), &context()).into_string()
    }

    // =========================================================================
    // Escaping
    // =========================================================================

    #[test]
    fn text_is_escaped() {
        let html = render_block(&Block::paragraph("<script>alert(1)</script>"), &context()).into_string();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn inline_tree_renders_formatting() {
        let html = render("<p>a <strong>b</strong> <em>c</em> <a href=\"https://x.y/?a=1&b=2\">d</a></p>");
        assert!(html.contains("<strong>b</strong>"));
        assert!(html.contains("<em>c</em>"));
        assert!(html.contains(r#"href="https://x.y/?a=1&amp;b=2""#));
    }

    // =========================================================================
    // Images
    // =========================================================================

    #[test]
    fn images_go_through_the_normalizer() {
        let html = render(r#"<img src="/uploads/a.jpg" alt="A">"#);
        assert!(html.contains("https://images.weserv.nl/?url=metravel.by%2Fuploads%2Fa.jpg"));
        assert!(html.contains("onerror="));
        assert!(html.contains("page-break-inside:avoid"));
    }

    #[test]
    fn gallery_renders_every_image() {
        let html = render(r#"<div><img src="1.jpg"><img src="2.jpg"><img src="3.jpg"></div>"#);
        assert_eq!(html.matches("<img").count(), 3);
        assert!(html.contains("repeat(2, 1fr)"));
    }

    #[test]
    fn blank_image_source_renders_nothing() {
        let block = Block::Image(ImageRef::new("   "));
        assert_eq!(render_block(&block, &context()).into_string(), "");
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    #[test]
    fn heading_levels_and_break_guard() {
        let html = render("<h2>Day one</h2><h5>Note</h5>");
        assert!(html.contains("<h2 "));
        assert!(html.contains("<h5 "));
        assert!(html.contains("page-break-after:avoid"));
    }

    #[test]
    fn callout_uses_theme_palette_and_default_title() {
        let ctx = context();
        let block = Block::Callout {
            kind: CalloutKind::Tip,
            title: None,
            content: "Берите воду".into(),
        };
        let html = render_block(&block, &ctx).into_string();
        assert!(html.contains(ctx.theme.colors.tip_block.background));
        assert!(html.contains("Совет"));
        assert!(html.contains("callout-tip"));
    }

    #[test]
    fn quote_author_footer() {
        let html = render("<blockquote>Go <cite>Someone</cite></blockquote>");
        assert!(html.contains("<blockquote"));
        assert!(html.contains("— Someone"));
    }

    #[test]
    fn code_keeps_language_class() {
        let html = render("<pre class=\"language-sh\">ls -la</pre>");
        assert!(html.contains(r#"class="language-sh""#));
        assert!(html.contains("ls -la"));
    }

    #[test]
    fn table_with_headers() {
        let html = render("<table><tr><th>A</th></tr><tr><td>1</td></tr></table>");
        assert!(html.contains("<thead>"));
        assert!(html.contains(">1</td>"));
    }

    #[test]
    fn lists_and_separator() {
        let html = render("<ol><li>x</li></ol><hr><ul><li>y</li></ul>");
        assert!(html.contains("<ol "));
        assert!(html.contains("<ul "));
        assert!(html.contains("<hr "));
    }
}

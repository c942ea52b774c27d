//! Packing checklist page built from a fixed item library.

use crate::book::RenderContext;
use crate::config::{BookSettings, ChecklistSection};
use crate::labels;
use crate::markup::{self, NO_BREAK};
use maud::{Markup, html};

pub fn items_for(section: ChecklistSection) -> &'static [&'static str] {
    match section {
        ChecklistSection::Clothing => &[
            "Термобельё",
            "Тёплый слой/флис",
            "Дождевик/пончо",
            "Треккинговая обувь",
            "Шапка, перчатки, бафф",
        ],
        ChecklistSection::Food => &[
            "Перекусы",
            "Термос",
            "Походная посуда",
            "Мультитул/нож",
            "Фильтр или запас воды",
        ],
        ChecklistSection::Electronics => &[
            "Повербанк",
            "Камера/GoPro",
            "Переходники",
            "Налобный фонарь",
            "Запасные карты памяти",
        ],
        ChecklistSection::Documents => &[
            "Паспорт",
            "Билеты/бронирования",
            "Страховка",
            "Водительские права",
            "Список контактов",
        ],
        ChecklistSection::Medicine => &[
            "Индивидуальные лекарства",
            "Пластыри и бинт",
            "Средство от насекомых",
            "Солнцезащита",
            "Антисептик",
        ],
    }
}

/// Selected sections that have items, first occurrence kept.
pub fn resolve_sections(settings: &BookSettings) -> Vec<ChecklistSection> {
    let mut sections: Vec<ChecklistSection> = Vec::new();
    for section in &settings.checklist_sections {
        if !sections.contains(section) && !items_for(*section).is_empty() {
            sections.push(*section);
        }
    }
    sections
}

/// The checklist page, or `None` when nothing resolves.
pub fn render(ctx: &RenderContext, page: usize) -> Option<Markup> {
    let sections = resolve_sections(&ctx.settings);
    if sections.is_empty() {
        return None;
    }
    let theme = ctx.theme;
    let colors = &theme.colors;
    let columns = if sections.len() >= 4 { 2 } else { 3 };

    let card = format!(
        "padding:{};background:{};border:{} solid {};border-radius:{};box-shadow:{};{NO_BREAK}",
        theme.spacing.block_spacing,
        colors.surface,
        theme.blocks.border_width,
        colors.border,
        theme.blocks.border_radius,
        theme.blocks.shadow
    );
    let item_style = format!(
        "display:flex;align-items:flex-start;gap:2mm;margin-bottom:1.2mm;font-size:{};line-height:{};color:{};",
        theme.typography.body.size, theme.typography.body.line_height, colors.text_secondary
    );
    let checkbox = format!(
        "display:inline-block;width:3.2mm;height:3.2mm;min-width:3.2mm;margin-top:0.8mm;border:1.5px solid {};border-radius:0.5mm;",
        colors.border
    );

    let body = html! {
        (markup::running_header(labels::CHECKLIST_TITLE, page, theme))
        div style={ "text-align:center;margin-bottom:" (theme.spacing.section_spacing) ";" } {
            h2 style=(markup::heading_style(theme, 2, colors.text)) { (labels::CHECKLIST_TITLE) }
            p style={ "margin:0;font-size:" (theme.typography.body.size) ";color:" (colors.text_muted) ";" } {
                (labels::CHECKLIST_SUBTITLE)
            }
        }
        div.checklist-grid style={
            "display:grid;grid-template-columns:repeat(" (columns) ", minmax(0, 1fr));gap:" (theme.spacing.element_spacing) ";"
        } {
            @for section in &sections {
                @let items = items_for(*section);
                div.checklist-card style=(card) {
                    h3 style=(markup::heading_style(theme, 4, colors.text)) { (labels::checklist_section(*section)) }
                    div style={ "margin-bottom:2mm;font-size:" (theme.typography.caption.size) ";color:" (colors.text_muted) ";" } {
                        (labels::count(items.len() as u64, labels::ITEMS))
                    }
                    @for item in items {
                        div style=(item_style) {
                            span.checkbox style=(checkbox) {}
                            span { (item) }
                        }
                    }
                }
            }
        }
        (markup::page_number(page, theme))
    };
    let style = format!("{}position:relative;", markup::page_style(theme));
    Some(markup::pdf_page("checklist", page, None, &style, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{context, context_with_settings};

    #[test]
    fn resolve_dedupes_and_keeps_order() {
        let settings = BookSettings {
            checklist_sections: vec![
                ChecklistSection::Medicine,
                ChecklistSection::Food,
                ChecklistSection::Medicine,
            ],
            ..BookSettings::default()
        };
        assert_eq!(
            resolve_sections(&settings),
            vec![ChecklistSection::Medicine, ChecklistSection::Food]
        );
    }

    #[test]
    fn nothing_selected_renders_nothing() {
        let ctx = context_with_settings(BookSettings {
            checklist_sections: Vec::new(),
            ..BookSettings::default()
        });
        assert!(render(&ctx, 9).is_none());
    }

    #[test]
    fn default_sections_render_cards_with_checkboxes() {
        let html = render(&context(), 9).unwrap().into_string();
        assert!(html.contains(r#"class="pdf-page checklist-page" data-page="9""#));
        assert_eq!(html.matches("class=\"checklist-card\"").count(), 3);
        assert_eq!(html.matches("class=\"checkbox\"").count(), 15);
        assert!(html.contains("Повербанк"));
        assert!(html.contains("5 пунктов"));
        assert!(!html.contains("Паспорт"));
    }
}

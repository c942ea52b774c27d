//! CLI output formatting.
//!
//! Output is **information-first**: each travel leads with its positional
//! index and name, and the pages it occupies follow as indented context
//! lines. The same plan can be inspected with `travel-book plan` before
//! anything is rendered.
//!
//! ## Plan
//!
//! ```text
//! Book: Мои путешествия (theme minimal)
//! 001 cover
//! 002 toc
//!
//! Travels
//! 001 Минск (pages 3-10)
//!     Photo: 3
//!     Content: 4
//!     Gallery: 5-9 (9 photos)
//!     Map: 10 (2 locations)
//!
//! Closing
//! 011 checklist
//! 012 final
//!
//! 12 pages
//! ```
//!
//! ## Themes
//!
//! ```text
//! minimal   Минимализм: Чистый и современный дизайн
//! ```
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::plan::{BookPlan, PageKind};
use crate::theme::ThemeConfig;
use crate::types::TravelForBook;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// `"5"` or `"5-6"`.
fn page_range(first: usize, last: usize) -> String {
    if first == last {
        first.to_string()
    } else {
        format!("{first}-{last}")
    }
}

/// First and last page of one travel's pages of a given kind.
fn span_of(plan: &BookPlan, travel: usize, kind: &str) -> Option<(usize, usize)> {
    let mut pages = plan
        .numbered()
        .filter(|(_, k)| k.travel() == Some(travel) && k.name() == kind)
        .map(|(n, _)| n);
    let first = pages.next()?;
    let last = pages.last().unwrap_or(first);
    Some((first, last))
}

/// Page-by-page summary of a planned book.
pub fn format_plan(title: &str, theme: &str, travels: &[TravelForBook], plan: &BookPlan) -> Vec<String> {
    let mut lines = vec![format!("Book: {title} (theme {theme})")];

    let (front, back): (Vec<_>, Vec<_>) = plan
        .numbered()
        .filter(|(_, kind)| kind.travel().is_none())
        .partition(|(_, kind)| matches!(kind, PageKind::Cover | PageKind::Toc));
    for (number, kind) in &front {
        lines.push(format!("{} {}", format_index(*number), kind.name()));
    }

    if !plan.sections.is_empty() {
        lines.push(String::new());
        lines.push("Travels".to_string());
    }
    for section in &plan.sections {
        let Some(travel) = travels.get(section.index) else {
            continue;
        };
        let (first, last) = plan
            .numbered()
            .filter(|(_, k)| k.travel() == Some(section.index))
            .fold((usize::MAX, 0), |(lo, hi), (n, _)| (lo.min(n), hi.max(n)));
        lines.push(format!(
            "{} {} (pages {})",
            format_index(section.index + 1),
            travel.name,
            page_range(first, last)
        ));
        if let Some(page) = section.separator_page {
            lines.push(format!("    Separator: {page}"));
        }
        lines.push(format!("    Photo: {}", section.start_page));
        if let Some((page, _)) = span_of(plan, section.index, "content") {
            lines.push(format!("    Content: {page}"));
        }
        if let Some((lo, hi)) = span_of(plan, section.index, "gallery") {
            lines.push(format!(
                "    Gallery: {} ({} photos)",
                page_range(lo, hi),
                travel.photo_count()
            ));
        }
        if let Some((page, _)) = span_of(plan, section.index, "map") {
            lines.push(format!("    Map: {page} ({} locations)", section.locations.len()));
        }
    }

    lines.push(String::new());
    lines.push("Closing".to_string());
    for (number, kind) in &back {
        lines.push(format!("{} {}", format_index(*number), kind.name()));
    }

    lines.push(String::new());
    lines.push(format!("{} pages", plan.total_pages));
    lines
}

pub fn print_plan(title: &str, theme: &str, travels: &[TravelForBook], plan: &BookPlan) {
    for line in format_plan(title, theme, travels, plan) {
        println!("{}", line);
    }
}

/// Theme registry listing, names padded to one column.
pub fn format_themes(themes: &[ThemeConfig]) -> Vec<String> {
    let width = themes.iter().map(|t| t.name.len()).max().unwrap_or(0);
    themes
        .iter()
        .map(|t| format!("{:<width$}  {}: {}", t.name, t.display_name, t.description))
        .collect()
}

pub fn print_themes(themes: &[ThemeConfig]) {
    for line in format_themes(themes) {
        println!("{}", line);
    }
}

/// One-line report after the document is written.
pub fn format_written(path: &str, pages: usize, bytes: usize) -> String {
    let size = if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{} KB", bytes.div_ceil(1024))
    };
    format!("Wrote {path} ({pages} pages, {size})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BookSettings;
    use crate::plan::plan_book;
    use crate::test_helpers::travel;
    use crate::types::TravelLocation;

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn page_range_collapses_single_page() {
        assert_eq!(page_range(5, 5), "5");
        assert_eq!(page_range(5, 7), "5-7");
    }

    // =========================================================================
    // Plan
    // =========================================================================

    #[test]
    fn plan_lists_every_travel_page() {
        let mut t = travel("1", "Минск");
        t.gallery = (0..9).map(|i| format!("{i}.jpg")).collect();
        t.locations = vec![
            TravelLocation::new("Центр", "53.9,27.56"),
            TravelLocation::new("Вокзал", "53.89,27.55"),
        ];
        let settings = BookSettings {
            include_checklists: true,
            ..BookSettings::default()
        };
        let travels = vec![t];
        let plan = plan_book(&travels, &settings);
        let lines = format_plan("Мои путешествия", "minimal", &travels, &plan);

        assert_eq!(lines[0], "Book: Мои путешествия (theme minimal)");
        assert_eq!(lines[1], "001 cover");
        assert_eq!(lines[2], "002 toc");
        assert!(lines.contains(&"001 Минск (pages 3-10)".to_string()));
        assert!(lines.contains(&"    Photo: 3".to_string()));
        assert!(lines.contains(&"    Content: 4".to_string()));
        assert!(lines.contains(&"    Gallery: 5-9 (9 photos)".to_string()));
        assert!(lines.contains(&"    Map: 10 (2 locations)".to_string()));
        assert_eq!(lines.last().unwrap(), &format!("{} pages", plan.total_pages));
        assert!(lines.contains(&"011 checklist".to_string()));
        assert!(lines.contains(&"012 final".to_string()));
    }

    #[test]
    fn empty_plan_has_no_travels_section() {
        let plan = plan_book(&[], &BookSettings::default());
        let lines = format_plan("T", "minimal", &[], &plan);
        assert!(!lines.contains(&"Travels".to_string()));
        assert!(lines.contains(&"003 final".to_string()));
        assert_eq!(lines.last().unwrap(), "3 pages");
    }

    // =========================================================================
    // Themes and summary
    // =========================================================================

    #[test]
    fn themes_are_aligned() {
        let lines = format_themes(crate::theme::all_themes());
        assert_eq!(lines.len(), crate::theme::all_themes().len());
        assert!(lines.iter().any(|l| l.starts_with("minimal ")));
    }

    #[test]
    fn written_summary_units() {
        assert_eq!(format_written("book.html", 9, 2048), "Wrote book.html (9 pages, 2 KB)");
        assert_eq!(
            format_written("book.html", 9, 3 * 1024 * 1024),
            "Wrote book.html (9 pages, 3.0 MB)"
        );
    }
}

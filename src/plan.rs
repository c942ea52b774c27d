//! Pagination planner.
//!
//! One forward pass over the sorted travels reserves every page of the book
//! before any markup is produced. The table of contents comes early in the
//! document but prints every travel's start page, so the plan must exist up
//! front.
//!
//! ## Page Sequence
//!
//! ```text
//! Cover
//! [Table of contents]                       include_toc
//! for each travel:
//!     [Separator]                           include_separators, 3+ travels, not the first
//!     Photo                                 <- start_page
//!     Content
//!     [Gallery × ceil(photos / per_page)]   see gallery_pages_for
//!     [Map]                                 include_map and 1+ location
//! [Checklist]                               include_checklists and 1+ resolved section
//! Final
//! ```
//!
//! The assembler renders exactly [`BookPlan::pages`] in order, so each
//! `start_page` is the 1-indexed position of that travel's photo page.

use crate::config::{BookSettings, GalleryLayout, GalleryPlacement};
use crate::pages::checklist;
use crate::types::{NormalizedLocation, TravelForBook};
use serde::Serialize;

/// Travels with up to this many photos show them inline on the content page
/// unless dedicated gallery pages are requested.
pub const INLINE_GALLERY_MAX: usize = 4;

/// Separator pages appear only in books with at least this many travels.
pub const SEPARATOR_MIN_TRAVELS: usize = 3;

/// One physical page of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PageKind {
    Cover,
    Toc,
    Separator { travel: usize },
    Photo { travel: usize },
    Content { travel: usize },
    /// `page` is 0-based within the travel's gallery.
    Gallery { travel: usize, page: usize },
    Map { travel: usize },
    Checklist,
    Final,
}

impl PageKind {
    /// Short name used in plan output and CSS classes.
    pub fn name(&self) -> &'static str {
        match self {
            PageKind::Cover => "cover",
            PageKind::Toc => "toc",
            PageKind::Separator { .. } => "separator",
            PageKind::Photo { .. } => "photo",
            PageKind::Content { .. } => "content",
            PageKind::Gallery { .. } => "gallery",
            PageKind::Map { .. } => "map",
            PageKind::Checklist => "checklist",
            PageKind::Final => "final",
        }
    }

    /// Index of the travel this page belongs to.
    pub fn travel(&self) -> Option<usize> {
        match *self {
            PageKind::Separator { travel }
            | PageKind::Photo { travel }
            | PageKind::Content { travel }
            | PageKind::Gallery { travel, .. }
            | PageKind::Map { travel } => Some(travel),
            _ => None,
        }
    }
}

/// Derived per-travel record built before any travel page is rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelSectionMeta {
    /// Index into the sorted travel list.
    pub index: usize,
    pub has_gallery: bool,
    pub gallery_pages: usize,
    pub has_map: bool,
    pub locations: Vec<NormalizedLocation>,
    pub separator_page: Option<usize>,
    /// 1-indexed page of the travel's photo page.
    pub start_page: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookPlan {
    pub sections: Vec<TravelSectionMeta>,
    pub pages: Vec<PageKind>,
    pub total_pages: usize,
}

impl BookPlan {
    /// 1-indexed page numbers paired with their kinds.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, PageKind)> + '_ {
        self.pages.iter().enumerate().map(|(i, kind)| (i + 1, *kind))
    }

    pub fn has_checklist(&self) -> bool {
        self.pages.contains(&PageKind::Checklist)
    }
}

/// Photos on one dedicated gallery page.
pub fn photos_per_page(settings: &BookSettings, photo_count: usize) -> usize {
    if settings.gallery_layout == GalleryLayout::Slideshow {
        return 1;
    }
    match settings.gallery_photos_per_page {
        0 => photo_count.max(1),
        n => n,
    }
}

/// Number of dedicated gallery pages a travel gets.
///
/// Zero unless the gallery is enabled and the travel has photos. With
/// `gallery_placement = "auto"`, travels of up to [`INLINE_GALLERY_MAX`]
/// photos show them inline instead.
pub fn gallery_pages_for(travel: &TravelForBook, settings: &BookSettings) -> usize {
    if !settings.include_gallery {
        return 0;
    }
    let photos = travel.photo_count();
    if photos == 0 {
        return 0;
    }
    if photos <= INLINE_GALLERY_MAX && settings.gallery_placement == GalleryPlacement::Auto {
        return 0;
    }
    photos.div_ceil(photos_per_page(settings, photos))
}

/// Reserve every page of the book. `travels` must already be sorted.
pub fn plan_book(travels: &[TravelForBook], settings: &BookSettings) -> BookPlan {
    let mut pages = vec![PageKind::Cover];
    if settings.include_toc {
        pages.push(PageKind::Toc);
    }
    let separators = settings.include_separators && travels.len() >= SEPARATOR_MIN_TRAVELS;

    let mut sections = Vec::with_capacity(travels.len());
    for (index, travel) in travels.iter().enumerate() {
        let separator_page = (separators && index > 0).then(|| {
            pages.push(PageKind::Separator { travel: index });
            pages.len()
        });

        let start_page = pages.len() + 1;
        pages.push(PageKind::Photo { travel: index });
        pages.push(PageKind::Content { travel: index });

        let gallery_pages = gallery_pages_for(travel, settings);
        pages.extend((0..gallery_pages).map(|page| PageKind::Gallery {
            travel: index,
            page,
        }));

        let locations = travel.normalized_locations();
        let has_map = settings.include_map && !locations.is_empty();
        if has_map {
            pages.push(PageKind::Map { travel: index });
        }

        log::debug!(
            "plan: travel #{} {:?} starts at page {start_page} ({gallery_pages} gallery, map: {has_map})",
            index + 1,
            travel.name
        );
        sections.push(TravelSectionMeta {
            index,
            has_gallery: gallery_pages > 0,
            gallery_pages,
            has_map,
            locations,
            separator_page,
            start_page,
        });
    }

    if settings.include_checklists && !checklist::resolve_sections(settings).is_empty() {
        pages.push(PageKind::Checklist);
    }
    pages.push(PageKind::Final);

    BookPlan {
        sections,
        total_pages: pages.len(),
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChecklistSection;
    use crate::types::TravelLocation;

    fn travel(id: &str, photos: usize, locations: usize) -> TravelForBook {
        let mut travel = TravelForBook::new(id, format!("Travel {id}"));
        travel.gallery = (0..photos).map(|i| format!("https://x/{id}/{i}.jpg")).collect();
        travel.locations = (0..locations)
            .map(|i| TravelLocation::new(format!("Place {i}"), "53.9,27.5"))
            .collect();
        travel
    }

    fn photo_position(plan: &BookPlan, index: usize) -> usize {
        plan.pages
            .iter()
            .position(|p| *p == PageKind::Photo { travel: index })
            .unwrap()
            + 1
    }

    // =========================================================================
    // Example scenarios
    // =========================================================================

    #[test]
    fn three_photos_render_inline_by_default() {
        let settings = BookSettings {
            include_map: false,
            ..BookSettings::default()
        };
        let plan = plan_book(&[travel("1", 3, 0)], &settings);
        assert_eq!(
            plan.pages,
            vec![
                PageKind::Cover,
                PageKind::Toc,
                PageKind::Photo { travel: 0 },
                PageKind::Content { travel: 0 },
                PageKind::Final,
            ]
        );
        assert_eq!(plan.total_pages, 5);
        assert_eq!(plan.sections[0].start_page, 3);
        assert!(!plan.sections[0].has_gallery);
    }

    #[test]
    fn dedicated_placement_adds_gallery_page() {
        let settings = BookSettings {
            include_map: false,
            gallery_placement: GalleryPlacement::Dedicated,
            gallery_photos_per_page: 0,
            ..BookSettings::default()
        };
        let plan = plan_book(&[travel("1", 3, 0)], &settings);
        assert_eq!(
            plan.pages,
            vec![
                PageKind::Cover,
                PageKind::Toc,
                PageKind::Photo { travel: 0 },
                PageKind::Content { travel: 0 },
                PageKind::Gallery { travel: 0, page: 0 },
                PageKind::Final,
            ]
        );
        assert_eq!(plan.sections[0].start_page, 3);
    }

    #[test]
    fn six_photos_four_per_page_is_two_pages() {
        let settings = BookSettings {
            gallery_photos_per_page: 4,
            ..BookSettings::default()
        };
        assert_eq!(gallery_pages_for(&travel("1", 6, 0), &settings), 2);
    }

    // =========================================================================
    // Gallery page count
    // =========================================================================

    #[test]
    fn photos_per_page_rules() {
        let mut settings = BookSettings::default();
        assert_eq!(photos_per_page(&settings, 9), 2);
        settings.gallery_photos_per_page = 0;
        assert_eq!(photos_per_page(&settings, 9), 9);
        assert_eq!(photos_per_page(&settings, 0), 1);
        settings.gallery_layout = GalleryLayout::Slideshow;
        assert_eq!(photos_per_page(&settings, 9), 1);
    }

    #[test]
    fn no_gallery_pages_when_disabled_or_empty() {
        let settings = BookSettings {
            include_gallery: false,
            ..BookSettings::default()
        };
        assert_eq!(gallery_pages_for(&travel("1", 9, 0), &settings), 0);
        assert_eq!(gallery_pages_for(&travel("1", 0, 0), &BookSettings::default()), 0);
    }

    #[test]
    fn blank_gallery_entries_do_not_count() {
        let mut t = travel("1", 5, 0);
        t.gallery[0] = "   ".into();
        assert_eq!(gallery_pages_for(&t, &BookSettings::default()), 0);
    }

    #[test]
    fn slideshow_is_one_page_per_photo() {
        let settings = BookSettings {
            gallery_layout: GalleryLayout::Slideshow,
            ..BookSettings::default()
        };
        assert_eq!(gallery_pages_for(&travel("1", 7, 0), &settings), 7);
    }

    // =========================================================================
    // Optional pages
    // =========================================================================

    #[test]
    fn map_page_needs_a_location() {
        let plan = plan_book(&[travel("1", 0, 2), travel("2", 0, 0)], &BookSettings::default());
        assert!(plan.sections[0].has_map);
        assert!(!plan.sections[1].has_map);
        assert!(plan.pages.contains(&PageKind::Map { travel: 0 }));
        assert!(!plan.pages.contains(&PageKind::Map { travel: 1 }));
    }

    #[test]
    fn separators_only_for_three_or_more_travels() {
        let settings = BookSettings {
            include_separators: true,
            ..BookSettings::default()
        };
        let two = plan_book(&[travel("1", 0, 0), travel("2", 0, 0)], &settings);
        assert!(two.sections.iter().all(|s| s.separator_page.is_none()));

        let three = plan_book(
            &[travel("1", 0, 0), travel("2", 0, 0), travel("3", 0, 0)],
            &settings,
        );
        assert_eq!(three.sections[0].separator_page, None);
        assert_eq!(three.sections[1].separator_page, Some(5));
        assert_eq!(three.sections[1].start_page, 6);
        assert_eq!(three.sections[2].separator_page, Some(8));
        assert_eq!(three.sections[2].start_page, 9);
    }

    #[test]
    fn checklist_page_needs_resolved_sections() {
        let mut settings = BookSettings {
            include_checklists: true,
            ..BookSettings::default()
        };
        assert!(plan_book(&[], &settings).has_checklist());
        settings.checklist_sections.clear();
        assert!(!plan_book(&[], &settings).has_checklist());
        settings.checklist_sections = vec![ChecklistSection::Medicine];
        assert!(plan_book(&[], &settings).has_checklist());
    }

    #[test]
    fn empty_book_is_cover_toc_final() {
        let plan = plan_book(&[], &BookSettings::default());
        assert_eq!(plan.pages, vec![PageKind::Cover, PageKind::Toc, PageKind::Final]);
        assert!(plan.sections.is_empty());
    }

    // =========================================================================
    // Soundness
    // =========================================================================

    #[test]
    fn start_pages_match_photo_positions_across_settings() {
        let travels = vec![
            travel("a", 0, 0),
            travel("b", 3, 1),
            travel("c", 5, 0),
            travel("d", 12, 4),
            travel("e", 1, 2),
        ];
        for toc in [false, true] {
            for gallery in [false, true] {
                for map in [false, true] {
                    for separators in [false, true] {
                        for placement in [GalleryPlacement::Auto, GalleryPlacement::Dedicated] {
                            for per_page in [0, 1, 2, 4, 5] {
                                for layout in [GalleryLayout::Grid, GalleryLayout::Slideshow] {
                                    let settings = BookSettings {
                                        include_toc: toc,
                                        include_gallery: gallery,
                                        include_map: map,
                                        include_separators: separators,
                                        include_checklists: true,
                                        gallery_placement: placement,
                                        gallery_photos_per_page: per_page,
                                        gallery_layout: layout,
                                        ..BookSettings::default()
                                    };
                                    let plan = plan_book(&travels, &settings);
                                    let mut previous = 0;
                                    for section in &plan.sections {
                                        assert_eq!(section.start_page, photo_position(&plan, section.index));
                                        assert!(section.start_page > previous);
                                        previous = section.start_page;
                                    }
                                    assert_eq!(plan.total_pages, plan.pages.len());
                                    assert_eq!(plan.pages.last(), Some(&PageKind::Final));
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

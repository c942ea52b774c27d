//! End-to-end document properties through the public API.
//!
//! Every test renders with map snapshots and remote fetching turned off, so
//! nothing leaves the machine: QR codes are encoded locally and map pages
//! fall back to the vector route.

use travel_book::book::{generate_blocking, sort_travels};
use travel_book::config::{
    BookConfig, BookSettings, GalleryLayout, GalleryPlacement, MapProvider,
};
use travel_book::content::{Block, parse};
use travel_book::enrich::Services;
use travel_book::plan::plan_book;
use travel_book::types::{TravelForBook, TravelLocation, parse_travels};
use travel_book::url::normalize;

fn offline(book: BookSettings) -> BookConfig {
    let mut config = BookConfig {
        book,
        ..BookConfig::default()
    };
    config.map.provider = MapProvider::None;
    config.fetch.remote = false;
    config
}

fn render(travels: &[TravelForBook], config: &BookConfig) -> String {
    generate_blocking(travels, config, &Services::new(config)).unwrap()
}

/// Page sections in document order as `(kind, number)`.
fn pages(html: &str) -> Vec<(String, usize)> {
    html.split("<section class=\"pdf-page ")
        .skip(1)
        .map(|rest| {
            let kind = rest.split('"').next().unwrap_or("").trim_end_matches("-page");
            let number = rest
                .split("data-page=\"")
                .nth(1)
                .and_then(|r| r.split('"').next())
                .and_then(|n| n.parse().ok())
                .unwrap();
            (kind.to_string(), number)
        })
        .collect()
}

fn kinds(html: &str) -> Vec<String> {
    pages(html).into_iter().map(|(kind, _)| kind).collect()
}

fn with_photos(id: &str, name: &str, count: usize) -> TravelForBook {
    let mut travel = TravelForBook::new(id, name);
    travel.gallery = (0..count).map(|i| format!("https://cdn.test/{id}/{i}.jpg")).collect();
    travel
}

// =========================================================================
// Pagination soundness
// =========================================================================

#[test]
fn start_pages_match_photo_page_positions() {
    let mut travels: Vec<TravelForBook> = (0..4)
        .map(|i| {
            let mut t = with_photos(&i.to_string(), &format!("Поездка {i}"), i * 3);
            t.year = Some(format!("{}", 2020 + i));
            if i % 2 == 0 {
                t.locations = vec![TravelLocation::new("Минск, Беларусь", "53.9,27.56")];
            }
            t
        })
        .collect();
    travels.push(TravelForBook::new("x", "Без фото"));

    let config = offline(BookSettings {
        include_separators: true,
        include_checklists: true,
        gallery_photos_per_page: 4,
        ..BookSettings::default()
    });
    let html = render(&travels, &config);
    let sorted = sort_travels(&travels, config.book.sort_order);
    let plan = plan_book(&sorted, &config.book);
    let rendered = pages(&html);

    assert_eq!(rendered.len(), plan.total_pages);
    for (position, (_, number)) in rendered.iter().enumerate() {
        assert_eq!(*number, position + 1);
    }
    for section in &plan.sections {
        assert_eq!(rendered[section.start_page - 1].0, "photo");
    }
}

// =========================================================================
// Example scenarios
// =========================================================================

#[test]
fn three_photos_show_inline() {
    let config = offline(BookSettings {
        include_map: false,
        ..BookSettings::default()
    });
    let html = render(&[with_photos("1", "Минск", 3)], &config);
    assert_eq!(kinds(&html), vec!["cover", "toc", "photo", "content", "final"]);
    assert!(html.contains("inline-gallery"));
}

#[test]
fn three_photos_on_a_dedicated_page() {
    let config = offline(BookSettings {
        include_map: false,
        gallery_placement: GalleryPlacement::Dedicated,
        gallery_photos_per_page: 0,
        ..BookSettings::default()
    });
    let html = render(&[with_photos("1", "Минск", 3)], &config);
    assert_eq!(
        kinds(&html),
        vec!["cover", "toc", "photo", "content", "gallery", "final"]
    );
    assert!(html.contains(r#"data-start="3""#));
}

#[test]
fn six_photos_four_per_page() {
    let config = offline(BookSettings {
        gallery_layout: GalleryLayout::Grid,
        gallery_photos_per_page: 4,
        ..BookSettings::default()
    });
    let html = render(&[with_photos("1", "Минск", 6)], &config);
    let galleries: Vec<&str> = html
        .split("<section class=\"pdf-page ")
        .filter(|s| s.starts_with("gallery-page"))
        .collect();
    assert_eq!(galleries.len(), 2);
    assert_eq!(galleries[0].matches("class=\"gallery-photo\"").count(), 4);
    assert_eq!(galleries[1].matches("class=\"gallery-photo\"").count(), 2);
}

#[test]
fn empty_book_still_renders() {
    let html = render(&[], &offline(BookSettings::default()));
    assert_eq!(kinds(&html), vec!["cover", "toc", "final"]);
}

// =========================================================================
// Fallbacks
// =========================================================================

#[test]
fn map_without_coordinates_uses_placeholder() {
    let mut travel = TravelForBook::new("1", "Озеро");
    travel.locations = vec![TravelLocation::new("Где-то", "not a coordinate")];
    let html = render(&[travel], &offline(BookSettings::default()));
    assert!(html.contains("map-placeholder"));
    assert!(!html.contains("map-snapshot"));
}

#[test]
fn garbage_content_still_renders() {
    let mut travel = TravelForBook::new("1", "Странный текст");
    travel.description = Some("<<<div>>> & <p unclosed <b>жирный".into());
    travel.recommendation = Some("   ".into());
    let html = render(&[travel], &offline(BookSettings::default()));
    assert!(html.contains("жирный"));
    assert!(!html.contains("recommendation-block"));
}

#[test]
fn plain_text_parses_to_one_paragraph() {
    let blocks = parse("  just some words  ");
    assert_eq!(blocks.len(), 1);
    assert!(matches!(&blocks[0], Block::Paragraph { text, .. } if text == "just some words"));
}

// =========================================================================
// Determinism and URLs
// =========================================================================

#[test]
fn same_input_renders_identically() {
    let json = r#"[
        {"id": 7, "name": "Брест", "slug": "brest", "year": "2022",
         "countryName": "Беларусь", "gallery": ["/a.jpg", "/b.jpg"],
         "description": "<p>Крепость</p><ul><li>Музей</li></ul>"}
    ]"#;
    let travels = parse_travels(json).unwrap();
    let config = offline(BookSettings::default());
    assert_eq!(render(&travels, &config), render(&travels, &config));
}

#[test]
fn proxied_urls_are_stable() {
    let config = BookConfig::default().images;
    for raw in [
        "/uploads/a.jpg",
        "//cdn.test/b.png",
        "http://localhost:8000/c.jpg",
        "https://example.com/d.jpg?x=1&y=2",
    ] {
        let once = normalize(raw, &config).unwrap();
        assert_eq!(normalize(&once, &config).unwrap(), once);
    }
}

//! Enrichment: QR codes, map snapshots, and cover analysis.
//!
//! Each collaborator sits behind a narrow trait so it can be swapped or
//! stubbed:
//!
//! | Trait | Production | Output |
//! |---|---|---|
//! | [`QrEncoder`] | [`PngQrEncoder`] (`qrcode` + `image`) | `data:image/png;base64,...` |
//! | [`MapSnapshotter`] | [`StaticMapSnapshotter`] (OSM or Google static maps) | image `src` |
//! | [`ImageAnalyzer`] | [`PixelAnalyzer`] (`image` + an [`ImageFetcher`]) | [`ImageAnalysis`] |
//!
//! [`Enricher::enrich`] runs every job of one book as an independent
//! `spawn_blocking` task in a `JoinSet` and joins them all before any page is
//! rendered. A failed job is logged and leaves its slot empty; the pages then
//! use the documented fallback (no QR block, SVG route, default overlay).

pub mod analysis;
pub mod fetch;
pub mod map;
pub mod qr;

use crate::config::{BookConfig, MapProvider};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;

pub use analysis::{CoverAnalysis, ImageAnalysis, ImageAnalyzer, PixelAnalyzer, TextPosition};
pub use fetch::{DefaultFetcher, ImageFetcher};
pub use map::{MapPoint, MapSnapshotter, NoSnapshots, StaticMapSnapshotter};
pub use qr::{PngQrEncoder, QrEncoder};

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("QR encoding failed: {0}")]
    Qr(String),
    #[error("Image decode failed: {0}")]
    Decode(String),
    #[error("Fetch failed: {0}")]
    Fetch(String),
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

/// Every external collaborator, built once per run.
#[derive(Clone)]
pub struct Services {
    pub qr: Arc<dyn QrEncoder>,
    pub maps: Arc<dyn MapSnapshotter>,
    pub analyzer: Arc<dyn ImageAnalyzer>,
}

impl Services {
    pub fn new(config: &BookConfig) -> Self {
        let fetcher: Arc<dyn ImageFetcher> = Arc::new(DefaultFetcher::new(&config.fetch));
        let maps: Arc<dyn MapSnapshotter> = match config.map.provider {
            MapProvider::Static => Arc::new(StaticMapSnapshotter::new(config.map.clone())),
            MapProvider::None => Arc::new(NoSnapshots),
        };
        Self {
            qr: Arc::new(PngQrEncoder::new(config.qr.size)),
            maps,
            analyzer: Arc::new(PixelAnalyzer::new(fetcher)),
        }
    }
}

/// Everything one book needs enriched.
#[derive(Debug, Clone, Default)]
pub struct EnrichRequest {
    /// `(travel index, public URL)` for the online-version QR.
    pub travel_links: Vec<(usize, String)>,
    /// Map-search URLs for per-location QR codes.
    pub location_links: Vec<String>,
    /// `(travel index, points)` for travels with at least one coordinate.
    pub maps: Vec<(usize, Vec<MapPoint>)>,
    pub map_size: (u32, u32),
    /// Cover photo to analyze.
    pub cover: Option<String>,
}

/// Joined results. Absent entries mean "use the fallback".
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    travel_qr: HashMap<usize, String>,
    location_qr: HashMap<String, String>,
    maps: HashMap<usize, String>,
    pub cover: CoverAnalysis,
}

impl Enrichment {
    pub fn travel_qr(&self, index: usize) -> Option<&str> {
        non_empty(self.travel_qr.get(&index))
    }

    pub fn location_qr(&self, link: &str) -> Option<&str> {
        non_empty(self.location_qr.get(link))
    }

    pub fn map_snapshot(&self, index: usize) -> Option<&str> {
        non_empty(self.maps.get(&index))
    }

    pub fn with_travel_qr(mut self, index: usize, data_uri: impl Into<String>) -> Self {
        self.travel_qr.insert(index, data_uri.into());
        self
    }

    pub fn with_map(mut self, index: usize, src: impl Into<String>) -> Self {
        self.maps.insert(index, src.into());
        self
    }

    pub fn with_location_qr(mut self, link: impl Into<String>, data_uri: impl Into<String>) -> Self {
        self.location_qr.insert(link.into(), data_uri.into());
        self
    }

    pub fn with_cover(mut self, cover: CoverAnalysis) -> Self {
        self.cover = cover;
        self
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

enum Outcome {
    TravelQr(usize, Result<String, EnrichError>),
    LocationQr(String, Result<String, EnrichError>),
    Map(usize, Result<String, EnrichError>),
    Cover(String, Result<ImageAnalysis, EnrichError>),
}

/// Runs an [`EnrichRequest`] against a set of [`Services`].
pub struct Enricher<'a> {
    services: &'a Services,
}

impl<'a> Enricher<'a> {
    pub fn new(services: &'a Services) -> Self {
        Self { services }
    }

    /// Dispatch every job concurrently and wait for all of them.
    pub async fn enrich(&self, request: EnrichRequest) -> Enrichment {
        let mut jobs = JoinSet::new();

        for (index, link) in request.travel_links {
            let qr = Arc::clone(&self.services.qr);
            jobs.spawn_blocking(move || Outcome::TravelQr(index, qr.encode(&link)));
        }
        for link in request.location_links {
            let qr = Arc::clone(&self.services.qr);
            jobs.spawn_blocking(move || {
                let result = qr.encode(&link);
                Outcome::LocationQr(link, result)
            });
        }
        let (width, height) = request.map_size;
        for (index, points) in request.maps {
            let maps = Arc::clone(&self.services.maps);
            jobs.spawn_blocking(move || Outcome::Map(index, maps.snapshot(&points, width, height)));
        }
        if let Some(src) = request.cover {
            let analyzer = Arc::clone(&self.services.analyzer);
            jobs.spawn_blocking(move || {
                let result = analyzer.analyze(&src);
                Outcome::Cover(src, result)
            });
        }

        log::debug!("enrichment: {} jobs dispatched", jobs.len());
        let mut enrichment = Enrichment::default();
        while let Some(joined) = jobs.join_next().await {
            match joined {
                Ok(outcome) => apply(&mut enrichment, outcome),
                Err(err) => log::warn!("enrichment task failed to complete: {err}"),
            }
        }
        enrichment
    }
}

fn apply(enrichment: &mut Enrichment, outcome: Outcome) {
    match outcome {
        Outcome::TravelQr(index, Ok(uri)) => {
            enrichment.travel_qr.insert(index, uri);
        }
        Outcome::TravelQr(index, Err(err)) => {
            log::warn!("QR for travel #{}: {err}", index + 1);
        }
        Outcome::LocationQr(link, Ok(uri)) => {
            enrichment.location_qr.insert(link, uri);
        }
        Outcome::LocationQr(link, Err(err)) => log::warn!("QR for {link}: {err}"),
        Outcome::Map(index, Ok(src)) => {
            enrichment.maps.insert(index, src);
        }
        Outcome::Map(index, Err(err)) => {
            log::warn!("map snapshot for travel #{}: {err}, using route diagram", index + 1);
        }
        Outcome::Cover(_, Ok(analysis)) => {
            enrichment.cover = CoverAnalysis::from_analysis(&analysis);
        }
        Outcome::Cover(src, Err(err)) => {
            log::warn!("cover analysis for {src}: {err}, using default overlay");
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every call; fails for inputs listed in `fail_on`.
    #[derive(Default)]
    pub struct MockServices {
        pub calls: Mutex<Vec<String>>,
        pub fail_on: Vec<String>,
        pub analysis: Option<ImageAnalysis>,
    }

    impl MockServices {
        pub fn failing(inputs: &[&str]) -> Self {
            Self {
                fail_on: inputs.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }

        pub fn get_calls(&self) -> Vec<String> {
            let mut calls = self.calls.lock().unwrap().clone();
            calls.sort();
            calls
        }

        fn record(&self, call: String, input: &str) -> Result<(), EnrichError> {
            self.calls.lock().unwrap().push(call);
            if self.fail_on.iter().any(|f| f == input) {
                return Err(EnrichError::Unavailable(format!("mock failure for {input}")));
            }
            Ok(())
        }
    }

    impl QrEncoder for MockServices {
        fn encode(&self, text: &str) -> Result<String, EnrichError> {
            self.record(format!("qr:{text}"), text)?;
            Ok(format!("data:image/png;base64,QR({text})"))
        }
    }

    impl MapSnapshotter for MockServices {
        fn snapshot(&self, points: &[MapPoint], width: u32, height: u32) -> Result<String, EnrichError> {
            let label = points.first().map(|p| p.label.as_str()).unwrap_or_default();
            self.record(format!("map:{label}:{}:{width}x{height}", points.len()), label)?;
            Ok(format!("https://maps.test/{label}.png"))
        }
    }

    impl ImageAnalyzer for MockServices {
        fn analyze(&self, src: &str) -> Result<ImageAnalysis, EnrichError> {
            self.record(format!("analyze:{src}"), src)?;
            self.analysis
                .clone()
                .ok_or_else(|| EnrichError::Unavailable("no mock analysis".into()))
        }
    }

    /// Services backed by one shared mock.
    pub fn mock_services(mock: Arc<MockServices>) -> Services {
        Services {
            qr: mock.clone(),
            maps: mock.clone(),
            analyzer: mock,
        }
    }

    fn request() -> EnrichRequest {
        EnrichRequest {
            travel_links: vec![(0, "https://t/a".into()), (1, "https://t/b".into())],
            location_links: vec!["https://m/1".into()],
            maps: vec![(1, vec![MapPoint::new(53.9, 27.56, "Minsk")])],
            map_size: (1400, 900),
            cover: Some("cover.jpg".into()),
        }
    }

    // =========================================================================
    // Coordination
    // =========================================================================

    #[tokio::test]
    async fn every_job_runs_and_joins() {
        let mock = Arc::new(MockServices {
            analysis: Some(ImageAnalysis {
                brightness: 250.0,
                busy: [0.9, 0.1, 0.8],
            }),
            ..Default::default()
        });
        let services = mock_services(mock.clone());
        let enrichment = Enricher::new(&services).enrich(request()).await;

        assert_eq!(
            mock.get_calls(),
            vec![
                "analyze:cover.jpg",
                "map:Minsk:1:1400x900",
                "qr:https://m/1",
                "qr:https://t/a",
                "qr:https://t/b",
            ]
        );
        assert_eq!(enrichment.travel_qr(0), Some("data:image/png;base64,QR(https://t/a)"));
        assert_eq!(enrichment.location_qr("https://m/1"), Some("data:image/png;base64,QR(https://m/1)"));
        assert_eq!(enrichment.map_snapshot(1), Some("https://maps.test/Minsk.png"));
        assert_eq!(enrichment.map_snapshot(0), None);
        assert_eq!(enrichment.cover.text_position, TextPosition::Center);
    }

    #[tokio::test]
    async fn failures_leave_fallbacks() {
        let mock = Arc::new(MockServices::failing(&["https://t/b", "Minsk", "cover.jpg"]));
        let services = mock_services(mock.clone());
        let enrichment = Enricher::new(&services).enrich(request()).await;

        assert!(enrichment.travel_qr(0).is_some());
        assert_eq!(enrichment.travel_qr(1), None);
        assert_eq!(enrichment.map_snapshot(1), None);
        assert_eq!(enrichment.cover, CoverAnalysis::default());
    }

    #[tokio::test]
    async fn empty_request_is_empty_enrichment() {
        let mock = Arc::new(MockServices::default());
        let services = mock_services(mock.clone());
        let enrichment = Enricher::new(&services).enrich(EnrichRequest::default()).await;
        assert!(mock.get_calls().is_empty());
        assert_eq!(enrichment.cover, CoverAnalysis::default());
    }

    #[test]
    fn empty_results_count_as_missing() {
        let enrichment = Enrichment::default().with_travel_qr(0, "").with_map(0, "");
        assert_eq!(enrichment.travel_qr(0), None);
        assert_eq!(enrichment.map_snapshot(0), None);
    }
}

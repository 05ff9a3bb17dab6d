//! Channel-based loader for the GeoJSON feeds.
//!
//! Fetches are async but egui's update() is synchronous. Each load runs in
//! the background and sends its parsed result back through a channel; the
//! update loop drains the channel and fills the target layer group.

use crate::fetch::{spawn_fetch, FetchError};
use crate::geo::{parse_feature_collection, ParsedCollection};
use crate::map::{LoadStatus, OverlayId, OverlayRegistry};
use crate::quake::{populate, BuildReport};
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};
use thiserror::Error;

/// Failure to load a feed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("{0}")]
    Parse(String),
}

/// A completed feed load.
#[derive(Debug)]
pub struct FeedResult {
    /// Layer group the features belong to
    pub target: OverlayId,
    pub url: String,
    pub outcome: Result<ParsedCollection, FeedError>,
    /// Wall time from request to parsed result
    pub elapsed_ms: f64,
}

/// Channel-based loader for async feed retrieval.
pub struct FeedChannel {
    sender: Sender<FeedResult>,
    receiver: Receiver<FeedResult>,
}

impl Default for FeedChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Spawns a background GET of `url` destined for the `target` layer group.
    ///
    /// The body is parsed off the UI thread where possible; the result is sent
    /// through the channel and a repaint is requested.
    pub fn load_and_populate(&self, ctx: egui::Context, url: String, target: OverlayId) {
        log::info!("Requesting {} from {}", target.label(), url);

        let sender = self.sender.clone();
        let started = web_time::Instant::now();
        let request_url = url.clone();

        spawn_fetch(request_url, move |result| {
            let outcome = result.map_err(FeedError::from).and_then(|bytes| decode(&bytes));
            let _ = sender.send(FeedResult {
                target,
                url,
                outcome,
                elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
            });
            ctx.request_repaint();
        });
    }

    /// Non-blocking check for a completed load.
    pub fn try_recv(&self) -> Option<FeedResult> {
        self.receiver.try_recv().ok()
    }
}

fn decode(bytes: &[u8]) -> Result<ParsedCollection, FeedError> {
    let text = std::str::from_utf8(bytes).map_err(|e| FeedError::Parse(e.to_string()))?;
    parse_feature_collection(text).map_err(FeedError::Parse)
}

/// Appends a completed load into its layer group and records the outcome.
///
/// Returns the build report on success so the caller can report progress.
pub fn apply_result(
    overlays: &mut OverlayRegistry,
    result: FeedResult,
) -> Result<BuildReport, FeedError> {
    let target = result.target;
    let group = overlays.group_mut(target);

    match result.outcome {
        Ok(parsed) => {
            let mut report = populate(group, &parsed.features, &target.style());
            report.skipped += parsed.skipped.len();
            group.set_status(LoadStatus::Loaded {
                count: group.len(),
                skipped: report.skipped,
            });
            log::info!(
                "Loaded {}: {} elements ({} skipped) in {:.0} ms",
                target.label(),
                report.added,
                report.skipped,
                result.elapsed_ms
            );
            Ok(report)
        }
        Err(e) => {
            log::warn!("Failed to load {} from {}: {}", target.label(), result.url, e);
            group.set_status(LoadStatus::Failed(e.to_string()));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(target: OverlayId, outcome: Result<ParsedCollection, FeedError>) -> FeedResult {
        FeedResult {
            target,
            url: "https://example.test/feed.geojson".to_string(),
            outcome,
            elapsed_ms: 1.0,
        }
    }

    #[test]
    fn test_decode_feed_body() {
        let body = br#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"mag": 4.5, "time": 0, "title": "M 4.5"},
             "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}
        ]}"#;
        let parsed = decode(body).unwrap();
        assert_eq!(parsed.features.len(), 1);

        assert!(matches!(decode(b"{"), Err(FeedError::Parse(_))));
        assert!(matches!(decode(&[0xff, 0xfe]), Err(FeedError::Parse(_))));
    }

    #[test]
    fn test_apply_fills_only_target_group() {
        let mut overlays = OverlayRegistry::new();
        let parsed = decode(
            br#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"mag": 2.5},
                 "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
                {"type": "Feature", "properties": {"mag": null},
                 "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
                {"type": "Feature", "properties": {}, "geometry": null}
            ]}"#,
        )
        .unwrap();

        let report =
            apply_result(&mut overlays, result(OverlayId::Earthquakes, Ok(parsed))).unwrap();
        assert_eq!(report, BuildReport { added: 1, skipped: 2 });

        let quakes = overlays.group(OverlayId::Earthquakes);
        assert_eq!(quakes.len(), 1);
        assert_eq!(quakes.status(), &LoadStatus::Loaded { count: 1, skipped: 2 });
        assert!(overlays.group(OverlayId::FaultLines).is_empty());
        assert_eq!(overlays.group(OverlayId::FaultLines).status(), &LoadStatus::Pending);
    }

    #[test]
    fn test_failure_leaves_group_empty() {
        let mut overlays = OverlayRegistry::new();
        let err = apply_result(
            &mut overlays,
            result(OverlayId::FaultLines, Err(FetchError::Status(404).into())),
        )
        .unwrap_err();
        assert_eq!(err, FeedError::Fetch(FetchError::Status(404)));

        let group = overlays.group(OverlayId::FaultLines);
        assert!(group.is_empty());
        assert_eq!(
            group.status(),
            &LoadStatus::Failed("server responded with status 404".to_string())
        );
        // The registration and toggle state are untouched.
        assert!(!overlays.is_enabled(OverlayId::FaultLines));
    }

    #[test]
    fn test_completion_order_is_independent() {
        let mut overlays = OverlayRegistry::new();
        let lines = decode(
            br#"{"type": "Feature", "properties": {},
                 "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}}"#,
        )
        .unwrap();
        apply_result(&mut overlays, result(OverlayId::FaultLines, Ok(lines))).unwrap();
        assert_eq!(overlays.group(OverlayId::FaultLines).len(), 1);
        assert_eq!(overlays.group(OverlayId::Earthquakes).status(), &LoadStatus::Pending);
    }
}

#![warn(clippy::all)]

//! Quake Map - an interactive map of recent earthquakes and tectonic plate
//! boundaries.
//!
//! Earthquakes from the past week are drawn as circle markers sized and
//! colored by magnitude over a choice of tile base maps, with plate
//! boundaries as an optional overlay.

mod config;
mod feed;
mod fetch;
mod geo;
mod map;
mod quake;
mod state;
mod tiles;
mod ui;

use config::MapConfig;
use eframe::egui;
use feed::FeedChannel;
use map::{MapHandle, OverlayId};
use state::AppState;
use tiles::TileCache;

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = MapConfig::load();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Quake Map")
            .with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Quake Map",
        native_options,
        Box::new(|cc| Ok(Box::new(QuakeMapApp::new(cc, config)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let config = MapConfig::load();
    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async move {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to attach the map to");
            return;
        };

        let canvas = match document
            .get_element_by_id(&config.container_id)
            .map(|el| el.dyn_into::<web_sys::HtmlCanvasElement>())
        {
            Some(Ok(canvas)) => canvas,
            Some(Err(_)) => {
                log::error!("#{} is not a canvas element", config.container_id);
                return;
            }
            None => {
                log::error!("No element with id #{}", config.container_id);
                return;
            }
        };

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(QuakeMapApp::new(cc, config)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The map failed to start. See the developer console for details.</p>",
                    );
                    log::error!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct QuakeMapApp {
    /// Base layers, overlays and viewport
    map: MapHandle,

    /// Transient UI state
    state: AppState,

    /// Channel for the two GeoJSON feed loads
    feeds: FeedChannel,

    /// Base layer tile textures
    tiles: TileCache,

    /// Last time the view was written to the URL
    last_url_push: web_time::Instant,
}

impl QuakeMapApp {
    /// Creates the map and starts both feed loads.
    pub fn new(cc: &eframe::CreationContext<'_>, config: MapConfig) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let map = map::build_map(
            config.container_id.clone(),
            (config.center_lat, config.center_lon),
            config.zoom,
            &config.access_token,
        );

        let mut state = AppState::new();
        if !map.has_credential() {
            log::warn!("No tile access token configured; base maps will be blank");
            state.missing_credential = true;
        }

        let feeds = FeedChannel::new();
        feeds.load_and_populate(
            cc.egui_ctx.clone(),
            config.earthquakes_url.clone(),
            OverlayId::Earthquakes,
        );
        feeds.load_and_populate(
            cc.egui_ctx.clone(),
            config.plate_boundaries_url.clone(),
            OverlayId::FaultLines,
        );

        log::info!(
            "Map ready at ({:.4}, {:.4}) zoom {}",
            map.view.center_lat,
            map.view.center_lon,
            map.view.zoom
        );

        Self {
            map,
            state,
            feeds,
            tiles: TileCache::new(config.max_cached_tiles),
            last_url_push: web_time::Instant::now(),
        }
    }

    /// Fills layer groups from any completed feed loads.
    fn drain_feeds(&mut self) {
        while let Some(result) = self.feeds.try_recv() {
            let target = result.target;
            self.state.status_message = match feed::apply_result(&mut self.map.overlays, result) {
                Ok(report) => format!("Loaded {} {}", report.added, target.label().to_lowercase()),
                Err(e) => format!("{} unavailable: {}", target.label(), e),
            };
        }
    }
}

impl eframe::App for QuakeMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_feeds();
        self.tiles.poll(ctx);

        // Push current view to URL (throttled to once per second)
        {
            let now = web_time::Instant::now();
            if now.duration_since(self.last_url_push).as_secs_f64() >= 1.0 {
                self.last_url_push = now;
                state::url_state::push_to_url(
                    self.map.view.center_lat,
                    self.map.view.center_lon,
                    self.map.view.zoom,
                );
            }
        }

        // Panels must be rendered before CentralPanel
        ui::render_top_bar(ctx, &self.state, &self.map, &self.tiles);
        ui::render_canvas(ctx, &mut self.state, &mut self.map, &mut self.tiles);
        ui::render_layer_control(ctx, &mut self.map);
        ui::render_legend(ctx, &self.map);
    }
}

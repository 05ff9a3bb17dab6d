//! Texture cache for base layer tiles.
//!
//! Tiles are fetched in the background, decoded to RGBA off the UI thread
//! where possible, and uploaded as egui textures when the update loop drains
//! the channel.

use super::{TileId, TileLayer};
use crate::fetch::{spawn_fetch, FetchError};
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use thiserror::Error;

/// Failure to produce a tile texture.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TileError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to decode tile image: {0}")]
    Decode(String),
}

/// Cache key: one tile of one base layer style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub style_id: &'static str,
    pub tile: TileId,
}

enum TileEntry {
    Pending,
    Ready {
        texture: TextureHandle,
        last_used: u64,
    },
    /// Not retried while it stays cached.
    Failed { last_used: u64 },
}

struct TileResult {
    key: TileKey,
    outcome: Result<ColorImage, TileError>,
}

/// Bounded cache of tile textures keyed by style and tile address.
pub struct TileCache {
    sender: Sender<TileResult>,
    receiver: Receiver<TileResult>,
    entries: HashMap<TileKey, TileEntry>,
    /// Bound on settled entries, textures and failures alike
    max_entries: usize,
    /// Frame counter used for least-recently-drawn eviction
    frame: u64,
}

impl TileCache {
    pub fn new(max_entries: usize) -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            entries: HashMap::new(),
            max_entries: max_entries.max(1),
            frame: 0,
        }
    }

    /// Uploads finished tiles and evicts beyond the bound. Call once per frame.
    pub fn poll(&mut self, ctx: &egui::Context) {
        self.frame += 1;

        while let Ok(result) = self.receiver.try_recv() {
            let entry = match result.outcome {
                Ok(image) => {
                    let name = format!(
                        "tile_{}_{}_{}_{}",
                        result.key.style_id, result.key.tile.z, result.key.tile.x, result.key.tile.y
                    );
                    let texture = ctx.load_texture(name, image, TextureOptions::LINEAR);
                    TileEntry::Ready {
                        texture,
                        last_used: self.frame,
                    }
                }
                Err(e) => {
                    log::debug!("Tile {:?} unavailable: {}", result.key, e);
                    TileEntry::Failed {
                        last_used: self.frame,
                    }
                }
            };
            self.entries.insert(result.key, entry);
        }

        self.evict();
    }

    /// Returns the texture for a tile, requesting it if not yet known.
    pub fn get_or_request(
        &mut self,
        ctx: &egui::Context,
        layer: &TileLayer,
        tile: TileId,
    ) -> Option<&TextureHandle> {
        let key = TileKey {
            style_id: layer.kind.style_id(),
            tile,
        };

        if !self.entries.contains_key(&key) {
            self.request(ctx, layer, key);
            return None;
        }

        match self.entries.get_mut(&key) {
            Some(TileEntry::Ready { texture, last_used }) => {
                *last_used = self.frame;
                Some(texture)
            }
            Some(TileEntry::Failed { last_used }) => {
                *last_used = self.frame;
                None
            }
            _ => None,
        }
    }

    fn request(&mut self, ctx: &egui::Context, layer: &TileLayer, key: TileKey) {
        if !layer.has_credential() {
            self.entries.insert(
                key,
                TileEntry::Failed {
                    last_used: self.frame,
                },
            );
            return;
        }

        self.entries.insert(key, TileEntry::Pending);
        let sender = self.sender.clone();
        let ctx = ctx.clone();
        spawn_fetch(layer.tile_url(key.tile), move |result| {
            let outcome = result.map_err(TileError::from).and_then(|bytes| decode_tile(&bytes));
            let _ = sender.send(TileResult { key, outcome });
            ctx.request_repaint();
        });
    }

    /// Drops the least recently drawn entries once over the bound.
    ///
    /// Failed tiles count against the bound too; an evicted failure is
    /// requested again if it comes back into view.
    fn evict(&mut self) {
        let mut settled: Vec<(TileKey, u64)> = self
            .entries
            .iter()
            .filter_map(|(key, entry)| match entry {
                TileEntry::Ready { last_used, .. } | TileEntry::Failed { last_used } => {
                    Some((*key, *last_used))
                }
                TileEntry::Pending => None,
            })
            .collect();

        if settled.len() <= self.max_entries {
            return;
        }

        settled.sort_by_key(|(_, last_used)| *last_used);
        let excess = settled.len() - self.max_entries;
        for (key, _) in settled.into_iter().take(excess) {
            self.entries.remove(&key);
        }
        log::debug!("Evicted {} tile entries", excess);
    }

    /// Number of tiles with an uploaded texture.
    pub fn texture_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, TileEntry::Ready { .. }))
            .count()
    }

    /// Number of tiles still in flight.
    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, TileEntry::Pending))
            .count()
    }
}

fn decode_tile(bytes: &[u8]) -> Result<ColorImage, TileError> {
    let image = image::load_from_memory(bytes).map_err(|e| TileError::Decode(e.to_string()))?;
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::BaseLayerKind;

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_tile(b"not a png"), Err(TileError::Decode(_))));
    }

    #[test]
    fn test_decode_png() {
        let mut png = Vec::new();
        let pixels = image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]));
        pixels
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let decoded = decode_tile(&png).unwrap();
        assert_eq!(decoded.size, [2, 3]);
        assert_eq!(decoded.pixels[0], egui::Color32::from_rgb(10, 20, 30));
    }

    #[test]
    fn test_missing_credential_never_requests() {
        let ctx = egui::Context::default();
        let mut cache = TileCache::new(8);
        let layer = TileLayer::new(BaseLayerKind::Outdoors, "");
        let tile = TileId::new(0, 0, 0);

        assert!(cache.get_or_request(&ctx, &layer, tile).is_none());
        assert_eq!(cache.pending_count(), 0);
        assert!(cache.get_or_request(&ctx, &layer, tile).is_none());
        assert_eq!(cache.texture_count(), 0);
    }

    #[test]
    fn test_failed_tiles_stay_bounded() {
        let ctx = egui::Context::default();
        let mut cache = TileCache::new(4);
        let layer = TileLayer::new(BaseLayerKind::Outdoors, "");

        for x in 0..1000 {
            assert!(cache.get_or_request(&ctx, &layer, TileId::new(10, x, 0)).is_none());
            cache.poll(&ctx);
            assert!(cache.entries.len() <= 4);
        }

        // The most recent failures are the ones kept.
        let newest = TileKey {
            style_id: "mapbox.outdoors",
            tile: TileId::new(10, 999, 0),
        };
        assert!(cache.entries.contains_key(&newest));
    }

    #[test]
    fn test_eviction_keeps_recent_tiles() {
        let ctx = egui::Context::default();
        let mut cache = TileCache::new(2);
        let image = ColorImage::from_rgba_unmultiplied([1, 1], &[255, 255, 255, 255]);

        for x in 0..3 {
            let key = TileKey {
                style_id: "mapbox.outdoors",
                tile: TileId::new(2, x, 0),
            };
            cache
                .sender
                .send(TileResult {
                    key,
                    outcome: Ok(image.clone()),
                })
                .unwrap();
            cache.poll(&ctx);
        }

        assert_eq!(cache.texture_count(), 2);
        let oldest = TileKey {
            style_id: "mapbox.outdoors",
            tile: TileId::new(2, 0, 0),
        };
        assert!(!cache.entries.contains_key(&oldest));
    }
}

//! Overlay layer groups and the overlay registry.

use crate::geo::RenderElement;
use crate::quake::LayerStyle;

/// Identifies one of the map's overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayId {
    FaultLines = 0,
    Earthquakes = 1,
}

impl OverlayId {
    pub fn label(&self) -> &'static str {
        match self {
            OverlayId::FaultLines => "Fault Lines",
            OverlayId::Earthquakes => "Earthquakes",
        }
    }

    /// Registration order in the layer control. Later overlays draw on top.
    pub const ALL: [OverlayId; 2] = [OverlayId::FaultLines, OverlayId::Earthquakes];

    /// Styling for features loaded into this overlay.
    pub fn style(&self) -> LayerStyle {
        match self {
            OverlayId::FaultLines => LayerStyle::plate_boundaries(),
            OverlayId::Earthquakes => LayerStyle::earthquakes(),
        }
    }

    /// Whether the overlay is shown when the map first opens.
    pub fn enabled_by_default(&self) -> bool {
        matches!(self, OverlayId::Earthquakes)
    }
}

/// Load progress of a layer group's feed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Pending,
    Loaded {
        count: usize,
        skipped: usize,
    },
    Failed(String),
}

/// An ordered collection of rendered elements for one overlay.
///
/// Groups are registered empty and filled in place when their feed arrives.
#[derive(Debug, Clone)]
pub struct LayerGroup {
    id: OverlayId,
    elements: Vec<RenderElement>,
    status: LoadStatus,
}

impl LayerGroup {
    pub fn new(id: OverlayId) -> Self {
        Self {
            id,
            elements: Vec::new(),
            status: LoadStatus::Pending,
        }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn push(&mut self, element: RenderElement) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[RenderElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn set_status(&mut self, status: LoadStatus) {
        self.status = status;
    }
}

/// A registered overlay and its on/off state.
#[derive(Debug, Clone)]
pub struct OverlayEntry {
    pub group: LayerGroup,
    pub enabled: bool,
}

/// Overlays registered with the layer control, in display order.
#[derive(Debug, Clone)]
pub struct OverlayRegistry {
    entries: [OverlayEntry; 2],
}

impl Default for OverlayRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayRegistry {
    /// Registers every overlay with an empty group.
    pub fn new() -> Self {
        let entries = OverlayId::ALL.map(|id| OverlayEntry {
            group: LayerGroup::new(id),
            enabled: id.enabled_by_default(),
        });
        Self { entries }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &OverlayEntry> {
        self.entries.iter()
    }

    pub fn group(&self, id: OverlayId) -> &LayerGroup {
        &self.entry(id).group
    }

    pub fn group_mut(&mut self, id: OverlayId) -> &mut LayerGroup {
        &mut self.entry_mut(id).group
    }

    pub fn is_enabled(&self, id: OverlayId) -> bool {
        self.entry(id).enabled
    }

    pub fn set_enabled(&mut self, id: OverlayId, enabled: bool) {
        self.entry_mut(id).enabled = enabled;
    }

    /// Enabled groups in draw order (bottom first).
    pub fn visible_groups(&self) -> impl Iterator<Item = &LayerGroup> {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| &e.group)
    }

    fn entry(&self, id: OverlayId) -> &OverlayEntry {
        &self.entries[id as usize]
    }

    fn entry_mut(&mut self, id: OverlayId) -> &mut OverlayEntry {
        &mut self.entries[id as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_defaults() {
        let registry = OverlayRegistry::new();
        let labels: Vec<_> = registry.iter().map(|e| e.group.id().label()).collect();
        assert_eq!(labels, vec!["Fault Lines", "Earthquakes"]);
        assert!(registry.is_enabled(OverlayId::Earthquakes));
        assert!(!registry.is_enabled(OverlayId::FaultLines));
        assert_eq!(registry.group(OverlayId::Earthquakes).status(), &LoadStatus::Pending);
    }

    #[test]
    fn test_toggle_is_independent() {
        let mut registry = OverlayRegistry::new();
        registry.set_enabled(OverlayId::FaultLines, true);
        registry.set_enabled(OverlayId::Earthquakes, false);
        let visible: Vec<_> = registry.visible_groups().map(|g| g.id()).collect();
        assert_eq!(visible, vec![OverlayId::FaultLines]);
    }
}

//! Application state management.
//!
//! Map data lives in the `MapHandle`; this holds the transient UI state
//! around it.

pub mod url_state;

use crate::geo::Popup;
use geo_types::Coord;

/// A popup opened by clicking a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPopup {
    /// Marker center the popup points at
    pub anchor: Coord<f64>,
    pub popup: Popup,
}

/// Root UI state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Application status message displayed in top bar
    pub status_message: String,

    /// At most one popup is open at a time
    pub open_popup: Option<OpenPopup>,

    /// Set when tiles cannot be requested for lack of a credential
    pub missing_credential: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            status_message: "Loading earthquake data...".to_string(),
            ..Default::default()
        }
    }

    pub fn open_popup(&mut self, anchor: Coord<f64>, popup: Popup) {
        self.open_popup = Some(OpenPopup { anchor, popup });
    }

    pub fn close_popup(&mut self) {
        self.open_popup = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_popup() {
        let mut state = AppState::new();
        let popup = |title: &str| Popup {
            heading: "Unknown time".to_string(),
            title: title.to_string(),
        };

        state.open_popup(Coord { x: 1.0, y: 2.0 }, popup("first"));
        state.open_popup(Coord { x: 3.0, y: 4.0 }, popup("second"));
        assert_eq!(
            state.open_popup.as_ref().map(|p| p.popup.title.as_str()),
            Some("second")
        );

        state.close_popup();
        assert!(state.open_popup.is_none());
    }
}

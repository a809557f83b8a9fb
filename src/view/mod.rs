//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! Both renderings draw from the same `ViewState` projection:
//!
//! - `state`: Projection of the playback session for drawing
//! - `utils`: Shared helpers (layout, controls row)
//! - `panel`: Flat status panel
//! - `disk`: Animated album disk
//! - `overlays`: Error notification

mod state;
mod utils;
mod panel;
mod disk;
mod overlays;

use ratatui::Frame;

use crate::model::ViewMode;

pub use state::ViewState;

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, view: &ViewState) {
        let area = frame.area();

        match view.view_mode {
            ViewMode::Panel => panel::render_panel(frame, area, view),
            ViewMode::Disk => disk::render_disk(frame, area, view),
        }

        if let Some(message) = &view.error {
            overlays::render_error_notification(frame, message);
        }
    }
}

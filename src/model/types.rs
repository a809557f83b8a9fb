//! Core type definitions for the application

use std::time::Instant;

use crate::player::AlbumArt;

/// A playable track from the session playlist
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackRef {
    pub uri: String,
    pub art_url: Option<String>,
}

impl TrackRef {
    pub fn new(uri: impl Into<String>, art_url: Option<String>) -> Self {
        Self {
            uri: uri.into(),
            art_url,
        }
    }
}

/// Which rendering of the player is on screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ViewMode {
    /// Flat status panel
    #[default]
    Panel,
    /// Spinning album disk
    Disk,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Panel => ViewMode::Disk,
            ViewMode::Disk => ViewMode::Panel,
        }
    }
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: String,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    /// Art of the remotely playing track; `None` hides the art slot.
    pub album_art: Option<AlbumArt>,
    pub view_mode: ViewMode,
    pub disk_angle: f64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: "Waiting for device...".to_string(),
            error_message: None,
            error_timestamp: None,
            album_art: None,
            view_mode: ViewMode::default(),
            disk_angle: 0.0,
        }
    }
}

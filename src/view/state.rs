//! Projection of the session onto what either view draws

use crate::model::{PlaybackSession, UiState, ViewMode};
use crate::player::AlbumArt;

pub const GLYPH_PLAYING: &str = "❚❚";
pub const GLYPH_PAUSED: &str = "▶";

/// Everything a view needs for one frame. Views never touch the session.
#[derive(Clone, Debug)]
pub struct ViewState {
    /// `"index+1 / len"`
    pub position: String,
    pub is_playing: bool,
    pub glyph: &'static str,
    /// Controls only work once a device is assigned
    pub controls_enabled: bool,
    /// Remote cover; `None` hides the art slot
    pub art: Option<AlbumArt>,
    /// Cover listed in the session for the current track
    pub session_art_url: Option<String>,
    pub track_info: String,
    pub status: String,
    pub error: Option<String>,
    pub view_mode: ViewMode,
    pub disk_angle: f64,
}

impl ViewState {
    pub fn project(session: &PlaybackSession, ui: &UiState) -> Self {
        let position = if session.len() == 0 {
            "0 / 0".to_string()
        } else {
            format!("{} / {}", session.current_index() + 1, session.len())
        };
        let is_playing = session.is_playing();
        let track_info = ui
            .album_art
            .as_ref()
            .and_then(|a| a.track_info.clone())
            .unwrap_or_default();

        Self {
            position,
            is_playing,
            glyph: if is_playing { GLYPH_PLAYING } else { GLYPH_PAUSED },
            controls_enabled: session.is_ready(),
            art: ui.album_art.clone(),
            session_art_url: session.current_track().and_then(|t| t.art_url.clone()),
            track_info,
            status: ui.status.clone(),
            error: ui.error_message.clone(),
            view_mode: ui.view_mode,
            disk_angle: ui.disk_angle,
        }
    }

    /// Cover to put on the disk: remote art first, then the session's.
    pub fn disk_art_url(&self) -> Option<&str> {
        self.art
            .as_ref()
            .map(|a| a.image_url.as_str())
            .or(self.session_art_url.as_deref())
    }
}

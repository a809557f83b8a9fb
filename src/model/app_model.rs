//! Main application model with state management

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::player::{AlbumArt, DeviceId, PlayerError};
use super::playback::{PlaybackSession, PlayerPhase, RefreshToken, SyncStamp};
use super::types::{TrackRef, UiState, ViewMode};

/// Radians the disk turns per rendered frame while playing
pub const DISK_ROTATION_STEP: f64 = 0.01;

/// Everything needed to issue a play request
#[derive(Clone, Debug)]
pub struct PlayRequest {
    pub device_id: DeviceId,
    pub track: TrackRef,
    pub token: RefreshToken,
}

/// Main application model containing all state
pub struct AppModel {
    session: Arc<Mutex<PlaybackSession>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(tracks: Vec<TrackRef>, view_mode: ViewMode) -> Self {
        let ui_state = UiState {
            view_mode,
            ..UiState::default()
        };
        Self {
            session: Arc::new(Mutex::new(PlaybackSession::new(tracks))),
            ui_state: Arc::new(Mutex::new(ui_state)),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    // ========================================================================
    // Session
    // ========================================================================

    pub async fn get_session(&self) -> PlaybackSession {
        self.session.lock().await.clone()
    }

    pub async fn phase(&self) -> PlayerPhase {
        self.session.lock().await.phase()
    }

    pub async fn is_playing(&self) -> bool {
        self.session.lock().await.is_playing()
    }

    pub async fn device_id(&self) -> Option<DeviceId> {
        self.session.lock().await.device_id().cloned()
    }

    /// Returns false when a device was already known.
    pub async fn set_device(&self, device_id: DeviceId) -> bool {
        self.session.lock().await.set_device(device_id)
    }

    pub async fn current_token(&self) -> RefreshToken {
        self.session.lock().await.token()
    }

    pub async fn next_track(&self) -> usize {
        self.session.lock().await.next_track()
    }

    pub async fn prev_track(&self) -> usize {
        self.session.lock().await.prev_track()
    }

    /// Validate readiness and claim a fresh token for playing the current track.
    pub async fn begin_play(&self) -> Result<PlayRequest, PlayerError> {
        let mut session = self.session.lock().await;
        let device_id = session.device_id().cloned().ok_or(PlayerError::NotReady)?;
        let track = session.current_track().cloned().ok_or(PlayerError::EmptyPlaylist)?;
        let token = session.issue_token();
        Ok(PlayRequest {
            device_id,
            track,
            token,
        })
    }

    /// Validate readiness and claim a fresh token for a pause/resume.
    pub async fn begin_transport(&self) -> Result<(DeviceId, RefreshToken), PlayerError> {
        let mut session = self.session.lock().await;
        let device_id = session.device_id().cloned().ok_or(PlayerError::NotReady)?;
        Ok((device_id, session.issue_token()))
    }

    /// Apply a play-state change if no newer request superseded it.
    pub async fn finish_request(&self, token: RefreshToken, is_playing: bool) -> bool {
        let mut session = self.session.lock().await;
        if !session.is_current(token) {
            tracing::debug!(?token, current = ?session.token(), "Discarding stale playback result");
            return false;
        }
        session.settle(is_playing);
        true
    }

    /// Stamp for a remote state poll, `None` before a device is assigned.
    pub async fn begin_sync(&self) -> Option<SyncStamp> {
        let session = self.session.lock().await;
        session.is_ready().then(|| session.sync_stamp())
    }

    /// Apply a polled play state unless a user request was issued or landed meanwhile.
    pub async fn finish_sync(&self, stamp: SyncStamp, is_playing: bool) -> bool {
        let mut session = self.session.lock().await;
        if !session.is_sync_current(stamp) {
            tracing::debug!(?stamp, "Discarding remote state taken before a user request");
            return false;
        }
        session.set_playing(is_playing);
        true
    }

    pub async fn is_current(&self, token: RefreshToken) -> bool {
        self.session.lock().await.is_current(token)
    }

    // ========================================================================
    // UI State
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn set_status(&self, status: impl Into<String>) {
        self.ui_state.lock().await.status = status.into();
    }

    /// Replace the album art if the token is still current.
    pub async fn apply_album_art(&self, token: RefreshToken, art: Option<AlbumArt>) -> bool {
        let session = self.session.lock().await;
        if !session.is_current(token) {
            tracing::debug!(?token, current = ?session.token(), "Discarding stale album art");
            return false;
        }
        self.ui_state.lock().await.album_art = art;
        true
    }

    pub async fn toggle_view_mode(&self) -> ViewMode {
        let mut state = self.ui_state.lock().await;
        state.view_mode = state.view_mode.toggle();
        state.view_mode
    }

    /// Turn the disk one frame while playing.
    pub async fn advance_animation(&self) {
        if !self.is_playing().await {
            return;
        }
        let mut state = self.ui_state.lock().await;
        state.disk_angle = (state.disk_angle + DISK_ROTATION_STEP) % std::f64::consts::TAU;
    }

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > 5 {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }
}

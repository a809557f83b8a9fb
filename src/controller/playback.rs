//! Playback control methods

use crate::model::{PlayRequest, RefreshToken};
use crate::player::{PlayerError, Result};

use super::AppController;

impl AppController {
    /// Play the track under the cursor on the ready device.
    pub async fn user_play(&self) -> Result<()> {
        let request = {
            let model = self.model.lock().await;
            model.begin_play().await
        };

        match request {
            Ok(request) => self.play_request(request).await,
            Err(e) => {
                tracing::warn!(error = %e, "Play rejected before request");
                self.report_error(&e).await;
                Err(e)
            }
        }
    }

    async fn play_request(&self, request: PlayRequest) -> Result<()> {
        tracing::debug!(index = request.token.index, uri = %request.track.uri, "Starting track");

        if let Err(e) = self.player.play(&request.device_id, &request.track).await {
            tracing::error!(error = %e, index = request.token.index, "Play failed");
            self.report_error(&e).await;
            return Err(e);
        }

        let model = self.model.lock().await;
        if !model.finish_request(request.token, true).await {
            return Ok(());
        }
        let total = model.get_session().await.len();
        model
            .set_status(format!("Playing track {} of {}", request.token.index + 1, total))
            .await;
        drop(model);

        tracing::info!(index = request.token.index, "Track started");
        self.schedule_art_refresh(request.token, self.timing.after_play);
        Ok(())
    }

    /// Pause when the remote reports playback, otherwise resume or start.
    pub async fn user_toggle(&self) -> Result<()> {
        let ready = self.model.lock().await.device_id().await.is_some();
        if !ready {
            let e = PlayerError::NotReady;
            self.report_error(&e).await;
            return Err(e);
        }

        let state = match self.player.get_state().await {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(error = %e, "Fetching playback state failed");
                self.report_error(&e).await;
                return Err(e);
            }
        };

        match state {
            None => {
                tracing::debug!("Nothing active on device, starting current track");
                self.user_play().await
            }
            Some(snapshot) if !snapshot.is_playing => self.transport(false).await,
            Some(_) => self.transport(true).await,
        }
    }

    /// Pause (`pause == true`) or resume the device.
    async fn transport(&self, pause: bool) -> Result<()> {
        let begun = self.model.lock().await.begin_transport().await;
        let (device_id, token) = match begun {
            Ok(begun) => begun,
            Err(e) => {
                self.report_error(&e).await;
                return Err(e);
            }
        };

        let result = if pause {
            self.player.pause(&device_id).await
        } else {
            self.player.resume(&device_id).await
        };

        if let Err(e) = result {
            tracing::error!(error = %e, pause, "Toggle playback failed");
            self.report_error(&e).await;
            return Err(e);
        }

        self.finish_transport(token, pause).await;
        Ok(())
    }

    async fn finish_transport(&self, token: RefreshToken, paused: bool) {
        let model = self.model.lock().await;
        if !model.finish_request(token, !paused).await {
            return;
        }
        model
            .set_status(if paused { "Paused playback" } else { "Resumed playback" })
            .await;
        drop(model);

        tracing::info!(action = if paused { "paused" } else { "resumed" }, "Playback toggled");
        self.schedule_art_refresh(token, self.timing.after_resume);
    }

    /// Move forward and restart playback on the new track.
    pub async fn user_next(&self) -> Result<()> {
        let index = self.model.lock().await.next_track().await;
        tracing::debug!(index, "Skipping to next track");
        self.user_play().await
    }

    /// Move back and restart playback on the new track.
    pub async fn user_prev(&self) -> Result<()> {
        let index = self.model.lock().await.prev_track().await;
        tracing::debug!(index, "Skipping to previous track");
        self.user_play().await
    }
}

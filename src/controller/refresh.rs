//! Device readiness, album art refresh and remote state sync

use std::time::Duration;
use tokio::task::JoinHandle;

use crate::model::RefreshToken;
use crate::player::DeviceId;

use super::AppController;

impl AppController {
    /// Connect to the remote player and apply readiness when it arrives.
    pub fn initialize(&self) -> JoinHandle<()> {
        let ready = self.player.connect();
        let controller = self.clone();

        tokio::spawn(async move {
            match ready.wait().await {
                Some(device_id) => controller.device_ready(device_id).await,
                None => {
                    let model = controller.model.lock().await;
                    model.set_status("Playback device unavailable").await;
                    model
                        .set_error("Could not find the playback device. Is it running?".to_string())
                        .await;
                }
            }
        })
    }

    pub async fn device_ready(&self, device_id: DeviceId) {
        let model = self.model.lock().await;
        if model.set_device(device_id.clone()).await {
            tracing::info!(device_id = %device_id, "Device ready");
            model.set_status("Player ready!").await;
        } else {
            tracing::debug!(device_id = %device_id, "Ignoring repeated device readiness");
        }
    }

    /// Refresh album art after `delay`, tied to the request that caused it.
    pub(crate) fn schedule_art_refresh(&self, token: RefreshToken, delay: Duration) -> JoinHandle<()> {
        let controller = self.clone();
        tracing::trace!(?token, delay_ms = delay.as_millis() as u64, "Scheduling album art refresh");

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            controller.refresh_album_art(token).await;
        })
    }

    /// Best effort: failures are logged and the previous art stays.
    pub async fn refresh_album_art(&self, token: RefreshToken) {
        if !self.model.lock().await.is_current(token).await {
            tracing::debug!(?token, "Skipping album art refresh for superseded request");
            return;
        }

        match self.player.get_currently_playing_art().await {
            Ok(art) => {
                let hidden = art.is_none();
                if self.model.lock().await.apply_album_art(token, art).await {
                    tracing::debug!(hidden, "Album art updated");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Album art refresh failed"),
        }
    }

    /// Pick up play/pause changes made outside this app.
    pub async fn sync_remote_state(&self) {
        let Some(stamp) = self.model.lock().await.begin_sync().await else {
            return;
        };

        match self.player.get_state().await {
            Ok(state) => {
                if let Some(snapshot) = &state {
                    tracing::trace!(raw = %snapshot.raw, "Remote playback state");
                }
                let is_playing = state.is_some_and(|s| s.is_playing);
                self.model.lock().await.finish_sync(stamp, is_playing).await;
            }
            Err(e) => tracing::debug!(error = %e, "Remote state poll failed"),
        }
    }
}

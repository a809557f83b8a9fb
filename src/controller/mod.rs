//! Controller module - Playback orchestration and event handling
//!
//! This module contains the application controller that turns user intents
//! into remote player calls and folds the results back into the model.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Play, toggle and track navigation
//! - `refresh`: Device readiness, album art refresh and remote state sync

mod input;
mod playback;
mod refresh;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::model::AppModel;
use crate::player::{PlayerApi, PlayerError};

/// Delays applied before best-effort album art refreshes
#[derive(Clone, Copy, Debug)]
pub struct RefreshTiming {
    pub after_play: Duration,
    pub after_resume: Duration,
}

impl Default for RefreshTiming {
    fn default() -> Self {
        Self {
            after_play: Duration::from_millis(1000),
            after_resume: Duration::from_millis(500),
        }
    }
}

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) player: Arc<dyn PlayerApi>,
    timing: RefreshTiming,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, player: Arc<dyn PlayerApi>, timing: RefreshTiming) -> Self {
        Self { model, player, timing }
    }

    pub(crate) fn format_error(error: &PlayerError) -> String {
        match error {
            PlayerError::NotReady => "Device not ready yet. Please wait.".to_string(),
            PlayerError::EmptyPlaylist => "No tracks available to play.".to_string(),
            PlayerError::Remote { body, .. } => format!("Error: {}", body),
            PlayerError::Transport(e) if e.is_timeout() => {
                "The streaming service did not answer in time.".to_string()
            }
            other => format!("Error: {}", other),
        }
    }

    /// Surface a failed action to the user. Nothing is retried.
    pub(crate) async fn report_error(&self, error: &PlayerError) {
        let message = Self::format_error(error);
        let model = self.model.lock().await;
        match error {
            // The service's own diagnostic goes on the status line verbatim.
            PlayerError::Remote { .. } => model.set_status(message).await,
            _ => model.set_error(message).await,
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Recording stand-in for the remote player

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::model::TrackRef;
    use crate::player::{AlbumArt, DeviceId, DeviceReady, PlaybackSnapshot, PlayerApi, PlayerError, Result};

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Call {
        Connect,
        Play { device: String, uri: String },
        Pause,
        Resume,
        GetState,
        GetArt,
    }

    #[derive(Default)]
    pub struct FakePlayer {
        calls: Mutex<Vec<Call>>,
        /// `Some((status, body))` makes `play` fail with a remote error
        pub play_failure: Mutex<Option<(u16, String)>>,
        /// Per-call latency for `play`, consumed front to back
        pub play_delays: Mutex<VecDeque<Duration>>,
        /// Per-call latency for `get_state`, consumed front to back
        pub state_delays: Mutex<VecDeque<Duration>>,
        pub state: Mutex<Option<PlaybackSnapshot>>,
        pub art: Mutex<Option<AlbumArt>>,
        pub ready_tx: Mutex<Option<oneshot::Sender<DeviceId>>>,
    }

    impl FakePlayer {
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
        }

        pub fn set_state(&self, is_playing: Option<bool>) {
            *self.state.lock().unwrap() = is_playing
                .map(|p| PlaybackSnapshot::from_json(serde_json::json!({ "is_playing": p })));
        }

        pub fn set_art(&self, url: Option<&str>) {
            *self.art.lock().unwrap() = url.map(|u| AlbumArt {
                image_url: u.to_string(),
                track_info: Some("Song — Band".to_string()),
            });
        }

        /// Deliver the device id to whoever awaits `connect`.
        pub fn signal_ready(&self, id: &str) {
            if let Some(tx) = self.ready_tx.lock().unwrap().take() {
                let _ = tx.send(DeviceId::new(id));
            }
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl PlayerApi for FakePlayer {
        fn connect(&self) -> DeviceReady {
            self.record(Call::Connect);
            let (tx, ready) = DeviceReady::channel();
            *self.ready_tx.lock().unwrap() = Some(tx);
            ready
        }

        async fn play(&self, device_id: &DeviceId, track: &TrackRef) -> Result<()> {
            self.record(Call::Play {
                device: device_id.to_string(),
                uri: track.uri.clone(),
            });
            let delay = self.play_delays.lock().unwrap().pop_front();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match self.play_failure.lock().unwrap().clone() {
                Some((status, body)) => Err(PlayerError::Remote { status, body }),
                None => Ok(()),
            }
        }

        async fn pause(&self, _device_id: &DeviceId) -> Result<()> {
            self.record(Call::Pause);
            Ok(())
        }

        async fn resume(&self, _device_id: &DeviceId) -> Result<()> {
            self.record(Call::Resume);
            Ok(())
        }

        async fn get_state(&self) -> Result<Option<PlaybackSnapshot>> {
            self.record(Call::GetState);
            // Read before sleeping: the answer reflects when the request was made
            let state = self.state.lock().unwrap().clone();
            let delay = self.state_delays.lock().unwrap().pop_front();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            Ok(state)
        }

        async fn get_currently_playing_art(&self) -> Result<Option<AlbumArt>> {
            self.record(Call::GetArt);
            Ok(self.art.lock().unwrap().clone())
        }
    }
}

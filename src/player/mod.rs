//! Player module - Remote playback client
//!
//! - `types`: Device handles, playback snapshots and album art
//! - `error`: Error taxonomy for playback operations
//! - `web_api`: Streaming service Web API client

mod error;
mod types;
mod web_api;

use async_trait::async_trait;

use crate::model::TrackRef;

pub use error::{PlayerError, Result};
pub use types::{AlbumArt, DeviceId, DeviceReady, PlaybackSnapshot};
pub use web_api::{WebApiPlayer, DEFAULT_API_BASE};

/// Operations the controller needs from the remote player.
///
/// Every call is a single attempt; callers decide how to surface failures.
#[async_trait]
pub trait PlayerApi: Send + Sync {
    /// Start the remote session. Readiness arrives through the returned handle.
    fn connect(&self) -> DeviceReady;

    /// Start playback of exactly one track on the device.
    async fn play(&self, device_id: &DeviceId, track: &TrackRef) -> Result<()>;

    async fn pause(&self, device_id: &DeviceId) -> Result<()>;

    async fn resume(&self, device_id: &DeviceId) -> Result<()>;

    /// `None` when nothing is active on the account.
    async fn get_state(&self) -> Result<Option<PlaybackSnapshot>>;

    /// `None` when nothing is playing or the item has no cover.
    async fn get_currently_playing_art(&self) -> Result<Option<AlbumArt>>;
}

//! Wire and handle types shared by player implementations

use std::fmt;

use serde::Deserialize;
use tokio::sync::oneshot;

/// Opaque handle the streaming service assigns to a playback target
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of the remote player as returned by the service
#[derive(Clone, Debug)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    pub raw: serde_json::Value,
}

impl PlaybackSnapshot {
    pub fn from_json(raw: serde_json::Value) -> Self {
        let is_playing = raw
            .get("is_playing")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        Self { is_playing, raw }
    }
}

/// Cover image of the track currently playing on the device
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlbumArt {
    pub image_url: String,
    /// "Title — Artist" when the service reports them
    pub track_info: Option<String>,
}

#[derive(Deserialize)]
struct CurrentlyPlaying {
    item: Option<PlayingItem>,
}

#[derive(Deserialize)]
struct PlayingItem {
    name: Option<String>,
    album: Option<PlayingAlbum>,
    #[serde(default)]
    artists: Vec<PlayingArtist>,
}

#[derive(Deserialize)]
struct PlayingAlbum {
    #[serde(default)]
    images: Vec<PlayingImage>,
}

#[derive(Deserialize)]
struct PlayingArtist {
    name: String,
}

#[derive(Deserialize)]
struct PlayingImage {
    url: String,
}

impl AlbumArt {
    /// Extract the largest cover from a currently-playing payload.
    ///
    /// Returns `Ok(None)` when the payload has no item or no images.
    pub fn from_currently_playing(body: &str) -> serde_json::Result<Option<Self>> {
        let playing: CurrentlyPlaying = serde_json::from_str(body)?;
        let Some(item) = playing.item else {
            return Ok(None);
        };
        let Some(image) = item.album.and_then(|a| a.images.into_iter().next()) else {
            return Ok(None);
        };

        let track_info = match (item.name, item.artists.first()) {
            (Some(name), Some(artist)) => Some(format!("{} — {}", name, artist.name)),
            (Some(name), None) => Some(name),
            _ => None,
        };

        Ok(Some(Self {
            image_url: image.url,
            track_info,
        }))
    }
}

#[derive(Deserialize)]
pub(crate) struct DeviceList {
    #[serde(default)]
    pub devices: Vec<RemoteDevice>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RemoteDevice {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
}

impl DeviceList {
    /// Prefer the device with our name, then whichever device is active.
    pub fn pick(&self, name: &str) -> Option<DeviceId> {
        self.devices
            .iter()
            .find(|d| d.name == name)
            .or_else(|| self.devices.iter().find(|d| d.is_active))
            .and_then(|d| d.id.clone())
            .map(DeviceId::new)
    }
}

/// Resolves once the streaming service has assigned a device.
pub struct DeviceReady {
    rx: oneshot::Receiver<DeviceId>,
}

impl DeviceReady {
    pub fn channel() -> (oneshot::Sender<DeviceId>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    /// `None` if the connection attempt gave up.
    pub async fn wait(self) -> Option<DeviceId> {
        self.rx.await.ok()
    }
}

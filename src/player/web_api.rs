//! Streaming service Web API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::json;
use tokio::time::Instant;

use crate::model::TrackRef;
use super::error::{PlayerError, Result};
use super::types::{AlbumArt, DeviceId, DeviceList, DeviceReady, PlaybackSnapshot};
use super::PlayerApi;

pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEVICE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Player backed by the service's HTTP API and a bearer token
#[derive(Clone)]
pub struct WebApiPlayer {
    http: Client,
    api_base: String,
    token: String,
    device_name: String,
    connect_timeout: Duration,
    poll_interval: Duration,
}

impl WebApiPlayer {
    pub fn new(
        api_base: impl Into<String>,
        token: impl Into<String>,
        device_name: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!("disk-player/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
            device_name: device_name.into(),
            connect_timeout,
            poll_interval: DEVICE_POLL_INTERVAL,
        })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// PUT that succeeds only on 204 No Content.
    async fn put_no_content(
        &self,
        path: &str,
        device_id: Option<&DeviceId>,
        body: Option<serde_json::Value>,
    ) -> Result<()> {
        let mut request = self.http.put(self.url(path)).bearer_auth(&self.token);
        if let Some(device_id) = device_id {
            request = request.query(&[("device_id", device_id.as_str())]);
        }
        request = match body {
            Some(body) => request.json(&body),
            None => request.body(""),
        };

        let response = request.send().await?;
        if response.status() == StatusCode::NO_CONTENT {
            Ok(())
        } else {
            Err(Self::remote_error(response).await)
        }
    }

    /// GET that maps 202/204 to `None` and returns the body otherwise.
    async fn get_optional(&self, path: &str) -> Result<Option<String>> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::ACCEPTED => Ok(None),
            status if status.is_success() => Ok(Some(response.text().await?)),
            _ => Err(Self::remote_error(response).await),
        }
    }

    async fn remote_error(response: Response) -> PlayerError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        PlayerError::Remote { status, body }
    }

    async fn list_devices(&self) -> Result<DeviceList> {
        match self.get_optional("/me/player/devices").await? {
            Some(body) => serde_json::from_str(&body).map_err(|e| PlayerError::Decode(e.to_string())),
            None => Ok(DeviceList { devices: Vec::new() }),
        }
    }

    /// Poll the device list until our device (or an active one) shows up.
    async fn wait_for_device(&self) -> Result<DeviceId> {
        let deadline = Instant::now() + self.connect_timeout;
        loop {
            match self.list_devices().await {
                Ok(devices) => {
                    if let Some(device_id) = devices.pick(&self.device_name) {
                        tracing::info!(device_id = %device_id, "Playback device available");
                        return Ok(device_id);
                    }
                    tracing::trace!(count = devices.devices.len(), "Device not listed yet");
                }
                Err(e) => tracing::warn!(error = %e, "Failed to list devices"),
            }

            if Instant::now() + self.poll_interval > deadline {
                return Err(PlayerError::DeviceTimeout(self.connect_timeout));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Make the device the account's active player without starting playback.
    pub async fn transfer_playback(&self, device_id: &DeviceId) -> Result<()> {
        crate::log_api_request!("transfer_playback", device_id = %device_id);
        let body = json!({ "device_ids": [device_id.as_str()], "play": false });
        let response = self
            .http
            .put(self.url("/me/player"))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let result = if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::remote_error(response).await)
        };
        crate::log_api_result!("transfer_playback", result);
        result
    }
}

#[async_trait]
impl PlayerApi for WebApiPlayer {
    fn connect(&self) -> DeviceReady {
        let (tx, ready) = DeviceReady::channel();
        let player = self.clone();
        tracing::info!(device_name = %self.device_name, "Waiting for playback device");

        tokio::spawn(async move {
            match player.wait_for_device().await {
                Ok(device_id) => {
                    let _ = player.transfer_playback(&device_id).await;
                    let _ = tx.send(device_id);
                }
                Err(e) => tracing::error!(error = %e, "Playback device never became ready"),
            }
        });

        ready
    }

    async fn play(&self, device_id: &DeviceId, track: &TrackRef) -> Result<()> {
        crate::log_api_request!("play", device_id = %device_id, uri = %track.uri);
        let body = json!({ "uris": [track.uri.as_str()] });
        let result = self.put_no_content("/me/player/play", Some(device_id), Some(body)).await;
        crate::log_api_result!("play", result);
        result
    }

    async fn pause(&self, device_id: &DeviceId) -> Result<()> {
        crate::log_api_request!("pause", device_id = %device_id);
        let result = self.put_no_content("/me/player/pause", Some(device_id), None).await;
        crate::log_api_result!("pause", result);
        result
    }

    async fn resume(&self, device_id: &DeviceId) -> Result<()> {
        crate::log_api_request!("resume", device_id = %device_id);
        let result = self.put_no_content("/me/player/play", Some(device_id), None).await;
        crate::log_api_result!("resume", result);
        result
    }

    async fn get_state(&self) -> Result<Option<PlaybackSnapshot>> {
        tracing::trace!("Fetching current playback state");
        let Some(body) = self.get_optional("/me/player").await? else {
            return Ok(None);
        };
        let raw: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| PlayerError::Decode(e.to_string()))?;
        let snapshot = PlaybackSnapshot::from_json(raw);
        tracing::trace!(is_playing = snapshot.is_playing, "Got playback state");
        Ok(Some(snapshot))
    }

    async fn get_currently_playing_art(&self) -> Result<Option<AlbumArt>> {
        crate::log_api_request!("currently_playing", path = "/me/player/currently-playing");
        let Some(body) = self.get_optional("/me/player/currently-playing").await? else {
            tracing::debug!("Nothing currently playing");
            return Ok(None);
        };
        AlbumArt::from_currently_playing(&body).map_err(|e| PlayerError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn player(server: &MockServer) -> WebApiPlayer {
        WebApiPlayer::new(server.uri(), "token-123", "Disk Player", Duration::from_millis(300))
            .unwrap()
            .with_poll_interval(Duration::from_millis(50))
    }

    fn track() -> TrackRef {
        TrackRef::new("spotify:track:abc", None)
    }

    #[tokio::test]
    async fn play_sends_single_uri_with_token_and_device() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/me/player/play"))
            .and(query_param("device_id", "dev-1"))
            .and(header("authorization", "Bearer token-123"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "uris": ["spotify:track:abc"] })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let result = player(&server).play(&DeviceId::new("dev-1"), &track()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn play_non_204_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/me/player/play"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_string(r#"{"error":{"status":403,"message":"Premium required"}}"#),
            )
            .mount(&server)
            .await;

        match player(&server).play(&DeviceId::new("dev-1"), &track()).await {
            Err(PlayerError::Remote { status, body }) => {
                assert_eq!(status, 403);
                assert!(body.contains("Premium required"));
            }
            other => panic!("expected Remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn play_200_is_not_success() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/me/player/play"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let result = player(&server).play(&DeviceId::new("dev-1"), &track()).await;
        assert!(matches!(result, Err(PlayerError::Remote { status: 200, .. })));
    }

    #[tokio::test]
    async fn pause_and_resume_hit_their_endpoints() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/me/player/pause"))
            .and(query_param("device_id", "dev-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/me/player/play"))
            .and(query_param("device_id", "dev-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let p = player(&server);
        let device = DeviceId::new("dev-1");
        assert!(p.pause(&device).await.is_ok());
        assert!(p.resume(&device).await.is_ok());
    }

    #[tokio::test]
    async fn pause_failure_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/me/player/pause"))
            .respond_with(ResponseTemplate::new(404).set_body_string("No active device"))
            .mount(&server)
            .await;

        let result = player(&server).pause(&DeviceId::new("dev-1")).await;
        assert!(matches!(result, Err(PlayerError::Remote { status: 404, .. })));
    }

    #[tokio::test]
    async fn get_state_no_content_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/player"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        assert!(player(&server).get_state().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_state_reads_is_playing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/player"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "is_playing": false,
                "progress_ms": 1200,
                "device": {"id": "dev-1", "name": "Disk Player"}
            })))
            .mount(&server)
            .await;

        let snapshot = player(&server).get_state().await.unwrap().unwrap();
        assert!(!snapshot.is_playing);
        assert_eq!(snapshot.raw["progress_ms"], 1200);
    }

    #[tokio::test]
    async fn currently_playing_no_content_statuses_are_none() {
        for status in [202, 204] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/me/player/currently-playing"))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let art = player(&server).get_currently_playing_art().await.unwrap();
            assert!(art.is_none(), "status {status}");
        }
    }

    #[tokio::test]
    async fn currently_playing_returns_art() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/player/currently-playing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "item": {
                    "name": "Song",
                    "artists": [{"name": "Band"}],
                    "album": {"images": [{"url": "https://i.scdn.co/image/1"}]}
                }
            })))
            .mount(&server)
            .await;

        let art = player(&server).get_currently_playing_art().await.unwrap().unwrap();
        assert_eq!(art.image_url, "https://i.scdn.co/image/1");
        assert_eq!(art.track_info.as_deref(), Some("Song — Band"));
    }

    #[tokio::test]
    async fn connect_resolves_with_named_device_and_transfers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/player/devices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "devices": [
                    {"id": "other", "name": "Phone", "is_active": true},
                    {"id": "ours", "name": "Disk Player", "is_active": false}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/me/player"))
            .and(body_json(json!({ "device_ids": ["ours"], "play": false })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let ready = player(&server).connect();
        assert_eq!(ready.wait().await, Some(DeviceId::new("ours")));
    }

    #[tokio::test]
    async fn connect_gives_up_silently() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/player/devices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "devices": [] })))
            .mount(&server)
            .await;

        let ready = player(&server).connect();
        assert_eq!(ready.wait().await, None);
    }
}

//! Session bootstrap: access token plus the fixed playlist for this run

use chrono::Utc;
use futures::{StreamExt, TryStreamExt};
use reqwest::header;
use rspotify::{
    model::{PlayableItem, PlaylistId},
    prelude::*,
    AuthCodeSpotify, Config, Token,
};
use serde::Deserialize;
use thiserror::Error;

use crate::model::TrackRef;

/// Most playlist items loaded in direct mode
const PLAYLIST_LIMIT: usize = 100;
const TRACK_URI_PREFIX: &str = "spotify:track:";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The session endpoint answered with an `error` field
    #[error("{0}")]
    Rejected(String),

    #[error("Session response did not include an access token")]
    MissingToken,

    #[error("Failed to parse session response: {0}")]
    Decode(String),

    #[error("Invalid Spotify playlist link.")]
    InvalidPlaylistLink(String),

    #[error("Could not hand the access token to the Spotify client")]
    TokenUnavailable,

    #[error("Spotify request failed: {0}")]
    Spotify(#[from] rspotify::ClientError),
}

/// Credentials and playlist for one run
#[derive(Clone, Debug)]
pub struct SessionData {
    pub token: String,
    pub tracks: Vec<TrackRef>,
}

#[derive(Deserialize)]
struct SessionPayload {
    token: Option<String>,
    #[serde(default)]
    uris: Vec<String>,
    #[serde(default)]
    images: Vec<Option<String>>,
    error: Option<serde_json::Value>,
}

impl SessionPayload {
    fn into_session(self) -> Result<SessionData, SessionError> {
        if let Some(error) = self.error {
            let message = match error {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            return Err(SessionError::Rejected(message));
        }
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .ok_or(SessionError::MissingToken)?;

        let mut images = self.images.into_iter();
        let tracks = self
            .uris
            .into_iter()
            .map(|uri| TrackRef::new(uri, images.next().flatten()))
            .collect();

        Ok(SessionData { token, tracks })
    }
}

/// Fetch `{ token, uris, images }` from the session endpoint.
///
/// The body is inspected regardless of status since the endpoint reports
/// failures as `{ "error": ... }` with a 4xx code.
pub async fn load_from_endpoint(url: &str, cookie: Option<&str>) -> Result<SessionData, SessionError> {
    tracing::info!(url, "Loading session");
    let mut request = reqwest::Client::new().get(url);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }

    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    let payload: SessionPayload = serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(status = status.as_u16(), error = %e, "Unparseable session response");
        SessionError::Decode(format!("{} ({})", e, status))
    })?;

    let session = payload.into_session()?;
    tracing::info!(tracks = session.tracks.len(), "Session loaded");
    Ok(session)
}

/// Accepts `https://open.spotify.com/playlist/ID?...` or `spotify:playlist:ID`.
pub fn extract_playlist_id(link: &str) -> Option<String> {
    let link = link.trim();
    let id = if let Some((_, rest)) = link.split_once("open.spotify.com/playlist/") {
        rest.split(['?', '/', '#']).next().unwrap_or_default()
    } else if let Some(rest) = link.strip_prefix("spotify:playlist:") {
        rest
    } else {
        return None;
    };

    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Keep only track URIs, pairing each with its cover.
fn keep_tracks(items: impl IntoIterator<Item = (Option<String>, Option<String>)>) -> Vec<TrackRef> {
    items
        .into_iter()
        .filter_map(|(uri, image)| {
            let uri = uri.filter(|u| u.starts_with(TRACK_URI_PREFIX))?;
            Some(TrackRef::new(uri, image))
        })
        .collect()
}

async fn setup_rspotify(access_token: &str) -> Result<AuthCodeSpotify, SessionError> {
    let spotify = AuthCodeSpotify::with_config(
        Default::default(),
        Default::default(),
        Config {
            token_cached: false,
            token_refreshing: false,
            ..Default::default()
        },
    );

    let token = Token {
        access_token: access_token.to_string(),
        expires_in: chrono::Duration::seconds(3600),
        expires_at: Some(Utc::now() + chrono::Duration::seconds(3600)),
        ..Default::default()
    };
    *spotify
        .token
        .lock()
        .await
        .map_err(|_| SessionError::TokenUnavailable)? = Some(token);
    tracing::debug!("rspotify token set");
    Ok(spotify)
}

/// Load a playlist straight from the Web API with an existing token.
pub async fn load_direct(link: &str, access_token: &str) -> Result<SessionData, SessionError> {
    let playlist_id = extract_playlist_id(link)
        .ok_or_else(|| SessionError::InvalidPlaylistLink(link.to_string()))?;
    let id = PlaylistId::from_id(playlist_id.as_str())
        .map_err(|_| SessionError::InvalidPlaylistLink(link.to_string()))?;

    tracing::info!(playlist_id = %playlist_id, "Loading playlist directly");
    let spotify = setup_rspotify(access_token).await?;

    let items: Vec<_> = spotify
        .playlist_items(id, None, None)
        .take(PLAYLIST_LIMIT)
        .try_collect()
        .await?;

    let tracks = keep_tracks(items.into_iter().map(|item| match item.track {
        Some(PlayableItem::Track(track)) => {
            let uri = track.id.as_ref().map(|id| format!("{}{}", TRACK_URI_PREFIX, id.id()));
            let image = track.album.images.into_iter().next().map(|i| i.url);
            (uri, image)
        }
        _ => (None, None),
    }));

    tracing::info!(tracks = tracks.len(), "Playlist loaded");
    Ok(SessionData {
        token: access_token.to_string(),
        tracks,
    })
}

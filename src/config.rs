//! Command line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::model::ViewMode;
use crate::player::DEFAULT_API_BASE;

pub const DEFAULT_SESSION_URL: &str = "http://127.0.0.1:5000/player_data";
pub const DEFAULT_DEVICE_NAME: &str = "Disk Player";

/// Terminal remote for a streaming playback device.
#[derive(Parser, Debug, Clone)]
#[command(name = "disk-player", version, about)]
pub struct Config {
    /// Endpoint returning `{ token, uris, images }` for this session
    #[arg(long, env = "PLAYER_SESSION_URL", default_value = DEFAULT_SESSION_URL)]
    pub session_url: String,

    /// Cookie header sent with the session request
    #[arg(long, env = "PLAYER_SESSION_COOKIE")]
    pub session_cookie: Option<String>,

    /// Playlist link or URI to load directly instead of using the session endpoint
    #[arg(long, env = "PLAYER_PLAYLIST", requires = "token")]
    pub playlist: Option<String>,

    /// Access token for direct playlist mode
    #[arg(long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Name of the playback device to wait for
    #[arg(long, env = "PLAYER_DEVICE_NAME", default_value = DEFAULT_DEVICE_NAME)]
    pub device_name: String,

    #[arg(long, env = "SPOTIFY_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    #[arg(long, env = "PLAYER_VIEW", value_enum, default_value_t = ViewMode::Panel)]
    pub view: ViewMode,

    /// Delay before refreshing album art after starting a track
    #[arg(long, default_value_t = 1000)]
    pub art_delay_ms: u64,

    /// Delay before refreshing album art after resuming
    #[arg(long, default_value_t = 500)]
    pub resume_art_delay_ms: u64,

    /// How long to wait for the playback device to appear
    #[arg(long, default_value_t = 30)]
    pub connect_timeout_secs: u64,

    /// Interval between remote state polls
    #[arg(long, default_value_t = 5)]
    pub state_poll_secs: u64,

    #[arg(long, default_value = ".logs")]
    pub log_dir: PathBuf,

    /// `.env` file picked up by `load`, logged once logging is up
    #[arg(skip)]
    pub env_file: Option<PathBuf>,
}

impl Config {
    /// Load `.env` if present, then parse arguments.
    pub fn load() -> Self {
        let env_file = dotenvy::dotenv().ok();
        Self {
            env_file,
            ..Self::parse()
        }
    }

    pub fn art_delay(&self) -> Duration {
        Duration::from_millis(self.art_delay_ms)
    }

    pub fn resume_art_delay(&self) -> Duration {
        Duration::from_millis(self.resume_art_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn state_poll_interval(&self) -> Duration {
        Duration::from_secs(self.state_poll_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::try_parse_from(["disk-player"]).unwrap();
        assert_eq!(config.session_url, DEFAULT_SESSION_URL);
        assert_eq!(config.device_name, DEFAULT_DEVICE_NAME);
        assert_eq!(config.view, ViewMode::Panel);
        assert_eq!(config.art_delay(), Duration::from_millis(1000));
        assert_eq!(config.resume_art_delay(), Duration::from_millis(500));
        assert!(config.env_file.is_none());
    }

    #[test]
    fn env_file_is_not_a_command_line_flag() {
        assert!(Config::try_parse_from(["disk-player", "--env-file", ".env"]).is_err());
    }

    #[test]
    fn playlist_requires_token() {
        let result = Config::try_parse_from([
            "disk-player",
            "--playlist",
            "spotify:playlist:37i9dQZF1DXcBWIGoYBM5M",
        ]);
        // SPOTIFY_ACCESS_TOKEN may be set in the environment running the tests.
        if std::env::var_os("SPOTIFY_ACCESS_TOKEN").is_none() {
            assert!(result.is_err());
        }

        let config = Config::try_parse_from([
            "disk-player",
            "--playlist",
            "spotify:playlist:37i9dQZF1DXcBWIGoYBM5M",
            "--token",
            "abc",
            "--view",
            "disk",
        ])
        .unwrap();
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.view, ViewMode::Disk);
    }
}

//! Playback session state

use crate::player::DeviceId;
use super::cursor::PlaylistCursor;
use super::types::TrackRef;

/// Coarse controller state derived from the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerPhase {
    /// No device assigned yet
    Idle,
    Paused,
    Playing,
}

/// Identifies the session state a request was issued against.
///
/// A completion is applied only while the token is still current.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshToken {
    pub index: usize,
    pub generation: u64,
}

/// Snapshot taken when a remote state poll starts.
///
/// Stale once a user request is issued or lands after the poll began.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncStamp {
    token: RefreshToken,
    settled: u64,
}

/// Everything the controller mutates during a run
#[derive(Clone, Debug)]
pub struct PlaybackSession {
    device_id: Option<DeviceId>,
    cursor: PlaylistCursor,
    is_playing: bool,
    generation: u64,
    /// Number of user requests whose result has been applied
    settled: u64,
}

impl PlaybackSession {
    pub fn new(tracks: Vec<TrackRef>) -> Self {
        Self {
            device_id: None,
            cursor: PlaylistCursor::new(tracks),
            is_playing: false,
            generation: 0,
            settled: 0,
        }
    }

    pub fn device_id(&self) -> Option<&DeviceId> {
        self.device_id.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.device_id.is_some()
    }

    /// Returns false if a device was already assigned.
    pub fn set_device(&mut self, device_id: DeviceId) -> bool {
        if self.device_id.is_some() {
            return false;
        }
        self.device_id = Some(device_id);
        self.is_playing = false;
        true
    }

    pub fn phase(&self) -> PlayerPhase {
        match (&self.device_id, self.is_playing) {
            (None, _) => PlayerPhase::Idle,
            (Some(_), false) => PlayerPhase::Paused,
            (Some(_), true) => PlayerPhase::Playing,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn set_playing(&mut self, is_playing: bool) {
        self.is_playing = is_playing;
    }

    /// Apply the result of a user request. Polls started earlier become stale.
    pub fn settle(&mut self, is_playing: bool) {
        self.is_playing = is_playing;
        self.settled += 1;
    }

    pub fn cursor(&self) -> &PlaylistCursor {
        &self.cursor
    }

    pub fn current_track(&self) -> Option<&TrackRef> {
        self.cursor.current()
    }

    pub fn current_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn len(&self) -> usize {
        self.cursor.len()
    }

    pub fn next_track(&mut self) -> usize {
        self.cursor.next()
    }

    pub fn prev_track(&mut self) -> usize {
        self.cursor.prev()
    }

    /// Start a new request. Earlier tokens stop being current.
    pub fn issue_token(&mut self) -> RefreshToken {
        self.generation += 1;
        self.token()
    }

    /// Token for the current state without invalidating outstanding ones.
    pub fn token(&self) -> RefreshToken {
        RefreshToken {
            index: self.cursor.index(),
            generation: self.generation,
        }
    }

    pub fn is_current(&self, token: RefreshToken) -> bool {
        self.token() == token
    }

    pub fn sync_stamp(&self) -> SyncStamp {
        SyncStamp {
            token: self.token(),
            settled: self.settled,
        }
    }

    pub fn is_sync_current(&self, stamp: SyncStamp) -> bool {
        self.sync_stamp() == stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> PlaybackSession {
        PlaybackSession::new(vec![
            TrackRef::new("spotify:track:a", None),
            TrackRef::new("spotify:track:b", None),
        ])
    }

    #[test]
    fn starts_idle_until_device_assigned() {
        let mut s = session();
        assert_eq!(s.phase(), PlayerPhase::Idle);
        assert!(s.set_device(DeviceId::new("dev-1")));
        assert_eq!(s.phase(), PlayerPhase::Paused);
        assert!(!s.set_device(DeviceId::new("dev-2")));
        assert_eq!(s.device_id().map(DeviceId::as_str), Some("dev-1"));
        s.set_playing(true);
        assert_eq!(s.phase(), PlayerPhase::Playing);
    }

    #[test]
    fn issuing_a_token_invalidates_older_ones() {
        let mut s = session();
        let first = s.issue_token();
        assert!(s.is_current(first));
        let second = s.issue_token();
        assert!(!s.is_current(first));
        assert!(s.is_current(second));
    }

    #[test]
    fn settling_a_request_invalidates_earlier_poll() {
        let mut s = session();
        s.set_device(DeviceId::new("dev"));
        let token = s.issue_token();
        let stamp = s.sync_stamp();
        assert!(s.is_sync_current(stamp));

        s.settle(true);
        assert!(s.is_current(token));
        assert!(!s.is_sync_current(stamp));
        assert!(s.is_sync_current(s.sync_stamp()));
    }

    #[test]
    fn moving_the_cursor_invalidates_tokens() {
        let mut s = session();
        let token = s.token();
        s.next_track();
        assert!(!s.is_current(token));
    }
}

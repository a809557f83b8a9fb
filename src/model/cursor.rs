//! Wrapping cursor over the session playlist

use super::types::TrackRef;

/// Ordered, fixed list of tracks with a single mutable position.
#[derive(Clone, Debug, Default)]
pub struct PlaylistCursor {
    tracks: Vec<TrackRef>,
    index: usize,
}

impl PlaylistCursor {
    pub fn new(tracks: Vec<TrackRef>) -> Self {
        Self { tracks, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&TrackRef> {
        self.tracks.get(self.index)
    }

    pub fn tracks(&self) -> &[TrackRef] {
        &self.tracks
    }

    /// Advance with wraparound. No-op on an empty playlist.
    pub fn next(&mut self) -> usize {
        if !self.tracks.is_empty() {
            self.index = (self.index + 1) % self.tracks.len();
        }
        self.index
    }

    /// Step back with wraparound. No-op on an empty playlist.
    pub fn prev(&mut self) -> usize {
        if !self.tracks.is_empty() {
            let len = self.tracks.len();
            self.index = (self.index + len - 1) % len;
        }
        self.index
    }
}

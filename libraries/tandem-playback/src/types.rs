//! Core types for playback control

use serde::{Deserialize, Serialize};

/// A playable track
///
/// Supplied by the host and never mutated by the controller. Identity is by
/// `id`, which must be unique within one queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: String,

    /// Locator handed to the sink
    pub url: String,
}

impl Track {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    None,

    /// Loop the current track (native sink loop)
    RepeatOne,

    /// Loop the whole queue
    ///
    /// Recorded and published only. When a track ends the controller takes
    /// no action; restarting the queue is left to the host.
    RepeatAll,
}

/// Identifies one of the two playback slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotId {
    A,
    B,
}

impl SlotId {
    /// The other slot
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Observable playback state
///
/// A fresh copy is published to observers after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// Volume, 0-100
    pub volume: u8,

    pub is_paused: bool,

    /// Seconds elapsed in the current track (0 when nothing is active)
    pub position: f64,

    pub repeat_mode: RepeatMode,

    pub is_shuffled: bool,

    /// Track in the active slot, `None` when idle
    pub current_track: Option<Track>,

    /// Shuffle-immune tracks that play before `next_tracks`
    pub priority_tracks: Vec<Track>,

    /// Normal forward queue (the list shuffle reorders)
    pub next_tracks: Vec<Track>,

    /// History, most recently played first
    pub previous_tracks: Vec<Track>,
}

impl PlaybackState {
    /// Nothing is loaded
    pub fn is_idle(&self) -> bool {
        self.current_track.is_none()
    }

    /// A track is loaded and not paused
    pub fn is_playing(&self) -> bool {
        self.current_track.is_some() && !self.is_paused
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            volume: 100,
            is_paused: true,
            position: 0.0,
            repeat_mode: RepeatMode::None,
            is_shuffled: false,
            current_track: None,
            priority_tracks: Vec::new(),
            next_tracks: Vec::new(),
            previous_tracks: Vec::new(),
        }
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Initial volume (0-100, default: 100)
    pub volume: u8,

    /// Initial repeat mode (default: None)
    pub repeat_mode: RepeatMode,

    /// Maximum number of history entries kept (default: unbounded)
    pub history_limit: Option<usize>,

    /// Elapsed seconds after which "previous" restarts the current track
    /// instead of going back (default: 3.0)
    pub restart_threshold_secs: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            volume: 100,
            repeat_mode: RepeatMode::None,
            history_limit: None,
            restart_threshold_secs: 3.0,
        }
    }
}

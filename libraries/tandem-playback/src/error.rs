//! Error types for playback control

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by an audio sink
///
/// Carries the backend's message plus whatever context it had: the name of the
/// event that signalled the failure and a rendering of the underlying error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct SinkError {
    /// Human readable description
    pub message: String,

    /// Originating backend event (e.g. "error", "stalled")
    pub event: Option<String>,

    /// Underlying error, rendered as text
    pub underlying: Option<String>,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            event: None,
            underlying: None,
        }
    }

    #[must_use]
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    #[must_use]
    pub fn with_underlying(mut self, underlying: impl std::fmt::Display) -> Self {
        self.underlying = Some(underlying.to_string());
        self
    }
}

/// Playback errors
///
/// None of these are fatal: the controller stays usable after reporting one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// The sink refused to start playback
    #[error("Failed to start track {track_id}: {error}")]
    StartFailed { track_id: String, error: SinkError },

    /// Asynchronous failure reported by a sink
    #[error("Sink error{}: {error}", .track_id.as_ref().map(|id| format!(" on track {id}")).unwrap_or_default())]
    Sink {
        track_id: Option<String>,
        error: SinkError,
    },
}

impl PlaybackError {
    /// Whether the error originated in the audio backend rather than a command
    pub fn is_sink_error(&self) -> bool {
        matches!(self, Self::StartFailed { .. } | Self::Sink { .. })
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

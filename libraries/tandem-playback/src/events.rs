//! Playback notifications
//!
//! Observers are called synchronously, in registration order, right after the
//! mutation that triggered them. Nothing is batched or coalesced.

use crate::error::PlaybackError;
use crate::types::PlaybackState;
use std::cell::RefCell;
use std::rc::Rc;

/// Receives notifications from the playback controller
pub trait PlaybackObserver {
    /// Called after every state mutation with a fresh snapshot
    fn on_state_changed(&mut self, state: &PlaybackState);

    /// Called when a command or a sink fails
    fn on_error(&mut self, _error: &PlaybackError) {}

    /// Called once when playback runs off the end of the queue
    ///
    /// Always preceded by an `on_state_changed` carrying the idle state.
    fn on_queue_exhausted(&mut self) {}
}

/// Notification recorded by [`EventLog`]
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// State snapshot after a mutation
    StateChanged(PlaybackState),

    /// Command or sink failure
    Error(PlaybackError),

    /// Queue ran out; the controller is idle
    QueueExhausted,
}

/// Observer that records every notification for later draining
///
/// Clones share the same buffer, so a host can register one clone with the
/// controller and keep another to drain from its own loop.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<PlaybackEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all events recorded since the last drain
    pub fn drain(&self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Most recent state snapshot, if any was recorded
    pub fn last_state(&self) -> Option<PlaybackState> {
        self.events.borrow().iter().rev().find_map(|event| match event {
            PlaybackEvent::StateChanged(state) => Some(state.clone()),
            _ => None,
        })
    }

    /// Errors recorded so far
    pub fn errors(&self) -> Vec<PlaybackError> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                PlaybackEvent::Error(error) => Some(error.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: PlaybackEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl PlaybackObserver for EventLog {
    fn on_state_changed(&mut self, state: &PlaybackState) {
        self.push(PlaybackEvent::StateChanged(state.clone()));
    }

    fn on_error(&mut self, error: &PlaybackError) {
        self.push(PlaybackEvent::Error(error.clone()));
    }

    fn on_queue_exhausted(&mut self) {
        self.push(PlaybackEvent::QueueExhausted);
    }
}

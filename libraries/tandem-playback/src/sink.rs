//! Audio sink capability
//!
//! Abstracts the host media backend. A sink loads one source at a time, plays
//! or pre-buffers it, and reports readiness, progress, end of track and errors
//! back to the controller through a [`SinkEventSender`].

use crate::error::{PlaybackError, Result, SinkError};
use crate::types::SlotId;
use crossbeam_channel::Sender;

/// Why a source is being loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadIntent {
    /// Load for immediate playback
    Playback,

    /// Buffer only; the sink must stay silent until `play()` is called
    Prebuffer,
}

/// Host media backend for one playable source
///
/// Implementors must deliver events only through the sender handed to
/// [`attach`](AudioSink::attach) and must stop using it once
/// [`detach`](AudioSink::detach) has been called.
pub trait AudioSink {
    /// Wire event callbacks
    fn attach(&mut self, events: SinkEventSender);

    /// Clear event callbacks
    fn detach(&mut self);

    /// Assign a source
    fn load(&mut self, url: &str, intent: LoadIntent);

    /// Start or resume playback
    ///
    /// # Returns
    /// * `Ok(())` - Playback started
    /// * `Err(_)` - The backend refused (autoplay policy, decode failure, ...)
    fn play(&mut self) -> std::result::Result<(), SinkError>;

    /// Pause playback
    fn pause(&mut self);

    /// Elapsed time in seconds
    fn current_time(&self) -> f64;

    /// Move the playhead (seconds)
    fn set_current_time(&mut self, seconds: f64);

    /// Native volume, 0.0-1.0
    fn set_volume(&mut self, volume: f32);

    /// Native loop flag
    fn set_loop(&mut self, looping: bool);
}

/// Creates sinks on demand
///
/// Injected into the controller so the core never reaches for an ambient
/// audio context.
pub trait SinkFactory {
    fn create(&mut self, slot: SlotId) -> Box<dyn AudioSink>;
}

impl<F> SinkFactory for F
where
    F: FnMut(SlotId) -> Box<dyn AudioSink>,
{
    fn create(&mut self, slot: SlotId) -> Box<dyn AudioSink> {
        self(slot)
    }
}

/// Kind of notification raised by a sink
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEventKind {
    /// Enough data is buffered to play through
    ReadyToPlayThrough,

    /// Playhead moved
    Progress,

    /// Source reached its end
    Ended,

    /// Backend failure
    Error(SinkError),
}

/// Event delivered from a sink to the controller
#[derive(Debug, Clone, PartialEq)]
pub struct SinkEvent {
    /// Slot the emitting sink was bound to
    pub slot: SlotId,

    /// Binding generation; events from released bindings are discarded
    pub generation: u64,

    pub kind: SinkEventKind,
}

/// Callback handle given to a sink
///
/// Stamps every event with the slot and binding generation it was created
/// for. Sending never blocks; events sent after the controller is gone are
/// dropped.
#[derive(Debug, Clone)]
pub struct SinkEventSender {
    tx: Sender<SinkEvent>,
    slot: SlotId,
    generation: u64,
}

impl SinkEventSender {
    pub(crate) fn new(tx: Sender<SinkEvent>, slot: SlotId, generation: u64) -> Self {
        Self {
            tx,
            slot,
            generation,
        }
    }

    pub fn slot(&self) -> SlotId {
        self.slot
    }

    pub fn ready_to_play_through(&self) {
        self.send(SinkEventKind::ReadyToPlayThrough);
    }

    pub fn progress(&self) {
        self.send(SinkEventKind::Progress);
    }

    pub fn ended(&self) {
        self.send(SinkEventKind::Ended);
    }

    pub fn error(&self, error: SinkError) {
        self.send(SinkEventKind::Error(error));
    }

    fn send(&self, kind: SinkEventKind) {
        self.tx
            .send(SinkEvent {
                slot: self.slot,
                generation: self.generation,
                kind,
            })
            .ok();
    }
}

/// Start playback, converting a refusal into a playback error
pub(crate) fn start(sink: &mut dyn AudioSink, track_id: &str) -> Result<()> {
    sink.play().map_err(|error| PlaybackError::StartFailed {
        track_id: track_id.to_string(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn sender_stamps_slot_and_generation() {
        let (tx, rx) = unbounded();
        let sender = SinkEventSender::new(tx, SlotId::B, 7);

        sender.ready_to_play_through();
        sender.error(SinkError::new("boom"));

        let first = rx.try_recv().unwrap();
        assert_eq!(first.slot, SlotId::B);
        assert_eq!(first.generation, 7);
        assert_eq!(first.kind, SinkEventKind::ReadyToPlayThrough);

        let second = rx.try_recv().unwrap();
        assert_eq!(second.kind, SinkEventKind::Error(SinkError::new("boom")));
    }

    #[test]
    fn sending_after_receiver_dropped_is_silent() {
        let (tx, rx) = unbounded();
        let sender = SinkEventSender::new(tx, SlotId::A, 1);
        drop(rx);

        sender.ended();
    }
}

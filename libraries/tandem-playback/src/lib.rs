//! Tandem - Gapless Sequential Playback
//!
//! Platform-agnostic playback controller that keeps two audio sinks in
//! tandem: one audible, the other pre-buffering the upcoming track so the
//! swap at a track boundary costs no load latency.
//!
//! This crate provides:
//! - Dual-slot sink management (active + standby)
//! - Priority queue that always plays before the normal queue
//! - Reversible shuffle (original order is preserved)
//! - Repeat modes (None, One, All)
//! - Playback history with previous-track navigation
//! - Observer notifications after every state change
//!
//! # Architecture
//!
//! The host supplies sinks through a [`SinkFactory`]. Sinks report readiness,
//! progress, end of track and errors through the [`SinkEventSender`] they are
//! attached with; the host calls [`PlaybackController::process_events`] from
//! its loop to dispatch them. Everything runs on one thread.
//!
//! # Example
//!
//! ```rust
//! use tandem_playback::{
//!     AudioSink, ControllerConfig, EventLog, LoadIntent, PlaybackController, SinkError,
//!     SinkEventSender, SlotId, Track,
//! };
//!
//! #[derive(Default)]
//! struct SilentSink {
//!     events: Option<SinkEventSender>,
//!     time: f64,
//! }
//!
//! impl AudioSink for SilentSink {
//!     fn attach(&mut self, events: SinkEventSender) {
//!         self.events = Some(events);
//!     }
//!     fn detach(&mut self) {
//!         self.events = None;
//!     }
//!     fn load(&mut self, _url: &str, _intent: LoadIntent) {
//!         if let Some(events) = &self.events {
//!             events.ready_to_play_through();
//!         }
//!     }
//!     fn play(&mut self) -> Result<(), SinkError> {
//!         Ok(())
//!     }
//!     fn pause(&mut self) {}
//!     fn current_time(&self) -> f64 {
//!         self.time
//!     }
//!     fn set_current_time(&mut self, seconds: f64) {
//!         self.time = seconds;
//!     }
//!     fn set_volume(&mut self, _volume: f32) {}
//!     fn set_loop(&mut self, _looping: bool) {}
//! }
//!
//! let factory = |_slot: SlotId| -> Box<dyn AudioSink> { Box::new(SilentSink::default()) };
//! let mut controller = PlaybackController::new(ControllerConfig::default(), factory);
//!
//! let log = EventLog::new();
//! controller.add_observer(log.clone());
//!
//! controller.play_tracks(
//!     vec![
//!         Track::new("a", "/music/a.mp3"),
//!         Track::new("b", "/music/b.mp3"),
//!     ],
//!     0,
//! );
//! controller.process_events();
//!
//! assert_eq!(controller.current_track().map(|t| t.id.as_str()), Some("a"));
//! assert_eq!(controller.standby_track().map(|t| t.id.as_str()), Some("b"));
//! assert!(!log.is_empty());
//! ```

mod controller;
mod error;
mod events;
mod queue;
mod shuffle;
mod sink;
mod slots;
mod time;
pub mod types;

// Public exports
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result, SinkError};
pub use events::{EventLog, PlaybackEvent, PlaybackObserver};
pub use queue::TrackQueue;
pub use shuffle::{FisherYates, SeededShuffle, ShuffleStrategy};
pub use sink::{AudioSink, LoadIntent, SinkEvent, SinkEventKind, SinkEventSender, SinkFactory};
pub use time::time_display;
pub use types::{ControllerConfig, PlaybackState, RepeatMode, SlotId, Track};

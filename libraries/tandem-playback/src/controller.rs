//! Playback controller - core orchestration
//!
//! Reacts to host commands and sink events, drives the track queue and the
//! slot manager, and publishes a state snapshot after every mutation.
//!
//! Sink events travel over a channel and are only dispatched from
//! [`PlaybackController::process_events`] (or `handle_sink_event`), so an event
//! raised while a command is running is handled after that command returns.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackObserver,
    queue::TrackQueue,
    shuffle::{FisherYates, ShuffleStrategy},
    sink::{self, SinkEvent, SinkEventKind, SinkFactory},
    slots::SlotManager,
    types::{ControllerConfig, PlaybackState, RepeatMode, SlotId, Track},
};
use crossbeam_channel::{unbounded, Receiver};
use tracing::{debug, info, trace, warn};

/// Gapless playback controller
///
/// Derived states:
/// - Idle: no current track
/// - Playing: current track, not paused
/// - Paused: current track, paused
pub struct PlaybackController {
    // State
    volume: u8,
    is_paused: bool,
    position: f64,
    repeat_mode: RepeatMode,
    current_track: Option<Track>,

    // Queue and slots
    queue: TrackQueue,
    slots: SlotManager,
    shuffle: Box<dyn ShuffleStrategy>,

    // Sink events
    events: Receiver<SinkEvent>,

    observers: Vec<Box<dyn PlaybackObserver>>,

    /// Seconds after which "previous" restarts instead of going back
    restart_threshold: f64,
}

impl PlaybackController {
    /// Create a controller that obtains sinks from `factory`
    pub fn new(config: ControllerConfig, factory: impl SinkFactory + 'static) -> Self {
        let (tx, rx) = unbounded();
        let volume = config.volume.min(100);

        let mut slots = SlotManager::new(Box::new(factory), tx);
        slots.set_volume(f32::from(volume) / 100.0);
        slots.set_looping(config.repeat_mode == RepeatMode::RepeatOne);

        Self {
            volume,
            is_paused: true,
            position: 0.0,
            repeat_mode: config.repeat_mode,
            current_track: None,
            queue: TrackQueue::with_history_limit(config.history_limit),
            slots,
            shuffle: Box::new(FisherYates),
            events: rx,
            observers: Vec::new(),
            restart_threshold: config.restart_threshold_secs,
        }
    }

    /// Replace the shuffle strategy used by `enable_shuffle`
    #[must_use]
    pub fn with_shuffle_strategy(mut self, strategy: impl ShuffleStrategy + 'static) -> Self {
        self.shuffle = Box::new(strategy);
        self
    }

    /// Register an observer
    pub fn add_observer(&mut self, observer: impl PlaybackObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// Resumes the active sink; with nothing active, starts the next queued
    /// track.
    pub fn play(&mut self) {
        let result = self.try_play();
        self.finish(result);
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if let Some(sink) = self.slots.active_sink() {
            sink.pause();
            self.is_paused = true;
            debug!("paused");
            self.publish();
        }
    }

    pub fn toggle_play(&mut self) {
        if self.is_paused {
            self.play();
        } else {
            self.pause();
        }
    }

    /// Seek in the current track (seconds, clamped to >= 0)
    pub fn seek(&mut self, position: f64) {
        let result = self.try_seek(position);
        self.finish(result);
    }

    /// Skip to the next track
    pub fn next_track(&mut self) {
        let result = self.try_next_track();
        self.finish(result);
    }

    /// Go to the previous track
    ///
    /// Past the restart threshold (3 s by default), or with no history,
    /// restarts the current track instead.
    pub fn previous_track(&mut self) {
        let result = self.try_previous_track();
        self.finish(result);
    }

    /// Replace the queue with `tracks` and start playing at `start_index`
    pub fn play_tracks(&mut self, tracks: Vec<Track>, start_index: usize) {
        let result = self.try_play_tracks(tracks, start_index);
        self.finish(result);
    }

    // ===== Settings =====

    /// Set volume (0-100)
    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
        self.slots.set_volume(f32::from(self.volume) / 100.0);
        self.publish();
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat_mode = mode;
        self.slots.set_looping(mode == RepeatMode::RepeatOne);
        debug!(?mode, "repeat mode changed");
        self.publish();
    }

    /// Shuffle the upcoming tracks
    ///
    /// Calling it again while shuffled reshuffles from the original order.
    pub fn enable_shuffle(&mut self) {
        let snapshot = self.state();
        self.queue.enable_shuffle(self.shuffle.as_ref(), &snapshot);
        self.prebuffer_following();
        debug!("shuffle enabled");
        self.publish();
    }

    /// Restore the original order of the upcoming tracks
    pub fn disable_shuffle(&mut self) {
        self.queue.disable_shuffle();
        self.prebuffer_following();
        debug!("shuffle disabled");
        self.publish();
    }

    // ===== Queue Management =====

    /// Append tracks to the priority queue
    pub fn queue_priority_tracks(&mut self, tracks: Vec<Track>) {
        if self.queue.enqueue_priority(tracks) {
            self.prebuffer_following();
        }
        self.publish();
    }

    pub fn remove_priority_track(&mut self, id: &str) {
        if self.queue.remove_priority(id) {
            self.prebuffer_following();
        }
        self.publish();
    }

    pub fn clear_priority_tracks(&mut self) {
        self.queue.clear_priority();
        self.prebuffer_following();
        self.publish();
    }

    /// Append tracks to the normal forward queue
    pub fn queue_tracks(&mut self, tracks: Vec<Track>) {
        self.queue.append(tracks);
        self.prebuffer_following();
        self.publish();
    }

    // ===== Sink Events =====

    /// Dispatch every pending sink event in arrival order
    ///
    /// Returns the number of events dispatched.
    pub fn process_events(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_sink_event(event);
            count += 1;
        }
        count
    }

    /// Dispatch a single sink event
    ///
    /// Events from a binding that has since been released are ignored.
    pub fn handle_sink_event(&mut self, event: SinkEvent) {
        if !self.slots.is_current(event.slot, event.generation) {
            trace!(
                slot = ?event.slot,
                generation = event.generation,
                "discarding event from released sink"
            );
            return;
        }

        let is_active = self.slots.active_slot() == Some(event.slot);

        match event.kind {
            SinkEventKind::ReadyToPlayThrough => {
                // Queue may have moved since activation; keep the standby aligned
                if is_active {
                    self.prebuffer_following();
                } else {
                    debug!(slot = ?event.slot, "standby ready to play through");
                }
            }
            SinkEventKind::Progress => {
                let position = self.slots.active_sink().map(|sink| sink.current_time());
                if let Some(position) = position.filter(|_| is_active) {
                    self.position = position;
                    self.publish();
                }
            }
            SinkEventKind::Ended => {
                if is_active {
                    let result = self.on_track_ended();
                    self.finish(result);
                }
            }
            SinkEventKind::Error(error) => {
                let track_id = self.slots.track(event.slot).map(|t| t.id.clone());
                self.report(PlaybackError::Sink { track_id, error });
            }
        }
    }

    // ===== State Queries =====

    /// Snapshot of the current state
    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            volume: self.volume,
            is_paused: self.is_paused,
            position: self.position,
            repeat_mode: self.repeat_mode,
            is_shuffled: self.queue.is_shuffled(),
            current_track: self.current_track.clone(),
            priority_tracks: self.queue.priority().to_vec(),
            next_tracks: self.queue.next().to_vec(),
            previous_tracks: self.queue.previous().to_vec(),
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.current_track.is_none()
    }

    pub fn has_next(&self) -> bool {
        !self.queue.is_exhausted()
    }

    pub fn has_previous(&self) -> bool {
        self.queue.has_previous()
    }

    /// Slot currently audible
    pub fn active_slot(&self) -> Option<SlotId> {
        self.slots.active_slot()
    }

    /// Track being pre-buffered in the standby slot
    pub fn standby_track(&self) -> Option<&Track> {
        self.slots.standby_track()
    }

    // ===== Internals =====

    fn try_play(&mut self) -> Result<()> {
        let Some(track_id) = self.current_track.as_ref().map(|t| t.id.clone()) else {
            return self.play_next_track();
        };
        let Some(sink) = self.slots.active_sink() else {
            return self.play_next_track();
        };

        sink::start(sink, &track_id)?;
        self.is_paused = false;
        debug!(track_id = %track_id, "resumed");
        self.publish();
        Ok(())
    }

    fn try_seek(&mut self, position: f64) -> Result<()> {
        let sink = self
            .slots
            .active_sink()
            .ok_or(PlaybackError::NoTrackLoaded)?;

        // max() also maps NaN to 0
        let position = position.max(0.0);
        sink.set_current_time(position);
        self.position = position;
        self.publish();
        Ok(())
    }

    fn try_next_track(&mut self) -> Result<()> {
        if let Some(sink) = self.slots.active_sink() {
            sink.pause();
        }
        self.play_next_track()
    }

    fn try_previous_track(&mut self) -> Result<()> {
        let elapsed = self.slots.active_sink().map(|sink| sink.current_time());
        let restart = !self.queue.has_previous()
            || elapsed.is_some_and(|elapsed| elapsed >= self.restart_threshold);

        if restart {
            if let Some(sink) = self.slots.active_sink() {
                sink.set_current_time(0.0);
                self.position = 0.0;
                debug!("restarted current track");
                self.publish();
            }
            return Ok(());
        }

        let Some(track) = self.queue.pop_previous() else {
            return Ok(());
        };
        if let Some(current) = self.current_track.take() {
            self.queue.push_next_front(current);
        }

        info!(track_id = %track.id, "going back");
        self.start_track(track, true)
    }

    fn try_play_tracks(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        if let Some(sink) = self.slots.active_sink() {
            sink.pause();
        }
        // Dropped, not pushed into the new history
        self.current_track = None;

        info!(count = tracks.len(), start_index, "playing new track list");
        self.queue.set_tracks(tracks, start_index);
        if self.queue.is_shuffled() {
            let snapshot = self.state();
            self.queue.enable_shuffle(self.shuffle.as_ref(), &snapshot);
        }

        self.play_next_track()
    }

    /// Advance to the next queued track and start it
    fn play_next_track(&mut self) -> Result<()> {
        let Some(track) = self.queue.pop_next() else {
            self.enter_idle();
            return Ok(());
        };

        if let Some(previous) = self.current_track.take() {
            if previous.id != track.id {
                self.queue.push_previous(previous);
            }
        }

        info!(track_id = %track.id, "advancing");
        self.start_track(track, false)
    }

    /// Make `track` current in the standby slot and start it
    ///
    /// A refused start leaves the track current but paused; the queue is not
    /// touched again.
    fn start_track(&mut self, track: Track, is_manual_seek: bool) -> Result<()> {
        self.position = 0.0;
        let sink = self.slots.activate_next(&track, is_manual_seek);
        let started = sink::start(sink, &track.id);
        self.is_paused = started.is_err();
        self.current_track = Some(track);
        self.prebuffer_following();

        self.publish();
        started
    }

    fn enter_idle(&mut self) {
        let had_track = self.current_track.take().is_some();
        if !had_track && self.slots.active_slot().is_none() {
            return;
        }

        self.slots.release_all();
        self.position = 0.0;
        self.is_paused = true;
        info!("queue exhausted");
        self.publish();
        for observer in &mut self.observers {
            observer.on_queue_exhausted();
        }
    }

    fn on_track_ended(&mut self) -> Result<()> {
        match self.repeat_mode {
            RepeatMode::None => self.play_next_track(),
            RepeatMode::RepeatOne => {
                // Sink should have looped natively; replay once and demote
                self.repeat_mode = RepeatMode::None;
                self.slots.set_looping(false);
                let Some(track_id) = self.current_track.as_ref().map(|t| t.id.clone()) else {
                    return Ok(());
                };
                let Some(sink) = self.slots.active_sink() else {
                    return Ok(());
                };
                sink.set_current_time(0.0);
                let started = sink::start(sink, &track_id);
                self.position = 0.0;
                self.is_paused = started.is_err();
                self.publish();
                started
            }
            RepeatMode::RepeatAll => {
                trace!("track ended under repeat-all; left to the sink");
                Ok(())
            }
        }
    }

    /// Pre-buffer the track that would play after the current one
    ///
    /// Idempotent, so it is safe to call after every queue change.
    fn prebuffer_following(&mut self) {
        if self.slots.active_slot().is_none() {
            return;
        }
        match self.queue.peek_next().cloned() {
            Some(track) => self.slots.preload_standby(&track),
            None => self.slots.release_standby(),
        }
    }

    fn publish(&mut self) {
        let snapshot = self.state();
        for observer in &mut self.observers {
            observer.on_state_changed(&snapshot);
        }
    }

    fn report(&mut self, error: PlaybackError) {
        warn!(%error, "playback error");
        for observer in &mut self.observers {
            observer.on_error(&error);
        }
    }

    fn finish(&mut self, result: Result<()>) {
        if let Err(error) = result {
            self.report(error);
        }
    }
}

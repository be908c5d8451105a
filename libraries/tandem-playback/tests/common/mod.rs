//! Shared fake audio backend for integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use tandem_playback::{
    AudioSink, ControllerConfig, EventLog, LoadIntent, PlaybackController, SinkError,
    SinkEventSender, SlotId, Track,
};

/// Everything a fake sink was told, shared with the test
#[derive(Debug, Default)]
pub struct SinkRecord {
    pub slot: Option<SlotId>,
    pub url: String,
    pub intent: Option<LoadIntent>,
    pub loads: usize,
    pub playing: bool,
    pub plays: usize,
    pub time: f64,
    pub volume: f32,
    pub looping: bool,
    pub attached: bool,
    pub detaches: usize,
    pub dropped: bool,

    /// Sender kept even after detach, to simulate late backend events
    pub sender: Option<SinkEventSender>,

    /// Next `play()` fails with this message
    pub fail_play: Option<String>,
}

pub type SharedRecord = Rc<RefCell<SinkRecord>>;

pub struct FakeSink {
    record: SharedRecord,
    events: Option<SinkEventSender>,
}

impl AudioSink for FakeSink {
    fn attach(&mut self, events: SinkEventSender) {
        let mut record = self.record.borrow_mut();
        record.slot = Some(events.slot());
        record.attached = true;
        record.sender = Some(events.clone());
        self.events = Some(events);
    }

    fn detach(&mut self) {
        self.events = None;
        let mut record = self.record.borrow_mut();
        record.attached = false;
        record.detaches += 1;
    }

    fn load(&mut self, url: &str, intent: LoadIntent) {
        let mut record = self.record.borrow_mut();
        record.url = url.to_string();
        record.intent = Some(intent);
        record.loads += 1;
        record.time = 0.0;
    }

    fn play(&mut self) -> Result<(), SinkError> {
        let mut record = self.record.borrow_mut();
        if let Some(message) = record.fail_play.take() {
            return Err(SinkError::new(message).with_event("play"));
        }
        record.playing = true;
        record.plays += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.record.borrow_mut().playing = false;
    }

    fn current_time(&self) -> f64 {
        self.record.borrow().time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.record.borrow_mut().time = seconds;
    }

    fn set_volume(&mut self, volume: f32) {
        self.record.borrow_mut().volume = volume;
    }

    fn set_loop(&mut self, looping: bool) {
        self.record.borrow_mut().looping = looping;
    }
}

impl Drop for FakeSink {
    fn drop(&mut self) {
        self.record.borrow_mut().dropped = true;
    }
}

/// Creates fake sinks and remembers every one it made
#[derive(Clone, Default)]
pub struct FakeBackend {
    sinks: Rc<RefCell<Vec<SharedRecord>>>,

    /// Applied to the next sink created
    fail_next_play: Rc<RefCell<Option<String>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn factory(&self) -> impl FnMut(SlotId) -> Box<dyn AudioSink> {
        let sinks = Rc::clone(&self.sinks);
        let fail_next_play = Rc::clone(&self.fail_next_play);
        move |_slot| {
            let record = Rc::new(RefCell::new(SinkRecord {
                fail_play: fail_next_play.borrow_mut().take(),
                ..SinkRecord::default()
            }));
            sinks.borrow_mut().push(Rc::clone(&record));
            Box::new(FakeSink {
                record,
                events: None,
            }) as Box<dyn AudioSink>
        }
    }

    /// Make the next created sink refuse its first `play()`
    pub fn fail_next_play(&self, message: &str) {
        *self.fail_next_play.borrow_mut() = Some(message.to_string());
    }

    pub fn created(&self) -> usize {
        self.sinks.borrow().len()
    }

    pub fn sink(&self, index: usize) -> SharedRecord {
        Rc::clone(&self.sinks.borrow()[index])
    }

    /// Live (attached) sink sourcing the track with this id
    pub fn live_sink_for(&self, id: &str) -> Option<SharedRecord> {
        self.sinks
            .borrow()
            .iter()
            .find(|r| r.borrow().attached && r.borrow().url == url_for(id))
            .cloned()
    }

    /// Live sink sourcing `id`; panics if there is none
    pub fn expect_sink(&self, id: &str) -> SharedRecord {
        self.live_sink_for(id)
            .unwrap_or_else(|| panic!("no live sink for track {}", id))
    }
}

pub fn url_for(id: &str) -> String {
    format!("/music/{}.mp3", id)
}

pub fn track(id: &str) -> Track {
    Track::new(id, url_for(id))
}

pub fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| track(id)).collect()
}

pub fn ids(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|t| t.id.clone()).collect()
}

pub fn current_id(controller: &PlaybackController) -> Option<String> {
    controller.current_track().map(|t| t.id.clone())
}

/// Report ready-to-play-through from a sink, via its (possibly stale) sender
pub fn emit_ready(record: &SharedRecord) {
    sender(record).ready_to_play_through();
}

pub fn emit_progress(record: &SharedRecord, time: f64) {
    record.borrow_mut().time = time;
    sender(record).progress();
}

pub fn emit_ended(record: &SharedRecord) {
    sender(record).ended();
}

pub fn emit_error(record: &SharedRecord, error: SinkError) {
    sender(record).error(error);
}

fn sender(record: &SharedRecord) -> SinkEventSender {
    record
        .borrow()
        .sender
        .clone()
        .expect("sink was never attached")
}

/// Controller over a fresh fake backend with an event log attached
pub fn setup(config: ControllerConfig) -> (PlaybackController, FakeBackend, EventLog) {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("tandem_playback=debug")
        .try_init();

    let backend = FakeBackend::new();
    let mut controller = PlaybackController::new(config, backend.factory());
    let log = EventLog::new();
    controller.add_observer(log.clone());
    (controller, backend, log)
}

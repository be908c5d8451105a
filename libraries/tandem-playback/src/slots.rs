//! Dual-slot sink ownership
//!
//! Two named slots hold at most one sink binding each. One slot is active
//! (audible); the other is standby and may be pre-buffering the next track so
//! the swap at track end costs no load latency.
//!
//! A binding owns its sink for exactly one source. Dropping the binding is the
//! only way to release a sink, and it always detaches the sink's callbacks
//! first, so no release path can leave a live callback behind.

use crate::sink::{AudioSink, LoadIntent, SinkEvent, SinkEventSender, SinkFactory};
use crate::types::{SlotId, Track};
use crossbeam_channel::Sender;
use tracing::{debug, trace};

/// A sink bound to one track for the lifetime of this value
struct SlotBinding {
    slot: SlotId,
    generation: u64,
    track: Track,
    sink: Box<dyn AudioSink>,
}

impl Drop for SlotBinding {
    fn drop(&mut self) {
        self.sink.detach();
        debug!(
            slot = ?self.slot,
            generation = self.generation,
            track_id = %self.track.id,
            "released sink"
        );
    }
}

/// Owns the two playback slots
pub struct SlotManager {
    factory: Box<dyn SinkFactory>,
    events: Sender<SinkEvent>,

    slot_a: Option<SlotBinding>,
    slot_b: Option<SlotBinding>,

    /// Slot selected as audible; `None` until the first activation
    active: Option<SlotId>,

    next_generation: u64,

    /// Native volume applied to every sink (0.0-1.0)
    volume: f32,

    /// Native loop flag for the active sink
    looping: bool,
}

impl SlotManager {
    pub fn new(factory: Box<dyn SinkFactory>, events: Sender<SinkEvent>) -> Self {
        Self {
            factory,
            events,
            slot_a: None,
            slot_b: None,
            active: None,
            next_generation: 0,
            volume: 1.0,
            looping: false,
        }
    }

    // ===== Queries =====

    /// Active slot, if it holds a sink
    pub fn active_slot(&self) -> Option<SlotId> {
        self.active.filter(|slot| self.binding(*slot).is_some())
    }

    /// Sink currently deemed audible
    pub fn active_sink(&mut self) -> Option<&mut dyn AudioSink> {
        let slot = self.active?;
        match self.binding_mut(slot) {
            Some(binding) => Some(binding.sink.as_mut()),
            None => None,
        }
    }

    #[cfg(test)]
    fn active_track(&self) -> Option<&Track> {
        self.active.and_then(|slot| self.track(slot))
    }

    /// Slot the next activation will target
    pub fn standby_slot(&self) -> SlotId {
        self.active.map_or(SlotId::A, SlotId::other)
    }

    #[cfg(test)]
    fn has_standby(&self) -> bool {
        self.binding(self.standby_slot()).is_some()
    }

    /// Track the standby sink is sourcing
    pub fn standby_track(&self) -> Option<&Track> {
        self.track(self.standby_slot())
    }

    /// Track bound to a slot
    pub fn track(&self, slot: SlotId) -> Option<&Track> {
        self.binding(slot).map(|b| &b.track)
    }

    /// Whether an event stamped with `generation` comes from the live binding
    pub fn is_current(&self, slot: SlotId, generation: u64) -> bool {
        self.binding(slot)
            .is_some_and(|b| b.generation == generation)
    }

    // ===== Transitions =====

    /// Make the standby slot audible with `track`
    ///
    /// Reuses the standby sink when it is already pre-buffering `track`;
    /// otherwise tears it down and binds a fresh sink. The outgoing sink is
    /// paused. Unless `is_manual_seek` is set, the outgoing sink is released
    /// too, since anything it buffered is now stale.
    pub fn activate_next(&mut self, track: &Track, is_manual_seek: bool) -> &mut dyn AudioSink {
        let outgoing = self.active;
        let target = self.standby_slot();

        if let Some(binding) = outgoing.and_then(|slot| self.binding_mut(slot)) {
            binding.sink.pause();
        }

        let binding = match self.entry(target).take() {
            Some(existing) if existing.track.id == track.id => {
                debug!(slot = ?target, track_id = %track.id, "promoting pre-buffered sink");
                existing
            }
            stale => {
                drop(stale);
                self.bind(target, track, LoadIntent::Playback)
            }
        };

        self.active = Some(target);

        if !is_manual_seek {
            self.release(target.other());
        }

        let looping = self.looping;
        let binding = self.entry(target).insert(binding);
        binding.sink.set_loop(looping);
        binding.sink.set_current_time(0.0);
        binding.sink.as_mut()
    }

    /// Pre-buffer `track` in the standby slot
    ///
    /// Idempotent: if the standby sink is already sourcing `track` its load is
    /// left alone, even if it has not reported ready yet.
    pub fn preload_standby(&mut self, track: &Track) {
        let slot = self.standby_slot();

        if self
            .binding(slot)
            .is_some_and(|b| b.track.id == track.id)
        {
            trace!(slot = ?slot, track_id = %track.id, "standby already pre-buffering");
            return;
        }

        self.release(slot);
        let binding = self.bind(slot, track, LoadIntent::Prebuffer);
        *self.entry(slot) = Some(binding);
        debug!(slot = ?slot, track_id = %track.id, "pre-buffering standby");
    }

    pub fn release_standby(&mut self) {
        self.release(self.standby_slot());
    }

    /// Tear down both slots
    pub fn release_all(&mut self) {
        self.release(SlotId::A);
        self.release(SlotId::B);
    }

    // ===== Settings =====

    /// Apply native volume (0.0-1.0) to every live sink and to future ones
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        for binding in [self.slot_a.as_mut(), self.slot_b.as_mut()]
            .into_iter()
            .flatten()
        {
            binding.sink.set_volume(self.volume);
        }
    }

    /// Native loop flag for the active sink (and future activations)
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        if let Some(sink) = self.active_sink() {
            sink.set_loop(looping);
        }
    }

    // ===== Internals =====

    fn bind(&mut self, slot: SlotId, track: &Track, intent: LoadIntent) -> SlotBinding {
        self.next_generation += 1;
        let generation = self.next_generation;

        let mut sink = self.factory.create(slot);
        sink.attach(SinkEventSender::new(self.events.clone(), slot, generation));
        sink.set_volume(self.volume);
        sink.set_loop(false);
        sink.load(&track.url, intent);

        debug!(
            slot = ?slot,
            generation,
            track_id = %track.id,
            ?intent,
            "bound sink"
        );

        SlotBinding {
            slot,
            generation,
            track: track.clone(),
            sink,
        }
    }

    /// Drop the slot's binding, detaching its callbacks
    fn release(&mut self, slot: SlotId) {
        drop(self.entry(slot).take());
    }

    fn entry(&mut self, slot: SlotId) -> &mut Option<SlotBinding> {
        match slot {
            SlotId::A => &mut self.slot_a,
            SlotId::B => &mut self.slot_b,
        }
    }

    fn binding(&self, slot: SlotId) -> Option<&SlotBinding> {
        match slot {
            SlotId::A => self.slot_a.as_ref(),
            SlotId::B => self.slot_b.as_ref(),
        }
    }

    fn binding_mut(&mut self, slot: SlotId) -> Option<&mut SlotBinding> {
        self.entry(slot).as_mut()
    }
}

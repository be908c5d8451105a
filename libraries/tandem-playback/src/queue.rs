//! Three-list track queue
//!
//! Structure:
//! ```text
//! Previous (history, most recent first):
//!   - Track B
//!   - Track A
//! ─────────────────────────────
//! Currently Playing: Track C            (held by the controller)
//! ─────────────────────────────
//! Priority (user queued, shuffle-immune):
//!   - Track X
//! ─────────────────────────────
//! Next (normal forward queue, shuffled view when shuffle is on):
//!   - Track D
//!   - Track E
//! ```
//!
//! While shuffle is off the shadow list mirrors `next`. While it is on the
//! shadow keeps the original order untouched so it can be restored.

use crate::shuffle::ShuffleStrategy;
use crate::types::{PlaybackState, Track};
use std::collections::HashSet;

/// Priority / next / previous bookkeeping
#[derive(Debug, Clone, Default)]
pub struct TrackQueue {
    /// Shuffle-immune tracks that play first
    priority: Vec<Track>,

    /// Normal forward queue
    next: Vec<Track>,

    /// History, front = most recent
    previous: Vec<Track>,

    /// `next` in original order
    non_shuffled_next: Vec<Track>,

    is_shuffled: bool,

    /// Maximum history entries (None = unbounded)
    history_limit: Option<usize>,
}

impl TrackQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty queue whose history keeps at most `limit` entries
    pub fn with_history_limit(limit: Option<usize>) -> Self {
        Self {
            history_limit: limit,
            ..Self::default()
        }
    }

    // ===== Priority =====

    /// Append tracks to the priority list
    ///
    /// Returns true if the priority list was empty beforehand, i.e. the first
    /// appended track is now the next candidate to play.
    pub fn enqueue_priority(&mut self, tracks: impl IntoIterator<Item = Track>) -> bool {
        let was_empty = self.priority.is_empty();
        self.priority.extend(tracks);
        was_empty && !self.priority.is_empty()
    }

    /// Remove every priority track with the given id
    ///
    /// Returns true if anything was removed
    pub fn remove_priority(&mut self, id: &str) -> bool {
        let before = self.priority.len();
        self.priority.retain(|t| t.id != id);
        self.priority.len() != before
    }

    pub fn clear_priority(&mut self) {
        self.priority.clear();
    }

    // ===== Forward navigation =====

    /// Take the next track to play
    ///
    /// Priority first, then the normal queue.
    pub fn pop_next(&mut self) -> Option<Track> {
        if !self.priority.is_empty() {
            return Some(self.priority.remove(0));
        }

        if self.next.is_empty() {
            return None;
        }

        let track = self.next.remove(0);
        if !self.is_shuffled {
            self.non_shuffled_next.clone_from(&self.next);
        }
        Some(track)
    }

    /// Track `pop_next` would return, without removing it
    pub fn peek_next(&self) -> Option<&Track> {
        self.priority.first().or_else(|| self.next.first())
    }

    /// Put a track back at the head of the normal queue
    pub fn push_next_front(&mut self, track: Track) {
        self.next.insert(0, track);
        if !self.is_shuffled {
            self.non_shuffled_next.clone_from(&self.next);
        }
    }

    /// Append tracks to the normal queue
    ///
    /// While shuffled the tracks are appended to both the shuffled view and
    /// the shadow list, so they survive a later `disable_shuffle`.
    pub fn append(&mut self, tracks: impl IntoIterator<Item = Track>) {
        let tracks: Vec<Track> = tracks.into_iter().collect();
        self.next.extend(tracks.iter().cloned());
        if self.is_shuffled {
            self.non_shuffled_next.extend(tracks);
        } else {
            self.non_shuffled_next.clone_from(&self.next);
        }
    }

    // ===== History =====

    /// Record a track as the most recently played
    pub fn push_previous(&mut self, track: Track) {
        self.previous.insert(0, track);
        if let Some(limit) = self.history_limit {
            self.previous.truncate(limit);
        }
    }

    /// Take the most recently played track
    pub fn pop_previous(&mut self) -> Option<Track> {
        if self.previous.is_empty() {
            None
        } else {
            Some(self.previous.remove(0))
        }
    }

    // ===== Reset =====

    /// Replace the whole queue
    ///
    /// Tracks before `start_index` become history in their original order;
    /// tracks from `start_index` on become the normal queue. An index of 0 or
    /// past the end starts from the beginning with empty history. Shuffle
    /// stays enabled if it was, but the caller must reshuffle the new list.
    pub fn set_tracks(&mut self, tracks: Vec<Track>, start_index: usize) {
        self.priority.clear();
        self.previous.clear();

        let mut tracks = tracks;
        if start_index > 0 && start_index < tracks.len() {
            self.next = tracks.split_off(start_index);
            self.previous = tracks;
            if let Some(limit) = self.history_limit {
                self.previous.truncate(limit);
            }
        } else {
            self.next = tracks;
        }

        self.non_shuffled_next.clone_from(&self.next);
    }

    // ===== Shuffle =====

    /// Shuffle the normal queue
    ///
    /// Always shuffles from the original order, so re-enabling while already
    /// shuffled produces a fresh ordering of the shadow list rather than a
    /// shuffle of a shuffle.
    pub fn enable_shuffle(&mut self, strategy: &dyn ShuffleStrategy, state: &PlaybackState) {
        if !self.is_shuffled {
            self.non_shuffled_next.clone_from(&self.next);
        }

        let upcoming = self.upcoming_in_original_order();
        self.next = strategy.shuffle(&upcoming, state);
        self.is_shuffled = true;
    }

    /// Restore the original order of the normal queue
    pub fn disable_shuffle(&mut self) {
        if !self.is_shuffled {
            return;
        }

        self.next = self.upcoming_in_original_order();
        self.non_shuffled_next.clone_from(&self.next);
        self.is_shuffled = false;
    }

    /// Tracks still in `next`, ordered as in the shadow list
    ///
    /// Tracks consumed while shuffled are skipped; tracks in `next` the shadow
    /// never held (reinserted by previous-track navigation) lead.
    fn upcoming_in_original_order(&self) -> Vec<Track> {
        let upcoming: HashSet<&str> = self.next.iter().map(|t| t.id.as_str()).collect();
        let known: HashSet<&str> = self
            .non_shuffled_next
            .iter()
            .map(|t| t.id.as_str())
            .collect();

        self.next
            .iter()
            .filter(|t| !known.contains(t.id.as_str()))
            .chain(
                self.non_shuffled_next
                    .iter()
                    .filter(|t| upcoming.contains(t.id.as_str())),
            )
            .cloned()
            .collect()
    }

    // ===== Queries =====

    pub fn priority(&self) -> &[Track] {
        &self.priority
    }

    pub fn next(&self) -> &[Track] {
        &self.next
    }

    pub fn previous(&self) -> &[Track] {
        &self.previous
    }

    pub fn non_shuffled_next(&self) -> &[Track] {
        &self.non_shuffled_next
    }

    pub fn is_shuffled(&self) -> bool {
        self.is_shuffled
    }

    /// Nothing left to play forward
    pub fn is_exhausted(&self) -> bool {
        self.priority.is_empty() && self.next.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        !self.previous.is_empty()
    }
}

//! Shuffle strategies for the upcoming-tracks list
//!
//! A strategy receives the original-order list and a read-only snapshot of the
//! playback state, and returns a new ordering. It never mutates its input.

use crate::types::{PlaybackState, Track};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, SeedableRng};
use std::cell::RefCell;

/// Produces a reordering of the upcoming tracks
pub trait ShuffleStrategy {
    fn shuffle(&self, tracks: &[Track], state: &PlaybackState) -> Vec<Track>;
}

impl<F> ShuffleStrategy for F
where
    F: Fn(&[Track], &PlaybackState) -> Vec<Track>,
{
    fn shuffle(&self, tracks: &[Track], state: &PlaybackState) -> Vec<Track> {
        self(tracks, state)
    }
}

/// Pure random shuffle using Fisher-Yates algorithm
///
/// Each track has equal probability of appearing at any position.
#[derive(Debug, Clone, Copy, Default)]
pub struct FisherYates;

impl ShuffleStrategy for FisherYates {
    fn shuffle(&self, tracks: &[Track], _state: &PlaybackState) -> Vec<Track> {
        let mut shuffled = tracks.to_vec();
        shuffled.shuffle(&mut thread_rng());
        shuffled
    }
}

/// Deterministic Fisher-Yates driven by a seeded RNG
///
/// The RNG advances on every call, so consecutive shuffles differ while a
/// given seed always yields the same sequence of orderings.
#[derive(Debug)]
pub struct SeededShuffle {
    rng: RefCell<StdRng>,
}

impl SeededShuffle {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ShuffleStrategy for SeededShuffle {
    fn shuffle(&self, tracks: &[Track], _state: &PlaybackState) -> Vec<Track> {
        let mut shuffled = tracks.to_vec();
        shuffled.shuffle(&mut *self.rng.borrow_mut());
        shuffled
    }
}

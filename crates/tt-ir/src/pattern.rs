//! Patterns: groups of tracks rendered over the same time window.

use alloc::vec::Vec;

use crate::track::Track;

/// Tracks rendered in parallel, in declaration order.
#[derive(Debug, Default)]
pub struct Pattern {
    pub tracks: Vec<Track>,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Realized length: the longest track wins. Empty patterns have none.
    pub fn frames(&self, sample_rate: u32) -> usize {
        self.tracks
            .iter()
            .map(|t| t.frames(sample_rate))
            .max()
            .unwrap_or(0)
    }
}

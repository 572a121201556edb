//! Song structure.

use alloc::vec::Vec;

use crate::audio_traits::RenderFormat;
use crate::pattern::Pattern;

/// A complete song: patterns played back to back.
#[derive(Debug, Default)]
pub struct Song {
    /// Output sample rate and channel count
    pub format: RenderFormat,
    /// Patterns in playback order
    pub patterns: Vec<Pattern>,
}

impl Song {
    /// Create an empty song with the given output format.
    pub fn new(format: RenderFormat) -> Self {
        Self {
            format,
            patterns: Vec::new(),
        }
    }

    pub fn push(&mut self, pattern: Pattern) {
        self.patterns.push(pattern);
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Total number of tracks across all patterns.
    pub fn track_count(&self) -> usize {
        self.patterns.iter().map(Pattern::len).sum()
    }

    /// Frame span of the whole song: the sum of realized pattern lengths.
    pub fn total_frames(&self) -> usize {
        self.patterns
            .iter()
            .map(|p| p.frames(self.format.sample_rate))
            .fold(0, usize::saturating_add)
    }

    /// Interleaved sample count of the song's frame span.
    pub fn total_samples(&self) -> usize {
        self.total_frames()
            .saturating_mul(self.format.channels as usize)
    }
}

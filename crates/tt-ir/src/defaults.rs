//! Global defaults threaded through song building.

use crate::timing::Timing;

pub const DEFAULT_BPM: f64 = 120.0;
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;
pub const DEFAULT_STEPS: u32 = 16;
pub const DEFAULT_STEP: f64 = 0.25;
pub const DEFAULT_CHANNELS: u16 = 2;

/// Settings changed by `bpm`, `sr`, `steps` and `step` directives.
///
/// Tracks copy the timing part when their processor is bound, so changing
/// a default never affects a track that already exists.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Defaults {
    /// Tempo in beats per minute
    pub bpm: f64,
    /// Song-wide sample rate in Hz
    pub sample_rate: u32,
    /// Steps per track
    pub steps: u32,
    /// Step length in beats
    pub step: f64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            sample_rate: DEFAULT_SAMPLE_RATE,
            steps: DEFAULT_STEPS,
            step: DEFAULT_STEP,
        }
    }
}

impl Defaults {
    /// Snapshot the tempo and step grid for a newly bound track.
    pub fn timing(&self) -> Timing {
        Timing::new(self.bpm, self.step, self.steps)
    }
}

//! Beat-based timing for tracks.
//!
//! `Timing` is the tempo and step grid a track captured when its processor
//! was bound. Every sample count is derived from it plus the song-wide
//! sample rate.

/// Tempo and step grid of a single track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    /// Tempo in beats per minute
    pub bpm: f64,
    /// Length of one step, in beats
    pub step: f64,
    /// Number of steps in the track
    pub steps: u32,
}

impl Timing {
    pub const fn new(bpm: f64, step: f64, steps: u32) -> Self {
        Self { bpm, step, steps }
    }

    pub fn beats_per_second(&self) -> f64 {
        self.bpm / 60.0
    }

    pub fn samples_per_beat(&self, sample_rate: u32) -> f64 {
        sample_rate as f64 / self.beats_per_second()
    }

    /// Whole samples per step.
    ///
    /// This is the only place a fractional sample count is truncated, so the
    /// rounding error is bounded by one sample per step. Non-finite or
    /// negative results count as zero.
    pub fn samples_per_step(&self, sample_rate: u32) -> usize {
        let exact = libm::floor(self.samples_per_beat(sample_rate) * self.step);
        if exact.is_finite() && exact > 0.0 {
            exact as usize
        } else {
            0
        }
    }

    /// Total frames covered by the track's step grid.
    pub fn frames(&self, sample_rate: u32) -> usize {
        self.samples_per_step(sample_rate)
            .saturating_mul(self.steps as usize)
    }

    /// Frame offset at which `step` begins.
    pub fn step_start(&self, step: u32, sample_rate: u32) -> usize {
        self.samples_per_step(sample_rate)
            .saturating_mul(step as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_frames() {
        // 120 bpm at 48 kHz: 24000 samples/beat, quarter-beat steps
        let t = Timing::new(120.0, 0.25, 16);
        assert_eq!(t.beats_per_second(), 2.0);
        assert_eq!(t.samples_per_beat(48_000), 24_000.0);
        assert_eq!(t.samples_per_step(48_000), 6_000);
        assert_eq!(t.frames(48_000), 96_000);
    }

    #[test]
    fn truncates_per_step_not_per_beat() {
        // 20353.84 samples/beat; a third of that is 6784.61
        let t = Timing::new(130.0, 1.0 / 3.0, 3);
        assert_eq!(t.samples_per_step(44_100), 6_784);
        assert_eq!(t.frames(44_100), 6_784 * 3);
        assert!(t.frames(44_100) < libm::floor(t.samples_per_beat(44_100)) as usize);
    }

    #[test]
    fn non_integral_tempo() {
        let t = Timing::new(140.0, 0.25, 16);
        assert_eq!(t.samples_per_step(48_000), 5_142);
        assert_eq!(t.frames(48_000), 82_272);
    }

    #[test]
    fn zero_steps_is_zero_frames() {
        let t = Timing::new(120.0, 0.25, 0);
        assert_eq!(t.frames(48_000), 0);
    }

    #[test]
    fn degenerate_tempo_yields_zero() {
        assert_eq!(Timing::new(0.0, 0.25, 16).frames(48_000), 0);
        assert_eq!(Timing::new(-120.0, 0.25, 16).frames(48_000), 0);
        assert_eq!(Timing::new(120.0, f64::NAN, 16).frames(48_000), 0);
    }

    #[test]
    fn step_start_matches_grid() {
        let t = Timing::new(120.0, 0.5, 8);
        assert_eq!(t.step_start(0, 8), 0);
        assert_eq!(t.step_start(3, 8), 6);
        assert_eq!(t.step_start(8, 8), t.frames(8));
    }

    #[test]
    fn frames_formula_holds_across_grid() {
        for &bpm in &[60.0, 90.0, 120.0, 133.0, 174.0] {
            for &sr in &[8_000u32, 22_050, 44_100, 48_000] {
                for &step in &[0.125, 0.25, 1.0 / 3.0, 0.5, 1.0] {
                    let t = Timing::new(bpm, step, 7);
                    let expected = libm::floor(sr as f64 / (bpm / 60.0) * step) as usize * 7;
                    assert_eq!(t.frames(sr), expected, "bpm={} sr={} step={}", bpm, sr, step);
                }
            }
        }
    }
}

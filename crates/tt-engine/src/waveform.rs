//! Oscillator waveforms.

use core::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
    Noise,
}

impl Waveform {
    /// Look up a waveform by its argument name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sine" => Waveform::Sine,
            "square" => Waveform::Square,
            "saw" | "sawtooth" => Waveform::Saw,
            "triangle" => Waveform::Triangle,
            "noise" => Waveform::Noise,
            _ => return None,
        })
    }

    /// Sample the waveform at `phase` in [0, 1). Noise ignores the phase
    /// and draws from `rng`.
    pub fn sample(self, phase: f32, rng: &mut fastrand::Rng) -> f32 {
        match self {
            Waveform::Sine => libm::sinf(phase * TAU),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => phase * 2.0 - 1.0,
            Waveform::Triangle => {
                if phase < 0.5 {
                    phase * 4.0 - 1.0
                } else {
                    3.0 - phase * 4.0
                }
            }
            Waveform::Noise => rng.f32() * 2.0 - 1.0,
        }
    }
}

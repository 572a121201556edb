//! Basic oscillator synth.
//!
//! Data lines:
//! - `n`: one token per step. A note name starts a note, `.` holds the
//!   previous state, `-` releases.
//! - `v`: one volume digit (`0`-`9`) per step, `.` keeps the previous one.
//! - `a` / `r`: attack and release time in seconds.
//!
//! Notes still sounding at the last step release past the end of the track.

use alloc::boxed::Box;
use alloc::vec::Vec;
use tracing::warn;

use tt_ir::{Processor, ProcessorError, RenderFormat, SampleBuffer, Timing, TrackData};

use crate::frequency::{note_to_frequency, parse_note};
use crate::waveform::Waveform;

const DEFAULT_VOLUME: u8 = 7;
const DEFAULT_ATTACK: f32 = 0.005;
const DEFAULT_RELEASE: f32 = 0.05;
/// Longest accepted attack or release
const MAX_ENVELOPE_SECONDS: f32 = 10.0;
const NOISE_SEED: u64 = 0x7e47_7e4b;

pub fn factory(args: &str) -> Result<Box<dyn Processor>, ProcessorError> {
    Ok(Box::new(BasicSynth::from_args(args)?))
}

/// A note resolved onto the frame grid.
#[derive(Clone, Copy, Debug, PartialEq)]
struct NoteSpan {
    start: usize,
    /// Frame at which the gate closes and the release begins
    end: usize,
    frequency: f64,
    amplitude: f32,
}

pub struct BasicSynth {
    waveform: Waveform,
    rng: fastrand::Rng,
}

impl BasicSynth {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            rng: fastrand::Rng::with_seed(NOISE_SEED),
        }
    }

    pub fn from_args(args: &str) -> Result<Self, ProcessorError> {
        let name = args.trim();
        if name.is_empty() {
            return Ok(Self::new(Waveform::Sine));
        }
        Waveform::from_name(name)
            .map(Self::new)
            .ok_or_else(|| ProcessorError::invalid(name, "unknown waveform"))
    }

    fn render_note(
        &mut self,
        note: NoteSpan,
        attack: usize,
        release: usize,
        format: RenderFormat,
        buffer: &mut SampleBuffer,
    ) {
        let increment = (note.frequency / format.sample_rate as f64) as f32;
        let held = note.end - note.start;
        let mut phase = 0.0f32;

        for i in 0..held.saturating_add(release) {
            let mut env = if attack > 0 && i < attack {
                i as f32 / attack as f32
            } else {
                1.0
            };
            if i >= held {
                env *= 1.0 - (i - held) as f32 / release as f32;
            }

            let value = self.waveform.sample(phase, &mut self.rng) * note.amplitude * env;
            buffer.add_frame(note.start.saturating_add(i), format.channels, value);

            phase += increment;
            phase -= libm::floorf(phase);
        }
    }
}

impl Processor for BasicSynth {
    fn process(&mut self, track: &TrackData, format: RenderFormat, buffer: &mut SampleBuffer) {
        let Some(line) = track.lines.get('n') else {
            return;
        };
        let sample_rate = format.sample_rate;
        let attack = seconds_to_frames(track.lines.get('a'), DEFAULT_ATTACK, sample_rate);
        let release = seconds_to_frames(track.lines.get('r'), DEFAULT_RELEASE, sample_rate);

        let volumes = step_volumes(track.lines.get('v'), track.timing.steps as usize);
        let notes = note_spans(line, &volumes, track.timing, sample_rate);

        // Reseed so that rendering the same track twice is reproducible.
        self.rng.seed(NOISE_SEED);
        for note in notes {
            self.render_note(note, attack, release, format, buffer);
        }
    }
}

/// Resolve the `n` line into note spans on the frame grid.
fn note_spans(line: &str, volumes: &[u8], timing: Timing, sample_rate: u32) -> Vec<NoteSpan> {
    let mut spans = Vec::new();
    let mut open: Option<NoteSpan> = None;

    for (step, token) in line.split_whitespace().take(volumes.len()).enumerate() {
        let frame = timing.step_start(step as u32, sample_rate);
        match token {
            "." => continue,
            "-" => {}
            _ if parse_note(token).is_none() => {
                warn!(token, step, "unrecognized note, treating as release");
            }
            _ => {}
        }

        if let Some(mut note) = open.take() {
            note.end = frame;
            spans.push(note);
        }
        if let Some(midi) = parse_note(token) {
            open = Some(NoteSpan {
                start: frame,
                end: frame,
                frequency: note_to_frequency(midi),
                amplitude: volumes[step] as f32 / 9.0,
            });
        }
    }

    if let Some(mut note) = open {
        note.end = timing.step_start(volumes.len() as u32, sample_rate);
        spans.push(note);
    }
    spans.retain(|n| n.end > n.start);
    spans
}

/// Per-step volume digits for `steps` steps.
fn step_volumes(line: Option<&str>, steps: usize) -> Vec<u8> {
    let mut tokens = line.unwrap_or("").split_whitespace();
    let mut current = DEFAULT_VOLUME;
    (0..steps)
        .map(|_| {
            if let Some(token) = tokens.next() {
                match token.parse::<u8>() {
                    Ok(v) if v <= 9 => current = v,
                    _ if token == "." => {}
                    _ => warn!(token, "unrecognized volume, keeping previous"),
                }
            }
            current
        })
        .collect()
}

fn seconds_to_frames(line: Option<&str>, default: f32, sample_rate: u32) -> usize {
    let seconds = match line.map(str::trim) {
        Some(s) => s.parse::<f32>().unwrap_or_else(|_| {
            warn!(value = s, "unrecognized envelope time, using default");
            default
        }),
        None => default,
    };
    let seconds = if seconds > MAX_ENVELOPE_SECONDS {
        warn!(seconds, max = MAX_ENVELOPE_SECONDS, "envelope time too long, clamping");
        MAX_ENVELOPE_SECONDS
    } else {
        seconds
    };
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * sample_rate as f32) as usize
    } else {
        0
    }
}

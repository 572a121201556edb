//! One-pole RC low-pass filter over the pattern buffer.
//!
//! Filters whatever earlier tracks of the pattern rendered, so it is meant
//! to be declared as an accumulate track: `+lowpass:2000`.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::f32::consts::TAU;

use tt_ir::{Processor, ProcessorError, RenderFormat, SampleBuffer, TrackData};

const DEFAULT_CUTOFF: f32 = 4410.0;

pub fn factory(args: &str) -> Result<Box<dyn Processor>, ProcessorError> {
    let args = args.trim();
    let cutoff = if args.is_empty() {
        DEFAULT_CUTOFF
    } else {
        args.parse::<f32>()
            .map_err(|_| ProcessorError::invalid(args, "cutoff must be a number in Hz"))?
    };
    if !(cutoff.is_finite() && cutoff > 0.0) {
        return Err(ProcessorError::invalid(args, "cutoff must be positive"));
    }
    Ok(Box::new(LowPass::new(cutoff)))
}

/// One-pole RC low-pass filter: `y = y_prev + alpha * (x - y_prev)`.
pub struct LowPass {
    cutoff_hz: f32,
    prev: Vec<f32>,
}

impl LowPass {
    pub fn new(cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz,
            prev: Vec::new(),
        }
    }

    fn alpha(&self, sample_rate: u32) -> f32 {
        if sample_rate == 0 {
            return 1.0;
        }
        1.0 - libm::expf(-TAU * self.cutoff_hz / sample_rate as f32)
    }
}

impl Processor for LowPass {
    fn process(&mut self, _track: &TrackData, format: RenderFormat, buffer: &mut SampleBuffer) {
        let channels = format.channels.max(1) as usize;
        let alpha = self.alpha(format.sample_rate);
        self.prev.clear();
        self.prev.resize(channels, 0.0);

        for frame in buffer.as_mut_slice().chunks_mut(channels) {
            for (s, prev) in frame.iter_mut().zip(self.prev.iter_mut()) {
                *prev += alpha * (*s - *prev);
                *s = *prev;
            }
        }
    }
}

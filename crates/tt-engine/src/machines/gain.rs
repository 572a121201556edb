//! Gain: scales everything rendered so far in the pattern.
//!
//! With no argument the factor is 1.0 and the buffer passes through
//! unchanged.

use alloc::boxed::Box;

use tt_ir::{Processor, ProcessorError, RenderFormat, SampleBuffer, TrackData};

pub fn factory(args: &str) -> Result<Box<dyn Processor>, ProcessorError> {
    let args = args.trim();
    if args.is_empty() {
        return Ok(Box::new(Gain(1.0)));
    }
    match args.parse::<f32>() {
        Ok(g) if g.is_finite() => Ok(Box::new(Gain(g))),
        _ => Err(ProcessorError::invalid(args, "gain must be a finite number")),
    }
}

pub struct Gain(pub f32);

impl Processor for Gain {
    fn process(&mut self, _track: &TrackData, _format: RenderFormat, buffer: &mut SampleBuffer) {
        if self.0 != 1.0 {
            buffer.apply_gain(self.0);
        }
    }
}

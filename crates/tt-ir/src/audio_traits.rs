//! Processor trait and render format shared by the builder and the engine.

use alloc::boxed::Box;
use alloc::string::String;

use crate::audio_buffer::SampleBuffer;
use crate::defaults::{DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE};
use crate::track::TrackData;

/// Song-wide output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for RenderFormat {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
        }
    }
}

/// A stateful signal processor bound to one track.
///
/// `process` reads the track's data lines and timing snapshot and adds (or
/// writes) samples into `buffer`, which holds whatever earlier tracks of the
/// same pattern left there. Processors may grow the buffer past the track's
/// frame span, e.g. for a release tail.
pub trait Processor: Send {
    fn process(&mut self, track: &TrackData, format: RenderFormat, buffer: &mut SampleBuffer);
}

/// Builds a processor from the argument string of a processor directive.
pub type ProcessorFactory = fn(&str) -> Result<Box<dyn Processor>, ProcessorError>;

/// A factory rejected its arguments.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProcessorError {
    #[error("invalid argument `{arg}`: {reason}")]
    InvalidArgument { arg: String, reason: String },
}

impl ProcessorError {
    pub fn invalid(arg: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg: arg.into(),
            reason: reason.into(),
        }
    }
}

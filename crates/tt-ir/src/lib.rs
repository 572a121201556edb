//! Core song model for the textrek music compiler.
//!
//! This crate defines the song hierarchy produced by the text parser and
//! consumed by the mixing engine, together with the timing model and the
//! processor interface that connects them.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod audio_buffer;
mod audio_traits;
mod data_lines;
mod defaults;
mod pattern;
pub mod song;
mod timing;
mod track;

pub use audio_buffer::SampleBuffer;
pub use audio_traits::{Processor, ProcessorError, ProcessorFactory, RenderFormat};
pub use data_lines::DataLines;
pub use defaults::{
    Defaults, DEFAULT_BPM, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE, DEFAULT_STEP, DEFAULT_STEPS,
};
pub use pattern::Pattern;
pub use song::Song;
pub use timing::Timing;
pub use track::{Track, TrackData};

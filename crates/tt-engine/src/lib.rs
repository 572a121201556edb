//! Mixing engine for the textrek music compiler.
//!
//! Renders a built `Song` into one interleaved sample buffer and provides
//! the built-in processors that tracks can bind to.

extern crate alloc;

mod frequency;
pub mod machines;
mod mixer;
mod waveform;

pub use frequency::{note_to_frequency, parse_note};
pub use machines::ProcessorRegistry;
pub use mixer::{render_pattern, render_song, Engine};
pub use waveform::Waveform;

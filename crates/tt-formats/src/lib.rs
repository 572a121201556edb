//! Song text and audio container formats for the textrek music compiler.
//!
//! Parses song text into the IR and encodes rendered audio as WAV.

mod builder;
pub mod directive;
mod wav_format;

pub use builder::{compile_reader, compile_str, SongBuilder};
pub use directive::{parse_line, parse_ratio, Directive, Setting};
pub use wav_format::{load_wav, read_wav, samples_to_wav, write_wav, WavSettings};

use tt_ir::ProcessorError;

/// A line that cannot be applied to the song under construction.
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    /// Malformed `bpm`, `sr`, `steps` or `step` value
    #[error("cannot parse {field} value: {value}: {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("unknown processor: {0}")]
    UnknownProcessor(String),
    #[error("reuse without prior processor")]
    ReuseWithoutProcessor,
    #[error("data line without open track")]
    DataWithoutTrack,
    /// The processor factory rejected its arguments
    #[error("cannot create processor {name}: {error}")]
    Instantiate { name: String, error: ProcessorError },
}

/// Error type for compiling song text.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("line {line}: {error}")]
    Line { line: usize, error: DirectiveError },
    #[error("cannot read song text")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    /// 1-based line number of a directive failure.
    pub fn line(&self) -> Option<usize> {
        match self {
            CompileError::Line { line, .. } => Some(*line),
            CompileError::Io(_) => None,
        }
    }
}

/// Error type for WAV encoding and decoding.
#[derive(Debug, thiserror::Error)]
pub enum WavError {
    #[error("unsupported bit depth {0}, expected 8, 16, 24 or 32")]
    UnsupportedBitDepth(u16),
    #[error(transparent)]
    Wav(#[from] hound::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

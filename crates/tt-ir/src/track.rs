//! Tracks: processor-driven lanes within a pattern.

use alloc::boxed::Box;
use arrayvec::ArrayString;
use core::fmt;

use crate::audio_buffer::SampleBuffer;
use crate::audio_traits::{Processor, ProcessorFactory, RenderFormat};
use crate::data_lines::DataLines;
use crate::timing::Timing;

/// What a processor gets to read when it renders.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackData {
    /// Data lines keyed by code
    pub lines: DataLines,
    /// Tempo and step grid captured at bind time
    pub timing: Timing,
}

impl TrackData {
    pub fn new(timing: Timing) -> Self {
        Self {
            lines: DataLines::new(),
            timing,
        }
    }
}

/// One lane of a pattern: a bound processor plus its data.
pub struct Track {
    /// Registry name of the processor
    pub name: ArrayString<32>,
    /// Zero the pattern buffer before rendering this track?
    pub clear: bool,
    /// Data lines and timing snapshot
    pub data: TrackData,
    factory: ProcessorFactory,
    processor: Box<dyn Processor>,
}

impl Track {
    /// Bind a freshly built processor. `timing` is copied, not shared.
    pub fn new(
        name: &str,
        factory: ProcessorFactory,
        processor: Box<dyn Processor>,
        clear: bool,
        timing: Timing,
    ) -> Self {
        Self {
            name: truncated_name(name),
            clear,
            data: TrackData::new(timing),
            factory,
            processor,
        }
    }

    /// The factory this track's processor came from.
    pub fn factory(&self) -> ProcessorFactory {
        self.factory
    }

    pub fn timing(&self) -> Timing {
        self.data.timing
    }

    /// Store a data line, replacing any earlier line with the same code.
    pub fn set_line(&mut self, code: char, value: &str) {
        self.data.lines.insert(code, value);
    }

    /// Frames covered by this track at `sample_rate`.
    pub fn frames(&self, sample_rate: u32) -> usize {
        self.data.timing.frames(sample_rate)
    }

    /// Run the processor over `buffer`.
    pub fn render(&mut self, format: RenderFormat, buffer: &mut SampleBuffer) {
        self.processor.process(&self.data, format, buffer);
    }
}

impl fmt::Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track")
            .field("name", &self.name)
            .field("clear", &self.clear)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

fn truncated_name(name: &str) -> ArrayString<32> {
    let mut out = ArrayString::new();
    for c in name.chars() {
        if out.try_push(c).is_err() {
            break;
        }
    }
    out
}

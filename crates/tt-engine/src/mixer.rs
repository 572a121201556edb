//! Mixing engine: renders patterns and lays them end to end.

use tracing::{debug, trace};
use tt_ir::{Pattern, RenderFormat, SampleBuffer, Song};

/// The song renderer.
pub struct Engine {
    /// Sample rate and channel count shared by every track
    format: RenderFormat,
    /// Pattern scratch buffer, reused across patterns
    scratch: SampleBuffer,
    /// Song-level output
    output: SampleBuffer,
    /// Sample offset at which the next pattern starts
    write_pos: usize,
}

impl Engine {
    /// Create an engine writing in `format`.
    pub fn new(format: RenderFormat) -> Self {
        Self {
            format,
            scratch: SampleBuffer::new(),
            output: SampleBuffer::new(),
            write_pos: 0,
        }
    }

    /// Sample offset of the next pattern.
    pub fn write_position(&self) -> usize {
        self.write_pos
    }

    pub fn output(&self) -> &SampleBuffer {
        &self.output
    }

    pub fn into_output(self) -> SampleBuffer {
        self.output
    }

    /// Render every pattern of `song` in order.
    pub fn render_song(&mut self, song: &mut Song) {
        for (index, pattern) in song.patterns.iter_mut().enumerate() {
            let frames = self.render_pattern(pattern);
            trace!(pattern = index, frames, "rendered pattern");
        }
        debug!(
            patterns = song.patterns.len(),
            samples = self.output.len(),
            "rendered song"
        );
    }

    /// Render one pattern at the write position, then advance past it.
    ///
    /// The write position moves by the pattern's realized frame count, not
    /// by however many samples the processors produced, so a tail running
    /// past the frame span overlaps (and adds into) the next pattern.
    /// Returns the realized frame count.
    pub fn render_pattern(&mut self, pattern: &mut Pattern) -> usize {
        let channels = self.format.channels as usize;
        let frames = pattern.frames(self.format.sample_rate);
        let samples = frames.saturating_mul(channels);

        self.scratch.reset(samples);
        for track in &mut pattern.tracks {
            if track.clear {
                self.scratch.silence();
            }
            track.render(self.format, &mut self.scratch);
        }

        self.output.mix_at(self.write_pos, self.scratch.as_slice());
        self.write_pos = self.write_pos.saturating_add(samples);
        frames
    }
}

/// Render a whole song into a fresh buffer.
pub fn render_song(song: &mut Song) -> SampleBuffer {
    let mut engine = Engine::new(song.format);
    engine.render_song(song);
    engine.into_output()
}

/// Render a single pattern of `song` in isolation.
pub fn render_pattern(song: &mut Song, index: usize) -> Option<SampleBuffer> {
    let format = song.format;
    let pattern = song.patterns.get_mut(index)?;
    let mut engine = Engine::new(format);
    engine.render_pattern(pattern);
    Some(engine.into_output())
}

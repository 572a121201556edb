//! Growable f32 sample buffer with interleaved layout.

use alloc::vec::Vec;

/// A flat buffer of channel-interleaved f32 samples.
///
/// `data[frame * channels + ch]` is the sample for channel `ch` at `frame`.
/// The buffer has no fixed shape: every operation that writes past the end
/// first grows it, and growth always fills with silence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleBuffer {
    data: Vec<f32>,
}

impl SampleBuffer {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a buffer of `len` silent samples.
    pub fn silent(len: usize) -> Self {
        Self { data: alloc::vec![0.0; len] }
    }

    pub fn from_samples(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Number of samples (not frames).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of whole frames for the given channel count.
    pub fn frames(&self, channels: u16) -> usize {
        self.data.len() / channels.max(1) as usize
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Fill all samples with zero, keeping the length.
    pub fn silence(&mut self) {
        self.data.fill(0.0);
    }

    /// Resize to exactly `len` silent samples, reusing the allocation.
    pub fn reset(&mut self, len: usize) {
        self.data.clear();
        self.data.resize(len, 0.0);
    }

    /// Grow to at least `len` samples, zero-filling the gap.
    pub fn ensure_len(&mut self, len: usize) {
        if self.data.len() < len {
            self.data.resize(len, 0.0);
        }
    }

    /// Add `value` to the sample at `index`, growing if needed.
    pub fn add(&mut self, index: usize, value: f32) {
        self.ensure_len(index + 1);
        self.data[index] += value;
    }

    /// Add `value` to every channel of `frame`, growing if needed.
    pub fn add_frame(&mut self, frame: usize, channels: u16, value: f32) {
        let channels = channels.max(1) as usize;
        let start = frame * channels;
        self.ensure_len(start + channels);
        for s in &mut self.data[start..start + channels] {
            *s += value;
        }
    }

    /// Sum `source` into this buffer starting at sample `offset`.
    pub fn mix_at(&mut self, offset: usize, source: &[f32]) {
        self.ensure_len(offset + source.len());
        for (dst, src) in self.data[offset..].iter_mut().zip(source) {
            *dst += *src;
        }
    }

    /// Scale all samples by `gain`.
    pub fn apply_gain(&mut self, gain: f32) {
        for s in &mut self.data {
            *s *= gain;
        }
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.data.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }
}

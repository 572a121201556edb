//! Headless controller for the textrek music compiler.
//!
//! Provides one API for compiling song text, rendering it and writing WAV
//! files, so the CLI and tests share the same path.

mod output;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use tt_engine::ProcessorRegistry;
use tt_formats::{compile_reader, compile_str, samples_to_wav, CompileError, WavError};

// Re-export common types so callers don't need tt-ir/tt-formats directly.
pub use output::output_path;
pub use tt_formats::WavSettings;
pub use tt_ir::{Defaults, SampleBuffer, Song, DEFAULT_CHANNELS};

/// Error type for processing one song file.
#[derive(Debug, thiserror::Error)]
pub enum MasterError {
    #[error("cannot read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Encode(#[from] WavError),
    #[error("cannot write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings that apply to every file of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Interleaved channels in the output
    pub channels: u16,
    pub wav: WavSettings,
    /// Start every file from the built-in defaults instead of the ones the
    /// previous file left behind
    pub reset_defaults: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            channels: DEFAULT_CHANNELS,
            wav: WavSettings::default(),
            reset_defaults: false,
        }
    }
}

/// What processing one file produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileReport {
    pub output: PathBuf,
    pub patterns: usize,
    pub frames: usize,
    pub bytes: usize,
}

/// Headless compiler: owns the processor registry and the defaults carried
/// from one file to the next.
pub struct Controller {
    registry: ProcessorRegistry,
    options: CompileOptions,
    defaults: Defaults,
}

impl Controller {
    pub fn new(options: CompileOptions) -> Self {
        Self::with_registry(ProcessorRegistry::builtin(), options)
    }

    pub fn with_registry(registry: ProcessorRegistry, options: CompileOptions) -> Self {
        Self {
            registry,
            options,
            defaults: Defaults::default(),
        }
    }

    /// Defaults the next file starts from.
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    // --- Compiling ---

    /// Compile song text held in memory.
    pub fn compile_str(&mut self, text: &str) -> Result<Song, MasterError> {
        let (song, defaults) =
            compile_str(text, &self.registry, self.starting_defaults(), self.options.channels)?;
        self.defaults = defaults;
        Ok(song)
    }

    /// Compile a song file.
    pub fn compile_file(&mut self, path: &Path) -> Result<Song, MasterError> {
        let file = File::open(path).map_err(|source| MasterError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let (song, defaults) = compile_reader(
            BufReader::new(file),
            &self.registry,
            self.starting_defaults(),
            self.options.channels,
        )
        .map_err(|e| match e {
            CompileError::Io(source) => MasterError::Read {
                path: path.to_path_buf(),
                source,
            },
            e => MasterError::Compile(e),
        })?;
        self.defaults = defaults;
        debug!(
            path = %path.display(),
            patterns = song.patterns.len(),
            tracks = song.track_count(),
            "compiled"
        );
        Ok(song)
    }

    fn starting_defaults(&self) -> Defaults {
        if self.options.reset_defaults {
            Defaults::default()
        } else {
            self.defaults
        }
    }

    // --- Offline rendering ---

    pub fn render(&self, song: &mut Song) -> SampleBuffer {
        tt_engine::render_song(song)
    }

    /// Render `song` and encode it as WAV bytes.
    pub fn render_to_wav(&self, song: &mut Song) -> Result<Vec<u8>, MasterError> {
        let samples = self.render(song);
        Ok(samples_to_wav(samples.as_slice(), song.format, self.options.wav)?)
    }

    /// Compile `input`, render it and write the result to `output`
    /// (`input` with a `.wav` extension when `None`).
    pub fn process_file(
        &mut self,
        input: &Path,
        output: Option<&Path>,
    ) -> Result<FileReport, MasterError> {
        let mut song = self.compile_file(input)?;
        let wav = self.render_to_wav(&mut song)?;
        let output = output.map_or_else(|| output_path(input), Path::to_path_buf);
        output::write_output(&output, &wav)?;

        let report = FileReport {
            output,
            patterns: song.patterns.len(),
            frames: song.total_frames(),
            bytes: wav.len(),
        };
        info!(
            input = %input.display(),
            output = %report.output.display(),
            frames = report.frames,
            "wrote song"
        );
        Ok(report)
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(CompileOptions::default())
    }
}

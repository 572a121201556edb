//! Assembles a `Song` from a stream of directives.

use std::io::BufRead;

use tracing::{debug, trace, warn};
use tt_engine::ProcessorRegistry;
use tt_ir::{Defaults, Pattern, RenderFormat, Song, Track, DEFAULT_CHANNELS};

use crate::directive::{parse_line, Directive, Setting};
use crate::{CompileError, DirectiveError};

/// Line-by-line song assembly.
///
/// Holds the finished patterns, the pattern under construction and the
/// track whose data lines are still being read. `Defaults` are owned by the
/// builder and handed back by [`SongBuilder::finish`] so a caller can carry
/// them into the next file.
pub struct SongBuilder<'r> {
    registry: &'r ProcessorRegistry,
    defaults: Defaults,
    channels: u16,
    patterns: Vec<Pattern>,
    pattern: Option<Pattern>,
    track: Option<Track>,
    line: usize,
    ended: bool,
}

impl<'r> SongBuilder<'r> {
    pub fn new(registry: &'r ProcessorRegistry, defaults: Defaults) -> Self {
        Self {
            registry,
            defaults,
            channels: DEFAULT_CHANNELS,
            patterns: Vec::new(),
            pattern: None,
            track: None,
            line: 0,
            ended: false,
        }
    }

    /// Set the channel count of the finished song.
    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// True once `<<` has been read; later lines are ignored.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Parse and apply the next line of song text.
    pub fn push_line(&mut self, text: &str) -> Result<(), CompileError> {
        if self.ended {
            return Ok(());
        }
        self.line += 1;
        let line = self.line;
        parse_line(text)
            .and_then(|directive| self.apply(directive))
            .map_err(|error| CompileError::Line { line, error })
    }

    /// Apply one directive to the song under construction.
    pub fn apply(&mut self, directive: Directive<'_>) -> Result<(), DirectiveError> {
        trace!(line = self.line, ?directive);
        match directive {
            Directive::ResetSong => {
                debug!(line = self.line, patterns = self.patterns.len(), "song reset");
                self.patterns.clear();
                self.pattern = None;
                self.track = None;
            }
            Directive::EndSong => {
                debug!(line = self.line, "song end");
                self.ended = true;
            }
            Directive::Set(setting) => self.set(setting),
            Directive::Processor { clear, name, args } => self.bind(clear, name, args)?,
            Directive::Data { code, value } => {
                let track = self.track.as_mut().ok_or(DirectiveError::DataWithoutTrack)?;
                track.set_line(code, value);
            }
            Directive::Separator => self.close_pattern(),
        }
        Ok(())
    }

    /// Close everything still open and return the song together with the
    /// defaults in effect at the end of the text.
    pub fn finish(mut self) -> (Song, Defaults) {
        self.close_pattern();
        let format = RenderFormat {
            sample_rate: self.defaults.sample_rate,
            channels: self.channels,
        };
        debug!(
            patterns = self.patterns.len(),
            sample_rate = format.sample_rate,
            channels = format.channels,
            "song finished"
        );
        let song = Song {
            format,
            patterns: self.patterns,
        };
        (song, self.defaults)
    }

    fn set(&mut self, setting: Setting) {
        match setting {
            Setting::Bpm(bpm) => self.defaults.bpm = bpm,
            Setting::SampleRate(rate) => {
                if rate == 0 {
                    warn!(line = self.line, "sample rate 0 renders every track as silence");
                }
                self.defaults.sample_rate = rate;
            }
            Setting::Steps(steps) => self.defaults.steps = steps,
            Setting::Step(step) => self.defaults.step = step,
        }
    }

    fn bind(&mut self, clear: bool, name: &str, args: &str) -> Result<(), DirectiveError> {
        let (name, factory) = if name.is_empty() {
            let open = self.track.as_ref().ok_or(DirectiveError::ReuseWithoutProcessor)?;
            (open.name.to_string(), open.factory())
        } else {
            let factory = self
                .registry
                .get(name)
                .ok_or_else(|| DirectiveError::UnknownProcessor(name.to_string()))?;
            (name.to_string(), factory)
        };

        let processor = factory(args).map_err(|error| DirectiveError::Instantiate {
            name: name.clone(),
            error,
        })?;

        self.close_track();
        debug!(line = self.line, name = %name, clear, args, "bound processor");
        self.track = Some(Track::new(
            &name,
            factory,
            processor,
            clear,
            self.defaults.timing(),
        ));
        Ok(())
    }

    fn close_track(&mut self) {
        if let Some(track) = self.track.take() {
            self.pattern.get_or_insert_with(Pattern::new).push(track);
        }
    }

    fn close_pattern(&mut self) {
        self.close_track();
        if let Some(pattern) = self.pattern.take() {
            trace!(line = self.line, tracks = pattern.len(), "closed pattern");
            self.patterns.push(pattern);
        }
    }
}

/// Compile song text held in memory.
pub fn compile_str(
    text: &str,
    registry: &ProcessorRegistry,
    defaults: Defaults,
    channels: u16,
) -> Result<(Song, Defaults), CompileError> {
    let mut builder = SongBuilder::new(registry, defaults).with_channels(channels);
    for line in text.lines() {
        builder.push_line(line)?;
        if builder.is_ended() {
            break;
        }
    }
    Ok(builder.finish())
}

/// Compile song text from a reader, stopping at `<<` without reading further.
pub fn compile_reader<R: BufRead>(
    reader: R,
    registry: &ProcessorRegistry,
    defaults: Defaults,
    channels: u16,
) -> Result<(Song, Defaults), CompileError> {
    let mut builder = SongBuilder::new(registry, defaults).with_channels(channels);
    for line in reader.lines() {
        builder.push_line(&line?)?;
        if builder.is_ended() {
            break;
        }
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_ir::{Processor, ProcessorError, SampleBuffer, Timing, TrackData};

    /// Writes nothing; accepts any arguments except `bad`.
    struct Quiet;

    impl Processor for Quiet {
        fn process(&mut self, _track: &TrackData, _format: RenderFormat, _buffer: &mut SampleBuffer) {}
    }

    fn quiet(args: &str) -> Result<Box<dyn Processor>, ProcessorError> {
        if args == "bad" {
            return Err(ProcessorError::invalid(args, "rejected"));
        }
        Ok(Box::new(Quiet))
    }

    fn registry() -> ProcessorRegistry {
        let mut registry = ProcessorRegistry::new();
        registry.register("a", quiet);
        registry.register("b", quiet);
        registry
    }

    fn compile(text: &str) -> Result<Song, CompileError> {
        compile_str(text, &registry(), Defaults::default(), 2).map(|(song, _)| song)
    }

    fn line_error(text: &str) -> (usize, DirectiveError) {
        match compile(text) {
            Err(CompileError::Line { line, error }) => (line, error),
            other => panic!("expected a line error, got {:?}", other),
        }
    }

    fn shape(song: &Song) -> Vec<Vec<(String, bool)>> {
        song.patterns
            .iter()
            .map(|p| {
                p.tracks
                    .iter()
                    .map(|t| (t.name.to_string(), t.clear))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn tracks_snapshot_defaults_at_bind() {
        let song = compile("bpm 120\n:a\nbpm 140\n:b\n").unwrap();
        let tracks = &song.patterns[0].tracks;
        assert_eq!(tracks[0].timing().bpm, 120.0);
        assert_eq!(tracks[1].timing().bpm, 140.0);
    }

    #[test]
    fn later_settings_do_not_touch_bound_track() {
        let song = compile(":a\nsteps 4\nstep 1/2\n").unwrap();
        assert_eq!(song.patterns[0].tracks[0].timing(), Timing::new(120.0, 0.25, 16));
    }

    #[test]
    fn reuse_without_track_fails() {
        let (line, error) = line_error("bpm 100\n:\n");
        assert_eq!(line, 2);
        assert!(matches!(error, DirectiveError::ReuseWithoutProcessor));
        assert_eq!(error.to_string(), "reuse without prior processor");
    }

    #[test]
    fn data_before_processor_fails() {
        let (line, error) = line_error("nC4\n");
        assert_eq!(line, 1);
        assert!(matches!(error, DirectiveError::DataWithoutTrack));
    }

    #[test]
    fn data_after_separator_fails() {
        let (line, error) = line_error(":a\nx1\n\nx2\n");
        assert_eq!(line, 4);
        assert!(matches!(error, DirectiveError::DataWithoutTrack));
    }

    #[test]
    fn unknown_processor_is_named() {
        let (_, error) = line_error(":fm:x\n");
        assert_eq!(error.to_string(), "unknown processor: fm");
    }

    #[test]
    fn factory_rejection_is_reported() {
        let (line, error) = line_error(":a\n:b:bad\n");
        assert_eq!(line, 2);
        assert!(matches!(error, DirectiveError::Instantiate { ref name, .. } if name == "b"));
    }

    #[test]
    fn malformed_setting_reports_line() {
        let (line, error) = line_error(":a\n\nsr fast\n");
        assert_eq!(line, 3);
        assert!(matches!(error, DirectiveError::InvalidValue { field: "sr", .. }));
    }

    #[test]
    fn reuse_keeps_factory_but_takes_new_flag() {
        let song = compile(":a\n+\n:b:x\n+:y\n").unwrap();
        assert_eq!(
            shape(&song),
            vec![vec![
                ("a".to_string(), true),
                ("a".to_string(), false),
                ("b".to_string(), true),
                ("b".to_string(), false),
            ]]
        );
    }

    #[test]
    fn data_lines_go_to_open_track() {
        let song = compile(":a\nx1\nyfoo\n:b\nx2\nx3\n").unwrap();
        let tracks = &song.patterns[0].tracks;
        assert_eq!(tracks[0].data.lines.get('x'), Some("1"));
        assert_eq!(tracks[0].data.lines.get('y'), Some("foo"));
        assert_eq!(tracks[1].data.lines.get('x'), Some("3"));
        assert_eq!(tracks[1].data.lines.len(), 1);
    }

    #[test]
    fn blank_lines_split_patterns() {
        let song = compile(":a\n:b\n\n\n   \n+a\n").unwrap();
        assert_eq!(
            shape(&song),
            vec![
                vec![("a".to_string(), true), ("b".to_string(), true)],
                vec![("a".to_string(), false)],
            ]
        );
    }

    #[test]
    fn extra_blank_lines_change_nothing() {
        let tight = compile(":a\n\n:b\n").unwrap();
        let loose = compile("\n\n:a\n\n\n\n:b\n\n\n").unwrap();
        assert_eq!(shape(&tight), shape(&loose));
    }

    #[test]
    fn last_track_is_kept_without_trailing_blank() {
        let song = compile(":a\n:b").unwrap();
        assert_eq!(song.track_count(), 2);
    }

    #[test]
    fn reset_discards_earlier_patterns() {
        let song = compile(":a\n\n:a\n>>\n:b\n").unwrap();
        assert_eq!(shape(&song), vec![vec![("b".to_string(), true)]]);
    }

    #[test]
    fn reset_keeps_defaults() {
        let song = compile("bpm 90\n:a\n>>\n:b\n").unwrap();
        assert_eq!(song.patterns[0].tracks[0].timing().bpm, 90.0);
    }

    #[test]
    fn end_ignores_remaining_lines() {
        let song = compile(":a\n<<\nthis is not valid\n:nope\n").unwrap();
        assert_eq!(song.track_count(), 1);
    }

    #[test]
    fn song_uses_final_sample_rate_and_configured_channels() {
        let (song, defaults) =
            compile_str(":a\nsr 22050\n", &registry(), Defaults::default(), 1).unwrap();
        assert_eq!(song.format, RenderFormat { sample_rate: 22_050, channels: 1 });
        assert_eq!(defaults.sample_rate, 22_050);
    }

    #[test]
    fn defaults_are_handed_back() {
        let (_, defaults) =
            compile_str("bpm 99\nsteps 3\n", &registry(), Defaults::default(), 2).unwrap();
        let (song, _) = compile_str(":a\n", &registry(), defaults, 2).unwrap();
        assert_eq!(song.patterns[0].tracks[0].timing(), Timing::new(99.0, 0.25, 3));
    }

    #[test]
    fn zero_sample_rate_compiles_to_empty_span() {
        let song = compile("sr 0\n:a\n").unwrap();
        assert_eq!(song.format.sample_rate, 0);
        assert_eq!(song.track_count(), 1);
        assert_eq!(song.total_frames(), 0);
    }

    #[test]
    fn empty_text_is_empty_song() {
        let song = compile("").unwrap();
        assert!(song.is_empty());
        assert_eq!(song.format.sample_rate, 48_000);
    }

    #[test]
    fn reader_stops_at_end_marker() {
        let text = b":a\n<<\n:nope\n";
        let (song, _) =
            compile_reader(&text[..], &registry(), Defaults::default(), 2).unwrap();
        assert_eq!(song.track_count(), 1);
    }

    #[test]
    fn long_names_are_truncated() {
        let mut registry = registry();
        let name = "x".repeat(40);
        registry.register(&name, quiet);
        let (song, _) =
            compile_str(&format!(":{}\n", name), &registry, Defaults::default(), 2).unwrap();
        assert_eq!(song.patterns[0].tracks[0].name.len(), 32);
    }
}

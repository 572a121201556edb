//! Integration tests for the song text parser against fixture songs.

use std::fs;
use std::path::PathBuf;

use tt_engine::{render_song, ProcessorRegistry};
use tt_formats::{compile_str, read_wav, samples_to_wav, WavSettings};
use tt_ir::{Defaults, Song};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures/songs")
}

fn load_fixture(name: &str) -> (Song, Defaults) {
    let path = fixtures_dir().join(name);
    let text = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    compile_str(&text, &ProcessorRegistry::builtin(), Defaults::default(), 2)
        .unwrap_or_else(|e| panic!("Failed to compile {}: {}", name, e))
}

fn track_names(song: &Song) -> Vec<Vec<String>> {
    song.patterns
        .iter()
        .map(|p| p.tracks.iter().map(|t| t.name.to_string()).collect())
        .collect()
}

#[test]
fn groove_structure() {
    let (song, defaults) = load_fixture("groove.tt");
    assert_eq!(
        track_names(&song),
        vec![
            vec!["basic", "basic", "lowpass"],
            vec!["basic", "gain"],
        ]
    );
    assert_eq!(song.format.sample_rate, 44_100);
    assert_eq!(defaults.bpm, 128.0);

    let first = &song.patterns[0].tracks;
    assert!(first[0].clear);
    assert!(!first[1].clear);
    assert_eq!(first[0].data.lines.get('r'), Some("0.08"));
    assert_eq!(first[1].data.lines.get('v'), Some("4 4 4 4"));
}

#[test]
fn groove_renders_expected_span() {
    let (mut song, _) = load_fixture("groove.tt");
    // floor(44100 / (128/60) * 0.25) = 5167 frames per step, 8 steps
    assert_eq!(song.total_frames(), 2 * 5167 * 8);

    let out = render_song(&mut song);
    assert!(out.len() >= song.total_samples());
    assert!(out.peak() > 0.0);
}

#[test]
fn noise_stops_at_end_marker() {
    let (song, defaults) = load_fixture("noise.tt");
    assert_eq!(track_names(&song), vec![vec!["basic"], vec!["basic"]]);
    assert_eq!(defaults.bpm, 90.0);
    assert_eq!(song.patterns[0].tracks[0].timing().bpm, 120.0);
    assert_eq!(song.patterns[1].tracks[0].timing().bpm, 90.0);
    assert_eq!(song.total_frames(), 48_000 + 64_000);
}

#[test]
fn noise_renders_identically_twice() {
    let (mut song, _) = load_fixture("noise.tt");
    let first = render_song(&mut song);
    let second = render_song(&mut song);
    assert_eq!(first, second);
}

#[test]
fn silent_song_decodes_to_silence() {
    let (mut song, _) = load_fixture("silence.tt");
    let out = render_song(&mut song);
    assert_eq!(out.frames(2), 6000);

    let wav = samples_to_wav(out.as_slice(), song.format, WavSettings::default()).unwrap();
    let (format, decoded) = read_wav(&wav[..]).unwrap();
    assert_eq!(format.sample_rate, 8000);
    assert_eq!(decoded.frames(format.channels), 6000);
    assert!(decoded.as_slice().iter().all(|&s| s == 0.0));
}

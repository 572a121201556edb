//! Note names and pitch conversion.
//!
//! Notes are written as a letter, an optional accidental and an octave:
//! `C4`, `F#3`, `Bb2`, `a-1`. `A4` is MIDI note 69 at 440 Hz.

/// MIDI note number of the tuning reference.
const REFERENCE_NOTE: i32 = 69;

/// Frequency of the tuning reference in Hz.
const REFERENCE_HZ: f64 = 440.0;

/// Semitone offsets of the natural notes within an octave, C first.
const NATURALS: [(char, i32); 7] = [
    ('C', 0),
    ('D', 2),
    ('E', 4),
    ('F', 5),
    ('G', 7),
    ('A', 9),
    ('B', 11),
];

/// Parse a note name into a MIDI note number.
///
/// Returns `None` for anything that is not a well-formed note name.
pub fn parse_note(token: &str) -> Option<i32> {
    let mut chars = token.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let (_, mut semitone) = NATURALS.iter().find(|(c, _)| *c == letter).copied()?;

    let rest = chars.as_str();
    let octave_str = if let Some(r) = rest.strip_prefix('#') {
        semitone += 1;
        r
    } else if let Some(r) = rest.strip_prefix('b') {
        semitone -= 1;
        r
    } else {
        rest
    };

    let octave: i32 = octave_str.parse().ok()?;
    Some((octave + 1) * 12 + semitone)
}

/// Convert a MIDI note number to a frequency using 12-TET.
pub fn note_to_frequency(note: i32) -> f64 {
    REFERENCE_HZ * libm::pow(2.0, (note - REFERENCE_NOTE) as f64 / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naturals() {
        assert_eq!(parse_note("C4"), Some(60));
        assert_eq!(parse_note("A4"), Some(69));
        assert_eq!(parse_note("B3"), Some(59));
        assert_eq!(parse_note("c0"), Some(12));
    }

    #[test]
    fn accidentals() {
        assert_eq!(parse_note("C#4"), Some(61));
        assert_eq!(parse_note("Db4"), Some(61));
        assert_eq!(parse_note("Bb2"), Some(46));
        assert_eq!(parse_note("bb2"), Some(46));
        assert_eq!(parse_note("Cb4"), Some(59));
    }

    #[test]
    fn negative_octave() {
        assert_eq!(parse_note("C-1"), Some(0));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_note(""), None);
        assert_eq!(parse_note("H4"), None);
        assert_eq!(parse_note("C"), None);
        assert_eq!(parse_note("C#"), None);
        assert_eq!(parse_note("."), None);
        assert_eq!(parse_note("C4x"), None);
    }

    #[test]
    fn reference_pitch() {
        assert!((note_to_frequency(69) - 440.0).abs() < 1e-9);
        assert!((note_to_frequency(81) - 880.0).abs() < 1e-9);
        assert!((note_to_frequency(60) - 261.625_565).abs() < 1e-3);
    }
}

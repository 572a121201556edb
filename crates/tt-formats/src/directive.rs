//! Line classification for song text.
//!
//! Every line is exactly one directive. Shapes are tried in a fixed order
//! and the first match wins:
//!
//! 1. `>>` resets the song, `<<` ends it.
//! 2. `bpm`, `sr`, `steps` or `step`, whitespace, value: a global setting.
//! 3. `:` or `+`, optional name, optional `:args`: a processor directive.
//! 4. Empty or whitespace-only: a pattern separator.
//! 5. Anything else: a data line keyed by its first character.
//!
//! So `steps 16` is a setting while `s 16` is a data line for code `s`.

use crate::DirectiveError;

/// A global setting and its parsed value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Setting {
    Bpm(f64),
    SampleRate(u32),
    Steps(u32),
    Step(f64),
}

/// One classified line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Directive<'a> {
    /// `>>`: discard everything built so far
    ResetSong,
    /// `<<`: ignore the rest of the input
    EndSong,
    Set(Setting),
    /// `:` clears the pattern buffer, `+` accumulates. An empty name reuses
    /// the processor of the open track.
    Processor {
        clear: bool,
        name: &'a str,
        args: &'a str,
    },
    Data {
        code: char,
        value: &'a str,
    },
    Separator,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Bpm,
    SampleRate,
    Steps,
    Step,
}

/// Keywords in match order; `steps` must be tried before `step`.
const FIELDS: [(&str, Field); 4] = [
    ("bpm", Field::Bpm),
    ("sr", Field::SampleRate),
    ("steps", Field::Steps),
    ("step", Field::Step),
];

/// Classify one line of song text.
///
/// Only malformed setting values fail here; whether a directive makes sense
/// in context is up to the builder.
pub fn parse_line(line: &str) -> Result<Directive<'_>, DirectiveError> {
    match line {
        ">>" => return Ok(Directive::ResetSong),
        "<<" => return Ok(Directive::EndSong),
        _ => {}
    }

    if let Some((keyword, field, value)) = split_setting(line) {
        return parse_setting(keyword, field, value).map(Directive::Set);
    }

    if let Some(directive) = parse_processor(line) {
        return Ok(directive);
    }

    let mut chars = line.chars();
    match chars.next() {
        Some(code) if !line.chars().all(|c| c.is_ascii_whitespace()) => Ok(Directive::Data {
            code,
            value: chars.as_str(),
        }),
        _ => Ok(Directive::Separator),
    }
}

/// Parse a decimal or `numerator/denominator` value.
///
/// Both halves are floating point and there is no zero-denominator check:
/// `1/0` is infinity.
pub fn parse_ratio(s: &str) -> Result<f64, core::num::ParseFloatError> {
    match s.split_once('/') {
        Some((num, den)) => Ok(num.parse::<f64>()? / den.parse::<f64>()?),
        None => s.parse(),
    }
}

fn split_setting(line: &str) -> Option<(&'static str, Field, &str)> {
    FIELDS.iter().find_map(|&(keyword, field)| {
        let rest = line.strip_prefix(keyword)?;
        if !rest.starts_with(|c: char| c.is_ascii_whitespace()) {
            return None;
        }
        let value = rest.trim_matches(|c: char| c.is_ascii_whitespace());
        Some((keyword, field, value))
    })
}

fn parse_setting(keyword: &'static str, field: Field, value: &str) -> Result<Setting, DirectiveError> {
    let invalid = |reason: String| DirectiveError::InvalidValue {
        field: keyword,
        value: value.to_string(),
        reason,
    };
    match field {
        Field::Bpm => parse_ratio(value)
            .map(Setting::Bpm)
            .map_err(|e| invalid(e.to_string())),
        Field::Step => parse_ratio(value)
            .map(Setting::Step)
            .map_err(|e| invalid(e.to_string())),
        Field::SampleRate => value
            .parse()
            .map(Setting::SampleRate)
            .map_err(|e| invalid(e.to_string())),
        Field::Steps => value
            .parse()
            .map(Setting::Steps)
            .map_err(|e| invalid(e.to_string())),
    }
}

/// `[:+][name][:args]` where `name` has no `:` and `args`, when present,
/// is non-empty.
fn parse_processor(line: &str) -> Option<Directive<'_>> {
    let clear = match line.as_bytes().first()? {
        b':' => true,
        b'+' => false,
        _ => return None,
    };
    let body = &line[1..];
    let (name, args) = match body.split_once(':') {
        Some((_, "")) => return None,
        Some((name, args)) => (name, args),
        None => (body, ""),
    };
    Some(Directive::Processor { clear, name, args })
}

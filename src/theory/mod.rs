pub mod diatonic;
pub mod scales;

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

use crate::pitch::{PitchClass, PitchError};

pub use diatonic::{DiatonicChord, diatonic_chords};
pub use scales::{ScaleDef, compute_scale, scale, scale_keys, scales};

#[derive(Error, Debug, PartialEq)]
pub enum TheoryError {
    #[error("Unknown chord quality: {0}")]
    UnknownQuality(String),
    #[error("Unknown scale: {0}")]
    UnknownScale(String),
    #[error(transparent)]
    Pitch(#[from] PitchError),
}

/// Triad quality of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
}

impl ChordQuality {
    /// Semitones above the root, root included.
    pub fn formula(self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
        }
    }

    /// Suffix used in chord symbols ("m", "°", "+").
    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "°",
            ChordQuality::Augmented => "+",
        }
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Diminished => "diminished",
            ChordQuality::Augmented => "augmented",
        };
        f.write_str(name)
    }
}

impl FromStr for ChordQuality {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "M" and "m" differ only by case, so match them before lowercasing
        match s.trim() {
            "M" => return Ok(ChordQuality::Major),
            "m" => return Ok(ChordQuality::Minor),
            _ => {}
        }
        match s.trim().to_lowercase().as_str() {
            "major" | "maj" | "" => Ok(ChordQuality::Major),
            "minor" | "min" | "-" => Ok(ChordQuality::Minor),
            "diminished" | "dim" | "°" | "o" => Ok(ChordQuality::Diminished),
            "augmented" | "aug" | "+" => Ok(ChordQuality::Augmented),
            _ => Err(TheoryError::UnknownQuality(s.to_string())),
        }
    }
}

/// Extension name → semitone offsets above the root.
const EXTENSIONS: &[(&str, &[u8])] = &[
    ("2", &[2]),
    ("4", &[5]),
    ("4+", &[6]),
    ("4°", &[4]),
    ("5", &[7]),
    ("5+", &[8]),
    ("5°", &[6]),
    ("6", &[9]),
    ("7", &[10]),
    ("7+", &[11]),
    ("7°", &[9]),
    ("9", &[14]),
    ("9+", &[15]),
    ("9°", &[13]),
    ("11", &[17]),
    ("11+", &[18]),
    ("11°", &[16]),
    ("13", &[21]),
    ("13+", &[22]),
    ("13°", &[20]),
    // chorinho spellings
    ("7M", &[11]),
    ("7m", &[10]),
    ("9M", &[14]),
    ("9m", &[13]),
    ("6/9", &[9, 14]),
    ("7M9", &[11, 14]),
    ("7m9", &[10, 14]),
    ("°7", &[9]),
    ("+5", &[8]),
];

/// Offsets for one extension name, or None if unknown.
pub fn extension(name: &str) -> Option<&'static [u8]> {
    EXTENSIONS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, offsets)| *offsets)
}

// digits followed by any modifiers, e.g. "7", "9+", "11°", "7M"
static EXTENSION_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+[^\d]*").unwrap());

/// Semitone offsets for an extension string like "7", "7M9", "6/9" or
/// "7 9+". Each whitespace/comma separated part is looked up whole first,
/// then split into digit-led tokens. Unknown tokens add nothing.
pub fn extension_offsets(extensions: &str) -> Vec<u8> {
    let mut offsets = Vec::new();
    for part in extensions.split(|c: char| c.is_whitespace() || c == ',') {
        if part.is_empty() {
            continue;
        }
        if let Some(found) = extension(part) {
            offsets.extend_from_slice(found);
            continue;
        }
        for token in EXTENSION_TOKEN_RE.find_iter(part) {
            match extension(token.as_str()) {
                Some(found) => offsets.extend_from_slice(found),
                None => log::debug!("Ignoring unknown extension \"{}\"", token.as_str()),
            }
        }
    }
    offsets
}

/// Pitch classes of a chord: root first, then the quality's formula,
/// then extensions. Repeated classes keep their first position.
pub fn chord_notes(root: PitchClass, quality: ChordQuality, extensions: &str) -> Vec<PitchClass> {
    let mut notes: Vec<PitchClass> = Vec::new();
    let intervals = quality
        .formula()
        .iter()
        .copied()
        .chain(extension_offsets(extensions));
    for interval in intervals {
        let note = root.transpose(interval as i32);
        if !notes.contains(&note) {
            notes.push(note);
        }
    }
    notes
}

/// Display symbol like "C", "Am", "B°", "Eb+7".
pub fn chord_symbol(root: PitchClass, quality: ChordQuality, extensions: &str, use_flat: bool) -> String {
    let root_name = if use_flat { root.flat_name() } else { root.name() };
    format!("{root_name}{}{extensions}", quality.suffix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use PitchClass::*;

    #[test]
    fn test_quality_parse() {
        assert_eq!("major".parse::<ChordQuality>(), Ok(ChordQuality::Major));
        assert_eq!("M".parse::<ChordQuality>(), Ok(ChordQuality::Major));
        assert_eq!("m".parse::<ChordQuality>(), Ok(ChordQuality::Minor));
        assert_eq!("Minor".parse::<ChordQuality>(), Ok(ChordQuality::Minor));
        assert_eq!("dim".parse::<ChordQuality>(), Ok(ChordQuality::Diminished));
        assert_eq!("°".parse::<ChordQuality>(), Ok(ChordQuality::Diminished));
        assert_eq!("+".parse::<ChordQuality>(), Ok(ChordQuality::Augmented));
        assert!(matches!(
            "sus4".parse::<ChordQuality>(),
            Err(TheoryError::UnknownQuality(_))
        ));
    }

    #[test]
    fn test_triads() {
        assert_eq!(chord_notes(C, ChordQuality::Major, ""), vec![C, E, G]);
        assert_eq!(chord_notes(A, ChordQuality::Minor, ""), vec![A, C, E]);
        assert_eq!(chord_notes(B, ChordQuality::Diminished, ""), vec![B, D, F]);
        assert_eq!(chord_notes(C, ChordQuality::Augmented, ""), vec![C, E, GSharp]);
    }

    #[test]
    fn test_seventh_and_ninth() {
        assert_eq!(chord_notes(G, ChordQuality::Major, "7"), vec![G, B, D, F]);
        assert_eq!(chord_notes(C, ChordQuality::Major, "7+"), vec![C, E, G, B]);
        assert_eq!(chord_notes(D, ChordQuality::Minor, "7 9"), vec![D, F, A, C, E]);
    }

    #[test]
    fn test_compound_extensions() {
        assert_eq!(chord_notes(C, ChordQuality::Major, "6/9"), vec![C, E, G, A, D]);
        assert_eq!(chord_notes(C, ChordQuality::Major, "7M9"), vec![C, E, G, B, D]);
        // split into digit-led tokens when the whole string isn't a name
        assert_eq!(extension_offsets("7+9"), vec![11, 14]);
    }

    #[test]
    fn test_unknown_extension_adds_nothing() {
        assert_eq!(chord_notes(C, ChordQuality::Major, "sus"), vec![C, E, G]);
        assert_eq!(chord_notes(C, ChordQuality::Major, "8"), vec![C, E, G]);
        assert!(extension_offsets("").is_empty());
    }

    #[test]
    fn test_duplicate_extension_collapses() {
        // the 5th is already in the triad
        assert_eq!(chord_notes(C, ChordQuality::Major, "5"), vec![C, E, G]);
    }

    #[test]
    fn test_chord_symbol() {
        assert_eq!(chord_symbol(C, ChordQuality::Major, "", false), "C");
        assert_eq!(chord_symbol(A, ChordQuality::Minor, "7", false), "Am7");
        assert_eq!(chord_symbol(ASharp, ChordQuality::Major, "", true), "Bb");
        assert_eq!(chord_symbol(ASharp, ChordQuality::Major, "", false), "A#");
        assert_eq!(chord_symbol(B, ChordQuality::Diminished, "", true), "B°");
        assert_eq!(chord_symbol(DSharp, ChordQuality::Augmented, "7", true), "Eb+7");
    }
}

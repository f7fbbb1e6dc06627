use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::pitch::{Pitch, PitchClass};

#[derive(Error, Debug, PartialEq)]
pub enum TuningError {
    #[error("Tuning is empty")]
    Empty,
    #[error("Invalid pitch \"{token}\" at string {position} of tuning")]
    InvalidPitch { token: String, position: usize },
    #[error("Unknown tuning preset \"{name}\" for {instrument}")]
    UnknownPreset { instrument: String, name: String },
}

/// Open pitch of one string. A tuning is a slice of these, lowest string first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TuningEntry {
    pub class: PitchClass,
    pub octave: i32,
}

impl TuningEntry {
    pub fn new(class: PitchClass, octave: i32) -> Self {
        Self { class, octave }
    }

    pub fn open_pitch(&self) -> Pitch {
        Pitch::new(self.class, self.octave)
    }
}

impl fmt::Display for TuningEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class, self.octave)
    }
}

/// Parse a comma-separated tuning like `"E2, A2, D3, G3, B3, E4"`.
/// Flat spellings are accepted and normalized ("Eb2" → D#2).
pub fn parse_tuning(input: &str) -> Result<Vec<TuningEntry>, TuningError> {
    if input.trim().is_empty() {
        return Err(TuningError::Empty);
    }

    input
        .split(',')
        .enumerate()
        .map(|(i, part)| {
            let token = part.trim();
            token
                .parse::<Pitch>()
                .map(|p| TuningEntry::new(p.class, p.octave))
                .map_err(|_| TuningError::InvalidPitch {
                    token: token.to_string(),
                    position: i + 1,
                })
        })
        .collect()
}

pub fn format_tuning(tuning: &[TuningEntry]) -> String {
    tuning
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A named tuning for one instrument.
#[derive(Debug, Clone, Copy)]
pub struct TuningPreset {
    pub name: &'static str,
    pub tuning: &'static str,
}

const fn preset(name: &'static str, tuning: &'static str) -> TuningPreset {
    TuningPreset { name, tuning }
}

/// Built-in presets, keyed by instrument code.
const PRESETS: &[(&str, &[TuningPreset])] = &[
    (
        "6guitar",
        &[
            preset("Standard", "E2, A2, D3, G3, B3, E4"),
            preset("Drop D", "D2, A2, D3, G3, B3, E4"),
            preset("Open G", "D2, G2, D3, G3, B3, D4"),
            preset("Open D", "D2, A2, D3, F#3, A3, D4"),
            preset("DADGAD", "D2, A2, D3, G3, A3, D4"),
            preset("Open C", "C2, G2, C3, G3, E3, G3"),
        ],
    ),
    (
        "7guitar",
        &[
            preset("Standard", "B1, E2, A2, D3, G3, B3, E4"),
            preset("Brazilian", "C1, E2, A2, D3, G3, B3, E4"),
        ],
    ),
    ("4bass", &[preset("Standard", "E1, A1, D2, G2")]),
    ("5bass", &[preset("Standard", "B0, E1, A1, D2, G2")]),
    ("violin", &[preset("Standard", "G3, D4, A4, E5")]),
    ("viola", &[preset("Standard", "C3, G3, D4, A4")]),
    ("cello", &[preset("Standard", "C2, G2, D3, A3")]),
    ("ukulele", &[preset("Standard (Re-entrant)", "G4, C4, E4, A4")]),
    ("mandolin", &[preset("Standard", "G3, D4, A4, E5")]),
];

pub const DEFAULT_INSTRUMENT: &str = "6guitar";

/// Instrument codes that have presets.
pub fn instruments() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(code, _)| *code)
}

/// Presets for an instrument code, or an empty slice if unknown.
pub fn presets(instrument: &str) -> &'static [TuningPreset] {
    let lower = instrument.to_lowercase();
    PRESETS
        .iter()
        .find(|(code, _)| *code == lower)
        .map(|(_, list)| *list)
        .unwrap_or(&[])
}

/// Resolve a preset by instrument and (case-insensitive) name.
pub fn find_preset(instrument: &str, name: &str) -> Result<Vec<TuningEntry>, TuningError> {
    let wanted = name.to_lowercase();
    presets(instrument)
        .iter()
        .find(|p| p.name.to_lowercase() == wanted)
        .ok_or_else(|| TuningError::UnknownPreset {
            instrument: instrument.to_string(),
            name: name.to_string(),
        })
        .and_then(|p| parse_tuning(p.tuning))
}

/// Standard six-string guitar, E2 A2 D3 G3 B3 E4.
pub fn standard_guitar() -> Vec<TuningEntry> {
    use PitchClass::*;
    vec![
        TuningEntry::new(E, 2),
        TuningEntry::new(A, 2),
        TuningEntry::new(D, 3),
        TuningEntry::new(G, 3),
        TuningEntry::new(B, 3),
        TuningEntry::new(E, 4),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_guitar() {
        let t = parse_tuning("E2, A2, D3, G3, B3, E4").unwrap();
        assert_eq!(t, standard_guitar());
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let t = parse_tuning("  D2,A2 ,  D3,F#3,A3,D4 ").unwrap();
        assert_eq!(t.len(), 6);
        assert_eq!(t[3], TuningEntry::new(PitchClass::FSharp, 3));
    }

    #[test]
    fn test_parse_normalizes_flats() {
        let t = parse_tuning("Eb2, Ab2, Db3, Gb3, Bb3, Eb4").unwrap();
        assert_eq!(t[0], TuningEntry::new(PitchClass::DSharp, 2));
        assert_eq!(t[4], TuningEntry::new(PitchClass::ASharp, 3));
        assert_eq!(t[0].open_pitch().to_string(), "D#2");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_tuning(""), Err(TuningError::Empty));
        assert_eq!(parse_tuning("   "), Err(TuningError::Empty));
    }

    #[test]
    fn test_parse_reports_bad_token() {
        let err = parse_tuning("E2, A2, Q3").unwrap_err();
        assert_eq!(
            err,
            TuningError::InvalidPitch {
                token: "Q3".to_string(),
                position: 3
            }
        );
        assert!(parse_tuning("E2,,A2").is_err());
        assert!(parse_tuning("E, A").is_err());
    }

    #[test]
    fn test_format_roundtrip_text() {
        let t = parse_tuning("G4, C4, E4, A4").unwrap();
        assert_eq!(format_tuning(&t), "G4, C4, E4, A4");
    }

    #[test]
    fn test_every_preset_parses() {
        for instrument in instruments() {
            let list = presets(instrument);
            assert!(!list.is_empty(), "{instrument} has no presets");
            for p in list {
                assert!(
                    parse_tuning(p.tuning).is_ok(),
                    "{instrument}/{} failed to parse",
                    p.name
                );
            }
        }
    }

    #[test]
    fn test_find_preset() {
        let t = find_preset("6guitar", "drop d").unwrap();
        assert_eq!(t[0], TuningEntry::new(PitchClass::D, 2));

        let t = find_preset("7GUITAR", "Standard").unwrap();
        assert_eq!(t.len(), 7);

        assert!(matches!(
            find_preset("6guitar", "Nashville"),
            Err(TuningError::UnknownPreset { .. })
        ));
        assert!(presets("theremin").is_empty());
    }
}

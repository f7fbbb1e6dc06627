use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::pitch::{Pitch, produced_pitch};
use crate::tuning::TuningEntry;

#[derive(Error, Debug, PartialEq)]
#[error("Invalid fret token \"{0}\" (expected a fret number or x)")]
pub struct ParseAssignmentError(pub String);

/// What one string does in a fingering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringFret {
    Muted,
    Fret(u8),
}

impl StringFret {
    pub fn fret(self) -> Option<u8> {
        match self {
            StringFret::Muted => None,
            StringFret::Fret(f) => Some(f),
        }
    }

    pub fn is_muted(self) -> bool {
        matches!(self, StringFret::Muted)
    }
}

impl fmt::Display for StringFret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringFret::Muted => f.write_str("x"),
            StringFret::Fret(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for StringFret {
    type Err = ParseAssignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(StringFret::Muted),
            _ => s
                .parse::<u8>()
                .map(StringFret::Fret)
                .map_err(|_| ParseAssignmentError(s.to_string())),
        }
    }
}

/// One voicing: a token per string, index-aligned with the tuning.
/// Displays as space-joined tokens, e.g. `x 3 2 0 1 0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FretAssignment(pub Vec<StringFret>);

impl FretAssignment {
    pub fn strings(&self) -> &[StringFret] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sounded pitch per string (None where muted).
    pub fn produced_pitches(&self, tuning: &[TuningEntry]) -> Vec<Option<Pitch>> {
        self.0
            .iter()
            .zip(tuning)
            .map(|(s, entry)| s.fret().map(|f| produced_pitch(entry, f)))
            .collect()
    }
}

impl fmt::Display for FretAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

impl FromStr for FretAssignment {
    type Err = ParseAssignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(FretAssignment)
    }
}

impl Serialize for FretAssignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::standard_guitar;

    #[test]
    fn test_display() {
        let a = FretAssignment(vec![
            StringFret::Muted,
            StringFret::Fret(3),
            StringFret::Fret(2),
            StringFret::Fret(0),
            StringFret::Fret(1),
            StringFret::Fret(0),
        ]);
        assert_eq!(a.to_string(), "x 3 2 0 1 0");
    }

    #[test]
    fn test_parse() {
        let a: FretAssignment = "x 10 12 12 11 x".parse().unwrap();
        assert_eq!(a.len(), 6);
        assert_eq!(a.strings()[1], StringFret::Fret(10));
        assert!(a.strings()[5].is_muted());
        assert_eq!(a.to_string(), "x 10 12 12 11 x");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("x 3 o 0".parse::<FretAssignment>().is_err());
        assert!("x -1 2".parse::<FretAssignment>().is_err());
        assert!("".parse::<FretAssignment>().unwrap().is_empty());
    }

    #[test]
    fn test_produced_pitches() {
        let a: FretAssignment = "x 3 2 0 1 0".parse().unwrap();
        let pitches: Vec<String> = a
            .produced_pitches(&standard_guitar())
            .iter()
            .map(|p| p.map(|p| p.to_string()).unwrap_or_else(|| "x".into()))
            .collect();
        assert_eq!(pitches, vec!["x", "C3", "E3", "G3", "C4", "E4"]);
    }

    #[test]
    fn test_serializes_as_string() {
        let a: FretAssignment = "0 2 2 1 0 0".parse().unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"0 2 2 1 0 0\"");
    }
}

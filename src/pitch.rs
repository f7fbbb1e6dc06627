use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

use crate::tuning::TuningEntry;

#[derive(Error, Debug, PartialEq)]
pub enum PitchError {
    #[error("Unknown pitch class: {0}")]
    UnknownClass(String),
    #[error("Invalid pitch \"{0}\" (expected e.g. E2, C#4, Bb3)")]
    InvalidPitch(String),
}

/// One of the twelve sharp-spelled pitch classes, indexed C=0 .. B=11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Pitch class for any semitone count, wrapping mod 12.
    pub fn from_semitones(semis: i32) -> Self {
        Self::ALL[semis.rem_euclid(12) as usize]
    }

    pub fn transpose(self, semis: i32) -> Self {
        Self::from_semitones(self.index() as i32 + semis)
    }

    /// Canonical sharp spelling ("C#").
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }

    /// Flat spelling for display ("Db"); naturals are unchanged.
    pub fn flat_name(self) -> &'static str {
        match self {
            PitchClass::CSharp => "Db",
            PitchClass::DSharp => "Eb",
            PitchClass::FSharp => "Gb",
            PitchClass::GSharp => "Ab",
            PitchClass::ASharp => "Bb",
            other => other.name(),
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for PitchClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Parses a letter with an optional `#` or `b`. Flats normalize to the
/// sharp set, so "Bb" and "A#" are the same class.
impl FromStr for PitchClass {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let base: i32 = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            Some('B') => 11,
            _ => return Err(PitchError::UnknownClass(s.to_string())),
        };
        let offset = match chars.as_str() {
            "" => 0,
            "#" => 1,
            "b" => -1,
            _ => return Err(PitchError::UnknownClass(s.to_string())),
        };
        Ok(Self::from_semitones(base + offset))
    }
}

/// A pitch class in a specific octave. Ordered by `value()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Pitch {
    pub class: PitchClass,
    pub octave: i32,
}

impl Pitch {
    pub fn new(class: PitchClass, octave: i32) -> Self {
        Self { class, octave }
    }

    /// Semitones above C0.
    pub fn value(&self) -> i32 {
        self.class.index() as i32 + 12 * self.octave
    }
}

impl PartialOrd for Pitch {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pitch {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value().cmp(&other.value())
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class, self.octave)
    }
}

// Sharp-spelled pitch with octave digits, e.g. "C#3"
static PITCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-G]#?)(\d+)$").unwrap());

// Accepts flats too; used for human input (tunings, CLI)
static LOOSE_PITCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<class>[A-Ga-g][#b]?)(?P<octave>\d+)$").unwrap());

impl FromStr for Pitch {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = LOOSE_PITCH_RE
            .captures(trimmed)
            .ok_or_else(|| PitchError::InvalidPitch(s.to_string()))?;
        let class: PitchClass = caps["class"].parse()?;
        let octave: i32 = caps["octave"]
            .parse()
            .map_err(|_| PitchError::InvalidPitch(s.to_string()))?;
        Ok(Pitch { class, octave })
    }
}

/// Pitch sounded by `entry`'s string stopped at `fret` (0 = open).
pub fn produced_pitch(entry: &TuningEntry, fret: u8) -> Pitch {
    let value = entry.open_pitch().value() + fret as i32;
    Pitch {
        class: PitchClass::from_semitones(value),
        octave: value.div_euclid(12),
    }
}

/// Numeric value of a canonical pitch string ("E2" → 28).
/// Returns None for anything that isn't sharp-spelled class + octave digits;
/// callers must treat that as incomparable rather than zero.
pub fn pitch_to_value(pitch: &str) -> Option<i32> {
    let caps = PITCH_RE.captures(pitch)?;
    let class: PitchClass = caps[1].parse().ok()?;
    let octave: i32 = caps[2].parse().ok()?;
    Some(class.index() as i32 + 12 * octave)
}

use serde::Serialize;

use super::ChordQuality::{self, *};
use super::TheoryError;
use crate::pitch::PitchClass;

/// A scale: step pattern plus the diatonic chord built on each degree.
/// Label lists may be shorter or longer than the pattern; missing labels
/// render empty.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScaleDef {
    pub key: &'static str,
    pub name: &'static str,
    pub pattern: &'static [u8],
    pub qualities: &'static [ChordQuality],
    pub roman: &'static [&'static str],
    pub functions: &'static [&'static str],
}

impl ScaleDef {
    pub fn roman(&self, degree: usize) -> &'static str {
        self.roman.get(degree).copied().unwrap_or("")
    }

    pub fn function(&self, degree: usize) -> &'static str {
        self.functions.get(degree).copied().unwrap_or("")
    }

    /// Notes starting on `tonic`, closing octave included
    /// (a seven-step pattern yields eight notes).
    pub fn notes(&self, tonic: PitchClass) -> Vec<PitchClass> {
        let mut notes = Vec::with_capacity(self.pattern.len() + 1);
        let mut current = tonic;
        notes.push(current);
        for &step in self.pattern {
            current = current.transpose(step as i32);
            notes.push(current);
        }
        notes
    }
}

const SCALES: &[ScaleDef] = &[
    ScaleDef {
        key: "major",
        name: "Major",
        pattern: &[2, 2, 1, 2, 2, 2, 1],
        qualities: &[Major, Minor, Minor, Major, Major, Minor, Diminished],
        roman: &["I", "ii", "iii", "IV", "V", "vi", "vii°"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "natural_minor",
        name: "Natural Minor",
        pattern: &[2, 1, 2, 2, 1, 2, 2],
        qualities: &[Minor, Diminished, Major, Minor, Minor, Major, Major],
        roman: &["i", "ii°", "III", "iv", "v", "VI", "VII"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Subtonic"],
    },
    ScaleDef {
        key: "harmonic_minor",
        name: "Harmonic Minor",
        pattern: &[2, 1, 2, 2, 1, 3, 1],
        qualities: &[Minor, Diminished, Augmented, Minor, Major, Major, Diminished],
        roman: &["i", "ii°", "III+", "iv", "V", "VI", "vii°"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "melodic_minor",
        name: "Melodic Minor",
        pattern: &[2, 1, 2, 2, 2, 2, 1],
        qualities: &[Minor, Minor, Augmented, Major, Major, Diminished, Diminished],
        roman: &["i", "ii", "III+", "IV", "V", "vi°", "vii°"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "major_pentatonic",
        name: "Major Pentatonic",
        pattern: &[2, 2, 3, 2, 3],
        qualities: &[Major, Major, Minor, Minor, Major],
        roman: &["I", "II", "iii", "V", "vi"],
        functions: &["Tonic", "Supertonic", "Mediant", "Dominant", "Submediant"],
    },
    ScaleDef {
        key: "minor_pentatonic",
        name: "Minor Pentatonic",
        pattern: &[3, 2, 2, 3, 2],
        qualities: &[Minor, Minor, Major, Major, Minor],
        roman: &["i", "III", "IV", "V", "VII"],
        functions: &["Tonic", "Mediant", "Subdominant", "Dominant", "Subtonic"],
    },
    ScaleDef {
        key: "blues",
        name: "Blues",
        pattern: &[3, 2, 1, 1, 3, 2],
        qualities: &[Minor, Major, Major, Minor, Diminished, Minor],
        roman: &["i", "III", "IV", "IV+", "V", "VII"],
        functions: &["Tonic", "Mediant", "Subdominant", "Augmented Fourth", "Dominant", "Subtonic"],
    },
    ScaleDef {
        key: "dorian",
        name: "Dorian",
        pattern: &[2, 1, 2, 2, 2, 1, 2],
        qualities: &[Minor, Minor, Major, Major, Minor, Diminished, Major],
        roman: &["i", "ii", "III", "IV", "v", "vi°", "VII"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "phrygian",
        name: "Phrygian",
        pattern: &[1, 2, 2, 2, 1, 2, 2],
        qualities: &[Minor, Major, Major, Minor, Diminished, Major, Minor],
        roman: &["i", "II", "III", "iv", "v°", "VI", "VII"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "lydian",
        name: "Lydian",
        pattern: &[2, 2, 2, 1, 2, 2, 1],
        qualities: &[Major, Major, Minor, Diminished, Major, Minor, Minor],
        roman: &["I", "II", "iii", "IV+", "V", "vi", "vii"],
        functions: &["Tonic", "Supertonic", "Mediant", "Augmented Fourth", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "mixolydian",
        name: "Mixolydian",
        pattern: &[2, 2, 1, 2, 2, 1, 2],
        qualities: &[Major, Minor, Diminished, Major, Minor, Minor, Major],
        roman: &["I", "ii", "iii°", "IV", "v", "vi", "VII"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Subtonic"],
    },
    ScaleDef {
        key: "locrian",
        name: "Locrian",
        pattern: &[1, 2, 2, 1, 2, 2, 2],
        qualities: &[Diminished, Major, Minor, Minor, Major, Major, Minor],
        roman: &["i°", "II", "iii", "iv", "V", "VI", "VII"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Diminished Fifth", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "whole_tone",
        name: "Whole Tone",
        pattern: &[2, 2, 2, 2, 2, 2],
        qualities: &[Augmented, Augmented, Augmented, Augmented, Augmented, Augmented],
        roman: &["I+", "II+", "III+", "V", "VI", "VII"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "diminished_half_whole",
        name: "Diminished (Half-Whole)",
        pattern: &[1, 2, 1, 2, 1, 2, 1, 2],
        qualities: &[Diminished, Minor, Minor, Major, Major, Minor, Diminished, Diminished],
        roman: &["i°", "ii", "III", "iv", "V", "VI", "VII", "I"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "diminished_whole_half",
        name: "Diminished (Whole-Half)",
        pattern: &[2, 1, 2, 1, 2, 1, 2, 1],
        qualities: &[Diminished, Diminished, Minor, Major, Minor, Major, Minor, Major],
        roman: &["i°", "II", "iii", "IV", "V", "vi", "vii", "I"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "augmented",
        name: "Augmented",
        pattern: &[3, 1, 3, 1, 3, 1],
        qualities: &[Augmented, Augmented, Augmented, Augmented, Augmented, Augmented],
        roman: &["I+", "II+", "III+", "IV+", "V+", "VI+"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "hungarian_minor",
        name: "Hungarian Minor",
        pattern: &[2, 1, 3, 1, 1, 3, 1],
        qualities: &[Minor, Diminished, Augmented, Major, Major, Minor, Diminished],
        roman: &["i", "ii°", "III+", "IV", "V", "vi", "vii°"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "spanish_phrygian",
        name: "Spanish Phrygian",
        pattern: &[1, 3, 1, 2, 1, 2, 2],
        qualities: &[Major, Diminished, Augmented, Minor, Major, Major, Diminished],
        roman: &["I", "II", "III+", "iv", "V", "VI", "VII"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "neapolitan_major",
        name: "Neapolitan Major",
        pattern: &[1, 2, 2, 2, 2, 2, 1],
        qualities: &[Major, Major, Major, Minor, Minor, Major, Diminished],
        roman: &["I", "II", "III", "IV", "V", "VI", "vii°"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "neapolitan_minor",
        name: "Neapolitan Minor",
        pattern: &[1, 2, 2, 2, 1, 3, 1],
        qualities: &[Minor, Major, Major, Major, Minor, Diminished, Diminished],
        roman: &["i", "II", "III", "IV", "v", "VI", "VII"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "persian",
        name: "Persian",
        pattern: &[1, 3, 1, 2, 1, 3, 1],
        qualities: &[Major, Diminished, Augmented, Minor, Major, Major, Diminished],
        roman: &["I", "II", "iii+", "iv", "V", "VI", "VII"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "hirajoshi",
        name: "Hirajoshi",
        pattern: &[2, 1, 4, 1, 4],
        qualities: &[Minor, Minor, Diminished, Augmented, Augmented],
        roman: &["i", "III", "iv", "vii", "VIII"],
        functions: &["Tonic", "Mediant", "Subdominant", "Dominant", "Leading Tone"],
    },
    ScaleDef {
        key: "in_scale",
        name: "In Scale",
        pattern: &[1, 4, 2, 3, 2],
        qualities: &[Minor, Augmented, Diminished, Major, Major],
        roman: &["i", "iv", "V", "VII", "VIII"],
        functions: &["Tonic", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "enigmatic",
        name: "Enigmatic",
        pattern: &[1, 3, 2, 2, 2, 1, 1],
        qualities: &[Major, Diminished, Augmented, Minor, Major, Major, Diminished],
        roman: &["I", "ii", "III+", "iv", "V", "VI", "VII"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "bebop_major",
        name: "Bebop Major",
        pattern: &[2, 2, 1, 2, 1, 1, 2, 1],
        qualities: &[Major, Major, Minor, Minor, Major, Major, Minor, Diminished],
        roman: &["I", "II", "iii", "IV", "V", "VI", "vii", "VII"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "bebop_dominant",
        name: "Bebop Dominant",
        pattern: &[2, 2, 1, 2, 2, 1, 1, 1],
        qualities: &[Major, Minor, Minor, Major, Major, Minor, Diminished, Major],
        roman: &["I", "ii", "iii", "IV", "V", "VI", "vii°", "VII"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "bebop_minor",
        name: "Bebop Minor",
        pattern: &[2, 1, 2, 2, 1, 1, 2, 1],
        qualities: &[Minor, Minor, Major, Major, Minor, Diminished, Diminished, Major],
        roman: &["i", "ii", "III", "IV", "V", "VI", "VII", "I"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "major_locrian",
        name: "Major Locrian",
        pattern: &[2, 2, 1, 1, 2, 2, 2],
        qualities: &[Major, Minor, Diminished, Minor, Minor, Major, Major],
        roman: &["I", "ii", "iii", "IV", "v", "VI", "VII"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "chorinho_major",
        name: "Chorinho Major",
        pattern: &[2, 2, 1, 2, 2, 2, 1],
        qualities: &[Major, Minor, Diminished, Major, Major, Minor, Diminished],
        roman: &["I", "ii", "iii°", "IV", "V", "vi", "vii°"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "chorinho_harmonic",
        name: "Chorinho Harmonic Minor",
        pattern: &[2, 1, 2, 2, 1, 3, 1],
        qualities: &[Minor, Diminished, Augmented, Minor, Major, Major, Diminished],
        roman: &["i", "ii°", "III+", "iv", "V", "VI", "vii°"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "chorinho_melodic",
        name: "Chorinho Melodic Minor",
        pattern: &[2, 1, 2, 2, 2, 2, 1],
        qualities: &[Minor, Minor, Augmented, Major, Major, Diminished, Diminished],
        roman: &["i", "ii", "III+", "IV", "V", "vi°", "vii°"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "chorinho_diminished",
        name: "Chorinho Diminished",
        pattern: &[2, 1, 2, 1, 2, 1, 2, 1],
        qualities: &[Diminished, Diminished, Diminished, Diminished, Diminished, Diminished, Diminished, Diminished],
        roman: &["i°", "ii°", "iii°", "iv°", "v°", "vi°", "vii°", "viii°"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone", "Octave"],
    },
    ScaleDef {
        key: "chorinho_gypsy",
        name: "Chorinho Gypsy",
        pattern: &[2, 1, 3, 1, 1, 2, 2],
        qualities: &[Minor, Diminished, Augmented, Major, Major, Minor, Minor],
        roman: &["i", "ii°", "III+", "IV", "V", "vi", "vii"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone"],
    },
    ScaleDef {
        key: "chorinho_brazilian",
        name: "Chorinho Brazilian",
        pattern: &[2, 1, 3, 1, 2, 1, 2],
        qualities: &[Major, Diminished, Augmented, Minor, Major, Diminished, Major],
        roman: &["I", "ii°", "III+", "iv", "V", "vi°", "VII"],
        functions: &["Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Subtonic"],
    },
];

pub fn scales() -> &'static [ScaleDef] {
    SCALES
}

pub fn scale_keys() -> impl Iterator<Item = &'static str> {
    SCALES.iter().map(|s| s.key)
}

/// Look up a scale by key ("harmonic_minor"). Case, hyphens and spaces are
/// ignored, so "Harmonic Minor" and "harmonic-minor" work too.
pub fn scale(key: &str) -> Result<&'static ScaleDef, TheoryError> {
    let wanted: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect();
    SCALES
        .iter()
        .find(|s| s.key == wanted)
        .ok_or_else(|| TheoryError::UnknownScale(key.to_string()))
}

/// `ScaleDef::notes` for a scale looked up by key.
pub fn compute_scale(tonic: PitchClass, key: &str) -> Result<Vec<PitchClass>, TheoryError> {
    Ok(scale(key)?.notes(tonic))
}

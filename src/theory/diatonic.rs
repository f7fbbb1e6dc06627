use serde::Serialize;

use super::{ChordQuality, TheoryError, chord_notes, chord_symbol, scale};
use crate::fingering::{FingeringEngine, FretAssignment};
use crate::pitch::PitchClass;
use crate::tuning::TuningEntry;

/// The chord on one degree of a scale, with its fingerings.
#[derive(Debug, Clone, Serialize)]
pub struct DiatonicChord {
    pub degree: &'static str,
    pub function: &'static str,
    pub symbol: String,
    pub quality: ChordQuality,
    pub notes: Vec<PitchClass>,
    pub fingerings: Vec<FretAssignment>,
}

/// Build the chord on every degree of `scale_key` from `tonic`.
///
/// `extensions[i]` applies to degree `i`; missing entries mean a plain
/// triad. Fingerings are only searched when a tuning is given. Flat
/// spellings are used in symbols when `use_flat` is set.
pub fn diatonic_chords(
    tonic: PitchClass,
    scale_key: &str,
    extensions: &[String],
    tuning: Option<&[TuningEntry]>,
    engine: &FingeringEngine,
    use_flat: bool,
) -> Result<Vec<DiatonicChord>, TheoryError> {
    let def = scale(scale_key)?;
    let notes = def.notes(tonic);

    let chords = notes
        .iter()
        .zip(def.qualities)
        .enumerate()
        .map(|(i, (&root, &quality))| {
            let ext = extensions.get(i).map(String::as_str).unwrap_or("");
            let chord = chord_notes(root, quality, ext);
            let fingerings = match tuning {
                Some(t) => engine.compute_fingerings(&chord, t),
                None => Vec::new(),
            };
            DiatonicChord {
                degree: def.roman(i),
                function: def.function(i),
                symbol: chord_symbol(root, quality, ext, use_flat),
                quality,
                notes: chord,
                fingerings,
            }
        })
        .collect();

    Ok(chords)
}

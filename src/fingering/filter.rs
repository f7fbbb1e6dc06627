use std::collections::{BTreeMap, HashSet};

use crate::pitch::PitchClass;
use crate::tuning::TuningEntry;

use super::assignment::FretAssignment;

/// Fret-hand fingers available before a barre is needed.
const FINGERS: usize = 4;

/// Strings at the top of the instrument that must always sound.
const REQUIRED_TOP_STRINGS: usize = 3;

/// Accept or reject a candidate voicing. All of these must hold:
///
/// 1. The lowest sounding string plays the chord's first note.
/// 2. The top three strings all sound.
/// 3. No two strings sound the same pitch (class and octave).
/// 4. Mutes only appear as a leading or trailing run.
/// 5. Pitches rise strictly from string to string.
/// 6. The fretted notes fit four fingers plus at most one barre.
pub fn is_playable(assignment: &FretAssignment, tuning: &[TuningEntry], chord: &[PitchClass]) -> bool {
    let pitches = assignment.produced_pitches(tuning);

    let Some(bass) = pitches.iter().flatten().next() else {
        return false;
    };
    if chord.first() != Some(&bass.class) {
        return false;
    }

    let top_start = pitches.len().saturating_sub(REQUIRED_TOP_STRINGS);
    if pitches[top_start..].iter().any(Option::is_none) {
        return false;
    }

    let mut seen = HashSet::new();
    if !pitches.iter().flatten().all(|p| seen.insert(*p)) {
        return false;
    }

    if has_interior_mute(assignment) {
        return false;
    }

    let sounding: Vec<i32> = pitches.iter().flatten().map(|p| p.value()).collect();
    if sounding.windows(2).any(|w| w[0] >= w[1]) {
        return false;
    }

    fits_hand(assignment)
}

/// A muted string with sounding strings on both sides.
fn has_interior_mute(assignment: &FretAssignment) -> bool {
    let strings = assignment.strings();
    let first = strings.iter().position(|s| !s.is_muted());
    let last = strings.iter().rposition(|s| !s.is_muted());
    match (first, last) {
        (Some(first), Some(last)) => strings[first..=last].iter().any(|s| s.is_muted()),
        _ => false,
    }
}

/// Walk frets from highest to lowest, spending one finger per string.
/// A fret needing as many strings as fingers left becomes the barre; once
/// a barre is down, any lower fret that still needs pressing is
/// unplayable. Open strings sit in the fret-0 group and count like any
/// other fret.
fn fits_hand(assignment: &FretAssignment) -> bool {
    let mut by_fret: BTreeMap<u8, usize> = BTreeMap::new();
    for fret in assignment.strings().iter().filter_map(|s| s.fret()) {
        *by_fret.entry(fret).or_insert(0) += 1;
    }

    let mut available = FINGERS;
    let mut barre_at: Option<u8> = None;
    for (&fret, &count) in by_fret.iter().rev() {
        if barre_at.is_some() {
            return false;
        }
        if count >= available {
            barre_at = Some(fret);
        } else {
            available -= count;
        }
    }
    true
}

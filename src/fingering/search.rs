use crate::pitch::{PitchClass, produced_pitch};
use crate::tuning::TuningEntry;

use super::assignment::{FretAssignment, StringFret};

/// Inclusive fret range searched in one pass. The open string is always
/// considered in addition to the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FretWindow {
    pub min_fret: u8,
    pub max_fret: u8,
}

/// Frets a hand can cover in one position.
pub const WINDOW_WIDTH: u8 = 4;

/// Smallest `max_fret` that yields at least one window.
pub const MIN_MAX_FRET: u8 = WINDOW_WIDTH - 1;

/// Sliding windows from the nut up to `max_fret`, lowest first:
/// [1,3], [1,4], [2,5], ... [max_fret-3, max_fret].
pub fn sweep_windows(max_fret: u8) -> Vec<FretWindow> {
    (MIN_MAX_FRET..=max_fret)
        .map(|max| FretWindow {
            min_fret: if max >= WINDOW_WIDTH { max - (WINDOW_WIDTH - 1) } else { 1 },
            max_fret: max,
        })
        .collect()
}

/// Enumerate every string-by-string assignment within `[min_fret, max_fret]`
/// (plus open strings) whose sounded notes cover all of `chord`.
///
/// Until the chord's first note (the bass) has been placed, strings may only
/// play that note or be muted. Results come out in depth-first order with
/// open < ascending frets < muted at each string.
pub fn generate_candidates_for_span(
    chord: &[PitchClass],
    tuning: &[TuningEntry],
    min_fret: u8,
    max_fret: u8,
) -> Vec<FretAssignment> {
    let Some(&fundamental) = chord.first() else {
        return Vec::new();
    };

    // Chord-tone choices per string don't depend on the path, so build them once
    let choices: Vec<Vec<(u8, PitchClass)>> = tuning
        .iter()
        .map(|entry| string_choices(entry, chord, min_fret, max_fret))
        .collect();

    let mut search = Search {
        chord,
        fundamental,
        choices: &choices,
        current: Vec::with_capacity(tuning.len()),
        sounded: Vec::with_capacity(tuning.len()),
        results: Vec::new(),
    };
    search.descend(false);
    search.results
}

/// Open string first (if in the chord), then each in-chord fret of the window.
fn string_choices(
    entry: &TuningEntry,
    chord: &[PitchClass],
    min_fret: u8,
    max_fret: u8,
) -> Vec<(u8, PitchClass)> {
    let mut out = Vec::new();
    if chord.contains(&entry.class) {
        out.push((0, entry.class));
    }
    for fret in min_fret..=max_fret {
        let class = produced_pitch(entry, fret).class;
        if chord.contains(&class) {
            out.push((fret, class));
        }
    }
    out
}

struct Search<'a> {
    chord: &'a [PitchClass],
    fundamental: PitchClass,
    choices: &'a [Vec<(u8, PitchClass)>],
    current: Vec<StringFret>,
    sounded: Vec<PitchClass>,
    results: Vec<FretAssignment>,
}

impl Search<'_> {
    fn descend(&mut self, fundamental_found: bool) {
        let index = self.current.len();
        if index == self.choices.len() {
            if self.chord.iter().all(|n| self.sounded.contains(n)) {
                self.results.push(FretAssignment(self.current.clone()));
            }
            return;
        }

        let choices = self.choices;
        for &(fret, class) in &choices[index] {
            if !fundamental_found && class != self.fundamental {
                continue;
            }
            self.current.push(StringFret::Fret(fret));
            self.sounded.push(class);
            self.descend(true);
            self.sounded.pop();
            self.current.pop();
        }

        self.current.push(StringFret::Muted);
        self.descend(fundamental_found);
        self.current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{parse_tuning, standard_guitar};
    use PitchClass::*;

    fn strings(results: &[FretAssignment]) -> Vec<String> {
        results.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_sweep_windows() {
        let w = sweep_windows(15);
        assert_eq!(w.len(), 13);
        assert_eq!(w[0], FretWindow { min_fret: 1, max_fret: 3 });
        assert_eq!(w[1], FretWindow { min_fret: 1, max_fret: 4 });
        assert_eq!(w[2], FretWindow { min_fret: 2, max_fret: 5 });
        assert_eq!(w[12], FretWindow { min_fret: 12, max_fret: 15 });
        for win in &w {
            assert!(win.max_fret - win.min_fret < WINDOW_WIDTH);
        }
    }

    #[test]
    fn test_sweep_windows_short_neck() {
        assert!(sweep_windows(2).is_empty());
        assert_eq!(sweep_windows(3), vec![FretWindow { min_fret: 1, max_fret: 3 }]);
    }

    #[test]
    fn test_open_c_is_first_candidate() {
        let results = generate_candidates_for_span(&[C, E, G], &standard_guitar(), 1, 3);
        assert_eq!(results[0].to_string(), "x 3 2 0 1 0");
    }

    #[test]
    fn test_every_candidate_covers_chord() {
        let tuning = standard_guitar();
        let chord = [G, B, D];
        let results = generate_candidates_for_span(&chord, &tuning, 1, 4);
        assert!(!results.is_empty());
        for a in &results {
            let sounded: Vec<PitchClass> = a
                .produced_pitches(&tuning)
                .into_iter()
                .flatten()
                .map(|p| p.class)
                .collect();
            for note in &chord {
                assert!(sounded.contains(note), "{a} misses {note}");
            }
            for class in &sounded {
                assert!(chord.contains(class), "{a} sounds foreign {class}");
            }
        }
    }

    #[test]
    fn test_fundamental_gates_leading_strings() {
        // Every candidate's first sounding string plays the fundamental
        let tuning = standard_guitar();
        let results = generate_candidates_for_span(&[A, C, E], &tuning, 1, 3);
        for a in &results {
            let first = a.produced_pitches(&tuning).into_iter().flatten().next();
            assert_eq!(first.map(|p| p.class), Some(A), "{a}");
        }
    }

    #[test]
    fn test_small_instrument_exhaustive() {
        // Two strings tuned C3 G3, window [1,2]: string 0 offers C(0) only,
        // string 1 offers G(0) only.
        let tuning = parse_tuning("C3, G3").unwrap();
        let results = generate_candidates_for_span(&[C, G], &tuning, 1, 2);
        assert_eq!(strings(&results), vec!["0 0"]);

        let results = generate_candidates_for_span(&[C], &tuning, 1, 2);
        assert_eq!(strings(&results), vec!["0 x"]);
    }

    #[test]
    fn test_muted_then_fundamental_ordering() {
        // C3 string can't play G; G3 string plays G open.
        let tuning = parse_tuning("C3, G3").unwrap();
        let results = generate_candidates_for_span(&[G], &tuning, 1, 2);
        assert_eq!(strings(&results), vec!["x 0"]);
    }

    #[test]
    fn test_empty_chord() {
        assert!(generate_candidates_for_span(&[], &standard_guitar(), 1, 3).is_empty());
    }

    #[test]
    fn test_unreachable_chord() {
        // A single string can never sound three notes
        let tuning = parse_tuning("E2").unwrap();
        assert!(generate_candidates_for_span(&[C, E, G], &tuning, 1, 4).is_empty());
    }
}

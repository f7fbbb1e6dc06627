use std::fmt::Write;

use crate::fingering::{FretAssignment, StringFret};
use crate::pitch::PitchClass;

const WIDTH: f64 = 120.0;
const HEIGHT: f64 = 160.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_LEFT: f64 = 20.0;
const FRETS_SHOWN: u8 = 4;

const STAFF_WIDTH: f64 = 500.0;
const STAFF_HEIGHT: f64 = 100.0;
const STAFF_TOP: f64 = 40.0;
const STAFF_SPACING: f64 = 10.0;
const STAFF_MARGIN: f64 = 10.0;
const CLEF_SPACING: f64 = 30.0;
const NOTE_SPACING: f64 = 40.0;
const LEDGER_HALF_WIDTH: f64 = 10.0;
const STEM_LENGTH: f64 = 25.0;

/// First fret row drawn: 1 when the shape fits the first four frets,
/// otherwise the lowest fretted note.
pub fn display_start_fret(assignment: &FretAssignment) -> u8 {
    let pressed: Vec<u8> = assignment
        .strings()
        .iter()
        .filter_map(|s| s.fret())
        .filter(|&f| f > 0)
        .collect();
    match (pressed.iter().min(), pressed.iter().max()) {
        (Some(&min), Some(&max)) if max > FRETS_SHOWN => min,
        _ => 1,
    }
}

/// Chord box diagram: strings as vertical lines, nut on top, X/O markers
/// above muted/open strings, a dot per fretted note, and the start fret
/// on the left when the shape sits up the neck.
pub fn chord_svg(assignment: &FretAssignment) -> String {
    let strings = assignment.strings();
    let num_strings = strings.len().max(1) as f64;
    let string_spacing = (WIDTH - MARGIN_LEFT) / num_strings;
    let fret_spacing = (HEIGHT - MARGIN_TOP) / FRETS_SHOWN as f64;
    let start = display_start_fret(assignment);
    let string_x = |i: usize| MARGIN_LEFT + i as f64 * string_spacing + string_spacing / 2.0;

    let mut svg = format!(r#"<svg width="{WIDTH}" height="{HEIGHT}" xmlns="http://www.w3.org/2000/svg">"#);

    // write! into a String can't fail
    for i in 0..strings.len() {
        let x = string_x(i);
        let _ = write!(
            svg,
            r#"<line x1="{x}" y1="{MARGIN_TOP}" x2="{x}" y2="{HEIGHT}" stroke="black" stroke-width="1" />"#
        );
    }

    for j in 0..=FRETS_SHOWN {
        let y = MARGIN_TOP + j as f64 * fret_spacing;
        let stroke = if j == 0 { 3 } else { 1 };
        let _ = write!(
            svg,
            r#"<line x1="{MARGIN_LEFT}" y1="{y}" x2="{WIDTH}" y2="{y}" stroke="black" stroke-width="{stroke}" />"#
        );
    }

    let marker_y = MARGIN_TOP - 5.0;
    for (i, s) in strings.iter().enumerate() {
        let x = string_x(i);
        let marker = match s {
            StringFret::Muted => Some(("X", "red")),
            StringFret::Fret(0) => Some(("O", "green")),
            StringFret::Fret(_) => None,
        };
        if let Some((text, color)) = marker {
            let _ = write!(
                svg,
                r#"<text x="{x}" y="{marker_y}" text-anchor="middle" font-size="12" fill="{color}">{text}</text>"#
            );
        }
    }

    let radius = string_spacing / 4.0;
    for (i, s) in strings.iter().enumerate() {
        if let StringFret::Fret(fret) = *s {
            if fret == 0 {
                continue;
            }
            let x = string_x(i);
            let row = fret as f64 - start as f64;
            let y = MARGIN_TOP + (row + 0.5) * fret_spacing;
            let _ = write!(svg, r#"<circle cx="{x}" cy="{y}" r="{radius}" fill="black" />"#);
        }
    }

    if start > 1 {
        let y = MARGIN_TOP + fret_spacing / 2.0;
        let _ = write!(svg, r#"<text x="5" y="{y}" font-size="12" fill="black">{start}</text>"#);
    }

    svg.push_str("</svg>");
    svg
}

/// Notehead height for a natural letter on a treble staff, with C on the
/// first ledger line below.
fn staff_y(letter: char) -> f64 {
    let steps = match letter {
        'C' => 5.0,
        'D' => 4.5,
        'F' => 3.5,
        'G' => 3.0,
        'A' => 2.5,
        'B' => 2.0,
        _ => 4.0,
    };
    STAFF_TOP + steps * STAFF_SPACING
}

/// Treble staff with one quarter note per scale note. The tonic sits at its
/// letter's line or space and every following note climbs one staff step.
/// Notes beyond the staff get ledger lines; sharps and flats are drawn as
/// text before the notehead.
pub fn scale_staff_svg(notes: &[PitchClass], use_flat: bool) -> String {
    let names: Vec<&str> = notes
        .iter()
        .map(|&n| if use_flat { n.flat_name() } else { n.name() })
        .collect();
    let start_y = names
        .first()
        .and_then(|n| n.chars().next())
        .map(staff_y)
        .unwrap_or(STAFF_TOP + 4.0 * STAFF_SPACING);
    let top_line = STAFF_TOP;
    let bottom_line = STAFF_TOP + 4.0 * STAFF_SPACING;
    let note_start_x = STAFF_MARGIN + CLEF_SPACING + 10.0;

    let mut svg = format!(r#"<svg width="{STAFF_WIDTH}" height="{STAFF_HEIGHT}" xmlns="http://www.w3.org/2000/svg">"#);

    let line_end = STAFF_WIDTH - STAFF_MARGIN;
    for i in 0..5 {
        let y = STAFF_TOP + i as f64 * STAFF_SPACING;
        let _ = write!(
            svg,
            r#"<line x1="{STAFF_MARGIN}" y1="{y}" x2="{line_end}" y2="{y}" stroke="black" stroke-width="1" />"#
        );
    }

    for (i, name) in names.iter().enumerate() {
        let cx = note_start_x + i as f64 * NOTE_SPACING;
        let cy = start_y - i as f64 * (STAFF_SPACING / 2.0);

        let ledgers: Vec<f64> = if cy < top_line {
            let count = ((top_line - cy) / STAFF_SPACING).floor() as u32;
            (1..=count).map(|j| top_line - j as f64 * STAFF_SPACING).collect()
        } else if cy > bottom_line {
            let count = ((cy - bottom_line) / STAFF_SPACING).floor() as u32;
            (1..=count).map(|j| bottom_line + j as f64 * STAFF_SPACING).collect()
        } else {
            Vec::new()
        };
        let (x1, x2) = (cx - LEDGER_HALF_WIDTH, cx + LEDGER_HALF_WIDTH);
        for y in ledgers {
            let _ = write!(
                svg,
                r#"<line x1="{x1}" y1="{y}" x2="{x2}" y2="{y}" stroke="black" stroke-width="1" />"#
            );
        }

        let stem_x = cx + 4.0;
        let stem_top = cy - STEM_LENGTH;
        let _ = write!(svg, r#"<circle cx="{cx}" cy="{cy}" r="4" fill="black" />"#);
        let _ = write!(
            svg,
            r#"<line x1="{stem_x}" y1="{cy}" x2="{stem_x}" y2="{stem_top}" stroke="black" stroke-width="1" />"#
        );

        let accidental = &name[1..];
        if !accidental.is_empty() {
            let (tx, ty) = (cx - 12.0, cy + 5.0);
            let _ = write!(
                svg,
                r#"<text x="{tx}" y="{ty}" font-size="14" font-weight="bold" text-anchor="middle">{accidental}</text>"#
            );
        }
    }

    let clef_x = STAFF_MARGIN + 20.0;
    let clef_y = STAFF_TOP + 2.0 * STAFF_SPACING + 10.0;
    let _ = write!(
        svg,
        r#"<text x="{clef_x}" y="{clef_y}" font-size="30" text-anchor="end" font-family="DejaVu Sans, Arial, sans-serif">&#x1D11E;</text>"#
    );

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(s: &str) -> FretAssignment {
        s.parse().unwrap()
    }

    #[test]
    fn test_start_fret_open_position() {
        assert_eq!(display_start_fret(&shape("x 3 2 0 1 0")), 1);
        assert_eq!(display_start_fret(&shape("0 0 0 0 0 0")), 1);
        assert_eq!(display_start_fret(&shape("x x x x x x")), 1);
        assert_eq!(display_start_fret(&shape("x 4 x x x x")), 1);
    }

    #[test]
    fn test_start_fret_up_the_neck() {
        assert_eq!(display_start_fret(&shape("8 10 10 9 8 8")), 8);
        // open strings don't pull the window down
        assert_eq!(display_start_fret(&shape("0 7 9 9 x x")), 7);
    }

    #[test]
    fn test_svg_markers() {
        let svg = chord_svg(&shape("x 3 2 0 1 0"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches(">X</text>").count(), 1);
        assert_eq!(svg.matches(">O</text>").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 3);
        // 6 strings + 5 fret lines
        assert_eq!(svg.matches("<line").count(), 11);
        assert!(svg.contains(r#"stroke-width="3""#));
    }

    #[test]
    fn test_svg_start_fret_label() {
        let svg = chord_svg(&shape("8 10 10 9 8 8"));
        assert!(svg.contains(">8</text>"));
        assert!(!chord_svg(&shape("x 3 2 0 1 0")).contains(r#"<text x="5""#));
    }

    #[test]
    fn test_svg_empty_assignment() {
        let svg = chord_svg(&FretAssignment::default());
        assert_eq!(svg.matches("<line").count(), 5);
        assert_eq!(svg.matches("<circle").count(), 0);
    }

    #[test]
    fn test_staff_one_note_per_scale_note() {
        use PitchClass::*;
        let svg = scale_staff_svg(&[C, D, E, F, G, A, B, C], false);
        assert!(svg.starts_with(r#"<svg width="500" height="100""#));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 8);
        assert!(svg.contains("&#x1D11E;"));
        // 5 staff lines, 8 stems, one ledger under the low C
        assert_eq!(svg.matches("<line").count(), 14);
        assert!(svg.contains(r#"<circle cx="50" cy="90""#));
        assert!(svg.contains(r#"<line x1="40" y1="90" x2="60" y2="90""#));
    }

    #[test]
    fn test_staff_ledger_above() {
        use PitchClass::*;
        // B starts on the middle line; the top A# (y=30) and B (y=25) each
        // get one ledger at y=30
        let svg = scale_staff_svg(&[B, CSharp, DSharp, E, FSharp, GSharp, ASharp, B], false);
        assert!(svg.contains(r#"<line x1="280" y1="30" x2="300" y2="30""#));
        assert!(svg.contains(r#"<line x1="320" y1="30" x2="340" y2="30""#));
        assert_eq!(svg.matches("<line").count(), 5 + 8 + 2);
    }

    #[test]
    fn test_staff_accidentals() {
        use PitchClass::*;
        let d_major = [D, E, FSharp, G, A, B, CSharp, D];
        let sharp = scale_staff_svg(&d_major, false);
        assert_eq!(sharp.matches(">#</text>").count(), 2);
        assert_eq!(sharp.matches(">b</text>").count(), 0);

        let b_flat = [ASharp, C, D, DSharp, F, G, A, ASharp];
        let flat = scale_staff_svg(&b_flat, true);
        assert_eq!(flat.matches(">b</text>").count(), 3);
        assert_eq!(flat.matches(">#</text>").count(), 0);
    }

    #[test]
    fn test_staff_empty_scale() {
        let svg = scale_staff_svg(&[], false);
        assert_eq!(svg.matches("<line").count(), 5);
        assert_eq!(svg.matches("<circle").count(), 0);
    }
}

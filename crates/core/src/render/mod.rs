//! Text rendering for modes and scales.
//!
//! The digit style writes one character per note (`135`), which only works
//! for pitch classes up to 9 and so only for chromatics of at most 9 notes.
//! The spaced style (`(1 3 5)`) has no such limit. The digit cap belongs to
//! rendering alone; the generator itself runs up to the full table ceiling.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::{mode::Mode, mode::Note, CalculatorError, Result};

/// Largest note the digit style can print.
pub const MAX_DIGIT_NOTE: Note = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// One character per note, e.g. `1358`.
    #[default]
    Digits,
    /// Space separated and parenthesised, e.g. `(1 3 5 8)`.
    Spaced,
}

impl RenderStyle {
    /// Whether every mode of a chromatic this size can be printed in the style.
    pub fn supports(self, chromatic_note_count: usize) -> bool {
        match self {
            RenderStyle::Digits => chromatic_note_count <= MAX_DIGIT_NOTE as usize,
            RenderStyle::Spaced => true,
        }
    }

    /// Digits when they can print the chromatic, spaced otherwise.
    pub fn fitting(chromatic_note_count: usize) -> Self {
        if RenderStyle::Digits.supports(chromatic_note_count) {
            RenderStyle::Digits
        } else {
            RenderStyle::Spaced
        }
    }
}

pub fn render_notes(notes: &[Note], style: RenderStyle) -> Result<String> {
    match style {
        RenderStyle::Digits => notes
            .iter()
            .map(|&note| digit(note))
            .collect::<Result<String>>(),
        RenderStyle::Spaced => {
            let notes: Vec<String> = notes.iter().map(ToString::to_string).collect();
            Ok(format!("({})", notes.join(" ")))
        }
    }
}

pub fn write_notes<W: Write>(writer: &mut W, notes: &[Note], style: RenderStyle) -> Result<()> {
    let line = render_notes(notes, style)?;
    writeln!(writer, "{line}")?;
    Ok(())
}

/// Writes a `total <label> count: N` header, one line per view and a blank
/// separator line.
pub fn write_listing<'a, W, I>(
    writer: &mut W,
    label: &str,
    views: I,
    style: RenderStyle,
) -> Result<()>
where
    W: Write,
    I: ExactSizeIterator<Item = Mode<'a>>,
{
    writeln!(writer, "total {label} count: {}", views.len())?;
    for view in views {
        write_notes(writer, view.notes(), style)?;
    }
    writeln!(writer)?;
    Ok(())
}

fn digit(note: Note) -> Result<char> {
    if note > MAX_DIGIT_NOTE {
        return Err(CalculatorError::NotRenderable {
            note: note as usize,
        });
    }
    Ok(char::from(b'0' + note))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_both_styles() {
        assert_eq!(render_notes(&[1, 3, 5, 8], RenderStyle::Digits).unwrap(), "1358");
        assert_eq!(
            render_notes(&[1, 3, 5, 8], RenderStyle::Spaced).unwrap(),
            "(1 3 5 8)"
        );
    }

    #[test]
    fn digits_refuse_two_digit_notes() {
        let err = render_notes(&[1, 6, 8, 12], RenderStyle::Digits).unwrap_err();
        assert!(matches!(err, CalculatorError::NotRenderable { note: 12 }));
        assert_eq!(
            render_notes(&[1, 6, 8, 12], RenderStyle::Spaced).unwrap(),
            "(1 6 8 12)"
        );
    }

    #[test]
    fn style_support_tracks_digit_cap() {
        assert!(RenderStyle::Digits.supports(9));
        assert!(!RenderStyle::Digits.supports(10));
        assert!(RenderStyle::Spaced.supports(24));
        assert_eq!(RenderStyle::fitting(9), RenderStyle::Digits);
        assert_eq!(RenderStyle::fitting(10), RenderStyle::Spaced);
    }

    #[test]
    fn writes_listing_with_header() {
        let notes: [Note; 6] = [1, 2, 1, 3, 1, 4];
        let views = notes.chunks_exact(2).map(|mode| Mode::new(mode, 4).unwrap());
        let mut out = Vec::new();
        write_listing(&mut out, "mode", views, RenderStyle::Digits).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "total mode count: 3\n12\n13\n14\n\n"
        );
    }

    #[test]
    fn style_names_are_lowercase() {
        let style: RenderStyle = serde_json::from_str("\"spaced\"").unwrap();
        assert_eq!(style, RenderStyle::Spaced);
        assert_eq!(serde_json::to_string(&RenderStyle::Digits).unwrap(), "\"digits\"");
    }
}

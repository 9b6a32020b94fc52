//! Modes and their rotations.
//!
//! A mode is an increasing run of pitch classes that always starts at 1, so
//! every key shares one representation:
//!
//! - `(1 3 5)` is a three note mode of any chromatic with 5 or more notes
//! - `(1 6 8 12)` is a four note mode of any chromatic with 12 or more notes
//!
//! Rotating a mode moves its first note past the octave (adding the chromatic
//! size) and rebases the result so it starts at 1 again. In a 12 note
//! chromatic the rotations of `(1 3 5)` are `(1 3 5)`, `(1 3 11)` and
//! `(1 9 11)`. A scale is the rotation class as a whole, represented by its
//! lexicographically smallest member.

use std::{fmt, ops::Index};

use crate::{
    tables::{ChromaticSize, MAX_CHROMATIC_NOTE_COUNT},
    CalculatorError, Result,
};

/// Pitch class label. Rotations reach at most twice the chromatic size before
/// rebasing, which stays well inside a byte.
pub type Note = u8;

/// Read-only view over one mode, tied to the chromatic it was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mode<'a> {
    notes: &'a [Note],
    chromatic: ChromaticSize,
}

/// A scale is the mode the reducer selected for its rotation class.
pub type Scale<'a> = Mode<'a>;

impl<'a> Mode<'a> {
    /// Wraps caller supplied notes after checking the mode invariant against
    /// a chromatic of `chromatic_note_count` notes.
    pub fn new(notes: &'a [Note], chromatic_note_count: usize) -> Result<Self> {
        let chromatic = ChromaticSize::new(chromatic_note_count)?;
        check_mode(notes, chromatic)?;
        Ok(Self { notes, chromatic })
    }

    /// Views notes written by the generator, which are valid by construction.
    pub(crate) fn from_generated(notes: &'a [Note], chromatic: ChromaticSize) -> Self {
        debug_assert!(check_mode(notes, chromatic).is_ok());
        Self { notes, chromatic }
    }

    pub fn notes(&self) -> &'a [Note] {
        self.notes
    }

    pub fn chromatic(&self) -> ChromaticSize {
        self.chromatic
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn note(&self, index: usize) -> Option<Note> {
        self.notes.get(index).copied()
    }

    /// All rotations of the mode, starting with the mode itself.
    pub fn rotations(&self) -> Vec<Vec<Note>> {
        self.scratch().iter().map(<[Note]>::to_vec).collect()
    }

    /// Whether no rotation of the mode is lexicographically smaller than it.
    pub fn is_scale(&self) -> bool {
        is_scale(self.notes, &self.scratch())
    }

    /// The smallest rotation, i.e. the scale this mode belongs to.
    pub fn canonical(&self) -> Vec<Note> {
        self.scratch()
            .iter()
            .min()
            .map(<[Note]>::to_vec)
            .unwrap_or_default()
    }

    fn scratch(&self) -> Rotations {
        let mut rotations = Rotations::new();
        rotations.refill(self.notes, self.chromatic);
        rotations
    }
}

impl Index<usize> for Mode<'_> {
    type Output = Note;

    fn index(&self, index: usize) -> &Note {
        &self.notes[index]
    }
}

impl fmt::Display for Mode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (index, note) in self.notes.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{note}")?;
        }
        f.write_str(")")
    }
}

/// Checks that `notes` is a mode of `chromatic`: between 1 and `N` notes,
/// starting on 1, strictly increasing and never above `N`.
pub(crate) fn check_mode(notes: &[Note], chromatic: ChromaticSize) -> Result<()> {
    if notes.is_empty() {
        return Err(CalculatorError::InvalidMode("a mode needs at least one note"));
    }
    chromatic.tier(notes.len())?;
    if notes[0] != 1 {
        return Err(CalculatorError::InvalidMode("a mode must start on note 1"));
    }
    if notes.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(CalculatorError::InvalidMode(
            "mode notes must be strictly increasing",
        ));
    }
    if notes.iter().any(|&note| note as usize > chromatic.note_count()) {
        return Err(CalculatorError::InvalidMode(
            "mode notes must lie inside the chromatic",
        ));
    }
    Ok(())
}

/// Writes the rotation that follows `previous` into the front of `out`: the
/// first note moves to the end raised by an octave, then every note is
/// rebased so the rotation starts at 1.
///
/// `previous` must be a mode of the chromatic and `out` must hold at least
/// as many notes; the rotation is again a mode of the same chromatic.
pub fn next_rotation(
    previous: &[Note],
    chromatic_note_count: usize,
    out: &mut [Note],
) -> Result<()> {
    let chromatic = ChromaticSize::new(chromatic_note_count)?;
    check_mode(previous, chromatic)?;
    let len = previous.len();
    check_room(len, out)?;
    rotate(previous, chromatic, &mut out[..len]);
    Ok(())
}

/// Writes all `k` rotations of a length-`k` mode back to back into `out`,
/// which must hold at least `k * k` notes. Rotation 0 is the mode itself.
pub fn fill_rotations(
    mode: &[Note],
    chromatic_note_count: usize,
    out: &mut [Note],
) -> Result<()> {
    let chromatic = ChromaticSize::new(chromatic_note_count)?;
    check_mode(mode, chromatic)?;
    let len = mode.len();
    check_room(len * len, out)?;
    rotate_all(mode, chromatic, &mut out[..len * len]);
    Ok(())
}

/// Whether `mode` beats or ties every one of its rotations. The first entry of
/// `rotations` is the identity and is skipped, otherwise nothing would pass.
/// Rotations filled from a different mode never qualify.
pub fn is_scale(mode: &[Note], rotations: &Rotations) -> bool {
    if rotations.get(0) != Some(mode) {
        return false;
    }
    // every rotation starts at 1, so comparison begins at the second note
    rotations
        .iter()
        .skip(1)
        .all(|rotation| rotation[1..] >= mode[1..])
}

fn check_room(required: usize, out: &[Note]) -> Result<()> {
    if out.len() < required {
        return Err(CalculatorError::BufferTooSmall {
            required,
            actual: out.len(),
        });
    }
    Ok(())
}

// `previous` is a checked mode of `chromatic`, so the octave sum stays at or
// below 2N and the rebase never goes under 1
fn rotate(previous: &[Note], chromatic: ChromaticSize, out: &mut [Note]) {
    let len = previous.len();
    out[..len - 1].copy_from_slice(&previous[1..]);
    out[len - 1] = previous[0] + chromatic.note_count() as Note;

    let shift = out[0] - 1;
    for note in out.iter_mut() {
        *note -= shift;
    }
}

fn rotate_all(mode: &[Note], chromatic: ChromaticSize, out: &mut [Note]) {
    let len = mode.len();
    out[..len].copy_from_slice(mode);
    for start in (len..len * len).step_by(len) {
        let (done, rest) = out.split_at_mut(start);
        rotate(&done[start - len..], chromatic, &mut rest[..len]);
    }
}

/// Fixed scratch space for the rotations of one mode, sized for the largest
/// chromatic so it can live on the stack and be refilled for every mode of a
/// tier without allocating.
#[derive(Clone)]
pub struct Rotations {
    notes: [Note; MAX_CHROMATIC_NOTE_COUNT * MAX_CHROMATIC_NOTE_COUNT],
    mode_note_count: usize,
}

impl Rotations {
    pub fn new() -> Self {
        Self {
            notes: [0; MAX_CHROMATIC_NOTE_COUNT * MAX_CHROMATIC_NOTE_COUNT],
            mode_note_count: 0,
        }
    }

    /// Replaces the current contents with the rotations of `mode`. On error
    /// the scratch is left empty.
    pub fn fill(&mut self, mode: &[Note], chromatic_note_count: usize) -> Result<()> {
        self.mode_note_count = 0;
        let chromatic = ChromaticSize::new(chromatic_note_count)?;
        check_mode(mode, chromatic)?;
        self.refill(mode, chromatic);
        Ok(())
    }

    /// [`fill`](Self::fill) for a mode already checked against `chromatic`.
    pub(crate) fn refill(&mut self, mode: &[Note], chromatic: ChromaticSize) {
        let len = mode.len();
        self.mode_note_count = len;
        rotate_all(mode, chromatic, &mut self.notes[..len * len]);
    }

    pub fn len(&self) -> usize {
        self.mode_note_count
    }

    pub fn is_empty(&self) -> bool {
        self.mode_note_count == 0
    }

    pub fn get(&self, index: usize) -> Option<&[Note]> {
        (index < self.mode_note_count).then(|| {
            let start = index * self.mode_note_count;
            &self.notes[start..start + self.mode_note_count]
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Note]> {
        let len = self.mode_note_count;
        // chunks_exact panics on zero
        self.notes[..len * len].chunks_exact(len.max(1)).take(len)
    }
}

impl Default for Rotations {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Rotations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode_tier::generate_mode_tier;

    fn rotations_of(mode: &[Note], chromatic_note_count: usize) -> Vec<Vec<Note>> {
        Mode::new(mode, chromatic_note_count).unwrap().rotations()
    }

    #[test]
    fn rotates_triad_in_twelve_notes() {
        assert_eq!(
            rotations_of(&[1, 3, 5], 12),
            vec![vec![1, 3, 5], vec![1, 3, 11], vec![1, 9, 11]]
        );

        let mut scratch = Rotations::new();
        scratch.fill(&[1, 3, 5], 12).unwrap();
        assert_eq!(scratch.len(), 3);
        assert_eq!(scratch.get(2), Some(&[1, 9, 11][..]));
        assert_eq!(scratch.get(3), None);
    }

    #[test]
    fn rotates_diatonic_into_church_modes() {
        let rotations = rotations_of(&[1, 3, 5, 6, 8, 10, 12], 12);
        assert_eq!(rotations.len(), 7);
        // dorian, then locrian as the last rotation
        assert_eq!(rotations[1], vec![1, 3, 4, 6, 8, 10, 11]);
        assert_eq!(rotations[6], vec![1, 2, 4, 6, 7, 9, 11]);
    }

    #[test]
    fn rotating_k_times_returns_every_mode() {
        for n in 1..=10 {
            for k in 1..=n {
                let tier = generate_mode_tier(n, k).unwrap();
                for mode in tier.chunks_exact(k) {
                    let mut current = mode.to_vec();
                    let mut next = vec![0; k];
                    for _ in 0..k {
                        next_rotation(&current, n, &mut next).unwrap();
                        std::mem::swap(&mut current, &mut next);
                    }
                    assert_eq!(current, mode, "n={n} k={k}");

                    let mut all = vec![0; k * k];
                    fill_rotations(mode, n, &mut all).unwrap();
                    assert_eq!(&all[..k], mode);
                }
            }
        }
    }

    #[test]
    fn full_chromatic_rotates_onto_itself() {
        for n in 1..=MAX_CHROMATIC_NOTE_COUNT {
            let notes: Vec<Note> = (1..=n as Note).collect();
            let mode = Mode::new(&notes, n).unwrap();
            assert!(mode.rotations().iter().all(|rotation| rotation == &notes));
            assert!(mode.is_scale());
        }
    }

    #[test]
    fn scale_test_skips_the_identity_rotation() {
        let triad = Mode::new(&[1, 3, 5], 12).unwrap();
        assert!(triad.is_scale());
        assert!(!Mode::new(&[1, 3, 11], 12).unwrap().is_scale());
        assert!(!Mode::new(&[1, 9, 11], 12).unwrap().is_scale());

        // symmetric: every rotation equals the mode
        assert!(Mode::new(&[1, 4, 7, 10], 12).unwrap().is_scale());
        assert!(Mode::new(&[1], 12).unwrap().is_scale());
    }

    #[test]
    fn scale_test_needs_rotations_of_the_same_mode() {
        let mut scratch = Rotations::new();
        assert!(!is_scale(&[1, 3, 5], &scratch));
        scratch.fill(&[1, 9, 11], 12).unwrap();
        assert!(!is_scale(&[1, 3, 5], &scratch));
        assert!(!is_scale(&[], &scratch));
    }

    #[test]
    fn canonical_picks_smallest_rotation() {
        let mode = Mode::new(&[1, 9, 11], 12).unwrap();
        assert_eq!(mode.canonical(), vec![1, 3, 5]);
        assert_eq!(mode.chromatic().note_count(), 12);
    }

    #[test]
    fn rejects_invalid_modes() {
        assert!(matches!(
            Mode::new(&[], 12),
            Err(CalculatorError::InvalidMode(_))
        ));
        assert!(Mode::new(&[2, 3], 12).is_err());
        assert!(Mode::new(&[1, 3, 3], 12).is_err());
        assert!(Mode::new(&[1, 5, 4], 12).is_err());
        assert!(Mode::new(&[1, 13], 12).is_err());
        assert!(matches!(
            Mode::new(&[1, 2, 3, 4], 3),
            Err(CalculatorError::ModeNoteCount { .. })
        ));
        assert!(matches!(
            Mode::new(&[1], 25),
            Err(CalculatorError::ChromaticNoteCount { .. })
        ));
    }

    #[test]
    fn rotation_helpers_reject_bad_input() {
        let mut out = [0; 4];
        // (1 9) lies outside a 5 note chromatic
        assert!(matches!(
            next_rotation(&[1, 9], 5, &mut out),
            Err(CalculatorError::InvalidMode(_))
        ));
        assert!(matches!(
            next_rotation(&[1, 3], 256, &mut out),
            Err(CalculatorError::ChromaticNoteCount { count: 256, .. })
        ));
        assert!(matches!(
            next_rotation(&[0, 0, 0], 12, &mut out),
            Err(CalculatorError::InvalidMode(_))
        ));
        assert!(matches!(
            next_rotation(&[1, 3, 5], 12, &mut out[..2]),
            Err(CalculatorError::BufferTooSmall {
                required: 3,
                actual: 2
            })
        ));
        assert!(matches!(
            fill_rotations(&[1, 3, 5], 12, &mut out),
            Err(CalculatorError::BufferTooSmall {
                required: 9,
                actual: 4
            })
        ));
        assert!(fill_rotations(&[1, 3, 5], 0, &mut [0; 9]).is_err());

        let long: Vec<Note> = (1..=25).collect();
        let mut scratch = Rotations::new();
        scratch.fill(&[1, 3, 5], 12).unwrap();
        assert!(matches!(
            scratch.fill(&long, 24),
            Err(CalculatorError::ModeNoteCount { .. })
        ));
        assert!(scratch.is_empty());
    }

    #[test]
    fn next_rotation_writes_only_the_front() {
        let mut out = [0; 5];
        next_rotation(&[1, 3, 5], 12, &mut out).unwrap();
        assert_eq!(out, [1, 3, 11, 0, 0]);
    }

    #[test]
    fn displays_spaced_notes() {
        let mode = Mode::new(&[1, 6, 8, 12], 12).unwrap();
        assert_eq!(mode.to_string(), "(1 6 8 12)");
        assert_eq!(mode[2], 8);
        assert_eq!(mode.note(4), None);
    }
}

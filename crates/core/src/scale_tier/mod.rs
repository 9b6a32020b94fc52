//! Scale tier reduction.
//!
//! Modes arrive in lexicographic order, so the first member of a rotation
//! class that the scan meets is always the smallest one. A mode is therefore
//! the scale of its class exactly when none of its rotations is smaller than
//! it, and that can be decided from the mode alone: no set of seen scales is
//! kept and no lookups are made. The cost is `O(m * k^2)` for a tier of `m`
//! modes with a single `k * k` scratch reused for every mode.

use crate::{
    mode::{check_mode, is_scale, Note, Rotations, Scale},
    tables::ChromaticSize,
    CalculatorError, Result,
};

/// The scales of one tier, stored as indices of modes within that tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleTier {
    chromatic: ChromaticSize,
    mode_note_count: usize,
    mode_indices: Vec<usize>,
}

impl ScaleTier {
    pub fn mode_note_count(&self) -> usize {
        self.mode_note_count
    }

    pub fn scale_count(&self) -> usize {
        self.mode_indices.len()
    }

    /// Positions of the selected modes within their tier, ascending.
    pub fn mode_indices(&self) -> &[usize] {
        &self.mode_indices
    }

    /// Resolves the scales against the notes of the tier they were reduced from.
    pub fn scales<'a>(
        &'a self,
        tier_notes: &'a [Note],
    ) -> impl ExactSizeIterator<Item = Scale<'a>> + 'a {
        let len = self.mode_note_count;
        let chromatic = self.chromatic;
        self.mode_indices.iter().map(move |&index| {
            Scale::from_generated(&tier_notes[index * len..(index + 1) * len], chromatic)
        })
    }
}

/// Selects the scales of a tier filled by
/// [`fill_mode_tier`](crate::mode_tier::fill_mode_tier).
///
/// The result keeps the tier's order, so each scale appears where its rotation
/// class was first met. Every mode is checked against the chromatic before it
/// is rotated, and the first one that is not a mode fails the whole tier.
pub fn reduce_mode_tier(
    chromatic_note_count: usize,
    mode_note_count: usize,
    modes: &[Note],
) -> Result<ScaleTier> {
    let chromatic = ChromaticSize::new(chromatic_note_count)?;
    let required = chromatic.tier(mode_note_count)?.note_count();
    if modes.len() < required {
        return Err(CalculatorError::BufferTooSmall {
            required,
            actual: modes.len(),
        });
    }

    let mut rotations = Rotations::new();
    let mut mode_indices = Vec::new();
    for (index, mode) in modes[..required].chunks_exact(mode_note_count).enumerate() {
        check_mode(mode, chromatic)?;
        rotations.refill(mode, chromatic);
        if is_scale(mode, &rotations) {
            mode_indices.push(index);
        }
    }

    Ok(ScaleTier {
        chromatic,
        mode_note_count,
        mode_indices,
    })
}

//! Mode tier generation.
//!
//! A tier holds every mode of one length `k`. Modes are produced directly in
//! lexicographic order by treating the mode as a row of counters: the last
//! place runs up to the chromatic size, and every other place may only grow
//! while it stays below its right hand neighbour. That keeps each mode
//! strictly increasing, so we get combinations rather than permutations. The
//! first place is pinned to 1 because only one key is ever enumerated.

use std::ops::Range;

use crate::{
    mode::{Mode, Note},
    tables::{ChromaticSize, TierSize, MAX_CHROMATIC_NOTE_COUNT},
    CalculatorError, Result,
};

/// Allocation free cursor over the modes of one tier.
#[derive(Debug, Clone)]
pub struct ModeCursor {
    notes: [Note; MAX_CHROMATIC_NOTE_COUNT],
    mode_note_count: usize,
    chromatic_note_count: Note,
}

impl ModeCursor {
    /// Positions the cursor on the first mode, `1, 2, ..., k`.
    pub fn new(tier: TierSize) -> Self {
        let mut notes = [0; MAX_CHROMATIC_NOTE_COUNT];
        for (index, note) in notes[..tier.mode_note_count()].iter_mut().enumerate() {
            *note = index as Note + 1;
        }

        Self {
            notes,
            mode_note_count: tier.mode_note_count(),
            chromatic_note_count: tier.chromatic().note_count() as Note,
        }
    }

    pub fn current(&self) -> &[Note] {
        &self.notes[..self.mode_note_count]
    }

    /// Steps to the next mode in lexicographic order. Returns `false` once the
    /// tier is exhausted, leaving the last mode in place.
    pub fn advance(&mut self) -> bool {
        let last = self.mode_note_count - 1;
        if last == 0 {
            return false;
        }

        if self.notes[last] < self.chromatic_note_count {
            self.notes[last] += 1;
            return true;
        }

        // carry into the nearest place that still has room below its neighbour
        for index in (1..last).rev() {
            if self.notes[index] + 1 < self.notes[index + 1] {
                self.notes[index] += 1;
                for reset in index + 1..=last {
                    self.notes[reset] = self.notes[reset - 1] + 1;
                }
                return true;
            }
        }

        false
    }
}

/// Writes every length-`mode_note_count` mode of the chromatic into `dest`,
/// back to back in lexicographic order, and returns how many were written.
///
/// `dest` must hold at least `k * C(N - 1, k - 1)` notes; a shorter buffer is
/// rejected before anything is written.
pub fn fill_mode_tier(
    chromatic_note_count: usize,
    mode_note_count: usize,
    dest: &mut [Note],
) -> Result<usize> {
    let tier = ChromaticSize::new(chromatic_note_count)?.tier(mode_note_count)?;
    let required = tier.note_count();
    if dest.len() < required {
        return Err(CalculatorError::BufferTooSmall {
            required,
            actual: dest.len(),
        });
    }

    let mut cursor = ModeCursor::new(tier);
    let mut written = 0;
    for slot in dest[..required].chunks_exact_mut(mode_note_count) {
        slot.copy_from_slice(cursor.current());
        written += 1;
        if !cursor.advance() {
            break;
        }
    }

    debug_assert_eq!(written, tier.mode_count());
    Ok(written)
}

/// Owned convenience around [`fill_mode_tier`].
pub fn generate_mode_tier(
    chromatic_note_count: usize,
    mode_note_count: usize,
) -> Result<Vec<Note>> {
    let tier = ChromaticSize::new(chromatic_note_count)?.tier(mode_note_count)?;
    let mut notes = vec![0; tier.note_count()];
    fill_mode_tier(chromatic_note_count, mode_note_count, &mut notes)?;
    Ok(notes)
}

/// Location of one tier's modes inside the chromatic buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTier {
    chromatic: ChromaticSize,
    mode_note_count: usize,
    mode_count: usize,
    offset: usize,
}

impl ModeTier {
    pub fn new(tier: TierSize) -> Self {
        Self {
            chromatic: tier.chromatic(),
            mode_note_count: tier.mode_note_count(),
            mode_count: tier.mode_count(),
            offset: tier.offset(),
        }
    }

    pub fn mode_note_count(&self) -> usize {
        self.mode_note_count
    }

    pub fn mode_count(&self) -> usize {
        self.mode_count
    }

    /// Range of the chromatic buffer owned by this tier.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.mode_count * self.mode_note_count
    }

    /// Iterates the tier's modes out of the chromatic buffer.
    pub fn modes<'a>(
        &self,
        buffer: &'a [Note],
    ) -> impl ExactSizeIterator<Item = Mode<'a>> + 'a {
        let chromatic = self.chromatic;
        buffer[self.range()]
            .chunks_exact(self.mode_note_count)
            .map(move |notes| Mode::from_generated(notes, chromatic))
    }
}

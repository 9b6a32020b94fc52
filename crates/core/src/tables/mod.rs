//! Tier size tables.
//!
//! Every buffer size and tier offset used by the generator is looked up here
//! instead of being recomputed at runtime. The tables are evaluated by the
//! compiler from Pascal's rule, so they can never drift from the closed forms:
//!
//! - `TIER_MODE_COUNTS[n - 1][k - 1]` is `C(n - 1, k - 1)`
//! - `TIER_MODE_NOTE_COUNTS[n - 1][k - 1]` is `k * C(n - 1, k - 1)`
//! - `CHROMATIC_MODE_COUNTS[n - 1]` is `2^(n - 1)`
//! - `CHROMATIC_MODE_NOTE_COUNTS[n - 1]` is the row sum of the note counts

use crate::{CalculatorError, Result};

/// Largest supported chromatic. Mode counts double with every extra note, and
/// the full 24 note chromatic already needs about 100 million notes of storage.
pub const MAX_CHROMATIC_NOTE_COUNT: usize = 24;

const MAX: usize = MAX_CHROMATIC_NOTE_COUNT;

pub const TIER_MODE_COUNTS: [[usize; MAX]; MAX] = build_tier_mode_counts();
pub const TIER_MODE_NOTE_COUNTS: [[usize; MAX]; MAX] = build_tier_mode_note_counts();
pub const CHROMATIC_MODE_COUNTS: [usize; MAX] = build_chromatic_mode_counts();
pub const CHROMATIC_MODE_NOTE_COUNTS: [usize; MAX] = build_chromatic_mode_note_counts();

/// Row `n` holds `C(n, 0..=n)`.
const fn build_tier_mode_counts() -> [[usize; MAX]; MAX] {
    let mut table = [[0; MAX]; MAX];
    let mut n = 0;
    while n < MAX {
        table[n][0] = 1;
        let mut k = 1;
        while k <= n {
            let right = if k < n { table[n - 1][k] } else { 0 };
            table[n][k] = table[n - 1][k - 1] + right;
            k += 1;
        }
        n += 1;
    }
    table
}

const fn build_tier_mode_note_counts() -> [[usize; MAX]; MAX] {
    let counts = build_tier_mode_counts();
    let mut table = [[0; MAX]; MAX];
    let mut n = 0;
    while n < MAX {
        let mut k = 0;
        while k <= n {
            table[n][k] = counts[n][k] * (k + 1);
            k += 1;
        }
        n += 1;
    }
    table
}

const fn build_chromatic_mode_counts() -> [usize; MAX] {
    let mut table = [0; MAX];
    let mut n = 0;
    while n < MAX {
        table[n] = 1 << n;
        n += 1;
    }
    table
}

const fn build_chromatic_mode_note_counts() -> [usize; MAX] {
    let note_counts = build_tier_mode_note_counts();
    let mut table = [0; MAX];
    let mut n = 0;
    while n < MAX {
        let mut k = 0;
        while k <= n {
            table[n] += note_counts[n][k];
            k += 1;
        }
        n += 1;
    }
    table
}

/// A validated chromatic size, `1..=MAX_CHROMATIC_NOTE_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChromaticSize(usize);

impl ChromaticSize {
    pub fn new(chromatic_note_count: usize) -> Result<Self> {
        if (1..=MAX_CHROMATIC_NOTE_COUNT).contains(&chromatic_note_count) {
            Ok(Self(chromatic_note_count))
        } else {
            Err(CalculatorError::ChromaticNoteCount {
                count: chromatic_note_count,
                max: MAX_CHROMATIC_NOTE_COUNT,
            })
        }
    }

    /// Number of pitch classes, `N`.
    pub fn note_count(self) -> usize {
        self.0
    }

    /// Total modes across every tier, `2^(N - 1)`.
    pub fn mode_count(self) -> usize {
        CHROMATIC_MODE_COUNTS[self.0 - 1]
    }

    /// Notes needed to store every mode of every tier.
    pub fn mode_note_count(self) -> usize {
        CHROMATIC_MODE_NOTE_COUNTS[self.0 - 1]
    }

    pub fn tier(self, mode_note_count: usize) -> Result<TierSize> {
        if (1..=self.0).contains(&mode_note_count) {
            Ok(TierSize {
                chromatic: self,
                mode_note_count,
            })
        } else {
            Err(CalculatorError::ModeNoteCount {
                mode_note_count,
                chromatic_note_count: self.0,
            })
        }
    }

    /// Every tier in ascending mode length.
    pub fn tiers(self) -> impl Iterator<Item = TierSize> {
        (1..=self.0).map(move |mode_note_count| TierSize {
            chromatic: self,
            mode_note_count,
        })
    }
}

/// Size information for the tier of length-`k` modes of a chromatic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TierSize {
    chromatic: ChromaticSize,
    mode_note_count: usize,
}

impl TierSize {
    pub fn chromatic(self) -> ChromaticSize {
        self.chromatic
    }

    /// Length `k` of every mode in the tier.
    pub fn mode_note_count(self) -> usize {
        self.mode_note_count
    }

    /// Modes in the tier, `C(N - 1, k - 1)`.
    pub fn mode_count(self) -> usize {
        TIER_MODE_COUNTS[self.chromatic.0 - 1][self.mode_note_count - 1]
    }

    /// Notes the tier occupies in the chromatic buffer.
    pub fn note_count(self) -> usize {
        TIER_MODE_NOTE_COUNTS[self.chromatic.0 - 1][self.mode_note_count - 1]
    }

    /// Start of the tier inside the chromatic buffer; tiers are laid out
    /// contiguously in ascending `k`.
    pub fn offset(self) -> usize {
        TIER_MODE_NOTE_COUNTS[self.chromatic.0 - 1][..self.mode_note_count - 1]
            .iter()
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binomial(n: u128, k: u128) -> u128 {
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    #[test]
    fn tier_counts_match_binomials() {
        for n in 1..=MAX {
            for k in 1..=n {
                let expected = binomial(n as u128 - 1, k as u128 - 1) as usize;
                assert_eq!(TIER_MODE_COUNTS[n - 1][k - 1], expected, "n={n} k={k}");
                assert_eq!(TIER_MODE_NOTE_COUNTS[n - 1][k - 1], expected * k);
            }
            for k in n + 1..=MAX {
                assert_eq!(TIER_MODE_COUNTS[n - 1][k - 1], 0);
            }
        }
    }

    #[test]
    fn chromatic_totals_match_closed_forms() {
        for n in 1..=MAX {
            let size = ChromaticSize::new(n).unwrap();
            let modes: usize = size.tiers().map(TierSize::mode_count).sum();
            assert_eq!(size.mode_count(), 1 << (n - 1));
            assert_eq!(modes, size.mode_count());

            // sum of k * C(n - 1, k - 1) is (n + 1) * 2^(n - 2)
            let expected_notes = if n == 1 { 1 } else { (n + 1) << (n - 2) };
            assert_eq!(size.mode_note_count(), expected_notes);
        }
        assert_eq!(CHROMATIC_MODE_COUNTS[11], 2048);
        assert_eq!(CHROMATIC_MODE_NOTE_COUNTS[MAX - 1], 104_857_600);
    }

    #[test]
    fn offsets_partition_the_buffer() {
        let size = ChromaticSize::new(12).unwrap();
        let mut expected = 0;
        for tier in size.tiers() {
            assert_eq!(tier.offset(), expected);
            expected += tier.note_count();
        }
        assert_eq!(expected, size.mode_note_count());
    }

    #[test]
    fn rejects_out_of_range_sizes() {
        assert!(matches!(
            ChromaticSize::new(0),
            Err(CalculatorError::ChromaticNoteCount { count: 0, .. })
        ));
        assert!(ChromaticSize::new(MAX + 1).is_err());

        let size = ChromaticSize::new(5).unwrap();
        assert!(size.tier(0).is_err());
        assert!(size.tier(6).is_err());
        assert_eq!(size.tier(5).unwrap().mode_count(), 1);
    }
}

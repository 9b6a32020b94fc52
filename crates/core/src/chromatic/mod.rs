//! Chromatic construction.
//!
//! A chromatic owns a single buffer large enough for every mode of every
//! tier, laid out tier after tier in ascending mode length. Tiers never read
//! each other, so the buffer is split into disjoint mutable regions up front
//! and each region is handed to its own task, which generates the tier's modes
//! and then reduces them to scales. Construction returns only after every task
//! has finished; a failing task fails the whole chromatic.

use std::{fmt, time::Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::CalculatorConfig,
    mode::{Mode, Note, Scale},
    mode_tier::{fill_mode_tier, ModeTier},
    scale_tier::{reduce_mode_tier, ScaleTier},
    tables::ChromaticSize,
    CalculatorError, Result,
};

/// Every mode and scale of a chromatic, immutable once built.
pub struct Chromatic {
    size: ChromaticSize,
    notes: Box<[Note]>,
    mode_tiers: Vec<ModeTier>,
    scale_tiers: Vec<ScaleTier>,
}

impl Chromatic {
    /// Builds the chromatic with one worker per tier.
    pub fn new(chromatic_note_count: usize) -> Result<Self> {
        Self::with_config(&CalculatorConfig {
            chromatic_note_count,
            ..CalculatorConfig::default()
        })
    }

    pub fn with_config(config: &CalculatorConfig) -> Result<Self> {
        config.validate()?;
        let size = ChromaticSize::new(config.chromatic_note_count)?;
        let chromatic_note_count = size.note_count();
        let started = Instant::now();

        let mut notes = allocate(size.mode_note_count())?;
        let mode_tiers: Vec<ModeTier> = size.tiers().map(ModeTier::new).collect();

        let mut regions = Vec::with_capacity(mode_tiers.len());
        let mut rest = notes.as_mut_slice();
        for tier in &mode_tiers {
            let (region, tail) = std::mem::take(&mut rest).split_at_mut(tier.range().len());
            regions.push((tier.mode_note_count(), region));
            rest = tail;
        }
        debug_assert!(rest.is_empty());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_count())
            .thread_name(|index| format!("tier-worker-{index}"))
            .build()?;
        let scale_tiers = pool.install(|| {
            regions
                .into_par_iter()
                .map(|(mode_note_count, region)| {
                    build_tier(chromatic_note_count, mode_note_count, region)
                })
                .collect::<Result<Vec<ScaleTier>>>()
        })?;

        let chromatic = Self {
            size,
            notes: notes.into_boxed_slice(),
            mode_tiers,
            scale_tiers,
        };
        tracing::info!(
            chromatic_note_count,
            mode_count = chromatic.mode_count(),
            scale_count = chromatic.scale_count(),
            elapsed = ?started.elapsed(),
            "built chromatic"
        );
        Ok(chromatic)
    }

    pub fn chromatic_note_count(&self) -> usize {
        self.size.note_count()
    }

    /// Total modes, `2^(N - 1)`.
    pub fn mode_count(&self) -> usize {
        self.size.mode_count()
    }

    /// Total scales summed over all tiers.
    pub fn scale_count(&self) -> usize {
        self.scale_tiers.iter().map(ScaleTier::scale_count).sum()
    }

    /// The raw buffer holding every mode, tier after tier.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// The tier of modes with `mode_note_count` notes.
    pub fn tier(&self, mode_note_count: usize) -> Option<Tier<'_>> {
        let index = mode_note_count.checked_sub(1)?;
        Some(Tier {
            mode_tier: self.mode_tiers.get(index)?,
            scale_tier: self.scale_tiers.get(index)?,
            notes: &self.notes,
        })
    }

    pub fn tiers(&self) -> impl ExactSizeIterator<Item = Tier<'_>> + '_ {
        self.mode_tiers
            .iter()
            .zip(&self.scale_tiers)
            .map(|(mode_tier, scale_tier)| Tier {
                mode_tier,
                scale_tier,
                notes: &self.notes,
            })
    }

    /// Every mode, by ascending tier and then lexicographically.
    pub fn modes(&self) -> impl ExactSizeIterator<Item = Mode<'_>> + '_ {
        ExactViews {
            inner: self.tiers().flat_map(Tier::modes),
            remaining: self.mode_count(),
        }
    }

    /// Every scale, by ascending tier and then by first occurrence.
    pub fn scales(&self) -> impl ExactSizeIterator<Item = Scale<'_>> + '_ {
        ExactViews {
            inner: self.tiers().flat_map(Tier::scales),
            remaining: self.scale_count(),
        }
    }

    pub fn summary(&self) -> ChromaticSummary {
        ChromaticSummary {
            chromatic_note_count: self.chromatic_note_count(),
            mode_count: self.mode_count(),
            scale_count: self.scale_count(),
            tiers: self
                .tiers()
                .map(|tier| TierSummary {
                    mode_note_count: tier.mode_note_count(),
                    mode_count: tier.mode_count(),
                    scale_count: tier.scale_count(),
                })
                .collect(),
        }
    }
}

impl fmt::Debug for Chromatic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chromatic")
            .field("chromatic_note_count", &self.chromatic_note_count())
            .field("notes", &self.notes.len())
            .field("mode_count", &self.mode_count())
            .field("scale_count", &self.scale_count())
            .finish()
    }
}

/// Modes and scales of one length within a [`Chromatic`].
#[derive(Debug, Clone, Copy)]
pub struct Tier<'a> {
    mode_tier: &'a ModeTier,
    scale_tier: &'a ScaleTier,
    notes: &'a [Note],
}

impl<'a> Tier<'a> {
    pub fn mode_note_count(&self) -> usize {
        self.mode_tier.mode_note_count()
    }

    pub fn mode_count(&self) -> usize {
        self.mode_tier.mode_count()
    }

    pub fn scale_count(&self) -> usize {
        self.scale_tier.scale_count()
    }

    pub fn modes(self) -> impl ExactSizeIterator<Item = Mode<'a>> + 'a {
        self.mode_tier.modes(self.notes)
    }

    pub fn scales(self) -> impl ExactSizeIterator<Item = Scale<'a>> + 'a {
        self.scale_tier.scales(&self.notes[self.mode_tier.range()])
    }
}

/// Serialisable counts for a chromatic and each of its tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromaticSummary {
    pub chromatic_note_count: usize,
    pub mode_count: usize,
    pub scale_count: usize,
    pub tiers: Vec<TierSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSummary {
    pub mode_note_count: usize,
    pub mode_count: usize,
    pub scale_count: usize,
}

impl ChromaticSummary {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn allocate(note_count: usize) -> Result<Vec<Note>> {
    let mut notes = Vec::new();
    notes
        .try_reserve_exact(note_count)
        .map_err(|_| CalculatorError::Allocation { notes: note_count })?;
    notes.resize(note_count, 0);
    Ok(notes)
}

fn build_tier(
    chromatic_note_count: usize,
    mode_note_count: usize,
    region: &mut [Note],
) -> Result<ScaleTier> {
    let mode_count = fill_mode_tier(chromatic_note_count, mode_note_count, region)?;
    let scale_tier = reduce_mode_tier(chromatic_note_count, mode_note_count, region)?;
    tracing::debug!(
        mode_note_count,
        mode_count,
        scale_count = scale_tier.scale_count(),
        "built tier"
    );
    Ok(scale_tier)
}

/// Flattened tier views with a known total length.
struct ExactViews<I> {
    inner: I,
    remaining: usize,
}

impl<'a, I: Iterator<Item = Mode<'a>>> Iterator for ExactViews<I> {
    type Item = Mode<'a>;

    fn next(&mut self) -> Option<Mode<'a>> {
        let view = self.inner.next()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some(view)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, I: Iterator<Item = Mode<'a>>> ExactSizeIterator for ExactViews<I> {}

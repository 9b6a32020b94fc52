//! Core library for the Musical Calculator.
//!
//! For a chromatic of `N` pitch classes the crate enumerates every mode (an
//! increasing set of pitch classes normalised to start on 1) and reduces each
//! tier of equally long modes to its scales, the classes of modes that are
//! rotations of one another. Each module owns one step of that pipeline:
//! size tables, the mode view and its rotations, tier generation, tier
//! reduction, and the chromatic that runs all tiers in parallel. Rendering and
//! configuration support the command line application.

pub mod chromatic;
pub mod config;
pub mod error;
pub mod mode;
pub mod mode_tier;
pub mod render;
pub mod scale_tier;
pub mod tables;

pub use chromatic::{Chromatic, ChromaticSummary, Tier, TierSummary};
pub use config::CalculatorConfig;
pub use error::{CalculatorError, Result};
pub use mode::{Mode, Note, Rotations, Scale};
pub use mode_tier::{fill_mode_tier, generate_mode_tier, ModeCursor, ModeTier};
pub use render::{render_notes, write_listing, RenderStyle};
pub use scale_tier::{reduce_mode_tier, ScaleTier};
pub use tables::{ChromaticSize, TierSize, MAX_CHROMATIC_NOTE_COUNT};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{render::RenderStyle, tables::ChromaticSize, CalculatorError, Result};

/// Top-level configuration structure for the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Size of the chromatic to enumerate.
    pub chromatic_note_count: usize,
    /// Worker threads used while building tiers. Defaults to one per tier.
    pub workers: Option<usize>,
    /// Output style. When unset, digits are used if they fit the chromatic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_style: Option<RenderStyle>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            chromatic_note_count: 12,
            workers: None,
            render_style: None,
        }
    }
}

impl CalculatorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        ChromaticSize::new(self.chromatic_note_count)?;
        if self.workers == Some(0) {
            return Err(CalculatorError::msg("worker count must be at least one"));
        }
        Ok(())
    }

    /// The style to print with. An explicit choice is kept even when digits
    /// cannot print every note of the chromatic; rendering then fails on the
    /// first wide note.
    pub fn render_style(&self) -> RenderStyle {
        self.render_style
            .unwrap_or_else(|| RenderStyle::fitting(self.chromatic_note_count))
    }

    /// Whether the style had to fall back from the digit default.
    pub fn falls_back_to_spaced(&self) -> bool {
        self.render_style.is_none() && !RenderStyle::default().supports(self.chromatic_note_count)
    }

    /// Worker threads to build with, one per tier unless overridden.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or(self.chromatic_note_count).max(1)
    }
}

/// Result alias that carries the custom [`CalculatorError`] type.
pub type Result<T> = std::result::Result<T, CalculatorError>;

/// Common error type for the core crate.
///
/// Size and buffer variants are precondition failures: they are reported
/// before anything is written and the operation is abandoned.
#[derive(Debug, thiserror::Error)]
pub enum CalculatorError {
    #[error("chromatic note count {count} is outside the supported range 1..={max}")]
    ChromaticNoteCount { count: usize, max: usize },
    #[error("mode note count {mode_note_count} is outside 1..={chromatic_note_count}")]
    ModeNoteCount {
        mode_note_count: usize,
        chromatic_note_count: usize,
    },
    #[error("destination buffer holds {actual} notes but the tier needs {required}")]
    BufferTooSmall { required: usize, actual: usize },
    #[error("invalid mode: {0}")]
    InvalidMode(&'static str),
    /// Single-digit rendering only covers pitch classes up to 9.
    #[error("note {note} cannot be rendered as a single digit, use the spaced style")]
    NotRenderable { note: usize },
    #[error("failed to allocate a buffer of {notes} notes")]
    Allocation { notes: usize },
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Message(String),
}

impl CalculatorError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = CalculatorError::ModeNoteCount {
            mode_note_count: 13,
            chromatic_note_count: 12,
        };
        assert_eq!(format!("{err}"), "mode note count 13 is outside 1..=12");

        let err = CalculatorError::BufferTooSmall {
            required: 660,
            actual: 12,
        };
        assert!(format!("{err}").contains("660"));
    }
}

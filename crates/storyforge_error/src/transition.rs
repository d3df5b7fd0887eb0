//! Illegal scene state transitions.

/// A scene was asked to move between two states that are not connected.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Transition Error: scene {} cannot move from {} to {} at line {} in {}",
    index,
    from,
    to,
    line,
    file
)]
pub struct TransitionError {
    /// Scene index
    pub index: usize,
    /// Current status
    pub from: String,
    /// Requested status
    pub to: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl TransitionError {
    /// Create a new TransitionError at the current location.
    #[track_caller]
    pub fn new(index: usize, from: impl Into<String>, to: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            index,
            from: from.into(),
            to: to.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

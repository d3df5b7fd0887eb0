//! Rejection of a concurrent regeneration.

/// A regeneration is already in flight for this storyboard.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Busy: regeneration already in progress for storyboard {} at line {} in {}",
    storyboard_id,
    line,
    file
)]
pub struct BusyError {
    /// Storyboard holding the in-flight regeneration
    pub storyboard_id: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl BusyError {
    /// Create a new BusyError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyforge_error::BusyError;
    ///
    /// let err = BusyError::new("7f1c");
    /// assert_eq!(err.storyboard_id, "7f1c");
    /// ```
    #[track_caller]
    pub fn new(storyboard_id: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            storyboard_id: storyboard_id.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

//! Scene-writing failures.

/// The scene writer returned malformed output or the call failed.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", message, line, file)]
pub struct GenerationError {
    /// What went wrong
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyforge_error::GenerationError;
    ///
    /// let err = GenerationError::new("expected 4 scenes, got 3");
    /// assert!(format!("{}", err).contains("expected 4 scenes"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

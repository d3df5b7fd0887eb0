//! Strategy synthesis failures.

/// The strategy call failed or returned unusable output.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Strategy Error: {} at line {} in {}", message, line, file)]
pub struct StrategyError {
    /// What went wrong
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl StrategyError {
    /// Create a new StrategyError at the current location.
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

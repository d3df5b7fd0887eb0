//! Image synthesis failures.

/// Specific image synthesis failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SynthesisErrorKind {
    /// The generator answered without an image part
    #[display("No image payload in response")]
    NoImagePayload,
    /// The anchor scene failed, so the run cannot continue
    #[display("Anchor scene failed: {}", _0)]
    Anchor(String),
    /// A single scene failed
    #[display("Scene {} failed: {}", index, reason)]
    Scene {
        /// Scene index
        index: usize,
        /// Failure description
        reason: String,
    },
}

/// Synthesis error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyforge_error::{SynthesisError, SynthesisErrorKind};
///
/// let err = SynthesisError::new(SynthesisErrorKind::NoImagePayload);
/// assert!(format!("{}", err).contains("No image payload"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Synthesis Error: {} at line {} in {}", kind, line, file)]
pub struct SynthesisError {
    /// Error kind
    pub kind: SynthesisErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl SynthesisError {
    /// Create a new SynthesisError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SynthesisErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

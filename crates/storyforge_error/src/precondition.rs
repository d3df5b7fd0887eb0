//! Precondition failures detected before any external call is made.

/// Why an operation refused to start.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PreconditionErrorKind {
    /// No identity reference was selected
    #[display("No identity reference selected")]
    MissingIdentity,
    /// Scene list is empty
    #[display("At least one scene is required")]
    NoScenes,
    /// Scene text is blank
    #[display("Scene {} has no description", _0)]
    BlankScene(usize),
    /// Run requested on a storyboard that already left the pending state
    #[display("Storyboard has already been produced")]
    AlreadyStarted,
    /// Scene index outside the storyboard
    #[display("Scene {} is out of range for a storyboard of {} scenes", index, len)]
    SceneOutOfRange {
        /// Requested index
        index: usize,
        /// Number of scenes
        len: usize,
    },
    /// Regeneration requested for a scene that was never composed
    #[display("Scene {} has no composed prompt", _0)]
    MissingPrompt(usize),
    /// Regeneration requested for a scene the run is still working on
    #[display("Scene {} is still being produced", _0)]
    SceneInFlight(usize),
    /// Child regeneration requested while no anchor image exists
    #[display("No anchor image is available for scene {}", _0)]
    AnchorUnavailable(usize),
}

/// Precondition error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyforge_error::{PreconditionError, PreconditionErrorKind};
///
/// let err = PreconditionError::new(PreconditionErrorKind::MissingIdentity);
/// assert!(format!("{}", err).contains("identity reference"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Precondition Error: {} at line {} in {}", kind, line, file)]
pub struct PreconditionError {
    /// Error kind
    pub kind: PreconditionErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl PreconditionError {
    /// Create a new PreconditionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PreconditionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

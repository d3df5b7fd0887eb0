//! Top-level error wrapper types.

use crate::{
    BusyError, ConfigError, GatewayError, GenerationError, HttpError, JsonError,
    PreconditionError, StorageError, StrategyError, SynthesisError, TransitionError,
};

/// Every error the workspace can produce.
///
/// # Examples
///
/// ```
/// use storyforge_error::{BusyError, StoryforgeError, StoryforgeErrorKind};
///
/// let err: StoryforgeError = BusyError::new("7f1c").into();
/// assert!(matches!(err.kind(), StoryforgeErrorKind::Busy(_)));
/// assert!(format!("{}", err).contains("Busy"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryforgeErrorKind {
    /// Missing inputs detected before any external call
    #[from(PreconditionError)]
    Precondition(PreconditionError),
    /// Scene writing failed
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Image synthesis failed
    #[from(SynthesisError)]
    Synthesis(SynthesisError),
    /// Strategy synthesis failed
    #[from(StrategyError)]
    Strategy(StrategyError),
    /// A regeneration is already in flight
    #[from(BusyError)]
    Busy(BusyError),
    /// Illegal scene state transition
    #[from(TransitionError)]
    Transition(TransitionError),
    /// Capability adapter failure
    #[from(GatewayError)]
    Gateway(GatewayError),
    /// HTTP transport error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Storyforge error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyforge_error::{ConfigError, StoryforgeResult};
///
/// fn load() -> StoryforgeResult<()> {
///     Err(ConfigError::new("missing [gemini] section"))?
/// }
///
/// assert!(load().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyforge Error: {}", _0)]
pub struct StoryforgeError(Box<StoryforgeErrorKind>);

impl StoryforgeError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryforgeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryforgeErrorKind {
        &self.0
    }

    /// True when the error is a rejected concurrent regeneration.
    pub fn is_busy(&self) -> bool {
        matches!(self.kind(), StoryforgeErrorKind::Busy(_))
    }
}

// Generic From implementation for any type that converts to StoryforgeErrorKind
impl<T> From<T> for StoryforgeError
where
    T: Into<StoryforgeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyforge operations.
pub type StoryforgeResult<T> = std::result::Result<T, StoryforgeError>;

//! Capability gateway adapter error types.

/// Failure conditions of a remote capability adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GatewayErrorKind {
    /// API key not found in environment
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// Failed to build the HTTP client
    #[display("Failed to create gateway client: {}", _0)]
    ClientCreation(String),
    /// Request could not be sent or its body not read
    #[display("Gateway request failed: {}", _0)]
    ApiRequest(String),
    /// Non-success HTTP status
    #[display("HTTP {} error: {}", status_code, message)]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Error body returned by the service
        message: String,
    },
    /// Response carried no candidate content
    #[display("Gateway returned an empty response")]
    EmptyResponse,
    /// Base64 decoding failed
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
}

/// Gateway error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyforge_error::{GatewayError, GatewayErrorKind};
///
/// let err = GatewayError::new(GatewayErrorKind::HttpStatus {
///     status_code: 429,
///     message: "quota exceeded".to_string(),
/// });
/// assert!(format!("{}", err).contains("HTTP 429"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    /// Error kind
    pub kind: GatewayErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl GatewayError {
    /// Create a new GatewayError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

use api::GatewayError;
use std::fmt;

/// Errors surfaced by handle getters, operations and lookups.
///
/// A lookup that legitimately finds nothing is `Ok(None)`, never an error.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("Native symbol not found: {0}")]
    SymbolNotFound(String),
    #[error(transparent)]
    Gateway(GatewayError),
    #[error("Lookup failed: {0}")]
    LookupFailed(ErrorDescriptor),
    #[error("{0} is not implemented")]
    Unimplemented(&'static str),
    #[error("Session is detached from the target runtime")]
    Detached,
}

impl From<GatewayError> for BindingError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::UnresolvedSymbol(name) => BindingError::SymbolNotFound(name),
            other => BindingError::Gateway(other),
        }
    }
}

/// The native error object reported by a checked lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDescriptor {
    /// The `MONO_ERROR_*` code, non-zero on failure.
    pub code: u16,
    pub message: Option<String>,
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{} (error 0x{:X})", message, self.code),
            None => write!(f, "error 0x{:X}", self.code),
        }
    }
}

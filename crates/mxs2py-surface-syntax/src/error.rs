//! Conversion errors.

use std::any::Any;

/// Error returned by [`convert`](crate::convert) in place of target text.
///
/// Malformed bracketing never produces an error: scanners fall back to the
/// end of the buffer and conversion completes with best-effort output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("unsupported cast type `{type_name}`")]
    UnsupportedCast { type_name: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ConversionError {
    /// Stable identifier for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionError::UnsupportedCast { .. } => "unsupported-cast",
            ConversionError::Internal { .. } => "internal",
        }
    }

    /// Build an internal error from a caught panic payload.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "conversion panicked".to_string()
        };
        ConversionError::Internal { message }
    }
}

// ── Core error types ──
//
// Errors surfaced to the console's panels. The `From<kitten_api::Error>`
// impl folds transport-layer failures into a handful of kinds the UI can
// present without knowing about HTTP.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The control plane answered with a non-success status.
    /// `body` is the server's text, shown to the operator verbatim.
    #[error("{body}")]
    Transport { status: u16, body: String },

    #[error("Control plane unreachable: {reason}")]
    Unreachable { reason: String },

    /// Rejected locally before any request was made.
    #[error("{field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Unexpected response: {message}")]
    Decode { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status for server rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<kitten_api::Error> for CoreError {
    fn from(err: kitten_api::Error) -> Self {
        match err {
            kitten_api::Error::Request { status, body } => Self::Transport { status, body },
            kitten_api::Error::Transport(e) => Self::Unreachable {
                reason: e.to_string(),
            },
            kitten_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("invalid control URL: {e}"),
            },
            kitten_api::Error::Deserialization { message, .. } => Self::Decode { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_keeps_body_as_message() {
        let err: CoreError = kitten_api::Error::Request {
            status: 400,
            body: "Invalid host".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid host");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn validation_message_names_field() {
        let err = CoreError::validation("port", "must be between 1 and 65535");
        assert_eq!(err.to_string(), "port: must be between 1 and 65535");
        assert_eq!(err.status(), None);
    }
}

use thiserror::Error;

/// Top-level error type for the `kitten-api` crate.
///
/// The control plane answers failures with a plain-text body (`"List already
/// exists"`, `"Forbidden"`, ...). That text is kept verbatim so callers can
/// show it next to the control that triggered the request.
#[derive(Debug, Error)]
pub enum Error {
    // ── Control plane ───────────────────────────────────────────────
    /// Non-success HTTP status. `body` is the raw response text.
    #[error("control plane returned HTTP {status}: {body}")]
    Request { status: u16, body: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response body of a rejected request.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Request { body, .. } | Self::Deserialization { body, .. } => Some(body),
            _ => None,
        }
    }

    /// `403` -- the logs endpoint refuses non-local callers this way.
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// `409` -- e.g. creating a list whose name is taken.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// Returns `true` when the control plane could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect() || e.is_timeout())
    }
}

//! Domain-specific error types for the pixelflow client.
//!
//! All fallible operations return `Result<T, CanvasError>`.
//! Out-of-bounds drawing is not an error: it is silently ignored by the
//! canvas, so the only failures are bad configuration values and a broken
//! transport.

use std::convert::Infallible;

use thiserror::Error;

/// The canonical error type for the pixelflow client.
#[derive(Debug, Error)]
pub enum CanvasError {
    // ── Configuration Errors ─────────────────────────────────────
    /// A mode or geometry value was not one the protocol recognizes.
    ///
    /// Raised before any state is touched, so the canvas is unchanged.
    #[error("invalid {kind}: {value}")]
    InvalidConfig { kind: &'static str, value: String },

    // ── Protocol Errors ──────────────────────────────────────────
    /// The byte stream contained an opcode outside `1..=7`.
    #[error("unknown opcode: {0:#04x}")]
    UnknownOpcode(u8),

    /// A captured stream ended in the middle of a message.
    #[error("truncated stream: {0} bytes after the last complete message")]
    Truncated(usize),

    // ── Connection Errors ────────────────────────────────────────
    /// The underlying write or flush failed.
    ///
    /// The local mirror may now disagree with the remote display; the
    /// canvas does not retry.
    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),
}

impl CanvasError {
    /// Shorthand for [`CanvasError::InvalidConfig`].
    pub fn invalid(kind: &'static str, value: impl ToString) -> Self {
        CanvasError::InvalidConfig {
            kind,
            value: value.to_string(),
        }
    }

    /// `true` if the error came from the transport rather than from a
    /// rejected argument.
    pub fn is_transport(&self) -> bool {
        matches!(self, CanvasError::Transport(_))
    }
}

// ── Convenient From implementations ──────────────────────────────

// Lets the mode setters accept the typed enums directly (whose
// `TryInto` is infallible) as well as raw bytes and strings.
impl From<Infallible> for CanvasError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = CanvasError::invalid("color mode", "cmyk");
        assert_eq!(e.to_string(), "invalid color mode: cmyk");

        let e = CanvasError::UnknownOpcode(0x2a);
        assert!(e.to_string().contains("0x2a"));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        let e: CanvasError = io_err.into();
        assert!(e.is_transport());
        assert!(e.to_string().contains("pipe broke"));
    }

    #[test]
    fn config_errors_are_not_transport() {
        assert!(!CanvasError::invalid("draw mode", 9).is_transport());
    }
}

//! Common error types used across the workspace.
//!
//! Each layer produces typed errors and converts into [`SceneHubError`]
//! via `#[from]`; adapters map it onto their own surface (HTTP status
//! codes, exit codes, …).

use thiserror::Error;

/// Top-level error for scenehub operations.
#[derive(Debug, Error)]
pub enum SceneHubError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A caller supplied an argument that violates a domain invariant.
///
/// Validation failures never change stored state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("scope {scope:?} has too many parts")]
    MalformedScope { scope: String },

    #[error("scope {scope:?} has an unrecognized scheme")]
    UnknownScheme { scope: String },

    #[error("cannot manage scenes for foreign site {site_id:?}")]
    ForeignSite { site_id: String },

    #[error("invalid scene id {id:?}")]
    InvalidId { id: String },
}

/// An id-based lookup matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no such {entity}: {id}")]
pub struct NotFoundError {
    /// Kind of entity that was looked up (e.g. `"scene"`).
    pub entity: &'static str,
    /// The id that failed to match.
    pub id: String,
}

/// A remote collaborator (device directory, channel endpoint) failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("remote call to {target} failed: {reason}")]
pub struct TransportError {
    /// Topic or service the call was addressed to.
    pub target: String,
    /// Human-readable failure description.
    pub reason: String,
}

/// The presets document could not be persisted or loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct StorageError {
    /// Human-readable failure description.
    pub reason: String,
}

impl StorageError {
    /// Wrap an arbitrary underlying error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_not_found_message() {
        let err = NotFoundError {
            entity: "scene",
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "no such scene: abc");
    }

    #[test]
    fn should_wrap_validation_error_into_top_level() {
        let err: SceneHubError = ValidationError::ForeignSite {
            site_id: "other".to_string(),
        }
        .into();
        assert!(matches!(err, SceneHubError::Validation(_)));
    }
}

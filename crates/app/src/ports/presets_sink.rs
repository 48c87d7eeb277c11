//! Presets sink port — persistence of the presets document.

use std::future::Future;

use scenehub_domain::error::SceneHubError;
use scenehub_domain::scene::Presets;

/// Save callback invoked after every mutating store operation.
///
/// Implementations must be side-effect-complete on return: a subsequent
/// load observes the saved document, never a partial write.
pub trait PresetsSink: Send + Sync {
    /// Persist the whole presets document.
    fn save(&self, presets: &Presets) -> impl Future<Output = Result<(), SceneHubError>> + Send;
}

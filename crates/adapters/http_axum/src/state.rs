//! Shared application state for axum handlers.

use std::sync::Arc;

use scenehub_app::ports::{DeviceDirectory, PresetsSink};
use scenehub_app::services::scene_service::SceneService;

/// Application state shared across all axum handlers.
///
/// Generic over the directory and sink types to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do
/// not need to be `Clone` — only the `Arc` wrapper is cloned.
pub struct AppState<D, S> {
    /// The scene store + apply/undo engine.
    pub scene_service: Arc<SceneService<D, S>>,
}

impl<D, S> Clone for AppState<D, S> {
    fn clone(&self) -> Self {
        Self {
            scene_service: Arc::clone(&self.scene_service),
        }
    }
}

impl<D, S> AppState<D, S>
where
    D: DeviceDirectory + 'static,
    S: PresetsSink + 'static,
{
    /// Create a new application state from a scene service.
    pub fn new(scene_service: SceneService<D, S>) -> Self {
        Self {
            scene_service: Arc::new(scene_service),
        }
    }
}

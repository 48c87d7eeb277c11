//! # scenehub-adapter-storage-json
//!
//! File-backed implementation of the [`PresetsSink`] port.
//!
//! The whole presets document is serialized to a single JSON file. Writes
//! go through a temp file followed by a rename so a crash mid-write never
//! leaves a torn document behind; a subsequent load observes either the
//! previous or the new version, never a partial one.
//!
//! ## Dependency rule
//! Depends on `scenehub-app` (port traits) and `scenehub-domain` only.

use std::path::{Path, PathBuf};

use scenehub_app::ports::PresetsSink;
use scenehub_domain::error::{SceneHubError, StorageError};
use scenehub_domain::scene::Presets;

/// JSON-file presets store.
#[derive(Debug, Clone)]
pub struct JsonPresetsStore {
    path: PathBuf,
}

impl JsonPresetsStore {
    /// Create a store persisting to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store persists to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the presets document.
    ///
    /// A missing file yields an empty default document (fresh install);
    /// the scene service stamps the version on it.
    ///
    /// # Errors
    ///
    /// Returns [`SceneHubError::Storage`] when the file exists but cannot
    /// be read or parsed.
    pub async fn load(&self) -> Result<Presets, SceneHubError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                StorageError::new(format!("parsing {}: {err}", self.path.display())).into()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no presets file, starting empty");
                Ok(Presets::default())
            }
            Err(err) => {
                Err(StorageError::new(format!("reading {}: {err}", self.path.display())).into())
            }
        }
    }
}

impl PresetsSink for JsonPresetsStore {
    async fn save(&self, presets: &Presets) -> Result<(), SceneHubError> {
        let bytes = serde_json::to_vec_pretty(presets)
            .map_err(|err| StorageError::new(format!("serializing presets: {err}")))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|err| StorageError::new(format!("writing {}: {err}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|err| StorageError::new(format!("renaming {}: {err}", tmp.display())))?;

        tracing::debug!(path = %self.path.display(), scenes = presets.scenes.len(), "presets saved");
        Ok(())
    }
}

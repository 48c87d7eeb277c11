//! Scene service — the scene store plus the apply/undo engine.
//!
//! Owns the in-memory [`Presets`] document behind a mutex (one mutating
//! call in flight at a time) and persists it through the
//! [`PresetsSink`] port after every mutation. Apply/undo fan per-channel
//! `set` commands out through the [`CommandDispatcher`] and return as soon
//! as the commands are queued.

use std::collections::HashSet;

use tokio::sync::Mutex;

use scenehub_domain::capture::capture_state;
use scenehub_domain::device::Device;
use scenehub_domain::error::{NotFoundError, SceneHubError};
use scenehub_domain::id::SceneId;
use scenehub_domain::scene::{Presets, Query, Scene, ThingState};
use scenehub_domain::scope::{self, ParsedScope};

use crate::dispatcher::{Command, CommandDispatcher, channel_topic};
use crate::ports::{DeviceDirectory, PresetsSink};

/// Engine configuration, injected at construction instead of read from
/// ambient state.
#[derive(Debug, Clone)]
pub struct SceneServiceConfig {
    /// Identifier of the local site; site scopes normalize against it.
    pub site_id: String,
    /// Version stamped on a fresh presets document.
    pub version: String,
    /// Channel schemas excluded from state capture.
    pub excluded_schemas: HashSet<String>,
}

/// Application service for scene storage and the apply/undo workflow.
pub struct SceneService<D, S> {
    config: SceneServiceConfig,
    directory: D,
    sink: S,
    dispatcher: CommandDispatcher,
    presets: Mutex<Presets>,
}

impl<D: DeviceDirectory, S: PresetsSink> SceneService<D, S> {
    /// Create a new service around an initial presets document.
    ///
    /// A document without a version (fresh install) is stamped with the
    /// configured version.
    pub fn new(
        config: SceneServiceConfig,
        directory: D,
        sink: S,
        dispatcher: CommandDispatcher,
        mut initial: Presets,
    ) -> Self {
        if initial.version.is_empty() {
            initial.version = config.version.clone();
        }
        Self {
            config,
            directory,
            sink,
            dispatcher,
            presets: Mutex::new(initial),
        }
    }

    /// Return copies of all scenes matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneHubError::Validation`] when the query scope is
    /// malformed or addresses a foreign site.
    pub async fn fetch_scenes(&self, query: Query) -> Result<Vec<Scene>, SceneHubError> {
        let query = self.normalize_query(query)?;
        let presets = self.presets.lock().await;
        Ok(presets
            .scenes
            .iter()
            .filter(|scene| query.matches(scene))
            .cloned()
            .collect())
    }

    /// Look up a single scene by id.
    ///
    /// # Errors
    ///
    /// Returns [`SceneHubError::NotFound`] when no scene has this id.
    pub async fn fetch_scene(&self, id: SceneId) -> Result<Scene, SceneHubError> {
        let presets = self.presets.lock().await;
        presets
            .scenes
            .iter()
            .find(|scene| scene.id == Some(id))
            .cloned()
            .ok_or_else(|| not_found(id).into())
    }

    /// Remove all scenes matching `query` and return them.
    ///
    /// The relative order of the remaining scenes is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`SceneHubError::Validation`] for a bad query scope, or a
    /// storage error when persisting the document fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete_scenes(&self, query: Query) -> Result<Vec<Scene>, SceneHubError> {
        let query = self.normalize_query(query)?;
        let mut presets = self.presets.lock().await;

        let mut removed = Vec::new();
        presets.scenes.retain(|scene| {
            if query.matches(scene) {
                removed.push(scene.clone());
                false
            } else {
                true
            }
        });

        if !removed.is_empty() {
            self.sink.save(&presets).await?;
        }
        Ok(removed)
    }

    /// Create or update a scene.
    ///
    /// Applies defaults (scope `"site"`, slot `1`, label `"Preset <slot>"`,
    /// a fresh UUID when the id is absent), normalizes the scope, then
    /// overwrites an existing match in place or appends. Duplicate matches
    /// beyond the first are purged so at most one scene exists per
    /// `(scope, slot)` pair. Always persists afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SceneHubError::Validation`] for a bad scope, or a storage
    /// error when persisting the document fails.
    #[tracing::instrument(skip(self, scene), fields(scene_label = %scene.label))]
    pub async fn store_scene(&self, mut scene: Scene) -> Result<Scene, SceneHubError> {
        if scene.scope.is_empty() {
            scene.scope = "site".to_string();
        }
        scene.scope = self.parse_scope(Some(&scene.scope))?.scope;

        if scene.id.is_none() {
            scene.id = Some(SceneId::new());
        }
        if scene.slot <= 0 {
            scene.slot = 1;
        }
        if scene.label.is_empty() {
            scene.label = format!("Preset {}", scene.slot);
        }

        // The triple query keeps the historical matching rule: a scene is
        // replaced when it has the same id, or occupies the same slot in
        // the same scope.
        let query = Query {
            scope: Some(scene.scope.clone()),
            slot: Some(scene.slot),
            id: scene.id,
        };

        let mut presets = self.presets.lock().await;
        let matches: Vec<usize> = presets
            .scenes
            .iter()
            .enumerate()
            .filter(|(_, existing)| query.matches(existing))
            .map(|(index, _)| index)
            .collect();

        match matches.first() {
            None => presets.scenes.push(scene.clone()),
            Some(&first) => {
                presets.scenes[first] = scene.clone();
                for &index in matches.iter().skip(1).rev() {
                    presets.scenes.remove(index);
                }
            }
        }

        self.sink.save(&presets).await?;
        Ok(scene)
    }

    /// Apply a stored scene.
    ///
    /// For each thing: fetch its live device state, capture the current
    /// settable values, merge them in as undo data, and enqueue a `set`
    /// command for every channel with a defined state. Things whose device
    /// cannot be fetched are skipped with a warning. The scene — now
    /// carrying fresh undo values — is persisted and returned once all
    /// commands are queued; delivery is fire-and-forget.
    ///
    /// # Errors
    ///
    /// Returns [`SceneHubError::NotFound`] when no scene has this id, or a
    /// storage error when persisting the updated document fails.
    #[tracing::instrument(skip(self))]
    pub async fn apply_scene(&self, id: SceneId) -> Result<Scene, SceneHubError> {
        let mut presets = self.presets.lock().await;
        let index = scene_index(&presets, id)?;
        let mut scene = presets.scenes[index].clone();

        for thing in &mut scene.things {
            let Some(device) = self.fetch_device(&thing.id).await else {
                continue;
            };
            let captured = capture_state(&device, &self.config.excluded_schemas);
            *thing = thing.merge_undo_state(captured.as_ref());

            for channel in &thing.channels {
                if let Some(state) = &channel.state {
                    self.dispatcher
                        .enqueue(Command {
                            topic: channel_topic(&thing.id, &channel.id),
                            method: "set".to_string(),
                            payload: state.clone(),
                        })
                        .await;
                }
            }
        }

        presets.scenes[index] = scene.clone();
        self.sink.save(&presets).await?;
        Ok(scene)
    }

    /// Undo a previously applied scene.
    ///
    /// For each thing the live state is captured and intersected with the
    /// scene's recorded target state, so only channels the user has not
    /// changed since the apply are undone. Eligible channels with recorded
    /// undo data get a `set(undo_state)` command; diverged channels and
    /// channels without undo data are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SceneHubError::NotFound`] when no scene has this id, or a
    /// storage error when persisting the document fails.
    #[tracing::instrument(skip(self))]
    pub async fn undo_scene(&self, id: SceneId) -> Result<Scene, SceneHubError> {
        let presets = self.presets.lock().await;
        let index = scene_index(&presets, id)?;
        let scene = presets.scenes[index].clone();

        for thing in &scene.things {
            let Some(device) = self.fetch_device(&thing.id).await else {
                continue;
            };
            let Some(live) = capture_state(&device, &self.config.excluded_schemas) else {
                tracing::warn!(thing = %thing.id, "no capturable live state, skipping undo");
                continue;
            };

            let eligible = thing.match_state(&live);
            for channel in &thing.channels {
                if eligible.channels.iter().all(|ch| ch.id != channel.id) {
                    tracing::warn!(
                        thing = %thing.id,
                        channel = %channel.id,
                        "live state no longer matches scene, skipping channel"
                    );
                    continue;
                }
                match &channel.undo_state {
                    Some(undo) => {
                        self.dispatcher
                            .enqueue(Command {
                                topic: channel_topic(&thing.id, &channel.id),
                                method: "set".to_string(),
                                payload: undo.clone(),
                            })
                            .await;
                    }
                    None => {
                        tracing::warn!(
                            thing = %thing.id,
                            channel = %channel.id,
                            "no undo state recorded, skipping channel"
                        );
                    }
                }
            }
        }

        self.sink.save(&presets).await?;
        Ok(scene)
    }

    /// Build a synthetic, unsaved scene reflecting the current capturable
    /// state of all eligible things in `scope`.
    ///
    /// An empty scope defaults to the local site. Only promoted devices
    /// are considered; a room scope additionally filters by location.
    /// Devices capturing to nothing are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`SceneHubError::Validation`] for a bad scope, or a
    /// transport error when the device directory cannot be listed at all.
    pub async fn fetch_scene_prototype(&self, scope: Option<&str>) -> Result<Scene, SceneHubError> {
        let raw = match scope {
            None | Some("") => "site",
            Some(raw) => raw,
        };
        let parsed = self.parse_scope(Some(raw))?;

        let devices = self.directory.get_all().await?;
        let things: Vec<ThingState> = devices
            .iter()
            .filter(|device| device.promoted)
            .filter(|device| match &parsed.room {
                Some(room) => device.location.as_deref() == Some(room),
                None => true,
            })
            .filter_map(|device| capture_state(device, &self.config.excluded_schemas))
            .collect();

        Ok(Scene {
            id: None,
            slot: 0,
            label: String::new(),
            scope: parsed.scope,
            things,
        })
    }

    /// Close the command queue and wait for in-flight commands to finish.
    pub async fn shutdown(self) {
        self.dispatcher.shutdown().await;
    }

    /// Fetch a device, logging and swallowing directory failures so one
    /// bad thing never aborts the rest of an apply/undo.
    async fn fetch_device(&self, thing_id: &str) -> Option<Device> {
        match self.directory.get_by_id(thing_id).await {
            Ok(Some(device)) => Some(device),
            Ok(None) => {
                tracing::warn!(thing = %thing_id, "device not in directory, skipping");
                None
            }
            Err(err) => {
                tracing::warn!(thing = %thing_id, error = %err, "device lookup failed, skipping");
                None
            }
        }
    }

    /// Normalize a query scope: an empty scope is no filter, anything else
    /// goes through the scope parser.
    fn normalize_query(&self, mut query: Query) -> Result<Query, SceneHubError> {
        query.scope = match query.scope.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(self.parse_scope(Some(raw))?.scope),
        };
        Ok(query)
    }

    fn parse_scope(&self, raw: Option<&str>) -> Result<ParsedScope, SceneHubError> {
        scope::parse_scope(raw, &self.config.site_id).map_err(|err| {
            tracing::error!(scope = ?raw, error = %err, "rejected scope");
            SceneHubError::from(err)
        })
    }
}

fn scene_index(presets: &Presets, id: SceneId) -> Result<usize, SceneHubError> {
    presets
        .scenes
        .iter()
        .position(|scene| scene.id == Some(id))
        .ok_or_else(|| not_found(id).into())
}

fn not_found(id: SceneId) -> NotFoundError {
    NotFoundError {
        entity: "scene",
        id: id.to_string(),
    }
}

//! JSON REST handlers for scenes.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query as UrlQuery, State};
use serde::Deserialize;

use scenehub_app::ports::{DeviceDirectory, PresetsSink};
use scenehub_domain::error::{SceneHubError, ValidationError};
use scenehub_domain::id::SceneId;
use scenehub_domain::scene::{Query, Scene};

use crate::error::ApiError;
use crate::state::AppState;

/// Query-string filter (`?scope=…&slot=…&id=…`).
#[derive(Debug, Default, Deserialize)]
pub struct SceneQueryParams {
    pub scope: Option<String>,
    pub slot: Option<i32>,
    pub id: Option<String>,
}

impl SceneQueryParams {
    fn into_query(self) -> Result<Query, ApiError> {
        let id = self.id.as_deref().map(parse_id).transpose()?;
        Ok(Query {
            scope: self.scope,
            slot: self.slot,
            id,
        })
    }
}

fn parse_id(raw: &str) -> Result<SceneId, ApiError> {
    SceneId::from_str(raw).map_err(|_| {
        ApiError::from(SceneHubError::Validation(ValidationError::InvalidId {
            id: raw.to_string(),
        }))
    })
}

/// `GET /scenes`
pub async fn list<D, S>(
    State(state): State<AppState<D, S>>,
    UrlQuery(params): UrlQuery<SceneQueryParams>,
) -> Result<Json<Vec<Scene>>, ApiError>
where
    D: DeviceDirectory + 'static,
    S: PresetsSink + 'static,
{
    let scenes = state.scene_service.fetch_scenes(params.into_query()?).await?;
    Ok(Json(scenes))
}

/// `POST /scenes`
pub async fn create<D, S>(
    State(state): State<AppState<D, S>>,
    Json(scene): Json<Scene>,
) -> Result<Json<Scene>, ApiError>
where
    D: DeviceDirectory + 'static,
    S: PresetsSink + 'static,
{
    let stored = state.scene_service.store_scene(scene).await?;
    Ok(Json(stored))
}

/// `GET /scenes/{id}`
pub async fn get<D, S>(
    State(state): State<AppState<D, S>>,
    Path(id): Path<String>,
) -> Result<Json<Scene>, ApiError>
where
    D: DeviceDirectory + 'static,
    S: PresetsSink + 'static,
{
    let scene = state.scene_service.fetch_scene(parse_id(&id)?).await?;
    Ok(Json(scene))
}

/// `PUT /scenes/{id}` — the path id wins over any id in the body.
pub async fn update<D, S>(
    State(state): State<AppState<D, S>>,
    Path(id): Path<String>,
    Json(mut scene): Json<Scene>,
) -> Result<Json<Scene>, ApiError>
where
    D: DeviceDirectory + 'static,
    S: PresetsSink + 'static,
{
    scene.id = Some(parse_id(&id)?);
    let stored = state.scene_service.store_scene(scene).await?;
    Ok(Json(stored))
}

/// `DELETE /scenes/{id}`
pub async fn delete_one<D, S>(
    State(state): State<AppState<D, S>>,
    Path(id): Path<String>,
) -> Result<Json<Scene>, ApiError>
where
    D: DeviceDirectory + 'static,
    S: PresetsSink + 'static,
{
    let id = parse_id(&id)?;
    let mut removed = state
        .scene_service
        .delete_scenes(Query {
            id: Some(id),
            ..Query::default()
        })
        .await?;
    match removed.pop() {
        Some(scene) => Ok(Json(scene)),
        None => Err(SceneHubError::from(scenehub_domain::error::NotFoundError {
            entity: "scene",
            id: id.to_string(),
        })
        .into()),
    }
}

/// `DELETE /scenes`
pub async fn delete_many<D, S>(
    State(state): State<AppState<D, S>>,
    UrlQuery(params): UrlQuery<SceneQueryParams>,
) -> Result<Json<Vec<Scene>>, ApiError>
where
    D: DeviceDirectory + 'static,
    S: PresetsSink + 'static,
{
    let removed = state
        .scene_service
        .delete_scenes(params.into_query()?)
        .await?;
    Ok(Json(removed))
}

/// `POST /scenes/{id}/apply`
pub async fn apply<D, S>(
    State(state): State<AppState<D, S>>,
    Path(id): Path<String>,
) -> Result<Json<Scene>, ApiError>
where
    D: DeviceDirectory + 'static,
    S: PresetsSink + 'static,
{
    let scene = state.scene_service.apply_scene(parse_id(&id)?).await?;
    Ok(Json(scene))
}

/// `POST /scenes/{id}/undo`
pub async fn undo<D, S>(
    State(state): State<AppState<D, S>>,
    Path(id): Path<String>,
) -> Result<Json<Scene>, ApiError>
where
    D: DeviceDirectory + 'static,
    S: PresetsSink + 'static,
{
    let scene = state.scene_service.undo_scene(parse_id(&id)?).await?;
    Ok(Json(scene))
}

/// `GET /scenes/prototype/site`
pub async fn prototype_site<D, S>(
    State(state): State<AppState<D, S>>,
) -> Result<Json<Scene>, ApiError>
where
    D: DeviceDirectory + 'static,
    S: PresetsSink + 'static,
{
    let prototype = state.scene_service.fetch_scene_prototype(Some("site")).await?;
    Ok(Json(prototype))
}

/// `GET /scenes/prototype/room/{room_id}`
pub async fn prototype_room<D, S>(
    State(state): State<AppState<D, S>>,
    Path(room_id): Path<String>,
) -> Result<Json<Scene>, ApiError>
where
    D: DeviceDirectory + 'static,
    S: PresetsSink + 'static,
{
    let prototype = state
        .scene_service
        .fetch_scene_prototype(Some(&format!("room:{room_id}")))
        .await?;
    Ok(Json(prototype))
}

//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod scenes;

use axum::Router;
use axum::routing::{get, post};

use scenehub_app::ports::{DeviceDirectory, PresetsSink};

use crate::state::AppState;

/// Build the scenes sub-router.
pub fn routes<D, S>() -> Router<AppState<D, S>>
where
    D: DeviceDirectory + 'static,
    S: PresetsSink + 'static,
{
    Router::new()
        .route(
            "/scenes",
            get(scenes::list::<D, S>)
                .post(scenes::create::<D, S>)
                .delete(scenes::delete_many::<D, S>),
        )
        .route(
            "/scenes/{id}",
            get(scenes::get::<D, S>)
                .put(scenes::update::<D, S>)
                .delete(scenes::delete_one::<D, S>),
        )
        .route("/scenes/{id}/apply", post(scenes::apply::<D, S>))
        .route("/scenes/{id}/undo", post(scenes::undo::<D, S>))
        .route(
            "/scenes/prototype/site",
            get(scenes::prototype_site::<D, S>),
        )
        .route(
            "/scenes/prototype/room/{room_id}",
            get(scenes::prototype_room::<D, S>),
        )
}

//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use scenehub_app::ports::{DeviceDirectory, PresetsSink};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the scenes API at the root and includes a [`TraceLayer`] that
/// logs each HTTP request/response at the `DEBUG` level using the
/// `tracing` ecosystem.
pub fn build<D, S>(state: AppState<D, S>) -> Router
where
    D: DeviceDirectory + 'static,
    S: PresetsSink + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use scenehub_app::dispatcher::{CommandDispatcher, DispatcherConfig};
    use scenehub_app::ports::{ChannelEndpoint, DeviceDirectory, PresetsSink};
    use scenehub_app::services::scene_service::{SceneService, SceneServiceConfig};
    use scenehub_domain::device::Device;
    use scenehub_domain::error::SceneHubError;
    use scenehub_domain::id::SceneId;
    use scenehub_domain::scene::Presets;

    use crate::state::AppState;

    struct EmptyDirectory;

    impl DeviceDirectory for EmptyDirectory {
        async fn get_all(&self) -> Result<Vec<Device>, SceneHubError> {
            Ok(vec![])
        }

        async fn get_by_id(&self, _id: &str) -> Result<Option<Device>, SceneHubError> {
            Ok(None)
        }
    }

    struct NullSink;

    impl PresetsSink for NullSink {
        async fn save(&self, _presets: &Presets) -> Result<(), SceneHubError> {
            Ok(())
        }
    }

    struct NullEndpoint;

    impl ChannelEndpoint for NullEndpoint {
        async fn set(&self, _topic: &str, _payload: Value) -> Result<(), SceneHubError> {
            Ok(())
        }
    }

    fn app() -> axum::Router {
        let dispatcher = CommandDispatcher::spawn(NullEndpoint, &DispatcherConfig::default());
        let service = SceneService::new(
            SceneServiceConfig {
                site_id: "test-site".to_string(),
                version: "1.0".to_string(),
                excluded_schemas: std::collections::HashSet::new(),
            },
            EmptyDirectory,
            NullSink,
            dispatcher,
            Presets::default(),
        );
        super::build(AppState::new(service))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_on_health_check() {
        let resp = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_list_scenes_with_empty_store() {
        let resp = app().oneshot(get("/scenes")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_map_unknown_scene_id_to_404() {
        let resp = app()
            .oneshot(get(&format!("/scenes/{}", SceneId::new())))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_map_malformed_scene_id_to_400() {
        let resp = app().oneshot(get("/scenes/not-a-uuid")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_map_invalid_query_scope_to_400() {
        let resp = app().oneshot(get("/scenes?scope=zone:kitchen")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

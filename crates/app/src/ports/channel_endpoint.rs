//! Channel endpoint port — outbound remote `set` calls.

use std::future::Future;

use scenehub_domain::error::SceneHubError;
use serde_json::Value;

/// Transport for remote channel mutations.
///
/// `topic` addresses one channel of one thing (see
/// [`channel_topic`](crate::dispatcher::channel_topic)); `payload` is the
/// opaque value to apply. Implementations perform a single call with no
/// retries — timeout handling lives in the dispatcher.
pub trait ChannelEndpoint: Send + Sync {
    /// Invoke a `set` on the addressed channel.
    fn set(
        &self,
        topic: &str,
        payload: Value,
    ) -> impl Future<Output = Result<(), SceneHubError>> + Send;
}

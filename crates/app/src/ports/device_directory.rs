//! Device directory port — live device lookups.

use std::future::Future;

use scenehub_domain::device::Device;
use scenehub_domain::error::SceneHubError;

/// Read-only view of the external device directory.
///
/// Device discovery itself is out of scope; scenehub only consumes
/// whatever the directory currently knows.
pub trait DeviceDirectory: Send + Sync {
    /// Fetch all known devices.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, SceneHubError>> + Send;

    /// Fetch a single device by id, `None` when unknown.
    fn get_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Device>, SceneHubError>> + Send;
}

//! Device descriptors as reported by the device directory.
//!
//! These mirror what the external directory returns; scenehub never owns
//! or mutates them, it only derives [`ThingState`](crate::scene::ThingState)
//! snapshots from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single controllable/observable attribute of a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel id, unique within its device.
    pub id: String,
    /// Schema identifier describing the channel's protocol.
    pub schema: String,
    /// Methods the channel supports (`"set"` marks it mutable).
    #[serde(default)]
    pub supported_methods: Vec<String>,
    /// Last observed state envelope, if any. The captured value lives
    /// under its `"payload"` key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_state: Option<Value>,
}

impl Channel {
    /// Whether this channel advertises a mutate (`"set"`) method.
    #[must_use]
    pub fn is_settable(&self) -> bool {
        self.supported_methods.iter().any(|m| m == "set")
    }

    /// Extract the captured payload from the last observed state.
    ///
    /// Returns `None` unless the last state is an object carrying a
    /// `"payload"` key.
    #[must_use]
    pub fn state_payload(&self) -> Option<&Value> {
        self.last_state.as_ref()?.as_object()?.get("payload")
    }
}

/// An addressable device exposing zero or more channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Device (thing) id.
    pub id: String,
    /// Whether the user has promoted this device for scene use.
    #[serde(default)]
    pub promoted: bool,
    /// Room the device lives in, if assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Channels the device exposes.
    #[serde(default)]
    pub channels: Vec<Channel>,
}

//! # scenehub-adapter-virtual
//!
//! Virtual device network — simulated devices for demonstration and
//! testing. Implements both the [`DeviceDirectory`] and
//! [`ChannelEndpoint`] ports: a `set` updates the simulated device's last
//! observed state, so applies and undos are observable end to end.
//!
//! ## Provided demo devices
//!
//! | Device | Location | Channels |
//! |--------|----------|----------|
//! | Kitchen Lamp | kitchen | `on-off`, `brightness` |
//! | Bedroom Fan | bedroom | `on-off` |
//! | Hallway Sensor | hallway | `temperature` (read-only, never captured) |
//!
//! ## Dependency rule
//! Depends on `scenehub-app` (port traits) and `scenehub-domain` only.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use scenehub_app::ports::{ChannelEndpoint, DeviceDirectory};
use scenehub_domain::device::{Channel, Device};
use scenehub_domain::error::{SceneHubError, TransportError};

/// Shared in-memory device network.
#[derive(Debug, Clone, Default)]
pub struct VirtualDeviceNetwork {
    devices: Arc<Mutex<HashMap<String, Device>>>,
}

impl VirtualDeviceNetwork {
    /// Create an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a network populated with the demo devices.
    #[must_use]
    pub fn demo() -> Self {
        let network = Self::new();
        network.insert(Device {
            id: "virtual-lamp-kitchen".to_string(),
            promoted: true,
            location: Some("kitchen".to_string()),
            channels: vec![
                settable_channel("on-off", "/protocol/on-off", json!(false)),
                settable_channel("brightness", "/protocol/brightness", json!(1.0)),
            ],
        });
        network.insert(Device {
            id: "virtual-fan-bedroom".to_string(),
            promoted: true,
            location: Some("bedroom".to_string()),
            channels: vec![settable_channel("on-off", "/protocol/on-off", json!(false))],
        });
        network.insert(Device {
            id: "virtual-sensor-hallway".to_string(),
            promoted: true,
            location: Some("hallway".to_string()),
            channels: vec![Channel {
                id: "temperature".to_string(),
                schema: "/protocol/temperature".to_string(),
                supported_methods: vec!["get".to_string()],
                last_state: Some(json!({ "payload": 21.5 })),
            }],
        });
        network
    }

    /// Add or replace a device.
    pub fn insert(&self, device: Device) {
        self.devices
            .lock()
            .unwrap()
            .insert(device.id.clone(), device);
    }

    /// Current payload of a device channel, if any. Test/demo helper.
    #[must_use]
    pub fn channel_payload(&self, device_id: &str, channel_id: &str) -> Option<Value> {
        let devices = self.devices.lock().unwrap();
        let device = devices.get(device_id)?;
        let channel = device.channels.iter().find(|ch| ch.id == channel_id)?;
        channel.state_payload().cloned()
    }
}

fn settable_channel(id: &str, schema: &str, payload: Value) -> Channel {
    Channel {
        id: id.to_string(),
        schema: schema.to_string(),
        supported_methods: vec!["get".to_string(), "set".to_string()],
        last_state: Some(json!({ "payload": payload })),
    }
}

impl DeviceDirectory for VirtualDeviceNetwork {
    async fn get_all(&self) -> Result<Vec<Device>, SceneHubError> {
        let mut devices: Vec<Device> = self.devices.lock().unwrap().values().cloned().collect();
        devices.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(devices)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Device>, SceneHubError> {
        Ok(self.devices.lock().unwrap().get(id).cloned())
    }
}

impl ChannelEndpoint for VirtualDeviceNetwork {
    async fn set(&self, topic: &str, payload: Value) -> Result<(), SceneHubError> {
        let (device_id, channel_id) = parse_topic(topic)?;

        let mut devices = self.devices.lock().unwrap();
        let channel = devices
            .get_mut(device_id)
            .and_then(|device| device.channels.iter_mut().find(|ch| ch.id == channel_id))
            .ok_or_else(|| TransportError {
                target: topic.to_string(),
                reason: "unknown device or channel".to_string(),
            })?;

        tracing::debug!(%topic, %payload, "virtual set");
        channel.last_state = Some(json!({ "payload": payload }));
        Ok(())
    }
}

/// Split a `devices/<id>/channels/<id>` topic into its components.
fn parse_topic(topic: &str) -> Result<(&str, &str), TransportError> {
    let parts: Vec<&str> = topic.split('/').collect();
    match parts.as_slice() {
        ["devices", device_id, "channels", channel_id] => Ok((*device_id, *channel_id)),
        _ => Err(TransportError {
            target: topic.to_string(),
            reason: "malformed endpoint topic".to_string(),
        }),
    }
}

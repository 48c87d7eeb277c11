//! State capture — derive a settable snapshot from a device descriptor.

use std::collections::HashSet;

use crate::device::Device;
use crate::scene::{ChannelState, ThingState};

/// Derive the filtered snapshot of settable channel states for `device`.
///
/// A channel is captured only if its schema is not in `excluded_schemas`,
/// it supports a `"set"` method, and its last observed state carries an
/// extractable payload. Returns `None` when no channels qualify — the
/// device then contributes nothing to a scene.
///
/// Pure: no IO, no mutation of the input.
#[must_use]
pub fn capture_state(device: &Device, excluded_schemas: &HashSet<String>) -> Option<ThingState> {
    let channels: Vec<ChannelState> = device
        .channels
        .iter()
        .filter(|channel| !excluded_schemas.contains(&channel.schema))
        .filter(|channel| channel.is_settable())
        .filter_map(|channel| {
            channel.state_payload().map(|payload| ChannelState {
                id: channel.id.clone(),
                state: Some(payload.clone()),
                undo_state: None,
            })
        })
        .collect();

    if channels.is_empty() {
        return None;
    }

    Some(ThingState {
        id: device.id.clone(),
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Channel;
    use serde_json::json;

    fn settable(id: &str, schema: &str, payload: serde_json::Value) -> Channel {
        Channel {
            id: id.to_string(),
            schema: schema.to_string(),
            supported_methods: vec!["set".to_string()],
            last_state: Some(json!({ "payload": payload })),
        }
    }

    fn device(channels: Vec<Channel>) -> Device {
        Device {
            id: "lamp-1".to_string(),
            promoted: true,
            location: None,
            channels,
        }
    }

    #[test]
    fn should_capture_settable_channels_with_payload() {
        let dev = device(vec![
            settable("on-off", "/protocol/on-off", json!(true)),
            settable("brightness", "/protocol/brightness", json!(0.5)),
        ]);

        let state = capture_state(&dev, &HashSet::new()).unwrap();

        assert_eq!(state.id, "lamp-1");
        assert_eq!(state.channels.len(), 2);
        assert_eq!(state.channels[0].state, Some(json!(true)));
        assert_eq!(state.channels[1].state, Some(json!(0.5)));
    }

    #[test]
    fn should_skip_channels_with_excluded_schema() {
        let excluded: HashSet<String> = ["/protocol/battery".to_string()].into_iter().collect();
        let dev = device(vec![
            settable("battery", "/protocol/battery", json!(0.9)),
            settable("on-off", "/protocol/on-off", json!(false)),
        ]);

        let state = capture_state(&dev, &excluded).unwrap();

        assert_eq!(state.channels.len(), 1);
        assert_eq!(state.channels[0].id, "on-off");
    }

    #[test]
    fn should_skip_channels_without_set_method() {
        let mut read_only = settable("temperature", "/protocol/temperature", json!(21.5));
        read_only.supported_methods = vec!["get".to_string()];
        let dev = device(vec![read_only]);

        assert!(capture_state(&dev, &HashSet::new()).is_none());
    }

    #[test]
    fn should_skip_channels_without_payload() {
        let mut stale = settable("on-off", "/protocol/on-off", json!(true));
        stale.last_state = None;
        let mut bare = settable("brightness", "/protocol/brightness", json!(0.5));
        bare.last_state = Some(json!({"timestamp": 12}));
        let dev = device(vec![stale, bare]);

        assert!(capture_state(&dev, &HashSet::new()).is_none());
    }

    #[test]
    fn should_return_none_for_device_without_channels() {
        assert!(capture_state(&device(vec![]), &HashSet::new()).is_none());
    }
}

//! Scenes — named, slotted snapshots of thing channel states.
//!
//! A [`Scene`] records, per thing, the channel values to apply
//! ([`ChannelState::state`]) and the values observed just before the last
//! apply ([`ChannelState::undo_state`]). The whole collection is persisted
//! as a single [`Presets`] document.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::SceneId;

/// The state of a single channel within a thing.
///
/// `state` and `undo_state` are opaque structured payloads — whatever the
/// channel reported as its last observed value. Deep equality on
/// [`serde_json::Value`] is what "the live state still matches" means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelState {
    /// Channel id, unique within its owning thing.
    pub id: String,
    /// Value to apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    /// Value observed before the last apply, used to restore prior state.
    #[serde(rename = "undoState", default, skip_serializing_if = "Option::is_none")]
    pub undo_state: Option<Value>,
}

/// Captured or target channel states for one addressable thing.
///
/// Channel order is insertion order and channel ids are unique within a
/// thing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThingState {
    /// Thing (device) id.
    pub id: String,
    /// Per-channel states, in insertion order.
    #[serde(default)]
    pub channels: Vec<ChannelState>,
}

impl ThingState {
    /// Produce a new thing state with the same channels and `state` values
    /// as `self`, but with each channel's `undo_state` taken from the
    /// matching channel of `previous` (when present).
    ///
    /// Channels present only in `previous` are ignored; channel order
    /// follows `self`.
    #[must_use]
    pub fn merge_undo_state(&self, previous: Option<&ThingState>) -> ThingState {
        let prior: HashMap<&str, &ChannelState> = previous
            .map(|p| {
                p.channels
                    .iter()
                    .map(|ch| (ch.id.as_str(), ch))
                    .collect()
            })
            .unwrap_or_default();

        ThingState {
            id: self.id.clone(),
            channels: self
                .channels
                .iter()
                .map(|ch| ChannelState {
                    id: ch.id.clone(),
                    state: ch.state.clone(),
                    undo_state: prior.get(ch.id.as_str()).and_then(|p| p.state.clone()),
                })
                .collect(),
        }
    }

    /// Keep only the channels of `self` whose `state` deep-equals the
    /// `state` of the same-id channel in `reference`.
    ///
    /// Channels absent from `reference`, or whose state differs, are
    /// dropped. Used to avoid undoing channels a user has since changed
    /// manually.
    #[must_use]
    pub fn match_state(&self, reference: &ThingState) -> ThingState {
        let reference_states: HashMap<&str, &Option<Value>> = reference
            .channels
            .iter()
            .map(|ch| (ch.id.as_str(), &ch.state))
            .collect();

        ThingState {
            id: self.id.clone(),
            channels: self
                .channels
                .iter()
                .filter(|ch| reference_states.get(ch.id.as_str()) == Some(&&ch.state))
                .cloned()
                .collect(),
        }
    }
}

/// A named, slotted snapshot of one or more things' channel states,
/// scoped to a site or room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Primary key once assigned; absent on unsaved scenes (prototypes,
    /// first-time stores).
    #[serde(rename = "uuid", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SceneId>,
    /// Small integer position for UI placement; at most one scene per
    /// `(scope, slot)` pair, enforced by the store on write.
    #[serde(default)]
    pub slot: i32,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Scope the scene belongs to (`"site:<id>"` or `"room:<name>"`).
    #[serde(default)]
    pub scope: String,
    /// Captured thing states.
    #[serde(default)]
    pub things: Vec<ThingState>,
}

/// The whole persisted document — root of persistence, owned exclusively
/// by the scene store and mutated only through store operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Presets {
    /// Document schema version.
    #[serde(default)]
    pub version: String,
    /// All stored scenes, in insertion order.
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

/// Filter for matching scenes.
///
/// An absent/empty scope means "no scope filter"; a query with no fields
/// at all matches every scene.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Query {
    /// Normalized scope to match.
    pub scope: Option<String>,
    /// Slot to match; only consulted when `scope` is present.
    pub slot: Option<i32>,
    /// Scene id to match, independently of scope/slot.
    pub id: Option<SceneId>,
}

impl Query {
    /// Whether this query matches every scene.
    #[must_use]
    pub fn matches_all(&self) -> bool {
        self.scope.is_none() && self.slot.is_none() && self.id.is_none()
    }

    /// Whether `scene` matches this query.
    ///
    /// The rule is `(scope == ∧ (slot absent ∨ slot ==)) ∨ id ==`; scope
    /// and id are independent OR-ed conditions, not combined.
    #[must_use]
    pub fn matches(&self, scene: &Scene) -> bool {
        if self.matches_all() {
            return true;
        }
        if let Some(scope) = &self.scope
            && scene.scope == *scope
            && self.slot.is_none_or(|slot| scene.slot == slot)
        {
            return true;
        }
        if let Some(id) = self.id
            && scene.id == Some(id)
        {
            return true;
        }
        false
    }
}

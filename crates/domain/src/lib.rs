//! # scenehub-domain
//!
//! Pure domain model for the scenehub scene/preset system.
//!
//! ## Responsibilities
//! - Foundational types: typed scene identifiers, error conventions
//! - Define **Scenes** (named, slotted snapshots of thing channel states)
//! - Define **ThingStates** and **ChannelStates** (captured per-channel values
//!   plus the undo values recorded before an apply)
//! - Define **Device** descriptors as seen through the device directory
//! - Scope parsing (site vs. room addressing)
//! - State capture from device descriptors, undo merging, and live-state
//!   matching — all pure functions
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod capture;
pub mod device;
pub mod error;
pub mod id;
pub mod scene;
pub mod scope;

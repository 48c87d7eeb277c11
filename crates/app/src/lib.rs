//! # scenehub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceDirectory` — look up live device descriptors
//!   - `ChannelEndpoint` — perform remote channel `set` calls
//!   - `PresetsSink` — persist the presets document after each mutation
//! - Provide the **command dispatcher** — a bounded queue drained by a fixed
//!   pool of workers, isolating per-command failures
//! - Provide the **scene service** — the scene store plus the apply/undo
//!   engine, the single writer of the presets document
//!
//! ## Dependency rule
//! Depends on `scenehub-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod dispatcher;
pub mod ports;
pub mod services;

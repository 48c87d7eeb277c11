//! # scenehub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **scenes REST API** (`/scenes`, `/scenes/{id}`,
//!   `/scenes/{id}/apply`, `/scenes/prototype/…`)
//! - Map HTTP requests into scene service calls (driving adapter)
//! - Map scene service results and errors into JSON responses
//!
//! ## Dependency rule
//! Depends on `scenehub-app` (for port traits and the scene service) and
//! `scenehub-domain` (for types used in request/response mapping). Never
//! leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

//! Application services — use-cases exposed to driving adapters.

pub mod scene_service;

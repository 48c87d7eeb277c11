//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside
//! world. They are defined here (in `app`) so that both the use-case layer
//! and the adapter layer can depend on them without creating circular
//! dependencies.

pub mod channel_endpoint;
pub mod device_directory;
pub mod presets_sink;

pub use channel_endpoint::ChannelEndpoint;
pub use device_directory::DeviceDirectory;
pub use presets_sink::PresetsSink;

//! Configuration for usher.

mod settings;

pub use settings::{CacheConfig, Config, FreeBusyConfig, PreferenceConfig, RunConfig};

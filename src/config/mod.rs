//! Lighting configuration and descriptor location.
//!
//! A lighting configuration maps key or group names to effect settings. It
//! can be given inline as JSON or loaded from a JSON, YAML or TOML file.

mod key_config;
mod loader;
mod path;

pub use key_config::{ConfigValue, Effect, KeyConfig, Lighting, parse_color};
pub use loader::{ConfigFormat, LightingConfig};
pub use path::{open_registry, user_data_dir};

//! Configuration persistence for the orrery viewer.

mod config;
mod error;

pub use config::{Config, DebugConfig, InputConfig, RenderConfig, SceneConfig, WindowConfig};
pub use error::ConfigError;

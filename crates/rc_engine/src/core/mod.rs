//! # Core Engine Module
//!
//! Shared configuration for the render core. The concrete configuration
//! types live in [`config`]; the loading machinery is in [`crate::config`].

pub mod config;

pub use crate::foundation;

pub use config::{EngineConfig, RenderQueueConfig, SceneConfig, SpriteBatchConfig};
pub use crate::config::{Config, ConfigError};

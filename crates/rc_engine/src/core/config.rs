//! # Engine Configuration
//!
//! Concrete configuration for the render core: logging level, render queue
//! sizing, scene traversal behaviour and sprite batching. Every section has
//! sensible defaults so a partial file (or none at all) is valid.
//!
//! ```toml
//! log_level = "debug"
//!
//! [scene]
//! frustum_culling = true
//! default_render_order = "StateChange"
//!
//! [sprite_batch]
//! initial_sprite_capacity = 128
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::logging::{self, LevelFilter};
use crate::render::render_queue::RenderOrder;

/// # Render Queue Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderQueueConfig {
    /// Capacity reserved for every bucket when the queue is created
    pub initial_bucket_capacity: usize,
}

impl Default for RenderQueueConfig {
    fn default() -> Self {
        Self {
            initial_bucket_capacity: 256,
        }
    }
}

/// # Scene Traversal Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Skip objects whose world bounds fall outside the camera frustum
    pub frustum_culling: bool,
    /// Order used when the caller does not ask for a specific one
    pub default_render_order: RenderOrder,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            frustum_culling: true,
            default_render_order: RenderOrder::StateChange,
        }
    }
}

/// # Sprite Batch Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteBatchConfig {
    /// Sprites worth of geometry reserved when a texture bucket is first created
    pub initial_sprite_capacity: usize,
}

impl Default for SpriteBatchConfig {
    fn default() -> Self {
        Self {
            initial_sprite_capacity: 64,
        }
    }
}

/// # Engine Configuration
///
/// Top-level configuration consumed by the sample application and by
/// [`crate::scene::SceneManager`] / [`crate::render::SpriteBatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log level (`error`, `warn`, `info`, `debug`, `trace`, `off`)
    pub log_level: String,
    /// Render queue sizing
    pub queue: RenderQueueConfig,
    /// Scene traversal behaviour
    pub scene: SceneConfig,
    /// Sprite batching
    pub sprite_batch: SpriteBatchConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            queue: RenderQueueConfig::default(),
            scene: SceneConfig::default(),
            sprite_batch: SpriteBatchConfig::default(),
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Parse the configured log level
    pub fn log_level_filter(&self) -> Result<LevelFilter, ConfigError> {
        logging::parse_level(&self.log_level)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown log level '{}'", self.log_level)))
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log_level_filter()?;

        // 16-bit sprite indices address at most 65536 vertices per texture
        if self.sprite_batch.initial_sprite_capacity > 16384 {
            return Err(ConfigError::Invalid(format!(
                "initial_sprite_capacity {} exceeds the 16384 sprites a texture bucket can hold",
                self.sprite_batch.initial_sprite_capacity
            )));
        }

        Ok(())
    }
}

//! # RcEngine Render Core
//!
//! The render-queue half of a 3D engine: scene traversal fills a bucketed
//! render queue, the batch renderer sorts each bucket and submits it to a
//! device, and the sprite batch turns 2D draws into per-texture geometry
//! that rides the same path.
//!
//! ## Features
//!
//! - **View Resolution**: Shader-resource and unordered-access view descriptors
//!   resolved from resource shape, with range validation
//! - **Render Queue**: Opaque, transparent, GUI and sprite buckets, sorted by
//!   material or depth
//! - **Scene Graph**: Slotmap-backed node hierarchy with transform
//!   propagation and frustum culling
//! - **Sprite Batching**: One vertex/index buffer pair per texture
//! - **Headless Device**: In-memory backend for tools and tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rc_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mut scene = SceneManager::with_config(&config);
//!     let mut renderer = BatchRenderer::new();
//!     let mut device = HeadlessDevice::new();
//!     let camera = Camera::screen_space(800.0, 600.0);
//!
//!     let stats = scene.render_frame(&mut renderer, &camera, RenderOrder::StateChange, &mut device);
//!     log::info!("Submitted {} draws", stats.submitted);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;
pub mod foundation;

pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::Config,
        core::{EngineConfig, RenderQueueConfig, SceneConfig, SpriteBatchConfig},
        foundation::{
            collections::{NodeId, ObjectId},
            math::{Color, IntRect, Mat4, Transform, Vec2, Vec3},
        },
        render::{
            resources::{MipRange, PixelFormat, SliceRange, Texture, TextureDesc, TextureId},
            AlphaMode, BatchRenderer, BucketId, FrameStats, HeadlessDevice, Material, RenderDevice, RenderError,
            RenderOrder, RenderOperation, RenderResult, ResourceHandle, SpriteBatch,
        },
        scene::{Camera, GuiElement, MeshEntity, SceneGraph, SceneManager, SceneObject, TraversalStats},
    };
}

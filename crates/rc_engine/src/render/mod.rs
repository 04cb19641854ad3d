//! # Render Core
//!
//! Backend-agnostic half of the renderer: resource and view descriptions,
//! materials, the per-frame render queue, the batch renderer that drains it,
//! and the sprite batch that feeds it.
//!
//! ## Frame Flow
//!
//! ```text
//! SpriteBatch (begin/draw/end) ──► sprite buckets in the scene
//! SceneManager::update_render_queue ──► RenderQueue (4 buckets)
//! BatchRenderer::render ──► sort each bucket ──► RenderDevice::draw
//! ```
//!
//! Actual graphics APIs sit behind [`RenderDevice`]. [`HeadlessDevice`]
//! implements it in memory for tools and tests.

// Resource descriptions and view resolution
pub mod resources;

// Device boundary
pub mod device;
pub mod headless;

// Frame systems
pub mod material;
pub mod render_queue;
pub mod batch_renderer;
pub mod sprite_batch;

#[cfg(test)]
mod tests;

pub use batch_renderer::{BatchRenderer, FrameStats};
pub use device::{BufferHandle, DrawCall, IndexFormat, PrimitiveType, RenderDevice, RenderOperation, ViewHandle, ViewResource};
pub use headless::{HeadlessDevice, RecordedDraw};
pub use material::{AlphaMode, Material, ResourceHandle};
pub use render_queue::{BucketId, ObjectKind, RenderOrder, RenderQueue, RenderQueueItem, SortKey};
pub use sprite_batch::{BatchState, SpriteBatch, SpriteEntity, SpriteVertex};

use crate::foundation::collections::ObjectId;
use crate::render::resources::{TextureId, ViewError};
use crate::scene::SceneError;

/// Errors raised by the render core and its devices
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A rendering operation failed during execution
    ///
    /// Returned by devices for individual draws. The batch renderer logs
    /// these and moves on to the next item.
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// Resource creation or management failed
    ///
    /// Occurs when GPU resources (buffers, views) cannot be created or
    /// updated, typically due to memory constraints or invalid data.
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// Backend-specific error occurred
    #[error("Backend error: {0}")]
    BackendError(String),

    /// A view request did not fit the resource it targets
    #[error("Invalid view: {0}")]
    InvalidView(#[from] ViewError),

    /// Scene graph rejected an operation
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// A scene object referenced by the render core no longer exists
    #[error("Unknown scene object {0:?}")]
    UnknownObject(ObjectId),

    /// Sprite batch call made in the wrong state
    #[error("Sprite batch is {actual:?}, expected {expected:?}")]
    UnexpectedBatchState {
        /// State the call requires
        expected: BatchState,
        /// State the batch is in
        actual: BatchState,
    },

    /// A sprite bucket cannot address more vertices with 16-bit indices
    #[error("Sprite bucket for texture {texture:?} is full ({vertices} vertices)")]
    SpriteCapacityExceeded {
        /// Texture of the full bucket
        texture: TextureId,
        /// Vertices already in the bucket
        vertices: usize,
    },
}

/// Result type for render core operations
pub type RenderResult<T> = Result<T, RenderError>;

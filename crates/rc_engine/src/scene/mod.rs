//! Scene management system
//!
//! The scene graph owns every renderable in a slotmap arena; nodes refer to
//! objects and objects back to their node by key. The scene manager walks the
//! graph once per frame and fills the render queue.
//!
//! ## Architecture
//!
//! ```text
//! SceneGraph (nodes + object arena)
//!      ↓
//! SceneManager (transforms, culling, traversal)
//!      ↓
//! RenderQueue ──► BatchRenderer
//! ```

pub mod camera;
pub mod renderable_object;
pub mod scene_graph;
pub mod scene_manager;

pub use camera::{Camera, Projection};
pub use renderable_object::{GuiElement, MeshEntity, Renderable, SceneObject, SceneObjectKind};
pub use scene_graph::{Aabb, Frustum, Plane, SceneGraph, SceneNode};
pub use scene_manager::{SceneManager, TraversalStats};

use crate::foundation::collections::{NodeId, ObjectId};

/// Errors raised by scene graph operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// Node key does not refer to a live node
    #[error("Unknown scene node {0:?}")]
    UnknownNode(NodeId),

    /// Object key does not refer to a live object
    #[error("Unknown scene object {0:?}")]
    UnknownObject(ObjectId),

    /// Objects belong to at most one node
    #[error("Object {object:?} is already attached to node {node:?}")]
    AlreadyAttached {
        /// Object being attached
        object: ObjectId,
        /// Node it is attached to
        node: NodeId,
    },

    /// The root node lives as long as the graph
    #[error("The root node cannot be removed")]
    CannotRemoveRoot,
}

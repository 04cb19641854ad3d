//! Scene Manager - owns the scene graph and builds the render queue
//!
//! Once per frame the manager:
//! 1. Propagates node transforms to attached objects
//! 2. Walks the graph depth-first from the root
//! 3. Culls objects whose world bounds miss the camera frustum (optional)
//! 4. Lets every remaining object contribute at most one queue item
//!
//! Sorting and submission are left to [`BatchRenderer`].

use crate::core::config::{EngineConfig, SceneConfig};
use crate::foundation::collections::ObjectId;
use crate::render::batch_renderer::{BatchRenderer, FrameStats};
use crate::render::device::RenderDevice;
use crate::render::render_queue::{RenderOrder, RenderQueue};
use crate::scene::camera::Camera;
use crate::scene::scene_graph::SceneGraph;

/// Counters from one traversal pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Attached objects reached from the root
    pub visited: usize,
    /// Objects outside the frustum
    pub culled: usize,
    /// Hidden objects and objects without geometry
    pub skipped: usize,
    /// Items added to the queue
    pub queued: usize,
}

/// Scene Manager - coordinates the scene graph, traversal and the render queue
#[derive(Debug)]
pub struct SceneManager {
    /// Configuration
    config: SceneConfig,

    /// Node hierarchy and object arena
    graph: SceneGraph,

    /// Queue rebuilt by every traversal
    queue: RenderQueue,

    /// Reused traversal buffer
    scratch: Vec<ObjectId>,
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneManager {
    /// Create a new scene manager with default configuration
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create a scene manager from engine configuration
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            config: config.scene.clone(),
            graph: SceneGraph::new(),
            queue: RenderQueue::with_capacity(config.queue.initial_bucket_capacity),
            scratch: Vec::new(),
        }
    }

    /// Scene configuration in use
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Enable or disable frustum culling
    pub fn set_frustum_culling(&mut self, enabled: bool) {
        self.config.frustum_culling = enabled;
    }

    /// The scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable scene graph, for building the scene and sprite batching
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// The queue filled by the last traversal
    pub fn queue(&self) -> &RenderQueue {
        &self.queue
    }

    /// Rebuild the render queue for `camera` using `order`
    ///
    /// The queue is cleared first, so calling this twice in a frame yields
    /// the same queue contents as calling it once.
    pub fn update_render_queue(&mut self, camera: &Camera, order: RenderOrder) -> TraversalStats {
        self.queue.clear_all();
        self.graph.update_world_transforms();

        self.scratch.clear();
        self.graph.collect_attached_objects(&mut self.scratch);

        let frustum = self.config.frustum_culling.then(|| camera.frustum());
        let mut stats = TraversalStats {
            visited: self.scratch.len(),
            ..TraversalStats::default()
        };

        for id in &self.scratch {
            let Some(object) = self.graph.object(*id) else {
                continue;
            };

            if let (Some(frustum), Some(bounds)) = (&frustum, object.world_bounds()) {
                if !frustum.intersects_aabb(&bounds) {
                    stats.culled += 1;
                    continue;
                }
            }

            match object.contribute(*id, &mut self.queue, camera, order) {
                Some(_) => stats.queued += 1,
                None => stats.skipped += 1,
            }
        }

        log::debug!(
            "Traversal queued {} of {} objects ({} culled, {} skipped)",
            stats.queued,
            stats.visited,
            stats.culled,
            stats.skipped
        );
        stats
    }

    /// Traverse with the configured default order
    pub fn update_render_queue_default(&mut self, camera: &Camera) -> TraversalStats {
        let order = self.config.default_render_order;
        self.update_render_queue(camera, order)
    }

    /// Traverse, sort and submit one frame
    pub fn render_frame(
        &mut self,
        renderer: &mut BatchRenderer,
        camera: &Camera,
        order: RenderOrder,
        device: &mut dyn RenderDevice,
    ) -> FrameStats {
        self.update_render_queue(camera, order);
        self.submit(renderer, device)
    }

    /// Sort and submit the queue built by the last traversal
    pub fn submit(&mut self, renderer: &mut BatchRenderer, device: &mut dyn RenderDevice) -> FrameStats {
        renderer.render(&mut self.queue, &self.graph, device)
    }
}

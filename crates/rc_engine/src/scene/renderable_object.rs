//! Renderable objects attached to the scene graph
//!
//! Every kind of renderable (meshes, sprite batch entities, GUI elements)
//! implements [`Renderable`]. [`SceneObject`] wraps one of them in a closed
//! enum together with the per-object state the scene owns: visibility, the
//! owning node and the propagated world transform.

use crate::foundation::collections::{NodeId, ObjectId};
use crate::foundation::math::{Mat4, Vec3};
use crate::render::device::{DrawCall, RenderDevice, RenderOperation};
use crate::render::material::Material;
use crate::render::render_queue::{BucketId, ObjectKind, RenderOrder, RenderQueue, RenderQueueItem, SortKey};
use crate::render::sprite_batch::SpriteEntity;
use crate::render::RenderResult;
use crate::scene::camera::Camera;
use crate::scene::scene_graph::Aabb;

/// Capabilities shared by every renderable kind
pub trait Renderable {
    /// Logical type carried by queue items
    fn kind(&self) -> ObjectKind;

    /// Bucket the renderable is queued into
    fn bucket(&self) -> BucketId;

    /// Material bound when drawing
    fn material(&self) -> &Material;

    /// Geometry bindings and ranges
    fn render_operation(&self) -> &RenderOperation;

    /// Whether there are indices to draw
    fn has_geometry(&self) -> bool {
        self.render_operation().index_count > 0
    }

    /// Sort key for a pass; state-change order by default
    fn sort_key(&self, _world: &Mat4, _camera: &Camera, _order: RenderOrder) -> SortKey {
        SortKey::from_material(self.material().resource_handle)
    }

    /// Object-space bounds, if the renderable can be culled
    fn local_bounds(&self) -> Option<Aabb> {
        None
    }
}

/// Indexed mesh with one material
#[derive(Debug, Clone)]
pub struct MeshEntity {
    /// Bound material
    pub material: Material,
    /// Geometry bindings
    pub operation: RenderOperation,
    /// Object-space bounds
    pub bounds: Option<Aabb>,
}

impl MeshEntity {
    /// Create a mesh without bounds (never culled)
    pub fn new(material: Material, operation: RenderOperation) -> Self {
        Self {
            material,
            operation,
            bounds: None,
        }
    }

    /// Set object-space bounds
    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

impl Renderable for MeshEntity {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Mesh
    }

    fn bucket(&self) -> BucketId {
        if self.material.is_transparent() {
            BucketId::Transparent
        } else {
            BucketId::Opaque
        }
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn render_operation(&self) -> &RenderOperation {
        &self.operation
    }

    fn sort_key(&self, world: &Mat4, camera: &Camera, order: RenderOrder) -> SortKey {
        if order == RenderOrder::StateChange {
            return SortKey::from_material(self.material.resource_handle);
        }
        let center = match self.bounds {
            Some(bounds) => bounds.transformed(world).center(),
            None => Vec3::new(world[(0, 3)], world[(1, 3)], world[(2, 3)]),
        };
        SortKey::from_depth(camera.distance_to(&center), order, self.material.resource_handle)
    }

    fn local_bounds(&self) -> Option<Aabb> {
        self.bounds
    }
}

/// Screen-space GUI element
#[derive(Debug, Clone)]
pub struct GuiElement {
    /// Bound material
    pub material: Material,
    /// Geometry bindings
    pub operation: RenderOperation,
}

impl GuiElement {
    /// Create a GUI element
    pub fn new(material: Material, operation: RenderOperation) -> Self {
        Self { material, operation }
    }
}

impl Renderable for GuiElement {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Gui
    }

    fn bucket(&self) -> BucketId {
        BucketId::Gui
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn render_operation(&self) -> &RenderOperation {
        &self.operation
    }
}

/// The renderable held by a [`SceneObject`]
#[derive(Debug)]
pub enum SceneObjectKind {
    /// Mesh
    Mesh(MeshEntity),
    /// Sprite batch entity for one texture
    Sprite(SpriteEntity),
    /// GUI element
    Gui(GuiElement),
}

/// An object living in the scene graph's arena
#[derive(Debug)]
pub struct SceneObject {
    /// Debug name
    pub name: String,
    /// Hidden objects are never queued
    pub visible: bool,
    /// The renderable itself
    pub renderable: SceneObjectKind,
    owner: Option<NodeId>,
    pub(crate) world: Mat4,
}

impl SceneObject {
    fn with_kind(name: impl Into<String>, renderable: SceneObjectKind) -> Self {
        Self {
            name: name.into(),
            visible: true,
            renderable,
            owner: None,
            world: Mat4::identity(),
        }
    }

    /// Wrap a mesh
    pub fn mesh(name: impl Into<String>, mesh: MeshEntity) -> Self {
        Self::with_kind(name, SceneObjectKind::Mesh(mesh))
    }

    /// Wrap a sprite batch entity
    pub fn sprite(name: impl Into<String>, sprite: SpriteEntity) -> Self {
        Self::with_kind(name, SceneObjectKind::Sprite(sprite))
    }

    /// Wrap a GUI element
    pub fn gui(name: impl Into<String>, element: GuiElement) -> Self {
        Self::with_kind(name, SceneObjectKind::Gui(element))
    }

    /// Node this object is attached to
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<NodeId>) {
        self.owner = owner;
    }

    /// World transform as of the last propagation
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    /// The renderable behind this object
    pub fn as_renderable(&self) -> &dyn Renderable {
        match &self.renderable {
            SceneObjectKind::Mesh(mesh) => mesh,
            SceneObjectKind::Sprite(sprite) => sprite,
            SceneObjectKind::Gui(element) => element,
        }
    }

    /// Sprite entity, if this object is one
    pub fn as_sprite(&self) -> Option<&SpriteEntity> {
        match &self.renderable {
            SceneObjectKind::Sprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    /// Mutable sprite entity, if this object is one
    pub fn as_sprite_mut(&mut self) -> Option<&mut SpriteEntity> {
        match &mut self.renderable {
            SceneObjectKind::Sprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    /// World-space bounds, if the renderable has object-space bounds
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.as_renderable().local_bounds().map(|bounds| bounds.transformed(&self.world))
    }

    /// Whether this object would enter the queue this pass
    pub fn is_renderable(&self) -> bool {
        self.visible && self.as_renderable().has_geometry()
    }

    /// Add at most one item for this object to `queue`
    ///
    /// Hidden objects and objects without geometry add nothing.
    pub fn contribute(
        &self,
        id: ObjectId,
        queue: &mut RenderQueue,
        camera: &Camera,
        order: RenderOrder,
    ) -> Option<RenderQueueItem> {
        if !self.is_renderable() {
            return None;
        }

        let renderable = self.as_renderable();
        let item = RenderQueueItem::new(id, renderable.sort_key(&self.world, camera, order), renderable.kind());
        queue.add_to_queue(item, renderable.bucket());
        Some(item)
    }

    /// Issue this object's draw
    pub fn submit(&self, id: ObjectId, device: &mut dyn RenderDevice) -> RenderResult<()> {
        let renderable = self.as_renderable();
        device.draw(&DrawCall {
            object: id,
            material: renderable.material(),
            operation: renderable.render_operation(),
            world: &self.world,
        })
    }
}

//! Scene graph and spatial primitives
//!
//! Nodes and objects live in two slot-map arenas. A node knows its parent,
//! its children (in insertion order) and the objects attached to it (in
//! attachment order); an object knows the node it is attached to. All of
//! these relations are keys, so removing a node never leaves a dangling
//! reference behind, only keys that no longer resolve.

use crate::foundation::collections::{HandleMap, NodeId, ObjectId};
use crate::foundation::math::{Mat4, Point3, Transform, Vec3, Vec4};
use crate::scene::renderable_object::SceneObject;
use crate::scene::SceneError;

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Box enclosing this box after `matrix` is applied to all eight corners
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let mut min = Vec3::repeat(f32::INFINITY);
        let mut max = Vec3::repeat(f32::NEG_INFINITY);

        for i in 0..8 {
            let corner = Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let world = matrix.transform_point(&corner).coords;
            min = min.inf(&world);
            max = max.sup(&world);
        }

        Self { min, max }
    }
}

/// Plane defined by normal and distance from origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Normal vector (should be normalized)
    pub normal: Vec3,
    /// Distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a new plane from normal and distance
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal: normal.normalize(), distance }
    }

    /// Plane `ax + by + cz + d = 0`, normalized
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = coefficients.xyz();
        let length = normal.magnitude();
        if length <= f32::EPSILON {
            return Self { normal: Vec3::zeros(), distance: 0.0 };
        }
        Self {
            normal: normal / length,
            distance: coefficients.w / length,
        }
    }

    /// Calculate signed distance from plane to point
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) + self.distance
    }
}

/// Frustum for visibility culling
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    /// Six inward-facing planes (left, right, bottom, top, near, far)
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Create a frustum from six planes
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract frustum planes from a view-projection matrix
    ///
    /// Gribb-Hartmann extraction for clip-space depth in `[-1, 1]`. The
    /// resulting planes face inwards.
    pub fn from_matrix(vp_matrix: &Mat4) -> Self {
        let row = |i: usize| -> Vec4 { vp_matrix.row(i).transpose() };
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        Self {
            planes: [
                Plane::from_coefficients(r3 + r0),
                Plane::from_coefficients(r3 - r0),
                Plane::from_coefficients(r3 + r1),
                Plane::from_coefficients(r3 - r1),
                Plane::from_coefficients(r3 + r2),
                Plane::from_coefficients(r3 - r2),
            ],
        }
    }

    /// Check if an AABB is inside or intersects the frustum
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        for plane in &self.planes {
            // Corner furthest along the plane normal
            let mut p = aabb.min;
            if plane.normal.x >= 0.0 { p.x = aabb.max.x; }
            if plane.normal.y >= 0.0 { p.y = aabb.max.y; }
            if plane.normal.z >= 0.0 { p.z = aabb.max.z; }

            if plane.distance_to_point(p) < 0.0 {
                return false;
            }
        }

        true
    }
}

/// A node in the scene hierarchy
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Debug name
    pub name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    objects: Vec<ObjectId>,
    local: Transform,
    world: Mat4,
}

impl SceneNode {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            objects: Vec::new(),
            local: Transform::identity(),
            world: Mat4::identity(),
        }
    }

    /// Parent node; `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Attached objects in attachment order
    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    /// Transform relative to the parent
    pub fn local_transform(&self) -> &Transform {
        &self.local
    }

    /// Object-to-world matrix as of the last propagation
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }
}

/// Node hierarchy plus the arena of objects attached to it
#[derive(Debug)]
pub struct SceneGraph {
    nodes: HandleMap<NodeId, SceneNode>,
    objects: HandleMap<ObjectId, SceneObject>,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph holding only the root node
    pub fn new() -> Self {
        let mut nodes = HandleMap::with_key();
        let root = nodes.insert(SceneNode::new("Root".to_string(), None));
        Self {
            nodes,
            objects: HandleMap::with_key(),
            root,
        }
    }

    /// Root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node
    pub fn node(&self, node: NodeId) -> Option<&SceneNode> {
        self.nodes.get(node)
    }

    /// Number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of objects, attached or not
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Create a node under `parent`, after its existing children
    pub fn create_child_node(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        let child = self.nodes.insert(SceneNode::new(name.into(), Some(parent)));
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(child);
        }
        Ok(child)
    }

    /// Replace a node's local transform
    pub fn set_local_transform(&mut self, node: NodeId, transform: Transform) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(node).ok_or(SceneError::UnknownNode(node))?;
        node.local = transform;
        Ok(())
    }

    /// Put an object in the arena without attaching it
    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        self.objects.insert(object)
    }

    /// Put an object in the arena and attach it to `node`
    pub fn spawn_object(&mut self, node: NodeId, object: SceneObject) -> Result<ObjectId, SceneError> {
        if !self.nodes.contains_key(node) {
            return Err(SceneError::UnknownNode(node));
        }
        let id = self.objects.insert(object);
        self.attach_object(node, id)?;
        Ok(id)
    }

    /// Look up an object
    pub fn object(&self, object: ObjectId) -> Option<&SceneObject> {
        self.objects.get(object)
    }

    /// Look up an object mutably
    pub fn object_mut(&mut self, object: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(object)
    }

    /// Attach an unattached object to `node`, after its existing objects
    pub fn attach_object(&mut self, node: NodeId, object: ObjectId) -> Result<(), SceneError> {
        let entry = self.objects.get_mut(object).ok_or(SceneError::UnknownObject(object))?;
        if let Some(owner) = entry.owner() {
            return Err(SceneError::AlreadyAttached { object, node: owner });
        }
        let node_entry = self.nodes.get_mut(node).ok_or(SceneError::UnknownNode(node))?;

        node_entry.objects.push(object);
        entry.set_owner(Some(node));
        entry.world = node_entry.world;
        Ok(())
    }

    /// Detach an object from its node; the object stays in the arena
    pub fn detach_object(&mut self, object: ObjectId) -> Result<(), SceneError> {
        let entry = self.objects.get_mut(object).ok_or(SceneError::UnknownObject(object))?;
        if let Some(owner) = entry.owner() {
            entry.set_owner(None);
            if let Some(node) = self.nodes.get_mut(owner) {
                node.objects.retain(|attached| *attached != object);
            }
        }
        Ok(())
    }

    /// Remove an object from the arena, detaching it first
    pub fn destroy_object(&mut self, object: ObjectId) -> Result<SceneObject, SceneError> {
        self.detach_object(object)?;
        self.objects.remove(object).ok_or(SceneError::UnknownObject(object))
    }

    /// Remove a node and its whole subtree
    ///
    /// Objects attached anywhere in the subtree are detached but kept.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), SceneError> {
        if node == self.root {
            return Err(SceneError::CannotRemoveRoot);
        }
        let parent = self.nodes.get(node).ok_or(SceneError::UnknownNode(node))?.parent;
        if let Some(parent_node) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent_node.children.retain(|child| *child != node);
        }

        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            if let Some(removed) = self.nodes.remove(current) {
                for object in removed.objects {
                    if let Some(entry) = self.objects.get_mut(object) {
                        entry.set_owner(None);
                    }
                }
                pending.extend(removed.children);
            }
        }
        Ok(())
    }

    /// Recompute world matrices from the root down and copy them to attached objects
    pub fn update_world_transforms(&mut self) {
        let mut pending = vec![(self.root, Mat4::identity())];

        while let Some((node_id, parent_world)) = pending.pop() {
            let Some(node) = self.nodes.get_mut(node_id) else {
                continue;
            };
            node.world = parent_world * node.local.to_matrix();
            let world = node.world;

            for object in &node.objects {
                if let Some(entry) = self.objects.get_mut(*object) {
                    entry.world = world;
                }
            }
            pending.extend(node.children.iter().map(|child| (*child, world)));
        }
    }

    /// Append every attached object to `out`, depth-first from the root
    ///
    /// A node's own objects come before its children's; children are visited
    /// in insertion order and objects in attachment order.
    pub fn collect_attached_objects(&self, out: &mut Vec<ObjectId>) {
        let mut pending = vec![self.root];

        while let Some(node_id) = pending.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            out.extend_from_slice(&node.objects);
            pending.extend(node.children.iter().rev());
        }
    }
}

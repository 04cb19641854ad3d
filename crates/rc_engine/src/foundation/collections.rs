//! Stable handle types for arena-backed collections
//!
//! Scene nodes and scene objects live in slot maps so that relations between
//! them are plain keys rather than pointers. A key that outlives its entry
//! simply fails to resolve.

pub use slotmap::{SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Handle to a node in the scene graph
    pub struct NodeId;

    /// Handle to an object owned by the scene graph (mesh, sprite, GUI element)
    pub struct ObjectId;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<K, T> = SlotMap<K, T>;

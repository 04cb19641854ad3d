//! # Render Queue System
//!
//! Collects one item per visible renderable each frame, partitioned into
//! buckets by rendering purpose. The queue never sorts; the batch renderer
//! sorts each bucket in place and submits buckets in a fixed order.
//!
//! ## Architecture
//!
//! - **RenderQueue**: One append-only sequence per [`BucketId`], cleared every frame
//! - **RenderQueueItem**: Object handle, sort key and logical kind
//! - **SortKey**: 64-bit ordering value derived from material identity or depth
//!
//! ## Frame Lifecycle
//!
//! `clear_all` once before traversal, `add_to_queue` during traversal, then
//! `bucket_mut` per bucket for the in-place sort.

use serde::{Deserialize, Serialize};

use crate::foundation::collections::ObjectId;
use crate::render::material::ResourceHandle;

/// Ordering a traversal pass asks renderables for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RenderOrder {
    /// Group draws by material to minimise state changes
    #[default]
    StateChange,
    /// Far to near, for alpha blending
    BackToFront,
    /// Near to far, for early depth rejection
    FrontToBack,
}

/// Numeric ordering value; buckets are sorted by ascending key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SortKey(pub u64);

impl SortKey {
    /// Key that groups draws sharing an effect
    pub const fn from_material(handle: ResourceHandle) -> Self {
        Self(handle.0)
    }

    /// Key ordering by camera distance first and material second
    ///
    /// The distance occupies the high 32 bits, so items at equal distance
    /// still group by material. [`RenderOrder::StateChange`] ignores the
    /// distance entirely.
    pub fn from_depth(distance: f32, order: RenderOrder, material: ResourceHandle) -> Self {
        let depth = match order {
            RenderOrder::StateChange => return Self::from_material(material),
            RenderOrder::FrontToBack => ordered_bits(distance),
            RenderOrder::BackToFront => u32::MAX - ordered_bits(distance),
        };
        Self((u64::from(depth) << 32) | (material.0 & 0xFFFF_FFFF))
    }
}

/// Map an `f32` onto a `u32` whose unsigned order matches the float order
fn ordered_bits(value: f32) -> u32 {
    let bits = value.to_bits();
    if bits & 0x8000_0000 == 0 {
        bits | 0x8000_0000
    } else {
        !bits
    }
}

/// Queue partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketId {
    /// Opaque geometry, populates depth first
    Opaque,
    /// Blended geometry, reads opaque depth
    Transparent,
    /// GUI elements
    Gui,
    /// Batched sprites
    Sprite,
}

impl BucketId {
    /// Number of buckets
    pub const COUNT: usize = 4;

    /// Order in which buckets are submitted
    pub const SUBMISSION_ORDER: [Self; Self::COUNT] = [Self::Opaque, Self::Transparent, Self::Gui, Self::Sprite];

    /// Index of the bucket's storage slot
    pub const fn index(self) -> usize {
        match self {
            Self::Opaque => 0,
            Self::Transparent => 1,
            Self::Gui => 2,
            Self::Sprite => 3,
        }
    }
}

/// Logical type of the renderable behind an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Mesh entity
    Mesh,
    /// Sprite batch entity
    Sprite,
    /// GUI element
    Gui,
}

/// One renderable's entry for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderQueueItem {
    /// Renderable, owned by the scene graph
    pub object: ObjectId,
    /// Ordering value within the bucket
    pub sort_key: SortKey,
    /// Logical type
    pub kind: ObjectKind,
}

impl RenderQueueItem {
    /// Create an item
    pub const fn new(object: ObjectId, sort_key: SortKey, kind: ObjectKind) -> Self {
        Self { object, sort_key, kind }
    }
}

/// Per-frame collection of render items, one sequence per bucket
#[derive(Debug, Default)]
pub struct RenderQueue {
    buckets: [Vec<RenderQueueItem>; BucketId::COUNT],
}

impl RenderQueue {
    /// Create an empty render queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a render queue with capacity reserved in every bucket
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: std::array::from_fn(|_| Vec::with_capacity(capacity)),
        }
    }

    /// Append an item to a bucket
    pub fn add_to_queue(&mut self, item: RenderQueueItem, bucket: BucketId) {
        self.buckets[bucket.index()].push(item);
    }

    /// Items of a bucket in their current order
    pub fn bucket(&self, bucket: BucketId) -> &[RenderQueueItem] {
        &self.buckets[bucket.index()]
    }

    /// Mutable access to a bucket, for in-place sorting
    pub fn bucket_mut(&mut self, bucket: BucketId) -> &mut Vec<RenderQueueItem> {
        &mut self.buckets[bucket.index()]
    }

    /// Empty every bucket, keeping their allocations
    pub fn clear_all(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    /// Total number of items across all buckets
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Check if every bucket is empty
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}

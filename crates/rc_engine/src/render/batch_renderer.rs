//! # Batch Renderer
//!
//! Drains a filled [`RenderQueue`] into a [`RenderDevice`]. Each bucket is
//! sorted in place by ascending key, then buckets are submitted in
//! [`BucketId::SUBMISSION_ORDER`].
//!
//! The sort is stable: items with equal keys keep the order the scene
//! traversal produced them in. A draw that fails is logged and skipped; it
//! never aborts the frame.

use std::time::Instant;

use crate::render::device::RenderDevice;
use crate::render::material::ResourceHandle;
use crate::render::render_queue::{BucketId, RenderQueue, RenderQueueItem};
use crate::scene::scene_graph::SceneGraph;

/// Statistics for one rendered frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Draws the device accepted
    pub submitted: usize,

    /// Draws the device rejected
    pub failed: usize,

    /// Items whose object no longer exists in the scene
    pub skipped: usize,

    /// Number of material changes between consecutive accepted draws
    pub state_changes: usize,

    /// Items per bucket, indexed by [`BucketId::index`]
    pub per_bucket: [usize; BucketId::COUNT],

    /// Time spent sorting buckets (microseconds)
    pub sort_time_us: u64,

    /// Time spent submitting draws (microseconds)
    pub submission_time_us: u64,
}

impl FrameStats {
    /// Items seen across all buckets
    pub fn total_items(&self) -> usize {
        self.per_bucket.iter().sum()
    }

    /// Get total frame time in microseconds
    pub fn total_time_us(&self) -> u64 {
        self.sort_time_us + self.submission_time_us
    }
}

/// Sorts and submits render queue buckets
#[derive(Debug, Default)]
pub struct BatchRenderer {
    stats: FrameStats,
}

impl BatchRenderer {
    /// Create a batch renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics of the last rendered frame
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Stable sort by ascending key
    pub fn sort_bucket(items: &mut [RenderQueueItem]) {
        items.sort_by_key(|item| item.sort_key);
    }

    /// Sort every bucket of `queue` in place
    pub fn sort_buckets(queue: &mut RenderQueue) {
        for bucket in BucketId::SUBMISSION_ORDER {
            Self::sort_bucket(queue.bucket_mut(bucket));
        }
    }

    /// Sort and submit every bucket of `queue`
    ///
    /// The queue is left sorted; clearing it is the next traversal's job.
    pub fn render(&mut self, queue: &mut RenderQueue, scene: &SceneGraph, device: &mut dyn RenderDevice) -> FrameStats {
        let mut stats = FrameStats::default();

        let sort_start = Instant::now();
        Self::sort_buckets(queue);
        stats.sort_time_us = sort_start.elapsed().as_micros() as u64;

        let submit_start = Instant::now();
        let mut last_material: Option<ResourceHandle> = None;

        for bucket in BucketId::SUBMISSION_ORDER {
            let items = queue.bucket(bucket);
            stats.per_bucket[bucket.index()] = items.len();

            for item in items {
                let Some(object) = scene.object(item.object) else {
                    log::warn!("Skipping queued {:?} {:?}: object no longer exists", item.kind, item.object);
                    stats.skipped += 1;
                    continue;
                };

                match object.submit(item.object, device) {
                    Ok(()) => {
                        let material = object.as_renderable().material().resource_handle;
                        if last_material != Some(material) {
                            stats.state_changes += 1;
                            last_material = Some(material);
                        }
                        stats.submitted += 1;
                    }
                    Err(e) => {
                        log::warn!("Draw for '{}' in {:?} bucket failed: {}", object.name, bucket, e);
                        stats.failed += 1;
                    }
                }
            }
        }
        stats.submission_time_us = submit_start.elapsed().as_micros() as u64;

        log::trace!(
            "Frame submitted {} draws ({} failed, {} skipped, {} state changes)",
            stats.submitted,
            stats.failed,
            stats.skipped,
            stats.state_changes
        );

        self.stats = stats.clone();
        stats
    }
}

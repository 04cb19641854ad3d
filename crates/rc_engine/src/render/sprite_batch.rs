//! # Sprite Batch
//!
//! Accumulates textured quads between `begin` and `end`, one geometry bucket
//! per texture. Each bucket is an ordinary [`SceneObject`] attached to the
//! scene root, so sprites reach the device through the same traversal, sort
//! and submission path as every other renderable.
//!
//! ## Frame Lifecycle
//!
//! - `begin`: empty every bucket (allocations kept)
//! - `draw*`: append four vertices and six indices to the texture's bucket
//! - `end`: upload dirty buckets in full and show them; hide empty ones
//!
//! Buckets are never removed, so a texture keeps its GPU buffers across
//! frames in which it is not drawn.

use std::collections::HashMap;

use crate::core::config::SpriteBatchConfig;
use crate::foundation::collections::ObjectId;
use crate::foundation::math::{rotate_about, Color, IntRect, Vec2};
use crate::render::device::{upload_buffer, RenderDevice, RenderOperation};
use crate::render::material::Material;
use crate::render::render_queue::{BucketId, ObjectKind};
use crate::render::resources::{BufferDesc, Texture, TextureId};
use crate::render::{RenderError, RenderResult};
use crate::scene::renderable_object::{Renderable, SceneObject};
use crate::scene::scene_graph::SceneGraph;

/// Material parameter the sprite texture is bound to
pub const SPRITE_TEXTURE_PARAMETER: &str = "SpriteTexture";

/// Vertices one texture bucket can address with 16-bit indices
pub const MAX_SPRITE_VERTICES: usize = u16::MAX as usize + 1;

/// Sprite vertex as uploaded to the device
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    /// Screen position, layer depth in z
    pub position: [f32; 3],
    /// Texture coordinate
    pub tex_coord: [f32; 2],
    /// Vertex color
    pub color: [f32; 4],
}

impl SpriteVertex {
    /// Size in bytes of one vertex
    pub const STRIDE: u32 = std::mem::size_of::<Self>() as u32;

    fn new(position: Vec2, depth: f32, tex_coord: [f32; 2], color: Color) -> Self {
        Self {
            position: [position.x, position.y, depth],
            tex_coord,
            color: color.to_array(),
        }
    }
}

/// Geometry bucket for one texture
#[derive(Debug)]
pub struct SpriteEntity {
    texture: TextureId,
    material: Material,
    vertices: Vec<SpriteVertex>,
    indices: Vec<u16>,
    operation: RenderOperation,
    dirty: bool,
}

impl SpriteEntity {
    /// Create an empty bucket with room for `sprite_capacity` sprites
    pub fn new(texture: TextureId, mut material: Material, sprite_capacity: usize) -> Self {
        material.set_texture(SPRITE_TEXTURE_PARAMETER, texture);
        Self {
            texture,
            material,
            vertices: Vec::with_capacity(sprite_capacity * 4),
            indices: Vec::with_capacity(sprite_capacity * 6),
            operation: RenderOperation {
                vertex_stride: SpriteVertex::STRIDE,
                ..RenderOperation::default()
            },
            dirty: true,
        }
    }

    /// Texture this bucket draws with
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    /// Accumulated vertices
    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    /// Accumulated indices
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Whether nothing has been drawn since the last clear
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Whether the geometry changed since the last upload
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Drop accumulated geometry, keeping the allocations
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Append one quad, corners in TL, BL, BR, TR order
    fn push_quad(&mut self, corners: [Vec2; 4], tex_coords: [[f32; 2]; 4], depth: f32, color: Color) -> RenderResult<()> {
        if self.vertices.len() + 4 > MAX_SPRITE_VERTICES {
            return Err(RenderError::SpriteCapacityExceeded {
                texture: self.texture,
                vertices: self.vertices.len(),
            });
        }

        let base = u16::try_from(self.vertices.len()).map_err(|_| RenderError::SpriteCapacityExceeded {
            texture: self.texture,
            vertices: self.vertices.len(),
        })?;

        for (corner, tex_coord) in corners.into_iter().zip(tex_coords) {
            self.vertices.push(SpriteVertex::new(corner, depth, tex_coord, color));
        }
        self.indices.extend([0, 1, 2, 2, 3, 0].map(|offset| base + offset));
        self.dirty = true;
        Ok(())
    }

    /// Upload the geometry if it changed since the last upload
    ///
    /// Buffers are created on first use. Returns whether an upload happened.
    pub fn update_geometry_buffers(&mut self, device: &mut dyn RenderDevice) -> RenderResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        if self.is_empty() {
            self.operation.index_count = 0;
            self.dirty = false;
            return Ok(false);
        }

        let vertex_buffer = match self.operation.vertex_buffer {
            Some(buffer) => buffer,
            None => {
                let buffer = device.create_buffer(&BufferDesc::dynamic_vertices(self.vertices.len(), SpriteVertex::STRIDE))?;
                self.operation.vertex_buffer = Some(buffer);
                buffer
            }
        };
        let index_buffer = match self.operation.index_buffer {
            Some(buffer) => buffer,
            None => {
                let buffer = device.create_buffer(&BufferDesc::dynamic_indices_u16(self.indices.len()))?;
                self.operation.index_buffer = Some(buffer);
                buffer
            }
        };

        upload_buffer(device, vertex_buffer, bytemuck::cast_slice(&self.vertices))?;
        upload_buffer(device, index_buffer, bytemuck::cast_slice(&self.indices))?;

        self.operation.index_count = self.indices.len() as u32;
        self.dirty = false;
        Ok(true)
    }
}

impl Renderable for SpriteEntity {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Sprite
    }

    fn bucket(&self) -> BucketId {
        BucketId::Sprite
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn render_operation(&self) -> &RenderOperation {
        &self.operation
    }

    fn has_geometry(&self) -> bool {
        !self.is_empty()
    }
}

/// Accumulation state of a [`SpriteBatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Outside `begin`/`end`
    Idle,
    /// Between `begin` and `end`
    Accumulating,
}

/// Per-texture sprite aggregator
#[derive(Debug)]
pub struct SpriteBatch {
    template: Material,
    batches: HashMap<TextureId, ObjectId>,
    state: BatchState,
    sprite_capacity: usize,
}

impl SpriteBatch {
    /// Create a batch whose buckets are instances of `template`
    pub fn new(template: Material, config: &SpriteBatchConfig) -> Self {
        Self {
            template,
            batches: HashMap::new(),
            state: BatchState::Idle,
            sprite_capacity: config.initial_sprite_capacity,
        }
    }

    /// Current state
    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Number of texture buckets created so far
    pub fn bucket_count(&self) -> usize {
        self.batches.len()
    }

    /// Scene object holding the bucket for `texture`
    pub fn bucket_object(&self, texture: TextureId) -> Option<ObjectId> {
        self.batches.get(&texture).copied()
    }

    fn expect_state(&self, expected: BatchState) -> RenderResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(RenderError::UnexpectedBatchState {
                expected,
                actual: self.state,
            })
        }
    }

    /// Start accumulating; every bucket is emptied
    pub fn begin(&mut self, scene: &mut SceneGraph) -> RenderResult<()> {
        self.expect_state(BatchState::Idle)?;

        self.batches.retain(|texture, object| {
            match scene.object_mut(*object).and_then(SceneObject::as_sprite_mut) {
                Some(entity) => {
                    entity.clear();
                    true
                }
                None => {
                    log::warn!("Sprite bucket for texture {:?} was removed from the scene", texture);
                    false
                }
            }
        });

        self.state = BatchState::Accumulating;
        Ok(())
    }

    fn entity_for<'s>(&mut self, scene: &'s mut SceneGraph, texture: &Texture) -> RenderResult<&'s mut SpriteEntity> {
        let object = match self.batches.get(&texture.id) {
            Some(object) => *object,
            None => {
                let material = self.template.instance(format!("{}/{}", self.template.name, texture.name));
                let entity = SpriteEntity::new(texture.id, material, self.sprite_capacity);
                let mut scene_object = SceneObject::sprite(format!("Sprite/{}", texture.name), entity);
                scene_object.visible = false;

                let object = scene.spawn_object(scene.root(), scene_object)?;
                log::debug!("Created sprite bucket for texture '{}'", texture.name);
                self.batches.insert(texture.id, object);
                object
            }
        };

        scene
            .object_mut(object)
            .and_then(SceneObject::as_sprite_mut)
            .ok_or(RenderError::UnknownObject(object))
    }

    /// Draw the whole texture stretched over `dest`
    pub fn draw(&mut self, scene: &mut SceneGraph, texture: &Texture, dest: IntRect, color: Color) -> RenderResult<()> {
        self.draw_region(scene, texture, dest, None, color, 0.0, Vec2::zeros(), 0.0)
    }

    /// Draw the whole texture (or `src`) at its own size with the top-left at `position`
    pub fn draw_at(
        &mut self,
        scene: &mut SceneGraph,
        texture: &Texture,
        position: Vec2,
        src: Option<IntRect>,
        color: Color,
    ) -> RenderResult<()> {
        self.draw_scaled(scene, texture, position, src, color, 0.0, Vec2::zeros(), Vec2::new(1.0, 1.0), 0.0)
    }

    /// Draw the texture (or `src`) scaled per axis, rotated about `origin`
    ///
    /// The destination size is the source size times `scale`, truncated to
    /// whole pixels.
    pub fn draw_scaled(
        &mut self,
        scene: &mut SceneGraph,
        texture: &Texture,
        position: Vec2,
        src: Option<IntRect>,
        color: Color,
        rotation: f32,
        origin: Vec2,
        scale: Vec2,
        layer_depth: f32,
    ) -> RenderResult<()> {
        let (width, height) = match src {
            Some(rect) => (rect.width as f32, rect.height as f32),
            None => (texture.width() as f32, texture.height() as f32),
        };
        let dest = IntRect::new(
            position.x as i32,
            position.y as i32,
            (width * scale.x) as i32,
            (height * scale.y) as i32,
        );
        self.draw_region(scene, texture, dest, src, color, rotation, origin, layer_depth)
    }

    /// [`draw_scaled`](Self::draw_scaled) with the same scale on both axes
    pub fn draw_scaled_uniform(
        &mut self,
        scene: &mut SceneGraph,
        texture: &Texture,
        position: Vec2,
        src: Option<IntRect>,
        color: Color,
        rotation: f32,
        origin: Vec2,
        scale: f32,
        layer_depth: f32,
    ) -> RenderResult<()> {
        self.draw_scaled(scene, texture, position, src, color, rotation, origin, Vec2::new(scale, scale), layer_depth)
    }

    /// Draw `src` (or the whole texture) into `dest`
    ///
    /// `origin` is the rotation pivot as a fraction of `dest`'s size and
    /// `rotation` is in radians. A fully transparent color draws nothing.
    pub fn draw_region(
        &mut self,
        scene: &mut SceneGraph,
        texture: &Texture,
        dest: IntRect,
        src: Option<IntRect>,
        color: Color,
        rotation: f32,
        origin: Vec2,
        layer_depth: f32,
    ) -> RenderResult<()> {
        self.expect_state(BatchState::Accumulating)?;
        let entity = self.entity_for(scene, texture)?;

        if color.is_fully_transparent() {
            return Ok(());
        }

        let (tex_width, tex_height) = (texture.width() as f32, texture.height() as f32);
        if tex_width <= 0.0 || tex_height <= 0.0 {
            return Ok(());
        }
        let src = src.unwrap_or_else(|| IntRect::new(0, 0, texture.width() as i32, texture.height() as i32));

        let (left, top) = (dest.x as f32, dest.y as f32);
        let (right, bottom) = (left + dest.width as f32, top + dest.height as f32);
        let pivot = Vec2::new(
            origin.x * dest.width as f32 + left,
            origin.y * dest.height as f32 + top,
        );

        let corners = [
            Vec2::new(left, top),
            Vec2::new(left, bottom),
            Vec2::new(right, bottom),
            Vec2::new(right, top),
        ]
        .map(|corner| rotate_about(corner, pivot, rotation));

        // V runs bottom-up in texture space
        let u1 = src.x as f32 / tex_width;
        let v1 = 1.0 - src.y as f32 / tex_height;
        let u2 = u1 + src.width as f32 / tex_width;
        let v2 = v1 - src.height as f32 / tex_height;

        entity.push_quad(corners, [[u1, v1], [u1, v2], [u2, v2], [u2, v1]], layer_depth, color)
    }

    /// Upload dirty buckets and set bucket visibility for this frame
    ///
    /// Non-empty buckets become visible; empty ones are hidden. A bucket whose
    /// upload fails is hidden and the failure logged; the other buckets are
    /// unaffected.
    pub fn flush(&mut self, scene: &mut SceneGraph, device: &mut dyn RenderDevice) {
        for (texture, object) in &self.batches {
            let Some(scene_object) = scene.object_mut(*object) else {
                continue;
            };
            let Some(entity) = scene_object.as_sprite_mut() else {
                continue;
            };

            let visible = if entity.is_empty() {
                false
            } else {
                match entity.update_geometry_buffers(device) {
                    Ok(_) => true,
                    Err(e) => {
                        log::error!("Failed to upload sprite geometry for texture {:?}: {}", texture, e);
                        false
                    }
                }
            };
            scene_object.visible = visible;
        }
    }

    /// Flush and stop accumulating
    pub fn end(&mut self, scene: &mut SceneGraph, device: &mut dyn RenderDevice) -> RenderResult<()> {
        self.expect_state(BatchState::Accumulating)?;
        self.flush(scene, device);
        self.state = BatchState::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::headless::HeadlessDevice;
    use crate::render::material::ResourceHandle;
    use crate::render::resources::{PixelFormat, TextureDesc};
    use approx::assert_relative_eq;

    fn batch() -> SpriteBatch {
        SpriteBatch::new(Material::new("Sprite", ResourceHandle(100)), &SpriteBatchConfig::default())
    }

    fn texture(id: u32, width: u32, height: u32) -> Texture {
        Texture::new(
            TextureId(id),
            format!("tex{id}"),
            TextureDesc::texture_2d(PixelFormat::Rgba8Unorm, width, height),
        )
    }

    fn entity<'a>(scene: &'a SceneGraph, batch: &SpriteBatch, texture: &Texture) -> &'a SpriteEntity {
        let object = batch.bucket_object(texture.id).unwrap();
        scene.object(object).and_then(SceneObject::as_sprite).unwrap()
    }

    fn positions(entity: &SpriteEntity) -> Vec<[f32; 3]> {
        entity.vertices().iter().map(|v| v.position).collect()
    }

    #[test]
    fn test_draw_unrotated_quad() {
        let mut scene = SceneGraph::new();
        let mut batch = batch();
        let tex = texture(1, 64, 64);

        batch.begin(&mut scene).unwrap();
        batch.draw(&mut scene, &tex, IntRect::new(0, 0, 10, 10), Color::WHITE).unwrap();

        let entity = entity(&scene, &batch, &tex);
        assert_eq!(
            positions(entity),
            vec![[0.0, 0.0, 0.0], [0.0, 10.0, 0.0], [10.0, 10.0, 0.0], [10.0, 0.0, 0.0]]
        );
        assert_eq!(entity.indices(), &[0, 1, 2, 2, 3, 0]);
        assert!(entity.vertices().iter().all(|v| v.color == [1.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_transparent_draw_is_a_no_op() {
        let mut scene = SceneGraph::new();
        let mut batch = batch();
        let tex = texture(1, 64, 64);

        batch.begin(&mut scene).unwrap();
        batch.draw(&mut scene, &tex, IntRect::new(0, 0, 10, 10), Color::WHITE).unwrap();
        batch.draw(&mut scene, &tex, IntRect::new(5, 5, 10, 10), Color::WHITE.with_alpha(0.0)).unwrap();

        let entity = entity(&scene, &batch, &tex);
        assert_eq!(entity.vertices().len(), 4);
        assert_eq!(entity.indices().len(), 6);
    }

    #[test]
    fn test_second_quad_indices_offset() {
        let mut scene = SceneGraph::new();
        let mut batch = batch();
        let tex = texture(1, 64, 64);

        batch.begin(&mut scene).unwrap();
        batch.draw(&mut scene, &tex, IntRect::new(0, 0, 10, 10), Color::WHITE).unwrap();
        batch.draw(&mut scene, &tex, IntRect::new(20, 0, 10, 10), Color::BLACK).unwrap();

        assert_eq!(entity(&scene, &batch, &tex).indices(), &[0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
    }

    #[test]
    fn test_source_rect_tex_coords() {
        let mut scene = SceneGraph::new();
        let mut batch = batch();
        let tex = texture(1, 100, 50);

        batch.begin(&mut scene).unwrap();
        batch
            .draw_region(
                &mut scene,
                &tex,
                IntRect::new(0, 0, 25, 25),
                Some(IntRect::new(25, 10, 50, 20)),
                Color::WHITE,
                0.0,
                Vec2::zeros(),
                0.5,
            )
            .unwrap();

        let vertices = entity(&scene, &batch, &tex).vertices().to_vec();
        let expected = [[0.25, 0.8], [0.25, 0.4], [0.75, 0.4], [0.75, 0.8]];
        for (vertex, uv) in vertices.iter().zip(expected) {
            assert_relative_eq!(vertex.tex_coord[0], uv[0], epsilon = 1e-6);
            assert_relative_eq!(vertex.tex_coord[1], uv[1], epsilon = 1e-6);
            assert_relative_eq!(vertex.position[2], 0.5);
        }
    }

    #[test]
    fn test_rotation_about_center() {
        let mut scene = SceneGraph::new();
        let mut batch = batch();
        let tex = texture(1, 64, 64);

        batch.begin(&mut scene).unwrap();
        batch
            .draw_region(
                &mut scene,
                &tex,
                IntRect::new(0, 0, 10, 10),
                None,
                Color::WHITE,
                std::f32::consts::FRAC_PI_2,
                Vec2::new(0.5, 0.5),
                0.0,
            )
            .unwrap();

        let expected = [[10.0, 0.0], [0.0, 0.0], [0.0, 10.0], [10.0, 10.0]];
        for (position, corner) in positions(entity(&scene, &batch, &tex)).iter().zip(expected) {
            assert_relative_eq!(position[0], corner[0], epsilon = 1e-5);
            assert_relative_eq!(position[1], corner[1], epsilon = 1e-5);
        }
    }

    #[test]
    fn test_draw_scaled_honours_origin_and_depth() {
        let mut scene = SceneGraph::new();
        let mut batch = batch();
        let tex = texture(1, 8, 4);

        batch.begin(&mut scene).unwrap();
        batch
            .draw_scaled(
                &mut scene,
                &tex,
                Vec2::new(10.0, 20.0),
                None,
                Color::WHITE,
                std::f32::consts::PI,
                Vec2::new(0.5, 0.5),
                Vec2::new(2.0, 3.0),
                0.25,
            )
            .unwrap();

        // 16 x 12 quad at (10, 20) turned half way about its center (18, 26)
        let positions = positions(entity(&scene, &batch, &tex));
        assert_relative_eq!(positions[0][0], 26.0, epsilon = 1e-4);
        assert_relative_eq!(positions[0][1], 32.0, epsilon = 1e-4);
        assert_relative_eq!(positions[0][2], 0.25);
    }

    #[test]
    fn test_draw_at_uses_source_size() {
        let mut scene = SceneGraph::new();
        let mut batch = batch();
        let tex = texture(1, 64, 64);

        batch.begin(&mut scene).unwrap();
        batch
            .draw_at(&mut scene, &tex, Vec2::new(3.0, 4.0), Some(IntRect::new(0, 0, 16, 8)), Color::WHITE)
            .unwrap();

        let positions = positions(entity(&scene, &batch, &tex));
        assert_eq!(positions[0], [3.0, 4.0, 0.0]);
        assert_eq!(positions[2], [19.0, 12.0, 0.0]);
    }

    #[test]
    fn test_draw_requires_begin() {
        let mut scene = SceneGraph::new();
        let mut batch = batch();
        let tex = texture(1, 64, 64);
        let mut device = HeadlessDevice::new();

        assert!(matches!(
            batch.draw(&mut scene, &tex, IntRect::new(0, 0, 1, 1), Color::WHITE),
            Err(RenderError::UnexpectedBatchState { expected: BatchState::Accumulating, actual: BatchState::Idle })
        ));
        assert!(batch.end(&mut scene, &mut device).is_err());

        batch.begin(&mut scene).unwrap();
        assert!(batch.begin(&mut scene).is_err());
        assert_eq!(batch.bucket_count(), 0);
    }

    #[test]
    fn test_one_bucket_per_texture() {
        let mut scene = SceneGraph::new();
        let mut batch = batch();
        let ship = texture(1, 32, 32);
        let rock = texture(2, 32, 32);

        batch.begin(&mut scene).unwrap();
        for _ in 0..3 {
            batch.draw(&mut scene, &ship, IntRect::new(0, 0, 4, 4), Color::WHITE).unwrap();
        }
        batch.draw(&mut scene, &rock, IntRect::new(0, 0, 4, 4), Color::WHITE).unwrap();

        assert_eq!(batch.bucket_count(), 2);
        assert_eq!(entity(&scene, &batch, &ship).vertices().len(), 12);
        assert_eq!(entity(&scene, &batch, &rock).vertices().len(), 4);

        let ship_object = scene.object(batch.bucket_object(ship.id).unwrap()).unwrap();
        assert_eq!(ship_object.owner(), Some(scene.root()));
        assert_eq!(
            ship_object.as_renderable().material().texture(SPRITE_TEXTURE_PARAMETER),
            Some(ship.id)
        );
    }

    #[test]
    fn test_end_uploads_once_and_shows_bucket() {
        let mut scene = SceneGraph::new();
        let mut batch = batch();
        let mut device = HeadlessDevice::new();
        let tex = texture(1, 64, 64);

        batch.begin(&mut scene).unwrap();
        batch.draw(&mut scene, &tex, IntRect::new(0, 0, 10, 10), Color::WHITE).unwrap();
        let object = batch.bucket_object(tex.id).unwrap();
        assert!(!scene.object(object).unwrap().visible);

        batch.flush(&mut scene, &mut device);
        batch.end(&mut scene, &mut device).unwrap();

        let scene_object = scene.object(object).unwrap();
        assert!(scene_object.visible);
        let operation = scene_object.as_renderable().render_operation().clone();
        assert_eq!(operation.index_count, 6);

        let vertex_buffer = operation.vertex_buffer.unwrap();
        let index_buffer = operation.index_buffer.unwrap();
        assert_eq!(device.upload_count(vertex_buffer), 1);
        assert_eq!(device.upload_count(index_buffer), 1);
        assert_eq!(device.buffer_data(vertex_buffer).unwrap().len(), 4 * SpriteVertex::STRIDE as usize);
        assert_eq!(
            device.buffer_data(index_buffer),
            Some(bytemuck::cast_slice::<u16, u8>(&[0, 1, 2, 2, 3, 0]))
        );
    }

    #[test]
    fn test_empty_bucket_hidden_not_removed() {
        let mut scene = SceneGraph::new();
        let mut batch = batch();
        let mut device = HeadlessDevice::new();
        let tex = texture(1, 64, 64);

        batch.begin(&mut scene).unwrap();
        batch.draw(&mut scene, &tex, IntRect::new(0, 0, 10, 10), Color::WHITE).unwrap();
        batch.end(&mut scene, &mut device).unwrap();
        let object = batch.bucket_object(tex.id).unwrap();
        let vertex_buffer = scene.object(object).unwrap().as_renderable().render_operation().vertex_buffer;

        batch.begin(&mut scene).unwrap();
        let capacity = entity(&scene, &batch, &tex).vertices.capacity();
        assert!(entity(&scene, &batch, &tex).is_empty());
        assert!(capacity >= 4);
        batch.end(&mut scene, &mut device).unwrap();

        assert_eq!(batch.bucket_object(tex.id), Some(object));
        let scene_object = scene.object(object).unwrap();
        assert!(!scene_object.visible);
        assert_eq!(scene_object.as_renderable().render_operation().vertex_buffer, vertex_buffer);
        assert_eq!(device.buffer_count(), 2);
    }

    #[test]
    fn test_capacity_limit() {
        let mut entity = SpriteEntity::new(TextureId(9), Material::new("Sprite", ResourceHandle(1)), 0);
        let quad = [Vec2::zeros(); 4];
        for _ in 0..MAX_SPRITE_VERTICES / 4 {
            entity.push_quad(quad, [[0.0, 0.0]; 4], 0.0, Color::WHITE).unwrap();
        }
        assert_eq!(*entity.indices().last().unwrap(), u16::MAX - 3);
        assert!(matches!(
            entity.push_quad(quad, [[0.0, 0.0]; 4], 0.0, Color::WHITE),
            Err(RenderError::SpriteCapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_rect_at_integer_limit_draws() {
        let mut scene = SceneGraph::new();
        let mut batch = batch();
        let tex = texture(1, 64, 64);

        batch.begin(&mut scene).unwrap();
        batch.draw(&mut scene, &tex, IntRect::new(i32::MAX - 4, 0, 10, 10), Color::WHITE).unwrap();
        batch
            .draw_scaled(
                &mut scene,
                &tex,
                Vec2::new(0.0, 0.0),
                None,
                Color::WHITE,
                0.0,
                Vec2::zeros(),
                Vec2::new(1.0e12, 1.0),
                0.0,
            )
            .unwrap();

        let positions = positions(entity(&scene, &batch, &tex));
        assert_eq!(positions.len(), 8);
        // Edges beyond i32::MAX stay representable as f32
        assert!(positions.iter().all(|p| p[0].is_finite()));
        assert!(positions[2][0] >= positions[0][0]);
        assert_relative_eq!(positions[6][0], i32::MAX as f32);
    }
}

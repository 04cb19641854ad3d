//! # Device Resource Layer
//!
//! The seam between the render core and a graphics backend. The core creates
//! views at load time, streams sprite geometry through dynamic buffers and
//! issues one draw per queue item; everything else about GPU object lifetime
//! belongs to the backend.

use crate::foundation::collections::ObjectId;
use crate::foundation::math::Mat4;
use crate::render::material::Material;
use crate::render::resources::{
    resolve_buffer_srv, resolve_buffer_uav, resolve_texture_srv, resolve_texture_uav, BufferDesc, BufferViewKind,
    ElementRange, MipRange, ShaderResourceViewDesc, SliceRange, Texture, TextureId, UnorderedAccessViewDesc,
};
use crate::render::{RenderError, RenderResult};

/// Opaque handle to a view object owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle(pub u32);

/// Opaque handle to a buffer owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Resource a view is created over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewResource {
    /// A texture
    Texture(TextureId),
    /// A buffer
    Buffer(BufferHandle),
}

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveType {
    /// Independent triangles
    #[default]
    TriangleList,
    /// Triangle strip
    TriangleStrip,
    /// Independent lines
    LineList,
    /// Points
    PointList,
}

/// Width of index buffer entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexFormat {
    /// 16-bit indices
    #[default]
    U16,
    /// 32-bit indices
    U32,
}

/// Geometry bindings and ranges for one indexed draw
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOperation {
    /// Topology
    pub primitive: PrimitiveType,
    /// Vertex stream, once created
    pub vertex_buffer: Option<BufferHandle>,
    /// Index stream, once created
    pub index_buffer: Option<BufferHandle>,
    /// Index width
    pub index_format: IndexFormat,
    /// Bytes per vertex
    pub vertex_stride: u32,
    /// First index read
    pub start_index: u32,
    /// Number of indices read
    pub index_count: u32,
    /// Added to every index before fetching a vertex
    pub base_vertex: i32,
}

impl RenderOperation {
    /// Indexed triangle list over the given buffers
    pub fn indexed(vertex_buffer: BufferHandle, index_buffer: BufferHandle, vertex_stride: u32, index_count: u32) -> Self {
        Self {
            vertex_buffer: Some(vertex_buffer),
            index_buffer: Some(index_buffer),
            vertex_stride,
            index_count,
            ..Self::default()
        }
    }

    /// Whether there is anything to draw
    pub fn has_geometry(&self) -> bool {
        self.index_count > 0 && self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }
}

/// Everything the device needs to draw one renderable
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    /// Scene object being drawn
    pub object: ObjectId,
    /// Bound material
    pub material: &'a Material,
    /// Geometry bindings
    pub operation: &'a RenderOperation,
    /// Object-to-world transform
    pub world: &'a Mat4,
}

/// Graphics backend as seen by the render core
///
/// Calls are synchronous; a failure is final for that call and is never
/// retried by the core.
pub trait RenderDevice {
    /// Create a shader-resource view from a resolved descriptor
    fn create_shader_resource_view(
        &mut self,
        resource: ViewResource,
        desc: &ShaderResourceViewDesc,
    ) -> RenderResult<ViewHandle>;

    /// Create an unordered-access view from a resolved descriptor
    fn create_unordered_access_view(
        &mut self,
        resource: ViewResource,
        desc: &UnorderedAccessViewDesc,
    ) -> RenderResult<ViewHandle>;

    /// Create a buffer
    fn create_buffer(&mut self, desc: &BufferDesc) -> RenderResult<BufferHandle>;

    /// Reallocate a buffer to `size_bytes`; previous contents are undefined
    fn resize_buffer(&mut self, buffer: BufferHandle, size_bytes: usize) -> RenderResult<()>;

    /// Map a buffer for CPU writes
    fn map_buffer(&mut self, buffer: BufferHandle) -> RenderResult<&mut [u8]>;

    /// Finish CPU writes started with [`RenderDevice::map_buffer`]
    fn unmap_buffer(&mut self, buffer: BufferHandle) -> RenderResult<()>;

    /// Issue one draw
    fn draw(&mut self, call: &DrawCall<'_>) -> RenderResult<()>;
}

/// Replace a buffer's entire contents: resize, map, copy, unmap
pub fn upload_buffer(device: &mut dyn RenderDevice, buffer: BufferHandle, bytes: &[u8]) -> RenderResult<()> {
    device.resize_buffer(buffer, bytes.len())?;

    let copied = {
        let mapped = device.map_buffer(buffer)?;
        match mapped.get_mut(..bytes.len()) {
            Some(destination) => {
                destination.copy_from_slice(bytes);
                true
            }
            None => false,
        }
    };

    device.unmap_buffer(buffer)?;

    if copied {
        Ok(())
    } else {
        Err(RenderError::ResourceCreationFailed(format!(
            "Buffer {:?} mapped smaller than the {} bytes uploaded",
            buffer,
            bytes.len()
        )))
    }
}

/// Resolve and create a shader-resource view over a texture
pub fn create_texture_srv(
    device: &mut dyn RenderDevice,
    texture: &Texture,
    mips: MipRange,
    slices: SliceRange,
) -> RenderResult<ViewHandle> {
    let desc = resolve_texture_srv(&texture.desc, mips, slices)?;
    device
        .create_shader_resource_view(ViewResource::Texture(texture.id), &desc)
        .map_err(|e| {
            log::error!("Failed to create shader-resource view for texture '{}': {}", texture.name, e);
            e
        })
}

/// Resolve and create an unordered-access view over one mip of a texture
pub fn create_texture_uav(
    device: &mut dyn RenderDevice,
    texture: &Texture,
    mip_slice: u32,
    slices: SliceRange,
) -> RenderResult<ViewHandle> {
    let desc = resolve_texture_uav(&texture.desc, mip_slice, slices)?;
    device
        .create_unordered_access_view(ViewResource::Texture(texture.id), &desc)
        .map_err(|e| {
            log::error!("Failed to create unordered-access view for texture '{}': {}", texture.name, e);
            e
        })
}

/// Resolve and create a shader-resource view over a buffer
pub fn create_buffer_srv(
    device: &mut dyn RenderDevice,
    buffer: BufferHandle,
    buffer_desc: &BufferDesc,
    kind: BufferViewKind,
    elements: ElementRange,
) -> RenderResult<ViewHandle> {
    let desc = resolve_buffer_srv(buffer_desc, kind, elements)?;
    device.create_shader_resource_view(ViewResource::Buffer(buffer), &desc)
}

/// Resolve and create an unordered-access view over a buffer
pub fn create_buffer_uav(
    device: &mut dyn RenderDevice,
    buffer: BufferHandle,
    buffer_desc: &BufferDesc,
    kind: BufferViewKind,
    elements: ElementRange,
) -> RenderResult<ViewHandle> {
    let desc = resolve_buffer_uav(buffer_desc, kind, elements)?;
    device.create_unordered_access_view(ViewResource::Buffer(buffer), &desc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::headless::HeadlessDevice;
    use crate::render::resources::{BufferCreateFlags, PixelFormat, TextureCreateFlags, TextureDesc, ViewError};

    #[test]
    fn test_upload_replaces_contents() {
        let mut device = HeadlessDevice::new();
        let buffer = device.create_buffer(&BufferDesc::dynamic_vertices(1, 4)).unwrap();

        upload_buffer(&mut device, buffer, &[1, 2, 3, 4, 5, 6]).unwrap();
        upload_buffer(&mut device, buffer, &[9, 8]).unwrap();

        assert_eq!(device.buffer_data(buffer), Some(&[9u8, 8][..]));
        assert_eq!(device.upload_count(buffer), 2);
    }

    #[test]
    fn test_cube_array_rejected_before_device() {
        let mut device = HeadlessDevice::new();
        let texture = Texture::new(
            TextureId(1),
            "Probes",
            TextureDesc::cube(PixelFormat::Rgba16Float, 64).with_array_size(4),
        );

        let result = create_texture_srv(&mut device, &texture, MipRange::full(1), SliceRange::new(0, 9));
        assert!(matches!(result, Err(RenderError::InvalidView(ViewError::UnalignedCubeSlices(9)))));
        assert!(device.shader_resource_views().is_empty());

        let handle = create_texture_srv(&mut device, &texture, MipRange::full(1), SliceRange::new(0, 12)).unwrap();
        assert_eq!(device.shader_resource_views().len(), 1);
        assert_eq!(device.shader_resource_views()[0].0, handle);
    }

    #[test]
    fn test_missing_capability_rejected_before_device() {
        let mut device = HeadlessDevice::new();
        let texture = Texture::new(
            TextureId(2),
            "ShadowMap",
            TextureDesc::texture_2d(PixelFormat::Depth32Float, 1024, 1024)
                .with_create_flags(TextureCreateFlags::DEPTH_STENCIL),
        );

        let result = create_texture_srv(&mut device, &texture, MipRange::full(1), SliceRange::single());
        assert!(matches!(
            result,
            Err(RenderError::InvalidView(ViewError::MissingCapability { .. }))
        ));
        assert!(device.shader_resource_views().is_empty());
    }

    #[test]
    fn test_device_failure_propagates() {
        let mut device = HeadlessDevice::new();
        device.fail_view_creation(true);

        let desc = BufferDesc::new(64, 16, BufferCreateFlags::SHADER_RESOURCE | BufferCreateFlags::STRUCTURED);
        let buffer = device.create_buffer(&desc).unwrap();
        let result = create_buffer_srv(&mut device, buffer, &desc, BufferViewKind::Structured, ElementRange::new(0, 4));
        assert!(matches!(result, Err(RenderError::ResourceCreationFailed(_))));
    }

    #[test]
    fn test_operation_has_geometry() {
        let mut operation = RenderOperation::default();
        assert!(!operation.has_geometry());

        operation = RenderOperation::indexed(BufferHandle(0), BufferHandle(1), 36, 6);
        assert!(operation.has_geometry());

        operation.index_count = 0;
        assert!(!operation.has_geometry());
    }
}

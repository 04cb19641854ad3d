//! Headless render device
//!
//! Records every call in memory instead of talking to a GPU. Used by the
//! sample application and by tests, which can also ask it to fail draws for a
//! given material or to fail view creation outright.

use std::collections::HashSet;

use crate::foundation::collections::ObjectId;
use crate::foundation::math::Mat4;
use crate::render::device::{BufferHandle, DrawCall, RenderDevice, ViewHandle, ViewResource};
use crate::render::material::ResourceHandle;
use crate::render::resources::{BufferDesc, ShaderResourceViewDesc, UnorderedAccessViewDesc};
use crate::render::{RenderError, RenderResult};

#[derive(Debug)]
struct RecordedBuffer {
    desc: BufferDesc,
    data: Vec<u8>,
    mapped: bool,
    uploads: usize,
}

/// One draw as seen by the device
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    /// Scene object drawn
    pub object: ObjectId,
    /// Material effect handle
    pub material: ResourceHandle,
    /// Material name
    pub material_name: String,
    /// Indices read
    pub index_count: u32,
    /// Object-to-world transform
    pub world: Mat4,
}

/// In-memory [`RenderDevice`]
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    buffers: Vec<RecordedBuffer>,
    shader_resource_views: Vec<(ViewHandle, ViewResource, ShaderResourceViewDesc)>,
    unordered_access_views: Vec<(ViewHandle, ViewResource, UnorderedAccessViewDesc)>,
    next_view: u32,
    draws: Vec<RecordedDraw>,
    failing_materials: HashSet<ResourceHandle>,
    fail_views: bool,
}

impl HeadlessDevice {
    /// Create an empty device
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every draw using `material` fail
    pub fn fail_draws_for(&mut self, material: ResourceHandle) {
        self.failing_materials.insert(material);
    }

    /// Make view creation fail (or succeed again)
    pub fn fail_view_creation(&mut self, fail: bool) {
        self.fail_views = fail;
    }

    /// Draws issued since the last [`HeadlessDevice::clear_draws`]
    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    /// Forget recorded draws
    pub fn clear_draws(&mut self) {
        self.draws.clear();
    }

    /// Shader-resource views created so far
    pub fn shader_resource_views(&self) -> &[(ViewHandle, ViewResource, ShaderResourceViewDesc)] {
        &self.shader_resource_views
    }

    /// Unordered-access views created so far
    pub fn unordered_access_views(&self) -> &[(ViewHandle, ViewResource, UnorderedAccessViewDesc)] {
        &self.unordered_access_views
    }

    /// Current contents of a buffer
    pub fn buffer_data(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(buffer.0 as usize).map(|b| b.data.as_slice())
    }

    /// Creation descriptor of a buffer, with its current size
    pub fn buffer_desc(&self, buffer: BufferHandle) -> Option<BufferDesc> {
        self.buffers.get(buffer.0 as usize).map(|b| b.desc)
    }

    /// Number of completed map/unmap cycles on a buffer
    pub fn upload_count(&self, buffer: BufferHandle) -> usize {
        self.buffers.get(buffer.0 as usize).map_or(0, |b| b.uploads)
    }

    /// Number of buffers created
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    fn buffer_mut(&mut self, buffer: BufferHandle) -> RenderResult<&mut RecordedBuffer> {
        self.buffers
            .get_mut(buffer.0 as usize)
            .ok_or_else(|| RenderError::BackendError(format!("Unknown buffer {buffer:?}")))
    }

    fn next_view_handle(&mut self) -> RenderResult<ViewHandle> {
        if self.fail_views {
            return Err(RenderError::ResourceCreationFailed("View creation disabled".to_string()));
        }
        let handle = ViewHandle(self.next_view);
        self.next_view += 1;
        Ok(handle)
    }
}

impl RenderDevice for HeadlessDevice {
    fn create_shader_resource_view(
        &mut self,
        resource: ViewResource,
        desc: &ShaderResourceViewDesc,
    ) -> RenderResult<ViewHandle> {
        let handle = self.next_view_handle()?;
        log::debug!("Created SRV {:?} over {:?}: {:?}", handle, resource, desc);
        self.shader_resource_views.push((handle, resource, *desc));
        Ok(handle)
    }

    fn create_unordered_access_view(
        &mut self,
        resource: ViewResource,
        desc: &UnorderedAccessViewDesc,
    ) -> RenderResult<ViewHandle> {
        let handle = self.next_view_handle()?;
        log::debug!("Created UAV {:?} over {:?}: {:?}", handle, resource, desc);
        self.unordered_access_views.push((handle, resource, *desc));
        Ok(handle)
    }

    fn create_buffer(&mut self, desc: &BufferDesc) -> RenderResult<BufferHandle> {
        let index = u32::try_from(self.buffers.len())
            .map_err(|_| RenderError::ResourceCreationFailed("Buffer handles exhausted".to_string()))?;
        self.buffers.push(RecordedBuffer {
            desc: *desc,
            data: vec![0; desc.size_bytes],
            mapped: false,
            uploads: 0,
        });
        Ok(BufferHandle(index))
    }

    fn resize_buffer(&mut self, buffer: BufferHandle, size_bytes: usize) -> RenderResult<()> {
        let recorded = self.buffer_mut(buffer)?;
        if recorded.mapped {
            return Err(RenderError::BackendError(format!("Buffer {buffer:?} resized while mapped")));
        }
        recorded.data.resize(size_bytes, 0);
        recorded.desc.size_bytes = size_bytes;
        Ok(())
    }

    fn map_buffer(&mut self, buffer: BufferHandle) -> RenderResult<&mut [u8]> {
        let recorded = self.buffer_mut(buffer)?;
        if recorded.mapped {
            return Err(RenderError::BackendError(format!("Buffer {buffer:?} is already mapped")));
        }
        recorded.mapped = true;
        Ok(recorded.data.as_mut_slice())
    }

    fn unmap_buffer(&mut self, buffer: BufferHandle) -> RenderResult<()> {
        let recorded = self.buffer_mut(buffer)?;
        if !recorded.mapped {
            return Err(RenderError::BackendError(format!("Buffer {buffer:?} is not mapped")));
        }
        recorded.mapped = false;
        recorded.uploads += 1;
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall<'_>) -> RenderResult<()> {
        if self.failing_materials.contains(&call.material.resource_handle) {
            return Err(RenderError::RenderingFailed(format!(
                "Draw rejected for material '{}'",
                call.material.name
            )));
        }
        if !call.operation.has_geometry() {
            return Err(RenderError::RenderingFailed(format!(
                "Draw for {:?} has no bound geometry",
                call.object
            )));
        }

        self.draws.push(RecordedDraw {
            object: call.object,
            material: call.material.resource_handle,
            material_name: call.material.name.clone(),
            index_count: call.operation.index_count,
            world: *call.world,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::device::RenderOperation;
    use crate::render::material::Material;

    #[test]
    fn test_failing_material_rejects_draws() {
        let mut device = HeadlessDevice::new();
        device.fail_draws_for(ResourceHandle(13));

        let bad = Material::new("Broken", ResourceHandle(13));
        let good = Material::new("Fine", ResourceHandle(14));
        let operation = RenderOperation::indexed(BufferHandle(0), BufferHandle(1), 12, 3);
        let world = Mat4::identity();
        let object = ObjectId::default();

        let call = DrawCall { object, material: &bad, operation: &operation, world: &world };
        assert!(device.draw(&call).is_err());

        let call = DrawCall { object, material: &good, operation: &operation, world: &world };
        assert!(device.draw(&call).is_ok());
        assert_eq!(device.draws().len(), 1);
        assert_eq!(device.draws()[0].material_name, "Fine");
    }

    #[test]
    fn test_map_twice_is_an_error() {
        let mut device = HeadlessDevice::new();
        let buffer = device.create_buffer(&BufferDesc::dynamic_indices_u16(6)).unwrap();

        assert_eq!(device.map_buffer(buffer).unwrap().len(), 12);
        assert!(device.map_buffer(buffer).is_err());
        assert!(device.resize_buffer(buffer, 24).is_err());
        device.unmap_buffer(buffer).unwrap();
        assert!(device.unmap_buffer(buffer).is_err());
        assert_eq!(device.upload_count(buffer), 1);
    }
}

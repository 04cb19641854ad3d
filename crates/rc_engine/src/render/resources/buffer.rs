//! Buffer shape metadata

use bitflags::bitflags;

bitflags! {
    /// Capabilities a buffer was created with
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferCreateFlags: u32 {
        /// Bound as a vertex stream
        const VERTEX = 1 << 0;
        /// Bound as an index stream
        const INDEX = 1 << 1;
        /// Readable through a shader-resource view
        const SHADER_RESOURCE = 1 << 2;
        /// Writable through an unordered-access view
        const UNORDERED_ACCESS = 1 << 3;
        /// Elements are interpreted through `stride`, not a pixel format
        const STRUCTURED = 1 << 4;
        /// CPU rewrites the contents frequently
        const DYNAMIC = 1 << 5;
    }
}

/// Static shape of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDesc {
    /// Total size in bytes
    pub size_bytes: usize,
    /// Size of one element in bytes
    pub stride: u32,
    /// Creation capabilities
    pub flags: BufferCreateFlags,
}

impl BufferDesc {
    /// Describe a buffer
    pub const fn new(size_bytes: usize, stride: u32, flags: BufferCreateFlags) -> Self {
        Self {
            size_bytes,
            stride,
            flags,
        }
    }

    /// Dynamic vertex buffer with room for `count` vertices of `stride` bytes
    pub const fn dynamic_vertices(count: usize, stride: u32) -> Self {
        Self::new(
            count * stride as usize,
            stride,
            BufferCreateFlags::VERTEX.union(BufferCreateFlags::DYNAMIC),
        )
    }

    /// Dynamic 16-bit index buffer with room for `count` indices
    pub const fn dynamic_indices_u16(count: usize) -> Self {
        Self::new(count * 2, 2, BufferCreateFlags::INDEX.union(BufferCreateFlags::DYNAMIC))
    }

    /// Number of whole elements the buffer holds
    pub const fn element_count(&self) -> u32 {
        if self.stride == 0 {
            0
        } else {
            (self.size_bytes / self.stride as usize) as u32
        }
    }
}

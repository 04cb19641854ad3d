//! # GPU Resource Descriptions
//!
//! Static shape metadata for textures and buffers, and the resolver that turns
//! a shape plus a requested sub-range into a concrete view descriptor.

pub mod buffer;
pub mod pixel_format;
pub mod texture;
pub mod view;

pub use buffer::{BufferCreateFlags, BufferDesc};
pub use pixel_format::{HardwareFormat, PixelFormat};
pub use texture::{Texture, TextureCreateFlags, TextureDesc, TextureDimension, TextureId};
pub use view::{
    resolve_buffer_srv, resolve_buffer_uav, resolve_texture_srv, resolve_texture_uav, BufferViewKind, ElementRange,
    MipRange, ShaderResourceViewDesc, SliceRange, UnorderedAccessViewDesc, ViewError,
};

//! Texture shape metadata
//!
//! A [`Texture`] here is only the static description the device layer created
//! the GPU object from. The view resolver reads it; nothing in this module
//! touches GPU memory.

use bitflags::bitflags;

use super::PixelFormat;

bitflags! {
    /// Capabilities a texture was created with
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureCreateFlags: u32 {
        /// Can be bound through a shader-resource view
        const SHADER_RESOURCE = 1 << 0;
        /// Can be bound as a color render target
        const RENDER_TARGET = 1 << 1;
        /// Can be bound as a depth-stencil target
        const DEPTH_STENCIL = 1 << 2;
        /// Can be bound through an unordered-access view
        const UNORDERED_ACCESS = 1 << 3;
        /// Mip chain is generated on the device after upload
        const GENERATE_MIPS = 1 << 4;
    }
}

/// Dimensionality of a texture resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureDimension {
    /// One-dimensional texture
    D1,
    /// Two-dimensional texture
    D2,
    /// Volume texture
    D3,
    /// Cube map, six 2D faces per cube
    Cube,
}

/// Identity of a texture, stable for the lifetime of the resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Static shape of a texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    /// Texture dimensionality
    pub dimension: TextureDimension,
    /// Texel format
    pub format: PixelFormat,
    /// Width in texels
    pub width: u32,
    /// Height in texels (1 for 1D textures)
    pub height: u32,
    /// Depth in texels (1 unless 3D)
    pub depth: u32,
    /// Number of mip levels in the chain
    pub mip_levels: u32,
    /// Array elements; for cube maps this counts cubes, not faces
    pub array_size: u32,
    /// Samples per texel
    pub sample_count: u32,
    /// Creation capabilities
    pub create_flags: TextureCreateFlags,
}

impl TextureDesc {
    fn with_dimension(dimension: TextureDimension, format: PixelFormat, width: u32, height: u32) -> Self {
        Self {
            dimension,
            format,
            width,
            height,
            depth: 1,
            mip_levels: 1,
            array_size: 1,
            sample_count: 1,
            create_flags: TextureCreateFlags::SHADER_RESOURCE,
        }
    }

    /// 1D texture, shader-readable, single mip
    pub fn texture_1d(format: PixelFormat, width: u32) -> Self {
        Self::with_dimension(TextureDimension::D1, format, width, 1)
    }

    /// 2D texture, shader-readable, single mip
    pub fn texture_2d(format: PixelFormat, width: u32, height: u32) -> Self {
        Self::with_dimension(TextureDimension::D2, format, width, height)
    }

    /// Volume texture, shader-readable, single mip
    pub fn texture_3d(format: PixelFormat, width: u32, height: u32, depth: u32) -> Self {
        Self {
            depth,
            ..Self::with_dimension(TextureDimension::D3, format, width, height)
        }
    }

    /// Cube map with square faces, shader-readable, single mip
    pub fn cube(format: PixelFormat, size: u32) -> Self {
        Self::with_dimension(TextureDimension::Cube, format, size, size)
    }

    /// Set the mip chain length
    pub fn with_mip_levels(mut self, mip_levels: u32) -> Self {
        self.mip_levels = mip_levels;
        self
    }

    /// Set the number of array elements (cubes for cube maps)
    pub fn with_array_size(mut self, array_size: u32) -> Self {
        self.array_size = array_size;
        self
    }

    /// Set the sample count
    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Replace the creation capabilities
    pub fn with_create_flags(mut self, create_flags: TextureCreateFlags) -> Self {
        self.create_flags = create_flags;
        self
    }

    /// Whether the texture holds more than one array element
    pub fn is_array(&self) -> bool {
        self.array_size > 1
    }

    /// Whether the texture holds more than one sample per texel
    pub fn is_multisampled(&self) -> bool {
        self.sample_count > 1
    }

    /// Number of addressable 2D slices; six per cube for cube maps
    pub fn slice_count(&self) -> u32 {
        match self.dimension {
            TextureDimension::Cube => self.array_size.saturating_mul(6),
            TextureDimension::D3 => 1,
            TextureDimension::D1 | TextureDimension::D2 => self.array_size,
        }
    }
}

/// A texture known to the device layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Identity, used as the sprite batch key
    pub id: TextureId,
    /// Debug name
    pub name: String,
    /// Static shape
    pub desc: TextureDesc,
}

impl Texture {
    /// Describe a texture
    pub fn new(id: TextureId, name: impl Into<String>, desc: TextureDesc) -> Self {
        Self {
            id,
            name: name.into(),
            desc,
        }
    }

    /// Width in texels of the top mip
    pub fn width(&self) -> u32 {
        self.desc.width
    }

    /// Height in texels of the top mip
    pub fn height(&self) -> u32 {
        self.desc.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_slice_count_counts_faces() {
        let desc = TextureDesc::cube(PixelFormat::Rgba16Float, 128).with_array_size(2);
        assert_eq!(desc.slice_count(), 12);
        assert!(desc.is_array());
    }

    #[test]
    fn test_builders() {
        let desc = TextureDesc::texture_2d(PixelFormat::Rgba8Unorm, 64, 32)
            .with_mip_levels(7)
            .with_sample_count(4)
            .with_create_flags(TextureCreateFlags::SHADER_RESOURCE | TextureCreateFlags::RENDER_TARGET);

        assert_eq!(desc.mip_levels, 7);
        assert!(desc.is_multisampled());
        assert!(!desc.is_array());
        assert!(desc.create_flags.contains(TextureCreateFlags::RENDER_TARGET));
        assert_eq!(TextureDesc::texture_3d(PixelFormat::R8Unorm, 4, 4, 4).slice_count(), 1);
    }
}

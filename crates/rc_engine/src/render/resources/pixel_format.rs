//! Abstract pixel formats and their hardware mapping
//!
//! Content code speaks [`PixelFormat`]; descriptors handed to the device carry
//! the [`HardwareFormat`] it maps to. Depth formats map to their typeless
//! shader-readable counterpart because a depth buffer can only be sampled
//! through one.

use serde::{Deserialize, Serialize};

/// Engine-side pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGBA, normalized
    Rgba8Unorm,
    /// 8-bit RGBA, normalized, sRGB encoded
    Rgba8UnormSrgb,
    /// 8-bit BGRA, normalized
    Bgra8Unorm,
    /// 8-bit single channel, normalized
    R8Unorm,
    /// 16-bit float single channel
    R16Float,
    /// 16-bit float two channels
    Rg16Float,
    /// 16-bit float RGBA
    Rgba16Float,
    /// 32-bit float single channel
    R32Float,
    /// 32-bit float two channels
    Rg32Float,
    /// 32-bit float RGB
    Rgb32Float,
    /// 32-bit float RGBA
    Rgba32Float,
    /// 32-bit unsigned integer single channel
    R32Uint,
    /// 16-bit depth
    Depth16Unorm,
    /// 24-bit depth, 8-bit stencil
    Depth24UnormStencil8,
    /// 32-bit float depth
    Depth32Float,
    /// BC1 block compression
    Bc1Unorm,
    /// BC3 block compression
    Bc3Unorm,
}

impl PixelFormat {
    /// Size in bytes of one element, or one 4x4 block for compressed formats
    pub const fn bytes_per_element(self) -> u32 {
        match self {
            Self::R8Unorm => 1,
            Self::R16Float | Self::Depth16Unorm => 2,
            Self::Rgba8Unorm
            | Self::Rgba8UnormSrgb
            | Self::Bgra8Unorm
            | Self::Rg16Float
            | Self::R32Float
            | Self::R32Uint
            | Self::Depth24UnormStencil8
            | Self::Depth32Float => 4,
            Self::Rgba16Float | Self::Rg32Float | Self::Bc1Unorm => 8,
            Self::Rgb32Float => 12,
            Self::Rgba32Float | Self::Bc3Unorm => 16,
        }
    }

    /// Whether this is a depth (or depth-stencil) format
    pub const fn is_depth(self) -> bool {
        matches!(self, Self::Depth16Unorm | Self::Depth24UnormStencil8 | Self::Depth32Float)
    }

    /// Whether this is a block-compressed format
    pub const fn is_compressed(self) -> bool {
        matches!(self, Self::Bc1Unorm | Self::Bc3Unorm)
    }
}

/// Concrete format written into a view descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareFormat {
    /// No format; the view interprets elements through the buffer stride
    Unknown,
    /// `R8G8B8A8_UNORM`
    R8G8B8A8Unorm,
    /// `R8G8B8A8_UNORM_SRGB`
    R8G8B8A8UnormSrgb,
    /// `B8G8R8A8_UNORM`
    B8G8R8A8Unorm,
    /// `R8_UNORM`
    R8Unorm,
    /// `R16_FLOAT`
    R16Float,
    /// `R16G16_FLOAT`
    R16G16Float,
    /// `R16G16B16A16_FLOAT`
    R16G16B16A16Float,
    /// `R32_FLOAT`
    R32Float,
    /// `R32G32_FLOAT`
    R32G32Float,
    /// `R32G32B32_FLOAT`
    R32G32B32Float,
    /// `R32G32B32A32_FLOAT`
    R32G32B32A32Float,
    /// `R32_UINT`
    R32Uint,
    /// `R16_UNORM`, the readable view of a 16-bit depth buffer
    R16Unorm,
    /// `R24_UNORM_X8_TYPELESS`, the readable view of a 24/8 depth-stencil buffer
    R24UnormX8Typeless,
    /// `BC1_UNORM`
    Bc1Unorm,
    /// `BC3_UNORM`
    Bc3Unorm,
}

impl From<PixelFormat> for HardwareFormat {
    fn from(format: PixelFormat) -> Self {
        match format {
            PixelFormat::Rgba8Unorm => Self::R8G8B8A8Unorm,
            PixelFormat::Rgba8UnormSrgb => Self::R8G8B8A8UnormSrgb,
            PixelFormat::Bgra8Unorm => Self::B8G8R8A8Unorm,
            PixelFormat::R8Unorm => Self::R8Unorm,
            PixelFormat::R16Float => Self::R16Float,
            PixelFormat::Rg16Float => Self::R16G16Float,
            PixelFormat::Rgba16Float => Self::R16G16B16A16Float,
            PixelFormat::R32Float | PixelFormat::Depth32Float => Self::R32Float,
            PixelFormat::Rg32Float => Self::R32G32Float,
            PixelFormat::Rgb32Float => Self::R32G32B32Float,
            PixelFormat::Rgba32Float => Self::R32G32B32A32Float,
            PixelFormat::R32Uint => Self::R32Uint,
            PixelFormat::Depth16Unorm => Self::R16Unorm,
            PixelFormat::Depth24UnormStencil8 => Self::R24UnormX8Typeless,
            PixelFormat::Bc1Unorm => Self::Bc1Unorm,
            PixelFormat::Bc3Unorm => Self::Bc3Unorm,
        }
    }
}

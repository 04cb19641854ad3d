//! # Resource View Descriptors
//!
//! Pure resolution of a resource's static shape plus a requested sub-range
//! into exactly one concrete view descriptor variant. The device layer turns
//! the descriptor into a GPU view object; nothing here holds state.
//!
//! ## Rules
//!
//! - Structured buffer views carry no format; typed buffer views carry the
//!   hardware mapping of the requested pixel format.
//! - A texture whose array size is at most one never produces an array
//!   variant. Larger array sizes always do.
//! - A multisampled 2D texture produces a multisampled variant, which has no
//!   mip range at all.
//! - Mip and slice counts of zero are caller errors, never "all remaining".
//! - Cube arrays address faces: the slice count must be a multiple of six and
//!   the first slice is the first face.
//!
//! Capability checks run first, so a request against a resource that cannot
//! be viewed that way is rejected before anything else is looked at.

use thiserror::Error;

use super::{BufferCreateFlags, BufferDesc, HardwareFormat, PixelFormat, TextureCreateFlags, TextureDesc, TextureDimension};

const FACES_PER_CUBE: u32 = 6;

/// Contiguous range of mip levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipRange {
    /// Index of the largest mip visible through the view
    pub most_detailed_mip: u32,
    /// Number of mips visible through the view
    pub mip_levels: u32,
}

impl MipRange {
    /// Mips `most_detailed_mip .. most_detailed_mip + mip_levels`
    pub const fn new(most_detailed_mip: u32, mip_levels: u32) -> Self {
        Self {
            most_detailed_mip,
            mip_levels,
        }
    }

    /// Every mip of a chain `mip_levels` long
    pub const fn full(mip_levels: u32) -> Self {
        Self::new(0, mip_levels)
    }
}

/// Contiguous range of array slices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceRange {
    /// First slice visible through the view
    pub first_array_slice: u32,
    /// Number of slices visible through the view
    pub array_size: u32,
}

impl SliceRange {
    /// Slices `first_array_slice .. first_array_slice + array_size`
    pub const fn new(first_array_slice: u32, array_size: u32) -> Self {
        Self {
            first_array_slice,
            array_size,
        }
    }

    /// The first slice only
    pub const fn single() -> Self {
        Self::new(0, 1)
    }
}

/// Contiguous range of buffer elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRange {
    /// First element visible through the view
    pub first_element: u32,
    /// Number of elements visible through the view
    pub element_count: u32,
}

impl ElementRange {
    /// Elements `first_element .. first_element + element_count`
    pub const fn new(first_element: u32, element_count: u32) -> Self {
        Self {
            first_element,
            element_count,
        }
    }
}

/// How a buffer's elements are interpreted by a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferViewKind {
    /// Elements are `stride`-sized structs
    Structured,
    /// Elements are texels of the given format
    Typed(PixelFormat),
}

/// Shader-resource (read-only) view descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderResourceViewDesc {
    /// Structured buffer; format is always [`HardwareFormat::Unknown`]
    StructuredBuffer {
        /// Visible elements
        elements: ElementRange,
    },
    /// Typed (texel) buffer
    TypedBuffer {
        /// Texel format
        format: HardwareFormat,
        /// Visible elements
        elements: ElementRange,
    },
    /// 1D texture
    Texture1D {
        /// Texel format
        format: HardwareFormat,
        /// Visible mips
        mips: MipRange,
    },
    /// 1D texture array
    Texture1DArray {
        /// Texel format
        format: HardwareFormat,
        /// Visible mips
        mips: MipRange,
        /// Visible slices
        slices: SliceRange,
    },
    /// 2D texture
    Texture2D {
        /// Texel format
        format: HardwareFormat,
        /// Visible mips
        mips: MipRange,
    },
    /// 2D texture array
    Texture2DArray {
        /// Texel format
        format: HardwareFormat,
        /// Visible mips
        mips: MipRange,
        /// Visible slices
        slices: SliceRange,
    },
    /// Multisampled 2D texture
    Texture2DMs {
        /// Texel format
        format: HardwareFormat,
    },
    /// Multisampled 2D texture array
    Texture2DMsArray {
        /// Texel format
        format: HardwareFormat,
        /// Visible slices
        slices: SliceRange,
    },
    /// Volume texture
    Texture3D {
        /// Texel format
        format: HardwareFormat,
        /// Visible mips
        mips: MipRange,
    },
    /// Cube map
    TextureCube {
        /// Texel format
        format: HardwareFormat,
        /// Visible mips
        mips: MipRange,
    },
    /// Cube map array
    TextureCubeArray {
        /// Texel format
        format: HardwareFormat,
        /// Visible mips
        mips: MipRange,
        /// Index of the first visible face in the flattened face array
        first_face: u32,
        /// Number of whole cubes visible
        cube_count: u32,
    },
}

impl ShaderResourceViewDesc {
    /// Format written into the descriptor
    pub const fn format(&self) -> HardwareFormat {
        match *self {
            Self::StructuredBuffer { .. } => HardwareFormat::Unknown,
            Self::TypedBuffer { format, .. }
            | Self::Texture1D { format, .. }
            | Self::Texture1DArray { format, .. }
            | Self::Texture2D { format, .. }
            | Self::Texture2DArray { format, .. }
            | Self::Texture2DMs { format }
            | Self::Texture2DMsArray { format, .. }
            | Self::Texture3D { format, .. }
            | Self::TextureCube { format, .. }
            | Self::TextureCubeArray { format, .. } => format,
        }
    }

    /// Whether this is one of the array variants
    pub const fn is_array(&self) -> bool {
        matches!(
            self,
            Self::Texture1DArray { .. }
                | Self::Texture2DArray { .. }
                | Self::Texture2DMsArray { .. }
                | Self::TextureCubeArray { .. }
        )
    }

    /// Whether this is one of the multisampled variants
    pub const fn is_multisampled(&self) -> bool {
        matches!(self, Self::Texture2DMs { .. } | Self::Texture2DMsArray { .. })
    }

    /// Mip range, for variants that have one
    pub const fn mips(&self) -> Option<MipRange> {
        match *self {
            Self::Texture1D { mips, .. }
            | Self::Texture1DArray { mips, .. }
            | Self::Texture2D { mips, .. }
            | Self::Texture2DArray { mips, .. }
            | Self::Texture3D { mips, .. }
            | Self::TextureCube { mips, .. }
            | Self::TextureCubeArray { mips, .. } => Some(mips),
            Self::StructuredBuffer { .. }
            | Self::TypedBuffer { .. }
            | Self::Texture2DMs { .. }
            | Self::Texture2DMsArray { .. } => None,
        }
    }
}

/// Unordered-access (read-write) view descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnorderedAccessViewDesc {
    /// Structured buffer; format is always [`HardwareFormat::Unknown`]
    StructuredBuffer {
        /// Visible elements
        elements: ElementRange,
    },
    /// Typed (texel) buffer
    TypedBuffer {
        /// Texel format
        format: HardwareFormat,
        /// Visible elements
        elements: ElementRange,
    },
    /// One mip of a 1D texture
    Texture1D {
        /// Texel format
        format: HardwareFormat,
        /// Mip written through the view
        mip_slice: u32,
    },
    /// One mip of a 1D texture array
    Texture1DArray {
        /// Texel format
        format: HardwareFormat,
        /// Mip written through the view
        mip_slice: u32,
        /// Visible slices
        slices: SliceRange,
    },
    /// One mip of a 2D texture
    Texture2D {
        /// Texel format
        format: HardwareFormat,
        /// Mip written through the view
        mip_slice: u32,
    },
    /// One mip of a 2D texture array (cube faces are viewed this way too)
    Texture2DArray {
        /// Texel format
        format: HardwareFormat,
        /// Mip written through the view
        mip_slice: u32,
        /// Visible slices
        slices: SliceRange,
    },
    /// One mip of a volume texture
    Texture3D {
        /// Texel format
        format: HardwareFormat,
        /// Mip written through the view
        mip_slice: u32,
        /// First depth slice visible
        first_depth_slice: u32,
        /// Number of depth slices visible
        depth_size: u32,
    },
}

impl UnorderedAccessViewDesc {
    /// Format written into the descriptor
    pub const fn format(&self) -> HardwareFormat {
        match *self {
            Self::StructuredBuffer { .. } => HardwareFormat::Unknown,
            Self::TypedBuffer { format, .. }
            | Self::Texture1D { format, .. }
            | Self::Texture1DArray { format, .. }
            | Self::Texture2D { format, .. }
            | Self::Texture2DArray { format, .. }
            | Self::Texture3D { format, .. } => format,
        }
    }

    /// Whether this is one of the array variants
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Texture1DArray { .. } | Self::Texture2DArray { .. })
    }
}

/// Rejected view requests
///
/// Every variant is a caller error. None of them is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The resource was not created with the capability the view needs
    #[error("Resource was not created with {required} capability")]
    MissingCapability {
        /// Capability name
        required: &'static str,
    },

    /// A count field was zero
    #[error("{field} must be at least 1")]
    ZeroCount {
        /// Offending field
        field: &'static str,
    },

    /// The mip range runs past the end of the mip chain
    #[error("Mips {most_detailed_mip}..+{mip_levels} exceed the {available} available")]
    MipRangeOutOfBounds {
        /// Requested first mip
        most_detailed_mip: u32,
        /// Requested mip count
        mip_levels: u32,
        /// Mips in the resource
        available: u32,
    },

    /// The slice range runs past the end of the array
    #[error("Slices {first_array_slice}..+{array_size} exceed the {available} available")]
    SliceRangeOutOfBounds {
        /// Requested first slice
        first_array_slice: u32,
        /// Requested slice count
        array_size: u32,
        /// Slices in the resource
        available: u32,
    },

    /// A cube array view must cover whole cubes
    #[error("Cube array views need a multiple of 6 slices, got {0}")]
    UnalignedCubeSlices(u32),

    /// The element range runs past the end of the buffer
    #[error("Elements {first_element}..+{element_count} exceed the {available} available")]
    ElementRangeOutOfBounds {
        /// Requested first element
        first_element: u32,
        /// Requested element count
        element_count: u32,
        /// Elements in the buffer
        available: u32,
    },

    /// The format cannot be used for this kind of view
    #[error("Format {0:?} cannot be used for this view")]
    UnsupportedFormat(PixelFormat),

    /// Multisampled textures cannot be written through an unordered-access view
    #[error("Multisampled textures do not support unordered access")]
    MultisampledUnorderedAccess,

    /// A structured view was requested on a buffer without a struct stride
    #[error("Buffer was not created as a structured buffer")]
    NotStructured,

    /// Only 2D textures may be multisampled
    #[error("{0:?} textures cannot be multisampled")]
    MultisampleNotSupported(TextureDimension),
}

fn require_texture_flag(desc: &TextureDesc, flag: TextureCreateFlags, required: &'static str) -> Result<(), ViewError> {
    if desc.create_flags.contains(flag) {
        Ok(())
    } else {
        Err(ViewError::MissingCapability { required })
    }
}

fn require_nonzero(value: u32, field: &'static str) -> Result<(), ViewError> {
    if value == 0 {
        Err(ViewError::ZeroCount { field })
    } else {
        Ok(())
    }
}

fn check_mips(mips: MipRange, available: u32) -> Result<(), ViewError> {
    match mips.most_detailed_mip.checked_add(mips.mip_levels) {
        Some(end) if end <= available => Ok(()),
        _ => Err(ViewError::MipRangeOutOfBounds {
            most_detailed_mip: mips.most_detailed_mip,
            mip_levels: mips.mip_levels,
            available,
        }),
    }
}

fn check_slices(slices: SliceRange, available: u32) -> Result<(), ViewError> {
    match slices.first_array_slice.checked_add(slices.array_size) {
        Some(end) if end <= available => Ok(()),
        _ => Err(ViewError::SliceRangeOutOfBounds {
            first_array_slice: slices.first_array_slice,
            array_size: slices.array_size,
            available,
        }),
    }
}

fn check_elements(elements: ElementRange, available: u32) -> Result<(), ViewError> {
    match elements.first_element.checked_add(elements.element_count) {
        Some(end) if end <= available => Ok(()),
        _ => Err(ViewError::ElementRangeOutOfBounds {
            first_element: elements.first_element,
            element_count: elements.element_count,
            available,
        }),
    }
}

/// Elements the buffer holds when viewed as `kind`
fn buffer_elements(desc: &BufferDesc, kind: BufferViewKind) -> Result<u32, ViewError> {
    match kind {
        BufferViewKind::Structured => {
            if !desc.flags.contains(BufferCreateFlags::STRUCTURED) || desc.stride == 0 {
                return Err(ViewError::NotStructured);
            }
            Ok(desc.element_count())
        }
        BufferViewKind::Typed(format) => {
            if format.is_depth() || format.is_compressed() {
                return Err(ViewError::UnsupportedFormat(format));
            }
            let count = desc.size_bytes / format.bytes_per_element() as usize;
            Ok(u32::try_from(count).unwrap_or(u32::MAX))
        }
    }
}

/// Resolve a shader-resource view over a buffer
pub fn resolve_buffer_srv(
    desc: &BufferDesc,
    kind: BufferViewKind,
    elements: ElementRange,
) -> Result<ShaderResourceViewDesc, ViewError> {
    if !desc.flags.contains(BufferCreateFlags::SHADER_RESOURCE) {
        return Err(ViewError::MissingCapability { required: "shader-resource" });
    }
    require_nonzero(elements.element_count, "element_count")?;
    check_elements(elements, buffer_elements(desc, kind)?)?;

    Ok(match kind {
        BufferViewKind::Structured => ShaderResourceViewDesc::StructuredBuffer { elements },
        BufferViewKind::Typed(format) => ShaderResourceViewDesc::TypedBuffer {
            format: format.into(),
            elements,
        },
    })
}

/// Resolve an unordered-access view over a buffer
pub fn resolve_buffer_uav(
    desc: &BufferDesc,
    kind: BufferViewKind,
    elements: ElementRange,
) -> Result<UnorderedAccessViewDesc, ViewError> {
    if !desc.flags.contains(BufferCreateFlags::UNORDERED_ACCESS) {
        return Err(ViewError::MissingCapability { required: "unordered-access" });
    }
    require_nonzero(elements.element_count, "element_count")?;
    check_elements(elements, buffer_elements(desc, kind)?)?;

    Ok(match kind {
        BufferViewKind::Structured => UnorderedAccessViewDesc::StructuredBuffer { elements },
        BufferViewKind::Typed(format) => UnorderedAccessViewDesc::TypedBuffer {
            format: format.into(),
            elements,
        },
    })
}

/// Resolve a shader-resource view over a texture
///
/// `slices` is ignored for volume textures and for textures whose array size
/// is at most one, but its count must still be non-zero for the dimensions
/// that take slices.
pub fn resolve_texture_srv(
    desc: &TextureDesc,
    mips: MipRange,
    slices: SliceRange,
) -> Result<ShaderResourceViewDesc, ViewError> {
    require_texture_flag(desc, TextureCreateFlags::SHADER_RESOURCE, "shader-resource")?;
    require_nonzero(mips.mip_levels, "mip_levels")?;
    if desc.dimension != TextureDimension::D3 {
        require_nonzero(slices.array_size, "array_size")?;
    }

    let format = HardwareFormat::from(desc.format);

    if desc.is_multisampled() {
        if desc.dimension != TextureDimension::D2 {
            return Err(ViewError::MultisampleNotSupported(desc.dimension));
        }
        require_texture_flag(desc, TextureCreateFlags::RENDER_TARGET, "render-target")?;

        // Multisampled resources have no mip chain; the requested range is not consulted
        return if desc.is_array() {
            check_slices(slices, desc.array_size)?;
            Ok(ShaderResourceViewDesc::Texture2DMsArray { format, slices })
        } else {
            Ok(ShaderResourceViewDesc::Texture2DMs { format })
        };
    }

    check_mips(mips, desc.mip_levels)?;

    let view = match desc.dimension {
        TextureDimension::D1 if desc.is_array() => {
            check_slices(slices, desc.array_size)?;
            ShaderResourceViewDesc::Texture1DArray { format, mips, slices }
        }
        TextureDimension::D1 => ShaderResourceViewDesc::Texture1D { format, mips },
        TextureDimension::D2 if desc.is_array() => {
            check_slices(slices, desc.array_size)?;
            ShaderResourceViewDesc::Texture2DArray { format, mips, slices }
        }
        TextureDimension::D2 => ShaderResourceViewDesc::Texture2D { format, mips },
        TextureDimension::D3 => ShaderResourceViewDesc::Texture3D { format, mips },
        TextureDimension::Cube if desc.is_array() => {
            if slices.array_size % FACES_PER_CUBE != 0 {
                return Err(ViewError::UnalignedCubeSlices(slices.array_size));
            }
            check_slices(slices, desc.slice_count())?;
            ShaderResourceViewDesc::TextureCubeArray {
                format,
                mips,
                first_face: slices.first_array_slice,
                cube_count: slices.array_size / FACES_PER_CUBE,
            }
        }
        TextureDimension::Cube => ShaderResourceViewDesc::TextureCube { format, mips },
    };

    Ok(view)
}

/// Resolve an unordered-access view over one mip of a texture
///
/// Cube maps are written face by face, so they always resolve to a 2D array
/// view over their faces. Volume textures expose their whole depth at the
/// chosen mip.
pub fn resolve_texture_uav(
    desc: &TextureDesc,
    mip_slice: u32,
    slices: SliceRange,
) -> Result<UnorderedAccessViewDesc, ViewError> {
    require_texture_flag(desc, TextureCreateFlags::UNORDERED_ACCESS, "unordered-access")?;
    if desc.is_multisampled() {
        return Err(ViewError::MultisampledUnorderedAccess);
    }
    if desc.dimension != TextureDimension::D3 {
        require_nonzero(slices.array_size, "array_size")?;
    }
    check_mips(MipRange::new(mip_slice, 1), desc.mip_levels)?;

    let format = HardwareFormat::from(desc.format);

    let view = match desc.dimension {
        TextureDimension::D1 if desc.is_array() => {
            check_slices(slices, desc.array_size)?;
            UnorderedAccessViewDesc::Texture1DArray { format, mip_slice, slices }
        }
        TextureDimension::D1 => UnorderedAccessViewDesc::Texture1D { format, mip_slice },
        TextureDimension::D2 if desc.is_array() => {
            check_slices(slices, desc.array_size)?;
            UnorderedAccessViewDesc::Texture2DArray { format, mip_slice, slices }
        }
        TextureDimension::D2 => UnorderedAccessViewDesc::Texture2D { format, mip_slice },
        TextureDimension::Cube => {
            check_slices(slices, desc.slice_count())?;
            UnorderedAccessViewDesc::Texture2DArray { format, mip_slice, slices }
        }
        TextureDimension::D3 => UnorderedAccessViewDesc::Texture3D {
            format,
            mip_slice,
            first_depth_slice: 0,
            // Mips past the last halving still hold one slice
            depth_size: desc.depth.checked_shr(mip_slice).unwrap_or(0).max(1),
        },
    };

    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn srv_2d() -> TextureDesc {
        TextureDesc::texture_2d(PixelFormat::Rgba8Unorm, 256, 256).with_mip_levels(9)
    }

    fn msaa_target(array_size: u32) -> TextureDesc {
        TextureDesc::texture_2d(PixelFormat::Rgba16Float, 1280, 720)
            .with_sample_count(4)
            .with_array_size(array_size)
            .with_create_flags(TextureCreateFlags::SHADER_RESOURCE | TextureCreateFlags::RENDER_TARGET)
    }

    #[test]
    fn test_single_element_textures_never_resolve_to_array_variants() {
        let shapes = [
            TextureDesc::texture_1d(PixelFormat::R32Float, 64).with_mip_levels(3),
            srv_2d(),
            TextureDesc::texture_3d(PixelFormat::R8Unorm, 32, 32, 32).with_mip_levels(3),
            TextureDesc::cube(PixelFormat::Rgba16Float, 64).with_mip_levels(3),
            msaa_target(1),
        ];

        for array_size in [0, 1] {
            for shape in &shapes {
                let desc = shape.clone().with_array_size(array_size);
                for slices in [SliceRange::single(), SliceRange::new(0, 6), SliceRange::new(3, 12)] {
                    let view = resolve_texture_srv(&desc, MipRange::new(0, 1), slices).unwrap();
                    assert!(!view.is_array(), "{:?} produced {:?}", desc.dimension, view);
                }
            }
        }
    }

    #[test]
    fn test_array_textures_resolve_to_array_variants() {
        let desc = srv_2d().with_array_size(4);
        let view = resolve_texture_srv(&desc, MipRange::full(9), SliceRange::new(1, 3)).unwrap();
        assert_eq!(
            view,
            ShaderResourceViewDesc::Texture2DArray {
                format: HardwareFormat::R8G8B8A8Unorm,
                mips: MipRange::full(9),
                slices: SliceRange::new(1, 3),
            }
        );

        let desc = TextureDesc::texture_1d(PixelFormat::R32Float, 64).with_array_size(2);
        let view = resolve_texture_srv(&desc, MipRange::full(1), SliceRange::new(0, 2)).unwrap();
        assert!(matches!(view, ShaderResourceViewDesc::Texture1DArray { .. }));
    }

    #[test]
    fn test_multisampled_ignores_mip_range() {
        for mips in [MipRange::new(0, 1), MipRange::new(5, 20), MipRange::new(u32::MAX, 1)] {
            let view = resolve_texture_srv(&msaa_target(1), mips, SliceRange::single()).unwrap();
            assert_eq!(view, ShaderResourceViewDesc::Texture2DMs { format: HardwareFormat::R16G16B16A16Float });
            assert!(view.is_multisampled());
            assert_eq!(view.mips(), None);

            let view = resolve_texture_srv(&msaa_target(4), mips, SliceRange::new(0, 4)).unwrap();
            assert!(view.is_multisampled());
            assert!(view.is_array());
        }
    }

    #[test]
    fn test_multisampled_array_assigns_slices_by_name() {
        let view = resolve_texture_srv(&msaa_target(8), MipRange::full(1), SliceRange::new(2, 5)).unwrap();
        match view {
            ShaderResourceViewDesc::Texture2DMsArray { slices, .. } => {
                assert_eq!(slices.first_array_slice, 2);
                assert_eq!(slices.array_size, 5);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_multisampled_requires_render_target() {
        let desc = msaa_target(1).with_create_flags(TextureCreateFlags::SHADER_RESOURCE);
        assert_eq!(
            resolve_texture_srv(&desc, MipRange::full(1), SliceRange::single()),
            Err(ViewError::MissingCapability { required: "render-target" })
        );
    }

    #[test]
    fn test_zero_counts_rejected() {
        assert_eq!(
            resolve_texture_srv(&srv_2d(), MipRange::new(0, 0), SliceRange::single()),
            Err(ViewError::ZeroCount { field: "mip_levels" })
        );
        assert_eq!(
            resolve_texture_srv(&srv_2d(), MipRange::full(1), SliceRange::new(0, 0)),
            Err(ViewError::ZeroCount { field: "array_size" })
        );
        assert_eq!(
            resolve_texture_srv(&msaa_target(1), MipRange::new(0, 0), SliceRange::single()),
            Err(ViewError::ZeroCount { field: "mip_levels" })
        );
    }

    #[test]
    fn test_capability_checked_first() {
        let desc = srv_2d().with_create_flags(TextureCreateFlags::RENDER_TARGET);
        // Zero counts would also fail; the capability error wins
        assert_eq!(
            resolve_texture_srv(&desc, MipRange::new(0, 0), SliceRange::new(0, 0)),
            Err(ViewError::MissingCapability { required: "shader-resource" })
        );
        assert_eq!(
            resolve_texture_uav(&srv_2d(), 0, SliceRange::single()),
            Err(ViewError::MissingCapability { required: "unordered-access" })
        );
    }

    #[test]
    fn test_mip_range_bounds() {
        assert!(resolve_texture_srv(&srv_2d(), MipRange::new(8, 1), SliceRange::single()).is_ok());
        assert_eq!(
            resolve_texture_srv(&srv_2d(), MipRange::new(8, 2), SliceRange::single()),
            Err(ViewError::MipRangeOutOfBounds { most_detailed_mip: 8, mip_levels: 2, available: 9 })
        );
    }

    #[test]
    fn test_cube_array_rejects_partial_cubes() {
        let desc = TextureDesc::cube(PixelFormat::Rgba16Float, 128).with_array_size(3);
        for count in [1, 5, 7, 13] {
            assert_eq!(
                resolve_texture_srv(&desc, MipRange::full(1), SliceRange::new(0, count)),
                Err(ViewError::UnalignedCubeSlices(count))
            );
        }
    }

    #[test]
    fn test_cube_array_faces_and_cubes() {
        let desc = TextureDesc::cube(PixelFormat::Rgba16Float, 128).with_mip_levels(4).with_array_size(3);
        let view = resolve_texture_srv(&desc, MipRange::new(1, 2), SliceRange::new(6, 12)).unwrap();
        assert_eq!(
            view,
            ShaderResourceViewDesc::TextureCubeArray {
                format: HardwareFormat::R16G16B16A16Float,
                mips: MipRange::new(1, 2),
                first_face: 6,
                cube_count: 2,
            }
        );

        assert_eq!(
            resolve_texture_srv(&desc, MipRange::full(1), SliceRange::new(6, 18)),
            Err(ViewError::SliceRangeOutOfBounds { first_array_slice: 6, array_size: 18, available: 18 })
        );
    }

    #[test]
    fn test_volume_texture_ignores_slices() {
        let desc = TextureDesc::texture_3d(PixelFormat::R8Unorm, 16, 16, 16).with_mip_levels(2);
        let view = resolve_texture_srv(&desc, MipRange::full(2), SliceRange::new(0, 0)).unwrap();
        assert_eq!(view, ShaderResourceViewDesc::Texture3D { format: HardwareFormat::R8Unorm, mips: MipRange::full(2) });
    }

    #[test]
    fn test_only_2d_may_be_multisampled() {
        let desc = TextureDesc::cube(PixelFormat::Rgba8Unorm, 16).with_sample_count(4);
        assert_eq!(
            resolve_texture_srv(&desc, MipRange::full(1), SliceRange::single()),
            Err(ViewError::MultisampleNotSupported(TextureDimension::Cube))
        );
    }

    #[test]
    fn test_depth_format_maps_to_readable() {
        let desc = TextureDesc::texture_2d(PixelFormat::Depth24UnormStencil8, 512, 512)
            .with_create_flags(TextureCreateFlags::SHADER_RESOURCE | TextureCreateFlags::DEPTH_STENCIL);
        let view = resolve_texture_srv(&desc, MipRange::full(1), SliceRange::single()).unwrap();
        assert_eq!(view.format(), HardwareFormat::R24UnormX8Typeless);
    }

    #[test]
    fn test_buffer_views() {
        let structured = BufferDesc::new(
            64 * 16,
            16,
            BufferCreateFlags::SHADER_RESOURCE | BufferCreateFlags::STRUCTURED,
        );
        let view = resolve_buffer_srv(&structured, BufferViewKind::Structured, ElementRange::new(0, 64)).unwrap();
        assert_eq!(view.format(), HardwareFormat::Unknown);
        assert_eq!(view, ShaderResourceViewDesc::StructuredBuffer { elements: ElementRange::new(0, 64) });

        let typed = BufferDesc::new(256, 4, BufferCreateFlags::SHADER_RESOURCE);
        let view = resolve_buffer_srv(&typed, BufferViewKind::Typed(PixelFormat::Rgba32Float), ElementRange::new(4, 12))
            .unwrap();
        assert_eq!(view.format(), HardwareFormat::R32G32B32A32Float);

        assert_eq!(
            resolve_buffer_srv(&typed, BufferViewKind::Typed(PixelFormat::Rgba32Float), ElementRange::new(4, 13)),
            Err(ViewError::ElementRangeOutOfBounds { first_element: 4, element_count: 13, available: 16 })
        );
        assert_eq!(
            resolve_buffer_srv(&typed, BufferViewKind::Structured, ElementRange::new(0, 1)),
            Err(ViewError::NotStructured)
        );
        assert_eq!(
            resolve_buffer_srv(&typed, BufferViewKind::Typed(PixelFormat::R32Float), ElementRange::new(0, 0)),
            Err(ViewError::ZeroCount { field: "element_count" })
        );
    }

    #[test]
    fn test_buffer_uav_requires_capability() {
        let desc = BufferDesc::new(64, 4, BufferCreateFlags::SHADER_RESOURCE);
        assert_eq!(
            resolve_buffer_uav(&desc, BufferViewKind::Typed(PixelFormat::R32Uint), ElementRange::new(0, 16)),
            Err(ViewError::MissingCapability { required: "unordered-access" })
        );

        let desc = BufferDesc::new(64, 4, BufferCreateFlags::UNORDERED_ACCESS);
        let view = resolve_buffer_uav(&desc, BufferViewKind::Typed(PixelFormat::R32Uint), ElementRange::new(0, 16)).unwrap();
        assert_eq!(view.format(), HardwareFormat::R32Uint);
    }

    #[test]
    fn test_texture_uavs() {
        let flags = TextureCreateFlags::SHADER_RESOURCE | TextureCreateFlags::UNORDERED_ACCESS;

        let desc = srv_2d().with_create_flags(flags);
        assert_eq!(
            resolve_texture_uav(&desc, 3, SliceRange::single()).unwrap(),
            UnorderedAccessViewDesc::Texture2D { format: HardwareFormat::R8G8B8A8Unorm, mip_slice: 3 }
        );
        assert!(matches!(
            resolve_texture_uav(&desc, 9, SliceRange::single()),
            Err(ViewError::MipRangeOutOfBounds { .. })
        ));

        let cube = TextureDesc::cube(PixelFormat::Rgba16Float, 32).with_create_flags(flags);
        let view = resolve_texture_uav(&cube, 0, SliceRange::new(0, 6)).unwrap();
        assert!(view.is_array());

        let volume = TextureDesc::texture_3d(PixelFormat::R32Float, 32, 32, 32).with_mip_levels(3).with_create_flags(flags);
        assert_eq!(
            resolve_texture_uav(&volume, 2, SliceRange::single()).unwrap(),
            UnorderedAccessViewDesc::Texture3D {
                format: HardwareFormat::R32Float,
                mip_slice: 2,
                first_depth_slice: 0,
                depth_size: 8,
            }
        );

        let msaa = msaa_target(1).with_create_flags(flags | TextureCreateFlags::RENDER_TARGET);
        assert_eq!(
            resolve_texture_uav(&msaa, 0, SliceRange::single()),
            Err(ViewError::MultisampledUnorderedAccess)
        );
    }

    #[test]
    fn test_volume_uav_at_deep_mip_keeps_one_slice() {
        let desc = TextureDesc::texture_3d(PixelFormat::R32Float, 64, 64, 64)
            .with_mip_levels(40)
            .with_create_flags(TextureCreateFlags::UNORDERED_ACCESS);

        for mip_slice in [6, 31, 32, 33, 39] {
            let view = resolve_texture_uav(&desc, mip_slice, SliceRange::single()).unwrap();
            assert!(matches!(
                view,
                UnorderedAccessViewDesc::Texture3D { depth_size: 1, first_depth_slice: 0, .. }
            ));
        }
        assert!(matches!(
            resolve_texture_uav(&desc, 40, SliceRange::single()),
            Err(ViewError::MipRangeOutOfBounds { .. })
        ));
    }
}

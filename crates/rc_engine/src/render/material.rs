//! Material system for rendering
//!
//! The render core never looks inside a shader effect. A material is a name,
//! a numeric resource handle (the state-change sort key), an alpha mode that
//! picks the bucket for meshes, and named texture bindings.

use crate::render::resources::TextureId;

/// Numeric identity of a material's effect resource
///
/// Materials sharing an effect share a handle, so sorting by handle groups
/// draws that need no state change between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(pub u64);

/// How a material's output combines with the target
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AlphaMode {
    /// No transparency
    #[default]
    Opaque,
    /// Alpha testing with cutoff value
    Mask(f32),
    /// Alpha blending
    Blend,
}

/// Material bound by a renderable when it is submitted
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Debug name
    pub name: String,

    /// Effect identity used as the sort key
    pub resource_handle: ResourceHandle,

    /// Blending behaviour
    pub alpha_mode: AlphaMode,

    /// Texture bindings by shader parameter name
    pub textures: Vec<(String, TextureId)>,
}

impl Material {
    /// Create an opaque material with no textures
    pub fn new(name: impl Into<String>, resource_handle: ResourceHandle) -> Self {
        Self {
            name: name.into(),
            resource_handle,
            alpha_mode: AlphaMode::Opaque,
            textures: Vec::new(),
        }
    }

    /// Set the alpha mode
    pub fn with_alpha_mode(mut self, alpha_mode: AlphaMode) -> Self {
        self.alpha_mode = alpha_mode;
        self
    }

    /// Whether draws with this material belong after opaque geometry
    pub fn is_transparent(&self) -> bool {
        matches!(self.alpha_mode, AlphaMode::Blend)
    }

    /// Bind `texture` to the shader parameter `parameter`, replacing any previous binding
    pub fn set_texture(&mut self, parameter: &str, texture: TextureId) {
        match self.textures.iter_mut().find(|(name, _)| name == parameter) {
            Some(binding) => binding.1 = texture,
            None => self.textures.push((parameter.to_string(), texture)),
        }
    }

    /// Texture bound to `parameter`, if any
    pub fn texture(&self, parameter: &str) -> Option<TextureId> {
        self.textures
            .iter()
            .find(|(name, _)| name == parameter)
            .map(|(_, texture)| *texture)
    }

    /// Per-object copy sharing the effect (and therefore the sort key)
    pub fn instance(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

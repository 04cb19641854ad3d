//! Error conversions into `RenderError`

use crate::render::resources::ViewError;
use crate::render::{RenderError, RenderResult};
use crate::scene::SceneError;

#[cfg(test)]
mod tests {
    use super::*;

    fn reject_view() -> RenderResult<()> {
        Err(ViewError::ZeroCount { field: "mip_levels" })?;
        Ok(())
    }

    fn reject_root_removal() -> RenderResult<()> {
        Err(SceneError::CannotRemoveRoot)?;
        Ok(())
    }

    #[test]
    fn test_view_error_converts_with_question_mark() {
        let err = reject_view().unwrap_err();
        assert!(matches!(err, RenderError::InvalidView(ViewError::ZeroCount { field: "mip_levels" })));
        assert_eq!(err.to_string(), "Invalid view: mip_levels must be at least 1");
    }

    #[test]
    fn test_scene_error_converts_with_question_mark() {
        let err = reject_root_removal().unwrap_err();
        assert!(matches!(err, RenderError::Scene(SceneError::CannotRemoveRoot)));
        assert_eq!(err.to_string(), "Scene error: The root node cannot be removed");
    }

    #[test]
    fn test_device_failures_carry_their_message() {
        let err = RenderError::RenderingFailed("draw 3 rejected".to_string());
        assert_eq!(err.to_string(), "Rendering failed: draw 3 rejected");
    }
}

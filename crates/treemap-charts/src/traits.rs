//! Renderer trait definitions for the output formats.

use crate::scene::Scene;
use treemap_common::Result;

/// Trait for renderers that turn a [`Scene`] into an encoded document.
pub trait SceneRenderer: Send + Sync {
    /// Renders the scene.
    fn render(&self, scene: &Scene) -> Result<Vec<u8>>;

    /// Gets the name of this renderer.
    fn name(&self) -> &'static str;

    /// Extension of the files this renderer produces, without the dot.
    fn file_extension(&self) -> &'static str;
}

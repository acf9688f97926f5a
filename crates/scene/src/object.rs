//! Renderable objects.

use glam::Mat4;

/// One renderable: a mesh and material referenced by name, plus a world
/// transform.
#[derive(Clone, Debug)]
pub struct RenderObject {
    /// Name of the mesh in the scene's mesh registry.
    pub mesh: String,
    /// Name of the material in the scene's material registry.
    pub material: String,
    /// Object-to-world matrix.
    pub transform: Mat4,
}

impl RenderObject {
    /// Creates a render object.
    pub fn new(mesh: impl Into<String>, material: impl Into<String>, transform: Mat4) -> Self {
        Self {
            mesh: mesh.into(),
            material: material.into(),
            transform,
        }
    }
}

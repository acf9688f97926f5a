//! Scene registries and content population.

use std::collections::HashMap;

use tracing::debug;

use crate::camera::Camera;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::object::RenderObject;

/// Flat scene: named mesh and material registries plus the renderable list.
///
/// Renderables are drawn in list order. Registration replaces silently, so
/// content can hot-swap a mesh or material by re-registering the name.
#[derive(Default)]
pub struct Scene {
    meshes: HashMap<String, Mesh>,
    materials: HashMap<String, Material>,
    renderables: Vec<RenderObject>,
    /// Active camera.
    pub camera: Camera,
}

impl Scene {
    /// Creates an empty scene with a default camera.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a mesh under `name`, replacing any previous entry.
    pub fn add_mesh(&mut self, name: impl Into<String>, mesh: Mesh) {
        let name = name.into();
        debug!("Registered mesh '{}' ({} vertices)", name, mesh.vertex_count());
        self.meshes.insert(name, mesh);
    }

    /// Registers a material under `name`, replacing any previous entry.
    pub fn add_material(&mut self, name: impl Into<String>, material: Material) {
        let name = name.into();
        debug!("Registered material '{}'", name);
        self.materials.insert(name, material);
    }

    /// Appends a renderable to the draw list.
    pub fn add_renderable(&mut self, object: RenderObject) {
        self.renderables.push(object);
    }

    /// Looks up a mesh by name.
    pub fn mesh(&self, name: &str) -> Option<&Mesh> {
        self.meshes.get(name)
    }

    /// Looks up a mesh by name, mutably.
    pub fn mesh_mut(&mut self, name: &str) -> Option<&mut Mesh> {
        self.meshes.get_mut(name)
    }

    /// Looks up a material by name.
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// The renderable list, in draw order.
    pub fn renderables(&self) -> &[RenderObject] {
        &self.renderables
    }

    /// Iterates over all registered meshes, mutably.
    pub fn meshes_mut(&mut self) -> impl Iterator<Item = (&String, &mut Mesh)> {
        self.meshes.iter_mut()
    }

    /// Number of renderables.
    pub fn renderable_count(&self) -> usize {
        self.renderables.len()
    }

    /// Drops all materials. Called before swapchain teardown since material
    /// pipelines reference the render pass.
    pub fn clear_materials(&mut self) {
        self.materials.clear();
    }
}

/// Populates a scene with content.
///
/// Implemented by the application; the engine calls [`populate`] once after
/// the GPU stack is up. Meshes are registered with CPU data only, the
/// engine uploads them afterwards. Materials are registered by the engine
/// itself since pipelines depend on the render pass.
///
/// [`populate`]: ContentProvider::populate
pub trait ContentProvider {
    /// Adds meshes and renderables to the scene.
    fn populate(&mut self, scene: &mut Scene);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};
    use vkr_rhi::vertex::Vertex;

    #[test]
    fn registries_start_empty() {
        let scene = Scene::new();
        assert_eq!(scene.renderable_count(), 0);
        assert!(scene.mesh("anything").is_none());
        assert!(scene.material("anything").is_none());
    }

    #[test]
    fn mesh_registration_replaces() {
        let mut scene = Scene::new();
        scene.add_mesh("tri", Mesh::new(vec![]));
        let vertex = Vertex {
            position: Vec3::ZERO,
            normal: Vec3::Z,
            color: Vec3::ONE,
        };
        scene.add_mesh("tri", Mesh::new(vec![vertex; 3]));
        assert_eq!(scene.mesh("tri").unwrap().vertex_count(), 3);
    }

    #[test]
    fn renderables_keep_insertion_order() {
        let mut scene = Scene::new();
        scene.add_renderable(RenderObject::new("a", "m", Mat4::IDENTITY));
        scene.add_renderable(RenderObject::new("b", "m", Mat4::IDENTITY));
        let names: Vec<&str> = scene.renderables().iter().map(|r| r.mesh.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}

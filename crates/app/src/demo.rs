//! Demo content: a grid of colored triangles around a centerpiece mesh.

use std::path::PathBuf;

use glam::{Mat4, Vec3};
use tracing::warn;
use vkr_rhi::vertex::Vertex;
use vkr_scene::{ContentProvider, Mesh, RenderObject, Scene};

/// Material name the demo objects reference; the app registers it before
/// loading content.
pub const DEMO_MATERIAL: &str = "default_lit";

const GRID_MESH: &str = "triangle";
const CENTERPIECE_MESH: &str = "centerpiece";

/// Populates the scene with a triangle grid and a centerpiece model.
pub struct DemoScene {
    half_extent: i32,
    /// Optional OBJ file for the centerpiece; a built-in pyramid is used
    /// when it is absent or fails to parse.
    model_path: Option<PathBuf>,
}

impl DemoScene {
    pub fn new() -> Self {
        Self {
            half_extent: 10,
            model_path: std::env::var_os("VKR_DEMO_MODEL").map(PathBuf::from),
        }
    }

    /// Number of objects the demo will register.
    pub fn object_count(&self) -> usize {
        let side = (2 * self.half_extent + 1) as usize;
        side * side + 1
    }

    fn centerpiece(&self) -> Mesh {
        if let Some(path) = &self.model_path {
            match vkr_assets::load_obj(path) {
                Ok(vertices) => return Mesh::new(vertices),
                Err(e) => {
                    warn!("Failed to load {}: {}; using built-in mesh", path.display(), e);
                }
            }
        }
        pyramid()
    }
}

fn triangle() -> Mesh {
    Mesh::new(vec![
        Vertex {
            position: Vec3::new(1.0, 1.0, 0.0),
            normal: Vec3::Z,
            color: Vec3::new(0.1, 0.8, 0.1),
        },
        Vertex {
            position: Vec3::new(-1.0, 1.0, 0.0),
            normal: Vec3::Z,
            color: Vec3::new(0.8, 0.1, 0.1),
        },
        Vertex {
            position: Vec3::new(0.0, -1.0, 0.0),
            normal: Vec3::Z,
            color: Vec3::new(0.1, 0.1, 0.8),
        },
    ])
}

/// Four-sided pyramid with per-face normals, colored like [`load_obj`]
/// output (color = normal).
///
/// [`load_obj`]: vkr_assets::load_obj
fn pyramid() -> Mesh {
    let apex = Vec3::new(0.0, 1.0, 0.0);
    let base = [
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
    ];

    let mut vertices = Vec::with_capacity(12);
    for i in 0..4 {
        let a = base[i];
        let b = base[(i + 1) % 4];
        let normal = (b - a).cross(apex - a).normalize();
        for position in [a, b, apex] {
            vertices.push(Vertex {
                position,
                normal,
                color: normal.abs(),
            });
        }
    }
    Mesh::new(vertices)
}

impl ContentProvider for DemoScene {
    fn populate(&mut self, scene: &mut Scene) {
        scene.add_mesh(GRID_MESH, triangle());
        scene.add_mesh(CENTERPIECE_MESH, self.centerpiece());

        scene.add_renderable(RenderObject::new(
            CENTERPIECE_MESH,
            DEMO_MATERIAL,
            Mat4::from_translation(Vec3::new(0.0, 1.5, 0.0)),
        ));

        for x in -self.half_extent..=self.half_extent {
            for z in -self.half_extent..=self.half_extent {
                let transform = Mat4::from_translation(Vec3::new(x as f32, 0.0, z as f32))
                    * Mat4::from_scale(Vec3::splat(0.2));
                scene.add_renderable(RenderObject::new(GRID_MESH, DEMO_MATERIAL, transform));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populates_grid_and_centerpiece() {
        let mut demo = DemoScene {
            half_extent: 10,
            model_path: None,
        };
        let mut scene = Scene::new();
        demo.populate(&mut scene);

        assert_eq!(scene.renderable_count(), demo.object_count());
        assert!(scene.mesh(GRID_MESH).is_some());
        assert!(scene.mesh(CENTERPIECE_MESH).is_some());
        assert!(scene
            .renderables()
            .iter()
            .all(|r| r.material == DEMO_MATERIAL));
    }

    #[test]
    fn mesh_shader_indexes_objects_by_instance_index() {
        // Draws are recorded with instanceCount 1 and firstInstance set to
        // the object's storage-buffer slot. gl_InstanceIndex picks that up
        // under core #version 450; gl_BaseInstance would additionally need
        // GL_KHR_shader_draw_parameters and the shaderDrawParameters device
        // feature, which the device does not enable.
        let source = std::fs::read_to_string(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders/tri_mesh.vert"),
        )
        .unwrap();

        assert!(source.contains("objects[gl_InstanceIndex]"));
        assert!(!source.contains("gl_BaseInstance"));
        assert!(!source.contains("GL_KHR_shader_draw_parameters"));
    }

    #[test]
    fn missing_model_falls_back_to_pyramid() {
        let mut demo = DemoScene {
            half_extent: 1,
            model_path: Some(PathBuf::from("does/not/exist.obj")),
        };
        let mut scene = Scene::new();
        demo.populate(&mut scene);

        let mesh = scene.mesh(CENTERPIECE_MESH).unwrap();
        assert_eq!(mesh.vertex_count(), 12);
    }
}

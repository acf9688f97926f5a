//! Wavefront OBJ mesh import.

use std::path::Path;

use glam::Vec3;
use tracing::{info, warn};
use vkr_rhi::vertex::Vertex;

use crate::error::AssetResult;

/// Loads an OBJ file into a flat, unindexed vertex list.
///
/// All models and their faces are triangulated and concatenated. Vertex
/// color is set to the normal so unlit debug shading shows surface
/// orientation; missing normals fall back to zero.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_obj(path: impl AsRef<Path>) -> AssetResult<Vec<Vertex>> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;

    let mut vertices = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        let has_normals = !mesh.normals.is_empty();
        if !has_normals {
            warn!("Model '{}' has no normals", model.name);
        }

        for &index in &mesh.indices {
            let i = index as usize;
            let position = Vec3::new(
                mesh.positions[3 * i],
                mesh.positions[3 * i + 1],
                mesh.positions[3 * i + 2],
            );
            let normal = if has_normals {
                Vec3::new(
                    mesh.normals[3 * i],
                    mesh.normals[3 * i + 1],
                    mesh.normals[3 * i + 2],
                )
            } else {
                Vec3::ZERO
            };

            vertices.push(Vertex {
                position,
                normal,
                color: normal,
            });
        }
    }

    info!(
        "Loaded {} ({} models, {} vertices)",
        path.display(),
        models.len(),
        vertices.len()
    );

    Ok(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_triangle_with_normals() {
        let mut file = tempfile_obj(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             vn 0 0 1\nvn 0 0 1\nvn 0 0 1\n\
             f 1//1 2//2 3//3\n",
        );
        let vertices = load_obj(file.path()).unwrap();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0].normal, Vec3::Z);
        // Color mirrors the normal
        assert_eq!(vertices[0].color, vertices[0].normal);
        file.close();
    }

    #[test]
    fn quad_is_triangulated() {
        let mut file = tempfile_obj(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             f 1 2 3 4\n",
        );
        let vertices = load_obj(file.path()).unwrap();
        assert_eq!(vertices.len(), 6);
        file.close();
    }

    #[test]
    fn missing_file_errors() {
        assert!(load_obj("does/not/exist.obj").is_err());
    }

    struct TempObj(std::path::PathBuf);

    impl TempObj {
        fn path(&self) -> &std::path::Path {
            &self.0
        }

        fn close(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn tempfile_obj(content: &str) -> TempObj {
        let path = std::env::temp_dir().join(format!(
            "vkr_obj_test_{}_{}.obj",
            std::process::id(),
            content.len()
        ));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        TempObj(path)
    }
}

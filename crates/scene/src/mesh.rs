//! Mesh data.

use vkr_rhi::buffer::Buffer;
use vkr_rhi::vertex::Vertex;

/// A mesh: CPU-side vertices plus, once uploaded, a device-local vertex
/// buffer.
///
/// Meshes are registered with CPU data only; the engine uploads them through
/// its immediate-submit channel, filling in `vertex_buffer`.
pub struct Mesh {
    /// CPU-side vertex data, kept for re-upload after device loss.
    pub vertices: Vec<Vertex>,
    /// Device-local vertex buffer, present after upload.
    pub vertex_buffer: Option<Buffer>,
}

impl Mesh {
    /// Creates a mesh from vertex data.
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            vertex_buffer: None,
        }
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// The mesh has been uploaded to the GPU.
    #[inline]
    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn new_mesh_is_not_uploaded() {
        let mesh = Mesh::new(vec![
            Vertex {
                position: Vec3::ZERO,
                normal: Vec3::Z,
                color: Vec3::ONE,
            };
            3
        ]);
        assert_eq!(mesh.vertex_count(), 3);
        assert!(!mesh.is_uploaded());
    }
}

//! Vertex format shared by every mesh pipeline.

use ash::vk;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Mesh vertex: position, normal, color.
///
/// Matches the vertex shader input at locations 0, 1, and 2.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: Vec3,
    /// Object-space normal.
    pub normal: Vec3,
    /// Per-vertex color.
    pub color: Vec3,
}

impl Vertex {
    /// Binding description for binding 0.
    pub fn binding_description() -> vk::VertexInputBindingDescription {
        vk::VertexInputBindingDescription::default()
            .binding(0)
            .stride(std::mem::size_of::<Vertex>() as u32)
            .input_rate(vk::VertexInputRate::VERTEX)
    }

    /// Attribute descriptions for the three vertex inputs.
    pub fn attribute_descriptions() -> [vk::VertexInputAttributeDescription; 3] {
        [
            vk::VertexInputAttributeDescription::default()
                .location(0)
                .binding(0)
                .format(vk::Format::R32G32B32_SFLOAT)
                .offset(std::mem::offset_of!(Vertex, position) as u32),
            vk::VertexInputAttributeDescription::default()
                .location(1)
                .binding(0)
                .format(vk::Format::R32G32B32_SFLOAT)
                .offset(std::mem::offset_of!(Vertex, normal) as u32),
            vk::VertexInputAttributeDescription::default()
                .location(2)
                .binding(0)
                .format(vk::Format::R32G32B32_SFLOAT)
                .offset(std::mem::offset_of!(Vertex, color) as u32),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_36_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
    }

    #[test]
    fn attribute_offsets_are_packed() {
        let attrs = Vertex::attribute_descriptions();
        assert_eq!(attrs[0].offset, 0);
        assert_eq!(attrs[1].offset, 12);
        assert_eq!(attrs[2].offset, 24);
    }

    #[test]
    fn binding_stride_matches_size() {
        assert_eq!(
            Vertex::binding_description().stride as usize,
            std::mem::size_of::<Vertex>()
        );
    }

    #[test]
    fn all_attributes_are_vec3() {
        for attr in Vertex::attribute_descriptions() {
            assert_eq!(attr.format, vk::Format::R32G32B32_SFLOAT);
            assert_eq!(attr.binding, 0);
        }
    }
}

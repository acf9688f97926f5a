//! GPU-visible data layouts and uniform alignment.
//!
//! Every struct here is `repr(C)` and mirrors a block declared in the
//! shaders; layout tests below pin the sizes so a field reorder cannot
//! silently corrupt bindings.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Maximum objects the per-frame storage buffer can hold.
pub const MAX_OBJECTS: usize = 10_000;

/// Camera matrices, one uniform buffer per frame slot.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuCameraData {
    /// World-to-view matrix.
    pub view: Mat4,
    /// View-to-clip matrix.
    pub proj: Mat4,
    /// Premultiplied `proj * view`.
    pub view_proj: Mat4,
}

/// Scene-wide shading parameters.
///
/// All frame slots share one uniform buffer; each slot reads its own padded
/// slice through a dynamic descriptor offset.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuSceneData {
    /// Fog color; w is unused.
    pub fog_color: Vec4,
    /// x = fog start, y = fog end.
    pub fog_distances: Vec4,
    /// Ambient light color.
    pub ambient_color: Vec4,
    /// Sunlight direction; w is intensity.
    pub sunlight_direction: Vec4,
    /// Sunlight color.
    pub sunlight_color: Vec4,
}

impl Default for GpuSceneData {
    fn default() -> Self {
        Self {
            fog_color: Vec4::new(0.1, 0.1, 0.12, 1.0),
            fog_distances: Vec4::new(20.0, 150.0, 0.0, 0.0),
            ambient_color: Vec4::new(0.08, 0.08, 0.1, 1.0),
            sunlight_direction: Vec4::new(-0.4, -1.0, -0.2, 1.0),
            sunlight_color: Vec4::ONE,
        }
    }
}

/// Per-object data in the frame's storage buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuObjectData {
    /// Object-to-world matrix.
    pub model: Mat4,
}

/// Push constants for the mesh vertex shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MeshPushConstants {
    /// Free-form parameter vector.
    pub data: Vec4,
    /// Object-to-clip matrix for pipelines that bypass the camera buffer.
    pub render_matrix: Mat4,
}

/// Rounds `size` up to the next multiple of `min_alignment`.
///
/// Used to stride per-frame regions of dynamically offset uniform buffers.
/// `min_alignment` comes from the device limits and is always a power of
/// two; an alignment of zero leaves the size unchanged.
pub const fn pad_uniform_buffer_size(size: u64, min_alignment: u64) -> u64 {
    if min_alignment > 0 {
        (size + min_alignment - 1) & !(min_alignment - 1)
    } else {
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_data_is_three_mat4s() {
        assert_eq!(std::mem::size_of::<GpuCameraData>(), 3 * 64);
    }

    #[test]
    fn scene_data_is_five_vec4s() {
        assert_eq!(std::mem::size_of::<GpuSceneData>(), 5 * 16);
    }

    #[test]
    fn object_data_is_one_mat4() {
        assert_eq!(std::mem::size_of::<GpuObjectData>(), 64);
    }

    #[test]
    fn push_constants_fit_in_minimum_budget() {
        // 128 bytes is the guaranteed minimum for maxPushConstantsSize
        assert_eq!(std::mem::size_of::<MeshPushConstants>(), 80);
        assert!(std::mem::size_of::<MeshPushConstants>() <= 128);
    }

    #[test]
    fn padding_rounds_up_to_alignment() {
        assert_eq!(pad_uniform_buffer_size(80, 256), 256);
        assert_eq!(pad_uniform_buffer_size(300, 256), 512);
        assert_eq!(pad_uniform_buffer_size(1, 64), 64);
    }

    #[test]
    fn padding_is_identity_on_aligned_sizes() {
        assert_eq!(pad_uniform_buffer_size(256, 256), 256);
        assert_eq!(pad_uniform_buffer_size(512, 256), 512);
        assert_eq!(pad_uniform_buffer_size(0, 256), 0);
    }

    #[test]
    fn padding_is_idempotent() {
        for size in [0u64, 1, 63, 64, 65, 80, 255, 256, 1000] {
            for align in [16u64, 64, 256] {
                let once = pad_uniform_buffer_size(size, align);
                assert_eq!(pad_uniform_buffer_size(once, align), once);
            }
        }
    }

    #[test]
    fn zero_alignment_passes_through() {
        assert_eq!(pad_uniform_buffer_size(80, 0), 80);
        assert_eq!(pad_uniform_buffer_size(0, 0), 0);
    }

    #[test]
    fn padded_result_is_aligned() {
        for size in [1u64, 17, 80, 300] {
            for align in [16u64, 64, 256] {
                assert_eq!(pad_uniform_buffer_size(size, align) % align, 0);
            }
        }
    }
}

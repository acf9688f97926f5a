//! GPU buffer management.
//!
//! Wraps a `vk::Buffer` together with its gpu-allocator allocation. Usage
//! determines both the Vulkan usage flags and where the memory lives:
//! vertex and index buffers are device-local and filled through a staging
//! copy, uniform and storage buffers stay host-visible and are written
//! directly every frame.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vkr_rhi::buffer::{Buffer, BufferUsage};
//! use vkr_rhi::device::Device;
//!
//! # fn example(device: Arc<Device>) -> Result<(), vkr_rhi::RhiError> {
//! let scene_params: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
//! let ubo = Buffer::new_with_data(
//!     device,
//!     &scene_params,
//!     BufferUsage::Uniform,
//!     "scene_params",
//! )?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use ash::vk;
use gpu_allocator::MemoryLocation;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme};
use tracing::debug;

use crate::device::Device;
use crate::error::{RhiError, RhiResult};

/// How a buffer will be used, determining usage flags and memory location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferUsage {
    /// Vertex buffer, device-local, filled via staging copy.
    Vertex,
    /// Index buffer, device-local, filled via staging copy.
    Index,
    /// Uniform buffer, host-visible, rewritten per frame.
    Uniform,
    /// Shader storage buffer, host-visible, rewritten per frame.
    Storage,
    /// Staging buffer, host-visible transfer source.
    Staging,
}

impl BufferUsage {
    /// Vulkan usage flags for this buffer kind.
    pub fn to_vk_usage(self) -> vk::BufferUsageFlags {
        match self {
            Self::Vertex => {
                vk::BufferUsageFlags::VERTEX_BUFFER | vk::BufferUsageFlags::TRANSFER_DST
            }
            Self::Index => vk::BufferUsageFlags::INDEX_BUFFER | vk::BufferUsageFlags::TRANSFER_DST,
            Self::Uniform => vk::BufferUsageFlags::UNIFORM_BUFFER,
            Self::Storage => vk::BufferUsageFlags::STORAGE_BUFFER,
            Self::Staging => vk::BufferUsageFlags::TRANSFER_SRC,
        }
    }

    /// Memory location for this buffer kind.
    pub fn memory_location(self) -> MemoryLocation {
        match self {
            Self::Vertex | Self::Index => MemoryLocation::GpuOnly,
            Self::Uniform | Self::Storage | Self::Staging => MemoryLocation::CpuToGpu,
        }
    }

    /// Short name used in allocation labels and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Index => "index",
            Self::Uniform => "uniform",
            Self::Storage => "storage",
            Self::Staging => "staging",
        }
    }
}

/// GPU buffer with bound memory.
///
/// Dropping the buffer frees the allocation and destroys the handle.
pub struct Buffer {
    device: Arc<Device>,
    buffer: vk::Buffer,
    allocation: Option<Allocation>,
    size: u64,
    usage: BufferUsage,
}

impl Buffer {
    /// Creates a buffer of `size` bytes.
    ///
    /// # Arguments
    ///
    /// * `size` - buffer size in bytes, must be non-zero
    /// * `usage` - intended usage, selects flags and memory location
    /// * `label` - debug name for the allocation
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is zero, or if buffer creation or memory
    /// allocation fails.
    pub fn new(
        device: Arc<Device>,
        size: u64,
        usage: BufferUsage,
        label: &str,
    ) -> RhiResult<Self> {
        if size == 0 {
            return Err(RhiError::InvalidArgument(format!(
                "buffer '{label}' requested with zero size"
            )));
        }

        let create_info = vk::BufferCreateInfo::default()
            .size(size)
            .usage(usage.to_vk_usage())
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let buffer = unsafe { device.handle().create_buffer(&create_info, None)? };
        let requirements = unsafe { device.handle().get_buffer_memory_requirements(buffer) };

        let allocation = {
            let mut allocator = device.allocator().lock().unwrap();
            allocator.allocate(&AllocationCreateDesc {
                name: label,
                requirements,
                location: usage.memory_location(),
                linear: true,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            })?
        };

        unsafe {
            device
                .handle()
                .bind_buffer_memory(buffer, allocation.memory(), allocation.offset())?;
        }

        debug!("Created {} buffer '{}' ({} bytes)", usage.name(), label, size);

        Ok(Self {
            device,
            buffer,
            allocation: Some(allocation),
            size,
            usage,
        })
    }

    /// Creates a host-visible buffer and fills it with `data`.
    ///
    /// Only valid for usages whose memory is host-visible; device-local
    /// buffers must go through a staging copy instead.
    ///
    /// # Errors
    ///
    /// Returns an error if `usage` is device-local, `data` is empty, or
    /// creation fails.
    pub fn new_with_data<T: bytemuck::Pod>(
        device: Arc<Device>,
        data: &[T],
        usage: BufferUsage,
        label: &str,
    ) -> RhiResult<Self> {
        if usage.memory_location() == MemoryLocation::GpuOnly {
            return Err(RhiError::InvalidArgument(format!(
                "buffer '{label}' is device-local and cannot be written directly"
            )));
        }

        let size = std::mem::size_of_val(data) as u64;
        let buffer = Self::new(device, size, usage, label)?;
        buffer.write_data(data, 0)?;
        Ok(buffer)
    }

    /// Writes `data` into the mapped buffer at `offset` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is not host-visible or the write would
    /// overrun the allocation.
    pub fn write_data<T: bytemuck::Pod>(&self, data: &[T], offset: u64) -> RhiResult<()> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let end = offset + bytes.len() as u64;
        if end > self.size {
            return Err(RhiError::InvalidArgument(format!(
                "write of {} bytes at offset {} overruns buffer of {} bytes",
                bytes.len(),
                offset,
                self.size
            )));
        }

        let allocation = self
            .allocation
            .as_ref()
            .ok_or_else(|| RhiError::InvalidArgument("buffer already freed".into()))?;

        let mapped = allocation.mapped_ptr().ok_or_else(|| {
            RhiError::InvalidArgument(format!("{} buffer is not host-visible", self.usage.name()))
        })?;

        unsafe {
            let dst = mapped.as_ptr().cast::<u8>().add(offset as usize);
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), dst, bytes.len());
        }

        Ok(())
    }

    /// Returns the Vulkan buffer handle.
    #[inline]
    pub fn handle(&self) -> vk::Buffer {
        self.buffer
    }

    /// Returns the buffer size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the buffer usage.
    #[inline]
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        if let Some(allocation) = self.allocation.take() {
            if let Ok(mut allocator) = self.device.allocator().lock() {
                let _ = allocator.free(allocation);
            }
        }
        unsafe {
            self.device.handle().destroy_buffer(self.buffer, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_and_index_buffers_are_device_local() {
        assert_eq!(BufferUsage::Vertex.memory_location(), MemoryLocation::GpuOnly);
        assert_eq!(BufferUsage::Index.memory_location(), MemoryLocation::GpuOnly);
    }

    #[test]
    fn per_frame_buffers_are_host_visible() {
        assert_eq!(
            BufferUsage::Uniform.memory_location(),
            MemoryLocation::CpuToGpu
        );
        assert_eq!(
            BufferUsage::Storage.memory_location(),
            MemoryLocation::CpuToGpu
        );
        assert_eq!(
            BufferUsage::Staging.memory_location(),
            MemoryLocation::CpuToGpu
        );
    }

    #[test]
    fn device_local_usages_accept_transfer_dst() {
        assert!(
            BufferUsage::Vertex
                .to_vk_usage()
                .contains(vk::BufferUsageFlags::TRANSFER_DST)
        );
        assert!(
            BufferUsage::Index
                .to_vk_usage()
                .contains(vk::BufferUsageFlags::TRANSFER_DST)
        );
    }

    #[test]
    fn staging_is_transfer_source() {
        assert!(
            BufferUsage::Staging
                .to_vk_usage()
                .contains(vk::BufferUsageFlags::TRANSFER_SRC)
        );
    }

    #[test]
    fn buffer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Buffer>();
    }
}

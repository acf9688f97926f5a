//! GPU image management.
//!
//! [`Image`] bundles a `vk::Image`, its allocation, and a default view.
//! Constructors cover the three image kinds the renderer needs: the depth
//! attachment, the multisampled color target, and sampled textures filled
//! through a staging copy.

use std::sync::Arc;

use ash::vk;
use gpu_allocator::MemoryLocation;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme};
use tracing::debug;

use crate::device::Device;
use crate::error::{RhiError, RhiResult};

/// Depth attachment format used throughout the renderer.
pub const DEPTH_FORMAT: vk::Format = vk::Format::D32_SFLOAT;

/// GPU image with bound memory and a default view.
pub struct Image {
    device: Arc<Device>,
    image: vk::Image,
    allocation: Option<Allocation>,
    view: vk::ImageView,
    format: vk::Format,
    extent: vk::Extent2D,
}

impl Image {
    /// Creates a depth attachment matching the swapchain extent.
    ///
    /// # Errors
    ///
    /// Returns an error if image, memory, or view creation fails.
    pub fn new_depth(
        device: Arc<Device>,
        extent: vk::Extent2D,
        samples: vk::SampleCountFlags,
    ) -> RhiResult<Self> {
        let image = Self::new_internal(
            device,
            extent,
            DEPTH_FORMAT,
            samples,
            vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT,
            vk::ImageAspectFlags::DEPTH,
            "depth_attachment",
        )?;
        debug!("Created depth attachment {}x{}", extent.width, extent.height);
        Ok(image)
    }

    /// Creates the multisampled color target that resolves into the
    /// swapchain image.
    ///
    /// # Errors
    ///
    /// Returns an error if image, memory, or view creation fails.
    pub fn new_color_msaa(
        device: Arc<Device>,
        extent: vk::Extent2D,
        format: vk::Format,
        samples: vk::SampleCountFlags,
    ) -> RhiResult<Self> {
        let image = Self::new_internal(
            device,
            extent,
            format,
            samples,
            vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::TRANSIENT_ATTACHMENT,
            vk::ImageAspectFlags::COLOR,
            "msaa_color_attachment",
        )?;
        debug!(
            "Created MSAA color target {}x{} ({:?})",
            extent.width, extent.height, samples
        );
        Ok(image)
    }

    /// Creates a sampled texture to be filled through a staging copy.
    ///
    /// # Errors
    ///
    /// Returns an error if image, memory, or view creation fails.
    pub fn new_texture(
        device: Arc<Device>,
        extent: vk::Extent2D,
        format: vk::Format,
        label: &str,
    ) -> RhiResult<Self> {
        Self::new_internal(
            device,
            extent,
            format,
            vk::SampleCountFlags::TYPE_1,
            vk::ImageUsageFlags::TRANSFER_DST | vk::ImageUsageFlags::SAMPLED,
            vk::ImageAspectFlags::COLOR,
            label,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn new_internal(
        device: Arc<Device>,
        extent: vk::Extent2D,
        format: vk::Format,
        samples: vk::SampleCountFlags,
        usage: vk::ImageUsageFlags,
        aspect: vk::ImageAspectFlags,
        label: &str,
    ) -> RhiResult<Self> {
        if extent.width == 0 || extent.height == 0 {
            return Err(RhiError::InvalidArgument(format!(
                "image '{label}' requested with zero extent"
            )));
        }

        let create_info = vk::ImageCreateInfo::default()
            .image_type(vk::ImageType::TYPE_2D)
            .format(format)
            .extent(vk::Extent3D {
                width: extent.width,
                height: extent.height,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .samples(samples)
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED);

        let image = unsafe { device.handle().create_image(&create_info, None)? };
        let requirements = unsafe { device.handle().get_image_memory_requirements(image) };

        let allocation = {
            let mut allocator = device.allocator().lock().unwrap();
            allocator.allocate(&AllocationCreateDesc {
                name: label,
                requirements,
                location: MemoryLocation::GpuOnly,
                linear: false,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            })?
        };

        unsafe {
            device
                .handle()
                .bind_image_memory(image, allocation.memory(), allocation.offset())?;
        }

        let view_info = vk::ImageViewCreateInfo::default()
            .image(image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(format)
            .subresource_range(
                vk::ImageSubresourceRange::default()
                    .aspect_mask(aspect)
                    .base_mip_level(0)
                    .level_count(1)
                    .base_array_layer(0)
                    .layer_count(1),
            );

        let view = unsafe { device.handle().create_image_view(&view_info, None)? };

        Ok(Self {
            device,
            image,
            allocation: Some(allocation),
            view,
            format,
            extent,
        })
    }

    /// Returns the Vulkan image handle.
    #[inline]
    pub fn handle(&self) -> vk::Image {
        self.image
    }

    /// Returns the default image view.
    #[inline]
    pub fn view(&self) -> vk::ImageView {
        self.view
    }

    /// Returns the image format.
    #[inline]
    pub fn format(&self) -> vk::Format {
        self.format
    }

    /// Returns the image extent.
    #[inline]
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }
}

impl Drop for Image {
    fn drop(&mut self) {
        unsafe {
            self.device.handle().destroy_image_view(self.view, None);
        }
        if let Some(allocation) = self.allocation.take() {
            if let Ok(mut allocator) = self.device.allocator().lock() {
                let _ = allocator.free(allocation);
            }
        }
        unsafe {
            self.device.handle().destroy_image(self.image, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_format_is_d32() {
        assert_eq!(DEPTH_FORMAT, vk::Format::D32_SFLOAT);
    }

    #[test]
    fn image_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Image>();
    }
}

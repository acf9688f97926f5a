//! Logical device, queues, and the GPU memory allocator.
//!
//! [`Device`] is the hub the rest of the RHI hangs off: every wrapper takes
//! an `Arc<Device>` and reaches Vulkan through [`Device::handle`]. It also
//! owns the gpu-allocator instance that backs all buffer and image memory.
//!
//! # Example
//!
//! ```no_run
//! use ash::vk;
//! use vkr_rhi::device::Device;
//! use vkr_rhi::instance::Instance;
//! use vkr_rhi::physical_device::select_physical_device;
//!
//! let instance = Instance::new(false).expect("instance creation failed");
//! let surface: vk::SurfaceKHR = vk::SurfaceKHR::null(); // placeholder
//! let surface_loader = ash::khr::surface::Instance::new(instance.entry(), instance.handle());
//!
//! let gpu = select_physical_device(instance.handle(), surface, &surface_loader)
//!     .expect("no suitable GPU");
//! let device = Device::new(&instance, &gpu).expect("device creation failed");
//! let graphics_queue = device.graphics_queue();
//! ```

use std::sync::{Arc, Mutex};

use ash::vk;
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc};
use tracing::{debug, info};

use crate::error::RhiError;
use crate::instance::Instance;
use crate::physical_device::{PhysicalDeviceInfo, QueueFamilyIndices};

/// Device extensions the engine cannot run without.
const DEVICE_EXTENSIONS: &[&std::ffi::CStr] = &[ash::khr::swapchain::NAME];

/// One queue request per unique family, all at default priority.
fn queue_requests<'a>(
    families: &[u32],
    priorities: &'a [f32; 1],
) -> Vec<vk::DeviceQueueCreateInfo<'a>> {
    families
        .iter()
        .map(|&family| {
            vk::DeviceQueueCreateInfo::default()
                .queue_family_index(family)
                .queue_priorities(priorities)
        })
        .collect()
}

/// Logical device plus the queues and allocator scoped to it.
///
/// Shared behind an `Arc` by every other RHI wrapper. The allocator sits
/// behind a `Mutex` held only for the duration of an alloc or free call.
pub struct Device {
    device: ash::Device,
    physical_device: vk::PhysicalDevice,
    allocator: Mutex<Allocator>,
    graphics_queue: vk::Queue,
    present_queue: vk::Queue,
    queue_families: QueueFamilyIndices,
}

impl Device {
    /// Creates the logical device and allocator for a selected GPU.
    ///
    /// Enables `fillModeNonSolid` so wireframe pipelines can be built;
    /// graphics and present queues are fetched from whatever families the
    /// selection found (often the same one).
    ///
    /// # Errors
    ///
    /// Returns an error if device creation or allocator setup fails.
    pub fn new(instance: &Instance, gpu: &PhysicalDeviceInfo) -> Result<Arc<Self>, RhiError> {
        let families = gpu.queue_families.unique_families();
        let priorities = [1.0f32];
        let requests = queue_requests(&families, &priorities);
        debug!("Requesting {} queue(s) from families {:?}", requests.len(), families);

        let features = vk::PhysicalDeviceFeatures::default().fill_mode_non_solid(true);
        let extensions: Vec<*const i8> = DEVICE_EXTENSIONS.iter().map(|e| e.as_ptr()).collect();

        let create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&requests)
            .enabled_extension_names(&extensions)
            .enabled_features(&features);

        let device = unsafe {
            instance
                .handle()
                .create_device(gpu.device, &create_info, None)?
        };

        let graphics_family = gpu.queue_families.graphics_family.unwrap();
        let present_family = gpu.queue_families.present_family.unwrap();
        let graphics_queue = unsafe { device.get_device_queue(graphics_family, 0) };
        let present_queue = unsafe { device.get_device_queue(present_family, 0) };
        info!(
            "Logical device ready (graphics family {}, present family {})",
            graphics_family, present_family
        );

        let allocator = Allocator::new(&AllocatorCreateDesc {
            instance: instance.handle().clone(),
            device: device.clone(),
            physical_device: gpu.device,
            debug_settings: Default::default(),
            buffer_device_address: false,
            allocation_sizes: Default::default(),
        })?;

        Ok(Arc::new(Self {
            device,
            physical_device: gpu.device,
            allocator: Mutex::new(allocator),
            graphics_queue,
            present_queue,
            queue_families: gpu.queue_families,
        }))
    }

    /// The `ash` device all raw Vulkan calls go through.
    #[inline]
    pub fn handle(&self) -> &ash::Device {
        &self.device
    }

    /// Physical device this logical device was created from.
    #[inline]
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    /// Queue used for rendering and upload submissions.
    #[inline]
    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    /// Queue used for swapchain presentation.
    #[inline]
    pub fn present_queue(&self) -> vk::Queue {
        self.present_queue
    }

    /// Family indices the queues were created from.
    #[inline]
    pub fn queue_families(&self) -> &QueueFamilyIndices {
        &self.queue_families
    }

    /// GPU memory allocator shared by buffer and image wrappers.
    #[inline]
    pub fn allocator(&self) -> &Mutex<Allocator> {
        &self.allocator
    }

    /// Blocks until every queue on the device drains.
    ///
    /// # Errors
    ///
    /// Returns an error if the wait fails (device loss).
    pub fn wait_idle(&self) -> Result<(), RhiError> {
        unsafe { self.device.device_wait_idle()? };
        Ok(())
    }

    /// Submits to the graphics queue, signaling `fence` on completion.
    ///
    /// # Safety
    ///
    /// Every command buffer in `submit_infos` must be fully recorded, and
    /// `fence` (when non-null) must be unsignaled and not pending elsewhere.
    pub unsafe fn submit_graphics(
        &self,
        submit_infos: &[vk::SubmitInfo],
        fence: vk::Fence,
    ) -> Result<(), RhiError> {
        unsafe {
            self.device
                .queue_submit(self.graphics_queue, submit_infos, fence)?;
        }
        Ok(())
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        // GPU work still in flight at teardown would use freed memory
        unsafe {
            if let Err(e) = self.device.device_wait_idle() {
                tracing::error!("device_wait_idle failed during drop: {:?}", e);
            }
            self.device.destroy_device(None);
        }
        info!("Logical device destroyed");
    }
}

// Safety: the ash device and queue handles are plain handles usable from
// any thread, and the allocator is synchronized through its Mutex.
unsafe impl Send for Device {}
unsafe impl Sync for Device {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swapchain_extension_is_required() {
        assert!(DEVICE_EXTENSIONS.contains(&ash::khr::swapchain::NAME));
    }

    #[test]
    fn one_queue_request_per_family() {
        let priorities = [1.0f32];

        let shared = queue_requests(&[0], &priorities);
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].queue_family_index, 0);
        assert_eq!(shared[0].queue_count, 1);

        let split = queue_requests(&[0, 2], &priorities);
        assert_eq!(split.len(), 2);
        assert_eq!(split[1].queue_family_index, 2);
    }

    #[test]
    fn device_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Device>();
    }
}

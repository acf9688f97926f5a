//! Fence and semaphore RAII wrappers.
//!
//! The frame loop uses one [`Semaphore`] pair per slot (acquire before
//! render, render before present) and one [`Fence`] per slot for CPU-side
//! slot reuse. The upload channel owns a single unsignaled fence.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vkr_rhi::device::Device;
//! use vkr_rhi::sync::{Fence, Semaphore};
//!
//! # fn example(device: Arc<Device>) -> Result<(), vkr_rhi::RhiError> {
//! let acquire = Semaphore::new(device.clone())?;
//!
//! // Frame fences start signaled so the first wait on a fresh slot
//! // returns immediately
//! let render_fence = Fence::new(device, true)?;
//! render_fence.wait(1_000_000_000)?;
//! render_fence.reset()?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use ash::vk;

use crate::device::Device;
use crate::error::{RhiError, RhiResult};

/// Binary semaphore for GPU-to-GPU ordering.
///
/// The CPU never observes its state; it only threads the handle through
/// submit and present info structs.
pub struct Semaphore {
    device: Arc<Device>,
    semaphore: vk::Semaphore,
}

impl Semaphore {
    /// Creates an unsignaled binary semaphore.
    ///
    /// # Errors
    ///
    /// Returns an error if creation fails.
    pub fn new(device: Arc<Device>) -> RhiResult<Self> {
        let semaphore = unsafe {
            device
                .handle()
                .create_semaphore(&vk::SemaphoreCreateInfo::default(), None)?
        };
        Ok(Self { device, semaphore })
    }

    /// Raw handle for submit and present infos.
    #[inline]
    pub fn handle(&self) -> vk::Semaphore {
        self.semaphore
    }
}

impl Drop for Semaphore {
    fn drop(&mut self) {
        unsafe {
            self.device.handle().destroy_semaphore(self.semaphore, None);
        }
    }
}

/// Fence for GPU-to-CPU completion handoff.
pub struct Fence {
    device: Arc<Device>,
    fence: vk::Fence,
}

/// Initial fence state as creation flags.
fn initial_flags(signaled: bool) -> vk::FenceCreateFlags {
    if signaled {
        vk::FenceCreateFlags::SIGNALED
    } else {
        vk::FenceCreateFlags::empty()
    }
}

impl Fence {
    /// Creates a fence, optionally already signaled.
    ///
    /// Frame fences pass `signaled = true` so waiting on a slot that has
    /// never submitted does not block; upload fences pass `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if creation fails.
    pub fn new(device: Arc<Device>, signaled: bool) -> RhiResult<Self> {
        let create_info = vk::FenceCreateInfo::default().flags(initial_flags(signaled));
        let fence = unsafe { device.handle().create_fence(&create_info, None)? };
        Ok(Self { device, fence })
    }

    /// Raw handle for queue submits.
    #[inline]
    pub fn handle(&self) -> vk::Fence {
        self.fence
    }

    /// Blocks until the fence signals or `timeout_ns` elapses.
    ///
    /// # Errors
    ///
    /// `RhiError::Vulkan(vk::Result::TIMEOUT)` when the deadline passes
    /// first; other variants for device loss.
    pub fn wait(&self, timeout_ns: u64) -> Result<(), RhiError> {
        unsafe {
            self.device
                .handle()
                .wait_for_fences(&[self.fence], true, timeout_ns)?;
        }
        Ok(())
    }

    /// Returns the fence to the unsignaled state.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset fails.
    pub fn reset(&self) -> Result<(), RhiError> {
        unsafe { self.device.handle().reset_fences(&[self.fence])? };
        Ok(())
    }
}

impl Drop for Fence {
    fn drop(&mut self) {
        unsafe {
            self.device.handle().destroy_fence(self.fence, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrappers_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Semaphore>();
        assert_send_sync::<Fence>();
    }

    #[test]
    fn initial_flags_follow_signaled_argument() {
        assert_eq!(initial_flags(true), vk::FenceCreateFlags::SIGNALED);
        assert_eq!(initial_flags(false), vk::FenceCreateFlags::empty());
    }
}

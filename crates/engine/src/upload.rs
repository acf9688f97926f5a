//! Immediate GPU uploads.
//!
//! [`UploadContext`] is a synchronous submit channel separate from the frame
//! ring: a transient command pool, one command buffer, and an unsignaled
//! fence. Mesh vertex data and texture pixels are staged in host-visible
//! buffers and copied to device-local memory inside one blocking submission.
//! Upload stalls are acceptable because uploads happen at load time, not per
//! frame.

use std::cell::RefCell;
use std::sync::Arc;

use vkr_rhi::buffer::{Buffer, BufferUsage};
use vkr_rhi::command::{CommandBuffer, CommandPool};
use vkr_rhi::device::Device;
use vkr_rhi::image::Image;
use vkr_rhi::sync::Fence;
use vkr_rhi::vk;

use crate::error::EngineResult;

/// Where the upload channel is in its submit cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelState {
    /// No work outstanding; the command buffer may be recorded.
    Ready,
    /// The command buffer is open and recording.
    Recording,
    /// Work has been handed to the queue; the fence wait is pending.
    InFlight,
}

/// Pure model of the channel's begin / submit / wait-and-reset cycle.
///
/// The channel owns a single command buffer, so the cycle must run to
/// completion before it starts again. [`UploadContext`] advances this
/// alongside the real Vulkan calls; the transitions are checked here so a
/// sequencing bug shows up as a panic instead of a validation error.
#[derive(Debug)]
pub struct SubmitProtocol {
    state: ChannelState,
    submissions: u64,
}

impl SubmitProtocol {
    pub fn new() -> Self {
        Self {
            state: ChannelState::Ready,
            submissions: 0,
        }
    }

    /// Current point in the cycle.
    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Completed submissions since creation.
    pub fn submissions(&self) -> u64 {
        self.submissions
    }

    /// Opens the command buffer for recording.
    ///
    /// # Panics
    ///
    /// Panics if the previous cycle has not completed.
    pub fn begin(&mut self) {
        assert_eq!(
            self.state,
            ChannelState::Ready,
            "upload channel reused before the previous submission completed"
        );
        self.state = ChannelState::Recording;
    }

    /// Marks the recorded work as handed to the queue.
    ///
    /// # Panics
    ///
    /// Panics if nothing was recorded.
    pub fn submit(&mut self) {
        assert_eq!(
            self.state,
            ChannelState::Recording,
            "upload channel submitted without recording"
        );
        self.state = ChannelState::InFlight;
    }

    /// Marks the fence wait and pool reset as done; the channel is reusable.
    ///
    /// # Panics
    ///
    /// Panics if nothing was submitted.
    pub fn complete(&mut self) {
        assert_eq!(
            self.state,
            ChannelState::InFlight,
            "upload channel completed without a submission in flight"
        );
        self.state = ChannelState::Ready;
        self.submissions += 1;
    }
}

impl Default for SubmitProtocol {
    fn default() -> Self {
        Self::new()
    }
}

/// Synchronous upload channel.
pub struct UploadContext {
    device: Arc<Device>,
    command_pool: CommandPool,
    command_buffer: CommandBuffer,
    fence: Fence,
    protocol: RefCell<SubmitProtocol>,
}

impl UploadContext {
    /// Creates the upload channel on the graphics queue family.
    ///
    /// # Errors
    ///
    /// Returns an error if pool, buffer, or fence creation fails.
    pub fn new(device: Arc<Device>) -> EngineResult<Self> {
        let graphics_family = device.queue_families().graphics_family.unwrap();
        let command_pool = CommandPool::new_transient(device.clone(), graphics_family)?;
        let command_buffer = command_pool.allocate()?;
        let fence = Fence::new(device.clone(), false)?;

        Ok(Self {
            device,
            command_pool,
            command_buffer,
            fence,
            protocol: RefCell::new(SubmitProtocol::new()),
        })
    }

    /// Completed upload submissions since creation.
    pub fn submission_count(&self) -> u64 {
        self.protocol.borrow().submissions()
    }

    /// Records commands via `record`, submits them, and blocks until the GPU
    /// finishes. The pool and fence are reset afterwards so the channel can
    /// be reused.
    ///
    /// # Errors
    ///
    /// Returns an error if recording, submission, or the fence wait fails.
    pub fn immediate_submit(
        &self,
        record: impl FnOnce(&CommandBuffer),
    ) -> EngineResult<()> {
        self.protocol.borrow_mut().begin();
        self.command_buffer.begin()?;
        record(&self.command_buffer);
        self.command_buffer.end()?;

        let command_buffers = [self.command_buffer.handle()];
        let submit_info = vk::SubmitInfo::default().command_buffers(&command_buffers);

        unsafe {
            self.device
                .submit_graphics(&[submit_info], self.fence.handle())?;
        }
        self.protocol.borrow_mut().submit();

        self.fence.wait(u64::MAX)?;
        self.fence.reset()?;
        self.command_pool.reset()?;
        self.protocol.borrow_mut().complete();

        Ok(())
    }

    /// Uploads `data` into a device-local buffer through a staging copy.
    ///
    /// # Errors
    ///
    /// Returns an error if buffer creation or the copy submission fails.
    pub fn upload_buffer<T: bytemuck::Pod>(
        &self,
        data: &[T],
        usage: BufferUsage,
        label: &str,
    ) -> EngineResult<Buffer> {
        let size = std::mem::size_of_val(data) as u64;

        let staging = Buffer::new_with_data(
            self.device.clone(),
            data,
            BufferUsage::Staging,
            &format!("{label}_staging"),
        )?;
        let buffer = Buffer::new(self.device.clone(), size, usage, label)?;

        self.immediate_submit(|cmd| {
            cmd.copy_buffer(staging.handle(), buffer.handle(), size);
        })?;

        Ok(buffer)
    }

    /// Uploads RGBA pixel data into a sampled texture.
    ///
    /// The image is transitioned to `SHADER_READ_ONLY_OPTIMAL` before this
    /// returns. The built-in materials are untextured; this is the entry
    /// point for applications that feed `vkr_assets::load_image` output to
    /// their own sampled-image descriptors:
    ///
    /// ```no_run
    /// # use vkr_render::UploadContext;
    /// # use vkr_rhi::vk;
    /// # fn example(upload: &UploadContext) -> Result<(), vkr_render::EngineError> {
    /// let decoded = vkr_assets::load_image("assets/lost_empire-RGBA.png")?;
    /// let texture = upload.upload_texture(
    ///     &decoded.pixels,
    ///     vk::Extent2D { width: decoded.width, height: decoded.height },
    ///     vk::Format::R8G8B8A8_SRGB,
    ///     "lost_empire",
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if staging, image creation, or the copy fails.
    pub fn upload_texture(
        &self,
        pixels: &[u8],
        extent: vk::Extent2D,
        format: vk::Format,
        label: &str,
    ) -> EngineResult<Image> {
        let staging = Buffer::new_with_data(
            self.device.clone(),
            pixels,
            BufferUsage::Staging,
            &format!("{label}_staging"),
        )?;
        let image = Image::new_texture(self.device.clone(), extent, format, label)?;

        self.immediate_submit(|cmd| {
            cmd.transition_image_layout(
                image.handle(),
                vk::ImageLayout::UNDEFINED,
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            );
            cmd.copy_buffer_to_image(staging.handle(), image.handle(), extent);
            cmd.transition_image_layout(
                image.handle(),
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            );
        })?;

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs one full cycle the way `immediate_submit` does, invoking
    /// `record` between begin and submit.
    fn drive(protocol: &mut SubmitProtocol, record: impl FnOnce()) {
        protocol.begin();
        record();
        protocol.submit();
        protocol.complete();
    }

    #[test]
    fn cycle_runs_ready_recording_in_flight_ready() {
        let mut protocol = SubmitProtocol::new();
        assert_eq!(protocol.state(), ChannelState::Ready);

        protocol.begin();
        assert_eq!(protocol.state(), ChannelState::Recording);

        protocol.submit();
        assert_eq!(protocol.state(), ChannelState::InFlight);

        protocol.complete();
        assert_eq!(protocol.state(), ChannelState::Ready);
        assert_eq!(protocol.submissions(), 1);
    }

    #[test]
    fn channel_is_reusable_after_completion() {
        let mut protocol = SubmitProtocol::new();
        drive(&mut protocol, || {});
        drive(&mut protocol, || {});
        assert_eq!(protocol.submissions(), 2);
        assert_eq!(protocol.state(), ChannelState::Ready);
    }

    #[test]
    fn record_callback_runs_exactly_once_per_cycle() {
        let mut protocol = SubmitProtocol::new();
        let mut calls = 0;
        for _ in 0..3 {
            drive(&mut protocol, || calls += 1);
        }
        assert_eq!(calls, 3);
        assert_eq!(protocol.submissions(), 3);
    }

    #[test]
    #[should_panic(expected = "reused before the previous submission")]
    fn begin_while_in_flight_panics() {
        let mut protocol = SubmitProtocol::new();
        protocol.begin();
        protocol.submit();
        protocol.begin();
    }

    #[test]
    #[should_panic(expected = "submitted without recording")]
    fn submit_without_recording_panics() {
        let mut protocol = SubmitProtocol::new();
        protocol.submit();
    }

    #[test]
    #[should_panic(expected = "completed without a submission")]
    fn complete_without_submission_panics() {
        let mut protocol = SubmitProtocol::new();
        protocol.begin();
        protocol.complete();
    }
}

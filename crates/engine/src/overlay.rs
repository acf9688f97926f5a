//! UI overlay injection points.

use vkr_rhi::command::CommandBuffer;

/// Hooks for recording overlay UI into the frame.
///
/// The engine calls [`prepare`] once per frame before command recording and
/// [`record`] inside the render pass, after scene draws, so overlay pixels
/// land on top. The default implementations do nothing; applications that
/// render UI implement this on their overlay state.
///
/// [`prepare`]: OverlayHooks::prepare
/// [`record`]: OverlayHooks::record
pub trait OverlayHooks {
    /// Builds overlay geometry for the coming frame.
    fn prepare(&mut self, _frame_number: u64) {}

    /// Records overlay draw commands into the frame's render pass.
    fn record(&mut self, _cmd: &CommandBuffer) {}
}

/// Overlay that draws nothing.
pub struct NoOverlay;

impl OverlayHooks for NoOverlay {}

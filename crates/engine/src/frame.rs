//! Frame ring: double-buffered per-frame state.
//!
//! Two frame slots alternate so the CPU records frame N+1 while the GPU
//! renders frame N. Each slot owns its own command pool, sync primitives,
//! and per-frame buffers; a slot is only reused after its fence proves the
//! GPU finished the commands recorded into it two frames ago.
//!
//! [`FrameRing`] is the slot state machine, kept free of Vulkan handles so
//! the overlap protocol can be exercised directly in tests. The engine pairs
//! it with one [`FrameSlot`] of GPU resources per ring slot.

use vkr_rhi::buffer::Buffer;
use vkr_rhi::command::{CommandBuffer, CommandPool};
use vkr_rhi::sync::{Fence, Semaphore};
use vkr_rhi::vk;

/// Number of frames recorded ahead of the GPU.
pub const FRAME_OVERLAP: usize = 2;

/// How long to wait on a frame fence before declaring the GPU hung.
pub const FENCE_TIMEOUT_NS: u64 = 1_000_000_000;

/// Lifecycle state of one frame slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameSlotState {
    /// The GPU has finished with the slot; it may be recorded into.
    Idle,
    /// The CPU is recording commands into the slot.
    Recording,
    /// The slot's commands are submitted and the GPU owns its resources.
    Submitted,
}

/// Pure state machine for the frame overlap protocol.
///
/// The frame number advances unconditionally after every presented frame,
/// including frames that were presented suboptimally. The slot for frame N
/// is `N % FRAME_OVERLAP`.
pub struct FrameRing {
    frame_number: u64,
    slots: [FrameSlotState; FRAME_OVERLAP],
}

impl FrameRing {
    /// Creates a ring with every slot idle, at frame zero.
    pub fn new() -> Self {
        Self {
            frame_number: 0,
            slots: [FrameSlotState::Idle; FRAME_OVERLAP],
        }
    }

    /// Total frames presented so far.
    #[inline]
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Slot index for the frame currently being prepared.
    #[inline]
    pub fn slot_index(&self) -> usize {
        (self.frame_number % FRAME_OVERLAP as u64) as usize
    }

    /// State of the given slot.
    #[inline]
    pub fn slot_state(&self, slot: usize) -> FrameSlotState {
        self.slots[slot]
    }

    /// The current slot is free for recording.
    #[inline]
    pub fn can_begin(&self) -> bool {
        self.slots[self.slot_index()] == FrameSlotState::Idle
    }

    /// Marks the slot submitted two frames ago as finished.
    ///
    /// Models the frame fence signaling; the engine calls this after the
    /// fence wait succeeds.
    pub fn retire(&mut self, slot: usize) {
        debug_assert_eq!(self.slots[slot], FrameSlotState::Submitted);
        self.slots[slot] = FrameSlotState::Idle;
    }

    /// Begins recording into the current slot and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if the slot is not idle; the caller must wait for and retire
    /// the slot's previous submission first.
    pub fn begin(&mut self) -> usize {
        let slot = self.slot_index();
        assert_eq!(
            self.slots[slot],
            FrameSlotState::Idle,
            "frame slot {slot} reused while still in flight"
        );
        self.slots[slot] = FrameSlotState::Recording;
        slot
    }

    /// Marks the current slot as submitted to the GPU.
    pub fn submit(&mut self) {
        let slot = self.slot_index();
        debug_assert_eq!(self.slots[slot], FrameSlotState::Recording);
        self.slots[slot] = FrameSlotState::Submitted;
    }

    /// Advances to the next frame after presentation.
    pub fn advance(&mut self) {
        self.frame_number += 1;
    }
}

impl Default for FrameRing {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU resources owned by one frame slot.
///
/// Built by the engine at startup; the buffers are rewritten every time the
/// slot comes around, which is safe because the slot's fence has proven the
/// GPU no longer reads them.
pub struct FrameSlot {
    /// Command pool reset at the start of the slot's frame.
    pub command_pool: CommandPool,
    /// Primary command buffer for the frame.
    pub command_buffer: CommandBuffer,
    /// Signaled when the swapchain image is ready to be rendered to.
    pub acquire_semaphore: Semaphore,
    /// Signaled when rendering completes; present waits on it.
    pub render_semaphore: Semaphore,
    /// Signaled when the GPU finishes the slot's submission.
    pub render_fence: Fence,
    /// Per-frame camera uniform buffer.
    pub camera_buffer: Buffer,
    /// Per-frame object storage buffer.
    pub object_buffer: Buffer,
    /// Global descriptor set (camera + scene parameters).
    pub global_set: vk::DescriptorSet,
    /// Object descriptor set (storage buffer).
    pub object_set: vk::DescriptorSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_frame(ring: &mut FrameRing) -> usize {
        let slot = ring.begin();
        ring.submit();
        ring.advance();
        slot
    }

    #[test]
    fn slots_alternate_over_ten_frames() {
        let mut ring = FrameRing::new();
        let mut seen = Vec::new();

        for frame in 0..10u64 {
            assert_eq!(ring.frame_number(), frame);
            // The slot from two frames ago has completed by now
            if !ring.can_begin() {
                ring.retire(ring.slot_index());
            }
            seen.push(run_frame(&mut ring));
        }

        assert_eq!(seen, vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1]);
        assert_eq!(ring.frame_number(), 10);
    }

    #[test]
    fn slot_not_reusable_until_retired() {
        let mut ring = FrameRing::new();

        run_frame(&mut ring); // frame 0, slot 0
        run_frame(&mut ring); // frame 1, slot 1

        // Frame 2 maps back to slot 0, still submitted
        assert_eq!(ring.slot_index(), 0);
        assert!(!ring.can_begin());

        ring.retire(0);
        assert!(ring.can_begin());
        assert_eq!(ring.begin(), 0);
    }

    #[test]
    #[should_panic(expected = "reused while still in flight")]
    fn begin_panics_on_in_flight_slot() {
        let mut ring = FrameRing::new();
        run_frame(&mut ring);
        run_frame(&mut ring);
        // No retire; slot 0 is still submitted
        ring.begin();
    }

    #[test]
    fn frame_number_advances_independently_of_slot_count() {
        let mut ring = FrameRing::new();
        for _ in 0..6 {
            if !ring.can_begin() {
                ring.retire(ring.slot_index());
            }
            run_frame(&mut ring);
        }
        assert_eq!(ring.frame_number(), 6);
        assert_eq!(ring.slot_index(), 0);
    }

    #[test]
    fn two_slots_in_flight_at_most() {
        let mut ring = FrameRing::new();
        run_frame(&mut ring);
        run_frame(&mut ring);

        let in_flight = (0..FRAME_OVERLAP)
            .filter(|&s| ring.slot_state(s) == FrameSlotState::Submitted)
            .count();
        assert_eq!(in_flight, FRAME_OVERLAP);
        assert!(!ring.can_begin());
    }
}

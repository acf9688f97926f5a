//! Frame loop behavior tests on the pure bookkeeping types.
//!
//! These exercise the slot rotation, fence handshake ordering, and
//! deletion queue discipline the renderer relies on, without a GPU.

use vkr_render::{DeletionQueue, FrameRing, FrameSlotState, FRAME_OVERLAP};

/// Drives one simulated frame: retire the slot if the GPU finished it,
/// begin, submit, advance.
fn run_frame(ring: &mut FrameRing) {
    let slot = ring.slot_index();
    if ring.slot_state(slot) == FrameSlotState::Submitted {
        ring.retire(slot);
    }
    ring.begin();
    ring.submit();
    ring.advance();
}

#[test]
fn slots_alternate_over_ten_frames() {
    let mut ring = FrameRing::new();
    let mut visited = Vec::new();

    for _ in 0..10 {
        visited.push(ring.slot_index());
        run_frame(&mut ring);
    }

    assert_eq!(visited, vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1]);
    assert_eq!(ring.frame_number(), 10);
}

#[test]
fn skipped_frame_keeps_slot_reusable() {
    let mut ring = FrameRing::new();
    run_frame(&mut ring);

    // A stale swapchain skips the frame after the fence wait but before
    // begin(); the slot must stay Idle and be usable next time around
    let slot = ring.slot_index();
    assert_eq!(ring.slot_state(slot), FrameSlotState::Idle);
    assert!(ring.can_begin());

    run_frame(&mut ring);
    assert_eq!(ring.frame_number(), 2);
}

#[test]
fn recreation_restores_queue_length() {
    let mut queue = DeletionQueue::new();

    // Initial swapchain resources
    queue.push(|| {});
    queue.push(|| {});
    queue.push(|| {});
    let baseline = queue.len();

    // Simulated recreation: flush everything scoped to the swapchain,
    // then repopulate with the rebuilt resources
    assert!(queue.flush());
    assert!(queue.is_empty());
    queue.push(|| {});
    queue.push(|| {});
    queue.push(|| {});

    assert_eq!(queue.len(), baseline);
}

#[test]
fn resize_between_frames_does_not_desync_slots() {
    let mut ring = FrameRing::new();
    let mut queue = DeletionQueue::new();
    queue.push(|| {});

    for frame in 0..8u64 {
        // Recreation happens at the frame boundary, before the slot is
        // touched
        if frame == 3 {
            queue.flush();
            queue.push(|| {});
        }
        assert_eq!(ring.slot_index(), (frame % FRAME_OVERLAP as u64) as usize);
        run_frame(&mut ring);
    }

    assert_eq!(ring.frame_number(), 8);
    assert_eq!(queue.len(), 1);
}

#[test]
fn in_flight_slots_are_independent() {
    let mut ring = FrameRing::new();

    // Frame 0 submitted, never retired
    ring.begin();
    ring.submit();
    ring.advance();

    // Frame 1 uses the other slot and is unaffected
    assert_eq!(ring.slot_index(), 1);
    assert!(ring.can_begin());
    ring.begin();
    ring.submit();
    ring.advance();

    // Back to slot 0, still waiting on its fence
    assert_eq!(ring.slot_index(), 0);
    assert!(!ring.can_begin());
    ring.retire(0);
    assert!(ring.can_begin());
}

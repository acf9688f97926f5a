//! Real-time forward renderer built on the RHI layer.
//!
//! The crate is organized around a small set of cooperating pieces:
//!
//! - [`Engine`] owns the Vulkan stack and drives the frame loop
//! - [`FrameRing`] cycles two frame slots so CPU recording overlaps GPU work
//! - [`DeletionQueue`] defers resource destruction in LIFO order
//! - [`UploadContext`] pushes mesh and texture data to the GPU synchronously
//! - [`OverlayHooks`] lets the application inject UI recording into the
//!   frame's render pass

mod deletion;
mod engine;
mod error;
mod frame;
mod gpu_data;
mod overlay;
mod upload;

pub use deletion::DeletionQueue;
pub use engine::{Engine, EngineConfig};
pub use error::{EngineError, EngineResult};
pub use frame::{FrameRing, FrameSlotState, FRAME_OVERLAP};
pub use gpu_data::{
    pad_uniform_buffer_size, GpuCameraData, GpuObjectData, GpuSceneData, MeshPushConstants,
    MAX_OBJECTS,
};
pub use overlay::{NoOverlay, OverlayHooks};
pub use upload::{ChannelState, SubmitProtocol, UploadContext};

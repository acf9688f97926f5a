//! Vulkan hardware interface for the vkr engine.
//!
//! This crate provides safe wrappers over Vulkan via the `ash` crate:
//! - Instance and device bootstrap
//! - Swapchain lifecycle
//! - Render pass and framebuffer management
//! - Buffer and image allocation via gpu-allocator
//! - Pipeline construction
//! - Command recording and synchronization primitives

mod error;

pub mod buffer;
pub mod command;
pub mod descriptor;
pub mod device;
pub mod image;
pub mod instance;
pub mod physical_device;
pub mod pipeline;
pub mod render_pass;
pub mod shader;
pub mod swapchain;
pub mod sync;
pub mod vertex;

pub use error::{RhiError, RhiResult};

// Re-export ash types that users might need
pub use ash::vk;

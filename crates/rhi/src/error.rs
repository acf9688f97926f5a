//! Error types for the Vulkan hardware interface.

use thiserror::Error;

/// Errors produced by the RHI layer.
#[derive(Error, Debug)]
pub enum RhiError {
    /// A Vulkan API call returned a non-success code.
    #[error("Vulkan call failed: {0}")]
    Vulkan(#[from] ash::vk::Result),

    /// The Vulkan loader library could not be loaded.
    #[error("failed to load Vulkan library: {0}")]
    Loading(#[from] ash::LoadingError),

    /// GPU memory allocation failed.
    #[error("allocation failed: {0}")]
    Allocation(#[from] gpu_allocator::AllocationError),

    /// No physical device satisfied the engine's requirements.
    #[error("no suitable GPU found")]
    NoSuitableGpu,

    /// Shader module creation or SPIR-V validation failed.
    #[error("shader error: {0}")]
    Shader(String),

    /// Swapchain creation or presentation setup failed.
    #[error("swapchain error: {0}")]
    Swapchain(String),

    /// Pipeline construction failed.
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// An argument or handle was invalid for the requested operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for RHI operations.
pub type RhiResult<T> = Result<T, RhiError>;

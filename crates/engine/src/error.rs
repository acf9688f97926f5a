//! Engine error types.

use thiserror::Error;

/// Errors produced by the engine layer.
#[derive(Error, Debug)]
pub enum EngineError {
    /// An RHI operation failed.
    #[error(transparent)]
    Rhi(#[from] vkr_rhi::RhiError),

    /// A raw Vulkan call outside the RHI wrappers failed.
    #[error("Vulkan call failed: {0}")]
    Vulkan(#[from] ash::vk::Result),

    /// A frame fence did not signal within the deadline, meaning the GPU is
    /// hung or lost.
    #[error("frame fence wait timed out after {0} ms")]
    FenceTimeout(u64),

    /// Swapchain image acquisition did not complete within the deadline,
    /// meaning the presentation engine is wedged.
    #[error("swapchain acquire timed out after {0} ms")]
    AcquireTimeout(u64),

    /// Asset loading failed.
    #[error("asset error: {0}")]
    Asset(#[from] vkr_assets::AssetError),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_errors_report_milliseconds() {
        assert_eq!(
            EngineError::FenceTimeout(1_000).to_string(),
            "frame fence wait timed out after 1000 ms"
        );
        assert_eq!(
            EngineError::AcquireTimeout(1_000).to_string(),
            "swapchain acquire timed out after 1000 ms"
        );
    }
}

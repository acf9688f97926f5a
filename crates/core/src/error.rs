//! Error types shared across engine crates.

use thiserror::Error;

/// Top-level error type for the platform layer.
///
/// The RHI, engine, and asset crates carry their own richer enums; this
/// one covers the windowing seam where only a message survives.
#[derive(Error, Debug)]
pub enum Error {
    /// Vulkan API failures surfaced outside the RHI layer
    #[error("Vulkan error: {0}")]
    Vulkan(String),

    /// Window creation or surface management errors
    #[error("Window error: {0}")]
    Window(String),
}

/// Result type alias using the engine's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

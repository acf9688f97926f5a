//! Asset import error types.

use thiserror::Error;

/// Errors produced while importing assets.
#[derive(Error, Debug)]
pub enum AssetError {
    /// File system access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// OBJ parsing failed.
    #[error("obj load failed: {0}")]
    Obj(#[from] tobj::LoadError),

    /// Image decoding failed.
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    /// The file content is structurally invalid for its format.
    #[error("invalid asset {path}: {reason}")]
    Invalid {
        /// Path of the offending file.
        path: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Result type alias for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;

//! Asset import: OBJ meshes, SPIR-V blobs, and images.

mod error;
mod image_data;
mod obj;
mod spirv;

pub use error::{AssetError, AssetResult};
pub use image_data::{load_image, DecodedImage};
pub use obj::load_obj;
pub use spirv::load_spirv;

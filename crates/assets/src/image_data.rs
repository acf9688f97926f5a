//! Image decoding for texture upload.

use std::path::Path;

use tracing::info;

use crate::error::AssetResult;

/// Decoded image pixels ready for GPU upload.
pub struct DecodedImage {
    /// Tightly packed RGBA8 pixel data.
    pub pixels: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl DecodedImage {
    /// Size of the pixel data in bytes.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }
}

/// Decodes an image file to RGBA8.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_image(path: impl AsRef<Path>) -> AssetResult<DecodedImage> {
    let path = path.as_ref();
    let decoded = image::open(path)?.to_rgba8();
    let (width, height) = decoded.dimensions();

    info!("Loaded image {} ({}x{})", path.display(), width, height);

    Ok(DecodedImage {
        pixels: decoded.into_raw(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_to_rgba() {
        // 2x2 image built in memory, round-tripped through the PNG encoder
        let mut buffer = Vec::new();
        let img = image::RgbaImage::from_fn(2, 2, |x, y| {
            image::Rgba([x as u8 * 255, y as u8 * 255, 0, 255])
        });
        img.write_to(
            &mut std::io::Cursor::new(&mut buffer),
            image::ImageFormat::Png,
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!("vkr_img_{}.png", std::process::id()));
        std::fs::write(&path, &buffer).unwrap();

        let decoded = load_image(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 2));
        assert_eq!(decoded.byte_size(), 16);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_errors() {
        assert!(load_image("does/not/exist.png").is_err());
    }
}

//! SPIR-V blob loading.

use std::path::Path;

use tracing::debug;

use crate::error::{AssetError, AssetResult};

/// SPIR-V magic number, first word of every valid module.
const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Reads a compiled SPIR-V file into a word vector.
///
/// Validates the length and magic number but nothing deeper; the driver
/// does full validation at module creation.
///
/// # Errors
///
/// Returns an error if the file cannot be read, its length is not a
/// multiple of four, or the magic number is wrong.
pub fn load_spirv(path: impl AsRef<Path>) -> AssetResult<Vec<u32>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;

    if bytes.is_empty() || bytes.len() % 4 != 0 {
        return Err(AssetError::Invalid {
            path: path.display().to_string(),
            reason: format!("length {} is not a non-zero multiple of 4", bytes.len()),
        });
    }

    let words: Vec<u32> = bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    if words[0] != SPIRV_MAGIC {
        return Err(AssetError::Invalid {
            path: path.display().to_string(),
            reason: format!("bad magic number {:#010x}", words[0]),
        });
    }

    debug!("Loaded SPIR-V {} ({} words)", path.display(), words.len());

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("vkr_spirv_{}_{}", std::process::id(), name));
        std::fs::File::create(&path)
            .unwrap()
            .write_all(bytes)
            .unwrap();
        path
    }

    #[test]
    fn accepts_valid_header() {
        let mut bytes = SPIRV_MAGIC.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        let path = write_temp("valid.spv", &bytes);

        let words = load_spirv(&path).unwrap();
        assert_eq!(words[0], SPIRV_MAGIC);
        assert_eq!(words.len(), 5);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn rejects_misaligned_length() {
        let path = write_temp("short.spv", &[1, 2, 3]);
        assert!(matches!(
            load_spirv(&path),
            Err(AssetError::Invalid { .. })
        ));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn rejects_bad_magic() {
        let path = write_temp("magic.spv", &[0xFF; 8]);
        assert!(matches!(
            load_spirv(&path),
            Err(AssetError::Invalid { .. })
        ));
        std::fs::remove_file(path).unwrap();
    }
}

//! Shader module management.
//!
//! Shaders are compiled offline to SPIR-V; at runtime a [`Shader`] wraps the
//! `vk::ShaderModule` together with its stage and entry point so the
//! pipeline builder can produce stage create infos directly.

use std::ffi::CString;
use std::path::Path;
use std::sync::Arc;

use ash::vk;
use tracing::debug;

use crate::device::Device;
use crate::error::{RhiError, RhiResult};

/// Pipeline stage a shader module is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex shader.
    Vertex,
    /// Fragment shader.
    Fragment,
}

impl ShaderStage {
    /// Converts to Vulkan stage flags.
    pub fn to_vk_stage(self) -> vk::ShaderStageFlags {
        match self {
            Self::Vertex => vk::ShaderStageFlags::VERTEX,
            Self::Fragment => vk::ShaderStageFlags::FRAGMENT,
        }
    }

    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }
}

/// Shader module wrapper.
pub struct Shader {
    device: Arc<Device>,
    module: vk::ShaderModule,
    stage: ShaderStage,
    entry_point: CString,
}

impl Shader {
    /// Creates a shader module from SPIR-V words.
    ///
    /// # Errors
    ///
    /// Returns an error if the word stream is empty or module creation fails.
    pub fn from_words(device: Arc<Device>, words: &[u32], stage: ShaderStage) -> RhiResult<Self> {
        if words.is_empty() {
            return Err(RhiError::Shader(format!(
                "{} shader has no SPIR-V code",
                stage.name()
            )));
        }

        let create_info = vk::ShaderModuleCreateInfo::default().code(words);
        let module = unsafe { device.handle().create_shader_module(&create_info, None)? };

        Ok(Self {
            device,
            module,
            stage,
            entry_point: CString::new("main").unwrap(),
        })
    }

    /// Loads a SPIR-V file and creates a shader module from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid SPIR-V, or
    /// module creation fails.
    pub fn from_spirv_file(
        device: Arc<Device>,
        path: impl AsRef<Path>,
        stage: ShaderStage,
    ) -> RhiResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| RhiError::Shader(format!("failed to read {}: {}", path.display(), e)))?;

        if bytes.len() % 4 != 0 {
            return Err(RhiError::Shader(format!(
                "{} is not SPIR-V (length {} not a multiple of 4)",
                path.display(),
                bytes.len()
            )));
        }

        let words: Vec<u32> = bytes
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        debug!(
            "Loaded {} shader from {} ({} words)",
            stage.name(),
            path.display(),
            words.len()
        );

        Self::from_words(device, &words, stage)
    }

    /// Returns the shader module handle.
    #[inline]
    pub fn handle(&self) -> vk::ShaderModule {
        self.module
    }

    /// Returns the shader stage.
    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Stage create info for pipeline construction.
    pub fn stage_create_info(&self) -> vk::PipelineShaderStageCreateInfo<'_> {
        vk::PipelineShaderStageCreateInfo::default()
            .stage(self.stage.to_vk_stage())
            .module(self.module)
            .name(&self.entry_point)
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.device.handle().destroy_shader_module(self.module, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_flags_match() {
        assert_eq!(
            ShaderStage::Vertex.to_vk_stage(),
            vk::ShaderStageFlags::VERTEX
        );
        assert_eq!(
            ShaderStage::Fragment.to_vk_stage(),
            vk::ShaderStageFlags::FRAGMENT
        );
    }

    #[test]
    fn stage_names() {
        assert_eq!(ShaderStage::Vertex.name(), "vertex");
        assert_eq!(ShaderStage::Fragment.name(), "fragment");
    }
}

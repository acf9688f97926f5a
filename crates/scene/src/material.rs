//! Materials.

use vkr_rhi::pipeline::{Pipeline, PipelineLayout};

/// A material: a compiled graphics pipeline and its layout.
///
/// Materials are built by the engine (pipelines need the render pass) and
/// registered in the scene by name. Objects reference the name; the draw
/// planner binds the pipeline only when consecutive objects disagree on it.
pub struct Material {
    /// Compiled graphics pipeline.
    pub pipeline: Pipeline,
    /// Layout shared by the pipeline's descriptor sets and push constants.
    pub layout: PipelineLayout,
}

impl Material {
    /// Creates a material from a pipeline and its layout.
    pub fn new(pipeline: Pipeline, layout: PipelineLayout) -> Self {
        Self { pipeline, layout }
    }
}

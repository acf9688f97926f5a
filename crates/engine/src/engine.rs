//! Engine orchestrator.
//!
//! [`Engine`] owns the whole GPU stack: instance, device, swapchain,
//! render pass and framebuffers, the frame ring, the upload channel, and
//! the scene. Per frame it waits on the slot fence, acquires a swapchain
//! image, records the scene's draw plan, submits, and presents.
//!
//! Swapchain staleness (`ERROR_OUT_OF_DATE_KHR`, suboptimal present, or a
//! window resize) never fails a frame; it schedules a recreation that runs
//! at the start of the next frame, before any slot is touched.

use std::path::Path;
use std::sync::Arc;

use glam::Vec4;
use tracing::{debug, info, warn};

use vkr_rhi::buffer::{Buffer, BufferUsage};
use vkr_rhi::descriptor::{
    self, binding, DescriptorPool, DescriptorSetLayout,
};
use vkr_rhi::device::Device;
use vkr_rhi::image::Image;
use vkr_rhi::instance::Instance;
use vkr_rhi::physical_device::select_physical_device;
use vkr_rhi::pipeline::{GraphicsPipelineBuilder, PipelineLayout, PolygonMode};
use vkr_rhi::render_pass::{Framebuffer, RenderPass};
use vkr_rhi::shader::{Shader, ShaderStage};
use vkr_rhi::swapchain::Swapchain;
use vkr_rhi::sync::{Fence, Semaphore};
use vkr_rhi::vertex::Vertex;
use vkr_rhi::vk;
use vkr_rhi::command::CommandPool;
use vkr_rhi::RhiError;

use vkr_scene::{plan_draws, ContentProvider, Material, Scene};

use crate::deletion::DeletionQueue;
use crate::error::{EngineError, EngineResult};
use crate::frame::{FrameRing, FrameSlot, FENCE_TIMEOUT_NS, FRAME_OVERLAP};
use crate::gpu_data::{
    pad_uniform_buffer_size, GpuCameraData, GpuObjectData, GpuSceneData, MeshPushConstants,
    MAX_OBJECTS,
};
use crate::overlay::OverlayHooks;
use crate::upload::UploadContext;

/// Engine startup configuration.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Initial drawable width in pixels.
    pub width: u32,
    /// Initial drawable height in pixels.
    pub height: u32,
    /// Clear color for the color attachment.
    pub clear_color: [f32; 4],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            clear_color: [0.01, 0.01, 0.02, 1.0],
        }
    }
}


/// The rendering engine.
///
/// Field order is teardown order: scene resources and frame slots go first,
/// then the swapchain stack, then the deletion queues, and the device and
/// instance last.
pub struct Engine {
    // Scene owns mesh buffers and material pipelines
    scene: Scene,
    scene_data: GpuSceneData,

    frames: Vec<FrameSlot>,
    frame_ring: FrameRing,

    upload: UploadContext,
    scene_params_buffer: Buffer,
    scene_params_stride: u64,

    global_set_layout: DescriptorSetLayout,
    object_set_layout: DescriptorSetLayout,
    #[allow(dead_code)]
    descriptor_pool: DescriptorPool,

    render_pass: RenderPass,
    /// Raw handles; the owning [`Framebuffer`]s and attachment images live
    /// in the swapchain deletion queue and are rebuilt on recreation.
    framebuffers: Vec<vk::Framebuffer>,
    swapchain: Swapchain,
    swapchain_queue: DeletionQueue,
    main_queue: DeletionQueue,

    surface: vk::SurfaceKHR,
    samples: vk::SampleCountFlags,
    min_uniform_alignment: u64,
    clear_color: [f32; 4],

    resize_requested: Option<(u32, u32)>,

    device: Arc<Device>,
    instance: Instance,
}

impl Engine {
    /// Brings up the full GPU stack against an existing surface.
    ///
    /// The engine takes ownership of `instance` and `surface` and destroys
    /// both at teardown.
    ///
    /// # Errors
    ///
    /// Returns an error if any stage of device or swapchain bootstrap fails.
    pub fn new(
        instance: Instance,
        surface: vk::SurfaceKHR,
        config: EngineConfig,
    ) -> EngineResult<Self> {
        let surface_loader =
            ash::khr::surface::Instance::new(instance.entry(), instance.handle());

        let gpu = select_physical_device(instance.handle(), surface, &surface_loader)?;
        let min_uniform_alignment = gpu.min_uniform_buffer_offset_alignment();
        let samples = gpu.max_msaa_samples();
        info!(
            "Using {} ({:?} MSAA, uniform alignment {})",
            gpu.device_name(),
            samples,
            min_uniform_alignment
        );

        let device = Device::new(&instance, &gpu)?;

        let swapchain = Swapchain::new(
            &instance,
            device.clone(),
            surface,
            config.width,
            config.height,
        )?;

        let mut swapchain_queue = DeletionQueue::new();
        let (render_pass, framebuffers) = Self::build_swapchain_resources(
            &device,
            &swapchain,
            samples,
            &mut swapchain_queue,
        )?;

        // Descriptor layouts: set 0 is camera + dynamically offset scene
        // parameters, set 1 is the per-frame object storage buffer
        let global_set_layout = DescriptorSetLayout::new(
            device.clone(),
            &[
                binding::uniform_buffer(0, vk::ShaderStageFlags::VERTEX),
                binding::uniform_buffer_dynamic(
                    1,
                    vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
                ),
            ],
        )?;
        let object_set_layout = DescriptorSetLayout::new(
            device.clone(),
            &[binding::storage_buffer(0, vk::ShaderStageFlags::VERTEX)],
        )?;

        let pool_sizes = [
            vk::DescriptorPoolSize::default()
                .ty(vk::DescriptorType::UNIFORM_BUFFER)
                .descriptor_count(10),
            vk::DescriptorPoolSize::default()
                .ty(vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC)
                .descriptor_count(10),
            vk::DescriptorPoolSize::default()
                .ty(vk::DescriptorType::STORAGE_BUFFER)
                .descriptor_count(10),
        ];
        let descriptor_pool = DescriptorPool::new(device.clone(), 10, &pool_sizes)?;

        // One padded slice of scene parameters per frame slot, in a single
        // shared buffer addressed through the dynamic offset
        let scene_params_stride = pad_uniform_buffer_size(
            std::mem::size_of::<GpuSceneData>() as u64,
            min_uniform_alignment,
        );
        let scene_params_buffer = Buffer::new(
            device.clone(),
            scene_params_stride * FRAME_OVERLAP as u64,
            BufferUsage::Uniform,
            "scene_params",
        )?;

        let frames = Self::build_frame_slots(
            &device,
            &descriptor_pool,
            &global_set_layout,
            &object_set_layout,
            &scene_params_buffer,
        )?;

        let upload = UploadContext::new(device.clone())?;

        let mut main_queue = DeletionQueue::new();
        main_queue.push(move || unsafe {
            surface_loader.destroy_surface(surface, None);
        });

        info!("Engine initialized at {}x{}", config.width, config.height);

        Ok(Self {
            scene: Scene::new(),
            scene_data: GpuSceneData::default(),
            frames,
            frame_ring: FrameRing::new(),
            upload,
            scene_params_buffer,
            scene_params_stride,
            global_set_layout,
            object_set_layout,
            descriptor_pool,
            render_pass,
            framebuffers,
            swapchain,
            swapchain_queue,
            main_queue,
            surface,
            samples,
            min_uniform_alignment,
            clear_color: config.clear_color,
            resize_requested: None,
            device,
            instance,
        })
    }

    fn build_frame_slots(
        device: &Arc<Device>,
        pool: &DescriptorPool,
        global_layout: &DescriptorSetLayout,
        object_layout: &DescriptorSetLayout,
        scene_params: &Buffer,
    ) -> EngineResult<Vec<FrameSlot>> {
        let graphics_family = device.queue_families().graphics_family.unwrap();
        let mut frames = Vec::with_capacity(FRAME_OVERLAP);

        for i in 0..FRAME_OVERLAP {
            let command_pool = CommandPool::new(device.clone(), graphics_family)?;
            let command_buffer = command_pool.allocate()?;

            let camera_buffer = Buffer::new(
                device.clone(),
                std::mem::size_of::<GpuCameraData>() as u64,
                BufferUsage::Uniform,
                &format!("camera_frame{i}"),
            )?;
            let object_buffer = Buffer::new(
                device.clone(),
                (MAX_OBJECTS * std::mem::size_of::<GpuObjectData>()) as u64,
                BufferUsage::Storage,
                &format!("objects_frame{i}"),
            )?;

            let sets = pool.allocate(&[global_layout.handle(), object_layout.handle()])?;
            let (global_set, object_set) = (sets[0], sets[1]);

            let camera_info = [descriptor::buffer_info(
                camera_buffer.handle(),
                0,
                std::mem::size_of::<GpuCameraData>() as u64,
            )];
            let scene_info = [descriptor::buffer_info(
                scene_params.handle(),
                0,
                std::mem::size_of::<GpuSceneData>() as u64,
            )];
            let object_info = [descriptor::buffer_info(
                object_buffer.handle(),
                0,
                (MAX_OBJECTS * std::mem::size_of::<GpuObjectData>()) as u64,
            )];

            descriptor::update_descriptor_sets(
                device,
                &[
                    vk::WriteDescriptorSet::default()
                        .dst_set(global_set)
                        .dst_binding(0)
                        .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                        .buffer_info(&camera_info),
                    vk::WriteDescriptorSet::default()
                        .dst_set(global_set)
                        .dst_binding(1)
                        .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC)
                        .buffer_info(&scene_info),
                    vk::WriteDescriptorSet::default()
                        .dst_set(object_set)
                        .dst_binding(0)
                        .descriptor_type(vk::DescriptorType::STORAGE_BUFFER)
                        .buffer_info(&object_info),
                ],
            );

            frames.push(FrameSlot {
                command_pool,
                command_buffer,
                acquire_semaphore: Semaphore::new(device.clone())?,
                render_semaphore: Semaphore::new(device.clone())?,
                // Signaled so the very first wait on each slot returns
                render_fence: Fence::new(device.clone(), true)?,
                camera_buffer,
                object_buffer,
                global_set,
                object_set,
            });
        }

        Ok(frames)
    }

    /// Builds the render pass, depth/MSAA attachments, and framebuffers.
    ///
    /// Attachment images and framebuffer owners are parked in `queue` so a
    /// recreation can drop them all with a single flush; raw framebuffer
    /// handles come back for frame recording.
    fn build_swapchain_resources(
        device: &Arc<Device>,
        swapchain: &Swapchain,
        samples: vk::SampleCountFlags,
        queue: &mut DeletionQueue,
    ) -> EngineResult<(RenderPass, Vec<vk::Framebuffer>)> {
        let extent = swapchain.extent();

        let render_pass = RenderPass::new(device.clone(), swapchain.format(), samples)?;

        let depth = Image::new_depth(device.clone(), extent, samples)?;

        let msaa_color = if render_pass.is_multisampled() {
            Some(Image::new_color_msaa(
                device.clone(),
                extent,
                swapchain.format(),
                samples,
            )?)
        } else {
            None
        };

        let mut framebuffers = Vec::with_capacity(swapchain.image_count() as usize);
        let mut framebuffer_handles = Vec::with_capacity(swapchain.image_count() as usize);
        for &swapchain_view in swapchain.image_views() {
            let attachments: Vec<vk::ImageView> = match &msaa_color {
                Some(msaa) => vec![msaa.view(), depth.view(), swapchain_view],
                None => vec![swapchain_view, depth.view()],
            };
            let framebuffer = Framebuffer::new(device.clone(), &render_pass, &attachments, extent)?;
            framebuffer_handles.push(framebuffer.handle());
            framebuffers.push(framebuffer);
        }

        queue.push(move || {
            drop(framebuffers);
            drop(msaa_color);
            drop(depth);
        });

        Ok((render_pass, framebuffer_handles))
    }

    /// The scene, for content registration and camera updates.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene, mutably.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Replaces the scene-wide shading parameters.
    pub fn set_scene_data(&mut self, data: GpuSceneData) {
        self.scene_data = data;
    }

    /// Total frames presented.
    pub fn frame_number(&self) -> u64 {
        self.frame_ring.frame_number()
    }

    /// Schedules a swapchain recreation for the next frame boundary.
    pub fn request_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            // Minimized; keep the old swapchain until a real size arrives
            return;
        }
        self.resize_requested = Some((width, height));
    }

    /// Runs `provider` against the scene and uploads every new mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if an upload fails.
    pub fn load_content(&mut self, provider: &mut dyn ContentProvider) -> EngineResult<()> {
        provider.populate(&mut self.scene);
        self.upload_meshes()
    }

    /// Uploads all meshes that do not yet have a vertex buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if staging or the copy submission fails.
    pub fn upload_meshes(&mut self) -> EngineResult<()> {
        let mut uploaded = 0usize;
        // Collect names first; uploads borrow the upload context immutably
        let pending: Vec<String> = self
            .scene
            .meshes_mut()
            .filter(|(_, mesh)| !mesh.is_uploaded())
            .map(|(name, _)| name.clone())
            .collect();

        for name in pending {
            let Some(mesh) = self.scene.mesh(&name) else {
                continue;
            };
            if mesh.vertices.is_empty() {
                warn!("Mesh '{}' has no vertices, skipping upload", name);
                continue;
            }
            let vertices = mesh.vertices.clone();
            let buffer = self
                .upload
                .upload_buffer(&vertices, BufferUsage::Vertex, &name)?;
            if let Some(mesh) = self.scene.mesh_mut(&name) {
                mesh.vertex_buffer = Some(buffer);
                uploaded += 1;
            }
        }

        if uploaded > 0 {
            info!("Uploaded {} mesh(es)", uploaded);
        }
        Ok(())
    }

    /// Builds a material from compiled shaders and registers it.
    ///
    /// # Errors
    ///
    /// Returns an error if shader loading or pipeline creation fails.
    pub fn create_material(
        &mut self,
        name: &str,
        vert_path: &Path,
        frag_path: &Path,
        polygon_mode: PolygonMode,
    ) -> EngineResult<()> {
        let vert_words = vkr_assets::load_spirv(vert_path)?;
        let frag_words = vkr_assets::load_spirv(frag_path)?;
        let vert = Shader::from_words(self.device.clone(), &vert_words, ShaderStage::Vertex)?;
        let frag = Shader::from_words(self.device.clone(), &frag_words, ShaderStage::Fragment)?;

        let push_range = vk::PushConstantRange::default()
            .stage_flags(vk::ShaderStageFlags::VERTEX)
            .offset(0)
            .size(std::mem::size_of::<MeshPushConstants>() as u32);

        let layout = PipelineLayout::new(
            self.device.clone(),
            &[
                self.global_set_layout.handle(),
                self.object_set_layout.handle(),
            ],
            &[push_range],
        )?;

        // Pipelines stay valid across swapchain recreation because rebuilt
        // passes keep the same attachment formats and sample counts, which
        // makes them render pass compatible
        let pipeline = GraphicsPipelineBuilder::new()
            .vertex_shader(&vert)
            .fragment_shader(&frag)
            .vertex_binding(Vertex::binding_description())
            .vertex_attributes(&Vertex::attribute_descriptions())
            .polygon_mode(polygon_mode)
            .build(self.device.clone(), &layout, &self.render_pass)?;

        self.scene.add_material(name, Material::new(pipeline, layout));
        debug!("Created material '{}'", name);
        Ok(())
    }

    /// Renders and presents one frame.
    ///
    /// A stale swapchain is never an error: the frame is skipped and the
    /// swapchain rebuilt at the next call.
    ///
    /// # Errors
    ///
    /// Returns an error on fence timeout (GPU hang) or any fatal Vulkan
    /// failure.
    pub fn draw(&mut self, overlay: &mut dyn OverlayHooks) -> EngineResult<()> {
        if let Some((width, height)) = self.resize_requested.take() {
            self.recreate_swapchain(width, height)?;
        }

        let slot_index = self.frame_ring.slot_index();

        // Wait for the GPU to release this slot's resources
        match self.frames[slot_index].render_fence.wait(FENCE_TIMEOUT_NS) {
            Ok(()) => {}
            Err(RhiError::Vulkan(vk::Result::TIMEOUT)) => {
                return Err(EngineError::FenceTimeout(FENCE_TIMEOUT_NS / 1_000_000));
            }
            Err(e) => return Err(e.into()),
        }
        if !self.frame_ring.can_begin() {
            self.frame_ring.retire(slot_index);
        }

        let acquire_semaphore = self.frames[slot_index].acquire_semaphore.handle();
        let image_index = match self.swapchain.acquire_next_image(acquire_semaphore) {
            Ok((index, suboptimal)) => {
                if suboptimal {
                    let extent = self.swapchain.extent();
                    self.resize_requested = Some((extent.width, extent.height));
                }
                index
            }
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                let extent = self.swapchain.extent();
                self.resize_requested = Some((extent.width, extent.height));
                return Ok(());
            }
            Err(vk::Result::TIMEOUT) => {
                return Err(EngineError::AcquireTimeout(
                    vkr_rhi::swapchain::ACQUIRE_TIMEOUT_NS / 1_000_000,
                ));
            }
            Err(e) => return Err(e.into()),
        };

        // Only reset once we know this frame will submit; otherwise the next
        // wait on this slot would deadlock
        self.frames[slot_index].render_fence.reset()?;
        self.frame_ring.begin();

        overlay.prepare(self.frame_ring.frame_number());

        self.write_frame_buffers(slot_index)?;
        self.record_commands(slot_index, image_index, overlay)?;

        // Submit: wait for the image at color output, signal render
        // completion and the slot fence
        let frame = &self.frames[slot_index];
        let wait_semaphores = [frame.acquire_semaphore.handle()];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let command_buffers = [frame.command_buffer.handle()];
        let signal_semaphores = [frame.render_semaphore.handle()];

        let submit_info = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);

        unsafe {
            self.device
                .submit_graphics(&[submit_info], frame.render_fence.handle())?;
        }
        self.frame_ring.submit();

        match self.swapchain.present(
            self.device.present_queue(),
            image_index,
            frame.render_semaphore.handle(),
        ) {
            Ok(false) => {}
            Ok(true) | Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                let extent = self.swapchain.extent();
                self.resize_requested = Some((extent.width, extent.height));
            }
            Err(e) => return Err(e.into()),
        }

        // The frame number advances even when the present was suboptimal
        self.frame_ring.advance();
        Ok(())
    }

    /// Writes camera, scene parameter, and per-object data for the slot.
    fn write_frame_buffers(&mut self, slot_index: usize) -> EngineResult<()> {
        let camera = &self.scene.camera;
        let camera_data = GpuCameraData {
            view: camera.view_matrix(),
            proj: camera.projection_matrix(),
            view_proj: camera.view_projection_matrix(),
        };
        self.frames[slot_index]
            .camera_buffer
            .write_data(&[camera_data], 0)?;

        // This slot's padded slice of the shared parameter buffer
        self.scene_params_buffer.write_data(
            &[self.scene_data],
            slot_index as u64 * self.scene_params_stride,
        )?;

        Ok(())
    }

    /// Records the slot's command buffer: render pass, draw plan, overlay.
    fn record_commands(
        &mut self,
        slot_index: usize,
        image_index: u32,
        overlay: &mut dyn OverlayHooks,
    ) -> EngineResult<()> {
        let extent = self.swapchain.extent();
        let frame = &self.frames[slot_index];
        let cmd = &frame.command_buffer;

        frame.command_pool.reset()?;
        cmd.begin()?;

        let clear_values = self.render_pass.clear_values(self.clear_color);
        cmd.begin_render_pass(
            self.render_pass.handle(),
            self.framebuffers[image_index as usize],
            extent,
            &clear_values,
        );
        cmd.set_viewport_scissor(extent);

        // Objects referencing a missing material or an unuploaded mesh are
        // skipped; filtering happens before planning so bind elision stays
        // correct across the gaps
        let renderables = self.scene.renderables();
        let mut drawable = Vec::with_capacity(renderables.len());
        for (index, object) in renderables.iter().enumerate() {
            let resolvable = self.scene.material(&object.material).is_some()
                && self
                    .scene
                    .mesh(&object.mesh)
                    .is_some_and(|mesh| mesh.is_uploaded());
            if resolvable {
                drawable.push(index);
            } else {
                debug!(
                    "Skipping object {} (mesh '{}', material '{}'): unresolved",
                    index, object.mesh, object.material
                );
            }
        }
        if drawable.len() > MAX_OBJECTS {
            warn!(
                "Scene has {} drawable objects, truncating to {}",
                drawable.len(),
                MAX_OBJECTS
            );
            drawable.truncate(MAX_OBJECTS);
        }

        let pairs: Vec<(&str, &str)> = drawable
            .iter()
            .map(|&i| (renderables[i].material.as_str(), renderables[i].mesh.as_str()))
            .collect();
        let plan = plan_draws(pairs);

        let dynamic_offset = (slot_index as u64 * self.scene_params_stride) as u32;
        let mut current_layout = vk::PipelineLayout::null();

        for command in &plan {
            let object = &renderables[drawable[command.object_index]];

            let (Some(material), Some(mesh)) = (
                self.scene.material(&object.material),
                self.scene.mesh(&object.mesh),
            ) else {
                continue;
            };
            let Some(vertex_buffer) = mesh.vertex_buffer.as_ref() else {
                continue;
            };

            if command.bind_material {
                cmd.bind_pipeline(material.pipeline.handle());
                current_layout = material.layout.handle();
                cmd.bind_descriptor_sets(
                    current_layout,
                    0,
                    &[frame.global_set],
                    &[dynamic_offset],
                );
                cmd.bind_descriptor_sets(current_layout, 1, &[frame.object_set], &[]);
            }
            if command.bind_mesh {
                cmd.bind_vertex_buffer(vertex_buffer.handle());
            }

            // Storage slot write happens in draw order so object_index in
            // the shader matches gl_InstanceIndex
            frame.object_buffer.write_data(
                &[GpuObjectData {
                    model: object.transform,
                }],
                (command.object_index * std::mem::size_of::<GpuObjectData>()) as u64,
            )?;

            let push = MeshPushConstants {
                data: Vec4::ZERO,
                render_matrix: object.transform,
            };
            cmd.push_constants(current_layout, &push);

            cmd.draw(
                mesh.vertex_count(),
                1,
                0,
                command.object_index as u32,
            );
        }

        overlay.record(cmd);

        cmd.end_render_pass();
        cmd.end()?;
        Ok(())
    }

    /// Tears down and rebuilds everything scoped to the swapchain.
    ///
    /// # Errors
    ///
    /// Returns an error if the rebuild fails.
    fn recreate_swapchain(&mut self, width: u32, height: u32) -> EngineResult<()> {
        self.device.wait_idle()?;

        // Old framebuffers, attachments, and render pass go first
        self.swapchain_queue.flush();

        self.swapchain
            .recreate(&self.instance, self.surface, width, height)?;

        let (render_pass, framebuffers) = Self::build_swapchain_resources(
            &self.device,
            &self.swapchain,
            self.samples,
            &mut self.swapchain_queue,
        )?;
        self.render_pass = render_pass;
        self.framebuffers = framebuffers;

        let extent = self.swapchain.extent();
        self.scene
            .camera
            .set_aspect(extent.width as f32 / extent.height.max(1) as f32);

        info!("Swapchain recreated at {}x{}", extent.width, extent.height);
        Ok(())
    }

    /// Device limit: minimum dynamic uniform offset alignment.
    pub fn min_uniform_alignment(&self) -> u64 {
        self.min_uniform_alignment
    }

    /// The immediate upload channel.
    pub fn upload_context(&self) -> &UploadContext {
        &self.upload
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Err(e) = self.device.wait_idle() {
            warn!("wait_idle failed during engine teardown: {:?}", e);
        }
        // Materials hold pipelines; drop them while the device is idle
        self.scene.clear_materials();
        self.swapchain_queue.flush();
        info!("Engine shut down after {} frames", self.frame_ring.frame_number());
        // Remaining fields drop in declaration order: frame slots and
        // buffers, then the swapchain, the main queue (surface), and
        // finally the device and instance
    }
}

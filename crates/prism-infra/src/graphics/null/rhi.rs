// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::buffer_manager::NullBufferManager;
use super::resources::{
    ComputePipelineStateData, FramebufferData, GraphicsPipelineStateData, GraphicsProgramData,
    NullResource, NullResourceKind, QueryPoolData, RenderPassData, ResourceGroupData,
    RootSignatureData, ShaderData, SwapChainData, TextureInfo,
};
use super::shared::{release_all, NullShared};
use super::state::{ComputeState, GraphicsState};
use super::texture_manager::NullTextureManager;
use prism_core::rhi::{
    framebuffer_size, validate_resource_group_layout, validate_topology, BackendType,
    BufferManager, Capabilities, CommandBuffer, CommandId, ComputePipelineStateDescriptor,
    ComputePipelineStateHandle, FramebufferDescriptor, FramebufferHandle,
    GraphicsPipelineStateDescriptor, GraphicsPipelineStateHandle, GraphicsProgramDescriptor,
    GraphicsProgramHandle, GraphicsProgramShaders, MapType, MappedSubresource, PipelineError,
    QueryPoolDescriptor, QueryPoolHandle, QueryResultFlags, ReferenceCounter,
    RenderPassDescriptor, RenderPassHandle, ResourceArena, ResourceError,
    ResourceGroupDescriptor, ResourceGroupHandle, ResourceHandle, ResourceRef, ResourceType, Rhi,
    RhiContext, RhiId, RhiStatistics, RootSignatureDescriptor, RootSignatureHandle, SamplerState,
    SamplerStateHandle, ShaderDescriptor, ShaderHandle, ShaderSource, ShaderStage,
    SwapChainDescriptor, SwapChainHandle, TextureFormat, TextureHandle, TextureManager,
};
use prism_core::{rhi_assert, RhiConfig};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// The capabilities of the Null backend: everything is supported, limits are generous.
pub fn null_capabilities() -> Capabilities {
    Capabilities {
        device_name: "Null".to_owned(),
        preferred_swap_chain_color_texture_format: TextureFormat::R8G8B8A8,
        preferred_swap_chain_depth_stencil_texture_format: TextureFormat::D32Float,
        maximum_number_of_viewports: 16,
        maximum_number_of_simultaneous_render_targets: 8,
        maximum_texture_dimension: 16384,
        maximum_number_of_1d_texture_array_slices: 2048,
        maximum_number_of_2d_texture_array_slices: 2048,
        maximum_number_of_cube_texture_array_slices: 2048,
        maximum_texture_buffer_size: 128 * 1024 * 1024,
        maximum_structured_buffer_size: 128 * 1024 * 1024,
        maximum_indirect_buffer_size: 128 * 1024 * 1024,
        maximum_uniform_buffer_size: 64 * 1024,
        maximum_number_of_multisamples: 8,
        maximum_anisotropy: 16,
        upper_left_origin: true,
        zero_to_one_clip_z: true,
        individual_uniforms: true,
        instanced_arrays: true,
        draw_instanced: true,
        base_vertex: true,
        native_multithreading: true,
        shader_bytecode: true,
        vertex_shader: true,
        maximum_number_of_patch_vertices: 32,
        maximum_number_of_gs_output_vertices: 1024,
        fragment_shader: true,
        mesh_shader: true,
        compute_shader: true,
        mipmap_generation: true,
        direct_state_access: false,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CommandCounters {
    pub(crate) draw_calls: u64,
    pub(crate) compute_dispatches: u64,
    pub(crate) executed_commands: u64,
    pub(crate) scenes: u64,
}

/// The Null RHI.
///
/// Validates every call against the RHI contracts and performs no GPU work.
/// Buffer contents, texture mip uploads, query pairing, debug event nesting
/// and scene pairing are tracked on the CPU so they can be observed.
#[derive(Debug)]
pub struct NullRhi {
    pub(crate) shared: Arc<NullShared>,
    pub(crate) counter: Arc<dyn ReferenceCounter>,
    name: String,
    default_swap_chain_size: (u32, u32),
    buffer_manager: NullBufferManager,
    texture_manager: NullTextureManager,
    pub(crate) graphics: GraphicsState,
    pub(crate) compute: ComputeState,
    pub(crate) scene_open: bool,
    pub(crate) debug_event_depth: u32,
    pub(crate) open_queries: HashSet<(QueryPoolHandle, u32)>,
    pub(crate) command_history: Vec<CommandId>,
    pub(crate) counters: CommandCounters,
}

impl NullRhi {
    /// Creates a Null RHI.
    pub fn new(config: &RhiConfig, context: Arc<RhiContext>) -> Self {
        let shared = Arc::new(NullShared::new(
            context,
            null_capabilities(),
            config.maximum_number_of_pipeline_states,
        ));
        let name = match &config.debug_name {
            Some(debug_name) => format!("Null ({debug_name})"),
            None => "Null".to_owned(),
        };
        log::info!("NullRhi: Created '{name}' with id {}", shared.id);
        Self {
            counter: shared.counter(),
            buffer_manager: NullBufferManager::new(Arc::clone(&shared)),
            texture_manager: NullTextureManager::new(Arc::clone(&shared)),
            shared,
            name,
            default_swap_chain_size: config.swap_chain_size,
            graphics: GraphicsState::default(),
            compute: ComputeState::default(),
            scene_open: false,
            debug_event_depth: 0,
            open_queries: HashSet::new(),
            command_history: Vec::new(),
            counters: CommandCounters::default(),
        }
    }

    /// The identifiers of the packets executed since the current scene began, in order.
    ///
    /// Nested command buffers contribute their own packets; the nesting packet
    /// itself is counted by `submit_command_buffer` but not recorded here.
    pub fn command_history(&self) -> &[CommandId] {
        &self.command_history
    }

    /// The upload state of a texture.
    pub fn texture_info(&self, texture: TextureHandle) -> Result<TextureInfo, ResourceError> {
        let resources = self.shared.resources();
        resources
            .get(texture.into())
            .ok()
            .and_then(NullResource::as_texture)
            .map(TextureInfo::from)
            .ok_or(ResourceError::InvalidHandle(texture.into()))
    }

    /// The size of a framebuffer: the intersection of its attachments.
    pub fn framebuffer_size(&self, framebuffer: FramebufferHandle) -> Result<(u32, u32), ResourceError> {
        let resources = self.shared.resources();
        resources
            .get(framebuffer.into())
            .ok()
            .and_then(NullResource::as_framebuffer)
            .map(|data| (data.width, data.height))
            .ok_or(ResourceError::InvalidHandle(framebuffer.into()))
    }

    /// Number of graphics pipeline state ids currently handed out.
    pub fn pipeline_state_ids_in_use(&self) -> u32 {
        self.shared.pipeline_ids().in_use()
    }

    fn check_handles(
        &self,
        resources: &ResourceArena<NullResource>,
        handles: &[ResourceHandle],
    ) -> Result<(), ResourceError> {
        handles
            .iter()
            .try_for_each(|&handle| self.shared.check_live(resources, handle))
    }

    /// Checks a graphics pipeline description against the resources it names.
    fn validate_graphics_pipeline_state(
        &self,
        resources: &ResourceArena<NullResource>,
        descriptor: &GraphicsPipelineStateDescriptor<'_>,
    ) -> Result<(), PipelineError> {
        validate_topology(descriptor.primitive_topology, descriptor.primitive_topology_type)?;

        let render_pass = resources
            .get(descriptor.render_pass.into())
            .ok()
            .and_then(NullResource::as_render_pass)
            .ok_or(PipelineError::InvalidRenderPass(descriptor.render_pass.into()))?;
        let expected = render_pass.color_attachment_texture_formats.len() as u32;
        if expected != descriptor.number_of_render_targets {
            return Err(PipelineError::RenderTargetMismatch {
                expected,
                found: descriptor.number_of_render_targets,
            });
        }

        let program = resources
            .get(descriptor.graphics_program.into())
            .ok()
            .and_then(NullResource::as_graphics_program)
            .ok_or(PipelineError::InvalidGraphicsProgram(
                descriptor.graphics_program.into(),
            ))?;
        if program.root_signature != descriptor.root_signature {
            return Err(PipelineError::RootSignatureMismatch);
        }
        if !program.vertex_attributes.matches(&descriptor.vertex_attributes) {
            return Err(PipelineError::VertexAttributesMismatch);
        }
        Ok(())
    }

    fn shader_stage_supported(&self, stage: ShaderStage) -> bool {
        let capabilities = &self.shared.capabilities;
        match stage {
            ShaderStage::Vertex => capabilities.vertex_shader,
            ShaderStage::TessellationControl | ShaderStage::TessellationEvaluation => {
                capabilities.tessellation()
            }
            ShaderStage::Geometry => capabilities.geometry_shader(),
            ShaderStage::Fragment => capabilities.fragment_shader,
            ShaderStage::Task | ShaderStage::Mesh => capabilities.mesh_shader,
            ShaderStage::Compute => capabilities.compute_shader,
        }
    }

    fn with_swap_chain<T>(
        &self,
        swap_chain: SwapChainHandle,
        f: impl FnOnce(&mut SwapChainData) -> T,
    ) -> Result<T, ResourceError> {
        let mut resources = self.shared.resources();
        match resources
            .get_mut(swap_chain.into())
            .map(NullResource::as_swap_chain_mut)
        {
            Ok(Some(data)) => Ok(f(data)),
            Ok(None) => Err(self.shared.refuse(ResourceError::InvalidHandle(swap_chain.into()))),
            Err(err) => Err(self.shared.refuse(err)),
        }
    }
}

impl Drop for NullRhi {
    fn drop(&mut self) {
        self.graphics.clear();
        self.compute.clear();
        let leaked = self.shared.resources().len();
        if leaked > 0 {
            log::debug!("NullRhi: '{}' dropped with {leaked} live resources", self.name);
        }
    }
}

impl Rhi for NullRhi {
    fn id(&self) -> RhiId {
        self.shared.id
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Null
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.shared.capabilities
    }

    fn statistics(&self) -> RhiStatistics {
        let resources = self.shared.resources();
        let mut live_resources = BTreeMap::new();
        for (handle, _) in resources.iter() {
            *live_resources.entry(handle.resource_type()).or_insert(0) += 1;
        }
        RhiStatistics {
            live_resources,
            references: resources.statistics(),
            draw_calls: self.counters.draw_calls,
            compute_dispatches: self.counters.compute_dispatches,
            executed_commands: self.counters.executed_commands,
            scenes: self.counters.scenes,
        }
    }

    fn create_render_pass(
        &self,
        descriptor: &RenderPassDescriptor<'_>,
    ) -> Result<ResourceRef<RenderPassHandle>, ResourceError> {
        descriptor
            .validate(
                self.shared
                    .capabilities
                    .maximum_number_of_simultaneous_render_targets,
            )
            .map_err(|err| self.shared.refuse(err))?;
        self.shared.create(
            descriptor.label.as_deref(),
            NullResourceKind::RenderPass(RenderPassData {
                color_attachment_texture_formats: descriptor.color_attachment_texture_formats.clone(),
                depth_stencil_attachment_texture_format: descriptor
                    .depth_stencil_attachment_texture_format,
                number_of_multisamples: descriptor.number_of_multisamples,
            }),
        )
    }

    fn create_query_pool(
        &self,
        descriptor: &QueryPoolDescriptor<'_>,
    ) -> Result<ResourceRef<QueryPoolHandle>, ResourceError> {
        if descriptor.number_of_queries == 0 {
            return Err(self.shared.refuse(ResourceError::InvalidDescriptor(
                "a query pool needs at least one query".into(),
            )));
        }
        self.shared.create(
            descriptor.label.as_deref(),
            NullResourceKind::QueryPool(QueryPoolData {
                query_type: descriptor.query_type,
                number_of_queries: descriptor.number_of_queries,
            }),
        )
    }

    fn create_swap_chain(
        &self,
        descriptor: &SwapChainDescriptor<'_>,
    ) -> Result<ResourceRef<SwapChainHandle>, ResourceError> {
        let (width, height) = if descriptor.width == 0 || descriptor.height == 0 {
            self.default_swap_chain_size
        } else {
            (descriptor.width, descriptor.height)
        };
        let render_pass: ResourceHandle = descriptor.render_pass.into();

        let handle = {
            let mut resources = self.shared.resources();
            self.shared.check_live(&resources, render_pass)?;
            self.shared.add_references(&mut resources, &[render_pass])?;
            self.shared.insert(
                &mut resources,
                descriptor.label.as_deref(),
                NullResourceKind::SwapChain(SwapChainData {
                    render_pass: descriptor.render_pass,
                    window: descriptor.window,
                    width,
                    height,
                    presented_frames: 0,
                }),
            )
        };
        log::debug!(
            "NullRhi: Swap chain {handle} presents into window {:?} at {width}x{height}",
            descriptor.window
        );
        self.shared.adopt(handle)
    }

    fn create_framebuffer(
        &self,
        descriptor: &FramebufferDescriptor<'_>,
    ) -> Result<ResourceRef<FramebufferHandle>, ResourceError> {
        let handle = {
            let mut resources = self.shared.resources();
            self.shared
                .check_live(&resources, descriptor.render_pass.into())?;
            let render_pass = resources
                .get(descriptor.render_pass.into())
                .ok()
                .and_then(NullResource::as_render_pass)
                .ok_or(ResourceError::InvalidHandle(descriptor.render_pass.into()))
                .map_err(|err| self.shared.refuse(err))?;

            if descriptor.color_attachments.len()
                != render_pass.color_attachment_texture_formats.len()
                || descriptor.depth_stencil_attachment.is_some()
                    != render_pass.depth_stencil_attachment_texture_format.is_some()
            {
                return Err(self.shared.refuse(ResourceError::InvalidDescriptor(
                    "the framebuffer attachments do not match the render pass".into(),
                )));
            }

            let expected_formats = render_pass
                .color_attachment_texture_formats
                .iter()
                .copied()
                .chain(render_pass.depth_stencil_attachment_texture_format);
            let attachments = descriptor
                .color_attachments
                .iter()
                .chain(descriptor.depth_stencil_attachment.as_ref());

            let mut sizes = Vec::new();
            for (attachment, expected_format) in attachments.clone().zip(expected_formats) {
                self.shared
                    .check_live(&resources, attachment.texture.into())?;
                let texture = resources
                    .get(attachment.texture.into())
                    .ok()
                    .and_then(NullResource::as_texture)
                    .ok_or(ResourceError::InvalidHandle(attachment.texture.into()))
                    .map_err(|err| self.shared.refuse(err))?;
                if texture.format != expected_format {
                    return Err(self.shared.refuse(ResourceError::InvalidDescriptor(format!(
                        "attachment {} is {:?}, the render pass expects {expected_format:?}",
                        attachment.texture, texture.format
                    ))));
                }
                let layers = texture.layout.depth.max(texture.layout.number_of_slices);
                if attachment.mipmap_index >= texture.number_of_mipmaps
                    || attachment.layer_index >= layers
                {
                    return Err(self.shared.refuse(ResourceError::OutOfBounds));
                }
                sizes.push((texture.layout.width, texture.layout.height, attachment.mipmap_index));
            }

            let Some((width, height)) = framebuffer_size(sizes) else {
                return Err(self.shared.refuse(ResourceError::InvalidDescriptor(
                    "a framebuffer needs at least one attachment".into(),
                )));
            };
            let number_of_multisamples = render_pass.number_of_multisamples;
            let textures: Vec<TextureHandle> =
                attachments.map(|attachment| attachment.texture).collect();
            let dependencies: Vec<ResourceHandle> = std::iter::once(descriptor.render_pass.into())
                .chain(textures.iter().map(|&texture| texture.into()))
                .collect();

            self.shared.add_references(&mut resources, &dependencies)?;
            self.shared.insert(
                &mut resources,
                descriptor.label.as_deref(),
                NullResourceKind::Framebuffer(FramebufferData {
                    render_pass: descriptor.render_pass,
                    attachments: textures,
                    width,
                    height,
                    number_of_multisamples,
                }),
            )
        };
        self.shared.adopt(handle)
    }

    fn create_root_signature(
        &self,
        descriptor: &RootSignatureDescriptor<'_>,
    ) -> Result<ResourceRef<RootSignatureHandle>, ResourceError> {
        descriptor.validate().map_err(|err| self.shared.refuse(err))?;
        self.shared.create(
            descriptor.label.as_deref(),
            NullResourceKind::RootSignature(RootSignatureData {
                parameters: descriptor.parameters.clone(),
            }),
        )
    }

    fn create_resource_group(
        &self,
        descriptor: &ResourceGroupDescriptor<'_>,
    ) -> Result<ResourceRef<ResourceGroupHandle>, ResourceError> {
        let sampler_states: Vec<SamplerStateHandle> = descriptor
            .sampler_states
            .unwrap_or_default()
            .iter()
            .flatten()
            .copied()
            .collect();

        let handle = {
            let mut resources = self.shared.resources();
            self.shared
                .check_live(&resources, descriptor.root_signature.into())?;
            let ranges = resources
                .get(descriptor.root_signature.into())
                .ok()
                .and_then(NullResource::as_root_signature)
                .and_then(|root_signature| {
                    root_signature.descriptor_ranges(descriptor.root_parameter_index)
                })
                .map(<[_]>::to_vec)
                .ok_or_else(|| {
                    self.shared.refuse(ResourceError::InvalidDescriptor(format!(
                        "root parameter {} is not a descriptor table",
                        descriptor.root_parameter_index
                    )))
                })?;
            validate_resource_group_layout(
                &ranges,
                descriptor.resources,
                descriptor.sampler_states.map(<[_]>::len),
            )
            .map_err(|err| self.shared.refuse(err))?;

            let dependencies: Vec<ResourceHandle> =
                std::iter::once(descriptor.root_signature.into())
                    .chain(descriptor.resources.iter().copied())
                    .chain(sampler_states.iter().map(|&sampler| sampler.into()))
                    .collect();
            self.check_handles(&resources, &dependencies)?;
            self.shared.add_references(&mut resources, &dependencies)?;
            self.shared.insert(
                &mut resources,
                descriptor.label.as_deref(),
                NullResourceKind::ResourceGroup(ResourceGroupData {
                    root_signature: descriptor.root_signature,
                    root_parameter_index: descriptor.root_parameter_index,
                    ranges,
                    resources: descriptor.resources.to_vec(),
                    sampler_states,
                }),
            )
        };
        self.shared.adopt(handle)
    }

    fn create_graphics_pipeline_state(
        &self,
        descriptor: &GraphicsPipelineStateDescriptor<'_>,
    ) -> Result<ResourceRef<GraphicsPipelineStateHandle>, ResourceError> {
        let dependencies: [ResourceHandle; 3] = [
            descriptor.root_signature.into(),
            descriptor.graphics_program.into(),
            descriptor.render_pass.into(),
        ];

        let handle = {
            let mut resources = self.shared.resources();
            self.check_handles(&resources, &dependencies)?;
            self.shared.add_references(&mut resources, &dependencies)?;

            let result = self
                .validate_graphics_pipeline_state(&resources, descriptor)
                .and_then(|()| {
                    let mut pipeline_ids = self.shared.pipeline_ids();
                    pipeline_ids.allocate().ok_or(PipelineError::IdPoolExhausted {
                        capacity: pipeline_ids.capacity(),
                    })
                });

            match result {
                Ok(pipeline_id) => self.shared.insert(
                    &mut resources,
                    descriptor.label.as_deref(),
                    NullResourceKind::GraphicsPipelineState(GraphicsPipelineStateData {
                        root_signature: descriptor.root_signature,
                        graphics_program: descriptor.graphics_program,
                        render_pass: descriptor.render_pass,
                        primitive_topology: descriptor.primitive_topology,
                        pipeline_id,
                    }),
                ),
                Err(err) => {
                    let destroyed = release_all(&mut resources, &dependencies);
                    drop(resources);
                    self.shared.destroyed(destroyed);
                    return Err(match err {
                        PipelineError::IdPoolExhausted { .. } => {
                            log::error!("NullRhi: Failed to create graphics pipeline state: {err}");
                            err.into()
                        }
                        _ => self.shared.refuse(err.into()),
                    });
                }
            }
        };
        self.shared.adopt(handle)
    }

    fn create_compute_pipeline_state(
        &self,
        descriptor: &ComputePipelineStateDescriptor<'_>,
    ) -> Result<ResourceRef<ComputePipelineStateHandle>, ResourceError> {
        if !self.shared.capabilities.compute_shader {
            return Err(self
                .shared
                .refuse(ResourceError::Unsupported("compute shaders".into())));
        }
        let compute_shader: ResourceHandle = descriptor.compute_shader.into();
        if compute_shader.resource_type() != ResourceType::ComputeShader {
            return Err(self.shared.refuse(
                PipelineError::InvalidComputeShader(compute_shader).into(),
            ));
        }
        let dependencies = [descriptor.root_signature.into(), compute_shader];

        let handle = {
            let mut resources = self.shared.resources();
            self.check_handles(&resources, &dependencies)?;
            self.shared.add_references(&mut resources, &dependencies)?;
            self.shared.insert(
                &mut resources,
                descriptor.label.as_deref(),
                NullResourceKind::ComputePipelineState(ComputePipelineStateData {
                    root_signature: descriptor.root_signature,
                    compute_shader: descriptor.compute_shader,
                }),
            )
        };
        self.shared.adopt(handle)
    }

    fn create_sampler_state(
        &self,
        sampler_state: &SamplerState,
    ) -> Result<ResourceRef<SamplerStateHandle>, ResourceError> {
        let maximum_anisotropy = u32::from(self.shared.capabilities.maximum_anisotropy);
        if sampler_state.max_anisotropy > maximum_anisotropy {
            return Err(self.shared.refuse(ResourceError::InvalidDescriptor(format!(
                "anisotropy {} exceeds the maximum of {maximum_anisotropy}",
                sampler_state.max_anisotropy
            ))));
        }
        self.shared
            .create(None, NullResourceKind::SamplerState(*sampler_state))
    }

    fn create_shader(
        &self,
        descriptor: &ShaderDescriptor<'_>,
    ) -> Result<ResourceRef<ShaderHandle>, ResourceError> {
        if !self.shader_stage_supported(descriptor.stage) {
            return Err(self.shared.refuse(ResourceError::Unsupported(format!(
                "{:?} shaders",
                descriptor.stage
            ))));
        }
        if matches!(descriptor.source, ShaderSource::Bytecode(_))
            && !self.shared.capabilities.shader_bytecode
        {
            return Err(self
                .shared
                .refuse(ResourceError::Unsupported("shader bytecode".into())));
        }
        if descriptor.source.is_empty() {
            return Err(self.shared.refuse(ResourceError::InvalidDescriptor(format!(
                "empty {:?} shader source",
                descriptor.stage
            ))));
        }
        self.shared.create(
            descriptor.label.as_deref(),
            NullResourceKind::Shader(ShaderData {
                stage: descriptor.stage,
                entry_point: descriptor.entry_point.to_string(),
            }),
        )
    }

    fn create_graphics_program(
        &self,
        descriptor: &GraphicsProgramDescriptor<'_>,
    ) -> Result<ResourceRef<GraphicsProgramHandle>, ResourceError> {
        descriptor
            .shaders
            .validate()
            .map_err(|err| self.shared.refuse(err))?;
        if matches!(descriptor.shaders, GraphicsProgramShaders::Mesh { .. })
            && !self.shared.capabilities.mesh_shader
        {
            return Err(self
                .shared
                .refuse(ResourceError::Unsupported("mesh shaders".into())));
        }
        let shaders: Vec<ShaderHandle> = descriptor
            .shaders
            .stages()
            .into_iter()
            .map(|(_, shader)| shader)
            .collect();
        let dependencies: Vec<ResourceHandle> = std::iter::once(descriptor.root_signature.into())
            .chain(shaders.iter().map(|&shader| shader.into()))
            .collect();

        let handle = {
            let mut resources = self.shared.resources();
            self.check_handles(&resources, &dependencies)?;
            self.shared.add_references(&mut resources, &dependencies)?;
            self.shared.insert(
                &mut resources,
                descriptor.label.as_deref(),
                NullResourceKind::GraphicsProgram(GraphicsProgramData {
                    root_signature: descriptor.root_signature,
                    vertex_attributes: descriptor.vertex_attributes.clone(),
                    shaders,
                }),
            )
        };
        self.shared.adopt(handle)
    }

    fn buffer_manager(&self) -> &dyn BufferManager {
        &self.buffer_manager
    }

    fn texture_manager(&self) -> &dyn TextureManager {
        &self.texture_manager
    }

    fn reference_counter(&self) -> Arc<dyn ReferenceCounter> {
        Arc::clone(&self.counter)
    }

    fn map(
        &self,
        resource: ResourceHandle,
        subresource: u32,
        map_type: MapType,
    ) -> Result<MappedSubresource, ResourceError> {
        let mut resources = self.shared.resources();
        let entry = resources
            .get_mut(resource)
            .map_err(|err| self.shared.refuse(err))?;
        let Some(buffer) = entry.as_buffer_mut() else {
            return Err(self.shared.refuse(ResourceError::Unsupported(format!(
                "mapping {}",
                resource.resource_type()
            ))));
        };
        if subresource != 0 {
            return Err(self.shared.refuse(ResourceError::OutOfBounds));
        }
        if buffer.mapped.is_some() {
            return Err(self.shared.refuse(ResourceError::AlreadyMapped(resource)));
        }

        buffer.mapped = Some(map_type);
        let data = match map_type {
            MapType::WriteDiscard => vec![0; buffer.contents.len()],
            _ => buffer.contents.clone(),
        };
        let pitch = data.len() as u32;
        Ok(MappedSubresource {
            data,
            row_pitch: pitch,
            depth_pitch: pitch,
        })
    }

    fn unmap(
        &self,
        resource: ResourceHandle,
        subresource: u32,
        mapped: MappedSubresource,
    ) -> Result<(), ResourceError> {
        let mut resources = self.shared.resources();
        let buffer = resources
            .get_mut(resource)
            .map_err(|err| self.shared.refuse(err))?
            .as_buffer_mut()
            .ok_or_else(|| self.shared.refuse(ResourceError::NotMapped(resource)))?;
        if subresource != 0 {
            return Err(self.shared.refuse(ResourceError::OutOfBounds));
        }
        let Some(map_type) = buffer.mapped.take() else {
            return Err(self.shared.refuse(ResourceError::NotMapped(resource)));
        };
        if map_type.writes() {
            if mapped.data.len() != buffer.contents.len() {
                return Err(self.shared.refuse(ResourceError::OutOfBounds));
            }
            buffer.contents.copy_from_slice(&mapped.data);
        }
        Ok(())
    }

    fn get_query_pool_results(
        &self,
        query_pool: QueryPoolHandle,
        first_query_index: u32,
        number_of_queries: u32,
        flags: QueryResultFlags,
    ) -> Result<Vec<u8>, ResourceError> {
        let resources = self.shared.resources();
        let pool = resources
            .get(query_pool.into())
            .map_err(|err| self.shared.refuse(err))?
            .as_query_pool()
            .ok_or_else(|| self.shared.refuse(ResourceError::InvalidHandle(query_pool.into())))?;
        let end = first_query_index.checked_add(number_of_queries);
        if end.map_or(true, |end| end > pool.number_of_queries) {
            return Err(self.shared.refuse(ResourceError::OutOfBounds));
        }
        log::trace!(
            "NullRhi: Reading {number_of_queries} {:?} queries of {query_pool} ({flags:?})",
            pool.query_type
        );
        Ok(vec![
            0;
            number_of_queries as usize * pool.query_type.result_size()
        ])
    }

    fn begin_scene(&mut self) -> bool {
        if !rhi_assert!(self.shared.context, !self.scene_open, "A scene is already open") {
            return false;
        }
        self.scene_open = true;
        self.command_history.clear();
        self.counters.scenes += 1;
        true
    }

    fn end_scene(&mut self) {
        if !rhi_assert!(self.shared.context, self.scene_open, "No scene is open") {
            return;
        }
        rhi_assert!(
            self.shared.context,
            self.debug_event_depth == 0,
            "{} debug events are still open at the end of the scene",
            self.debug_event_depth
        );
        rhi_assert!(
            self.shared.context,
            self.open_queries.is_empty(),
            "{} queries are still open at the end of the scene",
            self.open_queries.len()
        );
        self.debug_event_depth = 0;
        self.open_queries.clear();
        self.graphics.clear();
        self.compute.clear();
        self.scene_open = false;
    }

    fn submit_command_buffer(&mut self, command_buffer: &CommandBuffer) -> usize {
        if !rhi_assert!(
            self.shared.context,
            self.scene_open,
            "Command buffers are submitted between begin_scene and end_scene"
        ) {
            return 0;
        }
        let executed = prism_core::rhi::dispatch_command_buffer(command_buffer, self);
        self.counters.executed_commands += executed as u64;
        executed
    }

    fn present(&mut self, swap_chain: SwapChainHandle) -> Result<(), ResourceError> {
        let frame = self.with_swap_chain(swap_chain, |data| {
            data.presented_frames += 1;
            data.presented_frames
        })?;
        log::trace!("NullRhi: Presented frame {frame} of {swap_chain}");
        Ok(())
    }

    fn resize_swap_chain(
        &self,
        swap_chain: SwapChainHandle,
        width: u32,
        height: u32,
    ) -> Result<(), ResourceError> {
        if width == 0 || height == 0 {
            return Err(self.shared.refuse(ResourceError::InvalidDescriptor(format!(
                "cannot resize a swap chain to {width}x{height}"
            ))));
        }
        self.with_swap_chain(swap_chain, |data| {
            data.width = width;
            data.height = height;
        })?;
        log::debug!("NullRhi: Resized {swap_chain} to {width}x{height}");
        Ok(())
    }

    fn swap_chain_size(&self, swap_chain: SwapChainHandle) -> Result<(u32, u32), ResourceError> {
        self.with_swap_chain(swap_chain, |data| (data.width, data.height))
    }
}

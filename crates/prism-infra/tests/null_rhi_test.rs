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

use prism_core::rhi::{
    AssertPolicy, BufferDescriptor, ClearFlags, CommandBuffer, CommandId,
    ComputePipelineStateDescriptor, DescriptorRange,
    DescriptorRangeType, FramebufferAttachment, FramebufferDescriptor,
    GraphicsPipelineStateDescriptor, GraphicsProgramDescriptor, GraphicsProgramHandle,
    GraphicsProgramShaders, MapType, PipelineError, QueryPoolDescriptor, QueryResultFlags,
    QueryType, RenderPassDescriptor, RenderPassHandle,
    ResourceError, ResourceGroupDescriptor, ResourceRef, ResourceType, Rhi, RhiContext,
    RootParameter, RootSignatureDescriptor, RootSignatureHandle, ShaderDescriptor, ShaderHandle,
    ShaderSource, ShaderStage, ShaderVisibility, SwapChainDescriptor, TextureDescriptor,
    TextureFlags, TextureFormat, VertexArrayDescriptor, VertexArrayHandle, VertexAttribute,
    VertexAttributeFormat, VertexAttributes, VertexBufferHandle, WindowHandle,
};
use prism_core::RhiConfig;
use prism_infra::graphics::null::{create_rhi_instance, NullRhi};
use std::sync::Arc;

/// Assertions only fire in debug builds.
fn expected_assertions(count: u64) -> u64 {
    if cfg!(debug_assertions) {
        count
    } else {
        0
    }
}

fn null_rhi(config: RhiConfig) -> (NullRhi, Arc<RhiContext>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let context = Arc::new(RhiContext::new(AssertPolicy::Log));
    let rhi = create_rhi_instance(&config, Arc::clone(&context)).unwrap();
    (rhi, context)
}

fn position_layout() -> VertexAttributes {
    VertexAttributes::new(vec![VertexAttribute {
        format: VertexAttributeFormat::Float2,
        name: "Position".into(),
        semantic_index: 0,
        input_slot: 0,
        aligned_byte_offset: 0,
        stride_in_bytes: 8,
        instances_per_element: 0,
    }])
}

fn shader(rhi: &NullRhi, stage: ShaderStage) -> ResourceRef<ShaderHandle> {
    rhi.create_shader(&ShaderDescriptor {
        label: None,
        stage,
        source: ShaderSource::Source("void main() {}".into()),
        entry_point: "main".into(),
    })
    .unwrap()
}

/// Everything needed to draw a triangle.
struct Triangle {
    root_signature: ResourceRef<RootSignatureHandle>,
    program: ResourceRef<GraphicsProgramHandle>,
    render_pass: ResourceRef<RenderPassHandle>,
    pipeline_state: ResourceRef<prism_core::rhi::GraphicsPipelineStateHandle>,
    vertex_buffer: ResourceRef<VertexBufferHandle>,
    vertex_array: ResourceRef<VertexArrayHandle>,
}

impl Triangle {
    fn new(rhi: &NullRhi) -> Self {
        let root_signature = rhi
            .create_root_signature(&RootSignatureDescriptor::default())
            .unwrap();
        let vertex_shader = shader(rhi, ShaderStage::Vertex);
        let fragment_shader = shader(rhi, ShaderStage::Fragment);
        let program = rhi
            .create_graphics_program(&GraphicsProgramDescriptor {
                label: Some("Triangle".into()),
                root_signature: root_signature.handle(),
                vertex_attributes: position_layout(),
                shaders: GraphicsProgramShaders::Vertex {
                    vertex: vertex_shader.handle(),
                    tessellation_control: None,
                    tessellation_evaluation: None,
                    geometry: None,
                    fragment: Some(fragment_shader.handle()),
                },
            })
            .unwrap();
        let render_pass = rhi
            .create_render_pass(&RenderPassDescriptor::new(TextureFormat::R8G8B8A8, None))
            .unwrap();
        let pipeline_state = rhi
            .create_graphics_pipeline_state(&GraphicsPipelineStateDescriptor::new(
                root_signature.handle(),
                program.handle(),
                position_layout(),
                render_pass.handle(),
            ))
            .unwrap();

        let vertices: [f32; 6] = [0.0, 1.0, 1.0, 0.0, -0.5, 0.0];
        let vertex_buffer = rhi
            .buffer_manager()
            .create_vertex_buffer(&BufferDescriptor::with_data(bytemuck::cast_slice(&vertices)))
            .unwrap();
        let vertex_array = rhi
            .buffer_manager()
            .create_vertex_array(&VertexArrayDescriptor {
                label: None,
                vertex_attributes: position_layout(),
                vertex_buffers: &[vertex_buffer.handle()],
                index_buffer: None,
            })
            .unwrap();

        Self {
            root_signature,
            program,
            render_pass,
            pipeline_state,
            vertex_buffer,
            vertex_array,
        }
    }

    fn record(&self, command_buffer: &mut CommandBuffer) {
        command_buffer
            .clear_graphics(ClearFlags::COLOR, [0.5, 0.5, 0.5, 1.0], 1.0, 0)
            .set_graphics_root_signature(Some(self.root_signature.handle()))
            .set_graphics_pipeline_state(Some(self.pipeline_state.handle()))
            .set_graphics_vertex_array(Some(self.vertex_array.handle()))
            .draw_graphics(3, 1, 0, 0);
    }
}

#[test]
fn triangle_scene_executes_in_recording_order() {
    let (mut rhi, context) = null_rhi(RhiConfig::default());
    let triangle = Triangle::new(&rhi);
    let mut command_buffer = CommandBuffer::new();
    triangle.record(&mut command_buffer);

    assert!(rhi.begin_scene());
    assert_eq!(rhi.submit_command_buffer(&command_buffer), 5);
    rhi.end_scene();

    assert_eq!(
        rhi.command_history(),
        &[
            CommandId::ClearGraphics,
            CommandId::SetGraphicsRootSignature,
            CommandId::SetGraphicsPipelineState,
            CommandId::SetGraphicsVertexArray,
            CommandId::DrawGraphics,
        ]
    );
    assert_eq!(context.assertion_count(), 0);

    let statistics = rhi.statistics();
    assert_eq!(statistics.draw_calls, 1);
    assert_eq!(statistics.executed_commands, 5);
    assert_eq!(statistics.scenes, 1);
}

#[test]
fn bindings_hold_references_until_the_scene_ends() {
    let (mut rhi, _context) = null_rhi(RhiConfig::default());
    let triangle = Triangle::new(&rhi);
    let mut command_buffer = CommandBuffer::new();
    triangle.record(&mut command_buffer);

    assert_eq!(triangle.vertex_buffer.reference_count(), 2);
    let before = triangle.pipeline_state.reference_count();
    rhi.begin_scene();
    rhi.submit_command_buffer(&command_buffer);
    assert_eq!(triangle.pipeline_state.reference_count(), before + 1);
    rhi.end_scene();
    assert_eq!(triangle.pipeline_state.reference_count(), before);
}

#[test]
fn rebinding_the_same_render_target_costs_nothing() {
    let (mut rhi, context) = null_rhi(RhiConfig::default());
    let render_pass = rhi
        .create_render_pass(&RenderPassDescriptor::new(TextureFormat::R8G8B8A8, None))
        .unwrap();
    let swap_chain = rhi
        .create_swap_chain(&SwapChainDescriptor {
            label: Some("Main".into()),
            render_pass: render_pass.handle(),
            window: WindowHandle(1),
            width: 0,
            height: 0,
        })
        .unwrap();
    assert_eq!(rhi.swap_chain_size(swap_chain.handle()).unwrap(), (1024, 768));

    let mut command_buffer = CommandBuffer::new();
    command_buffer.set_graphics_render_target(Some(swap_chain.handle().into()));

    rhi.begin_scene();
    rhi.submit_command_buffer(&command_buffer);
    let after_first_bind = rhi.statistics().references;
    rhi.submit_command_buffer(&command_buffer);
    assert_eq!(rhi.statistics().references, after_first_bind);
    assert_eq!(swap_chain.reference_count(), 2);
    rhi.end_scene();

    assert_eq!(swap_chain.reference_count(), 1);
    assert_eq!(context.assertion_count(), 0);
}

#[test]
fn resource_groups_cannot_target_inline_constants() {
    let (rhi, context) = null_rhi(RhiConfig::default());
    let root_signature = rhi
        .create_root_signature(&RootSignatureDescriptor {
            parameters: vec![RootParameter::Constants {
                shader_register: 0,
                register_space: 0,
                number_of_values: 4,
                shader_visibility: ShaderVisibility::All,
            }],
            ..Default::default()
        })
        .unwrap();
    let uniform_buffer = rhi
        .buffer_manager()
        .create_uniform_buffer(&BufferDescriptor::new(64))
        .unwrap();

    let result = rhi.create_resource_group(&ResourceGroupDescriptor {
        label: None,
        root_signature: root_signature.handle(),
        root_parameter_index: 0,
        resources: &[uniform_buffer.raw()],
        sampler_states: None,
    });

    assert!(matches!(result, Err(ResourceError::InvalidDescriptor(_))));
    assert_eq!(context.assertion_count(), expected_assertions(1));
    assert_eq!(rhi.statistics().live(ResourceType::ResourceGroup), 0);
}

/// Inline constants at parameter 0, a single uniform buffer table at parameter 1.
fn constants_then_table(rhi: &NullRhi) -> ResourceRef<RootSignatureHandle> {
    rhi.create_root_signature(&RootSignatureDescriptor {
        parameters: vec![
            RootParameter::Constants {
                shader_register: 0,
                register_space: 0,
                number_of_values: 4,
                shader_visibility: ShaderVisibility::All,
            },
            RootParameter::DescriptorTable {
                ranges: vec![DescriptorRange::new(
                    DescriptorRangeType::Ubv,
                    1,
                    0,
                    "UniformBlock",
                    ResourceType::UniformBuffer,
                    ShaderVisibility::All,
                )],
            },
        ],
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn binding_a_group_over_inline_constants_is_refused() {
    let (mut rhi, context) = null_rhi(RhiConfig::default());
    let root_signature = constants_then_table(&rhi);
    let uniform_buffer = rhi
        .buffer_manager()
        .create_uniform_buffer(&BufferDescriptor::new(64))
        .unwrap();
    let group = rhi
        .create_resource_group(&ResourceGroupDescriptor {
            label: None,
            root_signature: root_signature.handle(),
            root_parameter_index: 1,
            resources: &[uniform_buffer.raw()],
            sampler_states: None,
        })
        .unwrap();
    let references = group.reference_count();

    let mut command_buffer = CommandBuffer::new();
    command_buffer
        .set_graphics_root_signature(Some(root_signature.handle()))
        .set_graphics_resource_group(0, Some(group.handle()));

    rhi.begin_scene();
    rhi.submit_command_buffer(&command_buffer);
    assert_eq!(context.assertion_count(), expected_assertions(1));
    assert_eq!(group.reference_count(), references);
    rhi.end_scene();

    // The table parameter accepts the same group.
    let mut command_buffer = CommandBuffer::new();
    command_buffer
        .set_graphics_root_signature(Some(root_signature.handle()))
        .set_graphics_resource_group(1, Some(group.handle()));
    rhi.begin_scene();
    rhi.submit_command_buffer(&command_buffer);
    assert_eq!(group.reference_count(), references + 1);
    rhi.end_scene();
    assert_eq!(context.assertion_count(), expected_assertions(1));
}

#[test]
fn unbinding_past_the_last_root_parameter_is_refused() {
    let (mut rhi, context) = null_rhi(RhiConfig::default());
    let root_signature = constants_then_table(&rhi);

    let mut command_buffer = CommandBuffer::new();
    command_buffer
        .set_graphics_root_signature(Some(root_signature.handle()))
        .set_graphics_resource_group(u32::MAX, None)
        .set_graphics_resource_group(1, None);

    rhi.begin_scene();
    assert_eq!(rhi.submit_command_buffer(&command_buffer), 3);
    rhi.end_scene();
    assert_eq!(context.assertion_count(), expected_assertions(1));
}

#[test]
fn structured_buffers_hold_whole_structures() {
    let (rhi, context) = null_rhi(RhiConfig::default());

    let result = rhi
        .buffer_manager()
        .create_structured_buffer(&BufferDescriptor::new(50), 16);
    assert!(result.is_err());
    assert_eq!(context.assertion_count(), expected_assertions(1));

    context.reset_assertions();
    let buffer = rhi
        .buffer_manager()
        .create_structured_buffer(&BufferDescriptor::new(64), 16)
        .unwrap();
    assert_eq!(buffer.reference_count(), 1);
    assert_eq!(context.assertion_count(), 0);
}

#[test]
fn textures_upload_only_the_top_mip_without_mipmap_flags() {
    let (rhi, _context) = null_rhi(RhiConfig::default());
    let texels = vec![255u8; 64 * 64 * 4];

    let plain = rhi
        .texture_manager()
        .create_texture_2d(64, 64, &TextureDescriptor::new(TextureFormat::R8G8B8A8).with_data(&texels))
        .unwrap();
    let info = rhi.texture_info(plain.handle()).unwrap();
    assert_eq!(info.uploaded_mipmaps, vec![0]);
    assert_eq!(info.number_of_mipmaps, 1);
    assert!(!info.mipmaps_generated);

    let generated = rhi
        .texture_manager()
        .create_texture_2d(
            64,
            64,
            &TextureDescriptor::new(TextureFormat::R8G8B8A8)
                .with_data(&texels)
                .with_flags(TextureFlags::GENERATE_MIPMAPS),
        )
        .unwrap();
    let info = rhi.texture_info(generated.handle()).unwrap();
    assert_eq!(info.uploaded_mipmaps, vec![0]);
    assert_eq!(info.number_of_mipmaps, 7);
    assert!(info.mipmaps_generated);
}

#[test]
fn failed_pipeline_creation_gives_back_its_references() {
    let (rhi, context) = null_rhi(RhiConfig {
        maximum_number_of_pipeline_states: 1,
        ..Default::default()
    });
    let triangle = Triangle::new(&rhi);
    assert_eq!(rhi.pipeline_state_ids_in_use(), 1);

    let counts = |triangle: &Triangle| {
        (
            triangle.root_signature.reference_count(),
            triangle.program.reference_count(),
            triangle.render_pass.reference_count(),
        )
    };
    let before = counts(&triangle);

    let result = rhi.create_graphics_pipeline_state(&GraphicsPipelineStateDescriptor::new(
        triangle.root_signature.handle(),
        triangle.program.handle(),
        position_layout(),
        triangle.render_pass.handle(),
    ));
    assert_eq!(
        result.unwrap_err(),
        ResourceError::Pipeline(PipelineError::IdPoolExhausted { capacity: 1 })
    );
    assert_eq!(counts(&triangle), before);
    assert_eq!(context.assertion_count(), 0);

    let Triangle {
        root_signature,
        program,
        render_pass,
        pipeline_state,
        ..
    } = triangle;
    drop(pipeline_state);
    assert_eq!(rhi.pipeline_state_ids_in_use(), 0);

    let retry = rhi.create_graphics_pipeline_state(&GraphicsPipelineStateDescriptor::new(
        root_signature.handle(),
        program.handle(),
        position_layout(),
        render_pass.handle(),
    ));
    assert!(retry.is_ok());
}

#[test]
fn mismatched_render_target_counts_are_refused() {
    let (rhi, context) = null_rhi(RhiConfig::default());
    let triangle = Triangle::new(&rhi);

    let mut descriptor = GraphicsPipelineStateDescriptor::new(
        triangle.root_signature.handle(),
        triangle.program.handle(),
        position_layout(),
        triangle.render_pass.handle(),
    );
    descriptor.number_of_render_targets = 2;

    let result = rhi.create_graphics_pipeline_state(&descriptor);
    assert_eq!(
        result.unwrap_err(),
        ResourceError::Pipeline(PipelineError::RenderTargetMismatch {
            expected: 1,
            found: 2
        })
    );
    assert_eq!(context.assertion_count(), expected_assertions(1));
}

#[test]
fn pipelines_use_the_root_signature_of_their_program() {
    let (rhi, context) = null_rhi(RhiConfig::default());
    let triangle = Triangle::new(&rhi);
    let other = constants_then_table(&rhi);

    let result = rhi.create_graphics_pipeline_state(&GraphicsPipelineStateDescriptor::new(
        other.handle(),
        triangle.program.handle(),
        position_layout(),
        triangle.render_pass.handle(),
    ));
    assert_eq!(
        result.unwrap_err(),
        ResourceError::Pipeline(PipelineError::RootSignatureMismatch)
    );
    assert_eq!(context.assertion_count(), expected_assertions(1));
    assert_eq!(other.reference_count(), 1);

    // The program keeps its root signature alive.
    let Triangle {
        root_signature,
        pipeline_state,
        program,
        ..
    } = triangle;
    drop(pipeline_state);
    drop(root_signature);
    assert_eq!(rhi.statistics().live(ResourceType::RootSignature), 2);
    drop(program);
    assert_eq!(rhi.statistics().live(ResourceType::RootSignature), 1);
}

#[test]
fn framebuffers_use_the_smallest_attachment_extent() {
    let (rhi, context) = null_rhi(RhiConfig::default());
    let render_pass = rhi
        .create_render_pass(&RenderPassDescriptor {
            color_attachment_texture_formats: vec![TextureFormat::R8G8B8A8, TextureFormat::R8G8B8A8],
            ..RenderPassDescriptor::new(TextureFormat::R8G8B8A8, None)
        })
        .unwrap();
    let target = TextureDescriptor::new(TextureFormat::R8G8B8A8).with_flags(TextureFlags::RENDER_TARGET);
    let wide = rhi.texture_manager().create_texture_2d(256, 128, &target).unwrap();
    let tall = rhi.texture_manager().create_texture_2d(128, 512, &target).unwrap();

    let framebuffer = rhi
        .create_framebuffer(&FramebufferDescriptor {
            label: None,
            render_pass: render_pass.handle(),
            color_attachments: &[
                FramebufferAttachment::new(wide.handle()),
                FramebufferAttachment::new(tall.handle()),
            ],
            depth_stencil_attachment: None,
        })
        .unwrap();

    assert_eq!(rhi.framebuffer_size(framebuffer.handle()).unwrap(), (128, 128));
    assert_eq!(wide.reference_count(), 2);
    assert_eq!(context.assertion_count(), 0);
}

#[test]
fn releasing_a_group_releases_what_it_binds() {
    let (rhi, _context) = null_rhi(RhiConfig::default());
    let root_signature = rhi
        .create_root_signature(&RootSignatureDescriptor {
            parameters: vec![RootParameter::DescriptorTable {
                ranges: vec![DescriptorRange::new(
                    DescriptorRangeType::Ubv,
                    1,
                    0,
                    "UniformBlock",
                    ResourceType::UniformBuffer,
                    ShaderVisibility::All,
                )],
            }],
            ..Default::default()
        })
        .unwrap();
    let uniform_buffer = rhi
        .buffer_manager()
        .create_uniform_buffer(&BufferDescriptor::new(64))
        .unwrap();
    let group = rhi
        .create_resource_group(&ResourceGroupDescriptor {
            label: Some("PerFrame".into()),
            root_signature: root_signature.handle(),
            root_parameter_index: 0,
            resources: &[uniform_buffer.raw()],
            sampler_states: None,
        })
        .unwrap();

    drop(uniform_buffer);
    drop(root_signature);
    assert_eq!(rhi.statistics().live(ResourceType::UniformBuffer), 1);
    assert_eq!(rhi.statistics().live(ResourceType::RootSignature), 1);

    drop(group);
    let statistics = rhi.statistics();
    assert_eq!(statistics.live(ResourceType::UniformBuffer), 0);
    assert_eq!(statistics.live(ResourceType::RootSignature), 0);
    assert_eq!(statistics.total_live(), 0);
}

#[test]
fn mapped_writes_land_on_unmap() -> anyhow::Result<()> {
    let (rhi, context) = null_rhi(RhiConfig::default());
    let data = [1u8, 2, 3, 4, 5, 6, 7, 8];
    let buffer = rhi
        .buffer_manager()
        .create_vertex_buffer(&BufferDescriptor::with_data(&data))?;

    let mut mapped = rhi.map(buffer.raw(), 0, MapType::Write)?;
    assert!(matches!(
        rhi.map(buffer.raw(), 0, MapType::Read),
        Err(ResourceError::AlreadyMapped(_))
    ));
    mapped.data.iter_mut().for_each(|byte| *byte *= 2);
    rhi.unmap(buffer.raw(), 0, mapped)?;

    let read = rhi.map(buffer.raw(), 0, MapType::Read)?;
    assert_eq!(read.data, vec![2, 4, 6, 8, 10, 12, 14, 16]);
    rhi.unmap(buffer.raw(), 0, read)?;
    assert_eq!(context.assertion_count(), expected_assertions(1));
    Ok(())
}

#[test]
fn submitting_outside_a_scene_executes_nothing() {
    let (mut rhi, context) = null_rhi(RhiConfig::default());
    let mut command_buffer = CommandBuffer::new();
    command_buffer.set_graphics_root_signature(None);

    assert_eq!(rhi.submit_command_buffer(&command_buffer), 0);
    assert!(rhi.command_history().is_empty());
    assert_eq!(context.assertion_count(), expected_assertions(1));
}

#[test]
fn nested_buffers_run_inline() {
    let (mut rhi, context) = null_rhi(RhiConfig::default());
    let mut nested = CommandBuffer::new();
    nested
        .set_compute_root_signature(None)
        .set_compute_pipeline_state(None);

    let mut command_buffer = CommandBuffer::new();
    command_buffer
        .set_graphics_render_target(None)
        .dispatch_command_buffer(Arc::new(nested))
        .set_graphics_vertex_array(None);

    rhi.begin_scene();
    assert_eq!(rhi.submit_command_buffer(&command_buffer), 5);
    rhi.end_scene();

    assert_eq!(
        rhi.command_history(),
        &[
            CommandId::SetGraphicsRenderTarget,
            CommandId::SetComputeRootSignature,
            CommandId::SetComputePipelineState,
            CommandId::SetGraphicsVertexArray,
        ]
    );
    assert_eq!(context.assertion_count(), 0);
}

#[test]
fn swap_chains_present_and_resize() -> anyhow::Result<()> {
    let config = RhiConfig {
        swap_chain_size: (640, 480),
        ..Default::default()
    };
    let (mut rhi, context) = null_rhi(config);
    let render_pass =
        rhi.create_render_pass(&RenderPassDescriptor::new(TextureFormat::R8G8B8A8, None))?;
    let swap_chain = rhi.create_swap_chain(&SwapChainDescriptor {
        label: None,
        render_pass: render_pass.handle(),
        window: WindowHandle(7),
        width: 0,
        height: 0,
    })?;

    assert_eq!(rhi.swap_chain_size(swap_chain.handle())?, (640, 480));
    rhi.resize_swap_chain(swap_chain.handle(), 1920, 1080)?;
    assert_eq!(rhi.swap_chain_size(swap_chain.handle())?, (1920, 1080));
    rhi.present(swap_chain.handle())?;

    assert!(rhi.resize_swap_chain(swap_chain.handle(), 0, 1080).is_err());
    assert_eq!(rhi.swap_chain_size(swap_chain.handle())?, (1920, 1080));
    assert_eq!(context.assertion_count(), expected_assertions(1));
    Ok(())
}

#[test]
fn queries_pair_up_within_a_scene() -> anyhow::Result<()> {
    let (mut rhi, context) = null_rhi(RhiConfig::default());
    let occlusion = rhi.create_query_pool(&QueryPoolDescriptor {
        label: Some("Occlusion".into()),
        query_type: QueryType::Occlusion,
        number_of_queries: 4,
    })?;
    let timestamps = rhi.create_query_pool(&QueryPoolDescriptor {
        label: None,
        query_type: QueryType::Timestamp,
        number_of_queries: 2,
    })?;

    let mut command_buffer = CommandBuffer::new();
    command_buffer
        .reset_query_pool(occlusion.handle(), 0, 4)
        .write_timestamp_query(timestamps.handle(), 0)
        .begin_query(occlusion.handle(), 1, 0)
        .end_query(occlusion.handle(), 1)
        .write_timestamp_query(timestamps.handle(), 1);

    rhi.begin_scene();
    assert_eq!(rhi.submit_command_buffer(&command_buffer), 5);
    rhi.end_scene();
    assert_eq!(context.assertion_count(), 0);

    let results =
        rhi.get_query_pool_results(occlusion.handle(), 0, 4, QueryResultFlags::WAIT)?;
    assert_eq!(results, vec![0u8; 4 * QueryType::Occlusion.result_size()]);
    assert!(rhi
        .get_query_pool_results(occlusion.handle(), 2, 3, QueryResultFlags::empty())
        .is_err());
    assert_eq!(context.assertion_count(), expected_assertions(1));

    // A query left open is reported when the scene ends.
    let mut unbalanced = CommandBuffer::new();
    unbalanced.begin_query(occlusion.handle(), 0, 0);
    rhi.begin_scene();
    rhi.submit_command_buffer(&unbalanced);
    rhi.end_scene();
    assert_eq!(context.assertion_count(), expected_assertions(2));
    Ok(())
}

#[test]
fn compute_dispatches_need_their_pipeline() -> anyhow::Result<()> {
    let (mut rhi, context) = null_rhi(RhiConfig::default());
    let root_signature = rhi.create_root_signature(&RootSignatureDescriptor::default())?;
    let compute_shader = shader(&rhi, ShaderStage::Compute);
    let pipeline_state = rhi.create_compute_pipeline_state(&ComputePipelineStateDescriptor {
        label: Some("Blur".into()),
        root_signature: root_signature.handle(),
        compute_shader: compute_shader.handle(),
    })?;

    let vertex_shader = shader(&rhi, ShaderStage::Vertex);
    assert!(rhi
        .create_compute_pipeline_state(&ComputePipelineStateDescriptor {
            label: None,
            root_signature: root_signature.handle(),
            compute_shader: vertex_shader.handle(),
        })
        .is_err());
    let refused = context.assertion_count();

    let mut unbound = CommandBuffer::new();
    unbound.dispatch_compute(8, 8, 1);
    let mut bound = CommandBuffer::new();
    bound
        .set_compute_root_signature(Some(root_signature.handle()))
        .set_compute_pipeline_state(Some(pipeline_state.handle()))
        .dispatch_compute(8, 8, 1);

    rhi.begin_scene();
    rhi.submit_command_buffer(&unbound);
    rhi.submit_command_buffer(&bound);
    rhi.end_scene();

    assert_eq!(rhi.statistics().compute_dispatches, 1);
    assert_eq!(context.assertion_count(), refused + expected_assertions(1));
    Ok(())
}

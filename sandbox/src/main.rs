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

// Prism Sandbox
// Draws a triangle on the Null RHI with shaders read from an asset package.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use prism_core::rhi::{
    AssertPolicy, BufferDescriptor, ClearFlags, CommandBuffer, GraphicsPipelineStateDescriptor,
    GraphicsProgramDescriptor, GraphicsProgramShaders, RenderPassDescriptor,
    RootSignatureDescriptor, ShaderDescriptor, ShaderSource, ShaderStage, SwapChainDescriptor,
    TextureFormat, VertexArrayDescriptor, VertexAttribute, VertexAttributeFormat,
    VertexAttributes, WindowHandle,
};
use prism_core::telemetry::{LogCpuProfiler, ScopedCpuSample};
use prism_core::{Rhi, RhiConfig, RhiContext};
use prism_io::{build_asset_package, AssetId, AssetManager, AssetPackageId, StdFileManager};

const MOUNT_NAME: &str = "Sandbox";
const FRAMES: u32 = 3;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 2],
}

const VERTICES: &[Vertex] = &[
    Vertex { position: [0.0, 1.0] },
    Vertex { position: [1.0, 0.0] },
    Vertex { position: [-0.5, 0.0] },
];

fn vertex_attributes() -> VertexAttributes {
    VertexAttributes::new(vec![VertexAttribute {
        format: VertexAttributeFormat::Float2,
        name: "Position".into(),
        semantic_index: 0,
        input_slot: 0,
        aligned_byte_offset: 0,
        stride_in_bytes: std::mem::size_of::<Vertex>() as u32,
        instances_per_element: 0,
    }])
}

fn load_shader_source(assets: &AssetManager, virtual_filename: &str) -> Result<String> {
    let bytes = assets
        .load_asset(AssetId::from_virtual_filename(virtual_filename))
        .with_context(|| format!("loading '{virtual_filename}'"))?;
    Ok(String::from_utf8(bytes)?)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let config = RhiConfig::load(root.join("config").join("rhi.ron"))?;

    // --- Assets ---
    let asset_directory = root.join("assets");
    let files = Arc::new(StdFileManager::new().with_mount(MOUNT_NAME, &asset_directory));
    let package = build_asset_package(
        AssetPackageId::from_name(MOUNT_NAME),
        MOUNT_NAME,
        &asset_directory,
    )?;
    let mut assets = AssetManager::new(files);
    assets.mount_asset_package(package);
    if !assets.validate_integrity() {
        anyhow::bail!("asset package does not match the files on disk");
    }

    let vertex_source = load_shader_source(&assets, "Sandbox/Shaders/triangle.vert")?;
    let fragment_source = load_shader_source(&assets, "Sandbox/Shaders/triangle.frag")?;

    // --- RHI ---
    let context = Arc::new(RhiContext::new(config.assertion_policy));
    let mut rhi: Box<dyn Rhi> = prism_infra::create_rhi_instance(&config, Arc::clone(&context))?;
    log::info!("Using RHI '{}'", rhi.name());

    let render_pass =
        rhi.create_render_pass(&RenderPassDescriptor::new(TextureFormat::R8G8B8A8, None))?;
    let swap_chain = rhi.create_swap_chain(&SwapChainDescriptor {
        label: Some("Main".into()),
        render_pass: render_pass.handle(),
        window: WindowHandle(1),
        width: 0,
        height: 0,
    })?;

    let root_signature = rhi.create_root_signature(&RootSignatureDescriptor::default())?;
    let vertex_shader = rhi.create_shader(&ShaderDescriptor {
        label: Some("Triangle VS".into()),
        stage: ShaderStage::Vertex,
        source: ShaderSource::Source(vertex_source.into()),
        entry_point: "main".into(),
    })?;
    let fragment_shader = rhi.create_shader(&ShaderDescriptor {
        label: Some("Triangle FS".into()),
        stage: ShaderStage::Fragment,
        source: ShaderSource::Source(fragment_source.into()),
        entry_point: "main".into(),
    })?;
    let program = rhi.create_graphics_program(&GraphicsProgramDescriptor {
        label: Some("Triangle".into()),
        root_signature: root_signature.handle(),
        vertex_attributes: vertex_attributes(),
        shaders: GraphicsProgramShaders::Vertex {
            vertex: vertex_shader.handle(),
            tessellation_control: None,
            tessellation_evaluation: None,
            geometry: None,
            fragment: Some(fragment_shader.handle()),
        },
    })?;
    let pipeline_state = rhi.create_graphics_pipeline_state(&GraphicsPipelineStateDescriptor::new(
        root_signature.handle(),
        program.handle(),
        vertex_attributes(),
        render_pass.handle(),
    ))?;

    let vertex_buffer = rhi
        .buffer_manager()
        .create_vertex_buffer(&BufferDescriptor::with_data(bytemuck::cast_slice(VERTICES)))?;
    let vertex_array = rhi.buffer_manager().create_vertex_array(&VertexArrayDescriptor {
        label: Some("Triangle".into()),
        vertex_attributes: vertex_attributes(),
        vertex_buffers: &[vertex_buffer.handle()],
        index_buffer: None,
    })?;

    // --- Command buffer, filled once ---
    let mut command_buffer = CommandBuffer::new();
    command_buffer.debug_event_scope("Triangle", |buffer| {
        buffer
            .set_graphics_render_target(Some(swap_chain.handle().into()))
            .clear_graphics(ClearFlags::COLOR, [0.5, 0.5, 0.5, 1.0], 1.0, 0)
            .set_graphics_root_signature(Some(root_signature.handle()))
            .set_graphics_pipeline_state(Some(pipeline_state.handle()))
            .set_graphics_vertex_array(Some(vertex_array.handle()))
            .draw_graphics(3, 1, 0, 0);
    });

    // --- Frames ---
    let profiler = LogCpuProfiler::default();
    for frame in 0..FRAMES {
        let _sample = ScopedCpuSample::new(&profiler, format!("frame {frame}"));
        if rhi.begin_scene() {
            let executed = rhi.submit_command_buffer(&command_buffer);
            rhi.end_scene();
            log::info!("Frame {frame}: executed {executed} commands");
        }
        rhi.present(swap_chain.handle())?;
    }

    let statistics = rhi.statistics();
    log::info!(
        "{} draw calls over {} scenes, {} assertions",
        statistics.draw_calls,
        statistics.scenes,
        context.assertion_count()
    );
    if config.assertion_policy == AssertPolicy::Panic && context.assertion_count() > 0 {
        anyhow::bail!("RHI assertions fired");
    }
    Ok(())
}

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
    dispatch_command_buffer, ClearFlags, CommandBuffer, CommandExecutor,
    ComputePipelineStateHandle, DrawArguments, DrawIndexedArguments, DrawMeshTasksArguments,
    DrawSource, FramebufferHandle, GraphicsPipelineStateHandle, QueryPoolHandle,
    RenderTargetHandle, ResourceGroupHandle, ResourceHandle, ResourceType, RhiContext, RhiId,
    RootSignatureHandle, ScissorRectangle, TextureHandle, TypedHandle, UniformBufferHandle,
    VertexArrayHandle, Viewport,
};
use std::sync::Arc;

/// Records the name of every executor call.
#[derive(Default)]
struct RecordingExecutor {
    context: RhiContext,
    calls: Vec<String>,
}

impl CommandExecutor for RecordingExecutor {
    fn context(&self) -> &RhiContext {
        &self.context
    }

    fn set_graphics_root_signature(&mut self, root_signature: Option<RootSignatureHandle>) {
        self.calls
            .push(format!("set_graphics_root_signature({})", root_signature.is_some()));
    }
    fn set_graphics_pipeline_state(&mut self, _: Option<GraphicsPipelineStateHandle>) {
        self.calls.push("set_graphics_pipeline_state".into());
    }
    fn set_graphics_resource_group(&mut self, index: u32, _: Option<ResourceGroupHandle>) {
        self.calls.push(format!("set_graphics_resource_group({index})"));
    }
    fn set_graphics_vertex_array(&mut self, _: Option<VertexArrayHandle>) {
        self.calls.push("set_graphics_vertex_array".into());
    }
    fn set_graphics_viewports(&mut self, viewports: &[Viewport]) {
        self.calls
            .push(format!("set_graphics_viewports({}x{})", viewports[0].width, viewports[0].height));
    }
    fn set_graphics_scissor_rectangles(&mut self, rectangles: &[ScissorRectangle]) {
        self.calls.push(format!(
            "set_graphics_scissor_rectangles({},{})",
            rectangles[0].bottom_right_x, rectangles[0].bottom_right_y
        ));
    }
    fn set_graphics_render_target(&mut self, _: Option<RenderTargetHandle>) {
        self.calls.push("set_graphics_render_target".into());
    }
    fn clear_graphics(&mut self, flags: ClearFlags, _: [f32; 4], _: f32, _: u32) {
        self.calls.push(format!("clear_graphics({})", flags.bits()));
    }
    fn draw_graphics(&mut self, source: DrawSource<'_, DrawArguments>) {
        match source {
            DrawSource::Emulated(records) => self.calls.push(format!(
                "draw_graphics({})",
                records[0].vertex_count_per_instance
            )),
            DrawSource::Indirect { number_of_draws, .. } => self
                .calls
                .push(format!("draw_graphics_indirect({number_of_draws})")),
        }
    }
    fn draw_indexed_graphics(&mut self, source: DrawSource<'_, DrawIndexedArguments>) {
        self.calls
            .push(format!("draw_indexed_graphics({})", source.number_of_draws()));
    }
    fn draw_mesh_tasks(&mut self, source: DrawSource<'_, DrawMeshTasksArguments>) {
        self.calls
            .push(format!("draw_mesh_tasks({})", source.number_of_draws()));
    }
    fn set_compute_root_signature(&mut self, _: Option<RootSignatureHandle>) {
        self.calls.push("set_compute_root_signature".into());
    }
    fn set_compute_pipeline_state(&mut self, _: Option<ComputePipelineStateHandle>) {
        self.calls.push("set_compute_pipeline_state".into());
    }
    fn set_compute_resource_group(&mut self, index: u32, _: Option<ResourceGroupHandle>) {
        self.calls.push(format!("set_compute_resource_group({index})"));
    }
    fn dispatch_compute(&mut self, x: u32, y: u32, z: u32) {
        self.calls.push(format!("dispatch_compute({x},{y},{z})"));
    }
    fn set_texture_minimum_maximum_mipmap_index(&mut self, _: TextureHandle, _: u32, _: u32) {
        self.calls.push("set_texture_minimum_maximum_mipmap_index".into());
    }
    fn resolve_multisample_framebuffer(&mut self, _: RenderTargetHandle, _: FramebufferHandle) {
        self.calls.push("resolve_multisample_framebuffer".into());
    }
    fn copy_resource(&mut self, _: ResourceHandle, _: ResourceHandle) {
        self.calls.push("copy_resource".into());
    }
    fn generate_mipmaps(&mut self, _: TextureHandle) {
        self.calls.push("generate_mipmaps".into());
    }
    fn copy_uniform_buffer_data(&mut self, _: UniformBufferHandle, data: &[u8]) {
        self.calls.push(format!("copy_uniform_buffer_data({data:?})"));
    }
    fn reset_query_pool(&mut self, _: QueryPoolHandle, _: u32, _: u32) {
        self.calls.push("reset_query_pool".into());
    }
    fn begin_query(&mut self, _: QueryPoolHandle, index: u32, _: u32) {
        self.calls.push(format!("begin_query({index})"));
    }
    fn end_query(&mut self, _: QueryPoolHandle, index: u32) {
        self.calls.push(format!("end_query({index})"));
    }
    fn write_timestamp_query(&mut self, _: QueryPoolHandle, _: u32) {
        self.calls.push("write_timestamp_query".into());
    }
    fn set_debug_marker(&mut self, name: &str) {
        self.calls.push(format!("set_debug_marker({name})"));
    }
    fn begin_debug_event(&mut self, name: &str) {
        self.calls.push(format!("begin_debug_event({name})"));
    }
    fn end_debug_event(&mut self) {
        self.calls.push("end_debug_event".into());
    }
}

fn handle<H: TypedHandle>(resource_type: ResourceType, index: u32) -> H {
    let raw = ResourceHandle::new(RhiId::from_raw(99), index, 0, resource_type);
    H::try_from_raw(raw).expect("resource type matches the handle type")
}

#[test]
fn clear_then_refill_dispatches_only_the_new_packets() {
    let mut buffer = CommandBuffer::new();
    buffer
        .set_graphics_root_signature(None)
        .dispatch_compute(1, 1, 1)
        .dispatch_compute(2, 2, 2)
        .generate_mipmaps(handle(ResourceType::Texture2D, 1));
    assert_eq!(buffer.len(), 4);

    buffer.clear();
    assert!(buffer.is_empty());
    buffer.dispatch_compute(8, 4, 1).set_graphics_vertex_array(None);

    let mut executor = RecordingExecutor::default();
    let executed = dispatch_command_buffer(&buffer, &mut executor);

    assert_eq!(executed, 2);
    assert_eq!(
        executor.calls,
        ["dispatch_compute(8,4,1)", "set_graphics_vertex_array"]
    );
}

#[test]
fn packets_are_dispatched_in_recording_order_with_their_payloads() {
    let root_signature: RootSignatureHandle = handle(ResourceType::RootSignature, 1);
    let uniform_buffer: UniformBufferHandle = handle(ResourceType::UniformBuffer, 2);

    let mut buffer = CommandBuffer::new();
    buffer
        .set_graphics_root_signature(Some(root_signature))
        .set_graphics_viewport_and_scissor_rectangle(0, 0, 640, 480)
        .clear_graphics(ClearFlags::COLOR_DEPTH, [0.0; 4], 1.0, 0)
        .copy_uniform_buffer_data(uniform_buffer, &[1, 2, 3])
        .draw_graphics(3, 1, 0, 0)
        .draw_indexed_graphics_arguments(&[
            DrawIndexedArguments::new(6),
            DrawIndexedArguments::new(12),
        ])
        .draw_graphics_indirect(handle(ResourceType::IndirectBuffer, 3), 0, 4)
        .draw_mesh_tasks(32, 0);

    let mut executor = RecordingExecutor::default();
    let executed = dispatch_command_buffer(&buffer, &mut executor);

    assert_eq!(executed, 9);
    assert_eq!(executed, buffer.len());
    assert_eq!(
        executor.calls,
        [
            "set_graphics_root_signature(true)",
            "set_graphics_viewports(640x480)",
            "set_graphics_scissor_rectangles(640,480)",
            "clear_graphics(3)",
            "copy_uniform_buffer_data([1, 2, 3])",
            "draw_graphics(3)",
            "draw_indexed_graphics(2)",
            "draw_graphics_indirect(4)",
            "draw_mesh_tasks(1)",
        ]
    );
    assert_eq!(executor.context.assertion_count(), 0);
}

#[test]
fn nested_command_buffers_run_inline_before_the_next_packet() {
    let mut inner = CommandBuffer::new();
    inner.dispatch_compute(1, 1, 1).dispatch_compute(2, 1, 1);
    let inner = Arc::new(inner);

    let mut outer = CommandBuffer::new();
    outer
        .set_compute_root_signature(None)
        .dispatch_command_buffer(Arc::clone(&inner))
        .dispatch_compute(3, 1, 1)
        .dispatch_command_buffer(inner);

    let mut executor = RecordingExecutor::default();
    let executed = dispatch_command_buffer(&outer, &mut executor);

    // 4 outer packets + 2 nested packets per nesting.
    assert_eq!(executed, 8);
    assert_eq!(
        executor.calls,
        [
            "set_compute_root_signature",
            "dispatch_compute(1,1,1)",
            "dispatch_compute(2,1,1)",
            "dispatch_compute(3,1,1)",
            "dispatch_compute(1,1,1)",
            "dispatch_compute(2,1,1)",
        ]
    );
}

#[test]
fn dispatching_an_empty_buffer_executes_nothing() {
    let buffer = CommandBuffer::new();
    let mut executor = RecordingExecutor::default();

    assert_eq!(dispatch_command_buffer(&buffer, &mut executor), 0);
    assert!(executor.calls.is_empty());
    if cfg!(debug_assertions) {
        assert_eq!(executor.context.assertion_count(), 1);
    }
}

#[cfg(feature = "debug-markers")]
#[test]
fn debug_event_scopes_wrap_their_packets() {
    let pool: QueryPoolHandle = handle(ResourceType::QueryPool, 4);
    let mut buffer = CommandBuffer::new();
    buffer
        .set_debug_marker("frame")
        .debug_event_scope("occlusion", |buffer| {
            buffer.begin_query(pool, 0, 0).end_query(pool, 0);
        });

    let mut executor = RecordingExecutor::default();
    dispatch_command_buffer(&buffer, &mut executor);

    assert_eq!(
        executor.calls,
        [
            "set_debug_marker(frame)",
            "begin_debug_event(occlusion)",
            "begin_query(0)",
            "end_query(0)",
            "end_debug_event",
        ]
    );
}

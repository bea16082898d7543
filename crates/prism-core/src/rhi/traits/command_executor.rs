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

use crate::rhi::api::{
    ClearFlags, DrawArguments, DrawIndexedArguments, DrawMeshTasksArguments, ScissorRectangle,
    Viewport,
};
use crate::rhi::command::DrawSource;
use crate::rhi::context::RhiContext;
use crate::rhi::resource::{
    ComputePipelineStateHandle, FramebufferHandle, GraphicsPipelineStateHandle, QueryPoolHandle,
    RenderTargetHandle, ResourceGroupHandle, ResourceHandle, RootSignatureHandle, TextureHandle,
    UniformBufferHandle, VertexArrayHandle,
};

/// The receiving end of command buffer dispatch.
///
/// [`dispatch_command_buffer`](crate::rhi::command::dispatch_command_buffer)
/// calls exactly one method per packet. Nested command buffers are expanded
/// by the dispatcher and never reach the executor.
pub trait CommandExecutor {
    /// The context assertions are reported to.
    fn context(&self) -> &RhiContext;

    // Graphics

    /// Binds the graphics root signature.
    fn set_graphics_root_signature(&mut self, root_signature: Option<RootSignatureHandle>);
    /// Binds the graphics pipeline state.
    fn set_graphics_pipeline_state(&mut self, pipeline_state: Option<GraphicsPipelineStateHandle>);
    /// Binds a resource group to a descriptor table of the graphics root signature.
    fn set_graphics_resource_group(
        &mut self,
        root_parameter_index: u32,
        resource_group: Option<ResourceGroupHandle>,
    );
    /// Binds the vertex array.
    fn set_graphics_vertex_array(&mut self, vertex_array: Option<VertexArrayHandle>);
    /// Sets the viewports.
    fn set_graphics_viewports(&mut self, viewports: &[Viewport]);
    /// Sets the scissor rectangles.
    fn set_graphics_scissor_rectangles(&mut self, rectangles: &[ScissorRectangle]);
    /// Binds the render target.
    fn set_graphics_render_target(&mut self, render_target: Option<RenderTargetHandle>);
    /// Clears the bound render target.
    fn clear_graphics(&mut self, flags: ClearFlags, color: [f32; 4], z: f32, stencil: u32);
    /// Non-indexed draws.
    fn draw_graphics(&mut self, source: DrawSource<'_, DrawArguments>);
    /// Indexed draws.
    fn draw_indexed_graphics(&mut self, source: DrawSource<'_, DrawIndexedArguments>);
    /// Mesh-shader draws.
    fn draw_mesh_tasks(&mut self, source: DrawSource<'_, DrawMeshTasksArguments>);

    // Compute

    /// Binds the compute root signature.
    fn set_compute_root_signature(&mut self, root_signature: Option<RootSignatureHandle>);
    /// Binds the compute pipeline state.
    fn set_compute_pipeline_state(&mut self, pipeline_state: Option<ComputePipelineStateHandle>);
    /// Binds a resource group to a descriptor table of the compute root signature.
    fn set_compute_resource_group(
        &mut self,
        root_parameter_index: u32,
        resource_group: Option<ResourceGroupHandle>,
    );
    /// Dispatches compute work groups.
    fn dispatch_compute(&mut self, group_count_x: u32, group_count_y: u32, group_count_z: u32);

    // Resource

    /// Restricts the accessible mip range of a texture.
    fn set_texture_minimum_maximum_mipmap_index(
        &mut self,
        texture: TextureHandle,
        minimum_mipmap_index: u32,
        maximum_mipmap_index: u32,
    );
    /// Resolves a multisampled framebuffer into a render target.
    fn resolve_multisample_framebuffer(
        &mut self,
        destination_render_target: RenderTargetHandle,
        source_multisample_framebuffer: FramebufferHandle,
    );
    /// Copies a whole resource.
    fn copy_resource(&mut self, destination_resource: ResourceHandle, source_resource: ResourceHandle);
    /// Generates the mip chain of a texture.
    fn generate_mipmaps(&mut self, texture: TextureHandle);
    /// Copies bytes into a uniform buffer.
    fn copy_uniform_buffer_data(&mut self, uniform_buffer: UniformBufferHandle, data: &[u8]);

    // Query

    /// Resets a range of queries.
    fn reset_query_pool(&mut self, query_pool: QueryPoolHandle, first_query_index: u32, number_of_queries: u32);
    /// Begins a query.
    fn begin_query(&mut self, query_pool: QueryPoolHandle, query_index: u32, query_control_flags: u32);
    /// Ends a query.
    fn end_query(&mut self, query_pool: QueryPoolHandle, query_index: u32);
    /// Writes a timestamp.
    fn write_timestamp_query(&mut self, query_pool: QueryPoolHandle, query_index: u32);

    // Debug

    /// Inserts a named marker.
    fn set_debug_marker(&mut self, name: &str);
    /// Opens a named debug event.
    fn begin_debug_event(&mut self, name: &str);
    /// Closes the innermost debug event.
    fn end_debug_event(&mut self);
}

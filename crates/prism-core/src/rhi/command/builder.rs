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

//! Recording methods of [`CommandBuffer`]. Each method writes exactly one packet.

use super::buffer::{Command, CommandBuffer, DrawPacket};
use crate::rhi::api::{
    ClearFlags, DrawArguments, DrawIndexedArguments, DrawMeshTasksArguments, ScissorRectangle,
    Viewport,
};
use crate::rhi::resource::{
    ComputePipelineStateHandle, FramebufferHandle, GraphicsPipelineStateHandle,
    IndirectBufferHandle, QueryPoolHandle, RenderTargetHandle, ResourceGroupHandle,
    ResourceHandle, RootSignatureHandle, TextureHandle, UniformBufferHandle, VertexArrayHandle,
};
use std::sync::Arc;

impl CommandBuffer {
    /// Records the inline execution of another command buffer.
    pub fn dispatch_command_buffer(&mut self, command_buffer: Arc<CommandBuffer>) -> &mut Self {
        self.push(Command::DispatchCommandBuffer(command_buffer));
        self
    }

    // Graphics

    /// Binds the graphics root signature, `None` to unbind.
    pub fn set_graphics_root_signature(&mut self, root_signature: Option<RootSignatureHandle>) -> &mut Self {
        self.push(Command::SetGraphicsRootSignature(root_signature));
        self
    }

    /// Binds the graphics pipeline state, `None` to unbind.
    pub fn set_graphics_pipeline_state(
        &mut self,
        pipeline_state: Option<GraphicsPipelineStateHandle>,
    ) -> &mut Self {
        self.push(Command::SetGraphicsPipelineState(pipeline_state));
        self
    }

    /// Binds a resource group to descriptor table `root_parameter_index` of the graphics root signature.
    pub fn set_graphics_resource_group(
        &mut self,
        root_parameter_index: u32,
        resource_group: Option<ResourceGroupHandle>,
    ) -> &mut Self {
        self.push(Command::SetGraphicsResourceGroup {
            root_parameter_index,
            resource_group,
        });
        self
    }

    /// Binds the vertex array, `None` to unbind.
    pub fn set_graphics_vertex_array(&mut self, vertex_array: Option<VertexArrayHandle>) -> &mut Self {
        self.push(Command::SetGraphicsVertexArray(vertex_array));
        self
    }

    /// Sets the viewports.
    pub fn set_graphics_viewports(&mut self, viewports: &[Viewport]) -> &mut Self {
        let range = self.write_records(viewports);
        self.push(Command::SetGraphicsViewports(range));
        self
    }

    /// Sets the scissor rectangles.
    pub fn set_graphics_scissor_rectangles(&mut self, rectangles: &[ScissorRectangle]) -> &mut Self {
        let range = self.write_records(rectangles);
        self.push(Command::SetGraphicsScissorRectangles(range));
        self
    }

    /// Sets one viewport and a matching scissor rectangle.
    pub fn set_graphics_viewport_and_scissor_rectangle(
        &mut self,
        top_left_x: u32,
        top_left_y: u32,
        width: u32,
        height: u32,
    ) -> &mut Self {
        let viewport = Viewport {
            top_left_x: top_left_x as f32,
            top_left_y: top_left_y as f32,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        };
        // Edges past i32::MAX clamp to it.
        let edge = |value: u32| i32::try_from(value).unwrap_or(i32::MAX);
        let rectangle = ScissorRectangle {
            top_left_x: edge(top_left_x),
            top_left_y: edge(top_left_y),
            bottom_right_x: edge(top_left_x.saturating_add(width)),
            bottom_right_y: edge(top_left_y.saturating_add(height)),
        };
        self.set_graphics_viewports(&[viewport])
            .set_graphics_scissor_rectangles(&[rectangle])
    }

    /// Binds the render target, `None` to unbind.
    pub fn set_graphics_render_target(&mut self, render_target: Option<RenderTargetHandle>) -> &mut Self {
        self.push(Command::SetGraphicsRenderTarget(render_target));
        self
    }

    /// Clears the bound render target.
    pub fn clear_graphics(&mut self, flags: ClearFlags, color: [f32; 4], z: f32, stencil: u32) -> &mut Self {
        self.push(Command::ClearGraphics {
            flags,
            color,
            z,
            stencil,
        });
        self
    }

    /// Records one emulated non-indexed draw.
    pub fn draw_graphics(
        &mut self,
        vertex_count_per_instance: u32,
        instance_count: u32,
        start_vertex_location: u32,
        start_instance_location: u32,
    ) -> &mut Self {
        self.draw_graphics_arguments(&[DrawArguments {
            vertex_count_per_instance,
            instance_count,
            start_vertex_location,
            start_instance_location,
        }])
    }

    /// Records emulated non-indexed draws, one per record.
    pub fn draw_graphics_arguments(&mut self, arguments: &[DrawArguments]) -> &mut Self {
        let range = self.write_records(arguments);
        self.push(Command::DrawGraphics(DrawPacket::Emulated(range)));
        self
    }

    /// Records non-indexed draws reading their arguments from an indirect buffer.
    pub fn draw_graphics_indirect(
        &mut self,
        indirect_buffer: IndirectBufferHandle,
        indirect_buffer_offset: u32,
        number_of_draws: u32,
    ) -> &mut Self {
        self.push(Command::DrawGraphics(DrawPacket::Indirect {
            indirect_buffer,
            indirect_buffer_offset,
            number_of_draws,
        }));
        self
    }

    /// Records one emulated indexed draw.
    pub fn draw_indexed_graphics(
        &mut self,
        index_count_per_instance: u32,
        instance_count: u32,
        start_index_location: u32,
        base_vertex_location: i32,
        start_instance_location: u32,
    ) -> &mut Self {
        self.draw_indexed_graphics_arguments(&[DrawIndexedArguments {
            index_count_per_instance,
            instance_count,
            start_index_location,
            base_vertex_location,
            start_instance_location,
        }])
    }

    /// Records emulated indexed draws, one per record.
    pub fn draw_indexed_graphics_arguments(&mut self, arguments: &[DrawIndexedArguments]) -> &mut Self {
        let range = self.write_records(arguments);
        self.push(Command::DrawIndexedGraphics(DrawPacket::Emulated(range)));
        self
    }

    /// Records indexed draws reading their arguments from an indirect buffer.
    pub fn draw_indexed_graphics_indirect(
        &mut self,
        indirect_buffer: IndirectBufferHandle,
        indirect_buffer_offset: u32,
        number_of_draws: u32,
    ) -> &mut Self {
        self.push(Command::DrawIndexedGraphics(DrawPacket::Indirect {
            indirect_buffer,
            indirect_buffer_offset,
            number_of_draws,
        }));
        self
    }

    /// Records one emulated mesh-shader draw.
    pub fn draw_mesh_tasks(&mut self, number_of_tasks: u32, first_task: u32) -> &mut Self {
        let range = self.write_records(&[DrawMeshTasksArguments {
            number_of_tasks,
            first_task,
        }]);
        self.push(Command::DrawMeshTasks(DrawPacket::Emulated(range)));
        self
    }

    /// Records mesh-shader draws reading their arguments from an indirect buffer.
    pub fn draw_mesh_tasks_indirect(
        &mut self,
        indirect_buffer: IndirectBufferHandle,
        indirect_buffer_offset: u32,
        number_of_draws: u32,
    ) -> &mut Self {
        self.push(Command::DrawMeshTasks(DrawPacket::Indirect {
            indirect_buffer,
            indirect_buffer_offset,
            number_of_draws,
        }));
        self
    }

    // Compute

    /// Binds the compute root signature, `None` to unbind.
    pub fn set_compute_root_signature(&mut self, root_signature: Option<RootSignatureHandle>) -> &mut Self {
        self.push(Command::SetComputeRootSignature(root_signature));
        self
    }

    /// Binds the compute pipeline state, `None` to unbind.
    pub fn set_compute_pipeline_state(
        &mut self,
        pipeline_state: Option<ComputePipelineStateHandle>,
    ) -> &mut Self {
        self.push(Command::SetComputePipelineState(pipeline_state));
        self
    }

    /// Binds a resource group to descriptor table `root_parameter_index` of the compute root signature.
    pub fn set_compute_resource_group(
        &mut self,
        root_parameter_index: u32,
        resource_group: Option<ResourceGroupHandle>,
    ) -> &mut Self {
        self.push(Command::SetComputeResourceGroup {
            root_parameter_index,
            resource_group,
        });
        self
    }

    /// Dispatches compute work groups.
    pub fn dispatch_compute(&mut self, group_count_x: u32, group_count_y: u32, group_count_z: u32) -> &mut Self {
        self.push(Command::DispatchCompute {
            group_count_x,
            group_count_y,
            group_count_z,
        });
        self
    }

    // Resource

    /// Restricts the accessible mip range of a texture.
    pub fn set_texture_minimum_maximum_mipmap_index(
        &mut self,
        texture: TextureHandle,
        minimum_mipmap_index: u32,
        maximum_mipmap_index: u32,
    ) -> &mut Self {
        self.push(Command::SetTextureMinimumMaximumMipmapIndex {
            texture,
            minimum_mipmap_index,
            maximum_mipmap_index,
        });
        self
    }

    /// Resolves a multisampled framebuffer into a render target.
    pub fn resolve_multisample_framebuffer(
        &mut self,
        destination_render_target: RenderTargetHandle,
        source_multisample_framebuffer: FramebufferHandle,
    ) -> &mut Self {
        self.push(Command::ResolveMultisampleFramebuffer {
            destination_render_target,
            source_multisample_framebuffer,
        });
        self
    }

    /// Copies a whole resource into another of the same type and size.
    pub fn copy_resource(
        &mut self,
        destination_resource: ResourceHandle,
        source_resource: ResourceHandle,
    ) -> &mut Self {
        self.push(Command::CopyResource {
            destination_resource,
            source_resource,
        });
        self
    }

    /// Generates the mip chain of a texture.
    pub fn generate_mipmaps(&mut self, texture: TextureHandle) -> &mut Self {
        self.push(Command::GenerateMipmaps(texture));
        self
    }

    /// Copies `data` into a uniform buffer when dispatched.
    pub fn copy_uniform_buffer_data(&mut self, uniform_buffer: UniformBufferHandle, data: &[u8]) -> &mut Self {
        let range = self.write_bytes(data);
        self.push(Command::CopyUniformBufferData {
            uniform_buffer,
            data: range,
        });
        self
    }

    // Query

    /// Resets a range of queries.
    pub fn reset_query_pool(
        &mut self,
        query_pool: QueryPoolHandle,
        first_query_index: u32,
        number_of_queries: u32,
    ) -> &mut Self {
        self.push(Command::ResetQueryPool {
            query_pool,
            first_query_index,
            number_of_queries,
        });
        self
    }

    /// Begins a query.
    pub fn begin_query(&mut self, query_pool: QueryPoolHandle, query_index: u32, query_control_flags: u32) -> &mut Self {
        self.push(Command::BeginQuery {
            query_pool,
            query_index,
            query_control_flags,
        });
        self
    }

    /// Ends a query.
    pub fn end_query(&mut self, query_pool: QueryPoolHandle, query_index: u32) -> &mut Self {
        self.push(Command::EndQuery {
            query_pool,
            query_index,
        });
        self
    }

    /// Writes a timestamp.
    pub fn write_timestamp_query(&mut self, query_pool: QueryPoolHandle, query_index: u32) -> &mut Self {
        self.push(Command::WriteTimestampQuery {
            query_pool,
            query_index,
        });
        self
    }

    // Debug

    /// Inserts a named marker. Records nothing without the `debug-markers` feature.
    pub fn set_debug_marker(&mut self, name: &str) -> &mut Self {
        if cfg!(feature = "debug-markers") {
            let range = self.write_bytes(name.as_bytes());
            self.push(Command::SetDebugMarker(range));
        }
        self
    }

    /// Opens a named debug event. Records nothing without the `debug-markers` feature.
    pub fn begin_debug_event(&mut self, name: &str) -> &mut Self {
        if cfg!(feature = "debug-markers") {
            let range = self.write_bytes(name.as_bytes());
            self.push(Command::BeginDebugEvent(range));
        }
        self
    }

    /// Closes the innermost debug event. Records nothing without the `debug-markers` feature.
    pub fn end_debug_event(&mut self) -> &mut Self {
        if cfg!(feature = "debug-markers") {
            self.push(Command::EndDebugEvent);
        }
        self
    }

    /// Records `record` between a begin and an end debug event.
    pub fn debug_event_scope<F>(&mut self, name: &str, record: F) -> &mut Self
    where
        F: FnOnce(&mut CommandBuffer),
    {
        self.begin_debug_event(name);
        record(self);
        self.end_debug_event()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rhi::command::CommandId;

    #[test]
    fn each_builder_writes_one_packet() {
        let mut buffer = CommandBuffer::new();
        buffer
            .clear_graphics(ClearFlags::COLOR, [0.5; 4], 1.0, 0)
            .set_graphics_root_signature(None)
            .draw_graphics(3, 1, 0, 0)
            .dispatch_compute(8, 8, 1);
        let ids: Vec<CommandId> = buffer.commands().iter().map(Command::id).collect();
        assert_eq!(
            ids,
            vec![
                CommandId::ClearGraphics,
                CommandId::SetGraphicsRootSignature,
                CommandId::DrawGraphics,
                CommandId::DispatchCompute,
            ]
        );
    }

    #[test]
    fn viewport_and_scissor_helper_writes_two_packets() {
        let mut buffer = CommandBuffer::new();
        buffer.set_graphics_viewport_and_scissor_rectangle(0, 0, 800, 600);
        assert_eq!(buffer.len(), 2);
        let Command::SetGraphicsScissorRectangles(range) = buffer.commands()[1] else {
            panic!("expected a scissor rectangle packet");
        };
        let rectangles = buffer.auxiliary_records::<ScissorRectangle>(range);
        assert_eq!(rectangles[0].bottom_right_x, 800);
    }

    #[test]
    fn oversized_scissor_rectangles_clamp_instead_of_wrapping() {
        let mut buffer = CommandBuffer::new();
        buffer.set_graphics_viewport_and_scissor_rectangle(16, 8, u32::MAX, 600);
        let Command::SetGraphicsScissorRectangles(range) = buffer.commands()[1] else {
            panic!("expected a scissor rectangle packet");
        };
        let rectangle = buffer.auxiliary_records::<ScissorRectangle>(range)[0];
        assert_eq!(rectangle.top_left_x, 16);
        assert_eq!(rectangle.bottom_right_x, i32::MAX);
        assert_eq!(rectangle.bottom_right_y, 608);
    }

    #[test]
    #[cfg(feature = "debug-markers")]
    fn debug_event_scope_brackets_the_recorded_commands() {
        let mut buffer = CommandBuffer::new();
        buffer.debug_event_scope("Shadow pass", |buffer| {
            buffer.draw_graphics(3, 1, 0, 0);
        });
        let ids: Vec<CommandId> = buffer.commands().iter().map(Command::id).collect();
        assert_eq!(
            ids,
            vec![
                CommandId::BeginDebugEvent,
                CommandId::DrawGraphics,
                CommandId::EndDebugEvent,
            ]
        );
        let Command::BeginDebugEvent(range) = buffer.commands()[0] else {
            panic!("expected a debug event packet");
        };
        assert_eq!(buffer.auxiliary_str(range), "Shadow pass");
    }
}

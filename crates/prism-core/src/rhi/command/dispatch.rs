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

//! Replays a command buffer against a [`CommandExecutor`].

use super::buffer::{Command, CommandBuffer, DrawPacket};
use crate::rhi::resource::IndirectBufferHandle;
use crate::rhi::traits::CommandExecutor;
use crate::rhi_assert;

/// The arguments of a draw, as handed to a [`CommandExecutor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawSource<'a, T> {
    /// Argument records read from the command buffer, one draw each.
    Emulated(&'a [T]),
    /// Argument records read from an indirect buffer.
    Indirect {
        /// The indirect buffer.
        indirect_buffer: IndirectBufferHandle,
        /// Byte offset of the first record.
        indirect_buffer_offset: u32,
        /// Number of consecutive records.
        number_of_draws: u32,
    },
}

impl<T> DrawSource<'_, T> {
    /// Number of draws described.
    pub fn number_of_draws(&self) -> u32 {
        match self {
            DrawSource::Emulated(records) => records.len() as u32,
            DrawSource::Indirect {
                number_of_draws, ..
            } => *number_of_draws,
        }
    }
}

fn draw_source<'a, T: bytemuck::Pod>(command_buffer: &'a CommandBuffer, packet: DrawPacket) -> DrawSource<'a, T> {
    match packet {
        DrawPacket::Emulated(range) => DrawSource::Emulated(command_buffer.auxiliary_records(range)),
        DrawPacket::Indirect {
            indirect_buffer,
            indirect_buffer_offset,
            number_of_draws,
        } => DrawSource::Indirect {
            indirect_buffer,
            indirect_buffer_offset,
            number_of_draws,
        },
    }
}

/// Executes every packet of `command_buffer`, in recording order, against `executor`.
///
/// A nested [`Command::DispatchCommandBuffer`] is expanded inline: the nested
/// buffer runs to completion before the next packet of the outer buffer.
/// Returns the number of packets executed, nested packets and the nesting
/// packets themselves included. Dispatching an empty buffer fires an RHI
/// assertion and executes nothing.
pub fn dispatch_command_buffer<E>(command_buffer: &CommandBuffer, executor: &mut E) -> usize
where
    E: CommandExecutor + ?Sized,
{
    if !rhi_assert!(
        executor.context(),
        !command_buffer.is_empty(),
        "Dispatching an empty command buffer"
    ) {
        return 0;
    }

    let mut executed = 0;
    for command in command_buffer.commands() {
        log::trace!("Dispatching {:?}", command.id());
        executed += 1;
        match command {
            Command::DispatchCommandBuffer(nested) => {
                executed += dispatch_command_buffer(nested, executor);
            }
            Command::SetGraphicsRootSignature(root_signature) => {
                executor.set_graphics_root_signature(*root_signature)
            }
            Command::SetGraphicsPipelineState(pipeline_state) => {
                executor.set_graphics_pipeline_state(*pipeline_state)
            }
            Command::SetGraphicsResourceGroup {
                root_parameter_index,
                resource_group,
            } => executor.set_graphics_resource_group(*root_parameter_index, *resource_group),
            Command::SetGraphicsVertexArray(vertex_array) => {
                executor.set_graphics_vertex_array(*vertex_array)
            }
            Command::SetGraphicsViewports(range) => {
                executor.set_graphics_viewports(command_buffer.auxiliary_records(*range))
            }
            Command::SetGraphicsScissorRectangles(range) => {
                executor.set_graphics_scissor_rectangles(command_buffer.auxiliary_records(*range))
            }
            Command::SetGraphicsRenderTarget(render_target) => {
                executor.set_graphics_render_target(*render_target)
            }
            Command::ClearGraphics {
                flags,
                color,
                z,
                stencil,
            } => executor.clear_graphics(*flags, *color, *z, *stencil),
            Command::DrawGraphics(packet) => {
                executor.draw_graphics(draw_source(command_buffer, *packet))
            }
            Command::DrawIndexedGraphics(packet) => {
                executor.draw_indexed_graphics(draw_source(command_buffer, *packet))
            }
            Command::DrawMeshTasks(packet) => {
                executor.draw_mesh_tasks(draw_source(command_buffer, *packet))
            }
            Command::SetComputeRootSignature(root_signature) => {
                executor.set_compute_root_signature(*root_signature)
            }
            Command::SetComputePipelineState(pipeline_state) => {
                executor.set_compute_pipeline_state(*pipeline_state)
            }
            Command::SetComputeResourceGroup {
                root_parameter_index,
                resource_group,
            } => executor.set_compute_resource_group(*root_parameter_index, *resource_group),
            Command::DispatchCompute {
                group_count_x,
                group_count_y,
                group_count_z,
            } => executor.dispatch_compute(*group_count_x, *group_count_y, *group_count_z),
            Command::SetTextureMinimumMaximumMipmapIndex {
                texture,
                minimum_mipmap_index,
                maximum_mipmap_index,
            } => executor.set_texture_minimum_maximum_mipmap_index(
                *texture,
                *minimum_mipmap_index,
                *maximum_mipmap_index,
            ),
            Command::ResolveMultisampleFramebuffer {
                destination_render_target,
                source_multisample_framebuffer,
            } => executor.resolve_multisample_framebuffer(
                *destination_render_target,
                *source_multisample_framebuffer,
            ),
            Command::CopyResource {
                destination_resource,
                source_resource,
            } => executor.copy_resource(*destination_resource, *source_resource),
            Command::GenerateMipmaps(texture) => executor.generate_mipmaps(*texture),
            Command::CopyUniformBufferData {
                uniform_buffer,
                data,
            } => executor.copy_uniform_buffer_data(*uniform_buffer, command_buffer.auxiliary_bytes(*data)),
            Command::ResetQueryPool {
                query_pool,
                first_query_index,
                number_of_queries,
            } => executor.reset_query_pool(*query_pool, *first_query_index, *number_of_queries),
            Command::BeginQuery {
                query_pool,
                query_index,
                query_control_flags,
            } => executor.begin_query(*query_pool, *query_index, *query_control_flags),
            Command::EndQuery {
                query_pool,
                query_index,
            } => executor.end_query(*query_pool, *query_index),
            Command::WriteTimestampQuery {
                query_pool,
                query_index,
            } => executor.write_timestamp_query(*query_pool, *query_index),
            Command::SetDebugMarker(range) => {
                executor.set_debug_marker(command_buffer.auxiliary_str(*range))
            }
            Command::BeginDebugEvent(range) => {
                executor.begin_debug_event(command_buffer.auxiliary_str(*range))
            }
            Command::EndDebugEvent => executor.end_debug_event(),
        }
    }
    executed
}

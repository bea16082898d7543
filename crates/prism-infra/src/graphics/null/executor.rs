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

//! Command execution for the Null RHI.
//!
//! Every packet is validated, recorded in the command history and, where the
//! CPU can observe it, applied to the shadow resources.

use super::resources::{BufferElement, NullResource};
use super::rhi::NullRhi;
use super::state::{rebind, ResourceGroupSlots};
use prism_core::rhi::{
    ClearFlags, CommandExecutor, CommandId, ComputePipelineStateHandle, DrawArguments,
    DrawIndexedArguments, DrawMeshTasksArguments, DrawSource, FramebufferHandle,
    GraphicsPipelineStateHandle, QueryPoolHandle, QueryType, RenderTargetHandle,
    ResourceGroupHandle, ResourceHandle, ResourceRef, RhiContext, RootSignatureHandle,
    ScissorRectangle, TextureHandle, TypedHandle, UniformBufferHandle, VertexArrayHandle,
    Viewport,
};
use prism_core::rhi_assert;

/// Which track a binding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Track {
    Graphics,
    Compute,
}

impl NullRhi {
    fn record(&mut self, id: CommandId) {
        self.command_history.push(id);
    }

    /// `true` for `None` and live handles; fires an assertion otherwise.
    fn bindable<H: TypedHandle>(&self, handle: Option<H>) -> bool {
        let Some(handle) = handle else {
            return true;
        };
        let live = self.shared.resources().contains(handle.raw());
        rhi_assert!(
            self.shared.context,
            live,
            "Binding {} {:?} which is not a live resource of this RHI",
            H::KIND,
            handle.raw()
        )
    }

    fn bind_resource_group(
        &mut self,
        track: Track,
        root_parameter_index: u32,
        resource_group: Option<ResourceGroupHandle>,
    ) {
        let root_signature = match track {
            Track::Graphics => self.graphics.root_signature.as_ref(),
            Track::Compute => self.compute.root_signature.as_ref(),
        }
        .map(ResourceRef::handle);
        let Some(root_signature) = root_signature else {
            rhi_assert!(
                self.shared.context,
                false,
                "Binding a {track:?} resource group without a root signature"
            );
            return;
        };
        if !self.bindable(resource_group) {
            return;
        }

        let valid = {
            let resources = self.shared.resources();
            let table = resources
                .get(root_signature.into())
                .ok()
                .and_then(NullResource::as_root_signature)
                .map(|data| {
                    (
                        data.parameters.len(),
                        data.descriptor_ranges(root_parameter_index),
                    )
                });
            let (number_of_parameters, ranges) = table.unwrap_or((0, None));

            // Unbinding only needs the index to be in range.
            rhi_assert!(
                self.shared.context,
                (root_parameter_index as usize) < number_of_parameters,
                "Root parameter {root_parameter_index} is out of range, the root signature has {number_of_parameters}"
            ) && resource_group.map_or(true, |resource_group| {
                let group = resources
                    .get(resource_group.into())
                    .ok()
                    .and_then(NullResource::as_resource_group);
                rhi_assert!(
                    self.shared.context,
                    ranges.is_some(),
                    "Root parameter {root_parameter_index} is not a descriptor table"
                ) && rhi_assert!(
                    self.shared.context,
                    group.is_some_and(|group| Some(group.ranges.as_slice()) == ranges),
                    "{resource_group} does not match the descriptor table of root parameter {root_parameter_index}"
                )
            })
        };
        if !valid {
            return;
        }

        let counter = std::sync::Arc::clone(&self.counter);
        let slots: &mut ResourceGroupSlots = match track {
            Track::Graphics => &mut self.graphics.resource_groups,
            Track::Compute => &mut self.compute.resource_groups,
        };
        rebind(slots.slot(root_parameter_index), resource_group, &counter);
    }

    /// Checks the indirect buffer of a draw holds every record it reads.
    fn check_draw_source<T>(&self, source: &DrawSource<'_, T>) -> bool {
        let &DrawSource::Indirect {
            indirect_buffer,
            indirect_buffer_offset,
            number_of_draws,
        } = source
        else {
            return rhi_assert!(
                self.shared.context,
                source.number_of_draws() > 0,
                "Emulated draw without arguments"
            );
        };
        let resources = self.shared.resources();
        let length = resources
            .get(indirect_buffer.into())
            .ok()
            .and_then(NullResource::as_buffer)
            .filter(|buffer| matches!(buffer.element, BufferElement::Indirect(_)))
            .map(|buffer| buffer.contents.len() as u64);
        let Some(length) = length else {
            return rhi_assert!(
                self.shared.context,
                false,
                "{indirect_buffer} is not a live indirect buffer"
            );
        };
        let end = u64::from(indirect_buffer_offset)
            + u64::from(number_of_draws) * std::mem::size_of::<T>() as u64;
        rhi_assert!(
            self.shared.context,
            number_of_draws > 0 && end <= length,
            "Indirect draw reads bytes {indirect_buffer_offset}..{end} of {indirect_buffer}, which holds {length}"
        )
    }

    fn check_graphics_pipeline_bound(&self) -> bool {
        let root_signature_bound = rhi_assert!(
            self.shared.context,
            self.graphics.root_signature.is_some(),
            "Drawing without a graphics root signature"
        );
        root_signature_bound
            && rhi_assert!(
                self.shared.context,
                self.graphics.pipeline_state.is_some(),
                "Drawing without a graphics pipeline state"
            )
    }

    fn check_query(&self, query_pool: QueryPoolHandle, query_index: u32) -> Option<QueryType> {
        let resources = self.shared.resources();
        let pool = resources
            .get(query_pool.into())
            .ok()
            .and_then(NullResource::as_query_pool);
        let Some(pool) = pool else {
            rhi_assert!(self.shared.context, false, "{query_pool} is not a live query pool");
            return None;
        };
        let in_range = rhi_assert!(
            self.shared.context,
            query_index < pool.number_of_queries,
            "Query {query_index} is out of range, {query_pool} holds {}",
            pool.number_of_queries
        );
        in_range.then_some(pool.query_type)
    }
}

impl CommandExecutor for NullRhi {
    fn context(&self) -> &RhiContext {
        &self.shared.context
    }

    fn set_graphics_root_signature(&mut self, root_signature: Option<RootSignatureHandle>) {
        self.record(CommandId::SetGraphicsRootSignature);
        if !self.bindable(root_signature) {
            return;
        }
        if rebind(&mut self.graphics.root_signature, root_signature, &self.counter) {
            self.graphics.resource_groups.clear();
        }
    }

    fn set_graphics_pipeline_state(&mut self, pipeline_state: Option<GraphicsPipelineStateHandle>) {
        self.record(CommandId::SetGraphicsPipelineState);
        if self.bindable(pipeline_state) {
            rebind(&mut self.graphics.pipeline_state, pipeline_state, &self.counter);
        }
    }

    fn set_graphics_resource_group(
        &mut self,
        root_parameter_index: u32,
        resource_group: Option<ResourceGroupHandle>,
    ) {
        self.record(CommandId::SetGraphicsResourceGroup);
        self.bind_resource_group(Track::Graphics, root_parameter_index, resource_group);
    }

    fn set_graphics_vertex_array(&mut self, vertex_array: Option<VertexArrayHandle>) {
        self.record(CommandId::SetGraphicsVertexArray);
        if self.bindable(vertex_array) {
            rebind(&mut self.graphics.vertex_array, vertex_array, &self.counter);
        }
    }

    fn set_graphics_viewports(&mut self, viewports: &[Viewport]) {
        self.record(CommandId::SetGraphicsViewports);
        let maximum = self.shared.capabilities.maximum_number_of_viewports as usize;
        if rhi_assert!(
            self.shared.context,
            !viewports.is_empty() && viewports.len() <= maximum,
            "{} viewports, between 1 and {maximum} are supported",
            viewports.len()
        ) {
            self.graphics.viewports = viewports.to_vec();
        }
    }

    fn set_graphics_scissor_rectangles(&mut self, rectangles: &[ScissorRectangle]) {
        self.record(CommandId::SetGraphicsScissorRectangles);
        let maximum = self.shared.capabilities.maximum_number_of_viewports as usize;
        if rhi_assert!(
            self.shared.context,
            !rectangles.is_empty() && rectangles.len() <= maximum,
            "{} scissor rectangles, between 1 and {maximum} are supported",
            rectangles.len()
        ) {
            self.graphics.scissor_rectangles = rectangles.to_vec();
        }
    }

    fn set_graphics_render_target(&mut self, render_target: Option<RenderTargetHandle>) {
        self.record(CommandId::SetGraphicsRenderTarget);
        if self.bindable(render_target) {
            rebind(&mut self.graphics.render_target, render_target, &self.counter);
        }
    }

    fn clear_graphics(&mut self, flags: ClearFlags, color: [f32; 4], z: f32, stencil: u32) {
        self.record(CommandId::ClearGraphics);
        if !rhi_assert!(self.shared.context, !flags.is_empty(), "Clearing nothing") {
            return;
        }
        rhi_assert!(
            self.shared.context,
            (0.0..=1.0).contains(&z),
            "Clear depth {z} is outside [0, 1]"
        );
        log::trace!(
            "NullRhi: Clear {flags:?} of {} to {color:?}, z {z}, stencil {stencil}",
            self.graphics
                .render_target
                .as_ref()
                .map_or_else(|| "the back buffer".to_owned(), |target| target.handle().to_string())
        );
    }

    fn draw_graphics(&mut self, source: DrawSource<'_, DrawArguments>) {
        self.record(CommandId::DrawGraphics);
        if self.check_graphics_pipeline_bound() && self.check_draw_source(&source) {
            self.counters.draw_calls += u64::from(source.number_of_draws());
        }
    }

    fn draw_indexed_graphics(&mut self, source: DrawSource<'_, DrawIndexedArguments>) {
        self.record(CommandId::DrawIndexedGraphics);
        if !self.check_graphics_pipeline_bound() {
            return;
        }
        let vertex_array = self.graphics.vertex_array.as_ref().map(ResourceRef::handle);
        let has_index_buffer = vertex_array.is_some_and(|vertex_array| {
            self.shared
                .resources()
                .get(vertex_array.into())
                .ok()
                .and_then(NullResource::as_vertex_array)
                .is_some_and(|data| data.index_buffer.is_some())
        });
        if rhi_assert!(
            self.shared.context,
            has_index_buffer,
            "Indexed draw without a vertex array holding an index buffer"
        ) && self.check_draw_source(&source)
        {
            self.counters.draw_calls += u64::from(source.number_of_draws());
        }
    }

    fn draw_mesh_tasks(&mut self, source: DrawSource<'_, DrawMeshTasksArguments>) {
        self.record(CommandId::DrawMeshTasks);
        if rhi_assert!(
            self.shared.context,
            self.shared.capabilities.mesh_shader,
            "Mesh shaders are not supported"
        ) && self.check_graphics_pipeline_bound()
            && self.check_draw_source(&source)
        {
            self.counters.draw_calls += u64::from(source.number_of_draws());
        }
    }

    fn set_compute_root_signature(&mut self, root_signature: Option<RootSignatureHandle>) {
        self.record(CommandId::SetComputeRootSignature);
        if !self.bindable(root_signature) {
            return;
        }
        if rebind(&mut self.compute.root_signature, root_signature, &self.counter) {
            self.compute.resource_groups.clear();
        }
    }

    fn set_compute_pipeline_state(&mut self, pipeline_state: Option<ComputePipelineStateHandle>) {
        self.record(CommandId::SetComputePipelineState);
        if self.bindable(pipeline_state) {
            rebind(&mut self.compute.pipeline_state, pipeline_state, &self.counter);
        }
    }

    fn set_compute_resource_group(
        &mut self,
        root_parameter_index: u32,
        resource_group: Option<ResourceGroupHandle>,
    ) {
        self.record(CommandId::SetComputeResourceGroup);
        self.bind_resource_group(Track::Compute, root_parameter_index, resource_group);
    }

    fn dispatch_compute(&mut self, group_count_x: u32, group_count_y: u32, group_count_z: u32) {
        self.record(CommandId::DispatchCompute);
        if rhi_assert!(
            self.shared.context,
            self.compute.root_signature.is_some() && self.compute.pipeline_state.is_some(),
            "Dispatching without a compute root signature and pipeline state"
        ) && rhi_assert!(
            self.shared.context,
            group_count_x > 0 && group_count_y > 0 && group_count_z > 0,
            "Empty dispatch {group_count_x}x{group_count_y}x{group_count_z}"
        ) {
            self.counters.compute_dispatches += 1;
        }
    }

    fn set_texture_minimum_maximum_mipmap_index(
        &mut self,
        texture: TextureHandle,
        minimum_mipmap_index: u32,
        maximum_mipmap_index: u32,
    ) {
        self.record(CommandId::SetTextureMinimumMaximumMipmapIndex);
        let mut resources = self.shared.resources();
        let Some(data) = resources
            .get_mut(texture.into())
            .ok()
            .and_then(NullResource::as_texture_mut)
        else {
            rhi_assert!(self.shared.context, false, "{texture} is not a live texture");
            return;
        };
        if rhi_assert!(
            self.shared.context,
            minimum_mipmap_index <= maximum_mipmap_index
                && maximum_mipmap_index < data.number_of_mipmaps,
            "Mip range {minimum_mipmap_index}..={maximum_mipmap_index} is invalid for {texture} with {} mipmaps",
            data.number_of_mipmaps
        ) {
            data.minimum_mipmap_index = minimum_mipmap_index;
            data.maximum_mipmap_index = maximum_mipmap_index;
        }
    }

    fn resolve_multisample_framebuffer(
        &mut self,
        destination_render_target: RenderTargetHandle,
        source_multisample_framebuffer: FramebufferHandle,
    ) {
        self.record(CommandId::ResolveMultisampleFramebuffer);
        let resources = self.shared.resources();
        let multisamples = resources
            .get(source_multisample_framebuffer.into())
            .ok()
            .and_then(NullResource::as_framebuffer)
            .map(|framebuffer| framebuffer.number_of_multisamples);
        rhi_assert!(
            self.shared.context,
            multisamples.is_some_and(|samples| samples > 1),
            "{source_multisample_framebuffer} is not a live multisample framebuffer"
        );
        rhi_assert!(
            self.shared.context,
            resources.contains(destination_render_target.into()),
            "{destination_render_target} is not a live render target"
        );
    }

    fn copy_resource(&mut self, destination_resource: ResourceHandle, source_resource: ResourceHandle) {
        self.record(CommandId::CopyResource);
        let mut resources = self.shared.resources();

        let source_contents = resources
            .get(source_resource)
            .ok()
            .and_then(NullResource::as_buffer)
            .map(|buffer| buffer.contents.clone());
        if let Some(contents) = source_contents {
            let destination = resources
                .get_mut(destination_resource)
                .ok()
                .and_then(NullResource::as_buffer_mut);
            match destination {
                Some(destination) if destination.contents.len() == contents.len() => {
                    destination.contents.copy_from_slice(&contents);
                }
                _ => {
                    rhi_assert!(
                        self.shared.context,
                        false,
                        "{destination_resource} is not a buffer of the size of {source_resource}"
                    );
                }
            }
            return;
        }

        let source = resources
            .get(source_resource)
            .ok()
            .and_then(NullResource::as_texture)
            .map(|texture| (texture.layout, texture.format));
        let destination = resources
            .get(destination_resource)
            .ok()
            .and_then(NullResource::as_texture)
            .map(|texture| (texture.layout, texture.format));
        rhi_assert!(
            self.shared.context,
            source.is_some() && source == destination,
            "Cannot copy {source_resource} into {destination_resource}"
        );
    }

    fn generate_mipmaps(&mut self, texture: TextureHandle) {
        self.record(CommandId::GenerateMipmaps);
        let mipmap_generation = self.shared.capabilities.mipmap_generation;
        let mut resources = self.shared.resources();
        let Some(data) = resources
            .get_mut(texture.into())
            .ok()
            .and_then(NullResource::as_texture_mut)
        else {
            rhi_assert!(self.shared.context, false, "{texture} is not a live texture");
            return;
        };
        if rhi_assert!(
            self.shared.context,
            mipmap_generation,
            "Mipmap generation is not supported"
        ) {
            data.mipmaps_generated = true;
            data.uploaded_mipmaps = (0..data.number_of_mipmaps).collect();
        }
    }

    fn copy_uniform_buffer_data(&mut self, uniform_buffer: UniformBufferHandle, data: &[u8]) {
        self.record(CommandId::CopyUniformBufferData);
        let mut resources = self.shared.resources();
        let buffer = resources
            .get_mut(uniform_buffer.into())
            .ok()
            .and_then(NullResource::as_buffer_mut);
        match buffer {
            Some(buffer) if data.len() <= buffer.contents.len() => {
                buffer.contents[..data.len()].copy_from_slice(data);
            }
            Some(buffer) => {
                rhi_assert!(
                    self.shared.context,
                    false,
                    "Copying {} bytes into {uniform_buffer} of {} bytes",
                    data.len(),
                    buffer.contents.len()
                );
            }
            None => {
                rhi_assert!(self.shared.context, false, "{uniform_buffer} is not a live uniform buffer");
            }
        }
    }

    fn reset_query_pool(&mut self, query_pool: QueryPoolHandle, first_query_index: u32, number_of_queries: u32) {
        self.record(CommandId::ResetQueryPool);
        let Some(end) = first_query_index.checked_add(number_of_queries) else {
            rhi_assert!(self.shared.context, false, "Query range of {query_pool} overflows");
            return;
        };
        if number_of_queries == 0 {
            return;
        }
        if self.check_query(query_pool, end - 1).is_some() {
            let range = first_query_index..end;
            rhi_assert!(
                self.shared.context,
                !self
                    .open_queries
                    .iter()
                    .any(|(pool, index)| *pool == query_pool && range.contains(index)),
                "Resetting queries of {query_pool} that are still open"
            );
        }
    }

    fn begin_query(&mut self, query_pool: QueryPoolHandle, query_index: u32, query_control_flags: u32) {
        self.record(CommandId::BeginQuery);
        let Some(query_type) = self.check_query(query_pool, query_index) else {
            return;
        };
        if !rhi_assert!(
            self.shared.context,
            query_type != QueryType::Timestamp,
            "Timestamp queries are written, not begun"
        ) {
            return;
        }
        let opened = self.open_queries.insert((query_pool, query_index));
        rhi_assert!(
            self.shared.context,
            opened,
            "Query {query_index} of {query_pool} is already open"
        );
        log::trace!("NullRhi: Began query {query_index} of {query_pool} ({query_control_flags:#x})");
    }

    fn end_query(&mut self, query_pool: QueryPoolHandle, query_index: u32) {
        self.record(CommandId::EndQuery);
        if self.check_query(query_pool, query_index).is_none() {
            return;
        }
        let closed = self.open_queries.remove(&(query_pool, query_index));
        rhi_assert!(
            self.shared.context,
            closed,
            "Query {query_index} of {query_pool} was never begun"
        );
    }

    fn write_timestamp_query(&mut self, query_pool: QueryPoolHandle, query_index: u32) {
        self.record(CommandId::WriteTimestampQuery);
        if let Some(query_type) = self.check_query(query_pool, query_index) {
            rhi_assert!(
                self.shared.context,
                query_type == QueryType::Timestamp,
                "{query_pool} does not hold timestamp queries"
            );
        }
    }

    fn set_debug_marker(&mut self, name: &str) {
        self.record(CommandId::SetDebugMarker);
        log::trace!("NullRhi: Marker '{name}'");
    }

    fn begin_debug_event(&mut self, name: &str) {
        self.record(CommandId::BeginDebugEvent);
        self.debug_event_depth += 1;
        log::trace!("NullRhi: Begin event '{name}' (depth {})", self.debug_event_depth);
    }

    fn end_debug_event(&mut self) {
        self.record(CommandId::EndDebugEvent);
        if rhi_assert!(
            self.shared.context,
            self.debug_event_depth > 0,
            "Ending a debug event that was never begun"
        ) {
            self.debug_event_depth -= 1;
        }
    }
}

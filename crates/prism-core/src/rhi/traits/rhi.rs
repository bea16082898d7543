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

use super::{BufferManager, CommandExecutor, TextureManager};
use crate::rhi::api::{
    BackendType, Capabilities, ComputePipelineStateDescriptor, FramebufferDescriptor,
    GraphicsPipelineStateDescriptor, GraphicsProgramDescriptor, MapType, MappedSubresource,
    QueryPoolDescriptor, QueryResultFlags, RenderPassDescriptor, ResourceGroupDescriptor,
    RhiStatistics, RootSignatureDescriptor, SamplerState, ShaderDescriptor, SwapChainDescriptor,
};
use crate::rhi::command::CommandBuffer;
use crate::rhi::error::ResourceError;
use crate::rhi::resource::{
    ComputePipelineStateHandle, FramebufferHandle, GraphicsPipelineStateHandle,
    GraphicsProgramHandle, QueryPoolHandle, ReferenceCounter, RenderPassHandle,
    ResourceGroupHandle, ResourceHandle, ResourceRef, RhiId, RootSignatureHandle,
    SamplerStateHandle, ShaderHandle, SwapChainHandle,
};
use std::fmt::Debug;
use std::sync::Arc;

/// The dynamic rendering hardware interface.
///
/// One implementation per backend. An RHI owns every resource it creates:
/// handles carry the RHI's [`RhiId`] and are refused by any other instance.
/// Resource factories take `&self`; command execution takes `&mut self`
/// because it updates the bound state.
pub trait Rhi: CommandExecutor + Send + Sync + Debug {
    /// The identity of this RHI instance, stamped into every handle it creates.
    fn id(&self) -> RhiId;

    /// The backend this RHI drives.
    fn backend_type(&self) -> BackendType;

    /// A human readable backend name, for logs.
    fn name(&self) -> &str;

    /// What the backend supports.
    fn capabilities(&self) -> &Capabilities;

    /// A snapshot of the resource and command counters.
    fn statistics(&self) -> RhiStatistics;

    /// Creates a render pass.
    /// ## Arguments
    /// * `descriptor` - The attachment formats and sample count.
    /// ## Returns
    /// A reference to the new render pass.
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - If there are too many color attachments.
    fn create_render_pass(
        &self,
        descriptor: &RenderPassDescriptor<'_>,
    ) -> Result<ResourceRef<RenderPassHandle>, ResourceError>;

    /// Creates a query pool.
    fn create_query_pool(
        &self,
        descriptor: &QueryPoolDescriptor<'_>,
    ) -> Result<ResourceRef<QueryPoolHandle>, ResourceError>;

    /// Creates a swap chain presenting into a native window.
    /// The swap chain keeps a reference on its render pass.
    fn create_swap_chain(
        &self,
        descriptor: &SwapChainDescriptor<'_>,
    ) -> Result<ResourceRef<SwapChainHandle>, ResourceError>;

    /// Creates a framebuffer.
    /// The framebuffer keeps a reference on its render pass and on every attached texture.
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - If the attachments do not match the render pass.
    fn create_framebuffer(
        &self,
        descriptor: &FramebufferDescriptor<'_>,
    ) -> Result<ResourceRef<FramebufferHandle>, ResourceError>;

    /// Creates a root signature.
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - If a descriptor table is malformed.
    fn create_root_signature(
        &self,
        descriptor: &RootSignatureDescriptor<'_>,
    ) -> Result<ResourceRef<RootSignatureHandle>, ResourceError>;

    /// Creates a resource group for one descriptor table of a root signature.
    /// The group keeps a reference on its root signature, resources and sampler states.
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - If the resources do not match the table's ranges.
    fn create_resource_group(
        &self,
        descriptor: &ResourceGroupDescriptor<'_>,
    ) -> Result<ResourceRef<ResourceGroupHandle>, ResourceError>;

    /// Creates a graphics pipeline state.
    /// On failure, the references taken on the root signature, program and
    /// render pass are given back before returning.
    /// ## Errors
    /// * `ResourceError::Pipeline` - On topology, render target or ID pool failures.
    fn create_graphics_pipeline_state(
        &self,
        descriptor: &GraphicsPipelineStateDescriptor<'_>,
    ) -> Result<ResourceRef<GraphicsPipelineStateHandle>, ResourceError>;

    /// Creates a compute pipeline state.
    fn create_compute_pipeline_state(
        &self,
        descriptor: &ComputePipelineStateDescriptor<'_>,
    ) -> Result<ResourceRef<ComputePipelineStateHandle>, ResourceError>;

    /// Creates a sampler state.
    fn create_sampler_state(
        &self,
        sampler_state: &SamplerState,
    ) -> Result<ResourceRef<SamplerStateHandle>, ResourceError>;

    /// Creates a shader for one pipeline stage.
    /// ## Errors
    /// * `ResourceError::Unsupported` - If the backend lacks the stage or the source kind.
    fn create_shader(
        &self,
        descriptor: &ShaderDescriptor<'_>,
    ) -> Result<ResourceRef<ShaderHandle>, ResourceError>;

    /// Links shaders into a graphics program.
    /// The program keeps a reference on each of its shaders.
    fn create_graphics_program(
        &self,
        descriptor: &GraphicsProgramDescriptor<'_>,
    ) -> Result<ResourceRef<GraphicsProgramHandle>, ResourceError>;

    /// The buffer factories.
    fn buffer_manager(&self) -> &dyn BufferManager;

    /// The texture factories.
    fn texture_manager(&self) -> &dyn TextureManager;

    /// The reference counter shared by every [`ResourceRef`] of this RHI.
    fn reference_counter(&self) -> Arc<dyn ReferenceCounter>;

    /// Maps a resource for CPU access.
    /// ## Arguments
    /// * `resource` - The buffer or texture to map.
    /// * `subresource` - Subresource index, 0 for buffers.
    /// * `map_type` - Requested access.
    /// ## Returns
    /// A copy of the subresource contents, to hand back to [`unmap`](Rhi::unmap).
    /// ## Errors
    /// * `ResourceError::AlreadyMapped` - If the resource is mapped already.
    /// * `ResourceError::Unsupported` - If the resource cannot be mapped.
    fn map(
        &self,
        resource: ResourceHandle,
        subresource: u32,
        map_type: MapType,
    ) -> Result<MappedSubresource, ResourceError>;

    /// Unmaps a resource, writing `mapped` back if it was mapped for writing.
    /// ## Errors
    /// * `ResourceError::NotMapped` - If the resource is not mapped.
    fn unmap(
        &self,
        resource: ResourceHandle,
        subresource: u32,
        mapped: MappedSubresource,
    ) -> Result<(), ResourceError>;

    /// Reads back the results of `number_of_queries` queries starting at `first_query_index`.
    /// ## Returns
    /// The raw result bytes, [`QueryType::result_size`](crate::rhi::api::QueryType::result_size) per query.
    fn get_query_pool_results(
        &self,
        query_pool: QueryPoolHandle,
        first_query_index: u32,
        number_of_queries: u32,
        flags: QueryResultFlags,
    ) -> Result<Vec<u8>, ResourceError>;

    /// Opens a scene. Commands are only submitted between `begin_scene` and `end_scene`.
    /// Returns `false` if a scene is already open.
    fn begin_scene(&mut self) -> bool;

    /// Closes the open scene and unbinds every bound object.
    fn end_scene(&mut self);

    /// Executes a command buffer and returns the number of packets executed.
    fn submit_command_buffer(&mut self, command_buffer: &CommandBuffer) -> usize;

    /// Presents the back buffer of a swap chain.
    fn present(&mut self, swap_chain: SwapChainHandle) -> Result<(), ResourceError>;

    /// Resizes the back buffers of a swap chain.
    fn resize_swap_chain(
        &self,
        swap_chain: SwapChainHandle,
        width: u32,
        height: u32,
    ) -> Result<(), ResourceError>;

    /// The current back buffer size of a swap chain.
    fn swap_chain_size(&self, swap_chain: SwapChainHandle) -> Result<(u32, u32), ResourceError>;
}

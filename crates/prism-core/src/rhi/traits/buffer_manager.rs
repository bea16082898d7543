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
    BufferDescriptor, IndexBufferFormat, IndirectBufferFlags, TextureFormat, VertexArrayDescriptor,
};
use crate::rhi::error::ResourceError;
use crate::rhi::resource::{
    IndexBufferHandle, IndirectBufferHandle, ResourceRef, StructuredBufferHandle,
    TextureBufferHandle, UniformBufferHandle, VertexArrayHandle, VertexBufferHandle,
};
use std::fmt::Debug;

/// Creates the buffer resources of one RHI.
///
/// Every factory validates its descriptor first. A violated precondition fires
/// an RHI assertion and returns an error; nothing is allocated in that case.
pub trait BufferManager: Send + Sync + Debug {
    /// Creates a vertex buffer.
    /// ## Arguments
    /// * `descriptor` - Size, optional initial data, flags and usage.
    /// ## Returns
    /// A reference to the new buffer.
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - If the data length does not match the size.
    fn create_vertex_buffer(
        &self,
        descriptor: &BufferDescriptor<'_>,
    ) -> Result<ResourceRef<VertexBufferHandle>, ResourceError>;

    /// Creates an index buffer whose elements are `index_buffer_format`.
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - If the size is not a whole number of indices.
    fn create_index_buffer(
        &self,
        descriptor: &BufferDescriptor<'_>,
        index_buffer_format: IndexBufferFormat,
    ) -> Result<ResourceRef<IndexBufferHandle>, ResourceError>;

    /// Creates a vertex array binding one vertex buffer per input slot and an
    /// optional index buffer. The vertex array keeps a reference on each of them.
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - If the buffer count does not match the input slots.
    /// * `ResourceError::WrongOwner` - If a buffer belongs to another RHI.
    fn create_vertex_array(
        &self,
        descriptor: &VertexArrayDescriptor<'_>,
    ) -> Result<ResourceRef<VertexArrayHandle>, ResourceError>;

    /// Creates a texture buffer of `texture_format` elements.
    fn create_texture_buffer(
        &self,
        descriptor: &BufferDescriptor<'_>,
        texture_format: TextureFormat,
    ) -> Result<ResourceRef<TextureBufferHandle>, ResourceError>;

    /// Creates a structured buffer of `number_of_structure_bytes` sized elements.
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - If the size is not a whole number of structures.
    fn create_structured_buffer(
        &self,
        descriptor: &BufferDescriptor<'_>,
        number_of_structure_bytes: u32,
    ) -> Result<ResourceRef<StructuredBufferHandle>, ResourceError>;

    /// Creates an indirect argument buffer.
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - Unless exactly one argument kind is selected
    ///   and the size is a whole number of argument records.
    fn create_indirect_buffer(
        &self,
        descriptor: &BufferDescriptor<'_>,
        indirect_buffer_flags: IndirectBufferFlags,
    ) -> Result<ResourceRef<IndirectBufferHandle>, ResourceError>;

    /// Creates a uniform buffer.
    /// ## Errors
    /// * `ResourceError::Unsupported` - If the backend has no uniform buffers.
    fn create_uniform_buffer(
        &self,
        descriptor: &BufferDescriptor<'_>,
    ) -> Result<ResourceRef<UniformBufferHandle>, ResourceError>;
}

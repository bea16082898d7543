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

use super::resources::{BufferData, BufferElement, NullResourceKind, VertexArrayData};
use super::shared::NullShared;
use prism_core::rhi::{
    validate_indirect_buffer, validate_structured_buffer, BufferDescriptor, BufferManager,
    IndexBufferFormat, IndexBufferHandle, IndirectBufferFlags, IndirectBufferHandle,
    ResourceError, ResourceHandle, ResourceRef, StructuredBufferHandle, TextureBufferHandle,
    TextureFormat, TypedHandle, UniformBufferHandle, VertexArrayDescriptor, VertexArrayHandle,
    VertexBufferHandle,
};
use std::sync::Arc;

/// The buffer factories of the Null backend. Buffer contents are kept in
/// CPU memory so they can be mapped and copied.
#[derive(Debug)]
pub struct NullBufferManager {
    shared: Arc<NullShared>,
}

impl NullBufferManager {
    pub(crate) fn new(shared: Arc<NullShared>) -> Self {
        Self { shared }
    }

    fn create_buffer<H: TypedHandle>(
        &self,
        descriptor: &BufferDescriptor<'_>,
        element: BufferElement,
    ) -> Result<ResourceRef<H>, ResourceError> {
        descriptor
            .validate_data()
            .map_err(|err| self.shared.refuse(err))?;

        let contents = match descriptor.data {
            Some(data) => data.to_vec(),
            None => vec![0; descriptor.number_of_bytes as usize],
        };
        self.shared.create(
            descriptor.label.as_deref(),
            NullResourceKind::Buffer(BufferData {
                element,
                contents,
                flags: descriptor.flags,
                usage: descriptor.usage,
                mapped: None,
            }),
        )
    }
}

impl BufferManager for NullBufferManager {
    fn create_vertex_buffer(
        &self,
        descriptor: &BufferDescriptor<'_>,
    ) -> Result<ResourceRef<VertexBufferHandle>, ResourceError> {
        self.create_buffer(descriptor, BufferElement::Vertex)
    }

    fn create_index_buffer(
        &self,
        descriptor: &BufferDescriptor<'_>,
        index_buffer_format: IndexBufferFormat,
    ) -> Result<ResourceRef<IndexBufferHandle>, ResourceError> {
        let index_size = index_buffer_format.number_of_bytes();
        if descriptor.number_of_bytes % index_size != 0 {
            return Err(self.shared.refuse(ResourceError::InvalidDescriptor(format!(
                "index buffer size {} is not a multiple of the {index_size} byte index",
                descriptor.number_of_bytes
            ))));
        }
        self.create_buffer(descriptor, BufferElement::Index(index_buffer_format))
    }

    fn create_vertex_array(
        &self,
        descriptor: &VertexArrayDescriptor<'_>,
    ) -> Result<ResourceRef<VertexArrayHandle>, ResourceError> {
        descriptor.validate().map_err(|err| self.shared.refuse(err))?;

        let dependencies: Vec<ResourceHandle> = descriptor
            .vertex_buffers
            .iter()
            .map(|&buffer| buffer.into())
            .chain(descriptor.index_buffer.map(Into::into))
            .collect();

        let handle = {
            let mut resources = self.shared.resources();
            for &dependency in &dependencies {
                self.shared.check_live(&resources, dependency)?;
            }
            self.shared.add_references(&mut resources, &dependencies)?;
            self.shared.insert(
                &mut resources,
                descriptor.label.as_deref(),
                NullResourceKind::VertexArray(VertexArrayData {
                    vertex_buffers: descriptor.vertex_buffers.to_vec(),
                    index_buffer: descriptor.index_buffer,
                }),
            )
        };
        self.shared.adopt(handle)
    }

    fn create_texture_buffer(
        &self,
        descriptor: &BufferDescriptor<'_>,
        texture_format: TextureFormat,
    ) -> Result<ResourceRef<TextureBufferHandle>, ResourceError> {
        descriptor
            .validate_size("texture", self.shared.capabilities.maximum_texture_buffer_size)
            .map_err(|err| self.shared.refuse(err))?;
        let texel_size = texture_format.bytes_per_element();
        if texture_format.is_compressed() || descriptor.number_of_bytes % texel_size != 0 {
            return Err(self.shared.refuse(ResourceError::InvalidDescriptor(format!(
                "texture buffer size {} does not hold whole {texture_format:?} texels",
                descriptor.number_of_bytes
            ))));
        }
        self.create_buffer(descriptor, BufferElement::Texel(texture_format))
    }

    fn create_structured_buffer(
        &self,
        descriptor: &BufferDescriptor<'_>,
        number_of_structure_bytes: u32,
    ) -> Result<ResourceRef<StructuredBufferHandle>, ResourceError> {
        descriptor
            .validate_size(
                "structured",
                self.shared.capabilities.maximum_structured_buffer_size,
            )
            .map_err(|err| self.shared.refuse(err))?;
        validate_structured_buffer(descriptor.number_of_bytes, number_of_structure_bytes)
            .map_err(|err| self.shared.refuse(err))?;
        self.create_buffer(descriptor, BufferElement::Structure(number_of_structure_bytes))
    }

    fn create_indirect_buffer(
        &self,
        descriptor: &BufferDescriptor<'_>,
        indirect_buffer_flags: IndirectBufferFlags,
    ) -> Result<ResourceRef<IndirectBufferHandle>, ResourceError> {
        descriptor
            .validate_size("indirect", self.shared.capabilities.maximum_indirect_buffer_size)
            .map_err(|err| self.shared.refuse(err))?;
        validate_indirect_buffer(descriptor.number_of_bytes, indirect_buffer_flags)
            .map_err(|err| self.shared.refuse(err))?;
        self.create_buffer(descriptor, BufferElement::Indirect(indirect_buffer_flags))
    }

    fn create_uniform_buffer(
        &self,
        descriptor: &BufferDescriptor<'_>,
    ) -> Result<ResourceRef<UniformBufferHandle>, ResourceError> {
        descriptor
            .validate_size("uniform", self.shared.capabilities.maximum_uniform_buffer_size)
            .map_err(|err| self.shared.refuse(err))?;
        self.create_buffer(descriptor, BufferElement::Uniform)
    }
}

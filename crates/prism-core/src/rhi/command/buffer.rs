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

//! The command packet list and its auxiliary payload arena.

use crate::rhi::api::ClearFlags;
use crate::rhi::resource::{
    ComputePipelineStateHandle, FramebufferHandle, GraphicsPipelineStateHandle,
    IndirectBufferHandle, QueryPoolHandle, RenderTargetHandle, ResourceGroupHandle,
    ResourceHandle, RootSignatureHandle, TextureHandle, UniformBufferHandle, VertexArrayHandle,
};
use bytemuck::Pod;
use std::sync::Arc;

/// Location of a variable-length payload in a command buffer's auxiliary words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuxiliaryRange {
    /// Index of the first word.
    pub word_offset: u32,
    /// Payload length in bytes. The payload is zero-padded to whole words.
    pub byte_len: u32,
}

impl AuxiliaryRange {
    /// Number of 32-bit words the payload occupies.
    pub fn word_len(&self) -> u32 {
        self.byte_len.div_ceil(4)
    }
}

/// The argument source of a draw packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawPacket {
    /// Argument records stored in the command buffer.
    Emulated(AuxiliaryRange),
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

/// The identifier of each command, in dispatch order of the variants of [`Command`].
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum CommandId {
    DispatchCommandBuffer,
    SetGraphicsRootSignature,
    SetGraphicsPipelineState,
    SetGraphicsResourceGroup,
    SetGraphicsVertexArray,
    SetGraphicsViewports,
    SetGraphicsScissorRectangles,
    SetGraphicsRenderTarget,
    ClearGraphics,
    DrawGraphics,
    DrawIndexedGraphics,
    DrawMeshTasks,
    SetComputeRootSignature,
    SetComputePipelineState,
    SetComputeResourceGroup,
    DispatchCompute,
    SetTextureMinimumMaximumMipmapIndex,
    ResolveMultisampleFramebuffer,
    CopyResource,
    GenerateMipmaps,
    CopyUniformBufferData,
    ResetQueryPool,
    BeginQuery,
    EndQuery,
    WriteTimestampQuery,
    SetDebugMarker,
    BeginDebugEvent,
    EndDebugEvent,
}

impl CommandId {
    /// Number of command identifiers.
    pub const COUNT: usize = CommandId::EndDebugEvent as usize + 1;
}

/// One command packet.
///
/// Packets are only created through the builder methods of [`CommandBuffer`],
/// which also write the auxiliary payloads the packets refer to.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Executes another command buffer inline.
    DispatchCommandBuffer(Arc<CommandBuffer>),
    /// Binds the graphics root signature.
    SetGraphicsRootSignature(Option<RootSignatureHandle>),
    /// Binds the graphics pipeline state.
    SetGraphicsPipelineState(Option<GraphicsPipelineStateHandle>),
    /// Binds a resource group to a descriptor table of the graphics root signature.
    SetGraphicsResourceGroup {
        /// The descriptor table index.
        root_parameter_index: u32,
        /// The group, `None` to unbind.
        resource_group: Option<ResourceGroupHandle>,
    },
    /// Binds the vertex array.
    SetGraphicsVertexArray(Option<VertexArrayHandle>),
    /// Sets the viewports, stored as [`Viewport`](crate::rhi::api::Viewport) records.
    SetGraphicsViewports(AuxiliaryRange),
    /// Sets the scissor rectangles, stored as [`ScissorRectangle`](crate::rhi::api::ScissorRectangle) records.
    SetGraphicsScissorRectangles(AuxiliaryRange),
    /// Binds the render target.
    SetGraphicsRenderTarget(Option<RenderTargetHandle>),
    /// Clears the bound render target.
    ClearGraphics {
        /// What to clear.
        flags: ClearFlags,
        /// Clear color.
        color: [f32; 4],
        /// Clear depth.
        z: f32,
        /// Clear stencil.
        stencil: u32,
    },
    /// Non-indexed draw, emulated records are [`DrawArguments`](crate::rhi::api::DrawArguments).
    DrawGraphics(DrawPacket),
    /// Indexed draw, emulated records are [`DrawIndexedArguments`](crate::rhi::api::DrawIndexedArguments).
    DrawIndexedGraphics(DrawPacket),
    /// Mesh-shader draw, emulated records are [`DrawMeshTasksArguments`](crate::rhi::api::DrawMeshTasksArguments).
    DrawMeshTasks(DrawPacket),
    /// Binds the compute root signature.
    SetComputeRootSignature(Option<RootSignatureHandle>),
    /// Binds the compute pipeline state.
    SetComputePipelineState(Option<ComputePipelineStateHandle>),
    /// Binds a resource group to a descriptor table of the compute root signature.
    SetComputeResourceGroup {
        /// The descriptor table index.
        root_parameter_index: u32,
        /// The group, `None` to unbind.
        resource_group: Option<ResourceGroupHandle>,
    },
    /// Dispatches compute work groups.
    DispatchCompute {
        /// Groups along X.
        group_count_x: u32,
        /// Groups along Y.
        group_count_y: u32,
        /// Groups along Z.
        group_count_z: u32,
    },
    /// Restricts the accessible mip range of a texture.
    SetTextureMinimumMaximumMipmapIndex {
        /// The texture.
        texture: TextureHandle,
        /// Most detailed accessible level.
        minimum_mipmap_index: u32,
        /// Least detailed accessible level.
        maximum_mipmap_index: u32,
    },
    /// Resolves a multisampled framebuffer into a render target.
    ResolveMultisampleFramebuffer {
        /// Receives the resolved image.
        destination_render_target: RenderTargetHandle,
        /// The multisampled framebuffer.
        source_multisample_framebuffer: FramebufferHandle,
    },
    /// Copies a whole resource.
    CopyResource {
        /// Destination resource.
        destination_resource: ResourceHandle,
        /// Source resource of the same type and size.
        source_resource: ResourceHandle,
    },
    /// Generates the mip chain of a texture from level 0.
    GenerateMipmaps(TextureHandle),
    /// Copies inline bytes into a uniform buffer.
    CopyUniformBufferData {
        /// Destination buffer.
        uniform_buffer: UniformBufferHandle,
        /// The bytes.
        data: AuxiliaryRange,
    },
    /// Resets a range of queries.
    ResetQueryPool {
        /// The pool.
        query_pool: QueryPoolHandle,
        /// First query.
        first_query_index: u32,
        /// Number of queries.
        number_of_queries: u32,
    },
    /// Begins a query.
    BeginQuery {
        /// The pool.
        query_pool: QueryPoolHandle,
        /// The query.
        query_index: u32,
        /// Backend-specific query control flags.
        query_control_flags: u32,
    },
    /// Ends a query.
    EndQuery {
        /// The pool.
        query_pool: QueryPoolHandle,
        /// The query.
        query_index: u32,
    },
    /// Writes a timestamp.
    WriteTimestampQuery {
        /// The pool.
        query_pool: QueryPoolHandle,
        /// The query.
        query_index: u32,
    },
    /// Inserts a named marker, the UTF-8 name is stored in the auxiliary words.
    SetDebugMarker(AuxiliaryRange),
    /// Opens a named debug event.
    BeginDebugEvent(AuxiliaryRange),
    /// Closes the innermost debug event.
    EndDebugEvent,
}

impl Command {
    /// The identifier of this command.
    pub fn id(&self) -> CommandId {
        match self {
            Command::DispatchCommandBuffer(_) => CommandId::DispatchCommandBuffer,
            Command::SetGraphicsRootSignature(_) => CommandId::SetGraphicsRootSignature,
            Command::SetGraphicsPipelineState(_) => CommandId::SetGraphicsPipelineState,
            Command::SetGraphicsResourceGroup { .. } => CommandId::SetGraphicsResourceGroup,
            Command::SetGraphicsVertexArray(_) => CommandId::SetGraphicsVertexArray,
            Command::SetGraphicsViewports(_) => CommandId::SetGraphicsViewports,
            Command::SetGraphicsScissorRectangles(_) => CommandId::SetGraphicsScissorRectangles,
            Command::SetGraphicsRenderTarget(_) => CommandId::SetGraphicsRenderTarget,
            Command::ClearGraphics { .. } => CommandId::ClearGraphics,
            Command::DrawGraphics(_) => CommandId::DrawGraphics,
            Command::DrawIndexedGraphics(_) => CommandId::DrawIndexedGraphics,
            Command::DrawMeshTasks(_) => CommandId::DrawMeshTasks,
            Command::SetComputeRootSignature(_) => CommandId::SetComputeRootSignature,
            Command::SetComputePipelineState(_) => CommandId::SetComputePipelineState,
            Command::SetComputeResourceGroup { .. } => CommandId::SetComputeResourceGroup,
            Command::DispatchCompute { .. } => CommandId::DispatchCompute,
            Command::SetTextureMinimumMaximumMipmapIndex { .. } => {
                CommandId::SetTextureMinimumMaximumMipmapIndex
            }
            Command::ResolveMultisampleFramebuffer { .. } => CommandId::ResolveMultisampleFramebuffer,
            Command::CopyResource { .. } => CommandId::CopyResource,
            Command::GenerateMipmaps(_) => CommandId::GenerateMipmaps,
            Command::CopyUniformBufferData { .. } => CommandId::CopyUniformBufferData,
            Command::ResetQueryPool { .. } => CommandId::ResetQueryPool,
            Command::BeginQuery { .. } => CommandId::BeginQuery,
            Command::EndQuery { .. } => CommandId::EndQuery,
            Command::WriteTimestampQuery { .. } => CommandId::WriteTimestampQuery,
            Command::SetDebugMarker(_) => CommandId::SetDebugMarker,
            Command::BeginDebugEvent(_) => CommandId::BeginDebugEvent,
            Command::EndDebugEvent => CommandId::EndDebugEvent,
        }
    }
}

/// An append-only list of command packets, recorded once and dispatched any
/// number of times.
///
/// Variable-length payloads (viewport arrays, emulated draw records, uniform
/// data, debug names) live in a word arena next to the packets, so every
/// payload is 4-byte aligned and can be read back as a typed slice without
/// copying.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandBuffer {
    commands: Vec<Command>,
    auxiliary: Vec<u32>,
}

impl CommandBuffer {
    /// Creates an empty command buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty command buffer with preallocated storage.
    pub fn with_capacity(number_of_commands: usize, number_of_auxiliary_words: usize) -> Self {
        Self {
            commands: Vec::with_capacity(number_of_commands),
            auxiliary: Vec::with_capacity(number_of_auxiliary_words),
        }
    }

    /// Returns `true` if no packet has been recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of top-level packets. Nested command buffers count as one.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// The recorded packets, in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of auxiliary words in use.
    pub fn auxiliary_len(&self) -> usize {
        self.auxiliary.len()
    }

    /// Forgets every packet and payload. Storage is kept for the next recording.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.auxiliary.clear();
    }

    pub(crate) fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Appends bytes, zero-padded to whole words.
    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) -> AuxiliaryRange {
        let range = AuxiliaryRange {
            word_offset: self.auxiliary.len() as u32,
            byte_len: bytes.len() as u32,
        };
        let mut chunks = bytes.chunks_exact(4);
        for chunk in chunks.by_ref() {
            self.auxiliary
                .push(u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }
        let remainder = chunks.remainder();
        if !remainder.is_empty() {
            let mut word = [0u8; 4];
            word[..remainder.len()].copy_from_slice(remainder);
            self.auxiliary.push(u32::from_ne_bytes(word));
        }
        range
    }

    /// Appends plain-old-data records.
    pub(crate) fn write_records<T: Pod>(&mut self, records: &[T]) -> AuxiliaryRange {
        self.write_bytes(bytemuck::cast_slice(records))
    }

    /// The bytes of an auxiliary payload.
    pub fn auxiliary_bytes(&self, range: AuxiliaryRange) -> &[u8] {
        let start = range.word_offset as usize;
        let end = start + range.word_len() as usize;
        match self.auxiliary.get(start..end) {
            Some(words) => &bytemuck::cast_slice::<u32, u8>(words)[..range.byte_len as usize],
            None => {
                log::error!("Auxiliary range {range:?} is outside of the command buffer");
                &[]
            }
        }
    }

    /// An auxiliary payload viewed as plain-old-data records.
    ///
    /// `T` must not need more than 4-byte alignment; every record type of the
    /// command protocol satisfies this.
    pub fn auxiliary_records<T: Pod>(&self, range: AuxiliaryRange) -> &[T] {
        match bytemuck::try_cast_slice(self.auxiliary_bytes(range)) {
            Ok(records) => records,
            Err(err) => {
                log::error!(
                    "Auxiliary range {range:?} cannot be read as {}: {err}",
                    std::any::type_name::<T>()
                );
                &[]
            }
        }
    }

    /// An auxiliary payload viewed as UTF-8 text.
    pub fn auxiliary_str(&self, range: AuxiliaryRange) -> &str {
        std::str::from_utf8(self.auxiliary_bytes(range)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rhi::api::{DrawIndexedArguments, Viewport};

    #[test]
    fn byte_payloads_are_padded_and_read_back_exactly() {
        let mut buffer = CommandBuffer::new();
        let first = buffer.write_bytes(b"hello");
        let second = buffer.write_bytes(&[1, 2, 3, 4]);

        assert_eq!(first.word_len(), 2);
        assert_eq!(second.word_offset, 2);
        assert_eq!(buffer.auxiliary_len(), 3);
        assert_eq!(buffer.auxiliary_bytes(first), b"hello");
        assert_eq!(buffer.auxiliary_str(first), "hello");
        assert_eq!(buffer.auxiliary_bytes(second), &[1, 2, 3, 4]);
    }

    #[test]
    fn records_are_read_back_as_typed_slices() {
        let mut buffer = CommandBuffer::new();
        buffer.write_bytes(b"x");
        let viewports = [Viewport::new(640.0, 480.0), Viewport::new(320.0, 240.0)];
        let range = buffer.write_records(&viewports);
        assert_eq!(buffer.auxiliary_records::<Viewport>(range), &viewports);

        let draws = [DrawIndexedArguments::new(36)];
        let range = buffer.write_records(&draws);
        assert_eq!(buffer.auxiliary_records::<DrawIndexedArguments>(range), &draws);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buffer = CommandBuffer::with_capacity(4, 16);
        buffer.push(Command::EndDebugEvent);
        buffer.write_bytes(&[0; 32]);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.auxiliary_len(), 0);
        assert!(buffer.commands.capacity() >= 4);
    }

    #[test]
    fn command_ids_cover_every_variant() {
        assert_eq!(CommandId::COUNT, 28);
        assert_eq!(Command::EndDebugEvent.id(), CommandId::EndDebugEvent);
    }
}

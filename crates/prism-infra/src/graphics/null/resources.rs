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

//! The CPU-side shadows of every resource the Null backend creates.

use prism_core::rhi::{
    BufferFlags, BufferUsage, DescriptorRange, GraphicsPipelineStateHandle,
    GraphicsProgramHandle, IndexBufferFormat, IndexBufferHandle, IndirectBufferFlags,
    MapType, PrimitiveTopology, QueryType, RenderPassHandle, Resource, ResourceHandle, ResourceType,
    RootParameter, RootSignatureHandle, SamplerState, SamplerStateHandle, ShaderHandle,
    ShaderStage, TextureFlags, TextureFormat, TextureHandle, TextureLayout, VertexAttributes,
    VertexBufferHandle, WindowHandle,
};

#[derive(Debug)]
pub(crate) struct RootSignatureData {
    pub(crate) parameters: Vec<RootParameter>,
}

impl RootSignatureData {
    /// The ranges of a descriptor-table parameter, `None` for anything else.
    pub(crate) fn descriptor_ranges(&self, root_parameter_index: u32) -> Option<&[DescriptorRange]> {
        self.parameters
            .get(root_parameter_index as usize)
            .and_then(RootParameter::descriptor_ranges)
    }
}

#[derive(Debug)]
pub(crate) struct ResourceGroupData {
    pub(crate) root_signature: RootSignatureHandle,
    pub(crate) root_parameter_index: u32,
    pub(crate) ranges: Vec<DescriptorRange>,
    pub(crate) resources: Vec<ResourceHandle>,
    pub(crate) sampler_states: Vec<SamplerStateHandle>,
}

#[derive(Debug)]
pub(crate) struct GraphicsProgramData {
    pub(crate) root_signature: RootSignatureHandle,
    pub(crate) vertex_attributes: VertexAttributes,
    pub(crate) shaders: Vec<ShaderHandle>,
}

#[derive(Debug)]
pub(crate) struct VertexArrayData {
    pub(crate) vertex_buffers: Vec<VertexBufferHandle>,
    pub(crate) index_buffer: Option<IndexBufferHandle>,
}

#[derive(Debug)]
pub(crate) struct RenderPassData {
    pub(crate) color_attachment_texture_formats: Vec<TextureFormat>,
    pub(crate) depth_stencil_attachment_texture_format: Option<TextureFormat>,
    pub(crate) number_of_multisamples: u8,
}

#[derive(Debug)]
pub(crate) struct QueryPoolData {
    pub(crate) query_type: QueryType,
    pub(crate) number_of_queries: u32,
}

#[derive(Debug)]
pub(crate) struct SwapChainData {
    pub(crate) render_pass: RenderPassHandle,
    pub(crate) window: WindowHandle,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) presented_frames: u64,
}

#[derive(Debug)]
pub(crate) struct FramebufferData {
    pub(crate) render_pass: RenderPassHandle,
    pub(crate) attachments: Vec<TextureHandle>,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) number_of_multisamples: u8,
}

/// How the bytes of a buffer are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BufferElement {
    Vertex,
    Index(IndexBufferFormat),
    Texel(TextureFormat),
    Structure(u32),
    Indirect(IndirectBufferFlags),
    Uniform,
}

impl BufferElement {
    pub(crate) fn resource_type(self) -> ResourceType {
        match self {
            BufferElement::Vertex => ResourceType::VertexBuffer,
            BufferElement::Index(_) => ResourceType::IndexBuffer,
            BufferElement::Texel(_) => ResourceType::TextureBuffer,
            BufferElement::Structure(_) => ResourceType::StructuredBuffer,
            BufferElement::Indirect(_) => ResourceType::IndirectBuffer,
            BufferElement::Uniform => ResourceType::UniformBuffer,
        }
    }
}

#[derive(Debug)]
pub(crate) struct BufferData {
    pub(crate) element: BufferElement,
    pub(crate) contents: Vec<u8>,
    pub(crate) flags: BufferFlags,
    pub(crate) usage: BufferUsage,
    pub(crate) mapped: Option<MapType>,
}

#[derive(Debug)]
pub(crate) struct TextureData {
    pub(crate) layout: TextureLayout,
    pub(crate) format: TextureFormat,
    pub(crate) flags: TextureFlags,
    pub(crate) number_of_multisamples: u8,
    pub(crate) number_of_mipmaps: u32,
    pub(crate) uploaded_mipmaps: Vec<u32>,
    pub(crate) mipmaps_generated: bool,
    pub(crate) minimum_mipmap_index: u32,
    pub(crate) maximum_mipmap_index: u32,
}

#[derive(Debug)]
pub(crate) struct GraphicsPipelineStateData {
    pub(crate) root_signature: RootSignatureHandle,
    pub(crate) graphics_program: GraphicsProgramHandle,
    pub(crate) render_pass: RenderPassHandle,
    pub(crate) primitive_topology: PrimitiveTopology,
    pub(crate) pipeline_id: u16,
}

#[derive(Debug)]
pub(crate) struct ComputePipelineStateData {
    pub(crate) root_signature: RootSignatureHandle,
    pub(crate) compute_shader: ShaderHandle,
}

#[derive(Debug)]
pub(crate) struct ShaderData {
    pub(crate) stage: ShaderStage,
    pub(crate) entry_point: String,
}

/// The payload of a Null backend resource.
#[derive(Debug)]
pub(crate) enum NullResourceKind {
    RootSignature(RootSignatureData),
    ResourceGroup(ResourceGroupData),
    GraphicsProgram(GraphicsProgramData),
    VertexArray(VertexArrayData),
    RenderPass(RenderPassData),
    QueryPool(QueryPoolData),
    SwapChain(SwapChainData),
    Framebuffer(FramebufferData),
    Buffer(BufferData),
    Texture(TextureData),
    GraphicsPipelineState(GraphicsPipelineStateData),
    ComputePipelineState(ComputePipelineStateData),
    SamplerState(SamplerState),
    Shader(ShaderData),
}

/// A resource slot of the Null backend's arena.
#[derive(Debug)]
pub(crate) struct NullResource {
    pub(crate) label: Option<String>,
    pub(crate) kind: NullResourceKind,
}

impl NullResource {
    pub(crate) fn new(label: Option<&str>, kind: NullResourceKind) -> Self {
        Self {
            label: label.map(str::to_owned),
            kind,
        }
    }

    pub(crate) fn as_root_signature(&self) -> Option<&RootSignatureData> {
        match &self.kind {
            NullResourceKind::RootSignature(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn as_resource_group(&self) -> Option<&ResourceGroupData> {
        match &self.kind {
            NullResourceKind::ResourceGroup(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn as_graphics_program(&self) -> Option<&GraphicsProgramData> {
        match &self.kind {
            NullResourceKind::GraphicsProgram(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn as_vertex_array(&self) -> Option<&VertexArrayData> {
        match &self.kind {
            NullResourceKind::VertexArray(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn as_render_pass(&self) -> Option<&RenderPassData> {
        match &self.kind {
            NullResourceKind::RenderPass(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn as_query_pool(&self) -> Option<&QueryPoolData> {
        match &self.kind {
            NullResourceKind::QueryPool(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn as_swap_chain_mut(&mut self) -> Option<&mut SwapChainData> {
        match &mut self.kind {
            NullResourceKind::SwapChain(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn as_framebuffer(&self) -> Option<&FramebufferData> {
        match &self.kind {
            NullResourceKind::Framebuffer(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn as_buffer(&self) -> Option<&BufferData> {
        match &self.kind {
            NullResourceKind::Buffer(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn as_buffer_mut(&mut self) -> Option<&mut BufferData> {
        match &mut self.kind {
            NullResourceKind::Buffer(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn as_texture(&self) -> Option<&TextureData> {
        match &self.kind {
            NullResourceKind::Texture(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn as_texture_mut(&mut self) -> Option<&mut TextureData> {
        match &mut self.kind {
            NullResourceKind::Texture(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn as_graphics_pipeline_state(&self) -> Option<&GraphicsPipelineStateData> {
        match &self.kind {
            NullResourceKind::GraphicsPipelineState(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn as_shader(&self) -> Option<&ShaderData> {
        match &self.kind {
            NullResourceKind::Shader(data) => Some(data),
            _ => None,
        }
    }
}

impl Resource for NullResource {
    fn resource_type(&self) -> ResourceType {
        match &self.kind {
            NullResourceKind::RootSignature(_) => ResourceType::RootSignature,
            NullResourceKind::ResourceGroup(_) => ResourceType::ResourceGroup,
            NullResourceKind::GraphicsProgram(_) => ResourceType::GraphicsProgram,
            NullResourceKind::VertexArray(_) => ResourceType::VertexArray,
            NullResourceKind::RenderPass(_) => ResourceType::RenderPass,
            NullResourceKind::QueryPool(_) => ResourceType::QueryPool,
            NullResourceKind::SwapChain(_) => ResourceType::SwapChain,
            NullResourceKind::Framebuffer(_) => ResourceType::Framebuffer,
            NullResourceKind::Buffer(buffer) => buffer.element.resource_type(),
            NullResourceKind::Texture(texture) => texture.layout.dimension.resource_type(),
            NullResourceKind::GraphicsPipelineState(_) => ResourceType::GraphicsPipelineState,
            NullResourceKind::ComputePipelineState(_) => ResourceType::ComputePipelineState,
            NullResourceKind::SamplerState(_) => ResourceType::SamplerState,
            NullResourceKind::Shader(shader) => shader.stage.resource_type(),
        }
    }

    fn debug_name(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn dependencies(&self) -> Vec<ResourceHandle> {
        match &self.kind {
            NullResourceKind::ResourceGroup(group) => std::iter::once(group.root_signature.into())
                .chain(group.resources.iter().copied())
                .chain(group.sampler_states.iter().map(|&sampler| sampler.into()))
                .collect(),
            NullResourceKind::GraphicsProgram(program) => std::iter::once(program.root_signature.into())
                .chain(program.shaders.iter().map(|&shader| shader.into()))
                .collect(),
            NullResourceKind::VertexArray(vertex_array) => vertex_array
                .vertex_buffers
                .iter()
                .map(|&buffer| buffer.into())
                .chain(vertex_array.index_buffer.map(Into::into))
                .collect(),
            NullResourceKind::SwapChain(swap_chain) => vec![swap_chain.render_pass.into()],
            NullResourceKind::Framebuffer(framebuffer) => std::iter::once(framebuffer.render_pass.into())
                .chain(framebuffer.attachments.iter().map(|&texture| texture.into()))
                .collect(),
            NullResourceKind::GraphicsPipelineState(pipeline) => vec![
                pipeline.root_signature.into(),
                pipeline.graphics_program.into(),
                pipeline.render_pass.into(),
            ],
            NullResourceKind::ComputePipelineState(pipeline) => vec![
                pipeline.root_signature.into(),
                pipeline.compute_shader.into(),
            ],
            _ => Vec::new(),
        }
    }
}

/// A read-only view of a texture's upload state, for inspection and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    /// The layout the texture was created with.
    pub layout: TextureLayout,
    /// The texel format.
    pub format: TextureFormat,
    /// Length of the full mip chain.
    pub number_of_mipmaps: u32,
    /// The mip levels uploaded from initial data, in upload order.
    pub uploaded_mipmaps: Vec<u32>,
    /// Whether mipmaps were generated, at creation or by a command.
    pub mipmaps_generated: bool,
    /// Most detailed accessible level.
    pub minimum_mipmap_index: u32,
    /// Least detailed accessible level.
    pub maximum_mipmap_index: u32,
}

impl From<&TextureData> for TextureInfo {
    fn from(texture: &TextureData) -> Self {
        Self {
            layout: texture.layout,
            format: texture.format,
            number_of_mipmaps: texture.number_of_mipmaps,
            uploaded_mipmaps: texture.uploaded_mipmaps.clone(),
            mipmaps_generated: texture.mipmaps_generated,
            minimum_mipmap_index: texture.minimum_mipmap_index,
            maximum_mipmap_index: texture.maximum_mipmap_index,
        }
    }
}

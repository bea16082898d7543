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

//! Opaque, generation-checked handles to RHI resources.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_RHI_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of one RHI instance. Every resource handle records the instance that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RhiId(u32);

impl RhiId {
    /// Allocates a new, process-unique RHI identity.
    pub fn next() -> Self {
        Self(NEXT_RHI_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw identity value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identity value.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RhiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rhi{}", self.0)
    }
}

/// The closed set of resource types an RHI can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    /// Root signature (descriptor table layout).
    RootSignature,
    /// Resource group bound to one descriptor table.
    ResourceGroup,
    /// Linked set of shaders.
    GraphicsProgram,
    /// Vertex buffers plus optional index buffer.
    VertexArray,
    /// Attachment format declaration.
    RenderPass,
    /// Pool of GPU queries.
    QueryPool,
    /// Presentable swap chain.
    SwapChain,
    /// Set of render target attachments.
    Framebuffer,
    /// Vertex buffer.
    VertexBuffer,
    /// Index buffer.
    IndexBuffer,
    /// Typed texel buffer.
    TextureBuffer,
    /// Structured buffer.
    StructuredBuffer,
    /// Indirect argument buffer.
    IndirectBuffer,
    /// Uniform (constant) buffer.
    UniformBuffer,
    /// 1D texture.
    Texture1D,
    /// 1D texture array.
    Texture1DArray,
    /// 2D texture.
    Texture2D,
    /// 2D texture array.
    Texture2DArray,
    /// 3D texture.
    Texture3D,
    /// Cube texture.
    TextureCube,
    /// Cube texture array.
    TextureCubeArray,
    /// Graphics pipeline state object.
    GraphicsPipelineState,
    /// Compute pipeline state object.
    ComputePipelineState,
    /// Sampler state object.
    SamplerState,
    /// Vertex shader.
    VertexShader,
    /// Tessellation control (hull) shader.
    TessellationControlShader,
    /// Tessellation evaluation (domain) shader.
    TessellationEvaluationShader,
    /// Geometry shader.
    GeometryShader,
    /// Fragment (pixel) shader.
    FragmentShader,
    /// Task (amplification) shader.
    TaskShader,
    /// Mesh shader.
    MeshShader,
    /// Compute shader.
    ComputeShader,
}

impl ResourceType {
    /// Every resource type, in declaration order.
    pub const ALL: [ResourceType; 32] = [
        ResourceType::RootSignature,
        ResourceType::ResourceGroup,
        ResourceType::GraphicsProgram,
        ResourceType::VertexArray,
        ResourceType::RenderPass,
        ResourceType::QueryPool,
        ResourceType::SwapChain,
        ResourceType::Framebuffer,
        ResourceType::VertexBuffer,
        ResourceType::IndexBuffer,
        ResourceType::TextureBuffer,
        ResourceType::StructuredBuffer,
        ResourceType::IndirectBuffer,
        ResourceType::UniformBuffer,
        ResourceType::Texture1D,
        ResourceType::Texture1DArray,
        ResourceType::Texture2D,
        ResourceType::Texture2DArray,
        ResourceType::Texture3D,
        ResourceType::TextureCube,
        ResourceType::TextureCubeArray,
        ResourceType::GraphicsPipelineState,
        ResourceType::ComputePipelineState,
        ResourceType::SamplerState,
        ResourceType::VertexShader,
        ResourceType::TessellationControlShader,
        ResourceType::TessellationEvaluationShader,
        ResourceType::GeometryShader,
        ResourceType::FragmentShader,
        ResourceType::TaskShader,
        ResourceType::MeshShader,
        ResourceType::ComputeShader,
    ];

    /// Returns `true` for the seven texture types.
    pub const fn is_texture(self) -> bool {
        matches!(
            self,
            ResourceType::Texture1D
                | ResourceType::Texture1DArray
                | ResourceType::Texture2D
                | ResourceType::Texture2DArray
                | ResourceType::Texture3D
                | ResourceType::TextureCube
                | ResourceType::TextureCubeArray
        )
    }

    /// Returns `true` for the six buffer types.
    pub const fn is_buffer(self) -> bool {
        matches!(
            self,
            ResourceType::VertexBuffer
                | ResourceType::IndexBuffer
                | ResourceType::TextureBuffer
                | ResourceType::StructuredBuffer
                | ResourceType::IndirectBuffer
                | ResourceType::UniformBuffer
        )
    }

    /// Returns `true` for the eight shader types.
    pub const fn is_shader(self) -> bool {
        matches!(
            self,
            ResourceType::VertexShader
                | ResourceType::TessellationControlShader
                | ResourceType::TessellationEvaluationShader
                | ResourceType::GeometryShader
                | ResourceType::FragmentShader
                | ResourceType::TaskShader
                | ResourceType::MeshShader
                | ResourceType::ComputeShader
        )
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An untyped handle to a resource living in an RHI instance's resource arena.
///
/// The handle stays valid only as long as the resource is alive: once the
/// slot is recycled its generation changes and stale handles are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    owner: RhiId,
    index: u32,
    generation: u32,
    resource_type: ResourceType,
}

impl ResourceHandle {
    /// Assembles a handle. Only resource arenas should need this.
    pub const fn new(owner: RhiId, index: u32, generation: u32, resource_type: ResourceType) -> Self {
        Self {
            owner,
            index,
            generation,
            resource_type,
        }
    }

    /// The RHI instance that owns the resource.
    pub const fn owner(&self) -> RhiId {
        self.owner
    }

    /// The arena slot index.
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// The slot generation the handle was issued for.
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// The type of the referenced resource.
    pub const fn resource_type(&self) -> ResourceType {
        self.resource_type
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}v{}@{}",
            self.resource_type, self.index, self.generation, self.owner
        )
    }
}

/// A strongly typed wrapper around a [`ResourceHandle`].
pub trait TypedHandle: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Human readable resource kind, used in error messages.
    const KIND: &'static str;

    /// Whether a resource of the given type can be referenced through this handle type.
    fn accepts(resource_type: ResourceType) -> bool;

    /// Returns the underlying untyped handle.
    fn raw(&self) -> ResourceHandle;

    /// Wraps an untyped handle if its resource type is accepted.
    fn try_from_raw(handle: ResourceHandle) -> Option<Self>;
}

macro_rules! typed_handle {
    ($(#[$meta:meta])* $name:ident, $kind:literal, [$($resource_type:ident),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(ResourceHandle);

        impl TypedHandle for $name {
            const KIND: &'static str = $kind;

            fn accepts(resource_type: ResourceType) -> bool {
                matches!(resource_type, $(ResourceType::$resource_type)|+)
            }

            fn raw(&self) -> ResourceHandle {
                self.0
            }

            fn try_from_raw(handle: ResourceHandle) -> Option<Self> {
                Self::accepts(handle.resource_type()).then_some(Self(handle))
            }
        }

        impl From<$name> for ResourceHandle {
            fn from(handle: $name) -> Self {
                handle.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

typed_handle!(
    /// Handle to a root signature.
    RootSignatureHandle, "root signature", [RootSignature]
);
typed_handle!(
    /// Handle to a resource group.
    ResourceGroupHandle, "resource group", [ResourceGroup]
);
typed_handle!(
    /// Handle to a graphics program.
    GraphicsProgramHandle, "graphics program", [GraphicsProgram]
);
typed_handle!(
    /// Handle to a vertex array.
    VertexArrayHandle, "vertex array", [VertexArray]
);
typed_handle!(
    /// Handle to a render pass.
    RenderPassHandle, "render pass", [RenderPass]
);
typed_handle!(
    /// Handle to a query pool.
    QueryPoolHandle, "query pool", [QueryPool]
);
typed_handle!(
    /// Handle to a swap chain.
    SwapChainHandle, "swap chain", [SwapChain]
);
typed_handle!(
    /// Handle to a framebuffer.
    FramebufferHandle, "framebuffer", [Framebuffer]
);
typed_handle!(
    /// Handle to anything that can be bound as the graphics render target.
    RenderTargetHandle, "render target", [SwapChain, Framebuffer]
);
typed_handle!(
    /// Handle to a vertex buffer.
    VertexBufferHandle, "vertex buffer", [VertexBuffer]
);
typed_handle!(
    /// Handle to an index buffer.
    IndexBufferHandle, "index buffer", [IndexBuffer]
);
typed_handle!(
    /// Handle to a texture buffer.
    TextureBufferHandle, "texture buffer", [TextureBuffer]
);
typed_handle!(
    /// Handle to a structured buffer.
    StructuredBufferHandle, "structured buffer", [StructuredBuffer]
);
typed_handle!(
    /// Handle to an indirect buffer.
    IndirectBufferHandle, "indirect buffer", [IndirectBuffer]
);
typed_handle!(
    /// Handle to a uniform buffer.
    UniformBufferHandle, "uniform buffer", [UniformBuffer]
);
typed_handle!(
    /// Handle to a texture of any dimensionality.
    TextureHandle, "texture",
    [Texture1D, Texture1DArray, Texture2D, Texture2DArray, Texture3D, TextureCube, TextureCubeArray]
);
typed_handle!(
    /// Handle to a graphics pipeline state.
    GraphicsPipelineStateHandle, "graphics pipeline state", [GraphicsPipelineState]
);
typed_handle!(
    /// Handle to a compute pipeline state.
    ComputePipelineStateHandle, "compute pipeline state", [ComputePipelineState]
);
typed_handle!(
    /// Handle to a sampler state.
    SamplerStateHandle, "sampler state", [SamplerState]
);
typed_handle!(
    /// Handle to a shader of any stage.
    ShaderHandle, "shader",
    [
        VertexShader,
        TessellationControlShader,
        TessellationEvaluationShader,
        GeometryShader,
        FragmentShader,
        TaskShader,
        MeshShader,
        ComputeShader
    ]
);

impl From<SwapChainHandle> for RenderTargetHandle {
    fn from(handle: SwapChainHandle) -> Self {
        Self(handle.raw())
    }
}

impl From<FramebufferHandle> for RenderTargetHandle {
    fn from(handle: FramebufferHandle) -> Self {
        Self(handle.raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_handles_only_accept_their_resource_types() {
        let owner = RhiId::from_raw(9);
        let texture = ResourceHandle::new(owner, 0, 0, ResourceType::TextureCube);
        let buffer = ResourceHandle::new(owner, 1, 0, ResourceType::VertexBuffer);

        assert!(TextureHandle::try_from_raw(texture).is_some());
        assert!(TextureHandle::try_from_raw(buffer).is_none());
        assert!(VertexBufferHandle::try_from_raw(buffer).is_some());
    }

    #[test]
    fn render_target_accepts_swap_chains_and_framebuffers() {
        let owner = RhiId::from_raw(1);
        let swap_chain =
            SwapChainHandle::try_from_raw(ResourceHandle::new(owner, 0, 0, ResourceType::SwapChain))
                .unwrap();
        let render_target: RenderTargetHandle = swap_chain.into();
        assert_eq!(render_target.raw(), swap_chain.raw());

        let texture = ResourceHandle::new(owner, 1, 0, ResourceType::Texture2D);
        assert!(RenderTargetHandle::try_from_raw(texture).is_none());
    }

    #[test]
    fn resource_type_classification() {
        let textures = ResourceType::ALL.iter().filter(|t| t.is_texture()).count();
        let buffers = ResourceType::ALL.iter().filter(|t| t.is_buffer()).count();
        let shaders = ResourceType::ALL.iter().filter(|t| t.is_shader()).count();
        assert_eq!((textures, buffers, shaders), (7, 6, 8));
    }

    #[test]
    fn rhi_ids_are_unique() {
        assert_ne!(RhiId::next(), RhiId::next());
    }
}

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

//! Defines the hierarchy of error types for the RHI.

use crate::rhi::api::BackendType;
use crate::rhi::resource::{ResourceHandle, ResourceType};
use std::fmt;

/// An error related to the creation of a graphics or compute pipeline state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The root signature handle is dead, foreign or not a root signature.
    InvalidRootSignature(ResourceHandle),
    /// The graphics program handle is dead, foreign or not a graphics program.
    InvalidGraphicsProgram(ResourceHandle),
    /// The compute shader handle is dead, foreign or not a compute shader.
    InvalidComputeShader(ResourceHandle),
    /// The render pass handle is dead, foreign or not a render pass.
    InvalidRenderPass(ResourceHandle),
    /// The primitive topology and topology type do not agree.
    InvalidTopology(String),
    /// The number of render targets does not match the render pass.
    RenderTargetMismatch {
        /// Number of color attachments declared by the render pass.
        expected: u32,
        /// Number of render targets declared by the pipeline state.
        found: u32,
    },
    /// The vertex attributes differ from the ones the graphics program was built with.
    VertexAttributesMismatch,
    /// The root signature differs from the one the graphics program was built with.
    RootSignatureMismatch,
    /// No pipeline state ID is left in the backend's ID pool.
    IdPoolExhausted {
        /// The capacity of the exhausted pool.
        capacity: u32,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidRootSignature(handle) => {
                write!(f, "Invalid root signature {handle}")
            }
            PipelineError::InvalidGraphicsProgram(handle) => {
                write!(f, "Invalid graphics program {handle}")
            }
            PipelineError::InvalidComputeShader(handle) => {
                write!(f, "Invalid compute shader {handle}")
            }
            PipelineError::InvalidRenderPass(handle) => {
                write!(f, "Invalid render pass {handle}")
            }
            PipelineError::InvalidTopology(msg) => write!(f, "Invalid primitive topology: {msg}"),
            PipelineError::RenderTargetMismatch { expected, found } => write!(
                f,
                "Render pass declares {expected} color attachments but the pipeline state declares {found} render targets"
            ),
            PipelineError::VertexAttributesMismatch => write!(
                f,
                "Vertex attributes do not match the ones of the graphics program"
            ),
            PipelineError::RootSignatureMismatch => write!(
                f,
                "Root signature does not match the one of the graphics program"
            ),
            PipelineError::IdPoolExhausted { capacity } => {
                write!(f, "Pipeline state ID pool exhausted (capacity {capacity})")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// An error related to the creation or use of an RHI resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// A pipeline-specific error occurred.
    Pipeline(PipelineError),
    /// The handle refers to a resource that was already destroyed.
    InvalidHandle(ResourceHandle),
    /// The handle belongs to a different RHI instance.
    WrongOwner(ResourceHandle),
    /// The handle refers to a resource of an unexpected type.
    WrongResourceType {
        /// What the operation expected.
        expected: &'static str,
        /// The type of the resource that was passed.
        found: ResourceType,
    },
    /// A creation description violates the RHI contract.
    InvalidDescriptor(String),
    /// The requested feature is not supported by the backend's capabilities.
    Unsupported(String),
    /// An access was out of the resource's bounds.
    OutOfBounds,
    /// The resource is already mapped.
    AlreadyMapped(ResourceHandle),
    /// The resource is not currently mapped.
    NotMapped(ResourceHandle),
    /// An error originating from the specific backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Pipeline(err) => write!(f, "Pipeline resource error: {err}"),
            ResourceError::InvalidHandle(handle) => {
                write!(f, "Invalid or destroyed resource handle {handle}")
            }
            ResourceError::WrongOwner(handle) => {
                write!(f, "Resource {handle} belongs to a different RHI instance")
            }
            ResourceError::WrongResourceType { expected, found } => {
                write!(f, "Expected a {expected} resource, found {found}")
            }
            ResourceError::InvalidDescriptor(msg) => write!(f, "Invalid descriptor: {msg}"),
            ResourceError::Unsupported(msg) => write!(f, "Unsupported feature: {msg}"),
            ResourceError::OutOfBounds => write!(f, "Resource access out of bounds."),
            ResourceError::AlreadyMapped(handle) => {
                write!(f, "Resource {handle} is already mapped")
            }
            ResourceError::NotMapped(handle) => write!(f, "Resource {handle} is not mapped"),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Pipeline(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PipelineError> for ResourceError {
    fn from(err: PipelineError) -> Self {
        ResourceError::Pipeline(err)
    }
}

/// A high-level error of an RHI instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// No implementation of the requested backend is compiled into this build.
    BackendUnavailable(BackendType),
    /// A failure occurred during the initialization of the backend.
    InitializationFailed(String),
    /// An error occurred while managing a resource.
    ResourceError(ResourceError),
    /// An unexpected or internal error occurred.
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::BackendUnavailable(backend) => {
                write!(f, "The {backend:?} backend is not available in this build")
            }
            RenderError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize RHI backend: {msg}")
            }
            RenderError::ResourceError(err) => {
                write!(f, "RHI resource operation failed: {err}")
            }
            RenderError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;
    use crate::rhi::resource::RhiId;

    #[test]
    fn pipeline_error_display() {
        let err = PipelineError::RenderTargetMismatch {
            expected: 1,
            found: 2,
        };
        assert_eq!(
            format!("{err}"),
            "Render pass declares 1 color attachments but the pipeline state declares 2 render targets"
        );
    }

    #[test]
    fn resource_error_display_wrapping_pipeline_error() {
        let res_err: ResourceError = PipelineError::IdPoolExhausted { capacity: 4 }.into();
        assert_eq!(
            format!("{res_err}"),
            "Pipeline resource error: Pipeline state ID pool exhausted (capacity 4)"
        );
        assert!(res_err.source().is_some());
    }

    #[test]
    fn render_error_display_wrapping_resource_error() {
        let handle = ResourceHandle::new(RhiId::from_raw(1), 2, 3, ResourceType::Texture2D);
        let render_err: RenderError = ResourceError::InvalidHandle(handle).into();
        assert_eq!(
            format!("{render_err}"),
            "RHI resource operation failed: Invalid or destroyed resource handle Texture2D#2v3@rhi1"
        );
        assert!(render_err.source().is_some());
        assert!(render_err.source().unwrap().source().is_none());
    }
}

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

//! Shaders and graphics programs.

use crate::rhi::api::vertex::VertexAttributes;
use crate::rhi::error::ResourceError;
use crate::rhi::resource::{ResourceType, RootSignatureHandle, ShaderHandle, TypedHandle};
use std::borrow::Cow;

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Tessellation control (hull) stage.
    TessellationControl,
    /// Tessellation evaluation (domain) stage.
    TessellationEvaluation,
    /// Geometry stage.
    Geometry,
    /// Fragment (pixel) stage.
    Fragment,
    /// Task (amplification) stage.
    Task,
    /// Mesh stage.
    Mesh,
    /// Compute stage.
    Compute,
}

impl ShaderStage {
    /// The resource type of shaders of this stage.
    pub const fn resource_type(self) -> ResourceType {
        match self {
            ShaderStage::Vertex => ResourceType::VertexShader,
            ShaderStage::TessellationControl => ResourceType::TessellationControlShader,
            ShaderStage::TessellationEvaluation => ResourceType::TessellationEvaluationShader,
            ShaderStage::Geometry => ResourceType::GeometryShader,
            ShaderStage::Fragment => ResourceType::FragmentShader,
            ShaderStage::Task => ResourceType::TaskShader,
            ShaderStage::Mesh => ResourceType::MeshShader,
            ShaderStage::Compute => ResourceType::ComputeShader,
        }
    }
}

/// The code of a shader.
#[derive(Debug, Clone)]
pub enum ShaderSource<'a> {
    /// Shader source code in the backend's shading language.
    Source(Cow<'a, str>),
    /// Precompiled bytecode. Requires the `shader_bytecode` capability.
    Bytecode(Cow<'a, [u8]>),
}

impl ShaderSource<'_> {
    /// Returns `true` if there is no code at all.
    pub fn is_empty(&self) -> bool {
        match self {
            ShaderSource::Source(source) => source.trim().is_empty(),
            ShaderSource::Bytecode(bytecode) => bytecode.is_empty(),
        }
    }
}

/// Describes a shader.
#[derive(Debug, Clone)]
pub struct ShaderDescriptor<'a> {
    /// Optional debug name.
    pub label: Option<Cow<'a, str>>,
    /// The pipeline stage.
    pub stage: ShaderStage,
    /// The code.
    pub source: ShaderSource<'a>,
    /// The entry point function name.
    pub entry_point: Cow<'a, str>,
}

/// The shaders linked into a graphics program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicsProgramShaders {
    /// Traditional vertex pipeline.
    Vertex {
        /// Vertex shader.
        vertex: ShaderHandle,
        /// Optional tessellation control shader, paired with an evaluation shader.
        tessellation_control: Option<ShaderHandle>,
        /// Optional tessellation evaluation shader.
        tessellation_evaluation: Option<ShaderHandle>,
        /// Optional geometry shader.
        geometry: Option<ShaderHandle>,
        /// Optional fragment shader.
        fragment: Option<ShaderHandle>,
    },
    /// Task/mesh pipeline.
    Mesh {
        /// Optional task shader.
        task: Option<ShaderHandle>,
        /// Mesh shader.
        mesh: ShaderHandle,
        /// Optional fragment shader.
        fragment: Option<ShaderHandle>,
    },
}

impl GraphicsProgramShaders {
    /// The linked shaders with the stage each one must have.
    pub fn stages(&self) -> Vec<(ShaderStage, ShaderHandle)> {
        let slots: Vec<(ShaderStage, Option<ShaderHandle>)> = match *self {
            GraphicsProgramShaders::Vertex {
                vertex,
                tessellation_control,
                tessellation_evaluation,
                geometry,
                fragment,
            } => vec![
                (ShaderStage::Vertex, Some(vertex)),
                (ShaderStage::TessellationControl, tessellation_control),
                (ShaderStage::TessellationEvaluation, tessellation_evaluation),
                (ShaderStage::Geometry, geometry),
                (ShaderStage::Fragment, fragment),
            ],
            GraphicsProgramShaders::Mesh {
                task,
                mesh,
                fragment,
            } => vec![
                (ShaderStage::Task, task),
                (ShaderStage::Mesh, Some(mesh)),
                (ShaderStage::Fragment, fragment),
            ],
        };
        slots
            .into_iter()
            .filter_map(|(stage, shader)| shader.map(|shader| (stage, shader)))
            .collect()
    }

    /// Checks that every shader sits in the slot of its own stage and that
    /// tessellation shaders come in pairs.
    pub fn validate(&self) -> Result<(), ResourceError> {
        for (stage, shader) in self.stages() {
            let found = shader.raw().resource_type();
            if found != stage.resource_type() {
                return Err(ResourceError::WrongResourceType {
                    expected: stage_name(stage),
                    found,
                });
            }
        }
        if let GraphicsProgramShaders::Vertex {
            tessellation_control,
            tessellation_evaluation,
            ..
        } = self
        {
            if tessellation_control.is_some() != tessellation_evaluation.is_some() {
                return Err(ResourceError::InvalidDescriptor(
                    "tessellation control and evaluation shaders must be used together".into(),
                ));
            }
        }
        Ok(())
    }
}

fn stage_name(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex => "vertex shader",
        ShaderStage::TessellationControl => "tessellation control shader",
        ShaderStage::TessellationEvaluation => "tessellation evaluation shader",
        ShaderStage::Geometry => "geometry shader",
        ShaderStage::Fragment => "fragment shader",
        ShaderStage::Task => "task shader",
        ShaderStage::Mesh => "mesh shader",
        ShaderStage::Compute => "compute shader",
    }
}

/// Describes a graphics program.
#[derive(Debug, Clone)]
pub struct GraphicsProgramDescriptor<'a> {
    /// Optional debug name.
    pub label: Option<Cow<'a, str>>,
    /// The root signature the program's resources are laid out by.
    pub root_signature: RootSignatureHandle,
    /// The vertex input layout. Pipeline states using the program must use the same layout.
    pub vertex_attributes: VertexAttributes,
    /// The linked shaders.
    pub shaders: GraphicsProgramShaders,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rhi::resource::{ResourceHandle, RhiId};

    fn shader(resource_type: ResourceType) -> ShaderHandle {
        ShaderHandle::try_from_raw(ResourceHandle::new(RhiId::from_raw(1), 0, 0, resource_type))
            .unwrap()
    }

    #[test]
    fn shaders_must_match_their_slot() {
        let valid = GraphicsProgramShaders::Vertex {
            vertex: shader(ResourceType::VertexShader),
            tessellation_control: None,
            tessellation_evaluation: None,
            geometry: None,
            fragment: Some(shader(ResourceType::FragmentShader)),
        };
        assert!(valid.validate().is_ok());
        assert_eq!(valid.stages().len(), 2);

        let swapped = GraphicsProgramShaders::Vertex {
            vertex: shader(ResourceType::FragmentShader),
            tessellation_control: None,
            tessellation_evaluation: None,
            geometry: None,
            fragment: None,
        };
        assert!(matches!(
            swapped.validate(),
            Err(ResourceError::WrongResourceType { .. })
        ));
    }

    #[test]
    fn tessellation_shaders_come_in_pairs() {
        let program = GraphicsProgramShaders::Vertex {
            vertex: shader(ResourceType::VertexShader),
            tessellation_control: Some(shader(ResourceType::TessellationControlShader)),
            tessellation_evaluation: None,
            geometry: None,
            fragment: None,
        };
        assert!(program.validate().is_err());
    }
}

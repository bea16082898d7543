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

//! Graphics and compute pipeline state descriptions.

use super::format::TextureFormat;
use super::render_target::MAXIMUM_NUMBER_OF_COLOR_ATTACHMENTS;
use super::state::{BlendState, DepthStencilState, RasterizerState};
use super::vertex::VertexAttributes;
use crate::rhi::error::PipelineError;
use crate::rhi::resource::{GraphicsProgramHandle, RenderPassHandle, RootSignatureHandle, ShaderHandle};
use std::borrow::Cow;

/// Largest number of control points of a patch list.
pub const MAXIMUM_NUMBER_OF_PATCH_CONTROL_POINTS: u8 = 32;

/// How vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    /// Unknown topology.
    Unknown,
    /// Points.
    PointList,
    /// Independent lines.
    LineList,
    /// Connected lines.
    LineStrip,
    /// Independent triangles.
    TriangleList,
    /// Connected triangles.
    TriangleStrip,
    /// Lines with adjacency.
    LineListAdjacency,
    /// Line strip with adjacency.
    LineStripAdjacency,
    /// Triangles with adjacency.
    TriangleListAdjacency,
    /// Triangle strip with adjacency.
    TriangleStripAdjacency,
    /// Tessellation patches of `1..=32` control points.
    PatchList(u8),
}

impl PrimitiveTopology {
    /// The topology type this topology belongs to.
    pub fn topology_type(self) -> PrimitiveTopologyType {
        match self {
            PrimitiveTopology::Unknown => PrimitiveTopologyType::Undefined,
            PrimitiveTopology::PointList => PrimitiveTopologyType::Point,
            PrimitiveTopology::LineList
            | PrimitiveTopology::LineStrip
            | PrimitiveTopology::LineListAdjacency
            | PrimitiveTopology::LineStripAdjacency => PrimitiveTopologyType::Line,
            PrimitiveTopology::TriangleList
            | PrimitiveTopology::TriangleStrip
            | PrimitiveTopology::TriangleListAdjacency
            | PrimitiveTopology::TriangleStripAdjacency => PrimitiveTopologyType::Triangle,
            PrimitiveTopology::PatchList(_) => PrimitiveTopologyType::Patch,
        }
    }
}

/// The coarse primitive class a pipeline state is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopologyType {
    /// Not specified.
    Undefined,
    /// Points.
    Point,
    /// Lines.
    Line,
    /// Triangles.
    Triangle,
    /// Tessellation patches.
    Patch,
}

/// Checks a topology against its topology type and the patch control point range.
pub fn validate_topology(
    topology: PrimitiveTopology,
    topology_type: PrimitiveTopologyType,
) -> Result<(), PipelineError> {
    if let PrimitiveTopology::PatchList(control_points) = topology {
        if !(1..=MAXIMUM_NUMBER_OF_PATCH_CONTROL_POINTS).contains(&control_points) {
            return Err(PipelineError::InvalidTopology(format!(
                "patch lists take 1 to {MAXIMUM_NUMBER_OF_PATCH_CONTROL_POINTS} control points, got {control_points}"
            )));
        }
    }
    if topology.topology_type() != topology_type {
        return Err(PipelineError::InvalidTopology(format!(
            "{topology:?} does not belong to topology type {topology_type:?}"
        )));
    }
    Ok(())
}

/// Describes a graphics pipeline state.
#[derive(Debug, Clone)]
pub struct GraphicsPipelineStateDescriptor<'a> {
    /// Optional debug name.
    pub label: Option<Cow<'a, str>>,
    /// The resource layout.
    pub root_signature: RootSignatureHandle,
    /// The linked shaders.
    pub graphics_program: GraphicsProgramHandle,
    /// The vertex input layout, identical to the graphics program's.
    pub vertex_attributes: VertexAttributes,
    /// Primitive assembly.
    pub primitive_topology: PrimitiveTopology,
    /// Primitive class.
    pub primitive_topology_type: PrimitiveTopologyType,
    /// Rasterizer state.
    pub rasterizer_state: RasterizerState,
    /// Depth-stencil state.
    pub depth_stencil_state: DepthStencilState,
    /// Blend state.
    pub blend_state: BlendState,
    /// Number of color render targets, equal to the render pass's color attachments.
    pub number_of_render_targets: u32,
    /// Format of each color render target.
    pub render_target_formats: [TextureFormat; MAXIMUM_NUMBER_OF_COLOR_ATTACHMENTS],
    /// Format of the depth-stencil target.
    pub depth_stencil_view_format: TextureFormat,
    /// The render pass the pipeline state renders into.
    pub render_pass: RenderPassHandle,
}

impl<'a> GraphicsPipelineStateDescriptor<'a> {
    /// A triangle-list pipeline with default state blocks and one color target.
    pub fn new(
        root_signature: RootSignatureHandle,
        graphics_program: GraphicsProgramHandle,
        vertex_attributes: VertexAttributes,
        render_pass: RenderPassHandle,
    ) -> Self {
        let mut render_target_formats = [TextureFormat::Unknown; MAXIMUM_NUMBER_OF_COLOR_ATTACHMENTS];
        render_target_formats[0] = TextureFormat::R8G8B8A8;
        Self {
            label: None,
            root_signature,
            graphics_program,
            vertex_attributes,
            primitive_topology: PrimitiveTopology::TriangleList,
            primitive_topology_type: PrimitiveTopologyType::Triangle,
            rasterizer_state: RasterizerState::default(),
            depth_stencil_state: DepthStencilState::default(),
            blend_state: BlendState::default(),
            number_of_render_targets: 1,
            render_target_formats,
            depth_stencil_view_format: TextureFormat::D32Float,
            render_pass,
        }
    }

    /// Sets the debug name.
    pub fn with_label(mut self, label: impl Into<Cow<'a, str>>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Describes a compute pipeline state.
#[derive(Debug, Clone)]
pub struct ComputePipelineStateDescriptor<'a> {
    /// Optional debug name.
    pub label: Option<Cow<'a, str>>,
    /// The resource layout.
    pub root_signature: RootSignatureHandle,
    /// A compute shader.
    pub compute_shader: ShaderHandle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_lists_pair_only_with_patch_type() {
        assert!(validate_topology(PrimitiveTopology::PatchList(3), PrimitiveTopologyType::Patch).is_ok());
        assert!(validate_topology(PrimitiveTopology::PatchList(32), PrimitiveTopologyType::Patch).is_ok());
        assert!(validate_topology(PrimitiveTopology::PatchList(3), PrimitiveTopologyType::Triangle).is_err());
        assert!(validate_topology(PrimitiveTopology::TriangleList, PrimitiveTopologyType::Patch).is_err());
    }

    #[test]
    fn patch_control_points_are_bounded() {
        assert!(validate_topology(PrimitiveTopology::PatchList(0), PrimitiveTopologyType::Patch).is_err());
        assert!(validate_topology(PrimitiveTopology::PatchList(33), PrimitiveTopologyType::Patch).is_err());
    }
}

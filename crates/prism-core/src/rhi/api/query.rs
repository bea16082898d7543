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

//! GPU query pools.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use std::borrow::Cow;

/// The kind of queries a pool holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// Number of samples passing the depth and stencil tests.
    Occlusion,
    /// Pipeline statistics, see [`PipelineStatisticsQueryResult`].
    PipelineStatistics,
    /// GPU timestamps.
    Timestamp,
}

impl QueryType {
    /// Size of one query result in bytes.
    pub const fn result_size(self) -> usize {
        match self {
            QueryType::Occlusion | QueryType::Timestamp => std::mem::size_of::<u64>(),
            QueryType::PipelineStatistics => std::mem::size_of::<PipelineStatisticsQueryResult>(),
        }
    }
}

/// Describes a query pool.
#[derive(Debug, Clone)]
pub struct QueryPoolDescriptor<'a> {
    /// Optional debug name.
    pub label: Option<Cow<'a, str>>,
    /// The query kind.
    pub query_type: QueryType,
    /// Number of queries, at least one.
    pub number_of_queries: u32,
}

bitflags! {
    /// Options of a query result readback.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct QueryResultFlags: u32 {
        /// Block until the results are available.
        const WAIT = 1 << 0;
    }
}

/// Result record of a pipeline statistics query.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct PipelineStatisticsQueryResult {
    /// Vertices read by the input assembler.
    pub number_of_input_assembler_vertices: u64,
    /// Primitives read by the input assembler.
    pub number_of_input_assembler_primitives: u64,
    /// Vertex shader invocations.
    pub number_of_vertex_shader_invocations: u64,
    /// Geometry shader invocations.
    pub number_of_geometry_shader_invocations: u64,
    /// Primitives emitted by the geometry shader.
    pub number_of_geometry_shader_output_primitives: u64,
    /// Primitives sent to the rasterizer.
    pub number_of_clipping_input_primitives: u64,
    /// Primitives leaving the clipper.
    pub number_of_clipping_output_primitives: u64,
    /// Fragment shader invocations.
    pub number_of_fragment_shader_invocations: u64,
    /// Tessellation control shader invocations.
    pub number_of_tessellation_control_shader_invocations: u64,
    /// Tessellation evaluation shader invocations.
    pub number_of_tessellation_evaluation_shader_invocations: u64,
    /// Compute shader invocations.
    pub number_of_compute_shader_invocations: u64,
}

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

//! Plain-old-data payloads of draw, viewport and clear commands.
//!
//! These structs have the exact layout of the matching indirect argument
//! records, so they can be copied byte for byte into indirect buffers and
//! into a command buffer's auxiliary words.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};

/// A viewport rectangle plus depth range.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Viewport {
    /// Left edge in pixels.
    pub top_left_x: f32,
    /// Top edge in pixels.
    pub top_left_y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Minimum depth, usually 0.
    pub min_depth: f32,
    /// Maximum depth, usually 1.
    pub max_depth: f32,
}

impl Viewport {
    /// A full-depth viewport covering `width` x `height` pixels.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            top_left_x: 0.0,
            top_left_y: 0.0,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// A scissor rectangle in pixels.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ScissorRectangle {
    /// Left edge.
    pub top_left_x: i32,
    /// Top edge.
    pub top_left_y: i32,
    /// Right edge, exclusive.
    pub bottom_right_x: i32,
    /// Bottom edge, exclusive.
    pub bottom_right_y: i32,
}

/// Arguments of a non-indexed draw.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawArguments {
    /// Vertices per instance.
    pub vertex_count_per_instance: u32,
    /// Number of instances.
    pub instance_count: u32,
    /// First vertex.
    pub start_vertex_location: u32,
    /// First instance.
    pub start_instance_location: u32,
}

impl DrawArguments {
    /// Draw `vertex_count` vertices once.
    pub fn new(vertex_count: u32) -> Self {
        Self {
            vertex_count_per_instance: vertex_count,
            instance_count: 1,
            start_vertex_location: 0,
            start_instance_location: 0,
        }
    }
}

/// Arguments of an indexed draw.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawIndexedArguments {
    /// Indices per instance.
    pub index_count_per_instance: u32,
    /// Number of instances.
    pub instance_count: u32,
    /// First index.
    pub start_index_location: u32,
    /// Value added to every index.
    pub base_vertex_location: i32,
    /// First instance.
    pub start_instance_location: u32,
}

impl DrawIndexedArguments {
    /// Draw `index_count` indices once.
    pub fn new(index_count: u32) -> Self {
        Self {
            index_count_per_instance: index_count,
            instance_count: 1,
            start_index_location: 0,
            base_vertex_location: 0,
            start_instance_location: 0,
        }
    }
}

/// Arguments of a mesh-shader draw.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawMeshTasksArguments {
    /// Number of task workgroups.
    pub number_of_tasks: u32,
    /// First task.
    pub first_task: u32,
}

bitflags! {
    /// What a clear command clears.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClearFlags: u32 {
        /// The color render targets.
        const COLOR = 1 << 0;
        /// The depth buffer.
        const DEPTH = 1 << 1;
        /// The stencil buffer.
        const STENCIL = 1 << 2;
        /// Color and depth.
        const COLOR_DEPTH = Self::COLOR.bits() | Self::DEPTH.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_records_have_indirect_buffer_layout() {
        assert_eq!(std::mem::size_of::<DrawArguments>(), 16);
        assert_eq!(std::mem::size_of::<DrawIndexedArguments>(), 20);
        assert_eq!(std::mem::size_of::<DrawMeshTasksArguments>(), 8);
    }
}

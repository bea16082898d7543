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

//! Capabilities reported by a backend after initialization.

use super::format::TextureFormat;

/// The fixed set of limits and feature bits of an RHI instance.
///
/// Filled once when the backend is initialized and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Name of the device, e.g. the GPU model.
    pub device_name: String,
    /// Preferred color format of swap chains.
    pub preferred_swap_chain_color_texture_format: TextureFormat,
    /// Preferred depth-stencil format of swap chains.
    pub preferred_swap_chain_depth_stencil_texture_format: TextureFormat,
    /// Maximum number of viewports and scissor rectangles set at once.
    pub maximum_number_of_viewports: u32,
    /// Maximum number of simultaneous color render targets.
    pub maximum_number_of_simultaneous_render_targets: u32,
    /// Maximum width, height or depth of a texture.
    pub maximum_texture_dimension: u32,
    /// Maximum number of slices of a 1D texture array, 0 if unsupported.
    pub maximum_number_of_1d_texture_array_slices: u32,
    /// Maximum number of slices of a 2D texture array, 0 if unsupported.
    pub maximum_number_of_2d_texture_array_slices: u32,
    /// Maximum number of cubes of a cube texture array, 0 if unsupported.
    pub maximum_number_of_cube_texture_array_slices: u32,
    /// Maximum size of a texture buffer in bytes, 0 if unsupported.
    pub maximum_texture_buffer_size: u32,
    /// Maximum size of a structured buffer in bytes, 0 if unsupported.
    pub maximum_structured_buffer_size: u32,
    /// Maximum size of an indirect buffer in bytes, 0 if unsupported.
    pub maximum_indirect_buffer_size: u32,
    /// Maximum size of a uniform buffer in bytes, 0 if unsupported.
    pub maximum_uniform_buffer_size: u32,
    /// Maximum number of multisamples (1, 2, 4 or 8).
    pub maximum_number_of_multisamples: u8,
    /// Maximum anisotropy of samplers.
    pub maximum_anisotropy: u8,
    /// Texture origin is the upper-left corner (Direct3D style).
    pub upper_left_origin: bool,
    /// Clip-space Z ranges from 0 to 1 (Direct3D style) instead of -1 to 1.
    pub zero_to_one_clip_z: bool,
    /// Individual uniforms are supported in addition to uniform buffers.
    pub individual_uniforms: bool,
    /// Per-instance vertex attributes are supported.
    pub instanced_arrays: bool,
    /// Instanced draw calls are supported.
    pub draw_instanced: bool,
    /// Base vertex in indexed draws is supported.
    pub base_vertex: bool,
    /// The instance can be used from any thread, one at a time.
    pub native_multithreading: bool,
    /// Shaders can be created from bytecode.
    pub shader_bytecode: bool,
    /// Vertex shaders are supported.
    pub vertex_shader: bool,
    /// Maximum number of vertices per patch, 0 without tessellation.
    pub maximum_number_of_patch_vertices: u32,
    /// Maximum number of vertices emitted by a geometry shader, 0 without geometry shaders.
    pub maximum_number_of_gs_output_vertices: u32,
    /// Fragment shaders are supported.
    pub fragment_shader: bool,
    /// Task and mesh shaders are supported.
    pub mesh_shader: bool,
    /// Compute shaders are supported.
    pub compute_shader: bool,
    /// Mipmap generation on the GPU is supported.
    pub mipmap_generation: bool,
    /// The backend uses its direct-state-access code path.
    pub direct_state_access: bool,
}

impl Capabilities {
    /// Returns `true` if tessellation shaders are supported.
    pub fn tessellation(&self) -> bool {
        self.maximum_number_of_patch_vertices > 0
    }

    /// Returns `true` if geometry shaders are supported.
    pub fn geometry_shader(&self) -> bool {
        self.maximum_number_of_gs_output_vertices > 0
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            device_name: String::new(),
            preferred_swap_chain_color_texture_format: TextureFormat::R8G8B8A8,
            preferred_swap_chain_depth_stencil_texture_format: TextureFormat::D32Float,
            maximum_number_of_viewports: 1,
            maximum_number_of_simultaneous_render_targets: 1,
            maximum_texture_dimension: 2048,
            maximum_number_of_1d_texture_array_slices: 0,
            maximum_number_of_2d_texture_array_slices: 0,
            maximum_number_of_cube_texture_array_slices: 0,
            maximum_texture_buffer_size: 0,
            maximum_structured_buffer_size: 0,
            maximum_indirect_buffer_size: 0,
            maximum_uniform_buffer_size: 16 * 1024,
            maximum_number_of_multisamples: 1,
            maximum_anisotropy: 1,
            upper_left_origin: true,
            zero_to_one_clip_z: true,
            individual_uniforms: false,
            instanced_arrays: false,
            draw_instanced: false,
            base_vertex: false,
            native_multithreading: false,
            shader_bytecode: false,
            vertex_shader: true,
            maximum_number_of_patch_vertices: 0,
            maximum_number_of_gs_output_vertices: 0,
            fragment_shader: true,
            mesh_shader: false,
            compute_shader: false,
            mipmap_generation: false,
            direct_state_access: false,
        }
    }
}

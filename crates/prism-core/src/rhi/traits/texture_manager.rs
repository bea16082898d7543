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

use crate::rhi::api::{TextureDescriptor, TextureLayout};
use crate::rhi::error::ResourceError;
use crate::rhi::resource::{ResourceRef, TextureHandle};
use std::fmt::Debug;

/// Creates the texture resources of one RHI.
///
/// Only [`create_texture`](TextureManager::create_texture) has to be
/// implemented; the per-dimension factories build the layout and delegate.
pub trait TextureManager: Send + Sync + Debug {
    /// Creates a texture of any dimension.
    /// ## Arguments
    /// * `layout` - Dimension, extent and number of array slices.
    /// * `descriptor` - Format, optional initial data, flags, usage and multisampling.
    /// ## Returns
    /// A reference to the new texture.
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - If the creation rules are violated.
    /// * `ResourceError::Unsupported` - If the backend lacks the texture kind or sample count.
    fn create_texture(
        &self,
        layout: &TextureLayout,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<ResourceRef<TextureHandle>, ResourceError>;

    /// Creates a 1D texture.
    fn create_texture_1d(
        &self,
        width: u32,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<ResourceRef<TextureHandle>, ResourceError> {
        self.create_texture(&TextureLayout::d1(width), descriptor)
    }

    /// Creates a 1D texture array.
    fn create_texture_1d_array(
        &self,
        width: u32,
        number_of_slices: u32,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<ResourceRef<TextureHandle>, ResourceError> {
        self.create_texture(&TextureLayout::d1_array(width, number_of_slices), descriptor)
    }

    /// Creates a 2D texture.
    fn create_texture_2d(
        &self,
        width: u32,
        height: u32,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<ResourceRef<TextureHandle>, ResourceError> {
        self.create_texture(&TextureLayout::d2(width, height), descriptor)
    }

    /// Creates a 2D texture array.
    fn create_texture_2d_array(
        &self,
        width: u32,
        height: u32,
        number_of_slices: u32,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<ResourceRef<TextureHandle>, ResourceError> {
        self.create_texture(
            &TextureLayout::d2_array(width, height, number_of_slices),
            descriptor,
        )
    }

    /// Creates a 3D texture.
    fn create_texture_3d(
        &self,
        width: u32,
        height: u32,
        depth: u32,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<ResourceRef<TextureHandle>, ResourceError> {
        self.create_texture(&TextureLayout::d3(width, height, depth), descriptor)
    }

    /// Creates a cube texture with six square faces of `width` texels.
    fn create_texture_cube(
        &self,
        width: u32,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<ResourceRef<TextureHandle>, ResourceError> {
        self.create_texture(&TextureLayout::cube(width), descriptor)
    }

    /// Creates an array of `number_of_cubes` cube textures.
    fn create_texture_cube_array(
        &self,
        width: u32,
        number_of_cubes: u32,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<ResourceRef<TextureHandle>, ResourceError> {
        self.create_texture(&TextureLayout::cube_array(width, number_of_cubes), descriptor)
    }
}

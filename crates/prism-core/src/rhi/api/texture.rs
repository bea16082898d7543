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

//! Texture descriptions, the mip-chain size law and the mip upload plan.
//!
//! Every texture kind follows the same mip law: at level `k` each dimension
//! is `max(1, size >> k)`. Array slices and cube faces never shrink, the
//! depth of a 3D texture does. Data that contains a mip chain is packed
//! mip-major: all slices of level 0, then all slices of level 1, and so on.

use super::capabilities::Capabilities;
use super::format::TextureFormat;
use crate::rhi::error::ResourceError;
use crate::rhi::resource::ResourceType;
use bitflags::bitflags;
use std::borrow::Cow;

bitflags! {
    /// Creation flags of a texture.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextureFlags: u32 {
        /// Read/write access from shaders.
        const UNORDERED_ACCESS = 1 << 0;
        /// Read access from shaders.
        const SHADER_RESOURCE = 1 << 1;
        /// Usable as a framebuffer attachment. Such textures never take initial data.
        const RENDER_TARGET = 1 << 2;
        /// The initial data holds the complete mip chain.
        const DATA_CONTAINS_MIPMAPS = 1 << 3;
        /// Generate the mip chain from level 0 after upload.
        const GENERATE_MIPMAPS = 1 << 4;
    }
}

/// The expected update pattern of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureUsage {
    /// GPU read/write.
    #[default]
    Default,
    /// GPU read only, initialized at creation.
    Immutable,
    /// GPU read, CPU write.
    Dynamic,
    /// Transfer to and from the CPU.
    Staging,
}

/// The clear value a render target is optimized for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptimizedClearValue {
    /// Color clear value.
    Color([f32; 4]),
    /// Depth-stencil clear value.
    DepthStencil {
        /// Depth clear value.
        depth: f32,
        /// Stencil clear value.
        stencil: u8,
    },
}

/// Describes the contents and usage of a texture. The dimensions are given
/// separately, see [`TextureLayout`].
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// Optional debug name.
    pub label: Option<Cow<'a, str>>,
    /// Texel format.
    pub format: TextureFormat,
    /// Initial contents: level 0, or the whole chain with `DATA_CONTAINS_MIPMAPS`.
    pub data: Option<&'a [u8]>,
    /// Creation flags.
    pub flags: TextureFlags,
    /// Update pattern.
    pub usage: TextureUsage,
    /// 1, 2, 4 or 8. Values above 1 are only valid for 2D textures.
    pub number_of_multisamples: u8,
    /// Optional optimized clear value of render targets.
    pub optimized_clear_value: Option<OptimizedClearValue>,
}

impl<'a> TextureDescriptor<'a> {
    /// A single-sample texture without data.
    pub fn new(format: TextureFormat) -> Self {
        Self {
            label: None,
            format,
            data: None,
            flags: TextureFlags::empty(),
            usage: TextureUsage::Default,
            number_of_multisamples: 1,
            optimized_clear_value: None,
        }
    }

    /// Sets the initial data.
    pub fn with_data(mut self, data: &'a [u8]) -> Self {
        self.data = Some(data);
        self
    }

    /// Sets the creation flags.
    pub fn with_flags(mut self, flags: TextureFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the debug name.
    pub fn with_label(mut self, label: impl Into<Cow<'a, str>>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// The dimensionality of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureDimension {
    /// 1D.
    D1,
    /// 1D array.
    D1Array,
    /// 2D.
    D2,
    /// 2D array.
    D2Array,
    /// 3D.
    D3,
    /// Cube, six 2D faces.
    Cube,
    /// Array of cubes.
    CubeArray,
}

impl TextureDimension {
    /// The resource type of textures of this dimensionality.
    pub const fn resource_type(self) -> ResourceType {
        match self {
            TextureDimension::D1 => ResourceType::Texture1D,
            TextureDimension::D1Array => ResourceType::Texture1DArray,
            TextureDimension::D2 => ResourceType::Texture2D,
            TextureDimension::D2Array => ResourceType::Texture2DArray,
            TextureDimension::D3 => ResourceType::Texture3D,
            TextureDimension::Cube => ResourceType::TextureCube,
            TextureDimension::CubeArray => ResourceType::TextureCubeArray,
        }
    }
}

/// The dimensions of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureLayout {
    /// Dimensionality.
    pub dimension: TextureDimension,
    /// Width of level 0.
    pub width: u32,
    /// Height of level 0, 1 for 1D textures.
    pub height: u32,
    /// Depth of level 0, 1 unless 3D.
    pub depth: u32,
    /// Number of 2D slices: array slices, 6 per cube.
    pub number_of_slices: u32,
}

impl TextureLayout {
    /// A 1D texture.
    pub fn d1(width: u32) -> Self {
        Self::new(TextureDimension::D1, width, 1, 1, 1)
    }

    /// A 1D texture array.
    pub fn d1_array(width: u32, number_of_slices: u32) -> Self {
        Self::new(TextureDimension::D1Array, width, 1, 1, number_of_slices)
    }

    /// A 2D texture.
    pub fn d2(width: u32, height: u32) -> Self {
        Self::new(TextureDimension::D2, width, height, 1, 1)
    }

    /// A 2D texture array.
    pub fn d2_array(width: u32, height: u32, number_of_slices: u32) -> Self {
        Self::new(TextureDimension::D2Array, width, height, 1, number_of_slices)
    }

    /// A 3D texture.
    pub fn d3(width: u32, height: u32, depth: u32) -> Self {
        Self::new(TextureDimension::D3, width, height, depth, 1)
    }

    /// A cube texture with square faces.
    pub fn cube(width: u32) -> Self {
        Self::new(TextureDimension::Cube, width, width, 1, 6)
    }

    /// An array of `number_of_cubes` cube textures.
    pub fn cube_array(width: u32, number_of_cubes: u32) -> Self {
        Self::new(
            TextureDimension::CubeArray,
            width,
            width,
            1,
            number_of_cubes.saturating_mul(6),
        )
    }

    fn new(dimension: TextureDimension, width: u32, height: u32, depth: u32, number_of_slices: u32) -> Self {
        Self {
            dimension,
            width,
            height,
            depth,
            number_of_slices,
        }
    }

    /// Length of the full mip chain.
    pub fn number_of_mipmaps(&self) -> u32 {
        number_of_mipmaps(self.width, self.height, self.depth)
    }

    /// `(width, height, depth)` of a mip level.
    pub fn mip_extent(&self, level: u32) -> (u32, u32, u32) {
        (
            mip_dimension(self.width, level),
            mip_dimension(self.height, level),
            mip_dimension(self.depth, level),
        )
    }

    /// Bytes of one mip level, all slices included, saturating at `u64::MAX`.
    pub fn mip_level_bytes(&self, format: TextureFormat, level: u32) -> u64 {
        let (width, height, depth) = self.mip_extent(level);
        format
            .bytes_per_slice(width, height)
            .saturating_mul(u64::from(depth))
            .saturating_mul(u64::from(self.number_of_slices))
    }
}

/// Size of one dimension at a mip level: `max(1, size >> level)`.
pub const fn mip_dimension(size: u32, level: u32) -> u32 {
    let shifted = if level >= u32::BITS { 0 } else { size >> level };
    if shifted == 0 {
        1
    } else {
        shifted
    }
}

/// Length of a full mip chain: `1 + floor(log2(max(width, height, depth)))`.
pub fn number_of_mipmaps(width: u32, height: u32, depth: u32) -> u32 {
    let largest = width.max(height).max(depth).max(1);
    u32::BITS - largest.leading_zeros()
}

/// One mip level upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipUpload {
    /// The mip level.
    pub level: u32,
    /// Width of the level.
    pub width: u32,
    /// Height of the level.
    pub height: u32,
    /// Depth of the level.
    pub depth: u32,
    /// Byte offset of the level in the initial data.
    pub offset: usize,
    /// Bytes of the level, all slices included.
    pub number_of_bytes: usize,
}

/// What a backend has to do with the initial data of a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipUploadPlan {
    /// Levels to upload, in order.
    pub uploads: Vec<MipUpload>,
    /// Whether the backend generates the rest of the chain after the uploads.
    pub generate_mipmaps: bool,
    /// Number of mip levels the texture has.
    pub number_of_mipmaps: u32,
}

/// Plans the mip uploads of a texture.
///
/// With `DATA_CONTAINS_MIPMAPS` every level is uploaded from the packed data,
/// which must cover the whole chain. Otherwise only level 0 is uploaded, when
/// there is data at all, and mipmaps are generated afterwards if
/// `GENERATE_MIPMAPS` was requested and the backend supports it.
pub fn plan_mip_uploads(
    format: TextureFormat,
    layout: &TextureLayout,
    data_len: Option<usize>,
    flags: TextureFlags,
    mipmap_generation_supported: bool,
) -> Result<MipUploadPlan, ResourceError> {
    let contains_mipmaps = flags.contains(TextureFlags::DATA_CONTAINS_MIPMAPS);
    let generate_requested = flags.contains(TextureFlags::GENERATE_MIPMAPS);
    let full_chain = contains_mipmaps || generate_requested;
    let number_of_mipmaps = if full_chain {
        layout.number_of_mipmaps()
    } else {
        1
    };

    let Some(data_len) = data_len else {
        if contains_mipmaps {
            return Err(ResourceError::InvalidDescriptor(
                "DATA_CONTAINS_MIPMAPS requires initial data".into(),
            ));
        }
        return Ok(MipUploadPlan {
            uploads: Vec::new(),
            generate_mipmaps: false,
            number_of_mipmaps,
        });
    };

    let levels = if contains_mipmaps { number_of_mipmaps } else { 1 };
    let mut uploads = Vec::with_capacity(levels as usize);
    let mut offset = 0usize;
    for level in 0..levels {
        let (width, height, depth) = layout.mip_extent(level);
        let number_of_bytes = layout.mip_level_bytes(format, level);
        let Some(number_of_bytes) = usize::try_from(number_of_bytes)
            .ok()
            .filter(|bytes| offset.checked_add(*bytes).is_some())
        else {
            return Err(ResourceError::InvalidDescriptor(format!(
                "mip level {level} needs {number_of_bytes} bytes, more than can be addressed"
            )));
        };
        uploads.push(MipUpload {
            level,
            width,
            height,
            depth,
            offset,
            number_of_bytes,
        });
        offset += number_of_bytes;
    }

    if offset > data_len {
        return Err(ResourceError::InvalidDescriptor(format!(
            "{data_len} bytes of texture data supplied, {offset} bytes required"
        )));
    }

    Ok(MipUploadPlan {
        uploads,
        generate_mipmaps: !contains_mipmaps && generate_requested && mipmap_generation_supported,
        number_of_mipmaps,
    })
}

/// Checks a texture description against the creation rules and the backend's limits.
pub fn validate_texture(
    layout: &TextureLayout,
    descriptor: &TextureDescriptor<'_>,
    capabilities: &Capabilities,
) -> Result<(), ResourceError> {
    let invalid = |msg: String| Err(ResourceError::InvalidDescriptor(msg));
    let flags = descriptor.flags;

    if layout.width == 0 || layout.height == 0 || layout.depth == 0 || layout.number_of_slices == 0 {
        return invalid(format!("texture dimensions must be non-zero: {layout:?}"));
    }
    let largest = layout.width.max(layout.height).max(layout.depth);
    if largest > capabilities.maximum_texture_dimension {
        return invalid(format!(
            "texture dimension {largest} exceeds the maximum of {}",
            capabilities.maximum_texture_dimension
        ));
    }

    let slice_limit = match layout.dimension {
        TextureDimension::D1Array => Some((
            layout.number_of_slices,
            capabilities.maximum_number_of_1d_texture_array_slices,
        )),
        TextureDimension::D2Array => Some((
            layout.number_of_slices,
            capabilities.maximum_number_of_2d_texture_array_slices,
        )),
        TextureDimension::CubeArray => Some((
            layout.number_of_slices / 6,
            capabilities.maximum_number_of_cube_texture_array_slices,
        )),
        _ => None,
    };
    if let Some((slices, maximum)) = slice_limit {
        if maximum == 0 {
            return Err(ResourceError::Unsupported(format!(
                "{} textures",
                layout.dimension.resource_type()
            )));
        }
        if slices > maximum {
            return invalid(format!("{slices} array slices exceed the maximum of {maximum}"));
        }
    }

    if flags.contains(TextureFlags::RENDER_TARGET) && descriptor.data.is_some() {
        return invalid("render target textures must not have initial data".into());
    }
    if flags.contains(TextureFlags::DATA_CONTAINS_MIPMAPS) && descriptor.data.is_none() {
        return invalid("DATA_CONTAINS_MIPMAPS requires initial data".into());
    }

    let samples = descriptor.number_of_multisamples;
    if !matches!(samples, 1 | 2 | 4 | 8) {
        return invalid(format!("invalid number of multisamples {samples}"));
    }
    if samples > capabilities.maximum_number_of_multisamples {
        return Err(ResourceError::Unsupported(format!(
            "{samples} multisamples, the backend supports {}",
            capabilities.maximum_number_of_multisamples
        )));
    }
    if samples > 1 {
        if layout.dimension != TextureDimension::D2 {
            return invalid("only 2D textures can be multisampled".into());
        }
        if descriptor.data.is_some() {
            return invalid("multisampled textures must not have initial data".into());
        }
        if flags.intersects(TextureFlags::DATA_CONTAINS_MIPMAPS | TextureFlags::GENERATE_MIPMAPS) {
            return invalid("multisampled textures cannot have mipmaps".into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permissive() -> Capabilities {
        Capabilities {
            maximum_texture_dimension: 16384,
            maximum_number_of_1d_texture_array_slices: 2048,
            maximum_number_of_2d_texture_array_slices: 2048,
            maximum_number_of_cube_texture_array_slices: 512,
            maximum_number_of_multisamples: 8,
            ..Capabilities::default()
        }
    }

    #[test]
    fn halving_law_floors_and_clamps_to_one() {
        let (width, height) = (300u32, 17u32);
        let levels = number_of_mipmaps(width, height, 1);
        assert_eq!(levels, 9);
        for level in 0..levels {
            let expected_width = (width as f64 / 2f64.powi(level as i32)).floor().max(1.0) as u32;
            let expected_height = (height as f64 / 2f64.powi(level as i32)).floor().max(1.0) as u32;
            assert_eq!(mip_dimension(width, level), expected_width);
            assert_eq!(mip_dimension(height, level), expected_height);
        }
        assert_eq!(mip_dimension(width, levels - 1), 1);
        assert_eq!(mip_dimension(height, levels - 1), 1);
        assert_eq!(mip_dimension(width, 40), 1);
    }

    #[test]
    fn chain_length() {
        assert_eq!(number_of_mipmaps(1, 1, 1), 1);
        assert_eq!(number_of_mipmaps(256, 256, 1), 9);
        assert_eq!(number_of_mipmaps(1, 1024, 1), 11);
        assert_eq!(number_of_mipmaps(4, 4, 64), 7);
    }

    #[test]
    fn mip_sizes_of_large_textures_are_exact() {
        let layout = TextureLayout::d2(16384, 16384);
        assert_eq!(layout.mip_level_bytes(TextureFormat::R32G32B32A32F, 0), 1 << 32);
        assert_eq!(layout.mip_level_bytes(TextureFormat::R32G32B32A32F, 1), 1 << 30);
        let array = TextureLayout::d2_array(16384, 16384, 2048);
        assert_eq!(
            array.mip_level_bytes(TextureFormat::R32G32B32A32F, 0),
            (1u64 << 32) * 2048
        );
    }

    #[test]
    fn only_the_base_level_is_uploaded_without_mip_flags() {
        for layout in [
            TextureLayout::d1(512),
            TextureLayout::d2(640, 480),
            TextureLayout::d2_array(64, 64, 4),
            TextureLayout::d3(32, 32, 32),
            TextureLayout::cube(128),
        ] {
            let data = vec![0u8; layout.mip_level_bytes(TextureFormat::R8G8B8A8, 0) as usize];
            let plan = plan_mip_uploads(
                TextureFormat::R8G8B8A8,
                &layout,
                Some(data.len()),
                TextureFlags::SHADER_RESOURCE,
                true,
            )
            .unwrap();
            assert_eq!(plan.uploads.len(), 1, "{layout:?}");
            assert_eq!(plan.number_of_mipmaps, 1);
            assert!(!plan.generate_mipmaps);
        }
    }

    #[test]
    fn packed_chains_advance_by_level_size_and_keep_slices() {
        let layout = TextureLayout::cube(4);
        let format = TextureFormat::R8G8B8A8;
        // Levels 4x4, 2x2, 1x1 with six faces each.
        let total = (16 + 4 + 1) * 4 * 6;
        let plan = plan_mip_uploads(
            format,
            &layout,
            Some(total),
            TextureFlags::DATA_CONTAINS_MIPMAPS,
            false,
        )
        .unwrap();

        let offsets: Vec<usize> = plan.uploads.iter().map(|upload| upload.offset).collect();
        assert_eq!(offsets, vec![0, 16 * 4 * 6, (16 + 4) * 4 * 6]);
        assert_eq!(plan.uploads[2].width, 1);
        assert!(!plan.generate_mipmaps);

        assert!(plan_mip_uploads(
            format,
            &layout,
            Some(total - 1),
            TextureFlags::DATA_CONTAINS_MIPMAPS,
            false
        )
        .is_err());
    }

    #[test]
    fn depth_of_3d_textures_halves() {
        let layout = TextureLayout::d3(4, 4, 4);
        let plan = plan_mip_uploads(
            TextureFormat::R8,
            &layout,
            Some(64 + 8 + 1),
            TextureFlags::DATA_CONTAINS_MIPMAPS,
            false,
        )
        .unwrap();
        let sizes: Vec<usize> = plan.uploads.iter().map(|upload| upload.number_of_bytes).collect();
        assert_eq!(sizes, vec![64, 8, 1]);
    }

    #[test]
    fn generation_depends_on_backend_support() {
        let layout = TextureLayout::d2(16, 16);
        let flags = TextureFlags::GENERATE_MIPMAPS;
        let supported =
            plan_mip_uploads(TextureFormat::R8, &layout, Some(256), flags, true).unwrap();
        assert!(supported.generate_mipmaps);
        assert_eq!(supported.uploads.len(), 1);
        assert_eq!(supported.number_of_mipmaps, 5);

        let unsupported =
            plan_mip_uploads(TextureFormat::R8, &layout, Some(256), flags, false).unwrap();
        assert!(!unsupported.generate_mipmaps);
    }

    #[test]
    fn creation_rules() {
        let capabilities = permissive();
        let data = [0u8; 64];
        let layout = TextureLayout::d2(4, 4);

        let render_target_with_data = TextureDescriptor::new(TextureFormat::R8G8B8A8)
            .with_data(&data)
            .with_flags(TextureFlags::RENDER_TARGET);
        assert!(validate_texture(&layout, &render_target_with_data, &capabilities).is_err());

        let mipmaps_without_data = TextureDescriptor::new(TextureFormat::R8G8B8A8)
            .with_flags(TextureFlags::DATA_CONTAINS_MIPMAPS);
        assert!(validate_texture(&layout, &mipmaps_without_data, &capabilities).is_err());

        let mut multisampled = TextureDescriptor::new(TextureFormat::R8G8B8A8)
            .with_flags(TextureFlags::RENDER_TARGET);
        multisampled.number_of_multisamples = 4;
        assert!(validate_texture(&layout, &multisampled, &capabilities).is_ok());
        multisampled.flags |= TextureFlags::GENERATE_MIPMAPS;
        assert!(validate_texture(&layout, &multisampled, &capabilities).is_err());

        let mut three_samples = TextureDescriptor::new(TextureFormat::R8G8B8A8);
        three_samples.number_of_multisamples = 3;
        assert!(validate_texture(&layout, &three_samples, &capabilities).is_err());

        let plain = TextureDescriptor::new(TextureFormat::R8G8B8A8).with_data(&data);
        assert!(validate_texture(&layout, &plain, &capabilities).is_ok());
        assert!(validate_texture(&TextureLayout::d2(0, 4), &plain, &capabilities).is_err());
        assert!(validate_texture(&TextureLayout::d2(32768, 4), &plain, &capabilities).is_err());
    }
}

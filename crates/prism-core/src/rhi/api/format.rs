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

//! Texture and index formats, backed by a static format table.

use serde::{Deserialize, Serialize};

/// The memory layout of a texel (or texel block) of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFormat {
    /// 8-bit single channel, unsigned normalized.
    R8,
    /// 8-bit RGBA, unsigned normalized.
    R8G8B8A8,
    /// 8-bit RGBA, unsigned normalized, sRGB.
    R8G8B8A8Srgb,
    /// 8-bit BGRA, unsigned normalized.
    B8G8R8A8,
    /// Packed 11/11/10-bit float RGB.
    R11G11B10F,
    /// 16-bit float RGBA.
    R16G16B16A16F,
    /// 32-bit float RGBA.
    R32G32B32A32F,
    /// DXT1 block compression.
    Bc1,
    /// DXT1 block compression, sRGB.
    Bc1Srgb,
    /// DXT3 block compression.
    Bc2,
    /// DXT3 block compression, sRGB.
    Bc2Srgb,
    /// DXT5 block compression.
    Bc3,
    /// DXT5 block compression, sRGB.
    Bc3Srgb,
    /// Single channel block compression.
    Bc4,
    /// Two channel block compression.
    Bc5,
    /// ETC1 block compression.
    Etc1,
    /// 16-bit single channel, unsigned normalized.
    R16Unorm,
    /// 32-bit single channel, unsigned integer.
    R32Uint,
    /// 32-bit single channel, float.
    R32Float,
    /// 32-bit float depth.
    D32Float,
    /// 16-bit two channel, signed normalized.
    R16G16Snorm,
    /// 16-bit two channel, float.
    R16G16Float,
    /// Unknown format, used for absent attachments.
    Unknown,
}

struct FormatInfo {
    format: TextureFormat,
    // Texel block edge: 1 for uncompressed formats, 4 for block-compressed ones.
    block_size: u32,
    bytes_per_block: u32,
    depth: bool,
}

const fn info(format: TextureFormat, block_size: u32, bytes_per_block: u32, depth: bool) -> FormatInfo {
    FormatInfo {
        format,
        block_size,
        bytes_per_block,
        depth,
    }
}

// Indexed by `TextureFormat as usize`.
static FORMAT_TABLE: [FormatInfo; 23] = [
    info(TextureFormat::R8, 1, 1, false),
    info(TextureFormat::R8G8B8A8, 1, 4, false),
    info(TextureFormat::R8G8B8A8Srgb, 1, 4, false),
    info(TextureFormat::B8G8R8A8, 1, 4, false),
    info(TextureFormat::R11G11B10F, 1, 4, false),
    info(TextureFormat::R16G16B16A16F, 1, 8, false),
    info(TextureFormat::R32G32B32A32F, 1, 16, false),
    info(TextureFormat::Bc1, 4, 8, false),
    info(TextureFormat::Bc1Srgb, 4, 8, false),
    info(TextureFormat::Bc2, 4, 16, false),
    info(TextureFormat::Bc2Srgb, 4, 16, false),
    info(TextureFormat::Bc3, 4, 16, false),
    info(TextureFormat::Bc3Srgb, 4, 16, false),
    info(TextureFormat::Bc4, 4, 8, false),
    info(TextureFormat::Bc5, 4, 16, false),
    info(TextureFormat::Etc1, 4, 8, false),
    info(TextureFormat::R16Unorm, 1, 2, false),
    info(TextureFormat::R32Uint, 1, 4, false),
    info(TextureFormat::R32Float, 1, 4, false),
    info(TextureFormat::D32Float, 1, 4, true),
    info(TextureFormat::R16G16Snorm, 1, 4, false),
    info(TextureFormat::R16G16Float, 1, 4, false),
    info(TextureFormat::Unknown, 1, 0, false),
];

impl TextureFormat {
    fn info(self) -> &'static FormatInfo {
        &FORMAT_TABLE[self as usize]
    }

    /// Returns `true` for the 4x4 block-compressed formats.
    pub fn is_compressed(self) -> bool {
        self.info().block_size > 1
    }

    /// Returns `true` for depth formats.
    pub fn is_depth(self) -> bool {
        self.info().depth
    }

    /// Bytes per texel, or per 4x4 block for compressed formats.
    pub fn bytes_per_element(self) -> u32 {
        self.info().bytes_per_block
    }

    /// The number of bytes of one row of texels (or of blocks).
    pub fn bytes_per_row(self, width: u32) -> u64 {
        let info = self.info();
        u64::from(width.div_ceil(info.block_size)) * u64::from(info.bytes_per_block)
    }

    /// The number of bytes of one 2D slice, saturating at `u64::MAX`.
    pub fn bytes_per_slice(self, width: u32, height: u32) -> u64 {
        self.bytes_per_row(width)
            .saturating_mul(u64::from(height.div_ceil(self.info().block_size)))
    }
}

/// The element type of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexBufferFormat {
    /// 8-bit indices. Not supported by every backend.
    UnsignedChar,
    /// 16-bit indices.
    UnsignedShort,
    /// 32-bit indices.
    UnsignedInt,
}

impl IndexBufferFormat {
    /// Size of one index in bytes.
    pub const fn number_of_bytes(self) -> u32 {
        match self {
            IndexBufferFormat::UnsignedChar => 1,
            IndexBufferFormat::UnsignedShort => 2,
            IndexBufferFormat::UnsignedInt => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_table_is_indexed_by_discriminant() {
        for (index, entry) in FORMAT_TABLE.iter().enumerate() {
            assert_eq!(entry.format as usize, index, "{:?} is out of place", entry.format);
        }
    }

    #[test]
    fn uncompressed_sizes() {
        assert_eq!(TextureFormat::R8G8B8A8.bytes_per_row(5), 20);
        assert_eq!(TextureFormat::R8G8B8A8.bytes_per_slice(5, 3), 60);
        assert_eq!(TextureFormat::R32G32B32A32F.bytes_per_slice(1, 1), 16);
    }

    #[test]
    fn large_slices_do_not_wrap() {
        assert_eq!(
            TextureFormat::R32G32B32A32F.bytes_per_slice(16384, 16384),
            4 * 1024 * 1024 * 1024
        );
        assert_eq!(TextureFormat::R32G32B32A32F.bytes_per_row(u32::MAX), u64::from(u32::MAX) * 16);
    }

    #[test]
    fn block_compressed_sizes_round_up_to_whole_blocks() {
        assert!(TextureFormat::Bc1.is_compressed());
        // 5x5 texels -> 2x2 blocks of 8 bytes.
        assert_eq!(TextureFormat::Bc1.bytes_per_slice(5, 5), 32);
        // A 1x1 mip still occupies one full block.
        assert_eq!(TextureFormat::Bc3.bytes_per_slice(1, 1), 16);
        assert_eq!(TextureFormat::Etc1.bytes_per_row(4), 8);
    }

    #[test]
    fn depth_formats() {
        assert!(TextureFormat::D32Float.is_depth());
        assert!(!TextureFormat::R32Float.is_depth());
    }
}

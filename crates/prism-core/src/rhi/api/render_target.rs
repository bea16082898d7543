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

//! Render passes, framebuffers and swap chains.

use super::format::TextureFormat;
use super::texture::mip_dimension;
use crate::rhi::error::ResourceError;
use crate::rhi::resource::{RenderPassHandle, TextureHandle};
use std::borrow::Cow;

/// Maximum number of color attachments of a render pass or framebuffer.
pub const MAXIMUM_NUMBER_OF_COLOR_ATTACHMENTS: usize = 8;

/// Describes a render pass: the formats the attachments of a render target must have.
#[derive(Debug, Clone)]
pub struct RenderPassDescriptor<'a> {
    /// Optional debug name.
    pub label: Option<Cow<'a, str>>,
    /// Color attachment formats, at most eight.
    pub color_attachment_texture_formats: Vec<TextureFormat>,
    /// Depth-stencil attachment format, if any.
    pub depth_stencil_attachment_texture_format: Option<TextureFormat>,
    /// Sample count of every attachment.
    pub number_of_multisamples: u8,
}

impl RenderPassDescriptor<'_> {
    /// A single-sample render pass with one color attachment and an optional depth buffer.
    pub fn new(color: TextureFormat, depth_stencil: Option<TextureFormat>) -> Self {
        Self {
            label: None,
            color_attachment_texture_formats: vec![color],
            depth_stencil_attachment_texture_format: depth_stencil,
            number_of_multisamples: 1,
        }
    }

    /// Number of color attachments.
    pub fn number_of_color_attachments(&self) -> u32 {
        self.color_attachment_texture_formats.len() as u32
    }

    /// Checks attachment count, formats and sample count.
    pub fn validate(&self, maximum_number_of_color_attachments: u32) -> Result<(), ResourceError> {
        let count = self.number_of_color_attachments();
        if count as usize > MAXIMUM_NUMBER_OF_COLOR_ATTACHMENTS
            || count > maximum_number_of_color_attachments
        {
            return Err(ResourceError::Unsupported(format!(
                "{count} color attachments, the backend supports {maximum_number_of_color_attachments}"
            )));
        }
        if self
            .color_attachment_texture_formats
            .iter()
            .any(|format| format.is_depth() || *format == TextureFormat::Unknown)
        {
            return Err(ResourceError::InvalidDescriptor(
                "color attachments need a known color format".into(),
            ));
        }
        if let Some(format) = self.depth_stencil_attachment_texture_format {
            if !format.is_depth() {
                return Err(ResourceError::InvalidDescriptor(format!(
                    "{format:?} is not a depth-stencil format"
                )));
            }
        }
        if !matches!(self.number_of_multisamples, 1 | 2 | 4 | 8) {
            return Err(ResourceError::InvalidDescriptor(format!(
                "invalid number of multisamples {}",
                self.number_of_multisamples
            )));
        }
        Ok(())
    }
}

/// One attachment of a framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferAttachment {
    /// A 2D or 2D-array texture created with `RENDER_TARGET`.
    pub texture: TextureHandle,
    /// The mip level rendered to.
    pub mipmap_index: u32,
    /// The array slice rendered to, 0 for plain 2D textures.
    pub layer_index: u32,
}

impl FramebufferAttachment {
    /// Mip 0 / layer 0 of a texture.
    pub fn new(texture: TextureHandle) -> Self {
        Self {
            texture,
            mipmap_index: 0,
            layer_index: 0,
        }
    }
}

/// Describes a framebuffer.
#[derive(Debug, Clone)]
pub struct FramebufferDescriptor<'a> {
    /// Optional debug name.
    pub label: Option<Cow<'a, str>>,
    /// The render pass the attachments must be compatible with.
    pub render_pass: RenderPassHandle,
    /// Color attachments, one per color attachment of the render pass.
    pub color_attachments: &'a [FramebufferAttachment],
    /// Optional depth-stencil attachment.
    pub depth_stencil_attachment: Option<FramebufferAttachment>,
}

/// The size of a framebuffer: the intersection (smallest common area) of the
/// mip-level sizes of all attachments.
///
/// Each item is `(base width, base height, mipmap index)`. Returns `None`
/// when there is no attachment.
pub fn framebuffer_size(
    attachments: impl IntoIterator<Item = (u32, u32, u32)>,
) -> Option<(u32, u32)> {
    attachments
        .into_iter()
        .map(|(width, height, mipmap_index)| {
            (
                mip_dimension(width, mipmap_index),
                mip_dimension(height, mipmap_index),
            )
        })
        .reduce(|(width, height), (next_width, next_height)| {
            (width.min(next_width), height.min(next_height))
        })
}

/// An opaque native window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle(pub u64);

/// Describes a swap chain.
#[derive(Debug, Clone)]
pub struct SwapChainDescriptor<'a> {
    /// Optional debug name.
    pub label: Option<Cow<'a, str>>,
    /// The render pass of the back buffers.
    pub render_pass: RenderPassHandle,
    /// The window presented to.
    pub window: WindowHandle,
    /// Initial width in pixels.
    pub width: u32,
    /// Initial height in pixels.
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framebuffer_size_is_the_intersection_of_mip_sizes() {
        // 256x128 at mip 1 is 128x64; intersected with 100x200 at mip 0.
        assert_eq!(
            framebuffer_size([(256, 128, 1), (100, 200, 0)]),
            Some((100, 64))
        );
        assert_eq!(framebuffer_size([(1, 1, 4)]), Some((1, 1)));
        assert_eq!(framebuffer_size(std::iter::empty()), None);
    }

    #[test]
    fn render_pass_validation() {
        let pass = RenderPassDescriptor::new(TextureFormat::R8G8B8A8, Some(TextureFormat::D32Float));
        assert!(pass.validate(8).is_ok());

        let mut too_many = pass.clone();
        too_many.color_attachment_texture_formats = vec![TextureFormat::R8G8B8A8; 2];
        assert!(matches!(too_many.validate(1), Err(ResourceError::Unsupported(_))));

        let bad_depth = RenderPassDescriptor::new(TextureFormat::R8G8B8A8, Some(TextureFormat::R8));
        assert!(bad_depth.validate(8).is_err());
    }
}

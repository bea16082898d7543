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

use super::resources::{NullResourceKind, TextureData};
use super::shared::NullShared;
use prism_core::rhi::{
    plan_mip_uploads, validate_texture, ResourceError, ResourceRef, TextureDescriptor,
    TextureHandle, TextureLayout, TextureManager,
};
use std::sync::Arc;

/// The texture factories of the Null backend.
///
/// No texel is stored. The backend only records which mip levels were
/// uploaded and whether the chain was generated.
#[derive(Debug)]
pub struct NullTextureManager {
    shared: Arc<NullShared>,
}

impl NullTextureManager {
    pub(crate) fn new(shared: Arc<NullShared>) -> Self {
        Self { shared }
    }
}

impl TextureManager for NullTextureManager {
    fn create_texture(
        &self,
        layout: &TextureLayout,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<ResourceRef<TextureHandle>, ResourceError> {
        let capabilities = &self.shared.capabilities;
        validate_texture(layout, descriptor, capabilities).map_err(|err| self.shared.refuse(err))?;

        let plan = plan_mip_uploads(
            descriptor.format,
            layout,
            descriptor.data.map(<[u8]>::len),
            descriptor.flags,
            capabilities.mipmap_generation,
        )
        .map_err(|err| self.shared.refuse(err))?;

        for upload in &plan.uploads {
            log::trace!(
                "NullRhi: Uploading mip {} ({}x{}x{}, {} bytes at offset {})",
                upload.level,
                upload.width,
                upload.height,
                upload.depth,
                upload.number_of_bytes,
                upload.offset
            );
        }

        self.shared.create(
            descriptor.label.as_deref(),
            NullResourceKind::Texture(TextureData {
                layout: *layout,
                format: descriptor.format,
                flags: descriptor.flags,
                number_of_multisamples: descriptor.number_of_multisamples,
                number_of_mipmaps: plan.number_of_mipmaps,
                uploaded_mipmaps: plan.uploads.iter().map(|upload| upload.level).collect(),
                mipmaps_generated: plan.generate_mipmaps,
                minimum_mipmap_index: 0,
                maximum_mipmap_index: plan.number_of_mipmaps.saturating_sub(1),
            }),
        )
    }
}

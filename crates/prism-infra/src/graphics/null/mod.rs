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

//! The Null backend.
//!
//! Creates real handles and reference counts, validates every call and
//! command against the RHI contracts and performs no GPU work. Always
//! available, it is the backend tests and headless tools run against.

mod buffer_manager;
mod executor;
mod id_pool;
mod resources;
mod rhi;
mod shared;
mod state;
mod texture_manager;

pub use self::buffer_manager::NullBufferManager;
pub use self::resources::TextureInfo;
pub use self::rhi::{null_capabilities, NullRhi};
pub use self::texture_manager::NullTextureManager;

use prism_core::rhi::{RenderError, RhiContext};
use prism_core::RhiConfig;
use std::sync::Arc;

/// Creates a Null RHI instance.
///
/// ## Errors
///
/// Never fails today; the signature matches the other backend entry points.
pub fn create_rhi_instance(
    config: &RhiConfig,
    context: Arc<RhiContext>,
) -> Result<NullRhi, RenderError> {
    Ok(NullRhi::new(config, context))
}

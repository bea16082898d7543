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

//! # Prism Infra
//!
//! Concrete implementations of the `prism-core` RHI contracts. Each graphics
//! backend lives in its own module under [`graphics`] and is selected at
//! runtime through [`create_rhi_instance`].

#![warn(missing_docs)]

pub mod graphics;

use prism_core::rhi::{BackendType, RenderError, Rhi, RhiContext};
use prism_core::RhiConfig;
use std::sync::Arc;

/// Creates an RHI instance for the backend named in `config`.
///
/// ## Arguments
/// * `config` - The backend selection and its settings.
/// * `context` - The assertion context shared with the new instance.
/// ## Returns
/// The boxed RHI.
/// ## Errors
/// * `RenderError::BackendUnavailable` - If the backend is not compiled into this build.
pub fn create_rhi_instance(
    config: &RhiConfig,
    context: Arc<RhiContext>,
) -> Result<Box<dyn Rhi>, RenderError> {
    log::info!("Creating RHI instance for backend {:?}", config.backend);
    match config.backend {
        #[cfg(feature = "null")]
        BackendType::Null => {
            let rhi = graphics::null::create_rhi_instance(config, context)?;
            Ok(Box::new(rhi))
        }
        other => {
            log::error!("Backend {other:?} is not available in this build");
            Err(RenderError::BackendUnavailable(other))
        }
    }
}

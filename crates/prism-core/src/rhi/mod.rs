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

//! Provides the public, backend-agnostic rendering hardware interface.
//!
//! This module defines the "common language" shared by every graphics backend.
//! Applications build declarative descriptions (see [`api`]), ask an [`Rhi`]
//! or one of its resource managers to turn them into reference-counted
//! resources (see [`resource`]), record commands referencing those resources
//! into a [`CommandBuffer`] and finally submit the buffer to the concrete
//! backend, which decodes and executes every packet in order.
//!
//! The 'how' lives in the `prism-infra` crate, where each backend implements
//! the [`Rhi`] and [`CommandExecutor`] traits.

pub mod api;
pub mod command;
pub mod context;
pub mod error;
pub mod resource;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::command::{dispatch_command_buffer, Command, CommandBuffer, CommandId, DrawSource};
pub use self::context::{AssertPolicy, RhiContext};
pub use self::error::{PipelineError, RenderError, ResourceError};
pub use self::resource::*;
pub use self::traits::{BufferManager, CommandExecutor, Rhi, TextureManager};

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

//! Declarative, backend-independent descriptions of GPU resources and state.

pub mod buffer;
pub mod capabilities;
pub mod draw;
pub mod format;
pub mod mapping;
pub mod pipeline;
pub mod query;
pub mod render_target;
pub mod root_signature;
pub mod shader;
pub mod state;
pub mod statistics;
pub mod texture;
pub mod vertex;

pub use self::buffer::*;
pub use self::capabilities::*;
pub use self::draw::*;
pub use self::format::*;
pub use self::mapping::*;
pub use self::pipeline::*;
pub use self::query::*;
pub use self::render_target::*;
pub use self::root_signature::*;
pub use self::shader::*;
pub use self::state::*;
pub use self::statistics::*;
pub use self::texture::*;
pub use self::vertex::*;

use serde::{Deserialize, Serialize};

/// The graphics APIs an RHI instance can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BackendType {
    /// No-op backend validating every call. Always available.
    #[default]
    Null,
    /// OpenGL 4.1+.
    OpenGl,
    /// OpenGL ES 3.
    OpenGlEs3,
    /// Vulkan 1.0+.
    Vulkan,
    /// Direct3D 9.
    Direct3D9,
    /// Direct3D 10.
    Direct3D10,
    /// Direct3D 11.
    Direct3D11,
    /// Direct3D 12.
    Direct3D12,
}

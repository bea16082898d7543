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

//! The command buffer and its replay protocol.
//!
//! A [`CommandBuffer`] is typically filled once when an application starts
//! and dispatched every frame. Refill it (after [`CommandBuffer::clear`]) when
//! the resources it references change.

pub mod buffer;
pub mod builder;
pub mod dispatch;

pub use self::buffer::{AuxiliaryRange, Command, CommandBuffer, CommandId, DrawPacket};
pub use self::dispatch::{dispatch_command_buffer, DrawSource};

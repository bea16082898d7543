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

//! CPU access to resource memory.

/// How a mapped resource will be accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapType {
    /// Read only.
    Read,
    /// Read and write.
    ReadWrite,
    /// Write only.
    Write,
    /// Write only, previous contents are discarded.
    WriteDiscard,
    /// Write only, promising not to touch data in use by the GPU.
    WriteNoOverwrite,
}

impl MapType {
    /// Whether the contents are read back to the CPU.
    pub fn reads(self) -> bool {
        matches!(self, MapType::Read | MapType::ReadWrite)
    }

    /// Whether `unmap` writes the contents back to the resource.
    pub fn writes(self) -> bool {
        !matches!(self, MapType::Read)
    }
}

/// A CPU copy of a mapped subresource. Handed back to `unmap` to commit writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedSubresource {
    /// The mapped bytes.
    pub data: Vec<u8>,
    /// Bytes per row.
    pub row_pitch: u32,
    /// Bytes per 2D slice.
    pub depth_pitch: u32,
}

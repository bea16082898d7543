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

//! Buffer descriptions and the creation rules shared by every backend.

use super::draw::{DrawArguments, DrawIndexedArguments};
use super::vertex::VertexAttributes;
use crate::rhi::error::ResourceError;
use crate::rhi::resource::{IndexBufferHandle, VertexBufferHandle};
use bitflags::bitflags;
use std::borrow::Cow;

bitflags! {
    /// Extra bind points of a buffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BufferFlags: u32 {
        /// Read/write access from shaders.
        const UNORDERED_ACCESS = 1 << 0;
        /// Read access from shaders.
        const SHADER_RESOURCE = 1 << 1;
        /// The buffer can also serve as an indirect argument buffer.
        const INDIRECT_BUFFER = 1 << 2;
    }
}

bitflags! {
    /// Flags of an indirect buffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct IndirectBufferFlags: u32 {
        /// Read/write access from shaders.
        const UNORDERED_ACCESS = 1 << 0;
        /// Read access from shaders.
        const SHADER_RESOURCE = 1 << 1;
        /// Holds [`DrawArguments`] records.
        const DRAW_ARGUMENTS = 1 << 2;
        /// Holds [`DrawIndexedArguments`] records.
        const DRAW_INDEXED_ARGUMENTS = 1 << 3;
    }
}

/// The expected update pattern of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Written once, drawn a few times.
    StreamDraw,
    /// Written once by the GPU, read a few times by the CPU.
    StreamRead,
    /// Written once by the GPU, used a few times by the GPU.
    StreamCopy,
    /// Written once, drawn many times.
    #[default]
    StaticDraw,
    /// Written once by the GPU, read many times by the CPU.
    StaticRead,
    /// Written once by the GPU, used many times by the GPU.
    StaticCopy,
    /// Rewritten often, drawn many times.
    DynamicDraw,
    /// Rewritten often by the GPU, read many times by the CPU.
    DynamicRead,
    /// Rewritten often by the GPU, used many times by the GPU.
    DynamicCopy,
}

/// Describes a buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferDescriptor<'a> {
    /// Optional debug name.
    pub label: Option<Cow<'a, str>>,
    /// Size in bytes.
    pub number_of_bytes: u32,
    /// Initial contents, exactly `number_of_bytes` long when present.
    pub data: Option<&'a [u8]>,
    /// Extra bind points.
    pub flags: BufferFlags,
    /// Update pattern.
    pub usage: BufferUsage,
}

impl<'a> BufferDescriptor<'a> {
    /// An uninitialized buffer of `number_of_bytes` bytes.
    pub fn new(number_of_bytes: u32) -> Self {
        Self {
            number_of_bytes,
            ..Default::default()
        }
    }

    /// A buffer initialized with `data`, sized to fit it.
    pub fn with_data(data: &'a [u8]) -> Self {
        Self {
            number_of_bytes: data.len() as u32,
            data: Some(data),
            ..Default::default()
        }
    }

    /// Sets the debug name.
    pub fn with_label(mut self, label: impl Into<Cow<'a, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Checks that supplied data matches the declared size.
    pub fn validate_data(&self) -> Result<(), ResourceError> {
        match self.data {
            Some(data) if data.len() != self.number_of_bytes as usize => {
                Err(ResourceError::InvalidDescriptor(format!(
                    "{} bytes of data supplied for a {} byte buffer",
                    data.len(),
                    self.number_of_bytes
                )))
            }
            _ => Ok(()),
        }
    }

    /// Checks the size against a capability limit. A limit of 0 means the
    /// buffer kind is unsupported.
    pub fn validate_size(&self, kind: &str, maximum_size: u32) -> Result<(), ResourceError> {
        if maximum_size == 0 {
            return Err(ResourceError::Unsupported(format!("{kind} buffers")));
        }
        if self.number_of_bytes > maximum_size {
            return Err(ResourceError::InvalidDescriptor(format!(
                "{kind} buffer of {} bytes exceeds the maximum of {maximum_size} bytes",
                self.number_of_bytes
            )));
        }
        Ok(())
    }
}

/// Checks the structured buffer rule: the size is a whole number of structures.
///
/// A structure size that is not a multiple of 16 bytes (128 bits) is accepted
/// but logged as a performance warning.
pub fn validate_structured_buffer(
    number_of_bytes: u32,
    number_of_structure_bytes: u32,
) -> Result<(), ResourceError> {
    if number_of_structure_bytes == 0 || number_of_bytes % number_of_structure_bytes != 0 {
        return Err(ResourceError::InvalidDescriptor(format!(
            "structured buffer size {number_of_bytes} is not a multiple of the structure size {number_of_structure_bytes}"
        )));
    }
    if number_of_structure_bytes % 16 != 0 {
        log::warn!(
            "Structured buffer structure size {number_of_structure_bytes} is not 128-bit aligned, performance may suffer"
        );
    }
    Ok(())
}

/// Checks the indirect buffer rule and returns the size of one argument record.
pub fn validate_indirect_buffer(
    number_of_bytes: u32,
    flags: IndirectBufferFlags,
) -> Result<u32, ResourceError> {
    let draw = flags.contains(IndirectBufferFlags::DRAW_ARGUMENTS);
    let draw_indexed = flags.contains(IndirectBufferFlags::DRAW_INDEXED_ARGUMENTS);
    let record_size = match (draw, draw_indexed) {
        (true, false) => std::mem::size_of::<DrawArguments>() as u32,
        (false, true) => std::mem::size_of::<DrawIndexedArguments>() as u32,
        _ => {
            return Err(ResourceError::InvalidDescriptor(
                "indirect buffers need exactly one of DRAW_ARGUMENTS and DRAW_INDEXED_ARGUMENTS"
                    .into(),
            ))
        }
    };
    if number_of_bytes % record_size != 0 {
        return Err(ResourceError::InvalidDescriptor(format!(
            "indirect buffer size {number_of_bytes} is not a multiple of the {record_size} byte argument record"
        )));
    }
    Ok(record_size)
}

/// Describes a vertex array.
#[derive(Debug, Clone)]
pub struct VertexArrayDescriptor<'a> {
    /// Optional debug name.
    pub label: Option<Cow<'a, str>>,
    /// The vertex input layout.
    pub vertex_attributes: VertexAttributes,
    /// One vertex buffer per distinct input slot, in slot order.
    pub vertex_buffers: &'a [VertexBufferHandle],
    /// Optional index buffer.
    pub index_buffer: Option<IndexBufferHandle>,
}

impl VertexArrayDescriptor<'_> {
    /// Checks that there is one vertex buffer per input slot.
    pub fn validate(&self) -> Result<(), ResourceError> {
        let slots = self.vertex_attributes.number_of_input_slots();
        if slots != self.vertex_buffers.len() {
            return Err(ResourceError::InvalidDescriptor(format!(
                "the vertex attributes use {slots} input slots but {} vertex buffers were given",
                self.vertex_buffers.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_length_must_match_size() {
        let data = [0u8; 12];
        assert!(BufferDescriptor::with_data(&data).validate_data().is_ok());

        let mut mismatched = BufferDescriptor::with_data(&data);
        mismatched.number_of_bytes = 16;
        assert!(mismatched.validate_data().is_err());
    }

    #[test]
    fn structured_buffers_are_whole_structures() {
        assert!(validate_structured_buffer(64, 16).is_ok());
        assert!(validate_structured_buffer(48, 12).is_ok());
        assert!(validate_structured_buffer(50, 16).is_err());
        assert!(validate_structured_buffer(16, 0).is_err());
    }

    #[test]
    fn indirect_buffers_select_exactly_one_record_kind() {
        assert_eq!(
            validate_indirect_buffer(32, IndirectBufferFlags::DRAW_ARGUMENTS),
            Ok(16)
        );
        assert_eq!(
            validate_indirect_buffer(40, IndirectBufferFlags::DRAW_INDEXED_ARGUMENTS),
            Ok(20)
        );
        assert!(validate_indirect_buffer(32, IndirectBufferFlags::empty()).is_err());
        assert!(validate_indirect_buffer(
            80,
            IndirectBufferFlags::DRAW_ARGUMENTS | IndirectBufferFlags::DRAW_INDEXED_ARGUMENTS
        )
        .is_err());
        assert!(validate_indirect_buffer(24, IndirectBufferFlags::DRAW_ARGUMENTS).is_err());
    }

    #[test]
    fn size_limits() {
        let descriptor = BufferDescriptor::new(1024);
        assert!(descriptor.validate_size("uniform", 4096).is_ok());
        assert!(descriptor.validate_size("uniform", 512).is_err());
        assert!(matches!(
            descriptor.validate_size("texture", 0),
            Err(ResourceError::Unsupported(_))
        ));
    }
}

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

//! Vertex input layout descriptions.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::Arc;

/// The data format of a single vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    /// One 32-bit float.
    Float1,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
    /// Four 8-bit unsigned normalized values.
    R8G8B8A8Unorm,
    /// Four 8-bit unsigned integers.
    R8G8B8A8Uint,
    /// Two 16-bit signed integers.
    Short2,
    /// Four 16-bit signed integers.
    Short4,
    /// One 32-bit unsigned integer.
    Uint1,
}

impl VertexAttributeFormat {
    /// Size of the attribute in bytes.
    pub const fn number_of_bytes(self) -> u32 {
        match self {
            VertexAttributeFormat::Float1 | VertexAttributeFormat::Uint1 => 4,
            VertexAttributeFormat::Float2 => 8,
            VertexAttributeFormat::Float3 => 12,
            VertexAttributeFormat::Float4 => 16,
            VertexAttributeFormat::R8G8B8A8Unorm | VertexAttributeFormat::R8G8B8A8Uint => 4,
            VertexAttributeFormat::Short2 => 4,
            VertexAttributeFormat::Short4 => 8,
        }
    }

    /// Number of components of the attribute.
    pub const fn number_of_components(self) -> u32 {
        match self {
            VertexAttributeFormat::Float1 | VertexAttributeFormat::Uint1 => 1,
            VertexAttributeFormat::Float2 | VertexAttributeFormat::Short2 => 2,
            VertexAttributeFormat::Float3 => 3,
            VertexAttributeFormat::Float4
            | VertexAttributeFormat::R8G8B8A8Unorm
            | VertexAttributeFormat::R8G8B8A8Uint
            | VertexAttributeFormat::Short4 => 4,
        }
    }
}

/// Describes one attribute of the vertex input layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// The data format.
    pub format: VertexAttributeFormat,
    /// The shader semantic name, e.g. `"Position"`.
    pub name: Cow<'static, str>,
    /// The semantic index, for repeated semantics.
    pub semantic_index: u32,
    /// The vertex buffer slot the attribute is read from.
    pub input_slot: u32,
    /// Byte offset of the attribute inside one vertex.
    pub aligned_byte_offset: u32,
    /// Byte distance between two consecutive vertices of the slot.
    pub stride_in_bytes: u32,
    /// 0 for per-vertex data, N to advance once every N instances.
    pub instances_per_element: u32,
}

/// An immutable, shareable, ordered vertex input layout.
///
/// Cloning is cheap: the attribute list is shared behind an [`Arc`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttributes {
    attributes: Arc<[VertexAttribute]>,
}

impl VertexAttributes {
    /// Freezes a list of attributes.
    pub fn new(attributes: impl Into<Vec<VertexAttribute>>) -> Self {
        Self {
            attributes: attributes.into().into(),
        }
    }

    /// The attributes, in declaration order.
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Number of distinct input slots, i.e. the number of vertex buffers a
    /// vertex array built from this layout needs.
    pub fn number_of_input_slots(&self) -> usize {
        self.attributes
            .iter()
            .map(|attribute| attribute.input_slot)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Returns `true` if both layouts are the same shared list, or equal.
    pub fn matches(&self, other: &VertexAttributes) -> bool {
        Arc::ptr_eq(&self.attributes, &other.attributes) || self.attributes == other.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(name: &'static str, input_slot: u32) -> VertexAttribute {
        VertexAttribute {
            format: VertexAttributeFormat::Float2,
            name: Cow::Borrowed(name),
            semantic_index: 0,
            input_slot,
            aligned_byte_offset: 0,
            stride_in_bytes: 8,
            instances_per_element: 0,
        }
    }

    #[test]
    fn input_slots_are_counted_once() {
        let layout = VertexAttributes::new(vec![
            attribute("Position", 0),
            attribute("TexCoord", 0),
            attribute("InstanceOffset", 1),
        ]);
        assert_eq!(layout.len(), 3);
        assert_eq!(layout.number_of_input_slots(), 2);
    }

    #[test]
    fn shared_and_equal_layouts_match() {
        let layout = VertexAttributes::new(vec![attribute("Position", 0)]);
        let shared = layout.clone();
        let rebuilt = VertexAttributes::new(vec![attribute("Position", 0)]);
        let other = VertexAttributes::new(vec![attribute("Color", 0)]);

        assert!(layout.matches(&shared));
        assert!(layout.matches(&rebuilt));
        assert!(!layout.matches(&other));
    }
}

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

//! Root signatures and resource groups.
//!
//! A root signature declares the shape of the resources a pipeline expects:
//! an ordered list of root parameters, each either a block of inline
//! constants or a descriptor table. A resource group binds actual resources
//! to one descriptor table and is bound at draw time by table index.

use crate::rhi::api::state::SamplerState;
use crate::rhi::error::ResourceError;
use crate::rhi::resource::{ResourceHandle, ResourceType, RootSignatureHandle, SamplerStateHandle};
use bitflags::bitflags;
use std::borrow::Cow;

/// The shader stages a root parameter is visible to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShaderVisibility {
    /// Every stage, compute included.
    #[default]
    All,
    /// Vertex shader.
    Vertex,
    /// Tessellation control shader.
    TessellationControl,
    /// Tessellation evaluation shader.
    TessellationEvaluation,
    /// Geometry shader.
    Geometry,
    /// Fragment shader.
    Fragment,
    /// Task shader.
    Task,
    /// Mesh shader.
    Mesh,
    /// Compute shader.
    Compute,
    /// Every graphics stage.
    AllGraphics,
}

/// The kind of descriptors in a descriptor range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorRangeType {
    /// Shader resource view (read-only texture or buffer).
    Srv,
    /// Unordered access view (read/write texture or buffer).
    Uav,
    /// Uniform buffer view.
    Ubv,
    /// Sampler.
    Sampler,
}

impl DescriptorRangeType {
    /// Whether a resource of the given type can sit in a range of this kind.
    pub fn accepts(self, resource_type: ResourceType) -> bool {
        match self {
            DescriptorRangeType::Srv | DescriptorRangeType::Uav => {
                (resource_type.is_texture() || resource_type.is_buffer())
                    && resource_type != ResourceType::UniformBuffer
            }
            DescriptorRangeType::Ubv => resource_type == ResourceType::UniformBuffer,
            DescriptorRangeType::Sampler => resource_type == ResourceType::SamplerState,
        }
    }
}

/// A contiguous group of descriptors of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescriptorRange {
    /// The descriptor kind.
    pub range_type: DescriptorRangeType,
    /// Number of descriptors, at least one.
    pub number_of_descriptors: u32,
    /// First shader register of the range.
    pub base_shader_register: u32,
    /// Register space of the range.
    pub register_space: u32,
    /// Shader-side name of the first register, used by backends binding by name.
    pub base_shader_register_name: Cow<'static, str>,
    /// The resource type every descriptor of the range expects.
    pub resource_type: ResourceType,
    /// The visible shader stages.
    pub shader_visibility: ShaderVisibility,
}

impl DescriptorRange {
    /// A range of `number_of_descriptors` descriptors in register space 0.
    pub fn new(
        range_type: DescriptorRangeType,
        number_of_descriptors: u32,
        base_shader_register: u32,
        base_shader_register_name: impl Into<Cow<'static, str>>,
        resource_type: ResourceType,
        shader_visibility: ShaderVisibility,
    ) -> Self {
        Self {
            range_type,
            number_of_descriptors,
            base_shader_register,
            register_space: 0,
            base_shader_register_name: base_shader_register_name.into(),
            resource_type,
            shader_visibility,
        }
    }
}

/// One root parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RootParameter {
    /// A descriptor table made of one or more ranges.
    DescriptorTable {
        /// The ranges of the table, in binding order.
        ranges: Vec<DescriptorRange>,
    },
    /// Inline 32-bit constants.
    Constants {
        /// Shader register of the constants.
        shader_register: u32,
        /// Register space of the constants.
        register_space: u32,
        /// Number of 32-bit values.
        number_of_values: u32,
        /// The visible shader stages.
        shader_visibility: ShaderVisibility,
    },
}

impl RootParameter {
    /// The ranges if this parameter is a descriptor table.
    pub fn descriptor_ranges(&self) -> Option<&[DescriptorRange]> {
        match self {
            RootParameter::DescriptorTable { ranges } => Some(ranges),
            RootParameter::Constants { .. } => None,
        }
    }
}

/// A sampler baked into the root signature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticSampler {
    /// Sampler description.
    pub sampler: SamplerState,
    /// Shader register.
    pub shader_register: u32,
    /// Register space.
    pub register_space: u32,
    /// The visible shader stages.
    pub shader_visibility: ShaderVisibility,
}

bitflags! {
    /// Root signature flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RootSignatureFlags: u32 {
        /// The input assembler reads vertex attributes.
        const ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT = 1 << 0;
        /// Hide the root signature from the vertex stage.
        const DENY_VERTEX_SHADER_ROOT_ACCESS = 1 << 1;
        /// Hide the root signature from the tessellation control stage.
        const DENY_TESSELLATION_CONTROL_SHADER_ROOT_ACCESS = 1 << 2;
        /// Hide the root signature from the tessellation evaluation stage.
        const DENY_TESSELLATION_EVALUATION_SHADER_ROOT_ACCESS = 1 << 3;
        /// Hide the root signature from the geometry stage.
        const DENY_GEOMETRY_SHADER_ROOT_ACCESS = 1 << 4;
        /// Hide the root signature from the fragment stage.
        const DENY_FRAGMENT_SHADER_ROOT_ACCESS = 1 << 5;
    }
}

/// Describes a root signature.
#[derive(Debug, Clone, Default)]
pub struct RootSignatureDescriptor<'a> {
    /// Optional debug name.
    pub label: Option<Cow<'a, str>>,
    /// The root parameters, indexed by table index at bind time.
    pub parameters: Vec<RootParameter>,
    /// Samplers baked into the root signature.
    pub static_samplers: Vec<StaticSampler>,
    /// Flags.
    pub flags: RootSignatureFlags,
}

impl RootSignatureDescriptor<'_> {
    /// Number of root parameters.
    pub fn number_of_parameters(&self) -> u32 {
        self.parameters.len() as u32
    }

    /// Checks the structural rules of every descriptor table: at least one
    /// range, no empty range, no mixing of sampler and view ranges, range
    /// types matching their resource types, and contiguous, non-overlapping
    /// registers per range type and register space.
    pub fn validate(&self) -> Result<(), ResourceError> {
        for (parameter_index, parameter) in self.parameters.iter().enumerate() {
            let Some(ranges) = parameter.descriptor_ranges() else {
                continue;
            };
            validate_descriptor_table(parameter_index, ranges)?;
        }
        Ok(())
    }
}

fn validate_descriptor_table(
    parameter_index: usize,
    ranges: &[DescriptorRange],
) -> Result<(), ResourceError> {
    let invalid = |msg: String| {
        Err(ResourceError::InvalidDescriptor(format!(
            "root parameter {parameter_index}: {msg}"
        )))
    };

    if ranges.is_empty() {
        return invalid("descriptor table without ranges".into());
    }

    let samplers = ranges
        .iter()
        .filter(|range| range.range_type == DescriptorRangeType::Sampler)
        .count();
    if samplers != 0 && samplers != ranges.len() {
        return invalid("sampler ranges mixed with view ranges".into());
    }

    for (range_index, range) in ranges.iter().enumerate() {
        if range.number_of_descriptors == 0 {
            return invalid(format!("range {range_index} has no descriptors"));
        }
        if !range.range_type.accepts(range.resource_type) {
            return invalid(format!(
                "range {range_index} of type {:?} cannot hold {}",
                range.range_type, range.resource_type
            ));
        }
    }

    let mut sorted: Vec<&DescriptorRange> = ranges.iter().collect();
    sorted.sort_by_key(|range| {
        (
            range.range_type as u8,
            range.register_space,
            range.base_shader_register,
        )
    });
    for pair in sorted.windows(2) {
        let (previous, next) = (pair[0], pair[1]);
        if previous.range_type != next.range_type || previous.register_space != next.register_space {
            continue;
        }
        let Some(end) = previous
            .base_shader_register
            .checked_add(previous.number_of_descriptors)
        else {
            return invalid(format!(
                "{:?} range at register {} overflows the register space",
                previous.range_type, previous.base_shader_register
            ));
        };
        if next.base_shader_register != end {
            return invalid(format!(
                "{:?} registers are not contiguous: expected register {end}, found {}",
                next.range_type, next.base_shader_register
            ));
        }
    }
    Ok(())
}

/// Describes a resource group.
#[derive(Debug, Clone)]
pub struct ResourceGroupDescriptor<'a> {
    /// Optional debug name.
    pub label: Option<Cow<'a, str>>,
    /// The root signature the group is laid out for.
    pub root_signature: RootSignatureHandle,
    /// The descriptor-table root parameter the group binds to.
    pub root_parameter_index: u32,
    /// The resources, one per descriptor of the table, in range order.
    pub resources: &'a [ResourceHandle],
    /// Optional sampler states, one slot per resource.
    pub sampler_states: Option<&'a [Option<SamplerStateHandle>]>,
}

/// Checks that `resources` positionally matches the descriptors of `ranges`
/// and that `sampler_slots`, if any, has one slot per resource.
pub fn validate_resource_group_layout(
    ranges: &[DescriptorRange],
    resources: &[ResourceHandle],
    sampler_slots: Option<usize>,
) -> Result<(), ResourceError> {
    let expected = ranges
        .iter()
        .flat_map(|range| std::iter::repeat_n(range, range.number_of_descriptors as usize));

    let number_of_descriptors: usize = ranges
        .iter()
        .map(|range| range.number_of_descriptors as usize)
        .sum();
    if resources.len() != number_of_descriptors {
        return Err(ResourceError::InvalidDescriptor(format!(
            "resource group holds {} resources, the descriptor table declares {number_of_descriptors}",
            resources.len()
        )));
    }
    if let Some(slots) = sampler_slots {
        if slots != resources.len() {
            return Err(ResourceError::InvalidDescriptor(format!(
                "{slots} sampler slots for {} resources",
                resources.len()
            )));
        }
    }

    for (position, (range, resource)) in expected.zip(resources).enumerate() {
        if resource.resource_type() != range.resource_type {
            return Err(ResourceError::InvalidDescriptor(format!(
                "resource {position} is a {}, the descriptor range expects a {}",
                resource.resource_type(),
                range.resource_type
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rhi::resource::RhiId;

    fn srv(count: u32, base: u32) -> DescriptorRange {
        DescriptorRange::new(
            DescriptorRangeType::Srv,
            count,
            base,
            "AlbedoMap",
            ResourceType::Texture2D,
            ShaderVisibility::Fragment,
        )
    }

    fn table(ranges: Vec<DescriptorRange>) -> RootSignatureDescriptor<'static> {
        RootSignatureDescriptor {
            parameters: vec![RootParameter::DescriptorTable { ranges }],
            ..Default::default()
        }
    }

    #[test]
    fn contiguous_ranges_are_valid() {
        assert!(table(vec![srv(2, 0), srv(1, 2)]).validate().is_ok());
    }

    #[test]
    fn gaps_and_overlaps_are_rejected() {
        assert!(table(vec![srv(1, 0), srv(1, 2)]).validate().is_err());
        assert!(table(vec![srv(2, 0), srv(1, 1)]).validate().is_err());
    }

    #[test]
    fn ranges_running_past_the_last_register_are_rejected() {
        let result = table(vec![srv(2, u32::MAX - 1), srv(1, u32::MAX)]).validate();
        assert!(matches!(result, Err(ResourceError::InvalidDescriptor(_))));
    }

    #[test]
    fn empty_tables_and_mixed_sampler_ranges_are_rejected() {
        assert!(table(Vec::new()).validate().is_err());
        let sampler = DescriptorRange::new(
            DescriptorRangeType::Sampler,
            1,
            0,
            "AlbedoSampler",
            ResourceType::SamplerState,
            ShaderVisibility::Fragment,
        );
        assert!(table(vec![srv(1, 0), sampler]).validate().is_err());
    }

    #[test]
    fn resource_group_must_match_ranges_positionally() {
        let owner = RhiId::from_raw(1);
        let texture = ResourceHandle::new(owner, 0, 0, ResourceType::Texture2D);
        let buffer = ResourceHandle::new(owner, 1, 0, ResourceType::UniformBuffer);
        let ranges = [srv(2, 0)];

        assert!(validate_resource_group_layout(&ranges, &[texture, texture], None).is_ok());
        assert!(validate_resource_group_layout(&ranges, &[texture, buffer], None).is_err());
        assert!(validate_resource_group_layout(&ranges, &[texture], None).is_err());
        assert!(validate_resource_group_layout(&ranges, &[texture, texture], Some(1)).is_err());
    }
}

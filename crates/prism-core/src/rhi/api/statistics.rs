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

//! Runtime statistics of an RHI instance.

use crate::rhi::resource::{ReferenceStatistics, ResourceType};
use std::collections::BTreeMap;

/// A snapshot of the resource and command counters of an RHI instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RhiStatistics {
    /// Live resources per type. Types without live resources are absent.
    pub live_resources: BTreeMap<ResourceType, usize>,
    /// Reference counting traffic.
    pub references: ReferenceStatistics,
    /// Draw calls executed, one per emulated draw record or indirect draw.
    pub draw_calls: u64,
    /// Compute dispatches executed.
    pub compute_dispatches: u64,
    /// Command packets executed, nested packets included.
    pub executed_commands: u64,
    /// Completed `begin_scene`/`end_scene` pairs.
    pub scenes: u64,
}

impl RhiStatistics {
    /// Number of live resources of one type.
    pub fn live(&self, resource_type: ResourceType) -> usize {
        self.live_resources.get(&resource_type).copied().unwrap_or(0)
    }

    /// Number of live resources of every type.
    pub fn total_live(&self) -> usize {
        self.live_resources.values().sum()
    }
}

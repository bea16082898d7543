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

//! The objects bound to the graphics and compute tracks of a Null RHI.

use prism_core::rhi::{
    ComputePipelineStateHandle, GraphicsPipelineStateHandle, ReferenceCounter,
    RenderTargetHandle, ResourceGroupHandle, ResourceRef, RootSignatureHandle, ScissorRectangle,
    TypedHandle, VertexArrayHandle, Viewport,
};
use std::sync::Arc;

/// Replaces the object bound in `slot`.
///
/// The new object gains a reference before the old one loses its own.
/// Binding the handle that is already bound does nothing and returns `false`.
pub(crate) fn rebind<H: TypedHandle>(
    slot: &mut Option<ResourceRef<H>>,
    handle: Option<H>,
    counter: &Arc<dyn ReferenceCounter>,
) -> bool {
    if slot.as_ref().map(ResourceRef::handle) == handle {
        return false;
    }
    *slot = handle.map(|handle| ResourceRef::new(handle, Arc::clone(counter)));
    true
}

/// The resource group slots of one track, indexed by root parameter.
#[derive(Debug, Default)]
pub(crate) struct ResourceGroupSlots(Vec<Option<ResourceRef<ResourceGroupHandle>>>);

impl ResourceGroupSlots {
    pub(crate) fn slot(&mut self, root_parameter_index: u32) -> &mut Option<ResourceRef<ResourceGroupHandle>> {
        let index = root_parameter_index as usize;
        if self.0.len() <= index {
            self.0.resize_with(index + 1, || None);
        }
        &mut self.0[index]
    }

    pub(crate) fn get(&self, root_parameter_index: u32) -> Option<ResourceGroupHandle> {
        self.0
            .get(root_parameter_index as usize)
            .and_then(|slot| slot.as_ref().map(ResourceRef::handle))
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

#[derive(Debug, Default)]
pub(crate) struct GraphicsState {
    pub(crate) root_signature: Option<ResourceRef<RootSignatureHandle>>,
    pub(crate) pipeline_state: Option<ResourceRef<GraphicsPipelineStateHandle>>,
    pub(crate) resource_groups: ResourceGroupSlots,
    pub(crate) vertex_array: Option<ResourceRef<VertexArrayHandle>>,
    pub(crate) render_target: Option<ResourceRef<RenderTargetHandle>>,
    pub(crate) viewports: Vec<Viewport>,
    pub(crate) scissor_rectangles: Vec<ScissorRectangle>,
}

impl GraphicsState {
    /// Unbinds everything, releasing the held references.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Default)]
pub(crate) struct ComputeState {
    pub(crate) root_signature: Option<ResourceRef<RootSignatureHandle>>,
    pub(crate) pipeline_state: Option<ResourceRef<ComputePipelineStateHandle>>,
    pub(crate) resource_groups: ResourceGroupSlots,
}

impl ComputeState {
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::rhi::{ResourceHandle, ResourceType, RhiId};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Counts(Mutex<HashMap<ResourceHandle, u32>>);

    impl ReferenceCounter for Counts {
        fn add_reference(&self, handle: ResourceHandle) -> u32 {
            let mut counts = self.0.lock().unwrap();
            let count = counts.entry(handle).or_insert(1);
            *count += 1;
            *count
        }

        fn release(&self, handle: ResourceHandle) -> u32 {
            let mut counts = self.0.lock().unwrap();
            let count = counts.entry(handle).or_insert(1);
            *count -= 1;
            *count
        }

        fn reference_count(&self, handle: ResourceHandle) -> u32 {
            self.0.lock().unwrap().get(&handle).copied().unwrap_or(1)
        }
    }

    fn vertex_array(index: u32) -> VertexArrayHandle {
        VertexArrayHandle::try_from_raw(ResourceHandle::new(
            RhiId::from_raw(3),
            index,
            0,
            ResourceType::VertexArray,
        ))
        .unwrap()
    }

    #[test]
    fn rebinding_moves_one_reference() {
        let counts = Arc::new(Counts::default());
        let counter: Arc<dyn ReferenceCounter> = counts.clone();
        let mut slot = None;

        assert!(rebind(&mut slot, Some(vertex_array(0)), &counter));
        assert_eq!(counts.reference_count(vertex_array(0).raw()), 2);
        assert!(!rebind(&mut slot, Some(vertex_array(0)), &counter));
        assert_eq!(counts.reference_count(vertex_array(0).raw()), 2);

        assert!(rebind(&mut slot, Some(vertex_array(1)), &counter));
        assert_eq!(counts.reference_count(vertex_array(0).raw()), 1);
        assert_eq!(counts.reference_count(vertex_array(1).raw()), 2);

        assert!(rebind(&mut slot, None, &counter));
        assert_eq!(counts.reference_count(vertex_array(1).raw()), 1);
    }

    #[test]
    fn resource_group_slots_grow_on_demand() {
        let mut slots = ResourceGroupSlots::default();
        assert!(slots.slot(3).is_none());
        assert_eq!(slots.get(3), None);
        assert_eq!(slots.get(10), None);
    }
}

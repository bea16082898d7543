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

use super::id_pool::IdPool;
use super::resources::{NullResource, NullResourceKind};
use prism_core::rhi::{
    Capabilities, ReferenceCounter, Resource, ResourceArena, ResourceError, ResourceHandle,
    ResourceRef, RhiContext, RhiId, TypedHandle,
};
use prism_core::rhi_assert;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The state shared by a [`NullRhi`](super::NullRhi), its resource managers
/// and every [`ResourceRef`] it hands out.
#[derive(Debug)]
pub(crate) struct NullShared {
    pub(crate) id: RhiId,
    pub(crate) context: Arc<RhiContext>,
    pub(crate) capabilities: Capabilities,
    resources: Mutex<ResourceArena<NullResource>>,
    pipeline_ids: Mutex<IdPool>,
}

impl NullShared {
    pub(crate) fn new(
        context: Arc<RhiContext>,
        capabilities: Capabilities,
        maximum_number_of_pipeline_states: u32,
    ) -> Self {
        let id = RhiId::next();
        Self {
            id,
            context,
            capabilities,
            resources: Mutex::new(ResourceArena::new(id)),
            pipeline_ids: Mutex::new(IdPool::new(maximum_number_of_pipeline_states)),
        }
    }

    /// Locks the resource arena.
    ///
    /// Never drop a [`ResourceRef`] of this RHI while holding the guard: its
    /// release locks the arena again.
    pub(crate) fn resources(&self) -> MutexGuard<'_, ResourceArena<NullResource>> {
        self.resources.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn pipeline_ids(&self) -> MutexGuard<'_, IdPool> {
        self.pipeline_ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Reports a refused operation and hands the error back.
    ///
    /// Unsupported features are logged; every other refusal is an RHI assertion.
    pub(crate) fn refuse(&self, err: ResourceError) -> ResourceError {
        match &err {
            ResourceError::Unsupported(what) => {
                log::error!("NullRhi: {what} is not supported");
            }
            _ => {
                rhi_assert!(self.context, false, "{err}");
            }
        }
        err
    }

    /// Checks that `handle` is a live resource of this RHI, firing an
    /// assertion otherwise.
    pub(crate) fn check_live(
        &self,
        resources: &ResourceArena<NullResource>,
        handle: ResourceHandle,
    ) -> Result<(), ResourceError> {
        resources
            .get(handle)
            .map(|_| ())
            .map_err(|err| self.refuse(err))
    }

    /// Inserts a new resource with one reference.
    pub(crate) fn insert(
        &self,
        resources: &mut ResourceArena<NullResource>,
        label: Option<&str>,
        kind: NullResourceKind,
    ) -> ResourceHandle {
        let resource = NullResource::new(label, kind);
        let resource_type = resource.resource_type();
        let handle = resources.insert(resource);
        log::info!(
            "NullRhi: Created {resource_type} '{}' with handle {handle}",
            label.unwrap_or("unnamed")
        );
        handle
    }

    /// Wraps the initial reference of a freshly inserted resource.
    pub(crate) fn adopt<H: TypedHandle>(
        self: &Arc<Self>,
        handle: ResourceHandle,
    ) -> Result<ResourceRef<H>, ResourceError> {
        match H::try_from_raw(handle) {
            Some(typed) => Ok(ResourceRef::adopt(typed, self.counter())),
            None => {
                self.release(handle);
                Err(self.refuse(ResourceError::WrongResourceType {
                    expected: H::KIND,
                    found: handle.resource_type(),
                }))
            }
        }
    }

    /// Locks the arena, inserts a resource and wraps its initial reference.
    pub(crate) fn create<H: TypedHandle>(
        self: &Arc<Self>,
        label: Option<&str>,
        kind: NullResourceKind,
    ) -> Result<ResourceRef<H>, ResourceError> {
        let handle = self.insert(&mut self.resources(), label, kind);
        self.adopt(handle)
    }

    pub(crate) fn counter(self: &Arc<Self>) -> Arc<dyn ReferenceCounter> {
        Arc::clone(self) as Arc<dyn ReferenceCounter>
    }

    /// Adds one reference to each handle, all or nothing.
    pub(crate) fn add_references(
        &self,
        resources: &mut ResourceArena<NullResource>,
        handles: &[ResourceHandle],
    ) -> Result<(), ResourceError> {
        for (position, &handle) in handles.iter().enumerate() {
            if let Err(err) = resources.add_reference(handle) {
                let destroyed = release_all(resources, &handles[..position]);
                self.destroyed(destroyed);
                return Err(self.refuse(err));
            }
        }
        Ok(())
    }

    /// Logs destroyed resources and returns their pipeline ids to the pool.
    pub(crate) fn destroyed(&self, destroyed: Vec<NullResource>) {
        for resource in destroyed {
            log::debug!(
                "NullRhi: Destroyed {} '{}'",
                resource.resource_type(),
                resource.label.as_deref().unwrap_or("unnamed")
            );
            if let Some(pipeline) = resource.as_graphics_pipeline_state() {
                self.pipeline_ids().release(pipeline.pipeline_id);
            }
        }
    }
}

/// Releases one reference on each handle and gathers what got destroyed.
pub(crate) fn release_all(
    resources: &mut ResourceArena<NullResource>,
    handles: &[ResourceHandle],
) -> Vec<NullResource> {
    let mut destroyed = Vec::new();
    for &handle in handles {
        match resources.release(handle) {
            Ok(released) => destroyed.extend(released.destroyed),
            Err(err) => log::warn!("NullRhi: Failed to give back reference on {handle}: {err}"),
        }
    }
    destroyed
}

impl ReferenceCounter for NullShared {
    fn add_reference(&self, handle: ResourceHandle) -> u32 {
        let result = self.resources().add_reference(handle);
        match result {
            Ok(count) => count,
            Err(err) => {
                self.refuse(err);
                0
            }
        }
    }

    fn release(&self, handle: ResourceHandle) -> u32 {
        let result = self.resources().release(handle);
        match result {
            Ok(released) => {
                self.destroyed(released.destroyed);
                released.reference_count
            }
            Err(err) => {
                self.refuse(err);
                0
            }
        }
    }

    fn reference_count(&self, handle: ResourceHandle) -> u32 {
        let result = self.resources().reference_count(handle);
        match result {
            Ok(count) => count,
            Err(err) => {
                self.refuse(err);
                0
            }
        }
    }
}

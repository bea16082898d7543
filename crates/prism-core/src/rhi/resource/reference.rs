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

//! Shared reference counting of RHI resources.

use super::handle::{ResourceHandle, TypedHandle};
use std::fmt;
use std::sync::Arc;

/// Access to the intrusive reference counts kept by an RHI instance.
///
/// Calls on a dead or foreign handle fire an RHI assertion and return `0`.
pub trait ReferenceCounter: Send + Sync + fmt::Debug {
    /// Adds a reference and returns the new count.
    fn add_reference(&self, handle: ResourceHandle) -> u32;

    /// Releases a reference and returns the remaining count.
    /// The resource is destroyed when the count reaches zero.
    fn release(&self, handle: ResourceHandle) -> u32;

    /// Returns the current reference count.
    fn reference_count(&self, handle: ResourceHandle) -> u32;
}

/// An owning smart reference to an RHI resource.
///
/// Cloning adds a reference, dropping releases one. Reassigning a variable
/// drops the previous value first, so the old resource is released and the
/// new one kept. Use `Option<ResourceRef<H>>` for a reference that may be null.
pub struct ResourceRef<H: TypedHandle> {
    handle: H,
    counter: Arc<dyn ReferenceCounter>,
}

impl<H: TypedHandle> ResourceRef<H> {
    /// Takes over a reference the caller already owns, such as the initial
    /// reference returned by a factory method.
    pub fn adopt(handle: H, counter: Arc<dyn ReferenceCounter>) -> Self {
        Self { handle, counter }
    }

    /// Adds a new reference to `handle` and wraps it.
    pub fn new(handle: H, counter: Arc<dyn ReferenceCounter>) -> Self {
        counter.add_reference(handle.raw());
        Self { handle, counter }
    }

    /// The typed handle.
    pub fn handle(&self) -> H {
        self.handle
    }

    /// The untyped handle.
    pub fn raw(&self) -> ResourceHandle {
        self.handle.raw()
    }

    /// The current reference count of the resource.
    pub fn reference_count(&self) -> u32 {
        self.counter.reference_count(self.handle.raw())
    }

    /// Retargets this reference, adding a reference to `handle` and releasing
    /// the previous resource. Retargeting to the current handle does nothing.
    pub fn set(&mut self, handle: H) {
        if handle == self.handle {
            return;
        }
        self.counter.add_reference(handle.raw());
        self.counter.release(self.handle.raw());
        self.handle = handle;
    }
}

impl<H: TypedHandle> Clone for ResourceRef<H> {
    fn clone(&self) -> Self {
        Self::new(self.handle, Arc::clone(&self.counter))
    }
}

impl<H: TypedHandle> Drop for ResourceRef<H> {
    fn drop(&mut self) {
        self.counter.release(self.handle.raw());
    }
}

impl<H: TypedHandle> PartialEq for ResourceRef<H> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<H: TypedHandle> Eq for ResourceRef<H> {}

impl<H: TypedHandle> fmt::Debug for ResourceRef<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRef")
            .field("handle", &self.handle)
            .field("reference_count", &self.reference_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rhi::resource::{ResourceType, RhiId, TextureHandle};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct CountingMap(Mutex<HashMap<ResourceHandle, u32>>);

    impl ReferenceCounter for CountingMap {
        fn add_reference(&self, handle: ResourceHandle) -> u32 {
            let mut map = self.0.lock().unwrap();
            let count = map.entry(handle).or_insert(0);
            *count += 1;
            *count
        }

        fn release(&self, handle: ResourceHandle) -> u32 {
            let mut map = self.0.lock().unwrap();
            let count = map.get_mut(&handle).unwrap();
            *count -= 1;
            *count
        }

        fn reference_count(&self, handle: ResourceHandle) -> u32 {
            self.0.lock().unwrap().get(&handle).copied().unwrap_or(0)
        }
    }

    fn texture(index: u32) -> TextureHandle {
        TextureHandle::try_from_raw(ResourceHandle::new(
            RhiId::from_raw(1),
            index,
            0,
            ResourceType::Texture2D,
        ))
        .unwrap()
    }

    #[test]
    fn clone_and_drop_balance() {
        let counter: Arc<dyn ReferenceCounter> = Arc::new(CountingMap::default());
        counter.add_reference(texture(0).raw());

        let first = ResourceRef::adopt(texture(0), Arc::clone(&counter));
        let second = first.clone();
        assert_eq!(first.reference_count(), 2);
        assert_eq!(first, second);

        drop(second);
        assert_eq!(first.reference_count(), 1);
        drop(first);
        assert_eq!(counter.reference_count(texture(0).raw()), 0);
    }

    #[test]
    fn reassignment_releases_the_previous_resource() {
        let counter: Arc<dyn ReferenceCounter> = Arc::new(CountingMap::default());
        let mut slot = ResourceRef::new(texture(0), Arc::clone(&counter));
        let other = ResourceRef::new(texture(1), Arc::clone(&counter));

        slot = other.clone();
        assert_eq!(counter.reference_count(texture(0).raw()), 0);
        assert_eq!(slot.reference_count(), 2);
    }
}

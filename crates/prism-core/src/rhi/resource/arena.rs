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

//! A generational, reference-counted arena owning the resources of one RHI instance.
//!
//! The arena is the single owner of every backend resource. Everything else,
//! including other resources, refers to a slot through a [`ResourceHandle`].
//! Each slot carries an intrusive reference count: it starts at one when the
//! resource is inserted, and the resource is destroyed when the count drops to
//! zero. Destroying a resource releases the references it held on its
//! [`Resource::dependencies`], which may in turn destroy those.

use super::handle::{ResourceHandle, ResourceType, RhiId};
use crate::rhi::error::ResourceError;

/// A value that can live in a [`ResourceArena`].
pub trait Resource {
    /// The closed-enum type tag of this resource.
    fn resource_type(&self) -> ResourceType;

    /// The optional debug name given at creation.
    fn debug_name(&self) -> Option<&str> {
        None
    }

    /// The resources this resource holds a reference on.
    ///
    /// Each handle returned here is released once when this resource is destroyed.
    fn dependencies(&self) -> Vec<ResourceHandle> {
        Vec::new()
    }
}

/// Instrumentation counters of a [`ResourceArena`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceStatistics {
    /// Successful `add_reference` calls.
    pub add_references: u64,
    /// Successful `release` calls, cascaded releases included.
    pub releases: u64,
    /// Resources destroyed because their count reached zero.
    pub destroyed: u64,
}

/// The outcome of a [`ResourceArena::release`] call.
#[derive(Debug)]
pub struct Released<T> {
    /// The remaining reference count of the released resource.
    pub reference_count: u32,
    /// Every resource destroyed by this release, in destruction order.
    pub destroyed: Vec<T>,
}

#[derive(Debug)]
struct Occupant<T> {
    reference_count: u32,
    value: T,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    occupant: Option<Occupant<T>>,
}

/// A generational arena of reference-counted resources.
#[derive(Debug)]
pub struct ResourceArena<T> {
    owner: RhiId,
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    live: usize,
    statistics: ReferenceStatistics,
}

impl<T: Resource> ResourceArena<T> {
    /// Creates an empty arena whose handles are owned by the given RHI instance.
    pub fn new(owner: RhiId) -> Self {
        Self {
            owner,
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
            statistics: ReferenceStatistics::default(),
        }
    }

    /// The RHI instance owning this arena.
    pub fn owner(&self) -> RhiId {
        self.owner
    }

    /// The number of live resources.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no resource is alive.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns the instrumentation counters.
    pub fn statistics(&self) -> ReferenceStatistics {
        self.statistics
    }

    /// Inserts a resource with a reference count of one and returns its handle.
    pub fn insert(&mut self, value: T) -> ResourceHandle {
        let resource_type = value.resource_type();
        let occupant = Occupant {
            reference_count: 1,
            value,
        };
        let index = match self.free_list.pop() {
            Some(index) => {
                self.slots[index as usize].occupant = Some(occupant);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    occupant: Some(occupant),
                });
                (self.slots.len() - 1) as u32
            }
        };
        self.live += 1;
        ResourceHandle::new(
            self.owner,
            index,
            self.slots[index as usize].generation,
            resource_type,
        )
    }

    fn occupant(&self, handle: ResourceHandle) -> Result<&Occupant<T>, ResourceError> {
        if handle.owner() != self.owner {
            return Err(ResourceError::WrongOwner(handle));
        }
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.occupant.as_ref())
            .filter(|occupant| occupant.value.resource_type() == handle.resource_type())
            .ok_or(ResourceError::InvalidHandle(handle))
    }

    fn occupant_mut(&mut self, handle: ResourceHandle) -> Result<&mut Occupant<T>, ResourceError> {
        if handle.owner() != self.owner {
            return Err(ResourceError::WrongOwner(handle));
        }
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.occupant.as_mut())
            .filter(|occupant| occupant.value.resource_type() == handle.resource_type())
            .ok_or(ResourceError::InvalidHandle(handle))
    }

    /// Returns `true` if the handle refers to a live resource of this arena.
    pub fn contains(&self, handle: ResourceHandle) -> bool {
        self.occupant(handle).is_ok()
    }

    /// Borrows a live resource.
    pub fn get(&self, handle: ResourceHandle) -> Result<&T, ResourceError> {
        self.occupant(handle).map(|occupant| &occupant.value)
    }

    /// Mutably borrows a live resource.
    pub fn get_mut(&mut self, handle: ResourceHandle) -> Result<&mut T, ResourceError> {
        self.occupant_mut(handle).map(|occupant| &mut occupant.value)
    }

    /// Returns the current reference count of a live resource.
    pub fn reference_count(&self, handle: ResourceHandle) -> Result<u32, ResourceError> {
        self.occupant(handle).map(|occupant| occupant.reference_count)
    }

    /// Adds a reference and returns the new count.
    pub fn add_reference(&mut self, handle: ResourceHandle) -> Result<u32, ResourceError> {
        let occupant = self.occupant_mut(handle)?;
        occupant.reference_count += 1;
        let count = occupant.reference_count;
        self.statistics.add_references += 1;
        Ok(count)
    }

    /// Releases a reference, destroying the resource (and cascading into its
    /// dependencies) when the count reaches zero.
    pub fn release(&mut self, handle: ResourceHandle) -> Result<Released<T>, ResourceError> {
        let mut destroyed = Vec::new();
        let reference_count = self.release_one(handle, &mut destroyed)?;

        let mut cursor = 0;
        while cursor < destroyed.len() {
            for dependency in destroyed[cursor].dependencies() {
                if let Err(err) = self.release_one(dependency, &mut destroyed) {
                    log::warn!("Failed to release dependency {dependency} of {handle}: {err}");
                }
            }
            cursor += 1;
        }

        Ok(Released {
            reference_count,
            destroyed,
        })
    }

    fn release_one(
        &mut self,
        handle: ResourceHandle,
        destroyed: &mut Vec<T>,
    ) -> Result<u32, ResourceError> {
        let occupant = self.occupant_mut(handle)?;
        occupant.reference_count -= 1;
        let count = occupant.reference_count;
        self.statistics.releases += 1;

        if count == 0 {
            let slot = &mut self.slots[handle.index() as usize];
            if let Some(occupant) = slot.occupant.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(handle.index());
                self.live -= 1;
                self.statistics.destroyed += 1;
                destroyed.push(occupant.value);
            }
        }
        Ok(count)
    }

    /// Iterates over every live resource.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceHandle, &T)> + '_ {
        let owner = self.owner;
        self.slots.iter().enumerate().filter_map(move |(index, slot)| {
            slot.occupant.as_ref().map(|occupant| {
                (
                    ResourceHandle::new(
                        owner,
                        index as u32,
                        slot.generation,
                        occupant.value.resource_type(),
                    ),
                    &occupant.value,
                )
            })
        })
    }

    /// Counts the live resources of the given type.
    pub fn count_of(&self, resource_type: ResourceType) -> usize {
        self.iter()
            .filter(|(handle, _)| handle.resource_type() == resource_type)
            .count()
    }
}

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

/// A bounded pool of small integer ids. Freed ids are reused before new ones.
///
/// Graphics pipeline states draw their id from such a pool so backends can
/// index per-pipeline tables directly.
#[derive(Debug)]
pub(crate) struct IdPool {
    capacity: u32,
    next: u32,
    free: Vec<u16>,
}

impl IdPool {
    /// Creates a pool handing out ids `0..capacity`. The capacity is clamped
    /// to the `u16` range.
    pub(crate) fn new(capacity: u32) -> Self {
        Self {
            capacity: capacity.min(u32::from(u16::MAX) + 1),
            next: 0,
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Takes an id, or `None` when every id is in use.
    pub(crate) fn allocate(&mut self) -> Option<u16> {
        if let Some(id) = self.free.pop() {
            return Some(id);
        }
        if self.next < self.capacity {
            let id = self.next as u16;
            self.next += 1;
            return Some(id);
        }
        None
    }

    /// Gives an id back.
    pub(crate) fn release(&mut self, id: u16) {
        debug_assert!(u32::from(id) < self.next, "id {id} was never allocated");
        debug_assert!(!self.free.contains(&id), "id {id} released twice");
        self.free.push(id);
    }

    /// Number of ids currently handed out.
    pub(crate) fn in_use(&self) -> u32 {
        self.next - self.free.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_pool_recovers_after_release() {
        let mut pool = IdPool::new(2);
        let first = pool.allocate().unwrap();
        let second = pool.allocate().unwrap();
        assert_ne!(first, second);
        assert_eq!(pool.allocate(), None);
        assert_eq!(pool.in_use(), 2);

        pool.release(first);
        assert_eq!(pool.in_use(), 1);
        assert_eq!(pool.allocate(), Some(first));
    }

    #[test]
    fn capacity_is_clamped_to_sixteen_bits() {
        assert_eq!(IdPool::new(u32::MAX).capacity(), 65536);
    }
}

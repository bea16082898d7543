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

//! FNV-1a hashing.
//!
//! The 32-bit variant derives asset ids from virtual filenames; the 64-bit
//! variant fingerprints file contents for package integrity checks.

use std::io::{self, Read};

const FNV1A32_OFFSET_BASIS: u32 = 0x811c9dc5;
const FNV1A32_PRIME: u32 = 0x01000193;
const FNV1A64_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV1A64_PRIME: u64 = 0x100000001b3;

/// Files are hashed in chunks of this many bytes.
pub const FILE_HASH_CHUNK_SIZE: usize = 32 * 1024;

/// 32-bit FNV-1a of `bytes`.
pub fn fnv1a32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV1A32_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV1A32_PRIME)
    })
}

/// 64-bit FNV-1a of `bytes`.
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hasher = Fnv1a64::new();
    hasher.update(bytes);
    hasher.finish()
}

/// Incremental 64-bit FNV-1a.
///
/// Feeding the input in several pieces yields the same hash as a single
/// [`fnv1a64`] call over the concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fnv1a64 {
    hash: u64,
}

impl Fnv1a64 {
    /// A hasher in its initial state.
    pub const fn new() -> Self {
        Self {
            hash: FNV1A64_OFFSET_BASIS,
        }
    }

    /// Mixes `bytes` into the hash.
    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.hash ^= u64::from(byte);
            self.hash = self.hash.wrapping_mul(FNV1A64_PRIME);
        }
    }

    /// The hash of everything fed so far.
    pub const fn finish(&self) -> u64 {
        self.hash
    }
}

impl Default for Fnv1a64 {
    fn default() -> Self {
        Self::new()
    }
}

/// Hashes everything `reader` yields, [`FILE_HASH_CHUNK_SIZE`] bytes at a time.
pub fn fnv1a64_reader<R: Read + ?Sized>(reader: &mut R) -> io::Result<u64> {
    let mut hasher = Fnv1a64::new();
    let mut chunk = vec![0u8; FILE_HASH_CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => return Ok(hasher.finish()),
            Ok(read) => hasher.update(&chunk[..read]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(fnv1a32(b""), 0x811c9dc5);
        assert_eq!(fnv1a32(b"a"), 0xe40c292c);
        assert_eq!(fnv1a64(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a64(b"a"), 0xaf63dc4c8601ec8c);
        assert_eq!(fnv1a64(b"foobar"), 0x85944171f73967e8);
    }

    #[test]
    fn chunked_reads_match_one_shot_hash() {
        let data: Vec<u8> = (0..3 * FILE_HASH_CHUNK_SIZE + 17)
            .map(|index| (index % 251) as u8)
            .collect();
        let hashed = fnv1a64_reader(&mut data.as_slice()).unwrap();
        assert_eq!(hashed, fnv1a64(&data));
    }
}

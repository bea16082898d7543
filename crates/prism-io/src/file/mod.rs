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

//! Virtual file access.
//!
//! Assets are addressed by virtual filenames of the form
//! `Mount/relative/path`. A [`FileManager`] maps those names onto storage.

mod std_file_manager;

pub use self::std_file_manager::StdFileManager;

use crate::error::{AssetError, Result};
use crate::hash::fnv1a64_reader;
use std::fmt::Debug;
use std::io::{Read, Write};

/// Access to files through virtual filenames.
pub trait FileManager: Send + Sync + Debug {
    /// Whether a file exists behind `virtual_filename`.
    fn exists(&self, virtual_filename: &str) -> bool;

    /// Opens a file for reading.
    ///
    /// # Errors
    /// [`AssetError::FileNotFound`] when nothing exists behind the name.
    fn open_read(&self, virtual_filename: &str) -> Result<Box<dyn Read + Send>>;

    /// Opens a file for writing, creating or truncating it.
    fn open_write(&self, virtual_filename: &str) -> Result<Box<dyn Write + Send>>;

    /// Reads a whole file.
    fn read_to_end(&self, virtual_filename: &str) -> Result<Vec<u8>> {
        let mut reader = self.open_read(virtual_filename)?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// The FNV-1a-64 hash of a file's contents.
    fn file_hash(&self, virtual_filename: &str) -> Result<u64> {
        let mut reader = self.open_read(virtual_filename)?;
        Ok(fnv1a64_reader(&mut reader)?)
    }
}

/// Splits `virtual_filename` into its mount name and the path below it.
///
/// Both parts must be non-empty. Components may not be empty, `.` or `..`,
/// and backslashes are rejected so names stay portable.
pub fn split_virtual_filename(virtual_filename: &str) -> Result<(&str, &str)> {
    let invalid = |reason: &str| AssetError::InvalidVirtualFilename {
        virtual_filename: virtual_filename.to_owned(),
        reason: reason.to_owned(),
    };

    if virtual_filename.contains('\\') {
        return Err(invalid("backslashes are not allowed"));
    }
    if virtual_filename.contains('\0') {
        return Err(invalid("NUL bytes are not allowed"));
    }
    let (mount, relative) = virtual_filename
        .split_once('/')
        .ok_or_else(|| invalid("missing a mount name"))?;
    if mount.is_empty() || relative.is_empty() {
        return Err(invalid("mount name and path must not be empty"));
    }
    if virtual_filename
        .split('/')
        .any(|component| component.is_empty() || component == "." || component == "..")
    {
        return Err(invalid("empty, '.' and '..' components are not allowed"));
    }
    Ok((mount, relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_the_mount_name_off() {
        assert_eq!(
            split_virtual_filename("Example/Shaders/triangle.vert").unwrap(),
            ("Example", "Shaders/triangle.vert")
        );
    }

    #[test]
    fn rejects_escaping_and_malformed_names() {
        for name in [
            "Example",
            "/Shaders/a.vert",
            "Example/",
            "Example//a.vert",
            "Example/../secret",
            "Example/./a.vert",
            "Example\\a.vert",
        ] {
            assert!(
                matches!(
                    split_virtual_filename(name),
                    Err(AssetError::InvalidVirtualFilename { .. })
                ),
                "{name} should be rejected"
            );
        }
    }
}

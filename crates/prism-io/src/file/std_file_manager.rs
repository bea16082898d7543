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

use super::{split_virtual_filename, FileManager};
use crate::error::{AssetError, Result};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// A [`FileManager`] over the local filesystem.
///
/// Each mount name maps to a directory; `Mount/a/b.txt` resolves to
/// `<directory>/a/b.txt`.
#[derive(Debug, Default)]
pub struct StdFileManager {
    mounts: RwLock<HashMap<String, PathBuf>>,
}

impl StdFileManager {
    /// A file manager without mounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`mount`](Self::mount).
    pub fn with_mount(self, mount_name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        self.mount(mount_name, directory);
        self
    }

    /// Maps `mount_name` to `directory`, replacing any previous mapping.
    pub fn mount(&self, mount_name: impl Into<String>, directory: impl Into<PathBuf>) {
        let mount_name = mount_name.into();
        let directory = directory.into();
        log::info!("Mounting '{}' at {}", mount_name, directory.display());
        if let Ok(mut mounts) = self.mounts.write() {
            mounts.insert(mount_name, directory);
        }
    }

    /// Removes a mount. Returns the directory it pointed to.
    pub fn unmount(&self, mount_name: &str) -> Option<PathBuf> {
        self.mounts.write().ok()?.remove(mount_name)
    }

    /// The directory behind `mount_name`.
    pub fn mount_directory(&self, mount_name: &str) -> Option<PathBuf> {
        self.mounts.read().ok()?.get(mount_name).cloned()
    }

    /// The filesystem path behind `virtual_filename`.
    ///
    /// # Errors
    /// [`AssetError::InvalidVirtualFilename`] for malformed names or unknown
    /// mounts.
    pub fn resolve(&self, virtual_filename: &str) -> Result<PathBuf> {
        let (mount_name, relative) = split_virtual_filename(virtual_filename)?;
        let directory =
            self.mount_directory(mount_name)
                .ok_or_else(|| AssetError::InvalidVirtualFilename {
                    virtual_filename: virtual_filename.to_owned(),
                    reason: format!("no mount named '{mount_name}'"),
                })?;
        Ok(relative
            .split('/')
            .fold(directory, |path, component| path.join(component)))
    }

    fn open(&self, virtual_filename: &str, path: &Path) -> Result<File> {
        File::open(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => AssetError::FileNotFound {
                virtual_filename: virtual_filename.to_owned(),
            },
            _ => AssetError::Io(err),
        })
    }
}

impl FileManager for StdFileManager {
    fn exists(&self, virtual_filename: &str) -> bool {
        self.resolve(virtual_filename)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    fn open_read(&self, virtual_filename: &str) -> Result<Box<dyn Read + Send>> {
        let path = self.resolve(virtual_filename)?;
        let file = self.open(virtual_filename, &path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn open_write(&self, virtual_filename: &str) -> Result<Box<dyn Write + Send>> {
        let path = self.resolve(virtual_filename)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        log::debug!("Opened {} for writing", path.display());
        Ok(Box::new(BufWriter::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_below_the_mount_directory() {
        let manager = StdFileManager::new().with_mount("Example", "/data/example");
        assert_eq!(
            manager.resolve("Example/Shaders/triangle.vert").unwrap(),
            Path::new("/data/example").join("Shaders").join("triangle.vert")
        );
    }

    #[test]
    fn unknown_mounts_do_not_resolve() {
        let manager = StdFileManager::new();
        assert!(manager.resolve("Missing/file.txt").is_err());
        assert!(!manager.exists("Missing/file.txt"));
    }

    #[test]
    fn written_files_read_back() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let manager = StdFileManager::new().with_mount("Temp", dir.path());

        let mut writer = manager.open_write("Temp/nested/data.bin")?;
        writer.write_all(b"prism")?;
        writer.flush()?;
        drop(writer);

        assert!(manager.exists("Temp/nested/data.bin"));
        assert_eq!(manager.read_to_end("Temp/nested/data.bin")?, b"prism");
        assert!(matches!(
            manager.open_read("Temp/nested/other.bin"),
            Err(AssetError::FileNotFound { .. })
        ));
        Ok(())
    }
}

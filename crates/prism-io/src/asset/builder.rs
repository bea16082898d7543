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

use super::{Asset, AssetPackage, AssetPackageId};
use crate::error::{AssetError, Result};
use crate::hash::fnv1a64_reader;
use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Builds a package recording every file below `directory`.
///
/// A file at `directory/a/b.txt` becomes the virtual filename
/// `mount_name/a/b.txt`, its id the hash of that name and its file hash the
/// FNV-1a-64 of its contents. Files are visited in name order so the same
/// tree always produces the same package.
///
/// # Errors
/// Fails on unreadable entries, on names that are not valid UTF-8 or too
/// long, and when two names hash to the same id.
pub fn build_asset_package(
    id: AssetPackageId,
    mount_name: &str,
    directory: impl AsRef<Path>,
) -> Result<AssetPackage> {
    let directory = directory.as_ref();
    let mut package = AssetPackage::new(id);

    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(directory).unwrap_or(entry.path());
        let virtual_filename = virtual_filename_for(mount_name, relative)?;

        let mut reader = BufReader::new(File::open(entry.path())?);
        let file_hash = fnv1a64_reader(&mut reader)?;

        let asset = Asset::from_virtual_filename(file_hash, virtual_filename)?;
        log::debug!("Recording asset {} '{}'", asset.asset_id, asset.virtual_filename());
        package.add_asset(asset)?;
    }

    log::info!(
        "Built asset package {} with {} assets from {}",
        id,
        package.len(),
        directory.display()
    );
    Ok(package)
}

/// `mount_name` joined with the normal components of `relative` by forward slashes.
pub(crate) fn virtual_filename_for(mount_name: &str, relative: &Path) -> Result<String> {
    let mut virtual_filename = mount_name.to_owned();
    for component in relative.components() {
        let Component::Normal(part) = component else {
            continue;
        };
        let part = part
            .to_str()
            .ok_or_else(|| AssetError::InvalidVirtualFilename {
                virtual_filename: format!("{mount_name}/{}", relative.display()),
                reason: "path is not valid UTF-8".to_owned(),
            })?;
        virtual_filename.push('/');
        virtual_filename.push_str(part);
    }
    Ok(virtual_filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_paths_use_forward_slashes() {
        let relative = Path::new("Shaders").join("Deferred").join("light.frag");
        assert_eq!(
            virtual_filename_for("Example", &relative).unwrap(),
            "Example/Shaders/Deferred/light.frag"
        );
    }
}

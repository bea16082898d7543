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

use super::{Asset, AssetId, AssetPackage, AssetPackageId};
use crate::error::{AssetError, Result};
use crate::file::FileManager;
use std::sync::Arc;

/// Owns the mounted asset packages and loads assets through a [`FileManager`].
///
/// Packages are searched from the most recently mounted one backwards, so a
/// later package shadows records of earlier ones with the same id.
#[derive(Debug)]
pub struct AssetManager {
    file_manager: Arc<dyn FileManager>,
    packages: Vec<AssetPackage>,
}

impl AssetManager {
    /// A manager without packages.
    pub fn new(file_manager: Arc<dyn FileManager>) -> Self {
        Self {
            file_manager,
            packages: Vec::new(),
        }
    }

    /// The file manager assets are read through.
    pub fn file_manager(&self) -> &Arc<dyn FileManager> {
        &self.file_manager
    }

    /// Number of mounted packages.
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Mounts an empty package, or returns the mounted one with that id.
    pub fn add_asset_package(&mut self, id: AssetPackageId) -> &mut AssetPackage {
        let position = match self.position(id) {
            Some(position) => position,
            None => {
                log::info!("Adding asset package {}", id);
                self.packages.push(AssetPackage::new(id));
                self.packages.len() - 1
            }
        };
        &mut self.packages[position]
    }

    /// Mounts `package` on top of the others.
    ///
    /// A mounted package with the same id is replaced.
    pub fn mount_asset_package(&mut self, package: AssetPackage) {
        if let Some(position) = self.position(package.id()) {
            log::info!("Replacing mounted asset package {}", package.id());
            self.packages.remove(position);
        } else {
            log::info!(
                "Mounting asset package {} ({} assets)",
                package.id(),
                package.len()
            );
        }
        self.packages.push(package);
    }

    /// Loads the package stored at `virtual_filename` and mounts it.
    pub fn mount_asset_package_file(&mut self, virtual_filename: &str) -> Result<AssetPackageId> {
        let package = AssetPackage::load(self.file_manager.as_ref(), virtual_filename)?;
        let id = package.id();
        self.mount_asset_package(package);
        Ok(id)
    }

    /// The mounted package with the given id.
    pub fn get_asset_package(&self, id: AssetPackageId) -> Option<&AssetPackage> {
        self.packages.iter().find(|package| package.id() == id)
    }

    /// Unmounts a package and hands it back.
    pub fn remove_asset_package(&mut self, id: AssetPackageId) -> Result<AssetPackage> {
        let position = self
            .position(id)
            .ok_or(AssetError::UnknownAssetPackage(id))?;
        log::debug!("Removing asset package {}", id);
        Ok(self.packages.remove(position))
    }

    /// Unmounts every package.
    pub fn remove_all_asset_packages(&mut self) {
        self.packages.clear();
    }

    /// The record for `asset_id` in the topmost package that has one.
    pub fn get_asset_by_asset_id(&self, asset_id: AssetId) -> Option<&Asset> {
        self.packages
            .iter()
            .rev()
            .find_map(|package| package.get_asset_by_asset_id(asset_id))
    }

    /// The virtual filename recorded for `asset_id`.
    pub fn try_get_virtual_filename_by_asset_id(&self, asset_id: AssetId) -> Option<&str> {
        self.get_asset_by_asset_id(asset_id)
            .map(Asset::virtual_filename)
    }

    /// Reads the contents of an asset.
    ///
    /// # Errors
    /// [`AssetError::UnknownAsset`] when no package records the id, otherwise
    /// whatever the file manager reports.
    pub fn load_asset(&self, asset_id: AssetId) -> Result<Vec<u8>> {
        let virtual_filename = self
            .try_get_virtual_filename_by_asset_id(asset_id)
            .ok_or(AssetError::UnknownAsset(asset_id))?;
        self.file_manager.read_to_end(virtual_filename)
    }

    /// Validates the integrity of every mounted package.
    pub fn validate_integrity(&self) -> bool {
        self.packages
            .iter()
            .all(|package| package.validate_integrity(self.file_manager.as_ref()))
    }

    fn position(&self, id: AssetPackageId) -> Option<usize> {
        self.packages.iter().position(|package| package.id() == id)
    }
}

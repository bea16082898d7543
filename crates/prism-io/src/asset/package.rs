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

use super::{validate_virtual_filename, Asset, AssetId, AssetPackageId};
use crate::error::{AssetError, Result};
use crate::file::FileManager;
use std::io::Write;

/// First four bytes of a serialized package.
pub const ASSET_PACKAGE_MAGIC: [u8; 4] = *b"PRAP";
/// Format version written after the magic.
pub const ASSET_PACKAGE_FORMAT_VERSION: u32 = 1;

const HEADER_SIZE: usize = 8;

/// A table of asset records sorted by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPackage {
    id: AssetPackageId,
    assets: Vec<Asset>,
}

impl AssetPackage {
    /// An empty package.
    pub fn new(id: AssetPackageId) -> Self {
        Self {
            id,
            assets: Vec::new(),
        }
    }

    /// The package's id.
    pub fn id(&self) -> AssetPackageId {
        self.id
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the package has no records.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Inserts a record at its sorted position.
    ///
    /// # Errors
    /// [`AssetError::DuplicateAssetId`] when a record with the same id exists;
    /// the package is left unchanged.
    pub fn add_asset(&mut self, asset: Asset) -> Result<()> {
        match self
            .assets
            .binary_search_by_key(&asset.asset_id, |existing| existing.asset_id)
        {
            Ok(_) => Err(AssetError::DuplicateAssetId(asset.asset_id)),
            Err(position) => {
                self.assets.insert(position, asset);
                Ok(())
            }
        }
    }

    /// All records, ascending by id.
    pub fn get_sorted_asset_vector(&self) -> &[Asset] {
        &self.assets
    }

    /// The record with the given id.
    pub fn get_asset_by_asset_id(&self, asset_id: AssetId) -> Option<&Asset> {
        self.assets
            .binary_search_by_key(&asset_id, |asset| asset.asset_id)
            .ok()
            .map(|position| &self.assets[position])
    }

    /// The virtual filename recorded for `asset_id`.
    pub fn try_get_virtual_filename_by_asset_id(&self, asset_id: AssetId) -> Option<&str> {
        self.get_asset_by_asset_id(asset_id)
            .map(Asset::virtual_filename)
    }

    /// Removes every record.
    pub fn remove_all_assets(&mut self) {
        self.assets.clear();
    }

    /// Recomputes the FNV-1a-64 hash of every referenced file and compares it
    /// with the recorded one.
    ///
    /// Returns `false` as soon as a file is missing, unreadable or changed.
    /// Failures are logged, never raised.
    pub fn validate_integrity(&self, file_manager: &dyn FileManager) -> bool {
        for asset in &self.assets {
            match file_manager.file_hash(asset.virtual_filename()) {
                Ok(hash) if hash == asset.file_hash => {}
                Ok(hash) => {
                    log::warn!(
                        "Asset {} '{}' changed: recorded hash {:#018x}, file hash {:#018x}",
                        asset.asset_id,
                        asset.virtual_filename(),
                        asset.file_hash,
                        hash
                    );
                    return false;
                }
                Err(err) => {
                    log::warn!(
                        "Asset {} '{}' cannot be hashed: {}",
                        asset.asset_id,
                        asset.virtual_filename(),
                        err
                    );
                    return false;
                }
            }
        }
        true
    }

    /// Serializes the package: magic, little-endian format version, then the
    /// bincode encoding of the id and the sorted records.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard();
        let body = bincode::serde::encode_to_vec((self.id, &self.assets), config)?;

        let mut bytes = Vec::with_capacity(HEADER_SIZE + body.len());
        bytes.extend_from_slice(&ASSET_PACKAGE_MAGIC);
        bytes.extend_from_slice(&ASSET_PACKAGE_FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    /// Parses bytes written by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    /// Besides header and decoding errors, [`AssetError::CorruptPackage`] when
    /// the records are not strictly ascending by id or carry an invalid name.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(AssetError::CorruptPackage(format!(
                "{} bytes are too short for the header",
                bytes.len()
            )));
        }
        let (header, body) = bytes.split_at(HEADER_SIZE);
        let magic = [header[0], header[1], header[2], header[3]];
        if magic != ASSET_PACKAGE_MAGIC {
            return Err(AssetError::InvalidMagic { found: magic });
        }
        let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        if version != ASSET_PACKAGE_FORMAT_VERSION {
            return Err(AssetError::UnsupportedVersion {
                found: version,
                expected: ASSET_PACKAGE_FORMAT_VERSION,
            });
        }

        let config = bincode::config::standard();
        let ((id, assets), _): ((AssetPackageId, Vec<Asset>), _) =
            bincode::serde::decode_from_slice(body, config)?;

        if let Some(pair) = assets
            .windows(2)
            .find(|pair| pair[0].asset_id >= pair[1].asset_id)
        {
            return Err(AssetError::CorruptPackage(format!(
                "asset {} follows asset {}",
                pair[1].asset_id, pair[0].asset_id
            )));
        }
        for asset in &assets {
            validate_virtual_filename(asset.virtual_filename())
                .map_err(|err| AssetError::CorruptPackage(err.to_string()))?;
        }

        Ok(Self { id, assets })
    }

    /// Writes the package to `virtual_filename`.
    pub fn save(&self, file_manager: &dyn FileManager, virtual_filename: &str) -> Result<()> {
        let bytes = self.to_bytes()?;
        let mut writer = file_manager.open_write(virtual_filename)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        log::info!(
            "Saved asset package {} ({} assets) to '{}'",
            self.id,
            self.assets.len(),
            virtual_filename
        );
        Ok(())
    }

    /// Reads a package written by [`save`](Self::save).
    pub fn load(file_manager: &dyn FileManager, virtual_filename: &str) -> Result<Self> {
        let bytes = file_manager.read_to_end(virtual_filename)?;
        let package = Self::from_bytes(&bytes)?;
        log::info!(
            "Loaded asset package {} ({} assets) from '{}'",
            package.id,
            package.assets.len(),
            virtual_filename
        );
        Ok(package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: u32, name: &str) -> Asset {
        Asset::new(AssetId(id), u64::from(id), name).unwrap()
    }

    #[test]
    fn duplicate_ids_are_refused() {
        let mut package = AssetPackage::new(AssetPackageId(1));
        package.add_asset(asset(7, "M/a")).unwrap();
        assert!(matches!(
            package.add_asset(asset(7, "M/b")),
            Err(AssetError::DuplicateAssetId(AssetId(7)))
        ));
        assert_eq!(package.try_get_virtual_filename_by_asset_id(AssetId(7)), Some("M/a"));
    }

    #[test]
    fn lookups_miss_cleanly() {
        let mut package = AssetPackage::new(AssetPackageId(1));
        package.add_asset(asset(2, "M/two")).unwrap();
        assert!(package.get_asset_by_asset_id(AssetId(3)).is_none());
        package.remove_all_assets();
        assert!(package.is_empty());
    }

    #[test]
    fn bytes_start_with_the_header() {
        let bytes = AssetPackage::new(AssetPackageId(9)).to_bytes().unwrap();
        assert_eq!(&bytes[..4], b"PRAP");
        assert_eq!(&bytes[4..8], &1u32.to_le_bytes());
    }

    #[test]
    fn foreign_bytes_are_rejected() {
        assert!(matches!(
            AssetPackage::from_bytes(b"GLTF\x01\x00\x00\x00"),
            Err(AssetError::InvalidMagic { found }) if &found == b"GLTF"
        ));
        assert!(matches!(
            AssetPackage::from_bytes(b"PRAP\x02\x00\x00\x00"),
            Err(AssetError::UnsupportedVersion { found: 2, expected: 1 })
        ));
        assert!(matches!(
            AssetPackage::from_bytes(b"PRA"),
            Err(AssetError::CorruptPackage(_))
        ));
    }

    #[test]
    fn unsorted_records_are_corrupt() {
        let records = vec![asset(5, "M/five"), asset(1, "M/one")];
        let body =
            bincode::serde::encode_to_vec((AssetPackageId(1), &records), bincode::config::standard())
                .unwrap();
        let mut bytes = b"PRAP".to_vec();
        bytes.extend_from_slice(&ASSET_PACKAGE_FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&body);

        assert!(matches!(
            AssetPackage::from_bytes(&bytes),
            Err(AssetError::CorruptPackage(_))
        ));
    }
}

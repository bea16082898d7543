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

//! Asset records, packages and the manager that mounts them.
//!
//! An [`AssetPackage`] is a table of [`Asset`] records kept sorted by
//! [`AssetId`]. Each record ties an id to a virtual filename and to the
//! FNV-1a-64 hash the file had when the package was built, which lets
//! [`AssetPackage::validate_integrity`] detect files changed behind its back.

pub(crate) mod builder;
mod manager;
mod package;

pub use self::builder::build_asset_package;
pub use self::manager::AssetManager;
pub use self::package::{AssetPackage, ASSET_PACKAGE_FORMAT_VERSION, ASSET_PACKAGE_MAGIC};

use crate::error::{AssetError, Result};
use crate::file::split_virtual_filename;
use crate::hash::fnv1a32;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest virtual filename a record can hold, in bytes.
///
/// Records reserve 128 bytes per name, the last one for a terminator.
pub const MAXIMUM_VIRTUAL_FILENAME_LENGTH: usize = 127;

/// Identifies an asset across all mounted packages.
///
/// Usually the 32-bit FNV-1a hash of the asset's virtual filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub u32);

impl AssetId {
    /// The id derived from a virtual filename.
    pub fn from_virtual_filename(virtual_filename: &str) -> Self {
        Self(fnv1a32(virtual_filename.as_bytes()))
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Identifies a mounted asset package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetPackageId(pub u32);

impl AssetPackageId {
    /// The id derived from a package name.
    pub fn from_name(name: &str) -> Self {
        Self(fnv1a32(name.as_bytes()))
    }
}

impl fmt::Display for AssetPackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// One entry of an asset package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// The asset's id.
    pub asset_id: AssetId,
    /// FNV-1a-64 of the file contents when the record was made.
    pub file_hash: u64,
    virtual_filename: String,
}

impl Asset {
    /// Creates a record.
    ///
    /// # Errors
    /// [`AssetError::InvalidVirtualFilename`] when the name is longer than
    /// [`MAXIMUM_VIRTUAL_FILENAME_LENGTH`] bytes or is not of the form
    /// `Mount/relative/path`.
    pub fn new(asset_id: AssetId, file_hash: u64, virtual_filename: impl Into<String>) -> Result<Self> {
        let virtual_filename = virtual_filename.into();
        validate_virtual_filename(&virtual_filename)?;
        Ok(Self {
            asset_id,
            file_hash,
            virtual_filename,
        })
    }

    /// Creates a record whose id is derived from its virtual filename.
    pub fn from_virtual_filename(file_hash: u64, virtual_filename: impl Into<String>) -> Result<Self> {
        let virtual_filename = virtual_filename.into();
        Self::new(
            AssetId::from_virtual_filename(&virtual_filename),
            file_hash,
            virtual_filename,
        )
    }

    /// The virtual filename of the asset's file.
    pub fn virtual_filename(&self) -> &str {
        &self.virtual_filename
    }
}

pub(crate) fn validate_virtual_filename(virtual_filename: &str) -> Result<()> {
    if virtual_filename.len() > MAXIMUM_VIRTUAL_FILENAME_LENGTH {
        return Err(AssetError::InvalidVirtualFilename {
            virtual_filename: virtual_filename.to_owned(),
            reason: format!(
                "{} bytes exceed the limit of {MAXIMUM_VIRTUAL_FILENAME_LENGTH}",
                virtual_filename.len()
            ),
        });
    }
    split_virtual_filename(virtual_filename).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_hashes_of_the_name() {
        let id = AssetId::from_virtual_filename("Example/Shaders/triangle.vert");
        assert_eq!(id, AssetId(fnv1a32(b"Example/Shaders/triangle.vert")));
        assert_ne!(id, AssetId::from_virtual_filename("Example/Shaders/triangle.frag"));
    }

    #[test]
    fn virtual_filenames_fit_the_record() {
        let longest = format!("M/{}", "a".repeat(MAXIMUM_VIRTUAL_FILENAME_LENGTH - 2));
        assert!(Asset::new(AssetId(1), 0, longest.clone()).is_ok());

        let too_long = format!("{longest}a");
        assert!(matches!(
            Asset::new(AssetId(1), 0, too_long),
            Err(AssetError::InvalidVirtualFilename { .. })
        ));
    }

    #[test]
    fn ids_display_as_hex() {
        assert_eq!(AssetId(0x2a).to_string(), "0x0000002a");
    }
}

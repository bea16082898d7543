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

//! Error types of the asset layer.

use crate::asset::{AssetId, AssetPackageId};
use thiserror::Error;

/// Errors raised by asset packages, file access and the asset monitor.
#[derive(Debug, Error)]
pub enum AssetError {
    /// An underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No file exists behind a virtual filename.
    #[error("file not found: '{virtual_filename}'")]
    FileNotFound {
        /// The virtual filename that was looked up.
        virtual_filename: String,
    },

    /// A virtual filename that cannot be resolved or stored.
    #[error("invalid virtual filename '{virtual_filename}': {reason}")]
    InvalidVirtualFilename {
        /// The offending name.
        virtual_filename: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No mounted package knows the asset id.
    #[error("unknown asset id {0}")]
    UnknownAsset(AssetId),

    /// Two assets of one package share an id.
    #[error("asset id {0} is already part of the package")]
    DuplicateAssetId(AssetId),

    /// No mounted package has the given id.
    #[error("asset package {0} is not mounted")]
    UnknownAssetPackage(AssetPackageId),

    /// The file does not start with the package magic.
    #[error("not an asset package: bad magic {found:?}")]
    InvalidMagic {
        /// The first four bytes of the file.
        found: [u8; 4],
    },

    /// The package was written by an incompatible format version.
    #[error("unsupported asset package version {found}, expected {expected}")]
    UnsupportedVersion {
        /// Version stored in the file.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },

    /// The package decoded but breaks the sorted, unique id invariant.
    #[error("corrupt asset package: {0}")]
    CorruptPackage(String),

    /// Serializing a package failed.
    #[error("failed to encode asset package: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// Deserializing a package failed.
    #[error("failed to decode asset package: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    /// Walking a source directory failed.
    #[error("failed to walk directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// The filesystem watcher could not be set up.
    #[error("failed to watch for asset changes: {0}")]
    Watch(#[from] notify::Error),
}

/// Result type of the asset layer.
pub type Result<T> = std::result::Result<T, AssetError>;

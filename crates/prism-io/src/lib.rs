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

//! # Prism IO
//!
//! The data layer consumed by the RHI resource loaders: asset packages mapping
//! asset ids to virtual filenames, FNV-1a content hashing for integrity checks,
//! virtual file access and a background asset monitor.

#![warn(missing_docs)]

pub mod asset;
pub mod error;
pub mod file;
pub mod hash;
pub mod monitor;

pub use asset::{build_asset_package, Asset, AssetId, AssetManager, AssetPackage, AssetPackageId};
pub use error::AssetError;
pub use file::{FileManager, StdFileManager};
pub use monitor::{AssetChange, AssetChangeKind, AssetMonitor, AssetMonitorConfig};

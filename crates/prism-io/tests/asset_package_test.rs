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

use anyhow::Result;
use prism_io::{
    build_asset_package, Asset, AssetChangeKind, AssetId, AssetManager, AssetMonitor,
    AssetMonitorConfig, AssetPackage, AssetPackageId, FileManager, StdFileManager,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn write_tree(root: &Path) -> Result<()> {
    fs::create_dir_all(root.join("Shaders"))?;
    fs::write(root.join("Shaders").join("triangle.vert"), b"void main() {}")?;
    fs::write(root.join("Shaders").join("triangle.frag"), b"void main() { discard; }")?;
    fs::write(root.join("readme.txt"), b"example assets")?;
    Ok(())
}

#[test]
fn assets_are_kept_sorted_by_id() -> Result<()> {
    let mut package = AssetPackage::new(AssetPackageId(1));
    for id in [5, 1, 3] {
        package.add_asset(Asset::new(AssetId(id), 0, format!("Example/{id}.bin"))?)?;
    }

    let ids: Vec<u32> = package
        .get_sorted_asset_vector()
        .iter()
        .map(|asset| asset.asset_id.0)
        .collect();
    assert_eq!(ids, [1, 3, 5]);
    assert_eq!(
        package.try_get_virtual_filename_by_asset_id(AssetId(3)),
        Some("Example/3.bin")
    );
    Ok(())
}

#[test]
fn integrity_fails_once_a_file_changes() -> Result<()> {
    let dir = tempdir()?;
    write_tree(dir.path())?;
    let files = StdFileManager::new().with_mount("Example", dir.path());

    let package = build_asset_package(AssetPackageId::from_name("Example"), "Example", dir.path())?;
    assert_eq!(package.len(), 3);
    assert!(package.validate_integrity(&files));

    fs::write(
        dir.path().join("Shaders").join("triangle.frag"),
        b"void main() { /* edited */ }",
    )?;
    assert!(!package.validate_integrity(&files));
    Ok(())
}

#[test]
fn missing_files_fail_integrity() -> Result<()> {
    let dir = tempdir()?;
    write_tree(dir.path())?;
    let files = StdFileManager::new().with_mount("Example", dir.path());
    let package = build_asset_package(AssetPackageId(1), "Example", dir.path())?;

    fs::remove_file(dir.path().join("readme.txt"))?;
    assert!(!package.validate_integrity(&files));
    Ok(())
}

#[test]
fn saved_packages_mount_and_load_assets() -> Result<()> {
    let assets = tempdir()?;
    let packages = tempdir()?;
    write_tree(assets.path())?;

    let files = Arc::new(
        StdFileManager::new()
            .with_mount("Example", assets.path())
            .with_mount("Packages", packages.path()),
    );
    let package = build_asset_package(AssetPackageId::from_name("Example"), "Example", assets.path())?;
    package.save(files.as_ref(), "Packages/example.prap")?;
    assert!(files.exists("Packages/example.prap"));

    let mut manager = AssetManager::new(files);
    let id = manager.mount_asset_package_file("Packages/example.prap")?;
    assert_eq!(id, AssetPackageId::from_name("Example"));
    assert_eq!(manager.get_asset_package(id), Some(&package));
    assert!(manager.validate_integrity());

    let vertex_shader = AssetId::from_virtual_filename("Example/Shaders/triangle.vert");
    assert_eq!(manager.load_asset(vertex_shader)?, b"void main() {}");
    Ok(())
}

#[test]
fn monitor_reports_new_files() -> Result<()> {
    let dir = tempdir()?;
    let config = AssetMonitorConfig {
        poll_interval: Duration::from_millis(20),
        ..Default::default()
    };
    let (mut monitor, changes) = AssetMonitor::start(dir.path(), "Watched", config)?;
    assert!(monitor.is_running());

    fs::write(dir.path().join("added.txt"), b"hello")?;

    let expected = AssetId::from_virtual_filename("Watched/added.txt");
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut seen = None;
    while seen.is_none() && Instant::now() < deadline {
        if let Ok(change) = changes.recv_timeout(Duration::from_millis(200)) {
            if change.asset_id == expected {
                seen = Some(change);
            }
        }
    }

    let change = seen.expect("no change reported for the new file");
    assert_eq!(change.virtual_filename, "Watched/added.txt");
    assert!(matches!(
        change.kind,
        AssetChangeKind::Created | AssetChangeKind::Modified
    ));

    monitor.stop();
    assert!(!monitor.is_running());
    Ok(())
}

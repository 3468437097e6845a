//! File watching for live reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// The post store was modified
    PostsModified(PathBuf),

    /// Site configuration was modified
    ConfigModified(PathBuf),

    /// File was created
    Created(PathBuf),

    /// File was deleted
    Deleted(PathBuf),

    /// Generic modification
    Modified(PathBuf),
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new file watcher for the given paths.
    ///
    /// Returns the watcher and a channel to receive events.
    pub fn new(
        paths: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if let Some((target, mode)) = watch_target(path) {
                watcher.watch(&target, mode).map_err(std::io::Error::other)?;
            }
        }

        // Forward events, dropping rapid bursts
        let async_tx_clone = async_tx.clone();
        std::thread::spawn(move || {
            let mut last_event_time = std::time::Instant::now();
            let debounce_duration = Duration::from_millis(100);

            while let Ok(event) = sync_rx.recv() {
                let now = std::time::Instant::now();
                if now.duration_since(last_event_time) < debounce_duration {
                    continue;
                }
                last_event_time = now;

                for path in event.paths {
                    let watch_event = classify_event(&path, &event.kind);
                    if let Some(e) = watch_event {
                        let _ = async_tx_clone.blocking_send(e);
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Resolve what to actually watch for a requested path.
///
/// Directories are watched recursively and files directly. A path that does
/// not exist yet is covered by watching its parent directory, so creating
/// the file later still produces an event.
fn watch_target(path: &Path) -> Option<(PathBuf, RecursiveMode)> {
    if path.is_dir() {
        return Some((path.to_path_buf(), RecursiveMode::Recursive));
    }
    if path.is_file() {
        return Some((path.to_path_buf(), RecursiveMode::NonRecursive));
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    parent.is_dir().then_some((parent, RecursiveMode::NonRecursive))
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match kind {
        EventKind::Create(_) => Some(WatchEvent::Created(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path.to_path_buf())),
        EventKind::Modify(_) => {
            if ext == "json" {
                Some(WatchEvent::PostsModified(path.to_path_buf()))
            } else if ext == "toml" {
                Some(WatchEvent::ConfigModified(path.to_path_buf()))
            } else {
                Some(WatchEvent::Modified(path.to_path_buf()))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn watches_file_changes() {
        let temp = tempdir().unwrap();
        let test_file = temp.path().join("posts.json");

        let (watcher, mut rx) = FileWatcher::new(&[temp.path().to_path_buf()]).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(&test_file, "[]").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        assert!(event.is_ok(), "timeout waiting for file watch event");
        assert!(event.unwrap().is_some(), "channel should not be closed");
    }

    #[tokio::test]
    async fn sees_creation_of_a_missing_watched_file() {
        let temp = tempdir().unwrap();
        let posts = temp.path().join("posts.json");

        // The file does not exist yet when the watcher starts.
        let (watcher, mut rx) = FileWatcher::new(&[posts.clone()]).unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(&posts, "[]").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        assert!(event.is_ok(), "timeout waiting for file watch event");
        assert!(event.unwrap().is_some(), "channel should not be closed");
    }

    #[test]
    fn missing_files_are_watched_via_their_parent() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("posts.json");

        let (target, mode) = watch_target(&missing).unwrap();

        assert_eq!(target, temp.path());
        assert!(matches!(mode, RecursiveMode::NonRecursive));
    }

    #[test]
    fn existing_directories_are_watched_recursively() {
        let temp = tempdir().unwrap();

        let (target, mode) = watch_target(temp.path()).unwrap();

        assert_eq!(target, temp.path());
        assert!(matches!(mode, RecursiveMode::Recursive));
    }
}

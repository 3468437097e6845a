//! Loading and exporting the JSON post collection.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::post::Post;

/// Errors that can occur loading the post store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("post store not found: {0}")]
    NotFound(String),

    #[error("failed to read post store: {0}")]
    Read(String),

    #[error("post store is not a valid JSON post array: {0}")]
    InvalidJson(String),
}

/// Read-only access to the `posts.json` collection.
pub struct JsonPostStore {
    path: PathBuf,
}

impl JsonPostStore {
    /// Create a store for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full post collection.
    ///
    /// A missing file is reported as [`StoreError::NotFound`] so callers can
    /// treat it as "no posts yet" rather than a load failure.
    pub fn load(&self) -> Result<Vec<Post>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(StoreError::Read(e.to_string())),
        };

        serde_json::from_str(&raw).map_err(|e| StoreError::InvalidJson(e.to_string()))
    }

    /// Load the collection, tolerating a missing or broken store.
    ///
    /// Used to seed the admin session, which starts empty when the store
    /// does not exist yet.
    pub fn load_or_empty(&self) -> Vec<Post> {
        match self.load() {
            Ok(posts) => posts,
            Err(StoreError::NotFound(path)) => {
                tracing::warn!("{} not found, starting with an empty collection", path);
                Vec::new()
            }
            Err(e) => {
                tracing::error!("failed to load posts: {}", e);
                Vec::new()
            }
        }
    }
}

/// Serialize a post collection to indented JSON for manual export.
pub fn export_json(posts: &[Post]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_post_array() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("posts.json");
        fs::write(
            &path,
            r#"[{"id":"p1","title":"A","date":"2024-01-01","content":"hi"}]"#,
        )
        .unwrap();

        let posts = JsonPostStore::new(&path).load().unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "p1");
        assert_eq!(posts[0].summary, None);
    }

    #[test]
    fn missing_file_is_not_found() {
        let temp = tempdir().unwrap();
        let store = JsonPostStore::new(temp.path().join("posts.json"));

        assert!(matches!(store.load(), Err(StoreError::NotFound(_))));
        assert!(store.load_or_empty().is_empty());
    }

    #[test]
    fn malformed_json_is_a_load_failure() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("posts.json");
        fs::write(&path, "{\"not\": \"an array\"}").unwrap();

        let store = JsonPostStore::new(&path);

        assert!(matches!(store.load(), Err(StoreError::InvalidJson(_))));
        assert!(store.load_or_empty().is_empty());
    }

    #[test]
    fn export_is_indented() {
        let posts = vec![Post {
            id: "p1".to_string(),
            title: "A".to_string(),
            date: "2024-01-01".to_string(),
            content: "hi".to_string(),
            summary: None,
        }];

        let json = export_json(&posts).unwrap();

        assert!(json.starts_with("[\n"));
        assert!(json.contains("  \"id\": \"p1\""));
    }
}

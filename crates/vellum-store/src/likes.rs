//! Per-browser like state.
//!
//! Two independent key-value documents live under fixed keys: the
//! authoritative boolean map of liked post ids, and a vestigial simulated
//! like count that is written on every toggle but never read back for
//! display. The count stays cosmetic; making it authoritative would need
//! a server.
//!
//! The browser runtime generated in `vellum-static` mirrors this state
//! machine over `localStorage`, built from the same keys and labels.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// Storage key for the boolean liked-post map.
pub const LIKED_POSTS_KEY: &str = "userLikedPosts";

/// Storage key for the simulated (write-only) like counts.
pub const LIKE_COUNTS_KEY: &str = "blogLikes";

/// Control label while unliked.
pub const LIKE_LABEL: &str = "Like";

/// Control label while liked.
pub const LIKED_LABEL: &str = "Liked";

/// Status line shown while liked.
pub const LIKED_STATUS: &str = "You liked this post";

/// CSS state class applied to the control while liked.
pub const LIKED_CLASS: &str = "liked";

/// A key-value document store, one serialized document per key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

/// Like-flag store over an injected key-value backend.
#[derive(Debug)]
pub struct LikeStore<S> {
    store: S,
}

impl<S: KeyValueStore> LikeStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Whether the post is currently liked. Absence means unliked.
    pub fn is_liked(&self, post_id: &str) -> bool {
        self.liked_map().get(post_id).copied().unwrap_or(false)
    }

    /// Flip the like flag and persist both documents.
    ///
    /// Returns the new state. Read-modify-write of the full map; safe under
    /// single-threaded use, last-writer-wins across concurrent writers.
    pub fn toggle(&mut self, post_id: &str) -> bool {
        let mut liked = self.liked_map();
        let mut counts: BTreeMap<String, i64> = self.document(LIKE_COUNTS_KEY);

        let now_liked = if liked.remove(post_id).unwrap_or(false) {
            *counts.entry(post_id.to_string()).or_insert(1) -= 1;
            false
        } else {
            liked.insert(post_id.to_string(), true);
            *counts.entry(post_id.to_string()).or_insert(0) += 1;
            true
        };

        self.store
            .set(LIKED_POSTS_KEY, serde_json::to_string(&liked).unwrap());
        self.store
            .set(LIKE_COUNTS_KEY, serde_json::to_string(&counts).unwrap());
        now_liked
    }

    /// Visual state of the like control for the given post.
    pub fn view(&self, post_id: &str) -> LikeView {
        LikeView::for_state(self.is_liked(post_id))
    }

    fn liked_map(&self) -> BTreeMap<String, bool> {
        self.document(LIKED_POSTS_KEY)
    }

    fn document<T: serde::de::DeserializeOwned + Default>(&self, key: &str) -> T {
        self.store
            .get(key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }
}

/// Visual state of the like control. No numeric count is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeView {
    /// Button label
    pub label: &'static str,

    /// CSS state class (empty while unliked)
    pub css_class: &'static str,

    /// Status line next to the control (empty while unliked)
    pub status: &'static str,

    /// Whether the control is disabled (post not found)
    pub disabled: bool,
}

impl LikeView {
    /// View for a liked or unliked post.
    pub fn for_state(liked: bool) -> Self {
        if liked {
            Self {
                label: LIKED_LABEL,
                css_class: LIKED_CLASS,
                status: LIKED_STATUS,
                disabled: false,
            }
        } else {
            Self {
                label: LIKE_LABEL,
                css_class: "",
                status: "",
                disabled: false,
            }
        }
    }

    /// Disabled view used when the post does not exist.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::for_state(false)
        }
    }
}

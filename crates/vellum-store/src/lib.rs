//! Post collection, admin session, and like state for vellum.
//!
//! The post store is read-only on the viewing path: `build` and the dev
//! server only ever load `posts.json`. Writing it back is a manual step
//! driven by the admin session's JSON export.

pub mod admin;
pub mod likes;
pub mod post;
pub mod store;

pub use admin::{generate_post_id, AdminError, AdminSession};
pub use likes::{KeyValueStore, LikeStore, LikeView, MemoryStore};
pub use post::{find_post, parse_date, sort_newest_first, Post};
pub use store::{export_json, JsonPostStore, StoreError};

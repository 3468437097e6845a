//! Development server with live reload for vellum blogs.
//!
//! Watches the post store and static files, rebuilds the site on change,
//! and pushes reloads to connected browsers over a WebSocket.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{ReloadHub, ReloadMessage};

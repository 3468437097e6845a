//! Static site builder for vellum blogs.
//!
//! Turns a `posts.json` collection into a browsable site: an index of
//! summary cards, one page per post, a not-found fallback, and the
//! generated CSS/JS assets.

pub mod assets;
pub mod builder;
pub mod templates;

pub use builder::{BuildError, BuildResult, SiteBuilder, SiteConfig};
pub use templates::TemplateEngine;

//! Registry of external assets a rendered page depends on.
//!
//! Replaces ad-hoc "is this script tag already in the document?" probing
//! with an explicit set of requested URLs. Each URL is included at most
//! once per page, in first-request order, and a stage that requests
//! nothing adds nothing to the page.

use std::collections::HashSet;

/// Collects the script and stylesheet URLs a page needs.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    seen: HashSet<String>,
    scripts: Vec<String>,
    styles: Vec<String>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a script URL. Returns true if it was newly registered.
    pub fn require_script(&mut self, url: &str) -> bool {
        if !self.seen.insert(url.to_string()) {
            return false;
        }
        self.scripts.push(url.to_string());
        true
    }

    /// Request a stylesheet URL. Returns true if it was newly registered.
    pub fn require_style(&mut self, url: &str) -> bool {
        if !self.seen.insert(url.to_string()) {
            return false;
        }
        self.styles.push(url.to_string());
        true
    }

    /// Registered script URLs in request order.
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// Registered stylesheet URLs in request order.
    pub fn styles(&self) -> &[String] {
        &self.styles
    }
}

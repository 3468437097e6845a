//! Configuration file handling (blog.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use vellum_static::SiteConfig;

/// Configuration file structure (blog.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub content: ContentSettings,
    #[serde(default)]
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize)]
pub struct SiteSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentSettings {
    #[serde(default = "default_posts")]
    pub posts: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_minify")]
    pub minify: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            base_url: default_base_url(),
        }
    }
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            posts: default_posts(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            minify: default_minify(),
        }
    }
}

fn default_title() -> String {
    "My Blog".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_posts() -> String {
    "posts.json".to_string()
}
fn default_static_dir() -> Option<String> {
    Some("static".to_string())
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_minify() -> bool {
    true
}

impl ConfigFile {
    /// Load configuration from the given path if it exists.
    ///
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
            let config: ConfigFile = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
            tracing::info!("Loaded config from {}", path.display());
            return Ok(config);
        }
        Ok(ConfigFile::default())
    }

    /// Convert to a site build configuration.
    pub fn site_config(&self) -> SiteConfig {
        SiteConfig {
            posts_path: PathBuf::from(&self.content.posts),
            static_dir: self.content.static_dir.as_ref().map(PathBuf::from),
            output_dir: PathBuf::from(&self.build.output),
            base_url: self.site.base_url.clone(),
            title: self.site.title.clone(),
            minify: self.build.minify,
            live_reload: false,
        }
    }
}

//! Initialize a blog in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing vellum...");

    // Create default config
    let config_path = Path::new("blog.toml");
    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG).context("Failed to write blog.toml")?;
        tracing::info!("Created blog.toml");
    } else {
        tracing::warn!("blog.toml already exists. Use --yes to overwrite.");
    }

    // Create sample posts
    let posts_path = Path::new("posts.json");
    if !posts_path.exists() || yes {
        fs::write(posts_path, DEFAULT_POSTS).context("Failed to write posts.json")?;
        tracing::info!("Created posts.json");
    } else {
        tracing::warn!("posts.json already exists. Use --yes to overwrite.");
    }

    // Create static files directory
    let static_dir = Path::new("static");
    if !static_dir.exists() {
        fs::create_dir_all(static_dir).context("Failed to create static directory")?;
        tracing::info!("Created static/");
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'vellum dev' to start the development server.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Vellum Configuration

[site]
# Site title
title = "My Blog"

# Base URL (for deployment)
base_url = "/"

[content]
# Post collection
posts = "posts.json"

# Directory of static files copied into the output
static_dir = "static"

[build]
# Output directory for the built site
output = "dist"

# Enable minification
minify = true
"#;

const DEFAULT_POSTS: &str = r##"[
  {
    "id": "hello-world",
    "title": "Hello, world",
    "date": "2024-01-15",
    "summary": "A first post showing what vellum posts can do.",
    "content": "# Hello\n\nPosts are **Markdown** with code highlighting:\n\n```rust\nfn main() {\n    println!(\"hello\");\n}\n```\n\nAnd diagrams:\n\n```mermaid\ngraph TD;\n    Draft-->Published;\n```\n"
  }
]
"##;

//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use vellum_render::{enhance_code_blocks, render_markdown, transform_diagrams, AssetRegistry, Highlighter};
use vellum_store::{sort_newest_first, JsonPostStore, LikeView, Post, StoreError};

use crate::assets::AssetPipeline;
use crate::templates::{IndexContext, NotFoundContext, PostCard, PostContext, TemplateEngine};

/// Placeholder shown on cards for posts without a summary.
const SUMMARY_PLACEHOLDER: &str = "(No summary)";

/// Configuration for building a blog site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Path to the posts.json collection
    pub posts_path: PathBuf,

    /// Directory of static files copied into the output as-is
    pub static_dir: Option<PathBuf>,

    /// Output directory
    pub output_dir: PathBuf,

    /// Base URL for the site
    pub base_url: String,

    /// Site title
    pub title: String,

    /// Minify generated CSS
    pub minify: bool,

    /// Include the dev-server reload client in every page
    pub live_reload: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            posts_path: PathBuf::from("posts.json"),
            static_dir: Some(PathBuf::from("static")),
            output_dir: PathBuf::from("dist"),
            base_url: "/".to_string(),
            title: "My Blog".to_string(),
            minify: true,
            live_reload: false,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of posts rendered
    pub posts: usize,

    /// Number of diagram blocks found across all posts
    pub diagrams: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to render template: {0}")]
    Template(String),

    #[error("Post id {0:?} is not usable as an output path")]
    InvalidPostId(String),

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to write output: {0}")]
    Write(String),
}

/// Static blog builder.
pub struct SiteBuilder {
    config: SiteConfig,
    templates: TemplateEngine,
    highlighter: Highlighter,
}

impl SiteBuilder {
    /// Create a new builder.
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
            highlighter: Highlighter::new(),
        }
    }

    /// Build the whole site.
    ///
    /// A missing or unreadable post store is not fatal: the index renders a
    /// placeholder and the build still produces a complete site.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir).map_err(|e| BuildError::Write(e.to_string()))?;

        let (mut posts, load_failed) = match JsonPostStore::new(&self.config.posts_path).load() {
            Ok(posts) => (posts, false),
            Err(StoreError::NotFound(path)) => {
                tracing::warn!("{} not found, building an empty site", path);
                (Vec::new(), false)
            }
            Err(e) => {
                tracing::error!("failed to load posts: {}", e);
                (Vec::new(), true)
            }
        };
        sort_newest_first(&mut posts);

        let mut pages = 0;

        // Index page
        let index_html = self.render_index(&posts, load_failed)?;
        self.write_page(&self.config.output_dir.join("index.html"), &index_html)?;
        pages += 1;

        // One page per post
        let results: Vec<Result<usize, BuildError>> = posts
            .par_iter()
            .map(|post| {
                let out = self.post_output_path(&post.id)?;
                let (html, diagrams) = self.render_post_page(post)?;
                self.write_page(&out, &html)?;
                Ok(diagrams)
            })
            .collect();

        let mut diagrams = 0;
        for result in results {
            diagrams += result?;
            pages += 1;
        }

        // Not-found fallback: served for unknown paths and for `post/`
        // without an id.
        let not_found_html = self.render_not_found()?;
        self.write_page(&self.config.output_dir.join("404.html"), &not_found_html)?;
        self.write_page(
            &self.config.output_dir.join("post").join("index.html"),
            &not_found_html,
        )?;
        pages += 2;

        self.generate_assets()?;
        self.copy_static_files()?;

        Ok(BuildResult {
            pages,
            posts: posts.len(),
            diagrams,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Render the index page from the sorted collection.
    fn render_index(&self, posts: &[Post], load_failed: bool) -> Result<String, BuildError> {
        let cards: Vec<PostCard> = posts
            .iter()
            .map(|post| PostCard {
                id: post.id.clone(),
                title: post.title.clone(),
                href: self.post_href(&post.id),
                date_display: post.display_date(),
                summary: post
                    .summary
                    .clone()
                    .unwrap_or_else(|| SUMMARY_PLACEHOLDER.to_string()),
            })
            .collect();

        let notice = if load_failed {
            Some("Failed to load posts. Please try again later.".to_string())
        } else if cards.is_empty() {
            Some("No posts yet.".to_string())
        } else {
            None
        };

        let context = IndexContext {
            page_title: self.config.title.clone(),
            site_title: self.config.title.clone(),
            base_url: self.config.base_url.clone(),
            cards,
            notice,
            styles: vec![],
            scripts: vec![],
            live_reload: self.config.live_reload,
        };

        self.templates
            .render_index(&context)
            .map_err(|e| BuildError::Template(e.to_string()))
    }

    /// Render a single post page, returning the HTML and the number of
    /// diagram blocks it contained.
    fn render_post_page(&self, post: &Post) -> Result<(String, usize), BuildError> {
        let mut assets = AssetRegistry::new();

        let rendered = render_markdown(&post.content);
        let outcome = transform_diagrams(&rendered, &mut assets);
        let content = enhance_code_blocks(&outcome.html, &self.highlighter);

        let context = PostContext {
            page_title: format!("{} - {}", post.title, self.config.title),
            site_title: self.config.title.clone(),
            base_url: self.config.base_url.clone(),
            post_id: post.id.clone(),
            title: post.title.clone(),
            date_display: post.display_date(),
            content,
            like: LikeView::for_state(false),
            styles: assets.styles().to_vec(),
            scripts: assets.scripts().to_vec(),
            live_reload: self.config.live_reload,
        };

        let html = self
            .templates
            .render_post(&context)
            .map_err(|e| BuildError::Template(e.to_string()))?;

        Ok((html, outcome.diagrams))
    }

    /// Render the not-found page.
    fn render_not_found(&self) -> Result<String, BuildError> {
        let context = NotFoundContext {
            page_title: format!("Post not found - {}", self.config.title),
            site_title: self.config.title.clone(),
            base_url: self.config.base_url.clone(),
            message: "The requested post does not exist.".to_string(),
            like: LikeView::disabled(),
            styles: vec![],
            scripts: vec![],
            live_reload: self.config.live_reload,
        };

        self.templates
            .render_not_found(&context)
            .map_err(|e| BuildError::Template(e.to_string()))
    }

    /// Link to a post's detail page.
    fn post_href(&self, id: &str) -> String {
        format!("{}post/{}/", self.config.base_url, id)
    }

    /// Output path for a post page. Ids are opaque but must stay inside
    /// the output directory, so path separators and dot segments are
    /// rejected.
    fn post_output_path(&self, id: &str) -> Result<PathBuf, BuildError> {
        if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
            return Err(BuildError::InvalidPostId(id.to_string()));
        }
        Ok(self
            .config
            .output_dir
            .join("post")
            .join(id)
            .join("index.html"))
    }

    /// Write generated CSS and the browser runtime.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::Write(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or(css)
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::Write(e.to_string()))?;

        fs::write(assets_dir.join("main.js"), AssetPipeline::generate_js())
            .map_err(|e| BuildError::Write(e.to_string()))?;

        Ok(())
    }

    /// Copy static files (images etc.) into the output directory.
    fn copy_static_files(&self) -> Result<(), BuildError> {
        let Some(static_dir) = &self.config.static_dir else {
            return Ok(());
        };
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir).unwrap_or(path);
            let dest = self.config.output_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::Write(e.to_string()))?;
            }
            fs::copy(path, &dest).map_err(|e| BuildError::Write(e.to_string()))?;
        }

        Ok(())
    }

    fn write_page(&self, path: &Path, html: &str) -> Result<(), BuildError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::Write(e.to_string()))?;
        }
        fs::write(path, html).map_err(|e| BuildError::Write(e.to_string()))
    }
}

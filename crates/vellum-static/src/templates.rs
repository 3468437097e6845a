//! Template engine for rendering blog pages.

use minijinja::Environment;
use serde::Serialize;

use vellum_store::LikeView;

/// A summary card on the index page.
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    /// Post id
    pub id: String,
    /// Post title
    pub title: String,
    /// Link to the detail page
    pub href: String,
    /// Formatted publication date
    pub date_display: String,
    /// Summary text (placeholder already applied)
    pub summary: String,
}

/// Context for the index page.
#[derive(Debug, Clone, Serialize)]
pub struct IndexContext {
    /// Full document title
    pub page_title: String,
    /// Site title shown in the header
    pub site_title: String,
    /// Base URL
    pub base_url: String,
    /// Summary cards, already sorted
    pub cards: Vec<PostCard>,
    /// Placeholder shown instead of cards (empty store or load failure)
    pub notice: Option<String>,
    /// Extra stylesheet URLs for this page
    pub styles: Vec<String>,
    /// Extra script URLs for this page
    pub scripts: Vec<String>,
    /// Include the dev-server reload client
    pub live_reload: bool,
}

/// Context for a single post page.
#[derive(Debug, Clone, Serialize)]
pub struct PostContext {
    pub page_title: String,
    pub site_title: String,
    pub base_url: String,
    /// Post id, carried on the article and the like control
    pub post_id: String,
    /// Post title
    pub title: String,
    /// Formatted publication date
    pub date_display: String,
    /// Rendered post body HTML
    pub content: String,
    /// Initial state of the like control
    pub like: LikeView,
    pub styles: Vec<String>,
    pub scripts: Vec<String>,
    pub live_reload: bool,
}

/// Context for the not-found page.
#[derive(Debug, Clone, Serialize)]
pub struct NotFoundContext {
    pub page_title: String,
    pub site_title: String,
    pub base_url: String,
    /// Explanation under the heading
    pub message: String,
    /// Always the disabled view
    pub like: LikeView,
    pub styles: Vec<String>,
    pub scripts: Vec<String>,
    pub live_reload: bool,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the embedded templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");
        env.add_template_owned("index.html".to_string(), INDEX_TEMPLATE.to_string())
            .expect("Failed to add index template");
        env.add_template_owned("post.html".to_string(), POST_TEMPLATE.to_string())
            .expect("Failed to add post template");
        env.add_template_owned("not_found.html".to_string(), NOT_FOUND_TEMPLATE.to_string())
            .expect("Failed to add not-found template");

        Self { env }
    }

    /// Render the index page.
    pub fn render_index(&self, context: &IndexContext) -> Result<String, minijinja::Error> {
        self.env.get_template("index.html")?.render(context)
    }

    /// Render a post page.
    pub fn render_post(&self, context: &PostContext) -> Result<String, minijinja::Error> {
        self.env.get_template("post.html")?.render(context)
    }

    /// Render the not-found page.
    pub fn render_not_found(&self, context: &NotFoundContext) -> Result<String, minijinja::Error> {
        self.env.get_template("not_found.html")?.render(context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ page_title }}</title>
  <link rel="stylesheet" href="{{ base_url }}assets/main.css">
  {% for style in styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}</head>
<body>
  <header class="site-header">
    <a href="{{ base_url }}" class="site-title">{{ site_title }}</a>
  </header>
  <main class="main">
    {% block content %}{% endblock %}
  </main>
  {% for script in scripts %}<script src="{{ script }}"></script>
  {% endfor %}<script src="{{ base_url }}assets/main.js"></script>
  {% if live_reload %}<script src="/__reload.js"></script>
  {% endif %}</body>
</html>"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section id="posts-container">
{% if notice %}  <p class="posts-notice">{{ notice }}</p>
{% endif %}{% for card in cards %}  <article class="post-card" data-id="{{ card.id }}">
    <h2><a href="{{ card.href }}">{{ card.title }}</a></h2>
    <div class="post-meta"><p>Published {{ card.date_display }}</p></div>
    <p class="post-summary">{{ card.summary }}</p>
  </article>
{% endfor %}</section>
{% endblock %}"##;

const POST_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article id="post-content" class="markdown-body" data-id="{{ post_id }}">
  <h2>{{ title }}</h2>
  <div class="post-meta"><p>Published {{ date_display }}</p></div>
  <div class="post-body">{{ content | safe }}</div>
</article>
<div class="like-area">
  <button id="like-button" type="button" class="like-button{% if like.css_class %} {{ like.css_class }}{% endif %}" data-post-id="{{ post_id }}"{% if like.disabled %} disabled{% endif %}>{{ like.label }}</button>
  <span id="like-status">{{ like.status }}</span>
</div>
{% endblock %}"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article id="post-content">
  <h2>Post not found</h2>
  <p>{{ message }}</p>
</article>
<div class="like-area">
  <button id="like-button" type="button" class="like-button" disabled>{{ like.label }}</button>
  <span id="like-status"></span>
</div>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn index_context() -> IndexContext {
        IndexContext {
            page_title: "My Blog".to_string(),
            site_title: "My Blog".to_string(),
            base_url: "/".to_string(),
            cards: vec![],
            notice: None,
            styles: vec![],
            scripts: vec![],
            live_reload: false,
        }
    }

    #[test]
    fn renders_index_cards_in_order() {
        let engine = TemplateEngine::new();
        let mut context = index_context();
        context.cards = vec![
            PostCard {
                id: "p2".to_string(),
                title: "Newer".to_string(),
                href: "/post/p2/".to_string(),
                date_display: "June 1, 2024".to_string(),
                summary: "second".to_string(),
            },
            PostCard {
                id: "p1".to_string(),
                title: "Older".to_string(),
                href: "/post/p1/".to_string(),
                date_display: "January 1, 2024".to_string(),
                summary: "first".to_string(),
            },
        ];

        let html = engine.render_index(&context).unwrap();

        let newer = html.find("Newer").unwrap();
        let older = html.find("Older").unwrap();
        assert!(newer < older);
        assert!(html.contains("href=\"/post/p2/\""));
    }

    #[test]
    fn index_notice_replaces_cards() {
        let engine = TemplateEngine::new();
        let mut context = index_context();
        context.notice = Some("No posts yet.".to_string());

        let html = engine.render_index(&context).unwrap();

        assert!(html.contains("No posts yet."));
        assert!(!html.contains("post-card"));
    }

    #[test]
    fn renders_post_with_like_control() {
        let engine = TemplateEngine::new();
        let context = PostContext {
            page_title: "Hello - My Blog".to_string(),
            site_title: "My Blog".to_string(),
            base_url: "/".to_string(),
            post_id: "p1".to_string(),
            title: "Hello".to_string(),
            date_display: "June 1, 2024".to_string(),
            content: "<p>Body</p>".to_string(),
            like: LikeView::for_state(false),
            styles: vec![],
            scripts: vec!["https://example.com/mermaid.js".to_string()],
            live_reload: false,
        };

        let html = engine.render_post(&context).unwrap();

        assert!(html.contains("<title>Hello - My Blog</title>"));
        assert!(html.contains("Published June 1, 2024"));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("data-post-id=\"p1\""));
        assert!(html.contains("<script src=\"https://example.com/mermaid.js\"></script>"));
        assert!(!html.contains("disabled"));
    }

    #[test]
    fn not_found_page_disables_the_like_control() {
        let engine = TemplateEngine::new();
        let context = NotFoundContext {
            page_title: "Post not found - My Blog".to_string(),
            site_title: "My Blog".to_string(),
            base_url: "/".to_string(),
            message: "The requested post does not exist.".to_string(),
            like: LikeView::disabled(),
            styles: vec![],
            scripts: vec![],
            live_reload: false,
        };

        let html = engine.render_not_found(&context).unwrap();

        assert!(html.contains("Post not found"));
        assert!(html.contains("disabled"));
    }

    #[test]
    fn live_reload_script_only_in_dev() {
        let engine = TemplateEngine::new();
        let mut context = index_context();

        let html = engine.render_index(&context).unwrap();
        assert!(!html.contains("/__reload.js"));

        context.live_reload = true;
        let html = engine.render_index(&context).unwrap();
        assert!(html.contains("/__reload.js"));
    }
}

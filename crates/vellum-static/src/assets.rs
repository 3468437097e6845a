//! Generated CSS and browser runtime for built sites.
//!
//! The runtime carries the three behaviors that only exist in a browser:
//! copy-to-clipboard controls, the batched mermaid invocation with
//! deduplicated per-container errors, and the localStorage like toggle.
//! Storage keys, labels, and icons are interpolated from the store and
//! render crates so there is a single definition of each.

use vellum_render::{COPIED_ICON, COPY_ICON};
use vellum_store::likes::{LIKED_POSTS_KEY, LIKE_COUNTS_KEY};
use vellum_store::LikeView;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the browser runtime.
    pub fn generate_js() -> String {
        let liked = LikeView::for_state(true);
        let unliked = LikeView::for_state(false);

        format!(
            r#"// vellum runtime
(function() {{
  'use strict';

  var COPY_ICON = {copy_icon};
  var COPIED_ICON = {copied_icon};

  // Copy controls: swap to the check icon and disable, revert after 2s.
  // Clipboard denial shows a textual failure state and still reverts.
  document.querySelectorAll('.copy-code-button').forEach(function(button) {{
    if (button.dataset.copyWired) return;
    button.dataset.copyWired = 'true';

    button.addEventListener('click', function() {{
      var block = button.closest('.code-block');
      var pre = block ? block.querySelector('pre') : null;
      var text = pre ? (pre.innerText || pre.textContent || '') : '';

      navigator.clipboard.writeText(text).then(function() {{
        button.innerHTML = COPIED_ICON;
        button.disabled = true;
        setTimeout(function() {{
          button.innerHTML = COPY_ICON;
          button.disabled = false;
        }}, 2000);
      }}).catch(function() {{
        button.innerHTML = 'Failed';
        setTimeout(function() {{
          button.innerHTML = COPY_ICON;
        }}, 2000);
      }});
    }});
  }});

  // Render all diagram containers in one batched call. A failure marks
  // each container once; already-flagged containers are skipped, so
  // repeated runs never stack error messages.
  var diagrams = document.querySelectorAll('pre.mermaid');
  if (diagrams.length > 0 && typeof mermaid !== 'undefined') {{
    var markErrors = function(error) {{
      diagrams.forEach(function(pre) {{
        if (!pre.dataset.mermaidError) {{
          var message = error && error.message ? error.message : String(error);
          var div = document.createElement('div');
          div.className = 'mermaid-error';
          div.textContent = 'Diagram error: ' + message;
          pre.replaceChildren(div);
          pre.dataset.mermaidError = 'true';
        }}
      }});
    }};

    try {{
      mermaid.initialize({{ startOnLoad: false, theme: 'neutral' }});
      var run = mermaid.run({{ nodes: diagrams }});
      if (run && run.catch) run.catch(markErrors);
    }} catch (error) {{
      markErrors(error);
    }}
  }}

  // Like toggle over localStorage. The counts document is updated on each
  // toggle but never read back for display.
  var likeButton = document.getElementById('like-button');
  var likeStatus = document.getElementById('like-status');
  if (likeButton && !likeButton.disabled) {{
    var postId = likeButton.dataset.postId;

    var readDoc = function(key) {{
      try {{
        return JSON.parse(localStorage.getItem(key) || '{{}}');
      }} catch (e) {{
        return {{}};
      }}
    }};

    var render = function() {{
      var liked = readDoc({liked_key})[postId] === true;
      likeButton.textContent = liked ? {liked_label} : {like_label};
      likeButton.classList.toggle({liked_class}, liked);
      if (likeStatus) likeStatus.textContent = liked ? {liked_status} : '';
    }};

    likeButton.addEventListener('click', function() {{
      var likedPosts = readDoc({liked_key});
      var counts = readDoc({counts_key});

      if (likedPosts[postId]) {{
        delete likedPosts[postId];
        counts[postId] = (counts[postId] || 1) - 1;
      }} else {{
        likedPosts[postId] = true;
        counts[postId] = (counts[postId] || 0) + 1;
      }}

      localStorage.setItem({liked_key}, JSON.stringify(likedPosts));
      localStorage.setItem({counts_key}, JSON.stringify(counts));
      render();
    }});

    render();
  }}
}})();
"#,
            copy_icon = js_string(COPY_ICON),
            copied_icon = js_string(COPIED_ICON),
            liked_key = js_string(LIKED_POSTS_KEY),
            counts_key = js_string(LIKE_COUNTS_KEY),
            like_label = js_string(unliked.label),
            liked_label = js_string(liked.label),
            liked_status = js_string(liked.status),
            liked_class = js_string(liked.css_class),
        )
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

/// Serialize a Rust string as a quoted JavaScript string literal.
fn js_string(value: &str) -> String {
    serde_json::to_string(value).expect("string serialization cannot fail")
}

const DEFAULT_CSS: &str = r#"/* vellum blog theme */

:root {
  --content-max-width: 760px;
  --background: #ffffff;
  --foreground: #1f2328;
  --muted: #f6f8fa;
  --muted-foreground: #59636e;
  --border: #d1d9e0;
  --accent: #8800ff;
  --error: #d1242f;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

.site-header {
  border-bottom: 1px solid var(--border);
  padding: 1rem 1.5rem;
  margin-bottom: 2rem;
}

.site-title {
  font-weight: 700;
  font-size: 1.25rem;
  color: var(--foreground);
  text-decoration: none;
}

.main {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 0 1rem 4rem;
}

/* Index cards */
.post-card {
  border: 1px solid var(--border);
  border-radius: 0.5rem;
  padding: 1.25rem 1.5rem;
  margin-bottom: 1.25rem;
}

.post-card h2 {
  font-size: 1.35rem;
  margin-bottom: 0.25rem;
}

.post-card h2 a {
  color: var(--foreground);
  text-decoration: none;
}

.post-card h2 a:hover {
  color: var(--accent);
}

.post-meta {
  color: var(--muted-foreground);
  font-size: 0.875rem;
  margin-bottom: 0.75rem;
}

.posts-notice {
  color: var(--muted-foreground);
  padding: 2rem 0;
  text-align: center;
}

/* Post body */
.markdown-body h2 {
  font-size: 1.75rem;
  margin-bottom: 0.5rem;
}

.post-body {
  margin-top: 1.5rem;
}

.post-body h1,
.post-body h2,
.post-body h3 {
  margin: 1.5rem 0 0.75rem;
}

.post-body p {
  margin-bottom: 1rem;
}

.post-body a {
  color: var(--accent);
}

.post-body code {
  font-family: ui-monospace, monospace;
  font-size: 0.875em;
  background: var(--muted);
  padding: 0.125rem 0.375rem;
  border-radius: 0.25rem;
}

.post-body pre code {
  background: none;
  padding: 0;
}

/* Enhanced code blocks */
.code-block {
  position: relative;
  margin-bottom: 1rem;
}

.code-block pre {
  border: 1px solid var(--border);
  border-radius: 0.5rem;
  padding: 1.5rem 1rem 1rem;
  overflow-x: auto;
  font-family: ui-monospace, monospace;
  font-size: 0.875rem;
}

.code-language-tag {
  position: absolute;
  top: 0.35rem;
  left: 0.75rem;
  font-size: 0.7rem;
  text-transform: lowercase;
  color: var(--muted-foreground);
}

.copy-code-button {
  position: absolute;
  top: 0.35rem;
  right: 0.5rem;
  padding: 0.25rem 0.5rem;
  background: transparent;
  color: var(--muted-foreground);
  border: none;
  border-radius: 0.375rem;
  cursor: pointer;
}

.copy-code-button:hover {
  background: var(--muted);
  color: var(--foreground);
}

.copy-code-button:disabled {
  cursor: default;
}

/* Diagrams */
pre.mermaid {
  text-align: center;
  margin-bottom: 1rem;
}

.mermaid-error {
  color: var(--error);
  font-weight: 600;
}

/* Like control */
.like-area {
  margin-top: 2.5rem;
  display: flex;
  align-items: center;
  gap: 0.75rem;
}

.like-button {
  padding: 0.4rem 1.1rem;
  border: 1px solid var(--border);
  border-radius: 2rem;
  background: var(--background);
  color: var(--foreground);
  cursor: pointer;
}

.like-button.liked {
  background: var(--accent);
  border-color: var(--accent);
  color: #ffffff;
}

.like-button:disabled {
  opacity: 0.5;
  cursor: default;
}

#like-status {
  color: var(--muted-foreground);
  font-size: 0.875rem;
}
"#;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::generate_css();

        assert!(css.contains(":root"));
        assert!(css.contains(".copy-code-button"));
        assert!(css.contains(".like-button.liked"));
        assert!(css.contains(".mermaid-error"));
    }

    #[test]
    fn runtime_uses_shared_storage_keys_and_labels() {
        let js = AssetPipeline::generate_js();

        assert!(js.contains("\"userLikedPosts\""));
        assert!(js.contains("\"blogLikes\""));
        assert!(js.contains("\"Liked\""));
        assert!(js.contains("\"You liked this post\""));
        assert!(js.contains("bi-clipboard"));
        assert!(js.contains("bi-check-lg"));
    }

    #[test]
    fn runtime_reverts_copy_state_after_two_seconds() {
        let js = AssetPipeline::generate_js();

        assert!(js.contains("}, 2000)"));
        assert!(js.contains("'Failed'"));
    }

    #[test]
    fn runtime_guards_against_repeated_diagram_errors() {
        let js = AssetPipeline::generate_js();

        assert!(js.contains("dataset.mermaidError"));
        assert!(js.contains("mermaid.run({ nodes: diagrams })"));
    }

    #[test]
    fn minifies_css() {
        let css = "\n.button {\n    background-color: blue;\n    padding: 10px;\n}\n";

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".button"));
    }
}

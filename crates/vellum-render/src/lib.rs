//! Content pipeline for vellum posts.
//!
//! A post body goes through three stages: Markdown rendering, diagram
//! block extraction (before highlighting can touch the diagram source),
//! and code-block enhancement. Each stage records the external assets the
//! resulting page needs in an [`AssetRegistry`], so a page only references
//! the scripts its content actually uses.

pub mod assets;
pub mod code;
pub mod diagram;
pub mod markdown;

pub use assets::AssetRegistry;
pub use code::{enhance_code_blocks, Highlighter, COPIED_ICON, COPY_ICON};
pub use diagram::{transform_diagrams, DiagramOutcome, MERMAID_SCRIPT_URL};
pub use markdown::render_markdown;

/// Run the full pipeline over a post's Markdown source.
pub fn render_post_body(source: &str, highlighter: &Highlighter, assets: &mut AssetRegistry) -> String {
    let html = render_markdown(source);
    let html = transform_diagrams(&html, assets).html;
    enhance_code_blocks(&html, highlighter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_handles_prose_code_and_diagrams() {
        let source = "# Title\n\nSome text.\n\n```rust\nfn main() {}\n```\n\n```mermaid\ngraph TD;\nA-->B;\n```\n";
        let highlighter = Highlighter::new();
        let mut assets = AssetRegistry::new();

        let html = render_post_body(source, &highlighter, &mut assets);

        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("class=\"mermaid\""));
        assert!(html.contains("copy-code-button"));
        assert_eq!(assets.scripts(), [MERMAID_SCRIPT_URL]);
    }

    #[test]
    fn pipeline_without_diagrams_requests_no_scripts() {
        let highlighter = Highlighter::new();
        let mut assets = AssetRegistry::new();

        render_post_body("plain paragraph", &highlighter, &mut assets);

        assert!(assets.scripts().is_empty());
    }
}

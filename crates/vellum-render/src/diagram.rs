//! Diagram block extraction.
//!
//! Runs before code enhancement so each diagram container holds the
//! pristine source text rather than highlighted markup. The mermaid
//! library itself runs in the browser; this stage only produces the
//! containers it expects and registers the script on pages that need it.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::assets::AssetRegistry;

/// Where the mermaid renderer is loaded from.
pub const MERMAID_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js";

static MERMAID_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<pre><code class="language-mermaid">(.*?)</code></pre>"#)
        .expect("mermaid block pattern is valid")
});

/// Result of the diagram stage.
#[derive(Debug)]
pub struct DiagramOutcome {
    /// Fragment with diagram blocks replaced by mermaid containers
    pub html: String,

    /// Number of diagram blocks found
    pub diagrams: usize,
}

/// Replace every `language-mermaid` code block with a mermaid container.
///
/// With no diagram blocks this is an exact no-op and the mermaid script is
/// never registered. Applying the stage to its own output changes nothing:
/// the replaced containers no longer match.
pub fn transform_diagrams(html: &str, assets: &mut AssetRegistry) -> DiagramOutcome {
    let mut diagrams = 0;

    let html = MERMAID_BLOCK.replace_all(html, |caps: &Captures| {
        diagrams += 1;
        format!("<pre class=\"mermaid\">{}</pre>", &caps[1])
    });

    if diagrams > 0 {
        assets.require_script(MERMAID_SCRIPT_URL);
    }

    DiagramOutcome {
        html: html.into_owned(),
        diagrams,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::render_markdown;
    use pretty_assertions::assert_eq;

    #[test]
    fn replaces_mermaid_blocks_with_containers() {
        let html = render_markdown("```mermaid\ngraph TD;\nA-->B;\n```\n");
        let mut assets = AssetRegistry::new();

        let outcome = transform_diagrams(&html, &mut assets);

        assert_eq!(outcome.diagrams, 1);
        assert!(outcome.html.contains("<pre class=\"mermaid\">graph TD;\nA--&gt;B;\n</pre>"));
        assert!(!outcome.html.contains("language-mermaid"));
        assert_eq!(assets.scripts(), [MERMAID_SCRIPT_URL]);
    }

    #[test]
    fn no_diagrams_is_a_no_op_and_loads_nothing() {
        let html = render_markdown("```rust\nfn main() {}\n```\n");
        let mut assets = AssetRegistry::new();

        let outcome = transform_diagrams(&html, &mut assets);

        assert_eq!(outcome.diagrams, 0);
        assert_eq!(outcome.html, html);
        assert!(assets.scripts().is_empty());
    }

    #[test]
    fn batches_all_blocks_in_one_pass() {
        let html = render_markdown("```mermaid\na\n```\n\ntext\n\n```mermaid\nb\n```\n");
        let mut assets = AssetRegistry::new();

        let outcome = transform_diagrams(&html, &mut assets);

        assert_eq!(outcome.diagrams, 2);
        // One script registration for the whole batch.
        assert_eq!(assets.scripts().len(), 1);
    }

    #[test]
    fn applying_twice_changes_nothing() {
        let html = render_markdown("```mermaid\ngraph LR;\n```\n");
        let mut assets = AssetRegistry::new();

        let first = transform_diagrams(&html, &mut assets);
        let second = transform_diagrams(&first.html, &mut assets);

        assert_eq!(second.diagrams, 0);
        assert_eq!(second.html, first.html);
        assert_eq!(assets.scripts().len(), 1);
    }

    #[test]
    fn container_keeps_raw_source_text() {
        // The source must survive untouched (entity-escaped only), since
        // mermaid parses the container's text content.
        let html = render_markdown("```mermaid\nA --> B\n```\n");
        let mut assets = AssetRegistry::new();

        let outcome = transform_diagrams(&html, &mut assets);

        assert!(outcome.html.contains("A --&gt; B"));
    }
}

//! Code block enhancement: syntax highlighting, language tags, copy controls.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Clipboard icon shown on an idle copy control.
pub const COPY_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" fill="currentColor" class="bi bi-clipboard" viewBox="0 0 16 16"><path d="M4 1.5H3a2 2 0 0 0-2 2V14a2 2 0 0 0 2 2h10a2 2 0 0 0 2-2V3.5a2 2 0 0 0-2-2h-1v1h1a1 1 0 0 1 1 1V14a1 1 0 0 1-1 1H3a1 1 0 0 1-1-1V3.5a1 1 0 0 1 1-1h1v-1z"/><path d="M9.5 1a.5.5 0 0 1 .5.5v1a.5.5 0 0 1-.5.5h-3a.5.5 0 0 1-.5-.5v-1a.5.5 0 0 1 .5-.5h3zm-3-1A1.5 1.5 0 0 0 5 1.5v1A1.5 1.5 0 0 0 6.5 4h3A1.5 1.5 0 0 0 11 2.5v-1A1.5 1.5 0 0 0 9.5 0h-3z"/></svg>"#;

/// Check icon shown after a successful copy.
pub const COPIED_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" fill="currentColor" class="bi bi-check-lg" viewBox="0 0 16 16"><path d="M12.736 3.97a.733.733 0 0 1 1.047 0c.286.289.29.756.01 1.05L7.88 12.01a.733.733 0 0 1-1.065.02L3.217 8.384a.757.757 0 0 1 0-1.06.733.733 0 0 1 1.047 0l3.052 3.093 5.4-6.425a.247.247 0 0 1 .02-.022z"/></svg>"#;

static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<pre><code(?: class="language-([^"]*)")?>(.*?)</code></pre>"#)
        .expect("code block pattern is valid")
});

/// Server-side syntax highlighter.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    /// Load the default syntax set and theme. Reuse one instance across a
    /// build; loading the syntax set is the expensive part.
    pub fn new() -> Self {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let theme = ThemeSet::load_defaults().themes["InspiredGitHub"].clone();
        Self { syntaxes, theme }
    }

    fn highlight(&self, code: &str, language: Option<&str>) -> Result<String, syntect::Error> {
        let syntax = language
            .and_then(|lang| self.syntaxes.find_syntax_by_token(lang))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        highlighted_html_for_string(code, &self.syntaxes, syntax, &self.theme)
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Enhance every remaining `<pre><code>` block in a rendered fragment.
///
/// Each block gets syntax highlighting, a lowercase language tag when the
/// block carries a language annotation, and a copy control. Enhanced output
/// contains no `<pre><code>` pattern, so running the stage again attaches
/// nothing: a block can never end up with two tags or two controls.
/// Highlighter failures degrade to the unhighlighted block.
pub fn enhance_code_blocks(html: &str, highlighter: &Highlighter) -> String {
    CODE_BLOCK
        .replace_all(html, |caps: &Captures| {
            let language = caps.get(1).map(|m| m.as_str()).filter(|l| !l.is_empty());
            let escaped = &caps[2];

            let pre = match highlighter.highlight(&unescape_html(escaped), language) {
                Ok(pre) => pre,
                Err(e) => {
                    tracing::warn!("syntax highlighting failed: {}", e);
                    format!("<pre>{}</pre>", escaped)
                }
            };

            let language_tag = language
                .map(|lang| {
                    format!(
                        "<span class=\"code-language-tag\">{}</span>",
                        lang.to_lowercase()
                    )
                })
                .unwrap_or_default();

            format!(
                "<div class=\"code-block\">{}<button class=\"copy-code-button\" type=\"button\" aria-label=\"Copy code\">{}</button>{}</div>",
                language_tag, COPY_ICON, pre
            )
        })
        .into_owned()
}

/// Undo the HTML entity escaping the Markdown renderer applied, recovering
/// the code text the highlighter needs.
fn unescape_html(escaped: &str) -> String {
    escaped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::render_markdown;

    #[test]
    fn enhances_a_highlighted_block() {
        let html = render_markdown("```rust\nfn main() {}\n```\n");
        let highlighter = Highlighter::new();

        let enhanced = enhance_code_blocks(&html, &highlighter);

        assert!(enhanced.contains("class=\"code-block\""));
        assert!(enhanced.contains("<span class=\"code-language-tag\">rust</span>"));
        assert!(enhanced.contains("copy-code-button"));
        // Highlighted output carries inline spans, not the raw code element.
        assert!(!enhanced.contains("<pre><code"));
    }

    #[test]
    fn unannotated_blocks_get_a_control_but_no_tag() {
        let html = render_markdown("```\nplain text\n```\n");
        let highlighter = Highlighter::new();

        let enhanced = enhance_code_blocks(&html, &highlighter);

        assert!(enhanced.contains("copy-code-button"));
        assert!(!enhanced.contains("code-language-tag"));
    }

    #[test]
    fn enhancing_twice_never_doubles_controls() {
        let html = render_markdown("```rust\nlet a = 1;\n```\n\n```\nplain\n```\n");
        let highlighter = Highlighter::new();

        let once = enhance_code_blocks(&html, &highlighter);
        let twice = enhance_code_blocks(&once, &highlighter);

        assert_eq!(once, twice);
        assert_eq!(twice.matches("copy-code-button").count(), 2);
        assert_eq!(twice.matches("code-language-tag").count(), 1);
    }

    #[test]
    fn language_tag_is_lowercased() {
        let html = render_markdown("```JSON\n{}\n```\n");
        let highlighter = Highlighter::new();

        let enhanced = enhance_code_blocks(&html, &highlighter);

        assert!(enhanced.contains("<span class=\"code-language-tag\">json</span>"));
    }

    #[test]
    fn unknown_languages_fall_back_to_plain_text() {
        let html = render_markdown("```nosuchlang\nhello\n```\n");
        let highlighter = Highlighter::new();

        let enhanced = enhance_code_blocks(&html, &highlighter);

        assert!(enhanced.contains("hello"));
        assert!(enhanced.contains("code-block"));
    }

    #[test]
    fn inline_code_is_untouched() {
        let html = render_markdown("use `let` bindings");
        let highlighter = Highlighter::new();

        let enhanced = enhance_code_blocks(&html, &highlighter);

        assert_eq!(enhanced, html);
    }

    #[test]
    fn escaped_entities_round_trip_through_highlighting() {
        let html = render_markdown("```\na < b && c > \"d\"\n```\n");
        let highlighter = Highlighter::new();

        let enhanced = enhance_code_blocks(&html, &highlighter);

        // The characters must still be present (re-escaped by syntect).
        assert!(enhanced.contains("&lt;"));
        assert!(enhanced.contains("&amp;&amp;"));
    }
}

//! Markdown to HTML rendering.

use pulldown_cmark::{html, Event, Options, Parser};

/// Render Markdown to an HTML fragment.
///
/// GitHub-flavored semantics plus converted line breaks: a single newline
/// inside a paragraph becomes a `<br>`. Deterministic for identical input.
pub fn render_markdown(source: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

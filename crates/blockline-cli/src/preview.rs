//! Display-mode rendering of block content.
//!
//! Blocks the user is not editing show a preview instead of raw markdown
//! source. Conversion is delegated entirely to pulldown-cmark; the engine
//! has no opinion on markdown syntax. In the terminal we flatten the event
//! stream to styled-ish plain text rather than HTML.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Flatten one block's markdown source into a single display line.
pub fn render_block(source: &str) -> String {
    let mut out = String::new();

    for event in Parser::new(source) {
        match event {
            Event::Text(text) => out.push_str(&text),
            Event::Code(code) => {
                out.push('`');
                out.push_str(&code);
                out.push('`');
            }
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            Event::Start(Tag::Item) => out.push_str("- "),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => {
                if !out.ends_with(' ') && !out.is_empty() {
                    out.push(' ');
                }
            }
            Event::TaskListMarker(done) => {
                out.push_str(if done { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    out.trim_end().to_string()
}

//! Markdown handling for stage bodies.
//!
//! Bodies are authored in Markdown. The view gets rendered HTML; the
//! speech synthesizer gets plain text with link text skipped and
//! whitespace normalized (entities are resolved by the parser).

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

/// Renders a Markdown body to HTML for the body slot.
#[must_use]
pub fn to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}

/// Reduces a Markdown body to the plain text handed to the speech
/// synthesizer. Text inside links is dropped entirely, block boundaries
/// become single spaces, and runs of whitespace collapse.
#[must_use]
pub fn speech_text(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut pieces = String::with_capacity(markdown.len());
    let mut link_depth = 0_usize;
    for event in parser {
        match event {
            Event::Start(Tag::Link { .. }) => link_depth += 1,
            Event::End(TagEnd::Link) => link_depth = link_depth.saturating_sub(1),
            Event::Text(text) | Event::Code(text) => {
                if link_depth == 0 {
                    pieces.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => pieces.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => pieces.push(' '),
            _ => {}
        }
    }
    pieces.split_whitespace().collect::<Vec<_>>().join(" ")
}

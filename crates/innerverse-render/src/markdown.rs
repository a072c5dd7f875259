//! Restricted markdown-to-HTML transform for AI-generated text.
//!
//! The page only documents a small subset: headings, bold, italic, inline
//! code, and simple bullet lists, with `#` and `##` collapsing to the same
//! visual level and `###` one step smaller. A real parser does the heavy
//! lifting; heading events are remapped to keep the documented levels.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

/// Render markdown to an HTML fragment with the lesson-page heading remap.
///
/// Plain text with no recognized tokens comes back wrapped in exactly one
/// paragraph and is otherwise unchanged.
pub fn render_markdown(input: &str) -> String {
    let parser = Parser::new_ext(input, Options::empty()).map(remap_heading);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

fn remap_heading(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Start(Tag::Heading {
            level,
            id,
            classes,
            attrs,
        }) => Event::Start(Tag::Heading {
            level: remap_level(level),
            id,
            classes,
            attrs,
        }),
        Event::End(TagEnd::Heading(level)) => Event::End(TagEnd::Heading(remap_level(level))),
        other => other,
    }
}

/// `#` and `##` share one visual level; everything deeper renders smaller.
fn remap_level(level: HeadingLevel) -> HeadingLevel {
    match level {
        HeadingLevel::H1 | HeadingLevel::H2 => HeadingLevel::H2,
        _ => HeadingLevel::H3,
    }
}

//! # Inline Parsing
//!
//! Paragraph and heading text is scanned with `pulldown-cmark` for the inline
//! constructs the transforms care about: images and code spans. Everything
//! between them stays verbatim source text, which is then scanned for text
//! directives (`:ios[Only on iOS]`).
//!
//! Code spans are raw zones: a directive or image inside backticks stays
//! part of the code span.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::models::{Directive, Node};

use super::{
    cursor::Cursor,
    directive::{COLON, parse_header},
};

struct PendingImage {
    url: String,
    title: Option<String>,
    alt: String,
    start: usize,
}

/// Parse inline content into text, inline code, image and text directive nodes.
pub fn parse_inline(s: &str) -> Vec<Node> {
    let mut out = Vec::new();
    let mut text_start = 0usize;
    let mut image: Option<PendingImage> = None;
    let mut image_depth = 0usize;

    for (event, range) in Parser::new_ext(s, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                if image_depth == 0 {
                    image = Some(PendingImage {
                        url: dest_url.to_string(),
                        title: (!title.is_empty()).then(|| title.to_string()),
                        alt: String::new(),
                        start: range.start,
                    });
                }
                image_depth += 1;
            }
            Event::End(TagEnd::Image) => {
                image_depth = image_depth.saturating_sub(1);
                if image_depth == 0
                    && let Some(pending) = image.take()
                {
                    push_text(&mut out, &s[text_start..pending.start]);
                    out.push(Node::Image {
                        url: pending.url,
                        alt: pending.alt,
                        title: pending.title,
                    });
                    text_start = range.end;
                }
            }
            Event::Text(text) | Event::Code(text) if image_depth > 0 => {
                if let Some(pending) = image.as_mut() {
                    pending.alt.push_str(&text);
                }
            }
            Event::Code(code) => {
                if range.start < text_start {
                    continue;
                }
                push_text(&mut out, &s[text_start..range.start]);
                out.push(Node::InlineCode {
                    value: code.to_string(),
                });
                text_start = range.end;
            }
            _ => {}
        }
    }

    push_text(&mut out, &s[text_start..]);
    out
}

/// Push verbatim text, splitting out text directives.
fn push_text(out: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }

    let mut cur = Cursor::new(text);
    let mut text_start = 0usize;

    while !cur.eof() {
        let at = cur.pos();
        if cur.peek() == Some(COLON) && directive_may_start(text, at) {
            cur.bump();
            if let Some(header) = parse_header(&mut cur) {
                if at > text_start {
                    out.push(Node::text(&text[text_start..at]));
                }
                out.push(Node::TextDirective(Directive {
                    name: header.name,
                    label: header.label,
                    attributes: header.attributes,
                    children: Vec::new(),
                }));
                text_start = cur.pos();
            }
            continue;
        }
        cur.bump();
    }

    if text_start < text.len() {
        out.push(Node::text(&text[text_start..]));
    }
}

/// A text directive's colon must not follow a word character or another
/// colon, which keeps times (`10:30`), URLs and `::` out.
fn directive_may_start(text: &str, at: usize) -> bool {
    let bytes = text.as_bytes();
    let prev_ok = at == 0 || !(bytes[at - 1].is_ascii_alphanumeric() || bytes[at - 1] == COLON);
    let next_ok = bytes.get(at + 1).is_some_and(|b| b.is_ascii_alphabetic());
    prev_ok && next_ok
}

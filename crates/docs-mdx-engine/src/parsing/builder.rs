use crate::models::{Directive, Element, Node};

use super::{
    classify::{FenceSig, LineClass, MdxLineClassifier},
    directive::DirectiveHeader,
    inline::parse_inline,
    tag::{OpenTag, TagParse, parse_open_tag, strip_closing_tag},
};

#[derive(Debug)]
enum LeafState {
    None,
    Paragraph { lines: Vec<String> },
    Fence { sig: FenceSig, lines: Vec<String> },
    Esm { lines: Vec<String> },
    Comment { lines: Vec<String> },
    /// An opening tag that has not seen its `>` yet.
    Tag { buf: String },
}

/// An open container waiting for its closing line.
#[derive(Debug)]
enum Frame {
    Element(Element),
    Directive(Directive),
}

impl Frame {
    fn children_mut(&mut self) -> &mut Vec<Node> {
        match self {
            Frame::Element(e) => &mut e.children,
            Frame::Directive(d) => &mut d.children,
        }
    }

    fn into_node(self) -> Node {
        match self {
            Frame::Element(e) => Node::MdxJsxFlowElement(e),
            Frame::Directive(d) => Node::ContainerDirective(d),
        }
    }

    fn element_name(&self) -> Option<&str> {
        match self {
            Frame::Element(e) => Some(&e.name),
            Frame::Directive(_) => None,
        }
    }
}

/// Line-driven block builder.
///
/// Lines are pushed one at a time; leaf blocks accumulate in [`LeafState`]
/// and are flushed into the innermost open container (or the root) when a
/// line ends them.
pub struct BlockBuilder {
    classifier: MdxLineClassifier,
    stack: Vec<Frame>,
    leaf: LeafState,
    out: Vec<Node>,
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            classifier: MdxLineClassifier,
            stack: vec![],
            leaf: LeafState::None,
            out: vec![],
        }
    }

    pub fn push(&mut self, line: &str) {
        let line = line.trim_end_matches(['\r', '\n']);

        match &mut self.leaf {
            LeafState::Fence { .. } => return self.consume_fence_line(line),
            LeafState::Tag { .. } => return self.consume_tag_line(line),
            LeafState::Comment { lines } => {
                lines.push(line.to_string());
                if line.contains("-->") {
                    self.flush_leaf();
                }
                return;
            }
            LeafState::Esm { lines } => {
                if line.trim().is_empty() {
                    self.flush_leaf();
                } else {
                    lines.push(line.to_string());
                }
                return;
            }
            LeafState::None | LeafState::Paragraph { .. } => {}
        }

        match self.classifier.classify(line) {
            LineClass::Blank => self.flush_leaf(),
            LineClass::Fence(sig) => {
                self.flush_leaf();
                self.leaf = LeafState::Fence { sig, lines: vec![] };
            }
            LineClass::Esm if self.stack.is_empty() && !self.in_paragraph() => {
                self.leaf = LeafState::Esm {
                    lines: vec![line.to_string()],
                };
            }
            LineClass::Esm => self.extend_paragraph(line.trim()),
            LineClass::Comment(text) => {
                self.flush_leaf();
                self.leaf = LeafState::Comment {
                    lines: vec![text.to_string()],
                };
                if text.contains("-->") {
                    self.flush_leaf();
                }
            }
            LineClass::ClosingTag(name) => match self.find_element(name) {
                Some(depth) => {
                    self.flush_leaf();
                    self.close_to(depth);
                }
                None => self.extend_paragraph(line.trim()),
            },
            LineClass::TagStart(text) if !self.in_paragraph() => self.open_tag_line(text),
            LineClass::TagStart(text) => self.extend_text_line(text),
            LineClass::DirectiveOpen(header) => {
                self.flush_leaf();
                self.stack.push(Frame::Directive(directive_from(header)));
            }
            LineClass::DirectiveClose => match self.find_directive() {
                Some(depth) => {
                    self.flush_leaf();
                    self.close_to(depth);
                }
                None => self.extend_paragraph(line.trim()),
            },
            LineClass::LeafDirective(header) => {
                self.flush_leaf();
                self.emit(Node::LeafDirective(directive_from(header)));
            }
            LineClass::Heading { depth, text } => {
                self.flush_leaf();
                self.emit(Node::Heading {
                    depth,
                    children: parse_inline(text),
                });
            }
            LineClass::Text(text) => self.extend_text_line(text),
        }
    }

    pub fn finish(mut self) -> Vec<Node> {
        // EOF flush
        if let LeafState::Fence { .. } = self.leaf {
            log::warn!("Unterminated code fence closed at end of input");
        }
        self.flush_leaf();
        if !self.stack.is_empty() {
            log::warn!(
                "{} unclosed container(s) closed at end of input",
                self.stack.len()
            );
        }
        self.close_to(0);
        self.out
    }

    fn in_paragraph(&self) -> bool {
        matches!(self.leaf, LeafState::Paragraph { .. })
    }

    fn emit(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(frame) => frame.children_mut().push(node),
            None => self.out.push(node),
        }
    }

    /// Stack index of the innermost open element named `name`.
    fn find_element(&self, name: &str) -> Option<usize> {
        self.stack
            .iter()
            .rposition(|f| f.element_name() == Some(name))
    }

    fn find_directive(&self) -> Option<usize> {
        self.stack
            .iter()
            .rposition(|f| matches!(f, Frame::Directive(_)))
    }

    /// Close every frame at or above `depth`, innermost first.
    fn close_to(&mut self, depth: usize) {
        while self.stack.len() > depth {
            let Some(frame) = self.stack.pop() else {
                break;
            };
            if self.stack.len() > depth
                && let Some(name) = frame.element_name()
            {
                log::warn!("Unclosed <{name}> closed by an outer closing line");
            }
            let node = frame.into_node();
            self.emit(node);
        }
    }

    fn consume_fence_line(&mut self, line: &str) {
        let LeafState::Fence { sig, lines } = &mut self.leaf else {
            return;
        };
        if let Some(close) = FenceSig::parse(line)
            && sig.closed_by(&close)
        {
            self.flush_leaf();
            return;
        }
        lines.push(strip_indent(line, sig.indent).to_string());
    }

    fn consume_tag_line(&mut self, line: &str) {
        let LeafState::Tag { buf } = &mut self.leaf else {
            return;
        };
        if line.trim().is_empty() {
            // never closed: it was prose after all
            let text = std::mem::take(buf);
            self.leaf = LeafState::None;
            self.extend_paragraph(&text);
            self.flush_leaf();
            return;
        }
        buf.push('\n');
        buf.push_str(line.trim());
        let text = std::mem::take(buf);
        self.leaf = LeafState::None;
        self.open_tag_line(&text);
    }

    /// A line (or joined lines) starting with `<Name`.
    fn open_tag_line(&mut self, text: &str) {
        match parse_open_tag(text) {
            TagParse::Complete(tag) => {
                self.flush_leaf();
                self.open_tag(tag);
            }
            TagParse::Incomplete => {
                self.flush_leaf();
                self.leaf = LeafState::Tag {
                    buf: text.to_string(),
                };
            }
            TagParse::Invalid => self.extend_paragraph(text),
        }
    }

    fn open_tag(&mut self, tag: OpenTag<'_>) {
        let mut element = Element {
            name: tag.name,
            attributes: tag.attributes,
            children: vec![],
        };
        let rest = tag.rest.trim();

        if tag.self_closing {
            self.emit(Node::MdxJsxFlowElement(element));
            if !rest.is_empty() {
                self.extend_text_line(rest);
            }
            return;
        }

        if let Some(inner) = strip_closing_tag(rest, &element.name) {
            element.children = parse_inline(inner.trim());
            self.emit(Node::MdxJsxFlowElement(element));
            return;
        }

        self.stack.push(Frame::Element(element));
        if !rest.is_empty() {
            self.extend_text_line(rest);
        }
    }

    /// Paragraph text, unless it ends by closing an open element
    /// (`last words</Tab>`).
    fn extend_text_line(&mut self, text: &str) {
        for depth in (0..self.stack.len()).rev() {
            let Some(name) = self.stack[depth].element_name() else {
                continue;
            };
            if let Some(before) = strip_closing_tag(text, name) {
                let before = before.trim_end();
                if !before.is_empty() {
                    self.extend_paragraph(before);
                }
                self.flush_leaf();
                self.close_to(depth);
                return;
            }
        }
        self.extend_paragraph(text);
    }

    fn extend_paragraph(&mut self, text: &str) {
        match &mut self.leaf {
            LeafState::Paragraph { lines } => lines.push(text.to_string()),
            _ => {
                self.flush_leaf();
                self.leaf = LeafState::Paragraph {
                    lines: vec![text.to_string()],
                };
            }
        }
    }

    fn flush_leaf(&mut self) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        let node = match prev {
            LeafState::None => return,
            LeafState::Paragraph { lines } => {
                let children = parse_inline(&lines.join("\n"));
                if children.is_empty() {
                    return;
                }
                Node::Paragraph { children }
            }
            LeafState::Fence { sig, lines } => {
                let (lang, meta) = sig.lang_and_meta();
                Node::Code {
                    lang,
                    meta,
                    value: lines.join("\n"),
                }
            }
            LeafState::Esm { lines } => Node::MdxjsEsm {
                value: lines.join("\n"),
            },
            LeafState::Comment { lines } => Node::Html {
                value: lines.join("\n"),
            },
            LeafState::Tag { buf } => Node::paragraph(parse_inline(&buf)),
        };
        self.emit(node);
    }
}

fn directive_from(header: DirectiveHeader) -> Directive {
    Directive {
        name: header.name,
        label: header.label,
        attributes: header.attributes,
        children: vec![],
    }
}

/// Strip up to `indent` leading spaces.
fn strip_indent(line: &str, indent: usize) -> &str {
    let spaces = line.bytes().take(indent).take_while(|b| *b == b' ').count();
    &line[spaces..]
}

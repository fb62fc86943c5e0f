use super::directive::{COLON, DirectiveHeader, parse_line_header};
use super::tag::closing_tag_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

impl FenceKind {
    fn byte(self) -> u8 {
        match self {
            FenceKind::Backticks => b'`',
            FenceKind::Tildes => b'~',
        }
    }
}

/// A line that looks like a fence opener or closer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceSig {
    pub kind: FenceKind,
    /// Number of fence characters.
    pub len: usize,
    /// Leading spaces before the fence.
    pub indent: usize,
    /// Trimmed info string.
    pub info: String,
}

impl FenceSig {
    pub fn parse(line: &str) -> Option<Self> {
        let body = line.trim_start_matches(' ');
        let indent = line.len() - body.len();
        let kind = match body.as_bytes().first()? {
            b'`' => FenceKind::Backticks,
            b'~' => FenceKind::Tildes,
            _ => return None,
        };
        let len = body.bytes().take_while(|b| *b == kind.byte()).count();
        if len < 3 {
            return None;
        }
        let info = body[len..].trim();
        if kind == FenceKind::Backticks && info.contains('`') {
            return None;
        }
        Some(Self {
            kind,
            len,
            indent,
            info: info.to_string(),
        })
    }

    /// Whether `other` closes a fence opened with `self`.
    pub fn closed_by(&self, other: &FenceSig) -> bool {
        other.kind == self.kind && other.len >= self.len && other.info.is_empty()
    }

    /// `lang` is the first word of the info string, `meta` the rest.
    pub fn lang_and_meta(&self) -> (Option<String>, Option<String>) {
        let info = self.info.as_str();
        if info.is_empty() {
            return (None, None);
        }
        match info.split_once(char::is_whitespace) {
            Some((lang, meta)) => {
                let meta = meta.trim();
                (
                    Some(lang.to_string()),
                    (!meta.is_empty()).then(|| meta.to_string()),
                )
            }
            None => (Some(info.to_string()), None),
        }
    }
}

/// Classification of a single line containing only local facts.
///
/// Context (whether we are inside a fence, a pending tag or at top level) is
/// the builder's business.
#[derive(Debug, Clone, PartialEq)]
pub enum LineClass<'a> {
    Blank,
    Fence(FenceSig),
    /// `:::name[label]{attrs}`
    DirectiveOpen(DirectiveHeader),
    /// A line of only colons (at least three).
    DirectiveClose,
    /// `::name[label]{attrs}`
    LeafDirective(DirectiveHeader),
    /// `</Name>` alone on the line.
    ClosingTag(&'a str),
    /// Starts with `<` and a letter; may or may not turn out to be a tag.
    TagStart(&'a str),
    /// Starts with `<!--`.
    Comment(&'a str),
    /// `import ` or `export ` at column zero.
    Esm,
    Heading { depth: u8, text: &'a str },
    Text(&'a str),
}

/// Classifies individual lines for the block parsing phase.
pub struct MdxLineClassifier;

impl MdxLineClassifier {
    pub fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineClass::Blank;
        }

        if let Some(sig) = FenceSig::parse(line) {
            return LineClass::Fence(sig);
        }

        if line.starts_with("import ") || line.starts_with("export ") {
            return LineClass::Esm;
        }

        if trimmed.as_bytes()[0] == COLON {
            if let Some(class) = classify_directive(trimmed) {
                return class;
            }
            return LineClass::Text(trimmed);
        }

        if trimmed.starts_with("<!--") {
            return LineClass::Comment(trimmed);
        }

        if let Some(name) = closing_tag_name(trimmed) {
            return LineClass::ClosingTag(name);
        }

        if trimmed.starts_with('<')
            && trimmed
                .as_bytes()
                .get(1)
                .is_some_and(|b| b.is_ascii_alphabetic())
        {
            return LineClass::TagStart(trimmed);
        }

        if let Some((depth, text)) = atx_heading(trimmed) {
            return LineClass::Heading { depth, text };
        }

        LineClass::Text(trimmed)
    }
}

fn classify_directive(trimmed: &str) -> Option<LineClass<'_>> {
    let colons = trimmed.bytes().take_while(|b| *b == COLON).count();
    let after = &trimmed[colons..];
    match colons {
        2 => parse_line_header(after).map(LineClass::LeafDirective),
        n if n >= 3 && after.trim().is_empty() => Some(LineClass::DirectiveClose),
        n if n >= 3 => parse_line_header(after).map(LineClass::DirectiveOpen),
        _ => None,
    }
}

/// `# Title ##` → `(1, "Title")`
fn atx_heading(trimmed: &str) -> Option<(u8, &str)> {
    let depth = trimmed.bytes().take_while(|b| *b == b'#').count();
    if !(1..=6).contains(&depth) {
        return None;
    }
    let rest = &trimmed[depth..];
    if !(rest.is_empty() || rest.starts_with([' ', '\t'])) {
        return None;
    }
    let mut text = rest.trim();
    let without_closing = text.trim_end_matches('#');
    if without_closing.is_empty() {
        text = without_closing;
    } else if without_closing.ends_with([' ', '\t']) {
        text = without_closing.trim_end();
    }
    Some((depth as u8, text))
}

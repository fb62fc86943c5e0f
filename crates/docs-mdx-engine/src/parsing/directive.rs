use crate::models::{AttrValue, Attribute};

use super::cursor::Cursor;

pub const COLON: u8 = b':';

/// `name[label]{attributes}` following the leading colons of a directive.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveHeader {
    pub name: String,
    pub label: Option<String>,
    pub attributes: Vec<Attribute>,
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Parse a directive header at the cursor. On failure the cursor is restored.
pub fn parse_header(cur: &mut Cursor<'_>) -> Option<DirectiveHeader> {
    let saved = cur.clone();
    let Some(name) = cur.eat_name(is_name_byte) else {
        *cur = saved;
        return None;
    };

    let label = if cur.peek() == Some(b'[') {
        match eat_label(cur) {
            Some(label) => Some(label.to_string()),
            None => {
                *cur = saved;
                return None;
            }
        }
    } else {
        None
    };

    let attributes = if cur.peek() == Some(b'{') {
        match eat_attributes(cur) {
            Some(attributes) => attributes,
            None => {
                *cur = saved;
                return None;
            }
        }
    } else {
        Vec::new()
    };

    Some(DirectiveHeader {
        name: name.to_string(),
        label,
        attributes,
    })
}

/// Parse a whole line as a block directive header: the header must be the
/// only thing after the colons.
pub fn parse_line_header(after_colons: &str) -> Option<DirectiveHeader> {
    let mut cur = Cursor::new(after_colons);
    let header = parse_header(&mut cur)?;
    cur.rest().trim().is_empty().then_some(header)
}

/// `[label]` with balanced nested brackets.
fn eat_label<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    cur.bump(); // [
    let start = cur.pos();
    let mut depth = 1usize;
    while let Some(b) = cur.peek() {
        match b {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    let label = cur.slice(start);
                    cur.bump();
                    return Some(label);
                }
            }
            _ => {}
        }
        cur.bump();
    }
    None
}

/// `{#id .class key=value key="value" flag}`
fn eat_attributes(cur: &mut Cursor<'_>) -> Option<Vec<Attribute>> {
    cur.bump(); // {
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut classes: Vec<String> = Vec::new();

    loop {
        cur.skip_whitespace();
        match cur.peek()? {
            b'}' => {
                cur.bump();
                break;
            }
            b'#' => {
                cur.bump();
                let id = cur.eat_while(is_name_byte);
                attributes.push(Attribute::string("id", id));
            }
            b'.' => {
                cur.bump();
                classes.push(cur.eat_while(is_name_byte).to_string());
            }
            _ => {
                let key = cur.eat_while(|b| is_name_byte(b) || b == b':');
                if key.is_empty() {
                    return None;
                }
                if cur.peek() == Some(b'=') {
                    cur.bump();
                    let value = match cur.peek()? {
                        b'"' | b'\'' => cur.eat_quoted()?,
                        _ => cur.eat_while(|b| !b.is_ascii_whitespace() && b != b'}'),
                    };
                    attributes.push(Attribute::string(
                        key,
                        html_escape::decode_html_entities(value),
                    ));
                } else {
                    attributes.push(Attribute::flag(key));
                }
            }
        }
    }

    if !classes.is_empty() {
        attributes.push(Attribute {
            name: "class".to_string(),
            value: Some(AttrValue::Literal(classes.join(" "))),
        });
    }
    Some(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn name_only() {
        assert_eq!(
            parse_line_header("expo"),
            Some(DirectiveHeader {
                name: "expo".to_string(),
                label: None,
                attributes: vec![],
            })
        );
    }

    #[test]
    fn label_and_attributes() {
        let header = parse_line_header(r#"note[Heads up [beta]]{#intro .warn sdk="ios" open}"#)
            .unwrap();
        assert_eq!(header.name, "note");
        assert_eq!(header.label.as_deref(), Some("Heads up [beta]"));
        assert_eq!(
            header.attributes,
            vec![
                Attribute::string("id", "intro"),
                Attribute::string("sdk", "ios"),
                Attribute::flag("open"),
                Attribute::string("class", "warn"),
            ]
        );
    }

    #[test]
    fn trailing_text_is_not_a_line_header() {
        assert_eq!(parse_line_header("expo and more"), None);
    }

    #[test]
    fn unclosed_attributes_fail_and_restore() {
        let mut cur = Cursor::new("tip{sdk=ios");
        assert_eq!(parse_header(&mut cur), None);
        assert_eq!(cur.pos(), 0);
    }
}

use crate::models::{AttrValue, Attribute, Expression};

use super::cursor::Cursor;

/// A complete JSX opening tag.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenTag<'a> {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub self_closing: bool,
    /// Text after the closing `>` of the tag.
    pub rest: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TagParse<'a> {
    Complete(OpenTag<'a>),
    /// Looks like a tag but needs more lines.
    Incomplete,
    /// Not a tag.
    Invalid,
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':')
}

fn is_attr_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b':' | b'.')
}

/// Parse `<Name attr="x" flag expr={...}>` at the start of `s`.
pub fn parse_open_tag(s: &str) -> TagParse<'_> {
    let mut cur = Cursor::new(s);
    if cur.bump() != Some(b'<') {
        return TagParse::Invalid;
    }
    let Some(name) = cur.eat_name(is_tag_name_byte) else {
        return TagParse::Invalid;
    };
    let name = name.to_string();
    let mut attributes = Vec::new();

    loop {
        let before = cur.pos();
        cur.skip_whitespace();
        let separated = cur.pos() > before;

        if cur.eof() {
            return TagParse::Incomplete;
        }
        if cur.starts_with(b"/>") {
            cur.bump_n(2);
            return TagParse::Complete(OpenTag {
                name,
                attributes,
                self_closing: true,
                rest: cur.rest(),
            });
        }
        if cur.peek() == Some(b'>') {
            cur.bump();
            return TagParse::Complete(OpenTag {
                name,
                attributes,
                self_closing: false,
                rest: cur.rest(),
            });
        }
        if !separated {
            return TagParse::Invalid;
        }

        let attr_name = cur.eat_while(is_attr_name_byte);
        if attr_name.is_empty() {
            return TagParse::Invalid;
        }

        let save = cur.clone();
        cur.skip_whitespace();
        if cur.peek() != Some(b'=') {
            cur = save;
            attributes.push(Attribute::flag(attr_name));
            continue;
        }
        cur.bump();
        cur.skip_whitespace();

        let value = match cur.peek() {
            None => return TagParse::Incomplete,
            Some(b'"') | Some(b'\'') => match cur.eat_quoted() {
                Some(v) => AttrValue::Literal(html_escape::decode_html_entities(v).into_owned()),
                None => return TagParse::Incomplete,
            },
            Some(b'{') => match eat_expression(&mut cur) {
                Some(source) => AttrValue::Expression(Expression::parse(source)),
                None => return TagParse::Incomplete,
            },
            Some(_) => return TagParse::Invalid,
        };
        attributes.push(Attribute {
            name: attr_name.to_string(),
            value: Some(value),
        });
    }
}

/// Consume a `{...}` expression with balanced braces, skipping over string
/// literals, and return the text between the outer braces.
fn eat_expression<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    cur.bump(); // {
    let start = cur.pos();
    let mut depth = 1usize;
    while let Some(b) = cur.peek() {
        match b {
            b'"' | b'\'' | b'`' => {
                cur.bump();
                while let Some(c) = cur.bump() {
                    if c == b'\\' {
                        cur.bump();
                    } else if c == b {
                        break;
                    }
                }
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let inner = cur.slice(start);
                    cur.bump();
                    return Some(inner);
                }
            }
            _ => {}
        }
        cur.bump();
    }
    None
}

/// If `line` is exactly a closing tag (`</Name>`), return the name.
pub fn closing_tag_name(line: &str) -> Option<&str> {
    let inner = line.trim().strip_prefix("</")?.strip_suffix('>')?.trim();
    let mut cur = Cursor::new(inner);
    let name = cur.eat_name(is_tag_name_byte)?;
    cur.eof().then_some(name)
}

/// Split `text</Name>` into the text before a trailing closing tag for `name`.
pub fn strip_closing_tag<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let trimmed = text.trim_end();
    let without = trimmed.strip_suffix('>')?;
    let without = without.strip_suffix(name)?;
    without.strip_suffix("</")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn complete(s: &str) -> OpenTag<'_> {
        match parse_open_tag(s) {
            TagParse::Complete(tag) => tag,
            other => panic!("expected complete tag, got {other:?}"),
        }
    }

    #[test]
    fn parses_literal_flag_and_expression_attributes() {
        let tag = complete(r#"<Tabs items={["iOS", "Android"]} groupId="language" persist>"#);
        assert_eq!(tag.name, "Tabs");
        assert!(!tag.self_closing);
        assert_eq!(tag.rest, "");
        assert_eq!(
            tag.attributes,
            vec![
                Attribute::expression("items", Expression::parse(r#"["iOS", "Android"]"#)),
                Attribute::string("groupId", "language"),
                Attribute::flag("persist"),
            ]
        );
    }

    #[test]
    fn self_closing_with_rest() {
        let tag = complete(r#"<img src="/../images/a.png" /> trailing"#);
        assert!(tag.self_closing);
        assert_eq!(tag.rest, " trailing");
        assert_eq!(tag.attributes, vec![Attribute::string("src", "/../images/a.png")]);
    }

    #[test]
    fn decodes_entities_in_quoted_values() {
        let tag = complete(r#"<Tab title="Q&amp;A">"#);
        assert_eq!(tag.attributes, vec![Attribute::string("title", "Q&A")]);
    }

    #[test]
    fn braces_inside_expression_strings_do_not_close_it() {
        let tag = complete(r#"<Card data={{ label: "}" }}>"#);
        assert_eq!(
            tag.attributes[0].value,
            Some(AttrValue::Expression(Expression::parse(r#"{ label: "}" }"#)))
        );
    }

    #[test]
    fn multi_line_tag_is_incomplete_until_closed() {
        assert_eq!(parse_open_tag("<Tabs"), TagParse::Incomplete);
        assert_eq!(parse_open_tag("<Tabs\n  items={[\"a\""), TagParse::Incomplete);
        let tag = complete("<Tabs\n  groupId=\"language\"\n>");
        assert_eq!(tag.attributes, vec![Attribute::string("groupId", "language")]);
    }

    #[test]
    fn not_a_tag() {
        assert_eq!(parse_open_tag("<!-- comment -->"), TagParse::Invalid);
        assert_eq!(parse_open_tag("< 3 apples"), TagParse::Invalid);
        assert_eq!(parse_open_tag("<Tab=\"x\">"), TagParse::Invalid);
    }

    #[test]
    fn closing_tags() {
        assert_eq!(closing_tag_name("</Tab>"), Some("Tab"));
        assert_eq!(closing_tag_name("  </CodeGroup>  "), Some("CodeGroup"));
        assert_eq!(closing_tag_name("</Tab> more"), None);
        assert_eq!(strip_closing_tag("some text</Tab>", "Tab"), Some("some text"));
        assert_eq!(strip_closing_tag("some text</Tabs>", "Tab"), None);
    }
}

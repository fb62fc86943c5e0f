//! Serializes a tree back to MDX text.
//!
//! Block nodes are separated by a blank line, adjacent inline nodes are
//! written back to back. The output parses back to the same tree for the
//! constructs the parser knows about.

use crate::models::{AttrValue, Attribute, Directive, Document, Element, Node};

/// Serialize a document, writing its data as front matter.
///
/// `yaml` nodes in the tree are skipped: the document data is the source of
/// truth once transforms have merged into it.
pub fn document_to_mdx(doc: &Document) -> String {
    let mut out = String::new();
    if !doc.data.is_empty() {
        match serde_yaml::to_string(&doc.data) {
            Ok(yaml) => {
                out.push_str("---\n");
                out.push_str(&yaml);
                if !yaml.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("---\n");
            }
            Err(err) => log::warn!("Dropping front matter that failed to serialize: {err}"),
        }
    }

    let body = blocks_to_mdx(
        doc.children()
            .iter()
            .filter(|node| !matches!(node, Node::Yaml { .. })),
    );
    if !body.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&body);
        out.push('\n');
    }
    out
}

/// Serialize a single node (and its subtree).
pub fn to_mdx(node: &Node) -> String {
    node_to_mdx(node)
}

/// Join sibling nodes: blank line between blocks, inline runs concatenated.
fn blocks_to_mdx<'a>(children: impl IntoIterator<Item = &'a Node>) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut inline_run = String::new();

    for child in children {
        if child.is_inline() {
            inline_run.push_str(&node_to_mdx(child));
            continue;
        }
        if !inline_run.is_empty() {
            parts.push(std::mem::take(&mut inline_run));
        }
        parts.push(node_to_mdx(child));
    }
    if !inline_run.is_empty() {
        parts.push(inline_run);
    }
    parts.join("\n\n")
}

fn node_to_mdx(node: &Node) -> String {
    match node {
        Node::Root { children } => blocks_to_mdx(children),
        Node::Yaml { value } => format!("---\n{value}\n---"),
        Node::MdxjsEsm { value } | Node::Html { value } => value.clone(),
        Node::Heading { depth, children } => {
            format!("{} {}", "#".repeat(usize::from(*depth)), inline_to_mdx(children))
        }
        Node::Paragraph { children } => inline_to_mdx(children),
        Node::Text { value } => value.clone(),
        Node::InlineCode { value } => inline_code(value),
        Node::Image { url, alt, title } => match title {
            Some(title) => format!("![{alt}]({url} \"{}\")", title.replace('"', "\\\"")),
            None => format!("![{alt}]({url})"),
        },
        Node::Code { lang, meta, value } => code_block(lang.as_deref(), meta.as_deref(), value),
        Node::MdxJsxFlowElement(element) => element_to_mdx(element),
        Node::ContainerDirective(directive) => container_directive(directive),
        Node::LeafDirective(directive) => format!("::{}", directive_header(directive)),
        Node::TextDirective(directive) => format!(":{}", directive_header(directive)),
    }
}

fn inline_to_mdx(children: &[Node]) -> String {
    children.iter().map(node_to_mdx).collect()
}

fn inline_code(value: &str) -> String {
    let ticks = "`".repeat(longest_run(value, '`') + 1);
    if value.starts_with('`') || value.ends_with('`') {
        format!("{ticks} {value} {ticks}")
    } else {
        format!("{ticks}{value}{ticks}")
    }
}

/// Meta without a lang is dropped: the first info word always reads back as
/// the lang.
fn code_block(lang: Option<&str>, meta: Option<&str>, value: &str) -> String {
    let fence = "`".repeat(3.max(longest_run(value, '`') + 1));
    let info = match (lang, meta) {
        (Some(lang), Some(meta)) if !meta.is_empty() => format!("{lang} {meta}"),
        (Some(lang), _) => lang.to_string(),
        (None, _) => String::new(),
    };
    if value.is_empty() {
        format!("{fence}{info}\n{fence}")
    } else {
        format!("{fence}{info}\n{value}\n{fence}")
    }
}

fn longest_run(s: &str, c: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in s.chars() {
        if ch == c {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn element_to_mdx(element: &Element) -> String {
    let open = format!("<{}{}", element.name, jsx_attributes(&element.attributes));
    if element.children.is_empty() {
        return format!("{open} />");
    }
    if element.children.iter().all(Node::is_inline) {
        return format!(
            "{open}>{}</{}>",
            inline_to_mdx(&element.children),
            element.name
        );
    }
    format!(
        "{open}>\n\n{}\n\n</{}>",
        blocks_to_mdx(&element.children),
        element.name
    )
}

fn jsx_attributes(attributes: &[Attribute]) -> String {
    attributes
        .iter()
        .map(|attribute| match &attribute.value {
            None => format!(" {}", attribute.name),
            Some(AttrValue::Literal(value)) => format!(
                " {}=\"{}\"",
                attribute.name,
                html_escape::encode_double_quoted_attribute(value)
            ),
            Some(AttrValue::Expression(expression)) => {
                format!(" {}={{{}}}", attribute.name, expression.source)
            }
        })
        .collect()
}

fn container_directive(directive: &Directive) -> String {
    let fence = ":".repeat(3 + directive_nesting(&directive.children));
    let header = directive_header(directive);
    if directive.children.is_empty() {
        return format!("{fence}{header}\n{fence}");
    }
    format!(
        "{fence}{header}\n{}\n{fence}",
        blocks_to_mdx(&directive.children)
    )
}

/// Deepest chain of container directives below `children`, so an outer
/// fence can be made longer than every inner one.
fn directive_nesting(children: &[Node]) -> usize {
    children
        .iter()
        .map(|child| match child {
            Node::ContainerDirective(inner) => 1 + directive_nesting(&inner.children),
            other => other.children().map_or(0, directive_nesting),
        })
        .max()
        .unwrap_or(0)
}

/// Directive attributes have no expression syntax, so an expression value is
/// written as a quoted string and reads back as a literal.
fn directive_header(directive: &Directive) -> String {
    let mut out = directive.name.clone();
    if let Some(label) = &directive.label {
        out.push('[');
        out.push_str(label);
        out.push(']');
    }
    if !directive.attributes.is_empty() {
        let attributes: Vec<String> = directive
            .attributes
            .iter()
            .map(|attribute| match &attribute.value {
                None => attribute.name.clone(),
                Some(AttrValue::Literal(value)) => quoted_attribute(&attribute.name, value),
                Some(AttrValue::Expression(expression)) => {
                    quoted_attribute(&attribute.name, &expression.source)
                }
            })
            .collect();
        out.push('{');
        out.push_str(&attributes.join(" "));
        out.push('}');
    }
    out
}

fn quoted_attribute(name: &str, value: &str) -> String {
    format!(
        "{name}=\"{}\"",
        html_escape::encode_double_quoted_attribute(value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Expression;
    use pretty_assertions::assert_eq;

    #[test]
    fn tabs_render_as_jsx() {
        let tabs = Node::MdxJsxFlowElement(
            Element::new("Tabs")
                .with_attribute(Attribute::expression(
                    "items",
                    Expression::string_array(&["Swift".to_string(), "Kotlin".to_string()]),
                ))
                .with_attribute(Attribute::string("groupId", "language"))
                .with_attribute(Attribute::flag("persist"))
                .with_children(vec![Node::MdxJsxFlowElement(
                    Element::new("Tab")
                        .with_attribute(Attribute::string("value", "Swift"))
                        .with_children(vec![Node::code(Some("swift"), Some("Swift"), "let a = 1")]),
                )]),
        );

        insta::assert_snapshot!(to_mdx(&tabs), @r#"
        <Tabs items={["Swift","Kotlin"]} groupId="language" persist>

        <Tab value="Swift">

        ```swift Swift
        let a = 1
        ```

        </Tab>

        </Tabs>
        "#);
    }

    #[test]
    fn inline_children_stay_on_one_line() {
        let node = Node::MdxJsxFlowElement(
            Element::new("Tab")
                .with_attribute(Attribute::string("value", "Q&A \"x\""))
                .with_children(vec![Node::text("Hi "), Node::InlineCode {
                    value: "code".to_string(),
                }]),
        );
        assert_eq!(to_mdx(&node), r#"<Tab value="Q&amp;A &quot;x&quot;">Hi `code`</Tab>"#);
    }

    #[test]
    fn nested_directives_get_longer_fences() {
        let node = Node::ContainerDirective(Directive::new("expo").with_children(vec![
            Node::ContainerDirective(
                Directive::new("ios").with_children(vec![Node::paragraph(vec![Node::text("x")])]),
            ),
        ]));
        assert_eq!(to_mdx(&node), "::::expo\n:::ios\nx\n:::\n::::");
    }

    #[test]
    fn code_fence_grows_past_backticks_in_content() {
        let node = Node::code(Some("md"), None, "```js\nx\n```");
        assert_eq!(to_mdx(&node), "````md\n```js\nx\n```\n````");
    }

    #[test]
    fn document_front_matter_comes_from_data() {
        let doc = Document::parse(
            "/docs/a.mdx",
            "---\ntitle: Hello\n---\n\n# Title\n\nSee ![](/img/a.png) and :ios[this]{sdk=\"ios\"}.",
        )
        .unwrap();
        insta::assert_snapshot!(document_to_mdx(&doc), @r#"
        ---
        title: Hello
        ---

        # Title

        See ![](/img/a.png) and :ios[this]{sdk="ios"}.
        "#);
    }

    #[test]
    fn serialized_output_parses_back_to_the_same_tree() {
        let source = "import X from './x'\n\n## Setup\n\n<CodeGroup>\n\n```gradle\nimplementation 'x'\n```\n\n</CodeGroup>\n\n:::android\n::flutter\n:::\n\n<img src=\"/a.png\" />\n";
        let doc = Document::parse("/docs/a.mdx", source).unwrap();
        let again = Document::parse("/docs/a.mdx", &document_to_mdx(&doc)).unwrap();
        assert_eq!(again.root, doc.root);
    }

    #[test]
    fn meta_without_lang_is_not_written_as_lang() {
        let node = Node::code(None, Some("Swift"), "let a = 1");
        assert_eq!(to_mdx(&node), "```\nlet a = 1\n```");

        let again = Document::parse("/docs/a.mdx", &to_mdx(&node)).unwrap();
        assert_eq!(again.children(), &[Node::code(None, None, "let a = 1")]);
    }

    #[test]
    fn directive_expression_attribute_reads_back_as_literal() {
        let mut directive = Directive::new("note");
        directive
            .attributes
            .push(Attribute::expression("level", Expression::parse("2")));
        let node = Node::LeafDirective(directive);

        assert_eq!(to_mdx(&node), "::note{level=\"2\"}");

        let again = Document::parse("/docs/a.mdx", &to_mdx(&node)).unwrap();
        let Some(Node::LeafDirective(parsed)) = again.children().first() else {
            panic!("expected a leaf directive");
        };
        assert_eq!(parsed.attribute("level").and_then(Attribute::literal), Some("2"));
    }
}

use serde::Serialize;

/// A node in the MDX document tree.
///
/// The shape follows mdast with the MDX and directive extensions, so the JSON
/// form (`{"type": "code", ...}`) reads like the trees produced by remark.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Root {
        children: Vec<Node>,
    },
    /// Raw front matter, without the `---` delimiters.
    Yaml {
        value: String,
    },
    /// An `import`/`export` statement block.
    MdxjsEsm {
        value: String,
    },
    Heading {
        depth: u8,
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    Text {
        value: String,
    },
    InlineCode {
        value: String,
    },
    Image {
        url: String,
        alt: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Code {
        lang: Option<String>,
        meta: Option<String>,
        value: String,
    },
    /// Passthrough markup the parser does not interpret (comments).
    Html {
        value: String,
    },
    MdxJsxFlowElement(Element),
    ContainerDirective(Directive),
    LeafDirective(Directive),
    TextDirective(Directive),
}

/// Type tag of a [`Node`], used to filter traversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Yaml,
    MdxjsEsm,
    Heading,
    Paragraph,
    Text,
    InlineCode,
    Image,
    Code,
    Html,
    MdxJsxFlowElement,
    ContainerDirective,
    LeafDirective,
    TextDirective,
}

impl Node {
    pub fn root(children: Vec<Node>) -> Self {
        Node::Root { children }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph { children }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Node::Image {
            url: url.into(),
            alt: String::new(),
            title: None,
        }
    }

    pub fn code(lang: Option<&str>, meta: Option<&str>, value: impl Into<String>) -> Self {
        Node::Code {
            lang: lang.map(str::to_string),
            meta: meta.map(str::to_string),
            value: value.into(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Root { .. } => NodeKind::Root,
            Node::Yaml { .. } => NodeKind::Yaml,
            Node::MdxjsEsm { .. } => NodeKind::MdxjsEsm,
            Node::Heading { .. } => NodeKind::Heading,
            Node::Paragraph { .. } => NodeKind::Paragraph,
            Node::Text { .. } => NodeKind::Text,
            Node::InlineCode { .. } => NodeKind::InlineCode,
            Node::Image { .. } => NodeKind::Image,
            Node::Code { .. } => NodeKind::Code,
            Node::Html { .. } => NodeKind::Html,
            Node::MdxJsxFlowElement(_) => NodeKind::MdxJsxFlowElement,
            Node::ContainerDirective(_) => NodeKind::ContainerDirective,
            Node::LeafDirective(_) => NodeKind::LeafDirective,
            Node::TextDirective(_) => NodeKind::TextDirective,
        }
    }

    /// Nodes that live inside a line of text rather than forming a block.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Node::Text { .. } | Node::InlineCode { .. } | Node::Image { .. } | Node::TextDirective(_)
        )
    }

    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Root { children }
            | Node::Heading { children, .. }
            | Node::Paragraph { children } => Some(children),
            Node::MdxJsxFlowElement(element) => Some(&element.children),
            Node::ContainerDirective(directive)
            | Node::LeafDirective(directive)
            | Node::TextDirective(directive) => Some(&directive.children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Root { children }
            | Node::Heading { children, .. }
            | Node::Paragraph { children } => Some(children),
            Node::MdxJsxFlowElement(element) => Some(&mut element.children),
            Node::ContainerDirective(directive)
            | Node::LeafDirective(directive)
            | Node::TextDirective(directive) => Some(&mut directive.children),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::MdxJsxFlowElement(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::MdxJsxFlowElement(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_directive(&self) -> Option<&Directive> {
        match self {
            Node::ContainerDirective(directive)
            | Node::LeafDirective(directive)
            | Node::TextDirective(directive) => Some(directive),
            _ => None,
        }
    }

    /// True for a JSX element with the given component name.
    pub fn is_element_named(&self, name: &str) -> bool {
        self.as_element().is_some_and(|element| element.name == name)
    }
}

/// A JSX component tag (`<Tabs items={[...]}>`) with its attributes and children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.set_attribute(attribute);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// The literal string value of an attribute, if it has one.
    pub fn literal(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(Attribute::literal)
    }

    /// Sets an attribute, replacing an existing one of the same name in place.
    pub fn set_attribute(&mut self, attribute: Attribute) {
        match self.attributes.iter_mut().find(|a| a.name == attribute.name) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }
}

/// A directive (`:::name[label]{key="value"}`) from the colon-fenced syntax.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Directive {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Directive {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// An attribute on an element or directive.
///
/// `value: None` is a presence-only attribute such as `persist`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: Option<AttrValue>,
}

impl Attribute {
    pub fn literal(&self) -> Option<&str> {
        match &self.value {
            Some(AttrValue::Literal(value)) => Some(value),
            _ => None,
        }
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(AttrValue::Literal(value.into())),
        }
    }

    pub fn expression(name: impl Into<String>, expression: Expression) -> Self {
        Self {
            name: name.into(),
            value: Some(AttrValue::Expression(expression)),
        }
    }

    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Literal(String),
    Expression(Expression),
}

/// An embedded `{...}` expression.
///
/// `source` is the text between the braces. When the expression is an array
/// literal of strings, `items` holds the parsed list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}

impl Expression {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let items = serde_json::from_str::<Vec<String>>(source.trim()).ok();
        Self { source, items }
    }

    /// Builds an array literal such as `["Swift","Kotlin"]`.
    pub fn string_array(items: &[String]) -> Self {
        let source = serde_json::Value::from(items.to_vec()).to_string();
        Self {
            source,
            items: Some(items.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_array_matches_json_stringify() {
        let expr = Expression::string_array(&["Swift".to_string(), "Kotlin".to_string()]);
        assert_eq!(expr.source, r#"["Swift","Kotlin"]"#);
        assert_eq!(
            expr.items,
            Some(vec!["Swift".to_string(), "Kotlin".to_string()])
        );
    }

    #[test]
    fn parse_keeps_source_for_non_array_expressions() {
        let expr = Expression::parse("props.items");
        assert_eq!(expr.source, "props.items");
        assert_eq!(expr.items, None);
    }

    #[test]
    fn parse_reads_string_arrays() {
        let expr = Expression::parse(r#" ["iOS", "Android"] "#);
        assert_eq!(
            expr.items,
            Some(vec!["iOS".to_string(), "Android".to_string()])
        );
    }

    #[test]
    fn set_attribute_replaces_in_place() {
        let mut element = Element::new("Tabs")
            .with_attribute(Attribute::string("groupId", "os"))
            .with_attribute(Attribute::flag("persist"));
        element.set_attribute(Attribute::string("groupId", "language"));

        assert_eq!(element.attributes.len(), 2);
        assert_eq!(element.attributes[0].name, "groupId");
        assert_eq!(element.literal("groupId"), Some("language"));
    }

    #[test]
    fn serializes_with_mdast_type_tags() {
        let node = Node::code(Some("swift"), None, "let x = 1");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "code");
        assert_eq!(json["lang"], "swift");

        let element = Node::MdxJsxFlowElement(Element::new("Tab"));
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["type"], "mdxJsxFlowElement");
        assert_eq!(json["name"], "Tab");
    }
}

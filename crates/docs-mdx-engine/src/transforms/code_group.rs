use crate::models::{Attribute, Document, Element, Expression, Node, NodeKind};
use crate::visit::{Action, visit_mut};

use super::{DEFAULT_LABEL, GROUP_ID, Transform, TransformError};

pub const CODE_GROUP: &str = "CodeGroup";
pub const TABS: &str = "Tabs";
pub const TAB: &str = "Tab";

/// Turns a `<CodeGroup>` of fenced code blocks into `<Tabs>` with one `<Tab>`
/// per block, labelled by the block's meta string.
///
/// ```text
/// <CodeGroup>                       <Tabs items={["Swift","Kotlin"]} groupId="language" persist>
/// ```swift Swift                    <Tab value="Swift">```swift Swift ...```</Tab>
/// ```kotlin Kotlin          →       <Tab value="Kotlin">```kotlin Kotlin ...```</Tab>
/// </CodeGroup>                      </Tabs>
/// ```
pub struct CodeGroupToTabs;

impl Transform for CodeGroupToTabs {
    fn name(&self) -> &'static str {
        "codegroup-to-tabs"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        visit_mut(&mut doc.root, NodeKind::MdxJsxFlowElement, |node, _| {
            if let Some(element) = node.as_element_mut()
                && element.name == CODE_GROUP
            {
                convert(element);
            }
            Action::Continue
        });
        Ok(())
    }
}

fn convert(element: &mut Element) {
    let (code_blocks, dropped): (Vec<Node>, Vec<Node>) = std::mem::take(&mut element.children)
        .into_iter()
        .partition(|child| matches!(child, Node::Code { .. }));
    if !dropped.is_empty() {
        log::warn!(
            "Dropping {} non-code child node(s) of <{CODE_GROUP}>",
            dropped.len()
        );
    }

    let labels: Vec<String> = code_blocks.iter().map(label_of).collect();

    element.name = TABS.to_string();
    element.set_attribute(Attribute::expression(
        "items",
        Expression::string_array(&labels),
    ));
    element.set_attribute(Attribute::string("groupId", GROUP_ID));
    element.set_attribute(Attribute::flag("persist"));
    element.children = code_blocks
        .into_iter()
        .zip(labels)
        .map(|(block, label)| {
            Node::MdxJsxFlowElement(
                Element::new(TAB)
                    .with_attribute(Attribute::string("value", label))
                    .with_children(vec![block]),
            )
        })
        .collect();
}

fn label_of(block: &Node) -> String {
    match block {
        Node::Code {
            meta: Some(meta), ..
        } if !meta.is_empty() => meta.clone(),
        _ => DEFAULT_LABEL.to_string(),
    }
}

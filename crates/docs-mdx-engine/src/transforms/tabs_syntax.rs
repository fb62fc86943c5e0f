use crate::models::{Attribute, Document, Element, Expression, Node, NodeKind};
use crate::visit::{Action, visit_mut};

use super::code_group::{TAB, TABS};
use super::{DEFAULT_LABEL, Transform, TransformError};

/// Rewrites `<Tabs>` / `<Tab title="...">` into the `items` / `value` form.
///
/// Non-`Tab` children of `Tabs` are dropped, the `Tabs` attribute list is
/// replaced by `items`, and each `Tab` keeps only a `value` attribute.
pub struct TabsSyntax;

impl Transform for TabsSyntax {
    fn name(&self) -> &'static str {
        "tabs-syntax"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        visit_mut(&mut doc.root, NodeKind::MdxJsxFlowElement, |node, _| {
            if let Some(element) = node.as_element_mut()
                && element.name == TABS
            {
                convert(element);
            }
            Action::Continue
        });
        Ok(())
    }
}

fn convert(tabs: &mut Element) {
    let mut children: Vec<Node> = std::mem::take(&mut tabs.children)
        .into_iter()
        .filter(|child| child.is_element_named(TAB))
        .collect();

    let mut labels = Vec::with_capacity(children.len());
    for child in &mut children {
        let Some(tab) = child.as_element_mut() else {
            continue;
        };
        let label = match tab.literal("title") {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => {
                log::warn!("Tab missing title attribute, using '{DEFAULT_LABEL}' as fallback");
                DEFAULT_LABEL.to_string()
            }
        };
        tab.attributes = vec![Attribute::string("value", label.clone())];
        labels.push(label);
    }

    tabs.attributes = vec![Attribute::expression(
        "items",
        Expression::string_array(&labels),
    )];
    tabs.children = children;
}

use crate::models::{Document, Node, Sdk};
use crate::visit::{Action, Filter, visit_mut};

use super::{Transform, TransformError};

/// Build-time SDK scoping.
///
/// On a page that belongs to one SDK, removes every node labelled for a
/// different SDK: directives named after an SDK (`:::android`) and elements
/// with an `sdk` attribute (`<div sdk="android">`). Pages outside any SDK
/// section are left alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SdkFilter {
    /// Overrides the SDK inferred from the document path.
    pub sdk: Option<Sdk>,
}

impl SdkFilter {
    pub fn new(sdk: Option<Sdk>) -> Self {
        Self { sdk }
    }

    pub fn target(&self, doc: &Document) -> Option<Sdk> {
        self.sdk.or_else(|| Sdk::from_path(doc.path()))
    }
}

/// The SDK label a node carries, if any.
pub fn sdk_label(node: &Node) -> Option<&str> {
    if let Some(directive) = node.as_directive()
        && directive.name.parse::<Sdk>().is_ok()
    {
        return Some(&directive.name);
    }
    node.as_element().and_then(|element| element.literal("sdk"))
}

impl Transform for SdkFilter {
    fn name(&self) -> &'static str {
        "sdk-filter"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        let Some(target) = self.target(doc) else {
            return Ok(());
        };
        log::debug!("Filtering {} for SDK {target}", doc.path().display());

        visit_mut(&mut doc.root, Filter::Any, |node, cx| {
            if cx.parent.is_none() {
                return Action::Continue;
            }
            match sdk_label(node) {
                Some(label) if label != target.as_str() => Action::Remove,
                _ => Action::Continue,
            }
        });
        Ok(())
    }
}

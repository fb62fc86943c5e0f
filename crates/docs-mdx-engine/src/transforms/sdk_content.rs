//! `<SDKContent only="ios,android">` blocks.
//!
//! The site decides at render time whether a block shows for the SDK the
//! reader is browsing ([`renders_sdk_content`]). Plain-text exports have no
//! reader, so [`SdkContentFilter`] resolves the blocks ahead of time for one
//! SDK: non-matching blocks are removed and matching ones are unwrapped.

use crate::models::{AttrValue, Attribute, Document, Element, NodeKind};
use crate::visit::{Action, visit_mut};

use super::{Transform, TransformError};

pub const SDK_CONTENT: &str = "SDKContent";

/// The set of SDKs an `only` attribute names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SdkScope(Vec<String>);

impl SdkScope {
    pub fn new<I, S>(sdks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(sdks.into_iter().map(Into::into).collect())
    }

    /// Read an `only` attribute: `only="ios"`, `only="ios, android"` or
    /// `only={["ios", "android"]}`. A missing or unparsable value is an empty
    /// scope.
    pub fn from_attribute(attribute: Option<&Attribute>) -> Self {
        match attribute.and_then(|a| a.value.as_ref()) {
            Some(AttrValue::Literal(value)) => Self::new(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty()),
            ),
            Some(AttrValue::Expression(expression)) => {
                Self::new(expression.items.iter().flatten().map(String::as_str))
            }
            None => Self::default(),
        }
    }

    pub fn from_element(element: &Element) -> Self {
        Self::from_attribute(element.attribute("only"))
    }

    pub fn contains(&self, sdk: &str) -> bool {
        self.0.iter().any(|s| s == sdk)
    }
}

/// Whether an `SDKContent` block's children show for `sdk`.
///
/// `show_when_none` inverts the check: the children show for every SDK
/// *outside* the scope.
pub fn renders_sdk_content(scope: &SdkScope, sdk: &str, show_when_none: bool) -> bool {
    let included = scope.contains(&sdk.to_lowercase());
    included != show_when_none
}

/// Resolves `SDKContent` blocks for a single SDK.
pub struct SdkContentFilter {
    sdk: String,
}

impl SdkContentFilter {
    pub fn new(sdk: impl Into<String>) -> Self {
        Self { sdk: sdk.into() }
    }
}

impl Transform for SdkContentFilter {
    fn name(&self) -> &'static str {
        "sdk-content"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        visit_mut(&mut doc.root, NodeKind::MdxJsxFlowElement, |node, _| {
            let Some(element) = node.as_element_mut() else {
                return Action::Continue;
            };
            if element.name != SDK_CONTENT {
                return Action::Continue;
            }
            let show_when_none = element.attribute("showWhenNone").is_some_and(is_truthy);
            if renders_sdk_content(&SdkScope::from_element(element), &self.sdk, show_when_none) {
                Action::Replace(std::mem::take(&mut element.children))
            } else {
                Action::Remove
            }
        });
        Ok(())
    }
}

/// `showWhenNone`, `showWhenNone={true}` and `showWhenNone="true"` all count.
fn is_truthy(attribute: &Attribute) -> bool {
    match &attribute.value {
        None => true,
        Some(AttrValue::Literal(value)) => value == "true",
        Some(AttrValue::Expression(expression)) => expression.source.trim() == "true",
    }
}

use crate::models::{AttrValue, Document, Node};
use crate::visit::{Action, Filter, visit_mut};

use super::{Transform, TransformError};

/// Rewrites relative image references to site-root-absolute ones.
///
/// Covers markdown images and literal `src` attributes on JSX elements
/// (`<img>`, `<Image>`, ...), wherever they are nested.
pub struct ImagePaths;

/// Strip the leading run of `../` and `/` segments, then prefix one `/`.
///
/// `/../images/x.jpg` → `/images/x.jpg`, `images/x.jpg` → `/images/x.jpg`.
pub fn normalize_url(url: &str) -> String {
    let mut rest = url;
    loop {
        if let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
        } else {
            break;
        }
    }
    format!("/{rest}")
}

impl Transform for ImagePaths {
    fn name(&self) -> &'static str {
        "image-paths"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        visit_mut(&mut doc.root, Filter::Any, |node, _| {
            match node {
                Node::Image { url, .. } if !url.is_empty() => {
                    *url = normalize_url(url);
                }
                Node::MdxJsxFlowElement(element) => {
                    for attribute in element.attributes.iter_mut().filter(|a| a.name == "src") {
                        if let Some(AttrValue::Literal(src)) = &mut attribute.value
                            && !src.is_empty()
                        {
                            *src = normalize_url(src);
                        }
                    }
                }
                _ => {}
            }
            Action::Continue
        });
        Ok(())
    }
}

pub mod mdx;

use serde::Serialize;
use serde_yaml::Mapping;

use crate::models::{Document, Node};

pub use mdx::{document_to_mdx, to_mdx};

#[derive(Serialize)]
struct DocumentView<'a> {
    path: String,
    data: &'a Mapping,
    tree: &'a Node,
}

/// Pretty-printed mdast-shaped JSON of the document: its path, data and tree.
pub fn to_json(doc: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&DocumentView {
        path: doc.path().display().to_string(),
        data: &doc.data,
        tree: &doc.root,
    })
}

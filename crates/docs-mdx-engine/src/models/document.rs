use std::path::{Path, PathBuf};

use serde_yaml::Mapping;

use crate::models::Node;
use crate::parsing::{self, ParseError};

/// A parsed source document: its tree, the path it was read from, and its
/// front matter data.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Absolute (or content-root relative) path of the source file.
    pub path: PathBuf,
    /// Always a [`Node::Root`].
    pub root: Node,
    /// Front matter, plus anything merged in by transforms.
    pub data: Mapping,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, children: Vec<Node>) -> Self {
        Self {
            path: path.into(),
            root: Node::root(children),
            data: Mapping::new(),
        }
    }

    /// Parse MDX source into a document.
    pub fn parse(path: impl Into<PathBuf>, source: &str) -> Result<Self, ParseError> {
        let parsed = parsing::parse(source)?;
        Ok(Self {
            path: path.into(),
            root: parsed.root,
            data: parsed.data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn children(&self) -> &[Node] {
        self.root.children().unwrap_or_default()
    }

    /// Replace the whole body of the document.
    pub fn replace_children(&mut self, children: Vec<Node>) {
        match self.root.children_mut() {
            Some(existing) => *existing = children,
            None => self.root = Node::root(children),
        }
    }

    /// Merge `base` underneath the current data: keys already present on this
    /// document win.
    pub fn merge_data_over(&mut self, base: Mapping) {
        let own = std::mem::replace(&mut self.data, base);
        for (key, value) in own {
            self.data.insert(key, value);
        }
    }
}

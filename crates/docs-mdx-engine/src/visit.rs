//! # Tree Visitor
//!
//! Depth-first, parent-before-children, left-to-right traversal over a
//! [`Node`] tree with in-place mutation.
//!
//! The callback steers traversal through the [`Action`] it returns instead of
//! splicing its parent and handing back an index. Siblings are walked with an
//! explicit cursor, so removals and replacements re-check the slot they
//! touched and never run past the end of the child list, however many of
//! them compound within one parent.

use std::ops::ControlFlow;

use crate::models::{Node, NodeKind};

/// Which nodes the callback is invoked for. Non-matching nodes are still
/// descended into.
#[derive(Debug, Clone, Copy)]
pub enum Filter<'a> {
    Any,
    Kind(NodeKind),
    Kinds(&'a [NodeKind]),
}

impl Filter<'_> {
    pub fn matches(&self, kind: NodeKind) -> bool {
        match self {
            Filter::Any => true,
            Filter::Kind(k) => *k == kind,
            Filter::Kinds(kinds) => kinds.contains(&kind),
        }
    }
}

impl From<NodeKind> for Filter<'_> {
    fn from(kind: NodeKind) -> Self {
        Filter::Kind(kind)
    }
}

impl<'a> From<&'a [NodeKind]> for Filter<'a> {
    fn from(kinds: &'a [NodeKind]) -> Self {
        Filter::Kinds(kinds)
    }
}

/// Where the visited node sits in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitContext {
    /// Index within the parent's children (0 for the root).
    pub index: usize,
    /// 0 for the root.
    pub depth: usize,
    /// `None` only for the root.
    pub parent: Option<NodeKind>,
}

/// What the traversal does after the callback returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Descend into the (possibly mutated) node's children, then advance.
    Continue,
    /// Advance without descending.
    Skip,
    /// Delete the node; the sibling that slides into its index is checked next.
    Remove,
    /// Splice these nodes in place of the node; the first of them is checked
    /// next, so replacements are visited too.
    Replace(Vec<Node>),
    /// End the whole traversal.
    Stop,
}

/// Walk `root` and call `visitor` for every node that `filter` matches.
///
/// The root cannot be removed or replaced: those actions are ignored there
/// and traversal continues into its children.
pub fn visit_mut<'f, F>(root: &mut Node, filter: impl Into<Filter<'f>>, mut visitor: F)
where
    F: FnMut(&mut Node, VisitContext) -> Action,
{
    let filter = filter.into();
    let context = VisitContext {
        index: 0,
        depth: 0,
        parent: None,
    };

    let action = if filter.matches(root.kind()) {
        visitor(root, context)
    } else {
        Action::Continue
    };

    match action {
        Action::Skip | Action::Stop => return,
        Action::Remove | Action::Replace(_) => {
            log::warn!("Ignoring request to remove or replace the tree root");
        }
        Action::Continue => {}
    }

    let kind = root.kind();
    if let Some(children) = root.children_mut() {
        let _ = walk_children(children, kind, 1, &filter, &mut visitor);
    }
}

fn walk_children<F>(
    children: &mut Vec<Node>,
    parent: NodeKind,
    depth: usize,
    filter: &Filter<'_>,
    visitor: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(&mut Node, VisitContext) -> Action,
{
    let mut index = 0;
    while index < children.len() {
        let node = &mut children[index];
        let action = if filter.matches(node.kind()) {
            visitor(
                node,
                VisitContext {
                    index,
                    depth,
                    parent: Some(parent),
                },
            )
        } else {
            Action::Continue
        };

        match action {
            Action::Continue => {
                let node = &mut children[index];
                let kind = node.kind();
                if let Some(grandchildren) = node.children_mut() {
                    walk_children(grandchildren, kind, depth + 1, filter, visitor)?;
                }
                index += 1;
            }
            Action::Skip => index += 1,
            Action::Remove => {
                children.remove(index);
            }
            Action::Replace(nodes) => {
                children.splice(index..=index, nodes);
            }
            Action::Stop => return ControlFlow::Break(()),
        }
    }
    ControlFlow::Continue(())
}

pub mod document;
pub mod node;
pub mod sdk;

pub use document::Document;
pub use node::{AttrValue, Attribute, Directive, Element, Expression, Node, NodeKind};
pub use sdk::{Sdk, UnknownSdk};

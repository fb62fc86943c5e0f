//! # MDX Parsing
//!
//! Two phases, like any line-oriented markdown parser:
//!
//! 1. **Blocks**: each line is classified on local facts
//!    ([`classify::MdxLineClassifier`]) and fed to a [`builder::BlockBuilder`]
//!    that tracks the open leaf block and the stack of open containers (JSX
//!    elements and container directives).
//! 2. **Inline**: paragraph and heading text is scanned for code spans,
//!    images and text directives ([`inline::parse_inline`]).
//!
//! Front matter is split off before either phase runs. Apart from invalid
//! front matter, parsing never fails: anything that does not form a known
//! construct is kept as paragraph text.

pub mod builder;
pub mod classify;
pub mod cursor;
pub mod directive;
pub mod inline;
pub mod tag;

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::models::Node;
use builder::BlockBuilder;

const FRONT_MATTER_FENCE: &str = "---";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
    #[error("Front matter must be a mapping of keys to values")]
    FrontMatterNotMapping,
}

/// A parsed document body and its front matter data.
#[derive(Debug)]
pub struct Parsed {
    pub root: Node,
    pub data: Mapping,
}

pub fn parse(source: &str) -> Result<Parsed, ParseError> {
    let (front_matter, body) = split_front_matter(source);

    let mut children = Vec::new();
    let mut data = Mapping::new();
    if let Some(raw) = front_matter {
        data = parse_front_matter(raw)?;
        children.push(Node::Yaml {
            value: raw.to_string(),
        });
    }

    let mut builder = BlockBuilder::new();
    for line in body.lines() {
        builder.push(line);
    }
    children.extend(builder.finish());

    Ok(Parsed {
        root: Node::root(children),
        data,
    })
}

/// Split a leading `---` ... `---` block off the source.
fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let Some(after_open) = source
        .strip_prefix(FRONT_MATTER_FENCE)
        .and_then(|rest| rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")))
    else {
        return (None, source);
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == FRONT_MATTER_FENCE {
            let raw = after_open[..offset].trim_end_matches(['\r', '\n']);
            return (Some(raw), &after_open[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, source)
}

fn parse_front_matter(raw: &str) -> Result<Mapping, ParseError> {
    if raw.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(raw)? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(ParseError::FrontMatterNotMapping),
    }
}

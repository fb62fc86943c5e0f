//! # Transforms
//!
//! Each pass mutates a [`Document`] in place. Passes are independent of each
//! other; the order they run in is fixed by [`crate::pipeline::Pipeline`].

pub mod code_group;
pub mod code_language;
pub mod follow_export;
pub mod image_paths;
pub mod sdk_content;
pub mod sdk_filter;
pub mod tabs_syntax;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::Document;
use crate::parsing::ParseError;

pub use code_group::CodeGroupToTabs;
pub use code_language::CodeLanguage;
pub use follow_export::FollowExport;
pub use image_paths::ImagePaths;
pub use sdk_content::{SdkContentFilter, SdkScope, renders_sdk_content};
pub use sdk_filter::SdkFilter;
pub use tabs_syntax::TabsSyntax;

/// Label used when a tab or code block has nothing better.
pub const DEFAULT_LABEL: &str = "Unknown";

/// `groupId` given to every generated `Tabs` element, so tab choices sync
/// across the page.
pub const GROUP_ID: &str = "language";

/// A single in-place pass over a document.
pub trait Transform: Send + Sync {
    /// Short stable name used in logs and errors.
    fn name(&self) -> &'static str;

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError>;
}

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Failed to read exported file {path}: {source}")]
    ReadExport {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse exported file {path}: {source}")]
    ParseExport {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

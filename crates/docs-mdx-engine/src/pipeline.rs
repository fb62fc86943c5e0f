//! # Pipeline
//!
//! Runs the transforms over a document in a fixed order:
//!
//! 1. image paths
//! 2. export resolution
//! 3. fragment inclusion (left to the site's own include plugin)
//! 4. directive parsing (done by the parser)
//! 5. tabs syntax
//! 6. code language
//! 7. code group to tabs
//! 8. SDK filter
//!
//! Export resolution runs before anything that inspects content, so the SDK
//! filter sees the resolved page. Image paths run first and therefore only
//! touch the alias page itself.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::io::{FsLoader, SourceLoader};
use crate::models::{Document, Sdk};
use crate::parsing::ParseError;
use crate::transforms::{
    CodeGroupToTabs, CodeLanguage, FollowExport, ImagePaths, SdkContentFilter, SdkFilter,
    TabsSyntax, Transform, TransformError,
};

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// SDK to scope every document to. Inferred per document from its path
    /// when unset.
    pub sdk: Option<Sdk>,
    /// Resolve `<SDKContent>` blocks for this SDK as a final step.
    pub sdk_content: Option<String>,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("Stage '{stage}' failed for {path}: {source}")]
    Stage {
        stage: &'static str,
        path: PathBuf,
        #[source]
        source: TransformError,
    },
}

pub struct Pipeline {
    stages: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    /// The standard pipeline, reading re-exported files from disk.
    pub fn new(options: PipelineOptions) -> Self {
        Self::with_loader(options, FsLoader)
    }

    pub fn with_loader(options: PipelineOptions, loader: impl SourceLoader + 'static) -> Self {
        let mut stages: Vec<Box<dyn Transform>> = vec![
            Box::new(ImagePaths),
            Box::new(FollowExport::new(loader)),
            Box::new(TabsSyntax),
            Box::new(CodeLanguage),
            Box::new(CodeGroupToTabs),
            Box::new(SdkFilter::new(options.sdk)),
        ];
        if let Some(sdk) = options.sdk_content {
            stages.push(Box::new(SdkContentFilter::new(sdk)));
        }
        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Apply every stage in order. The first failure aborts the run and the
    /// document is left as the previous stages made it.
    pub fn run(&self, doc: &mut Document) -> Result<(), PipelineError> {
        for stage in &self.stages {
            log::debug!("Running {} on {}", stage.name(), doc.path().display());
            stage.apply(doc).map_err(|source| PipelineError::Stage {
                stage: stage.name(),
                path: doc.path().to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Parse `source` as the document at `path` and run the pipeline on it.
    pub fn process(&self, path: &Path, source: &str) -> Result<Document, PipelineError> {
        let mut doc = Document::parse(path, source).map_err(|source| PipelineError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        self.run(&mut doc)?;
        Ok(doc)
    }
}

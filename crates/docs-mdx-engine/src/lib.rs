pub mod io;
pub mod models;
pub mod parsing;
pub mod pipeline;
pub mod render;
pub mod transforms;
pub mod visit;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use io::*;
pub use models::*;
pub use pipeline::{Pipeline, PipelineError, PipelineOptions};
pub use render::{document_to_mdx, to_json, to_mdx};
pub use transforms::{Transform, TransformError};
pub use visit::{Action, Filter, VisitContext, visit_mut};

//! MSpec Core: run tree model, annotation passes and renderer contract
//!
//! The annotation pipeline always runs in the same order: identifiers first,
//! then failed-specification links, then not-implemented links.

pub mod annotate;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod render;

pub use annotate::{
    FailedSpecificationLinker, IdentifierAssigner, NotImplementedSpecificationLinker,
    TreeAnnotator,
};
pub use error::ReportError;
pub use model::{
    Assembly, Context, Failure, Meta, NavigationLink, Run, Specification, Status, Summary,
};
pub use pipeline::{AnnotationPipeline, PassRecord};
pub use render::{Renderer, Resource};

//! Error types for the passes.

use retarget_model::ModelError;
use retarget_syntax::{NodeId, ReadError};

/// Failure while lowering a body. Always fatal for the current run.
#[derive(Debug, thiserror::Error)]
pub enum LowerError {
    #[error("unsupported construct `{kind}` at node {node} in {context}")]
    Unsupported {
        kind: String,
        node: NodeId,
        context: String,
    },

    #[error("cannot hoist side effects out of {construct} in {context}")]
    UnsupportedHoist {
        construct: &'static str,
        context: String,
    },

    #[error("no {what} at index {index} in class `{class}`")]
    MissingMember {
        what: &'static str,
        class: String,
        index: usize,
    },
}

/// Failure of a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("pipeline has no stages")]
    EmptyPipeline,

    #[error("stage `{stage}` requires `{requires}` to run earlier in the pipeline")]
    MissingPrerequisite {
        stage: &'static str,
        requires: &'static str,
    },

    #[error("failed to read `{document}`: {source}")]
    Read {
        document: String,
        #[source]
        source: ReadError,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Lower(#[from] LowerError),
}

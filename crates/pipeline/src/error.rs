//! Pipeline error taxonomy.
//!
//! - [`ConfigurationError`]: the stage list is malformed; raised by
//!   [`Pipeline::new`](crate::Pipeline::new), never mid-run.
//! - [`PipelineError::MissingDependency`]: a required input is unset at run
//!   time. Construction checks make this unreachable; seeing it means a bug.
//! - [`PipelineError::ContractViolation`]: a stage returned outputs that do not
//!   match its declaration.
//! - [`PipelineError::StageFailed`]: the stage's own handler failed.
//!
//! All of them abort the invocation.

use thiserror::Error;

use crate::stage::StageError;

/// The stage list handed to [`Pipeline::new`](crate::Pipeline::new) is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("pipeline has no stages")]
    EmptyPipeline,

    #[error("stage name '{0}' is used more than once")]
    DuplicateStageName(String),

    #[error("slot '{slot}' is declared as output by both '{first}' and '{second}'")]
    DuplicateOutputSlot {
        slot: String,
        first: String,
        second: String,
    },

    #[error("stage '{stage}' declares the reserved input slot '{slot}' as an output")]
    OutputShadowsInput { stage: String, slot: String },

    #[error("stage '{stage}' requires slot '{slot}', which no earlier stage produces")]
    UnsatisfiedInput { stage: String, slot: String },
}

/// How a stage's update disagreed with its declared outputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("returned undeclared slot '{slot}'")]
    UndeclaredOutput { slot: String },

    #[error("did not return declared slot '{slot}'")]
    MissingOutput { slot: String },

    #[error("tried to overwrite slot '{slot}'")]
    AlreadyWritten { slot: String },
}

/// Errors surfaced by [`Pipeline`](crate::Pipeline).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid pipeline configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("stage '{stage}' is missing required input slot '{slot}'")]
    MissingDependency { stage: String, slot: String },

    #[error("stage '{stage}' violated its output contract: {violation}")]
    ContractViolation {
        stage: String,
        violation: ContractViolation,
    },

    #[error("stage '{stage}' failed: {source}")]
    StageFailed {
        stage: String,
        #[source]
        source: StageError,
    },
}

impl PipelineError {
    /// The stage the error is attributed to, if any.
    pub fn stage(&self) -> Option<&str> {
        match self {
            Self::Configuration(_) => None,
            Self::MissingDependency { stage, .. }
            | Self::ContractViolation { stage, .. }
            | Self::StageFailed { stage, .. } => Some(stage),
        }
    }

    /// Downcast the failing stage's own error, if this is a stage failure.
    pub fn stage_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::StageFailed { source, .. } => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}

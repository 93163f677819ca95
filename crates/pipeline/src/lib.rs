//! Sequential agent pipeline.
//!
//! A [`Pipeline`] is a fixed, ordered list of stages. Every invocation creates
//! one [`Record`] holding the input payload, then runs each stage exactly once
//! in declared order. A stage sees only the slots it declared as inputs and
//! must return exactly the slots it declared as outputs. Each slot is owned by
//! one stage and written once.
//!
//! ```text
//! input ──▶ classifier ──▶ keywords ──▶ summarizer ──▶ Record
//!            category       keywords     summary
//! ```
//!
//! Stage wiring is checked once, in [`Pipeline::new`]: duplicate slot owners
//! and inputs nobody upstream produces are rejected before anything runs.
//! At run time any failure aborts the invocation and no partial record is
//! returned.

pub mod error;
pub mod graph;
pub mod pipeline;
pub mod record;
pub mod slot;
pub mod stage;

pub use error::{ConfigurationError, ContractViolation, PipelineError};
pub use graph::render_mermaid;
pub use pipeline::Pipeline;
pub use record::{Record, SlotAccessError, SlotView, StageUpdate};
pub use slot::{INPUT_SLOT, SlotValue};
pub use stage::{FnStage, StageDescriptor, StageError, StageHandler};

//! Stage descriptors and the handler trait stages implement.

use async_trait::async_trait;
use std::sync::Arc;

use crate::record::{SlotView, StageUpdate};

/// Error a stage handler may return. Passed through to the caller inside
/// [`PipelineError::StageFailed`](crate::PipelineError::StageFailed).
pub type StageError = Box<dyn std::error::Error + Send + Sync>;

/// The processing function of a stage.
///
/// Receives a view limited to the stage's declared inputs and returns the
/// values for exactly its declared outputs. Handlers may block on external
/// calls; the pipeline awaits them without a timeout of its own.
#[async_trait]
pub trait StageHandler: Send + Sync {
    async fn process(&self, inputs: SlotView<'_>) -> Result<StageUpdate, StageError>;
}

/// Adapts a synchronous closure into a [`StageHandler`].
pub struct FnStage<F>(pub F);

#[async_trait]
impl<F> StageHandler for FnStage<F>
where
    F: Fn(SlotView<'_>) -> Result<StageUpdate, StageError> + Send + Sync,
{
    async fn process(&self, inputs: SlotView<'_>) -> Result<StageUpdate, StageError> {
        (self.0)(inputs)
    }
}

/// Static description of one stage: its name, the slots it reads, the slots
/// it writes, and the handler that does the work.
#[derive(Clone)]
pub struct StageDescriptor {
    name: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    handler: Arc<dyn StageHandler>,
}

impl StageDescriptor {
    pub fn new<I, O>(
        name: impl Into<String>,
        inputs: I,
        outputs: O,
        handler: impl StageHandler + 'static,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self::with_handler(name, inputs, outputs, Arc::new(handler))
    }

    /// Like [`new`](Self::new) but shares an existing handler.
    pub fn with_handler<I, O>(
        name: impl Into<String>,
        inputs: I,
        outputs: O,
        handler: Arc<dyn StageHandler>,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            name: name.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
            handler,
        }
    }

    /// A stage backed by a synchronous closure.
    pub fn from_fn<I, O, F>(name: impl Into<String>, inputs: I, outputs: O, f: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
        F: Fn(SlotView<'_>) -> Result<StageUpdate, StageError> + Send + Sync + 'static,
    {
        Self::new(name, inputs, outputs, FnStage(f))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub(crate) fn handler(&self) -> &dyn StageHandler {
        self.handler.as_ref()
    }
}

impl std::fmt::Debug for StageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageDescriptor")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[tokio::test]
    async fn fn_stage_reads_declared_input() {
        let stage = StageDescriptor::from_fn("upper", ["input"], ["shout"], |view| {
            Ok(StageUpdate::new().text("shout", view.text("input")?.to_uppercase()))
        });
        assert_eq!(stage.name(), "upper");
        assert_eq!(stage.inputs(), ["input".to_string()]);
        assert_eq!(stage.outputs(), ["shout".to_string()]);

        let record = Record::new("hey");
        let view = SlotView::new(stage.name(), &record, stage.inputs());
        let update = stage.handler().process(view).await.unwrap();
        assert_eq!(update, StageUpdate::new().text("shout", "HEY"));
    }

    #[test]
    fn debug_omits_handler() {
        let stage = StageDescriptor::from_fn("noop", Vec::<String>::new(), ["x"], |_| {
            Ok(StageUpdate::new().text("x", ""))
        });
        let debug = format!("{stage:?}");
        assert!(debug.contains("noop"));
        assert!(debug.contains(".."));
    }
}

//! Construction-time validation and sequential execution.

use chrono::Utc;
use stagecrew_core::event::{EventBus, PipelineEvent};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{ConfigurationError, ContractViolation, PipelineError};
use crate::record::{Record, SlotView, StageUpdate};
use crate::slot::INPUT_SLOT;
use crate::stage::StageDescriptor;

/// A fixed, ordered list of stages run against one record per invocation.
///
/// Built once with [`Pipeline::new`], then shared freely: [`run`](Self::run)
/// takes `&self` and every invocation owns its own [`Record`], so concurrent
/// runs need no coordination.
#[derive(Clone)]
pub struct Pipeline {
    stages: Vec<StageDescriptor>,
    event_bus: Option<Arc<EventBus>>,
}

impl Pipeline {
    /// Validate the stage list and build the pipeline.
    ///
    /// Fails if the list is empty, a stage name repeats, two stages (or one
    /// stage twice) declare the same output slot, a stage declares the
    /// reserved `input` slot as output, or a stage requires a slot that is
    /// neither the input payload nor an output of a strictly earlier stage.
    pub fn new(stages: Vec<StageDescriptor>) -> Result<Self, ConfigurationError> {
        if stages.is_empty() {
            return Err(ConfigurationError::EmptyPipeline);
        }

        let mut names = HashSet::new();
        let mut owners: HashMap<&str, &str> = HashMap::new();

        for stage in &stages {
            if !names.insert(stage.name()) {
                return Err(ConfigurationError::DuplicateStageName(stage.name().to_string()));
            }

            for slot in stage.inputs() {
                if slot != INPUT_SLOT && !owners.contains_key(slot.as_str()) {
                    return Err(ConfigurationError::UnsatisfiedInput {
                        stage: stage.name().to_string(),
                        slot: slot.clone(),
                    });
                }
            }

            for slot in stage.outputs() {
                if slot == INPUT_SLOT {
                    return Err(ConfigurationError::OutputShadowsInput {
                        stage: stage.name().to_string(),
                        slot: slot.clone(),
                    });
                }
                if let Some(first) = owners.insert(slot.as_str(), stage.name()) {
                    return Err(ConfigurationError::DuplicateOutputSlot {
                        slot: slot.clone(),
                        first: first.to_string(),
                        second: stage.name().to_string(),
                    });
                }
            }
        }

        Ok(Self {
            stages,
            event_bus: None,
        })
    }

    /// Publish progress events for every invocation on `bus`.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn stages(&self) -> &[StageDescriptor] {
        &self.stages
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false: construction rejects empty stage lists.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order against a fresh record built from `input`.
    ///
    /// Returns the complete record, or the first error. Nothing is retried and
    /// no partial record is returned. Dropping the returned future cancels the
    /// stage in flight.
    pub async fn run(&self, input: impl Into<String>) -> Result<Record, PipelineError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        let mut record = Record::new(input);

        debug!(run_id = %run_id, stages = self.stages.len(), "Pipeline run started");
        self.publish(|| PipelineEvent::RunStarted {
            run_id: run_id.clone(),
            stages: self.stages.len(),
            timestamp: Utc::now(),
        });

        for (index, stage) in self.stages.iter().enumerate() {
            if let Err(err) = self.run_stage(&run_id, index, stage, &mut record).await {
                warn!(run_id = %run_id, stage = %stage.name(), error = %err, "Pipeline run aborted");
                self.publish(|| PipelineEvent::StageFailed {
                    run_id: run_id.clone(),
                    stage: stage.name().to_string(),
                    error_message: err.to_string(),
                    timestamp: Utc::now(),
                });
                return Err(err);
            }
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            last_writer = record.last_writer().unwrap_or_default(),
            duration_ms,
            "Pipeline run completed"
        );
        self.publish(|| PipelineEvent::RunCompleted {
            run_id: run_id.clone(),
            duration_ms,
            timestamp: Utc::now(),
        });

        Ok(record)
    }

    async fn run_stage(
        &self,
        run_id: &str,
        index: usize,
        stage: &StageDescriptor,
        record: &mut Record,
    ) -> Result<(), PipelineError> {
        if let Some(slot) = stage.inputs().iter().find(|slot| !record.contains(slot)) {
            return Err(PipelineError::MissingDependency {
                stage: stage.name().to_string(),
                slot: slot.clone(),
            });
        }

        debug!(run_id = %run_id, stage = %stage.name(), index, "Stage started");
        self.publish(|| PipelineEvent::StageStarted {
            run_id: run_id.to_string(),
            stage: stage.name().to_string(),
            index,
            timestamp: Utc::now(),
        });

        let started = Instant::now();
        let view = SlotView::new(stage.name(), record, stage.inputs());
        let update = stage
            .handler()
            .process(view)
            .await
            .map_err(|source| PipelineError::StageFailed {
                stage: stage.name().to_string(),
                source,
            })?;

        check_contract(stage, &update).map_err(|violation| PipelineError::ContractViolation {
            stage: stage.name().to_string(),
            violation,
        })?;

        record
            .commit(stage.name(), update)
            .map_err(|slot| PipelineError::ContractViolation {
                stage: stage.name().to_string(),
                violation: ContractViolation::AlreadyWritten { slot },
            })?;

        let duration_ms = started.elapsed().as_millis() as u64;
        debug!(run_id = %run_id, stage = %stage.name(), duration_ms, "Stage completed");
        self.publish(|| PipelineEvent::StageCompleted {
            run_id: run_id.to_string(),
            stage: stage.name().to_string(),
            slots: stage.outputs().to_vec(),
            duration_ms,
            timestamp: Utc::now(),
        });

        Ok(())
    }

    fn publish(&self, event: impl FnOnce() -> PipelineEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event());
        }
    }
}

/// The update must contain exactly the stage's declared outputs.
fn check_contract(stage: &StageDescriptor, update: &StageUpdate) -> Result<(), ContractViolation> {
    if let Some(slot) = update
        .slot_names()
        .find(|slot| !stage.outputs().iter().any(|o| o.as_str() == *slot))
    {
        return Err(ContractViolation::UndeclaredOutput {
            slot: slot.to_string(),
        });
    }

    if let Some(slot) = stage.outputs().iter().find(|o| !update.contains(o)) {
        return Err(ContractViolation::MissingOutput { slot: slot.clone() });
    }

    Ok(())
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages)
            .field("events", &self.event_bus.is_some())
            .finish()
    }
}

//! Live per-agent progress on stderr.

use stagecrew_agents::AgentRole;
use stagecrew_core::event::{EventBus, PipelineEvent};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Print pipeline events until every sender of `bus` is dropped.
pub fn spawn(bus: &EventBus) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => render(&event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn render(event: &PipelineEvent) {
    match event {
        PipelineEvent::StageStarted { stage, .. } => match AgentRole::for_stage(stage) {
            Some(role) => {
                eprintln!();
                eprintln!("  {} is analysing...", role.title);
                eprintln!("     Specialty: {}", role.specialty);
            }
            None => eprintln!("  {stage} is running..."),
        },
        PipelineEvent::StageCompleted {
            stage, duration_ms, ..
        } => eprintln!("     done: {stage} ({duration_ms} ms)"),
        PipelineEvent::StageFailed {
            stage,
            error_message,
            ..
        } => eprintln!("     failed: {stage}: {error_message}"),
        PipelineEvent::RunStarted { .. } | PipelineEvent::RunCompleted { .. } => {}
    }
}

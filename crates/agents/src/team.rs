//! Assembly of the standard analysis team and typed access to its results.

use serde::Serialize;
use stagecrew_config::TeamConfig;
use stagecrew_core::event::EventBus;
use stagecrew_pipeline::{ConfigurationError, Pipeline, Record, SlotAccessError};
use std::sync::Arc;
use std::time::Duration;

use crate::classifier::ClassifierAgent;
use crate::generator::TextGenerator;
use crate::keywords::KeywordsAgent;
use crate::summarizer::SummarizerAgent;

/// Written by the classifier.
pub const CATEGORY_SLOT: &str = "category";
/// Written by the keywords agent.
pub const KEYWORDS_SLOT: &str = "keywords";
/// Written by the summarizer.
pub const SUMMARY_SLOT: &str = "summary";

/// Display metadata for one team member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentRole {
    pub stage: &'static str,
    pub title: &'static str,
    pub specialty: &'static str,
}

pub static ROLES: [AgentRole; 3] = [
    AgentRole {
        stage: ClassifierAgent::NAME,
        title: "Agent Classifier",
        specialty: "Text categorization",
    },
    AgentRole {
        stage: KeywordsAgent::NAME,
        title: "Agent Keywords",
        specialty: "Keyword identification",
    },
    AgentRole {
        stage: SummarizerAgent::NAME,
        title: "Agent Summarizer",
        specialty: "Summary writing",
    },
];

impl AgentRole {
    pub fn for_stage(stage: &str) -> Option<&'static AgentRole> {
        ROLES.iter().find(|r| r.stage == stage)
    }
}

/// Builds the `classifier → keywords → summarizer` pipeline.
pub struct TeamBuilder {
    generator: TextGenerator,
    team: TeamConfig,
    event_bus: Option<Arc<EventBus>>,
}

impl TeamBuilder {
    pub fn new(generator: TextGenerator) -> Self {
        Self {
            generator,
            team: TeamConfig::default(),
            event_bus: None,
        }
    }

    /// Categories, keyword count, word limit and per-agent timeout.
    pub fn with_team_config(mut self, team: &TeamConfig) -> Self {
        self.team = team.clone();
        if let Some(secs) = team.stage_timeout_secs {
            self.generator = self.generator.with_timeout(Duration::from_secs(secs));
        }
        self
    }

    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn build(self) -> Result<Pipeline, ConfigurationError> {
        let stages = vec![
            ClassifierAgent::new(self.generator.clone(), self.team.categories.clone()).into_stage(),
            KeywordsAgent::new(self.generator.clone(), self.team.keyword_count).into_stage(),
            SummarizerAgent::new(self.generator, self.team.summary_max_words).into_stage(),
        ];

        let pipeline = Pipeline::new(stages)?;
        Ok(match self.event_bus {
            Some(bus) => pipeline.with_event_bus(bus),
            None => pipeline,
        })
    }
}

/// Typed view of a record produced by the team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamReport {
    pub input: String,
    pub category: String,
    pub keywords: Vec<String>,
    pub summary: String,
    pub last_agent: String,
}

impl TeamReport {
    pub fn from_record(record: &Record) -> Result<Self, SlotAccessError> {
        let text = |slot: &str| {
            record
                .text(slot)
                .map(str::to_string)
                .ok_or_else(|| missing(slot))
        };
        Ok(Self {
            input: record.input().to_string(),
            category: text(CATEGORY_SLOT)?,
            keywords: record
                .list(KEYWORDS_SLOT)
                .map(<[String]>::to_vec)
                .ok_or_else(|| missing(KEYWORDS_SLOT))?,
            summary: text(SUMMARY_SLOT)?,
            last_agent: record.last_writer().unwrap_or_default().to_string(),
        })
    }
}

fn missing(slot: &str) -> SlotAccessError {
    SlotAccessError::Missing {
        slot: slot.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FailingProvider, SequentialMockProvider};
    use stagecrew_core::error::ProviderError;
    use stagecrew_pipeline::PipelineError;

    fn scripted(replies: [&str; 3]) -> (TeamBuilder, Arc<SequentialMockProvider>) {
        let provider = Arc::new(SequentialMockProvider::new(replies));
        let generator = TextGenerator::new(provider.clone(), "mock-model");
        (TeamBuilder::new(generator), provider)
    }

    #[test]
    fn builds_three_stages_in_order() {
        let (builder, _) = scripted(["a", "b", "c"]);
        let pipeline = builder.build().unwrap();
        assert_eq!(pipeline.stage_names(), vec!["classifier", "keywords", "summarizer"]);
    }

    #[tokio::test]
    async fn product_launch_scenario() {
        let (builder, provider) =
            scripted(["Marketing", "product, launch", "Product launch announced."]);
        let pipeline = builder.build().unwrap();

        let record = pipeline.run("short news about a product launch").await.unwrap();

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({
                "input": "short news about a product launch",
                "category": "Marketing",
                "keywords": ["product", "launch"],
                "summary": "Product launch announced."
            })
        );
        assert_eq!(provider.call_count(), 3);

        let prompts = provider.prompts();
        assert!(prompts[1].contains("Category already identified: Marketing"));
        assert!(prompts[2].contains("- Keywords: product, launch"));

        let report = TeamReport::from_record(&record).unwrap();
        assert_eq!(report.category, "Marketing");
        assert_eq!(report.last_agent, "summarizer");
    }

    #[tokio::test]
    async fn team_config_controls_prompts() {
        let (builder, provider) = scripted(["Sports", "goal, final", "Team wins the final."]);
        let team = TeamConfig {
            categories: vec!["Sports".into(), "Politics".into()],
            keyword_count: 2,
            summary_max_words: 8,
            stage_timeout_secs: Some(30),
        };
        let pipeline = builder.with_team_config(&team).build().unwrap();
        pipeline.run("The final ended 2-1.").await.unwrap();

        let prompts = provider.prompts();
        assert!(prompts[0].contains("- Sports\n- Politics\n"));
        assert!(prompts[1].contains("the 2 most important keywords"));
        assert!(prompts[2].contains("at most 8 words"));
    }

    #[tokio::test]
    async fn provider_failure_names_first_stage() {
        let generator = TextGenerator::new(Arc::new(FailingProvider::unreachable()), "m");
        let pipeline = TeamBuilder::new(generator).build().unwrap();

        let err = pipeline.run("anything").await.unwrap_err();
        assert_eq!(err.stage(), Some("classifier"));
        assert!(matches!(err, PipelineError::StageFailed { .. }));
        assert!(matches!(
            err.stage_source::<ProviderError>(),
            Some(ProviderError::Network(_))
        ));
    }

    #[test]
    fn report_requires_all_slots() {
        let record = Record::new("only input");
        let err = TeamReport::from_record(&record).unwrap_err();
        assert_eq!(
            err,
            SlotAccessError::Missing {
                slot: CATEGORY_SLOT.into()
            }
        );
    }

    #[test]
    fn roles_cover_every_stage() {
        for name in ["classifier", "keywords", "summarizer"] {
            assert!(AgentRole::for_stage(name).is_some(), "no role for {name}");
        }
        assert!(AgentRole::for_stage("unknown").is_none());
    }
}

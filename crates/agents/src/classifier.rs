//! The classifier agent: assigns one category to the input text.

use async_trait::async_trait;
use stagecrew_pipeline::{INPUT_SLOT, SlotView, StageDescriptor, StageError, StageHandler, StageUpdate};
use stagecrew_core::error::ProviderError;
use tracing::info;

use crate::generator::TextGenerator;
use crate::team::CATEGORY_SLOT;

pub struct ClassifierAgent {
    generator: TextGenerator,
    categories: Vec<String>,
}

impl ClassifierAgent {
    pub const NAME: &'static str = "classifier";

    pub fn new(generator: TextGenerator, categories: Vec<String>) -> Self {
        Self {
            generator,
            categories,
        }
    }

    /// Reads `input`, writes `category`.
    pub fn into_stage(self) -> StageDescriptor {
        StageDescriptor::new(Self::NAME, [INPUT_SLOT], [CATEGORY_SLOT], self)
    }

    pub fn prompt(&self, text: &str) -> String {
        let options: String = self
            .categories
            .iter()
            .map(|c| format!("- {c}\n"))
            .collect();
        format!(
            "You are an expert in text classification.\n\
             Your only task is to identify the category of the text.\n\n\
             Classify the text into ONE of these categories:\n\
             {options}\n\
             Text to analyse:\n\
             {text}\n\n\
             Answer with the category only:"
        )
    }

    /// Map the model's reply onto a configured category when it names one,
    /// ignoring case, quotes and trailing punctuation. Other replies are kept
    /// as written. A reply that is nothing but punctuation is an empty response.
    pub fn normalize(&self, reply: &str) -> Result<String, ProviderError> {
        let cleaned = reply
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '*')
            .trim_end_matches('.')
            .trim();
        let cleaned = cleaned
            .strip_prefix("Category:")
            .map(str::trim)
            .unwrap_or(cleaned);
        if cleaned.is_empty() {
            return Err(ProviderError::EmptyResponse(format!(
                "no category in reply {reply:?}"
            )));
        }

        Ok(self
            .categories
            .iter()
            .find(|c| c.eq_ignore_ascii_case(cleaned))
            .cloned()
            .unwrap_or_else(|| cleaned.to_string()))
    }
}

#[async_trait]
impl StageHandler for ClassifierAgent {
    async fn process(&self, inputs: SlotView<'_>) -> Result<StageUpdate, StageError> {
        let text = inputs.text(INPUT_SLOT)?;
        let reply = self.generator.generate(&self.prompt(text)).await?;
        let category = self.normalize(&reply)?;

        info!(stage = Self::NAME, category = %category, "Category identified");
        Ok(StageUpdate::new().text(CATEGORY_SLOT, category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::SequentialMockProvider;
    use stagecrew_pipeline::Pipeline;
    use std::sync::Arc;

    fn agent(reply: &str) -> (ClassifierAgent, Arc<SequentialMockProvider>) {
        let provider = Arc::new(SequentialMockProvider::new([reply]));
        let generator = TextGenerator::new(provider.clone(), "mock-model");
        let categories = vec!["News".to_string(), "Marketing".to_string(), "Other".to_string()];
        (ClassifierAgent::new(generator, categories), provider)
    }

    #[test]
    fn prompt_lists_categories_and_text() {
        let (agent, _) = agent("News");
        let prompt = agent.prompt("The central bank raised rates.");
        assert!(prompt.contains("- News\n- Marketing\n- Other\n"));
        assert!(prompt.contains("The central bank raised rates."));
        assert!(prompt.ends_with("Answer with the category only:"));
    }

    #[test]
    fn normalize_matches_configured_spelling() {
        let (agent, _) = agent("x");
        assert_eq!(agent.normalize("marketing.").unwrap(), "Marketing");
        assert_eq!(agent.normalize("\"NEWS\"").unwrap(), "News");
        assert_eq!(agent.normalize("Category: other").unwrap(), "Other");
        assert_eq!(agent.normalize("Sports\nbecause it mentions a match").unwrap(), "Sports");
    }

    #[test]
    fn punctuation_only_reply_is_empty() {
        let (agent, _) = agent("x");
        assert!(matches!(agent.normalize("**"), Err(ProviderError::EmptyResponse(_))));
        assert!(matches!(agent.normalize("Category: ."), Err(ProviderError::EmptyResponse(_))));
    }

    #[tokio::test]
    async fn punctuation_only_reply_fails_the_stage() {
        let (agent, _) = agent("**");
        let pipeline = Pipeline::new(vec![agent.into_stage()]).unwrap();

        let err = pipeline.run("some text").await.unwrap_err();
        assert_eq!(err.stage(), Some(ClassifierAgent::NAME));
        assert!(matches!(
            err.stage_source::<ProviderError>(),
            Some(ProviderError::EmptyResponse(_))
        ));
    }

    #[tokio::test]
    async fn writes_category_slot() {
        let (agent, provider) = agent(" Marketing ");
        let pipeline = Pipeline::new(vec![agent.into_stage()]).unwrap();

        let record = pipeline.run("short news about a product launch").await.unwrap();
        assert_eq!(record.text(CATEGORY_SLOT), Some("Marketing"));
        assert_eq!(record.last_writer(), Some(ClassifierAgent::NAME));
        assert!(provider.prompts()[0].contains("short news about a product launch"));
    }
}

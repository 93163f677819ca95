//! The summarizer agent: condenses the text using the earlier agents' work.

use async_trait::async_trait;
use stagecrew_pipeline::{INPUT_SLOT, SlotView, StageDescriptor, StageError, StageHandler, StageUpdate};
use tracing::{info, warn};

use crate::generator::TextGenerator;
use crate::team::{CATEGORY_SLOT, KEYWORDS_SLOT, SUMMARY_SLOT};

pub struct SummarizerAgent {
    generator: TextGenerator,
    max_words: usize,
}

impl SummarizerAgent {
    pub const NAME: &'static str = "summarizer";

    pub fn new(generator: TextGenerator, max_words: usize) -> Self {
        Self {
            generator,
            max_words,
        }
    }

    /// Reads `input`, `category` and `keywords`, writes `summary`.
    pub fn into_stage(self) -> StageDescriptor {
        StageDescriptor::new(
            Self::NAME,
            [INPUT_SLOT, CATEGORY_SLOT, KEYWORDS_SLOT],
            [SUMMARY_SLOT],
            self,
        )
    }

    pub fn prompt(&self, text: &str, category: &str, keywords: &[String]) -> String {
        let max_words = self.max_words;
        let keywords = keywords.join(", ");
        format!(
            "You are an expert in writing concise summaries.\n\
             Your task is to summarise the text in at most {max_words} words.\n\n\
             Information from the other agents:\n\
             - Category: {category}\n\
             - Keywords: {keywords}\n\n\
             Text to summarise:\n\
             {text}\n\n\
             Write a summary of at most {max_words} words that captures the essence:"
        )
    }

    /// Strip wrapping quotes and a leading "Summary:" label.
    pub fn clean(reply: &str) -> String {
        let reply = reply.trim();
        let reply = reply
            .strip_prefix("Summary:")
            .map(str::trim)
            .unwrap_or(reply);
        reply.trim_matches('"').trim().to_string()
    }
}

#[async_trait]
impl StageHandler for SummarizerAgent {
    async fn process(&self, inputs: SlotView<'_>) -> Result<StageUpdate, StageError> {
        let text = inputs.text(INPUT_SLOT)?;
        let category = inputs.text(CATEGORY_SLOT)?;
        let keywords = inputs.list(KEYWORDS_SLOT)?;

        let reply = self
            .generator
            .generate(&self.prompt(text, category, keywords))
            .await?;
        let summary = Self::clean(&reply);

        let words = summary.split_whitespace().count();
        if words > self.max_words {
            warn!(
                stage = Self::NAME,
                words,
                limit = self.max_words,
                "Summary exceeds word limit"
            );
        }

        info!(stage = Self::NAME, summary = %summary, "Summary written");
        Ok(StageUpdate::new().text(SUMMARY_SLOT, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::SequentialMockProvider;
    use std::sync::Arc;

    #[test]
    fn prompt_carries_previous_results() {
        let provider = Arc::new(SequentialMockProvider::new(Vec::<String>::new()));
        let agent = SummarizerAgent::new(TextGenerator::new(provider, "m"), 15);
        let keywords = vec!["product".to_string(), "launch".to_string()];

        let prompt = agent.prompt("short news about a product launch", "Marketing", &keywords);
        assert!(prompt.contains("at most 15 words"));
        assert!(prompt.contains("- Category: Marketing"));
        assert!(prompt.contains("- Keywords: product, launch"));
        assert!(prompt.contains("short news about a product launch"));
    }

    #[test]
    fn clean_strips_label_and_quotes() {
        assert_eq!(
            SummarizerAgent::clean("Summary: \"Product launch announced.\""),
            "Product launch announced."
        );
        assert_eq!(SummarizerAgent::clean("  Plain text. "), "Plain text.");
    }
}

//! The keywords agent: extracts the most important terms of the text.

use async_trait::async_trait;
use stagecrew_pipeline::{INPUT_SLOT, SlotView, StageDescriptor, StageError, StageHandler, StageUpdate};
use tracing::info;

use crate::generator::TextGenerator;
use crate::team::{CATEGORY_SLOT, KEYWORDS_SLOT};

pub struct KeywordsAgent {
    generator: TextGenerator,
    count: usize,
}

impl KeywordsAgent {
    pub const NAME: &'static str = "keywords";

    pub fn new(generator: TextGenerator, count: usize) -> Self {
        Self { generator, count }
    }

    /// Reads `input` and `category`, writes `keywords`.
    pub fn into_stage(self) -> StageDescriptor {
        StageDescriptor::new(
            Self::NAME,
            [INPUT_SLOT, CATEGORY_SLOT],
            [KEYWORDS_SLOT],
            self,
        )
    }

    pub fn prompt(&self, text: &str, category: &str) -> String {
        let count = self.count;
        format!(
            "You are an expert in keyword analysis.\n\
             Your task is to find the {count} most important keywords of the text.\n\n\
             Category already identified: {category}\n\n\
             Text to analyse:\n\
             {text}\n\n\
             Extract exactly {count} important keywords, separated by commas.\n\
             Focus on: main concepts, important names, technologies, places.\n\n\
             Keywords:"
        )
    }

    /// Split a reply into at most `count` keywords. Accepts comma or line
    /// separated lists, with or without bullets or numbering.
    pub fn parse(&self, reply: &str) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();
        for item in reply.split([',', '\n']) {
            let item = strip_list_marker(item.trim())
                .trim_matches('"')
                .trim_end_matches('.')
                .trim();
            if item.is_empty() || keywords.iter().any(|k| k.eq_ignore_ascii_case(item)) {
                continue;
            }
            keywords.push(item.to_string());
            if keywords.len() == self.count {
                break;
            }
        }
        keywords
    }
}

/// Remove a leading bullet (`-`, `*`, `•`) or number (`1.`, `2)`).
fn strip_list_marker(item: &str) -> &str {
    if let Some(rest) = item.strip_prefix(['-', '*', '•']) {
        return rest.trim_start();
    }
    let digits = item.len() - item.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = item[digits..].strip_prefix(['.', ')']) {
            return rest.trim_start();
        }
    }
    item
}

#[async_trait]
impl StageHandler for KeywordsAgent {
    async fn process(&self, inputs: SlotView<'_>) -> Result<StageUpdate, StageError> {
        let text = inputs.text(INPUT_SLOT)?;
        let category = inputs.text(CATEGORY_SLOT)?;
        let reply = self.generator.generate(&self.prompt(text, category)).await?;
        let keywords = self.parse(&reply);

        info!(stage = Self::NAME, keywords = ?keywords, "Keywords extracted");
        Ok(StageUpdate::new().list(KEYWORDS_SLOT, keywords))
    }
}

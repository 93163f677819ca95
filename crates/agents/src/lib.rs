//! The text-analysis team.
//!
//! Three specialist agents run as stages of one
//! [`Pipeline`](stagecrew_pipeline::Pipeline):
//!
//! 1. **Classifier** — picks one category for the text
//! 2. **Keywords** — extracts the most important terms, knowing the category
//! 3. **Summarizer** — writes a short summary using both previous results
//!
//! Each agent turns its inputs into a prompt, sends it through a
//! [`TextGenerator`], and parses the reply into its output slot.

pub mod classifier;
pub mod generator;
pub mod keywords;
pub mod samples;
pub mod summarizer;
pub mod team;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use classifier::ClassifierAgent;
pub use generator::TextGenerator;
pub use keywords::KeywordsAgent;
pub use samples::{SAMPLES, SampleText};
pub use summarizer::SummarizerAgent;
pub use team::{
    AgentRole, CATEGORY_SLOT, KEYWORDS_SLOT, ROLES, SUMMARY_SLOT, TeamBuilder, TeamReport,
};

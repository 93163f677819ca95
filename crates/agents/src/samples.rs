//! Built-in sample texts for demos.

/// A labelled example text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleText {
    /// The category a reader would expect.
    pub label: &'static str,
    pub text: &'static str,
}

pub const SAMPLES: [SampleText; 4] = [
    SampleText {
        label: "News",
        text: "OpenAI has released ChatGPT-4, a new version of its language model that \
               promises to change how we interact with artificial intelligence. The model \
               brings significant improvements in reasoning, creativity and multimodal \
               capabilities, processing both text and images. The company expects the \
               technology to have a positive impact on many sectors, from education to \
               software development.",
    },
    SampleText {
        label: "Personal Blog",
        text: "I woke up early today and went for a run in the park. The day was beautiful \
               and I managed 5km. I feel great after the exercise and ready for another \
               productive day of work.",
    },
    SampleText {
        label: "News",
        text: "The government announced new economic measures today to fight inflation. \
               The Central Bank is expected to raise the benchmark interest rate at the \
               next monetary policy meeting.",
    },
    SampleText {
        label: "Technical Article",
        text: "Machine learning is a subfield of artificial intelligence that lets systems \
               learn automatically without being explicitly programmed. Algorithms such as \
               random forests and neural networks are widely used.",
    },
];

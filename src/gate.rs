//! Decides, from the question text alone, whether tools are offered to the
//! model for a turn. Plain keyword matching so it stays easy to audit: a
//! missed time-sensitive question costs less than tool machinery on every
//! general-knowledge one.

/// Words that hint the answer depends on when it is asked.
const TRIGGERS: &[&str] = &[
    // recency and time
    "today",
    "tonight",
    "now",
    "current",
    "latest",
    "recent",
    "yesterday",
    "tomorrow",
    "date",
    "what time",
    "this week",
    "this month",
    "this year",
    "2025",
    "2026",
    // news and events
    "news",
    "headline",
    "happened",
    "breaking",
    "release",
    "version",
    "updated",
    // facts that go stale
    "weather",
    "score",
    "price",
    "cost",
    "stock",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    pub use_tools: bool,
    /// How many tools go out with the first request.
    pub tool_count: usize,
}

impl GateDecision {
    pub fn evaluate(question: &str, available_tools: usize) -> Self {
        let use_tools = should_use_tools(question);
        Self {
            use_tools,
            tool_count: if use_tools { available_tools } else { 0 },
        }
    }
}

pub fn should_use_tools(question: &str) -> bool {
    let lowered = question.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    TRIGGERS.iter().any(|trigger| contains_phrase(&words, trigger))
}

fn contains_phrase(words: &[&str], phrase: &str) -> bool {
    let parts: Vec<&str> = phrase.split(' ').collect();
    words.windows(parts.len()).any(|window| {
        window
            .iter()
            .zip(&parts)
            .all(|(word, part)| word_matches(word, part))
    })
}

// a trailing plural still counts: "prices", "scores", "headlines"
fn word_matches(word: &str, trigger: &str) -> bool {
    word == trigger || word.strip_suffix('s') == Some(trigger)
}

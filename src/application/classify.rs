use crate::domain::knowledge::KnowledgeBase;
use crate::domain::model::{AnswerSource, Language, ResolvedAnswer, Topic};

/// Lowercase the question and split it into tokens at whitespace, ASCII
/// punctuation and the Devanagari danda ("crop-damage" is two tokens).
fn tokenize(question: &str) -> (String, Vec<String>) {
    let normalized = question.to_lowercase();
    let tokens = normalized
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation() || c == '।' || c == '॥')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    (normalized, tokens)
}

fn matches_any(normalized: &str, tokens: &[String], words: &[String]) -> bool {
    words.iter().any(|word| {
        if word.contains(char::is_whitespace) {
            normalized.contains(word.as_str())
        } else {
            tokens.iter().any(|t| t.starts_with(word.as_str()))
        }
    })
}

/// Classify a question into a topic.
///
/// Topic keyword sets are tested in [`Topic::PRIORITY`] order and the first
/// hit wins. Crop names and generic crop nouns only count when no keyword
/// matched, so "rice" alone is a crop question but "what pest is attacking
/// my cotton" is a pest question.
pub fn classify(question: &str, knowledge: &KnowledgeBase) -> Topic {
    let (normalized, tokens) = tokenize(question);

    for topic in Topic::PRIORITY {
        if matches_any(&normalized, &tokens, knowledge.keywords(topic)) {
            return topic;
        }
    }

    if matches_any(&normalized, &tokens, &knowledge.crop_terms) {
        return Topic::Crop;
    }

    Topic::Default
}

/// Answer a question from the knowledge base alone. Never fails.
pub fn fallback_answer(
    question: &str,
    language: Language,
    knowledge: &KnowledgeBase,
) -> ResolvedAnswer {
    let topic = classify(question, knowledge);
    tracing::debug!("Offline classification: topic={} language={}", topic, language);

    ResolvedAnswer {
        text: knowledge.response(topic, language).to_string(),
        source: AnswerSource::Fallback(topic),
    }
}

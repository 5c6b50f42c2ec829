// In-memory answer cache using DashMap
use crate::domain::model::{Language, Question, ResolvedAnswer};
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe memo of backend answers keyed by (language, question).
///
/// Only answers that came from a backend are stored; offline answers are
/// recomputed on every call.
#[derive(Clone, Default)]
pub struct AnswerCache {
    map: Arc<DashMap<(Language, String), ResolvedAnswer>>,
}

impl AnswerCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(question: &Question) -> (Language, String) {
        (question.language(), question.text().trim().to_string())
    }

    pub fn get(&self, question: &Question) -> Option<ResolvedAnswer> {
        self.map
            .get(&Self::key(question))
            .map(|entry| entry.value().clone())
    }

    pub fn insert(&self, question: &Question, answer: ResolvedAnswer) {
        if answer.used_fallback() {
            return;
        }
        self.map.insert(Self::key(question), answer);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

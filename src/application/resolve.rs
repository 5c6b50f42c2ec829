use crate::application::classify::fallback_answer;
use crate::application::prompt::build_prompt;
use crate::domain::error::BackendError;
use crate::domain::knowledge::KnowledgeBase;
use crate::domain::model::{AnswerSource, ProviderKind, ProviderSettings, Question, ResolvedAnswer};
use crate::domain::traits::Backend;
use crate::infrastructure::storage::cache::AnswerCache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Picks the backend that answers a question.
///
/// Backends are kept in registration order. The preferred kind is tried first
/// if it is available, otherwise the first other available backend.
/// Availability is read once, at construction.
#[derive(Clone)]
pub struct ProviderSelector {
    backends: Vec<Arc<dyn Backend>>,
    settings: ProviderSettings,
}

impl ProviderSelector {
    pub fn new(backends: Vec<Arc<dyn Backend>>, preferred: ProviderKind) -> Self {
        let available = backends
            .iter()
            .map(|b| (b.kind(), b.is_available()))
            .collect();
        Self {
            backends,
            settings: ProviderSettings {
                active: preferred,
                available,
            },
        }
    }

    pub fn preferred(&self) -> ProviderKind {
        self.settings.active
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    pub fn backends(&self) -> &[Arc<dyn Backend>] {
        &self.backends
    }

    pub fn select(&self) -> Option<&Arc<dyn Backend>> {
        let usable = |b: &&Arc<dyn Backend>| self.settings.is_available(b.kind());
        self.backends
            .iter()
            .filter(usable)
            .find(|b| b.kind() == self.settings.active)
            .or_else(|| self.backends.iter().find(usable))
    }

    /// One attempt against the selected backend, bounded by `timeout`.
    pub async fn generate(
        &self,
        prompt: &str,
        timeout: Duration,
    ) -> Result<(ProviderKind, String), BackendError> {
        let backend = self.select().ok_or(BackendError::Unavailable)?;
        let kind = backend.kind();
        if kind != self.settings.active {
            info!("Preferred provider {} unavailable, using {}", self.settings.active, kind);
        }

        let raw = tokio::time::timeout(timeout, backend.generate(prompt))
            .await
            .map_err(|_| BackendError::Timeout(timeout))??;

        let text = raw.trim();
        if text.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok((kind, text.to_string()))
    }
}

/// Entry point for web, SMS and CLI callers.
///
/// Always yields an answer: backend failures of any kind are logged and the
/// offline knowledge base answers instead.
#[derive(Clone)]
pub struct AnswerResolver {
    selector: ProviderSelector,
    knowledge: Arc<KnowledgeBase>,
    timeout: Duration,
    cache: Option<AnswerCache>,
}

impl AnswerResolver {
    pub fn new(selector: ProviderSelector, knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            selector,
            knowledge,
            timeout: DEFAULT_TIMEOUT,
            cache: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Remember backend answers for identical (question, language) pairs.
    pub fn with_cache(mut self, cache: AnswerCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn selector(&self) -> &ProviderSelector {
        &self.selector
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn cache(&self) -> Option<&AnswerCache> {
        self.cache.as_ref()
    }

    pub async fn resolve_answer(&self, question: &Question) -> ResolvedAnswer {
        self.resolve_answer_within(question, self.timeout).await
    }

    pub async fn resolve_answer_within(
        &self,
        question: &Question,
        timeout: Duration,
    ) -> ResolvedAnswer {
        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(question)) {
            debug!("Answer cache hit");
            return hit;
        }

        let prompt = build_prompt(question);
        match self.selector.generate(&prompt, timeout).await {
            Ok((kind, text)) => {
                let answer = ResolvedAnswer {
                    text,
                    source: AnswerSource::Provider(kind),
                };
                if let Some(cache) = &self.cache {
                    cache.insert(question, answer.clone());
                }
                answer
            }
            Err(e) => {
                warn!("AI backend failed, answering offline: {}", e);
                self.answer_offline(question)
            }
        }
    }

    /// Skip the backends entirely.
    pub fn answer_offline(&self, question: &Question) -> ResolvedAnswer {
        fallback_answer(question.text(), question.language(), &self.knowledge)
    }
}

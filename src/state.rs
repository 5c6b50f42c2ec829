use crate::application::resolve::{AnswerResolver, ProviderSelector};
use crate::domain::error::KrishiError;
use crate::domain::knowledge::KnowledgeBase;
use crate::domain::model::ProviderKind;
use crate::domain::traits::Backend;
use crate::infrastructure::config::Config;
use crate::infrastructure::network::gemini::GeminiBackend;
use crate::infrastructure::network::http::create_client;
use crate::infrastructure::network::openai::OpenAiBackend;
use crate::infrastructure::network::weather::WeatherClient;
use crate::infrastructure::storage::cache::AnswerCache;
use crate::infrastructure::storage::db::{SqliteConversationStore, SqliteGuideStore};
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use tokio_rusqlite::Connection;

#[derive(Clone)]
pub struct AppState {
    pub store: SqliteConversationStore,
    pub guides: SqliteGuideStore,
    pub resolver: Arc<AnswerResolver>,
    pub weather: Arc<WeatherClient>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Connection, config: Config) -> Result<Self, KrishiError> {
        let http_client = create_client()?;
        let resolver = build_resolver(&config, http_client.clone())?;
        let weather = WeatherClient::new(http_client, &config.weather);

        Ok(Self {
            store: SqliteConversationStore::new(db.clone()),
            guides: SqliteGuideStore::new(db),
            resolver: Arc::new(resolver),
            weather: Arc::new(weather),
            config: Arc::new(config),
        })
    }
}

/// Wire the backends, knowledge base and cache described by `config`.
pub fn build_resolver(config: &Config, client: Client) -> Result<AnswerResolver, KrishiError> {
    let backends: Vec<Arc<dyn Backend>> = vec![
        Arc::new(GeminiBackend::new(client.clone(), &config.gemini)),
        Arc::new(OpenAiBackend::new(client, &config.openai)),
    ];

    let selector = ProviderSelector::new(backends, config.active_provider());
    let settings = selector.settings();
    tracing::info!(
        "AI provider: {} (gemini available: {}, openai available: {})",
        settings.active,
        settings.is_available(ProviderKind::Gemini),
        settings.is_available(ProviderKind::OpenAi),
    );

    let knowledge = match config.knowledge_path.as_deref().filter(|p| !p.is_empty()) {
        Some(path) => KnowledgeBase::load(Path::new(path))?,
        None => KnowledgeBase::builtin(),
    };

    let mut resolver =
        AnswerResolver::new(selector, Arc::new(knowledge)).with_timeout(config.timeout());
    if config.ai.cache_answers {
        resolver = resolver.with_cache(AnswerCache::new());
    }

    Ok(resolver)
}

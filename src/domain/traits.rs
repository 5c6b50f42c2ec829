use crate::domain::error::{BackendError, KrishiError};
use crate::domain::model::{
    Conversation, CropFilter, CropGuide, Language, PestFilter, PestInfo, ProviderKind, WeatherTip,
};
use async_trait::async_trait;

/// A generative text backend.
///
/// Implementations are swapped in and out of the resolver's preference list
/// without changing how a backend is chosen.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Which provider this backend talks to
    fn kind(&self) -> ProviderKind;

    /// Whether credentials/client are in place. Checked before every call.
    fn is_available(&self) -> bool;

    /// Send a fully built prompt and return the raw completion text
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Trait for the conversation log
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn save_conversation(
        &self,
        user_id: &str,
        question: &str,
        answer: &str,
        language: Language,
        used_fallback: bool,
    ) -> Result<i64, KrishiError>;

    /// Most recent conversations for a user, newest first
    async fn recent_conversations(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Conversation>, KrishiError>;
}

/// Read side of the structured farming guides
#[async_trait]
pub trait FarmGuideStore: Send + Sync {
    async fn crop_guidance(&self, filter: &CropFilter) -> Result<Vec<CropGuide>, KrishiError>;

    async fn pest_info(&self, filter: &PestFilter) -> Result<Vec<PestInfo>, KrishiError>;

    /// All tips when `condition` is `None`, else those whose condition contains it
    async fn weather_tips(&self, condition: Option<&str>) -> Result<Vec<WeatherTip>, KrishiError>;
}

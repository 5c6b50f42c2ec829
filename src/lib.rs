//! KrishiAI: answers farmers' questions in six Indian languages.
//!
//! Questions go to a generative backend (Gemini or OpenAI) chosen from the
//! configuration. If no backend answers, a keyword classifier picks a canned
//! reply from the offline knowledge base, so callers always get text back.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod state;

pub use application::resolve::{AnswerResolver, ProviderSelector};
pub use domain::error::{BackendError, KrishiError};
pub use domain::knowledge::KnowledgeBase;
pub use domain::model::{AnswerSource, Language, ProviderKind, Question, ResolvedAnswer, Topic};
pub use domain::traits::{Backend, ConversationStore, FarmGuideStore};

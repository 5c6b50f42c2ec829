use crate::domain::error::KrishiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// 支持的语言
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Kannada,
    Tamil,
    Telugu,
    Marathi,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::Hindi,
        Language::Kannada,
        Language::Tamil,
        Language::Telugu,
        Language::Marathi,
    ];

    /// Lowercase tag used in config files and the conversation log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
            Language::Kannada => "kannada",
            Language::Tamil => "tamil",
            Language::Telugu => "telugu",
            Language::Marathi => "marathi",
        }
    }

    /// ISO 639-1 locale code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Kannada => "kn",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Marathi => "mr",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Kannada => "Kannada",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Marathi => "Marathi",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिंदी",
            Language::Kannada => "ಕನ್ನಡ",
            Language::Tamil => "தமிழ்",
            Language::Telugu => "తెలుగు",
            Language::Marathi => "मराठी",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Lenient parse: anything unrecognised degrades to English.
    pub fn parse_or_default(tag: &str) -> Self {
        match tag.parse() {
            Ok(lang) => lang,
            Err(_) => {
                tracing::warn!("Unsupported language '{}', using English", tag);
                Language::English
            }
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = KrishiError;

    /// Accepts both names ("hindi") and locale codes ("hi"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.as_str() == tag || lang.code() == tag)
            .ok_or_else(|| KrishiError::UnsupportedLanguage(s.to_string()))
    }
}

// 问题分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Crop,
    Pest,
    Disease,
    Weather,
    Default,
}

impl Topic {
    /// Keyword sets are tested in this order; the first hit wins.
    pub const PRIORITY: [Topic; 4] = [Topic::Crop, Topic::Pest, Topic::Disease, Topic::Weather];

    pub const ALL: [Topic; 5] = [
        Topic::Crop,
        Topic::Pest,
        Topic::Disease,
        Topic::Weather,
        Topic::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Crop => "crop",
            Topic::Pest => "pest",
            Topic::Disease => "disease",
            Topic::Weather => "weather",
            Topic::Default => "default",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// 生成式后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = KrishiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" | "chatgpt" => Ok(ProviderKind::OpenAi),
            other => Err(KrishiError::Config(format!("Unknown AI provider: {}", other))),
        }
    }
}

/// Read-once snapshot of which backend is preferred and which ones have
/// usable credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub active: ProviderKind,
    pub available: HashMap<ProviderKind, bool>,
}

impl ProviderSettings {
    pub fn is_available(&self, kind: ProviderKind) -> bool {
        self.available.get(&kind).copied().unwrap_or(false)
    }
}

/// A farmer's question. Construction rejects blank text, so nothing
/// downstream has to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    text: String,
    language: Language,
}

impl Question {
    pub fn new(text: impl Into<String>, language: Language) -> Result<Self, KrishiError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(KrishiError::EmptyQuestion);
        }
        Ok(Self { text, language })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

// 答案来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "lowercase")]
pub enum AnswerSource {
    Provider(ProviderKind),
    Fallback(Topic),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAnswer {
    pub text: String,
    pub source: AnswerSource,
}

impl ResolvedAnswer {
    pub fn used_fallback(&self) -> bool {
        matches!(self.source, AnswerSource::Fallback(_))
    }
}

/// One row of the conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub user_id: String,
    pub question: String,
    pub answer: String,
    pub language: Language,
    pub used_fallback: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 作物指导
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropGuide {
    pub crop_name: String,
    pub season: Option<String>,
    pub location: Option<String>,
    pub soil_type: Option<String>,
    pub planting_time: Option<String>,
    pub harvesting_time: Option<String>,
    pub water_requirements: Option<String>,
    pub fertilizer_needs: Option<String>,
    pub common_varieties: Option<String>,
    pub special_notes: Option<String>,
}

// 病虫害防治
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PestInfo {
    pub pest_name: String,
    pub affected_crops: Option<String>,
    pub symptoms: Option<String>,
    pub organic_control: Option<String>,
    pub chemical_control: Option<String>,
    pub prevention: Option<String>,
    pub severity: Option<String>,
}

// 天气农事建议
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherTip {
    pub weather_condition: String,
    pub crop_impact: Option<String>,
    pub recommended_actions: Option<String>,
    pub protection_measures: Option<String>,
    pub timing_considerations: Option<String>,
}

/// Crop guidance filter. Name and season match exactly (case-insensitive),
/// location matches as a substring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CropFilter {
    pub crop_name: Option<String>,
    pub season: Option<String>,
    pub location: Option<String>,
}

/// Pest filter. Name and affected crop match as substrings, severity exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PestFilter {
    pub pest_name: Option<String>,
    pub crop_name: Option<String>,
    pub severity: Option<String>,
}

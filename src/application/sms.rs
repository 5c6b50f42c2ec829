//! Text handling for questions that arrive by SMS.
//!
//! A body may start with a language code ("hi मेरी फसल ..."), ask for the help
//! menu, switch language ("lang kn") or look up a stored guide ("crop rice").
//! Everything else is a question.
//! Delivering the reply is the caller's job.

use crate::application::guide::{self, GuideLookup};
use crate::application::resolve::AnswerResolver;
use crate::domain::error::KrishiError;
use crate::domain::model::{Language, Question};
use crate::domain::traits::{ConversationStore, FarmGuideStore};

/// Longest answer body kept before the footer is appended.
pub const SMS_MAX_CHARS: usize = 1500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmsCommand {
    Empty,
    Help(Language),
    SetLanguage(Language),
    /// Guide request; the question is asked instead when no guide matches.
    Lookup(GuideLookup, Question),
    Ask(Question),
}

pub fn parse_incoming(body: &str) -> SmsCommand {
    let mut text = body.trim();
    let mut language = Language::English;

    if let Some((first, rest)) = text.split_once(' ') {
        if let Some(lang) = Language::from_code(first) {
            language = lang;
            text = rest.trim();
        }
    }

    let lowered = text.to_lowercase();
    if matches!(lowered.as_str(), "help" | "h" | "menu") {
        return SmsCommand::Help(language);
    }

    if let Some(code) = lowered.strip_prefix("lang ") {
        if let Some(lang) = code.split_whitespace().next().and_then(Language::from_code) {
            return SmsCommand::SetLanguage(lang);
        }
    }

    let question = match Question::new(text, language) {
        Ok(question) => question,
        Err(_) => return SmsCommand::Empty,
    };

    match GuideLookup::parse(text) {
        Some(request) => SmsCommand::Lookup(request, question),
        None => SmsCommand::Ask(question),
    }
}

pub fn help_text(language: Language) -> &'static str {
    match language {
        Language::English => "🌱 KrishiAI SMS Help\n\nSend any farming question or use:\n- [crop] [name] - Crop guidance\n- [pest] [name] - Pest control\n- [weather] - Weather tips\n- [lang XX] - Change language\n- [help] - Show help",
        Language::Hindi => "🌿 कृषि एआई सहायता\n\nकृषि प्रश्न भेजें या उपयोग करें:\n- [crop] [नाम] - फसल मार्गदर्शन\n- [pest] [नाम] - कीट नियंत्रण\n- [weather] - मौसम सुझाव\n- [lang hi] - भाषा बदलें\n- [help] - मदद दिखाएं",
        Language::Kannada => "🌾 ಕೃಷಿ ಏಐ ಸಹಾಯ\n\nಯಾವುದೇ ಕೃಷಿ ಪ್ರಶ್ನೆಯನ್ನು ಕಳುಹಿಸಿ ಅಥವಾ ಬಳಸಿ:\n- [crop] [ಹೆಸರು] - ಬೆಳೆ ಮಾರ್ಗದರ್ಶನ\n- [pest] [ಹೆಸರು] - ಕೀಟ ನಿಯಂತ್ರಣ\n- [weather] - ಹವಾಮಾನ ಸಲಹೆಗಳು\n- [lang kn] - ಭಾಷೆ ಬದಲಿಸಿ\n- [help] - ಸಹಾಯ ತೋರಿಸಿ",
        Language::Tamil => "🌾 கிரிஷி AI உதவி\n\nஏதேனும் விவசாயக் கேள்வியை அனுப்பவும் அல்லது பயன்படுத்தவும்:\n- [crop] [பெயர்] - பயிர் வழிகாட்டுதல்\n- [pest] [பெயர்] - பூச்சி கட்டுப்பாடு\n- [weather] - வானிலை குறிப்புகள்\n- [lang ta] - மொழியை மாற்று\n- [help] - உதவியைக் காட்டு",
        Language::Telugu => "🌾 కృషి AI సహాయం\n\nఏదైనా వ్యవసాయ ప్రశ్న పంపండి లేదా ఉపయోగించండి:\n- [crop] [పేరు] - పంట మార్గదర్శకం\n- [pest] [పేరు] - పురుగు నియంత్రణ\n- [weather] - వాతావరణ సూచనలు\n- [lang te] - భాష మార్చండి\n- [help] - సహాయం చూపించు",
        Language::Marathi => "🌾 कृषी एआय मदत\n\nकोणताही शेती प्रश्न पाठवा किंवा वापरा:\n- [crop] [नाव] - पीक मार्गदर्शन\n- [pest] [नाव] - कीड नियंत्रण\n- [weather] - हवामान सूचना\n- [lang mr] - भाषा बदला\n- [help] - मदत दाखवा",
    }
}

pub fn footer(language: Language) -> &'static str {
    match language {
        Language::English => "\n\nReply 'help' for menu.",
        Language::Hindi => "\n\nमेनू के लिए 'help' भेजें।",
        Language::Kannada => "\n\nಮೆನುವಿಗಾಗಿ 'help' ಕಳುಹಿಸಿ।",
        Language::Tamil => "\n\nபட்டியலுக்கு 'help' அனுப்பவும்.",
        Language::Telugu => "\n\nమెనూ కోసం 'help' పంపండి.",
        Language::Marathi => "\n\nमेनूसाठी 'help' पाठवा.",
    }
}

pub fn apology(language: Language) -> &'static str {
    match language {
        Language::English => "Sorry, I couldn't process your request. Please try again later.",
        Language::Hindi => "क्षमा करें, मैं आपका अनुरोध संसाधित नहीं कर सका। कृपया बाद में पुनः प्रयास करें।",
        Language::Kannada => "ಕ್ಷಮಿಸಿ, ನಿಮ್ಮ ವಿನಂತಿಯನ್ನು ಪ್ರಕ್ರಿಯೆಗೊಳಿಸಲು ಸಾಧ್ಯವಾಗಲಿಲ್ಲ. ದಯವಿಟ್ಟು ನಂತರ ಮತ್ತೆ ಪ್ರಯತ್ನಿಸಿ.",
        Language::Tamil => "மன்னிக்கவும், உங்கள் கோரிக்கையை செயல்படுத்த முடியவில்லை. தயவுசெய்து பின்னர் மீண்டும் முயற்சிக்கவும்.",
        Language::Telugu => "క్షమించండి, మీ అభ్యర్థనను ప్రాసెస్ చేయడంలో విఫలమయ్యాను. దయచేసి తర్వాత మళ్లీ ప్రయత్నించండి.",
        Language::Marathi => "क्षमस्व, मी तुमची विनंती प्रक्रिया करू शकलो नाही. कृपया नंतर पुन्हा प्रयत्न करा.",
    }
}

pub fn language_set_text(language: Language) -> String {
    format!(
        "🌐 Language set to {}. Now send your question.",
        language.native_name()
    )
}

/// Cut to [`SMS_MAX_CHARS`] characters, ending in "..." when shortened.
pub fn truncate_for_sms(text: &str) -> String {
    if text.chars().count() <= SMS_MAX_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(SMS_MAX_CHARS - 3).collect();
    cut.push_str("...");
    cut
}

pub fn format_answer(answer: &str, language: Language) -> String {
    let mut reply = truncate_for_sms(answer);
    reply.push_str(footer(language));
    reply
}

/// Turns SMS bodies into reply texts.
pub struct SmsHandler<'a> {
    resolver: &'a AnswerResolver,
    store: Option<&'a dyn ConversationStore>,
    guides: Option<&'a dyn FarmGuideStore>,
    sender: String,
}

impl<'a> SmsHandler<'a> {
    pub fn new(resolver: &'a AnswerResolver, sender: impl Into<String>) -> Self {
        Self {
            resolver,
            store: None,
            guides: None,
            sender: sender.into(),
        }
    }

    /// Log each answered question under the sender's number.
    pub fn with_store(mut self, store: &'a dyn ConversationStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_guides(mut self, guides: &'a dyn FarmGuideStore) -> Self {
        self.guides = Some(guides);
        self
    }

    /// Reply text for an incoming body, or `None` when there is nothing to answer.
    pub async fn reply(&self, body: &str) -> Option<String> {
        match parse_incoming(body) {
            SmsCommand::Empty => None,
            SmsCommand::Help(lang) => Some(help_text(lang).to_string()),
            SmsCommand::SetLanguage(lang) => Some(language_set_text(lang)),
            SmsCommand::Lookup(request, question) => {
                let language = question.language();
                let result = match self.guide_text(&request).await {
                    Some(text) => self.log(&question, &text, true).await.map(|_| text),
                    None => self.answer(&question).await,
                };
                match result {
                    Ok(text) => Some(format_answer(&text, language)),
                    Err(e) => {
                        tracing::error!("SMS request from {} failed: {}", self.sender, e);
                        Some(apology(language).to_string())
                    }
                }
            }
            SmsCommand::Ask(question) => {
                let language = question.language();
                match self.answer(&question).await {
                    Ok(text) => Some(format_answer(&text, language)),
                    Err(e) => {
                        tracing::error!("SMS request from {} failed: {}", self.sender, e);
                        Some(apology(language).to_string())
                    }
                }
            }
        }
    }

    /// Stored guide text, or `None` to fall through to the resolver.
    async fn guide_text(&self, request: &GuideLookup) -> Option<String> {
        let guides = self.guides?;
        match guide::lookup(guides, request).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Guide lookup for {} failed: {}", self.sender, e);
                None
            }
        }
    }

    async fn answer(&self, question: &Question) -> Result<String, KrishiError> {
        let answer = self.resolver.resolve_answer(question).await;
        self.log(question, &answer.text, answer.used_fallback()).await?;
        Ok(answer.text)
    }

    async fn log(
        &self,
        question: &Question,
        answer: &str,
        used_fallback: bool,
    ) -> Result<(), KrishiError> {
        if let Some(store) = self.store {
            store
                .save_conversation(
                    &self.sender,
                    question.text(),
                    answer,
                    question.language(),
                    used_fallback,
                )
                .await?;
        }
        Ok(())
    }
}

//! 后端选择与回退测试

use async_trait::async_trait;
use krishi_ai::application::resolve::{AnswerResolver, ProviderSelector};
use krishi_ai::infrastructure::storage::cache::AnswerCache;
use krishi_ai::{
    AnswerSource, Backend, BackendError, KnowledgeBase, Language, ProviderKind, Question, Topic,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

enum Behavior {
    Answer(&'static str),
    Fail,
    Hang(Duration),
}

struct FakeBackend {
    kind: ProviderKind,
    available: bool,
    behavior: Behavior,
    calls: AtomicUsize,
}

impl FakeBackend {
    fn new(kind: ProviderKind, available: bool, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            kind,
            available,
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for FakeBackend {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn generate(&self, _prompt: &str) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Answer(text) => Ok(text.to_string()),
            Behavior::Fail => Err(BackendError::Status {
                status: 429,
                body: "quota exceeded".to_string(),
            }),
            Behavior::Hang(d) => {
                tokio::time::sleep(*d).await;
                Ok("too late".to_string())
            }
        }
    }
}

fn shared(backend: &Arc<FakeBackend>) -> Arc<dyn Backend> {
    backend.clone()
}

fn resolver(backends: Vec<Arc<dyn Backend>>, preferred: ProviderKind) -> AnswerResolver {
    AnswerResolver::new(
        ProviderSelector::new(backends, preferred),
        Arc::new(KnowledgeBase::builtin()),
    )
}

fn pest_question() -> Question {
    Question::new("What pest is attacking my cotton?", Language::English).unwrap()
}

#[tokio::test]
async fn test_preferred_backend_answers() {
    let gemini = FakeBackend::new(ProviderKind::Gemini, true, Behavior::Answer("Use neem."));
    let openai = FakeBackend::new(ProviderKind::OpenAi, true, Behavior::Answer("Other."));
    let r = resolver(vec![shared(&gemini), shared(&openai)], ProviderKind::Gemini);

    let answer = r.resolve_answer(&pest_question()).await;

    assert_eq!(answer.text, "Use neem.");
    assert_eq!(answer.source, AnswerSource::Provider(ProviderKind::Gemini));
    assert!(!answer.used_fallback());
    assert_eq!(gemini.calls(), 1);
    assert_eq!(openai.calls(), 0);
}

#[tokio::test]
async fn test_unavailable_preferred_uses_the_other_backend() {
    let gemini = FakeBackend::new(ProviderKind::Gemini, false, Behavior::Answer("nope"));
    let openai = FakeBackend::new(ProviderKind::OpenAi, true, Behavior::Answer("From OpenAI"));
    let r = resolver(vec![shared(&gemini), shared(&openai)], ProviderKind::Gemini);

    let answer = r.resolve_answer(&pest_question()).await;

    assert_eq!(answer.text, "From OpenAI");
    assert_eq!(answer.source, AnswerSource::Provider(ProviderKind::OpenAi));
    assert_eq!(gemini.calls(), 0);
    assert_eq!(openai.calls(), 1);
}

#[tokio::test]
async fn test_no_available_backend_falls_back_without_calls() {
    let gemini = FakeBackend::new(ProviderKind::Gemini, false, Behavior::Answer("x"));
    let openai = FakeBackend::new(ProviderKind::OpenAi, false, Behavior::Answer("y"));
    let r = resolver(vec![shared(&gemini), shared(&openai)], ProviderKind::OpenAi);

    let answer = r.resolve_answer(&pest_question()).await;

    assert!(answer.used_fallback());
    assert_eq!(answer.source, AnswerSource::Fallback(Topic::Pest));
    assert_eq!(
        answer.text,
        KnowledgeBase::builtin().response(Topic::Pest, Language::English)
    );
    assert_eq!(gemini.calls() + openai.calls(), 0);
}

#[tokio::test]
async fn test_backend_error_falls_back_after_one_attempt() {
    let gemini = FakeBackend::new(ProviderKind::Gemini, true, Behavior::Fail);
    let openai = FakeBackend::new(ProviderKind::OpenAi, true, Behavior::Answer("unused"));
    let r = resolver(vec![shared(&gemini), shared(&openai)], ProviderKind::Gemini);

    let answer = r.resolve_answer(&pest_question()).await;

    assert!(answer.used_fallback());
    assert_eq!(gemini.calls(), 1);
    // a failed call is not retried on the other backend
    assert_eq!(openai.calls(), 0);
}

#[tokio::test]
async fn test_timeout_falls_back() {
    let gemini = FakeBackend::new(
        ProviderKind::Gemini,
        true,
        Behavior::Hang(Duration::from_secs(5)),
    );
    let r = resolver(vec![shared(&gemini)], ProviderKind::Gemini);

    let answer = r
        .resolve_answer_within(&pest_question(), Duration::from_millis(20))
        .await;

    assert!(answer.used_fallback());
}

#[tokio::test]
async fn test_selector_reports_timeout() {
    let gemini = FakeBackend::new(
        ProviderKind::Gemini,
        true,
        Behavior::Hang(Duration::from_secs(5)),
    );
    let selector = ProviderSelector::new(vec![shared(&gemini)], ProviderKind::Gemini);

    let result = selector.generate("prompt", Duration::from_millis(20)).await;

    assert!(matches!(result, Err(BackendError::Timeout(_))));
}

#[tokio::test]
async fn test_blank_backend_output_falls_back() {
    let gemini = FakeBackend::new(ProviderKind::Gemini, true, Behavior::Answer("  \n "));
    let r = resolver(vec![shared(&gemini)], ProviderKind::Gemini);

    let answer = r.resolve_answer(&pest_question()).await;

    assert!(answer.used_fallback());
    assert_eq!(answer.source, AnswerSource::Fallback(Topic::Pest));
}

#[tokio::test]
async fn test_backend_output_is_trimmed() {
    let gemini = FakeBackend::new(ProviderKind::Gemini, true, Behavior::Answer("\n  Spray neem oil.  \n"));
    let r = resolver(vec![shared(&gemini)], ProviderKind::Gemini);

    let answer = r.resolve_answer(&pest_question()).await;

    assert_eq!(answer.text, "Spray neem oil.");
}

#[test]
fn test_selector_prefers_configured_kind_regardless_of_order() {
    let gemini = FakeBackend::new(ProviderKind::Gemini, true, Behavior::Answer("g"));
    let openai = FakeBackend::new(ProviderKind::OpenAi, true, Behavior::Answer("o"));
    let selector = ProviderSelector::new(vec![shared(&gemini), shared(&openai)], ProviderKind::OpenAi);

    let chosen = selector.select().map(|b| b.kind());
    assert_eq!(chosen, Some(ProviderKind::OpenAi));
}

#[test]
fn test_offline_answer_skips_backends() {
    let gemini = FakeBackend::new(ProviderKind::Gemini, true, Behavior::Answer("online"));
    let r = resolver(vec![shared(&gemini)], ProviderKind::Gemini);
    let question = Question::new("rice", Language::Kannada).unwrap();

    let answer = r.answer_offline(&question);

    assert_eq!(answer.source, AnswerSource::Fallback(Topic::Crop));
    assert_eq!(
        answer.text,
        KnowledgeBase::builtin().response(Topic::Crop, Language::Kannada)
    );
    assert_eq!(gemini.calls(), 0);
}

#[tokio::test]
async fn test_cache_reuses_backend_answers() {
    let gemini = FakeBackend::new(ProviderKind::Gemini, true, Behavior::Answer("cached"));
    let r = resolver(vec![shared(&gemini)], ProviderKind::Gemini).with_cache(AnswerCache::new());
    let question = pest_question();

    let first = r.resolve_answer(&question).await;
    let second = r.resolve_answer(&question).await;

    assert_eq!(first, second);
    assert_eq!(gemini.calls(), 1);
    assert_eq!(r.cache().map(|c| c.len()), Some(1));
}

#[tokio::test]
async fn test_cache_skips_fallback_answers() {
    let gemini = FakeBackend::new(ProviderKind::Gemini, true, Behavior::Fail);
    let r = resolver(vec![shared(&gemini)], ProviderKind::Gemini).with_cache(AnswerCache::new());
    let question = pest_question();

    r.resolve_answer(&question).await;
    r.resolve_answer(&question).await;

    assert_eq!(gemini.calls(), 2);
    assert_eq!(r.cache().map(|c| c.is_empty()), Some(true));
}

// 每种语言每个主题各一个问题
const OFFLINE_CASES: &[(Language, Topic, &str)] = &[
    (Language::English, Topic::Crop, "When should I sow seeds?"),
    (Language::English, Topic::Pest, "Insects on leaves"),
    (Language::English, Topic::Disease, "There is a fungus"),
    (Language::English, Topic::Weather, "Is drought coming"),
    (Language::English, Topic::Default, "hello there"),
    (Language::Hindi, Topic::Crop, "गेहूं कब बोएं"),
    (Language::Hindi, Topic::Pest, "पत्तों पर कीट हैं"),
    (Language::Hindi, Topic::Disease, "पौधों में रोग है"),
    (Language::Hindi, Topic::Weather, "बारिश कब होगी"),
    (Language::Hindi, Topic::Default, "नमस्ते"),
    (Language::Kannada, Topic::Crop, "ಯಾವ ಬೆಳೆಯನ್ನು ಬೆಳೆಯಬೇಕು"),
    (Language::Kannada, Topic::Pest, "ಎಲೆಗಳಲ್ಲಿ ಕೀಟಗಳು"),
    (Language::Kannada, Topic::Disease, "ಗಿಡಕ್ಕೆ ರೋಗ ಬಂದಿದೆ"),
    (Language::Kannada, Topic::Weather, "ಮಳೆ ಯಾವಾಗ"),
    (Language::Kannada, Topic::Default, "ನಮಸ್ಕಾರ"),
    (Language::Tamil, Topic::Crop, "எப்போது பயிரிட வேண்டும்"),
    (Language::Tamil, Topic::Pest, "இலைகளில் பூச்சி உள்ளது"),
    (Language::Tamil, Topic::Disease, "செடியில் நோய் உள்ளது"),
    (Language::Tamil, Topic::Weather, "மழை எப்போது வரும்"),
    (Language::Tamil, Topic::Default, "வணக்கம்"),
    (Language::Telugu, Topic::Crop, "ఏ పంట సాగు చేయాలి"),
    (Language::Telugu, Topic::Pest, "ఆకులపై పురుగులు ఉన్నాయి"),
    (Language::Telugu, Topic::Disease, "మొక్కకు తెగులు వచ్చింది"),
    (Language::Telugu, Topic::Weather, "వర్షం ఎప్పుడు వస్తుంది"),
    (Language::Telugu, Topic::Default, "నమస్కారం"),
    (Language::Marathi, Topic::Crop, "लागवड कधी करावी"),
    (Language::Marathi, Topic::Pest, "पिकावर अळी आहे"),
    (Language::Marathi, Topic::Disease, "पानांवर करपा आहे"),
    (Language::Marathi, Topic::Weather, "पाऊस कधी येईल"),
    (Language::Marathi, Topic::Default, "नमस्कार"),
];

#[tokio::test]
async fn test_offline_resolution_for_every_language_and_topic() {
    let kb = KnowledgeBase::builtin();
    let r = resolver(Vec::new(), ProviderKind::Gemini);

    for &(language, topic, text) in OFFLINE_CASES {
        let question = Question::new(text, language).unwrap();

        let first = r.resolve_answer(&question).await;
        let second = r.resolve_answer(&question).await;

        assert_eq!(first.text, kb.response(topic, language), "{:?} {:?}", language, topic);
        assert_eq!(first.source, AnswerSource::Fallback(topic), "{}", text);
        assert!(first.used_fallback());
        assert_eq!(first, second, "{}", text);
    }
}

struct KeyedBackend {
    key_present: AtomicBool,
}

#[async_trait]
impl Backend for KeyedBackend {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn is_available(&self) -> bool {
        self.key_present.load(Ordering::SeqCst)
    }

    async fn generate(&self, _prompt: &str) -> Result<String, BackendError> {
        Ok("late key".to_string())
    }
}

#[test]
fn test_availability_is_read_once() {
    let backend = Arc::new(KeyedBackend {
        key_present: AtomicBool::new(false),
    });
    let as_dyn: Arc<dyn Backend> = backend.clone();
    let selector = ProviderSelector::new(vec![as_dyn], ProviderKind::OpenAi);

    backend.key_present.store(true, Ordering::SeqCst);

    assert_eq!(selector.settings().active, ProviderKind::OpenAi);
    assert!(!selector.settings().is_available(ProviderKind::OpenAi));
    assert!(!selector.settings().is_available(ProviderKind::Gemini));
    assert!(selector.select().is_none());
}

#[test]
fn test_empty_question_is_rejected() {
    assert!(Question::new("", Language::Hindi).is_err());
    assert!(Question::new("   \n", Language::English).is_err());
}

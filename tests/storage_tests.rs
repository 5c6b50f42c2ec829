//! 对话记录与缓存测试

use krishi_ai::infrastructure::storage::cache::AnswerCache;
use krishi_ai::infrastructure::storage::db::{init_database, init_memory_database, SqliteConversationStore};
use krishi_ai::{
    AnswerSource, ConversationStore, Language, ProviderKind, Question, ResolvedAnswer, Topic,
};

#[tokio::test]
async fn test_save_and_list_conversations() {
    let store = SqliteConversationStore::new(init_memory_database().await.unwrap());

    let first = store
        .save_conversation("farmer-1", "rice?", "Grow rice in July.", Language::English, false)
        .await
        .unwrap();
    let second = store
        .save_conversation("farmer-1", "कीट?", "नीम का तेल", Language::Hindi, true)
        .await
        .unwrap();
    store
        .save_conversation("farmer-2", "other", "answer", Language::Tamil, true)
        .await
        .unwrap();

    assert!(second > first);
    assert_eq!(store.count().await.unwrap(), 3);

    let history = store.recent_conversations("farmer-1", 10).await.unwrap();
    assert_eq!(history.len(), 2);
    // newest first
    assert_eq!(history[0].id, second);
    assert_eq!(history[0].language, Language::Hindi);
    assert!(history[0].used_fallback);
    assert_eq!(history[1].answer, "Grow rice in July.");
    assert!(!history[1].used_fallback);
}

#[tokio::test]
async fn test_history_limit() {
    let store = SqliteConversationStore::new(init_memory_database().await.unwrap());
    for i in 0..5 {
        store
            .save_conversation("u", &format!("q{}", i), "a", Language::English, false)
            .await
            .unwrap();
    }

    let history = store.recent_conversations("u", 2).await.unwrap();
    let questions: Vec<_> = history.iter().map(|c| c.question.as_str()).collect();
    assert_eq!(questions, ["q4", "q3"]);

    assert!(store.recent_conversations("nobody", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_database_file_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("krishi.db");

    {
        let store = SqliteConversationStore::new(init_database(&path).await.unwrap());
        store
            .save_conversation("u", "q", "a", Language::Marathi, false)
            .await
            .unwrap();
    }

    let store = SqliteConversationStore::new(init_database(&path).await.unwrap());
    let history = store.recent_conversations("u", 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].language, Language::Marathi);
}

#[test]
fn test_cache_keys_on_language_and_trimmed_text() {
    let cache = AnswerCache::new();
    let answer = ResolvedAnswer {
        text: "Use neem oil.".to_string(),
        source: AnswerSource::Provider(ProviderKind::Gemini),
    };
    let q = Question::new("pest?", Language::English).unwrap();
    cache.insert(&q, answer.clone());

    let padded = Question::new("  pest?  ", Language::English).unwrap();
    assert_eq!(cache.get(&padded), Some(answer));

    let hindi = Question::new("pest?", Language::Hindi).unwrap();
    assert_eq!(cache.get(&hindi), None);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_ignores_fallback_answers() {
    let cache = AnswerCache::new();
    let q = Question::new("pest?", Language::English).unwrap();
    cache.insert(
        &q,
        ResolvedAnswer {
            text: "canned".to_string(),
            source: AnswerSource::Fallback(Topic::Pest),
        },
    );

    assert_eq!(cache.len(), 0);
}

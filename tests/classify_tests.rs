//! 离线分类测试

use krishi_ai::application::classify::{classify, fallback_answer};
use krishi_ai::{AnswerSource, KnowledgeBase, Language, Topic};

fn kb() -> KnowledgeBase {
    KnowledgeBase::builtin()
}

#[test]
fn test_pest_question_about_a_named_crop() {
    // a crop name does not outrank a pest keyword
    assert_eq!(classify("What pest is attacking my cotton?", &kb()), Topic::Pest);
}

#[test]
fn test_hindi_pest_question() {
    let decomposed = "मेरी फसल में \u{915}\u{940}\u{921}\u{93c}\u{947} हैं";
    let precomposed = "मेरी फसल में \u{915}\u{940}\u{95c}\u{947} हैं";

    assert_eq!(classify(decomposed, &kb()), Topic::Pest);
    assert_eq!(classify(precomposed, &kb()), Topic::Pest);
}

#[test]
fn test_pest_outranks_disease() {
    let topic = classify("my crop has pest damage and yellow spots", &kb());
    assert_eq!(topic, Topic::Pest);
}

#[test]
fn test_crop_keywords_outrank_everything() {
    assert_eq!(classify("When should I plant rice before the rain?", &kb()), Topic::Crop);
    assert_eq!(classify("Which crop to grow this season", &kb()), Topic::Crop);
}

#[test]
fn test_crop_name_alone_is_a_crop_question() {
    assert_eq!(classify("rice", &kb()), Topic::Crop);
    assert_eq!(classify("RICE!!", &kb()), Topic::Crop);
    assert_eq!(classify("कपास", &kb()), Topic::Crop);
    assert_eq!(classify("ಹತ್ತಿ", &kb()), Topic::Crop);
}

#[test]
fn test_hindi_crop_stem() {
    assert_eq!(classify("गेहूं कब बोएं?", &kb()), Topic::Crop);
}

#[test]
fn test_short_hindi_words_do_not_match_longer_stems() {
    // "मराठी" is not "मरना", "बोलो" is not "बोना"
    assert_eq!(classify("मराठी बातमी", &kb()), Topic::Default);
    assert_eq!(classify("मुझे बोलो", &kb()), Topic::Default);
    assert_eq!(classify("पौधे मर रहे हैं", &kb()), Topic::Disease);
    assert_eq!(classify("पत्तियां मुरझा गईं", &kb()), Topic::Disease);
    assert_eq!(classify("धान की बुवाई", &kb()), Topic::Crop);
}

#[test]
fn test_tokens_split_on_inner_punctuation() {
    assert_eq!(classify("crop-damage", &kb()), Topic::Pest);
    assert_eq!(classify("rain/drought", &kb()), Topic::Weather);
    assert_eq!(classify("कपास।कीट", &kb()), Topic::Pest);
}

#[test]
fn test_disease_and_weather_topics() {
    assert_eq!(classify("The leaves have yellow spots", &kb()), Topic::Disease);
    assert_eq!(classify("My plants look sick", &kb()), Topic::Crop);
    assert_eq!(classify("Is there a fungus on the leaves?", &kb()), Topic::Disease);
    assert_eq!(classify("No rain for three weeks, what now?", &kb()), Topic::Weather);
    assert_eq!(classify("ಮಳೆ ಯಾವಾಗ ಬರುತ್ತದೆ", &kb()), Topic::Weather);
}

#[test]
fn test_unrelated_question_is_default() {
    assert_eq!(classify("How do I apply for a loan?", &kb()), Topic::Default);
    assert_eq!(classify("hello", &kb()), Topic::Default);
}

#[test]
fn test_classification_is_case_insensitive() {
    assert_eq!(classify("PEST problem", &kb()), Topic::Pest);
    assert_eq!(classify("Weather Report", &kb()), Topic::Weather);
}

#[test]
fn test_classification_is_deterministic() {
    let question = "my crop has pest damage and yellow spots";
    let first = classify(question, &kb());
    for _ in 0..10 {
        assert_eq!(classify(question, &kb()), first);
    }
}

#[test]
fn test_fallback_answer_scenario_english_pest() {
    let answer = fallback_answer("What pest is attacking my cotton?", Language::English, &kb());

    assert_eq!(
        answer.text,
        "Common pests include aphids (small green insects), bollworm (caterpillars), and stem borer. Use neem oil, pheromone traps, or consult your local agricultural officer."
    );
    assert_eq!(answer.source, AnswerSource::Fallback(Topic::Pest));
    assert!(answer.used_fallback());
}

#[test]
fn test_fallback_answer_scenario_hindi_pest() {
    let kb = kb();
    let answer = fallback_answer(
        "मेरी फसल में \u{915}\u{940}\u{921}\u{93c}\u{947} हैं",
        Language::Hindi,
        &kb,
    );

    assert_eq!(answer.text, kb.response(Topic::Pest, Language::Hindi));
    assert!(answer.text.contains("नीम"));
}

#[test]
fn test_unknown_language_tag_answers_in_english() {
    let kb = kb();
    let question = "What pest is attacking my cotton?";
    let lang = Language::parse_or_default("klingon");

    assert_eq!(lang, Language::English);
    assert_eq!(
        fallback_answer(question, lang, &kb).text,
        fallback_answer(question, Language::English, &kb).text
    );
}

#[test]
fn test_every_language_and_topic_has_text() {
    let kb = kb();
    for lang in Language::ALL {
        for topic in Topic::ALL {
            assert!(
                !kb.response(topic, lang).trim().is_empty(),
                "empty response for {} / {}",
                lang,
                topic
            );
        }
    }
}

#[test]
fn test_injected_knowledge_base() {
    let mut kb = kb();
    kb.keywords.insert(Topic::Weather, vec!["hailstorm".to_string()]);

    assert_eq!(classify("hailstorm tonight", &kb), Topic::Weather);
    assert_eq!(classify("rain tonight", &kb), Topic::Default);
}

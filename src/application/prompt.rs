use crate::domain::model::{Language, Question};

pub const FOCUS_AREAS: [&str; 6] = [
    "Crop selection and timing for Indian conditions",
    "Pest and disease management",
    "Weather-based farming tips",
    "Sustainable farming practices",
    "Government schemes for farmers",
    "Local Indian farming techniques",
];

pub const MAX_WORDS: usize = 100;

/// Instruction telling the backend to answer only in `language`, in simple words.
pub fn language_instruction(language: Language) -> &'static str {
    match language {
        Language::English => "Respond in English. Use simple language.",
        Language::Hindi => "हिंदी में जवाब दें। सरल भाषा का उपयोग करें।",
        Language::Kannada => "ಕನ್ನಡದಲ್ಲಿ ಉತ್ತರಿಸಿ। ಸರಳ ಭಾಷೆಯನ್ನು ಬಳಸಿ।",
        Language::Tamil => "தமிழில் பதிலளிக்கவும். எளிய மொழியைப் பயன்படுத்தவும்.",
        Language::Telugu => "తెలుగులో సమాధానం ఇవ్వండి. సరళమైన భాష ఉపయోగించండి.",
        Language::Marathi => "मराठीत उत्तर द्या. सोप्या भाषेचा वापर करा.",
    }
}

/// Build the exact text sent to a backend.
///
/// The question appears twice: once in the analysis block and once as the
/// closing line, which keeps the model on the farmer's actual query.
pub fn build_prompt(question: &Question) -> String {
    let language = question.language();
    let text = question.text().trim();

    let focus = FOCUS_AREAS
        .iter()
        .map(|area| format!("- {}", area))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are KrishiAI, a helpful farming assistant for Indian farmers.\n\
         \n\
         CRITICAL INSTRUCTIONS:\n\
         1. {instruction}\n\
         2. ALWAYS analyze the specific question asked\n\
         3. Provide different answers for different questions\n\
         4. Be specific to the farmer's actual query\n\
         \n\
         Question Analysis:\n\
         - Question: \"{text}\"\n\
         - Language: {name}\n\
         - Context: Indian farming\n\
         \n\
         Provide practical, actionable advice focusing on:\n\
         {focus}\n\
         \n\
         IMPORTANT:\n\
         - Keep responses concise (max {max_words} words)\n\
         - Always respond in {name} language\n\
         - Give specific answers to specific questions\n\
         - Don't give generic responses\n\
         \n\
         Farmer's Question: {text}",
        instruction = language_instruction(language),
        text = text,
        name = language.name(),
        focus = focus,
        max_words = MAX_WORDS,
    )
}

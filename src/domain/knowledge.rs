//! Offline farming knowledge: localized canned answers and the keyword sets
//! used to classify a question into a [`Topic`].
//!
//! The bundled tables are available through [`KnowledgeBase::builtin`]; a TOML
//! file with the same shape can replace them (see `knowledge_path` in the
//! config).

use crate::domain::error::KrishiError;
use crate::domain::model::{Language, Topic};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Returned only if a hand-built knowledge base skipped validation and has no
/// English default either.
const LAST_RESORT: &str = "I'm here to help with farming questions! Ask me about crops, pests, diseases, or farming practices. For complex issues, consult your local agricultural extension officer.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// language -> topic -> canned answer
    pub responses: HashMap<Language, HashMap<Topic, String>>,
    /// Topic keyword sets. Only the topics in [`Topic::PRIORITY`] are consulted.
    pub keywords: HashMap<Topic, Vec<String>>,
    /// Crop names and generic crop nouns; a weaker crop signal than keywords.
    #[serde(default)]
    pub crop_terms: Vec<String>,
}

static BUILTIN: Lazy<KnowledgeBase> = Lazy::new(build_builtin);

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, KrishiError> {
        let mut kb: KnowledgeBase = toml::from_str(content)?;
        kb.normalize();
        kb.validate()?;
        Ok(kb)
    }

    pub fn load(path: &Path) -> Result<Self, KrishiError> {
        let content = std::fs::read_to_string(path)?;
        let kb = Self::from_toml_str(&content)?;
        tracing::info!("Loaded knowledge base from {}", path.display());
        Ok(kb)
    }

    /// English must carry a non-empty answer for every topic so lookups
    /// always terminate.
    pub fn validate(&self) -> Result<(), KrishiError> {
        let english = self
            .responses
            .get(&Language::English)
            .ok_or_else(|| KrishiError::Knowledge("missing english responses".to_string()))?;

        for topic in Topic::ALL {
            match english.get(&topic) {
                Some(text) if !text.trim().is_empty() => {}
                _ => {
                    return Err(KrishiError::Knowledge(format!(
                        "english response for '{}' is missing or empty",
                        topic
                    )))
                }
            }
        }

        for (lang, table) in &self.responses {
            if let Some((topic, _)) = table.iter().find(|(_, text)| text.trim().is_empty()) {
                return Err(KrishiError::Knowledge(format!(
                    "{} response for '{}' is empty",
                    lang, topic
                )));
            }
        }

        Ok(())
    }

    /// Canned answer for (topic, language).
    ///
    /// Lookup order: the language's topic entry, the language's default,
    /// English's topic entry, English's default.
    pub fn response(&self, topic: Topic, language: Language) -> &str {
        let lookup = |lang: Language, topic: Topic| {
            self.responses
                .get(&lang)
                .and_then(|table| table.get(&topic))
                .map(String::as_str)
        };

        lookup(language, topic)
            .or_else(|| lookup(language, Topic::Default))
            .or_else(|| lookup(Language::English, topic))
            .or_else(|| lookup(Language::English, Topic::Default))
            .unwrap_or(LAST_RESORT)
    }

    pub fn keywords(&self, topic: Topic) -> &[String] {
        self.keywords.get(&topic).map(Vec::as_slice).unwrap_or(&[])
    }

    fn normalize(&mut self) {
        for words in self.keywords.values_mut() {
            for word in words.iter_mut() {
                *word = word.trim().to_lowercase();
            }
            words.retain(|w| !w.is_empty());
        }
        for term in self.crop_terms.iter_mut() {
            *term = term.trim().to_lowercase();
        }
        self.crop_terms.retain(|t| !t.is_empty());
    }
}

// 内置知识库

const RESPONSES: &[(Language, &[(Topic, &str)])] = &[
    (
        Language::English,
        &[
            (Topic::Crop, "For July/Monsoon season, consider growing: Rice, Cotton, Sugarcane, Maize, or Pulses. These crops do well with monsoon rains."),
            (Topic::Pest, "Common pests include aphids (small green insects), bollworm (caterpillars), and stem borer. Use neem oil, pheromone traps, or consult your local agricultural officer."),
            (Topic::Disease, "Common plant diseases include blight (leaf spots), rust (orange spots), and wilt (drooping). Improve drainage, use copper fungicide, or contact agricultural experts."),
            (Topic::Weather, "Monitor weather forecasts regularly. During monsoon, ensure proper drainage. In dry periods, use drip irrigation to conserve water."),
            (Topic::Default, LAST_RESORT),
        ],
    ),
    (
        Language::Hindi,
        &[
            (Topic::Crop, "जुलाई/मानसून के मौसम में धान, कपास, गन्ना, मक्का या दालें उगाएं। ये फसलें मानसूनी बारिश में अच्छी होती हैं।"),
            (Topic::Pest, "आम कीट हैं माहू (छोटे हरे कीड़े), बॉलवर्म (कैटरपिलर), और तना छेदक। नीम का तेल, फेरोमोन ट्रैप का उपयोग करें या स्थानीय कृषि अधिकारी से सलाह लें।"),
            (Topic::Disease, "आम पौधों की बीमारियां हैं झुलसा (पत्ती के धब्बे), रतुआ (नारंगी धब्बे), और मुरझाना। जल निकासी सुधारें, कॉपर फंगीसाइड का उपयोग करें।"),
            (Topic::Weather, "मौसम की जानकारी नियमित रूप से देखें। मानसून में पानी की निकासी का ध्यान रखें।"),
            (Topic::Default, "मैं खेती के सवालों में आपकी मदद के लिए यहां हूं! फसल, कीट, बीमारी या खेती की प्रथाओं के बारे में पूछें।"),
        ],
    ),
    (
        Language::Kannada,
        &[
            (Topic::Crop, "ಜುಲೈ/ಮಾನ್ಸೂನ್ ಋತುವಿನಲ್ಲಿ ಅಕ್ಕಿ, ಹತ್ತಿ, ಕಬ್ಬು, ಮೆಕ್ಕೆಜೋಳ ಅಥವಾ ದಾಲ್ ಬೆಳೆಗಳನ್ನು ಬೆಳೆಯಿರಿ। ಈ ಬೆಳೆಗಳು ಮಾನ್ಸೂನ್ ಮಳೆಯಲ್ಲಿ ಚೆನ್ನಾಗಿ ಬೆಳೆಯುತ್ತವೆ।"),
            (Topic::Pest, "ಸಾಮಾನ್ಯ ಕೀಟಗಳೆಂದರೆ ಅಫಿಡ್‌ಗಳು (ಸಣ್ಣ ಹಸಿರು ಕೀಟಗಳು), ಬಾಲ್‌ವರ್ಮ್ (ಕ್ಯಾಟರ್‌ಪಿಲ್ಲರ್), ಮತ್ತು ಕಾಂಡ ಕೊರೆಯುವ ಕೀಟ। ಬೇವಿನ ಎಣ್ಣೆ, ಫೆರೋಮೋನ್ ಟ್ರ್ಯಾಪ್ ಬಳಸಿ।"),
            (Topic::Disease, "ಸಾಮಾನ್ಯ ಸಸ್ಯ ರೋಗಗಳೆಂದರೆ ಬ್ಲೈಟ್ (ಎಲೆ ಕಲೆಗಳು), ರಸ್ಟ್ (ಕಿತ್ತಳೆ ಕಲೆಗಳು), ಮತ್ತು ವಿಲ್ಟ್ (ಬಾಡುವಿಕೆ)। ನೀರು ಹರಿವನ್ನು ಸುಧಾರಿಸಿ।"),
            (Topic::Weather, "ಹವಾಮಾನ ವರದಿಯನ್ನು ನಿಯಮಿತವಾಗಿ ನೋಡಿರಿ। ಮಳೆಕಾಲದಲ್ಲಿ ಸರಿಯಾದ ನೀರು ಹರಿವನ್ನು ಸುಧಾರಿಸಿ।"),
            (Topic::Default, "ನಾನು ಕೃಷಿ ಪ್ರಶ್ನೆಗಳಿಗೆ ಸಹಾಯ ಮಾಡಲು ಇಲ್ಲಿದ್ದೇನೆ! ಬೆಳೆ, ಕೀಟ, ರೋಗ ಅಥವಾ ಕೃಷಿ ಪದ್ಧತಿಗಳ ಬಗ್ಗೆ ಕೇಳಿ।"),
        ],
    ),
    (
        Language::Tamil,
        &[
            (Topic::Crop, "ஜூலை/பருவமழை காலத்தில் நெல், பருத்தி, கரும்பு, மக்காச்சோளம் அல்லது பயறு வகைகளை பயிரிடுங்கள். இந்தப் பயிர்கள் பருவமழையில் நன்றாக வளரும்."),
            (Topic::Pest, "பொதுவான பூச்சிகள்: அசுவினி (சிறிய பச்சை பூச்சிகள்), காய்ப்புழு மற்றும் தண்டு துளைப்பான். வேப்ப எண்ணெய், இனக்கவர்ச்சி பொறிகளைப் பயன்படுத்தவும் அல்லது உள்ளூர் வேளாண் அலுவலரை அணுகவும்."),
            (Topic::Disease, "பொதுவான தாவர நோய்கள்: கருகல் (இலைப் புள்ளிகள்), துரு (ஆரஞ்சு புள்ளிகள்) மற்றும் வாடல். வடிகாலை மேம்படுத்தவும், காப்பர் பூஞ்சைக்கொல்லியைப் பயன்படுத்தவும்."),
            (Topic::Weather, "வானிலை அறிக்கைகளைத் தொடர்ந்து கவனியுங்கள். பருவமழையில் சரியான வடிகால் வசதி செய்யுங்கள். வறண்ட காலத்தில் சொட்டு நீர் பாசனம் பயன்படுத்துங்கள்."),
            (Topic::Default, "விவசாயக் கேள்விகளுக்கு உதவ நான் இங்கே இருக்கிறேன்! பயிர்கள், பூச்சிகள், நோய்கள் அல்லது விவசாய முறைகள் பற்றிக் கேளுங்கள்."),
        ],
    ),
    (
        Language::Telugu,
        &[
            (Topic::Crop, "జూలై/వర్షాకాలంలో వరి, పత్తి, చెరకు, మొక్కజొన్న లేదా పప్పుధాన్యాలు పండించండి. ఈ పంటలు వర్షాకాలంలో బాగా పెరుగుతాయి."),
            (Topic::Pest, "సాధారణ పురుగులు: పేనుబంక (చిన్న ఆకుపచ్చ పురుగులు), కాయతొలుచు పురుగు మరియు కాండం తొలుచు పురుగు. వేప నూనె, ఫెరోమోన్ ఉచ్చులు వాడండి లేదా స్థానిక వ్యవసాయ అధికారిని సంప్రదించండి."),
            (Topic::Disease, "సాధారణ మొక్కల వ్యాధులు: ఆకుమచ్చ తెగులు, తుప్పు తెగులు (నారింజ మచ్చలు) మరియు వడలు తెగులు. నీటి పారుదల మెరుగుపరచండి, కాపర్ శిలీంద్రనాశిని వాడండి."),
            (Topic::Weather, "వాతావరణ సూచనలను క్రమం తప్పకుండా గమనించండి. వర్షాకాలంలో సరైన నీటి పారుదల ఉండేలా చూడండి. పొడి కాలంలో బిందు సేద్యం వాడండి."),
            (Topic::Default, "వ్యవసాయ ప్రశ్నలకు సహాయం చేయడానికి నేను ఇక్కడ ఉన్నాను! పంటలు, పురుగులు, వ్యాధులు లేదా వ్యవసాయ పద్ధతుల గురించి అడగండి."),
        ],
    ),
    (
        Language::Marathi,
        &[
            (Topic::Crop, "जुलै/पावसाळ्यात भात, कापूस, ऊस, मका किंवा कडधान्ये घ्या. ही पिके पावसाळ्यात चांगली येतात."),
            (Topic::Pest, "सामान्य कीड म्हणजे मावा (लहान हिरवे कीटक), बोंडअळी आणि खोडकिडा. कडुलिंबाचे तेल, फेरोमोन सापळे वापरा किंवा स्थानिक कृषी अधिकाऱ्यांचा सल्ला घ्या."),
            (Topic::Disease, "सामान्य पीक रोग म्हणजे करपा (पानांवरील ठिपके), तांबेरा (नारिंगी ठिपके) आणि मर रोग. पाण्याचा निचरा सुधारा, कॉपर बुरशीनाशक वापरा."),
            (Topic::Weather, "हवामानाचा अंदाज नियमित पाहा. पावसाळ्यात पाण्याचा योग्य निचरा ठेवा. कोरड्या काळात ठिबक सिंचन वापरा."),
            (Topic::Default, "शेतीविषयक प्रश्नांसाठी मी मदतीला आहे! पिके, कीड, रोग किंवा शेती पद्धतींबद्दल विचारा."),
        ],
    ),
];

// Keywords match as token prefixes, so stems are enough ("attack" covers
// "attacking", "ಕೀಟ" covers "ಕೀಟಗಳು").
const KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::Crop,
        &[
            "grow", "plant", "sow", "july", "monsoon", "season",
            "उगा", "बोना", "बोने", "बोए", "बोया", "बुवाई", "मौसम",
            "ಬೆಳೆಯ",
            "பயிரிட", "விதை", "பருவ",
            "పండించ", "విత్త", "సాగు",
            "लागवड", "पेर", "हंगाम",
        ],
    ),
    (
        Topic::Pest,
        &[
            "pest", "insect", "bug", "damage", "attack", "control",
            // कीड़ with the nukta both decomposed and precomposed
            "कीट", "\u{915}\u{940}\u{921}\u{93c}", "\u{915}\u{940}\u{95c}", "माहू", "नुकसान",
            "ಕೀಟ", "ಹಾನಿ",
            "பூச்சி", "புழு",
            "పురుగు", "చీడ",
            "कीड", "अळी", "मावा",
        ],
    ),
    (
        Topic::Disease,
        &[
            "disease", "sick", "spot", "yellow", "dying", "fungus", "virus",
            "बीमारी", "रोग", "पीला", "पीली", "मरना", "मरने", "मर रह", "मुरझा",
            "ರೋಗ", "ಬಾಡು",
            "நோய்", "வாட", "புள்ளி",
            "తెగులు", "వ్యాధి", "మచ్చ",
            "करपा", "ठिपके",
        ],
    ),
    (
        Topic::Weather,
        &[
            "weather", "rain", "drought", "water", "irrigation",
            "बारिश", "सूखा", "पानी",
            "ಹವಾಮಾನ", "ಮಳೆ",
            "வானிலை", "மழை", "வறட்சி", "நீர்",
            "వాతావరణ", "వర్ష", "కరువు", "నీరు",
            "हवामान", "पाऊस", "दुष्काळ", "पाणी",
        ],
    ),
];

const CROP_TERMS: &[&str] = &[
    // generic crop nouns
    "crop", "farming", "फसल", "खेती", "ಬೆಳೆ", "ಕೃಷಿ", "பயிர்", "விவசாய", "పంట", "వ్యవసాయ", "पीक", "पिके", "शेती",
    // crop names
    "rice", "wheat", "cotton", "sugarcane", "maize", "corn", "tomato", "potato", "onion",
    "धान", "गेहूं", "कपास", "गन्ना", "मक्का",
    "ಅಕ್ಕಿ", "ಹತ್ತಿ", "ಕಬ್ಬು", "ಮೆಕ್ಕೆಜೋಳ",
    "நெல்", "பருத்தி", "கரும்பு", "சோளம்", "தக்காளி",
    "వరి", "పత్తి", "చెరకు", "మొక్కజొన్న", "టమాట",
    "भात", "गहू", "कापूस", "ऊस", "मका", "कांदा",
];

fn build_builtin() -> KnowledgeBase {
    let responses = RESPONSES
        .iter()
        .map(|(lang, table)| {
            let table = table
                .iter()
                .map(|(topic, text)| (*topic, text.to_string()))
                .collect();
            (*lang, table)
        })
        .collect();

    let keywords = KEYWORDS
        .iter()
        .map(|(topic, words)| (*topic, words.iter().map(|w| w.to_string()).collect()))
        .collect();

    KnowledgeBase {
        responses,
        keywords,
        crop_terms: CROP_TERMS.iter().map(|t| t.to_string()).collect(),
    }
}

//! Triage Configuration Management
//!
//! Term tables and extraction settings are immutable once loaded. The
//! compiled-in defaults cover English, Hindi and Tamil; a TOML file can
//! replace any section.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Intent;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Trigger terms per intent
    pub intents: Vec<IntentTerms>,

    /// Entity lexicon and patterns for the rule-based model
    pub entities: EntityConfig,

    /// Keyword extraction settings
    pub keywords: KeywordConfig,

    /// Which optional collaborators to bring up at start-up
    pub capabilities: CapabilitiesConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            intents: default_intent_terms(),
            entities: EntityConfig::default(),
            keywords: KeywordConfig::default(),
            capabilities: CapabilitiesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TriageConfig {
    /// Load from a TOML file and validate it
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check the tables for structural problems
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for entry in &self.intents {
            if entry.intent.is_fallback() {
                return Err(ConfigError::InvalidValue {
                    key: "intents.intent".to_string(),
                    value: format!("{} cannot carry trigger terms", entry.intent),
                });
            }
            if !seen.insert(entry.intent) {
                return Err(ConfigError::InvalidValue {
                    key: "intents.intent".to_string(),
                    value: format!("{} declared twice", entry.intent),
                });
            }
            if let Some(blank) = entry.terms.iter().find(|t| t.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: format!("intents.{}.terms", entry.intent),
                    value: format!("{blank:?}"),
                });
            }
        }

        for category in &self.entities.categories {
            if category.label.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "entities.categories.label".to_string(),
                    value: String::new(),
                });
            }
            if let Some(blank) = category.terms.iter().find(|t| t.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: format!("entities.categories.{}.terms", category.label),
                    value: format!("{blank:?}"),
                });
            }
        }

        if self.keywords.top_n == 0 {
            return Err(ConfigError::InvalidValue {
                key: "keywords.top_n".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }

    /// Terms declared for one intent (empty for `General` or undeclared)
    pub fn terms_for(&self, intent: Intent) -> &[String] {
        self.intents
            .iter()
            .find(|entry| entry.intent == intent)
            .map(|entry| entry.terms.as_slice())
            .unwrap_or(&[])
    }
}

/// Trigger terms for a single intent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentTerms {
    pub intent: Intent,
    pub terms: Vec<String>,
}

impl IntentTerms {
    fn new(intent: Intent, terms: &[&str]) -> Self {
        Self {
            intent,
            terms: to_strings(terms),
        }
    }
}

/// Default trigger tables. Declaration order follows matching priority.
pub fn default_intent_terms() -> Vec<IntentTerms> {
    vec![
        IntentTerms::new(
            Intent::Nutrition,
            &[
                "eat", "diet", "food", "nutrition", "vitamin", "protein", "iron", "calcium",
                // Hindi
                "खाना", "भोजन", "आहार",
                // Tamil
                "உணவு", "ஆஹாரம்", "சாப்பிட",
            ],
        ),
        IntentTerms::new(
            Intent::Medicine,
            &[
                "paracetamol", "ibuprofen", "tablet", "dose", "drug", "medicine", "medication",
                // Hindi
                "दवा", "गोली",
                // Tamil
                "மருந்து", "டோஸ்",
            ],
        ),
        IntentTerms::new(
            Intent::Emergency,
            &[
                "emergency", "urgent", "bleeding", "unconscious", "chest pain", "stroke",
                "ambulance",
                // Hindi
                "आपात", "इमरजेंसी", "अचेत",
                // Tamil
                "அவசரம்", "இரத்த", "உடல் வலி",
            ],
        ),
    ]
}

// ============================================================================
// Entities
// ============================================================================

/// Rule-based entity model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Labelled term lists, matched whole-word
    pub categories: Vec<EntityCategory>,

    /// Labelled regular expressions
    pub patterns: Vec<EntityPattern>,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            categories: default_entity_categories(),
            patterns: default_entity_patterns(),
        }
    }
}

/// A label and the terms that produce it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityCategory {
    pub label: String,
    pub terms: Vec<String>,
}

impl EntityCategory {
    fn new(label: &str, terms: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            terms: to_strings(terms),
        }
    }
}

/// A label and a regex that produces it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPattern {
    pub label: String,
    pub pattern: String,
}

impl EntityPattern {
    fn new(label: &str, pattern: &str) -> Self {
        Self {
            label: label.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

fn default_entity_categories() -> Vec<EntityCategory> {
    vec![
        EntityCategory::new(
            "cardiology",
            &[
                "heart", "chest pain", "cardiac", "blood pressure", "hypertension",
                "cholesterol", "दिल", "सीने में दर्द", "हृदय", "बीपी", "कोलेस्ट्रॉल", "இதயம்",
                "மார்பு வலி", "இரத்த அழுத்தம்", "கொலஸ்ட்ரால்",
            ],
        ),
        EntityCategory::new(
            "hematology",
            &[
                "hemoglobin", "anemia", "blood", "iron deficiency", "hb", "हीमोग्लोबिन", "खून",
                "एनीमिया", "आयरन", "ஹீமோகுளோபின்", "இரத்தம்", "இரத்த சோகை", "இரும்பு",
            ],
        ),
        EntityCategory::new(
            "nutrition",
            &[
                "eat", "diet", "food", "nutrition", "vitamin", "protein", "calcium", "fruits",
                "vegetables", "खाना", "भोजन", "आहार", "विटामिन", "प्रोटीन", "कैल्शियम", "உணவு",
                "ஆஹாரம்", "வைட்டமின்", "புரதம்", "கால்சியம்",
            ],
        ),
        EntityCategory::new(
            "pharmacology",
            &[
                "paracetamol", "ibuprofen", "tablet", "dose", "drug", "medicine", "medication",
                "pills", "दवा", "गोली", "पैरासिटामोल", "दवाई", "மருந்து", "பைராசிட்டமால்",
                "மாத்திரை",
            ],
        ),
        EntityCategory::new(
            "emergency",
            &[
                "emergency", "urgent", "bleeding", "unconscious", "chest pain", "stroke",
                "accident", "आपात", "घातक", "अचानक", "बेहोश", "दुर्घटना", "அவசரம்", "கொடுதுயரம்",
                "மயக்கம்", "விபத்து",
            ],
        ),
        EntityCategory::new(
            "gynecology",
            &[
                "pregnancy", "pregnant", "menstruation", "periods", "gynecology", "obstetrics",
                "गर्भावस्था", "गर्भवती", "माहवारी", "प्रसूति", "கர்ப்பம்", "கர்ப்பிணி",
                "மாதவிடாய்", "மகப்பேறு",
            ],
        ),
        EntityCategory::new(
            "immunology",
            &[
                "immunity", "immune", "infection", "fever", "cold", "flu", "antibody",
                "प्रतिरक्षा", "संक्रमण", "बुखार", "सर्दी", "फ्लू", "நோய் எதிர்ப்பு", "தொற்று",
                "காய்ச்சல்", "சளி",
            ],
        ),
    ]
}

fn default_entity_patterns() -> Vec<EntityPattern> {
    vec![
        EntityPattern::new("dosage", r"\b\d+(?:\.\d+)?\s*(?:mg|mcg|g|ml|iu)\b"),
        EntityPattern::new("dosage", r"\b\d+\s*(?:tablets?|pills?|capsules?|drops?)\b"),
        EntityPattern::new("duration", r"\b\d+\s*(?:hours?|days?|weeks?|months?|years?)\b"),
    ]
}

// ============================================================================
// Keywords
// ============================================================================

/// Keyword extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Number of keywords returned when the caller does not ask for a count
    pub top_n: usize,

    /// Stopwords dropped by the frequency fallback
    pub stopwords: Vec<String>,

    /// Stopwords that delimit candidate phrases for the RAKE ranker
    pub rake_stopwords: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            stopwords: to_strings(FALLBACK_STOPWORDS),
            rake_stopwords: to_strings(RAKE_STOPWORDS),
        }
    }
}

const FALLBACK_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "were", "will", "with",
];

const RAKE_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours", "you're",
    "you've", "you'll", "you'd", "yourself", "yourselves", "he", "him", "his", "himself", "she",
    "her", "hers", "herself", "she's", "it", "it's", "its", "itself", "they", "them", "their",
    "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll", "these",
    "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because",
    "as", "until", "while", "of", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from", "up", "down", "in",
    "out", "on", "off", "over", "under", "again", "further", "then", "once", "here", "there",
    "when", "where", "why", "how", "all", "any", "both", "each", "few", "more", "most", "other",
    "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s",
    "t", "can", "will", "just", "don", "don't", "should", "should've", "now", "d", "ll", "m", "o",
    "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn",
    "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma",
    "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

// ============================================================================
// Capabilities
// ============================================================================

/// Optional collaborators requested at start-up
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilitiesConfig {
    /// Bring up the rule-based entity model
    pub entity_model: bool,

    /// Bring up the RAKE phrase ranker
    pub keyword_ranker: bool,
}

impl Default for CapabilitiesConfig {
    fn default() -> Self {
        Self {
            entity_model: true,
            keyword_ranker: true,
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_config() {
        let config = TriageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.keywords.top_n, 5);
        assert!(config.terms_for(Intent::Nutrition).contains(&"eat".to_string()));
        assert!(config.terms_for(Intent::General).is_empty());
    }

    #[test]
    fn test_builtin_declares_intents_in_priority_order() {
        let config = TriageConfig::default();
        let order: Vec<Intent> = config.intents.iter().map(|e| e.intent).collect();
        assert_eq!(order, Intent::PRIORITY.to_vec());
    }

    #[test]
    fn test_fallback_stopwords() {
        let config = KeywordConfig::default();
        assert_eq!(config.stopwords.len(), 25);
        assert!(config.stopwords.contains(&"the".to_string()));
    }

    #[test]
    fn test_rake_stopwords_are_nltk_english() {
        let config = KeywordConfig::default();
        assert_eq!(config.rake_stopwords.len(), 179);
        assert!(config.rake_stopwords.contains(&"me".to_string()));
        assert!(config.rake_stopwords.contains(&"wouldn".to_string()));
        assert!(!config.rake_stopwords.contains(&"give".to_string()));
    }

    #[test]
    fn test_builtin_entity_lexicon() {
        let config = EntityConfig::default();
        let terms = |label: &str| -> Vec<String> {
            config
                .categories
                .iter()
                .find(|c| c.label == label)
                .map(|c| c.terms.clone())
                .unwrap_or_default()
        };

        assert!(terms("nutrition").contains(&"eat".to_string()));
        assert!(terms("pharmacology").contains(&"dose".to_string()));
        for term in ["urgent", "chest pain", "घातक", "अचानक", "கொடுதுயரம்"] {
            assert!(terms("emergency").contains(&term.to_string()), "{term}");
        }
        assert_eq!(config.categories.len(), 7);
    }

    #[test]
    fn test_rejects_general_terms() {
        let mut config = TriageConfig::default();
        config.intents.push(IntentTerms::new(Intent::General, &["water"]));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_intent() {
        let mut config = TriageConfig::default();
        config.intents.push(IntentTerms::new(Intent::Medicine, &["pill"]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_blank_term() {
        let mut config = TriageConfig::default();
        config.intents[0].terms.push("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            [[intents]]
            intent = "emergency"
            terms = ["ambulance", "help"]

            [keywords]
            top_n = 3

            [logging]
            level = "debug"
        "#;

        let config: TriageConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.intents.len(), 1);
        assert_eq!(config.terms_for(Intent::Emergency).len(), 2);
        assert_eq!(config.keywords.top_n, 3);
        // untouched sections keep their defaults
        assert!(!config.keywords.stopwords.is_empty());
        assert!(config.capabilities.keyword_ranker);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_shipped_config_parses() {
        let config: TriageConfig =
            toml::from_str(include_str!("../../../config/triage.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert!(config
            .terms_for(Intent::Emergency)
            .contains(&"heart attack".to_string()));
        assert_eq!(config.logging.level, "info");
        // entity lexicon was not overridden
        assert!(!config.entities.categories.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = TriageConfig::from_file("/nonexistent/triage.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileReadError { .. }));
    }
}

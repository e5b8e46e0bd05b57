//! Triage pipeline
//!
//! Runs the three stages over one query. The stages share nothing but the
//! input string.

use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_core::{Intent, Language, Result, TriageConfig};

use crate::capabilities::Capabilities;
use crate::intent::IntentClassifier;
use crate::keywords::{
    extract_keywords, extract_keywords_with_source, FrequencyKeywords, KeywordSource,
};
use crate::language::detect_language;
use crate::ner::extract_entities;
use crate::Entity;

/// Aggregated result for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageReport {
    pub query: String,
    pub language: Language,
    pub intent: Intent,
    /// Trigger term that decided the intent
    pub matched_term: Option<String>,
    pub entities: Vec<Entity>,
    pub keywords: Vec<String>,
    pub keyword_source: KeywordSource,
}

impl std::fmt::Display for TriageReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entities: Vec<String> = self
            .entities
            .iter()
            .map(|e| format!("({}, {})", e.text, e.label))
            .collect();

        writeln!(f, "Q: {}", self.query)?;
        writeln!(f, "Language: {}", self.language)?;
        writeln!(f, "Intent  : {}", self.intent)?;
        writeln!(f, "Entities: [{}]", entities.join(", "))?;
        write!(f, "Keywords: [{}]", self.keywords.join(", "))
    }
}

/// Intent classifier plus the collaborators detected at start-up
#[derive(Debug)]
pub struct Triage {
    classifier: IntentClassifier,
    capabilities: Capabilities,
    fallback: FrequencyKeywords,
    top_n: usize,
}

impl Triage {
    /// Build with explicit collaborators
    pub fn new(config: &TriageConfig, capabilities: Capabilities) -> Result<Self> {
        config.validate()?;

        let classifier = IntentClassifier::new(config)?;
        debug!(
            intents = ?classifier.intents().collect::<Vec<_>>(),
            "intent classifier ready"
        );

        Ok(Self {
            classifier,
            capabilities,
            fallback: FrequencyKeywords::new(&config.keywords.stopwords),
            top_n: config.keywords.top_n,
        })
    }

    /// Build, detecting collaborators from `config`
    pub fn from_config(config: &TriageConfig) -> Result<Self> {
        Self::new(config, Capabilities::detect(config))
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn classify(&self, text: &str) -> Intent {
        self.classifier.classify(text)
    }

    pub fn entities(&self, text: &str) -> Vec<Entity> {
        extract_entities(text, self.capabilities.entity_model())
    }

    pub fn keywords(&self, text: &str, top_n: usize) -> Vec<String> {
        extract_keywords(text, top_n, self.capabilities.keyword_ranker(), &self.fallback)
    }

    /// Run all stages with the configured keyword count
    pub fn analyze(&self, text: &str) -> TriageReport {
        self.analyze_with(text, self.top_n)
    }

    /// Run all stages, returning at most `top_n` keywords
    pub fn analyze_with(&self, text: &str, top_n: usize) -> TriageReport {
        let decision = self.classifier.classify_detailed(text);
        let entities = self.entities(text);
        let (keywords, keyword_source) = extract_keywords_with_source(
            text,
            top_n,
            self.capabilities.keyword_ranker(),
            &self.fallback,
        );

        let language = detect_language(text);

        debug!(
            %language,
            intent = %decision.intent,
            entities = entities.len(),
            keywords = keywords.len(),
            "query triaged"
        );

        TriageReport {
            query: text.to_string(),
            language,
            intent: decision.intent,
            matched_term: decision.term,
            entities,
            keywords,
            keyword_source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_full() {
        let triage = Triage::from_config(&TriageConfig::default()).unwrap();
        let report = triage.analyze("Is ibuprofen safe with paracetamol?");

        assert_eq!(report.intent, Intent::Medicine);
        assert_eq!(report.matched_term.as_deref(), Some("ibuprofen"));
        assert_eq!(report.entities.len(), 2);
        assert_eq!(report.keywords, vec!["ibuprofen safe", "paracetamol"]);
        assert_eq!(report.keyword_source, KeywordSource::Ranker);
    }

    #[test]
    fn test_analyze_degraded() {
        let triage = Triage::new(&TriageConfig::default(), Capabilities::none()).unwrap();
        let report = triage.analyze("Is ibuprofen safe with paracetamol?");

        assert_eq!(report.intent, Intent::Medicine);
        assert!(report.entities.is_empty());
        assert_eq!(report.keyword_source, KeywordSource::Frequency);
        assert_eq!(report.keywords, vec!["ibuprofen", "safe", "paracetamol"]);
    }

    #[test]
    fn test_report_display() {
        let triage = Triage::new(&TriageConfig::default(), Capabilities::none()).unwrap();
        let text = triage.analyze_with("sleep better", 1).to_string();

        assert_eq!(
            text,
            "Q: sleep better\nLanguage: english\nIntent  : general\nEntities: []\nKeywords: [sleep]"
        );
    }

    #[test]
    fn test_report_language() {
        let triage = Triage::new(&TriageConfig::default(), Capabilities::none()).unwrap();

        let hindi = triage.analyze("यह दवा कब लें");
        assert_eq!(hindi.language, Language::Hindi);
        assert_eq!(hindi.intent, Intent::Medicine);
        assert!(hindi.to_string().contains("Language: hindi\n"));

        let tamil = triage.analyze("இது அவசரம் உதவி");
        assert_eq!(tamil.language, Language::Tamil);
        assert_eq!(tamil.intent, Intent::Emergency);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = TriageConfig::default();
        config.keywords.top_n = 0;
        let err = Triage::new(&config, Capabilities::none()).unwrap_err();
        assert!(matches!(err, triage_core::TriageError::Config(_)));
    }

    #[test]
    fn test_report_json() {
        let triage = Triage::from_config(&TriageConfig::default()).unwrap();
        let report = triage.analyze("call an ambulance");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["language"], "english");
        assert_eq!(json["intent"], "emergency");
        assert_eq!(json["matched_term"], "ambulance");
        assert_eq!(json["keyword_source"], "ranker");
    }
}

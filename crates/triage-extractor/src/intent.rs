//! Intent classification
//!
//! Keyword matcher over multilingual trigger tables. Each intent's terms are
//! compiled into one word-boundary anchored alternation; intents are tried in
//! priority order and the first one with any whole-word hit wins.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_core::{Intent, IntentTerms, Result, TriageConfig, TriageError};

/// Classification outcome with the trigger that decided it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentMatch {
    pub intent: Intent,
    /// Lower-cased trigger term, `None` for the fallback
    pub term: Option<String>,
}

impl IntentMatch {
    fn fallback() -> Self {
        Self {
            intent: Intent::General,
            term: None,
        }
    }
}

/// Rule-based intent classifier
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    /// One compiled matcher per intent, in priority order
    rules: Vec<(Intent, Regex)>,
}

impl IntentClassifier {
    /// Build from the configured term tables
    pub fn new(config: &TriageConfig) -> Result<Self> {
        Self::from_terms(&config.intents)
    }

    /// Build from explicit term tables
    pub fn from_terms(tables: &[IntentTerms]) -> Result<Self> {
        let mut rules = Vec::new();

        for intent in Intent::PRIORITY {
            let terms: Vec<String> = tables
                .iter()
                .filter(|entry| entry.intent == intent)
                .flat_map(|entry| entry.terms.iter())
                .map(|term| term.trim().to_lowercase())
                .collect();

            if terms.iter().any(|t| t.is_empty()) {
                return Err(TriageError::InvalidTerms(format!(
                    "blank trigger term for {intent}"
                )));
            }

            if let Some(pattern) = term_alternation(&terms) {
                let regex =
                    Regex::new(&pattern).map_err(|e| TriageError::Pattern(e.to_string()))?;
                rules.push((intent, regex));
            }
        }

        if let Some(entry) = tables.iter().find(|e| e.intent.is_fallback()) {
            if !entry.terms.is_empty() {
                return Err(TriageError::InvalidTerms(format!(
                    "{} is the fallback and cannot carry trigger terms",
                    entry.intent
                )));
            }
        }

        Ok(Self { rules })
    }

    /// Return the intent label for `text`
    pub fn classify(&self, text: &str) -> Intent {
        self.classify_detailed(text).intent
    }

    /// Return the intent label together with the trigger term that matched
    pub fn classify_detailed(&self, text: &str) -> IntentMatch {
        let text_lc = text.to_lowercase();

        for (intent, regex) in &self.rules {
            if let Some(mat) = regex.find(&text_lc) {
                debug!(intent = %intent, term = mat.as_str(), "matched intent");
                return IntentMatch {
                    intent: *intent,
                    term: Some(mat.as_str().to_string()),
                };
            }
        }

        debug!("no intent match, defaulting to general");
        IntentMatch::fallback()
    }

    /// Intents that have at least one trigger term, in matching order
    pub fn intents(&self) -> impl Iterator<Item = Intent> + '_ {
        self.rules.iter().map(|(intent, _)| *intent)
    }
}

/// Build `\b(?:t1|t2|...)\b` from literal terms, longest first so the
/// widest span wins at a given start. `None` when there are no terms.
pub(crate) fn term_alternation<S: AsRef<str>>(terms: &[S]) -> Option<String> {
    let mut sorted: Vec<&str> = terms.iter().map(|t| t.as_ref()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    sorted.dedup();

    let alternatives: Vec<String> = sorted.iter().map(|t| regex::escape(t)).collect();
    Some(format!(r"\b(?:{})\b", alternatives.join("|")))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(&TriageConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_is_general() {
        assert_eq!(classifier().classify(""), Intent::General);
    }

    #[test]
    fn test_nutrition() {
        let c = classifier();
        assert_eq!(
            c.classify("What should I eat to increase hemoglobin?"),
            Intent::Nutrition
        );
    }

    #[test]
    fn test_medicine() {
        let c = classifier();
        assert_eq!(
            c.classify("Is ibuprofen safe with paracetamol?"),
            Intent::Medicine
        );
    }

    #[test]
    fn test_emergency() {
        let c = classifier();
        assert_eq!(
            c.classify("My mother is unconscious – what do I do?"),
            Intent::Emergency
        );
        assert_eq!(c.classify("call an AMBULANCE now"), Intent::Emergency);
    }

    #[test]
    fn test_general() {
        assert_eq!(
            classifier().classify("Give me exercises to sleep better."),
            Intent::General
        );
    }

    #[test]
    fn test_whole_word_only() {
        let c = classifier();
        assert_eq!(c.classify("how do I treat a cut"), Intent::General);
        assert_eq!(c.classify("the weather is great"), Intent::General);
        assert_eq!(c.classify("I eat rice"), Intent::Nutrition);
        assert_eq!(c.classify("treatment, EAT."), Intent::Nutrition);
    }

    #[test]
    fn test_case_insensitive() {
        let c = classifier();
        assert_eq!(c.classify("EAT"), c.classify("eat"));
        assert_eq!(c.classify("Chest Pain since morning"), Intent::Emergency);
    }

    #[test]
    fn test_priority_nutrition_over_emergency() {
        let c = classifier();
        assert_eq!(
            c.classify("urgent: what food helps after bleeding"),
            Intent::Nutrition
        );
        assert_eq!(c.classify("urgent dose question"), Intent::Medicine);
        assert_eq!(c.classify("emergency dose"), Intent::Medicine);
    }

    #[test]
    fn test_multi_word_term() {
        let detail = classifier().classify_detailed("sudden chest pain and sweating");
        assert_eq!(detail.intent, Intent::Emergency);
        assert_eq!(detail.term.as_deref(), Some("chest pain"));
    }

    #[test]
    fn test_hindi_and_tamil() {
        let c = classifier();
        assert_eq!(c.classify("मुझे क्या भोजन करना चाहिए"), Intent::Nutrition);
        assert_eq!(c.classify("यह दवा कब लें"), Intent::Medicine);
        assert_eq!(c.classify("இது அவசரம் உதவி"), Intent::Emergency);
        assert_eq!(c.classify("क्या यह दवा?"), Intent::Medicine);
        // a term does not fire inside a longer inflected word
        assert_eq!(c.classify("சாப்பிடலாம்"), Intent::General);
        assert_eq!(c.classify("நான் சாப்பிட வேண்டும்"), Intent::Nutrition);
    }

    #[test]
    fn test_detailed_fallback_has_no_term() {
        let detail = classifier().classify_detailed("hello there");
        assert_eq!(detail.intent, Intent::General);
        assert!(detail.term.is_none());
    }

    #[test]
    fn test_priority_ignores_table_order() {
        let tables = vec![
            IntentTerms {
                intent: Intent::Emergency,
                terms: vec!["help".to_string()],
            },
            IntentTerms {
                intent: Intent::Nutrition,
                terms: vec!["snack".to_string()],
            },
        ];
        let c = IntentClassifier::from_terms(&tables).unwrap();
        assert_eq!(c.classify("help me pick a snack"), Intent::Nutrition);
        assert_eq!(
            c.intents().collect::<Vec<_>>(),
            vec![Intent::Nutrition, Intent::Emergency]
        );
    }

    #[test]
    fn test_rejects_general_terms() {
        let tables = vec![IntentTerms {
            intent: Intent::General,
            terms: vec!["water".to_string()],
        }];
        assert!(matches!(
            IntentClassifier::from_terms(&tables),
            Err(TriageError::InvalidTerms(_))
        ));
    }

    #[test]
    fn test_terms_are_literal() {
        let tables = vec![IntentTerms {
            intent: Intent::Medicine,
            terms: vec!["b.i.d".to_string()],
        }];
        let c = IntentClassifier::from_terms(&tables).unwrap();
        assert_eq!(c.classify("take it b.i.d"), Intent::Medicine);
        assert_eq!(c.classify("take it bxixd"), Intent::General);
    }

    #[test]
    fn test_term_alternation() {
        assert_eq!(term_alternation::<&str>(&[]), None);
        let pattern = term_alternation(&["eat", "chest pain"]).unwrap();
        assert_eq!(pattern, r"\b(?:chest pain|eat)\b");
    }
}

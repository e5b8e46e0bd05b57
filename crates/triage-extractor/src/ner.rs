//! Named Entity Recognition (NER) module
//!
//! The entity model is an optional collaborator. `extract_entities` runs
//! whichever model was detected at start-up and degrades to an empty list
//! when none is available or the model fails.
//!
//! `RuleBasedNer` is the built-in model: labelled medical term lists plus
//! regex patterns for dosages and durations.

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use triage_core::{EntityConfig, Result, TriageError};

use crate::intent::term_alternation;
use crate::{Entity, EntityModel};

/// Run `model` over `text`, or return nothing if there is no model
pub fn extract_entities(text: &str, model: Option<&dyn EntityModel>) -> Vec<Entity> {
    let Some(model) = model else {
        return Vec::new();
    };

    match model.extract(text) {
        Ok(entities) => entities,
        Err(e) => {
            warn!(error = %e, "entity model failed, returning no entities");
            Vec::new()
        }
    }
}

// ============================================================================
// Rule-based NER
// ============================================================================

/// Rule-based NER using regex patterns and labelled dictionaries
#[derive(Debug, Clone)]
pub struct RuleBasedNer {
    /// Pattern rules (regex -> label)
    patterns: Vec<(Regex, String)>,
    /// Dictionary rules, one alternation per label
    dictionary: Vec<(Regex, String)>,
}

impl RuleBasedNer {
    /// Compile the configured lexicon and patterns
    pub fn new(config: &EntityConfig) -> Result<Self> {
        let mut patterns = Vec::with_capacity(config.patterns.len());
        for rule in &config.patterns {
            patterns.push((compile(&rule.pattern)?, rule.label.clone()));
        }

        let mut dictionary = Vec::with_capacity(config.categories.len());
        for category in &config.categories {
            let terms: Vec<&str> = category.terms.iter().map(|t| t.trim()).collect();
            if terms.iter().any(|t| t.is_empty()) {
                return Err(TriageError::InvalidTerms(format!(
                    "blank term for entity label {}",
                    category.label
                )));
            }
            if let Some(pattern) = term_alternation(&terms) {
                dictionary.push((compile(&pattern)?, category.label.clone()));
            }
        }

        debug!(
            patterns = patterns.len(),
            labels = dictionary.len(),
            "rule-based NER ready"
        );

        Ok(Self {
            patterns,
            dictionary,
        })
    }

    /// Labels this model can produce, in declaration order
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for (_, label) in self.patterns.iter().chain(self.dictionary.iter()) {
            if !labels.contains(&label.as_str()) {
                labels.push(label);
            }
        }
        labels
    }

    fn find_all(rules: &[(Regex, String)], text: &str, out: &mut Vec<Entity>) {
        for (regex, label) in rules {
            for mat in regex.find_iter(text) {
                out.push(Entity {
                    text: mat.as_str().to_string(),
                    label: label.clone(),
                    start: mat.start(),
                    end: mat.end(),
                });
            }
        }
    }

    /// Drop overlapping spans: earliest start wins, then the longest span,
    /// then declaration order (patterns before dictionary terms).
    fn deduplicate(mut entities: Vec<Entity>) -> Vec<Entity> {
        entities.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then((b.end - b.start).cmp(&(a.end - a.start)))
        });

        let mut result = Vec::with_capacity(entities.len());
        let mut covered_to = 0;

        for entity in entities {
            if entity.start >= covered_to {
                covered_to = entity.end;
                result.push(entity);
            }
        }

        result
    }
}

impl EntityModel for RuleBasedNer {
    fn extract(&self, text: &str) -> Result<Vec<Entity>> {
        let mut entities = Vec::new();

        Self::find_all(&self.patterns, text, &mut entities);
        Self::find_all(&self.dictionary, text, &mut entities);

        Ok(Self::deduplicate(entities))
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| TriageError::Pattern(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================

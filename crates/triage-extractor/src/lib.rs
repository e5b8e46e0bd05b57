//! Triage Extractor - Query triage pipeline
//!
//! Implements intent classification, named entity extraction,
//! keyword extraction and language detection for free-text health queries.

use serde::{Deserialize, Serialize};

use triage_core::Result;

/// Named span extracted from text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    /// Byte offset into the input
    pub start: usize,
    pub end: usize,
}

/// Trait for entity models
pub trait EntityModel: Send + Sync {
    fn extract(&self, text: &str) -> Result<Vec<Entity>>;
}

/// Trait for keyword rankers. Phrases are returned best first.
pub trait KeywordRanker: Send + Sync {
    fn name(&self) -> &str;
    fn rank(&self, text: &str) -> Result<Vec<String>>;
}

pub mod capabilities;
pub mod intent;
pub mod keywords;
pub mod language;
pub mod ner;
pub mod pipeline;

pub use capabilities::Capabilities;
pub use intent::{IntentClassifier, IntentMatch};
pub use keywords::{
    extract_keywords, extract_keywords_with_source, FrequencyKeywords, KeywordSource, RakeRanker,
};
pub use language::detect_language;
pub use ner::{extract_entities, RuleBasedNer};
pub use pipeline::{Triage, TriageReport};

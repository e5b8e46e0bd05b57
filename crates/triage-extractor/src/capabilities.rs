//! Optional collaborators
//!
//! Entity models and keyword rankers are brought up once at start-up and
//! handed to the functions that use them. A collaborator that cannot be
//! built is logged and left out; the corresponding stage then runs its
//! degraded path.

use tracing::{debug, info, warn};

use triage_core::TriageConfig;

use crate::keywords::RakeRanker;
use crate::ner::RuleBasedNer;
use crate::{EntityModel, KeywordRanker};

/// Collaborators available to the pipeline
#[derive(Default)]
pub struct Capabilities {
    entity_model: Option<Box<dyn EntityModel>>,
    keyword_ranker: Option<Box<dyn KeywordRanker>>,
}

impl Capabilities {
    /// No collaborators: empty entities, frequency keywords
    pub fn none() -> Self {
        Self::default()
    }

    /// Build the collaborators enabled in `config`, swallowing failures
    pub fn detect(config: &TriageConfig) -> Self {
        let mut capabilities = Self::none();

        if config.capabilities.entity_model {
            match RuleBasedNer::new(&config.entities) {
                Ok(model) => {
                    debug!(labels = ?model.labels(), "entity model ready");
                    capabilities.entity_model = Some(Box::new(model));
                }
                Err(e) => warn!(error = %e, "entity model unavailable"),
            }
        }

        if config.capabilities.keyword_ranker {
            match RakeRanker::new(&config.keywords.rake_stopwords) {
                Ok(ranker) => capabilities.keyword_ranker = Some(Box::new(ranker)),
                Err(e) => warn!(error = %e, "keyword ranker unavailable"),
            }
        }

        info!(
            entity_model = capabilities.has_entity_model(),
            keyword_ranker = capabilities.has_keyword_ranker(),
            "capabilities detected"
        );
        capabilities
    }

    /// Use `model` for entity extraction
    pub fn with_entity_model(mut self, model: impl EntityModel + 'static) -> Self {
        self.entity_model = Some(Box::new(model));
        self
    }

    /// Use `ranker` for keyword extraction
    pub fn with_keyword_ranker(mut self, ranker: impl KeywordRanker + 'static) -> Self {
        self.keyword_ranker = Some(Box::new(ranker));
        self
    }

    /// Drop the entity model
    pub fn without_entity_model(mut self) -> Self {
        self.entity_model = None;
        self
    }

    /// Drop the keyword ranker
    pub fn without_keyword_ranker(mut self) -> Self {
        self.keyword_ranker = None;
        self
    }

    pub fn entity_model(&self) -> Option<&dyn EntityModel> {
        self.entity_model.as_deref()
    }

    pub fn keyword_ranker(&self) -> Option<&dyn KeywordRanker> {
        self.keyword_ranker.as_deref()
    }

    pub fn has_entity_model(&self) -> bool {
        self.entity_model.is_some()
    }

    pub fn has_keyword_ranker(&self) -> bool {
        self.keyword_ranker.is_some()
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("entity_model", &self.has_entity_model())
            .field(
                "keyword_ranker",
                &self.keyword_ranker.as_ref().map(|r| r.name()),
            )
            .finish()
    }
}

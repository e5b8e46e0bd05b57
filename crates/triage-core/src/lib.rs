//! Triage Core - Domain models, errors and shared configuration
//!
//! This crate defines the abstractions shared by the triage pipeline:
//! - The closed intent taxonomy
//! - Query languages
//! - Common error types
//! - Configuration (term tables, keyword settings, logging)

pub mod config;

pub use config::{
    CapabilitiesConfig, ConfigError, EntityCategory, EntityConfig, EntityPattern, IntentTerms,
    KeywordConfig, LoggingConfig, TriageConfig,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for triage operations
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Invalid intent: {0}")]
    InvalidIntent(String),

    #[error("Invalid term table: {0}")]
    InvalidTerms(String),

    #[error("Pattern error: {0}")]
    Pattern(String),

    #[error("Entity model error: {0}")]
    EntityModel(String),

    #[error("Keyword ranker error: {0}")]
    KeywordRanker(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, TriageError>;

// ============================================================================
// Intent taxonomy
// ============================================================================

/// Coarse category of a user query, used for downstream routing.
///
/// Variant order is the matching priority: the classifier checks
/// `Nutrition`, then `Medicine`, then `Emergency`, and falls back to
/// `General` when nothing matched.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Nutrition,
    Medicine,
    Emergency,
    #[default]
    General,
}

impl Intent {
    /// Intents that carry trigger terms, in matching order
    pub const PRIORITY: [Intent; 3] = [Intent::Nutrition, Intent::Medicine, Intent::Emergency];

    /// All intents, including the `General` fallback
    pub const ALL: [Intent; 4] = [
        Intent::Nutrition,
        Intent::Medicine,
        Intent::Emergency,
        Intent::General,
    ];

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nutrition => "nutrition",
            Self::Medicine => "medicine",
            Self::Emergency => "emergency",
            Self::General => "general",
        }
    }

    /// Whether this is the fallback label
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::General)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Intent {
    type Err = TriageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nutrition" => Ok(Self::Nutrition),
            "medicine" => Ok(Self::Medicine),
            "emergency" => Ok(Self::Emergency),
            "general" => Ok(Self::General),
            _ => Err(TriageError::InvalidIntent(s.to_string())),
        }
    }
}

// ============================================================================
// Query language
// ============================================================================

/// Language of a query, decided by script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Tamil,
}

impl Language {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Hindi => "hindi",
            Self::Tamil => "tamil",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Keyword extraction
//!
//! A phrase ranker is an optional collaborator. When none was detected at
//! start-up, or it fails on a given input, keywords come from a plain
//! frequency count over the non-stopword tokens.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use triage_core::{Result, TriageError};

use crate::KeywordRanker;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid regex"));

/// Words, or single punctuation marks that end a candidate phrase
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+|[^\w\s]").expect("valid regex"));

/// Which path produced a keyword list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSource {
    Ranker,
    Frequency,
}

/// Return up to `top_n` keywords for `text`
pub fn extract_keywords(
    text: &str,
    top_n: usize,
    ranker: Option<&dyn KeywordRanker>,
    fallback: &FrequencyKeywords,
) -> Vec<String> {
    extract_keywords_with_source(text, top_n, ranker, fallback).0
}

/// Same as [`extract_keywords`], also reporting which path was used
pub fn extract_keywords_with_source(
    text: &str,
    top_n: usize,
    ranker: Option<&dyn KeywordRanker>,
    fallback: &FrequencyKeywords,
) -> (Vec<String>, KeywordSource) {
    if let Some(ranker) = ranker {
        match ranker.rank(text) {
            Ok(mut phrases) => {
                phrases.truncate(top_n);
                return (phrases, KeywordSource::Ranker);
            }
            Err(e) => {
                warn!(ranker = ranker.name(), error = %e, "keyword ranker failed, using frequency count");
            }
        }
    }

    (fallback.extract(text, top_n), KeywordSource::Frequency)
}

// ============================================================================
// Frequency fallback
// ============================================================================

/// Term-frequency keyword counter
#[derive(Debug, Clone)]
pub struct FrequencyKeywords {
    stopwords: HashSet<String>,
}

impl FrequencyKeywords {
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: stopwords
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Most frequent non-stopword tokens, ties in order of first appearance
    pub fn extract(&self, text: &str, top_n: usize) -> Vec<String> {
        if top_n == 0 {
            return Vec::new();
        }

        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for mat in WORD_RE.find_iter(text) {
            let word = mat.as_str().to_lowercase();
            if self.stopwords.contains(&word) {
                continue;
            }
            match index.get(&word) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(word.clone(), counts.len());
                    counts.push((word, 1));
                }
            }
        }

        // stable sort keeps first-seen order among equal counts
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(top_n);
        counts.into_iter().map(|(word, _)| word).collect()
    }
}

// ============================================================================
// RAKE ranker
// ============================================================================

/// Rapid Automatic Keyword Extraction.
///
/// Candidate phrases are maximal runs of non-stopword words between
/// stopwords and punctuation. Each word scores `degree / frequency`, where
/// degree counts the words it co-occurs with in its phrases (itself
/// included). A phrase scores the sum of its word scores.
#[derive(Debug, Clone)]
pub struct RakeRanker {
    stopwords: HashSet<String>,
    max_words: Option<usize>,
}

impl RakeRanker {
    /// Fails when there are no stopwords to delimit phrases with
    pub fn new<I, S>(stopwords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords: HashSet<String> = stopwords
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        if stopwords.is_empty() {
            return Err(TriageError::KeywordRanker(
                "RAKE needs a stopword list to split phrases".to_string(),
            ));
        }

        Ok(Self {
            stopwords,
            max_words: None,
        })
    }

    /// Skip candidate phrases longer than `max_words`
    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = Some(max_words.max(1));
        self
    }

    fn candidate_phrases(&self, text: &str) -> Vec<Vec<String>> {
        let mut phrases = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for token in TOKEN_RE.find_iter(text) {
            let token = token.as_str().to_lowercase();

            if WORD_RE.is_match(&token) && !self.stopwords.contains(&token) {
                current.push(token);
            } else if !current.is_empty() {
                phrases.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            phrases.push(current);
        }

        match self.max_words {
            Some(max) => phrases.into_iter().filter(|p| p.len() <= max).collect(),
            None => phrases,
        }
    }
}

impl KeywordRanker for RakeRanker {
    fn name(&self) -> &str {
        "rake"
    }

    fn rank(&self, text: &str) -> Result<Vec<String>> {
        let phrases = self.candidate_phrases(text);

        let mut frequency: HashMap<&str, f64> = HashMap::new();
        let mut degree: HashMap<&str, f64> = HashMap::new();
        for phrase in &phrases {
            for word in phrase {
                *frequency.entry(word.as_str()).or_default() += 1.0;
                *degree.entry(word.as_str()).or_default() += phrase.len() as f64;
            }
        }

        let mut seen = HashSet::new();
        let mut scored: Vec<(String, f64)> = Vec::new();
        for phrase in &phrases {
            let joined = phrase.join(" ");
            if !seen.insert(joined.clone()) {
                continue;
            }
            let score: f64 = phrase
                .iter()
                .map(|w| degree[w.as_str()] / frequency[w.as_str()])
                .sum();
            scored.push((joined, score));
        }

        // stable sort keeps first-seen order among equal scores
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(scored.into_iter().map(|(phrase, _)| phrase).collect())
    }
}

// ============================================================================
// Tests
// ============================================================================

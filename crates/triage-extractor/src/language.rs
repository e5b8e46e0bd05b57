//! Script-based language detection
//!
//! Tamil script wins over Devanagari, which wins over the English default,
//! so a query mixing both Indic scripts reports `Tamil`.

use triage_core::Language;

const TAMIL: std::ops::RangeInclusive<char> = '\u{0B80}'..='\u{0BFF}';
const DEVANAGARI: std::ops::RangeInclusive<char> = '\u{0900}'..='\u{097F}';

/// Detect the query language from the scripts it contains
pub fn detect_language(text: &str) -> Language {
    if text.chars().any(|c| TAMIL.contains(&c)) {
        Language::Tamil
    } else if text.chars().any(|c| DEVANAGARI.contains(&c)) {
        Language::Hindi
    } else {
        Language::English
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english() {
        assert_eq!(detect_language("What should I eat?"), Language::English);
        assert_eq!(detect_language(""), Language::English);
        assert_eq!(detect_language("¿Qué debo comer?"), Language::English);
    }

    #[test]
    fn test_hindi() {
        assert_eq!(detect_language("यह दवा कब लें"), Language::Hindi);
        assert_eq!(detect_language("take दवा now"), Language::Hindi);
    }

    #[test]
    fn test_tamil() {
        assert_eq!(detect_language("இது அவசரம் உதவி"), Language::Tamil);
    }

    #[test]
    fn test_tamil_wins_over_devanagari() {
        assert_eq!(detect_language("दवा மருந்து"), Language::Tamil);
        assert_eq!(detect_language("மருந்து दवा"), Language::Tamil);
    }
}

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::{debug, info};

use super::{ScorerError, SentimentScorer};
use crate::config::SentimentConfig;

const BUILTIN_LEXICON: &str = include_str!("lexicon.toml");
const BUILTIN_NAME: &str = "<builtin>";

/// Negated words keep half their strength with the sign flipped
const NEGATION_FACTOR: f64 = -0.5;
/// How many tokens back a negation still applies ("not very good")
const NEGATION_WINDOW: usize = 2;

/// On-disk lexicon layout (TOML)
#[derive(Debug, Deserialize, Default)]
struct LexiconFile {
    #[serde(default)]
    words: HashMap<String, f64>,
    #[serde(default)]
    intensifiers: HashMap<String, f64>,
    #[serde(default)]
    negations: Vec<String>,
}

/// Lexicon Scorer - 辞書ベースの感情極性スコアラー
///
/// Every lexicon word found in the text is one assessment:
/// - an intensifier right before it scales the word's polarity
/// - a negation within the previous two tokens flips and halves it
///
/// The polarity is the mean of all assessments, clamped to [-1, 1].
/// Text without any lexicon word is neutral (0.0).
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negations: HashSet<String>,
}

impl LexiconScorer {
    pub fn builtin() -> Result<Self, ScorerError> {
        let mut scorer = Self {
            words: HashMap::new(),
            intensifiers: HashMap::new(),
            negations: HashSet::new(),
        };
        scorer.merge_str(BUILTIN_LEXICON, BUILTIN_NAME)?;
        Ok(scorer)
    }

    /// Built-in lexicon, plus the configured extra lexicon if any
    pub fn from_config(config: &SentimentConfig) -> Result<Self, ScorerError> {
        let mut scorer = Self::builtin()?;
        if let Some(ref path) = config.lexicon_path {
            let content = std::fs::read_to_string(path).map_err(|e| ScorerError::InvalidLexicon {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            scorer.merge_str(&content, path)?;
            info!("Extra lexicon merged from {}", path);
        }
        info!(
            "Lexicon ready: {} words, {} intensifiers, {} negations",
            scorer.words.len(),
            scorer.intensifiers.len(),
            scorer.negations.len()
        );
        Ok(scorer)
    }

    /// Merge a TOML lexicon over the current one. Later entries win.
    pub fn merge_str(&mut self, content: &str, source: &str) -> Result<(), ScorerError> {
        let invalid = |reason: String| ScorerError::InvalidLexicon {
            path: source.to_string(),
            reason,
        };

        let file: LexiconFile = toml::from_str(content).map_err(|e| invalid(e.to_string()))?;

        for (word, polarity) in &file.words {
            if !polarity.is_finite() || !(-1.0..=1.0).contains(polarity) {
                return Err(invalid(format!("polarity of '{}' out of [-1, 1]: {}", word, polarity)));
            }
        }
        for (word, factor) in &file.intensifiers {
            if !factor.is_finite() || *factor <= 0.0 {
                return Err(invalid(format!("intensifier '{}' must be positive: {}", word, factor)));
            }
        }

        if self.words.is_empty() && file.words.is_empty() {
            return Err(ScorerError::EmptyLexicon);
        }

        self.words
            .extend(file.words.into_iter().map(|(w, p)| (w.to_lowercase(), p)));
        self.intensifiers
            .extend(file.intensifiers.into_iter().map(|(w, f)| (w.to_lowercase(), f)));
        self.negations
            .extend(file.negations.into_iter().map(|w| w.to_lowercase()));
        Ok(())
    }

    fn is_negation(&self, token: &str) -> bool {
        self.negations.contains(token) || token.ends_with("n't")
    }

    /// Lowercase word tokens. Apostrophes stay inside words ("don't");
    /// whitespace-separated chunks that are lexicon emoticons stay whole.
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for chunk in text.split_whitespace() {
            let chunk = chunk.to_lowercase().replace('\u{2019}', "'");

            let bare = chunk.trim_end_matches(['.', ',', '!', '?']);
            let symbolic = bare.chars().any(|c| !c.is_alphanumeric() && c != '\'');
            if symbolic && self.words.contains_key(bare) {
                tokens.push(bare.to_string());
                continue;
            }

            tokens.extend(
                chunk
                    .split(|c: char| !c.is_alphanumeric() && c != '\'')
                    .map(|w| w.trim_matches('\''))
                    .filter(|w| !w.is_empty())
                    .map(str::to_string),
            );
        }
        tokens
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> Result<f64, ScorerError> {
        let tokens = self.tokenize(text);

        let mut assessments = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.words.get(token) else {
                continue;
            };

            let mut score = base;
            if let Some(factor) = i.checked_sub(1).and_then(|p| self.intensifiers.get(&tokens[p])) {
                score *= factor;
            }
            if tokens[i.saturating_sub(NEGATION_WINDOW)..i]
                .iter()
                .any(|t| self.is_negation(t))
            {
                score *= NEGATION_FACTOR;
            }
            assessments.push(score);
        }

        if assessments.is_empty() {
            return Ok(0.0);
        }

        let mean = assessments.iter().sum::<f64>() / assessments.len() as f64;
        debug!("{} assessments over {} tokens -> {:.3}", assessments.len(), tokens.len(), mean);
        Ok(mean.clamp(-1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> LexiconScorer {
        LexiconScorer::builtin().unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
    }

    #[test]
    fn test_builtin_loads() {
        let s = scorer();
        assert!(s.words.contains_key("good"));
        assert!(s.intensifiers.contains_key("very"));
        assert!(s.negations.contains("not"));
    }

    #[test]
    fn test_neutral_text() {
        assert_close(scorer().polarity("The package arrived on Tuesday").unwrap(), 0.0);
        assert_close(scorer().polarity("").unwrap(), 0.0);
    }

    #[test]
    fn test_positive_and_negative() {
        let s = scorer();
        assert_close(s.polarity("I love this product!").unwrap(), 0.5);
        assert!(s.polarity("Great service, excellent staff").unwrap() > 0.5);
        assert!(s.polarity("Terrible. Awful experience").unwrap() < -0.5);
    }

    #[test]
    fn test_case_and_punctuation_ignored() {
        let s = scorer();
        assert_close(s.polarity("GOOD!!!").unwrap(), s.polarity("good").unwrap());
    }

    #[test]
    fn test_mean_of_assessments() {
        assert_close(scorer().polarity("good but bad").unwrap(), 0.0);
    }

    #[test]
    fn test_intensifier() {
        assert_close(scorer().polarity("very good").unwrap(), 0.7 * 1.3);
    }

    #[test]
    fn test_negation() {
        let s = scorer();
        assert_close(s.polarity("not good").unwrap(), -0.35);
        assert_close(s.polarity("not very good").unwrap(), 0.7 * 1.3 * -0.5);
        assert_close(s.polarity("I don't like it").unwrap(), -0.1);
        assert_close(s.polarity("I don\u{2019}t like it").unwrap(), -0.1);
        // out of the window
        assert_close(s.polarity("not that it was good").unwrap(), 0.7);
    }

    #[test]
    fn test_emoticons() {
        let s = scorer();
        assert!(s.polarity("ok :)").unwrap() > 0.0);
        assert!(s.polarity("meh :(").unwrap() < 0.0);
    }

    #[test]
    fn test_clamped() {
        assert_close(scorer().polarity("extremely excellent").unwrap(), 1.0);
        assert_close(scorer().polarity("absolutely terrible").unwrap(), -1.0);
    }

    #[test]
    fn test_merge_overrides() {
        let mut s = scorer();
        s.merge_str("[words]\ngood = 0.1\nmeh = -0.2\n", "extra").unwrap();
        assert_close(s.polarity("good").unwrap(), 0.1);
        assert_close(s.polarity("MEH").unwrap(), -0.2);
    }

    #[test]
    fn test_merge_rejects_out_of_range() {
        let mut s = scorer();
        let err = s.merge_str("[words]\ngood = 1.5\n", "extra").unwrap_err();
        assert!(matches!(err, ScorerError::InvalidLexicon { .. }));
        assert!(s.merge_str("[intensifiers]\nvery = 0.0\n", "extra").is_err());
        assert!(s.merge_str("words = 3", "extra").is_err());
    }

    #[test]
    fn test_empty_lexicon_rejected() {
        let mut s = LexiconScorer {
            words: HashMap::new(),
            intensifiers: HashMap::new(),
            negations: HashSet::new(),
        };
        assert!(matches!(
            s.merge_str("negations = [\"no\"]\n[intensifiers]\nvery = 1.3\n", "empty"),
            Err(ScorerError::EmptyLexicon)
        ));
        // failed merge leaves nothing behind
        assert!(s.negations.is_empty());
        assert!(s.intensifiers.is_empty());
    }

    #[test]
    fn test_missing_lexicon_file() {
        let config = SentimentConfig {
            lexicon_path: Some("/nonexistent/lexicon.toml".to_string()),
        };
        assert!(matches!(
            LexiconScorer::from_config(&config),
            Err(ScorerError::InvalidLexicon { .. })
        ));
    }
}

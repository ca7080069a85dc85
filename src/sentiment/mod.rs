pub mod lexicon;

pub use lexicon::LexiconScorer;

#[derive(Debug, thiserror::Error)]
pub enum ScorerError {
    #[error("lexicon contains no scored words")]
    EmptyLexicon,
    #[error("invalid lexicon '{path}': {reason}")]
    InvalidLexicon { path: String, reason: String },
    #[error("sentiment scorer unavailable: {0}")]
    Unavailable(String),
}

/// Text -> polarity in [-1.0, 1.0]
///
/// Implementations run in-process and are expected to return quickly; the
/// web handler calls them inline on the request task.
pub trait SentimentScorer: Send + Sync {
    fn polarity(&self, text: &str) -> Result<f64, ScorerError>;
}

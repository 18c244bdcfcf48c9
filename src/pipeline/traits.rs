use crate::error::EvaluationError;
use crate::types::Corpus;

/// Materializes raw text samples. Failures are returned to the caller as-is.
pub trait TextSource: Send + Sync {
    fn load_samples(&self) -> Result<Corpus, EvaluationError>;

    fn describe(&self) -> String {
        "text source".to_string()
    }
}

/// Pure per-corpus transformation; must keep length and order.
pub trait TextPostprocessor: Send + Sync {
    fn apply(&self, corpus: Corpus) -> Result<Corpus, EvaluationError>;
}

pub trait ProgressObserver: Send + Sync {
    /// Called once with the number of pairs about to be scored.
    fn on_start(&self, _total: usize) {}

    fn on_pair_scored(&self);
}

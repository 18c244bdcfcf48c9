use std::sync::Arc;

use crate::error::EvaluationError;
use crate::evaluation::evaluate_with;
use crate::evaluation::parallel::ExecutionStrategy;
use crate::evaluation::report::AggregateReport;
use crate::pipeline::traits::{ProgressObserver, TextPostprocessor, TextSource};
use crate::types::Corpus;

/// Processed ground truth kept by the caller and reused across runs against
/// different predictions. Immutable once built.
#[derive(Debug, Clone)]
pub struct PreloadedGroundTruth {
    corpus: Arc<Corpus>,
}

impl PreloadedGroundTruth {
    /// Wraps a corpus that has already been post-processed.
    pub fn from_processed(corpus: Corpus) -> Self {
        Self {
            corpus: Arc::new(corpus),
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }
}

pub enum GroundTruth<'a> {
    /// Loaded and post-processed on every run.
    Source(&'a dyn TextSource),
    Preloaded(&'a PreloadedGroundTruth),
}

pub struct Evaluator {
    strategy: ExecutionStrategy,
    skip_empty_ground_truth: bool,
    postprocessor: Box<dyn TextPostprocessor>,
    progress: Option<Arc<dyn ProgressObserver>>,
}

pub(crate) struct EvaluatorParts {
    pub strategy: ExecutionStrategy,
    pub skip_empty_ground_truth: bool,
    pub postprocessor: Box<dyn TextPostprocessor>,
    pub progress: Option<Arc<dyn ProgressObserver>>,
}

impl Evaluator {
    pub(crate) fn from_parts(parts: EvaluatorParts) -> Self {
        Self {
            strategy: parts.strategy,
            skip_empty_ground_truth: parts.skip_empty_ground_truth,
            postprocessor: parts.postprocessor,
            progress: parts.progress,
        }
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Loads and post-processes ground truth once for repeated runs.
    pub fn preload_ground_truth(
        &self,
        source: &dyn TextSource,
    ) -> Result<PreloadedGroundTruth, EvaluationError> {
        let corpus = self.load_processed(source)?;
        tracing::debug!(lines = corpus.len(), "preloaded ground truth");
        Ok(PreloadedGroundTruth::from_processed(corpus))
    }

    pub fn run(
        &self,
        ground_truth: GroundTruth<'_>,
        prediction: &dyn TextSource,
    ) -> Result<AggregateReport, EvaluationError> {
        let loaded;
        let gt = match ground_truth {
            GroundTruth::Preloaded(preloaded) => preloaded.corpus(),
            GroundTruth::Source(source) => {
                loaded = self.load_processed(source)?;
                &loaded
            }
        };
        let pred = self.load_processed(prediction)?;
        self.evaluate(gt, &pred)
    }

    /// Evaluates two processed corpora with this evaluator's strategy.
    pub fn evaluate(&self, gt: &Corpus, pred: &Corpus) -> Result<AggregateReport, EvaluationError> {
        if gt.len() != pred.len() {
            return Err(EvaluationError::length_mismatch(gt.len(), pred.len()));
        }
        let progress = self.progress.as_deref();

        if !self.skip_empty_ground_truth {
            return evaluate_with(gt, pred, self.strategy, progress);
        }

        let mut skipped = Vec::new();
        let mut kept_gt = Vec::with_capacity(gt.len());
        let mut kept_pred = Vec::with_capacity(pred.len());
        for (idx, (gt_line, pred_line)) in gt.iter().zip(pred.iter()).enumerate() {
            if gt_line.is_empty() {
                skipped.push(idx);
            } else {
                kept_gt.push(gt_line.clone());
                kept_pred.push(pred_line.clone());
            }
        }
        if !skipped.is_empty() {
            tracing::warn!(
                skipped = skipped.len(),
                remaining = kept_gt.len(),
                "skipping pairs with empty ground truth"
            );
        }
        let (kept_gt, kept_pred) = (Corpus::new(kept_gt), Corpus::new(kept_pred));
        let mut report = evaluate_with(&kept_gt, &kept_pred, self.strategy, progress)?;
        report.skipped_pairs = skipped;
        Ok(report)
    }

    fn load_processed(&self, source: &dyn TextSource) -> Result<Corpus, EvaluationError> {
        let raw = source.load_samples()?;
        let raw_len = raw.len();
        let processed = self.postprocessor.apply(raw)?;
        if processed.len() != raw_len {
            return Err(EvaluationError::collaborator(
                "text post-processing",
                format!(
                    "changed corpus length from {raw_len} to {} for {}",
                    processed.len(),
                    source.describe()
                ),
            ));
        }
        tracing::debug!(source = %source.describe(), lines = raw_len, "loaded corpus");
        Ok(processed)
    }
}

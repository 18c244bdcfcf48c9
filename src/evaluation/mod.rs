pub mod confusion;
pub mod parallel;
pub mod report;
pub mod scorer;

use crate::error::EvaluationError;
use crate::pipeline::traits::ProgressObserver;
use crate::types::{Corpus, TextSample};

use parallel::ExecutionStrategy;
use report::{AggregateReport, Tally};
use scorer::score_pair;

/// Evaluates two already processed corpora.
///
/// `worker_count` only affects scheduling; every count gives the same report.
pub fn evaluate(
    gt: &Corpus,
    pred: &Corpus,
    worker_count: usize,
) -> Result<AggregateReport, EvaluationError> {
    evaluate_with(gt, pred, ExecutionStrategy::from_worker_count(worker_count), None)
}

pub fn evaluate_with(
    gt: &Corpus,
    pred: &Corpus,
    strategy: ExecutionStrategy,
    progress: Option<&dyn ProgressObserver>,
) -> Result<AggregateReport, EvaluationError> {
    if gt.len() != pred.len() {
        return Err(EvaluationError::length_mismatch(gt.len(), pred.len()));
    }

    tracing::debug!(
        pairs = gt.len(),
        workers = strategy.workers(),
        "scoring ground truth/prediction pairs"
    );

    let pairs: Vec<(&TextSample, &TextSample)> = gt.iter().zip(pred.iter()).collect();
    if let Some(observer) = progress {
        observer.on_start(pairs.len());
    }
    let (results, tally) = strategy.scatter_gather_fold(
        &pairs,
        |&(gt_line, pred_line)| {
            let result = score_pair(gt_line, pred_line);
            if let Some(observer) = progress {
                observer.on_pair_scored();
            }
            result
        },
        Tally::default(),
        |mut tally, result| {
            tally.absorb(result);
            tally
        },
    )?;

    let report = AggregateReport::finalize(tally, results)?;
    tracing::info!(
        pairs = report.pair_count(),
        total_chars = report.total_chars,
        total_char_errors = report.total_char_errors,
        total_sync_errors = report.total_sync_errors,
        avg_label_error_rate = report.avg_label_error_rate,
        "evaluation finished"
    );
    Ok(report)
}

use serde::Serialize;

use crate::error::EvaluationError;
use crate::evaluation::confusion::{ConfusionEntry, ConfusionTable};
use crate::types::PairResult;

/// Running sums over scored pairs. Merging two tallies is associative and
/// commutative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub total_chars: usize,
    pub total_char_errors: usize,
    pub total_sync_errors: usize,
    pub confusion: ConfusionTable,
}

impl Tally {
    pub fn absorb(&mut self, pair: &PairResult) {
        self.total_chars += pair.gt_length;
        self.total_char_errors += pair.edit_errors;
        self.total_sync_errors += pair.sync_errors;
        self.confusion.merge(&pair.confusion);
    }

    pub fn merge(&mut self, other: &Tally) {
        self.total_chars += other.total_chars;
        self.total_char_errors += other.total_char_errors;
        self.total_sync_errors += other.total_sync_errors;
        self.confusion.merge(&other.confusion);
    }

    pub fn label_error_rate(&self) -> Result<f64, EvaluationError> {
        if self.total_chars == 0 {
            return Err(EvaluationError::EmptyCorpus);
        }
        Ok(self.total_char_errors as f64 / self.total_chars as f64)
    }
}

impl<'a> FromIterator<&'a PairResult> for Tally {
    fn from_iter<I: IntoIterator<Item = &'a PairResult>>(iter: I) -> Self {
        iter.into_iter().fold(Tally::default(), |mut tally, pair| {
            tally.absorb(pair);
            tally
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    pub total_chars: usize,
    pub total_char_errors: usize,
    pub total_sync_errors: usize,
    pub avg_label_error_rate: f64,
    pub confusion: ConfusionTable,
    /// One entry per scored pair, in input order.
    pub pairs: Vec<PairResult>,
    /// Input indices left out of `pairs` because their ground truth was empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_pairs: Vec<usize>,
}

impl AggregateReport {
    pub fn from_pairs(pairs: Vec<PairResult>) -> Result<Self, EvaluationError> {
        let tally: Tally = pairs.iter().collect();
        Self::finalize(tally, pairs)
    }

    pub(crate) fn finalize(tally: Tally, pairs: Vec<PairResult>) -> Result<Self, EvaluationError> {
        let avg_label_error_rate = tally.label_error_rate()?;
        Ok(Self {
            total_chars: tally.total_chars,
            total_char_errors: tally.total_char_errors,
            total_sync_errors: tally.total_sync_errors,
            avg_label_error_rate,
            confusion: tally.confusion,
            pairs,
            skipped_pairs: Vec::new(),
        })
    }

    /// Combines reports over two contiguous sublists; `self` covers the
    /// earlier indices.
    pub fn merge(self, other: AggregateReport) -> Result<Self, EvaluationError> {
        let offset = self.input_count();
        let mut tally = self.tally();
        tally.merge(&other.tally());
        let mut pairs = self.pairs;
        pairs.extend(other.pairs);
        let mut skipped_pairs = self.skipped_pairs;
        skipped_pairs.extend(other.skipped_pairs.iter().map(|idx| idx + offset));

        let mut merged = Self::finalize(tally, pairs)?;
        merged.skipped_pairs = skipped_pairs;
        Ok(merged)
    }

    pub fn tally(&self) -> Tally {
        Tally {
            total_chars: self.total_chars,
            total_char_errors: self.total_char_errors,
            total_sync_errors: self.total_sync_errors,
            confusion: self.confusion.clone(),
        }
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Pairs handed in, including skipped ones.
    pub fn input_count(&self) -> usize {
        self.pairs.len() + self.skipped_pairs.len()
    }

    pub fn top_confusions(&self, n: usize) -> Vec<ConfusionEntry<'_>> {
        self.confusion.top_n(n)
    }

    /// Share of the sync errors attributed to one confusion entry.
    pub fn confusion_share(&self, entry: &ConfusionEntry<'_>) -> f64 {
        if self.total_sync_errors == 0 {
            return 0.0;
        }
        let width = entry
            .ground_truth
            .chars()
            .count()
            .max(entry.prediction.chars().count());
        (entry.count as f64 * width as f64) / self.total_sync_errors as f64
    }
}

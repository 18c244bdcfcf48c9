use crate::alignment::align;
use crate::evaluation::confusion::{ConfusionKey, ConfusionTable};
use crate::types::{PairResult, TextSample};

/// Scores one ground-truth/prediction pair.
///
/// A mismatched segment is charged its full width in `sync_errors`, so the
/// segment metric is never below the plain edit distance and often above it.
pub fn score_pair(gt: &TextSample, pred: &TextSample) -> PairResult {
    let alignment = align(gt, pred);

    let mut confusion = ConfusionTable::new();
    let mut sync_errors = 0usize;
    for segment in alignment.segments {
        if segment.is_match() {
            continue;
        }
        sync_errors += segment.width();
        confusion.record(ConfusionKey::new(segment.ground_truth, segment.prediction));
    }

    PairResult {
        gt_length: gt.len(),
        edit_errors: alignment.errors,
        sync_errors,
        confusion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(gt: &str, pred: &str) -> PairResult {
        score_pair(&TextSample::new(gt), &TextSample::new(pred))
    }

    #[test]
    fn substitution_pair() {
        let result = score("cat", "cot");
        assert_eq!(result.gt_length, 3);
        assert_eq!(result.edit_errors, 1);
        assert_eq!(result.sync_errors, 1);
        assert_eq!(result.confusion.get(&ConfusionKey::new("a", "o")), 1);
        assert_eq!(result.confusion.len(), 1);
    }

    #[test]
    fn empty_prediction_pair() {
        let result = score("ab", "");
        assert_eq!(result.gt_length, 2);
        assert_eq!(result.edit_errors, 2);
        assert_eq!(result.sync_errors, 2);
        assert_eq!(result.confusion.get(&ConfusionKey::new("ab", "")), 1);
    }

    #[test]
    fn identical_pair_has_no_confusions() {
        let result = score("unchanged", "unchanged");
        assert_eq!(result.edit_errors, 0);
        assert_eq!(result.sync_errors, 0);
        assert!(result.confusion.is_empty());
    }

    #[test]
    fn mismatched_segment_is_charged_its_width() {
        let result = score("in ewych", "ierg ch");
        assert_eq!(result.edit_errors, 5);
        assert_eq!(result.sync_errors, 6);
        assert_eq!(result.confusion.get(&ConfusionKey::new("n", "erg")), 1);
        assert_eq!(result.confusion.get(&ConfusionKey::new("ewy", "")), 1);
        assert_eq!(result.confusion.len(), 2);
    }

    #[test]
    fn repeated_pattern_is_counted_per_occurrence() {
        let result = score("Hello World", "He11o Wor1d");
        assert_eq!(result.edit_errors, 3);
        assert_eq!(result.confusion.get(&ConfusionKey::new("ll", "11")), 1);
        assert_eq!(result.confusion.get(&ConfusionKey::new("l", "1")), 1);
    }

    #[test]
    fn gt_length_counts_chars() {
        let result = score("größe", "grosse");
        assert_eq!(result.gt_length, 5);
    }
}

pub mod edit_distance;
pub mod sync;

use crate::types::{Alignment, TextSample};

use edit_distance::edit_path;
use sync::synchronize;

/// Aligns a ground-truth line with a predicted line.
///
/// `errors` and `matches` come from a minimum-cost edit path. The sync
/// segments come from a separate anchored pass, so a mismatched segment is
/// never cheaper than its edit distance and `sync_errors >= errors` holds
/// for every pair.
pub fn align(gt: &TextSample, pred: &TextSample) -> Alignment {
    align_chars(gt.chars(), pred.chars())
}

pub fn align_chars(gt: &[char], pred: &[char]) -> Alignment {
    let (errors, ops) = edit_path(gt, pred);
    let matches = ops.iter().filter(|op| op.is_match()).count();
    let segments = synchronize(gt, pred);

    Alignment {
        errors,
        matches,
        segments,
    }
}

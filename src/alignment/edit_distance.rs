/// Token-level operation on a minimum-cost edit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Match,
    Substitute,
    /// Ground-truth token missing from the prediction.
    Delete,
    /// Prediction token absent from the ground truth.
    Insert,
}

impl EditOp {
    pub fn is_match(self) -> bool {
        matches!(self, Self::Match)
    }

    /// Whether the op consumes a ground-truth / prediction token.
    pub(crate) fn advances(self) -> (bool, bool) {
        match self {
            Self::Match | Self::Substitute => (true, true),
            Self::Delete => (true, false),
            Self::Insert => (false, true),
        }
    }
}

/// Levenshtein distance in two-row memory.
pub fn levenshtein(gt: &[char], pred: &[char]) -> usize {
    if gt.is_empty() {
        return pred.len();
    }
    if pred.is_empty() {
        return gt.len();
    }

    let mut prev: Vec<usize> = (0..=pred.len()).collect();
    let mut curr = vec![0usize; pred.len() + 1];

    for (i, &g) in gt.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &p) in pred.iter().enumerate() {
            let sub = prev[j] + usize::from(g != p);
            let del = prev[j + 1] + 1;
            let ins = curr[j] + 1;
            curr[j + 1] = sub.min(del).min(ins);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[pred.len()]
}

/// Edit distance plus one minimum-cost path, in ground-truth order.
///
/// Backtracking from the end prefers the diagonal step (match or
/// substitution), then deletion, then insertion, so identical inputs always
/// produce the same path.
///
/// Keeps the full `(gt.len() + 1) * (pred.len() + 1)` cost table for the
/// backtrace. Use [`levenshtein`] when only the distance is needed.
pub fn edit_path(gt: &[char], pred: &[char]) -> (usize, Vec<EditOp>) {
    let rows = gt.len() + 1;
    let cols = pred.len() + 1;
    let mut cost = vec![0usize; rows * cols];

    for (j, cell) in cost.iter_mut().take(cols).enumerate() {
        *cell = j;
    }
    for i in 1..rows {
        cost[i * cols] = i;
        for j in 1..cols {
            let sub = cost[(i - 1) * cols + (j - 1)] + usize::from(gt[i - 1] != pred[j - 1]);
            let del = cost[(i - 1) * cols + j] + 1;
            let ins = cost[i * cols + (j - 1)] + 1;
            cost[i * cols + j] = sub.min(del).min(ins);
        }
    }

    let distance = cost[rows * cols - 1];
    let mut ops = Vec::with_capacity(gt.len().max(pred.len()));
    let (mut i, mut j) = (gt.len(), pred.len());
    while i > 0 || j > 0 {
        let here = cost[i * cols + j];
        if i > 0 && j > 0 {
            let same = gt[i - 1] == pred[j - 1];
            if here == cost[(i - 1) * cols + (j - 1)] + usize::from(!same) {
                ops.push(if same { EditOp::Match } else { EditOp::Substitute });
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 && here == cost[(i - 1) * cols + j] + 1 {
            ops.push(EditOp::Delete);
            i -= 1;
            continue;
        }
        debug_assert!(j > 0 && here == cost[i * cols + (j - 1)] + 1);
        ops.push(EditOp::Insert);
        j -= 1;
    }
    ops.reverse();
    debug_assert_eq!(ops.iter().filter(|op| op.advances().0).count(), gt.len());
    debug_assert_eq!(ops.iter().filter(|op| op.advances().1).count(), pred.len());
    (distance, ops)
}

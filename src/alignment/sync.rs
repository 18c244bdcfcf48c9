use std::ops::Range;

use crate::types::SyncSegment;

/// Splits a ground-truth/prediction pair into sync segments.
///
/// The longest common substring of the open span becomes a matched anchor
/// and the spans on either side of it are synchronized the same way. A span
/// with nothing in common is emitted whole as one mismatched segment, so a
/// misread glyph stays one unit even when a cheaper edit path would split
/// it. Ties go to the anchor that starts first in the ground truth, then
/// first in the prediction.
pub fn synchronize(gt: &[char], pred: &[char]) -> Vec<SyncSegment> {
    let mut segments = Vec::new();
    let mut pending = vec![Pending::Span {
        gt: 0..gt.len(),
        pred: 0..pred.len(),
    }];

    // Left spans are pushed last so they are emitted first.
    while let Some(item) = pending.pop() {
        let (g, p) = match item {
            Pending::Matched(anchor) => {
                let g = anchor.gt_start..anchor.gt_start + anchor.len;
                let p = anchor.pred_start..anchor.pred_start + anchor.len;
                push(&mut segments, &gt[g], &pred[p]);
                continue;
            }
            Pending::Span { gt: g, pred: p } => (g, p),
        };
        if g.is_empty() && p.is_empty() {
            continue;
        }
        match longest_common_run(gt, pred, &g, &p) {
            None => push(&mut segments, &gt[g], &pred[p]),
            Some(anchor) => {
                pending.push(Pending::Span {
                    gt: anchor.gt_start + anchor.len..g.end,
                    pred: anchor.pred_start + anchor.len..p.end,
                });
                pending.push(Pending::Matched(anchor));
                pending.push(Pending::Span {
                    gt: g.start..anchor.gt_start,
                    pred: p.start..anchor.pred_start,
                });
            }
        }
    }
    segments
}

enum Pending {
    Span { gt: Range<usize>, pred: Range<usize> },
    Matched(Anchor),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Anchor {
    gt_start: usize,
    pred_start: usize,
    len: usize,
}

/// Longest common substring of `gt[g]` and `pred[p]`, in two-row memory.
fn longest_common_run(
    gt: &[char],
    pred: &[char],
    g: &Range<usize>,
    p: &Range<usize>,
) -> Option<Anchor> {
    if g.is_empty() || p.is_empty() {
        return None;
    }

    let width = p.len() + 1;
    let mut prev = vec![0usize; width];
    let mut curr = vec![0usize; width];
    let mut best: Option<Anchor> = None;

    for i in g.clone() {
        curr[0] = 0;
        for (k, j) in p.clone().enumerate() {
            curr[k + 1] = if gt[i] == pred[j] { prev[k] + 1 } else { 0 };
            let run = curr[k + 1];
            if run > best.map_or(0, |anchor| anchor.len) {
                best = Some(Anchor {
                    gt_start: i + 1 - run,
                    pred_start: j + 1 - run,
                    len: run,
                });
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}

/// Appends a segment, folding it into the previous one when both are
/// matches or both are mismatches.
fn push(segments: &mut Vec<SyncSegment>, gt: &[char], pred: &[char]) {
    let is_match = gt == pred;
    if let Some(last) = segments.last_mut() {
        if last.is_match() == is_match {
            last.ground_truth.extend(gt);
            last.prediction.extend(pred);
            return;
        }
    }
    segments.push(SyncSegment {
        ground_truth: gt.iter().collect(),
        prediction: pred.iter().collect(),
    });
}

// anchor.rs - the anchor-distance state machine (SPEC_FULL.md 4.6, 4.8)
//
// Walks subject A's forward strand against subject B's index, looking for
// maximal unique matches ("anchors"). Anchors themselves are definitionally
// exact (that's what makes them unique): a confirmed anchor's own length
// feeds the matrix as "equal" observations, and the colinear gap between
// two anchors is compared column by column as candidate substitutions. A
// gap whose length disagrees between A and B implies an indel and is
// skipped rather than miscounted, resolving the "non-pair" case.

use crate::cache::PrefixCache;
use crate::esa::Esa;
use crate::lookup::get_match_cached;
use crate::model::MutationMatrix;
use crate::sequence::{is_separator, Subject};

/// The probability that two unrelated random bases agree, given the
/// subject's own base composition (`2*(p_AT/2)^2 + 2*(p_GC/2)^2`).
fn match_probability(gc: f64) -> f64 {
    let at = (1.0 - gc) / 2.0;
    let cg = gc / 2.0;
    2.0 * at * at + 2.0 * cg * cg
}

/// The shustring-based minimum anchor length: the length at which the
/// expected number of chance matches of that length in a random subject of
/// size `subject_len` falls below `pvalue`, i.e. the smallest `l` with
/// `subject_len * p^l <= pvalue`.
pub fn anchor_threshold(subject_len: usize, gc: f64, pvalue: f64) -> usize {
    let p = match_probability(gc).clamp(1e-9, 1.0 - 1e-9);
    let n = (subject_len.max(1)) as f64;
    let pvalue = pvalue.clamp(1e-12, 1.0);
    let tau = (n / pvalue).ln() / (1.0 / p).ln();
    tau.ceil().max(1.0) as usize
}

struct AnchorPoint {
    pos_q: usize,
    pos_s: usize,
    length: usize,
}

impl AnchorPoint {
    fn end_q(&self) -> usize {
        self.pos_q + self.length
    }

    fn end_s(&self) -> usize {
        self.pos_s + self.length
    }
}

/// Scan `subject_a`'s forward strand against `esa_b`/`subject_b`,
/// accumulating substitution counts from colinear anchors and the gaps
/// between them into a fresh `MutationMatrix`.
pub fn scan(
    subject_a: &Subject,
    esa_b: &Esa,
    cache_b: &PrefixCache,
    subject_b: &Subject,
    pvalue: f64,
) -> MutationMatrix {
    let tau = anchor_threshold(subject_b.rs_len(), subject_b.sequence.gc, pvalue);
    let a = &subject_a.sequence.forward;
    let rs_b = &subject_b.rs;
    let qlen = a.len();

    let mut matrix = MutationMatrix::new();
    let mut last_match: Option<AnchorPoint> = None;
    let mut last_was_right_anchor = false;
    let mut pos_q = 0usize;

    while pos_q < qlen {
        if is_separator(a[pos_q]) {
            pos_q += 1;
            last_match = None;
            last_was_right_anchor = false;
            continue;
        }

        // Lucky-anchor attempt: extend the previous anchor directly at the
        // position colinearity predicts, before falling back to a fresh
        // unique-match search.
        let mut candidate: Option<(usize, usize)> = None;
        if let Some(prev) = &last_match {
            let advance = pos_q - prev.pos_q;
            let try_pos_s = prev.pos_s + advance;
            if try_pos_s < rs_b.len() && pos_q - prev.pos_q - prev.length <= tau {
                let lucky_len = direct_lcp(a, rs_b, pos_q, try_pos_s);
                if lucky_len >= tau {
                    candidate = Some((try_pos_s, lucky_len));
                }
            }
        }

        let mut fallback_len = 0usize;
        if candidate.is_none() {
            let (matched_len, interval) = get_match_cached(esa_b, rs_b, cache_b, &a[pos_q..]);
            fallback_len = matched_len;
            if interval.is_singleton() && matched_len >= tau {
                let b_start = esa_b.sa[interval.first_sa_index()];
                candidate = Some((b_start, matched_len));
            }
        }

        match candidate {
            Some((pos_s, length)) => {
                let this_match = AnchorPoint { pos_q, pos_s, length };

                if let Some(prev) = &last_match {
                    let end_s = prev.end_s();
                    let end_q = prev.end_q();
                    if this_match.pos_s > end_s && this_match.pos_q - end_q == this_match.pos_s - end_s {
                        record_run(a, prev.pos_q, prev.length, &mut matrix);
                        let gap = this_match.pos_q - end_q;
                        accumulate_gap(a, rs_b, end_q, end_s, gap, &mut matrix);
                        last_was_right_anchor = true;
                    } else {
                        resolve_non_pair(prev, tau, last_was_right_anchor, a, &mut matrix);
                        last_was_right_anchor = false;
                    }
                }

                pos_q = this_match.pos_q + this_match.length + 1;
                last_match = Some(this_match);
            }
            None => {
                pos_q += fallback_len + 1;
            }
        }
    }

    if let Some(prev) = last_match {
        if prev.length >= qlen {
            record_run(a, 0, qlen, &mut matrix);
            return matrix;
        }
        resolve_non_pair(&prev, tau, last_was_right_anchor, a, &mut matrix);
    }

    matrix
}

/// Apply the non-pair resolution rule to a dangling anchor: its length
/// still counts as "equal" observations if it was itself confirmed as a
/// right anchor, or if it is long enough on its own (`>= 2*tau`) to be
/// statistically significant without a colinear partner.
fn resolve_non_pair(
    prev: &AnchorPoint,
    tau: usize,
    last_was_right_anchor: bool,
    a: &[u8],
    matrix: &mut MutationMatrix,
) {
    if last_was_right_anchor || prev.length >= 2 * tau {
        record_run(a, prev.pos_q, prev.length, matrix);
    }
}

/// Length of the common prefix of `a[pos_a..]` and `rs_b[pos_b..]`,
/// stopping at either buffer's end or at a separator byte on either side.
fn direct_lcp(a: &[u8], rs_b: &[u8], pos_a: usize, pos_b: usize) -> usize {
    let mut k = 0;
    while pos_a + k < a.len() && pos_b + k < rs_b.len() {
        let ca = a[pos_a + k];
        let cb = rs_b[pos_b + k];
        if is_separator(ca) || is_separator(cb) || ca != cb {
            break;
        }
        k += 1;
    }
    k
}

/// Record `len` positions of `a` starting at `start` as self-matches (an
/// anchor's interior, which is exact by construction).
fn record_run(a: &[u8], start: usize, len: usize, matrix: &mut MutationMatrix) {
    for g in 0..len {
        let c = a[start + g];
        if is_separator(c) {
            break;
        }
        matrix.record(c, c);
    }
}

fn accumulate_gap(
    a: &[u8],
    rs_b: &[u8],
    a_start: usize,
    b_start: usize,
    len: usize,
    matrix: &mut MutationMatrix,
) {
    for g in 0..len {
        let ca = a[a_start + g];
        let cb = rs_b[b_start + g];
        if is_separator(ca) || is_separator(cb) {
            break;
        }
        matrix.record(ca, cb);
    }
}

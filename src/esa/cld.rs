// cld.rs - the child table (Abouelhoda, Kurtz & Ohlebusch's "enhanced
// suffix array" child array) and the step-into-letter traversal primitive.
//
// The child table lets us enumerate the children of any lcp-interval
// without a range-minimum-query structure: a single left-to-right pass
// with a monotonic stack over LCP assigns each interval its "first
// l-index" (the split point of its first two children), and a second pass
// chains each split point to the next one at the same depth. Both passes
// follow the construction in Abouelhoda et al. 2004, "Replacing suffix
// trees with enhanced suffix arrays" (Algorithm childtab).

use super::interval::Interval;
use super::lcp::LcpEntry;

fn lcp_value(lcp: &[Option<LcpEntry>], idx: usize) -> i64 {
    lcp[idx].map(|e| e.lcp() as i64).unwrap_or(-1)
}

/// `up`/`down`/`next_l_index` collapsed conceptually into one "CLD array"
/// by the source material, kept here as three plain vectors rather than a
/// hand-packed single array -- the packing buys nothing once LCP already
/// carries the 24/8 split, and three `Vec<Option<usize>>` read far more
/// plainly than the overloaded single-array trick.
pub struct ChildTable {
    up: Vec<Option<usize>>,
    down: Vec<Option<usize>>,
    next_l_index: Vec<Option<usize>>,
}

impl ChildTable {
    pub fn build(lcp: &[Option<LcpEntry>]) -> Self {
        let n = lcp.len();
        let mut up = vec![None; n];
        let mut down = vec![None; n];
        let mut next_l_index = vec![None; n];

        if n < 2 {
            return Self {
                up,
                down,
                next_l_index,
            };
        }
        let top = n - 1;

        // Pass 1: up / down.
        let mut stack = vec![0usize];
        let mut last_index: Option<usize> = None;
        for i in 1..=top {
            while lcp_value(lcp, i) < lcp_value(lcp, *stack.last().unwrap()) {
                last_index = stack.pop();
                let head = *stack.last().unwrap();
                if lcp_value(lcp, i) <= lcp_value(lcp, head)
                    && lcp_value(lcp, head) != lcp_value(lcp, last_index.unwrap())
                {
                    down[head] = last_index;
                }
            }
            if let Some(li) = last_index {
                up[i - 1] = Some(li);
                last_index = None;
            }
            stack.push(i);
        }

        // Pass 2: next_l_index, chaining siblings at equal LCP depth.
        let mut stack = vec![0usize];
        for i in 1..=top {
            while lcp_value(lcp, i) < lcp_value(lcp, *stack.last().unwrap()) {
                stack.pop();
            }
            if lcp_value(lcp, i) == lcp_value(lcp, *stack.last().unwrap()) {
                let last = stack.pop().unwrap();
                next_l_index[last] = Some(i);
            }
            stack.push(i);
        }

        Self {
            up,
            down,
            next_l_index,
        }
    }

    /// The first l-index of the lcp-interval `[i, j]`: the SA position at
    /// which its first two children split.
    pub fn first_l_index(&self, i: usize, j: usize) -> usize {
        if let Some(up) = self.up[i] {
            if i < up && up <= j {
                return up;
            }
        }
        self.down[i].expect("malformed child table: interval has no split point")
    }

    fn next_l_index(&self, idx: usize) -> Option<usize> {
        self.next_l_index[idx]
    }
}

/// Step an lcp-interval for string `w` forward by one character `a`,
/// yielding the lcp-interval for `wa` (or `Interval::EMPTY` if no suffix of
/// `rs` extends `w` with `a`).
///
/// A non-singleton result's `l` is the interval's *own* lcp depth --
/// possibly deeper than `interval.l + 1` if every member happens to share
/// more than the one matched character -- read straight from the cached
/// child-table split point, for free. A singleton result's `l` is
/// fast-forwarded to the full remaining suffix length, since there is no
/// second suffix left to bound it: the caller is expected to resolve the
/// rest by direct byte comparison against its query instead of stepping
/// one character at a time.
pub fn step_into_letter(
    rs: &[u8],
    sa: &[usize],
    lcp: &[Option<LcpEntry>],
    cld: &ChildTable,
    interval: Interval,
    a: u8,
) -> Interval {
    if interval.is_empty() {
        return Interval::EMPTY;
    }

    if interval.is_singleton() {
        let i = interval.i as usize;
        let pos = sa[i] + interval.l;
        if pos >= rs.len() || rs[pos] != a {
            return Interval::EMPTY;
        }
        return Interval::singleton(i, rs.len() - sa[i]);
    }

    let i = interval.i as usize;
    let j = interval.j as usize;
    let l = interval.l;
    let m0 = if interval.m >= 0 {
        interval.m as usize
    } else {
        cld.first_l_index(i, j)
    };

    let mut boundaries = vec![i, m0];
    let mut cur = m0;
    while let Some(next) = cld.next_l_index(cur) {
        if next > j {
            break;
        }
        boundaries.push(next);
        cur = next;
    }
    boundaries.push(j + 1);

    for w in boundaries.windows(2) {
        let start = w[0];
        let end = w[1] - 1;
        let ch = if start == i {
            rs[sa[i] + l]
        } else {
            lcp[start].unwrap().fvc()
        };

        if ch == a {
            return if start == end {
                Interval::singleton(start, rs.len() - sa[start])
            } else {
                let m2 = cld.first_l_index(start, end);
                let l2 = lcp[m2].unwrap().lcp() as usize;
                Interval {
                    i: start as i64,
                    j: end as i64,
                    l: l2,
                    m: m2 as i64,
                }
            };
        }
        if ch > a {
            return Interval::EMPTY;
        }
    }

    Interval::EMPTY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::esa::lcp::build_lcp_array;
    use crate::esa::suffix_array::sa_build;

    fn build(text: &[u8]) -> (Vec<usize>, Vec<Option<LcpEntry>>, ChildTable) {
        let sa = sa_build(text);
        let lcp = build_lcp_array(text, &sa, "t").unwrap();
        let cld = ChildTable::build(&lcp);
        (sa, lcp, cld)
    }

    fn root(sa: &[usize], lcp: &[Option<LcpEntry>], cld: &ChildTable) -> Interval {
        let n = sa.len();
        if n == 1 {
            return Interval::singleton(0, 0);
        }
        let m = cld.first_l_index(0, n - 1);
        let l = lcp[m].unwrap().lcp() as usize;
        Interval {
            i: 0,
            j: (n - 1) as i64,
            l,
            m: m as i64,
        }
    }

    #[test]
    fn step_through_every_character_of_a_present_string() {
        let t = b"ACGTACGT#TGCA".to_vec();
        let (sa, lcp, cld) = build(&t);
        let mut iv = root(&sa, &lcp, &cld);
        for &ch in b"ACGT" {
            iv = step_into_letter(&t, &sa, &lcp, &cld, iv, ch);
            assert!(!iv.is_empty(), "expected a match stepping into {ch}");
        }
    }

    #[test]
    fn stepping_into_an_absent_character_is_empty() {
        let t = b"AAAA#TTTT".to_vec();
        let (sa, lcp, cld) = build(&t);
        let iv = root(&sa, &lcp, &cld);
        let stepped = step_into_letter(&t, &sa, &lcp, &cld, iv, b'C');
        assert!(stepped.is_empty());
    }

    #[test]
    fn singleton_interval_fast_forwards_remaining_length() {
        let t = b"ACGTACGA#X".to_vec();
        let (sa, lcp, cld) = build(&t);
        let mut iv = root(&sa, &lcp, &cld);
        for &ch in b"ACGTACGA" {
            iv = step_into_letter(&t, &sa, &lcp, &cld, iv, ch);
            if iv.is_singleton() {
                assert_eq!(iv.l, t.len() - sa[iv.i as usize]);
                return;
            }
        }
        panic!("expected to reach a singleton interval");
    }

    #[test]
    fn empty_interval_stays_empty() {
        let t = b"ACGT".to_vec();
        let (sa, lcp, cld) = build(&t);
        let stepped = step_into_letter(&t, &sa, &lcp, &cld, Interval::EMPTY, b'A');
        assert!(stepped.is_empty());
    }
}

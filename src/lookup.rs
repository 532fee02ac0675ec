// lookup.rs - longest-prefix match lookup against an indexed subject
// (SPEC_FULL.md 4.5)
//
// Both entry points return `(matched_length, interval)`: the interval is
// the deepest lcp-interval reached, `matched_length` is how many leading
// bytes of `query` are confirmed equal to some suffix of the subject. A
// child interval's cached `l` can run ahead of the characters actually
// stepped through one at a time (see `esa::cld::step_into_letter`); when
// that happens we verify the extra characters with a direct byte
// comparison against the query instead of re-entering `step_into_letter`
// one character at a time.

use crate::cache::PrefixCache;
use crate::esa::{Esa, Interval};

/// Walk `query` against `esa` from the root, one character at a time.
pub fn get_match(esa: &Esa, rs: &[u8], query: &[u8]) -> (usize, Interval) {
    step_from(esa, rs, esa.root_interval(), query, 0)
}

/// Like `get_match`, but resolves the first `cache.word_len()` characters
/// in one direct-indexed lookup when `query` starts with a plain ACGT run
/// of at least that length.
pub fn get_match_cached(
    esa: &Esa,
    rs: &[u8],
    cache: &PrefixCache,
    query: &[u8],
) -> (usize, Interval) {
    if let Some(interval) = cache.lookup(query) {
        if interval.is_empty() {
            return (0, Interval::EMPTY);
        }
        return step_from(esa, rs, interval, query, cache.word_len());
    }
    get_match(esa, rs, query)
}

fn step_from(esa: &Esa, rs: &[u8], mut interval: Interval, query: &[u8], mut k: usize) -> (usize, Interval) {
    if interval.is_empty() {
        return (0, Interval::EMPTY);
    }

    if interval.l > k {
        k = extend_by_comparison(esa, rs, interval, query, k);
        if k < interval.l {
            return (k, interval);
        }
    }

    while k < query.len() {
        let next = esa.step_into_letter(rs, interval, query[k]);
        if next.is_empty() {
            break;
        }
        interval = next;
        k += 1;

        if interval.l > k {
            k = extend_by_comparison(esa, rs, interval, query, k);
            if k < interval.l {
                break;
            }
        }
    }

    (k, interval)
}

fn extend_by_comparison(esa: &Esa, rs: &[u8], interval: Interval, query: &[u8], from: usize) -> usize {
    let sa_i = esa.sa[interval.first_sa_index()];
    let to = interval.l.min(query.len());
    let mut k = from;
    while k < to && rs.get(sa_i + k) == Some(&query[k]) {
        k += 1;
    }
    k
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::PrefixCache;

    #[test]
    fn full_match_consumes_whole_query() {
        let rs = b"ACGTACGTTGCA#X".to_vec();
        let esa = Esa::build(&rs, "s").unwrap();
        let (k, iv) = get_match(&esa, &rs, b"ACGTACGT");
        assert_eq!(k, 8);
        assert!(!iv.is_empty());
    }

    #[test]
    fn mismatch_stops_at_divergence() {
        let rs = b"ACGTACGT#X".to_vec();
        let esa = Esa::build(&rs, "s").unwrap();
        let (k, _iv) = get_match(&esa, &rs, b"ACGTTTTT");
        assert_eq!(k, 4);
    }

    #[test]
    fn cached_and_uncached_agree() {
        let rs = b"ACGTACGTACGTTGCA#X".to_vec();
        let esa = Esa::build(&rs, "s").unwrap();
        let cache = PrefixCache::build(&esa, &rs, 4);
        let query = b"ACGTACGTTT";
        let (k1, iv1) = get_match(&esa, &rs, query);
        let (k2, iv2) = get_match_cached(&esa, &rs, &cache, query);
        assert_eq!(k1, k2);
        assert_eq!(iv1, iv2);
    }

    #[test]
    fn no_match_at_all() {
        let rs = b"AAAA#TTTT".to_vec();
        let esa = Esa::build(&rs, "s").unwrap();
        let (k, iv) = get_match(&esa, &rs, b"CCCC");
        assert_eq!(k, 0);
        assert!(iv.is_empty());
    }
}

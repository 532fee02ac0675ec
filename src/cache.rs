// cache.rs - the bounded prefix cache (SPEC_FULL.md 4.3)
//
// A direct-indexed table of every lcp-interval reachable by a fixed-length
// ACGT prefix, built once per subject by a bounded depth-first walk of the
// virtual suffix tree out to depth `L`. Anchor lookups that start with an
// unambiguous ACGT prefix skip the first `L` calls to `step_into_letter`
// and start directly from the cached interval.

use crate::esa::{Esa, Interval};
use crate::lookup;

pub const DEFAULT_CACHE_LEN: usize = 10;

const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

fn base_code(byte: u8) -> Option<usize> {
    match byte {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

pub struct PrefixCache {
    word_len: usize,
    table: Vec<Interval>,
}

impl PrefixCache {
    /// Build a cache resolving every `word_len`-character ACGT prefix to
    /// its lcp-interval in `esa`. Branches that run out of matches before
    /// depth `word_len` are filled with `Interval::EMPTY` directly instead
    /// of recursing through `step_into_letter` for every leaf underneath.
    pub fn build(esa: &Esa, rs: &[u8], word_len: usize) -> Self {
        let table_len = 4usize.pow(word_len as u32);
        let mut table = vec![Interval::EMPTY; table_len];
        descend(esa, rs, esa.root_interval(), 0, 0, word_len, &mut table);
        Self { word_len, table }
    }

    pub fn word_len(&self) -> usize {
        self.word_len
    }

    /// Resolve the interval for `prefix[..word_len]`, or `None` if the
    /// prefix is shorter than `word_len` or contains a non-ACGT byte (the
    /// caller should fall back to the uncached step-by-step walk).
    pub fn lookup(&self, prefix: &[u8]) -> Option<Interval> {
        if prefix.len() < self.word_len {
            return None;
        }
        let mut code = 0usize;
        for &byte in &prefix[..self.word_len] {
            code = code * 4 + base_code(byte)?;
        }
        Some(self.table[code])
    }
}

fn descend(
    esa: &Esa,
    rs: &[u8],
    interval: Interval,
    depth: usize,
    code: usize,
    word_len: usize,
    table: &mut [Interval],
) {
    if depth == word_len {
        table[code] = interval;
        return;
    }
    let span = 4usize.pow((word_len - depth - 1) as u32);

    if interval.is_empty() {
        let start = code * 4 * span;
        table[start..start + 4 * span].fill(Interval::EMPTY);
        return;
    }

    // `interval.l` can run ahead of `depth` (a singleton fast-forwarded to
    // the end of its suffix, or a non-singleton whose members happen to
    // share more than the one character just matched). Those extra
    // characters aren't a branch point: exactly one base continues, read
    // directly off the source string, and the other three are empty
    // without a further step_into_letter call.
    if interval.l > depth {
        let sa_i = esa.sa[interval.first_sa_index()];
        let actual = rs.get(sa_i + depth).copied();
        for (bi, &base) in BASES.iter().enumerate() {
            let child_code = code * 4 + bi;
            if actual == Some(base) {
                descend(esa, rs, interval, depth + 1, child_code, word_len, table);
            } else {
                let start = child_code * span;
                table[start..start + span].fill(Interval::EMPTY);
            }
        }
        return;
    }

    for (bi, &base) in BASES.iter().enumerate() {
        let child_code = code * 4 + bi;
        let next = esa.step_into_letter(rs, interval, base);
        if next.is_empty() {
            let start = child_code * span;
            table[start..start + span].fill(Interval::EMPTY);
        } else {
            descend(esa, rs, next, depth + 1, child_code, word_len, table);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_matches_uncached_step_walk() {
        let rs = b"ACGTACGTACGTTGCA#X".to_vec();
        let esa = Esa::build(&rs, "s").unwrap();
        let cache = PrefixCache::build(&esa, &rs, 3);

        let (_, expected) = lookup::get_match(&esa, &rs, b"ACG");

        let cached = cache.lookup(b"ACG").unwrap();
        assert_eq!(cached, expected);
    }

    /// Cross-checks every cached interval against the independent
    /// char-by-char lookup path, which catches the prefix of a shared
    /// repeat (where a cached interval's own lcp runs past the cache's
    /// nominal depth and a naive re-entry into `step_into_letter` would
    /// check the wrong byte).
    #[test]
    fn cache_agrees_with_lookup_for_every_present_word() {
        let rs = b"ACGTACGTACGTACGTAAAA#ACGTACGTACGTACGTAAAA".to_vec();
        let esa = Esa::build(&rs, "s").unwrap();
        let word_len = 4;
        let cache = PrefixCache::build(&esa, &rs, word_len);

        for a in b"ACGT" {
            for b in b"ACGT" {
                for c in b"ACGT" {
                    for d in b"ACGT" {
                        let word = [*a, *b, *c, *d];
                        let (matched, expected) = lookup::get_match(&esa, &rs, &word);
                        let cached = cache.lookup(&word).unwrap();
                        if matched < word_len {
                            assert!(cached.is_empty(), "word {word:?} should be absent");
                        } else {
                            assert_eq!(cached, expected, "word {word:?} disagrees");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn absent_prefix_resolves_to_empty() {
        let rs = b"AAAA#TTTT".to_vec();
        let esa = Esa::build(&rs, "s").unwrap();
        let cache = PrefixCache::build(&esa, &rs, 2);
        let empty = cache.lookup(b"CG").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn non_acgt_prefix_returns_none() {
        let rs = b"ACGT#ACGT".to_vec();
        let esa = Esa::build(&rs, "s").unwrap();
        let cache = PrefixCache::build(&esa, &rs, 4);
        assert!(cache.lookup(b"AC!T").is_none());
    }

    #[test]
    fn short_query_returns_none() {
        let rs = b"ACGT#ACGT".to_vec();
        let esa = Esa::build(&rs, "s").unwrap();
        let cache = PrefixCache::build(&esa, &rs, 4);
        assert!(cache.lookup(b"AC").is_none());
    }
}

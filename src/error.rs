// error.rs - structured error kinds and the diagnostics context
//
// Replaces the "process-wide mutable flags" pattern with an explicit
// context object that is threaded by reference through preparation and
// the driver (see SPEC_FULL.md 4.11).

use thiserror::Error;

/// The non-recoverable and per-subject-recoverable error kinds.
///
/// `InputInvalid` and `ResourceExhausted` are fatal: they propagate out of
/// `main` and produce exit code 1. `IndexOverflow` is recoverable at the
/// row level -- the driver catches it, NaNs the affected row, and keeps
/// going.
#[derive(Debug, Error)]
pub enum CrateError {
    #[error("invalid input: {0}")]
    InputInvalid(String),

    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("sequence '{sequence}' rejected: LCP value exceeds 2^24-1 packing limit")]
    IndexOverflow { sequence: String },
}

/// Diagnostics context threaded explicitly through preparation and the
/// driver in place of global mutable state.
///
/// Preparation (`sequence::Sequence::prepare`) takes `&mut Diagnostics`.
/// The driver gives each parallel task its own `Diagnostics` and folds
/// them together at the join barrier with `merge`.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub non_acgt_seen: bool,
    pub short_sequences: Vec<String>,
    pub low_coverage_pairs: usize,
    pub truncated_names: Vec<String>,
    pub soft_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_non_acgt(&mut self) {
        if !self.non_acgt_seen {
            eprintln!("⚠️  non-ACGT characters found in input; stripped before indexing");
        }
        self.non_acgt_seen = true;
        self.soft_error = true;
    }

    pub fn record_short_sequence(&mut self, name: &str, length: usize) {
        eprintln!("⚠️  sequence '{name}' is only {length}bp (< 1000bp); distances may be noisy");
        self.short_sequences.push(name.to_string());
        self.soft_error = true;
    }

    pub fn record_low_coverage(&mut self, name_a: &str, name_b: &str) {
        eprintln!("⚠️  low anchor coverage between '{name_a}' and '{name_b}'");
        self.low_coverage_pairs += 1;
        self.soft_error = true;
    }

    pub fn record_name_truncated(&mut self, original: &str) {
        eprintln!("⚠️  name '{original}' truncated to 10 characters");
        self.truncated_names.push(original.to_string());
        self.soft_error = true;
    }

    pub fn record_index_overflow(&mut self, sequence: &str) {
        eprintln!("⚠️  sequence '{sequence}' rejected: LCP packing overflow, row will be NaN");
        self.soft_error = true;
    }

    /// Merge a worker-local diagnostics snapshot into this one.
    pub fn merge(&mut self, other: Diagnostics) {
        self.non_acgt_seen |= other.non_acgt_seen;
        self.short_sequences.extend(other.short_sequences);
        self.low_coverage_pairs += other.low_coverage_pairs;
        self.truncated_names.extend(other.truncated_names);
        self.soft_error |= other.soft_error;
    }

    /// Process exit code per section 6/7: 0 clean, 2 soft errors accumulated.
    /// Fatal errors are signalled by `Err(CrateError)` out of `main`, not here.
    pub fn exit_code(&self) -> i32 {
        if self.soft_error {
            2
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_diagnostics_exit_zero() {
        let d = Diagnostics::new();
        assert_eq!(d.exit_code(), 0);
    }

    #[test]
    fn soft_error_exit_nonzero() {
        let mut d = Diagnostics::new();
        d.record_non_acgt();
        assert_eq!(d.exit_code(), 2);
    }

    #[test]
    fn merge_accumulates() {
        let mut a = Diagnostics::new();
        let mut b = Diagnostics::new();
        a.record_short_sequence("s1", 500);
        b.record_low_coverage("s1", "s2");
        a.merge(b);
        assert_eq!(a.short_sequences.len(), 1);
        assert_eq!(a.low_coverage_pairs, 1);
        assert!(a.soft_error);
    }
}

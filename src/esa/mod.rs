// esa/mod.rs - the enhanced suffix array: SA + LCP + child table, exposed
// as one indexed subject (SPEC_FULL.md 3, 4.2).

pub mod cld;
pub mod interval;
pub mod lcp;
pub mod suffix_array;

pub use cld::{step_into_letter, ChildTable};
pub use interval::Interval;
pub use lcp::LcpEntry;

use crate::error::CrateError;

/// `SA + LCP + CLD` over one subject's `RS` string, plus the root interval
/// cached once at build time.
pub struct Esa {
    pub sa: Vec<usize>,
    pub lcp: Vec<Option<LcpEntry>>,
    pub cld: ChildTable,
    root: Interval,
}

impl Esa {
    pub fn build(rs: &[u8], sequence_name: &str) -> Result<Self, CrateError> {
        let sa = suffix_array::sa_build(rs);
        let lcp = lcp::build_lcp_array(rs, &sa, sequence_name)?;
        let cld = ChildTable::build(&lcp);
        let root = Self::compute_root(&sa, &lcp, &cld);
        Ok(Self { sa, lcp, cld, root })
    }

    fn compute_root(sa: &[usize], lcp: &[Option<LcpEntry>], cld: &ChildTable) -> Interval {
        let n = sa.len();
        match n {
            0 => Interval::EMPTY,
            1 => Interval::singleton(0, 0),
            _ => {
                let m = cld.first_l_index(0, n - 1);
                let l = lcp[m].map(|e| e.lcp() as usize).unwrap_or(0);
                Interval {
                    i: 0,
                    j: (n - 1) as i64,
                    l,
                    m: m as i64,
                }
            }
        }
    }

    pub fn root_interval(&self) -> Interval {
        self.root
    }

    pub fn step_into_letter(&self, rs: &[u8], interval: Interval, a: u8) -> Interval {
        step_into_letter(rs, &self.sa, &self.lcp, &self.cld, interval, a)
    }

    pub fn len(&self) -> usize {
        self.sa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sa.is_empty()
    }
}

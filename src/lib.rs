// lib.rs - andi-anchor library root

//! # andi-anchor - anchor-based estimator of pairwise evolutionary distance
//!
//! Estimates pairwise evolutionary distance between closely related genomes
//! without a multiple sequence alignment: an enhanced suffix array indexes
//! one subject of each pair, maximal unique matches ("anchors") against it
//! are found by scanning the other subject's forward strand, and the gaps
//! between colinear anchors are compared column by column to build a
//! substitution matrix. Four evolutionary models turn that matrix into a
//! single distance estimate; an optional multinomial bootstrap resamples it
//! for confidence assessment.
//!
//! ## Basic usage
//!
//! ```rust,no_run
//! use andi_anchor::prelude::*;
//!
//! let args: Args = argh::from_env();
//! let mut diagnostics = Diagnostics::new();
//! let subjects = fasta::load_subjects(&args, &mut diagnostics).unwrap();
//! let indices = driver::build_indices(&subjects, args.cache_len, &mut diagnostics);
//! let result = driver::run(
//!     &subjects,
//!     &indices,
//!     Model::JukesCantor,
//!     args.pvalue,
//!     SchedulingPolicy::Fast,
//!     0,
//!     0,
//! );
//! # let _ = result;
//! ```

pub mod anchor;
pub mod bootstrap;
pub mod cache;
pub mod cli;
pub mod driver;
pub mod error;
pub mod esa;
pub mod fasta;
pub mod lookup;
pub mod model;
pub mod output;
pub mod sequence;

pub mod prelude {
    pub use crate::anchor;
    pub use crate::bootstrap;
    pub use crate::cache::PrefixCache;
    pub use crate::cli::{Args, Config};
    pub use crate::driver::{self, MatrixResult, SchedulingPolicy};
    pub use crate::error::{CrateError, Diagnostics};
    pub use crate::esa::Esa;
    pub use crate::fasta;
    pub use crate::model::{Model, MutationMatrix};
    pub use crate::output;
    pub use crate::sequence::{Sequence, Subject};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

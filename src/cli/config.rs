// config.rs - TOML configuration file support
//
// Every field optional; a CLI flag left at its `argh` default is
// overridden by a config value, and anything actually typed on the
// command line wins over the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::CrateError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub fof: Option<String>,
    pub join: Option<bool>,
    pub bootstrap: Option<usize>,
    pub model: Option<String>,
    pub pvalue: Option<f64>,
    pub low_memory: Option<bool>,
    pub threads: Option<usize>,
    pub cache_len: Option<usize>,
    pub truncate_names: Option<usize>,
    pub progress: Option<bool>,
    pub verbose: Option<bool>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CrateError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CrateError::InputInvalid(format!("reading config '{}': {e}", path.display()))
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CrateError::InputInvalid(format!("parsing config '{}': {e}", path.display()))
        })?;
        println!("📄 loaded configuration from: {}", path.display());
        Ok(config)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CrateError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| CrateError::InputInvalid(format!("serializing config: {e}")))?;
        fs::write(path, content).map_err(|e| {
            CrateError::InputInvalid(format!("writing config '{}': {e}", path.display()))
        })?;
        println!("📄 saved configuration to: {}", path.display());
        Ok(())
    }

    pub fn generate_sample() -> String {
        r#"# andi-anchor.toml - configuration file for andi-anchor
# Command line flags override these settings.

# Read subject paths from a file of filenames instead of the command line.
# fof = "subjects.txt"

# Concatenate multiple records within one FASTA file into a single subject.
join = false

# Number of bootstrap replicates (0 disables bootstrapping).
bootstrap = 0

# Evolutionary model: raw, jc, kimura, logdet
model = "jc"

# Anchor acceptance p-value threshold.
pvalue = 0.025

# Inner-parallel (low-memory) vs outer-parallel (fast) pair-grid scheduling.
low_memory = false

# Number of worker threads (omit for auto-detection).
# threads = 16

# Prefix-cache word length in bases.
cache_len = 10

# Truncate subject names in the output matrix to this many characters.
truncate_names = 10

# Show progress while the matrix is computed.
progress = false

# Print extra diagnostic information to stderr.
verbose = false
"#
        .to_string()
    }
}

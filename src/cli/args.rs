// args.rs - command line arguments definition

use argh::FromArgs;

use super::config::Config;
use crate::error::CrateError;

#[derive(FromArgs)]
/// andi-anchor - anchor-based estimator of pairwise evolutionary distance
/// between closely related genomes
pub struct Args {
    /// FASTA files to compare (each may hold multiple records)
    #[argh(positional)]
    pub files: Vec<String>,

    /// read a file of filenames instead of passing FASTA paths directly
    #[argh(option)]
    pub fof: Option<String>,

    /// join multiple records within one FASTA file into a single subject
    #[argh(switch)]
    pub join: bool,

    /// number of bootstrap replicates (0 disables bootstrapping)
    #[argh(option, default = "0")]
    pub bootstrap: usize,

    /// evolutionary model: raw, jc, kimura, logdet (default: jc)
    #[argh(option, default = "String::from(\"jc\")")]
    pub model: String,

    /// anchor acceptance p-value threshold (default: 0.025)
    #[argh(option, default = "0.025")]
    pub pvalue: f64,

    /// schedule the pair grid inner-parallel, one row at a time, to bound
    /// peak memory instead of running every row concurrently (default:
    /// fast/outer-parallel)
    #[argh(switch)]
    pub low_memory: bool,

    /// number of worker threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// prefix-cache word length in bases (default: 10)
    #[argh(option, default = "10")]
    pub cache_len: usize,

    /// truncate subject names in the output matrix to this many characters
    /// (default: 10, the PHYLIP convention)
    #[argh(option, default = "10")]
    pub truncate_names: usize,

    /// show progress while the matrix is computed
    #[argh(switch)]
    pub progress: bool,

    /// print extra diagnostic information to stderr
    #[argh(switch, short = 'v')]
    pub verbose: bool,

    /// path to a TOML configuration file; CLI flags override its values
    #[argh(option)]
    pub config: Option<String>,

    /// print a commented sample configuration file to stdout and exit
    #[argh(switch)]
    pub generate_config: bool,
}

impl Args {
    /// Load `path` as a TOML config and let it fill in any flag still at
    /// its `argh` default. A flag the user actually typed always wins.
    pub fn with_config_file(mut self, path: &str) -> Result<Self, CrateError> {
        let config = Config::from_file(path)?;
        self.apply_config(config);
        Ok(self)
    }

    fn apply_config(&mut self, config: Config) {
        if self.fof.is_none() {
            self.fof = config.fof;
        }
        if !self.join {
            if let Some(v) = config.join {
                self.join = v;
            }
        }
        if self.bootstrap == 0 {
            if let Some(v) = config.bootstrap {
                self.bootstrap = v;
            }
        }
        if self.model == "jc" {
            if let Some(v) = config.model {
                self.model = v;
            }
        }
        if (self.pvalue - 0.025).abs() < f64::EPSILON {
            if let Some(v) = config.pvalue {
                self.pvalue = v;
            }
        }
        if !self.low_memory {
            if let Some(v) = config.low_memory {
                self.low_memory = v;
            }
        }
        if self.threads.is_none() {
            self.threads = config.threads;
        }
        if self.cache_len == 10 {
            if let Some(v) = config.cache_len {
                self.cache_len = v;
            }
        }
        if self.truncate_names == 10 {
            if let Some(v) = config.truncate_names {
                self.truncate_names = v;
            }
        }
        if !self.progress {
            if let Some(v) = config.progress {
                self.progress = v;
            }
        }
        if !self.verbose {
            if let Some(v) = config.verbose {
                self.verbose = v;
            }
        }
    }
}

// fasta.rs - thin FASTA ingestion (SPEC_FULL.md 4.12)
//
// Deliberately minimal: read records with `bio::io::fasta`, normalize and
// index them. No schema database, no allele hashing, no persistent cache of
// previous runs.

use std::fs;
use std::path::Path;

use bio::io::fasta;

use crate::cli::Args;
use crate::error::{CrateError, Diagnostics};
use crate::sequence::{Sequence, Subject, RECORD_SEPARATOR};

/// Resolve the list of FASTA paths to read: either `args.files` directly,
/// or the paths listed one per line in `args.fof` (file of filenames).
pub fn resolve_paths(args: &Args) -> Result<Vec<String>, CrateError> {
    if let Some(fof) = &args.fof {
        let content = fs::read_to_string(fof)
            .map_err(|e| CrateError::InputInvalid(format!("reading file of filenames '{fof}': {e}")))?;
        let paths: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if paths.is_empty() {
            return Err(CrateError::InputInvalid(format!(
                "file of filenames '{fof}' is empty"
            )));
        }
        Ok(paths)
    } else if args.files.is_empty() {
        Err(CrateError::InputInvalid(
            "no input FASTA files given (pass paths or --fof)".to_string(),
        ))
    } else {
        Ok(args.files.clone())
    }
}

fn truncate_name(name: &str, max_len: usize, diagnostics: &mut Diagnostics) -> String {
    if name.chars().count() <= max_len || max_len == 0 {
        return name.to_string();
    }
    diagnostics.record_name_truncated(name);
    name.chars().take(max_len).collect()
}

/// Load every subject named in `args`, normalizing and indexing as we go.
/// When `--join` is set, every record within one file becomes a single
/// subject, its records concatenated with `!` join markers; otherwise each
/// record in every file becomes its own subject.
pub fn load_subjects(args: &Args, diagnostics: &mut Diagnostics) -> Result<Vec<Subject>, CrateError> {
    let paths = resolve_paths(args)?;
    let mut subjects = Vec::new();

    for path in &paths {
        let reader = fasta::Reader::from_file(Path::new(path)).map_err(|e| {
            CrateError::InputInvalid(format!("opening FASTA file '{path}': {e}"))
        })?;

        if args.join {
            let stem = Path::new(path)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| path.clone());
            let mut joined = Vec::new();
            let mut any_record = false;
            for result in reader.records() {
                let record = result.map_err(|e| {
                    CrateError::InputInvalid(format!("reading FASTA record in '{path}': {e}"))
                })?;
                if any_record {
                    joined.push(RECORD_SEPARATOR);
                }
                joined.extend_from_slice(record.seq());
                any_record = true;
            }
            if !any_record {
                return Err(CrateError::InputInvalid(format!(
                    "FASTA file '{path}' has no records"
                )));
            }
            let name = truncate_name(&stem, args.truncate_names, diagnostics);
            let sequence = Sequence::prepare(&name, &joined, diagnostics)?;
            subjects.push(Subject::from_sequence(sequence)?);
        } else {
            for result in reader.records() {
                let record = result.map_err(|e| {
                    CrateError::InputInvalid(format!("reading FASTA record in '{path}': {e}"))
                })?;
                let name = truncate_name(record.id(), args.truncate_names, diagnostics);
                let sequence = Sequence::prepare(&name, record.seq(), diagnostics)?;
                subjects.push(Subject::from_sequence(sequence)?);
            }
        }
    }

    if subjects.is_empty() {
        return Err(CrateError::InputInvalid(
            "no usable sequences found in the given input".to_string(),
        ));
    }

    Ok(subjects)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_args(files: Vec<String>) -> Args {
        Args {
            files,
            fof: None,
            join: false,
            bootstrap: 0,
            model: "jc".to_string(),
            pvalue: 0.025,
            low_memory: false,
            threads: None,
            cache_len: 10,
            truncate_names: 10,
            progress: false,
            verbose: false,
            config: None,
            generate_config: false,
        }
    }

    #[test]
    fn resolve_paths_uses_positional_files_by_default() {
        let args = default_args(vec!["a.fasta".to_string(), "b.fasta".to_string()]);
        let paths = resolve_paths(&args).unwrap();
        assert_eq!(paths, vec!["a.fasta", "b.fasta"]);
    }

    #[test]
    fn resolve_paths_rejects_no_input() {
        let args = default_args(vec![]);
        assert!(resolve_paths(&args).is_err());
    }

    #[test]
    fn long_names_are_truncated_and_flagged() {
        let mut diag = Diagnostics::new();
        let name = truncate_name("a_very_long_sequence_identifier", 10, &mut diag);
        assert_eq!(name.chars().count(), 10);
        assert_eq!(diag.truncated_names.len(), 1);
    }

    #[test]
    fn short_names_pass_through_untouched() {
        let mut diag = Diagnostics::new();
        let name = truncate_name("short", 10, &mut diag);
        assert_eq!(name, "short");
        assert!(diag.truncated_names.is_empty());
    }
}

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Default delimiter separating chain tokens within one fold specification.
pub const DEFAULT_JOB_DELIMITER: char = ';';

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Format {0} is not supported.")]
    UnsupportedFormat(String),
    #[error("Fold specification '{0}' does not reference any sequence")]
    EmptySpecification(String),
}

/// Recognized fold-specification file formats.
///
/// Unsupported format names are a fatal configuration error; there is no
/// silent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
    #[default]
    Abriss,
}

impl FromStr for SpecFormat {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abriss" => Ok(SpecFormat::Abriss),
            other => Err(StoreError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Canonicalized view of a set of fold specifications: the deduplicated
/// sequence identifiers referenced across all of them, and the identifier set
/// referenced by each individual specification.
#[derive(Debug, Clone, Default)]
pub struct SequenceStore {
    fold_specifications: Vec<String>,
    unique_sequences: BTreeSet<String>,
    sequences_by_fold: BTreeMap<String, BTreeSet<String>>,
}

impl SequenceStore {
    /// Parses fold-specification lines into a store.
    ///
    /// Lines are trimmed and deduplicated before parsing (first occurrence
    /// wins, input order preserved); blank lines are skipped. Each retained
    /// line is split on `job_delimiter` into chain tokens, and the substring
    /// before the first `:` of each token is taken as a sequence identifier.
    /// Anything after the `:` is per-chain metadata ignored by this layer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptySpecification`] if a line resolves to no
    /// identifiers at all (for example a line made only of delimiters).
    pub fn from_specification_lines<I, S>(lines: I, job_delimiter: char) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut fold_specifications = Vec::new();
        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() || !seen.insert(line.to_string()) {
                continue;
            }
            fold_specifications.push(line.to_string());
        }

        let mut unique_sequences = BTreeSet::new();
        let mut sequences_by_fold = BTreeMap::new();
        for spec in &fold_specifications {
            let mut sequences = BTreeSet::new();
            for chain in spec.split(job_delimiter) {
                let identifier = chain.split(':').next().unwrap_or_default().trim();
                if !identifier.is_empty() {
                    sequences.insert(identifier.to_string());
                }
            }
            if sequences.is_empty() {
                return Err(StoreError::EmptySpecification(spec.clone()));
            }
            unique_sequences.extend(sequences.iter().cloned());
            sequences_by_fold.insert(spec.clone(), sequences);
        }

        Ok(Self {
            fold_specifications,
            unique_sequences,
            sequences_by_fold,
        })
    }

    /// Reads a newline-delimited specification file in the given format.
    pub fn from_file(
        path: &Path,
        format: SpecFormat,
        job_delimiter: char,
    ) -> Result<Self, StoreError> {
        let reader = BufReader::new(File::open(path)?);
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        match format {
            SpecFormat::Abriss => Self::from_specification_lines(lines, job_delimiter),
        }
    }

    /// The distinct fold specifications, in first-seen input order.
    pub fn fold_specifications(&self) -> &[String] {
        &self.fold_specifications
    }

    /// The deduplicated sequence identifiers referenced across all
    /// specifications.
    pub fn unique_sequences(&self) -> &BTreeSet<String> {
        &self.unique_sequences
    }

    /// The identifier set referenced by one specification, if it is known.
    pub fn sequences_for(&self, spec: &str) -> Option<&BTreeSet<String>> {
        self.sequences_by_fold.get(spec)
    }

    pub fn is_empty(&self) -> bool {
        self.fold_specifications.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(lines: &[&str]) -> SequenceStore {
        SequenceStore::from_specification_lines(lines, DEFAULT_JOB_DELIMITER).unwrap()
    }

    #[test]
    fn chain_tokens_are_split_on_the_job_delimiter() {
        let store = store(&["A:1;B:1"]);
        let ids: Vec<&str> = store.unique_sequences().iter().map(String::as_str).collect();
        assert_eq!(ids, ["A", "B"]);
    }

    #[test]
    fn metadata_after_colon_is_ignored() {
        let store = store(&["P12345:2:1-100;Q99999"]);
        let ids: Vec<&str> = store.unique_sequences().iter().map(String::as_str).collect();
        assert_eq!(ids, ["P12345", "Q99999"]);
    }

    #[test]
    fn duplicate_and_blank_lines_are_collapsed() {
        let store = store(&["A:1;B:1", "", "A:1;B:1", "A:1"]);
        assert_eq!(store.fold_specifications(), ["A:1;B:1", "A:1"]);
    }

    #[test]
    fn per_line_sets_union_to_the_global_unique_set() {
        let store = store(&["A:1;B:1", "B:1;C:1", "C:1"]);
        let mut union = BTreeSet::new();
        for spec in store.fold_specifications() {
            union.extend(store.sequences_for(spec).unwrap().iter().cloned());
        }
        assert_eq!(&union, store.unique_sequences());
    }

    #[test]
    fn repeated_identifiers_within_one_line_collapse() {
        let store = store(&["A:1;A:2"]);
        assert_eq!(store.sequences_for("A:1;A:2").unwrap().len(), 1);
    }

    #[test]
    fn specification_without_identifiers_is_rejected() {
        let err = SequenceStore::from_specification_lines([";;"], DEFAULT_JOB_DELIMITER)
            .unwrap_err();
        assert!(matches!(err, StoreError::EmptySpecification(_)));
    }

    #[test]
    fn unsupported_format_name_is_a_fatal_error() {
        let err = SpecFormat::from_str("alphafold3").unwrap_err();
        assert_eq!(err.to_string(), "Format alphafold3 is not supported.");
    }

    #[test]
    fn file_round_trip_deduplicates_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folds.txt");
        std::fs::write(&path, "A:1;B:1\nA:1\n\nA:1;B:1\n").unwrap();

        let store =
            SequenceStore::from_file(&path, SpecFormat::Abriss, DEFAULT_JOB_DELIMITER).unwrap();
        assert_eq!(store.fold_specifications().len(), 2);
        assert_eq!(store.unique_sequences().len(), 2);
    }
}

use crate::core::models::SequenceFeatures;
use crate::engine::error::EngineError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Supplies precomputed feature dimensions for sequence identifiers.
///
/// Feature generation itself (alignment searches, template lookup) happens
/// outside this library; the batching layer only needs the resulting
/// dimensions. An identifier the resolver does not cover is a hard
/// [`EngineError::Resolution`] — skipping unresolvable jobs silently would
/// corrupt downstream batch composition.
pub trait FeatureResolver {
    fn resolve(&self, identifier: &str) -> Result<SequenceFeatures, EngineError>;
}

#[derive(Debug, Deserialize)]
struct FeatureRow {
    identifier: String,
    seq_length: usize,
    msa_depth: usize,
}

/// A [`FeatureResolver`] backed by a comma-separated feature table with the
/// header `identifier,seq_length,msa_depth`.
///
/// Duplicate rows for one identifier are accepted only when they agree;
/// conflicting rows are reported as an error rather than silently merged,
/// since two distinct sequences must never share an identifier.
#[derive(Debug, Default)]
pub struct TableResolver {
    features: HashMap<String, SequenceFeatures>,
}

impl TableResolver {
    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut resolver = Self::default();
        for row in reader.deserialize() {
            let row: FeatureRow = row?;
            resolver.insert(
                row.identifier,
                SequenceFeatures {
                    seq_length: row.seq_length,
                    msa_depth: row.msa_depth,
                },
            )?;
        }
        Ok(resolver)
    }

    pub fn from_entries<I, S>(entries: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (S, SequenceFeatures)>,
        S: Into<String>,
    {
        let mut resolver = Self::default();
        for (identifier, features) in entries {
            resolver.insert(identifier.into(), features)?;
        }
        Ok(resolver)
    }

    fn insert(&mut self, identifier: String, features: SequenceFeatures) -> Result<(), EngineError> {
        match self.features.get(&identifier) {
            Some(existing) if *existing != features => Err(EngineError::FeatureConflict {
                identifier,
                message: format!(
                    "length {}/depth {} vs length {}/depth {}",
                    existing.seq_length, existing.msa_depth, features.seq_length, features.msa_depth
                ),
            }),
            _ => {
                self.features.insert(identifier, features);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FeatureResolver for TableResolver {
    fn resolve(&self, identifier: &str) -> Result<SequenceFeatures, EngineError> {
        self.features
            .get(identifier)
            .copied()
            .ok_or_else(|| EngineError::Resolution {
                identifier: identifier.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(seq_length: usize, msa_depth: usize) -> SequenceFeatures {
        SequenceFeatures {
            seq_length,
            msa_depth,
        }
    }

    #[test]
    fn resolves_known_identifiers() {
        let resolver = TableResolver::from_entries([("A", features(100, 512))]).unwrap();
        assert_eq!(resolver.resolve("A").unwrap(), features(100, 512));
    }

    #[test]
    fn unknown_identifier_is_a_resolution_failure() {
        let resolver = TableResolver::from_entries([("A", features(100, 512))]).unwrap();
        let err = resolver.resolve("B").unwrap_err();
        assert!(matches!(err, EngineError::Resolution { identifier } if identifier == "B"));
    }

    #[test]
    fn agreeing_duplicate_rows_are_accepted() {
        let resolver =
            TableResolver::from_entries([("A", features(100, 512)), ("A", features(100, 512))])
                .unwrap();
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn conflicting_duplicate_rows_are_rejected() {
        let err =
            TableResolver::from_entries([("A", features(100, 512)), ("A", features(120, 512))])
                .unwrap_err();
        assert!(matches!(err, EngineError::FeatureConflict { identifier, .. } if identifier == "A"));
    }

    #[test]
    fn loads_a_comma_separated_table_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");
        std::fs::write(
            &path,
            "identifier,seq_length,msa_depth\nP12345,230,1024\nQ99999,88,64\n",
        )
        .unwrap();

        let resolver = TableResolver::from_path(&path).unwrap();
        assert_eq!(resolver.resolve("P12345").unwrap(), features(230, 1024));
        assert_eq!(resolver.resolve("Q99999").unwrap(), features(88, 64));
    }
}

use serde::Serialize;

/// One sequence record from a multi-FASTA source.
///
/// The `identifier` is the canonical key used to name per-sequence files and
/// to reference the sequence from fold specifications. The `description`
/// preserves the original header body so output files can reproduce it
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaEntry {
    pub identifier: String,
    pub description: String,
    pub sequence: String,
}

/// Precomputed feature dimensions for one sequence, supplied by a
/// [`FeatureResolver`](crate::engine::resolver::FeatureResolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceFeatures {
    /// Residue count of the sequence.
    pub seq_length: usize,
    /// Number of aligned homologous sequences in the MSA feature stack.
    pub msa_depth: usize,
}

/// One fold-prediction job with its resolved feature dimensions.
///
/// Immutable once created; a fresh list is built per clustering invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    /// The raw fold specification string naming this job.
    pub spec: String,
    pub seq_length: usize,
    pub msa_depth: usize,
}

/// One row of the cluster table: a job, its bin assignment, and the padding
/// targets of that bin.
///
/// Field order matches the on-disk column order
/// `name,msa_depth,seq_length,cluster,max_msa_depth,max_seq_length`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusteredJob {
    pub name: String,
    pub msa_depth: usize,
    pub seq_length: usize,
    /// Zero-based bin index, ordered by increasing sequence length.
    pub cluster: usize,
    pub max_msa_depth: usize,
    pub max_seq_length: usize,
}

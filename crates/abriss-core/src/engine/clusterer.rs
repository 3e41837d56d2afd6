use crate::core::models::{ClusteredJob, JobDescriptor};
use crate::engine::error::EngineError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default)]
struct BinStats {
    max_seq_length: usize,
    max_msa_depth: usize,
}

/// Groups jobs into contiguous, zero-based length bins and computes each
/// bin's padding targets.
///
/// The bin index is `(seq_length - min_length) / bin_size` with truncating
/// integer division, where `min_length` is the smallest observed length
/// floored at 1. A job exactly on a bin boundary therefore falls into the
/// lower bin. Per bin, the maximum sequence length and maximum MSA depth
/// among its members are the values every member must be padded to during
/// batched inference; they are repeated on each member's output row.
///
/// Returns exactly one row per input job, in input order. The computation is
/// deterministic: rerunning on the same job list with the same bin size
/// yields identical assignments and maxima.
pub fn cluster_by_length(
    jobs: &[JobDescriptor],
    bin_size: usize,
) -> Result<Vec<ClusteredJob>, EngineError> {
    if bin_size == 0 {
        return Err(EngineError::Config(
            "cluster bin size must be at least 1".to_string(),
        ));
    }
    if jobs.is_empty() {
        return Ok(Vec::new());
    }

    let min_length = jobs
        .iter()
        .map(|job| job.seq_length)
        .min()
        .unwrap_or(1)
        .max(1);

    // saturating_sub keeps a zero-length job in bin 0 instead of underflowing
    // below the floored minimum.
    let clusters: Vec<usize> = jobs
        .iter()
        .map(|job| job.seq_length.saturating_sub(min_length) / bin_size)
        .collect();

    let mut stats: BTreeMap<usize, BinStats> = BTreeMap::new();
    for (job, &cluster) in jobs.iter().zip(&clusters) {
        let entry = stats.entry(cluster).or_default();
        entry.max_seq_length = entry.max_seq_length.max(job.seq_length);
        entry.max_msa_depth = entry.max_msa_depth.max(job.msa_depth);
    }

    Ok(jobs
        .iter()
        .zip(&clusters)
        .map(|(job, &cluster)| {
            let bin = stats[&cluster];
            ClusteredJob {
                name: job.spec.clone(),
                msa_depth: job.msa_depth,
                seq_length: job.seq_length,
                cluster,
                max_msa_depth: bin.max_msa_depth,
                max_seq_length: bin.max_seq_length,
            }
        })
        .collect())
}

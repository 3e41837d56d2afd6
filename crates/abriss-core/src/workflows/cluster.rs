use crate::core::models::{ClusteredJob, JobDescriptor};
use crate::core::store::SequenceStore;
use crate::engine::clusterer::cluster_by_length;
use crate::engine::config::ClusterConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::resolver::FeatureResolver;
use std::io::Write;
use tracing::{info, instrument};

/// Clusters fold-prediction jobs into homogeneous length bins.
///
/// Pipeline: specification lines are canonicalized by the
/// [`SequenceStore`], each job's chains are resolved to feature dimensions
/// through `resolver` (a multimer's length and depth are the sums over its
/// chains), and the resulting jobs are binned by
/// [`cluster_by_length`]. One output row per distinct input specification,
/// in first-seen order.
///
/// # Errors
///
/// An empty fold list is a configuration error, raised before any clustering
/// is attempted. A chain identifier the resolver does not cover propagates
/// as [`EngineError::Resolution`]; no job is silently skipped.
#[instrument(skip_all, name = "cluster_workflow")]
pub fn run(
    folds: &[String],
    resolver: &dyn FeatureResolver,
    config: &ClusterConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<ClusteredJob>, EngineError> {
    if folds.is_empty() {
        return Err(EngineError::Config(
            "no fold specifications were supplied".to_string(),
        ));
    }

    let store = SequenceStore::from_specification_lines(folds, config.job_delimiter)?;
    info!(
        "Parsed {} distinct fold specification(s) referencing {} unique sequence(s).",
        store.fold_specifications().len(),
        store.unique_sequences().len()
    );

    reporter.report(Progress::PhaseStart {
        name: "Resolving features",
    });
    reporter.report(Progress::TaskStart {
        total_items: store.fold_specifications().len() as u64,
    });

    let mut jobs = Vec::with_capacity(store.fold_specifications().len());
    for spec in store.fold_specifications() {
        let sequences = store.sequences_for(spec).ok_or_else(|| {
            EngineError::Internal(format!("specification '{spec}' missing from store"))
        })?;

        let mut seq_length = 0;
        let mut msa_depth = 0;
        for identifier in sequences {
            let features = resolver.resolve(identifier)?;
            seq_length += features.seq_length;
            msa_depth += features.msa_depth;
        }

        jobs.push(JobDescriptor {
            spec: spec.clone(),
            seq_length,
            msa_depth,
        });
        reporter.report(Progress::ItemDone);
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Clustering by length",
    });
    let rows = cluster_by_length(&jobs, config.bin_size)?;

    let bin_count = rows.iter().map(|r| r.cluster).max().map_or(0, |c| c + 1);
    info!(
        "Assigned {} job(s) to {} cluster(s) with bin size {}.",
        rows.len(),
        bin_count,
        config.bin_size
    );
    reporter.report(Progress::PhaseFinish);
    Ok(rows)
}

/// Writes the cluster table as comma-separated text with the header
/// `name,msa_depth,seq_length,cluster,max_msa_depth,max_seq_length`.
pub fn write_rows(rows: &[ClusteredJob], writer: &mut impl Write) -> Result<(), EngineError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::SequenceFeatures;
    use crate::engine::config::ClusterConfigBuilder;
    use crate::engine::resolver::TableResolver;

    fn resolver() -> TableResolver {
        TableResolver::from_entries([
            (
                "A",
                SequenceFeatures {
                    seq_length: 100,
                    msa_depth: 512,
                },
            ),
            (
                "B",
                SequenceFeatures {
                    seq_length: 200,
                    msa_depth: 128,
                },
            ),
        ])
        .unwrap()
    }

    fn config(bin_size: usize) -> ClusterConfig {
        ClusterConfigBuilder::new().bin_size(bin_size).build().unwrap()
    }

    #[test]
    fn empty_fold_list_fails_before_clustering() {
        let err = run(
            &[],
            &resolver(),
            &config(150),
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn multimer_dimensions_are_summed_over_chains() {
        let folds = vec!["A:1;B:1".to_string(), "A:1".to_string()];
        let rows = run(&folds, &resolver(), &config(150), &ProgressReporter::new()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "A:1;B:1");
        assert_eq!(rows[0].seq_length, 300);
        assert_eq!(rows[0].msa_depth, 640);
        assert_eq!(rows[1].seq_length, 100);
        assert_eq!(rows[1].msa_depth, 512);
        // min length 100, bin width 150: the dimer lands one bin above the
        // monomer.
        assert_eq!(rows[1].cluster, 0);
        assert_eq!(rows[0].cluster, 1);
    }

    #[test]
    fn duplicate_fold_lines_collapse_to_one_row() {
        let folds = vec!["A:1;B:1".to_string(), "A:1;B:1".to_string()];
        let rows = run(&folds, &resolver(), &config(150), &ProgressReporter::new()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn unresolvable_chain_identifier_propagates() {
        let folds = vec!["A:1;MISSING:1".to_string()];
        let err = run(&folds, &resolver(), &config(150), &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::Resolution { identifier } if identifier == "MISSING"));
    }

    #[test]
    fn running_twice_yields_identical_rows() {
        let folds = vec!["A:1;B:1".to_string(), "B:1".to_string(), "A:1".to_string()];
        let first = run(&folds, &resolver(), &config(64), &ProgressReporter::new()).unwrap();
        let second = run(&folds, &resolver(), &config(64), &ProgressReporter::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn written_table_has_the_expected_header_and_rows() {
        let folds = vec!["A:1;B:1".to_string(), "A:1".to_string()];
        let rows = run(&folds, &resolver(), &config(150), &ProgressReporter::new()).unwrap();

        let mut out = Vec::new();
        write_rows(&rows, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "name,msa_depth,seq_length,cluster,max_msa_depth,max_seq_length"
        );
        assert_eq!(lines[1], "A:1;B:1,640,300,1,640,300");
        assert_eq!(lines[2], "A:1,512,100,0,512,100");
    }
}

use crate::core::models::ClusteredJob;
use crate::engine::config::PredictConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::registry::{FoldingBackend, PredictionResult, batches_from_rows};
use std::path::Path;
use tracing::{info, instrument};

/// Post-prediction side-effect switches, forwarded to the backend's
/// `postprocess` call for every completed job.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostprocessOptions {
    pub zip_pickles: bool,
    pub remove_pickles: bool,
}

/// Runs batched inference over a prepared cluster table.
///
/// Rows are grouped into one [`JobBatch`](crate::engine::registry::JobBatch)
/// per bin; `predict` is invoked once per batch so its fixed invocation cost
/// is amortized over all members, then `postprocess` once per completed job.
/// The backend is passed in explicitly rather than looked up through global
/// state; select it from a
/// [`BackendRegistry`](crate::engine::registry::BackendRegistry) beforehand.
///
/// Backend failures propagate as-is, with no retry: by the time `predict`
/// fails, the batch composition is fixed and a retry would fail the same
/// way without a smaller bin.
#[instrument(skip_all, name = "fold_workflow")]
pub fn run(
    rows: &[ClusteredJob],
    backend: &dyn FoldingBackend,
    predict_config: &PredictConfig,
    output_dir: &Path,
    options: PostprocessOptions,
    reporter: &ProgressReporter,
) -> Result<Vec<PredictionResult>, EngineError> {
    if rows.is_empty() {
        return Err(EngineError::Config(
            "no clustered jobs were supplied".to_string(),
        ));
    }

    let batches = batches_from_rows(rows);
    info!(
        "Dispatching {} job(s) in {} batch(es) to backend '{}'.",
        rows.len(),
        batches.len(),
        backend.name()
    );

    reporter.report(Progress::PhaseStart { name: "Predicting" });
    reporter.report(Progress::TaskStart {
        total_items: batches.len() as u64,
    });

    let mut results = Vec::with_capacity(rows.len());
    for batch in &batches {
        info!(
            "Predicting batch {} ({} job(s), padded to length {} / depth {}).",
            batch.cluster,
            batch.jobs.len(),
            batch.max_seq_length,
            batch.max_msa_depth
        );
        let batch_results = backend.predict(batch, predict_config)?;
        results.extend(batch_results);
        reporter.report(Progress::ItemDone);
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Postprocessing",
    });
    for result in &results {
        backend.postprocess(result, output_dir, options.zip_pickles, options.remove_pickles)?;
    }
    reporter.report(Progress::PhaseFinish);

    info!("Backend returned {} prediction result(s).", results.len());
    Ok(results)
}

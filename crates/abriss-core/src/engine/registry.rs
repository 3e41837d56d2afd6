use crate::core::models::ClusteredJob;
use crate::engine::config::PredictConfig;
use crate::engine::error::EngineError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One length bin's worth of jobs, prepared for a single batched `predict`
/// call. Every member is padded to the bin's maxima during inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobBatch {
    pub cluster: usize,
    pub jobs: Vec<ClusteredJob>,
    pub max_seq_length: usize,
    pub max_msa_depth: usize,
}

/// Groups cluster-table rows into per-bin batches, ordered by bin index.
/// Within a batch, jobs keep their row order.
pub fn batches_from_rows(rows: &[ClusteredJob]) -> Vec<JobBatch> {
    let mut grouped: BTreeMap<usize, Vec<ClusteredJob>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.cluster).or_default().push(row.clone());
    }

    grouped
        .into_iter()
        .map(|(cluster, jobs)| {
            let max_seq_length = jobs.iter().map(|j| j.max_seq_length).max().unwrap_or(0);
            let max_msa_depth = jobs.iter().map(|j| j.max_msa_depth).max().unwrap_or(0);
            JobBatch {
                cluster,
                jobs,
                max_seq_length,
                max_msa_depth,
            }
        })
        .collect()
}

/// The outcome of predicting one job within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionResult {
    /// The fold specification this result belongs to.
    pub name: String,
    /// Model files produced by the engine, best-ranked first.
    pub model_paths: Vec<PathBuf>,
}

/// The uniform contract every structure-prediction engine must satisfy.
///
/// `predict` runs batched inference over one [`JobBatch`] and must accept
/// [`PredictConfig::default`]. Failures are not caught by the batching layer:
/// they usually indicate resource exhaustion on the engine side, which a
/// retry will not fix without a smaller batch, so they propagate to the
/// caller untouched.
///
/// `postprocess` runs once per completed job and produces auxiliary
/// diagnostic artifacts, confining its side effects to `output_dir`. The two
/// flags control zipping of intermediate pickles and their removal.
pub trait FoldingBackend {
    fn name(&self) -> &str;

    fn predict(
        &self,
        batch: &JobBatch,
        config: &PredictConfig,
    ) -> Result<Vec<PredictionResult>, EngineError>;

    fn postprocess(
        &self,
        result: &PredictionResult,
        output_dir: &Path,
        zip_pickles: bool,
        remove_pickles: bool,
    ) -> Result<(), EngineError>;
}

pub type BackendFactory = Box<dyn Fn() -> Box<dyn FoldingBackend> + Send + Sync>;

/// Name-keyed registry of folding backends with a single active instance.
///
/// No backend is active until [`select`](Self::select) is called; invoking
/// the active backend before that is a configuration error. Selection is
/// last-write-wins and the registry performs no internal synchronization —
/// callers that select from multiple threads must serialize externally.
/// Rather than living behind a process-wide global, a registry is passed
/// explicitly into the orchestration that needs it.
#[derive(Default)]
pub struct BackendRegistry {
    backends: BTreeMap<String, BackendFactory>,
    active: Option<Box<dyn FoldingBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, factory: BackendFactory) {
        self.backends.insert(name.into(), factory);
    }

    /// Replaces the active backend with a fresh instance of `name`.
    pub fn select(&mut self, name: &str) -> Result<(), EngineError> {
        let factory = self.backends.get(name).ok_or_else(|| {
            EngineError::Config(format!("unknown folding backend '{name}'"))
        })?;
        self.active = Some(factory());
        Ok(())
    }

    /// The currently active backend.
    pub fn active(&self) -> Result<&dyn FoldingBackend, EngineError> {
        self.active.as_deref().ok_or_else(|| {
            EngineError::Config("no folding backend selected".to_string())
        })
    }

    /// Registered backend names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.backends.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoBackend {
        label: &'static str,
    }

    impl FoldingBackend for EchoBackend {
        fn name(&self) -> &str {
            self.label
        }

        fn predict(
            &self,
            batch: &JobBatch,
            _config: &PredictConfig,
        ) -> Result<Vec<PredictionResult>, EngineError> {
            Ok(batch
                .jobs
                .iter()
                .map(|job| PredictionResult {
                    name: job.name.clone(),
                    model_paths: Vec::new(),
                })
                .collect())
        }

        fn postprocess(
            &self,
            _result: &PredictionResult,
            _output_dir: &Path,
            _zip_pickles: bool,
            _remove_pickles: bool,
        ) -> Result<(), EngineError> {
            Ok(())
        }
    }

    fn row(name: &str, cluster: usize, seq_length: usize) -> ClusteredJob {
        ClusteredJob {
            name: name.to_string(),
            msa_depth: 10,
            seq_length,
            cluster,
            max_msa_depth: 10,
            max_seq_length: seq_length,
        }
    }

    #[test]
    fn active_backend_before_selection_is_a_configuration_error() {
        let registry = BackendRegistry::new();
        let err = registry.active().err().unwrap();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn selecting_an_unknown_backend_fails_by_name() {
        let mut registry = BackendRegistry::new();
        let err = registry.select("alphafold").unwrap_err();
        assert!(err.to_string().contains("alphafold"));
    }

    #[test]
    fn selection_replaces_the_active_instance() {
        let mut registry = BackendRegistry::new();
        registry.register("echo-a", Box::new(|| Box::new(EchoBackend { label: "a" })));
        registry.register("echo-b", Box::new(|| Box::new(EchoBackend { label: "b" })));

        registry.select("echo-a").unwrap();
        assert_eq!(registry.active().unwrap().name(), "a");

        registry.select("echo-b").unwrap();
        assert_eq!(registry.active().unwrap().name(), "b");
    }

    #[test]
    fn batches_group_rows_by_cluster_in_bin_order() {
        let rows = [
            row("C", 1, 300),
            row("A", 0, 100),
            row("B", 0, 120),
            row("D", 1, 310),
        ];
        let batches = batches_from_rows(&rows);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].cluster, 0);
        assert_eq!(
            batches[0].jobs.iter().map(|j| j.name.as_str()).collect::<Vec<_>>(),
            ["A", "B"]
        );
        assert_eq!(batches[1].max_seq_length, 310);
    }

    #[test]
    fn predict_returns_one_result_per_batch_member() {
        let mut registry = BackendRegistry::new();
        registry.register("echo", Box::new(|| Box::new(EchoBackend { label: "echo" })));
        registry.select("echo").unwrap();

        let batches = batches_from_rows(&[row("A", 0, 100), row("B", 0, 110)]);
        let results = registry
            .active()
            .unwrap()
            .predict(&batches[0], &PredictConfig::default())
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "A");
    }
}

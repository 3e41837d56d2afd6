use crate::core::store::{DEFAULT_JOB_DELIMITER, SpecFormat};
use thiserror::Error;

/// Default bin width, in residues, used when clustering jobs by length.
pub const DEFAULT_BIN_SIZE: usize = 150;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {parameter}: {message}")]
    InvalidParameter {
        parameter: &'static str,
        message: String,
    },
}

/// Settings for the clustering workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Bin width in residues. Trades batch homogeneity against the number
    /// of distinct batches.
    pub bin_size: usize,
    pub job_delimiter: char,
    pub format: SpecFormat,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            bin_size: DEFAULT_BIN_SIZE,
            job_delimiter: DEFAULT_JOB_DELIMITER,
            format: SpecFormat::Abriss,
        }
    }
}

#[derive(Default)]
pub struct ClusterConfigBuilder {
    bin_size: Option<usize>,
    job_delimiter: Option<char>,
    format: Option<SpecFormat>,
}

impl ClusterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bin_size(mut self, bin_size: usize) -> Self {
        self.bin_size = Some(bin_size);
        self
    }
    pub fn job_delimiter(mut self, delimiter: char) -> Self {
        self.job_delimiter = Some(delimiter);
        self
    }
    pub fn format(mut self, format: SpecFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn build(self) -> Result<ClusterConfig, ConfigError> {
        let defaults = ClusterConfig::default();
        let bin_size = self.bin_size.unwrap_or(defaults.bin_size);
        if bin_size == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "bin_size",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(ClusterConfig {
            bin_size,
            job_delimiter: self.job_delimiter.unwrap_or(defaults.job_delimiter),
            format: self.format.unwrap_or(defaults.format),
        })
    }
}

/// Relaxation applied to predicted models during inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelaxMode {
    /// No relaxation.
    None,
    /// Relax only the best-ranked model.
    #[default]
    Best,
    /// Relax every predicted model.
    All,
}

/// Inference settings handed to a backend's `predict` call.
///
/// Backends must accept [`PredictConfig::default`] when the caller supplies
/// nothing more specific.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictConfig {
    pub num_recycles: usize,
    pub relaxation: RelaxMode,
    pub random_seed: Option<u64>,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            num_recycles: 3,
            relaxation: RelaxMode::default(),
            random_seed: None,
        }
    }
}

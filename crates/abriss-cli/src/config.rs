use crate::cli::ClusterArgs;
use crate::error::{CliError, Result};
use abriss::core::store::SpecFormat;
use abriss::engine::config::{ClusterConfig, ClusterConfigBuilder};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Clustering options as they may appear in a TOML configuration file.
/// Every field is optional; CLI arguments override file values, and built-in
/// defaults fill whatever remains unset.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct FileClusterConfig {
    bin_size: Option<usize>,
    delimiter: Option<char>,
    format: Option<String>,
}

impl FileClusterConfig {
    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        debug!("Loaded cluster configuration from {:?}: {:?}", path, config);
        Ok(config)
    }
}

pub fn build_cluster_config(args: &ClusterArgs) -> Result<ClusterConfig> {
    let file_config = match &args.config {
        Some(path) => FileClusterConfig::from_file(path)?,
        None => FileClusterConfig::default(),
    };

    let format = match args.format.as_deref().or(file_config.format.as_deref()) {
        Some(name) => SpecFormat::from_str(name).map_err(|e| CliError::Config(e.to_string()))?,
        None => SpecFormat::default(),
    };

    let mut builder = ClusterConfigBuilder::new().format(format);
    if let Some(bin_size) = args.bin_size.or(file_config.bin_size) {
        builder = builder.bin_size(bin_size);
    }
    if let Some(delimiter) = args.delimiter.or(file_config.delimiter) {
        builder = builder.job_delimiter(delimiter);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

use crate::cli::ClusterArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use abriss::engine::progress::ProgressReporter;
use abriss::engine::resolver::TableResolver;
use abriss::workflows;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use tracing::info;

pub fn run(args: ClusterArgs) -> Result<()> {
    let cluster_config = config::build_cluster_config(&args)?;

    let folds = load_folds(&args)?;
    if folds.is_empty() {
        return Err(CliError::Config(
            "no fold specifications were supplied; use --folds or --folds-file".to_string(),
        ));
    }

    info!("Loading feature table from {:?}...", &args.features);
    let resolver = TableResolver::from_path(&args.features)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core cluster workflow...");
    let rows = workflows::cluster::run(&folds, &resolver, &cluster_config, &reporter)?;

    let mut writer = BufWriter::new(File::create(&args.output)?);
    workflows::cluster::write_rows(&rows, &mut writer)?;

    let bin_count = rows.iter().map(|r| r.cluster).max().map_or(0, |c| c + 1);
    println!(
        "✓ Clustered {} job(s) into {} bin(s); table written to {}",
        rows.len(),
        bin_count,
        args.output.display()
    );

    Ok(())
}

fn load_folds(args: &ClusterArgs) -> Result<Vec<String>> {
    if let Some(path) = &args.folds_file {
        let reader = BufReader::new(File::open(path)?);
        let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
        Ok(lines)
    } else {
        Ok(args.folds.clone())
    }
}

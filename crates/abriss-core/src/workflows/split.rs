use crate::core::io::fasta::{self, FastaReader};
use crate::core::models::FastaEntry;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Splits a multi-sequence FASTA file into one `<identifier>.fasta` file per
/// entry under `output_dir`, re-wrapping sequences at 60 characters.
///
/// Two entries sharing one identifier would map to the same output path, so
/// duplicates are rejected before any file is written.
///
/// Writes are fanned out over the rayon thread pool purely for I/O
/// throughput; each worker writes a distinct path, so no locking is needed
/// beyond waiting for the pool to drain. If any write fails, the first
/// failure is surfaced after the remaining workers finish; files already on
/// disk are kept, not rolled back.
///
/// When `output_list` is given, the paths of all written files are also
/// recorded there, newline-delimited, in input order. The written paths are
/// returned in input order as well.
#[instrument(skip_all, name = "split_workflow")]
pub fn run(
    fasta_path: &Path,
    output_dir: &Path,
    output_list: Option<&Path>,
    reporter: &ProgressReporter,
) -> Result<Vec<PathBuf>, EngineError> {
    fs::create_dir_all(output_dir)?;

    reporter.report(Progress::PhaseStart {
        name: "Reading sequences",
    });
    info!("Reading sequences from {:?}.", fasta_path);
    let entries = FastaReader::from_path(fasta_path)?.collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    for entry in &entries {
        if !seen.insert(entry.identifier.as_str()) {
            return Err(EngineError::DuplicateIdentifier {
                identifier: entry.identifier.clone(),
            });
        }
    }
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Writing sequence files",
    });
    reporter.report(Progress::TaskStart {
        total_items: entries.len() as u64,
    });

    let paths = entries
        .par_iter()
        .map(|entry| {
            let path = write_split_entry(entry, output_dir)?;
            reporter.report(Progress::ItemDone);
            Ok(path)
        })
        .collect::<Result<Vec<PathBuf>, EngineError>>()?;

    reporter.report(Progress::TaskFinish);

    if let Some(list_path) = output_list {
        write_path_list(&paths, list_path)?;
        info!("List of file paths written to {:?}.", list_path);
    }

    info!(
        "Split {} sequences from {:?} into {:?}.",
        paths.len(),
        fasta_path,
        output_dir
    );
    reporter.report(Progress::PhaseFinish);
    Ok(paths)
}

fn write_split_entry(entry: &FastaEntry, output_dir: &Path) -> Result<PathBuf, EngineError> {
    let path = output_dir.join(format!("{}.fasta", entry.identifier));
    let mut writer = BufWriter::new(File::create(&path)?);
    fasta::write_entry(entry, &mut writer)?;
    writer.flush()?;
    Ok(path)
}

fn write_path_list(paths: &[PathBuf], list_path: &Path) -> Result<(), EngineError> {
    let mut writer = BufWriter::new(File::create(list_path)?);
    for path in paths {
        writeln!(writer, "{}", path.display())?;
    }
    writer.flush()?;
    Ok(())
}

use crate::cli::SplitArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use abriss::engine::progress::ProgressReporter;
use abriss::workflows;
use tracing::info;

pub fn run(args: SplitArgs) -> Result<()> {
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core split workflow...");
    let paths = workflows::split::run(
        &args.fasta_file,
        &args.output_dir,
        args.output_list.as_deref(),
        &reporter,
    )?;

    println!(
        "✓ Split {} sequence(s) from {} into {}",
        paths.len(),
        args.fasta_file.display(),
        args.output_dir.display()
    );
    if let Some(list_path) = &args.output_list {
        println!("  File path list written to {}", list_path.display());
    }

    Ok(())
}

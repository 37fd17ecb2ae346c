use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use lindex_index::{IndexOptions, IndexPipeline, Manifest};

mod logging;

#[derive(Parser)]
#[command(name = "lindex")]
#[command(about = "Builds a per-letter inverted word index from a list of text files")]
#[command(version)]
struct Cli {
    /// Number of mapper threads
    #[arg(value_parser = clap::value_parser!(u32).range(1..), allow_negative_numbers = true)]
    num_mappers: u32,

    /// Number of reducer threads; the alphabet is split among them
    #[arg(value_parser = clap::value_parser!(u32).range(1..), allow_negative_numbers = true)]
    num_reducers: u32,

    /// Manifest file: a file count followed by that many file paths
    input_manifest: PathBuf,

    /// Directory receiving the <letter>.txt files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Log progress at info level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are reported as errors on stdout.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logging::init_logger(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let options = IndexOptions::new()
        .with_num_mappers(cli.num_mappers as usize)
        .with_num_reducers(cli.num_reducers as usize)
        .with_output_dir(&cli.output_dir);
    let pipeline = IndexPipeline::new(options).context("Invalid arguments")?;

    let manifest = Manifest::from_path(&cli.input_manifest).with_context(|| {
        format!(
            "Failed to load manifest {}",
            cli.input_manifest.display()
        )
    })?;
    log::info!(
        "manifest {} lists {} files",
        manifest.source().display(),
        manifest.len()
    );

    let summary = pipeline.run(manifest).context("Indexing failed")?;

    if summary.mapping.files_skipped > 0 {
        log::warn!(
            "{} of {} input files could not be read",
            summary.mapping.files_skipped,
            summary.documents
        );
    }
    if summary.reducing.letters_skipped > 0 {
        log::warn!(
            "{} letter files could not be written",
            summary.reducing.letters_skipped
        );
    }
    println!(
        "Indexing completed: {} files indexed, {} letter files written to {}",
        summary.mapping.files_indexed,
        summary.reducing.files_written,
        cli.output_dir.display()
    );
    Ok(())
}

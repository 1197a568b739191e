use crate::analysis::run_analysis;
use crate::cli::OutputFormat;
use crate::commands::{effective_format, open_output, prepare_input};
use crate::errors::Result;
use crate::io::output::write_report;
use std::path::PathBuf;

pub struct AnalyzeConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub no_parallel: bool,
}

pub fn run(config: AnalyzeConfig) -> Result<()> {
    if let Some(jobs) = config.jobs {
        configure_thread_pool(jobs);
    }

    let (input, io_warnings) =
        prepare_input(&config.path, config.manifest.as_deref(), !config.no_parallel)?;
    let mut report = run_analysis(&input);
    report.warnings.extend(io_warnings);
    report.warnings.sort();

    let format = effective_format(config.format, config.output.as_deref());
    let writer = open_output(config.output.as_deref())?;
    write_report(writer, format.into(), &report)?;

    if let Some(path) = &config.output {
        log::info!("report written to {}", path.display());
    }
    Ok(())
}

fn configure_thread_pool(jobs: usize) {
    // Fails when a global pool already exists, which only happens when the
    // process configured one earlier; the existing pool is kept.
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
    {
        log::warn!("could not configure {jobs} worker threads: {e}");
    }
}

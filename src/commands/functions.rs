use crate::analysis::run_analysis;
use crate::cli::OutputFormat;
use crate::commands::{effective_format, open_output, prepare_input};
use crate::errors::Result;
use crate::io::output::write_functions;
use std::path::PathBuf;

pub struct FunctionsConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

pub fn run(config: FunctionsConfig) -> Result<()> {
    let (input, _) = prepare_input(&config.path, None, true)?;
    let report = run_analysis(&input);

    let format = effective_format(config.format, config.output.as_deref());
    let writer = open_output(config.output.as_deref())?;
    write_functions(writer, format.into(), &report)?;
    Ok(())
}

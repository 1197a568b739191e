use anyhow::Result;
use clap::Parser;
use testmap::cli::{Cli, Commands};
use testmap::commands::{analyze, functions};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
            manifest,
            jobs,
            no_parallel,
        } => analyze::run(analyze::AnalyzeConfig {
            path,
            format,
            output,
            manifest,
            jobs,
            no_parallel,
        })?,
        Commands::Functions {
            path,
            format,
            output,
        } => functions::run(functions::FunctionsConfig {
            path,
            format,
            output,
        })?,
    }
    Ok(())
}

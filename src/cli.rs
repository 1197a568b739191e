use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Canonical JSON report
    Json,
    /// Markdown report grouped by priority tier
    Markdown,
    /// Colored terminal summary
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json,
            OutputFormat::Markdown => Self::Markdown,
            OutputFormat::Terminal => Self::Terminal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "testmap")]
#[command(about = "C++ codebase analyzer that decides what to test first", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full analysis: project, modules, key functions, dependency graph
    Analyze {
        /// Project root to analyze
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON dependency manifest (overrides testmap.toml)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Number of worker threads (defaults to available cores)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Scan files sequentially
        #[arg(long = "no-parallel")]
        no_parallel: bool,
    },

    /// Key functions only, grouped by test priority
    Functions {
        /// Project root to analyze
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

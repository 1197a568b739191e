pub mod analyze;
pub mod functions;

use crate::analysis::AnalysisInput;
use crate::cli::OutputFormat;
use crate::config::TestmapConfig;
use crate::errors::{Result, TestmapError};
use crate::extract::build_config::parse_manifest;
use crate::io::walker::{read_files, FileWalker};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Load configuration, discover project files, and read them into an
/// [`AnalysisInput`]. Unreadable files become warnings carried by the input's
/// sources; a missing manifest is an error since it was named explicitly.
pub fn prepare_input(
    path: &Path,
    manifest_override: Option<&Path>,
    parallel: bool,
) -> Result<(AnalysisInput, Vec<String>)> {
    if !path.is_dir() {
        return Err(TestmapError::file_system("not a directory", path));
    }

    let config = TestmapConfig::load(path)?;
    let files = FileWalker::new(path, &config).walk()?;

    let (build_files, mut warnings) = read_files(&files.build_files);
    let (sources, source_warnings) = read_files(&files.sources);
    warnings.extend(source_warnings);

    let manifest_path: Option<PathBuf> = manifest_override
        .map(Path::to_path_buf)
        .or_else(|| config.manifest.as_ref().map(|rel| path.join(rel)));
    let manifest = match manifest_path {
        Some(manifest_path) => {
            let text = std::fs::read_to_string(&manifest_path).map_err(|e| {
                TestmapError::manifest(&manifest_path, format!("cannot read: {e}"))
            })?;
            Some(parse_manifest(&text).map_err(|e| {
                TestmapError::manifest(&manifest_path, format!("invalid JSON: {e}"))
            })?)
        }
        None => None,
    };

    let fallback_name = path
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "project".to_string());

    Ok((
        AnalysisInput {
            build_files,
            sources,
            manifest,
            fallback_name,
            parallel,
        },
        warnings,
    ))
}

/// Open the output destination: a file when given, stdout otherwise.
pub fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| TestmapError::Output(format!("{}: {e}", path.display())))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(std::io::stdout())),
    }
}

/// Pick JSON automatically when writing a `.json` file with the default
/// terminal format.
pub fn effective_format(format: OutputFormat, output: Option<&Path>) -> OutputFormat {
    if format == OutputFormat::Terminal
        && output
            .and_then(|p| p.extension())
            .is_some_and(|ext| ext == "json")
    {
        OutputFormat::Json
    } else {
        format
    }
}

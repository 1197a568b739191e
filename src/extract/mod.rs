pub mod build_config;
pub mod headers;

pub use build_config::{extract_project, parse_manifest, BuildExtraction};
pub use headers::{scan_file, FileScan, UsageRef};

/// Binary or truncated content that cannot be tokenized at all. Such a file
/// contributes nothing beyond a warning.
pub(crate) fn looks_malformed(text: &str) -> bool {
    text.contains('\0')
}

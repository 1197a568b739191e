use crate::core::TestPriority;
use crate::report::{AnalysisReport, KeyFunctionEntry};
use colored::*;
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_modules(report)?;
        self.write_function_tiers(report)?;
        self.write_cycles(report)?;
        self.write_warnings(report)?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Test Priority Report: {}", report.project.name)?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(
            self.writer,
            "Project type: {} | C++ standard: {}",
            report.project.kind,
            if report.project.cpp_standard.is_empty() {
                "unknown"
            } else {
                &report.project.cpp_standard
            }
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_modules(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Modules ({})", report.modules.len())?;
        writeln!(self.writer)?;
        for module in &report.modules {
            let deps = if module.dependencies.is_empty() {
                String::new()
            } else {
                format!(" (uses: {})", module.dependencies.join(", "))
            };
            writeln!(
                self.writer,
                "- **{}** - {} header(s){deps}",
                module.name,
                module.headers.len()
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_function_tiers(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "## Key Functions ({})",
            report.key_functions.len()
        )?;
        writeln!(self.writer)?;
        for tier in [
            TestPriority::P0,
            TestPriority::P1,
            TestPriority::P2,
            TestPriority::P3,
        ] {
            let in_tier: Vec<&KeyFunctionEntry> = report
                .key_functions
                .iter()
                .filter(|f| f.priority == tier)
                .collect();
            if in_tier.is_empty() {
                continue;
            }
            writeln!(
                self.writer,
                "### {tier}: {} ({} functions)",
                tier.label(),
                in_tier.len()
            )?;
            writeln!(self.writer)?;
            for func in in_tier {
                writeln!(
                    self.writer,
                    "- `{}` - {}:{} [{}]",
                    func.signature, func.file, func.line, func.category
                )?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_cycles(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        if report.cycles.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Dependency Cycles ({})", report.cycles.len())?;
        writeln!(self.writer)?;
        for cycle in &report.cycles {
            writeln!(self.writer, "- {}", cycle.join(" -> "))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_warnings(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        if report.warnings.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Warnings ({})", report.warnings.len())?;
        writeln!(self.writer)?;
        for warning in &report.warnings {
            writeln!(self.writer, "- {warning}")?;
        }
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

fn priority_colored(priority: TestPriority) -> ColoredString {
    let text = priority.to_string();
    match priority {
        TestPriority::P0 => text.red().bold(),
        TestPriority::P1 => text.yellow(),
        TestPriority::P2 => text.cyan(),
        TestPriority::P3 => text.normal(),
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{}",
            format!("Test Priority Report: {}", report.project.name)
                .bold()
                .blue()
        )?;
        writeln!(
            self.writer,
            "  {} modules, {} key functions, {} edges",
            report.modules.len(),
            report.key_functions.len(),
            report.dependency_edges.len()
        )?;
        writeln!(self.writer)?;

        for func in &report.key_functions {
            writeln!(
                self.writer,
                "  [{}] {} - {}:{}",
                priority_colored(func.priority),
                func.name.bold(),
                func.file,
                func.line
            )?;
        }

        if !report.cycles.is_empty() {
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "{}",
                format!("Dependency cycles ({}):", report.cycles.len()).red()
            )?;
            for cycle in &report.cycles {
                writeln!(self.writer, "  {}", cycle.join(" -> "))?;
            }
        }

        if !report.warnings.is_empty() {
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "{}",
                format!("Warnings ({}):", report.warnings.len()).yellow()
            )?;
            for warning in &report.warnings {
                writeln!(self.writer, "  {warning}")?;
            }
        }
        Ok(())
    }
}

/// Write only the key-function tiers of a report, for the `functions`
/// subcommand. JSON output is the bare `key_functions` array.
pub fn write_functions<W: Write>(
    mut writer: W,
    format: OutputFormat,
    report: &AnalysisReport,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report.key_functions)?;
            writer.write_all(json.as_bytes())?;
            writeln!(writer)?;
        }
        OutputFormat::Markdown => {
            let mut md = MarkdownWriter::new(writer);
            md.write_function_tiers(report)?;
        }
        OutputFormat::Terminal => {
            for func in &report.key_functions {
                writeln!(
                    writer,
                    "  [{}] {} - {}:{}",
                    priority_colored(func.priority),
                    func.name.bold(),
                    func.file,
                    func.line
                )?;
            }
        }
    }
    Ok(())
}

/// Write a report to `writer` in the requested format.
pub fn write_report<W: Write>(
    writer: W,
    format: OutputFormat,
    report: &AnalysisReport,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => JsonWriter::new(writer).write_report(report),
        OutputFormat::Markdown => MarkdownWriter::new(writer).write_report(report),
        OutputFormat::Terminal => TerminalWriter::new(writer).write_report(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{run_analysis, AnalysisInput};
    use std::path::PathBuf;

    fn sample_report() -> AnalysisReport {
        let input = AnalysisInput {
            build_files: vec![(
                PathBuf::from("CMakeLists.txt"),
                "project(demo)\nset(CMAKE_CXX_STANDARD 20)\n".to_string(),
            )],
            sources: vec![(
                PathBuf::from("include/demo/codec.hpp"),
                "namespace demo {\nbool parse(const uint8_t* data, size_t len);\n}\n".to_string(),
            )],
            manifest: None,
            fallback_name: "demo".to_string(),
            parallel: false,
        };
        run_analysis(&input)
    }

    #[test]
    fn json_output_is_parseable_and_canonical() {
        let report = sample_report();
        let mut buf = Vec::new();
        write_report(&mut buf, OutputFormat::Json, &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["project"]["name"], "demo");
        assert_eq!(value["key_functions"][0]["priority"], "P0");
    }

    #[test]
    fn markdown_groups_by_tier_with_totals() {
        let report = sample_report();
        let mut buf = Vec::new();
        write_report(&mut buf, OutputFormat::Markdown, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("# Test Priority Report: demo"));
        assert!(text.contains("### P0: Parsing & Encoding (highest priority) (1 functions)"));
        assert!(text.contains("## Modules (1)"));
    }

    #[test]
    fn terminal_output_lists_functions() {
        colored::control::set_override(false);
        let report = sample_report();
        let mut buf = Vec::new();
        write_report(&mut buf, OutputFormat::Terminal, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("[P0] demo::parse"));
    }
}

//! Command-line shell around `analyze`
//!
//! Argument model, file collection and output formatting. The binary in
//! `main.rs` only wires these together.

use clap::{Parser, ValueEnum};
use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::engine::analyze;
use crate::verdict::ComplexityVerdict;
use crate::{BigoError, Result};

/// Label used for snippets read from standard input
pub const STDIN_PATH: &str = "<stdin>";

/// bigo - heuristic Big-O estimates for source snippets
#[derive(Parser, Debug)]
#[command(name = "bigo")]
#[command(about = "Estimate time and space complexity of source code from its text")]
#[command(version)]
pub struct Cli {
  /// Files or directories to analyze (`-` or nothing reads stdin)
  pub paths: Vec<String>,

  /// Output format (overrides the config file)
  #[arg(short, long)]
  pub format: Option<OutputFormat>,

  /// Shorthand for --format json
  #[arg(long)]
  pub json: bool,

  /// Shorthand for --format compact
  #[arg(long)]
  pub compact: bool,

  /// Show the signals behind each verdict in pretty output
  #[arg(short, long)]
  pub diagnostics: bool,

  /// Configuration file path
  #[arg(short, long)]
  pub config: Option<String>,

  /// Log each analysis stage to stderr
  #[arg(short, long)]
  pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  #[default]
  Pretty,
  Json,
  Compact,
}

impl Cli {
  /// Flags win over `--format`, which wins over the config file.
  pub fn resolve_format(&self, config: &Config) -> OutputFormat {
    if self.json {
      OutputFormat::Json
    } else if self.compact {
      OutputFormat::Compact
    } else {
      self.format.unwrap_or(config.output.format)
    }
  }

  pub fn show_diagnostics(&self, config: &Config) -> bool {
    self.diagnostics || config.output.diagnostics
  }

  pub fn reads_stdin(&self) -> bool {
    self.paths.is_empty() || self.paths.iter().any(|p| p == "-")
  }
}

/// One analyzed input and its verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
  pub path: String,
  #[serde(flatten)]
  pub verdict: ComplexityVerdict,
}

impl FileReport {
  pub fn new(path: impl Into<String>, verdict: ComplexityVerdict) -> Self {
    Self { path: path.into(), verdict }
  }
}

// A directory is pruned when a file directly inside it would be ignored.
const DIR_PROBE: &str = "_";

/// Expand the given paths into a sorted list of files.
///
/// Files named explicitly are always kept. Files found by walking a
/// directory must carry a configured extension and miss every ignore glob.
pub fn collect_files(paths: &[String], config: &Config) -> Result<Vec<PathBuf>> {
  let ignore = config.ignore_set()?;
  let mut files = Vec::new();

  for raw in paths.iter().filter(|p| p.as_str() != "-") {
    let path = Path::new(raw);
    if !path.exists() {
      return Err(BigoError::path_not_found(raw));
    }

    if path.is_file() {
      files.push(path.to_path_buf());
      continue;
    }

    let walker = WalkDir::new(path).sort_by_file_name().into_iter().filter_entry(|entry| {
      let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
      let ignored = if entry.file_type().is_dir() {
        entry.depth() > 0 && ignore.is_match(relative.join(DIR_PROBE))
      } else {
        ignore.is_match(relative)
      };
      if ignored {
        debug!(path = %entry.path().display(), "ignored by config");
      }
      !ignored
    });

    for entry in walker.filter_map(|e| e.ok()) {
      if entry.file_type().is_file() && config.is_supported_extension(entry.path()) {
        files.push(entry.path().to_path_buf());
      }
    }
  }

  Ok(files)
}

/// Analyze each file, skipping the ones over the configured size limit.
pub fn process_files(files: &[PathBuf], config: &Config) -> Result<Vec<FileReport>> {
  let mut reports = Vec::with_capacity(files.len());

  for path in files {
    let size = fs::metadata(path)?.len();
    if size > config.max_file_bytes {
      warn!(path = %path.display(), size, limit = config.max_file_bytes, "skipping large file");
      continue;
    }

    let bytes = fs::read(path)?;
    let source = String::from_utf8_lossy(&bytes);
    reports.push(FileReport::new(path.display().to_string(), analyze(&source)));
  }

  Ok(reports)
}

pub fn analyze_stdin(source: &str) -> FileReport {
  FileReport::new(STDIN_PATH, analyze(source))
}

pub fn format_reports(reports: &[FileReport], format: OutputFormat, diagnostics: bool) -> String {
  match format {
    OutputFormat::Pretty => format_pretty(reports, diagnostics),
    OutputFormat::Json => format_json(reports),
    OutputFormat::Compact => format_compact(reports),
  }
}

fn banner_line(length: usize, ch: char) -> String {
  ch.to_string().repeat(length)
}

fn format_prefix(color: Color, prefix: &str) -> String {
  format!("[{}]{:<width$}", prefix.color(color).bold(), "", width = 7usize.saturating_sub(prefix.len() + 2))
}

fn format_pretty(reports: &[FileReport], diagnostics: bool) -> String {
  if reports.is_empty() {
    return format!("{}\n", "No files to analyze.".bright_yellow());
  }

  let mut output = String::new();
  let banner = banner_line(50, '=');

  for report in reports {
    let verdict = &report.verdict;
    output.push_str(&format!("{}\n", banner.bright_black()));
    output.push_str(&format!("{}\n", report.path.bright_white().bold()));
    output.push_str(&format!("{}\n", banner.bright_black()));
    output.push_str(&format!(
      "{} {}  {}\n",
      format_prefix(Color::Magenta, "time"),
      verdict.time.bright_cyan().bold(),
      verdict.time_explanation
    ));
    output.push_str(&format!(
      "{} {}  {}\n",
      format_prefix(Color::Blue, "space"),
      verdict.space.bright_cyan().bold(),
      verdict.space_explanation
    ));

    if diagnostics {
      output.push_str(&format_diagnostics(verdict));
    }
    output.push('\n');
  }

  output
}

fn format_diagnostics(verdict: &ComplexityVerdict) -> String {
  let diag = &verdict.diagnostics;
  let prefix = format_prefix(Color::Cyan, "diag");
  let mut lines = vec![format!("rule: {}", diag.rule)];

  if !diag.known_patterns.is_empty() {
    let names: Vec<&str> = diag.known_patterns.iter().map(|m| m.name.as_str()).collect();
    lines.push(format!("known patterns: {}", names.join(", ")));
  }

  let loops = &diag.loops;
  if loops.loop_count > 0 {
    lines.push(format!(
      "loops: {} (max depth {}, max linear per depth {}, logarithmic: {}, same-array nesting: {})",
      loops.loop_count, loops.max_depth, loops.max_nested_linear, loops.has_logarithmic, loops.nested_same_array
    ));
  }

  if diag.recursion.has_recursion {
    let calls: Vec<String> =
      diag.recursion.functions.iter().map(|f| format!("{} x{}", f.name, f.self_calls)).collect();
    lines.push(format!("recursion: {}", calls.join(", ")));
  }

  lines.iter().map(|line| format!("{prefix} {}\n", line.dimmed())).collect()
}

fn format_json(reports: &[FileReport]) -> String {
  serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".to_string())
}

fn format_compact(reports: &[FileReport]) -> String {
  reports
    .iter()
    .map(|r| format!("{}: time {} | space {}", r.path, r.verdict.time, r.verdict.space))
    .collect::<Vec<_>>()
    .join("\n")
}

//! Configuration management for bigo
//!
//! Controls how the command-line shell finds files and presents verdicts.
//! Nothing here changes what `analyze` returns for a given snippet.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::{BigoError, Result};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub output: OutputSettings,
  /// Files to skip while walking directories (glob patterns)
  #[serde(default = "default_ignore")]
  pub ignore: Vec<String>,
  /// File extensions picked up while walking directories
  #[serde(default = "default_extensions")]
  pub extensions: Vec<String>,
  /// Files larger than this are skipped
  #[serde(default = "default_max_file_bytes")]
  pub max_file_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
  #[serde(default)]
  pub format: OutputFormat,
  /// Print loop and recursion findings under each verdict
  #[serde(default)]
  pub diagnostics: bool,
}

fn default_ignore() -> Vec<String> {
  ["**/target/**", "**/node_modules/**", "**/.git/**", "**/build/**", "**/dist/**"]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_extensions() -> Vec<String> {
  [
    "c", "cc", "cpp", "cs", "go", "h", "hpp", "java", "js", "jsx", "kt", "php", "py", "rb", "rs",
    "scala", "swift", "ts", "tsx",
  ]
  .iter()
  .map(|s| s.to_string())
  .collect()
}

fn default_max_file_bytes() -> u64 {
  1024 * 1024
}

impl Default for OutputSettings {
  fn default() -> Self {
    Self { format: OutputFormat::default(), diagnostics: false }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      output: OutputSettings::default(),
      ignore: default_ignore(),
      extensions: default_extensions(),
      max_file_bytes: default_max_file_bytes(),
    }
  }
}

impl Config {
  /// Load configuration from a file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
  }

  /// Load configuration from the working directory, then the user config
  /// directory, falling back to defaults
  pub fn load() -> Result<Self> {
    let local = [".bigo.json", "bigo.json", ".bigo/config.json"];

    for path in &local {
      if Path::new(path).exists() {
        return Self::load_from_file(path);
      }
    }

    if let Some(path) = user_config_path() {
      if path.exists() {
        return Self::load_from_file(path);
      }
    }

    Ok(Config::default())
  }

  /// Save configuration to a file
  pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
    let content = serde_json::to_string_pretty(self)?;
    std::fs::write(path, content)?;
    Ok(())
  }

  pub fn validate(&self) -> Result<()> {
    if self.extensions.iter().any(|ext| ext.is_empty() || ext.starts_with('.')) {
      return Err(BigoError::invalid_config("extensions are written without a leading dot"));
    }
    if self.max_file_bytes == 0 {
      return Err(BigoError::invalid_config("max_file_bytes must be greater than zero"));
    }
    self.ignore_set().map(|_| ())
  }

  /// Compile the ignore patterns
  pub fn ignore_set(&self) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in &self.ignore {
      let glob = Glob::new(pattern).map_err(|e| BigoError::glob(pattern, e.to_string()))?;
      builder.add(glob);
    }
    builder.build().map_err(|e| BigoError::glob(self.ignore.join(", "), e.to_string()))
  }

  pub fn is_supported_extension(&self, path: &Path) -> bool {
    path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| self.extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
  }
}

/// `<config dir>/bigo/config.json`, when the platform has a config dir
pub fn user_config_path() -> Option<PathBuf> {
  dirs::config_dir().map(|dir| dir.join("bigo").join("config.json"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.output.format, OutputFormat::Pretty);
    assert!(!config.output.diagnostics);
    assert!(config.ignore.contains(&"**/target/**".to_string()));
    assert!(config.extensions.contains(&"py".to_string()));
    assert_eq!(config.max_file_bytes, 1024 * 1024);
  }

  #[test]
  fn test_config_load_nonexistent_file() {
    let result = Config::load_from_file(Path::new("nonexistent.json"));
    assert!(matches!(result, Err(BigoError::Io(_))));
  }

  #[test]
  fn test_config_load_partial_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bigo.json");
    fs::write(&config_path, r#"{ "output": { "format": "json" } }"#).unwrap();

    let config = Config::load_from_file(&config_path).unwrap();
    assert_eq!(config.output.format, OutputFormat::Json);
    assert!(!config.output.diagnostics);
    assert_eq!(config.ignore, default_ignore());
    assert_eq!(config.extensions, default_extensions());
  }

  #[test]
  fn test_config_load_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("invalid.json");
    fs::write(&config_path, "{ invalid json }").unwrap();

    assert!(matches!(Config::load_from_file(&config_path), Err(BigoError::Json(_))));
  }

  #[test]
  fn test_config_rejects_bad_glob() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bigo.json");
    fs::write(&config_path, r#"{ "ignore": ["src/[unclosed"] }"#).unwrap();

    assert!(matches!(Config::load_from_file(&config_path), Err(BigoError::Glob { .. })));
  }

  #[test]
  fn test_config_rejects_dotted_extensions() {
    let config = Config { extensions: vec![".rs".to_string()], ..Config::default() };
    assert!(matches!(config.validate(), Err(BigoError::InvalidConfig { .. })));

    let config = Config { max_file_bytes: 0, ..Config::default() };
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_config_load_and_save() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("saved.json");

    let original = Config {
      output: OutputSettings { format: OutputFormat::Compact, diagnostics: true },
      ignore: vec!["vendor/**".to_string()],
      extensions: vec!["go".to_string()],
      max_file_bytes: 2048,
    };
    original.save_to_file(&config_path).unwrap();

    let loaded = Config::load_from_file(&config_path).unwrap();
    assert_eq!(original, loaded);
  }

  #[test]
  fn test_ignore_set_matches_defaults() {
    let set = Config::default().ignore_set().unwrap();
    assert!(set.is_match("target/debug/main.rs"));
    assert!(set.is_match("node_modules/pkg/index.js"));
    assert!(set.is_match("pkg/node_modules/dep/index.js"));
    assert!(set.is_match("web/target/debug/gen.rs"));
    assert!(!set.is_match("src/main.rs"));
    assert!(!set.is_match("src/targets.rs"));
  }

  #[test]
  fn test_supported_extensions() {
    let config = Config::default();
    assert!(config.is_supported_extension(Path::new("a/b.rs")));
    assert!(config.is_supported_extension(Path::new("Main.JAVA")));
    assert!(!config.is_supported_extension(Path::new("README.md")));
    assert!(!config.is_supported_extension(Path::new("Makefile")));
  }
}

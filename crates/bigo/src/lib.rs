//! Heuristic Big-O estimation for source snippets
//!
//! Text in, verdict out. Comments and literals are stripped, the remainder is
//! checked against a catalog of textbook algorithms, and failing that the loop
//! and recursion structure is scraped with regular expressions and brace
//! counting. The result is a best-effort estimate, never a proof.

pub mod blocks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod loops;
pub mod patterns;
pub mod recursion;
pub mod sanitize;
pub mod verdict;

pub use cli::{Cli, OutputFormat};
pub use config::Config;
pub use engine::analyze;
pub use verdict::{ComplexityVerdict, Diagnostics};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BigoError {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Invalid glob pattern '{pattern}': {message}")]
  Glob { pattern: String, message: String },

  #[error("Invalid configuration: {message}")]
  InvalidConfig { message: String },

  #[error("Path does not exist: {path}")]
  PathNotFound { path: String },
}

impl BigoError {
  pub fn glob(pattern: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Glob { pattern: pattern.into(), message: message.into() }
  }

  pub fn invalid_config(message: impl Into<String>) -> Self {
    Self::InvalidConfig { message: message.into() }
  }

  pub fn path_not_found(path: impl Into<String>) -> Self {
    Self::PathNotFound { path: path.into() }
  }
}

pub type Result<T> = std::result::Result<T, BigoError>;

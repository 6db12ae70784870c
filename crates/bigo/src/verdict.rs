//! Analysis records and the verdict handed back to callers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A catalog hit: the textbook bounds for a recognised algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownAlgorithmMatch {
  pub name: String,
  pub time: String,
  pub space: String,
}

impl KnownAlgorithmMatch {
  pub fn new(name: impl Into<String>, time: impl Into<String>, space: impl Into<String>) -> Self {
    Self { name: name.into(), time: time.into(), space: space.into() }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoopKind {
  CountingFor,
  While,
  RangeFor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IterationClass {
  Linear,
  Logarithmic,
  Unknown,
}

/// One loop header found in the sanitized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopRecord {
  pub kind: LoopKind,
  pub header: String,
  pub offset: usize,
  pub depth: usize,
  pub iteration: IterationClass,
  /// Byte range of the extracted body, `None` when no body could be found.
  pub body: Option<(usize, usize)>,
  /// Collection named next to a length keyword in the header, e.g. `arr` in `arr.length`.
  pub collection: Option<String>,
}

/// Aggregate view over every loop in a snippet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopAnalysis {
  pub loops: Vec<LoopRecord>,
  pub loop_count: usize,
  pub max_depth: usize,
  /// Linear loops per brace depth.
  pub linear_by_depth: BTreeMap<usize, usize>,
  pub max_nested_linear: usize,
  pub has_logarithmic: bool,
  /// A logarithmic loop shares a body with a linear one.
  #[serde(default)]
  pub logarithmic_nested: bool,
  pub nested_same_array: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecursionRecord {
  pub name: String,
  pub self_calls: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecursionAnalysis {
  pub has_recursion: bool,
  pub functions: Vec<RecursionRecord>,
}

/// Raw findings kept alongside the verdict for display and debugging.
///
/// Not a stable contract; fields may grow as the heuristics do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
  /// Which decision rule produced the verdict.
  pub rule: String,
  pub known_patterns: Vec<KnownAlgorithmMatch>,
  pub loops: LoopAnalysis,
  pub recursion: RecursionAnalysis,
}

/// The single result of an analysis call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityVerdict {
  pub time: String,
  pub time_explanation: String,
  pub space: String,
  pub space_explanation: String,
  pub diagnostics: Diagnostics,
}

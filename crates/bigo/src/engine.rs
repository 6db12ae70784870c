//! Decision engine
//!
//! Combines the analyzer signals into one verdict. Precedence is fixed and the
//! first applicable rule wins: empty input, known algorithm, recursion, loop
//! structure, constant-time default.

use tracing::debug;

use crate::loops::analyze_loops;
use crate::patterns::detect_known_patterns;
use crate::recursion::analyze_recursion;
use crate::sanitize::strip_comments_and_strings;
use crate::verdict::{
  ComplexityVerdict, Diagnostics, KnownAlgorithmMatch, LoopAnalysis, RecursionAnalysis,
};

const CONTAINER_GROWTH: &str = "Output/container grows with input size.";
const STACK_GROWTH: &str = "Recursion stack depth grows linearly with the input.";

/// Estimate the time and space complexity of a source snippet.
///
/// Pure and infallible: the same text always yields the same verdict, and
/// malformed input only lowers the quality of the estimate.
pub fn analyze(source: &str) -> ComplexityVerdict {
  if source.trim().is_empty() {
    return verdict(
      ("O(1)", "Empty input: there is no code to run."),
      ("O(1)", "Empty input allocates nothing."),
      Diagnostics { rule: "empty".to_string(), ..Diagnostics::default() },
    );
  }

  let sanitized = strip_comments_and_strings(source);
  let known = detect_known_patterns(&sanitized.to_lowercase());
  let loops = analyze_loops(&sanitized);
  let recursion = analyze_recursion(&sanitized);

  let result = decide(known.unwrap_or_default(), loops, recursion);
  debug!(
    rule = %result.diagnostics.rule,
    time = %result.time,
    space = %result.space,
    "analysis complete"
  );
  result
}

fn decide(
  known: Vec<KnownAlgorithmMatch>,
  loops: LoopAnalysis,
  recursion: RecursionAnalysis,
) -> ComplexityVerdict {
  if let Some(primary) = known.first().cloned() {
    let also = if known.len() > 1 {
      let others: Vec<&str> = known[1..].iter().map(|m| m.name.as_str()).collect();
      format!(" Other patterns seen: {}.", others.join(", "))
    } else {
      String::new()
    };
    let time_explanation = format!("Detected {}; using its textbook time bound.{}", primary.name, also);
    let space_explanation = format!("Typical auxiliary space for {}.", primary.name);
    return verdict(
      (primary.time.as_str(), time_explanation.as_str()),
      (primary.space.as_str(), space_explanation.as_str()),
      diagnostics("known-pattern", known, loops, recursion),
    );
  }

  if recursion.has_recursion {
    return decide_recursive(loops, recursion);
  }

  if loops.loop_count > 0 {
    return decide_loops(loops, recursion);
  }

  verdict(
    ("O(1)", "No loops or recursion detected; the code runs a fixed number of steps."),
    ("O(1)", "No loops or recursion detected; memory use does not scale with input."),
    diagnostics("constant", Vec::new(), loops, recursion),
  )
}

fn decide_recursive(loops: LoopAnalysis, recursion: RecursionAnalysis) -> ComplexityVerdict {
  if let Some(branching) = recursion.functions.iter().find(|f| f.self_calls > 1) {
    let explanation = format!(
      "Function '{}' calls itself {} times per invocation: multiple recursive calls — likely exponential.",
      branching.name, branching.self_calls
    );
    return verdict(
      ("O(2^n) (possible exponential recursive branching)", explanation.as_str()),
      ("O(n)", STACK_GROWTH),
      diagnostics("recursion-branching", Vec::new(), loops, recursion),
    );
  }

  if loops.loop_count > 0 {
    return verdict(
      (
        "O(n log n) or O(n * (loop cost))",
        "Recursion combined with loops; the bound depends on how much work each loop does per call.",
      ),
      ("O(n + additional)", "Recursion stack plus whatever the loops allocate."),
      diagnostics("recursion-with-loops", Vec::new(), loops, recursion),
    );
  }

  verdict(
    ("O(n)", "Single recursive call per invocation: the recursion stack grows with the input."),
    ("O(n)", STACK_GROWTH),
    diagnostics("recursion-linear", Vec::new(), loops, recursion),
  )
}

fn decide_loops(loops: LoopAnalysis, recursion: RecursionAnalysis) -> ComplexityVerdict {
  let k = loops.max_nested_linear;

  let (rule, time, explanation) = if loops.has_logarithmic {
    if !loops.logarithmic_nested || k == 0 {
      (
        "logarithmic",
        "O(log n)".to_string(),
        "Loop variable is cut by divide-by-two each pass, so iterations are logarithmic.".to_string(),
      )
    } else {
      (
        "logarithmic-nested",
        format!("O({} log n)", power_of_n(k)),
        format!("{k} linear loop(s) combined with a divide-by-two (logarithmic) loop."),
      )
    }
  } else if loops.nested_same_array {
    (
      "nested-same-array",
      "O(n²)".to_string(),
      "Nested same-array double loop: both loops run over the length of the same collection.".to_string(),
    )
  } else if k >= 2 {
    (
      "nested-linear",
      format!("O({})", power_of_n(k)),
      format!("{k} linear loops at the same nesting level multiply the iteration count."),
    )
  } else if k == 1 {
    ("linear", "O(n)".to_string(), "Single linear loop over the input.".to_string())
  } else {
    (
      "unclassified-loop",
      "O(n)".to_string(),
      "Loops detected but their iteration pattern is unclear; assuming a single linear pass.".to_string(),
    )
  };

  verdict(
    (time.as_str(), explanation.as_str()),
    ("O(n)", CONTAINER_GROWTH),
    diagnostics(rule, Vec::new(), loops, recursion),
  )
}

/// `n`, `n²`, `n³`, then `n^k`.
fn power_of_n(k: usize) -> String {
  match k {
    0 | 1 => "n".to_string(),
    2 => "n²".to_string(),
    3 => "n³".to_string(),
    _ => format!("n^{k}"),
  }
}

fn diagnostics(
  rule: &str,
  known_patterns: Vec<KnownAlgorithmMatch>,
  loops: LoopAnalysis,
  recursion: RecursionAnalysis,
) -> Diagnostics {
  Diagnostics { rule: rule.to_string(), known_patterns, loops, recursion }
}

fn verdict(time: (&str, &str), space: (&str, &str), diagnostics: Diagnostics) -> ComplexityVerdict {
  ComplexityVerdict {
    time: time.0.to_string(),
    time_explanation: time.1.to_string(),
    space: space.0.to_string(),
    space_explanation: space.1.to_string(),
    diagnostics,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_and_whitespace() {
    for input in ["", "   ", "\n\t\n"] {
      let v = analyze(input);
      assert_eq!(v.time, "O(1)");
      assert_eq!(v.space, "O(1)");
      assert_eq!(v.diagnostics.rule, "empty");
    }
  }

  #[test]
  fn test_known_pattern_overrides_structure() {
    let code = "function dijkstra(g) { for (let i = 0; i < n; i++) { for (let j = 0; j < n; j++) {} } }";
    let v = analyze(code);
    assert_eq!(v.time, "O((V + E) log V)");
    assert_eq!(v.diagnostics.rule, "known-pattern");
    assert!(v.time_explanation.contains("Dijkstra"));
    assert_eq!(v.diagnostics.loops.loop_count, 2);
  }

  #[test]
  fn test_all_matches_kept_in_diagnostics() {
    let v = analyze("mergeSort(a); binarySearch(a, x);");
    assert_eq!(v.time, "O(n log n)");
    assert_eq!(v.diagnostics.known_patterns.len(), 2);
    assert!(v.time_explanation.contains("Binary Search"));
  }

  #[test]
  fn test_recursion_with_loops_is_a_hedge() {
    let code = "function walk(n) {\n  for (let i = 0; i < n; i++) { visit(i); }\n  walk(n - 1);\n}";
    let v = analyze(code);
    assert_eq!(v.time, "O(n log n) or O(n * (loop cost))");
    assert_eq!(v.space, "O(n + additional)");
  }

  #[test]
  fn test_logarithmic_with_linear_loop() {
    let code = "for (let i = 0; i < n; i++) {\n  let j = n;\n  while (j > 1) { j = j / 2; }\n}";
    let v = analyze(code);
    assert_eq!(v.time, "O(n log n)");
    assert_eq!(v.space, "O(n)");
  }

  #[test]
  fn test_logarithmic_beside_linear_loop() {
    let code = "for (let i = 0; i < n; i++) { a(i); }\nwhile (m > 1) { m = m / 2; }";
    let v = analyze(code);
    assert_eq!(v.time, "O(log n)");
    assert_eq!(v.diagnostics.rule, "logarithmic");
  }

  #[test]
  fn test_sequential_linear_loops_at_same_depth() {
    let code = "for (let i = 0; i < n; i++) { a(i); }\nfor (let j = 0; j < n; j++) { b(j); }\nfor (let k = 0; k < n; k++) { c(k); }";
    let v = analyze(code);
    assert_eq!(v.time, "O(n³)");
    assert_eq!(v.diagnostics.rule, "nested-linear");
  }

  #[test]
  fn test_unclassified_loop_falls_back_to_linear() {
    let v = analyze("while (running) { step(); }");
    assert_eq!(v.time, "O(n)");
    assert_eq!(v.diagnostics.rule, "unclassified-loop");
  }

  #[test]
  fn test_power_of_n() {
    assert_eq!(power_of_n(1), "n");
    assert_eq!(power_of_n(2), "n²");
    assert_eq!(power_of_n(3), "n³");
    assert_eq!(power_of_n(5), "n^5");
  }

  #[test]
  fn test_garbage_input_is_structurally_valid() {
    for input in ["}}}{{{", "\u{0}\u{1}\u{fffd}", "for (", "while", "def (", "/* open", "\"unterminated"] {
      let v = analyze(input);
      assert!(!v.time.is_empty());
      assert!(!v.space.is_empty());
      assert!(!v.time_explanation.is_empty());
    }
  }
}

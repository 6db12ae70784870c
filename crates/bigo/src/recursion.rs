//! Self-recursion detection
//!
//! Finds function declarations, pulls out each body with the same brace
//! matching the loop analyzer uses, and counts calls to the function's own
//! name inside it. No call graph: mutual recursion is not seen.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

use crate::blocks::{body_after, body_text, Span};
use crate::verdict::{RecursionAnalysis, RecursionRecord};

// `function f(`, `fn f(`, `func f(`, `func (r *T) f(`, `fun f(`
static KEYWORD_FN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\b(?:function|fn|func|fun)\b\s*\*?\s*(?:\([^)]*\)\s*)?([A-Za-z_]\w*)\s*(?:<[^>{}]*>)?\s*\(")
    .expect("valid regex literal")
});

// `def f(`
static DEF_FN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bdef\s+([A-Za-z_]\w*)\s*\(").expect("valid regex literal"));

// `int f(int n) {`, `static long f(long n) {`, `List<Integer> f(...) {`
static TYPED_FN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(concat!(
    r"\b(?:int|long|short|void|double|float|bool|boolean|char|string|String|auto|unsigned|size_t|",
    r"[A-Z]\w*(?:<[^<>;{}()]*>)?)(?:\[\])*\s*[*&]*\s+([A-Za-z_]\w*)\s*",
    r"\([^;{}()]*(?:\([^;{}()]*\)[^;{}()]*)*\)\s*(?:const\s*)?(?:throws\s+[\w.,\s]+)?\{",
  ))
  .expect("valid regex literal")
});

static CALL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\b([A-Za-z_]\w*)\s*\(").expect("valid regex literal"));

const CONTROL_WORDS: &[&str] = &["if", "for", "while", "switch", "catch", "return", "sizeof"];

struct Declaration {
  name: String,
  body: Option<Span>,
}

/// Find every declared function that calls itself.
pub fn analyze_recursion(text: &str) -> RecursionAnalysis {
  let functions: Vec<RecursionRecord> = find_declarations(text)
    .into_values()
    .filter_map(|decl| {
      let self_calls = count_self_calls(&decl.name, body_text(text, decl.body));
      (self_calls > 0).then_some(RecursionRecord { name: decl.name, self_calls })
    })
    .collect();

  debug!(recursive_functions = functions.len(), "recursion analysis complete");

  RecursionAnalysis { has_recursion: !functions.is_empty(), functions }
}

fn find_declarations(text: &str) -> BTreeMap<usize, Declaration> {
  let mut declarations = BTreeMap::new();

  for regex in [&*KEYWORD_FN, &*DEF_FN] {
    for caps in regex.captures_iter(text) {
      let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
        continue;
      };
      let body = closing_paren(text, whole.end() - 1)
        .and_then(|close| body_after(text, whole.start(), close + 1));
      declarations
        .entry(name.start())
        .or_insert(Declaration { name: name.as_str().to_string(), body });
    }
  }

  for caps in TYPED_FN.captures_iter(text) {
    let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
      continue;
    };
    if CONTROL_WORDS.contains(&name.as_str()) {
      continue;
    }
    let body = body_after(text, whole.start(), whole.end() - 1);
    declarations
      .entry(name.start())
      .or_insert(Declaration { name: name.as_str().to_string(), body });
  }

  declarations
}

/// Index of the `)` balancing the `(` at `open`.
fn closing_paren(text: &str, open: usize) -> Option<usize> {
  let mut balance = 0usize;
  for (i, byte) in text.as_bytes().iter().enumerate().skip(open) {
    match byte {
      b'(' => balance += 1,
      b')' => {
        balance = balance.saturating_sub(1);
        if balance == 0 {
          return Some(i);
        }
      }
      _ => {}
    }
  }
  None
}

fn count_self_calls(name: &str, body: &str) -> usize {
  CALL.captures_iter(body).filter(|caps| caps.get(1).is_some_and(|m| m.as_str() == name)).count()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn records(text: &str) -> Vec<(String, usize)> {
    analyze_recursion(text).functions.into_iter().map(|r| (r.name, r.self_calls)).collect()
  }

  #[test]
  fn test_no_functions() {
    let analysis = analyze_recursion("let x = 1;");
    assert!(!analysis.has_recursion);
    assert!(analysis.functions.is_empty());
  }

  #[test]
  fn test_javascript_double_recursion() {
    let text = "function walk(n) { if (n < 2) return n; return walk(n - 1) + walk(n - 2); }";
    assert_eq!(records(text), vec![("walk".to_string(), 2)]);
  }

  #[test]
  fn test_rust_single_recursion() {
    let text = "fn fact(n: u64) -> u64 {\n    if n == 0 { 1 } else { n * fact(n - 1) }\n}";
    assert_eq!(records(text), vec![("fact".to_string(), 1)]);
  }

  #[test]
  fn test_python_def_uses_indentation() {
    let text = "def count_down(n):\n    if n == 0:\n        return\n    count_down(n - 1)\n\ncount_down(5)\n";
    assert_eq!(records(text), vec![("count_down".to_string(), 1)]);
  }

  #[test]
  fn test_c_style_typed_declaration() {
    let text = "public static int sum(int[] a, int i) {\n  if (i == a.length) return 0;\n  return a[i] + sum(a, i + 1);\n}";
    assert_eq!(records(text), vec![("sum".to_string(), 1)]);
  }

  #[test]
  fn test_go_method_receiver() {
    let text = "func (t *Tree) depth(n *Node) int {\n  return 1 + max(t.depth(n.left), t.depth(n.right))\n}";
    assert_eq!(records(text), vec![("depth".to_string(), 2)]);
  }

  #[test]
  fn test_calls_outside_body_do_not_count() {
    let text = "function helper(x) { return x + 1; }\nhelper(helper(2));";
    assert!(!analyze_recursion(text).has_recursion);
  }

  #[test]
  fn test_control_statements_are_not_declarations() {
    let text = "void run() {\n  if (ready) { go(); }\n}";
    assert!(!analyze_recursion(text).has_recursion);
  }

  #[test]
  fn test_prototype_without_body() {
    let text = "int f(int n);\nint g(int n) { return f(n); }";
    assert!(!analyze_recursion(text).has_recursion);
  }

  #[test]
  fn test_nested_call_arguments_count_separately() {
    let text = "fn walk(n: u32) -> u32 { walk(walk(n - 1)) }";
    assert_eq!(records(text), vec![("walk".to_string(), 2)]);
  }
}

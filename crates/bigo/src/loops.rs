//! Loop structure analysis
//!
//! Finds counting `for`, `while` and range/collection `for` headers, measures
//! their nesting by brace count, and tags each loop as linear or logarithmic
//! from its header and body text.

use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

use crate::blocks::{body_after, body_text, BraceIndex};
use crate::verdict::{IterationClass, LoopAnalysis, LoopKind, LoopRecord};

static COUNTING_FOR: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\bfor\s*\(([^;{}]*;[^;{}]*;[^{}\n]*)\)").expect("valid regex literal")
});

static WHILE_LOOP: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bwhile\b\s*([^{\n]*)").expect("valid regex literal"));

static RANGE_FOR: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\bfor\b\s*([^{\n;]*?(?:\bin\b|\bof\b|:)[^{\n;]*)").expect("valid regex literal")
});

static IDENT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[A-Za-z_]\w*").expect("valid regex literal"));

// `mid = (lo + hi) / 2`, optionally wrapped in a call such as `Math.floor(...)`.
static MIDPOINT_SUM: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\b(\w+)\s*=\s*(?:[\w.]+\s*\(\s*)?\(\s*(\w+)\s*\+\s*(\w+)\s*\)\s*(?:/\s*2\b|>>>?\s*1\b)")
    .expect("valid regex literal")
});

// `mid = lo + (hi - lo) / 2`
static MIDPOINT_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\b(\w+)\s*=\s*(\w+)\s*\+\s*\(\s*(\w+)\s*-\s*\w+\s*\)\s*(?:/\s*2\b|>>>?\s*1\b)")
    .expect("valid regex literal")
});

static BOUND_UPDATE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\b(\w+)\s*=\s*(\w+)\s*[+-]\s*1\b").expect("valid regex literal")
});

static GEOMETRIC_HEADER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"/=?\s*2\b|\*=?\s*2\b|>>>?=?\s*1\b|<<=?\s*1\b").expect("valid regex literal")
});

static LENGTH_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)\b(length|size|len|count)\b").expect("valid regex literal")
});

static COLLECTION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)(\w+)\s*\.\s*(?:length|size|len|count)\b|\b(?:len|size|length|count)\s*\(\s*(\w+)")
    .expect("valid regex literal")
});

// `v /= 2`, `v = v / 2`, `v = Math.floor(v / 2)`, `v <<= 1`, `v //= 2`, ...
// Group 1 is the updated variable, groups 2-4 the operand when there is one.
static GEOMETRIC_UPDATE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(concat!(
    r"\b([A-Za-z_]\w*)\s*(?://?=\s*2\b|\*=\s*2\b|>>>?=\s*1\b|<<=\s*1\b",
    r"|=\s*(?:[\w.]+\.)?(?:floor|ceil|trunc|int)\s*\(\s*([A-Za-z_]\w*)\s*//?\s*2\s*\)",
    r"|=\s*([A-Za-z_]\w*)\s*(?://?|\*)\s*2\b",
    r"|=\s*([A-Za-z_]\w*)\s*(?:>>>?|<<)\s*1\b)",
  ))
  .expect("valid regex literal")
});

// `v++`, `v -= 1`, `--v`, `v = v + 1`
static STEP_UPDATE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(concat!(
    r"\b([A-Za-z_]\w*)\s*(?:\+\+|--|\+=|-=)",
    r"|(?:\+\+|--)\s*([A-Za-z_]\w*)",
    r"|\b([A-Za-z_]\w*)\s*=\s*([A-Za-z_]\w*)\s*[+-]\s*[\w(]",
  ))
  .expect("valid regex literal")
});

static STEP: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\+\+|--|\+=|-=").expect("valid regex literal"));

static RELATIONAL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"<=?|>=?|!=").expect("valid regex literal"));

const NON_VARIABLES: &[&str] = &[
  "not", "and", "or", "true", "false", "True", "False", "let", "var", "const", "int", "auto", "mut",
  "len", "size", "length", "null", "None", "nil",
];

/// Scan sanitized text for loops and summarise their structure.
pub fn analyze_loops(text: &str) -> LoopAnalysis {
  let mut headers: BTreeMap<usize, (LoopKind, String, usize)> = BTreeMap::new();

  for caps in COUNTING_FOR.captures_iter(text) {
    let (whole, header) = (caps.get(0), caps.get(1));
    if let (Some(whole), Some(header)) = (whole, header) {
      headers.insert(whole.start(), (LoopKind::CountingFor, header.as_str().to_string(), whole.end()));
    }
  }
  for (regex, kind) in [(&*WHILE_LOOP, LoopKind::While), (&*RANGE_FOR, LoopKind::RangeFor)] {
    for caps in regex.captures_iter(text) {
      let (whole, header) = (caps.get(0), caps.get(1));
      if let (Some(whole), Some(header)) = (whole, header) {
        headers.entry(whole.start()).or_insert((kind, header.as_str().trim().to_string(), whole.end()));
      }
    }
  }

  let braces = BraceIndex::new(text);
  let loops: Vec<LoopRecord> = headers
    .into_iter()
    .map(|(offset, (kind, header, header_end))| {
      let body = body_after(text, offset, header_end);
      let iteration = classify_iteration(kind, &header, body_text(text, body));
      LoopRecord {
        kind,
        collection: collection_name(&header),
        header,
        offset,
        depth: braces.depth_at(offset),
        iteration,
        body,
      }
    })
    .collect();

  let analysis = summarize(loops);
  debug!(
    loops = analysis.loop_count,
    max_depth = analysis.max_depth,
    max_nested_linear = analysis.max_nested_linear,
    logarithmic = analysis.has_logarithmic,
    logarithmic_nested = analysis.logarithmic_nested,
    same_array = analysis.nested_same_array,
    "loop analysis complete"
  );
  analysis
}

fn summarize(loops: Vec<LoopRecord>) -> LoopAnalysis {
  let mut linear_by_depth: BTreeMap<usize, usize> = BTreeMap::new();
  for record in loops.iter().filter(|l| l.iteration == IterationClass::Linear) {
    *linear_by_depth.entry(record.depth).or_default() += 1;
  }

  LoopAnalysis {
    loop_count: loops.len(),
    max_depth: loops.iter().map(|l| l.depth).max().unwrap_or(0),
    max_nested_linear: linear_by_depth.values().copied().max().unwrap_or(0),
    linear_by_depth,
    has_logarithmic: loops.iter().any(|l| l.iteration == IterationClass::Logarithmic),
    logarithmic_nested: has_logarithmic_nested(&loops),
    nested_same_array: has_nested_same_array(&loops),
    loops,
  }
}

/// A logarithmic loop inside a linear loop's body, or the other way round.
fn has_logarithmic_nested(loops: &[LoopRecord]) -> bool {
  let contains = |outer: &LoopRecord, inner: &LoopRecord| {
    outer.body.is_some_and(|(start, end)| inner.offset >= start && inner.offset < end)
  };

  loops.iter().filter(|l| l.iteration == IterationClass::Logarithmic).any(|log| {
    loops
      .iter()
      .filter(|l| l.iteration == IterationClass::Linear)
      .any(|linear| contains(linear, log) || contains(log, linear))
  })
}

/// A counting loop directly wrapping another counting loop, both bounded by
/// the same length keyword (`arr.length` twice, `v.size()` twice, ...).
fn has_nested_same_array(loops: &[LoopRecord]) -> bool {
  let counting: Vec<(&LoopRecord, String)> = loops
    .iter()
    .filter(|l| l.kind == LoopKind::CountingFor)
    .filter_map(|l| length_keyword(&l.header).map(|kw| (l, kw)))
    .collect();

  counting.iter().any(|(outer, keyword)| {
    let Some((start, end)) = outer.body else {
      return false;
    };
    counting.iter().any(|(inner, inner_keyword)| {
      inner.depth == outer.depth + 1
        && inner.offset >= start
        && inner.offset < end
        && inner_keyword == keyword
    })
  })
}

/// Decide how a loop's trip count grows, in priority order.
pub fn classify_iteration(kind: LoopKind, header: &str, body: &str) -> IterationClass {
  if is_binary_search(header, body) {
    return IterationClass::Logarithmic;
  }

  let variable = condition_variable(kind, header);
  if let Some(var) = variable {
    if updates_geometrically(var, body) {
      return IterationClass::Logarithmic;
    }
  }

  if GEOMETRIC_HEADER.is_match(header) {
    return IterationClass::Logarithmic;
  }
  if kind == LoopKind::RangeFor {
    return IterationClass::Linear;
  }
  if LENGTH_KEYWORD.is_match(header) {
    return IterationClass::Linear;
  }
  let relational = RELATIONAL.is_match(header);
  if relational && STEP.is_match(header) {
    return IterationClass::Linear;
  }
  if let Some(var) = variable {
    if relational && steps_by_one(var, body) {
      return IterationClass::Linear;
    }
  }

  IterationClass::Unknown
}

fn is_binary_search(header: &str, body: &str) -> bool {
  let header_idents: HashSet<&str> = IDENT.find_iter(header).map(|m| m.as_str()).collect();

  [&*MIDPOINT_SUM, &*MIDPOINT_OFFSET].iter().any(|regex| {
    regex.captures_iter(body).any(|caps| {
      let (Some(mid), Some(left), Some(right)) = (caps.get(1), caps.get(2), caps.get(3)) else {
        return false;
      };
      let (mid, left, right) = (mid.as_str(), left.as_str(), right.as_str());
      if !header_idents.contains(left) || !header_idents.contains(right) {
        return false;
      }
      BOUND_UPDATE.captures_iter(body).any(|update| {
        let target = update.get(1).map_or("", |m| m.as_str());
        let source = update.get(2).map_or("", |m| m.as_str());
        source == mid && (target == left || target == right)
      })
    })
  })
}

/// The variable the loop condition hinges on: the first identifier of the
/// `while` condition or of the middle clause of a counting `for`.
fn condition_variable(kind: LoopKind, header: &str) -> Option<&str> {
  let condition = match kind {
    LoopKind::CountingFor => header.split(';').nth(1)?,
    LoopKind::While => header,
    LoopKind::RangeFor => return None,
  };
  IDENT.find_iter(condition).map(|m| m.as_str()).find(|ident| !NON_VARIABLES.contains(ident))
}

fn updates_geometrically(var: &str, body: &str) -> bool {
  GEOMETRIC_UPDATE.captures_iter(body).any(|caps| {
    let target = caps.get(1).map_or("", |m| m.as_str());
    let operand = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4));
    target == var && operand.map_or(true, |m| m.as_str() == var)
  })
}

fn steps_by_one(var: &str, body: &str) -> bool {
  STEP_UPDATE.captures_iter(body).any(|caps| {
    let name = |i: usize| caps.get(i).map(|m| m.as_str());
    name(1) == Some(var) || name(2) == Some(var) || (name(3) == Some(var) && name(4) == Some(var))
  })
}

fn length_keyword(header: &str) -> Option<String> {
  LENGTH_KEYWORD.captures(header).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_lowercase())
}

fn collection_name(header: &str) -> Option<String> {
  COLLECTION
    .captures(header)
    .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
    .map(|m| m.as_str().to_string())
}

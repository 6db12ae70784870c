//! Known-algorithm detection
//!
//! A fixed catalog of textbook algorithm names. When sanitized code mentions
//! one of them the canonical bound is used directly instead of inferring it
//! from the loop structure.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::verdict::KnownAlgorithmMatch;

struct Signature {
  name: &'static str,
  pattern: &'static str,
  time: &'static str,
  space: &'static str,
}

// Scan order is significant: the first hit becomes the verdict.
const CATALOG: &[Signature] = &[
  Signature { name: "Bubble Sort", pattern: r"bubble[\s_-]*sort", time: "O(n²)", space: "O(1)" },
  Signature {
    name: "Selection Sort",
    pattern: r"selection[\s_-]*sort",
    time: "O(n²)",
    space: "O(1)",
  },
  Signature {
    name: "Insertion Sort",
    pattern: r"insertion[\s_-]*sort",
    time: "O(n²)",
    space: "O(1)",
  },
  Signature { name: "Merge Sort", pattern: r"merge[\s_-]*sort", time: "O(n log n)", space: "O(n)" },
  Signature {
    name: "Quick Sort",
    pattern: r"quick[\s_-]*sort",
    time: "O(n log n) average, O(n²) worst",
    space: "O(log n)",
  },
  Signature { name: "Heap Sort", pattern: r"heap[\s_-]*sort", time: "O(n log n)", space: "O(1)" },
  Signature { name: "Counting Sort", pattern: r"counting[\s_-]*sort", time: "O(n + k)", space: "O(k)" },
  Signature {
    name: "Radix Sort",
    pattern: r"radix[\s_-]*sort",
    time: "O(d·(n + k))",
    space: "O(n + k)",
  },
  Signature {
    name: "Binary Search",
    pattern: r"binary[\s_-]*search",
    time: "O(log n)",
    space: "O(1)",
  },
  Signature { name: "Linear Search", pattern: r"linear[\s_-]*search", time: "O(n)", space: "O(1)" },
  Signature {
    name: "Dijkstra's Algorithm",
    pattern: r"dijkstra",
    time: "O((V + E) log V)",
    space: "O(V)",
  },
  Signature { name: "Bellman-Ford", pattern: r"bellman[\s_-]*ford", time: "O(V·E)", space: "O(V)" },
  Signature { name: "Floyd-Warshall", pattern: r"floyd[\s_-]*warshall", time: "O(V³)", space: "O(V²)" },
  Signature {
    name: "Breadth-First Search",
    pattern: r"\bbfs|breadth[\s_-]*first",
    time: "O(V + E)",
    space: "O(V)",
  },
  Signature {
    name: "Depth-First Search",
    pattern: r"\bdfs|depth[\s_-]*first",
    time: "O(V + E)",
    space: "O(V)",
  },
  Signature { name: "Kruskal's Algorithm", pattern: r"kruskal", time: "O(E log E)", space: "O(V)" },
  Signature {
    name: "Union-Find",
    pattern: r"union[\s_-]*find|disjoint[\s_-]*set",
    time: "O(α(n)) amortized per operation",
    space: "O(n)",
  },
  Signature {
    name: "Prim's Algorithm",
    pattern: r"\bprims?\b|\bprims?[\s_-]*mst",
    time: "O(E log V)",
    space: "O(V)",
  },
  Signature {
    name: "Topological Sort",
    pattern: r"topological[\s_-]*sort|\btoposort",
    time: "O(V + E)",
    space: "O(V)",
  },
  Signature { name: "0/1 Knapsack", pattern: r"knapsack", time: "O(n·W)", space: "O(n·W)" },
  Signature {
    name: "Longest Common Subsequence",
    pattern: r"\blcs\b|longest[\s_-]*common[\s_-]*subsequence",
    time: "O(n·m)",
    space: "O(n·m)",
  },
  Signature {
    name: "Edit Distance",
    pattern: r"edit[\s_-]*distance|levenshtein",
    time: "O(n·m)",
    space: "O(n·m)",
  },
  Signature { name: "Tower of Hanoi", pattern: r"hanoi", time: "O(2^n)", space: "O(n)" },
  Signature {
    name: "Permutation Generation",
    pattern: r"\bpermut",
    time: "O(n·n!)",
    space: "O(n)",
  },
];

const UNION_FIND: &str = "Union-Find";
const KRUSKAL: &str = "Kruskal's Algorithm";

static COMPILED: LazyLock<Vec<(&'static Signature, Regex)>> = LazyLock::new(|| {
  CATALOG
    .iter()
    .map(|sig| (sig, Regex::new(sig.pattern).expect("valid regex literal")))
    .collect()
});

static FIBONACCI: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bfib").expect("valid regex literal"));

static MEMO_HINT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"memo|cache|\bdp\b|tabulat").expect("valid regex literal"));

/// Scan case-folded, sanitized text for known algorithms.
///
/// Returns `None` when nothing in the catalog matched, which tells the
/// decision engine to fall through to structural analysis.
pub fn detect_known_patterns(folded: &str) -> Option<Vec<KnownAlgorithmMatch>> {
  let mut matches: Vec<KnownAlgorithmMatch> = Vec::new();

  for (sig, regex) in COMPILED.iter() {
    if !regex.is_match(folded) {
      continue;
    }
    if sig.name == UNION_FIND && matches.iter().any(|m| m.name == KRUSKAL) {
      continue;
    }
    matches.push(KnownAlgorithmMatch::new(sig.name, sig.time, sig.space));
  }

  if FIBONACCI.is_match(folded) {
    let entry = if MEMO_HINT.is_match(folded) {
      KnownAlgorithmMatch::new("Fibonacci (memoized)", "O(n)", "O(n)")
    } else {
      KnownAlgorithmMatch::new("Fibonacci (naive recursion)", "O(2^n)", "O(n)")
    };
    matches.push(entry);
  }

  debug!(count = matches.len(), "known-pattern scan complete");

  if matches.is_empty() {
    None
  } else {
    Some(matches)
  }
}

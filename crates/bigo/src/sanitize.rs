//! Comment and literal stripping
//!
//! Removes block comments, line comments, shell-style `#` comments and
//! quoted literals so that keywords inside them cannot trigger a match.
//! This is a single regex pass, not a lexer: unterminated block comments and
//! docstrings swallow the rest of the text, unterminated quotes are left alone.
//! Rust lifetimes and Python floor division look like literals or comments;
//! they are matched first and kept as written.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

// Alternation order matters: the leftmost match wins, and at equal offsets the
// earlier branch wins, so `"// x"` is a string and `// "x"` is a comment.
static LITERALS_AND_COMMENTS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(concat!(
    r#"(?s:/\*.*?(?:\*/|\z))"#,
    r#"|(?s:""".*?(?:"""|\z))"#,
    r#"|(?s:'''.*?(?:'''|\z))"#,
    // `n //= 2`, `n // 2`
    r#"|(?P<floordiv>//=?[ \t]*\d)"#,
    r#"|//[^\n]*"#,
    r#"|#[^\n]*"#,
    r#"|"(?:\\.|[^"\\\n])*""#,
    // `<'a, 'b>`, `&'a `, `T, 'a>`, `'static`, `'outer: loop`, `break 'outer`
    r#"|(?P<lifetime>[<&][ \t]*'[A-Za-z_]\w*(?:[ \t]*,[ \t]*'[A-Za-z_]\w*)*[^'\w]"#,
    r#"|,[ \t]*'[A-Za-z_]\w*[ \t]*[,>]"#,
    r#"|'static[^'\w]"#,
    r#"|'[A-Za-z_]\w*:[ \t]*(?:loop|for|while)\b"#,
    r#"|\b(?:break|continue)[ \t]+'[A-Za-z_]\w*)"#,
    r#"|'(?:\\.|[^'\\\n])*'"#,
    r#"|`(?:\\.|[^`\\])*`"#,
  ))
  .expect("valid regex literal")
});

/// Replace every comment and quoted literal with a single space.
pub fn strip_comments_and_strings(source: &str) -> String {
  let sanitized = LITERALS_AND_COMMENTS
    .replace_all(source, |caps: &Captures| {
      if caps.name("lifetime").is_some() || caps.name("floordiv").is_some() {
        caps[0].to_string()
      } else {
        " ".to_string()
      }
    })
    .into_owned();
  debug!(input_len = source.len(), sanitized_len = sanitized.len(), "sanitized source");
  sanitized
}

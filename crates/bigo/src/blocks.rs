//! Body extraction by brace balance
//!
//! Shared by the loop and recursion analyzers. A header owns the next `{`
//! (provided no `;` or `}` comes first) up to its balancing `}`. Headers whose
//! line ends in `:` own the following, more deeply indented lines instead.

/// Byte range `start..end` into the sanitized text.
pub type Span = (usize, usize);

/// Locate the body belonging to a header that starts at `header_start`,
/// searching for an opening brace from `search_from` onwards.
pub fn body_after(text: &str, header_start: usize, search_from: usize) -> Option<Span> {
  let header_start = header_start.min(text.len());
  let search_from = search_from.clamp(header_start, text.len());

  let line_start = text[..header_start].rfind('\n').map_or(0, |i| i + 1);
  let line_end = text[search_from..].find('\n').map_or(text.len(), |i| search_from + i);
  let header_line = &text[line_start..line_end];

  // `} while (c);` closes a do-while; nothing after it belongs to the loop.
  if text[header_start..search_from].trim_end().ends_with(';') {
    return None;
  }

  if header_line.trim_end().ends_with(':') && !header_line.contains('{') {
    return indented_block(text, header_line, line_end);
  }

  for (i, byte) in text.as_bytes()[search_from..].iter().enumerate() {
    match byte {
      b'{' => return brace_block(text, search_from + i),
      b';' | b'}' => return None,
      _ => {}
    }
  }

  None
}

/// Text of a body span, empty when there is none.
pub fn body_text(text: &str, span: Option<Span>) -> &str {
  span.and_then(|(start, end)| text.get(start..end)).unwrap_or("")
}

/// Everything between the brace at `open` and its partner.
///
/// Unbalanced input yields `None`; the caller records an empty body.
pub fn brace_block(text: &str, open: usize) -> Option<Span> {
  let mut balance = 0usize;

  for (i, byte) in text.as_bytes().iter().enumerate().skip(open) {
    match byte {
      b'{' => balance += 1,
      b'}' => {
        balance = balance.saturating_sub(1);
        if balance == 0 {
          return Some((open + 1, i));
        }
      }
      _ => {}
    }
  }

  None
}

/// Brace positions of a text, for depth queries at many offsets.
pub struct BraceIndex {
  opens: Vec<usize>,
  closes: Vec<usize>,
}

impl BraceIndex {
  pub fn new(text: &str) -> Self {
    let mut opens = Vec::new();
    let mut closes = Vec::new();
    for (i, byte) in text.bytes().enumerate() {
      match byte {
        b'{' => opens.push(i),
        b'}' => closes.push(i),
        _ => {}
      }
    }
    Self { opens, closes }
  }

  /// Unmatched opening braces before `offset`, counted over the whole prefix.
  ///
  /// Not scope aware: a `}` anywhere earlier cancels a `{` anywhere earlier.
  pub fn depth_at(&self, offset: usize) -> usize {
    let opens = self.opens.partition_point(|&i| i < offset);
    let closes = self.closes.partition_point(|&i| i < offset);
    opens.saturating_sub(closes)
  }
}

fn indented_block(text: &str, header_line: &str, header_end: usize) -> Option<Span> {
  let base = get_indents(header_line);
  let start = (header_end + 1).min(text.len());
  let mut end = start;
  let mut cursor = start;

  for line in text[start..].split_inclusive('\n') {
    let content = line.trim_end_matches(['\n', '\r']);
    if !content.trim().is_empty() {
      if get_indents(content) <= base {
        break;
      }
      end = cursor + content.len();
    }
    cursor += line.len();
  }

  if end > start {
    Some((start, end))
  } else {
    None
  }
}

/// Leading whitespace width, tabs counting as four columns.
fn get_indents(line: &str) -> usize {
  let mut width = 0;
  for ch in line.chars() {
    match ch {
      ' ' => width += 1,
      '\t' => width += 4,
      _ => break,
    }
  }
  width
}

//! Helpers shared by the integration tests.

/// Braces balance (ignoring escaped ones) and every `\left` has a `\right`.
pub fn is_balanced(markup: &str) -> bool {
  let mut depth = 0i32;
  let mut chars = markup.chars();
  while let Some(c) = chars.next() {
    match c {
      '\\' => {
        chars.next();
      }
      '{' => depth += 1,
      '}' => {
        depth -= 1;
        if depth < 0 {
          return false;
        }
      }
      _ => {}
    }
  }
  depth == 0
    && markup.matches(r"\left").count() == markup.matches(r"\right").count()
}
